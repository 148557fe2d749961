//! Session bootstrap for the booking site.
//!
//! Every endpoint requires a session cookie and an anti-bot token. Both come
//! from a single request to the site root; the token is computed by running
//! the page's obfuscated script through a [`ScriptEvaluator`].

mod bootstrap;
mod script;

pub use bootstrap::{
    SESSION_COOKIE_NAME, Session, TOKEN_STORAGE_KEY, bootstrap, extract_session_cookie,
    extract_token_fragment, session_from_page,
};
pub use script::{BoaEvaluator, ScriptError, ScriptEvaluator};
