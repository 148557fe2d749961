//! Script evaluation capability.
//!
//! The booking site derives its anti-bot token from obfuscated JavaScript.
//! Running that code is isolated behind [`ScriptEvaluator`]; nothing else in
//! the crate executes site-supplied code.

use boa_engine::{Context, Source};
use tracing::debug;

/// Upper bound on loop iterations for a single evaluation.
const LOOP_ITERATION_LIMIT: u64 = 1_000_000;

/// Maximum call depth for a single evaluation.
const RECURSION_LIMIT: usize = 512;

/// Error raised by a script evaluator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("script evaluation failed: {0}")]
pub struct ScriptError(pub String);

/// Evaluate a code fragment and read back one global variable.
pub trait ScriptEvaluator {
    /// Run `code`, then return the string value of the global `variable`.
    ///
    /// Returns `Ok(None)` when the variable is `undefined` or `null`.
    fn evaluate(&self, code: &str, variable: &str) -> Result<Option<String>, ScriptError>;
}

/// [`ScriptEvaluator`] backed by the boa JavaScript engine.
///
/// Every call gets a fresh context with no host bindings, so evaluated code
/// has no filesystem or network access and no state survives between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoaEvaluator;

impl BoaEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptEvaluator for BoaEvaluator {
    fn evaluate(&self, code: &str, variable: &str) -> Result<Option<String>, ScriptError> {
        let mut context = Context::default();
        context
            .runtime_limits_mut()
            .set_loop_iteration_limit(LOOP_ITERATION_LIMIT);
        context
            .runtime_limits_mut()
            .set_recursion_limit(RECURSION_LIMIT);

        context
            .eval(Source::from_bytes(code.as_bytes()))
            .map_err(|e| ScriptError(e.to_string()))?;

        let value = context
            .eval(Source::from_bytes(variable.as_bytes()))
            .map_err(|e| ScriptError(e.to_string()))?;

        if value.is_undefined() || value.is_null() {
            debug!(variable, "script left variable unset");
            return Ok(None);
        }

        let value = value
            .to_string(&mut context)
            .map_err(|e| ScriptError(e.to_string()))?;

        Ok(Some(value.to_std_string_escaped()))
    }
}
