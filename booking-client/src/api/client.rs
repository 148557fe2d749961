//! Booking site HTTP client.
//!
//! Bootstraps a session on construction, then issues authorized POSTs to the
//! site's `purchase/*` endpoints. Every call is a single attempt; there are
//! no retries and no caching.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::{COOKIE, HeaderMap, HeaderName, HeaderValue, REFERER, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::domain::{CoachType, DepartureDate, Station, Train};
use crate::enrich::{CoachReport, coaches_info_for_train};
use crate::error::BookingError;
use crate::session::{BoaEvaluator, ScriptEvaluator, Session, bootstrap};

use super::convert::{convert_stations, convert_trains};
use super::request::{Form, coach_form, coaches_form, search_form};
use super::types::{CoachDetail, CoachList, CoachSummary, Envelope, StationItem, TrainItem};

/// Default base URL of the booking site.
const DEFAULT_BASE_URL: &str = "https://booking.uz.gov.ua/";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Browser-like user agent; the site serves a different page to bots.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

const TOKEN_HEADER: &str = "gv-token";
const AJAX_HEADER: &str = "gv-ajax";
const GV_REFERER_HEADER: &str = "gv-referer";

/// Longest body excerpt kept in JSON errors.
const ERROR_BODY_LIMIT: usize = 500;

/// Configuration for the booking client.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Site root; always ends in `/`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl BookingConfig {
    /// Create a config pointing at the production site.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A `purchase/*` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// Station search by name prefix
    Stations(&'a str),
    /// Trains between two stations on a date
    Search,
    /// Coaches of one type on a train
    Coaches,
    /// Seat detail of one coach
    Coach,
}

impl Endpoint<'_> {
    /// Path relative to the site root, for logs and errors.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Stations(query) => format!("purchase/station/{query}"),
            Endpoint::Search => "purchase/search/".to_string(),
            Endpoint::Coaches => "purchase/coaches/".to_string(),
            Endpoint::Coach => "purchase/coach/".to_string(),
        }
    }

    /// Absolute URL under `base`, with the station query percent-encoded
    /// as one path segment.
    pub fn url(&self, base: &Url) -> Result<Url, BookingError> {
        match self {
            Endpoint::Stations(query) => {
                let mut url = base
                    .join("purchase/station/")
                    .map_err(|e| BookingError::Config(e.to_string()))?;
                url.path_segments_mut()
                    .map_err(|_| BookingError::Config(format!("base URL {base} cannot have a path")))?
                    .pop_if_empty()
                    .push(query);
                Ok(url)
            }
            _ => base
                .join(&self.path())
                .map_err(|e| BookingError::Config(e.to_string())),
        }
    }
}

/// The three requests the enrichment pipeline depends on.
///
/// [`BookingClient`] implements this against the live site; tests
/// substitute canned responses.
#[allow(async_fn_in_trait)]
pub trait BookingApi {
    /// All coaches of `coach_type` on `train`.
    async fn coaches(
        &self,
        train: &Train,
        coach_type: CoachType,
    ) -> Result<Vec<CoachSummary>, BookingError>;

    /// Seat detail of one coach listed by [`BookingApi::coaches`].
    async fn coach_detail(
        &self,
        train: &Train,
        coach: &CoachSummary,
    ) -> Result<CoachDetail, BookingError>;
}

/// Booking site client holding an established [`Session`].
#[derive(Debug, Clone)]
pub struct BookingClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
    auth_headers: HeaderMap,
}

impl BookingClient {
    /// Bootstrap a session and create a client, evaluating the token script
    /// with [`BoaEvaluator`].
    pub async fn connect(config: BookingConfig) -> Result<Self, BookingError> {
        Self::connect_with(config, &BoaEvaluator::new()).await
    }

    /// Bootstrap a session using a custom script evaluator.
    pub async fn connect_with<E>(config: BookingConfig, evaluator: &E) -> Result<Self, BookingError>
    where
        E: ScriptEvaluator + ?Sized,
    {
        let http = build_http(&config)?;
        let session = bootstrap(&http, &config.base_url, evaluator).await?;
        Self::from_parts(http, &config.base_url, session)
    }

    /// Create a client around an existing session without contacting the
    /// site.
    pub fn with_session(config: BookingConfig, session: Session) -> Result<Self, BookingError> {
        let http = build_http(&config)?;
        Self::from_parts(http, &config.base_url, session)
    }

    fn from_parts(
        http: reqwest::Client,
        base_url: &str,
        session: Session,
    ) -> Result<Self, BookingError> {
        let base_url = Url::parse(base_url).map_err(|e| BookingError::Config(e.to_string()))?;
        let auth_headers = auth_headers(&session, base_url.as_str())?;

        Ok(Self {
            http,
            base_url,
            session,
            auth_headers,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// POST `form` to `endpoint` and decode the envelope's value as `T`.
    ///
    /// A 401/403 means the session is gone and is returned as
    /// [`BookingError::Unauthorized`]; it is never retried.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint<'_>,
        form: &Form,
    ) -> Result<T, BookingError> {
        let path = endpoint.path();
        let url = endpoint.url(&self.base_url)?;
        debug!(endpoint = %path, fields = form.len(), "calling endpoint");

        let response = self
            .http
            .post(url)
            .headers(self.auth_headers.clone())
            .form(form)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(BookingError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BookingError::Status {
                status: status.as_u16(),
                message: truncate(&body),
            });
        }

        let body = response.text().await?;
        decode_envelope(&path, &body)
    }

    /// Stations whose name starts with `query`.
    #[instrument(skip(self))]
    pub async fn find_stations(&self, query: &str) -> Result<Vec<Station>, BookingError> {
        let items: Vec<StationItem> = self.call(Endpoint::Stations(query), &Form::new()).await?;
        Ok(convert_stations(&items))
    }

    /// Trains from `from_id` to `till_id` departing on `date`, in the
    /// site's order.
    #[instrument(skip(self, date), fields(date = %date))]
    pub async fn find_trains(
        &self,
        from_id: &str,
        till_id: &str,
        date: DepartureDate,
    ) -> Result<Vec<Train>, BookingError> {
        let form = search_form(from_id, till_id, date);
        let items: Vec<TrainItem> = self.call(Endpoint::Search, &form).await?;
        let trains = convert_trains(&items)?;
        debug!(count = trains.len(), "trains found");
        Ok(trains)
    }

    /// Coach and seat detail for every coach type on `train`.
    ///
    /// See [`coaches_info_for_train`] for the failure policy.
    pub async fn coaches_info_for_train(&self, train: &Train) -> Result<CoachReport, BookingError> {
        coaches_info_for_train(self, train).await
    }
}

impl BookingApi for BookingClient {
    async fn coaches(
        &self,
        train: &Train,
        coach_type: CoachType,
    ) -> Result<Vec<CoachSummary>, BookingError> {
        let list: CoachList = self
            .call(Endpoint::Coaches, &coaches_form(train, coach_type))
            .await?;
        Ok(list.into_vec())
    }

    async fn coach_detail(
        &self,
        train: &Train,
        coach: &CoachSummary,
    ) -> Result<CoachDetail, BookingError> {
        self.call(Endpoint::Coach, &coach_form(train, coach)).await
    }
}

/// Decode an endpoint response body: envelope first, then its value.
pub fn decode_envelope<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, BookingError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| BookingError::Json {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
        body: Some(truncate(body)),
    })?;

    let value = envelope.into_value(endpoint)?;

    serde_json::from_value(value).map_err(|e| BookingError::Json {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
        body: None,
    })
}

fn build_http(config: &BookingConfig) -> Result<reqwest::Client, BookingError> {
    let mut headers = HeaderMap::new();
    let user_agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|_| BookingError::Config("invalid user agent".to_string()))?;
    headers.insert(USER_AGENT, user_agent);

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// Headers attached to every authorized request.
fn auth_headers(session: &Session, referer: &str) -> Result<HeaderMap, BookingError> {
    let invalid = |what: &str| BookingError::Config(format!("{what} is not a valid header value"));

    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(session.cookie()).map_err(|_| invalid("session cookie"))?,
    );
    headers.insert(
        HeaderName::from_static(TOKEN_HEADER),
        HeaderValue::from_str(session.token()).map_err(|_| invalid("token"))?,
    );
    headers.insert(
        HeaderName::from_static(AJAX_HEADER),
        HeaderValue::from_static("1"),
    );

    let referer = HeaderValue::from_str(referer).map_err(|_| invalid("referer"))?;
    headers.insert(HeaderName::from_static(GV_REFERER_HEADER), referer.clone());
    headers.insert(REFERER, referer);

    Ok(headers)
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}
