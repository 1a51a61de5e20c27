//! Reddit API client
//!
//! Authenticates as a script app with the password grant and talks to the
//! OAuth API host. Requests are paced using the `x-ratelimit-*` headers Reddit
//! returns on every response.

use super::{NewNote, PlatformClient, PlatformError, RemoteThing, ThingKind};
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com";
pub const DEFAULT_API_URL: &str = "https://oauth.reddit.com";

/// Refresh the token this long before Reddit says it expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Credentials of a Reddit "script" app and the moderator account it acts as
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct RedditClientConfig {
    pub credentials: RedditCredentials,
    pub user_agent: String,
    pub timeout: Duration,
    /// Host serving `/api/v1/access_token`
    pub auth_url: String,
    /// Host serving the OAuth API
    pub api_url: String,
}

impl RedditClientConfig {
    pub fn new(credentials: RedditCredentials) -> Self {
        Self {
            credentials,
            user_agent: format!("modnote-importer/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(60),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

struct Session {
    access_token: String,
    expires_at: Instant,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Rate limit state reported by the last response
#[derive(Debug, Default)]
struct RateLimit {
    remaining: Option<f64>,
    reset_at: Option<Instant>,
}

impl RateLimit {
    fn update(&mut self, headers: &HeaderMap, now: Instant) {
        if let Some(remaining) =
            header_str(headers, "x-ratelimit-remaining").and_then(|v| v.parse::<f64>().ok())
        {
            self.remaining = Some(remaining);
        }
        if let Some(reset) =
            header_str(headers, "x-ratelimit-reset").and_then(|v| v.parse::<u64>().ok())
        {
            self.reset_at = Some(now + Duration::from_secs(reset));
        }
    }

    /// How long to wait before the next request may be sent
    fn wait_time(&self, now: Instant) -> Option<Duration> {
        match (self.remaining, self.reset_at) {
            (Some(remaining), Some(reset_at)) if remaining < 1.0 => {
                reset_at.checked_duration_since(now)
            }
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct Identity {
    name: String,
}

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Deserialize)]
struct ListingChild {
    kind: String,
    data: ThingData,
}

#[derive(Deserialize)]
struct ThingData {
    id: String,
    #[serde(default)]
    subreddit: Option<String>,
}

/// Extract an API error from a response body, if it carries one
///
/// Reddit reports errors either as `{"json": {"errors": [[KIND, message, field]]}}`
/// or as `{"reason": KIND, "explanation": message}`.
fn embedded_api_error(body: &str) -> Option<PlatformError> {
    let value: Value = serde_json::from_str(body).ok()?;

    if let Some(first) = value.pointer("/json/errors/0").and_then(Value::as_array) {
        let kind = first.first()?.as_str()?;
        let message = first.get(1).and_then(Value::as_str).unwrap_or_default();
        return Some(PlatformError::api(kind, message));
    }

    let reason = value.get("reason").and_then(Value::as_str)?;
    let message = value
        .get("explanation")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some(PlatformError::api(reason, message))
}

fn api_error(status: StatusCode, body: &str) -> PlatformError {
    embedded_api_error(body).unwrap_or_else(|| {
        let snippet: String = body.chars().take(200).collect();
        PlatformError::api(format!("HTTP_{}", status.as_u16()), snippet)
    })
}

pub struct RedditClient {
    http: Client,
    config: RedditClientConfig,
    session: Option<Session>,
    rate_limit: RateLimit,
}

impl RedditClient {
    pub fn new(config: RedditClientConfig) -> Result<Self, PlatformError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            session: None,
            rate_limit: RateLimit::default(),
        })
    }

    async fn request_token(&self) -> Result<Session, PlatformError> {
        let credentials = &self.config.credentials;
        let url = format!("{}/api/v1/access_token", self.config.auth_url);
        let response = self
            .http
            .post(url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PlatformError::Authentication(format!(
                "token endpoint returned HTTP {}",
                status
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| PlatformError::InvalidResponse(format!("token response: {}", e)))?;
        if let Some(error) = token.error {
            return Err(PlatformError::Authentication(error));
        }
        let access_token = token.access_token.ok_or_else(|| {
            PlatformError::Authentication("token response has no access_token".to_string())
        })?;
        let expires_in = Duration::from_secs(token.expires_in.unwrap_or(3600));

        Ok(Session {
            access_token,
            expires_at: Instant::now() + expires_in,
        })
    }

    async fn access_token(&mut self) -> Result<String, PlatformError> {
        if let Some(session) = &self.session
            && session.expires_at > Instant::now() + TOKEN_EXPIRY_MARGIN
        {
            return Ok(session.access_token.clone());
        }

        debug!("requesting Reddit access token");
        let session = self.request_token().await?;
        let token = session.access_token.clone();
        self.session = Some(session);
        Ok(token)
    }

    async fn send(&mut self, request: RequestBuilder) -> Result<Response, PlatformError> {
        let token = self.access_token().await?;

        if let Some(wait) = self.rate_limit.wait_time(Instant::now()) {
            info!(seconds = wait.as_secs(), "rate limit reached, waiting for reset");
            tokio::time::sleep(wait).await;
        }

        let response = request.bearer_auth(token).send().await?;
        self.rate_limit.update(response.headers(), Instant::now());
        Ok(response)
    }

    async fn fetch_thing(&mut self, kind: ThingKind, id: &str) -> Result<RemoteThing, PlatformError> {
        let fullname = kind.fullname(id);
        let url = format!("{}/api/info", self.config.api_url);
        let request = self
            .http
            .get(url)
            .query(&[("id", fullname.as_str()), ("raw_json", "1")]);
        let response = self.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::InvalidReference {
                id: fullname,
                reason: format!("lookup returned HTTP {}", status),
            });
        }

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(format!("info listing: {}", e)))?;
        let child = listing
            .data
            .children
            .into_iter()
            .find(|child| child.kind == kind.prefix())
            .ok_or_else(|| PlatformError::InvalidReference {
                id: fullname.clone(),
                reason: "not found".to_string(),
            })?;

        Ok(RemoteThing {
            kind,
            id: child.data.id,
            subreddit: child.data.subreddit,
        })
    }
}

impl PlatformClient for RedditClient {
    async fn authenticate(&mut self) -> Result<String, PlatformError> {
        let url = format!("{}/api/v1/me", self.config.api_url);
        let request = self.http.get(url);
        let response = self.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Authentication(format!(
                "identity check returned HTTP {}",
                status
            )));
        }
        let identity: Identity = response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(format!("identity: {}", e)))?;

        info!(user = %identity.name, "authenticated with Reddit");
        Ok(identity.name)
    }

    async fn create_note(&mut self, note: &NewNote) -> Result<(), PlatformError> {
        let mut form = vec![
            ("subreddit", note.subreddit.as_str()),
            ("user", note.user.as_str()),
            ("note", note.note.as_str()),
        ];
        if let Some(label) = note.label {
            form.push(("label", label.as_str()));
        }
        if let Some(reddit_id) = &note.reddit_id {
            form.push(("reddit_id", reddit_id.as_str()));
        }

        let url = format!("{}/api/mod/notes", self.config.api_url);
        let request = self.http.post(url).form(&form);
        let response = self.send(request).await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        match embedded_api_error(&body) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn fetch_comment(&mut self, id: &str) -> Result<RemoteThing, PlatformError> {
        self.fetch_thing(ThingKind::Comment, id).await
    }

    async fn fetch_submission(&mut self, id: &str) -> Result<RemoteThing, PlatformError> {
        self.fetch_thing(ThingKind::Submission, id).await
    }
}
