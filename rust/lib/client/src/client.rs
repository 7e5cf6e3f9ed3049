use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, ErrorBody};
use crate::navigator::{Navigator, Routes};
use crate::request::{ApiRequest, Auth, Body, ResponseFormat};
use crate::session::{Session, SessionStore};

/// What to do when the server rejects a bearer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPolicy {
    /// On 401: clear the session and navigate to login. 403 keeps the
    /// session (the token is valid, the role is not).
    #[default]
    ClearAndRedirect,
    /// Report the error, leave session and location alone.
    Surface,
}

/// Session-aware client for the booking REST API.
///
/// Every call is independent and sent at most once: no retry, no queuing.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    routes: Routes,
    policy: AuthPolicy,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            navigator,
            routes: Routes::default(),
            policy: AuthPolicy::default(),
        }
    }

    pub fn with_routes(mut self, routes: Routes) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_policy(mut self, policy: AuthPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Session ─────────────────────────────────────────────────────

    pub fn get_session(&self) -> Result<Session, ApiError> {
        Ok(self.store.get()?)
    }

    pub fn set_session(&self, access: &str, refresh: &str) -> Result<(), ApiError> {
        self.store.set(&Session::new(access, refresh))?;
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), ApiError> {
        self.store.clear()?;
        Ok(())
    }

    /// Access token, or a redirect to `login_path` followed by
    /// [`ApiError::LoginRequired`]. Callers stop with `?`.
    pub fn require_authenticated_or_redirect(&self, login_path: &str) -> Result<String, ApiError> {
        match self.store.get()?.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                debug!("no access token, redirecting to {}", login_path);
                self.navigator.navigate(login_path);
                Err(ApiError::LoginRequired)
            }
        }
    }

    /// Put back a session captured earlier, e.g. after a login that
    /// failed halfway.
    pub(crate) fn restore_session(&self, session: &Session) -> Result<(), ApiError> {
        self.store.set(session)?;
        Ok(())
    }

    pub(crate) fn navigate(&self, path: &str) {
        self.navigator.navigate(path);
    }

    // ── Dispatch ────────────────────────────────────────────────────

    /// Issue one request and classify the outcome.
    ///
    /// Bearer requests without a stored token never reach the network.
    pub async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let token = match request.auth {
            Auth::Bearer => Some(self.require_authenticated_or_redirect(&self.routes.login)?),
            Auth::None => None,
        };

        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &token {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(body) => builder.multipart(body.into_form()?),
        };

        let resp = builder.send().await.map_err(|e| {
            debug!("{} {} failed: {}", request.method, request.path, e);
            ApiError::Network(e)
        })?;
        let status = resp.status();
        debug!("{} {} -> {}", request.method, request.path, status.as_u16());

        let result = Self::classify(resp, request.format).await;
        if let Err(ApiError::Auth { status, .. }) = &result {
            if token.is_some() {
                self.on_auth_rejected(*status)?;
            }
        }
        result
    }

    /// Map an HTTP response to a payload or a classified error.
    async fn classify(resp: reqwest::Response, format: ResponseFormat) -> Result<Value, ApiError> {
        let status = resp.status();
        let text = resp.text().await?;

        if status.is_success() {
            return match format {
                ResponseFormat::Text => Ok(Value::String(text)),
                ResponseFormat::Json if text.trim().is_empty() => Ok(Value::Null),
                ResponseFormat::Json => serde_json::from_str(&text)
                    .map_err(|e| ApiError::Decode(format!("response body: {}", e))),
            };
        }

        let code = status.as_u16();
        let body = ErrorBody::parse(&text);
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(ApiError::Auth { status: code, body })
        } else {
            Err(ApiError::Rejected { status: code, body })
        }
    }

    fn on_auth_rejected(&self, status: u16) -> Result<(), ApiError> {
        if self.policy != AuthPolicy::ClearAndRedirect
            || status != StatusCode::UNAUTHORIZED.as_u16()
        {
            return Ok(());
        }
        warn!("server rejected the stored token, clearing session");
        self.store.clear()?;
        self.navigator.navigate(&self.routes.login);
        Ok(())
    }
}
