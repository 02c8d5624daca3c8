//! Hosted backend client: password auth plus the per-user completion record.
//!
//! # Design
//! - One client per app boot, shared behind `Rc`; the active session lives inside it.
//! - Every call returns [`BackendError`] carrying the backend's own message.
//! - Auth changes are broadcast to subscribers, mirroring the backend SDK's
//!   auth-state-change hook.
//! - A record call rejected for an expired token refreshes the session and is retried
//!   once; a failed refresh keeps the original error.

use crate::core::completion::CompletionMap;
use crate::core::completion_store::CompletionRecords;
use crate::core::config::AppConfig;
use crate::core::error::BackendError;
use crate::core::session::SessionUser;
use async_trait::async_trait;
use gloo::storage::{LocalStorage, Storage};
use gloo_net::http::{Request, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use yew::Callback;

/// Local storage key for the persisted backend session.
pub(crate) const SESSION_KEY: &str = "anecdote.auth.session";

/// Session tokens returned by the password grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
    refresh_token: String,
    user: SessionUser,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    user: SessionUser,
}

#[derive(Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user: Option<SessionUser>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RecordRow<'a> {
    user_id: &'a str,
    tasks: &'a CompletionMap,
}

#[derive(Deserialize)]
struct TasksRow {
    tasks: Value,
}

/// REST client for the hosted auth and record APIs.
pub(crate) struct BackendClient {
    base_url: String,
    anon_key: String,
    table: String,
    session: RefCell<Option<StoredSession>>,
    listeners: RefCell<Vec<Callback<Option<SessionUser>>>>,
}

impl BackendClient {
    pub(crate) fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.backend_base().to_string(),
            anon_key: config.backend_anon_key.clone(),
            table: config.records_table.clone(),
            session: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Register an auth-state listener.
    pub(crate) fn on_auth_change(&self, callback: Callback<Option<SessionUser>>) {
        self.listeners.borrow_mut().push(callback);
    }

    /// User of the active session.
    pub(crate) fn current_user(&self) -> Option<SessionUser> {
        self.session.borrow().as_ref().map(|s| s.user.clone())
    }

    /// Restore a persisted session, verifying it (and refreshing once) with the backend.
    pub(crate) async fn restore_session(&self) -> Option<SessionUser> {
        let stored = LocalStorage::get::<StoredSession>(SESSION_KEY).ok()?;
        match self.fetch_user(&stored.access_token).await {
            Ok(user) => {
                self.install(Some(StoredSession { user, ..stored }));
            }
            Err(err) => {
                tracing::debug!(error = %err, "stored session rejected; trying refresh");
                match self.refresh(&stored.refresh_token).await {
                    Ok(session) => self.install(Some(session)),
                    Err(err) => {
                        tracing::warn!(error = %err, "session refresh failed");
                        self.install(None);
                    }
                }
            }
        }
        self.current_user()
    }

    /// Create an account. Returns the new user when the backend reports one.
    pub(crate) async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionUser>, BackendError> {
        let response = self
            .anon_request(Request::post(&self.auth_url("signup")))
            .json(&Credentials { email, password })
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        let body: SignUpResponse = read_json(response).await?;
        Ok(body.user.or_else(|| {
            body.id.map(|id| SessionUser {
                id,
                email: body.email,
            })
        }))
    }

    /// Sign in with email and password; on success the session becomes active.
    pub(crate) async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionUser>, BackendError> {
        let response = self
            .anon_request(Request::post(&self.auth_url("token?grant_type=password")))
            .json(&Credentials { email, password })
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        let token: TokenResponse = read_json(response).await?;
        self.install(Some(StoredSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: token.user,
        }));
        Ok(self.current_user())
    }

    /// End the active session.
    pub(crate) async fn sign_out(&self) -> Result<(), BackendError> {
        let token = self.access_token();
        if let Some(token) = token {
            let response = self
                .anon_request(Request::post(&self.auth_url("logout")))
                .header("Authorization", &format!("Bearer {token}"))
                .send()
                .await
                .map_err(transport)?;
            ensure_ok(response).await?;
        }
        self.install(None);
        Ok(())
    }

    async fn fetch_user(&self, access_token: &str) -> Result<SessionUser, BackendError> {
        let response = self
            .anon_request(Request::get(&self.auth_url("user")))
            .header("Authorization", &format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<StoredSession, BackendError> {
        #[derive(Serialize)]
        struct Body<'a> {
            refresh_token: &'a str,
        }
        let response = self
            .anon_request(Request::post(&self.auth_url("token?grant_type=refresh_token")))
            .json(&Body { refresh_token })
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        let token: TokenResponse = read_json(response).await?;
        Ok(StoredSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: token.user,
        })
    }

    /// Exchange the active refresh token for a new session. Returns whether a new
    /// session was installed.
    async fn refresh_active_session(&self) -> bool {
        let Some(refresh_token) = self
            .session
            .borrow()
            .as_ref()
            .map(|s| s.refresh_token.clone())
        else {
            return false;
        };
        match self.refresh(&refresh_token).await {
            Ok(session) => {
                tracing::debug!("access token refreshed");
                self.install(Some(session));
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "access token refresh failed");
                false
            }
        }
    }

    async fn select_once(&self, user_id: &str) -> Result<CompletionMap, BackendError> {
        let query = format!("select=tasks&user_id=eq.{}", urlencoding::encode(user_id));
        let response = self
            .authed_request(Request::get(&self.records_url(&query)))
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await
            .map_err(transport)?;
        let row: TasksRow = read_json(response).await?;
        Ok(CompletionMap::from_json_value(&row.tasks).unwrap_or_default())
    }

    async fn upsert_once(&self, user_id: &str, tasks: &CompletionMap) -> Result<(), BackendError> {
        let response = self
            .authed_request(Request::post(&self.records_url("on_conflict=user_id")))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[RecordRow { user_id, tasks }])
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        ensure_ok(response).await
    }

    fn install(&self, session: Option<StoredSession>) {
        match &session {
            Some(value) => {
                if let Err(err) = LocalStorage::set(SESSION_KEY, value) {
                    gloo::console::error!(
                        "storage operation failed",
                        "set",
                        SESSION_KEY,
                        err.to_string()
                    );
                }
            }
            None => LocalStorage::delete(SESSION_KEY),
        }
        let user = session.as_ref().map(|s| s.user.clone());
        *self.session.borrow_mut() = session;
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener.emit(user.clone());
        }
    }

    fn access_token(&self) -> Option<String> {
        self.session.borrow().as_ref().map(|s| s.access_token.clone())
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn records_url(&self, query: &str) -> String {
        format!("{}/rest/v1/{}?{query}", self.base_url, self.table)
    }

    fn anon_request(&self, request: Request) -> Request {
        request.header("apikey", &self.anon_key)
    }

    fn authed_request(&self, request: Request) -> Request {
        let bearer = self.access_token().unwrap_or_else(|| self.anon_key.clone());
        self.anon_request(request)
            .header("Authorization", &format!("Bearer {bearer}"))
    }
}

#[async_trait(?Send)]
impl CompletionRecords for Rc<BackendClient> {
    async fn select(&self, user_id: &str) -> Result<CompletionMap, BackendError> {
        match self.select_once(user_id).await {
            Err(err) if err.is_expired_session() && self.refresh_active_session().await => {
                self.select_once(user_id).await
            }
            result => result,
        }
    }

    async fn upsert(&self, user_id: &str, tasks: &CompletionMap) -> Result<(), BackendError> {
        match self.upsert_once(user_id, tasks).await {
            Err(err) if err.is_expired_session() && self.refresh_active_session().await => {
                self.upsert_once(user_id, tasks).await
            }
            result => result,
        }
    }
}

fn transport(err: gloo_net::Error) -> BackendError {
    BackendError::message(err.to_string())
}

async fn read_json<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, BackendError> {
    let response = ensure_success(response).await?;
    response.json::<T>().await.map_err(transport)
}

async fn ensure_ok(response: Response) -> Result<(), BackendError> {
    ensure_success(response).await.map(|_| ())
}

async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(parse_error_body(status, &body))
}

/// Pull a message (and code) out of the backend's various error shapes.
fn parse_error_body(status: u16, body: &str) -> BackendError {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
    let message = field("msg")
        .or_else(|| field("error_description"))
        .or_else(|| field("message"))
        .or_else(|| field("error"))
        .unwrap_or_else(|| format!("HTTP {status}"));
    let code = field("code")
        .or_else(|| field("error_code"))
        .or_else(|| Some(status.to_string()));
    BackendError { code, message }
}
