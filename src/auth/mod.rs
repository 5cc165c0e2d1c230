//! Authentication and account management for SportsComp

mod session;
mod types;

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::ClientOptions;
use crate::error::{api_message, Error};
use crate::fetch::{parse_response, Fetch, FetchBuilder};

pub use session::*;
pub use types::*;

/// Client for SportsComp authentication and the signed-in account.
///
/// Also the home of the authenticated-request pipeline used by every other
/// part of the client, see [`Auth::send`].
pub struct Auth {
    /// The base URL for the SportsComp API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// The cached session
    sessions: Arc<SessionStore>,

    /// Client options
    options: ClientOptions,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(
        url: &str,
        client: Client,
        sessions: Arc<SessionStore>,
        options: ClientOptions,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            sessions,
            options,
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/api/auth{}", self.url, path)
    }

    /// Sign in with email, password and the role picked at sign-in.
    ///
    /// On success the returned session is persisted and subscribers are
    /// notified.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<Session, Error> {
        let url = self.auth_url("/login/");

        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("password".to_string(), password.to_string());
        body.insert("role".to_string(), role.as_str().to_string());

        let response = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(&body)?
            .execute_raw()
            .await?;

        let user = parse_response::<AuthUser>(response, "Login failed").await?;

        let session = Session::from(user);
        self.sessions.set(&session)?;

        Ok(session)
    }

    /// Register a new account.
    ///
    /// The API signs the account in right away; the returned session is
    /// persisted and subscribers are notified.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Session, Error> {
        let url = self.auth_url("/register/");

        let response = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(request)?
            .execute_raw()
            .await?;

        let user = parse_response::<AuthUser>(response, "Registration failed").await?;

        let session = Session::from(user);
        self.sessions.set(&session)?;

        Ok(session)
    }

    /// Sign out locally by dropping the cached session.
    ///
    /// The API has no sign-out endpoint; the tokens are simply discarded
    /// and expire server-side on their own.
    pub fn logout(&self) {
        self.sessions.clear();
    }

    /// The current session, or None when signed out
    pub fn session(&self) -> Option<Session> {
        self.sessions.session()
    }

    /// Whether a usable session is cached
    pub fn is_signed_in(&self) -> bool {
        self.sessions.session().is_some()
    }

    /// Subscribe to session changes, see [`SessionStore::on_change`]
    pub fn on_change(&self) -> broadcast::Receiver<()> {
        self.sessions.on_change()
    }

    /// Fetch the signed-in account's summary
    pub async fn me(&self) -> Result<AccountInfo, Error> {
        let url = self.auth_url("/me/");
        let request = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        self.request_json(&request, "Failed to load account").await
    }

    /// Fetch the signed-in account's full profile
    pub async fn profile(&self) -> Result<Profile, Error> {
        let url = self.auth_url("/profile/");
        let request = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        self.request_json(&request, "Failed to load profile").await
    }

    /// Update the signed-in account's profile.
    ///
    /// The cached session's display name and handle are refreshed from the
    /// saved profile, and subscribers are notified.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, Error> {
        let url = self.auth_url("/profile/");
        let request = Fetch::patch(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(update)?;

        let profile: Profile = self.request_json(&request, "Failed to save profile").await?;

        if let Some(mut session) = self.sessions.session() {
            session.display_name = profile.full_name.clone();
            session.handle = profile.handle.clone();
            self.sessions.set(&session)?;
        }

        Ok(profile)
    }

    /// Exchange the cached refresh token for a new access token.
    ///
    /// The session is cleared only when the API marks the refresh token
    /// itself as dead (a `token_not_valid` code in the failure body) or a
    /// success response carries no token. Any other failure, transport
    /// errors included, leaves the session in place so a flaky network or
    /// a server hiccup never signs the account out.
    pub async fn refresh_access_token(&self) -> Result<String, Error> {
        let session = self.sessions.session().ok_or(Error::NoSession)?;
        if session.refresh.is_empty() {
            return Err(Error::NoSession);
        }

        let url = self.auth_url("/token/refresh/");

        let mut body = HashMap::new();
        body.insert("refresh".to_string(), session.refresh.clone());

        let response = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(&body)?
            .execute_raw()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response
                .json::<serde_json::Value>()
                .await
                .unwrap_or(serde_json::Value::Null);

            if body.get("code").and_then(|code| code.as_str()) == Some("token_not_valid") {
                debug!("refresh token rejected, clearing session");
                self.sessions.clear();
            }

            return Err(Error::api(status, api_message(&body, "Token refresh failed")));
        }

        let refreshed = response.json::<RefreshResponse>().await?;
        match refreshed.access {
            Some(access) if !access.is_empty() => {
                let mut renewed = session;
                renewed.access = access.clone();
                self.sessions.set(&renewed)?;
                Ok(access)
            }
            _ => {
                self.sessions.clear();
                Err(Error::general("Token refresh returned no access token"))
            }
        }
    }

    /// Send `request` with the cached access token, refreshing it once on
    /// a 401.
    ///
    /// With no cached session this returns [`Error::NoSession`] without
    /// touching the network. A 401 response triggers one token refresh and
    /// one retry; if the retry is also a 401 the session is cleared and
    /// [`Error::NoSession`] is returned. Any other response, success or
    /// failure, is handed back to the caller as-is.
    pub async fn send(&self, request: &FetchBuilder<'_>) -> Result<reqwest::Response, Error> {
        let access = self.sessions.access_token().ok_or(Error::NoSession)?;

        let first = request.send_with_bearer(&access).await?;
        if first.status() != reqwest::StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        debug!("access token rejected, refreshing");
        let renewed = match self.refresh_access_token().await {
            Ok(token) => token,
            Err(err) => {
                debug!("token refresh failed: {}", err);
                return Err(Error::NoSession);
            }
        };

        let retry = request.send_with_bearer(&renewed).await?;
        if retry.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.sessions.clear();
            return Err(Error::NoSession);
        }

        Ok(retry)
    }

    /// Send an authenticated request and parse the success body as JSON
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        request: &FetchBuilder<'_>,
        fallback: &str,
    ) -> Result<T, Error> {
        let response = self.send(request).await?;
        parse_response(response, fallback).await
    }
}
