// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug,
          time::{Duration, Instant}};

use fsh_tui::{OutputSink, ShellError};
use futures_util::{FutureExt, future::BoxFuture};
use serde::Deserialize;

/// A username and password (or token) for a remote.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Obtains credentials interactively, writing instructions for the user to `sink`.
/// Resolves to `None` when the user didn't authorize in time or the flow failed.
pub trait DeviceFlowPoller: Debug + Send + Sync {
    fn poll(&self, sink: OutputSink) -> BoxFuture<'_, Option<Credentials>>;
}

pub const GITHUB_CLIENT_ID: &str = "175231928f47d8d36b2d";
pub const GITHUB_DEVICE_CODE_URL: &str = "https://github.com/login/device/code";
pub const GITHUB_ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const GITHUB_USER_URL: &str = "https://api.github.com/user";
pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const SLOW_DOWN_INCREMENT: Duration = Duration::from_secs(5);
pub const OAUTH_FALLBACK_USERNAME: &str = "oauth2";

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_uri: String,
    interval: Option<u64>,
    expires_in: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: Option<String>,
}

/// What to do after one poll of the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    Authorized(String),
    Wait(Duration),
    Expired,
    Failed(String),
}

/// Classify a token endpoint response, given the current poll interval.
#[must_use]
pub fn next_poll_step(response: &TokenResponse, interval: Duration) -> PollStep {
    if let Some(token) = &response.access_token {
        return PollStep::Authorized(token.clone());
    }
    match response.error.as_deref() {
        None | Some("authorization_pending") => PollStep::Wait(interval),
        Some("slow_down") => PollStep::Wait(interval + SLOW_DOWN_INCREMENT),
        Some("expired_token") => PollStep::Expired,
        Some(error) => PollStep::Failed(
            response
                .error_description
                .clone()
                .unwrap_or_else(|| error.to_string()),
        ),
    }
}

/// GitHub's OAuth device authorization flow. Prints a verification URL and a user
/// code, then polls until the user authorizes the app.
#[derive(Debug, Clone)]
pub struct GitHubDeviceFlow {
    client: reqwest::Client,
    client_id: String,
}

impl Default for GitHubDeviceFlow {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: GITHUB_CLIENT_ID.to_string(),
        }
    }
}

impl GitHubDeviceFlow {
    async fn try_poll(&self, sink: &OutputSink) -> Result<Option<Credentials>, ShellError> {
        let device_code: DeviceCodeResponse = self
            .client
            .post(GITHUB_DEVICE_CODE_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&serde_json::json!({
                "client_id": self.client_id,
                "scope": "repo,read:user",
            }))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| {
                ShellError::external(format!("Failed to initiate device flow: {error}"))
            })?
            .json()
            .await
            .map_err(|error| ShellError::external(error.to_string()))?;

        sink.write_str(&format!(
            "\r\nPlease visit {} and enter code: {}",
            device_code.verification_uri, device_code.user_code
        ));
        sink.write_str(&format!(
            "\r\nWaiting for authentication... (expires in {}s)",
            device_code.expires_in
        ));

        let start = Instant::now();
        let expires_in = Duration::from_secs(device_code.expires_in);
        let mut interval = Duration::from_secs(
            device_code.interval.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        );

        while start.elapsed() < expires_in {
            tokio::time::sleep(interval).await;

            let token_response: TokenResponse = self
                .client
                .post(GITHUB_ACCESS_TOKEN_URL)
                .header(reqwest::header::ACCEPT, "application/json")
                .json(&serde_json::json!({
                    "client_id": self.client_id,
                    "device_code": device_code.device_code,
                    "grant_type": DEVICE_CODE_GRANT_TYPE,
                }))
                .send()
                .await
                .map_err(|error| ShellError::external(error.to_string()))?
                .json()
                .await
                .map_err(|error| ShellError::external(error.to_string()))?;

            match next_poll_step(&token_response, interval) {
                PollStep::Authorized(token) => {
                    sink.write_str("\r\nSuccessfully authenticated!");
                    let username = self.fetch_login(&token).await;
                    if let Some(login) = &username {
                        sink.write_str(&format!("\r\nLogged in as {login}"));
                    }
                    return Ok(Some(Credentials {
                        username: username
                            .unwrap_or_else(|| OAUTH_FALLBACK_USERNAME.to_string()),
                        password: token,
                    }));
                }
                PollStep::Wait(next_interval) => interval = next_interval,
                PollStep::Expired => {
                    sink.write_str("\r\nToken expired. Please try again.");
                    return Ok(None);
                }
                PollStep::Failed(message) => return Err(ShellError::external(message)),
            }
        }

        Ok(None)
    }

    async fn fetch_login(&self, token: &str) -> Option<String> {
        let response = self
            .client
            .get(GITHUB_USER_URL)
            .header(reqwest::header::AUTHORIZATION, format!("token {token}"))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, "fsh")
            .send()
            .await
            .ok()?;
        let user: UserResponse = response.json().await.ok()?;
        user.login
    }
}

impl DeviceFlowPoller for GitHubDeviceFlow {
    fn poll(&self, sink: OutputSink) -> BoxFuture<'_, Option<Credentials>> {
        async move {
            match self.try_poll(&sink).await {
                Ok(it) => it,
                Err(error) => {
                    // % is Display, ? is Debug.
                    tracing::warn!(message = "device flow failed", %error);
                    sink.write_str(&format!("\r\nGitHub Auth Error: {error}"));
                    None
                }
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn response(access_token: Option<&str>, error: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: access_token.map(Into::into),
            error: error.map(Into::into),
            error_description: None,
        }
    }

    #[test]
    fn test_next_poll_step() {
        let interval = Duration::from_secs(5);
        assert_eq!(
            next_poll_step(&response(Some("gho_x"), None), interval),
            PollStep::Authorized("gho_x".into())
        );
        assert_eq!(
            next_poll_step(&response(None, Some("authorization_pending")), interval),
            PollStep::Wait(interval)
        );
        assert_eq!(
            next_poll_step(&response(None, Some("slow_down")), interval),
            PollStep::Wait(Duration::from_secs(10))
        );
        assert_eq!(
            next_poll_step(&response(None, Some("expired_token")), interval),
            PollStep::Expired
        );
        assert_eq!(
            next_poll_step(&response(None, Some("access_denied")), interval),
            PollStep::Failed("access_denied".into())
        );
    }

    #[test]
    fn test_token_response_parses_error_description() {
        let it: TokenResponse = serde_json::from_str(
            r#"{"error":"incorrect_client_credentials","error_description":"The client_id is invalid."}"#,
        )
        .unwrap();
        assert_eq!(
            next_poll_step(&it, Duration::from_secs(5)),
            PollStep::Failed("The client_id is invalid.".into())
        );
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let it = Credentials {
            username: "ada".into(),
            password: "secret".into(),
        };
        assert!(!format!("{it:?}").contains("secret"));
    }
}
