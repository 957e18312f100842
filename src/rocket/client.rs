use crate::config::{Credentials, DispatcherConfig};
use crate::dispatch::DeliverySink;
use crate::error::{RelayError, Result};
use crate::event::Attachment;
use crate::rocket::types::{LoginRequest, LoginResponse, PostMessageResponse};
use crate::rocket::url::{api_url, parse_server_url};
use crate::rocket::{AuthSession, MessageHeader, PostMessage};
use futures::future::BoxFuture;
use reqwest::Url;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RocketClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    session: Option<AuthSession>,
}

impl RocketClient {
    pub fn new(server_url: &str, credentials: Credentials) -> Result<Self> {
        let base_url = parse_server_url(server_url)?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RelayError::Connection(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            credentials,
            session: None,
        })
    }

    pub fn from_config(config: &DispatcherConfig) -> Result<Self> {
        Self::new(&config.server_url, config.credentials.clone())
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    /// Establish a session. Token credentials are used as-is; email and
    /// password are exchanged for a token.
    pub async fn login(&mut self) -> Result<AuthSession> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }

        let session = match &self.credentials {
            Credentials::Token { user_id, token } => AuthSession {
                user_id: user_id.clone(),
                token: token.clone(),
            },
            Credentials::Password { email, password } => {
                self.login_with_password(email, password).await?
            }
        };

        tracing::info!(
            server = %self.base_url,
            user_id = %session.user_id,
            "Rocket.Chat session established"
        );

        self.session = Some(session.clone());
        Ok(session)
    }

    async fn login_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let url = api_url(&self.base_url, "login")?;
        tracing::debug!(url = %url, "Logging in to Rocket.Chat");

        let response = self
            .http
            .post(url)
            .json(&LoginRequest {
                user: email,
                password,
            })
            .send()
            .await
            .map_err(|e| RelayError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Connection(e.to_string()))?;

        let parsed: LoginResponse = serde_json::from_str(&body).map_err(|e| {
            RelayError::Connection(format!("Unexpected login response ({}): {}", status, e))
        })?;

        match parsed.data {
            Some(data) if status.is_success() && parsed.status == "success" => Ok(AuthSession {
                user_id: data.user_id,
                token: data.auth_token,
            }),
            _ => Err(RelayError::Connection(format!(
                "Login failed ({}): {}",
                status,
                parsed.message.unwrap_or(parsed.status)
            ))),
        }
    }

    /// Post one message to the configured channel
    pub async fn post_message(&self, message: &PostMessage) -> Result<()> {
        let session = self.session.as_ref().ok_or(RelayError::NotRunning)?;
        let url = api_url(&self.base_url, "chat.postMessage")?;

        let response = self
            .http
            .post(url)
            .header("X-User-Id", &session.user_id)
            .header("X-Auth-Token", &session.token)
            .json(message)
            .send()
            .await
            .map_err(|e| RelayError::Delivery(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Delivery(e.to_string()))?;

        if !status.is_success() {
            return Err(RelayError::Delivery(format!(
                "chat.postMessage returned {}: {}",
                status, body
            )));
        }

        let parsed: PostMessageResponse = serde_json::from_str(&body).map_err(|e| {
            RelayError::Delivery(format!("Unexpected chat.postMessage response: {}", e))
        })?;
        if !parsed.success {
            return Err(RelayError::Delivery(
                parsed
                    .error
                    .unwrap_or_else(|| "chat.postMessage rejected the message".to_string()),
            ));
        }

        Ok(())
    }
}

impl DeliverySink for RocketClient {
    fn connect(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move { self.login().await.map(|_| ()) })
    }

    fn post_batch<'a>(
        &'a self,
        header: &'a MessageHeader,
        attachments: &'a [Attachment],
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move { self.post_message(&header.to_message(attachments)).await })
    }
}
