use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::http::{HttpError, HttpMethod, HttpRequest, HttpTransport};

use super::{NotificationSink, NotifyConfigError};

const DEFAULT_BASE_URL: &str = "https://qyapi.weixin.qq.com";

/// Credentials and recipient for a WeChat Work application message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeChatParams {
    pub corp_id: String,
    pub corp_secret: String,
    pub to_user: String,
    pub agent_id: String,
}

impl WeChatParams {
    /// Parse `corpid,corpsecret,touser,agentid`.
    ///
    /// Fields beyond the fourth are ignored.
    pub fn parse(params: &str) -> Result<Self, NotifyConfigError> {
        let fields: Vec<&str> = params.split(',').map(str::trim).collect();

        match fields.as_slice() {
            [corp_id, corp_secret, to_user, agent_id, ..] => Ok(Self {
                corp_id: corp_id.to_string(),
                corp_secret: corp_secret.to_string(),
                to_user: to_user.to_string(),
                agent_id: agent_id.to_string(),
            }),
            _ => Err(NotifyConfigError::WeChatParams {
                found: fields.len(),
            }),
        }
    }
}

#[derive(Debug, Error)]
enum WeChatError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("errcode {errcode}: {errmsg}")]
    Api { errcode: i64, errmsg: String },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
    #[serde(default)]
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// Sends the report as a WeChat Work text message.
pub struct WeChatNotifier {
    transport: Arc<dyn HttpTransport>,
    params: WeChatParams,
    base_url: String,
}

impl WeChatNotifier {
    pub fn new(params: WeChatParams, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            params,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Build a notifier from the comma-separated parameter string.
    pub fn from_params(
        params: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, NotifyConfigError> {
        Ok(Self::new(WeChatParams::parse(params)?, transport))
    }

    /// Override the API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn access_token(&self) -> Result<String, WeChatError> {
        let url = Url::parse_with_params(
            &format!("{}/cgi-bin/gettoken", self.base_url),
            &[
                ("corpid", self.params.corp_id.as_str()),
                ("corpsecret", self.params.corp_secret.as_str()),
            ],
        )?;

        let response = self
            .transport
            .send(HttpRequest::new(HttpMethod::Get, url.as_str()))
            .await?;
        if !response.is_success() {
            return Err(WeChatError::Status(response.status));
        }

        let body: TokenResponse = response.json()?;
        if body.errcode != 0 {
            return Err(WeChatError::Api {
                errcode: body.errcode,
                errmsg: body.errmsg,
            });
        }

        Ok(body.access_token)
    }

    async fn try_send(&self, message: &str) -> Result<(), WeChatError> {
        let token = self.access_token().await?;
        let url = Url::parse_with_params(
            &format!("{}/cgi-bin/message/send", self.base_url),
            &[("access_token", token.as_str())],
        )?;

        let payload = json!({
            "touser": self.params.to_user,
            "msgtype": "text",
            "agentid": self.params.agent_id,
            "text": { "content": message },
            "safe": "0",
        });

        let response = self
            .transport
            .send(HttpRequest::new(HttpMethod::Post, url.as_str()).json(&payload))
            .await?;
        if !response.is_success() {
            return Err(WeChatError::Status(response.status));
        }

        let body: SendResponse = response.json()?;
        if body.errcode != 0 {
            return Err(WeChatError::Api {
                errcode: body.errcode,
                errmsg: body.errmsg,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl NotificationSink for WeChatNotifier {
    async fn send(&self, message: &str) {
        match self.try_send(message).await {
            Ok(()) => tracing::info!(to_user = %self.params.to_user, "Sent WeChat notification"),
            Err(e) => tracing::error!(error = %e, "Failed to send WeChat notification"),
        }
    }
}
