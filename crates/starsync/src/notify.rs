//! Delivery of the run report.
//!
//! Notification is best-effort: a sink never returns an error to the engine
//! and logs its own failures.

use async_trait::async_trait;
use thiserror::Error;

#[cfg(feature = "wechat")]
mod wechat;

#[cfg(feature = "wechat")]
pub use wechat::{WeChatNotifier, WeChatParams};

/// Receives the formatted report at the end of a run.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, message: &str);
}

/// Sink used when no notification channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl NotificationSink for NoOpNotifier {
    async fn send(&self, _message: &str) {}
}

/// Invalid notification settings, detected at construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifyConfigError {
    #[error(
        "notification-wechat-params must be corpid,corpsecret,touser,agentid (got {found} fields)"
    )]
    WeChatParams { found: usize },
}
