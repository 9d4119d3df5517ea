//! Outbound email relay.
//!
//! Two providers: `console` logs the message (development and offline mode)
//! and `webhook` POSTs it as JSON to a configured relay endpoint. Call sites
//! treat email as best-effort and swallow failures with a warning - a dead
//! relay must never block an order.

use crate::entities::{order, user};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid relay endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Email message handed to the relay.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    /// Who the message is about (shown as the sender name)
    pub from_name: String,
    /// Address replies should go to, when the customer left one
    pub reply_to: Option<String>,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
}

#[derive(Debug, Clone)]
enum Provider {
    Console,
    Webhook { url: String },
}

/// Email relay with a pluggable provider.
#[derive(Debug, Clone)]
pub struct EmailService {
    provider: Provider,
    client: reqwest::Client,
}

impl EmailService {
    /// A relay that only logs messages.
    #[must_use]
    pub fn console() -> Self {
        Self {
            provider: Provider::Console,
            client: reqwest::Client::new(),
        }
    }

    /// A relay that POSTs messages to a webhook endpoint.
    #[must_use]
    pub fn webhook(url: impl Into<String>) -> Self {
        Self {
            provider: Provider::Webhook { url: url.into() },
            client: reqwest::Client::new(),
        }
    }

    /// Picks the webhook provider when an endpoint is configured, the console
    /// provider otherwise.
    #[must_use]
    pub fn from_config(webhook_url: Option<String>) -> Self {
        webhook_url.map_or_else(Self::console, Self::webhook)
    }

    /// Sends one message through the configured provider.
    pub async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        match &self.provider {
            Provider::Console => {
                info!(
                    subject = %message.subject,
                    from = %message.from_name,
                    "email (console provider):\n{}",
                    message.body
                );
                Ok(())
            }
            Provider::Webhook { url } => {
                let response = self
                    .client
                    .post(url)
                    .json(message)
                    .send()
                    .await
                    .map_err(|e| EmailError::SendFailed(e.to_string()))?;
                if response.status().is_success() {
                    Ok(())
                } else {
                    Err(EmailError::SendFailed(format!(
                        "relay answered {}",
                        response.status()
                    )))
                }
            }
        }
    }

    /// Best-effort send: failures are logged and dropped.
    pub async fn send_silently(&self, message: &EmailMessage) {
        if let Err(e) = self.send(message).await {
            warn!(subject = %message.subject, error = %e, "email not sent");
        }
    }
}

/// Notification mail for a freshly placed order.
#[must_use]
pub fn order_email(order: &order::Model) -> EmailMessage {
    let items = order
        .items
        .0
        .iter()
        .map(|i| format!("- {} ({})", i.name, crate::core::currency::format_amount(i.unit_price)))
        .collect::<Vec<_>>()
        .join("\n");

    EmailMessage {
        from_name: order.name.clone(),
        reply_to: (!order.email.is_empty()).then(|| order.email.clone()),
        subject: "New order".to_string(),
        body: format!(
            "NEW ORDER\nCustomer: {}\nEmail: {}\nPhone: {}\nRef: {} ({})\n\nItems:\n{}\n\nTOTAL: {}",
            order.name,
            if order.email.is_empty() { "-" } else { &order.email },
            order.phone,
            order.payment_ref,
            order.method.as_str(),
            items,
            crate::core::currency::format_amount(order.amount),
        ),
    }
}

/// Notification mail for a new account registration.
#[must_use]
pub fn registration_email(user: &user::Model) -> EmailMessage {
    EmailMessage {
        from_name: user.name.clone(),
        reply_to: Some(user.email.clone()),
        subject: "New registration".to_string(),
        body: format!(
            "NEW REGISTRATION\nName: {}\nEmail: {}\nDate: {}",
            user.name,
            user.email,
            user.registered_at.format("%Y-%m-%d %H:%M"),
        ),
    }
}
