//! Mail notifications
//!
//! Posts JSON messages to a hosted mail API. Disabled unless
//! `MAIL_API_URL` is configured; delivery runs on a spawned task and
//! failures are logged, never surfaced to the request that triggered
//! them.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::core::Config;

#[derive(Debug, Serialize)]
struct MailPayload {
    from: String,
    to: Vec<String>,
    subject: String,
    text: String,
}

#[derive(Debug, Clone)]
pub struct Mailer {
    inner: Arc<MailerInner>,
}

#[derive(Debug)]
struct MailerInner {
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
    from: String,
    admin_to: Vec<String>,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        let admin_to = config
            .mail_admin_to
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if config.mail_api_url.is_none() {
            tracing::info!("MAIL_API_URL not set, mail notifications disabled");
        }

        Self {
            inner: Arc::new(MailerInner {
                client,
                api_url: config.mail_api_url.clone(),
                api_key: config.mail_api_key.clone(),
                from: config.mail_from.clone(),
                admin_to,
            }),
        }
    }

    /// Notify the configured admin addresses that a report was submitted
    pub fn notify_submitted(&self, venue_name: &str, for_date: &str, submitted_by: &str) {
        let to = self.inner.admin_to.clone();
        let subject = format!("Report submitted: {} {}", venue_name, for_date);
        let text = format!(
            "The daily report for {} on {} was submitted by {} and is waiting for review.",
            venue_name, for_date, submitted_by
        );
        self.send_in_background(to, subject, text);
    }

    /// Notify the report creator that their report was approved
    pub fn notify_approved(&self, creator_address: &str, venue_name: &str, for_date: &str) {
        let to = vec![creator_address.to_string()];
        let subject = format!("Report approved: {} {}", venue_name, for_date);
        let text = format!(
            "The daily report for {} on {} was approved.",
            venue_name, for_date
        );
        self.send_in_background(to, subject, text);
    }

    fn send_in_background(&self, to: Vec<String>, subject: String, text: String) {
        let Some(api_url) = self.inner.api_url.clone() else {
            tracing::debug!(subject = %subject, "mail disabled, skipping notification");
            return;
        };
        if to.is_empty() {
            tracing::debug!(subject = %subject, "no recipients configured, skipping notification");
            return;
        }

        let inner = self.inner.clone();
        tokio::spawn(async move {
            let payload = MailPayload {
                from: inner.from.clone(),
                to,
                subject: subject.clone(),
                text,
            };

            let mut request = inner.client.post(&api_url).json(&payload);
            if let Some(key) = &inner.api_key {
                request = request.bearer_auth(key);
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::info!(subject = %subject, "mail notification sent");
                }
                Ok(response) => {
                    tracing::warn!(
                        subject = %subject,
                        status = %response.status(),
                        "mail API rejected notification"
                    );
                }
                Err(e) => {
                    tracing::warn!(subject = %subject, error = %e, "mail notification failed");
                }
            }
        });
    }
}
