use crate::error::NotifyError;
use crate::format::Formatter;
use crate::surveys::Survey;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use shared::ButtondownConfig;
use shared::buttondown::DraftEmail;
use shared::error::InitializationError;
use std::time::Duration;
use tracing::{error, info, warn};

/// What became of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Drafted { subject: String },
    /// No credential configured; surveys were printed instead.
    ConsoleOnly,
    Failed,
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Drafted { .. })
    }
}

pub trait Notify {
    /// Never fails the run: every error is logged and reported as an outcome.
    async fn notify(&self, surveys: &[Survey]) -> Delivery;
}

pub struct ButtondownNotifier {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    formatter: Formatter,
}

impl ButtondownNotifier {
    pub fn new(
        config: &ButtondownConfig,
        formatter: Formatter,
    ) -> Result<Self, InitializationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key().map(str::to_string),
            formatter,
        })
    }

    pub fn draft(&self, surveys: &[Survey]) -> DraftEmail {
        DraftEmail::new(
            self.formatter.subject(surveys.len()),
            self.formatter.body(surveys),
        )
    }

    async fn post_draft(&self, api_key: &str, email: &DraftEmail) -> Result<(), NotifyError> {
        self.client
            .post(&self.url)
            .header(AUTHORIZATION, format!("Token {api_key}"))
            .header(CONTENT_TYPE, "application/json")
            .json(email)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

impl Notify for ButtondownNotifier {
    async fn notify(&self, surveys: &[Survey]) -> Delivery {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!(
                env = shared::API_KEY_ENV_VAR,
                "no Buttondown API key configured, printing new surveys instead of drafting an email"
            );
            print!("{}", self.formatter.console_report(surveys));
            return Delivery::ConsoleOnly;
        };

        let email = self.draft(surveys);
        match self.post_draft(api_key, &email).await {
            Ok(()) => {
                info!(subject = %email.subject, "created newsletter draft");
                Delivery::Drafted {
                    subject: email.subject,
                }
            }
            Err(e) => {
                error!(error = ?e, "failed to create newsletter draft");
                Delivery::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NameTables;
    use crate::test_server::serve_once;
    use shared::EmailConfig;
    use shared::buttondown::EmailStatus;
    use std::collections::BTreeMap;

    fn notifier(api_key: Option<&str>, url: &str) -> ButtondownNotifier {
        let config = ButtondownConfig {
            url: url.to_string(),
            timeout_secs: 5,
            api_key: api_key.map(str::to_string),
        };
        ButtondownNotifier::new(
            &config,
            Formatter::new(NameTables::default(), &EmailConfig::default()),
        )
        .unwrap()
    }

    fn surveys(n: usize) -> Vec<Survey> {
        (0..n)
            .map(|i| Survey {
                id: format!("{}", 200 + i),
                date: "2025-02-01".to_string(),
                institute_id: 999,
                results: BTreeMap::from([("1".to_string(), 30.0)]),
            })
            .collect()
    }

    #[tokio::test]
    async fn without_credential_falls_back_to_console() {
        // Unroutable URL: a network attempt would fail, not hang.
        let n = notifier(None, "http://127.0.0.1:9/v1/emails");
        let delivery = n.notify(&surveys(2)).await;
        assert_eq!(delivery, Delivery::ConsoleOnly);
        assert!(!delivery.is_sent());
    }

    #[tokio::test]
    async fn blank_credential_is_treated_as_absent() {
        let n = notifier(Some(""), "http://127.0.0.1:9/v1/emails");
        assert_eq!(n.notify(&surveys(1)).await, Delivery::ConsoleOnly);
    }

    #[tokio::test]
    async fn transport_error_is_reported_not_raised() {
        let n = notifier(Some("token"), "http://127.0.0.1:9/v1/emails");
        let delivery = n.notify(&surveys(1)).await;
        assert_eq!(delivery, Delivery::Failed);
        assert!(!delivery.is_sent());
    }

    #[tokio::test]
    async fn posts_draft_with_token_auth() {
        let (url, server) = serve_once(201, r#"{"id": "abc"}"#).await;
        let n = notifier(Some("secret-token"), &format!("{url}v1/emails"));
        let new = surveys(2);

        let delivery = n.notify(&new).await;
        let request = server.await.unwrap();

        assert_eq!(
            delivery,
            Delivery::Drafted {
                subject: "📊 2 neue Wahlumfragen".to_string()
            }
        );
        assert!(delivery.is_sent());
        assert_eq!(request.request_line, "POST /v1/emails HTTP/1.1");
        assert_eq!(request.header("authorization"), Some("Token secret-token"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        let expected = n.draft(&new);
        assert_eq!(
            request.json(),
            serde_json::json!({
                "subject": expected.subject,
                "body": expected.body,
                "status": "draft"
            })
        );
    }

    #[tokio::test]
    async fn error_status_is_reported_as_failed() {
        let (url, server) = serve_once(500, r#"{"detail": "boom"}"#).await;
        let n = notifier(Some("secret-token"), &url);

        let delivery = n.notify(&surveys(1)).await;
        server.await.unwrap();

        assert_eq!(delivery, Delivery::Failed);
    }

    #[test]
    fn draft_payload() {
        let n = notifier(Some("token"), "http://127.0.0.1:9/v1/emails");
        let email = n.draft(&surveys(2));
        assert_eq!(email.subject, "📊 2 neue Wahlumfragen");
        assert_eq!(email.status, EmailStatus::Draft);
        assert!(email.body.contains("**Institut 999** (2025-02-01)"));
    }
}
