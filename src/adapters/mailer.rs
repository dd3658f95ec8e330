use crate::adapters::http::{build_client, ensure_success, join_url};
use crate::domain::model::OutgoingEmail;
use crate::domain::ports::Mailer;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailReply {
    id: String,
}

/// Transactional email over the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: Client,
    api_base: String,
    api_key: String,
    sender: String,
}

impl ResendMailer {
    pub fn new(api_base: &str, api_key: &str, sender: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            api_base: api_base.to_string(),
            api_key: api_key.to_string(),
            sender: sender.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String> {
        tracing::debug!("📧 Sending '{}' to {}", email.subject, email.to);
        let body = SendEmailBody {
            from: &self.sender,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };
        let response = self
            .client
            .post(join_url(&self.api_base, "emails"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let reply: SendEmailReply = ensure_success("email", response).await?.json().await?;
        Ok(reply.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_send_posts_json_and_returns_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("authorization", "Bearer re_key")
                .json_body(json!({
                    "from": "Bikawo <contact@bikawo.com>",
                    "to": ["nadia@example.fr"],
                    "subject": "Bienvenue",
                    "html": "<p>Bonjour</p>"
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"id": "email-123"}));
        });

        let mailer =
            ResendMailer::new(&server.base_url(), "re_key", "Bikawo <contact@bikawo.com>").unwrap();
        let id = mailer
            .send(&OutgoingEmail {
                to: "nadia@example.fr".to_string(),
                subject: "Bienvenue".to_string(),
                html: "<p>Bonjour</p>".to_string(),
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(id, "email-123");
    }

    #[tokio::test]
    async fn test_send_failure_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/emails");
            then.status(422).body("invalid recipient");
        });

        let mailer = ResendMailer::new(&server.base_url(), "re_key", "contact@bikawo.com").unwrap();
        let result = mailer
            .send(&OutgoingEmail {
                to: "x@y.z".to_string(),
                subject: "s".to_string(),
                html: "h".to_string(),
            })
            .await;

        assert!(result.is_err());
    }
}
