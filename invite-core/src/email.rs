//! RSVP notification email: the flat template payload and the EmailJS client
//! that delivers it.

use std::future::Future;

use serde::Serialize;

use crate::dietary::NONE_SPECIFIED;
use crate::error::{InviteError, InviteResult};
use crate::invitation::Invitation;
use crate::rsvp::RsvpSubmission;

pub const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

pub const ENV_PUBLIC_KEY: &str = "EMAILJS_PUBLIC_KEY";
pub const ENV_SERVICE_ID: &str = "EMAILJS_SERVICE_ID";
pub const ENV_TEMPLATE_ID: &str = "EMAILJS_TEMPLATE_ID";
pub const ENV_RECIPIENT: &str = "RSVP_RECIPIENT_EMAIL";

const NOT_APPLICABLE: &str = "N/A";
const NO_MESSAGE: &str = "No additional message";

/// Template parameters for one RSVP, minus the recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsvpEmail {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub attending: String,
    pub guest_count: String,
    pub dietary_requirements: String,
    pub message: String,
    pub event_name: String,
    pub event_date: String,
    pub event_time: String,
    pub event_location: String,
}

impl RsvpEmail {
    /// Build the payload for a submission that has already passed validation.
    pub fn build(invitation: &Invitation, submission: &RsvpSubmission) -> Self {
        let attending = submission.attendance.is_attending();

        let guest_count = match (attending, submission.guests) {
            (true, Some(n)) => n.to_string(),
            _ => NOT_APPLICABLE.to_string(),
        };

        let dietary_requirements = if attending {
            submission.dietary.summary(&invitation.dietary)
        } else {
            NONE_SPECIFIED.to_string()
        };

        RsvpEmail {
            from_name: submission.name.trim().to_string(),
            from_email: submission.email.trim().to_string(),
            subject: format!(
                "RSVP: {} - {} {}",
                submission.name.trim(),
                if attending { "Attending" } else { "Cannot Attend" },
                invitation.occasion
            ),
            attending: if attending { "YES ✅" } else { "NO ❌" }.to_string(),
            guest_count,
            dietary_requirements,
            message: submission
                .message_text()
                .unwrap_or(NO_MESSAGE)
                .to_string(),
            event_name: invitation.email_event_name.clone(),
            event_date: invitation.times.full_date().to_string(),
            event_time: invitation.times.time_range().to_string(),
            event_location: invitation.venue.name.clone(),
        }
    }
}

/// Delivers RSVP emails. `Ok` means the service acknowledged the send.
pub trait Mailer {
    fn send(&self, email: &RsvpEmail) -> impl Future<Output = InviteResult<()>> + Send;
}

impl<M: Mailer> Mailer for &M {
    fn send(&self, email: &RsvpEmail) -> impl Future<Output = InviteResult<()>> + Send {
        (**self).send(email)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailJsCredentials {
    pub public_key: String,
    pub service_id: String,
    pub template_id: String,
    pub recipient: String,
}

impl EmailJsCredentials {
    /// Read credentials from `EMAILJS_*` and `RSVP_RECIPIENT_EMAIL`.
    pub fn from_env() -> InviteResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> InviteResult<Self> {
        let mut missing = Vec::new();
        let mut read = |key: &'static str| match lookup(key).filter(|v| !v.trim().is_empty()) {
            Some(value) => value,
            None => {
                missing.push(key);
                String::new()
            }
        };

        let credentials = EmailJsCredentials {
            public_key: read(ENV_PUBLIC_KEY),
            service_id: read(ENV_SERVICE_ID),
            template_id: read(ENV_TEMPLATE_ID),
            recipient: read(ENV_RECIPIENT),
        };

        if !missing.is_empty() {
            return Err(InviteError::Config(format!(
                "EmailJS environment variables not configured: {}",
                missing.join(", ")
            )));
        }

        Ok(credentials)
    }

    pub fn is_complete(&self) -> bool {
        [
            &self.public_key,
            &self.service_id,
            &self.template_id,
            &self.recipient,
        ]
        .iter()
        .all(|v| !v.trim().is_empty())
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Serialize)]
struct TemplateParams<'a> {
    to_email: &'a str,
    #[serde(flatten)]
    email: &'a RsvpEmail,
}

/// Sends through the EmailJS REST API.
#[derive(Debug, Clone)]
pub struct EmailJsMailer {
    client: reqwest::Client,
    credentials: EmailJsCredentials,
    endpoint: String,
}

impl EmailJsMailer {
    pub fn new(credentials: EmailJsCredentials) -> Self {
        EmailJsMailer {
            client: reqwest::Client::new(),
            credentials,
            endpoint: EMAILJS_SEND_URL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The JSON body posted for `email`.
    pub fn request_body(&self, email: &RsvpEmail) -> InviteResult<serde_json::Value> {
        serde_json::to_value(self.request(email))
            .map_err(|e| InviteError::EmailDelivery(e.to_string()))
    }

    fn request<'a>(&'a self, email: &'a RsvpEmail) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.credentials.service_id,
            template_id: &self.credentials.template_id,
            user_id: &self.credentials.public_key,
            template_params: TemplateParams {
                to_email: &self.credentials.recipient,
                email,
            },
        }
    }

    #[tracing::instrument(skip_all, fields(subject = %email.subject))]
    async fn post(&self, email: &RsvpEmail) -> InviteResult<()> {
        if !self.credentials.is_complete() {
            return Err(InviteError::EmailDelivery(
                "EmailJS environment variables not configured".to_string(),
            ));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request(email))
            .send()
            .await
            .map_err(|e| InviteError::EmailDelivery(format!("EmailJS request failed: {}", e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "EmailJS rejected RSVP");
            return Err(InviteError::EmailDelivery(format!(
                "EmailJS API error ({}): {}",
                status, body
            )));
        }

        tracing::info!("RSVP email sent");
        Ok(())
    }
}

impl Mailer for EmailJsMailer {
    fn send(&self, email: &RsvpEmail) -> impl Future<Output = InviteResult<()>> + Send {
        self.post(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dietary::DietarySelection;
    use crate::invitation::tests::sample;
    use crate::rsvp::Attendance;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn credentials() -> EmailJsCredentials {
        EmailJsCredentials {
            public_key: "pk".to_string(),
            service_id: "svc".to_string(),
            template_id: "tpl".to_string(),
            recipient: "host@example.com".to_string(),
        }
    }

    #[test]
    fn test_attending_payload() {
        let invitation = sample();
        let submission = RsvpSubmission {
            name: " Ada Lovelace ".to_string(),
            email: "ada@example.com".to_string(),
            attendance: Attendance::Yes,
            guests: Some(3),
            dietary: DietarySelection::from_values(
                &invitation.dietary,
                ["gluten-free", "nut-allergy"],
            )
            .unwrap(),
            message: Some("Can't wait!".to_string()),
        };

        let email = RsvpEmail::build(&invitation, &submission);
        assert_eq!(
            email,
            RsvpEmail {
                from_name: "Ada Lovelace".to_string(),
                from_email: "ada@example.com".to_string(),
                subject: "RSVP: Ada Lovelace - Attending Birthday Party".to_string(),
                attending: "YES ✅".to_string(),
                guest_count: "3".to_string(),
                dietary_requirements: "🌾 Gluten-Free/Celiac, 🥜 Nut Allergy (tree nuts)"
                    .to_string(),
                message: "Can't wait!".to_string(),
                event_name: "Tiferet Nagarpowers' Birthday Party".to_string(),
                event_date: "Sunday, August 10th, 2025".to_string(),
                event_time: "3:00 PM - 4:30 PM".to_string(),
                event_location: "Cool Crafts of Long Island".to_string(),
            }
        );
    }

    #[test]
    fn test_declining_payload() {
        let invitation = sample();
        let submission = RsvpSubmission {
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            attendance: Attendance::No,
            guests: Some(4),
            dietary: DietarySelection::from_values(&invitation.dietary, ["other"]).unwrap(),
            message: Some("   ".to_string()),
        };

        let email = RsvpEmail::build(&invitation, &submission);
        assert_eq!(email.subject, "RSVP: Bob - Cannot Attend Birthday Party");
        assert_eq!(email.attending, "NO ❌");
        assert_eq!(email.guest_count, "N/A");
        assert_eq!(email.dietary_requirements, "None specified");
        assert_eq!(email.message, "No additional message");
    }

    #[test]
    fn test_request_body_shape() {
        let invitation = sample();
        let submission = RsvpSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        let email = RsvpEmail::build(&invitation, &submission);
        let body = EmailJsMailer::new(credentials()).request_body(&email).unwrap();

        assert_eq!(body["service_id"], "svc");
        assert_eq!(body["template_id"], "tpl");
        assert_eq!(body["user_id"], "pk");
        let params = &body["template_params"];
        assert_eq!(params["to_email"], "host@example.com");
        assert_eq!(params["guest_count"], "1");
        assert_eq!(params["dietary_requirements"], "None specified");
        assert_eq!(params["event_location"], "Cool Crafts of Long Island");
    }

    #[test]
    fn test_credentials_report_missing_vars() {
        let err = EmailJsCredentials::from_lookup(|key| match key {
            ENV_PUBLIC_KEY => Some("pk".to_string()),
            ENV_SERVICE_ID => Some("  ".to_string()),
            _ => None,
        })
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Configuration error: EmailJS environment variables not configured: EMAILJS_SERVICE_ID, EMAILJS_TEMPLATE_ID, RSVP_RECIPIENT_EMAIL"
        );
    }

    #[test]
    fn test_credentials_from_lookup() {
        let creds = EmailJsCredentials::from_lookup(|key| Some(format!("{}-value", key))).unwrap();
        assert!(creds.is_complete());
        assert_eq!(creds.recipient, "RSVP_RECIPIENT_EMAIL-value");
    }

    fn ada_email() -> RsvpEmail {
        let submission = RsvpSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        RsvpEmail::build(&sample(), &submission)
    }

    /// Answer one request with `status` and `body`. The handle yields the
    /// request body that was received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/v1.0/email/send", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let (head_end, content_length) = loop {
                let n = stream.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                    let len = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .map(|v| v.trim().parse::<usize>().unwrap())
                        .unwrap_or(0);
                    break (pos + 4, len);
                }
            };
            while buf.len() < head_end + content_length {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;

            String::from_utf8_lossy(&buf[head_end..]).into_owned()
        });

        (url, handle)
    }

    fn local_mailer(url: &str) -> EmailJsMailer {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        EmailJsMailer::new(credentials())
            .with_client(client)
            .with_endpoint(url)
    }

    #[tokio::test]
    async fn test_send_ok_on_200() {
        let (url, server) = serve_once("200 OK", "OK").await;
        let mailer = local_mailer(&url);
        let email = ada_email();

        mailer.send(&email).await.unwrap();

        let received: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(received, mailer.request_body(&email).unwrap());
        assert_eq!(received["template_params"]["from_name"], "Ada");
    }

    #[tokio::test]
    async fn test_send_error_carries_response_body() {
        let (url, server) = serve_once("400 Bad Request", "The template ID is invalid").await;

        let err = local_mailer(&url).send(&ada_email()).await.unwrap_err();
        server.await.unwrap();

        match err {
            InviteError::EmailDelivery(message) => {
                assert!(message.contains("400"), "{}", message);
                assert!(message.contains("The template ID is invalid"), "{}", message);
            }
            other => panic!("expected EmailDelivery, got {:?}", other),
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_send_logs_subject_not_address() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (url, server) = serve_once("200 OK", "OK").await;
        local_mailer(&url).send(&ada_email()).await.unwrap();
        server.await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("RSVP email sent"), "{}", output);
        assert!(output.contains("subject=RSVP: Ada - Attending"), "{}", output);
        assert!(!output.contains("ada@example.com"), "{}", output);
    }

    #[tokio::test]
    async fn test_send_requires_exactly_200() {
        let (url, server) = serve_once("202 Accepted", "").await;

        let err = local_mailer(&url).send(&ada_email()).await.unwrap_err();
        server.await.unwrap();
        assert!(matches!(err, InviteError::EmailDelivery(_)));
    }

    #[tokio::test]
    async fn test_incomplete_credentials_fail_at_send() {
        let invitation = sample();
        let submission = RsvpSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        let email = RsvpEmail::build(&invitation, &submission);

        let mailer = EmailJsMailer::new(EmailJsCredentials::default());
        let err = mailer.send(&email).await.unwrap_err();
        assert!(matches!(err, InviteError::EmailDelivery(_)));
    }
}
