use crate::config::{EmailConfig, ConfigError};
use crate::model::quote::Quote;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Email service errors
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SMTP error: {0}")]
    SmtpError(String),

    #[error("Message building error: {0}")]
    MessageError(String),

    #[error("Address error: {0}")]
    AddressError(String),
}

impl From<ConfigError> for EmailError {
    fn from(err: ConfigError) -> Self {
        EmailError::ConfigError(err.to_string())
    }
}

/// Where a confirmation for a quote should go: the submitter's email when
/// given, otherwise their phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Email(String),
    Phone(String),
}

impl Recipient {
    pub fn for_quote(quote: &Quote) -> Self {
        match quote.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => Recipient::Email(email.to_string()),
            _ => Recipient::Phone(quote.phone.clone()),
        }
    }
}

/// Best-effort confirmation sent after a quote is stored.
#[async_trait]
pub trait QuoteNotifier: Send + Sync {
    async fn send_quote_confirmation(&self, quote: &Quote) -> Result<(), EmailError>;
}

/// Email message builder
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
}

impl EmailMessage {
    pub fn new(to: String, subject: String) -> Self {
        Self {
            to,
            subject,
            text_body: None,
            html_body: None,
        }
    }

    pub fn with_text_body(mut self, body: String) -> Self {
        self.text_body = Some(body);
        self
    }

    pub fn with_html_body(mut self, body: String) -> Self {
        self.html_body = Some(body);
        self
    }
}

pub fn confirmation_subject(quote_number: &str) -> String {
    format!("Nefes Depo - Teklif Talebiniz Alındı ({})", quote_number)
}

pub fn confirmation_text(name: &str, quote_number: &str) -> String {
    format!(
        r#"Merhaba {name},

Teklif talebiniz bize ulaştı.

Teklif numaranız: {quote_number}

Ekibimiz 24 saat içinde sizinle iletişime geçecektir.

Nefes Depo Nakliyat"#,
        name = name,
        quote_number = quote_number
    )
}

pub fn confirmation_html(name: &str, quote_number: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="tr">
<head>
    <meta charset="UTF-8">
    <title>Teklif Talebiniz Alındı</title>
</head>
<body style="font-family: Arial, sans-serif; color: #333; max-width: 600px; margin: 0 auto;">
    <h1>Merhaba {name}</h1>
    <p>Teklif talebiniz bize ulaştı.</p>
    <p>Teklif numaranız: <strong>{quote_number}</strong></p>
    <p>Ekibimiz 24 saat içinde sizinle iletişime geçecektir.</p>
    <p>Nefes Depo Nakliyat</p>
</body>
</html>"#,
        name = html_escape::encode_text(name),
        quote_number = html_escape::encode_text(quote_number)
    )
}

/// SMTP email service implementation
pub struct SmtpEmailService {
    pub config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    /// Create a new SMTP email service
    #[instrument(skip(config), fields(host = %config.smtp_host, port = config.smtp_port))]
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        info!("Initializing SMTP email service");

        config.validate().map_err(EmailError::from)?;

        let mut transport_builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            .port(config.smtp_port)
            .timeout(Some(std::time::Duration::from_secs(config.connection_timeout_secs)));

        if config.use_tls {
            let tls_parameters = TlsParameters::new(config.smtp_host.clone())
                .map_err(|e| EmailError::ConfigError(format!("TLS configuration error: {}", e)))?;

            if config.use_starttls {
                transport_builder = transport_builder.tls(Tls::Required(tls_parameters));
            } else {
                transport_builder = transport_builder.tls(Tls::Wrapper(tls_parameters));
            }
        } else {
            transport_builder = transport_builder.tls(Tls::None);
        }

        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );
        let transport = transport_builder.credentials(credentials).build();

        info!("SMTP email service initialized successfully");
        Ok(Self { config, transport })
    }

    /// Send an email message
    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    pub async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        validate_email_address(&message.to)?;

        let email_message = self.build_message(message)?;

        self.transport
            .send(email_message)
            .await
            .map_err(|e| {
                error!("Failed to send email: {}", e);
                EmailError::SmtpError(format!("Failed to send email: {}", e))
            })?;

        info!("Email sent successfully");
        Ok(())
    }

    /// Build a lettre Message from EmailMessage
    pub fn build_message(&self, email_message: EmailMessage) -> Result<Message, EmailError> {
        let from_mailbox: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid from address: {}", e)))?;

        let to_mailbox: Mailbox = email_message.to
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid to address: {}", e)))?;

        let message_builder = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(email_message.subject);

        match (email_message.text_body, email_message.html_body) {
            (Some(text), Some(html)) => message_builder
                .multipart(MultiPart::alternative_plain_html(text, html))
                .map_err(|e| EmailError::MessageError(format!("Failed to build multipart message: {}", e))),
            (Some(text), None) => message_builder
                .body(text)
                .map_err(|e| EmailError::MessageError(format!("Failed to build text message: {}", e))),
            (None, Some(html)) => message_builder
                .singlepart(SinglePart::builder().header(ContentType::TEXT_HTML).body(html))
                .map_err(|e| EmailError::MessageError(format!("Failed to build HTML message: {}", e))),
            (None, None) => Err(EmailError::MessageError("No message body provided".to_string())),
        }
    }
}

#[async_trait]
impl QuoteNotifier for SmtpEmailService {
    #[instrument(skip(self, quote), fields(quote_number = %quote.quote_number))]
    async fn send_quote_confirmation(&self, quote: &Quote) -> Result<(), EmailError> {
        let to = match Recipient::for_quote(quote) {
            Recipient::Email(address) => address,
            // SMTP cannot deliver to a phone number.
            Recipient::Phone(_) => {
                return Err(EmailError::AddressError(
                    "Submission has no email address; phone destination is not deliverable by SMTP".to_string(),
                ));
            }
        };

        let message = EmailMessage::new(to, confirmation_subject(&quote.quote_number))
            .with_text_body(confirmation_text(&quote.name, &quote.quote_number))
            .with_html_body(confirmation_html(&quote.name, &quote.quote_number));

        self.send_email(message).await
    }
}

/// Stand-in used when SMTP is not configured. Quotes are still accepted;
/// every confirmation attempt reports why mail is off.
pub struct DisabledNotifier {
    reason: String,
}

impl DisabledNotifier {
    pub fn new(reason: impl Into<String>) -> Self {
        DisabledNotifier { reason: reason.into() }
    }
}

#[async_trait]
impl QuoteNotifier for DisabledNotifier {
    async fn send_quote_confirmation(&self, _quote: &Quote) -> Result<(), EmailError> {
        Err(EmailError::ConfigError(format!("Email is not configured: {}", self.reason)))
    }
}

/// SMTP notifier from the environment, or a [`DisabledNotifier`] when the
/// mail settings are missing or invalid.
pub fn notifier_from_env() -> Arc<dyn QuoteNotifier> {
    match EmailConfig::from_env()
        .map_err(EmailError::from)
        .and_then(SmtpEmailService::new)
    {
        Ok(service) => Arc::new(service),
        Err(e) => {
            warn!("📭 Email: Yapılandırılmadı ({}); confirmations are disabled", e);
            Arc::new(DisabledNotifier::new(e.to_string()))
        }
    }
}

/// Validate email address format
pub fn validate_email_address(email: &str) -> Result<(), EmailError> {
    if email.is_empty() {
        return Err(EmailError::AddressError("Email address cannot be empty".to_string()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(EmailError::AddressError("Invalid email format".to_string()));
    }

    Ok(())
}
