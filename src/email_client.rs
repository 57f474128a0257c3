use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lettre::{
    address::AddressError,
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;

use crate::{configuration::EmailClientSettings, domain::EmailAddress};

/// Delivers one message. Implementations are shared by every request and
/// must tolerate concurrent calls.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), anyhow::Error>;
}

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub from: EmailAddress,
    /// Recipient exactly as submitted; the transport decides whether it is deliverable.
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<InlineAttachment>,
}

/// A file embedded in the HTML body through a `cid:` reference.
#[derive(Clone, Debug)]
pub struct InlineAttachment {
    pub filename: String,
    pub source_path: PathBuf,
    pub content_id: String,
}

impl InlineAttachment {
    pub fn from_path(source_path: impl Into<PathBuf>, content_id: impl Into<String>) -> Self {
        let source_path = source_path.into();
        let filename = source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        InlineAttachment {
            filename,
            source_path,
            content_id: content_id.into(),
        }
    }

    fn mime_type(&self) -> &'static str {
        let extension = self
            .source_path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("svg") => "image/svg+xml",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },
    #[error("failed to read attachment {}: {source}", path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("{0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Sends mail through an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &EmailClientSettings) -> Result<Self, MailError> {
        let builder = if settings.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)?
        };
        let credentials = Credentials::new(
            settings.sender_email.to_string(),
            settings.password.expose_secret().to_owned(),
        );
        let transport = builder
            .port(settings.smtp_port)
            .credentials(credentials)
            .timeout(Some(settings.timeout()))
            .build();

        Ok(SmtpMailer { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(
        name = "Deliver an email through the SMTP relay",
        skip(self, message),
        fields(recipient = %message.to, subject = %message.subject)
    )]
    async fn send(&self, message: EmailMessage) -> Result<(), anyhow::Error> {
        let message = build_message(&message).await?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(MailError::from)?;

        tracing::info!(code = %response.code(), "email accepted by the relay");
        Ok(())
    }
}

/// Turn an [`EmailMessage`] into a MIME message, reading inline attachments
/// from disk.
pub async fn build_message(message: &EmailMessage) -> Result<Message, MailError> {
    let from = parse_mailbox(message.from.as_ref())?;
    let to = parse_mailbox(&message.to)?;
    let builder = Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.as_str());
    let html = SinglePart::html(message.html_body.clone());

    if message.attachments.is_empty() {
        return Ok(builder.singlepart(html)?);
    }

    let mut related = MultiPart::related().singlepart(html);
    for attachment in &message.attachments {
        related = related.singlepart(inline_part(attachment).await?);
    }

    Ok(builder.multipart(related)?)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|source| MailError::InvalidAddress {
            address: address.to_owned(),
            source,
        })
}

async fn inline_part(attachment: &InlineAttachment) -> Result<SinglePart, MailError> {
    let body = read_attachment(&attachment.source_path).await?;
    let content_type =
        ContentType::parse(attachment.mime_type()).unwrap_or(ContentType::TEXT_PLAIN);

    Ok(
        Attachment::new_inline_with_name(attachment.content_id.clone(), attachment.filename.clone())
            .body(body, content_type),
    )
}

async fn read_attachment(path: &Path) -> Result<Vec<u8>, MailError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| MailError::Attachment {
            path: path.to_owned(),
            source,
        })
}
