use std::sync::Arc;

use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
};

use crate::{
    configuration::OrganizationSettings,
    domain::ContactSubmission,
    email_client::{EmailMessage, InlineAttachment, Mailer},
    routes::{acknowledge, dispatch_failure, FormOrJson},
    startup::EmailSender,
    templates,
};

#[tracing::instrument(
    name = "Forward a contact form submission",
    skip_all,
    fields(submitter_email = tracing::field::Empty)
)]
pub async fn handler(
    Extension(mailer): Extension<Arc<dyn Mailer>>,
    Extension(sender): Extension<EmailSender>,
    Extension(organization): Extension<OrganizationSettings>,
    FormOrJson(submission): FormOrJson<ContactSubmission>,
) -> Result<Response, Error> {
    tracing::Span::current().record(
        "submitter_email",
        &tracing::field::display(&submission.email),
    );

    mailer
        .send(acknowledgement(&sender, &organization, &submission))
        .await
        .map_err(Error::DispatchFailed)?;
    tracing::info!("acknowledgement sent to the submitter");

    mailer
        .send(summary(&sender, &organization, &submission))
        .await
        .map_err(|e| {
            tracing::warn!("admin notification failed after the submitter was acknowledged");
            Error::DispatchFailed(e)
        })?;
    tracing::info!("contact submission forwarded to the admin inbox");

    Ok(acknowledge("Contact form submitted successfully"))
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error submitting contact form")]
    DispatchFailed(#[source] anyhow::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            Error::DispatchFailed(reason) => dispatch_failure(&message, &reason),
        }
    }
}

fn acknowledgement(
    sender: &EmailSender,
    organization: &OrganizationSettings,
    submission: &ContactSubmission,
) -> EmailMessage {
    EmailMessage {
        from: sender.0.clone(),
        to: submission.email.clone(),
        subject: format!("Support Team | {}", organization.name),
        html_body: templates::contact_acknowledgement(&submission.name, organization),
        attachments: vec![logo(organization)],
    }
}

fn summary(
    sender: &EmailSender,
    organization: &OrganizationSettings,
    submission: &ContactSubmission,
) -> EmailMessage {
    EmailMessage {
        from: sender.0.clone(),
        to: organization.admin_email.to_string(),
        subject: "New Contact Form Submission".to_string(),
        html_body: templates::contact_summary(submission, organization),
        attachments: vec![logo(organization)],
    }
}

fn logo(organization: &OrganizationSettings) -> InlineAttachment {
    InlineAttachment::from_path(&organization.logo_path, templates::LOGO_CONTENT_ID)
}
