use std::sync::Arc;

use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
};

use crate::{
    configuration::OrganizationSettings,
    domain::RegistrationSubmission,
    email_client::{EmailMessage, Mailer},
    routes::{acknowledge, dispatch_failure, FormOrJson},
    startup::EmailSender,
    templates,
};

#[tracing::instrument(
    name = "Forward a course registration",
    skip_all,
    fields(
        submitter_email = tracing::field::Empty,
        password_provided = tracing::field::Empty,
    )
)]
pub async fn handler(
    Extension(mailer): Extension<Arc<dyn Mailer>>,
    Extension(sender): Extension<EmailSender>,
    Extension(organization): Extension<OrganizationSettings>,
    FormOrJson(submission): FormOrJson<RegistrationSubmission>,
) -> Result<Response, Error> {
    let span = tracing::Span::current();
    span.record(
        "submitter_email",
        &tracing::field::display(&submission.email),
    );
    span.record("password_provided", &submission.has_password());

    mailer
        .send(welcome(&sender, &organization, &submission))
        .await
        .map_err(Error::DispatchFailed)?;
    tracing::info!("welcome email sent to the registrant");

    mailer
        .send(notification(&sender, &organization, &submission))
        .await
        .map_err(|e| {
            tracing::warn!("admin notification failed after the registrant was welcomed");
            Error::DispatchFailed(e)
        })?;
    tracing::info!("registration forwarded to the admin inbox");

    Ok(acknowledge("Registration successful"))
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error processing registration")]
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

fn welcome(
    sender: &EmailSender,
    organization: &OrganizationSettings,
    submission: &RegistrationSubmission,
) -> EmailMessage {
    EmailMessage {
        from: sender.0.clone(),
        to: submission.email.clone(),
        subject: format!("Registration Successful - {}", organization.name),
        html_body: templates::registration_welcome(submission, organization),
        attachments: Vec::new(),
    }
}

fn notification(
    sender: &EmailSender,
    organization: &OrganizationSettings,
    submission: &RegistrationSubmission,
) -> EmailMessage {
    EmailMessage {
        from: sender.0.clone(),
        to: organization.admin_email.to_string(),
        subject: "New Registration Notification".to_string(),
        html_body: templates::registration_summary(submission),
        attachments: Vec::new(),
    }
}
