//! HTML bodies for the transactional emails.
//!
//! Submitted values are interpolated verbatim: nothing here escapes HTML.

use crate::{
    configuration::OrganizationSettings,
    domain::{ContactSubmission, RegistrationSubmission},
};

/// Content id the contact templates use to reference the inline logo.
pub const LOGO_CONTENT_ID: &str = "logo";

const ACKNOWLEDGEMENT_STYLE: &str = r#"
      body {
        font-family: Arial, sans-serif;
        background-color: #f4f4f4;
        color: #333;
        margin: 0;
        padding: 0;
      }
      .email-container {
        max-width: 600px;
        margin: 20px auto;
        background: #ffffff;
        border-radius: 8px;
        overflow: hidden;
        box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
      }
      .header {
        background-color: #3855b3;
        padding: 20px;
        text-align: center;
        color: white;
      }
      .header h1 {
        margin: 0;
        font-size: 24px;
      }
      .body {
        padding: 20px;
        line-height: 1.6;
      }
      .footer {
        background-color: #f4f4f4;
        text-align: center;
        padding: 10px;
        font-size: 14px;
        color: #666;
      }
      .footer a {
        color: #3855b3;
        text-decoration: none;
      }
"#;

/// Thank-you note sent back to whoever filled in the contact form.
pub fn contact_acknowledgement(name: &str, organization: &OrganizationSettings) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Thank You Email</title>
    <style>{style}</style>
  </head>
  <body>
    <div class="email-container">
      <div class="header">
        <img src="cid:{logo}" alt="{organization}" style="max-width: 150px; margin-bottom: 20px;">
        <h1>Thank You!</h1>
      </div>
      <div class="body">
        <p>Hi <strong>{name}</strong>,</p>
        <p>Thank you for reaching out to us at <strong>{organization}</strong>. We have received your message and our team is currently reviewing your request. We will get back to you as soon as possible.</p>
        <p>If you have any urgent inquiries, feel free to contact us directly at <strong>{phone}</strong> or reply to this email.</p>
        <p>We appreciate your patience and look forward to assisting you!</p>
        <p>Best regards,</p>
        <p><strong>The {organization} Team</strong></p>
      </div>
      <div class="footer">
        <p>&copy; {organization}. All rights reserved.</p>
        <p>
          <a href="{website}">Visit our website</a> |
          <a href="mailto:{admin}">Email us</a>
        </p>
      </div>
    </div>
  </body>
</html>
"#,
        style = ACKNOWLEDGEMENT_STYLE,
        logo = LOGO_CONTENT_ID,
        name = name,
        organization = organization.name,
        phone = organization.phone,
        website = organization.website,
        admin = organization.admin_email,
    )
}

/// Copy of a contact submission for the admin inbox.
pub fn contact_summary(submission: &ContactSubmission, organization: &OrganizationSettings) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; color: #333;">
  <div style="background-color: #f4f4f4; padding: 20px; text-align: center;">
    <img src="cid:{logo}" alt="{organization}" style="max-width: 150px; margin-bottom: 20px;">
  </div>
  <div style="padding: 20px;">
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Email:</strong> {email}</p>
    <p><strong>Subject:</strong> {subject}</p>
    <p><strong>Phone:</strong> {phone}</p>
    <p><strong>Message:</strong></p>
    <p>{message}</p>
  </div>
  <div style="background-color: #3855b3; padding: 20px; text-align: center; color: white;">
    <p>&copy; {organization}. All rights reserved.</p>
  </div>
</div>
"#,
        logo = LOGO_CONTENT_ID,
        organization = organization.name,
        name = submission.name,
        email = submission.email,
        subject = submission.subject,
        phone = submission.phone,
        message = submission.message,
    )
}

pub fn registration_welcome(
    submission: &RegistrationSubmission,
    organization: &OrganizationSettings,
) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; color: #333;">
  <div style="background-color: #f4f4f4; padding: 20px; text-align: center;">
    <h2>Welcome to {organization}!</h2>
  </div>
  <div style="padding: 20px;">
    <p>Hi {first_name},</p>
    <p>Thank you for registering with {organization}. We’re thrilled to have you on board.</p>
    <p>Your course of interest is: <strong>{course_interest}</strong>.</p>
    <p>We will get back to you shortly with more details.</p>
    <p>Best regards,<br>{organization} Team</p>
  </div>
</div>
"#,
        organization = organization.name,
        first_name = submission.first_name,
        course_interest = submission.course_interest,
    )
}

/// Registration details for the admin inbox. The password is left out.
pub fn registration_summary(submission: &RegistrationSubmission) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; color: #333;">
  <h2>New Registration Received</h2>
  <p><strong>First Name:</strong> {first_name}</p>
  <p><strong>Last Name:</strong> {last_name}</p>
  <p><strong>Email:</strong> {email}</p>
  <p><strong>Course of Interest:</strong> {course_interest}</p>
  <p><strong>User Type:</strong> {user_type}</p>
</div>
"#,
        first_name = submission.first_name,
        last_name = submission.last_name,
        email = submission.email,
        course_interest = submission.course_interest,
        user_type = submission.user_type,
    )
}
