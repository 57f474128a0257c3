use crate::helpers::{ada_contact, spawn_app, spawn_app_failing_on};

#[tokio::test]
async fn contact_returns_200_when_both_emails_are_sent() {
    let app = spawn_app().await;

    let response = app.post_contact(ada_contact()).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({"message": "Contact form submitted successfully", "status": 200})
    );
}

#[tokio::test]
async fn contact_acknowledges_the_submitter_before_notifying_the_admin() {
    let app = spawn_app().await;

    app.post_contact(ada_contact()).await;

    let sent = app.sent();
    assert_eq!(sent.len(), 2);

    assert_eq!(sent[0].to, "a@example.com");
    assert_eq!(sent[0].subject, "Support Team | Instructo Africa");
    assert!(sent[0].html_body.contains("Hi <strong>Ada</strong>"));

    assert_eq!(sent[1].to, "info@instructo.africa");
    assert_eq!(sent[1].subject, "New Contact Form Submission");
    assert!(sent.iter().all(|email| email.from.as_ref() == "noreply@instructo.africa"));
}

#[tokio::test]
async fn contact_admin_email_embeds_every_field_verbatim() {
    let app = spawn_app().await;

    app.post_contact(ada_contact()).await;

    let admin = &app.sent()[1];
    for expected in ["Ada", "a@example.com", "Hi", "Hello", "123"] {
        assert!(admin.html_body.contains(expected), "missing `{}`", expected);
    }
}

#[tokio::test]
async fn contact_emails_carry_the_logo_inline() {
    let app = spawn_app().await;

    app.post_contact(ada_contact()).await;

    for email in app.sent() {
        assert_eq!(email.attachments.len(), 1);
        assert_eq!(email.attachments[0].content_id, "logo");
        assert_eq!(email.attachments[0].filename, "logo.jpeg");
        assert!(email.html_body.contains("cid:logo"));
    }
}

#[tokio::test]
async fn contact_accepts_url_encoded_forms() {
    let app = spawn_app().await;
    let body = "name=Ada&email=a%40example.com&subject=Hi&message=Hello%20there&phone=123";

    let response = app
        .post_raw("contact", "application/x-www-form-urlencoded", body)
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let sent = app.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "a@example.com");
    assert!(sent[1].html_body.contains("Hello there"));
}

#[tokio::test]
async fn contact_does_not_validate_the_submission() {
    let app = spawn_app().await;

    let response = app.post_contact(serde_json::json!({})).await;

    assert_eq!(response.status().as_u16(), 200);
    let sent = app.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "");
}

#[tokio::test]
async fn contact_joins_array_values_with_commas() {
    let app = spawn_app().await;

    let mut submission = ada_contact();
    submission["name"] = serde_json::json!(["Ada", "B"]);
    submission["subject"] = serde_json::json!({"topic": "Hi"});
    let response = app.post_contact(submission).await;

    assert_eq!(response.status().as_u16(), 200);
    let admin = &app.sent()[1];
    assert!(admin.html_body.contains("Ada,B"));
    assert!(admin.html_body.contains("[object Object]"));
}

#[tokio::test]
async fn contact_joins_repeated_form_keys() {
    let app = spawn_app().await;

    let response = app
        .post_raw(
            "contact",
            "application/x-www-form-urlencoded",
            "name=Ada&name=Bob&email=a%40example.com",
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(app.sent()[1].html_body.contains("Ada,Bob"));
}

#[tokio::test]
async fn contact_without_a_content_type_sends_empty_fields() {
    let app = spawn_app().await;

    let response = app.post_empty("contact").await;

    assert_eq!(response.status().as_u16(), 200);
    let sent = app.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "");
    assert_eq!(sent[1].to, "info@instructo.africa");
}

#[tokio::test]
async fn contact_stops_after_a_failed_acknowledgement() {
    let app = spawn_app_failing_on(1).await;

    let response = app.post_contact(ada_contact()).await;

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "message": "Error submitting contact form",
            "status": 500,
            "error": "Connection refused by the relay",
        })
    );
    assert_eq!(app.sent().len(), 1);
}

#[tokio::test]
async fn contact_fails_when_the_admin_notification_fails() {
    let app = spawn_app_failing_on(2).await;

    let response = app.post_contact(ada_contact()).await;

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Error submitting contact form");
    assert_eq!(app.sent().len(), 2);
}
