use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use form_mailer::{
    configuration::{get_configuration, Settings},
    email_client::{EmailMessage, Mailer},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber("form_mailer_test", "debug", std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber("form_mailer_test", "debug", std::io::sink);
        init_subscriber(subscriber);
    };
});

/// Mailer double: records every attempt and can refuse, or panic on, one of them.
#[derive(Default)]
pub struct RecordingMailer {
    attempts: Mutex<Vec<EmailMessage>>,
    failing_attempt: Option<usize>,
    panicking_attempt: Option<usize>,
}

impl RecordingMailer {
    pub fn failing_on(attempt: usize) -> Self {
        RecordingMailer {
            failing_attempt: Some(attempt),
            ..Default::default()
        }
    }

    pub fn panicking_on(attempt: usize) -> Self {
        RecordingMailer {
            panicking_attempt: Some(attempt),
            ..Default::default()
        }
    }

    pub fn attempts(&self) -> Vec<EmailMessage> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), anyhow::Error> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(message);
            attempts.len()
        };

        if self.panicking_attempt == Some(attempt) {
            panic!("relay connection pool poisoned");
        }
        if self.failing_attempt == Some(attempt) {
            anyhow::bail!("Connection refused by the relay");
        }
        Ok(())
    }
}

pub struct TestApp {
    pub address: String,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub async fn post_contact(&self, body: serde_json::Value) -> reqwest::Response {
        self.post_json("contact", body).await
    }

    pub async fn post_register(&self, body: serde_json::Value) -> reqwest::Response {
        self.post_json("register", body).await
    }

    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/{}", self.address, path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_raw(&self, path: &str, content_type: &str, body: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/{}", self.address, path))
            .header("Content-Type", content_type)
            .body(body.to_owned())
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_empty(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.mailer.attempts()
    }
}

pub fn ada_contact() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada",
        "email": "a@example.com",
        "subject": "Hi",
        "message": "Hello",
        "phone": "123",
    })
}

pub fn ada_registration() -> serde_json::Value {
    serde_json::json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "password": "secret123",
        "courseInterest": "Systems Programming",
        "userType": "student",
    })
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(RecordingMailer::default(), |_| {}).await
}

pub async fn spawn_app_failing_on(attempt: usize) -> TestApp {
    spawn_app_with(RecordingMailer::failing_on(attempt), |_| {}).await
}

pub async fn spawn_app_with(
    mailer: RecordingMailer,
    customise: impl FnOnce(&mut Settings),
) -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut configuration = get_configuration().expect("Failed to read configuration");
        configuration.application.host = "127.0.0.1".to_string();
        configuration.application.port = 0;
        customise(&mut configuration);
        configuration
    };

    let mailer = Arc::new(mailer);
    let application = Application::build_with_mailer(configuration, mailer.clone())
        .await
        .expect("Failed to build application");
    let address = format!("http://{}", application.address());

    let _ = tokio::spawn(async move { application.run().await.expect("Failed to run the server") });

    TestApp { address, mailer }
}
