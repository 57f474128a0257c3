use crate::{
    configuration::Settings,
    domain::EmailAddress,
    email_client::{Mailer, SmtpMailer},
    error::{ErrorDetails, PanicResponse},
    request_id::{AddRequestIdLayer, MakeSpanWithRequestId, UseRequestId},
    routes,
};

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, Extension},
    routing, Router,
};
use http::{header, Method};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
    ServiceBuilderExt,
};

/// Largest request body the form routes accept.
const BODY_LIMIT: usize = 1024 * 1024;

pub struct Application {
    app: Router,
    listener: TcpListener,
}

/// Address every outgoing email is sent from.
#[derive(Clone)]
pub struct EmailSender(pub EmailAddress);

impl Application {
    /// Build the application around an SMTP relay described by `settings`.
    pub async fn build(settings: Settings) -> Result<Self, anyhow::Error> {
        let mailer = SmtpMailer::new(&settings.email_client)
            .context("failed to configure the SMTP transport")?;

        Self::build_with_mailer(settings, Arc::new(mailer)).await
    }

    pub async fn build_with_mailer(
        settings: Settings,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, anyhow::Error> {
        let error_details = ErrorDetails(settings.application.expose_error_details);
        let sender = EmailSender(settings.email_client.sender_email.clone());

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        let middleware = ServiceBuilder::new()
            .layer(AddRequestIdLayer)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(MakeSpanWithRequestId)
                    .on_failure(()),
            )
            .set_x_request_id(UseRequestId)
            .propagate_x_request_id()
            .layer(CatchPanicLayer::custom(PanicResponse::new(error_details)))
            .layer(cors)
            .layer(Extension(error_details))
            .layer(Extension(mailer))
            .layer(Extension(sender))
            .layer(Extension(settings.organization.clone()))
            .into_inner();

        let app = Router::new()
            .route("/", routing::get(routes::health_check::handler))
            .route("/contact", routing::post(routes::contact::handler))
            .route("/register", routing::post(routes::register::handler))
            .layer(DefaultBodyLimit::max(BODY_LIMIT))
            .layer(middleware);

        let address = settings.application.address();
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("failed to bind {}", address))?;

        Ok(Application { app, listener })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        axum::serve(self.listener, self.app).await
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener
            .local_addr()
            .expect("a bound listener has a local address")
    }

    pub fn address(&self) -> String {
        format!("{}", self.local_addr())
    }

    pub fn port(&self) -> u16 {
        self.local_addr().port()
    }
}
