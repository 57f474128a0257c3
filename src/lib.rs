pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod error;
pub mod request_id;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod templates;
