pub mod email_address;
mod submission;

pub use email_address::EmailAddress;
pub use submission::{ContactSubmission, RegistrationSubmission};
