//! Business logic services for the application layer.

pub mod account_service;
pub mod key_provisioner;
pub mod link_service;
pub mod session_service;

pub use account_service::{AccountService, SignUp};
pub use key_provisioner::KeyProvisioner;
pub use link_service::{CreatedLink, DeactivationOutcome, ExpiryReport, LinkService};
pub use session_service::SessionService;
