//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AccountService, LinkService, SessionService};
use crate::infrastructure::queue::NotificationQueue;

/// Services and collaborators shared across requests.
///
/// Cloned per request; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub session_service: Arc<SessionService>,
    pub account_service: Arc<AccountService>,
    pub queue: Arc<dyn NotificationQueue>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        session_service: Arc<SessionService>,
        account_service: Arc<AccountService>,
        queue: Arc<dyn NotificationQueue>,
    ) -> Self {
        Self {
            link_service,
            session_service,
            account_service,
            queue,
        }
    }
}
