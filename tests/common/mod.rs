#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ttl_shortener::application::services::{
    AccountService, KeyProvisioner, LinkService, SessionService,
};
use ttl_shortener::domain::entities::{Link, NewLink, NewUser, SessionToken, User};
use ttl_shortener::domain::notification::Notification;
use ttl_shortener::domain::repositories::{
    LinkRepository, SecretRepository, TokenRepository, UserRepository,
};
use ttl_shortener::error::AppError;
use ttl_shortener::infrastructure::queue::{ChannelQueue, NotificationQueue};
use ttl_shortener::routes::routes;
use ttl_shortener::state::AppState;
use uuid::Uuid;

pub const BASE_URL: &str = "http://localhost:3000";
pub const PASSWORD: &str = "Secret1";

/// Link store kept in insertion order, with the same conditional semantics
/// as the PostgreSQL repository.
#[derive(Default)]
pub struct MemoryLinks {
    rows: Mutex<Vec<Link>>,
}

impl MemoryLinks {
    pub fn by_code(&self, short_code: &str) -> Option<Link> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.short_code == short_code)
            .cloned()
    }

    pub fn all(&self) -> Vec<Link> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinks {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|l| l.short_code == new_link.short_code || l.link_id == new_link.link_id)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_short_code_key" }),
            ));
        }
        let link = Link::from_new(new_link);
        rows.push(link.clone());
        Ok(link)
    }

    async fn find_by_id(&self, link_id: Uuid) -> Result<Option<Link>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.link_id == link_id)
            .cloned())
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.by_code(short_code))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn increment_clicks(&self, link_id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|l| l.link_id == link_id && l.is_active) {
            Some(link) => {
                link.clicks += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn deactivate(&self, link_id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|l| l.link_id == link_id && l.is_active) {
            Some(link) => {
                link.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_matured(&self, now: DateTime<Utc>) -> Result<Vec<Link>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.is_active && l.expiry.is_matured(now))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUsers {
    pub fn remove(&self, user_id: Uuid) {
        self.rows.lock().unwrap().remove(&user_id);
    }

    pub fn by_email(&self, email: &str) -> Option<User> {
        self.rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "users_email_key" }),
            ));
        }
        let user = User {
            user_id: new_user.user_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: new_user.created_at,
            updated_at: new_user.created_at,
        };
        rows.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.by_email(email))
    }
}

/// Token store keyed by owner, so replacing is a single map insert.
#[derive(Default)]
pub struct MemoryTokens {
    rows: Mutex<HashMap<Uuid, SessionToken>>,
}

impl MemoryTokens {
    pub fn count_for(&self, owner_id: Uuid) -> usize {
        usize::from(self.rows.lock().unwrap().contains_key(&owner_id))
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn backdate(&self, owner_id: Uuid, created_at: DateTime<Utc>) {
        if let Some(row) = self.rows.lock().unwrap().get_mut(&owner_id) {
            row.created_at = created_at;
        }
    }
}

#[async_trait]
impl TokenRepository for MemoryTokens {
    async fn replace_for_owner(&self, token: SessionToken) -> Result<SessionToken, AppError> {
        self.rows
            .lock()
            .unwrap()
            .insert(token.owner_id, token.clone());
        Ok(token)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<SessionToken>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&owner_id)
            .cloned()
            .into_iter()
            .collect())
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, row| row.created_at > cutoff);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemorySecrets {
    rows: Mutex<HashMap<String, String>>,
}

impl MemorySecrets {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl SecretRepository for MemorySecrets {
    async fn get(&self, name: &str) -> Result<Option<String>, AppError> {
        Ok(self.rows.lock().unwrap().get(name).cloned())
    }

    async fn create_if_absent(&self, name: &str, value: &str) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(name) {
            return Ok(false);
        }
        rows.insert(name.to_string(), value.to_string());
        Ok(true)
    }
}

/// Fully wired services over in-memory stores.
pub struct TestApp {
    pub state: AppState,
    pub links: Arc<MemoryLinks>,
    pub users: Arc<MemoryUsers>,
    pub tokens: Arc<MemoryTokens>,
    pub secrets: Arc<MemorySecrets>,
    pub queue: Arc<ChannelQueue>,
}

impl TestApp {
    pub fn server(&self) -> TestServer {
        TestServer::new(routes(self.state.clone())).unwrap()
    }

    /// Drains every queued notification.
    pub async fn drain_notifications(&self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(Some(n)) = self.queue.dequeue(Duration::from_millis(10)).await {
            drained.push(n);
        }
        drained
    }
}

pub fn create_test_app() -> TestApp {
    let links = Arc::new(MemoryLinks::default());
    let users = Arc::new(MemoryUsers::default());
    let tokens = Arc::new(MemoryTokens::default());
    let secrets = Arc::new(MemorySecrets::default());
    let queue = Arc::new(ChannelQueue::new(100));

    // Smallest key size rsa accepts keeps provisioning fast
    let keys = Arc::new(KeyProvisioner::new(secrets.clone(), 1024));
    let session_service = Arc::new(SessionService::new(tokens.clone(), users.clone(), keys));
    let account_service = Arc::new(AccountService::new(
        users.clone(),
        session_service.clone(),
        4,
    ));
    let link_service = Arc::new(LinkService::new(links.clone(), queue.clone(), BASE_URL));

    let state = AppState::new(link_service, session_service, account_service, queue.clone());

    TestApp {
        state,
        links,
        users,
        tokens,
        secrets,
        queue,
    }
}

/// Registers a user through the API and returns the `Authorization` value.
pub async fn sign_up(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/auth/signup")
        .json(&json!({ "email": email, "password": PASSWORD }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    format!("Bearer {}", body["JWE"].as_str().unwrap())
}

/// Creates a link through the API and returns its short code.
pub async fn create_link(server: &TestServer, auth: &str, life_time: &str) -> String {
    let response = server
        .post("/links")
        .add_header("Authorization", auth)
        .json(&json!({ "originalLink": "https://example.com/page", "lifeTime": life_time }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    let short_link = body["shortLink"].as_str().unwrap();
    short_link
        .strip_prefix(&format!("{BASE_URL}/"))
        .unwrap()
        .to_string()
}
