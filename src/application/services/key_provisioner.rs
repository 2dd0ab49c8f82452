//! Lazy, race-safe provisioning of the session key pair.

use serde_json::json;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::domain::entities::{KeyError, KeyPair, PRIVATE_KEY, PUBLIC_KEY};
use crate::domain::repositories::SecretRepository;
use crate::error::AppError;

/// Makes sure exactly one RSA key pair exists per deployment.
///
/// The stored private key is authoritative. Concurrent provisioners may each
/// generate a candidate, but only the first `create_if_absent` lands and every
/// caller then re-reads and uses the stored key. Once loaded the pair is cached
/// for the life of the process.
pub struct KeyProvisioner {
    secrets: Arc<dyn SecretRepository>,
    key_bits: usize,
    cache: OnceCell<Arc<KeyPair>>,
}

impl KeyProvisioner {
    pub fn new(secrets: Arc<dyn SecretRepository>, key_bits: usize) -> Self {
        Self {
            secrets,
            key_bits,
            cache: OnceCell::new(),
        }
    }

    /// Returns the key pair, generating and storing one if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if generation fails, the secret store
    /// fails, or the stored public key does not match the stored private key.
    pub async fn ensure_key_pair(&self) -> Result<Arc<KeyPair>, AppError> {
        self.cache
            .get_or_try_init(|| self.provision())
            .await
            .map(Arc::clone)
    }

    /// Returns the key pair if one has been provisioned. Never generates.
    pub async fn private_key(&self) -> Result<Option<Arc<KeyPair>>, AppError> {
        if let Some(pair) = self.cache.get() {
            return Ok(Some(Arc::clone(pair)));
        }

        let Some(pair) = self.load().await? else {
            return Ok(None);
        };

        let pair = Arc::new(pair);
        let cached = self.cache.get_or_init(|| async { pair }).await;
        Ok(Some(Arc::clone(cached)))
    }

    async fn provision(&self) -> Result<Arc<KeyPair>, AppError> {
        if let Some(pair) = self.load().await? {
            return Ok(Arc::new(pair));
        }

        let bits = self.key_bits;
        let candidate = tokio::task::spawn_blocking(move || KeyPair::generate(bits))
            .await
            .map_err(|e| {
                error!(error = %e, "Key generation task failed");
                AppError::internal("Key material error", json!({}))
            })?
            .map_err(key_error)?;

        let pem = candidate.private_pem().map_err(key_error)?;
        if self.secrets.create_if_absent(PRIVATE_KEY, &pem).await? {
            info!(bits, "Generated session key pair");
        } else {
            info!("Session key pair was provisioned concurrently, using stored key");
        }

        self.load().await?.map(Arc::new).ok_or_else(|| {
            error!("Private key missing right after provisioning");
            AppError::internal("Key material error", json!({}))
        })
    }

    /// Loads the stored private key and publishes its public half.
    async fn load(&self) -> Result<Option<KeyPair>, AppError> {
        let Some(pem) = self.secrets.get(PRIVATE_KEY).await? else {
            return Ok(None);
        };
        let pair = KeyPair::from_private_pem(&pem).map_err(key_error)?;

        let public_pem = pair.public_pem().map_err(key_error)?;
        if !self.secrets.create_if_absent(PUBLIC_KEY, &public_pem).await? {
            let stored = self.secrets.get(PUBLIC_KEY).await?.ok_or_else(|| {
                error!("Public key reported present but could not be read");
                AppError::internal("Key material error", json!({}))
            })?;
            pair.verify_public_pem(&stored).map_err(key_error)?;
        }

        Ok(Some(pair))
    }
}

fn key_error(e: KeyError) -> AppError {
    error!(error = %e, "Key material error");
    AppError::internal("Key material error", json!({}))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::repositories::MockSecretRepository;
    use std::collections::HashMap;
    use std::sync::{LazyLock, Mutex};

    pub(crate) static STORED: LazyLock<KeyPair> =
        LazyLock::new(|| KeyPair::generate(1024).unwrap());

    type Store = Arc<Mutex<HashMap<String, String>>>;

    /// Secret store mock backed by a shared map.
    pub(crate) fn memory_secrets(store: Store) -> MockSecretRepository {
        let mut mock = MockSecretRepository::new();

        let reads = store.clone();
        mock.expect_get()
            .returning(move |name| Ok(reads.lock().unwrap().get(name).cloned()));

        let writes = store;
        mock.expect_create_if_absent().returning(move |name, value| {
            let mut map = writes.lock().unwrap();
            if map.contains_key(name) {
                Ok(false)
            } else {
                map.insert(name.to_string(), value.to_string());
                Ok(true)
            }
        });

        mock
    }

    /// A store that already holds the shared test key.
    pub(crate) fn seeded_store() -> Store {
        let mut map = HashMap::new();
        map.insert(PRIVATE_KEY.to_string(), STORED.private_pem().unwrap());
        Arc::new(Mutex::new(map))
    }

    #[tokio::test]
    async fn test_provisions_when_absent() {
        let store: Store = Arc::default();
        let provisioner = KeyProvisioner::new(Arc::new(memory_secrets(store.clone())), 1024);

        let pair = provisioner.ensure_key_pair().await.unwrap();

        let map = store.lock().unwrap();
        assert_eq!(map.get(PRIVATE_KEY).unwrap(), &pair.private_pem().unwrap());
        assert_eq!(map.get(PUBLIC_KEY).unwrap(), &pair.public_pem().unwrap());
    }

    #[tokio::test]
    async fn test_uses_existing_key() {
        let provisioner = KeyProvisioner::new(Arc::new(memory_secrets(seeded_store())), 1024);

        let pair = provisioner.ensure_key_pair().await.unwrap();
        assert_eq!(pair.public_key(), STORED.public_key());
    }

    #[tokio::test]
    async fn test_caches_after_first_load() {
        let mut mock = MockSecretRepository::new();
        let pem = STORED.private_pem().unwrap();
        mock.expect_get()
            .withf(|name| name == PRIVATE_KEY)
            .times(1)
            .returning(move |_| Ok(Some(pem.clone())));
        mock.expect_create_if_absent()
            .withf(|name, _| name == PUBLIC_KEY)
            .times(1)
            .returning(|_, _| Ok(true));

        let provisioner = KeyProvisioner::new(Arc::new(mock), 1024);

        let first = provisioner.ensure_key_pair().await.unwrap();
        let second = provisioner.ensure_key_pair().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_lost_race_adopts_stored_key() {
        let store: Store = Arc::default();
        let winner_pem = STORED.private_pem().unwrap();

        let mut mock = MockSecretRepository::new();
        let reads = store.clone();
        mock.expect_get()
            .returning(move |name| Ok(reads.lock().unwrap().get(name).cloned()));
        let writes = store.clone();
        mock.expect_create_if_absent().returning(move |name, value| {
            let mut map = writes.lock().unwrap();
            // Another instance lands its private key first
            if name == PRIVATE_KEY {
                map.entry(PRIVATE_KEY.to_string())
                    .or_insert_with(|| winner_pem.clone());
            }
            if map.contains_key(name) {
                Ok(false)
            } else {
                map.insert(name.to_string(), value.to_string());
                Ok(true)
            }
        });

        let provisioner = KeyProvisioner::new(Arc::new(mock), 1024);
        let pair = provisioner.ensure_key_pair().await.unwrap();

        assert_eq!(pair.public_key(), STORED.public_key());
        assert_eq!(
            store.lock().unwrap().get(PUBLIC_KEY).unwrap(),
            &STORED.public_pem().unwrap()
        );
    }

    #[tokio::test]
    async fn test_concurrent_provisioners_share_one_pair() {
        let store: Store = Arc::default();
        let a = Arc::new(KeyProvisioner::new(
            Arc::new(memory_secrets(store.clone())),
            1024,
        ));
        let b = Arc::new(KeyProvisioner::new(
            Arc::new(memory_secrets(store.clone())),
            1024,
        ));

        let (pa, pb, pa2) = tokio::join!(a.ensure_key_pair(), b.ensure_key_pair(), a.ensure_key_pair());
        let (pa, pb, pa2) = (pa.unwrap(), pb.unwrap(), pa2.unwrap());

        assert_eq!(pa.public_key(), pb.public_key());
        assert!(Arc::ptr_eq(&pa, &pa2));
        assert_eq!(store.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_mismatched_public_key_is_internal() {
        let other = KeyPair::generate(1024).unwrap();
        let store = seeded_store();
        store
            .lock()
            .unwrap()
            .insert(PUBLIC_KEY.to_string(), other.public_pem().unwrap());

        let provisioner = KeyProvisioner::new(Arc::new(memory_secrets(store)), 1024);

        assert!(matches!(
            provisioner.ensure_key_pair().await,
            Err(AppError::Internal { .. })
        ));
    }

    #[tokio::test]
    async fn test_private_key_never_generates() {
        let store: Store = Arc::default();
        let provisioner = KeyProvisioner::new(Arc::new(memory_secrets(store.clone())), 1024);

        assert!(provisioner.private_key().await.unwrap().is_none());
        assert!(store.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let mut mock = MockSecretRepository::new();
        mock.expect_get()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let provisioner = KeyProvisioner::new(Arc::new(mock), 1024);
        assert!(matches!(
            provisioner.ensure_key_pair().await,
            Err(AppError::Internal { .. })
        ));
    }
}
