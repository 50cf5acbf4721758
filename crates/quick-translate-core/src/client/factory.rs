use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::openai::OpenAiClient;
use super::traits::ChatClient;
use crate::config::TranslatorConfig;
use crate::credential::CredentialStore;
use crate::error::{Error, Result};

/// Builds a client bound to the given credential
pub type ClientBuilder = Arc<dyn Fn(&str) -> Result<Arc<dyn ChatClient>> + Send + Sync>;

struct CachedClient {
    credential: String,
    client: Arc<dyn ChatClient>,
}

/// Owner of the API boundary: the credential plus the lazily built client.
///
/// Credential changes go through [`ClientFactory::set_credential`] and
/// [`ClientFactory::clear_credential`], which drop the cached client.
pub struct ClientFactory {
    credentials: CredentialStore,
    builder: ClientBuilder,
    cached: Mutex<Option<CachedClient>>,
}

impl ClientFactory {
    /// Factory producing OpenAI-compatible clients for `config`
    pub fn new(credentials: CredentialStore, config: TranslatorConfig) -> Self {
        let builder: ClientBuilder = Arc::new(move |api_key: &str| {
            let client: Arc<dyn ChatClient> = Arc::new(OpenAiClient::new(&config, api_key)?);
            Ok(client)
        });
        Self::with_builder(credentials, builder)
    }

    /// Factory with a custom client builder
    pub fn with_builder(credentials: CredentialStore, builder: ClientBuilder) -> Self {
        Self {
            credentials,
            builder,
            cached: Mutex::new(None),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_configured()
    }

    /// Persist a new credential and drop the cached client
    pub async fn set_credential(&self, value: &str) -> Result<()> {
        self.credentials.set(value)?;
        self.invalidate().await;
        info!("API credential updated");
        Ok(())
    }

    /// Remove the stored credential and drop the cached client
    pub async fn clear_credential(&self) -> Result<()> {
        self.credentials.clear()?;
        self.invalidate().await;
        info!("API credential cleared");
        Ok(())
    }

    /// Drop the cached client so the next [`ClientFactory::client`] rebuilds it
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    /// Return the cached client, building one if the credential changed.
    ///
    /// Fails with [`Error::MissingCredential`] before any network activity
    /// when no credential is stored.
    pub async fn client(&self) -> Result<Arc<dyn ChatClient>> {
        let credential = self.credentials.get().ok_or(Error::MissingCredential)?;

        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref()
            && entry.credential == credential
        {
            debug!("Reusing cached {} client", entry.client.name());
            return Ok(Arc::clone(&entry.client));
        }

        let client = (self.builder)(&credential)?;
        debug!("Built new {} client", client.name());
        *cached = Some(CachedClient {
            credential,
            client: Arc::clone(&client),
        });
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatRequest;
    use crate::error::ErrorKind;
    use crate::storage::{CREDENTIAL_KEY, KeyValueStore, MemoryStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullClient;

    #[async_trait]
    impl ChatClient for NullClient {
        fn name(&self) -> &'static str {
            "null"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn counting_factory(storage: Arc<MemoryStore>) -> (ClientFactory, Arc<AtomicUsize>) {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let builder: ClientBuilder = Arc::new(move |_key: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            let client: Arc<dyn ChatClient> = Arc::new(NullClient);
            Ok(client)
        });
        let factory = ClientFactory::with_builder(CredentialStore::new(storage), builder);
        (factory, builds)
    }

    #[tokio::test]
    async fn test_missing_credential_fails_without_building() {
        let (factory, builds) = counting_factory(Arc::new(MemoryStore::new()));

        let err = factory.client().await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(builds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_client_is_cached() {
        let (factory, builds) = counting_factory(Arc::new(MemoryStore::new()));
        factory.set_credential("sk-one").await.unwrap();

        let first = factory.client().await.unwrap();
        let second = factory.client().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_set_credential_rebuilds_client() {
        let (factory, builds) = counting_factory(Arc::new(MemoryStore::new()));
        factory.set_credential("sk-one").await.unwrap();
        let first = factory.client().await.unwrap();

        // Same value still counts as a change
        factory.set_credential("sk-one").await.unwrap();
        let second = factory.client().await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_credential_then_client_fails() {
        let (factory, _) = counting_factory(Arc::new(MemoryStore::new()));
        factory.set_credential("sk-one").await.unwrap();
        factory.client().await.unwrap();

        factory.clear_credential().await.unwrap();
        assert!(!factory.is_configured());
        let err = factory.client().await.err().unwrap();
        assert!(err.is_not_configured());
    }

    #[tokio::test]
    async fn test_credential_changed_underneath_rebuilds() {
        let storage = Arc::new(MemoryStore::new());
        let (factory, builds) = counting_factory(Arc::clone(&storage));
        factory.set_credential("sk-one").await.unwrap();
        factory.client().await.unwrap();

        storage.set(CREDENTIAL_KEY, b"sk-two").unwrap();
        factory.client().await.unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }
}
