//! Stand-in stores for exercising the finder without real data.

use std::sync::Mutex;

use async_trait::async_trait;

use credgate_core::Credential;
use credgate_store::{FindOptions, Result, Store, StoreError};

/// Returns a canned answer and remembers every lookup it was asked.
#[derive(Debug, Default)]
pub struct RecordingStore {
    response: Option<Credential>,
    calls: Mutex<Vec<FindOptions>>,
}

impl RecordingStore {
    /// A store that answers every lookup with `response`.
    pub fn returning(response: Option<Credential>) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A store that never matches anything.
    pub fn empty() -> Self {
        Self::returning(None)
    }

    /// Lookups received so far, oldest first.
    pub fn calls(&self) -> Vec<FindOptions> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, options: &FindOptions) -> Result<()> {
        self.calls
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))?
            .push(options.clone());
        Ok(())
    }
}

#[async_trait]
impl Store for RecordingStore {
    async fn find_credential(&self, options: &FindOptions) -> Result<Option<Credential>> {
        self.record(options)?;
        Ok(self.response.clone())
    }

    async fn find_credentials(&self, options: &FindOptions) -> Result<Vec<Credential>> {
        self.record(options)?;
        Ok(self.response.iter().cloned().collect())
    }
}

/// Fails every lookup with [`StoreError::Unavailable`].
#[derive(Debug, Clone)]
pub struct FailingStore {
    reason: String,
}

impl FailingStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn find_credential(&self, _options: &FindOptions) -> Result<Option<Credential>> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }

    async fn find_credentials(&self, _options: &FindOptions) -> Result<Vec<Credential>> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credgate_store::{CredentialFilter, Relations};

    #[tokio::test]
    async fn test_recording_store_records_in_order() {
        let store = RecordingStore::returning(Some(Credential::new("cred_123", "GitHub", "githubApi")));
        let first = FindOptions::new(CredentialFilter::by_id("cred_123"), Relations::NONE);
        let second = FindOptions::default();

        assert!(store.find_credential(&first).await.unwrap().is_some());
        assert_eq!(store.find_credentials(&second).await.unwrap().len(), 1);
        assert_eq!(store.calls(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = FailingStore::new("connection refused");
        let result = store.find_credential(&FindOptions::default()).await;
        assert!(matches!(result, Err(StoreError::Unavailable(reason)) if reason == "connection refused"));
    }
}
