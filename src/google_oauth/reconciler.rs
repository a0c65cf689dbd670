use crate::db::CredentialsStorage;
use crate::db::models::StoredCredential;
use crate::error::HubError;
use crate::google_oauth::credentials::CredentialSet;
use tracing::info;

/// Merges freshly obtained credentials into storage without losing a
/// previously issued refresh token.
#[derive(Clone)]
pub struct CredentialReconciler {
    storage: CredentialsStorage,
}

impl CredentialReconciler {
    pub fn new(storage: CredentialsStorage) -> Self {
        Self { storage }
    }

    /// Upsert the owner's credential set. Google omits the refresh token on
    /// re-authorization when one was already issued; the store keeps the old
    /// value in that case rather than nulling it. The `created` flag is for
    /// logging only.
    pub async fn reconcile(
        &self,
        owner_id: i64,
        creds: &CredentialSet,
    ) -> Result<(StoredCredential, bool), HubError> {
        let (stored, created) = self.storage.upsert_preserving_refresh(owner_id, creds).await?;
        info!(
            owner_id,
            action = if created { "created" } else { "updated" },
            "Google credentials reconciled"
        );
        Ok((stored, created))
    }
}
