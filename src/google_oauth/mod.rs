//! Google OAuth credential lifecycle: consent URL construction, the
//! code-for-token exchange, refresh, and reconciliation into storage.

pub mod credentials;
pub mod endpoints;
pub mod reconciler;

pub use credentials::CredentialSet;
pub use endpoints::{GoogleOauthFlow, refresh_access_token};
pub use reconciler::CredentialReconciler;
