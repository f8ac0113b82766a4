pub mod local;

use async_trait::async_trait;

use crate::models::Identity;

/// Source of signed-in identities. The dashboard never authenticates users
/// itself; it only asks who a session token belongs to.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Issues a session token for `identity` when `credential` proves the
    /// caller is the trusted identity gateway. `None` means it was refused.
    async fn sign_in(&self, identity: &Identity, credential: &str) -> anyhow::Result<Option<String>>;

    async fn current_identity(&self, token: &str) -> anyhow::Result<Option<Identity>>;

    /// Ends the session, returning the uid it belonged to.
    async fn sign_out(&self, token: &str) -> anyhow::Result<Option<String>>;

    /// Removes the identity and every session it holds.
    async fn delete_identity(&self, uid: &str) -> anyhow::Result<()>;
}
