//! In-memory trust oracle backed by an explicit set of identities.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::SubmitterId;
use crate::ports::TrustOracle;

/// Trust oracle over an explicitly managed set of pubkeys.
///
/// Used in tests and in deployments where the web of trust is loaded
/// up front rather than queried from a companion relay.
#[derive(Debug, Default)]
pub struct StaticTrustOracle {
    trusted: RwLock<HashSet<SubmitterId>>,
}

impl StaticTrustOracle {
    /// Creates an oracle trusting nobody.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an oracle trusting the given identities.
    pub fn with_trusted(identities: impl IntoIterator<Item = SubmitterId>) -> Self {
        Self {
            trusted: RwLock::new(identities.into_iter().collect()),
        }
    }

    /// Adds an identity to the trusted set.
    pub async fn trust(&self, identity: SubmitterId) {
        self.trusted.write().await.insert(identity);
    }

    /// Removes an identity from the trusted set.
    pub async fn revoke(&self, identity: &SubmitterId) {
        self.trusted.write().await.remove(identity);
    }

    /// Number of trusted identities.
    pub async fn len(&self) -> usize {
        self.trusted.read().await.len()
    }

    /// Whether the trusted set is empty.
    pub async fn is_empty(&self) -> bool {
        self.trusted.read().await.is_empty()
    }
}

#[async_trait]
impl TrustOracle for StaticTrustOracle {
    async fn is_trusted(&self, identity: &SubmitterId) -> bool {
        self.trusted.read().await.contains(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(c: char) -> SubmitterId {
        SubmitterId::new(std::iter::repeat(c).take(64).collect::<String>()).unwrap()
    }

    #[tokio::test]
    async fn new_oracle_trusts_nobody() {
        let oracle = StaticTrustOracle::new();
        assert!(!oracle.is_trusted(&id('a')).await);
        assert!(oracle.is_empty().await);
    }

    #[tokio::test]
    async fn trusted_identity_is_recognized() {
        let oracle = StaticTrustOracle::new();
        oracle.trust(id('a')).await;

        assert!(oracle.is_trusted(&id('a')).await);
        assert!(!oracle.is_trusted(&id('b')).await);
    }

    #[tokio::test]
    async fn revoked_identity_is_no_longer_trusted() {
        let oracle = StaticTrustOracle::with_trusted([id('a'), id('b')]);
        assert_eq!(oracle.len().await, 2);

        oracle.revoke(&id('a')).await;
        assert!(!oracle.is_trusted(&id('a')).await);
        assert!(oracle.is_trusted(&id('b')).await);
    }
}
