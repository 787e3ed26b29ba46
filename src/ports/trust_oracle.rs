//! Trust oracle port: the membership test exempting an identity from payment.

use async_trait::async_trait;

use crate::domain::foundation::SubmitterId;

/// Port answering "is this identity exempt from payment?".
///
/// Pure query with no side effects on gate state. Implementations must
/// fail closed: when the trust source is unreachable or errors, the
/// answer is `false` and the submitter pays.
#[async_trait]
pub trait TrustOracle: Send + Sync {
    /// Returns true if the identity is in the web of trust.
    async fn is_trusted(&self, identity: &SubmitterId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_oracle_is_object_safe() {
        fn _accepts_dyn(_oracle: &dyn TrustOracle) {}
    }
}
