//! Channel-membership oracle port.
//!
//! The hub only serves users who follow the community channel. Whether a
//! user does is decided by the (out-of-scope) transport layer; the engine
//! sees it as an opaque boolean. Oracle failures are the implementation's
//! problem: it answers `false` rather than erroring, matching the behavior
//! of the platform-side membership check.

use peerboost_types::user::UserId;

/// Abstraction over the channel-membership check.
pub trait SubscriptionOracle: Send + Sync {
    /// Whether the user currently follows the community channel.
    fn is_subscribed(&self, user: UserId) -> impl std::future::Future<Output = bool> + Send;
}

/// Oracle that admits everyone.
///
/// Used when no community channel is configured, and by the operator CLI
/// and tests.
pub struct AlwaysSubscribed;

impl SubscriptionOracle for AlwaysSubscribed {
    async fn is_subscribed(&self, _user: UserId) -> bool {
        true
    }
}
