//! Authorization policies.

use reels_common::Config;
use reels_db::entities::user;

/// Capability check for administrative actions.
///
/// The administrator is named in configuration rather than in code, and
/// the capability is a boolean check so the identity source can change
/// without touching call sites.
#[derive(Clone)]
pub struct AdminPolicy {
    admin_username: Option<String>,
}

impl AdminPolicy {
    /// Create a policy granting admin capabilities to `admin_username`.
    /// `None` grants them to nobody.
    #[must_use]
    pub const fn new(admin_username: Option<String>) -> Self {
        Self { admin_username }
    }

    /// Create a policy from application configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.admin.username.clone())
    }

    /// Whether `user` may delete every reel at once.
    #[must_use]
    pub fn can_purge_reels(&self, user: &user::Model) -> bool {
        self.admin_username.as_deref() == Some(user.username.as_str())
    }
}
