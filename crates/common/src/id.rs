//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a cryptographically secure random nonce.
    #[must_use]
    pub fn generate_nonce(&self) -> String {
        // Use UUID v4 (no time component)
        Uuid::new_v4().simple().to_string()
    }
}

/// Returns whether `id` has the shape of an entity ID.
///
/// Used to reject malformed path parameters before they ever reach the
/// store, mirroring a driver-level identifier validity check.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    Ulid::from_string(&id.to_uppercase()).is_ok()
}
