//! User profile as seen by the recommendation pipeline.

use common::UserId;
use serde::{Deserialize, Serialize};

/// Read-only projection of a user from the identity service.
///
/// Fetched per request and never persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub display_name: String,
    pub region: String,
}

impl UserProfile {
    /// Creates a profile from an already formatted display name.
    pub fn new(user_id: UserId, display_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            region: region.into(),
        }
    }

    /// Creates a profile from separate first and last names.
    ///
    /// The display name is the non-empty parts joined by a single space.
    pub fn from_name_parts(
        user_id: UserId,
        first_name: &str,
        last_name: &str,
        region: impl Into<String>,
    ) -> Self {
        let display_name = [first_name.trim(), last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self::new(user_id, display_name, region)
    }
}
