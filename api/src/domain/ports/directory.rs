//! Player directory port
//!
//! Profiles live in two collections: authenticated app users, and the
//! group-scoped roster of players added by hand. Resolution tries the user
//! collection first and tags the result with where it was found so commits
//! write back to the right place.

use async_trait::async_trait;

use crate::domain::entities::{PlayerId, PlayerProfile, ProfileUpdate};
use crate::error::DomainError;

/// Which collection a profile was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    Authenticated,
    Group,
}

impl std::fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileSource::Authenticated => write!(f, "authenticated"),
            ProfileSource::Group => write!(f, "group"),
        }
    }
}

/// A profile plus the collection it came from
#[derive(Debug, Clone)]
pub struct ResolvedProfile {
    pub profile: PlayerProfile,
    pub source: ProfileSource,
}

/// Port for profile lookup and batched rating commits
#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    /// Look up a profile in the authenticated user collection
    async fn find_authenticated(&self, id: &PlayerId)
        -> Result<Option<PlayerProfile>, DomainError>;

    /// Look up a profile in the group roster
    async fn find_in_group(&self, id: &PlayerId) -> Result<Option<PlayerProfile>, DomainError>;

    /// Apply all profile updates of one rating trigger atomically. Either
    /// every update lands or none do.
    async fn commit_all(&self, updates: &[ProfileUpdate]) -> Result<(), DomainError>;
}

/// Resolve a profile, trying the authenticated collection before the group
/// roster, and tag the result with its source.
pub async fn resolve_profile<D: PlayerDirectory + ?Sized>(
    directory: &D,
    id: &PlayerId,
) -> Result<Option<ResolvedProfile>, DomainError> {
    if let Some(profile) = directory.find_authenticated(id).await? {
        return Ok(Some(ResolvedProfile {
            profile,
            source: ProfileSource::Authenticated,
        }));
    }
    if let Some(profile) = directory.find_in_group(id).await? {
        return Ok(Some(ResolvedProfile {
            profile,
            source: ProfileSource::Group,
        }));
    }
    Ok(None)
}
