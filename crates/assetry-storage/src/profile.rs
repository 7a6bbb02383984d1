//! The operator's locally persisted profile.

use assetry_core::model::UserProfile;

use crate::Result;
use crate::cache::{CacheBackend, load_json, store_json};

/// Cache key holding the profile.
pub const PROFILE_KEY: &str = "userProfile";

/// Reads the profile, falling back to the default operator.
pub fn load_profile(cache: &dyn CacheBackend) -> UserProfile {
    match load_json::<UserProfile>(cache, PROFILE_KEY) {
        Ok(Some(profile)) => profile,
        Ok(None) => UserProfile::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable profile, using defaults");
            UserProfile::default()
        }
    }
}

/// Writes the profile.
pub fn save_profile(cache: &dyn CacheBackend, profile: &UserProfile) -> Result<()> {
    store_json(cache, PROFILE_KEY, profile)?;
    tracing::debug!(username = %profile.username, "Saved profile");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;

    #[test]
    fn test_missing_profile_is_default_admin() {
        let profile = load_profile(&MemoryCache::new());
        assert_eq!(profile.email, "admin@company.com");
        assert_eq!(profile.preferences.theme, "light");
    }

    #[test]
    fn test_saved_profile_reloads() {
        let cache = MemoryCache::new();
        let mut profile = UserProfile::default();
        profile.preferences.theme = "dark".into();
        save_profile(&cache, &profile).unwrap();
        assert_eq!(load_profile(&cache).preferences.theme, "dark");
    }

    #[test]
    fn test_corrupt_profile_falls_back() {
        let cache = MemoryCache::new();
        cache.store(PROFILE_KEY, "{\"firstName\": ").unwrap();
        assert_eq!(load_profile(&cache), UserProfile::default());
    }
}
