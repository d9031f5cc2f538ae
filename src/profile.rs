//! Local learner profile
//!
//! The profile is a small YAML file in the platform data directory. It
//! supplies the chat identity when none is configured and keeps simple
//! learning stats.

use crate::error::{Result, TutorError};
use crate::store::{UserIdentity, ANONYMOUS_USER_NAME};
use anyhow::Context;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted learner profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact email, empty when unset
    #[serde(default)]
    pub email: String,
    /// When the profile was created
    pub join_date: DateTime<Utc>,
    /// Skills the learner has recorded
    #[serde(default)]
    pub skills_learned: Vec<String>,
    /// Prompts sent from this machine
    #[serde(default)]
    pub total_chats: u64,
}

impl UserProfile {
    /// Fresh profile with a generated id
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: format!("learner_{}", ulid::Ulid::new().to_string().to_lowercase()),
            name: ANONYMOUS_USER_NAME.to_string(),
            email: String::new(),
            join_date: now,
            skills_learned: Vec::new(),
            total_chats: 0,
        }
    }

    /// Identity to chat as
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(self.id.clone(), self.name.clone())
    }

    /// Learning stats as of `now`
    pub fn stats(&self, now: DateTime<Utc>) -> ProfileStats {
        let days = (now - self.join_date).num_days();
        ProfileStats {
            skills_learned: self.skills_learned.len(),
            total_chats: self.total_chats,
            days_active: days.max(1) as u64,
        }
    }
}

/// Summary numbers shown on the profile page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    /// Number of recorded skills
    pub skills_learned: usize,
    /// Prompts sent
    pub total_chats: u64,
    /// Whole days since joining, at least 1
    pub days_active: u64,
}

/// Validate an email address
///
/// # Errors
///
/// Returns error unless the address has exactly one `@` with text on both
/// sides
///
/// # Examples
///
/// ```
/// use tutorchat::profile::validate_email;
///
/// assert!(validate_email("ada@example.com").is_ok());
/// assert!(validate_email("ada@").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    let mut parts = email.split('@');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    );
    if !valid {
        return Err(TutorError::Profile(format!("Invalid email address: '{}'", email)).into());
    }
    Ok(())
}

/// Validate a display name
///
/// # Errors
///
/// Returns error if the name is blank
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TutorError::Profile("Name cannot be empty".to_string()).into());
    }
    Ok(())
}

/// Profile bound to its file
pub struct ProfileStore {
    path: PathBuf,
    profile: UserProfile,
}

impl ProfileStore {
    /// Default profile location in the platform data directory
    ///
    /// # Errors
    ///
    /// Returns error if no home directory can be determined
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "tutorchat", "tutorchat")
            .ok_or_else(|| TutorError::Profile("Could not determine data directory".into()))?;
        Ok(proj_dirs.data_dir().join("profile.yaml"))
    }

    fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path),
            None => Self::default_path(),
        }
    }

    /// Open the profile at `path`, or the default location when `None`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or created
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        Self::load_or_create(Self::resolve_path(path)?, Utc::now())
    }

    /// Open an existing profile without creating one
    ///
    /// Returns `Ok(None)` when no profile file exists yet.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn open_existing(path: Option<PathBuf>) -> Result<Option<Self>> {
        let path = Self::resolve_path(path)?;
        if !path.exists() {
            tracing::debug!("No profile at {}", path.display());
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    fn load(path: PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        let profile: UserProfile = serde_yaml::from_str(&contents).map_err(|e| {
            TutorError::Profile(format!("Failed to parse profile {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded profile {} from {}", profile.id, path.display());
        Ok(Self { path, profile })
    }

    /// Load the profile, creating and saving a fresh one if missing
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or written
    pub fn load_or_create(path: impl Into<PathBuf>, now: DateTime<Utc>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Self::load(path);
        }

        let store = Self {
            path,
            profile: UserProfile::new(now),
        };
        store.save()?;
        tracing::info!(
            "Created profile {} at {}",
            store.profile.id,
            store.path.display()
        );
        Ok(store)
    }

    /// Profile file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current profile
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Write the profile to disk
    ///
    /// # Errors
    ///
    /// Returns error if the file or its directory cannot be written
    pub fn save(&self) -> Result<()> {
        self.write(&self.profile)
    }

    fn write(&self, profile: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create profile directory")
                .map_err(|e| TutorError::Profile(e.to_string()))?;
        }
        let yaml = serde_yaml::to_string(profile)?;
        std::fs::write(&self.path, yaml)
            .with_context(|| format!("Failed to write profile {}", self.path.display()))?;
        Ok(())
    }

    /// Persist `next` and only then make it current
    fn commit(&mut self, next: UserProfile) -> Result<()> {
        self.write(&next)?;
        self.profile = next;
        Ok(())
    }

    /// Update name and/or email after validating them, then save
    ///
    /// Nothing is changed if either value is invalid.
    ///
    /// # Errors
    ///
    /// Returns error on invalid input or if saving fails
    pub fn update(&mut self, name: Option<&str>, email: Option<&str>) -> Result<()> {
        if let Some(name) = name {
            validate_name(name)?;
        }
        if let Some(email) = email {
            validate_email(email)?;
        }

        let mut next = self.profile.clone();
        if let Some(name) = name {
            next.name = name.trim().to_string();
        }
        if let Some(email) = email {
            next.email = email.trim().to_string();
        }
        self.commit(next)
    }

    /// Record skills, ignoring blanks and ones already present, then save
    ///
    /// Returns how many were added.
    ///
    /// # Errors
    ///
    /// Returns error if saving fails
    pub fn add_skills(&mut self, skills: &[String]) -> Result<usize> {
        let mut next = self.profile.clone();
        let mut added = 0;
        for skill in skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let known = next
                .skills_learned
                .iter()
                .any(|s| s.eq_ignore_ascii_case(skill));
            if !known {
                next.skills_learned.push(skill.to_string());
                added += 1;
            }
        }
        if added > 0 {
            self.commit(next)?;
        }
        Ok(added)
    }

    /// Count one sent prompt and save
    ///
    /// The in-memory count only changes once the file is written.
    ///
    /// # Errors
    ///
    /// Returns error if saving fails
    pub fn record_chat(&mut self) -> Result<()> {
        let mut next = self.profile.clone();
        next.total_chats += 1;
        self.commit(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_file, temp_dir};
    use chrono::{Duration, TimeZone};

    fn joined() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_load_or_create_writes_new_profile() {
        let dir = temp_dir();
        let path = dir.path().join("nested").join("profile.yaml");

        let store = ProfileStore::load_or_create(&path, joined()).unwrap();
        assert!(path.exists());
        assert!(store.profile().id.starts_with("learner_"));
        assert_eq!(store.profile().name, "Learner");
        assert_eq!(store.profile().total_chats, 0);

        let reopened = ProfileStore::load_or_create(&path, Utc::now()).unwrap();
        assert_eq!(reopened.profile(), store.profile());
    }

    #[test]
    fn test_load_existing_profile() {
        let dir = temp_dir();
        let path = create_test_file(
            &dir,
            "profile.yaml",
            "id: u-42\nname: Grace\njoin_date: 2024-01-10T09:00:00Z\ntotal_chats: 7\n",
        );
        let store = ProfileStore::load_or_create(&path, Utc::now()).unwrap();
        assert_eq!(store.profile().identity(), UserIdentity::new("u-42", "Grace"));
        assert_eq!(store.profile().total_chats, 7);
        assert!(store.profile().email.is_empty());
    }

    #[test]
    fn test_corrupt_profile_is_error() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "profile.yaml", "id: [");
        let err = ProfileStore::load_or_create(&path, Utc::now())
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to parse profile"));
    }

    #[test]
    fn test_record_chat_persists() {
        let dir = temp_dir();
        let path = dir.path().join("profile.yaml");
        let mut store = ProfileStore::load_or_create(&path, joined()).unwrap();
        store.record_chat().unwrap();
        store.record_chat().unwrap();

        let reopened = ProfileStore::load_or_create(&path, Utc::now()).unwrap();
        assert_eq!(reopened.profile().total_chats, 2);
    }

    #[test]
    fn test_failed_save_leaves_profile_unchanged() {
        let dir = temp_dir();
        let mut store = ProfileStore::load_or_create(dir.path().join("p.yaml"), joined()).unwrap();
        store.record_chat().unwrap();

        // A regular file where the parent directory should be
        let blocker = create_test_file(&dir, "blocker", "");
        let good_path = store.path.clone();
        store.path = blocker.join("p.yaml");

        assert!(store.record_chat().is_err());
        assert!(store.update(Some("Ada"), None).is_err());
        assert!(store.add_skills(&["Rust".to_string()]).is_err());
        assert_eq!(store.profile().total_chats, 1);
        assert_eq!(store.profile().name, "Learner");
        assert!(store.profile().skills_learned.is_empty());

        store.path = good_path.clone();
        store.record_chat().unwrap();
        let reopened = ProfileStore::load_or_create(&good_path, Utc::now()).unwrap();
        assert_eq!(reopened.profile().total_chats, 2);
    }

    #[test]
    fn test_open_existing_does_not_create() {
        let dir = temp_dir();
        let path = dir.path().join("missing.yaml");

        assert!(ProfileStore::open_existing(Some(path.clone()))
            .unwrap()
            .is_none());
        assert!(!path.exists());

        ProfileStore::load_or_create(&path, joined()).unwrap();
        let store = ProfileStore::open_existing(Some(path)).unwrap().unwrap();
        assert_eq!(store.profile().name, "Learner");
    }

    #[test]
    fn test_update_rejects_invalid_email_without_changes() {
        let dir = temp_dir();
        let mut store = ProfileStore::load_or_create(dir.path().join("p.yaml"), joined()).unwrap();

        assert!(store.update(Some("Ada"), Some("not-an-email")).is_err());
        assert_eq!(store.profile().name, "Learner");

        store
            .update(Some("  Ada  "), Some("ada@example.com"))
            .unwrap();
        assert_eq!(store.profile().name, "Ada");
        assert_eq!(store.profile().email, "ada@example.com");
    }

    #[test]
    fn test_add_skills_deduplicates() {
        let dir = temp_dir();
        let mut store = ProfileStore::load_or_create(dir.path().join("p.yaml"), joined()).unwrap();
        let added = store
            .add_skills(&["Rust".to_string(), " ".to_string(), "rust".to_string()])
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(store.profile().skills_learned, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_stats_days_active_at_least_one() {
        let profile = UserProfile::new(joined());
        assert_eq!(profile.stats(joined()).days_active, 1);
        assert_eq!(profile.stats(joined() + Duration::hours(30)).days_active, 1);
        assert_eq!(profile.stats(joined() + Duration::days(12)).days_active, 12);
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b").is_ok());
        assert!(validate_email("@b").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("plain").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ada").is_ok());
        assert!(validate_name("   ").is_err());
    }
}
