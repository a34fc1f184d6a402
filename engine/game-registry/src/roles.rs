use crate::types::{RegistryError, RoleEntry};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Role Directory - Maps `armedForceId` values to role display names
///
/// The directory is loaded once by the ingestion layer and handed to the
/// analytics engine as an immutable snapshot. An empty directory (for example
/// one that has not been loaded yet) answers every lookup with a placeholder.
#[derive(Debug, Clone, Default)]
pub struct RoleDirectory {
    /// Map from role id to entry
    roles_by_id: HashMap<i64, RoleEntry>,
}

impl RoleDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self {
            roles_by_id: HashMap::new(),
        }
    }

    /// Build a directory from already parsed entries
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RoleEntry>,
    {
        let roles_by_id = entries.into_iter().map(|entry| (entry.id, entry)).collect();
        Self { roles_by_id }
    }

    /// Load role data from a JSON file shaped as `{ "<id>": "<name>", ... }`
    pub async fn load_from_file<P: AsRef<Path>>(file_path: P) -> Result<Self, RegistryError> {
        info!("Loading role data from: {:?}", file_path.as_ref());

        let json_content = tokio::fs::read_to_string(&file_path).await?;
        let directory = Self::from_json_str(&json_content)?;

        info!("Loaded {} roles from file", directory.len());
        Ok(directory)
    }

    /// Parse role data from a JSON object keyed by role id
    ///
    /// Keys that are not integers are skipped with a warning rather than
    /// rejecting the whole file.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let mut roles_by_id = HashMap::with_capacity(raw.len());

        for (key, name) in raw {
            match parse_role_id(&key) {
                Ok(id) => {
                    roles_by_id.insert(id, RoleEntry::new(id, name));
                }
                Err(e) => warn!("Skipping role entry: {}", e),
            }
        }

        Ok(Self { roles_by_id })
    }

    /// Get a role entry by id
    pub fn get(&self, role_id: i64) -> Option<&RoleEntry> {
        self.roles_by_id.get(&role_id)
    }

    /// Display name for a role id, falling back to a placeholder on a miss
    pub fn display_name(&self, role_id: i64) -> String {
        self.get(role_id)
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| RoleEntry::placeholder_name(role_id))
    }

    /// Get all role entries sorted by id
    pub fn all_roles(&self) -> Vec<&RoleEntry> {
        let mut roles: Vec<&RoleEntry> = self.roles_by_id.values().collect();
        roles.sort_by_key(|entry| entry.id);
        roles
    }

    /// Search for roles by partial name match
    pub fn search(&self, query: &str) -> Vec<&RoleEntry> {
        let query_lower = query.to_lowercase();
        let mut matches: Vec<&RoleEntry> = self
            .roles_by_id
            .values()
            .filter(|entry| entry.name.to_lowercase().contains(&query_lower))
            .collect();
        matches.sort_by_key(|entry| entry.id);
        matches
    }

    /// Number of known roles
    pub fn len(&self) -> usize {
        self.roles_by_id.len()
    }

    /// Check if directory is empty
    pub fn is_empty(&self) -> bool {
        self.roles_by_id.is_empty()
    }
}

fn parse_role_id(key: &str) -> Result<i64, RegistryError> {
    key.trim()
        .parse::<i64>()
        .map_err(|_| RegistryError::InvalidRoleId(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_test_directory() -> RoleDirectory {
        RoleDirectory::from_entries(vec![
            RoleEntry::new(10007, "Vyron"),
            RoleEntry::new(10010, "Hackclaw"),
            RoleEntry::new(20003, "Stinger"),
        ])
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let directory = create_test_directory();

        assert_eq!(directory.len(), 3);
        assert_eq!(directory.display_name(10010), "Hackclaw");
        assert_eq!(directory.display_name(99), "Unknown role (99)");
        assert!(directory.get(99).is_none());
    }

    #[test]
    fn test_empty_directory_uses_placeholders() {
        let directory = RoleDirectory::new();

        assert!(directory.is_empty());
        assert_eq!(directory.display_name(10007), "Unknown role (10007)");
    }

    #[test]
    fn test_from_json_skips_bad_keys() {
        let json = r#"{"10007": "Vyron", "abc": "Broken", " 30001 ": "Luna"}"#;
        let directory = RoleDirectory::from_json_str(json).unwrap();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.display_name(30001), "Luna");
        assert!(directory.search("broken").is_empty());
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(RoleDirectory::from_json_str("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_search_roles() {
        let directory = create_test_directory();

        let results = directory.search("claw");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 10010);

        let all = directory.all_roles();
        let ids: Vec<i64> = all.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![10007, 10010, 20003]);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"10007": "Vyron", "20003": "Stinger"}}"#).unwrap();

        let directory = RoleDirectory::load_from_file(file.path()).await.unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.display_name(20003), "Stinger");
    }

    #[tokio::test]
    async fn test_load_missing_file_is_error() {
        let result = RoleDirectory::load_from_file("/definitely/not/here/roles.json").await;
        assert!(matches!(result, Err(RegistryError::Io(_))));
    }
}
