//! Where configuration values come from: a one-time snapshot of the
//! process environment, and the per-stack TOML file.

use crate::error::{ConfigError, ConfigResult};
use crate::keys::ENV_PREFIX;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A named source of required configuration keys.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<&str>;

    /// Human-readable origin used in logs.
    fn describe(&self) -> String;
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }

    fn describe(&self) -> String {
        "in-memory configuration".to_string()
    }
}

/// Environment overrides captured once at startup.
///
/// Empty values count as unset.
#[derive(Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Captures every `NOTEJAM_*` variable from the process environment.
    pub fn capture() -> Self {
        let snapshot =
            Self::from_vars(std::env::vars().filter(|(k, _)| k.starts_with(ENV_PREFIX)));
        debug!(variables = snapshot.len(), "captured environment overrides");
        snapshot
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.vars.keys().collect();
        names.sort();
        f.debug_struct("EnvSnapshot").field("vars", &names).finish()
    }
}

#[derive(Debug, Deserialize)]
struct StackFileDocument {
    #[serde(default, deserialize_with = "deserialize_values_lax")]
    config: BTreeMap<String, String>,
}

/// Per-stack configuration file, `Notejam.<stack>.toml` by default.
///
/// ```toml
/// [config]
/// project_name = "proj1"
/// project_number = 123456789
/// db_ha = true
/// ```
#[derive(Debug, Clone)]
pub struct StackFile {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl StackFile {
    pub fn default_path(stack: &str) -> PathBuf {
        PathBuf::from(format!("Notejam.{}.toml", stack))
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::ConfigFileNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        let file = Self::parse(path, &contents)?;
        debug!(path = %path.display(), keys = file.values.len(), "loaded stack file");
        Ok(file)
    }

    pub fn parse(path: impl Into<PathBuf>, contents: &str) -> ConfigResult<Self> {
        let path = path.into();
        let document: StackFileDocument =
            toml::from_str(contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            values: document.config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl ConfigSource for StackFile {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn deserialize_values_lax<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, toml::Value>::deserialize(deserializer)?;

    raw.into_iter()
        .map(|(key, value)| match value {
            toml::Value::String(s) => Ok((key, s)),
            toml::Value::Integer(n) => Ok((key, n.to_string())),
            toml::Value::Float(n) => Ok((key, n.to_string())),
            toml::Value::Boolean(b) => Ok((key, b.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected a string, number or boolean for '{}', found {}",
                key,
                other.type_str()
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_snapshot_treats_empty_as_unset() {
        let env = EnvSnapshot::from_vars([("NOTEJAM_LOCATION", ""), ("NOTEJAM_DB_HA", "true")]);
        assert_eq!(env.get("NOTEJAM_LOCATION"), None);
        assert_eq!(env.get("NOTEJAM_DB_HA"), Some("true"));
        assert_eq!(env.get("NOTEJAM_BRANCH_NAME"), None);
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_env_snapshot_debug_hides_values() {
        let env = EnvSnapshot::from_vars([("NOTEJAM_DB_PASS", "hunter2")]);
        let debug = format!("{:?}", env);
        assert!(debug.contains("NOTEJAM_DB_PASS"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_stack_file_coerces_scalars() {
        let file = StackFile::parse(
            "Notejam.prod.toml",
            r#"
            [config]
            project_name = "proj1"
            project_number = 123456789
            db_ha = true
            "#,
        )
        .unwrap();
        assert_eq!(file.get("project_name"), Some("proj1"));
        assert_eq!(file.get("project_number"), Some("123456789"));
        assert_eq!(file.get("db_ha"), Some("true"));
        assert_eq!(file.get("branch"), None);
        assert_eq!(file.describe(), "Notejam.prod.toml");
        assert_eq!(file.keys().count(), 3);
    }

    #[test]
    fn test_stack_file_without_config_table_is_empty() {
        let file = StackFile::parse("empty.toml", "").unwrap();
        assert_eq!(file.keys().count(), 0);
    }

    #[test]
    fn test_stack_file_rejects_tables_as_values() {
        let result = StackFile::parse("bad.toml", "[config]\nlocation = [\"a\", \"b\"]\n");
        match result {
            Err(ConfigError::Parse { path, source }) => {
                assert_eq!(path, PathBuf::from("bad.toml"));
                assert!(source.to_string().contains("location"));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_path() {
        assert_eq!(
            StackFile::default_path("prod"),
            PathBuf::from("Notejam.prod.toml")
        );
    }

    #[test]
    fn test_hash_map_source() {
        let mut map = HashMap::new();
        map.insert("location".to_string(), "europe-west1".to_string());
        assert_eq!(ConfigSource::get(&map, "location"), Some("europe-west1"));
        assert_eq!(ConfigSource::get(&map, "branch"), None);
    }
}
