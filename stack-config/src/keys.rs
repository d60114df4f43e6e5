use std::fmt;

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "NOTEJAM_";

pub const STAGE_NAME_ENV: &str = "NOTEJAM_STAGE_NAME";
pub const APP_NAME_ENV: &str = "NOTEJAM_APP_NAME";
pub const IMAGE_NAME_ENV: &str = "NOTEJAM_IMAGE_NAME";

/// Required configuration values, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ProjectName,
    ProjectNumber,
    Location,
    Repository,
    DbUser,
    DbPass,
    DbHighAvailability,
    DbNodeSize,
    Owner,
    Branch,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 10] = [
        ConfigKey::ProjectName,
        ConfigKey::ProjectNumber,
        ConfigKey::Location,
        ConfigKey::Repository,
        ConfigKey::DbUser,
        ConfigKey::DbPass,
        ConfigKey::DbHighAvailability,
        ConfigKey::DbNodeSize,
        ConfigKey::Owner,
        ConfigKey::Branch,
    ];

    /// Key name in the stack configuration file.
    pub fn config_key(&self) -> &'static str {
        match self {
            ConfigKey::ProjectName => "project_name",
            ConfigKey::ProjectNumber => "project_number",
            ConfigKey::Location => "location",
            ConfigKey::Repository => "repository",
            ConfigKey::DbUser => "db_user",
            ConfigKey::DbPass => "db_pass",
            ConfigKey::DbHighAvailability => "db_ha",
            ConfigKey::DbNodeSize => "db_node_size",
            ConfigKey::Owner => "owner",
            ConfigKey::Branch => "branch",
        }
    }

    /// Environment variable that overrides the key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ConfigKey::ProjectName => "NOTEJAM_PROJECT_NAME",
            ConfigKey::ProjectNumber => "NOTEJAM_PROJECT_NUMBER",
            ConfigKey::Location => "NOTEJAM_LOCATION",
            ConfigKey::Repository => "NOTEJAM_REPOSITORY_NAME",
            ConfigKey::DbUser => "NOTEJAM_DB_USER",
            ConfigKey::DbPass => "NOTEJAM_DB_PASS",
            ConfigKey::DbHighAvailability => "NOTEJAM_DB_HA",
            ConfigKey::DbNodeSize => "NOTEJAM_DB_NODE_SIZE",
            ConfigKey::Owner => "NOTEJAM_REPOSITORY_OWNER",
            ConfigKey::Branch => "NOTEJAM_BRANCH_NAME",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, ConfigKey::DbPass)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}
