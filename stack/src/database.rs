//! Cloud SQL settings selected from the high-availability flag.

use model::{AvailabilityType, BackupConfiguration, DatabaseSettings};
use stack_config::{ConfigError, ConfigKey, ConfigResult, ResolvedConfig};
use tracing::warn;

/// Parses a boolean flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off`,
/// ignoring case and surrounding whitespace. The spelling is not
/// truthiness: `"false"` is `false`, and an empty or blank value is an
/// `InvalidValue` error rather than a silent `false`.
pub fn coerce_flag(key: ConfigKey, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.config_key(),
            value: raw.to_string(),
            reason: "expected true/false, 1/0, yes/no or on/off".to_string(),
        }),
    }
}

/// Single zone, no backups, no binary log.
pub fn zonal(tier: &str) -> DatabaseSettings {
    DatabaseSettings {
        tier: tier.to_string(),
        availability_type: AvailabilityType::Zonal,
        backup_configuration: BackupConfiguration {
            binary_log_enabled: false,
            enabled: false,
        },
    }
}

/// Regional standby with backups and binary log.
pub fn regional(tier: &str) -> DatabaseSettings {
    DatabaseSettings {
        tier: tier.to_string(),
        availability_type: AvailabilityType::Regional,
        backup_configuration: BackupConfiguration {
            binary_log_enabled: true,
            enabled: true,
        },
    }
}

pub struct DatabaseSettingsSelector;

impl DatabaseSettingsSelector {
    /// Selects the instance settings for a coerced `db_ha` value.
    ///
    /// The mapping is inverted relative to the flag's name and is kept that
    /// way for compatibility with existing stacks: `false` selects the
    /// regional standby with backups, `true` selects a single zone without
    /// backups.
    pub fn select(high_availability: bool, tier: &str) -> DatabaseSettings {
        let settings = if high_availability {
            zonal(tier)
        } else {
            regional(tier)
        };
        warn!(
            db_ha = high_availability,
            availability_type = %settings.availability_type,
            "db_ha is inverted: true selects ZONAL without backups, false selects REGIONAL with backups"
        );
        settings
    }

    pub fn from_config(config: &ResolvedConfig) -> ConfigResult<DatabaseSettings> {
        let high_availability =
            coerce_flag(ConfigKey::DbHighAvailability, &config.db_high_availability)?;
        Ok(Self::select(high_availability, &config.db_node_size))
    }
}
