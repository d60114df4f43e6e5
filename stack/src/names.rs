use serde::Serialize;
use stack_config::{
    ConfigError, ConfigResult, EnvSnapshot, ResolvedConfig, APP_NAME_ENV, IMAGE_NAME_ENV,
    STAGE_NAME_ENV,
};

/// Identifiers computed from the resolved configuration and the selected
/// stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedNames {
    pub stage_name: String,
    pub app_name: String,
    pub image_name: String,
}

impl DerivedNames {
    pub fn derive(
        config: &ResolvedConfig,
        env: &EnvSnapshot,
        ambient_stack: Option<&str>,
    ) -> ConfigResult<Self> {
        let stage_name = stage_name(env, ambient_stack)?;
        let app_name = env
            .get(APP_NAME_ENV)
            .map(str::to_string)
            .unwrap_or_else(|| default_app_name(&stage_name));
        let image_name = env
            .get(IMAGE_NAME_ENV)
            .map(str::to_string)
            .unwrap_or_else(|| default_image_name(&config.project_name, &app_name));

        Ok(Self {
            stage_name,
            app_name,
            image_name,
        })
    }

    pub fn database_instance(&self) -> String {
        format!("{}-database-instance", self.app_name)
    }

    pub fn database(&self) -> String {
        format!("{}-database", self.app_name)
    }

    pub fn pipeline_binding(&self) -> String {
        format!("{}-pipeline", self.app_name)
    }

    pub fn service_binding(&self) -> String {
        format!("{}-service", self.app_name)
    }
}

/// `NOTEJAM_STAGE_NAME`, else the selected stack.
pub fn stage_name(env: &EnvSnapshot, ambient_stack: Option<&str>) -> ConfigResult<String> {
    env.get(STAGE_NAME_ENV)
        .or(ambient_stack.filter(|s| !s.is_empty()))
        .map(str::to_string)
        .ok_or(ConfigError::MissingStage {
            env_var: STAGE_NAME_ENV,
        })
}

pub fn default_app_name(stage_name: &str) -> String {
    format!("notejam-{}", stage_name)
}

pub fn default_image_name(project_name: &str, app_name: &str) -> String {
    format!("gcr.io/{}/{}", project_name, app_name)
}
