use crate::catalog::{
    build_service_account, compute_service_account, DATABASE_USER_RESOURCE, DATABASE_VERSION,
    ENV_DB_CONN, ENV_DB_NAME, ENV_DB_PASS, ENV_DB_USER, ENV_ENVIRONMENT, PIPELINE_FILE,
    PIPELINE_ROLE, REQUIRED_APIS, SERVICE_ROLE, SUBST_APP, SUBST_SERVICE, SUBST_SQL_CONN,
};
use crate::names::DerivedNames;
use model::{
    Attribute, BuildTrigger, Container, ContainerService, Database, DatabaseInstance,
    DatabaseSettings, DatabaseUser, EnvVar, GithubSource, GraphResult, IamBinding, Input,
    PushFilter, Resource, ResourceGraph, ResourceId, ResourceSpec, ServiceActivation,
    ServiceMetadata,
};
use stack_config::ResolvedConfig;
use std::collections::BTreeMap;
use tracing::info;

/// Turns resolved inputs into the stack's resource graph.
pub struct ResourceGraphBuilder<'a> {
    config: &'a ResolvedConfig,
    names: &'a DerivedNames,
    settings: &'a DatabaseSettings,
}

impl<'a> ResourceGraphBuilder<'a> {
    pub fn new(
        config: &'a ResolvedConfig,
        names: &'a DerivedNames,
        settings: &'a DatabaseSettings,
    ) -> Self {
        Self {
            config,
            names,
            settings,
        }
    }

    pub fn build(&self) -> GraphResult<ResourceGraph> {
        let mut graph = ResourceGraph::new();

        for api in REQUIRED_APIS {
            graph.declare(self.service_activation(api))?;
        }

        let instance = graph.declare(self.database_instance())?;
        graph.declare(self.database(&instance))?;
        graph.declare(self.database_user(&instance))?;
        let service = graph.declare(self.container_service(&instance))?;
        graph.declare(self.build_trigger(&service, &instance))?;
        graph.declare(self.iam_binding(
            self.names.pipeline_binding(),
            PIPELINE_ROLE,
            build_service_account(&self.config.project_number),
        ))?;
        graph.declare(self.iam_binding(
            self.names.service_binding(),
            SERVICE_ROLE,
            compute_service_account(&self.config.project_number),
        ))?;

        info!(
            app = %self.names.app_name,
            resources = graph.len(),
            dependencies = graph.edge_count(),
            "resource graph built"
        );
        Ok(graph)
    }

    fn service_activation(&self, api: &str) -> Resource {
        Resource::new(
            api,
            ResourceSpec::ServiceActivation(ServiceActivation {
                project: self.config.project_name.clone(),
                service: api.to_string(),
                disable_dependent_services: false,
            }),
        )
    }

    fn database_instance(&self) -> Resource {
        Resource::new(
            self.names.database_instance(),
            ResourceSpec::DatabaseInstance(DatabaseInstance {
                project: self.config.project_name.clone(),
                database_version: DATABASE_VERSION.to_string(),
                region: self.config.location.clone(),
                settings: self.settings.clone(),
            }),
        )
    }

    fn database(&self, instance: &ResourceId) -> Resource {
        Resource::new(
            self.names.database(),
            ResourceSpec::Database(Database {
                project: self.config.project_name.clone(),
                instance: Input::output(instance, Attribute::Name),
                name: self.names.app_name.clone(),
            }),
        )
    }

    fn database_user(&self, instance: &ResourceId) -> Resource {
        Resource::new(
            DATABASE_USER_RESOURCE,
            ResourceSpec::DatabaseUser(DatabaseUser {
                project: self.config.project_name.clone(),
                name: self.config.db_user.clone(),
                instance: Input::output(instance, Attribute::Name),
                password: Input::secret(self.config.db_pass.expose()),
            }),
        )
    }

    fn container_service(&self, instance: &ResourceId) -> Resource {
        let envs = vec![
            EnvVar::new(ENV_ENVIRONMENT, Input::value(&self.names.stage_name)),
            EnvVar::new(
                ENV_DB_CONN,
                Input::output(instance, Attribute::ConnectionName),
            ),
            EnvVar::new(ENV_DB_USER, Input::value(&self.config.db_user)),
            EnvVar::new(ENV_DB_PASS, Input::secret(self.config.db_pass.expose())),
            EnvVar::new(ENV_DB_NAME, Input::value(&self.names.app_name)),
        ];

        Resource::new(
            self.names.app_name.clone(),
            ResourceSpec::ContainerService(ContainerService {
                location: self.config.location.clone(),
                project: self.config.project_name.clone(),
                metadata: ServiceMetadata {
                    namespace: self.config.project_name.clone(),
                },
                containers: vec![Container {
                    image: self.names.image_name.clone(),
                    envs,
                }],
            }),
        )
    }

    fn build_trigger(&self, service: &ResourceId, instance: &ResourceId) -> Resource {
        let mut substitutions = BTreeMap::new();
        substitutions.insert(SUBST_APP.to_string(), Input::value(&self.names.app_name));
        substitutions.insert(
            SUBST_SERVICE.to_string(),
            Input::output(service, Attribute::Name),
        );
        substitutions.insert(
            SUBST_SQL_CONN.to_string(),
            Input::output(instance, Attribute::ConnectionName),
        );

        Resource::new(
            self.names.app_name.clone(),
            ResourceSpec::BuildTrigger(BuildTrigger {
                project: self.config.project_name.clone(),
                github: GithubSource {
                    name: self.config.repository_name.clone(),
                    owner: self.config.repository_owner.clone(),
                    push: PushFilter {
                        branch: self.config.branch_name.clone(),
                    },
                },
                description: format!(
                    "notejam build pipeline for stage '{}'",
                    self.names.stage_name
                ),
                substitutions,
                filename: PIPELINE_FILE.to_string(),
            }),
        )
    }

    fn iam_binding(&self, name: String, role: &str, member: String) -> Resource {
        Resource::new(
            name,
            ResourceSpec::IamBinding(IamBinding {
                project: self.config.project_name.clone(),
                role: role.to_string(),
                members: vec![member],
            }),
        )
    }
}
