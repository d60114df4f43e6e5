//! Fixed identifiers shared with Google Cloud and the build pipeline. These
//! strings are matched by the provider and must not change.

/// APIs enabled on the project, in declaration order.
pub const REQUIRED_APIS: [&str; 8] = [
    "servicenetworking.googleapis.com",
    "run.googleapis.com",
    "cloudbuild.googleapis.com",
    "compute.googleapis.com",
    "containerregistry.googleapis.com",
    "serviceusage.googleapis.com",
    "sql-component.googleapis.com",
    "sqladmin.googleapis.com",
];

pub const DATABASE_VERSION: &str = "POSTGRES_9_6";

/// Logical name of the database user resource.
pub const DATABASE_USER_RESOURCE: &str = "notejam";

/// Pipeline definition, relative to the repository root.
pub const PIPELINE_FILE: &str = "ci/cloudbuild.yaml";

pub const PIPELINE_ROLE: &str = "roles/editor";
pub const SERVICE_ROLE: &str = "roles/cloudsql.client";

// Container environment
pub const ENV_ENVIRONMENT: &str = "_NOTEJAM_ENVIRONMENT";
pub const ENV_DB_CONN: &str = "_NOTEJAM_DB_CONN";
pub const ENV_DB_USER: &str = "_NOTEJAM_DB_USER";
pub const ENV_DB_PASS: &str = "_NOTEJAM_DB_PASS";
pub const ENV_DB_NAME: &str = "_NOTEJAM_DB_NAME";

// Build substitutions
pub const SUBST_APP: &str = "_APP";
pub const SUBST_SERVICE: &str = "_SERVICE";
pub const SUBST_SQL_CONN: &str = "_SQL_CONN";

/// Cloud Build's service account; deploys to Cloud Run.
pub fn build_service_account(project_number: &str) -> String {
    format!(
        "serviceAccount:{}@cloudbuild.gserviceaccount.com",
        project_number
    )
}

/// Default compute service account; Cloud Run runs as it.
pub fn compute_service_account(project_number: &str) -> String {
    format!(
        "serviceAccount:{}-compute@developer.gserviceaccount.com",
        project_number
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_accounts() {
        assert_eq!(
            build_service_account("123"),
            "serviceAccount:123@cloudbuild.gserviceaccount.com"
        );
        assert_eq!(
            compute_service_account("123"),
            "serviceAccount:123-compute@developer.gserviceaccount.com"
        );
    }
}
