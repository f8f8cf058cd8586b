//! `config <kind> create`가 복사하는 기본 문서 템플릿.

use crate::domain::config::ConfigKind;

const PLATFORM_TEMPLATE: &str = r#"# Babylon platform configuration
# Empty values are treated as unset.

# Base URL of the platform REST API
api_url:
# OAuth scope requested for API tokens
api_scope:

# Service principal (client credentials flow)
tenant_id:
client_id:
# Name of the environment variable holding the client secret
client_secret_env:

# Alternatives: read a token from an environment variable or a command.
# `{scope}` in token_command is replaced with api_scope.
token_env:
token_command:

subscription_id:
resource_group_name:
cluster_name:
"#;

const DEPLOYMENT_TEMPLATE: &str = r#"# Babylon deployment configuration
# Empty values are treated as unset. Platform values are used as fallback.

organization_id:
workspace_id:
solution_id:
dataset_id:
runner_id:
run_id:
database_name:
"#;

pub fn template_for(kind: ConfigKind) -> &'static str {
    match kind {
        ConfigKind::Platform => PLATFORM_TEMPLATE,
        ConfigKind::Deployment => DEPLOYMENT_TEMPLATE,
    }
}
