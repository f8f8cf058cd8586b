//! bearer 토큰 해석 체인.
//!
//! 순서: `$BABYLON_ACCESS_TOKEN` → `token_env` → client credentials → `token_command`.
//! 토큰 값은 로그에 남기지 않는다.

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use super::config::utils::{command_exists, split_command};
use crate::application::errors::BabylonError;
use crate::application::ports::CredentialProvider;
use crate::application::resolver::KeyResolver;
use crate::domain::config::KeyScope;

pub const ACCESS_TOKEN_ENV: &str = "BABYLON_ACCESS_TOKEN";
const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// platform 문서에서 읽은 인증 관련 설정.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSettings {
    pub token_env: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret_env: Option<String>,
    pub token_command: Option<String>,
}

impl CredentialSettings {
    pub fn from_resolver(resolver: &KeyResolver) -> Self {
        let get = |key: &str| {
            resolver
                .resolve(key, KeyScope::Platform)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };
        Self {
            token_env: get("token_env"),
            tenant_id: get("tenant_id"),
            client_id: get("client_id"),
            client_secret_env: get("client_secret_env"),
            token_command: get("token_command"),
        }
    }
}

pub struct ChainCredentialProvider {
    client: Client,
    settings: CredentialSettings,
    authority_host: String,
    lookup_env: EnvLookup,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ChainCredentialProvider {
    pub fn new(settings: CredentialSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
            authority_host: AUTHORITY_HOST.to_string(),
            lookup_env: Arc::new(|name: &str| env::var(name).ok()),
        }
    }

    /// 환경변수 조회를 대체한다.
    #[cfg(test)]
    fn with_env_lookup(
        mut self,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.lookup_env = Arc::new(lookup);
        self
    }

    fn env_value(&self, name: &str) -> Option<String> {
        (self.lookup_env)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    async fn client_credentials(
        &self,
        tenant: &str,
        client_id: &str,
        secret: &str,
        scope: &str,
    ) -> Result<String, String> {
        let url = format!(
            "{}/{tenant}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/')
        );
        let resp = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id),
                ("client_secret", secret),
                ("scope", scope),
            ])
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("token endpoint returned {status}"));
        }
        resp.json::<TokenResponse>()
            .await
            .map(|t| t.access_token)
            .map_err(|e| format!("invalid token response: {e}"))
    }

    async fn run_token_command(&self, command: &str, scope: &str) -> Result<String, String> {
        let (program, args) = split_command(command).map_err(|e| e.to_string())?;
        let args: Vec<String> = args
            .iter()
            .map(|arg| arg.replace("{scope}", scope))
            .collect();
        if !command_exists(&program) {
            return Err(format!("`{program}` not found"));
        }

        let output = Command::new(&program)
            .args(&args)
            .output()
            .await
            .map_err(|e| format!("failed to run `{program}`: {e}"))?;
        if !output.status.success() {
            return Err(format!("`{program}` exited with {}", output.status));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(format!("`{program}` printed nothing"));
        }
        Ok(token)
    }
}

#[async_trait]
impl CredentialProvider for ChainCredentialProvider {
    async fn get_token(&self, scope: &str) -> Result<String, BabylonError> {
        let mut tried = Vec::new();

        if let Some(token) = self.env_value(ACCESS_TOKEN_ENV) {
            debug!(source = ACCESS_TOKEN_ENV, "using access token from environment");
            return Ok(token);
        }
        tried.push(format!("env:{ACCESS_TOKEN_ENV} (unset)"));

        if let Some(name) = &self.settings.token_env {
            if let Some(token) = self.env_value(name) {
                debug!(source = %name, "using access token from token_env");
                return Ok(token);
            }
            tried.push(format!("env:{name} (unset)"));
        }

        let s = &self.settings;
        if let (Some(tenant), Some(client_id), Some(secret_env)) =
            (&s.tenant_id, &s.client_id, &s.client_secret_env)
        {
            match self.env_value(secret_env) {
                Some(secret) => {
                    match self
                        .client_credentials(tenant, client_id, &secret, scope)
                        .await
                    {
                        Ok(token) => {
                            debug!(tenant = %tenant, "acquired token with client credentials");
                            return Ok(token);
                        }
                        Err(reason) => {
                            warn!(reason = %reason, "client credentials flow failed");
                            tried.push(format!("client credentials ({reason})"));
                        }
                    }
                }
                None => tried.push(format!("client credentials (env:{secret_env} unset)")),
            }
        }

        if let Some(command) = &s.token_command {
            match self.run_token_command(command, scope).await {
                Ok(token) => {
                    debug!("acquired token from token_command");
                    return Ok(token);
                }
                Err(reason) => tried.push(format!("token_command ({reason})")),
            }
        }

        Err(BabylonError::AuthenticationFailed(format!(
            "no credential source produced a token; tried {}",
            tried.join(", ")
        )))
    }
}
