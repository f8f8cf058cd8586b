//! 선언형 리소스 테이블 기반의 API 명령 유스케이스.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::application::errors::BabylonError;
use crate::application::ports::{
    ApiGatewayFactory, CredentialFactory, OutputOptions, OutputWriter, Reporter, UserConfirmer,
};
use crate::application::resolver::KeyResolver;
use crate::domain::api::ApiRequest;
use crate::domain::config::KeyScope;
use crate::domain::resource::{Operation, ResourceKind};

pub const API_URL_KEY: &str = "api_url";
pub const API_SCOPE_KEY: &str = "api_scope";

/// 명령줄에서 파싱된 리소스 명령 하나.
#[derive(Debug, Clone)]
pub struct ResourceCommand {
    pub kind: ResourceKind,
    pub operation: Operation,
    /// 명령줄로 직접 받은 식별자(`workspace_id` → 값)
    pub explicit_ids: BTreeMap<&'static str, String>,
    pub payload: Option<Value>,
    pub force: bool,
    /// 출력 시 남길 최상위 필드(비어 있으면 전체)
    pub fields: Vec<String>,
    pub output: OutputOptions,
}

impl ResourceCommand {
    pub fn new(kind: ResourceKind, operation: Operation) -> Self {
        Self {
            kind,
            operation,
            explicit_ids: BTreeMap::new(),
            payload: None,
            force: false,
            fields: Vec::new(),
            output: OutputOptions::default(),
        }
    }
}

/// 키 해석 → 확인 → 토큰 → 단일 API 호출 → 출력 순서를 고정한다.
pub struct ResourceCommandUseCase<'a> {
    pub gateway_factory: &'a dyn ApiGatewayFactory,
    pub credential_factory: &'a dyn CredentialFactory,
    pub confirmer: &'a dyn UserConfirmer,
    pub output: &'a dyn OutputWriter,
    pub reporter: &'a dyn Reporter,
}

impl<'a> ResourceCommandUseCase<'a> {
    /// 필수 키가 하나라도 없으면 네트워크 호출 전에 실패한다.
    pub async fn execute(&self, resolver: &KeyResolver, command: ResourceCommand) -> Result<Value> {
        let spec = command.kind.spec();
        let op = command.operation;
        if !spec.supports(op) {
            bail!("`{}` does not support `{}`", spec.name, op.name());
        }

        let mut ids = BTreeMap::new();
        for key in spec.required_keys(op) {
            let explicit = command.explicit_ids.get(key).map(String::as_str);
            ids.insert(key, resolver.require_or(explicit, key, KeyScope::Deployment)?);
        }

        let payload = match (op.needs_payload(), command.payload) {
            (true, None) => bail!("`{} {}` requires --payload", spec.name, op.name()),
            (true, Some(payload)) => Some(payload),
            (false, _) => None,
        };

        let api_url = resolver.require(API_URL_KEY, KeyScope::Platform)?;
        let gateway = self.gateway_factory.build(&api_url)?;

        let mut request = ApiRequest::new(op.method(), spec.path(op, &ids));
        if let Some(payload) = payload {
            request = request.with_body(payload);
        }

        if op.is_destructive() && !command.force {
            let target = ids.get(spec.id_key).map(String::as_str).unwrap_or_default();
            let question = format!("delete {} `{}`?", spec.name, target);
            if !self.confirmer.confirm(&question)? {
                self.reporter.warn("nothing was deleted");
                return Err(BabylonError::UserDeclinedConfirmation.into());
            }
        }

        let api_scope = resolver.require(API_SCOPE_KEY, KeyScope::Platform)?;
        let token = self
            .credential_factory
            .build(resolver)
            .get_token(&api_scope)
            .await?;

        debug!(method = %request.method, path = %request.path, "sending API request");
        let response = gateway
            .send(&request, &token)
            .await
            .map_err(BabylonError::from)?;
        info!(resource = spec.name, operation = op.name(), "API request succeeded");

        if op.is_destructive() {
            let target = ids.get(spec.id_key).map(String::as_str).unwrap_or_default();
            self.reporter
                .success(&format!("{} `{}` deleted", spec.name, target));
        }
        if !response.is_null() {
            let shown = project_fields(&response, &command.fields);
            self.output.write(&shown, &command.output)?;
            if let Some(path) = &command.output.output_file {
                self.reporter
                    .success(&format!("response written to {}", path.display()));
            }
        }

        Ok(response)
    }
}

/// 객체(또는 객체 배열)에서 지정한 최상위 필드만 남긴다.
pub fn project_fields(value: &Value, fields: &[String]) -> Value {
    if fields.is_empty() {
        return value.clone();
    }
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| project_fields(item, fields))
                .collect(),
        ),
        Value::Object(map) => {
            let picked: Map<String, Value> = fields
                .iter()
                .filter_map(|f| map.get(f).map(|v| (f.clone(), v.clone())))
                .collect();
            Value::Object(picked)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn projection_keeps_requested_fields_on_each_item() {
        let value = json!([
            { "id": "w-1", "name": "one", "key": "k1" },
            { "id": "w-2", "name": "two" }
        ]);
        let fields = vec!["id".to_string(), "key".to_string()];
        assert_eq!(
            project_fields(&value, &fields),
            json!([{ "id": "w-1", "key": "k1" }, { "id": "w-2" }])
        );
    }

    #[test]
    fn projection_without_fields_is_identity() {
        let value = json!({ "id": "o-1" });
        assert_eq!(project_fields(&value, &[]), value);
    }
}
