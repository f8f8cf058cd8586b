//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::application::datastore::DataStore;
use crate::application::errors::BabylonError;
use crate::application::resolver::KeyResolver;
use crate::domain::api::{ApiError, ApiRequest};
use crate::domain::config::{ConfigDocument, ConfigKind};

/// platform/deployment 문서와 현재 선택 상태를 보관하는 저장소 포트.
pub trait ConfigStore: Send + Sync {
    /// 저장소 루트 디렉터리(진단 출력용).
    fn root(&self) -> PathBuf;
    fn list(&self, kind: ConfigKind) -> Result<Vec<String>>;
    fn selected(&self, kind: ConfigKind) -> Result<Option<String>>;
    /// 문서가 없으면 실패하고 선택 상태는 그대로 둔다.
    fn select(&self, kind: ConfigKind, name: &str) -> Result<()>;
    fn clear_selection(&self, kind: ConfigKind) -> Result<()>;
    fn load(&self, kind: ConfigKind, name: &str) -> Result<ConfigDocument>;
    fn save(&self, kind: ConfigKind, name: &str, document: &ConfigDocument) -> Result<()>;
    /// 종류별 템플릿을 복사해 새 문서를 만들고 경로를 반환한다.
    fn create(&self, kind: ConfigKind, name: &str) -> Result<PathBuf>;
    fn delete(&self, kind: ConfigKind, name: &str) -> Result<()>;
    fn document_path(&self, kind: ConfigKind, name: &str) -> PathBuf;
}

/// bearer 토큰 발급 포트. 내부 OAuth 로직은 구현체에 숨긴다.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn get_token(&self, scope: &str) -> Result<String, BabylonError>;
}

/// 현재 설정에 맞는 토큰 공급자를 만드는 팩토리 포트.
pub trait CredentialFactory: Send + Sync {
    fn build(&self, resolver: &KeyResolver) -> Box<dyn CredentialProvider>;
}

/// 원격 REST API 호출 포트. 모든 실패는 `ApiError` 하나로 수렴한다.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn send(&self, request: &ApiRequest, token: &str) -> Result<Value, ApiError>;
}

/// base URL별 API 게이트웨이를 만드는 팩토리 포트.
pub trait ApiGatewayFactory: Send + Sync {
    fn build(&self, base_url: &str) -> Result<Box<dyn ApiGateway>>;
}

/// 파괴적 동작 전 사용자 확인 포트.
pub trait UserConfirmer: Send + Sync {
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// 설정 문서를 대화형으로 편집하는 포트.
pub trait DocumentEditor: Send + Sync {
    fn edit(&self, path: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub format: OutputFormat,
    /// 지정되면 stdout 대신 파일에 JSON을 기록한다.
    pub output_file: Option<PathBuf>,
}

/// API 응답 출력 포트.
pub trait OutputWriter: Send + Sync {
    fn write(&self, value: &Value, options: &OutputOptions) -> Result<()>;
}

/// 콘솔/로그 출력 추상화 포트.
pub trait Reporter: Send + Sync {
    fn section(&self, name: &str);
    fn kv(&self, key: &str, value: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn raw(&self, line: &str);
}

/// 매크로 한 단계(CLI 인자 벡터)를 실행하는 포트.
#[async_trait]
pub trait StepRunner: Send + Sync {
    async fn run_step(&self, args: &[String], datastore: &DataStore) -> Result<Option<Value>>;
}
