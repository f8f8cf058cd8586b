//! 통합 테스트용 포트 대역(test double).
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use babylon::application::errors::BabylonError;
use babylon::application::ports::{
    ApiGateway, ApiGatewayFactory, CredentialFactory, CredentialProvider,
    DocumentEditor, OutputOptions, OutputWriter, Reporter, UserConfirmer,
};
use babylon::application::resolver::KeyResolver;
use babylon::domain::api::{ApiError, ApiRequest};
use babylon::domain::config::{ConfigDocument, ConfigKind};
use babylon::infrastructure::config::YamlConfigStore;
use babylon::interface::cli::AppComposition;
use serde_json::Value;

pub const TOKEN: &str = "t-static";

/// 요청을 기록하고 고정 응답(또는 고정 오류)을 돌려주는 게이트웨이.
#[derive(Clone)]
pub struct RecordingGateway {
    pub requests: Arc<Mutex<Vec<ApiRequest>>>,
    pub base_urls: Arc<Mutex<Vec<String>>>,
    pub response: Result<Value, ApiError>,
}

impl RecordingGateway {
    pub fn new(response: Value) -> Self {
        Self {
            requests: Arc::default(),
            base_urls: Arc::default(),
            response: Ok(response),
        }
    }

    pub fn failing(error: ApiError) -> Self {
        Self {
            response: Err(error),
            ..Self::new(Value::Null)
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiGateway for RecordingGateway {
    async fn send(&self, request: &ApiRequest, token: &str) -> Result<Value, ApiError> {
        assert_eq!(token, TOKEN);
        self.requests.lock().unwrap().push(request.clone());
        self.response.clone()
    }
}

impl ApiGatewayFactory for RecordingGateway {
    fn build(&self, base_url: &str) -> Result<Box<dyn ApiGateway>> {
        self.base_urls.lock().unwrap().push(base_url.to_string());
        Ok(Box::new(self.clone()))
    }
}

/// 항상 같은 토큰을 내주거나 항상 실패하는 인증 대역. 요청된 scope를 기록한다.
#[derive(Clone, Default)]
pub struct StaticCredentials {
    pub scopes: Arc<Mutex<Vec<String>>>,
    pub failure: Option<String>,
}

impl StaticCredentials {
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn get_token(&self, scope: &str) -> Result<String, BabylonError> {
        self.scopes.lock().unwrap().push(scope.to_string());
        match &self.failure {
            Some(reason) => Err(BabylonError::AuthenticationFailed(reason.clone())),
            None => Ok(TOKEN.to_string()),
        }
    }
}

impl CredentialFactory for StaticCredentials {
    fn build(&self, _resolver: &KeyResolver) -> Box<dyn CredentialProvider> {
        Box::new(self.clone())
    }
}

/// 정해진 답을 하고 질문 횟수를 센다.
#[derive(Clone)]
pub struct ScriptedConfirmer {
    pub answer: bool,
    pub asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConfirmer {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Arc::default(),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.lock().unwrap().len()
    }
}

impl UserConfirmer for ScriptedConfirmer {
    fn confirm(&self, message: &str) -> Result<bool> {
        self.asked.lock().unwrap().push(message.to_string());
        Ok(self.answer)
    }
}

#[derive(Clone, Default)]
pub struct CapturedOutput {
    pub values: Arc<Mutex<Vec<(Value, OutputOptions)>>>,
}

impl CapturedOutput {
    pub fn values(&self) -> Vec<Value> {
        self.values
            .lock()
            .unwrap()
            .iter()
            .map(|(v, _)| v.clone())
            .collect()
    }
}

impl OutputWriter for CapturedOutput {
    fn write(&self, value: &Value, options: &OutputOptions) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .push((value.clone(), options.clone()));
        Ok(())
    }
}

pub struct NoEditor;

impl DocumentEditor for NoEditor {
    fn edit(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// 성공/경고 메시지만 모아 둔다.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    pub successes: Arc<Mutex<Vec<String>>>,
    pub warnings: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn section(&self, _name: &str) {}
    fn kv(&self, _key: &str, _value: &str) {}
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }
    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
    fn error(&self, _message: &str) {}
    fn raw(&self, _line: &str) {}
}

/// 임시 설정 디렉터리와 대역이 주입된 조합.
pub struct Harness {
    pub dir: tempfile::TempDir,
    pub gateway: RecordingGateway,
    pub credentials: StaticCredentials,
    pub confirmer: ScriptedConfirmer,
    pub output: CapturedOutput,
    pub reporter: RecordingReporter,
    pub composition: AppComposition,
}

impl Harness {
    pub fn new(response: Value, confirm: bool) -> Self {
        Self::with_doubles(
            RecordingGateway::new(response),
            StaticCredentials::default(),
            confirm,
        )
    }

    pub fn with_doubles(
        gateway: RecordingGateway,
        credentials: StaticCredentials,
        confirm: bool,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let confirmer = ScriptedConfirmer::new(confirm);
        let output = CapturedOutput::default();
        let reporter = RecordingReporter::default();
        let composition = AppComposition::new(Box::new(YamlConfigStore::new(dir.path())))
            .with_gateway_factory(Box::new(gateway.clone()))
            .with_credential_factory(Box::new(credentials.clone()))
            .with_confirmer(Box::new(confirmer.clone()))
            .with_editor(Box::new(NoEditor))
            .with_output(Box::new(output.clone()))
            .with_reporter(Box::new(reporter.clone()));
        Self {
            dir,
            gateway,
            credentials,
            confirmer,
            output,
            reporter,
            composition,
        }
    }

    /// 문서를 저장하고 선택한다.
    pub fn seed(&self, kind: ConfigKind, name: &str, pairs: &[(&str, &str)]) {
        let store = self.composition.store();
        let document: ConfigDocument = pairs.iter().copied().collect();
        store.save(kind, name, &document).unwrap();
        store.select(kind, name).unwrap();
    }

    /// api_url/api_scope가 있는 platform과 o-1/ws-42 deployment를 준비한다.
    pub fn seed_defaults(&self) {
        self.seed(
            ConfigKind::Platform,
            "azure",
            &[
                ("api_url", "https://api.example.com/v3"),
                ("api_scope", "api://babylon/.default"),
            ],
        );
        self.seed(
            ConfigKind::Deployment,
            "dev",
            &[
                ("organization_id", "o-1"),
                ("workspace_id", "ws-42"),
                ("database_name", "db-main"),
            ],
        );
    }

    pub async fn run(&self, args: &[&str]) -> Result<Option<Value>> {
        let argv: Vec<String> = std::iter::once("babylon")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        babylon::run(&self.composition, &argv).await
    }
}
