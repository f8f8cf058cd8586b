//! 애플리케이션 조립(composition root) 모듈.

use anyhow::Result;

use crate::application::ports::{
    ApiGatewayFactory, ConfigStore, CredentialFactory, DocumentEditor, OutputWriter, Reporter,
    UserConfirmer,
};
use crate::application::usecases::config_documents::ConfigDocumentsUseCase;
use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::application::usecases::resource_command::ResourceCommandUseCase;
use crate::infrastructure::adapters::{
    ChainCredentialFactory, ConsoleOutputWriter, ConsoleReporter, EnvEditor,
    HttpApiGatewayFactory, StdinConfirmer,
};
use crate::infrastructure::config::YamlConfigStore;

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    store: Box<dyn ConfigStore>,
    gateway_factory: Box<dyn ApiGatewayFactory>,
    credential_factory: Box<dyn CredentialFactory>,
    confirmer: Box<dyn UserConfirmer>,
    editor: Box<dyn DocumentEditor>,
    output: Box<dyn OutputWriter>,
    reporter: Box<dyn Reporter>,
}

impl AppComposition {
    /// 기본 설정 디렉터리와 실제 어댑터로 조합한다.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Box::new(YamlConfigStore::from_env()?)))
    }

    /// 저장소만 주입하고 나머지는 콘솔/HTTP 어댑터를 쓴다.
    pub fn new(store: Box<dyn ConfigStore>) -> Self {
        Self {
            store,
            gateway_factory: Box::new(HttpApiGatewayFactory),
            credential_factory: Box::new(ChainCredentialFactory),
            confirmer: Box::new(StdinConfirmer),
            editor: Box::new(EnvEditor),
            output: Box::new(ConsoleOutputWriter),
            reporter: Box::new(ConsoleReporter::new()),
        }
    }

    pub fn with_gateway_factory(mut self, factory: Box<dyn ApiGatewayFactory>) -> Self {
        self.gateway_factory = factory;
        self
    }

    pub fn with_credential_factory(mut self, factory: Box<dyn CredentialFactory>) -> Self {
        self.credential_factory = factory;
        self
    }

    /// 확인 어댑터를 외부에서 주입한다.
    pub fn with_confirmer(mut self, confirmer: Box<dyn UserConfirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    pub fn with_editor(mut self, editor: Box<dyn DocumentEditor>) -> Self {
        self.editor = editor;
        self
    }

    pub fn with_output(mut self, output: Box<dyn OutputWriter>) -> Self {
        self.output = output;
        self
    }

    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn store(&self) -> &dyn ConfigStore {
        self.store.as_ref()
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub fn config_documents_usecase(&self) -> ConfigDocumentsUseCase<'_> {
        ConfigDocumentsUseCase {
            store: self.store.as_ref(),
            editor: self.editor.as_ref(),
            confirmer: self.confirmer.as_ref(),
            reporter: self.reporter.as_ref(),
        }
    }

    /// 설정 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase {
            store: self.store.as_ref(),
        }
    }

    pub fn resource_command_usecase(&self) -> ResourceCommandUseCase<'_> {
        ResourceCommandUseCase {
            gateway_factory: self.gateway_factory.as_ref(),
            credential_factory: self.credential_factory.as_ref(),
            confirmer: self.confirmer.as_ref(),
            output: self.output.as_ref(),
            reporter: self.reporter.as_ref(),
        }
    }
}
