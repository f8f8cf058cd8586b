//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod api_gateway_factory;
mod credential_factory;
mod editor;
mod output_writer;
mod reporter;
mod user_confirmer;

pub use api_gateway_factory::HttpApiGatewayFactory;
pub use credential_factory::ChainCredentialFactory;
pub use editor::EnvEditor;
pub use output_writer::ConsoleOutputWriter;
pub use reporter::ConsoleReporter;
pub use user_confirmer::StdinConfirmer;
