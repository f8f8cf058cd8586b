//! CLI 인터페이스 모듈 묶음.
//! 인자 치환/파싱/실행/조립을 한 네임스페이스로 관리한다.

pub mod argv;
pub mod command;
pub mod composition;
pub mod dispatch;

pub use command::{Cli, Commands};
pub use composition::AppComposition;
pub use dispatch::CommandRunner;
