//! 명령 단위 유스케이스 모음.

pub mod config_documents;
pub mod inspect_config;
pub mod macro_run;
pub mod resource_command;
