//! 디스크 기반 YAML 설정 저장소.
//!
//! 탐색 경로: `$BABYLON_CONFIG_DIR` → `<config_dir>/babylon`
//! - `platforms/<name>.yaml`
//! - `deployments/<name>.yaml`
//! - `selection.yaml`

mod document;
mod store;
mod templates;
pub mod utils;

pub use document::{parse_document, render_document};
pub use store::{CONFIG_DIR_ENV, YamlConfigStore, default_config_dir};
pub use templates::template_for;
