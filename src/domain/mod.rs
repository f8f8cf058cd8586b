//! Domain layer
//! 설정 종류, 플레이스홀더 템플릿, 리소스 테이블 등 I/O 없는 규칙을 표현한다.

pub mod api;
pub mod config;
pub mod placeholder;
pub mod resource;
