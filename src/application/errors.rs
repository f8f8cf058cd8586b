//! 명령 경계에서 사용자에게 보고되는 오류 분류.

use thiserror::Error;

use crate::domain::api::ApiError;
use crate::domain::config::{ConfigKind, KeyScope};
use crate::domain::placeholder::TemplateError;

#[derive(Debug, Error)]
pub enum BabylonError {
    #[error("missing configuration key `{key}` in the {scope} configuration")]
    MissingConfigurationKey { key: String, scope: KeyScope },

    #[error("cannot resolve `{marker}`: {reason}")]
    PlaceholderResolution { marker: String, reason: String },

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error(transparent)]
    RemoteApi(#[from] ApiError),

    #[error("operation cancelled by user")]
    UserDeclinedConfirmation,

    #[error("{kind} `{name}` does not exist")]
    ConfigNotFound { kind: ConfigKind, name: String },

    #[error("{kind} `{name}` already exists")]
    ConfigAlreadyExists { kind: ConfigKind, name: String },

    #[error("no {kind} is selected (run `babylon config {kind} select <name>`)")]
    NoSelection { kind: ConfigKind },

    #[error("invalid {kind} document `{name}`: {reason}")]
    InvalidConfig {
        kind: ConfigKind,
        name: String,
        reason: String,
    },
}

impl BabylonError {
    /// 프로세스 종료 코드. 0은 성공 전용이다.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UserDeclinedConfirmation => 3,
            Self::MissingConfigurationKey { .. } | Self::PlaceholderResolution { .. } => 4,
            Self::AuthenticationFailed(_) => 5,
            Self::RemoteApi(_) => 6,
            Self::ConfigNotFound { .. }
            | Self::ConfigAlreadyExists { .. }
            | Self::NoSelection { .. }
            | Self::InvalidConfig { .. } => 1,
        }
    }
}

impl From<TemplateError> for BabylonError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::EmptyKey { namespace } => Self::PlaceholderResolution {
                marker: format!("%{namespace}%"),
                reason: "the marker has no key".to_string(),
            },
        }
    }
}

/// anyhow 오류 체인에서 분류된 오류를 찾아 종료 코드를 정한다.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<BabylonError>())
        .map(BabylonError::exit_code)
        .unwrap_or(1)
}
