//! 선택된 platform/deployment 문서에서 키를 찾는 해석기.

use anyhow::Result;
use tracing::debug;

use crate::application::errors::BabylonError;
use crate::application::ports::ConfigStore;
use crate::domain::config::{ConfigDocument, ConfigKind, KeyScope};

/// 명령 실행 한 번 동안만 쓰이는 키 해석기(호출 간 캐시 없음).
#[derive(Debug, Clone, Default)]
pub struct KeyResolver {
    platform: ConfigDocument,
    deployment: ConfigDocument,
}

impl KeyResolver {
    pub fn new(platform: ConfigDocument, deployment: ConfigDocument) -> Self {
        Self {
            platform,
            deployment,
        }
    }

    /// 저장소에서 현재 선택된 문서를 읽는다. 선택이 없으면 빈 문서로 취급한다.
    pub fn from_store(store: &dyn ConfigStore) -> Result<Self> {
        let platform = load_selected(store, ConfigKind::Platform)?;
        let deployment = load_selected(store, ConfigKind::Deployment)?;
        Ok(Self::new(platform, deployment))
    }

    pub fn document(&self, kind: ConfigKind) -> &ConfigDocument {
        match kind {
            ConfigKind::Platform => &self.platform,
            ConfigKind::Deployment => &self.deployment,
        }
    }

    /// deployment 범위는 deployment → platform 순서로, platform 범위는 platform만 조회한다.
    pub fn resolve(&self, key: &str, scope: KeyScope) -> Option<&str> {
        if key.is_empty() {
            return None;
        }
        scope
            .lookup_order()
            .iter()
            .find_map(|kind| self.document(*kind).get(key))
    }

    /// 값이 없으면 `MissingConfigurationKey`로 실패한다.
    pub fn require(&self, key: &str, scope: KeyScope) -> Result<String, BabylonError> {
        self.resolve(key, scope)
            .map(ToString::to_string)
            .ok_or_else(|| BabylonError::MissingConfigurationKey {
                key: key.to_string(),
                scope,
            })
    }

    /// 명령줄 값이 있으면 우선하고, 없으면 설정에서 필수로 찾는다.
    pub fn require_or(
        &self,
        explicit: Option<&str>,
        key: &str,
        scope: KeyScope,
    ) -> Result<String, BabylonError> {
        match explicit.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => Ok(value.to_string()),
            None => self.require(key, scope),
        }
    }
}

fn load_selected(store: &dyn ConfigStore, kind: ConfigKind) -> Result<ConfigDocument> {
    match store.selected(kind)? {
        Some(name) => {
            debug!(%kind, %name, "loading selected configuration");
            store.load(kind, &name)
        }
        None => {
            debug!(%kind, "no configuration selected");
            Ok(ConfigDocument::new())
        }
    }
}
