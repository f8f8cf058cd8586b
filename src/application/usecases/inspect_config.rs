//! 현재 적용 중인 설정을 점검하는 유스케이스.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::application::ports::ConfigStore;
use crate::application::resolver::KeyResolver;
use crate::domain::config::{ConfigKind, KeyScope};

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub config_dir: String,
    pub platform: DocumentInspection,
    pub deployment: DocumentInspection,
    /// deployment 범위로 해석한 최종 값(deployment 우선, platform 폴백)
    pub effective: BTreeMap<String, EffectiveValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentInspection {
    pub available: Vec<String>,
    pub selected: Option<String>,
    pub path: Option<String>,
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveValue {
    pub value: String,
    pub source: String,
}

pub struct InspectConfigUseCase<'a> {
    pub store: &'a dyn ConfigStore,
}

impl<'a> InspectConfigUseCase<'a> {
    pub fn execute(&self) -> Result<ConfigInspection> {
        let resolver = KeyResolver::from_store(self.store)?;
        let platform = self.document(ConfigKind::Platform, &resolver)?;
        let deployment = self.document(ConfigKind::Deployment, &resolver)?;

        let mut effective = BTreeMap::new();
        let keys = platform.values.keys().chain(deployment.values.keys());
        for key in keys {
            let Some(value) = resolver.resolve(key, KeyScope::Deployment) else {
                continue;
            };
            let source = if resolver.document(ConfigKind::Deployment).get(key).is_some() {
                ConfigKind::Deployment
            } else {
                ConfigKind::Platform
            };
            effective.insert(
                key.clone(),
                EffectiveValue {
                    value: value.to_string(),
                    source: source.to_string(),
                },
            );
        }

        Ok(ConfigInspection {
            config_dir: self.store.root().display().to_string(),
            platform,
            deployment,
            effective,
        })
    }

    /// 점검 결과를 JSON 값으로 반환한다.
    pub fn execute_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.execute()?)?)
    }

    fn document(&self, kind: ConfigKind, resolver: &KeyResolver) -> Result<DocumentInspection> {
        let selected = self.store.selected(kind)?;
        Ok(DocumentInspection {
            available: self.store.list(kind)?,
            path: selected
                .as_deref()
                .map(|name| self.store.document_path(kind, name).display().to_string()),
            selected,
            values: resolver
                .document(kind)
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }
}
