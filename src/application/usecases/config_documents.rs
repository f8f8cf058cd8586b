//! platform/deployment 문서 관리 유스케이스.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::application::errors::BabylonError;
use crate::application::ports::{ConfigStore, DocumentEditor, Reporter, UserConfirmer};
use crate::domain::config::{ConfigKind, KeyScope};

/// 목록 출력용 항목.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub name: String,
    pub selected: bool,
}

pub struct ConfigDocumentsUseCase<'a> {
    pub store: &'a dyn ConfigStore,
    pub editor: &'a dyn DocumentEditor,
    pub confirmer: &'a dyn UserConfirmer,
    pub reporter: &'a dyn Reporter,
}

impl<'a> ConfigDocumentsUseCase<'a> {
    pub fn list(&self, kind: ConfigKind) -> Result<Vec<DocumentEntry>> {
        let selected = self.store.selected(kind)?;
        Ok(self
            .store
            .list(kind)?
            .into_iter()
            .map(|name| DocumentEntry {
                selected: selected.as_deref() == Some(name.as_str()),
                name,
            })
            .collect())
    }

    pub fn select(&self, kind: ConfigKind, name: &str) -> Result<()> {
        self.store.select(kind, name)?;
        info!(%kind, name, "configuration selected");
        self.reporter.success(&format!("{kind} `{name}` selected"));
        Ok(())
    }

    /// 템플릿으로 문서를 만들고, 같은 종류의 선택이 없으면 새 문서를 선택한다.
    pub fn create(&self, kind: ConfigKind, name: &str, open_editor: bool) -> Result<PathBuf> {
        let path = self.store.create(kind, name)?;
        self.reporter
            .success(&format!("{kind} `{name}` created at {}", path.display()));

        if self.store.selected(kind)?.is_none() {
            self.store.select(kind, name)?;
            self.reporter.kv("selected", name);
        }

        if open_editor {
            self.editor.edit(&path)?;
            self.store.load(kind, name)?;
        }
        Ok(path)
    }

    /// 편집 후 다시 읽어 평탄한 문서인지 검증한다.
    pub fn edit(&self, kind: ConfigKind, name: Option<&str>) -> Result<()> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.require_selected(kind)?,
        };
        // 존재 확인
        self.store.load(kind, &name)?;

        self.editor.edit(&self.store.document_path(kind, &name))?;
        self.store.load(kind, &name)?;
        self.reporter.success(&format!("{kind} `{name}` is valid"));
        Ok(())
    }

    pub fn set(&self, kind: ConfigKind, key: &str, value: &str) -> Result<()> {
        let name = self.require_selected(kind)?;
        let mut document = self.store.load(kind, &name)?;
        document.set(key, value);
        self.store.save(kind, &name, &document)?;
        info!(%kind, name, key, "configuration key updated");
        Ok(())
    }

    pub fn get(&self, kind: ConfigKind, key: &str) -> Result<String> {
        let name = self.require_selected(kind)?;
        let document = self.store.load(kind, &name)?;
        let scope = match kind {
            ConfigKind::Platform => KeyScope::Platform,
            ConfigKind::Deployment => KeyScope::Deployment,
        };
        document.get(key).map(ToString::to_string).ok_or_else(|| {
            BabylonError::MissingConfigurationKey {
                key: key.to_string(),
                scope,
            }
            .into()
        })
    }

    /// 선택된 문서를 지우면 선택도 해제한다.
    pub fn delete(&self, kind: ConfigKind, name: &str, force: bool) -> Result<()> {
        // 확인 전에 존재 여부를 먼저 검사한다.
        self.store.load(kind, name)?;

        if !force && !self.confirmer.confirm(&format!("delete {kind} `{name}`?"))? {
            self.reporter.warn("nothing was deleted");
            return Err(BabylonError::UserDeclinedConfirmation.into());
        }

        self.store.delete(kind, name)?;
        if self.store.selected(kind)?.as_deref() == Some(name) {
            self.store.clear_selection(kind)?;
            self.reporter.warn(&format!("{kind} selection cleared"));
        }
        self.reporter.success(&format!("{kind} `{name}` deleted"));
        Ok(())
    }

    fn require_selected(&self, kind: ConfigKind) -> Result<String> {
        self.store
            .selected(kind)?
            .ok_or_else(|| BabylonError::NoSelection { kind }.into())
    }
}
