//! [`ConfigStore`] 포트의 YAML 파일 구현.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::document::{parse_document, render_document, update_document_text};
use super::templates::template_for;
use crate::application::errors::BabylonError;
use crate::application::ports::ConfigStore;
use crate::domain::config::{ConfigDocument, ConfigKind};

pub const CONFIG_DIR_ENV: &str = "BABYLON_CONFIG_DIR";
const SELECTION_FILE: &str = "selection.yaml";
const EXTENSION: &str = "yaml";

/// 종류별 현재 선택.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Selection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deployment: Option<String>,
}

impl Selection {
    fn slot(&mut self, kind: ConfigKind) -> &mut Option<String> {
        match kind {
            ConfigKind::Platform => &mut self.platform,
            ConfigKind::Deployment => &mut self.deployment,
        }
    }
}

/// 환경변수 → 사용자 설정 디렉터리 순으로 저장소 위치를 정한다.
pub fn default_config_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|base| base.join("babylon"))
        .context("cannot determine the user configuration directory; set BABYLON_CONFIG_DIR")
}

pub struct YamlConfigStore {
    root: PathBuf,
}

impl YamlConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(default_config_dir()?))
    }

    fn kind_dir(&self, kind: ConfigKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    fn selection_path(&self) -> PathBuf {
        self.root.join(SELECTION_FILE)
    }

    fn read_selection(&self) -> Result<Selection> {
        let path = self.selection_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Selection::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        if raw.trim().is_empty() {
            return Ok(Selection::default());
        }
        serde_yaml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// 임시 파일에 쓴 뒤 교체한다(동시 실행 시 마지막 기록이 남는다).
    fn write_selection(&self, selection: &Selection) -> Result<()> {
        let text = serde_yaml::to_string(selection).context("failed to encode selection")?;
        write_replacing(&self.selection_path(), &text)
    }
}

impl ConfigStore for YamlConfigStore {
    fn root(&self) -> PathBuf {
        self.root.clone()
    }

    fn list(&self, kind: ConfigKind) -> Result<Vec<String>> {
        let dir = self.kind_dir(kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).with_context(|| format!("failed to list {}", dir.display())),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn selected(&self, kind: ConfigKind) -> Result<Option<String>> {
        Ok(self.read_selection()?.slot(kind).take())
    }

    fn select(&self, kind: ConfigKind, name: &str) -> Result<()> {
        // 존재/형식 검증이 실패하면 선택 파일은 건드리지 않는다.
        self.load(kind, name)?;
        let mut selection = self.read_selection()?;
        *selection.slot(kind) = Some(name.to_string());
        self.write_selection(&selection)
    }

    fn clear_selection(&self, kind: ConfigKind) -> Result<()> {
        let mut selection = self.read_selection()?;
        if selection.slot(kind).take().is_none() {
            return Ok(());
        }
        self.write_selection(&selection)
    }

    fn load(&self, kind: ConfigKind, name: &str) -> Result<ConfigDocument> {
        validate_name(name)?;
        let path = self.document_path(kind, name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BabylonError::ConfigNotFound {
                    kind,
                    name: name.to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        debug!(path = %path.display(), "loaded configuration document");
        Ok(parse_document(kind, name, &raw)?)
    }

    /// 기존 파일이 읽히면 주석과 배치를 유지한 채 값만 갱신한다.
    fn save(&self, kind: ConfigKind, name: &str, document: &ConfigDocument) -> Result<()> {
        validate_name(name)?;
        let path = self.document_path(kind, name);
        let existing = fs::read_to_string(&path).ok().and_then(|raw| {
            let previous = parse_document(kind, name, &raw).ok()?;
            Some((raw, previous))
        });
        let text = match existing {
            Some((raw, previous)) => update_document_text(&raw, &previous, document),
            None => render_document(document),
        }
        .context("failed to encode document")?;
        write_replacing(&path, &text)
    }

    fn create(&self, kind: ConfigKind, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        let path = self.document_path(kind, name);
        if path.exists() {
            return Err(BabylonError::ConfigAlreadyExists {
                kind,
                name: name.to_string(),
            }
            .into());
        }
        write_replacing(&path, template_for(kind))?;
        Ok(path)
    }

    fn delete(&self, kind: ConfigKind, name: &str) -> Result<()> {
        validate_name(name)?;
        let path = self.document_path(kind, name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BabylonError::ConfigNotFound {
                kind,
                name: name.to_string(),
            }
            .into()),
            Err(e) => Err(e).with_context(|| format!("failed to delete {}", path.display())),
        }
    }

    fn document_path(&self, kind: ConfigKind, name: &str) -> PathBuf {
        self.kind_dir(kind).join(format!("{name}.{EXTENSION}"))
    }
}

/// 문서 이름은 파일 이름으로 쓰이므로 경로 구분자 등을 허용하지 않는다.
fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid {
        bail!("invalid document name `{name}` (use letters, digits, `-`, `_` and `.`)");
    }
    Ok(())
}

fn write_replacing(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, text).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, YamlConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlConfigStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn missing_directories_list_nothing() {
        let (_dir, store) = store();
        assert!(store.list(ConfigKind::Platform).unwrap().is_empty());
        assert_eq!(store.selected(ConfigKind::Platform).unwrap(), None);
    }

    #[test]
    fn create_writes_template_and_refuses_duplicates() {
        let (_dir, store) = store();
        let path = store.create(ConfigKind::Deployment, "dev").unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("workspace_id:"));

        let err = store.create(ConfigKind::Deployment, "dev").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BabylonError>(),
            Some(BabylonError::ConfigAlreadyExists { .. })
        ));
        assert_eq!(store.list(ConfigKind::Deployment).unwrap(), vec!["dev"]);
    }

    #[test]
    fn selecting_unknown_document_keeps_previous_selection() {
        let (_dir, store) = store();
        store.create(ConfigKind::Platform, "azure").unwrap();
        store.select(ConfigKind::Platform, "azure").unwrap();

        let err = store.select(ConfigKind::Platform, "missing").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BabylonError>(),
            Some(BabylonError::ConfigNotFound { .. })
        ));
        assert_eq!(
            store.selected(ConfigKind::Platform).unwrap().as_deref(),
            Some("azure")
        );
    }

    #[test]
    fn selections_are_independent_per_kind() {
        let (_dir, store) = store();
        store.create(ConfigKind::Platform, "azure").unwrap();
        store.create(ConfigKind::Deployment, "dev").unwrap();
        store.select(ConfigKind::Platform, "azure").unwrap();
        store.select(ConfigKind::Deployment, "dev").unwrap();
        store.clear_selection(ConfigKind::Platform).unwrap();

        assert_eq!(store.selected(ConfigKind::Platform).unwrap(), None);
        assert_eq!(
            store.selected(ConfigKind::Deployment).unwrap().as_deref(),
            Some("dev")
        );
    }

    #[test]
    fn saved_values_survive_reload() {
        let (_dir, store) = store();
        store.create(ConfigKind::Deployment, "dev").unwrap();
        let mut doc = store.load(ConfigKind::Deployment, "dev").unwrap();
        doc.set("workspace_id", "ws-42");
        store.save(ConfigKind::Deployment, "dev", &doc).unwrap();

        let reloaded = store.load(ConfigKind::Deployment, "dev").unwrap();
        assert_eq!(reloaded.get("workspace_id"), Some("ws-42"));
    }

    #[test]
    fn saving_keeps_the_template_layout() {
        let (_dir, store) = store();
        let path = store.create(ConfigKind::Platform, "azure").unwrap();
        let mut doc = store.load(ConfigKind::Platform, "azure").unwrap();
        doc.set("api_url", "https://api.example.com/v3");
        store.save(ConfigKind::Platform, "azure", &doc).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("# Base URL of the platform REST API\napi_url: https://api.example.com/v3\n"));
        assert!(text.contains("\ntoken_command:\n"));
    }

    #[test]
    fn path_like_names_are_rejected() {
        let (_dir, store) = store();
        assert!(store.create(ConfigKind::Platform, "../escape").is_err());
        assert!(store.create(ConfigKind::Platform, "").is_err());
    }
}
