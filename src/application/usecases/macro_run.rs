//! 여러 CLI 명령을 순서대로 실행하는 매크로 유스케이스.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::info;

use crate::application::datastore::DataStore;
use crate::application::ports::{Reporter, StepRunner};
use crate::domain::placeholder::is_addressable_path;

/// 매크로 파일 형식.
///
/// ```yaml
/// steps:
///   - args: [api, workspace, get]
///     store: ws
///   - args: [api, dataset, list, --workspace-id, "%datastore%ws.id"]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MacroDefinition {
    pub steps: Vec<MacroStep>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MacroStep {
    pub args: Vec<String>,
    /// 응답 JSON을 저장할 데이터 저장소 경로
    #[serde(default)]
    pub store: Option<String>,
}

impl MacroDefinition {
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let definition: Self = serde_yaml::from_str(raw).context("invalid macro definition")?;
        definition.validate()?;
        Ok(definition)
    }

    /// 실행 전에 모든 단계를 검사한다(중첩 매크로 금지).
    /// `store` 경로는 `%datastore%` 마커로 다시 읽을 수 있어야 한다.
    pub fn validate(&self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            match step.args.first().map(String::as_str) {
                None => bail!("step {} has no arguments", index + 1),
                Some("macro") => bail!("step {}: macros cannot run other macros", index + 1),
                Some(_) => {}
            }
            let unreadable = step.store.as_deref().filter(|s| !is_addressable_path(s));
            if let Some(store) = unreadable {
                bail!(
                    "step {}: store path `{store}` may only use letters, digits and `_` between dots",
                    index + 1
                );
            }
        }
        Ok(())
    }
}

pub struct MacroUseCase<'a> {
    pub runner: &'a dyn StepRunner,
    pub reporter: &'a dyn Reporter,
}

impl<'a> MacroUseCase<'a> {
    /// 첫 실패에서 중단한다. 성공하면 최종 데이터 저장소를 돌려준다.
    pub async fn execute(&self, definition: &MacroDefinition) -> Result<DataStore> {
        definition.validate()?;
        let mut datastore = DataStore::new();
        let total = definition.steps.len();

        for (index, step) in definition.steps.iter().enumerate() {
            let label = format!("step {}/{total}", index + 1);
            self.reporter.section(&label);
            self.reporter.kv("args", &step.args.join(" "));

            let response = self
                .runner
                .run_step(&step.args, &datastore)
                .await
                .with_context(|| format!("{label} failed"))?;

            if let (Some(path), Some(value)) = (step.store.as_deref(), response) {
                info!(path, "storing step response");
                datastore.insert(path, value);
            }
        }

        self.reporter.success(&format!("{total} step(s) completed"));
        Ok(datastore)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;

    struct Silent;
    impl Reporter for Silent {
        fn section(&self, _name: &str) {}
        fn kv(&self, _key: &str, _value: &str) {}
        fn success(&self, _message: &str) {}
        fn warn(&self, _message: &str) {}
        fn error(&self, _message: &str) {}
        fn raw(&self, _line: &str) {}
    }

    /// 받은 인자와 당시 데이터 저장소를 기록하고 고정 응답을 돌려준다.
    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<(Vec<String>, Value)>>,
    }

    #[async_trait]
    impl StepRunner for Recording {
        async fn run_step(&self, args: &[String], datastore: &DataStore) -> Result<Option<Value>> {
            self.seen
                .lock()
                .unwrap()
                .push((args.to_vec(), datastore.as_value()));
            if args.first().map(String::as_str) == Some("fail") {
                bail!("boom");
            }
            Ok(Some(json!({ "id": format!("id-{}", args.len()) })))
        }
    }

    #[test]
    fn store_path_must_be_readable_by_markers() {
        let err = MacroDefinition::from_yaml(
            "steps:\n  - args: [api, workspace, get]\n    store: my-ws\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("`my-ws`"));

        assert!(
            MacroDefinition::from_yaml(
                "steps:\n  - args: [api, workspace, get]\n    store: runs.last_ws\n",
            )
            .is_ok()
        );
    }

    #[test]
    fn nested_macro_is_rejected() {
        let err = MacroDefinition::from_yaml("steps:\n  - args: [macro, run, other.yaml]\n")
            .unwrap_err();
        assert!(err.to_string().contains("cannot run other macros"));
    }

    #[test]
    fn empty_step_is_rejected() {
        assert!(MacroDefinition::from_yaml("steps:\n  - args: []\n").is_err());
    }

    #[tokio::test]
    async fn responses_are_visible_to_later_steps() {
        let definition = MacroDefinition::from_yaml(
            "steps:\n  - args: [api, workspace, get]\n    store: ws\n  - args: [api, dataset, list]\n",
        )
        .unwrap();
        let runner = Recording::default();
        let uc = MacroUseCase {
            runner: &runner,
            reporter: &Silent,
        };

        let store = uc.execute(&definition).await.unwrap();
        assert_eq!(store.get(&["ws", "id"]), Some(&json!("id-3")));

        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].1, json!({}));
        assert_eq!(seen[1].1, json!({ "ws": { "id": "id-3" } }));
    }

    #[tokio::test]
    async fn first_failure_stops_the_macro() {
        let definition =
            MacroDefinition::from_yaml("steps:\n  - args: [fail]\n  - args: [api, run, list]\n")
                .unwrap();
        let runner = Recording::default();
        let uc = MacroUseCase {
            runner: &runner,
            reporter: &Silent,
        };

        let err = uc.execute(&definition).await.unwrap_err();
        assert!(err.to_string().contains("step 1/2 failed"));
        assert_eq!(runner.seen.lock().unwrap().len(), 1);
    }
}
