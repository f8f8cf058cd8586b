//! 파싱된 명령을 유스케이스로 연결한다.

use std::fs;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::Parser;
use serde_json::Value;

use super::argv::substitute_args;
use super::command::{ApiCommand, Cli, Commands, ConfigCommand, DocumentCommand, MacroCommand};
use super::composition::AppComposition;
use crate::application::datastore::DataStore;
use crate::application::ports::{OutputFormat, OutputOptions, StepRunner};
use crate::application::resolver::KeyResolver;
use crate::application::substitution::Substitutor;
use crate::application::usecases::macro_run::{MacroDefinition, MacroUseCase};
use crate::application::usecases::resource_command::ResourceCommand;
use crate::domain::config::ConfigKind;
use crate::infrastructure::payload::load_payload;

const PROGRAM: &str = "babylon";

pub struct CommandRunner<'a> {
    composition: &'a AppComposition,
}

impl<'a> CommandRunner<'a> {
    pub fn new(composition: &'a AppComposition) -> Self {
        Self { composition }
    }

    /// 명령줄 인자 전체(프로그램 이름 포함)의 마커를 치환한다.
    pub fn substitute(&self, args: &[String], datastore: &DataStore) -> Result<Vec<String>> {
        substitute_args(args, self.composition.store(), datastore)
    }

    /// 명령을 실행하고, 매크로에 저장할 수 있는 결과 값을 돌려준다.
    pub async fn execute(&self, command: Commands, datastore: &DataStore) -> Result<Option<Value>> {
        match command {
            Commands::Config { command } => self.config(command),
            Commands::Api { command } => self.api(command, datastore).await.map(Some),
            Commands::Macro {
                command: MacroCommand::Run { file },
            } => {
                let raw = fs::read_to_string(&file)
                    .with_context(|| format!("failed to read macro {}", file.display()))?;
                let definition = MacroDefinition::from_yaml(&raw)
                    .with_context(|| format!("in {}", file.display()))?;
                let usecase = MacroUseCase {
                    runner: self,
                    reporter: self.composition.reporter(),
                };
                let store = usecase.execute(&definition).await?;
                Ok(Some(store.as_value()))
            }
        }
    }

    fn config(&self, command: ConfigCommand) -> Result<Option<Value>> {
        let Some((kind, document)) = command.document() else {
            let inspection = self.composition.inspect_config_usecase().execute_json()?;
            self.composition
                .reporter()
                .raw(&serde_json::to_string_pretty(&inspection)?);
            return Ok(Some(inspection));
        };
        self.document(kind, document)
    }

    fn document(&self, kind: ConfigKind, command: &DocumentCommand) -> Result<Option<Value>> {
        let usecase = self.composition.config_documents_usecase();
        let reporter = self.composition.reporter();
        match command {
            DocumentCommand::List => {
                let entries = usecase.list(kind)?;
                if entries.is_empty() {
                    reporter.warn(&format!(
                        "no {kind} documents; create one with `babylon config {kind} create <name>`"
                    ));
                }
                for entry in &entries {
                    let marker = if entry.selected { "*" } else { " " };
                    reporter.raw(&format!("{marker} {}", entry.name));
                }
                Ok(None)
            }
            DocumentCommand::Select { name } => usecase.select(kind, name).map(|_| None),
            DocumentCommand::Create { name, no_edit } => {
                usecase.create(kind, name, !no_edit).map(|_| None)
            }
            DocumentCommand::Edit { name } => usecase.edit(kind, name.as_deref()).map(|_| None),
            DocumentCommand::Set { key, value } => usecase.set(kind, key, value).map(|_| None),
            DocumentCommand::Get { key } => {
                let value = usecase.get(kind, key)?;
                reporter.raw(&value);
                Ok(Some(Value::String(value)))
            }
            DocumentCommand::Delete { name, force } => {
                usecase.delete(kind, name, *force).map(|_| None)
            }
        }
    }

    async fn api(&self, command: ApiCommand, datastore: &DataStore) -> Result<Value> {
        let resolver = KeyResolver::from_store(self.composition.store())?;

        let payload = match command.payload.as_deref() {
            Some(arg) => {
                let raw = load_payload(arg)?;
                Some(Substitutor::new(&resolver, datastore).substitute_json(raw)?)
            }
            None => None,
        };

        let mut resource = ResourceCommand::new(command.resource, command.operation);
        resource.explicit_ids = command.ids;
        resource.payload = payload;
        resource.force = command.force;
        resource.fields = command.fields;
        resource.output = OutputOptions {
            format: if command.table {
                OutputFormat::Table
            } else {
                OutputFormat::Json
            },
            output_file: command.output,
        };

        self.composition
            .resource_command_usecase()
            .execute(&resolver, resource)
            .await
    }
}

#[async_trait]
impl StepRunner for CommandRunner<'_> {
    async fn run_step(&self, args: &[String], datastore: &DataStore) -> Result<Option<Value>> {
        let argv: Vec<String> = std::iter::once(PROGRAM.to_string())
            .chain(args.iter().cloned())
            .collect();
        let argv = self.substitute(&argv, datastore)?;
        let cli = Cli::try_parse_from(&argv)?;
        if matches!(cli.command, Commands::Macro { .. }) {
            bail!("macros cannot run other macros");
        }
        self.execute(cli.command, datastore).await
    }
}
