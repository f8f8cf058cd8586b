//! CLI 명령 파싱 모듈.
//!
//! 설정/매크로 명령은 derive로, `api` 하위 명령은 리소스 테이블에서 생성한다.
//! 어떤 명령도 별도의 긴 도움말을 두지 않으므로 `-h`와 `--help` 출력이 같다.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command, FromArgMatches, Parser, Subcommand};

use crate::domain::config::ConfigKind;
use crate::domain::resource::{Operation, RESOURCES, ResourceKind, ResourceSpec, Verb};

#[derive(Debug, Parser)]
#[command(name = "babylon", version)]
#[command(about = "Manage platform and deployment configuration and call the platform API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage configuration documents
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Call the platform REST API
    Api {
        #[command(subcommand)]
        command: ApiCommand,
    },
    /// Run command files
    Macro {
        #[command(subcommand)]
        command: MacroCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Manage platform documents
    Platform {
        #[command(subcommand)]
        command: DocumentCommand,
    },
    /// Manage deployment documents
    Deployment {
        #[command(subcommand)]
        command: DocumentCommand,
    },
    /// Print the effective configuration as JSON
    Show,
}

impl ConfigCommand {
    pub fn document(&self) -> Option<(ConfigKind, &DocumentCommand)> {
        match self {
            Self::Platform { command } => Some((ConfigKind::Platform, command)),
            Self::Deployment { command } => Some((ConfigKind::Deployment, command)),
            Self::Show => None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// List documents and mark the selected one
    List,
    /// Select the document used by later commands
    Select { name: String },
    /// Create a document from the template and open it in $EDITOR
    Create {
        name: String,
        /// Do not open the editor after creating the document
        #[arg(long)]
        no_edit: bool,
    },
    /// Open a document (default: the selected one) in $EDITOR
    Edit { name: Option<String> },
    /// Set a key in the selected document
    Set { key: String, value: String },
    /// Print a key of the selected document
    Get { key: String },
    /// Delete a document
    Delete {
        name: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum MacroCommand {
    /// Run the steps of a macro file in order
    Run { file: PathBuf },
}

/// `babylon api <resource> <operation> [options]`로 파싱된 명령.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCommand {
    pub resource: ResourceKind,
    pub operation: Operation,
    pub ids: BTreeMap<&'static str, String>,
    pub payload: Option<String>,
    pub output: Option<PathBuf>,
    pub force: bool,
    pub fields: Vec<String>,
    pub table: bool,
}

const PAYLOAD: &str = "payload";
const OUTPUT: &str = "output";
const FORCE: &str = "force";
const FIELDS: &str = "fields";
const TABLE: &str = "table";

fn resource_command(spec: &'static ResourceSpec) -> Command {
    let mut cmd = Command::new(spec.name)
        .about(format!("Operate on {}", spec.collection))
        .subcommand_required(true);
    for op in spec.operations() {
        cmd = cmd.subcommand(operation_command(spec, op));
    }
    cmd
}

fn operation_command(spec: &'static ResourceSpec, op: Operation) -> Command {
    let about = match op {
        Operation::Verb(Verb::List) => format!("List {}", spec.collection),
        Operation::Verb(Verb::Get) => format!("Show one {}", spec.name),
        Operation::Verb(Verb::Create) => format!("Create a {} from a payload", spec.name),
        Operation::Verb(Verb::Update) => format!("Update a {} from a payload", spec.name),
        Operation::Verb(Verb::Delete) => format!("Delete a {}", spec.name),
        Operation::Action(action) => action.about.to_string(),
    };
    let mut cmd = Command::new(op.name()).about(about);

    let mut owners: Vec<&'static ResourceSpec> = spec.ancestors();
    if !op.targets_collection() {
        owners.push(spec);
    }
    for owner in owners {
        cmd = cmd.arg(
            Arg::new(owner.id_key)
                .long(owner.id_flag)
                .value_name("ID")
                .help(format!(
                    "{} id (default: `{}` from the configuration)",
                    owner.name, owner.id_key
                )),
        );
    }

    if op.needs_payload() {
        cmd = cmd.arg(
            Arg::new(PAYLOAD)
                .long(PAYLOAD)
                .value_name("FILE|JSON")
                .required(true)
                .help("YAML/JSON file or inline JSON request body"),
        );
    }
    if op.is_destructive() {
        cmd = cmd.arg(
            Arg::new(FORCE)
                .short('f')
                .long(FORCE)
                .action(ArgAction::SetTrue)
                .help("Do not ask for confirmation"),
        );
    }

    cmd.arg(
        Arg::new(OUTPUT)
            .short('o')
            .long(OUTPUT)
            .alias("output-file")
            .value_name("FILE")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Write the JSON response to a file"),
    )
    .arg(
        Arg::new(FIELDS)
            .long(FIELDS)
            .value_name("FIELDS")
            .value_delimiter(',')
            .help("Keep only these top-level fields (comma separated)"),
    )
    .arg(
        Arg::new(TABLE)
            .long(TABLE)
            .action(ArgAction::SetTrue)
            .help("Print the response as a table"),
    )
}

fn matches_error(kind: ErrorKind, message: &str) -> clap::Error {
    clap::Error::raw(kind, format!("{message}\n"))
}

impl FromArgMatches for ApiCommand {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let (resource_name, resource_matches) = matches
            .subcommand()
            .ok_or_else(|| matches_error(ErrorKind::MissingSubcommand, "a resource is required"))?;
        let spec = RESOURCES
            .iter()
            .find(|s| s.name == resource_name)
            .ok_or_else(|| matches_error(ErrorKind::InvalidSubcommand, "unknown resource"))?;

        let (op_name, op_matches) = resource_matches
            .subcommand()
            .ok_or_else(|| matches_error(ErrorKind::MissingSubcommand, "an operation is required"))?;
        let operation = spec
            .operation(op_name)
            .ok_or_else(|| matches_error(ErrorKind::InvalidSubcommand, "unknown operation"))?;

        let mut ids = BTreeMap::new();
        for key in spec.required_keys(operation) {
            if let Some(value) = op_matches.get_one::<String>(key) {
                ids.insert(key, value.clone());
            }
        }

        let flag = |id: &str| {
            op_matches
                .try_get_one::<bool>(id)
                .ok()
                .flatten()
                .copied()
                .unwrap_or(false)
        };

        Ok(Self {
            resource: spec.kind,
            operation,
            ids,
            payload: op_matches
                .try_get_one::<String>(PAYLOAD)
                .ok()
                .flatten()
                .cloned(),
            output: op_matches.get_one::<PathBuf>(OUTPUT).cloned(),
            force: flag(FORCE),
            fields: op_matches
                .get_many::<String>(FIELDS)
                .map(|values| {
                    values
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            table: flag(TABLE),
        })
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        *self = Self::from_arg_matches(matches)?;
        Ok(())
    }
}

impl Subcommand for ApiCommand {
    fn augment_subcommands(cmd: Command) -> Command {
        RESOURCES
            .iter()
            .fold(cmd, |cmd, spec| cmd.subcommand(resource_command(spec)))
            .subcommand_required(true)
    }

    fn augment_subcommands_for_update(cmd: Command) -> Command {
        Self::augment_subcommands(cmd)
    }

    fn has_subcommand(name: &str) -> bool {
        RESOURCES.iter().any(|s| s.name == name)
    }
}
