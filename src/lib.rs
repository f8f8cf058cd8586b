//! babylon library root.
//! Clean Architecture 계층을 외부에 노출한다.

use anyhow::Result;
use clap::Parser;
use serde_json::Value;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

use application::datastore::DataStore;
use interface::cli::{AppComposition, Cli, CommandRunner};

/// 라이브러리 직접 호출용 실행 함수. `args`는 프로그램 이름을 포함한 전체 인자다.
pub async fn run(composition: &AppComposition, args: &[String]) -> Result<Option<Value>> {
    let datastore = DataStore::new();
    let runner = CommandRunner::new(composition);
    let args = runner.substitute(args, &datastore)?;
    let cli = Cli::try_parse_from(&args)?;
    runner.execute(cli.command, &datastore).await
}
