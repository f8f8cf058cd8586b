//! 외부 편집기로 설정 문서를 여는 어댑터.

use std::env;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::application::ports::DocumentEditor;
use crate::infrastructure::config::utils::{command_exists, split_command};

const DEFAULT_EDITOR: &str = "vi";

/// `$VISUAL` → `$EDITOR` → `vi` 순서로 편집기를 고른다.
pub struct EnvEditor;

impl EnvEditor {
    fn command() -> String {
        ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }
}

impl DocumentEditor for EnvEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let command = Self::command();
        let (program, args) = split_command(&command).context("invalid editor command")?;
        if !command_exists(&program) {
            bail!(
                "editor `{program}` not found; set $EDITOR or edit {} manually",
                path.display()
            );
        }

        debug!(editor = %program, path = %path.display(), "opening editor");
        let status = Command::new(&program)
            .args(&args)
            .arg(path)
            .status()
            .with_context(|| format!("failed to launch editor `{program}`"))?;
        if !status.success() {
            bail!("editor `{program}` exited with {status}");
        }
        Ok(())
    }
}
