//! API 응답 출력 포트 구현 어댑터.

use std::fs;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::application::ports::{OutputFormat, OutputOptions, OutputWriter};
use crate::infrastructure::render::{render_json, render_table};

/// `-o` 파일에는 항상 JSON을, 콘솔에는 선택한 형식으로 쓴다.
pub struct ConsoleOutputWriter;

impl OutputWriter for ConsoleOutputWriter {
    fn write(&self, value: &Value, options: &OutputOptions) -> Result<()> {
        if let Some(path) = &options.output_file {
            let mut text = render_json(value);
            text.push('\n');
            fs::write(path, text)
                .with_context(|| format!("failed to write output to {}", path.display()))?;
            return Ok(());
        }

        match options.format {
            OutputFormat::Json => println!("{}", render_json(value)),
            OutputFormat::Table => println!("{}", render_table(value)),
        }
        Ok(())
    }
}
