//! `--payload` 인자(파일 경로 또는 인라인 JSON) 로더.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// `{`/`[`로 시작하는 인자는 파일 경로가 아닌 인라인 JSON이다.
pub fn is_inline_payload(arg: &str) -> bool {
    let trimmed = arg.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('[')
}

/// 인라인 JSON이면 그대로 파싱하고, 아니면 YAML/JSON 파일로 읽는다.
pub fn load_payload(arg: &str) -> Result<Value> {
    if is_inline_payload(arg) {
        return serde_json::from_str(arg.trim_start()).context("invalid inline JSON payload");
    }

    let path = Path::new(arg);
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read payload file {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))
    } else {
        // YAML은 JSON의 상위 집합이므로 확장자가 없어도 그대로 읽힌다.
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse YAML in {}", path.display()))
    }
}
