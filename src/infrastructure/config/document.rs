//! YAML 텍스트 ↔ [`ConfigDocument`] 변환.

use std::collections::{BTreeMap, BTreeSet};

use serde_yaml::Value as Yaml;

use crate::application::errors::BabylonError;
use crate::domain::config::{ConfigDocument, ConfigKind};

/// 평탄한 YAML 매핑만 허용한다. `null`은 없는 키로, 숫자/불리언은 문자열로 읽는다.
pub fn parse_document(
    kind: ConfigKind,
    name: &str,
    raw: &str,
) -> Result<ConfigDocument, BabylonError> {
    let invalid = |reason: String| BabylonError::InvalidConfig {
        kind,
        name: name.to_string(),
        reason,
    };

    let parsed: Yaml = serde_yaml::from_str(raw).map_err(|e| invalid(e.to_string()))?;
    let mapping = match parsed {
        Yaml::Null => return Ok(ConfigDocument::new()),
        Yaml::Mapping(mapping) => mapping,
        _ => return Err(invalid("the document must be a mapping of keys to values".into())),
    };

    let mut document = ConfigDocument::new();
    for (key, value) in mapping {
        let Yaml::String(key) = key else {
            return Err(invalid(format!("non-string key {key:?}")));
        };
        let value = match value {
            Yaml::Null => continue,
            Yaml::String(s) => s,
            Yaml::Bool(b) => b.to_string(),
            Yaml::Number(n) => n.to_string(),
            Yaml::Sequence(_) | Yaml::Mapping(_) | Yaml::Tagged(_) => {
                return Err(invalid(format!("key `{key}` must hold a scalar value")));
            }
        };
        document.set(key, value);
    }
    Ok(document)
}

pub fn render_document(document: &ConfigDocument) -> Result<String, serde_yaml::Error> {
    let values: BTreeMap<&str, &str> = document.iter().collect();
    serde_yaml::to_string(&values)
}

/// 기존 문서 텍스트의 주석, 키 순서, 빈 키를 유지한 채 바뀐 항목만 다시 쓴다.
/// 사라진 키는 빈 값으로 남기고, 새 키는 끝에 붙인다.
pub fn update_document_text(
    raw: &str,
    previous: &ConfigDocument,
    document: &ConfigDocument,
) -> Result<String, serde_yaml::Error> {
    let lines: Vec<&str> = raw.lines().collect();
    let mut out = String::with_capacity(raw.len());
    let mut seen = BTreeSet::new();

    let mut start = 0;
    while start < lines.len() {
        let line = lines[start];
        let Some(key) = top_level_key(line) else {
            out.push_str(line);
            out.push('\n');
            start += 1;
            continue;
        };

        let mut end = start + 1;
        while continues_entry(&lines[end..]) {
            end += 1;
        }
        seen.insert(key);

        let value = document.get(key);
        if value == previous.get(key) {
            for kept in &lines[start..end] {
                out.push_str(kept);
                out.push('\n');
            }
        } else {
            match value {
                Some(value) => out.push_str(&render_entry(key, value)?),
                None => {
                    out.push_str(key);
                    out.push_str(":\n");
                }
            }
        }
        start = end;
    }

    for (key, value) in document.iter() {
        if !seen.contains(key) {
            out.push_str(&render_entry(key, value)?);
        }
    }
    Ok(out)
}

fn render_entry(key: &str, value: &str) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&BTreeMap::from([(key, value)]))
}

/// 들여쓰기 없이 시작하는 `key:` 줄의 키.
fn top_level_key(line: &str) -> Option<&str> {
    if line.starts_with([' ', '\t', '#', '-']) {
        return None;
    }
    let (key, _) = line.split_once(':')?;
    let key = key.trim().trim_matches(['"', '\'']);
    (!key.is_empty()).then_some(key)
}

/// 다음 비어 있지 않은 줄이 들여쓰기되어 있으면 앞 항목의 연속이다.
fn continues_entry(rest: &[&str]) -> bool {
    rest.iter()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|line| line.starts_with([' ', '\t']))
}
