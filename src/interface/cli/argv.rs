//! 명령줄 파싱 전에 인자 전체의 플레이스홀더를 한 번에 치환한다.

use anyhow::Result;
use tracing::debug;

use crate::application::datastore::DataStore;
use crate::application::errors::BabylonError;
use crate::application::ports::ConfigStore;
use crate::application::resolver::KeyResolver;
use crate::application::substitution::Substitutor;
use crate::domain::placeholder::Template;
use crate::infrastructure::payload::is_inline_payload;

const PAYLOAD_FLAG: &str = "--payload";

/// 각 인자를 템플릿으로 한 번만 파싱해 렌더링한다.
/// deploy/platform 마커가 있을 때만 설정 문서를 읽는다.
///
/// 인라인 JSON 페이로드는 건드리지 않는다. 파싱된 뒤 문자열 값 단위로
/// 치환되어야 단독 마커가 JSON 타입을 유지한다.
pub fn substitute_args(
    args: &[String],
    store: &dyn ConfigStore,
    datastore: &DataStore,
) -> Result<Vec<String>> {
    let verbatim = inline_payload_positions(args);
    let templates = args
        .iter()
        .zip(&verbatim)
        .map(|(arg, keep)| {
            if *keep {
                Ok(None)
            } else {
                Template::parse(arg).map(Some)
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(BabylonError::from)?;

    let active = || templates.iter().flatten();
    if !active().any(Template::has_placeholders) {
        return Ok(args.to_vec());
    }

    let resolver = if active().any(Template::reads_config) {
        KeyResolver::from_store(store)?
    } else {
        KeyResolver::default()
    };
    let substitutor = Substitutor::new(&resolver, datastore);

    let mut rendered = Vec::with_capacity(args.len());
    for (raw, template) in args.iter().zip(&templates) {
        match template {
            Some(template) if template.has_placeholders() => {
                let value = substitutor.render(template)?;
                debug!(argument = %raw, "substituted argument");
                rendered.push(value);
            }
            _ => rendered.push(raw.clone()),
        }
    }
    Ok(rendered)
}

/// `--payload <json>`의 값과 `--payload=<json>` 인자 위치를 표시한다.
/// 파일 경로 값은 일반 인자처럼 치환된다.
fn inline_payload_positions(args: &[String]) -> Vec<bool> {
    let mut keep = vec![false; args.len()];
    for (i, arg) in args.iter().enumerate() {
        if arg == PAYLOAD_FLAG {
            if let Some(value) = args.get(i + 1) {
                keep[i + 1] = is_inline_payload(value);
            }
        } else if let Some(value) = arg
            .strip_prefix(PAYLOAD_FLAG)
            .and_then(|rest| rest.strip_prefix('='))
        {
            keep[i] = is_inline_payload(value);
        }
    }
    keep
}
