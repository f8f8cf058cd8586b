//! `%namespace%path` 플레이스홀더 템플릿 파서.
//! 인자 문자열을 한 번만 파싱해 리터럴/플레이스홀더 세그먼트 목록으로 만든다.

use std::fmt;

use thiserror::Error;

/// 플레이스홀더가 값을 읽어 올 위치(닫힌 집합).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Deploy,
    Platform,
    Datastore,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Self::Deploy, Self::Platform, Self::Datastore];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Platform => "platform",
            Self::Datastore => "datastore",
        }
    }

    /// 설정 파일(deploy/platform)을 읽어야 하는 네임스페이스인지 여부.
    pub fn reads_config(self) -> bool {
        matches!(self, Self::Deploy | Self::Platform)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub namespace: Namespace,
    /// `.`으로 구분된 경로 세그먼트(항상 1개 이상)
    pub path: Vec<String>,
}

impl Placeholder {
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    /// 사용자가 입력한 형태 그대로의 마커 문자열.
    pub fn marker(&self) -> String {
        format!("%{}%{}", self.namespace, self.dotted_path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("marker `%{namespace}%` is missing a key")]
    EmptyKey { namespace: Namespace },
}

/// 파싱이 끝난 인자 템플릿.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// 문자열을 세그먼트로 분해한다.
    /// 알려지지 않은 `%...%` 시퀀스는 리터럴로 남긴다.
    pub fn parse(input: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = input;

        while let Some(pos) = rest.find('%') {
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            let Some((namespace, tail)) = match_namespace(after) else {
                literal.push('%');
                rest = after;
                continue;
            };

            let (path, remainder) = take_path(tail);
            if path.is_empty() {
                return Err(TemplateError::EmptyKey { namespace });
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(Placeholder { namespace, path }));
            rest = remainder;
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(p) => Some(p),
            Segment::Literal(_) => None,
        })
    }

    pub fn has_placeholders(&self) -> bool {
        self.placeholders().next().is_some()
    }

    /// deploy/platform 설정을 읽는 마커가 하나라도 있는지 여부.
    pub fn reads_config(&self) -> bool {
        self.placeholders().any(|p| p.namespace.reads_config())
    }

    /// 템플릿 전체가 마커 하나일 때만 그 마커를 반환한다.
    pub fn sole_placeholder(&self) -> Option<&Placeholder> {
        match self.segments.as_slice() {
            [Segment::Placeholder(p)] => Some(p),
            _ => None,
        }
    }
}

fn match_namespace(input: &str) -> Option<(Namespace, &str)> {
    Namespace::ALL.iter().find_map(|ns| {
        input
            .strip_prefix(ns.as_str())
            .and_then(|t| t.strip_prefix('%'))
            .map(|t| (*ns, t))
    })
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// 마커 한 개로 온전히 가리킬 수 있는 점 경로인지 확인한다.
pub fn is_addressable_path(path: &str) -> bool {
    path.split('.')
        .all(|segment| !segment.is_empty() && segment.bytes().all(is_key_byte))
}

/// 경로 세그먼트를 최대한 길게 읽는다. 끝에 붙은 `.`은 경로에 포함하지 않는다.
fn take_path(input: &str) -> (Vec<String>, &str) {
    let bytes = input.as_bytes();
    let mut path = Vec::new();
    let mut start = 0;
    let mut end = 0;

    loop {
        while bytes.get(end).copied().is_some_and(is_key_byte) {
            end += 1;
        }
        if end == start {
            break;
        }
        path.push(input[start..end].to_string());

        let dot_then_key = bytes.get(end) == Some(&b'.')
            && bytes.get(end + 1).copied().is_some_and(is_key_byte);
        if !dot_then_key {
            break;
        }
        end += 1;
        start = end;
    }

    (path, &input[end..])
}
