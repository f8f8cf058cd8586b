//! 플레이스홀더 치환 엔진.
//!
//! 파싱된 [`Template`]을 키 해석기와 데이터 저장소로 평가한다.
//! - `%deploy%key`   → deployment 범위 조회(platform 폴백)
//! - `%platform%key` → platform 범위 조회
//! - `%datastore%a.b` → 데이터 저장소 객체 경로 조회

use serde_json::Value;

use crate::application::datastore::DataStore;
use crate::application::errors::BabylonError;
use crate::application::resolver::KeyResolver;
use crate::domain::config::KeyScope;
use crate::domain::placeholder::{Namespace, Placeholder, Segment, Template};

pub struct Substitutor<'a> {
    resolver: &'a KeyResolver,
    datastore: &'a DataStore,
}

impl<'a> Substitutor<'a> {
    pub fn new(resolver: &'a KeyResolver, datastore: &'a DataStore) -> Self {
        Self {
            resolver,
            datastore,
        }
    }

    /// 문자열 안의 모든 마커를 치환한다. 마커가 없으면 입력을 그대로 반환한다.
    pub fn substitute(&self, raw: &str) -> Result<String, BabylonError> {
        let template = Template::parse(raw)?;
        self.render(&template)
    }

    /// 마커 하나로만 이루어진 문자열은 원래 JSON 타입을 유지한 값으로 돌려준다.
    pub fn substitute_value(&self, raw: &str) -> Result<Value, BabylonError> {
        let template = Template::parse(raw)?;
        match template.sole_placeholder() {
            Some(placeholder) => self.lookup(placeholder),
            None => self.render(&template).map(Value::String),
        }
    }

    /// JSON 문서의 모든 문자열 값을 치환한다(키는 건드리지 않는다).
    pub fn substitute_json(&self, value: Value) -> Result<Value, BabylonError> {
        match value {
            Value::String(s) => self.substitute_value(&s),
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.substitute_json(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| self.substitute_json(v).map(|v| (k, v)))
                .collect::<Result<serde_json::Map<_, _>, _>>()
                .map(Value::Object),
            other => Ok(other),
        }
    }

    pub fn render(&self, template: &Template) -> Result<String, BabylonError> {
        let mut out = String::new();
        for segment in template.segments() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(placeholder) => {
                    out.push_str(&value_to_text(&self.lookup(placeholder)?));
                }
            }
        }
        Ok(out)
    }

    fn lookup(&self, placeholder: &Placeholder) -> Result<Value, BabylonError> {
        match placeholder.namespace {
            Namespace::Deploy => self.lookup_config(placeholder, KeyScope::Deployment),
            Namespace::Platform => self.lookup_config(placeholder, KeyScope::Platform),
            Namespace::Datastore => self
                .datastore
                .get(placeholder.path.as_slice())
                .cloned()
                .ok_or_else(|| unresolved(placeholder, "no value is stored at this path")),
        }
    }

    fn lookup_config(
        &self,
        placeholder: &Placeholder,
        scope: KeyScope,
    ) -> Result<Value, BabylonError> {
        let [key] = placeholder.path.as_slice() else {
            return Err(unresolved(
                placeholder,
                "nested lookup is not supported for configuration keys",
            ));
        };

        self.resolver
            .resolve(key, scope)
            .map(|v| Value::String(v.to_string()))
            .ok_or_else(|| {
                unresolved(
                    placeholder,
                    &format!("key `{key}` is not set in the {scope} configuration"),
                )
            })
    }
}

/// 문자열은 그대로, 그 밖의 값은 compact JSON으로 표현한다.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn unresolved(placeholder: &Placeholder, reason: &str) -> BabylonError {
    BabylonError::PlaceholderResolution {
        marker: placeholder.marker(),
        reason: reason.to_string(),
    }
}
