//! 매크로 단계 사이에서 값을 전달하는 프로세스 내 저장소.

use serde_json::{Map, Value};

/// 점(`.`)으로 구분된 경로로 JSON 값을 저장/조회한다. 프로세스 종료와 함께 사라진다.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    root: Map<String, Value>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 중간 경로가 없거나 객체가 아니면 빈 객체로 만든다.
    pub fn insert(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut cursor = &mut self.root;
        for segment in parents {
            let slot = cursor
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(next) = slot else {
                return;
            };
            cursor = next;
        }
        cursor.insert(last.to_string(), value);
    }

    /// 객체만 따라 내려간다. 배열 인덱싱은 지원하지 않는다.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut cursor = self.root.get(first.as_ref())?;
        for segment in rest {
            cursor = cursor.as_object()?.get(segment.as_ref())?;
        }
        Some(cursor)
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }
}
