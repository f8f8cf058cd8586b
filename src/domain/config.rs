//! 설정 문서 종류와 키 조회 범위.

use std::collections::BTreeMap;
use std::fmt;

/// 영속 설정 문서 종류. 종류별로 한 문서가 "선택" 상태가 된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    /// 환경 전역 설정(API URL, 구독/리소스 그룹 등)
    Platform,
    /// 대상별 설정(organization/workspace/solution 식별자 등)
    Deployment,
}

impl ConfigKind {
    pub const ALL: [ConfigKind; 2] = [Self::Platform, Self::Deployment];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Deployment => "deployment",
        }
    }

    /// 문서가 저장되는 하위 디렉터리 이름.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Platform => "platforms",
            Self::Deployment => "deployments",
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 키 조회 범위.
/// - `Deployment`: deployment 문서 → platform 문서 순으로 조회
/// - `Platform`: platform 문서만 조회
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    Platform,
    Deployment,
}

impl KeyScope {
    /// 조회 순서(앞이 우선).
    pub fn lookup_order(self) -> &'static [ConfigKind] {
        match self {
            Self::Platform => &[ConfigKind::Platform],
            Self::Deployment => &[ConfigKind::Deployment, ConfigKind::Platform],
        }
    }
}

impl fmt::Display for KeyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Platform => f.write_str("platform"),
            Self::Deployment => f.write_str("deployment"),
        }
    }
}

/// 평탄한 key → scalar 문자열 문서.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    values: BTreeMap<String, String>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// 값이 비어 있으면 없는 키로 취급한다.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigDocument {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut doc = Self::new();
        for (k, v) in iter {
            doc.set(k, v);
        }
        doc
    }
}
