//! API 리소스 명령을 구동하는 선언형 테이블.
//!
//! 리소스마다 경로/식별자 키/허용 동사를 한 줄로 기술하고,
//! 명령 구현은 이 테이블만 보고 요청을 조립한다.

use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::api::HttpMethod;

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Organization,
    Solution,
    Workspace,
    Dataset,
    Runner,
    Run,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// CRUD 이외의 리소스 전용 동작(runner start 등).
#[derive(Debug, PartialEq, Eq)]
pub struct ActionSpec {
    pub name: &'static str,
    pub method: HttpMethod,
    /// 개별 리소스 경로 뒤에 붙는 경로
    pub suffix: &'static str,
    pub about: &'static str,
}

#[derive(Debug)]
pub struct ResourceSpec {
    pub kind: ResourceKind,
    pub name: &'static str,
    pub collection: &'static str,
    pub id_key: &'static str,
    /// 식별자를 덮어쓰는 명령줄 플래그 이름
    pub id_flag: &'static str,
    pub parent: Option<ResourceKind>,
    pub verbs: &'static [Verb],
    pub actions: &'static [ActionSpec],
}

const ALL_VERBS: &[Verb] = &[Verb::List, Verb::Get, Verb::Create, Verb::Update, Verb::Delete];

pub static RESOURCES: &[ResourceSpec] = &[
    ResourceSpec {
        kind: ResourceKind::Organization,
        name: "organization",
        collection: "organizations",
        id_key: "organization_id",
        id_flag: "organization-id",
        parent: None,
        verbs: ALL_VERBS,
        actions: &[],
    },
    ResourceSpec {
        kind: ResourceKind::Solution,
        name: "solution",
        collection: "solutions",
        id_key: "solution_id",
        id_flag: "solution-id",
        parent: Some(ResourceKind::Organization),
        verbs: ALL_VERBS,
        actions: &[],
    },
    ResourceSpec {
        kind: ResourceKind::Workspace,
        name: "workspace",
        collection: "workspaces",
        id_key: "workspace_id",
        id_flag: "workspace-id",
        parent: Some(ResourceKind::Organization),
        verbs: ALL_VERBS,
        actions: &[],
    },
    ResourceSpec {
        kind: ResourceKind::Dataset,
        name: "dataset",
        collection: "datasets",
        id_key: "dataset_id",
        id_flag: "dataset-id",
        parent: Some(ResourceKind::Workspace),
        verbs: ALL_VERBS,
        actions: &[],
    },
    ResourceSpec {
        kind: ResourceKind::Runner,
        name: "runner",
        collection: "runners",
        id_key: "runner_id",
        id_flag: "runner-id",
        parent: Some(ResourceKind::Workspace),
        verbs: ALL_VERBS,
        actions: &[
            ActionSpec {
                name: "start",
                method: HttpMethod::Post,
                suffix: "start",
                about: "Start a new run of the runner",
            },
            ActionSpec {
                name: "stop",
                method: HttpMethod::Post,
                suffix: "stop",
                about: "Stop the running run of the runner",
            },
        ],
    },
    ResourceSpec {
        kind: ResourceKind::Run,
        name: "run",
        collection: "runs",
        id_key: "run_id",
        id_flag: "run-id",
        parent: Some(ResourceKind::Runner),
        verbs: &[Verb::List, Verb::Get, Verb::Delete],
        actions: &[
            ActionSpec {
                name: "status",
                method: HttpMethod::Get,
                suffix: "status",
                about: "Show the status of a run",
            },
            ActionSpec {
                name: "logs",
                method: HttpMethod::Get,
                suffix: "logs",
                about: "Show the logs of a run",
            },
        ],
    },
];

impl ResourceKind {
    pub fn spec(self) -> &'static ResourceSpec {
        RESOURCES
            .iter()
            .find(|r| r.kind == self)
            .unwrap_or_else(|| unreachable!("every resource kind has a table entry"))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}

/// 리소스에 대해 수행할 단일 동작.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Verb(Verb),
    Action(&'static ActionSpec),
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Verb(v) => v.as_str(),
            Self::Action(a) => a.name,
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Self::Verb(Verb::List | Verb::Get) => HttpMethod::Get,
            Self::Verb(Verb::Create) => HttpMethod::Post,
            Self::Verb(Verb::Update) => HttpMethod::Patch,
            Self::Verb(Verb::Delete) => HttpMethod::Delete,
            Self::Action(a) => a.method,
        }
    }

    /// 컬렉션 경로(list/create)를 쓰는지 여부.
    pub fn targets_collection(self) -> bool {
        matches!(self, Self::Verb(Verb::List | Verb::Create))
    }

    pub fn needs_payload(self) -> bool {
        matches!(self, Self::Verb(Verb::Create | Verb::Update))
    }

    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Verb(Verb::Delete))
    }
}

impl ResourceSpec {
    /// 상위 리소스 체인(바깥쪽부터).
    pub fn ancestors(&self) -> Vec<&'static ResourceSpec> {
        let mut chain = Vec::new();
        let mut cursor = self.parent;
        while let Some(kind) = cursor {
            let spec = kind.spec();
            chain.push(spec);
            cursor = spec.parent;
        }
        chain.reverse();
        chain
    }

    pub fn supports(&self, op: Operation) -> bool {
        match op {
            Operation::Verb(v) => self.verbs.contains(&v),
            Operation::Action(a) => self.actions.iter().any(|own| std::ptr::eq(own, a)),
        }
    }

    pub fn action(&self, name: &str) -> Option<&'static ActionSpec> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// 동사 또는 전용 동작 이름으로 동작을 찾는다.
    pub fn operation(&self, name: &str) -> Option<Operation> {
        self.verbs
            .iter()
            .find(|v| v.as_str() == name)
            .map(|v| Operation::Verb(*v))
            .or_else(|| self.action(name).map(Operation::Action))
    }

    /// 명령줄에 노출되는 모든 동작(동사 먼저).
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.verbs
            .iter()
            .map(|v| Operation::Verb(*v))
            .chain(self.actions.iter().map(Operation::Action))
    }

    /// 동작에 필요한 식별자 키 목록(경로 순서).
    pub fn required_keys(&self, op: Operation) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.ancestors().iter().map(|s| s.id_key).collect();
        if !op.targets_collection() {
            keys.push(self.id_key);
        }
        keys
    }

    /// 해석된 식별자로 요청 경로를 만든다. 누락 키는 호출 전에 검증되어 있어야 한다.
    pub fn path(&self, op: Operation, ids: &BTreeMap<&str, String>) -> String {
        let mut path = String::new();
        for spec in self.ancestors() {
            push_segment(&mut path, spec.collection);
            push_segment(&mut path, &encode(ids.get(spec.id_key)));
        }
        push_segment(&mut path, self.collection);

        if !op.targets_collection() {
            push_segment(&mut path, &encode(ids.get(self.id_key)));
        }
        if let Operation::Action(action) = op {
            push_segment(&mut path, action.suffix);
        }
        path
    }
}

fn encode(value: Option<&String>) -> String {
    value
        .map(|v| utf8_percent_encode(v, PATH_SEGMENT).to_string())
        .unwrap_or_default()
}

fn push_segment(path: &mut String, segment: &str) {
    path.push('/');
    path.push_str(segment);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(pairs: &[(&'static str, &str)]) -> BTreeMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn every_kind_has_exactly_one_entry() {
        for spec in RESOURCES {
            assert_eq!(
                RESOURCES.iter().filter(|r| r.kind == spec.kind).count(),
                1,
                "{}",
                spec.name
            );
        }
    }

    #[test]
    fn workspace_paths_follow_organization() {
        let spec = ResourceKind::Workspace.spec();
        let ids = ids(&[("organization_id", "o-1"), ("workspace_id", "ws-42")]);
        assert_eq!(
            spec.path(Operation::Verb(Verb::List), &ids),
            "/organizations/o-1/workspaces"
        );
        assert_eq!(
            spec.path(Operation::Verb(Verb::Get), &ids),
            "/organizations/o-1/workspaces/ws-42"
        );
    }

    #[test]
    fn run_requires_full_ancestor_chain() {
        let spec = ResourceKind::Run.spec();
        assert_eq!(
            spec.required_keys(Operation::Verb(Verb::Get)),
            vec![
                "organization_id",
                "workspace_id",
                "runner_id",
                "run_id"
            ]
        );
        assert_eq!(
            spec.required_keys(Operation::Verb(Verb::List)),
            vec!["organization_id", "workspace_id", "runner_id"]
        );
    }

    #[test]
    fn action_path_appends_suffix() {
        let spec = ResourceKind::Runner.spec();
        let start = spec.action("start").unwrap();
        let ids = ids(&[
            ("organization_id", "o-1"),
            ("workspace_id", "w-1"),
            ("runner_id", "r-1"),
        ]);
        assert_eq!(
            spec.path(Operation::Action(start), &ids),
            "/organizations/o-1/workspaces/w-1/runners/r-1/start"
        );
        assert_eq!(Operation::Action(start).method(), HttpMethod::Post);
    }

    #[test]
    fn identifiers_are_percent_encoded() {
        let spec = ResourceKind::Organization.spec();
        let ids = ids(&[("organization_id", "a b/c")]);
        assert_eq!(
            spec.path(Operation::Verb(Verb::Get), &ids),
            "/organizations/a%20b%2Fc"
        );
    }

    #[test]
    fn operations_are_found_by_name() {
        let runner = ResourceKind::Runner.spec();
        assert_eq!(runner.operation("get"), Some(Operation::Verb(Verb::Get)));
        assert_eq!(runner.operation("stop").map(Operation::name), Some("stop"));
        assert_eq!(runner.operation("logs"), None);
        assert_eq!(runner.operations().count(), 7);
    }

    #[test]
    fn run_does_not_support_create() {
        let spec = ResourceKind::Run.spec();
        assert!(!spec.supports(Operation::Verb(Verb::Create)));
        assert!(spec.supports(Operation::Verb(Verb::Delete)));
        let start = ResourceKind::Runner.spec().action("start").unwrap();
        assert!(!spec.supports(Operation::Action(start)));
    }
}
