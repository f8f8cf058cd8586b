mod support;

use babylon::application::errors::{BabylonError, exit_code_for};
use babylon::domain::api::{ApiError, HttpMethod};
use babylon::domain::config::ConfigKind;
use serde_json::json;
use support::{Harness, RecordingGateway, StaticCredentials};

#[tokio::test]
async fn workspace_get_resolves_ids_from_deployment() {
    let h = Harness::new(json!({ "id": "ws-42", "name": "demo" }), true);
    h.seed_defaults();

    let value = h.run(&["api", "workspace", "get"]).await.unwrap();

    assert_eq!(value, Some(json!({ "id": "ws-42", "name": "demo" })));
    let requests = h.gateway.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[0].path, "/organizations/o-1/workspaces/ws-42");
    assert_eq!(
        *h.gateway.base_urls.lock().unwrap(),
        vec!["https://api.example.com/v3"]
    );
    assert_eq!(
        *h.credentials.scopes.lock().unwrap(),
        vec!["api://babylon/.default"]
    );
    assert_eq!(h.output.values(), vec![json!({ "id": "ws-42", "name": "demo" })]);
}

#[tokio::test]
async fn explicit_flag_overrides_configuration() {
    let h = Harness::new(json!({}), true);
    h.seed_defaults();

    h.run(&["api", "workspace", "get", "--workspace-id", "ws-cli"])
        .await
        .unwrap();

    assert_eq!(
        h.gateway.requests()[0].path,
        "/organizations/o-1/workspaces/ws-cli"
    );
}

#[tokio::test]
async fn missing_key_fails_before_any_call() {
    let h = Harness::new(json!({}), true);
    h.seed_defaults();

    let err = h.run(&["api", "runner", "get"]).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<BabylonError>(),
        Some(BabylonError::MissingConfigurationKey { key, .. }) if key == "runner_id"
    ));
    assert_eq!(exit_code_for(&err), 4);
    assert!(h.gateway.base_urls.lock().unwrap().is_empty());
    assert!(h.gateway.requests().is_empty());
    assert!(h.credentials.scopes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_api_url_fails_before_token() {
    let h = Harness::new(json!({}), true);
    h.seed(ConfigKind::Platform, "bare", &[("api_scope", "s")]);
    h.seed(ConfigKind::Deployment, "dev", &[("organization_id", "o-1")]);

    let err = h.run(&["api", "organization", "get"]).await.unwrap_err();

    assert!(err.to_string().contains("api_url"));
    assert!(h.credentials.scopes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn declined_delete_makes_no_call() {
    let h = Harness::new(json!(null), false);
    h.seed_defaults();

    let err = h.run(&["api", "workspace", "delete"]).await.unwrap_err();

    assert_eq!(exit_code_for(&err), 3);
    assert_eq!(h.confirmer.asked(), 1);
    assert!(h.gateway.requests().is_empty());
    assert!(h.credentials.scopes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn forced_delete_skips_confirmation() {
    let h = Harness::new(json!(null), false);
    h.seed_defaults();

    let value = h.run(&["api", "workspace", "delete", "-f"]).await.unwrap();

    assert_eq!(value, Some(json!(null)));
    assert_eq!(h.confirmer.asked(), 0);
    let requests = h.gateway.requests();
    assert_eq!(requests[0].method, HttpMethod::Delete);
    assert_eq!(requests[0].path, "/organizations/o-1/workspaces/ws-42");
    assert!(h.output.values().is_empty());
}

#[tokio::test]
async fn argument_markers_are_substituted_before_parsing() {
    let h = Harness::new(json!({}), true);
    h.seed_defaults();

    h.run(&["api", "dataset", "list", "--workspace-id", "copy-%deploy%workspace_id"])
        .await
        .unwrap();

    assert_eq!(
        h.gateway.requests()[0].path,
        "/organizations/o-1/workspaces/copy-ws-42/datasets"
    );
}

#[tokio::test]
async fn platform_marker_does_not_fall_back_to_deployment() {
    let h = Harness::new(json!({}), true);
    h.seed_defaults();

    let err = h
        .run(&["api", "workspace", "get", "--workspace-id", "%platform%workspace_id"])
        .await
        .unwrap_err();

    assert_eq!(exit_code_for(&err), 4);
    assert!(err.to_string().contains("%platform%workspace_id"));
    assert!(h.gateway.requests().is_empty());
}

#[tokio::test]
async fn inline_payload_is_substituted() {
    let h = Harness::new(json!({ "id": "d-1" }), true);
    h.seed_defaults();

    h.run(&[
        "api",
        "dataset",
        "create",
        "--payload",
        r#"{"name": "%deploy%database_name", "tags": ["x"]}"#,
    ])
    .await
    .unwrap();

    let request = &h.gateway.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.path, "/organizations/o-1/workspaces/ws-42/datasets");
    assert_eq!(
        request.body,
        Some(json!({ "name": "db-main", "tags": ["x"] }))
    );
}

#[tokio::test]
async fn inline_payload_keeps_quotes_in_configured_values() {
    let h = Harness::new(json!({ "id": "d-1" }), true);
    h.seed_defaults();
    h.seed(
        ConfigKind::Deployment,
        "quoted",
        &[
            ("organization_id", "o-1"),
            ("workspace_id", "ws-42"),
            ("database_name", r#"db "main""#),
        ],
    );

    h.run(&[
        "api",
        "dataset",
        "create",
        r#"--payload={"name": "%deploy%database_name"}"#,
    ])
    .await
    .unwrap();

    assert_eq!(
        h.gateway.requests()[0].body,
        Some(json!({ "name": r#"db "main""# }))
    );
}

#[tokio::test]
async fn payload_file_is_read_as_yaml() {
    let h = Harness::new(json!({}), true);
    h.seed_defaults();
    let payload = h.dir.path().join("runner.yaml");
    std::fs::write(&payload, "name: nightly\nworkspace: \"%deploy%workspace_id\"\n").unwrap();

    h.run(&[
        "api",
        "runner",
        "update",
        "--runner-id",
        "r-1",
        "--payload",
        payload.to_str().unwrap(),
    ])
    .await
    .unwrap();

    let request = &h.gateway.requests()[0];
    assert_eq!(request.method, HttpMethod::Patch);
    assert_eq!(
        request.body,
        Some(json!({ "name": "nightly", "workspace": "ws-42" }))
    );
}

#[tokio::test]
async fn fields_are_projected_for_output_only() {
    let h = Harness::new(
        json!([{ "id": "r-1", "state": "ok", "logs": "…" }, { "id": "r-2", "state": "ko" }]),
        true,
    );
    h.seed_defaults();

    let value = h
        .run(&["api", "run", "list", "--runner-id", "r-9", "--fields", "id,state"])
        .await
        .unwrap();

    assert_eq!(
        h.gateway.requests()[0].path,
        "/organizations/o-1/workspaces/ws-42/runners/r-9/runs"
    );
    assert_eq!(
        h.output.values(),
        vec![json!([{ "id": "r-1", "state": "ok" }, { "id": "r-2", "state": "ko" }])]
    );
    assert_eq!(value.unwrap().as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn runner_start_posts_to_action_path() {
    let h = Harness::new(json!({ "id": "run-7" }), true);
    h.seed_defaults();

    h.run(&["api", "runner", "start", "--runner-id", "r-1"])
        .await
        .unwrap();

    let request = &h.gateway.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(
        request.path,
        "/organizations/o-1/workspaces/ws-42/runners/r-1/start"
    );
}

#[tokio::test]
async fn failed_authentication_stops_before_the_call() {
    let h = Harness::with_doubles(
        RecordingGateway::new(json!({})),
        StaticCredentials::failing("no credential source produced a token"),
        true,
    );
    h.seed_defaults();

    let err = h.run(&["api", "workspace", "get"]).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<BabylonError>(),
        Some(BabylonError::AuthenticationFailed(_))
    ));
    assert_eq!(exit_code_for(&err), 5);
    assert_eq!(
        *h.credentials.scopes.lock().unwrap(),
        vec!["api://babylon/.default"]
    );
    assert!(h.gateway.requests().is_empty());
    assert!(h.output.values().is_empty());
}

#[tokio::test]
async fn remote_errors_exit_with_api_code_and_print_nothing() {
    for error in [
        ApiError::NotFound("workspace ws-42".into()),
        ApiError::Unauthorized("token expired".into()),
    ] {
        let h = Harness::with_doubles(
            RecordingGateway::failing(error.clone()),
            StaticCredentials::default(),
            true,
        );
        h.seed_defaults();

        let err = h.run(&["api", "workspace", "get"]).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BabylonError>(),
            Some(BabylonError::RemoteApi(e)) if *e == error
        ));
        assert_eq!(exit_code_for(&err), 6);
        assert_eq!(h.gateway.requests().len(), 1);
        assert!(h.output.values().is_empty());
    }
}

#[tokio::test]
async fn output_file_is_reported() {
    let h = Harness::new(json!({ "id": "ws-42" }), true);
    h.seed_defaults();
    let target = h.dir.path().join("ws.json");

    h.run(&["api", "workspace", "get", "-o", target.to_str().unwrap()])
        .await
        .unwrap();

    assert_eq!(
        h.reporter.successes(),
        vec![format!("response written to {}", target.display())]
    );
}
