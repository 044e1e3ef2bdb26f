mod common;

use common::{TestApp, raw_fields};
use serde_json::json;

use paperhub::{
    models::users::Role,
    models::workspaces::DEFAULT_SYSTEM_PROMPT,
    queries,
    services::telemetry::TelemetrySink,
    services::workspaces,
};

#[tokio::test]
async fn test_prompt_change_archives_previous_and_logs_event() {
    let app = TestApp::new().await;
    let editor = app.create_user("editor", Role::Manager).await;
    let mut conn = app.conn().await;
    let telemetry = TelemetrySink::disabled();

    let workspace = workspaces::create_workspace(
        conn.as_mut(),
        Some("Prompted"),
        Some(editor.id),
        &raw_fields(json!({ "systemPrompt": "Answer like a librarian." })),
    )
    .await
    .unwrap();

    let updates = raw_fields(json!({ "systemPrompt": "Answer like a patent examiner." }));
    let previous = workspace.clone();
    workspaces::update_workspace(conn.as_mut(), workspace.id, &updates)
        .await
        .unwrap();
    workspaces::record_prompt_change(conn.as_mut(), &telemetry, &previous, &updates, Some(&editor))
        .await;

    let history = workspaces::list_prompt_history(conn.as_mut(), workspace.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].prompt, "Answer like a librarian.");
    assert_eq!(history[0].modified_by, Some(editor.id));

    let events = queries::event_logs::list_by_event(conn.as_mut(), "workspace_prompt_changed")
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].user_id, Some(editor.id));
    let metadata: serde_json::Value =
        serde_json::from_str(events[0].metadata.as_deref().unwrap()).unwrap();
    assert_eq!(metadata["workspaceName"], "Prompted");
    assert_eq!(metadata["prevSystemPrompt"], "Answer like a librarian.");
    assert_eq!(metadata["newSystemPrompt"], "Answer like a patent examiner.");
}

#[tokio::test]
async fn test_first_prompt_logs_event_without_archiving() {
    let app = TestApp::new().await;
    let editor = app.create_user("editor", Role::Default).await;
    // no previous prompt: nothing to archive, but the change is still logged
    let workspace = app.create_workspace("Fresh", None).await;
    let mut conn = app.conn().await;
    let telemetry = TelemetrySink::disabled();
    let updates = raw_fields(json!({ "systemPrompt": "Be terse." }));
    workspaces::update_workspace(conn.as_mut(), workspace.id, &updates)
        .await
        .unwrap();
    workspaces::record_prompt_change(conn.as_mut(), &telemetry, &workspace, &updates, Some(&editor))
        .await;

    let history = workspaces::list_prompt_history(conn.as_mut(), workspace.id)
        .await
        .unwrap();
    assert!(history.is_empty());

    let events = queries::event_logs::list_by_event(conn.as_mut(), "workspace_prompt_changed")
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    let metadata: serde_json::Value =
        serde_json::from_str(events[0].metadata.as_deref().unwrap()).unwrap();
    // absent previous prompt reports the default sentinel
    assert_eq!(metadata["prevSystemPrompt"], DEFAULT_SYSTEM_PROMPT);
}

#[tokio::test]
async fn test_no_tracking_when_prompt_not_in_update() {
    let app = TestApp::new().await;
    let workspace = app.create_workspace("Quiet", None).await;
    let mut conn = app.conn().await;
    let telemetry = TelemetrySink::disabled();
    let updates = raw_fields(json!({ "topN": 6 }));
    workspaces::update_workspace(conn.as_mut(), workspace.id, &updates)
        .await
        .unwrap();
    workspaces::record_prompt_change(conn.as_mut(), &telemetry, &workspace, &updates, None).await;

    let events = queries::event_logs::list_by_event(conn.as_mut(), "workspace_prompt_changed")
        .await
        .unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_no_tracking_when_prompt_set_to_default_sentinel() {
    let app = TestApp::new().await;
    let mut conn = app.conn().await;
    let telemetry = TelemetrySink::disabled();

    let workspace = workspaces::create_workspace(
        conn.as_mut(),
        Some("Sentinel"),
        None,
        &raw_fields(json!({ "systemPrompt": "Custom prompt." })),
    )
    .await
    .unwrap();

    let updates = raw_fields(json!({ "systemPrompt": DEFAULT_SYSTEM_PROMPT }));
    workspaces::record_prompt_change(conn.as_mut(), &telemetry, &workspace, &updates, None).await;

    let events = queries::event_logs::list_by_event(conn.as_mut(), "workspace_prompt_changed")
        .await
        .unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_no_tracking_when_prompt_unchanged() {
    let app = TestApp::new().await;
    let mut conn = app.conn().await;
    let telemetry = TelemetrySink::disabled();

    let workspace = workspaces::create_workspace(
        conn.as_mut(),
        Some("Same Again"),
        None,
        &raw_fields(json!({ "systemPrompt": "Stay the course." })),
    )
    .await
    .unwrap();

    let updates = raw_fields(json!({ "systemPrompt": "Stay the course." }));
    workspaces::record_prompt_change(conn.as_mut(), &telemetry, &workspace, &updates, None).await;

    let history = workspaces::list_prompt_history(conn.as_mut(), workspace.id)
        .await
        .unwrap();
    assert!(history.is_empty());
    let events = queries::event_logs::list_by_event(conn.as_mut(), "workspace_prompt_changed")
        .await
        .unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_clear_prompt_history() {
    let app = TestApp::new().await;
    let editor = app.create_user("editor", Role::Default).await;
    let mut conn = app.conn().await;
    let telemetry = TelemetrySink::disabled();

    let workspace = workspaces::create_workspace(
        conn.as_mut(),
        Some("Wiped"),
        None,
        &raw_fields(json!({ "systemPrompt": "First." })),
    )
    .await
    .unwrap();

    let updates = raw_fields(json!({ "systemPrompt": "Second." }));
    workspaces::update_workspace(conn.as_mut(), workspace.id, &updates)
        .await
        .unwrap();
    workspaces::record_prompt_change(conn.as_mut(), &telemetry, &workspace, &updates, Some(&editor))
        .await;

    let cleared = workspaces::clear_prompt_history(conn.as_mut(), workspace.id)
        .await
        .unwrap();
    assert_eq!(cleared, 1);

    let history = workspaces::list_prompt_history(conn.as_mut(), workspace.id)
        .await
        .unwrap();
    assert!(history.is_empty());
}
