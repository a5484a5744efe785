//! Drives `ApiClient` against a real server bound to an ephemeral port.

use std::sync::Arc;

use client::{
    Flow,
    api::ApiClient,
    commands::Command,
    execute,
    models::CreateActionRequest,
};
use coop_decide::{
    routes::{AppState, router},
    store::MemoryStore,
};

async fn spawn_backend() -> ApiClient {
    let app = router(AppState::new(Arc::new(MemoryStore::new())));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });

    ApiClient::new(format!("http://{addr}/"))
}

#[tokio::test]
async fn full_decision_flow() {
    let api = spawn_backend().await;

    let alice = api.create_user("alice", vec!["fairness".into()]).await.unwrap();
    let bob = api.create_user("bob", vec![]).await.unwrap();
    let carol = api.create_user("carol", vec![]).await.unwrap();
    assert_eq!(api.list_users().await.unwrap().len(), 3);

    let research = api
        .create_element("Climate Change Research", Some("project"))
        .await
        .unwrap();
    let roofs = api.create_element("Solar roofs", None).await.unwrap();
    assert_eq!(roofs.element_type, "knowledge_piece");

    let message = api.link_elements(&research.id, &roofs.id).await.unwrap();
    assert!(message.contains(&research.id));

    let hits = api.search_elements("solar").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].related, vec![research.id.clone()]);

    let action = api
        .create_action(&CreateActionRequest {
            user_id: alice.id.clone(),
            element_id: Some(research.id.clone()),
            action_type: "proposal".into(),
            content: "We should focus on renewable energy".into(),
            linked_elements: vec![],
        })
        .await
        .unwrap();

    api.vote(&action.id, &alice.id, 1).await.unwrap();
    api.vote(&action.id, &bob.id, 1).await.unwrap();
    api.vote(&action.id, &carol.id, -1).await.unwrap();

    let decision = api.decision(&action.id).await.unwrap();
    assert_eq!(decision.score, 1);
    assert_eq!(decision.total_votes, 3);
    assert!(decision.is_approved);

    // bob re-votes; the ballot is replaced, not added
    api.vote(&action.id, &bob.id, -1).await.unwrap();
    let decision = api.decision(&action.id).await.unwrap();
    assert_eq!(decision.score, -1);
    assert_eq!(decision.total_votes, 3);
    assert!(!decision.is_approved);
    assert_eq!(decision.outcome, "rejected");
}

#[tokio::test]
async fn failures_surface_as_errors() {
    let api = spawn_backend().await;

    let err = api.decision("not-a-uuid").await.unwrap_err();
    assert!(err.to_string().contains("400"), "{err}");

    let err = api.create_user("", vec![]).await.unwrap_err();
    assert!(err.to_string().contains("username is required"), "{err}");

    let user = api.create_user("dana", vec![]).await.unwrap();
    let action = api
        .create_action(&CreateActionRequest {
            user_id: user.id.clone(),
            element_id: None,
            action_type: "opinion".into(),
            content: "More benches".into(),
            linked_elements: vec![],
        })
        .await
        .unwrap();
    let err = api.vote(&action.id, &user.id, 7).await.unwrap_err();
    assert!(err.to_string().contains("400"), "{err}");
}

#[tokio::test]
async fn single_resource_reads() {
    let api = spawn_backend().await;

    let health = api.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.store, "memory");

    let user = api.create_user("frank", vec!["openness".into()]).await.unwrap();
    let fetched = api.get_user(&user.id).await.unwrap();
    assert_eq!(fetched.username, "frank");
    assert_eq!(fetched.guiding_values, ["openness"]);

    let park = api.create_element("Pocket park", Some("project")).await.unwrap();
    let trees = api.create_element("Tree survey", None).await.unwrap();
    api.link_elements(&park.id, &trees.id).await.unwrap();
    let fetched = api.get_element(&trees.id).await.unwrap();
    assert_eq!(fetched.title, "Tree survey");
    assert_eq!(fetched.related, vec![park.id.clone()]);

    let action = api
        .create_action(&CreateActionRequest {
            user_id: user.id.clone(),
            element_id: Some(park.id.clone()),
            action_type: "proposal".into(),
            content: String::new(),
            linked_elements: vec![trees.id.clone()],
        })
        .await
        .unwrap();
    let fetched = api.get_action(&action.id).await.unwrap();
    assert_eq!(fetched.element_id.as_deref(), Some(park.id.as_str()));
    assert_eq!(fetched.linked_elements, vec![trees.id.clone()]);
    assert_eq!(fetched.content, "");

    let missing = "00000000-0000-0000-0000-000000000000";
    for err in [
        api.get_user(missing).await.unwrap_err(),
        api.get_element(missing).await.unwrap_err(),
        api.get_action(missing).await.unwrap_err(),
    ] {
        assert!(err.to_string().contains("404"), "{err}");
    }
}

#[tokio::test]
async fn unreachable_backend_is_an_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(format!("http://{addr}"));
    assert!(api.list_users().await.is_err());
}

#[tokio::test]
async fn execute_runs_commands() {
    let api = spawn_backend().await;

    let flow = execute(
        &api,
        Command::parse("create_user erin").unwrap().unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(flow, Flow::Continue);
    assert_eq!(api.list_users().await.unwrap()[0].username, "erin");

    let err = execute(
        &api,
        Command::parse("decision_outcome 00000000-0000-0000-0000-000000000000")
            .unwrap()
            .unwrap(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("404"), "{err}");

    let user_id = api.list_users().await.unwrap()[0].id.clone();
    execute(
        &api,
        Command::parse(&format!("create_action {user_id} - opinion"))
            .unwrap()
            .unwrap(),
    )
    .await
    .unwrap();
    let actions = api.list_actions().await.unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].content, "");
    assert!(actions[0].linked_elements.is_empty());

    let flow = execute(&api, Command::Quit).await.unwrap();
    assert_eq!(flow, Flow::Quit);
}
