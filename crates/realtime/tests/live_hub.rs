use std::sync::Arc;
use std::time::Duration;

use indkob_core::events::ChangeKind;
use indkob_core::grocery::NewGroceryEntry;
use indkob_realtime::{
    AuthState, AuthUser, ConnectionState, GroceryApiClient, GroceryListSync, RealtimeClient,
    RealtimeConfig, SseConnector, SyncConfig,
};
use indkob_server::{api::app_router, build_state, config::Config};
use tokio::time::timeout;

async fn spawn_backend() -> String {
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(5),
        static_dir: "dist".to_string(),
        event_buffer: 64,
        hub_keep_alive: Duration::from_secs(15),
        seed_default_items: false,
    };
    let state = build_state(&config).await.unwrap();
    let router = app_router(state, &config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn signed_in() -> AuthState {
    AuthState::signed_in(AuthUser {
        id: 1,
        user_name: "mette".into(),
        is_admin: true,
    })
}

fn note(text: &str) -> NewGroceryEntry {
    NewGroceryEntry {
        note: Some(text.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn hub_delivers_resync_then_created() {
    let base = spawn_backend().await;
    let api = GroceryApiClient::new(&base).unwrap();
    let connector = Arc::new(SseConnector::new(&base).unwrap());
    let client = RealtimeClient::new(connector, signed_in(), RealtimeConfig::default());
    let mut changes = client.subscribe_changes();

    client.ensure_started().await;
    assert_eq!(client.state(), ConnectionState::Connected);

    let first = timeout(Duration::from_secs(5), changes.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.kind, ChangeKind::Resync);

    let created = api.create_entry(&note("Kaffefiltre")).await.unwrap();
    let event = timeout(Duration::from_secs(5), changes.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.kind, ChangeKind::Created);
    assert_eq!(event.entry_id, Some(created.id));

    client.shutdown().await;
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn list_follows_writes_from_another_client() {
    let base = spawn_backend().await;
    let other_device = GroceryApiClient::new(&base).unwrap();
    let api = Arc::new(GroceryApiClient::new(&base).unwrap());
    let connector = Arc::new(SseConnector::new(&base).unwrap());
    let client = RealtimeClient::new(connector, signed_in(), RealtimeConfig::default());

    let sync = GroceryListSync::new(api, SyncConfig::default());
    let handle = sync.start(client.subscribe_changes());
    client.ensure_started().await;

    other_device.create_entry(&note("Mælk")).await.unwrap();
    other_device.create_entry(&note("Æbler")).await.unwrap();

    let mut entries = sync.subscribe_entries();
    timeout(Duration::from_secs(5), entries.wait_for(|list| list.len() == 2))
        .await
        .unwrap()
        .unwrap();

    other_device.clear_entries().await.unwrap();
    timeout(Duration::from_secs(5), entries.wait_for(|list| list.is_empty()))
        .await
        .unwrap()
        .unwrap();

    handle.shutdown().await;
    client.shutdown().await;
}
