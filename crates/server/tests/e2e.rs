use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;

use server::routes;
use server::startup::build_cors;
use server::state::AppState;
use service::store::{MemoryStatusStore, RedisStatusStore, StatusStore};

struct TestApp {
    base_url: String,
}

async fn start_server(store: Arc<dyn StatusStore>, timeout: Duration) -> anyhow::Result<TestApp> {
    let app = routes::build_router(AppState::new(store, timeout), build_cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn closed_port() -> anyhow::Result<u16> {
    let spare = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(spare.local_addr()?.port())
}

#[tokio::test]
async fn e2e_register_and_read_over_http() -> anyhow::Result<()> {
    let app = start_server(Arc::new(MemoryStatusStore::new()), Duration::from_secs(1)).await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/status/register", app.base_url))
        .json(&json!({"key": "alpha", "value": "42"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "Set alpha to 42");

    let res = c.get(format!("{}/status/alpha", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "42");

    let res = c.get(format!("{}/status/unknown-key", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_unreachable_redis_is_503() -> anyhow::Result<()> {
    let store = RedisStatusStore::new(&format!("redis://127.0.0.1:{}/", closed_port()?))?;
    let app = start_server(Arc::new(store), Duration::from_millis(300)).await?;
    let c = reqwest::Client::new();

    let res = c.get(format!("{}/status/alpha", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::SERVICE_UNAVAILABLE);

    let res = c.post(format!("{}/status/register", app.base_url))
        .json(&json!({"key": "alpha", "value": "42"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::SERVICE_UNAVAILABLE);

    let res = c.get(format!("{}/ready", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}
