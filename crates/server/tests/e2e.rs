use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode as HttpStatusCode;
use service::store::{EntryStore, MemoryStore};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use server::errors::StartupError;
use server::startup;

struct TestApp {
    base_url: String,
    store: Arc<MemoryStore>,
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), StartupError>>,
}

impl TestApp {
    async fn shutdown(mut self) -> anyhow::Result<()> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.handle.await??;
        Ok(())
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let store = MemoryStore::shared();
    let shared: Arc<dyn EntryStore> = store.clone();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        startup::serve(listener, shared, async move {
            let _ = rx.await;
        })
        .await
    });

    Ok(TestApp { base_url, store, stop: Some(tx), handle })
}

#[tokio::test]
async fn e2e_welcome_page() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "<html><body><p>Welcome!</p></body></html>");
    app.shutdown().await
}

#[tokio::test]
async fn e2e_put_get_list() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.put(format!("{}/entry/color/blue", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "Updated: s.data[color] = blue");

    let res = c.get(format!("{}/entry/color", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "Read entry: s.data[color] = blue");

    c.put(format!("{}/entry/color/red", app.base_url)).send().await?;
    c.put(format!("{}/entry/a/1", app.base_url)).send().await?;
    let res = c.get(format!("{}/list", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "Read list: map[a:1 color:red]");

    assert_eq!(app.store.len().await, 2);
    app.shutdown().await
}

#[tokio::test]
async fn e2e_missing_key_is_200_with_empty_value() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/entry/missing", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "Read entry: s.data[missing] = ");
    app.shutdown().await
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    app.shutdown().await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn e2e_concurrent_clients() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let c = c.clone();
        let base = app.base_url.clone();
        tasks.push(tokio::spawn(async move {
            let res = c.put(format!("{base}/entry/k{i}/v{i}")).send().await?;
            anyhow::ensure!(res.status() == HttpStatusCode::OK);
            let body = c.get(format!("{base}/entry/k{i}")).send().await?.text().await?;
            anyhow::ensure!(body == format!("Read entry: s.data[k{i}] = v{i}"));
            Ok::<(), anyhow::Error>(())
        }));
    }
    for t in tasks {
        t.await??;
    }

    let snapshot = app.store.get_all().await;
    assert_eq!(snapshot.len(), 16);
    assert_eq!(snapshot.get("k7").map(String::as_str), Some("v7"));
    app.shutdown().await
}

#[tokio::test]
async fn bind_failure_is_reported() -> anyhow::Result<()> {
    let taken = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = taken.local_addr()?;

    let err = startup::run_with_shutdown(addr, MemoryStore::shared(), async {})
        .await
        .expect_err("port already in use");
    match err {
        StartupError::Bind { addr: failed, .. } => assert_eq!(failed, addr),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}
