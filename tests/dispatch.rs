//! End-to-end dispatch tests: every lane delivered through a real listener.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use tokio::sync::mpsc;

use tenant_gateway::config::{GatewayConfig, GatewayMode};
use tenant_gateway::http::HttpServer;
use tenant_gateway::lifecycle::Shutdown;

mod common;

fn gateway_config(gateway_addr: SocketAddr, base_port: u16) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = gateway_addr.to_string();
    config.mode = GatewayMode::Production;
    config.hosts.app_base_host = Some("app.papermark.io".to_string());
    config.hosts.webhook_base_host = Some("hooks.papermark.io".to_string());
    config.upstreams.app = format!("127.0.0.1:{base_port}");
    config.upstreams.analytics = format!("127.0.0.1:{}", base_port + 1);
    config.upstreams.webhooks = format!("127.0.0.1:{}", base_port + 2);
    config.upstreams.domains = format!("127.0.0.1:{}", base_port + 3);
    config
}

async fn start_gateway(config: GatewayConfig, addr: SocketAddr) -> Shutdown {
    let shutdown = Shutdown::new();
    let (_update_tx, update_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, update_rx, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    shutdown
}

fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

async fn get_with_host(
    client: &reqwest::Client,
    gateway: SocketAddr,
    host: &str,
    path: &str,
) -> reqwest::Response {
    client
        .get(format!("http://{gateway}{path}"))
        .header(reqwest::header::HOST, host)
        .send()
        .await
        .expect("gateway unreachable")
}

#[tokio::test]
async fn test_lane_delivery() {
    let gateway_addr: SocketAddr = "127.0.0.1:28485".parse().unwrap();

    common::start_mock_upstream("127.0.0.1:28481".parse().unwrap(), "app").await;
    common::start_mock_upstream("127.0.0.1:28482".parse().unwrap(), "analytics").await;
    common::start_mock_upstream("127.0.0.1:28483".parse().unwrap(), "webhooks").await;
    common::start_mock_upstream("127.0.0.1:28484".parse().unwrap(), "domains").await;

    let config = gateway_config(gateway_addr, 28481);
    let shutdown = start_gateway(config, gateway_addr).await;
    let client = test_client();

    // Standard app traffic on a first-party host.
    let res = get_with_host(&client, gateway_addr, "app.papermark.io", "/dashboard").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "app");

    // Analytics ingestion wins even on a host that classifies as custom.
    let res = get_with_host(&client, gateway_addr, "tenant.example.com", "/ingest/e/capture").await;
    assert_eq!(res.text().await.unwrap(), "analytics");

    // Webhook hosts are dedicated, regardless of path.
    let res = get_with_host(&client, gateway_addr, "hooks.papermark.io", "/any/path").await;
    assert_eq!(res.text().await.unwrap(), "webhooks");

    // Unknown host in production goes to tenant-domain handling.
    let res = get_with_host(&client, gateway_addr, "tenant.io", "/view/abc").await;
    assert_eq!(res.text().await.unwrap(), "domains");

    shutdown.trigger();
}

#[tokio::test]
async fn test_viewer_guard_and_passthrough() {
    let gateway_addr: SocketAddr = "127.0.0.1:28585".parse().unwrap();

    common::start_mock_upstream("127.0.0.1:28581".parse().unwrap(), "app").await;
    common::start_mock_upstream("127.0.0.1:28582".parse().unwrap(), "analytics").await;
    common::start_mock_upstream("127.0.0.1:28583".parse().unwrap(), "webhooks").await;
    common::start_mock_upstream("127.0.0.1:28584".parse().unwrap(), "domains").await;

    let config = gateway_config(gateway_addr, 28581);
    let shutdown = start_gateway(config, gateway_addr).await;
    let client = test_client();

    // File-extension-looking viewer paths are answered 404 inline.
    let res = get_with_host(&client, gateway_addr, "app.papermark.io", "/view/report.pdf").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Blocked substrings too.
    let res = get_with_host(&client, gateway_addr, "app.papermark.io", "/view/x/phpmyadmin").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Clean viewer paths pass through to the origin unmodified.
    let res = get_with_host(&client, gateway_addr, "app.papermark.io", "/view/abc123").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "app");

    // Excluded paths never reach the dispatcher: straight to the origin.
    let res = get_with_host(&client, gateway_addr, "app.papermark.io", "/api/health").await;
    assert_eq!(res.text().await.unwrap(), "app");

    shutdown.trigger();
}

#[tokio::test]
async fn test_admin_api() {
    let gateway_addr: SocketAddr = "127.0.0.1:28685".parse().unwrap();
    let admin_addr: SocketAddr = "127.0.0.1:28686".parse().unwrap();

    common::start_mock_upstream("127.0.0.1:28681".parse().unwrap(), "app").await;
    common::start_mock_upstream("127.0.0.1:28682".parse().unwrap(), "analytics").await;
    common::start_mock_upstream("127.0.0.1:28683".parse().unwrap(), "webhooks").await;
    common::start_mock_upstream("127.0.0.1:28684".parse().unwrap(), "domains").await;

    let mut config = gateway_config(gateway_addr, 28681);
    config.admin.enabled = true;
    config.admin.api_key = "test-admin-key".to_string();
    config.admin.bind_address = admin_addr.to_string();

    let shutdown = start_gateway(config, gateway_addr).await;
    let client = test_client();

    // No bearer token: rejected.
    let res = client
        .get(format!("http://{admin_addr}/admin/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Status with auth.
    let res = client
        .get(format!("http://{admin_addr}/admin/status"))
        .bearer_auth("test-admin-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let status: serde_json::Value = res.json().await.unwrap();
    assert_eq!(status["mode"], "production");

    // Resolved allowlist is visible.
    let res = client
        .get(format!("http://{admin_addr}/admin/allowlist"))
        .bearer_auth("test-admin-key")
        .send()
        .await
        .unwrap();
    let allowlist: serde_json::Value = res.json().await.unwrap();
    let hosts: Vec<&str> = allowlist["hosts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h.as_str().unwrap())
        .collect();
    assert!(hosts.contains(&"localhost"));
    assert!(hosts.contains(&"app.papermark.io"));

    // Dry-run classification.
    let res = client
        .get(format!("http://{admin_addr}/admin/classify"))
        .query(&[("host", "tenant.io"), ("path", "/view/abc")])
        .bearer_auth("test-admin-key")
        .send()
        .await
        .unwrap();
    let result: serde_json::Value = res.json().await.unwrap();
    assert_eq!(result["lane"], "domains");

    shutdown.trigger();
}
