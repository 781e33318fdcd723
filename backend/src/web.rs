use crate::state::AppState;
use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::de::IgnoredAny;
use serde_json::json;
use thiserror::Error;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};
use tracker_shared::ip::PROXY_PATH;

/// Body sent to the browser whenever the proxy cannot produce provider JSON.
const PROXY_FAILURE_MESSAGE: &str = "Failed to fetch IP location data";

/// Public router constructor
pub fn router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir)
        .precompressed_br()
        .precompressed_gzip();

    Router::new()
        .route(PROXY_PATH, get(get_ip_location))
        .route("/healthz", get(healthz))
        // anything that doesn't match the above routes goes to the static files
        .fallback_service(static_dir)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream body is not JSON: {0}")]
    NotJson(#[from] serde_json::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!(error = %self, "IP location proxy failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": PROXY_FAILURE_MESSAGE })),
        )
            .into_response()
    }
}

/// GET /api/ip-location
///
/// Forwards to the configured provider and relays its JSON body untouched.
/// The upstream status is kept so the browser still sees a 429 as a 429,
/// even when the provider's error page is not JSON.
async fn get_ip_location(State(state): State<AppState>) -> Result<Response, ProxyError> {
    let upstream = state.http.get(&state.config.provider_url).send().await?;
    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);
    let body = upstream.bytes().await?;

    // JSON bodies go out as received.
    let body = match serde_json::from_slice::<IgnoredAny>(&body) {
        Ok(_) => body,
        Err(e) if !status.is_success() => {
            debug!(%status, error = %e, "upstream error body is not JSON, replacing it");
            Bytes::from(
                json!({ "error": format!("IP location provider responded with HTTP {}", status.as_u16()) })
                    .to_string(),
            )
        }
        Err(e) => return Err(ProxyError::NotJson(e)),
    };
    debug!(%status, bytes = body.len(), "relaying IP location response");

    Ok((
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            // The answer depends on who is asking.
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
        body,
    )
        .into_response())
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use tokio::net::TcpListener;

    const IPAPI_BODY: &str = r#"{"ip":"203.0.113.7","org":"Example ISP","city":"Buffalo","region":"New York","country_name":"United States","latitude":42.8864,"longitude":-78.8784}"#;

    async fn serve(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        addr
    }

    async fn fake_provider(status: StatusCode, body: &'static str) -> SocketAddr {
        serve(Router::new().route(
            "/json/",
            get(move || async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }),
        ))
        .await
    }

    async fn tracker(provider_url: String, static_dir: PathBuf) -> SocketAddr {
        let config = Config {
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            provider_url,
            static_dir,
            user_agent: "tracker-tests".into(),
        };
        serve(router(AppState::new(config).expect("client builds"))).await
    }

    async fn tracker_for(provider: SocketAddr) -> SocketAddr {
        tracker(
            format!("http://{provider}/json/"),
            PathBuf::from("./does-not-exist"),
        )
        .await
    }

    async fn get_proxy(addr: SocketAddr) -> reqwest::Response {
        reqwest::get(format!("http://{addr}/api/ip-location"))
            .await
            .expect("proxy reachable")
    }

    #[tokio::test]
    async fn relays_provider_json_verbatim() {
        let provider = fake_provider(StatusCode::OK, IPAPI_BODY).await;
        let resp = get_proxy(tracker_for(provider).await).await;

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
        let body = resp.text().await.expect("body");
        assert_eq!(body, IPAPI_BODY);

        let location = tracker_shared::ip::parse_ip_response(200, body.as_bytes())
            .expect("relayed body parses");
        assert_eq!(location.position, tracker_shared::Position::new(42.8864, -78.8784));
    }

    #[tokio::test]
    async fn keeps_rate_limit_status() {
        let provider = fake_provider(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":true,"reason":"RateLimited"}"#,
        )
        .await;
        let resp = get_proxy(tracker_for(provider).await).await;
        assert_eq!(resp.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn keeps_rate_limit_status_for_plain_text_body() {
        let provider = fake_provider(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests").await;
        let resp = get_proxy(tracker_for(provider).await).await;

        let status = resp.status().as_u16();
        assert_eq!(status, 429);
        let body = resp.bytes().await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json error body");
        assert!(json["error"].is_string());

        assert_eq!(
            tracker_shared::ip::parse_ip_response(status, &body),
            Err(tracker_shared::LocateError::RateLimited)
        );
    }

    #[tokio::test]
    async fn html_error_page_keeps_upstream_status() {
        let provider = fake_provider(StatusCode::SERVICE_UNAVAILABLE, "<html>down</html>").await;
        let resp = get_proxy(tracker_for(provider).await).await;

        assert_eq!(resp.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = resp.json().await.expect("json error body");
        assert_eq!(
            body,
            json!({ "error": "IP location provider responded with HTTP 503" })
        );
    }

    #[tokio::test]
    async fn non_json_upstream_is_a_500() {
        let provider = fake_provider(StatusCode::OK, "<html>maintenance</html>").await;
        let resp = get_proxy(tracker_for(provider).await).await;

        assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = resp.json().await.expect("json error body");
        assert_eq!(body, json!({ "error": "Failed to fetch IP location data" }));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_500() {
        let closed = {
            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
            listener.local_addr().expect("addr")
        };
        let resp = get_proxy(tracker_for(closed).await).await;

        assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = resp.json().await.expect("json error body");
        assert_eq!(body["error"], "Failed to fetch IP location data");
    }

    #[tokio::test]
    async fn serves_frontend_and_health() {
        let dir = std::env::temp_dir().join(format!("tracker-static-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create static dir");
        std::fs::write(dir.join("index.html"), "<h1>Location Tracker</h1>").expect("write index");

        let addr = tracker("http://127.0.0.1:9/json/".into(), dir.clone()).await;

        let page = reqwest::get(format!("http://{addr}/"))
            .await
            .expect("static reachable")
            .text()
            .await
            .expect("body");
        assert!(page.contains("Location Tracker"));

        let health = reqwest::get(format!("http://{addr}/healthz"))
            .await
            .expect("health reachable")
            .text()
            .await
            .expect("body");
        assert_eq!(health, "ok");

        let _ = std::fs::remove_dir_all(dir);
    }
}
