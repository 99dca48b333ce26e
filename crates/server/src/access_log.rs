use std::{net::SocketAddr, time::Instant};

use axum::{
    extract::{ConnectInfo, Request},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use common::ACCESS_LOG_TARGET;
use service::UserId;
use tracing::info;

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

/// One `access_log` event per completed request, in the spirit of the combined log format.
pub async fn log_request(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let user_agent = header_str(req.headers(), header::USER_AGENT);
    let referrer = header_str(req.headers(), header::REFERER);

    let response = next.run(req).await;

    let user_id = response
        .extensions()
        .get::<UserId>()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    info!(
        target: ACCESS_LOG_TARGET,
        %remote_addr,
        %user_id,
        %method,
        path = %uri,
        version = ?version,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_secs_f64() * 1000.0,
        %referrer,
        %user_agent,
        "request completed"
    );
    response
}
