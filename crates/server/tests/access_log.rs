use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::ACCESS_LOG_TARGET;
use service::Registry;
use tower::ServiceExt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use server::{build_router, AppState};

type Fields = HashMap<String, String>;

/// Records the fields of every event as `(target, fields)`.
#[derive(Clone, Default)]
struct Capture {
    events: Arc<Mutex<Vec<(String, Fields)>>>,
}

impl Capture {
    fn with_target(&self, target: &str) -> Vec<Fields> {
        self.events
            .lock()
            .map(|events| {
                events
                    .iter()
                    .filter(|(t, _)| t == target)
                    .map(|(_, f)| f.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn with_field(&self, name: &str, value: &str) -> Vec<Fields> {
        self.events
            .lock()
            .map(|events| {
                events
                    .iter()
                    .filter(|(_, f)| f.get(name).map(String::as_str) == Some(value))
                    .map(|(_, f)| f.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

struct FieldVisitor<'a>(&'a mut Fields);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::new();
        event.record(&mut FieldVisitor(&mut fields));
        if let Ok(mut events) = self.events.lock() {
            events.push((event.metadata().target().to_string(), fields));
        }
    }
}

fn get(uri: &str, user: Option<&str>) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::USER_AGENT, "registry-tests");
    if let Some(user) = user {
        builder = builder.header("X-User-ID", user);
    }
    Ok(builder.body(Body::empty())?)
}

#[tokio::test]
async fn one_access_log_event_per_request() -> anyhow::Result<()> {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = build_router(AppState::new(Arc::new(Registry::new())));

    let resp = app.clone().oneshot(get("/customers", Some("u1"))?).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let events = capture.with_target(ACCESS_LOG_TARGET);
    assert_eq!(events.len(), 1);
    let identified = &events[0];
    assert_eq!(identified["method"], "GET");
    assert_eq!(identified["path"], "/customers");
    assert_eq!(identified["status"], "200");
    assert_eq!(identified["user_id"], "u1");
    assert_eq!(identified["user_agent"], "registry-tests");
    assert_eq!(identified["remote_addr"], "-");
    assert!(identified.contains_key("latency_ms"));

    let resp = app.clone().oneshot(get("/customer/nope", None)?).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let events = capture.with_target(ACCESS_LOG_TARGET);
    assert_eq!(events.len(), 2);
    let unidentified = &events[1];
    assert_eq!(unidentified["path"], "/customer/nope");
    assert_eq!(unidentified["status"], "403");
    assert_eq!(unidentified["user_id"], "-");

    // a handler-level rejection is logged at info and still yields a single access line
    let resp = app.clone().oneshot(get("/customer/nope", Some("u1"))?).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(capture.with_target(ACCESS_LOG_TARGET).len(), 3);
    let rejected = capture.with_field("event", "rejected");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["reason"], "not_found");
    Ok(())
}
