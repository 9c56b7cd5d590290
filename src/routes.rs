//! HTTP routes of the demo service.
//!
//! Handlers are thin: pull parameters out of the [`Request`], call one
//! [`DemoService`] operation, wrap the outcome. Errors become responses
//! through `IntoResponse for ServiceError`.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::handler::with_state;
use crate::redirect::{self, RouteName};
use crate::request::Request;
use crate::response::{Json, Response};
use crate::router::Router;
use crate::service::DemoService;
use crate::validate::{validate_form, validate_json_body};
use crate::health;

/// Builds the full route table around `service`.
pub fn app(service: Arc<DemoService>) -> Router {
    Router::new()
        .get("/", index)
        .get("/dict", dict)
        .get("/json", json_view)
        .get("/sample", with_state(&service, sample_all))
        .get("/sample/{key}", with_state(&service, sample_get))
        .get("/sample/add/{key}/{value}", with_state(&service, sample_add))
        .get("/sample/remove/{key}", with_state(&service, sample_remove))
        .get("/list", with_state(&service, list))
        .get("/list/add/{value}", with_state(&service, list_add))
        .get("/redis", with_state(&service, visits))
        .get("/counter", with_state(&service, visits))
        .get("/random", random)
        .get("/login", login_form)
        .post("/login", login)
        .post("/receive_json", receive_json)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
}

// ── Static views ──────────────────────────────────────────────────────────────

async fn index(_req: Request) -> &'static str {
    info!("index visited");
    "Index Site"
}

async fn dict(_req: Request) -> Json<Value> {
    Json(json!({ "key": "value" }))
}

async fn json_view(_req: Request) -> Json<Value> {
    Json(json!({
        "name": "crossroad",
        "numbers": [1, 2, 3],
        "nested": { "ok": true },
    }))
}

// ── Samples ───────────────────────────────────────────────────────────────────

fn entry(key: &str, value: String) -> Json<HashMap<String, String>> {
    Json(HashMap::from([(key.to_owned(), value)]))
}

fn param<'r>(req: &'r Request, name: &str) -> Result<&'r str, ServiceError> {
    req.param(name)
        .ok_or_else(|| ServiceError::Validation(format!("missing path parameter `{name}`")))
}

async fn sample_all(svc: Arc<DemoService>, _req: Request) -> Json<HashMap<String, String>> {
    Json(svc.sample_all())
}

async fn sample_get(
    svc: Arc<DemoService>,
    req: Request,
) -> Result<Json<HashMap<String, String>>, ServiceError> {
    let key = param(&req, "key")?;
    Ok(entry(key, svc.sample(key)?))
}

async fn sample_add(
    svc: Arc<DemoService>,
    req: Request,
) -> Result<Json<HashMap<String, String>>, ServiceError> {
    let key = param(&req, "key")?;
    let value = param(&req, "value")?;
    debug!(key, value, "sample stored");
    Ok(entry(key, svc.add_sample(key, value)))
}

async fn sample_remove(
    svc: Arc<DemoService>,
    req: Request,
) -> Result<Json<HashMap<String, String>>, ServiceError> {
    let key = param(&req, "key")?;
    let value = svc.remove_sample(key)?;
    debug!(key, "sample removed");
    Ok(entry(key, value))
}

// ── List ──────────────────────────────────────────────────────────────────────

async fn list(svc: Arc<DemoService>, _req: Request) -> Json<Vec<i64>> {
    Json(svc.list())
}

/// Appends, then sends the client back to `/list` so a reload of the
/// resulting page does not append again.
async fn list_add(svc: Arc<DemoService>, req: Request) -> Result<Response, ServiceError> {
    let raw = param(&req, "value")?;
    let value: i64 = raw
        .parse()
        .map_err(|_| ServiceError::Validation(format!("not an integer: `{raw}`")))?;
    svc.add_to_list(value);
    Ok(Response::redirect(RouteName::SampleListView.path()))
}

// ── Counter ───────────────────────────────────────────────────────────────────

async fn visits(svc: Arc<DemoService>, _req: Request) -> Result<String, ServiceError> {
    let count = svc.visit().await?;
    Ok(count.to_string())
}

// ── Random redirect ───────────────────────────────────────────────────────────

async fn random(_req: Request) -> Response {
    let target = redirect::select();
    debug!(%target, "random redirect");
    Response::redirect(target.path())
}

// ── Bodies ────────────────────────────────────────────────────────────────────

async fn login_form(_req: Request) -> &'static str {
    "GET"
}

async fn login(req: Request) -> Result<String, ServiceError> {
    validate_form(&req.form())
}

async fn receive_json(req: Request) -> Result<Json<Value>, ServiceError> {
    let parsed = validate_json_body(req.header("content-type"), req.content_length(), req.body())?;
    Ok(Json(parsed))
}
