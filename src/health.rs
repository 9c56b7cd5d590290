//! Health probes.
//!
//! | Probe | Path | Answer |
//! |---|---|---|
//! | Liveness | `/healthz` | the process can answer HTTP |
//! | Readiness | `/readyz` | the routes are installed |
//!
//! Readiness does not touch the counter backend: an `INCR` probe would
//! inflate the visit count. `/counter` reports `503` when Redis is gone.

use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Always `200 OK` with body `"ready"`.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
