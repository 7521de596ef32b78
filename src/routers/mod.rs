mod catalog;
mod deploy;
mod detect;
mod levels;

use std::sync::Arc;

use axum::{routing::get, Router};
use serde::Serialize;

use crate::state::AppState;

pub use catalog::{countries, debug_days, debug_hours, timezones};
pub use deploy::{current, deploy};
pub use detect::detect;
pub use levels::levels;

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/", get(|| async { "Should you deploy today? Ask /api/deploy" }))
    .route("/api/deploy", get(deploy))
    .route("/api/current", get(current))
    .route("/api/config", get(levels))
    .route("/api/detect", get(detect))
    .route("/api/countries", get(countries))
    .route("/api/timezones", get(timezones))
    .route("/api/debug/days", get(debug_days))
    .route("/api/debug/hours", get(debug_hours))
    .with_state(state)
}

#[derive(Serialize)]
pub struct Resp<T> {
  code: i32,
  data: T,
}

impl<T> From<T> for Resp<T> {
  fn from(data: T) -> Self {
    Resp { code: 0, data }
  }
}

#[derive(Serialize)]
pub struct ErrResp {
  msg: String,
}

impl From<&str> for ErrResp {
  fn from(msg: &str) -> Self {
    ErrResp { msg: msg.to_owned() }
  }
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ErrOr<T> {
  Err(ErrResp),
  Ok(Resp<T>),
}
