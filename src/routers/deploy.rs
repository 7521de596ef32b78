use std::sync::Arc;

use axum::{
  extract::{rejection::QueryRejection, Query, State},
  http::StatusCode,
  Json,
};
use chrono::Utc;

use crate::{
  error::ResponseError,
  response::{DeployQuery, DeployResponse},
  routers::ErrOr,
  state::AppState,
};

pub async fn deploy(
  State(state): State<Arc<AppState>>,
  query: Result<Query<DeployQuery>, QueryRejection>,
) -> (StatusCode, Json<ErrOr<DeployResponse>>) {
  let Query(query) = match query {
    Ok(query) => query,
    Err(err) => {
      tracing::error!(error = %err, "Malformed query");

      return (
        StatusCode::BAD_REQUEST,
        Json(ErrOr::Err(ResponseError::PUBLIC_MESSAGE.into())),
      );
    },
  };

  match state.deploy(&query, Utc::now()).await {
    Ok(resp) => {
      tracing::info!(
        level = resp.level.as_str(),
        country = %resp.context.country,
        "Response generated",
      );

      (StatusCode::OK, Json(ErrOr::Ok(resp.into())))
    },
    Err(err) => {
      tracing::error!(error = %err, "Error generating response");

      (
        StatusCode::BAD_REQUEST,
        Json(ErrOr::Err(ResponseError::PUBLIC_MESSAGE.into())),
      )
    },
  }
}

pub async fn current(
  State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ErrOr<DeployResponse>>) {
  match state.current.latest() {
    Some(resp) => (StatusCode::OK, Json(ErrOr::Ok(resp.into()))),
    None => (
      StatusCode::NOT_FOUND,
      Json(ErrOr::Err("No evaluation yet!".into())),
    ),
  }
}
