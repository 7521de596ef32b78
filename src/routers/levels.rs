use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{levels::LevelConfiguration, routers::Resp, state::AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelsResp {
  levels: Option<Arc<LevelConfiguration>>,
  source: String,
  last_failure: Option<String>,
}

pub async fn levels(State(state): State<Arc<AppState>>) -> Json<Resp<LevelsResp>> {
  let resp = LevelsResp {
    levels: state.loader.current(),
    source: state.loader.source().describe(),
    last_failure: state.loader.last_failure(),
  };

  Json(resp.into())
}
