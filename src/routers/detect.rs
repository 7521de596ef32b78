use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{
  locale::{detect_country, find_country, timezone_for, title_for, Country, Timezone},
  routers::ErrOr,
  state::AppState,
};

#[derive(Serialize)]
pub struct DetectResp {
  country: &'static Country,
  timezone: Option<&'static Timezone>,
  title: &'static str,
  detected: bool,
}

#[tracing::instrument(name = "detect", skip_all)]
pub async fn detect(
  State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ErrOr<DetectResp>>) {
  let detected = detect_country(&state.http, &state.geoip_url).await;

  let country = match detected.or_else(|| find_country(&state.default_country)) {
    Some(country) => country,
    None => {
      tracing::error!(country = %state.default_country, "Default country is not supported!");

      return (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrOr::Err("No usable country!".into())),
      );
    },
  };

  let resp = DetectResp {
    country,
    timezone: timezone_for(country),
    title: title_for(country.language),
    detected: detected.is_some(),
  };

  (StatusCode::OK, Json(ErrOr::Ok(resp.into())))
}
