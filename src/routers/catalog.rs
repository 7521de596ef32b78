use axum::Json;

use crate::{
  locale::{self, Choice, Country, Timezone, COUNTRIES, TIMEZONES},
  routers::Resp,
};

pub async fn countries() -> Json<Resp<&'static [Country]>> {
  Json(COUNTRIES.as_slice().into())
}

pub async fn timezones() -> Json<Resp<&'static [Timezone]>> {
  Json(TIMEZONES.as_slice().into())
}

pub async fn debug_days() -> Json<Resp<Vec<Choice>>> {
  Json(locale::debug_days().into())
}

pub async fn debug_hours() -> Json<Resp<Vec<Choice>>> {
  Json(locale::debug_hours().into())
}
