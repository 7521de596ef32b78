use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  bundle::MessageBundle,
  error::ResponseError,
  levels::{resolve, DeployLevel, LevelConfiguration, LevelStyle},
  locale::{find_country, find_timezone, timezone_for, title_for, Country, Timezone},
};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DeployQuery {
  pub country: Option<String>,
  pub timezone: Option<String>,
  #[serde(default)]
  pub debug: bool,
  pub day: Option<u32>,
  pub hour: Option<u32>,
}

/// Day/hour forced from the debug pickers. Ignored outside debug mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebugOverride {
  pub day: Option<u32>,
  pub hour: Option<u32>,
}

impl DebugOverride {
  pub fn from_query(query: &DeployQuery) -> Result<Option<Self>, ResponseError> {
    if !query.debug {
      return Ok(None);
    }

    let day_ok = query.day.map_or(true, |day| day < 7);
    let hour_ok = query.hour.map_or(true, |hour| hour < 24);

    if !day_ok || !hour_ok {
      return Err(ResponseError::OverrideOutOfRange { day: query.day, hour: query.hour });
    }

    Ok(Some(DebugOverride { day: query.day, hour: query.hour }))
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseContext {
  pub day_of_week: u32,
  pub hour: u32,
  pub minute: u32,
  pub timezone: String,
  pub country: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
  pub title: &'static str,
  pub message: String,
  pub level: DeployLevel,
  pub style: LevelStyle,
  pub timestamp: DateTime<Utc>,
  pub context: ResponseContext,
}

/// Country and timezone a query refers to, defaulting to `default_country`
/// and that country's own timezone.
pub fn locate(
  query: &DeployQuery,
  default_country: &str,
) -> Result<(&'static Country, &'static Timezone), ResponseError> {
  let code = query.country.as_deref().unwrap_or(default_country);
  let country = find_country(code)
    .ok_or_else(|| ResponseError::UnknownCountry(code.to_owned()))?;

  let timezone = match query.timezone.as_deref() {
    Some(value) => find_timezone(value),
    None => timezone_for(country),
  };

  let timezone = timezone.ok_or_else(|| {
    ResponseError::UnknownTimezone(query.timezone.clone().unwrap_or_else(|| country.timezone.to_owned()))
  })?;

  Ok((country, timezone))
}

/// Builds the answer shown to the user for the instant `now`.
pub fn assemble<R: rand::Rng + ?Sized>(
  now: DateTime<Utc>,
  country: &Country,
  timezone: &Timezone,
  debug: Option<DebugOverride>,
  config: Option<&LevelConfiguration>,
  bundle: &MessageBundle,
  rng: &mut R,
) -> Result<DeployResponse, ResponseError> {
  let tz = timezone.tz()
    .ok_or_else(|| ResponseError::UnknownTimezone(timezone.value.to_owned()))?;

  let local = now.with_timezone(&tz);
  let debug = debug.unwrap_or_default();

  let day = debug.day.unwrap_or_else(|| local.weekday().num_days_from_sunday());
  let hour = debug.hour.unwrap_or_else(|| local.hour());

  let level = resolve(day, hour, config);
  let message = bundle.pick(day, hour, level, rng);

  Ok(DeployResponse {
    title: title_for(country.language),
    message,
    level,
    style: level.style(),
    timestamp: now,
    context: ResponseContext {
      day_of_week: day,
      hour,
      minute: local.minute(),
      timezone: timezone.value.to_owned(),
      country: country.code.to_owned(),
    },
  })
}
