use chrono_tz::Tz;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Country {
  pub code: &'static str,
  pub name: &'static str,
  pub timezone: &'static str,
  pub language: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Timezone {
  pub value: &'static str,
  pub label: &'static str,
  pub offset: &'static str,
}

impl Timezone {
  pub fn tz(&self) -> Option<Tz> {
    self.value.parse().ok()
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Choice {
  pub value: u32,
  pub label: String,
}

macro_rules! country {
  ($code:expr, $name:expr, $tz:expr, $lang:expr) => {
    Country { code: $code, name: $name, timezone: $tz, language: $lang }
  };
}

macro_rules! timezone {
  ($value:expr, $label:expr, $offset:expr) => {
    Timezone { value: $value, label: $label, offset: $offset }
  };
}

lazy_static! {
  pub static ref COUNTRIES: Vec<Country> = vec![
    country!("CO", "Colombia", "America/Bogota", "es"),
    country!("ES", "España", "Europe/Madrid", "es"),
    country!("MX", "México", "America/Mexico_City", "es"),
    country!("AR", "Argentina", "America/Argentina/Buenos_Aires", "es"),
    country!("PE", "Perú", "America/Lima", "es"),
    country!("CL", "Chile", "America/Santiago", "es"),
    country!("US", "Estados Unidos", "America/New_York", "en"),
    country!("BR", "Brasil", "America/Sao_Paulo", "pt"),
  ];

  pub static ref TIMEZONES: Vec<Timezone> = vec![
    timezone!("UTC", "UTC", "UTC+0"),
    timezone!("Europe/Madrid", "Madrid", "UTC+1/+2"),
    timezone!("America/Mexico_City", "Ciudad de México", "UTC-6/-5"),
    timezone!("America/Argentina/Buenos_Aires", "Buenos Aires", "UTC-3"),
    timezone!("America/Bogota", "Bogotá", "UTC-5"),
    timezone!("America/Lima", "Lima", "UTC-5"),
    timezone!("America/Santiago", "Santiago", "UTC-3/-4"),
    timezone!("America/New_York", "Nueva York", "UTC-5/-4"),
    timezone!("America/Sao_Paulo", "São Paulo", "UTC-3/-2"),
    timezone!("Europe/London", "Londres", "UTC+0/+1"),
    timezone!("Europe/Berlin", "Berlín", "UTC+1/+2"),
    timezone!("Europe/Paris", "París", "UTC+1/+2"),
  ];
}

const DAY_NAMES: [&str; 7] = [
  "Domingo", "Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado",
];

pub fn find_country(code: &str) -> Option<&'static Country> {
  COUNTRIES.iter().find(|country| country.code.eq_ignore_ascii_case(code))
}

pub fn find_timezone(value: &str) -> Option<&'static Timezone> {
  TIMEZONES.iter().find(|tz| tz.value == value)
}

pub fn timezone_for(country: &Country) -> Option<&'static Timezone> {
  find_timezone(country.timezone)
}

pub fn title_for(language: &str) -> &'static str {
  match language {
    "en" => "SHOULD YOU DEPLOY TODAY?",
    "pt" => "VOCÊ DEVERIA FAZER DEPLOY HOJE?",
    _ => "¿DEBERÍAS DESPLEGAR HOY?",
  }
}

pub fn debug_days() -> Vec<Choice> {
  DAY_NAMES.iter()
    .zip(0..)
    .map(|(name, value)| Choice { value, label: (*name).to_owned() })
    .collect()
}

pub fn debug_hours() -> Vec<Choice> {
  (0..24)
    .map(|hour| Choice { value: hour, label: format!("{hour:02}:00") })
    .collect()
}

// Other fields omitted
#[derive(Deserialize)]
pub struct GeoIpResp {
  country_code: Option<String>,
  region_code: Option<String>,
}

/// Matches a geolocation answer against the supported countries, trying the
/// country code first and the region code second.
pub fn match_country(resp: &GeoIpResp) -> Option<&'static Country> {
  [&resp.country_code, &resp.region_code]
    .into_iter()
    .flatten()
    .find_map(|code| find_country(code))
}

#[tracing::instrument(name = "detect", skip(client))]
pub async fn detect_country(
  client: &reqwest::Client,
  url: &str,
) -> Option<&'static Country> {
  let resp = client.get(url)
    .send().await;

  let resp = match resp {
    Ok(resp) => resp,
    Err(err) => {
      tracing::warn!(error = %err, "Location lookup failed");
      return None;
    },
  };

  let body = match resp.bytes().await {
    Ok(body) => body,
    Err(err) => {
      tracing::warn!(error = %err, "Location lookup failed");
      return None;
    },
  };

  let resp: GeoIpResp = match serde_json::from_slice(&body) {
    Ok(resp) => resp,
    Err(err) => {
      tracing::warn!(error = %err, "Unexpected location payload");
      return None;
    },
  };

  let country = match_country(&resp);

  match country {
    Some(country) => tracing::info!(country = country.code, "Country detected"),
    None => tracing::info!("Country not supported"),
  }

  country
}
