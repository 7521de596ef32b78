use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
  #[error("request to {url} failed: {source}")]
  Http {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{url} answered with status {status}")]
  Status { url: String, status: u16 },

  #[error("cannot read {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

#[derive(Error, Debug)]
pub enum LoadError {
  #[error("level configuration fetch failed: {0}")]
  ConfigFetchFailure(#[from] FetchError),

  #[error("level configuration is not valid JSON: {0}")]
  ConfigParse(#[from] serde_json::Error),
}

/// Failures while assembling a response. These are the only errors that
/// reach the user, always as [`ResponseError::PUBLIC_MESSAGE`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResponseError {
  #[error("unknown country `{0}`")]
  UnknownCountry(String),

  #[error("unknown timezone `{0}`")]
  UnknownTimezone(String),

  #[error("debug override out of range: day={day:?} hour={hour:?}")]
  OverrideOutOfRange { day: Option<u32>, hour: Option<u32> },
}

impl ResponseError {
  pub const PUBLIC_MESSAGE: &'static str = "Error al generar respuesta";
}

#[derive(Error, Debug)]
pub enum BundleError {
  #[error("message bundle fetch failed: {0}")]
  Fetch(#[from] FetchError),

  #[error("message bundle is not valid JSON: {0}")]
  Parse(#[from] serde_json::Error),
}
