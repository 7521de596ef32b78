use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
  bundle::BundleCache,
  error::ResponseError,
  loader::ConfigLoader,
  refresh::Refresher,
  response::{assemble, locate, DebugOverride, DeployQuery, DeployResponse},
  source::AssetSource,
};

pub struct AppState {
  pub loader: ConfigLoader,
  pub bundles: BundleCache,
  pub current: Refresher<DeployResponse>,
  pub default_country: String,
  pub geoip_url: String,
  pub http: reqwest::Client,
}

impl AppState {
  pub fn new(source: AssetSource, default_country: &str, geoip_url: &str) -> Self {
    AppState {
      loader: ConfigLoader::new(source),
      bundles: BundleCache::new(),
      current: Refresher::new(),
      default_country: default_country.to_owned(),
      geoip_url: geoip_url.to_owned(),
      http: reqwest::Client::new(),
    }
  }

  #[tracing::instrument(name = "deploy", skip_all, fields(country = ?query.country, debug = query.debug))]
  pub async fn deploy(
    &self,
    query: &DeployQuery,
    now: DateTime<Utc>,
  ) -> Result<DeployResponse, ResponseError> {
    let (country, timezone) = locate(query, &self.default_country)?;
    let debug = DebugOverride::from_query(query)?;

    let bundle = self.bundles
      .bundle(self.loader.source(), country.language, Some(country.code)).await;

    let config = self.loader.current();
    let mut rng = rand::thread_rng();

    assemble(now, country, timezone, debug, config.as_deref(), &bundle, &mut rng)
  }

  /// Re-evaluates the default locale and publishes it unless a newer
  /// evaluation started meanwhile.
  pub async fn refresh_current(self: Arc<Self>) {
    let ticket = self.current.begin();

    match self.deploy(&DeployQuery::default(), Utc::now()).await {
      Ok(resp) => {
        let level = resp.level;

        if self.current.publish(ticket, resp) {
          tracing::debug!(level = level.as_str(), "Current level refreshed");
        } else {
          tracing::debug!("Refresh superseded, result dropped");
        }
      },
      Err(err) => tracing::error!(error = %err, "Refresh failed"),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::levels::DeployLevel;

  fn state_with(dir: &std::path::Path) -> Arc<AppState> {
    Arc::new(AppState::new(AssetSource::Dir(dir.to_owned()), "ES", "http://127.0.0.1:9/"))
  }

  #[tokio::test]
  async fn answers_before_load() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with(dir.path());

    // Monday 10:00 in Madrid
    let now = Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap();
    let resp = state.deploy(&DeployQuery::default(), now).await.unwrap();

    assert_eq!(resp.level, DeployLevel::Caution);
    assert_eq!(resp.context.hour, 10);
  }

  #[tokio::test]
  async fn refresh_publishes_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with(dir.path());
    state.loader.load().await;

    assert!(state.current.latest().is_none());

    state.clone().refresh_current().await;

    let snapshot = state.current.latest().unwrap();
    assert_eq!(snapshot.context.country, "ES");
  }

  #[tokio::test]
  async fn bad_default_country_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(AppState::new(AssetSource::Dir(dir.path().to_owned()), "XX", ""));

    state.clone().refresh_current().await;

    assert!(state.current.latest().is_none());
  }
}
