use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Deserialize;

use crate::{
  error::LoadError,
  levels::{DayConfiguration, DeployLevel, LevelConfiguration, TimeRange},
  source::AssetSource,
};

pub const LEVELS_RESOURCE: &str = "config/levels.json";

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimeRange {
  pub start_hour: u32,
  pub end_hour: u32,
  pub level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawDayConfiguration {
  #[serde(rename = "dayOfWeek")]
  pub days_of_week: Vec<u32>,
  pub ranges: Vec<RawTimeRange>,
}

/// Maps raw records onto the resolver's types. Unknown level strings become
/// [`DeployLevel::DEFAULT`]; nothing else is checked.
pub fn normalize(raw: Vec<RawDayConfiguration>) -> LevelConfiguration {
  let days = raw.into_iter()
    .map(|day| {
      let ranges = day.ranges.into_iter()
        .map(|range| {
          let level = DeployLevel::from_wire(&range.level)
            .unwrap_or_else(|| {
              tracing::warn!(
                level = %range.level,
                days = ?day.days_of_week,
                "Unrecognized deploy level, using caution",
              );

              DeployLevel::DEFAULT
            });

          TimeRange::new(range.start_hour, range.end_hour, level)
        })
        .collect();

      DayConfiguration {
        days_of_week: day.days_of_week,
        ranges,
      }
    })
    .collect();

  LevelConfiguration(days)
}

pub fn parse_levels(bytes: &[u8]) -> Result<LevelConfiguration, LoadError> {
  let raw: Vec<RawDayConfiguration> = serde_json::from_slice(bytes)?;

  Ok(normalize(raw))
}

pub async fn fetch_levels(source: &AssetSource) -> Result<LevelConfiguration, LoadError> {
  let bytes = source.fetch(LEVELS_RESOURCE).await?;

  parse_levels(&bytes)
}

/// Session-scoped holder of the level configuration.
pub struct ConfigLoader {
  source: AssetSource,
  cached: RwLock<Option<Arc<LevelConfiguration>>>,
  last_failure: Mutex<Option<String>>,
}

impl ConfigLoader {
  pub fn new(source: AssetSource) -> Self {
    ConfigLoader {
      source,
      cached: RwLock::new(None),
      last_failure: Mutex::new(None),
    }
  }

  pub fn source(&self) -> &AssetSource {
    &self.source
  }

  /// Fetches the configuration, falling back to
  /// [`LevelConfiguration::fallback`] on any failure. Never fails.
  #[tracing::instrument(name = "load", skip_all, fields(source = %self.source.describe()))]
  pub async fn load(&self) -> Arc<LevelConfiguration> {
    let config = match fetch_levels(&self.source).await {
      Ok(config) => {
        tracing::info!(days = config.days().len(), "Level configuration loaded");

        *self.last_failure.lock() = None;
        config
      },
      Err(err) => {
        tracing::error!(error = %err, "Using fallback level configuration");

        *self.last_failure.lock() = Some(err.to_string());
        LevelConfiguration::fallback()
      },
    };

    let config = Arc::new(config);
    *self.cached.write() = Some(config.clone());

    config
  }

  /// Snapshot from the latest [`ConfigLoader::load`], if any.
  pub fn current(&self) -> Option<Arc<LevelConfiguration>> {
    self.cached.read().clone()
  }

  pub fn last_failure(&self) -> Option<String> {
    self.last_failure.lock().clone()
  }
}
