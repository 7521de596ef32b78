use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum DeployLevel {
  #[serde(rename = "yes")]
  Yes,
  #[serde(rename = "caution")]
  Caution,
  #[serde(rename = "no")]
  No,
  #[serde(rename = "hell-no")]
  HellNo,
}

impl DeployLevel {
  /// Level used whenever nothing in the configuration matches.
  pub const DEFAULT: DeployLevel = DeployLevel::Caution;

  pub fn as_str(self) -> &'static str {
    match self {
      DeployLevel::Yes => "yes",
      DeployLevel::Caution => "caution",
      DeployLevel::No => "no",
      DeployLevel::HellNo => "hell-no",
    }
  }

  /// Exact-match lookup of a wire string, no case folding.
  pub fn from_wire(raw: &str) -> Option<DeployLevel> {
    match raw {
      "yes" => Some(DeployLevel::Yes),
      "caution" => Some(DeployLevel::Caution),
      "no" => Some(DeployLevel::No),
      "hell-no" => Some(DeployLevel::HellNo),
      _ => None,
    }
  }

  pub fn style(self) -> LevelStyle {
    match self {
      DeployLevel::Yes => LevelStyle {
        emoji: "🟢",
        background_color: "#4caf50",
        text_color: "#ffffff",
      },
      DeployLevel::Caution => LevelStyle {
        emoji: "🟡",
        background_color: "#ff9800",
        text_color: "#ffffff",
      },
      DeployLevel::No => LevelStyle {
        emoji: "🔴",
        background_color: "#f44336",
        text_color: "#ffffff",
      },
      DeployLevel::HellNo => LevelStyle {
        emoji: "🌙",
        background_color: "#ff4136",
        text_color: "#ffffff",
      },
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStyle {
  pub emoji: &'static str,
  pub background_color: &'static str,
  pub text_color: &'static str,
}

/// Inclusive hour interval `[start_hour, end_hour]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
  pub start_hour: u32,
  pub end_hour: u32,
  pub level: DeployLevel,
}

impl TimeRange {
  pub fn new(start_hour: u32, end_hour: u32, level: DeployLevel) -> Self {
    TimeRange { start_hour, end_hour, level }
  }

  pub fn contains(&self, hour: u32) -> bool {
    self.start_hour <= hour && hour <= self.end_hour
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayConfiguration {
  #[serde(rename = "dayOfWeek")]
  pub days_of_week: Vec<u32>,
  pub ranges: Vec<TimeRange>,
}

impl DayConfiguration {
  pub fn new(days_of_week: impl Into<Vec<u32>>, ranges: Vec<TimeRange>) -> Self {
    DayConfiguration {
      days_of_week: days_of_week.into(),
      ranges,
    }
  }

  pub fn applies_to(&self, day: u32) -> bool {
    self.days_of_week.contains(&day)
  }
}

/// Day/hour rule table, evaluated first-match-wins in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelConfiguration(pub Vec<DayConfiguration>);

impl LevelConfiguration {
  /// Table used when the real one cannot be fetched or parsed.
  pub fn fallback() -> Self {
    LevelConfiguration(vec![
      DayConfiguration::new([0, 6], vec![TimeRange::new(0, 23, DeployLevel::HellNo)]),
      DayConfiguration::new([1, 2, 3, 4, 5], vec![TimeRange::new(0, 23, DeployLevel::Caution)]),
    ])
  }

  pub fn days(&self) -> &[DayConfiguration] {
    &self.0
  }

  pub fn resolve(&self, day: u32, hour: u32) -> DeployLevel {
    // Only the first day entry naming `day` is consulted, even if its
    // ranges leave `hour` uncovered and a later entry would cover it.
    let Some(day_config) = self.0.iter().find(|config| config.applies_to(day)) else {
      return DeployLevel::DEFAULT;
    };

    day_config.ranges.iter()
      .find(|range| range.contains(hour))
      .map(|range| range.level)
      .unwrap_or(DeployLevel::DEFAULT)
  }
}

/// Deploy level for `(day, hour)`, where day 0 is Sunday.
///
/// Never fails: a missing configuration, an uncovered day or an uncovered
/// hour all resolve to [`DeployLevel::DEFAULT`].
pub fn resolve(day: u32, hour: u32, config: Option<&LevelConfiguration>) -> DeployLevel {
  match config {
    Some(config) => config.resolve(day, hour),
    None => DeployLevel::DEFAULT,
  }
}
