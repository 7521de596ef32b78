use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::{error::BundleError, levels::DeployLevel, source::AssetSource};

pub const FALLBACK_LANGUAGE: &str = "es";
pub const NO_BUNDLE_MESSAGE: &str = "NO SE ENCONTRARON MENSAJES PARA ESTE IDIOMA.";
pub const NO_CANDIDATE_MESSAGE: &str = "NO HAY MENSAJES CONFIGURADOS PARA ESTE CONTEXTO.";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BundleKey {
  pub language: String,
  pub country: Option<String>,
}

impl BundleKey {
  pub fn new(language: &str, country: Option<&str>) -> Self {
    BundleKey {
      language: language.to_owned(),
      country: country.map(str::to_owned),
    }
  }

  pub fn resource(&self) -> String {
    match &self.country {
      Some(country) => format!("responses/{}-{}.json", self.language, country),
      None => format!("responses/{}.json", self.language),
    }
  }

  /// Lookup order: language+country, language, then the fallback language.
  pub fn chain(language: &str, country: Option<&str>) -> Vec<BundleKey> {
    let mut chain = vec![];

    if country.is_some() {
      chain.push(BundleKey::new(language, country));
    }

    chain.push(BundleKey::new(language, None));

    if language != FALLBACK_LANGUAGE {
      chain.push(BundleKey::new(FALLBACK_LANGUAGE, None));
    }

    chain
  }
}

/// Candidate messages by slot or level key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MessageBundle(pub HashMap<String, Vec<String>>);

impl MessageBundle {
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  // An empty list counts as absent, so lookup moves on to the next key.
  fn candidates(&self, keys: &[&str]) -> Option<&[String]> {
    keys.iter()
      .filter_map(|key| self.0.get(*key))
      .find(|messages| !messages.is_empty())
      .map(Vec::as_slice)
  }

  /// Picks a message for the slot of `(day, hour)`, falling back to the
  /// level's own key and then `default`.
  pub fn pick<R: rand::Rng + ?Sized>(
    &self,
    day: u32,
    hour: u32,
    level: DeployLevel,
    rng: &mut R,
  ) -> String {
    if self.is_empty() {
      return NO_BUNDLE_MESSAGE.to_owned();
    }

    let keys = [slot_key(day, hour), level.as_str(), "default"];

    self.candidates(&keys)
      .and_then(|messages| messages.choose(rng))
      .map(|message| message.to_uppercase())
      .unwrap_or_else(|| NO_CANDIDATE_MESSAGE.to_owned())
  }
}

/// Bundle key describing the moment of the week, e.g. `fridayAfternoon`.
pub fn slot_key(day: u32, hour: u32) -> &'static str {
  let morning = hour < 13;

  match day {
    0 | 6 => "weekend",
    _ if hour >= 18 => "afterWork",
    1 if (9..13).contains(&hour) => "mondayMorning",
    1 if !morning => "mondayAfternoon",
    2 if morning => "tuesdayMorning",
    2 => "tuesdayAfternoon",
    3 if morning => "wednesdayMorning",
    3 => "wednesdayAfternoon",
    4 if morning => "thursdayMorning",
    4 => "thursdayAfternoon",
    5 if morning => "fridayMorning",
    5 => "fridayAfternoon",
    _ => "default",
  }
}

/// Per-session cache of fetched bundles. Entries are only ever added.
#[derive(Default)]
pub struct BundleCache {
  bundles: RwLock<HashMap<BundleKey, Arc<MessageBundle>>>,
}

impl BundleCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cached(&self, key: &BundleKey) -> Option<Arc<MessageBundle>> {
    self.bundles.read().get(key).cloned()
  }

  pub fn len(&self) -> usize {
    self.bundles.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.bundles.read().is_empty()
  }

  /// Walks the fallback chain and returns the first bundle that can be
  /// fetched and parsed, or an empty bundle. Never fails.
  ///
  /// Whatever the chain resolves to is also stored under every key that
  /// missed, so a locale keeps the same bundle for the rest of the session
  /// and missing resources are not requested again.
  #[tracing::instrument(name = "bundle", skip(self, source))]
  pub async fn bundle(
    &self,
    source: &AssetSource,
    language: &str,
    country: Option<&str>,
  ) -> Arc<MessageBundle> {
    let chain = BundleKey::chain(language, country);
    let requested = chain[0].clone();

    let mut missed = vec![];
    let mut found = None;

    for key in chain {
      if let Some(bundle) = self.cached(&key) {
        found = Some(bundle);
        break;
      }

      match fetch_bundle(source, &key).await {
        Ok(bundle) => {
          let bundle = self.bundles.write()
            .entry(key)
            .or_insert_with(|| Arc::new(bundle))
            .clone();

          found = Some(bundle);
          break;
        },
        Err(err) => {
          tracing::warn!(resource = %key.resource(), error = %err, "Message bundle unavailable");
          missed.push(key);
        },
      }
    }

    let bundle = found.unwrap_or_else(|| {
      tracing::warn!("No message bundle found, using empty bundle");
      Arc::new(MessageBundle::default())
    });

    let mut bundles = self.bundles.write();

    for key in missed {
      bundles.entry(key).or_insert_with(|| bundle.clone());
    }

    bundles.get(&requested).cloned().unwrap_or(bundle)
  }
}

async fn fetch_bundle(source: &AssetSource, key: &BundleKey) -> Result<MessageBundle, BundleError> {
  let bytes = source.fetch(&key.resource()).await?;

  Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use rand::{rngs::StdRng, SeedableRng};

  use super::*;

  fn write_bundle(dir: &Path, name: &str, body: &str) {
    std::fs::create_dir_all(dir.join("responses")).unwrap();
    std::fs::write(dir.join("responses").join(name), body).unwrap();
  }

  fn bundle(pairs: Vec<(&str, Vec<&str>)>) -> MessageBundle {
    MessageBundle(
      pairs.into_iter()
        .map(|(key, msgs)| (key.to_owned(), msgs.into_iter().map(str::to_owned).collect()))
        .collect(),
    )
  }

  #[test]
  fn chain_order() {
    let chain = BundleKey::chain("en", Some("US"));

    assert_eq!(
      chain.iter().map(BundleKey::resource).collect::<Vec<_>>(),
      vec!["responses/en-US.json", "responses/en.json", "responses/es.json"],
    );
    assert_eq!(BundleKey::chain("es", Some("CO")).len(), 2);
    assert_eq!(BundleKey::chain("es", None).len(), 1);
  }

  #[test]
  fn slot_keys() {
    assert_eq!(slot_key(0, 10), "weekend");
    assert_eq!(slot_key(6, 20), "weekend");
    assert_eq!(slot_key(3, 18), "afterWork");
    assert_eq!(slot_key(1, 9), "mondayMorning");
    assert_eq!(slot_key(1, 12), "mondayMorning");
    assert_eq!(slot_key(1, 8), "default");
    assert_eq!(slot_key(1, 13), "mondayAfternoon");
    assert_eq!(slot_key(2, 12), "tuesdayMorning");
    assert_eq!(slot_key(4, 17), "thursdayAfternoon");
    assert_eq!(slot_key(5, 13), "fridayAfternoon");
  }

  #[test]
  fn pick_prefers_slot_then_level_then_default() {
    let mut rng = StdRng::seed_from_u64(7);
    let msgs = bundle(vec![
      ("fridayAfternoon", vec!["ni se te ocurra"]),
      ("caution", vec!["con cuidado"]),
      ("default", vec!["quizas"]),
    ]);

    assert_eq!(msgs.pick(5, 14, DeployLevel::HellNo, &mut rng), "NI SE TE OCURRA");
    assert_eq!(msgs.pick(3, 10, DeployLevel::Caution, &mut rng), "CON CUIDADO");
    assert_eq!(msgs.pick(3, 10, DeployLevel::Yes, &mut rng), "QUIZAS");
  }

  #[test]
  fn empty_slot_falls_through() {
    let mut rng = StdRng::seed_from_u64(7);
    let msgs = bundle(vec![
      ("fridayAfternoon", vec![]),
      ("hell-no", vec![]),
      ("default", vec!["quizas"]),
    ]);

    assert_eq!(msgs.pick(5, 14, DeployLevel::HellNo, &mut rng), "QUIZAS");
  }

  #[test]
  fn pick_placeholders() {
    let mut rng = StdRng::seed_from_u64(7);

    assert_eq!(
      MessageBundle::default().pick(1, 10, DeployLevel::Yes, &mut rng),
      NO_BUNDLE_MESSAGE,
    );
    assert_eq!(
      bundle(vec![("weekend", vec![])]).pick(1, 10, DeployLevel::Yes, &mut rng),
      NO_CANDIDATE_MESSAGE,
    );
  }

  #[test]
  fn pick_stays_within_candidates() {
    let mut rng = StdRng::seed_from_u64(42);
    let msgs = bundle(vec![("default", vec!["a", "b", "c"])]);

    for _ in 0..50 {
      let picked = msgs.pick(3, 10, DeployLevel::Caution, &mut rng);
      assert!(["A", "B", "C"].contains(&picked.as_str()));
    }
  }

  #[tokio::test]
  async fn country_bundle_falls_back_to_language() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), "es.json", r#"{"default": ["hola"]}"#);

    let source = AssetSource::Dir(dir.path().to_owned());
    let cache = BundleCache::new();

    let got = cache.bundle(&source, "es", Some("CO")).await;

    assert_eq!(*got, bundle(vec![("default", vec!["hola"])]));
    assert_eq!(cache.cached(&BundleKey::new("es", Some("CO"))), Some(got.clone()));
    assert!(cache.cached(&BundleKey::new("es", None)).is_some());
  }

  #[tokio::test]
  async fn unknown_language_falls_back_to_spanish() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), "es.json", r#"{"default": ["hola"]}"#);
    write_bundle(dir.path(), "pt.json", "broken");

    let source = AssetSource::Dir(dir.path().to_owned());
    let cache = BundleCache::new();

    let got = cache.bundle(&source, "pt", Some("BR")).await;

    assert_eq!(*got, bundle(vec![("default", vec!["hola"])]));
  }

  #[tokio::test]
  async fn nothing_available_gives_empty_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let source = AssetSource::Dir(dir.path().to_owned());
    let cache = BundleCache::new();

    let got = cache.bundle(&source, "es", Some("CO")).await;
    let mut rng = StdRng::seed_from_u64(1);

    assert!(got.is_empty());
    assert_eq!(cache.len(), 2);
    assert_eq!(got.pick(2, 10, DeployLevel::Caution, &mut rng), NO_BUNDLE_MESSAGE);
  }

  #[tokio::test]
  async fn cached_bundle_survives_source_loss() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), "en-US.json", r#"{"default": ["ship it"]}"#);

    let source = AssetSource::Dir(dir.path().to_owned());
    let cache = BundleCache::new();

    let first = cache.bundle(&source, "en", Some("US")).await;
    std::fs::remove_file(dir.path().join("responses/en-US.json")).unwrap();
    let second = cache.bundle(&source, "en", Some("US")).await;

    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
  }

  #[tokio::test]
  async fn missing_country_bundle_not_fetched_again() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), "es.json", r#"{"default": ["hola"]}"#);

    let source = AssetSource::Dir(dir.path().to_owned());
    let cache = BundleCache::new();

    let first = cache.bundle(&source, "es", Some("ES")).await;

    write_bundle(dir.path(), "es-ES.json", r#"{"default": ["buenas"]}"#);
    std::fs::remove_file(dir.path().join("responses/es.json")).unwrap();

    let second = cache.bundle(&source, "es", Some("ES")).await;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*second, bundle(vec![("default", vec!["hola"])]));
    assert_eq!(cache.len(), 2);
  }

  #[tokio::test]
  async fn concurrent_population_keeps_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), "en.json", r#"{"default": ["ship it"]}"#);

    let source = AssetSource::Dir(dir.path().to_owned());
    let cache = BundleCache::new();

    let (a, b) = tokio::join!(
      cache.bundle(&source, "en", None),
      cache.bundle(&source, "en", None),
    );

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);
  }

  #[tokio::test]
  async fn malformed_bundle_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), "es.json", r#"{"default": ["hola"]}"#);
    write_bundle(dir.path(), "es-MX.json", "[1, 2");

    let source = AssetSource::Dir(dir.path().to_owned());
    let key = BundleKey::new("es", Some("MX"));

    assert!(matches!(fetch_bundle(&source, &key).await, Err(BundleError::Parse(_))));
    assert!(matches!(
      fetch_bundle(&source, &BundleKey::new("pt", None)).await,
      Err(BundleError::Fetch(_))
    ));

    let got = BundleCache::new().bundle(&source, "es", Some("MX")).await;
    assert_eq!(*got, bundle(vec![("default", vec!["hola"])]));
  }
}
