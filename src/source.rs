use std::path::PathBuf;

use crate::error::FetchError;

/// Where level configuration and message bundles come from.
#[derive(Clone, Debug)]
pub enum AssetSource {
  Http {
    client: reqwest::Client,
    base: String,
  },
  Dir(PathBuf),
}

impl AssetSource {
  pub fn parse(location: &str) -> Self {
    if location.starts_with("http://") || location.starts_with("https://") {
      AssetSource::Http {
        client: reqwest::Client::new(),
        base: location.trim_end_matches('/').to_owned(),
      }
    } else {
      AssetSource::Dir(PathBuf::from(location))
    }
  }

  pub fn describe(&self) -> String {
    match self {
      AssetSource::Http { base, .. } => base.clone(),
      AssetSource::Dir(root) => root.display().to_string(),
    }
  }

  pub async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
    match self {
      AssetSource::Http { client, base } => {
        let url = format!("{base}/{path}");

        let resp = client.get(&url)
          .send().await
          .map_err(|source| FetchError::Http { url: url.clone(), source })?;

        let status = resp.status();

        if !status.is_success() {
          return Err(FetchError::Status { url, status: status.as_u16() });
        }

        let body = resp.bytes().await
          .map_err(|source| FetchError::Http { url, source })?;

        Ok(body.to_vec())
      },
      AssetSource::Dir(root) => {
        let file = root.join(path);

        tokio::fs::read(&file).await
          .map_err(|source| FetchError::Io { path: file.display().to_string(), source })
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_picks_variant() {
    assert!(matches!(
      AssetSource::parse("https://example.com/assets/"),
      AssetSource::Http { ref base, .. } if base == "https://example.com/assets"
    ));
    assert!(matches!(AssetSource::parse("./assets"), AssetSource::Dir(_)));
  }

  #[tokio::test]
  async fn dir_fetch() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hello.json"), b"{}").unwrap();

    let source = AssetSource::Dir(dir.path().to_owned());

    assert_eq!(source.fetch("hello.json").await.unwrap(), b"{}");
    assert!(matches!(
      source.fetch("missing.json").await,
      Err(FetchError::Io { .. })
    ));
  }
}
