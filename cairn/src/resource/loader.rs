//! Location → bytes resolution.

use cairn_shared::errors::{CairnError, CairnResult};
use std::io;

/// True when the location must be fetched over the network.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Candidate URL for a bare name under one base URL.
///
/// The first character of the name is used as a partition segment:
/// `console` under `https://repo/services` becomes
/// `https://repo/services/c/console.yml`.
pub fn candidate_url(base: &str, name: &str) -> Option<String> {
    let first = name.chars().next()?;
    Some(format!(
        "{}/{}/{}.yml",
        base.trim_end_matches('/'),
        first,
        name
    ))
}

/// Resolves location identifiers to raw bytes.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Clone, Debug)]
pub struct ResourceLoader {
    client: reqwest::Client,
}

impl ResourceLoader {
    pub fn new() -> CairnResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CairnError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Load `location`, falling back to `base_urls` for bare names.
    ///
    /// Each base is tried in order with no further expansion; the first
    /// success wins. When every candidate fails the last error is returned,
    /// or `NotFound` when nothing was attempted.
    pub async fn load(
        &self,
        location: &str,
        network: bool,
        base_urls: &[String],
    ) -> CairnResult<Vec<u8>> {
        if is_remote(location) || location.starts_with('/') {
            return self.load_direct(location, network).await;
        }

        let mut last_err = None;
        for base in base_urls {
            let Some(candidate) = candidate_url(base, location) else {
                break;
            };

            match self.load_direct(&candidate, network).await {
                Ok(bytes) => {
                    tracing::debug!(location, url = %candidate, "Loaded resource");
                    return Ok(bytes);
                }
                Err(e) => {
                    tracing::debug!(location, url = %candidate, error = %e, "Candidate failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| CairnError::NotFound(location.to_string())))
    }

    /// Resolve a URL or absolute path, with no base-URL expansion.
    async fn load_direct(&self, location: &str, network: bool) -> CairnResult<Vec<u8>> {
        if is_remote(location) {
            if !network {
                return Err(CairnError::NetworkUnavailable);
            }
            self.fetch(location).await
        } else if location.starts_with('/') {
            tokio::fs::read(location)
                .await
                .map_err(|e| CairnError::Io(io::Error::new(e.kind(), format!("{location}: {e}"))))
        } else {
            Err(CairnError::NotFound(location.to_string()))
        }
    }

    async fn fetch(&self, url: &str) -> CairnResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CairnError::Transport(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CairnError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CairnError::Transport(format!("reading body of {url}: {e}")))?;
        Ok(body.to_vec())
    }
}
