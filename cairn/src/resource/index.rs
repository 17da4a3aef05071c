//! Remote service index.
//!
//! Each repository base URL serves `{base}/index.yml`:
//!
//! ```yaml
//! services:
//!   - console
//!   - ntp
//! ```

use super::loader::ResourceLoader;
use cairn_shared::constants::SERVICE_INDEX;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct ServiceIndex {
    #[serde(default)]
    services: Vec<String>,
}

impl ResourceLoader {
    /// Collect service names from the index of every base URL.
    ///
    /// A base that cannot be fetched or parsed is logged and skipped.
    pub async fn fetch_services(&self, base_urls: &[String]) -> Vec<String> {
        let mut result = Vec::new();

        for base in base_urls {
            let index_url = format!("{}/{}", base.trim_end_matches('/'), SERVICE_INDEX);

            let content = match self.load(&index_url, true, &[]).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::error!(url = %index_url, error = %e, "Failed to load service index");
                    continue;
                }
            };

            let index: ServiceIndex = match serde_yaml::from_slice(&content) {
                Ok(index) => index,
                Err(e) => {
                    tracing::error!(url = %index_url, error = %e, "Failed to parse service index");
                    continue;
                }
            };

            tracing::debug!(url = %index_url, count = index.services.len(), "Loaded service index");
            result.extend(index.services);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::super::loader::test_server::serve;
    use super::*;

    #[tokio::test]
    async fn test_accumulates_across_bases() {
        let a = serve(&[("/index.yml", 200, "services: [console, ntp]\n")]).await;
        let b = serve(&[("/index.yml", 200, "services:\n  - syslog\n")]).await;
        let loader = ResourceLoader::new().unwrap();

        let services = loader
            .fetch_services(&[a.base.clone(), b.base.clone()])
            .await;
        assert_eq!(services, vec!["console", "ntp", "syslog"]);
    }

    #[tokio::test]
    async fn test_failing_bases_are_skipped() {
        let down = serve(&[("/index.yml", 503, "")]).await;
        let garbage = serve(&[("/index.yml", 200, "services: {not: a list}\n")]).await;
        let good = serve(&[("/index.yml", 200, "services: [console]\n")]).await;
        let loader = ResourceLoader::new().unwrap();

        let services = loader
            .fetch_services(&[down.base.clone(), garbage.base.clone(), good.base.clone()])
            .await;
        assert_eq!(services, vec!["console"]);
    }

    #[tokio::test]
    async fn test_index_without_services_key() {
        let server = serve(&[("/index.yml", 200, "version: 1\n")]).await;
        let loader = ResourceLoader::new().unwrap();

        assert!(loader.fetch_services(&[server.base.clone()]).await.is_empty());
    }
}
