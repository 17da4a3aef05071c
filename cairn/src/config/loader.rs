//! Layered configuration assembly.

use super::types::CloudConfig;
use crate::merge::{self, Value, document_mapping};
use crate::resource::ResourceLoader;
use cairn_shared::errors::CairnResult;

/// Built-in bottom layer. Every other layer is merged over it.
pub const DEFAULT_CONFIG: &str = r#"
system:
  state:
    dev: LABEL=CAIRN_STATE
    autoformat: []
    formatzero: false
  autoformat:
    autoformat:
      image: cairn/autoformat:latest
      privileged: true
      net: none
  bootstrap_containers: {}
  bootstrap_engine:
    args: [daemon, --log-driver, none, --bridge, none, --iptables=false]
  services: {}
  repositories: {}
"#;

/// One configuration source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Absolute path, URL or bare name.
    pub location: String,
    /// A missing optional layer is skipped instead of failing the load.
    pub optional: bool,
}

impl ConfigLayer {
    pub fn required(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            optional: false,
        }
    }

    pub fn optional(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            optional: true,
        }
    }
}

/// Composes the effective configuration from ordered layers.
///
/// Layers are folded with union/replace, so later layers win on scalar
/// conflicts while sequences accumulate.
pub struct ConfigLoader<'a> {
    resources: &'a ResourceLoader,
    network: bool,
    base_urls: Vec<String>,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(resources: &'a ResourceLoader) -> Self {
        Self {
            resources,
            network: false,
            base_urls: Vec::new(),
        }
    }

    pub fn with_network(mut self, network: bool) -> Self {
        self.network = network;
        self
    }

    /// Base URLs used to resolve bare layer names.
    pub fn with_base_urls(mut self, base_urls: Vec<String>) -> Self {
        self.base_urls = base_urls;
        self
    }

    /// Merge the built-in defaults and every layer into one tree.
    pub async fn load_tree(&self, layers: &[ConfigLayer]) -> CairnResult<Value> {
        let mut merged = Value::Mapping(document_mapping(DEFAULT_CONFIG.as_bytes())?);

        for layer in layers {
            let bytes = match self
                .resources
                .load(&layer.location, self.network, &self.base_urls)
                .await
            {
                Ok(bytes) => bytes,
                Err(e) if layer.optional && e.is_not_found() => {
                    tracing::debug!(location = %layer.location, "Optional config layer not present");
                    continue;
                }
                Err(e) => {
                    tracing::error!(location = %layer.location, error = %e, "Failed to load config layer");
                    return Err(e);
                }
            };

            let doc = Value::Mapping(document_mapping(&bytes)?);
            merged = merge::union(&merged, &doc, &merge::replace);
            tracing::debug!(location = %layer.location, "Merged config layer");
        }

        Ok(merged)
    }

    /// Merge every layer and decode the typed view.
    pub async fn load(&self, layers: &[ConfigLayer]) -> CairnResult<CloudConfig> {
        self.load_tree(layers).await?.decode()
    }
}
