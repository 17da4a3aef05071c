//! Typed views over the merged configuration tree.
//!
//! Only the parts the boot stages read are typed. Everything else a service
//! definition carries is kept verbatim in [`ServiceConfig::extra`] and handed
//! to the composer untouched.

use crate::merge::Mapping;
use crate::util::map_to_kv_pairs;
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Named service definitions, in declaration order.
pub type ServiceSet = IndexMap<String, ServiceConfig>;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CloudConfig {
    pub system: SystemConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub state: StateConfig,
    /// Services run to format the state disk.
    pub autoformat: ServiceSet,
    /// Services run under the bootstrap engine before system-init.
    pub bootstrap_containers: ServiceSet,
    pub bootstrap_engine: EngineConfig,
    /// Steady-state system services.
    pub services: ServiceSet,
    pub repositories: IndexMap<String, Repository>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StateConfig {
    /// Device spec of the state disk: a path, `LABEL=...` or `UUID=...`.
    pub dev: String,
    /// Candidate disks to format when the state disk is absent.
    pub autoformat: Vec<String>,
    /// Zero-fill the disk before formatting.
    pub formatzero: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub args: Vec<String>,
    #[serde(deserialize_with = "environment_entries")]
    pub environment: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Repository {
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub image: String,
    /// `KEY=VALUE` entries.
    #[serde(
        deserialize_with = "environment_entries",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub environment: Vec<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl CloudConfig {
    /// Base URLs of all configured service repositories.
    pub fn repository_urls(&self) -> Vec<String> {
        self.system
            .repositories
            .values()
            .map(|repo| repo.url.clone())
            .filter(|url| !url.is_empty())
            .collect()
    }
}

/// Accepts an environment as a `KEY=VALUE` list or as a mapping, and
/// normalizes both to `KEY=VALUE` entries. A null mapping value is empty.
fn environment_entries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(Vec::new()),
        serde_yaml::Value::Sequence(items) => items
            .into_iter()
            .map(|item| {
                scalar_text(item)
                    .ok_or_else(|| D::Error::custom("environment entries must be scalars"))
            })
            .collect(),
        serde_yaml::Value::Mapping(entries) => {
            let mut env = IndexMap::with_capacity(entries.len());
            for (key, value) in entries {
                let key = scalar_text(key)
                    .ok_or_else(|| D::Error::custom("environment keys must be scalars"))?;
                let value = if value.is_null() {
                    String::new()
                } else {
                    scalar_text(value).ok_or_else(|| {
                        D::Error::custom(format!("environment value of {key} must be a scalar"))
                    })?
                };
                env.insert(key, value);
            }
            Ok(map_to_kv_pairs(&env))
        }
        _ => Err(D::Error::custom("environment must be a list or a mapping")),
    }
}

fn scalar_text(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
