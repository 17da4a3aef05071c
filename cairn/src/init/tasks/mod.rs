//! Init steps shared by the bootstrap and system-init stages.

mod autoformat;
mod images;
mod services;
mod system;

pub use autoformat::{AutoformatTask, autoformat_services};
pub use images::LoadImagesTask;
pub use services::{BootstrapContainersTask, RunServicesTask};
pub use system::{AnnounceTask, SyncTask};

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory collaborators for init tests.

    use crate::compose::ServiceComposer;
    use crate::config::{CloudConfig, ServiceSet};
    use crate::util::DeviceResolver;
    use async_trait::async_trait;
    use cairn_shared::errors::{CairnError, CairnResult};
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records every service set it is asked to run.
    #[derive(Default)]
    pub struct RecordingComposer {
        pub calls: Mutex<Vec<(String, ServiceSet)>>,
        pub fail_on: Option<String>,
    }

    impl RecordingComposer {
        pub fn projects(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(name, _)| name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ServiceComposer for RecordingComposer {
        async fn run_service_set(
            &self,
            name: &str,
            _cfg: &CloudConfig,
            services: &ServiceSet,
        ) -> CairnResult<Vec<String>> {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), services.clone()));
            if self.fail_on.as_deref() == Some(name) {
                return Err(CairnError::Step(format!("{name} services failed")));
            }
            Ok(services.keys().cloned().collect())
        }
    }

    /// Resolves only the specs it was given.
    #[derive(Default)]
    pub struct StaticDevices {
        pub known: Vec<String>,
    }

    impl DeviceResolver for StaticDevices {
        fn resolve(&self, spec: &str) -> Option<PathBuf> {
            self.known
                .iter()
                .any(|known| known == spec)
                .then(|| PathBuf::from("/dev/sda1"))
        }
    }
}
