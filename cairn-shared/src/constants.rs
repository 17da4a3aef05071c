//! Well-known boot paths and names.
//!
//! These are defaults only. Components receive their paths through
//! `BootLayout`, so tests and alternative images can point them elsewhere.

/// Filesystem locations used during boot.
pub mod paths {
    /// Directory scanned for bootstrap image archives.
    pub const IMAGES_DIR: &str = "/usr/share/cairn";

    /// System-state directory of the embedded container engine.
    pub const ENGINE_HOME: &str = "/var/lib/system-docker";

    /// Directory holding per-image load stamps. Kept beside the engine
    /// state, which belongs to the running engine alone.
    pub const STAMP_DIR: &str = "/var/lib/cairn-stamps";

    /// Container engine binary.
    pub const ENGINE_BIN: &str = "/usr/bin/docker";

    /// Service composition binary.
    pub const COMPOSE_BIN: &str = "/usr/bin/cairn-compose";

    /// Device node root, used to resolve `LABEL=` and `UUID=` specs.
    pub const DEV_ROOT: &str = "/dev";

    /// Boot log directory.
    pub const LOG_DIR: &str = "/var/log/cairn";

    /// Built-in system configuration layer.
    pub const SYSTEM_CONFIG: &str = "/etc/cairn/system.yml";

    /// User cloud-config layer.
    pub const CLOUD_CONFIG: &str = "/var/lib/cairn/conf/cloud-config.yml";

    /// OS release file consulted for the readiness announcement.
    pub const OS_RELEASE: &str = "/etc/os-release";
}

/// Filename pattern matched against entries of the images directory.
pub const IMAGES_PATTERN: &str = "images*.tar";

/// Socket the system engine listens on.
pub const ENGINE_HOST: &str = "unix:///var/run/system-docker.sock";

/// Name of the service index document under each repository base URL.
pub const SERVICE_INDEX: &str = "index.yml";

/// Environment variables that override the defaults above.
pub mod env {
    pub const IMAGES_DIR: &str = "CAIRN_IMAGES_DIR";
    pub const IMAGES_PATTERN: &str = "CAIRN_IMAGES_PATTERN";
    pub const STAMP_DIR: &str = "CAIRN_STAMP_DIR";
    pub const ENGINE_HOME: &str = "CAIRN_ENGINE_HOME";
    pub const ENGINE_BIN: &str = "CAIRN_ENGINE_BIN";
    pub const ENGINE_HOST: &str = "CAIRN_ENGINE_HOST";
    pub const COMPOSE_BIN: &str = "CAIRN_COMPOSE_BIN";
    pub const DEV_ROOT: &str = "CAIRN_DEV_ROOT";
    pub const LOG_DIR: &str = "CAIRN_LOG_DIR";
    pub const CONFIG: &str = "CAIRN_CONFIG";
    pub const NETWORK: &str = "CAIRN_NETWORK";
}
