use std::path::PathBuf;

use vitrine_gate::AdmissionGate;

/// Maximum accepted upload body, in bytes (20 MiB).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Server configuration, read once at startup.
///
/// Environment overrides:
///
/// | variable | default |
/// |---|---|
/// | `PORT` | `8092` |
/// | `MAX_ICNS_JOBS` | `2` |
///
/// The static root defaults to the process working directory.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Bound on concurrently running icon conversions.
    pub max_icns_jobs: usize,
    /// Root of the static file tree.
    pub static_root: PathBuf,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 8092;

    /// Read configuration from the environment. Unset or unparseable values
    /// fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parsed("PORT", Self::DEFAULT_PORT),
            max_icns_jobs: env_parsed("MAX_ICNS_JOBS", AdmissionGate::DEFAULT_MAX_CONCURRENT),
            static_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        // Parsing helper only; from_env reads process-global state that other
        // tests may race on.
        assert_eq!(env_parsed("VITRINE_UNSET_VARIABLE", 8092u16), 8092);
    }
}
