//! Client configuration discovery: explicit file, else the platform config
//! directory, else built-in defaults. Environment variables win over all.

use std::path::{Path, PathBuf};

use conciliador_client::{ClientConfig, ClientError};

pub const CONFIG_FILE: &str = "config.toml";

/// `config.toml` inside the platform config directory, if one can be resolved.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("co", "conciliador", "Conciliador")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

pub fn load_client_config(explicit: Option<&Path>) -> Result<ClientConfig, ClientError> {
    let config = match explicit {
        Some(path) => read_config(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path)?,
            _ => {
                tracing::debug!("No config file found, using defaults");
                ClientConfig::default()
            }
        },
    };
    let config = config.with_env_overrides()?;
    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<ClientConfig, ClientError> {
    tracing::debug!("Reading client config from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    ClientConfig::from_toml(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "base_url = \"http://api.local:9000\"\ntimeout_secs = 5\n").unwrap();

        let config = read_config(&path).unwrap();
        assert_eq!(config.base_url, "http://api.local:9000");
        assert_eq!(config.timeout_secs, Some(5));
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let err = load_client_config(Some(Path::new("/nonexistent/conciliador.toml"))).unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }

    #[test]
    fn default_path_ends_with_config_file() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(CONFIG_FILE));
        }
    }
}
