use crate::errors::StationError;
use crate::runtime::FileSystem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Connection settings for the download station. Credentials never appear
/// on the command line; they live in the config file only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("dlstation")
        })
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dlstation/config.toml")
}

pub fn load_config(
    fs: &dyn FileSystem,
    override_path: Option<&Path>,
) -> Result<AppConfig, StationError> {
    let path = override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    if !fs.exists(&path) {
        return Err(StationError::InvalidConfig(format!(
            "config file not found: {}",
            path.display()
        )));
    }

    let raw = fs.read_to_string(&path)?;
    let config: AppConfig =
        toml::from_str(&raw).map_err(|e| StationError::ConfigParse(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), StationError> {
    if config.url.trim().is_empty() {
        return Err(StationError::InvalidConfig(
            "url missing from configuration file".to_string(),
        ));
    }
    if config.user.trim().is_empty() {
        return Err(StationError::InvalidConfig(
            "user name missing from configuration file".to_string(),
        ));
    }
    if config.password.trim().is_empty() {
        return Err(StationError::InvalidConfig(
            "password missing from configuration file".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::load_config;
    use crate::errors::StationError;
    use crate::runtime::{FakeFileSystem, FileSystem};
    use std::path::Path;

    const GOOD: &str = r#"
url = "https://nas.example.com:5001"
user = "admin"
password = "hunter2"
"#;

    #[test]
    fn loads_a_complete_config() {
        let fs = FakeFileSystem::with_file("/home/u/.config/dlstation/config.toml", GOOD);
        let config = load_config(&fs, Some(Path::new("/home/u/.config/dlstation/config.toml")))
            .expect("config");
        assert_eq!(config.url, "https://nas.example.com:5001");
        assert_eq!(config.user, "admin");
    }

    #[test]
    fn missing_file_is_invalid_config() {
        let fs = FakeFileSystem::default();
        let err = load_config(&fs, Some(Path::new("/nope.toml"))).expect_err("missing");
        assert!(matches!(err, StationError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let fs = FakeFileSystem::with_file("/c.toml", "url = [broken");
        let err = load_config(&fs, Some(Path::new("/c.toml"))).expect_err("parse");
        assert!(matches!(err, StationError::ConfigParse(_)));
    }

    #[test]
    fn blank_credentials_are_rejected() {
        let cases = [
            ("url = \"\"\nuser = \"a\"\npassword = \"b\"\n", "url"),
            ("url = \"u\"\nuser = \"\"\npassword = \"b\"\n", "user"),
            ("url = \"u\"\nuser = \"a\"\npassword = \"\"\n", "password"),
        ];
        for (raw, field) in cases {
            let fs = FakeFileSystem::default();
            fs.write_string(Path::new("/c.toml"), raw).expect("seed");
            let err = load_config(&fs, Some(Path::new("/c.toml"))).expect_err(field);
            assert!(
                format!("{err}").contains(field),
                "{field} missing from: {err}"
            );
        }
    }
}
