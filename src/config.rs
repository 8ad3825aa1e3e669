//! Tool configuration loaded from `nginx-sites.toml`.
//!
//! Everything has a sensible default, so the config file is optional: a
//! missing file means stock settings. When present, it can move the nginx
//! directory (useful for testing or non-Debian layouts) and set certificate
//! defaults that every `https` invocation inherits:
//!
//! ```toml
//! nginx_dir = "/etc/nginx"
//!
//! [cert]
//! days = 365
//! country_code = "US"
//! website_hostname = "example.com"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::cert::CertParams;
use crate::site::DEFAULT_NGINX_DIR;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool settings. All fields default; user config files only specify what
/// they override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// The Nginx install directory holding `sites-available`/`sites-enabled`.
    pub nginx_dir: PathBuf,
    /// Defaults for self-signed certificate generation.
    pub cert: CertParams,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            nginx_dir: PathBuf::from(DEFAULT_NGINX_DIR),
            cert: CertParams::default(),
        }
    }
}

impl ToolConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cert.days == Some(0) {
            return Err(ConfigError::Validation(
                "cert.days must be at least 1".into(),
            ));
        }
        if let Some(code) = &self.cert.country_code {
            if code.len() != 2 {
                return Err(ConfigError::Validation(
                    "cert.country_code must be a 2-letter code".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Load and validate a config file.
pub fn load(path: &Path) -> Result<ToolConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ToolConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load a config file if it exists, falling back to defaults.
pub fn load_optional(path: &Path) -> Result<ToolConfig, ConfigError> {
    if !path.exists() {
        return Ok(ToolConfig::default());
    }
    load(path)
}

/// A stock config file with every option documented, printed by the
/// `gen-config` subcommand.
pub fn stock_config_toml() -> String {
    r#"# nginx-sites configuration.
# Every setting is optional; delete anything you don't need to override.

# Nginx install directory, holding sites-available/ and sites-enabled/.
nginx_dir = "/etc/nginx"

# Defaults for self-signed certificate generation (the `https` command).
[cert]
# Certificate validity in days.
days = 365
# Certificate subject fields. Absent fields are filled with ".".
country_code = "US"
# state_name = "Maine"
# city_name = "Portland"
# organization_name = "Example Org"
# organizational_unit_name = "Ops"
# website_hostname = "example.com"

# Override where the generated files land.
[cert.output_paths]
# key = "/etc/ssl/private/nginx-self-signed-SITE.key"
# certificate = "/etc/ssl/certs/nginx-self-signed-SITE.crt"
# dh_param = "/etc/nginx/dh-params/dh-param-SITE.pem"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_when_file_missing() {
        let config = load_optional(Path::new("/nonexistent/nginx-sites.toml")).unwrap();
        assert_eq!(config.nginx_dir, PathBuf::from("/etc/nginx"));
        assert_eq!(config.cert.days, None);
    }

    #[test]
    fn partial_config_overrides_defaults() {
        let file = write_config("nginx_dir = \"/opt/nginx\"\n");
        let config = load(file.path()).unwrap();
        assert_eq!(config.nginx_dir, PathBuf::from("/opt/nginx"));
        assert!(config.cert.country_code.is_none());
    }

    #[test]
    fn cert_section_parses() {
        let file = write_config(
            "[cert]\ndays = 30\ncountry_code = \"DE\"\nwebsite_hostname = \"example.com\"\n",
        );
        let config = load(file.path()).unwrap();
        assert_eq!(config.cert.days, Some(30));
        assert_eq!(config.cert.country_code.as_deref(), Some("DE"));
    }

    #[test]
    fn unknown_keys_rejected() {
        let file = write_config("nginx_dirr = \"/opt/nginx\"\n");
        assert!(matches!(load(file.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn zero_days_rejected() {
        let file = write_config("[cert]\ndays = 0\n");
        assert!(matches!(load(file.path()), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn bad_country_code_rejected() {
        let file = write_config("[cert]\ncountry_code = \"USA\"\n");
        assert!(matches!(load(file.path()), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_round_trips() {
        let config: ToolConfig = toml::from_str(&stock_config_toml()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.nginx_dir, PathBuf::from("/etc/nginx"));
        assert_eq!(config.cert.days, Some(365));
    }
}
