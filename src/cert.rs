//! Self-signed TLS certificate generation.
//!
//! Shells out to the system `openssl` binary twice: once for the key and
//! certificate (`openssl req -x509`), once for the Nginx DH parameters
//! (`openssl dhparam -dsaparam`). Argument vectors are built by pure
//! functions so the exact invocations are unit-testable without running
//! openssl; no shell is involved, so paths need no quoting.
//!
//! Output locations default to the conventional system paths and can be
//! overridden per file:
//!
//! ```text
//! key     /etc/ssl/private/nginx-self-signed-<site>.key
//! cert    /etc/ssl/certs/nginx-self-signed-<site>.crt
//! dhparam <nginx_dir>/dh-params/dh-param-<site>.pem
//! ```
//!
//! Self-signed certificates are for development and internal hosts; browsers
//! will warn on them. Production sites want a real CA.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to run openssl (is it installed?): {0}")]
    Spawn(std::io::Error),
    #[error("openssl {step} failed ({status}): {stderr}")]
    OpensslFailed {
        step: &'static str,
        status: String,
        stderr: String,
    },
}

/// Parameters for a self-signed certificate.
///
/// All fields are optional; see [`CertParams::subject_string`] and
/// [`resolve_cert_paths`] for the defaults. Deserializable so the tool
/// config can carry site-wide defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CertParams {
    /// How many days the certificate is valid for. Default 365.
    pub days: Option<u32>,
    /// Two-letter country code. Default `US`.
    pub country_code: Option<String>,
    /// Full state name.
    pub state_name: Option<String>,
    /// Full city name.
    pub city_name: Option<String>,
    /// Company or organization name.
    pub organization_name: Option<String>,
    /// Unit within the organization, like a department.
    pub organizational_unit_name: Option<String>,
    /// The site's fully qualified domain name, e.g. `example.com`.
    pub website_hostname: Option<String>,
    /// Overrides for the generated file locations.
    pub output_paths: CertOutputPaths,
}

/// Optional per-file output path overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CertOutputPaths {
    pub key: Option<PathBuf>,
    pub certificate: Option<PathBuf>,
    pub dh_param: Option<PathBuf>,
}

/// Where the three generated files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertPaths {
    pub key: PathBuf,
    pub certificate: PathBuf,
    pub dh_param: PathBuf,
}

const DEFAULT_DAYS: u32 = 365;

impl CertParams {
    /// The openssl `-subj` argument: `/C=…/ST=…/L=…/O=…/OU=…/CN=…`, with `.`
    /// standing in for every absent field (country defaults to `US`).
    pub fn subject_string(&self) -> String {
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| ".".to_string());
        format!(
            "/C={}/ST={}/L={}/O={}/OU={}/CN={}",
            self.country_code.clone().unwrap_or_else(|| "US".to_string()),
            field(&self.state_name),
            field(&self.city_name),
            field(&self.organization_name),
            field(&self.organizational_unit_name),
            field(&self.website_hostname),
        )
    }
}

/// Resolve the output paths for a site, applying defaults for any override
/// the params leave unset.
pub fn resolve_cert_paths(params: &CertParams, site_name: &str, nginx_dir: &Path) -> CertPaths {
    let overrides = &params.output_paths;
    CertPaths {
        key: overrides.key.clone().unwrap_or_else(|| {
            PathBuf::from(format!("/etc/ssl/private/nginx-self-signed-{site_name}.key"))
        }),
        certificate: overrides.certificate.clone().unwrap_or_else(|| {
            PathBuf::from(format!("/etc/ssl/certs/nginx-self-signed-{site_name}.crt"))
        }),
        dh_param: overrides.dh_param.clone().unwrap_or_else(|| {
            nginx_dir
                .join("dh-params")
                .join(format!("dh-param-{site_name}.pem"))
        }),
    }
}

/// Arguments for the key + certificate step.
pub fn req_args(params: &CertParams, paths: &CertPaths) -> Vec<String> {
    vec![
        "req".into(),
        "-x509".into(),
        "-nodes".into(),
        "-days".into(),
        params.days.unwrap_or(DEFAULT_DAYS).to_string(),
        "-newkey".into(),
        "rsa:2048".into(),
        "-keyout".into(),
        paths.key.display().to_string(),
        "-out".into(),
        paths.certificate.display().to_string(),
        "-subj".into(),
        params.subject_string(),
    ]
}

/// Arguments for the DH parameters step. `-dsaparam` trades a little
/// theoretical strength for generation that takes seconds instead of hours.
pub fn dhparam_args(paths: &CertPaths) -> Vec<String> {
    vec![
        "dhparam".into(),
        "-dsaparam".into(),
        "-out".into(),
        paths.dh_param.display().to_string(),
        "4096".into(),
    ]
}

/// Generate a key, a self-signed certificate, and DH parameters for a site.
///
/// Creates parent directories for all three outputs, then runs the two
/// openssl steps. Returns the resolved output paths on success.
pub fn create_self_signed_certificate(
    site_name: &str,
    nginx_dir: &Path,
    params: &CertParams,
) -> Result<CertPaths, CertError> {
    let paths = resolve_cert_paths(params, site_name, nginx_dir);

    for path in [&paths.key, &paths.certificate, &paths.dh_param] {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    run_openssl("req", &req_args(params, &paths))?;
    run_openssl("dhparam", &dhparam_args(&paths))?;

    Ok(paths)
}

fn run_openssl(step: &'static str, args: &[String]) -> Result<(), CertError> {
    let output = Command::new("openssl")
        .args(args)
        .output()
        .map_err(CertError::Spawn)?;
    if !output.status.success() {
        return Err(CertError::OpensslFailed {
            step,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
