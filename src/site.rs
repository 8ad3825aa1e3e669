//! Site file management: `sites-available` and `sites-enabled`.
//!
//! Follows the Debian-style Nginx layout under a configurable nginx directory
//! (default `/etc/nginx`):
//!
//! ```text
//! /etc/nginx/
//! ├── sites-available/
//! │   └── my-site          # rendered config, written by create_site
//! └── sites-enabled/
//!     └── my-site -> ../sites-available/my-site
//! ```
//!
//! A site is *created* by rendering its block config into `sites-available`
//! and *enabled* by symlinking it from `sites-enabled`. Disabling removes the
//! symlink and leaves the config file in place.
//!
//! Creation validates the block tree first, so an invalid tree fails before
//! any text reaches disk.
//!
//! Most operations need root when pointed at the real `/etc/nginx`. Remember
//! to reload Nginx (`systemctl reload nginx`) after changing sites.

use crate::blocks::{Block, BlockError, Context, validate_blocks};
use crate::render::render_blocks;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// System-level Nginx install directory.
pub const DEFAULT_NGINX_DIR: &str = "/etc/nginx";

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid site config: {0}")]
    Block(#[from] BlockError),
    #[error("Site '{0}' already exists at {1}")]
    SiteExists(String, PathBuf),
    #[error("Site '{0}' does not exist in {1}")]
    NoSuchSite(String, PathBuf),
}

/// A site definition: name, desired enabled state, and config blocks.
///
/// The config blocks are `http`-context children (typically one or more
/// `server` blocks) because the written file is pulled into the `http`
/// block of `nginx.conf` via `include /etc/nginx/sites-enabled/*;`.
///
/// Deserializable from JSON, which is how the CLI accepts site definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NginxSite {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    pub config: Vec<Block>,
}

/// What [`create_site`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedSite {
    /// The written `sites-available` entry.
    pub path: PathBuf,
    /// The exact text written, trailing newline included.
    pub text: String,
    pub enabled: bool,
}

/// One `sites-available` entry and whether it is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteStatus {
    pub name: String,
    pub enabled: bool,
}

pub fn sites_available_dir(nginx_dir: &Path) -> PathBuf {
    nginx_dir.join("sites-available")
}

pub fn sites_enabled_dir(nginx_dir: &Path) -> PathBuf {
    nginx_dir.join("sites-enabled")
}

/// Validate, render, and write a site config into `sites-available`.
///
/// Refuses to overwrite an existing site. When `site.enabled` is set, the
/// site is enabled (symlinked) after the write.
pub fn create_site(site: &NginxSite, nginx_dir: &Path) -> Result<CreatedSite, SiteError> {
    validate_blocks(&site.config, Context::Http)?;
    let text = format!("{}\n", render_blocks(&site.config, 0));

    let available = sites_available_dir(nginx_dir);
    fs::create_dir_all(&available)?;
    let path = available.join(&site.name);
    if path.exists() {
        return Err(SiteError::SiteExists(site.name.clone(), path));
    }
    fs::write(&path, &text)?;

    if site.enabled {
        enable_site(&site.name, nginx_dir)?;
    }

    Ok(CreatedSite {
        path,
        text,
        enabled: site.enabled,
    })
}

/// Enable a site by symlinking it from `sites-enabled`.
///
/// Errors if the `sites-available` entry does not exist. Re-enabling an
/// already enabled site replaces the symlink, so the call is idempotent.
/// Returns the symlink path.
pub fn enable_site(name: &str, nginx_dir: &Path) -> Result<PathBuf, SiteError> {
    let target = sites_available_dir(nginx_dir).join(name);
    if !target.exists() {
        return Err(SiteError::NoSuchSite(name.to_string(), target));
    }

    let enabled = sites_enabled_dir(nginx_dir);
    fs::create_dir_all(&enabled)?;
    let link = enabled.join(name);
    if link.symlink_metadata().is_ok() {
        fs::remove_file(&link)?;
    }
    std::os::unix::fs::symlink(&target, &link)?;
    Ok(link)
}

/// Disable a site by removing its `sites-enabled` symlink.
///
/// Returns `true` if the symlink existed and was removed, `false` if the
/// site was not enabled. The `sites-available` entry is untouched.
pub fn disable_site(name: &str, nginx_dir: &Path) -> Result<bool, SiteError> {
    let link = sites_enabled_dir(nginx_dir).join(name);
    // symlink_metadata rather than exists(): a symlink whose target is gone
    // still counts as enabled and must be removable
    if link.symlink_metadata().is_err() {
        return Ok(false);
    }
    fs::remove_file(&link)?;
    Ok(true)
}

/// All `sites-available` entries with their enabled status, sorted by name.
///
/// A missing `sites-available` directory is an empty list, not an error.
pub fn list_sites(nginx_dir: &Path) -> Result<Vec<SiteStatus>, SiteError> {
    let available = sites_available_dir(nginx_dir);
    if !available.is_dir() {
        return Ok(Vec::new());
    }

    let enabled_dir = sites_enabled_dir(nginx_dir);
    let mut sites = Vec::new();
    for entry in fs::read_dir(&available)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let enabled = enabled_dir.join(&name).symlink_metadata().is_ok();
        sites.push(SiteStatus { name, enabled });
    }
    sites.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::ReturnTarget;
    use crate::test_helpers::*;

    fn redirect_site(name: &str, enabled: bool) -> NginxSite {
        NginxSite {
            name: name.into(),
            enabled,
            config: vec![Block::Server {
                children: vec![
                    Block::Listen {
                        values: vec!["80".into()],
                    },
                    Block::Return(ReturnTarget::Redirect {
                        code: Some(301),
                        url: "https://$host$request_uri".into(),
                    }),
                ],
            }],
        }
    }

    #[test]
    fn create_writes_rendered_config() {
        let tmp = temp_nginx_dir();
        let created = create_site(&redirect_site("test-site", false), tmp.path()).unwrap();

        assert_eq!(
            created.text,
            "server {\n    listen 80;\n    return 301 https://$host$request_uri;\n}\n"
        );
        assert_eq!(created.path, tmp.path().join("sites-available/test-site"));
        assert_eq!(read_site(tmp.path(), "test-site"), created.text);
        assert_site_enabled(tmp.path(), "test-site", false);
    }

    #[test]
    fn create_enabled_site_links_it() {
        let tmp = temp_nginx_dir();
        let created = create_site(&redirect_site("test-site", true), tmp.path()).unwrap();
        assert!(created.enabled);
        assert_site_enabled(tmp.path(), "test-site", true);
        // the symlink resolves to the written config
        let via_link =
            std::fs::read_to_string(sites_enabled_dir(tmp.path()).join("test-site")).unwrap();
        assert_eq!(via_link, created.text);
    }

    #[test]
    fn create_refuses_to_overwrite() {
        let tmp = temp_nginx_dir();
        seed_site(tmp.path(), "test-site", "# existing\n");

        let err = create_site(&redirect_site("test-site", false), tmp.path()).unwrap_err();
        assert!(matches!(err, SiteError::SiteExists(ref name, _) if name == "test-site"));
        // the existing file is untouched
        assert_eq!(read_site(tmp.path(), "test-site"), "# existing\n");
    }

    #[test]
    fn create_rejects_invalid_tree_before_writing() {
        let tmp = temp_nginx_dir();
        let site = NginxSite {
            name: "bad-site".into(),
            enabled: false,
            // listen is a server-context directive, not http
            config: vec![Block::Listen {
                values: vec!["80".into()],
            }],
        };
        let err = create_site(&site, tmp.path()).unwrap_err();
        assert!(matches!(err, SiteError::Block(_)));
        assert!(!sites_available_dir(tmp.path()).join("bad-site").exists());
    }

    #[test]
    fn create_empty_config_writes_single_newline() {
        let tmp = temp_nginx_dir();
        let site = NginxSite {
            name: "empty".into(),
            enabled: false,
            config: vec![],
        };
        let created = create_site(&site, tmp.path()).unwrap();
        assert_eq!(created.text, "\n");
    }

    #[test]
    fn enable_requires_existing_site() {
        let tmp = temp_nginx_dir();
        let err = enable_site("missing", tmp.path()).unwrap_err();
        assert!(matches!(err, SiteError::NoSuchSite(ref name, _) if name == "missing"));
    }

    #[test]
    fn enable_is_idempotent() {
        let tmp = temp_nginx_dir();
        seed_site(tmp.path(), "test-site", "server {\n}\n");
        enable_site("test-site", tmp.path()).unwrap();
        enable_site("test-site", tmp.path()).unwrap();
        assert_site_enabled(tmp.path(), "test-site", true);
    }

    #[test]
    fn disable_removes_only_the_link() {
        let tmp = temp_nginx_dir();
        seed_site(tmp.path(), "test-site", "server {\n}\n");
        enable_site("test-site", tmp.path()).unwrap();

        assert!(disable_site("test-site", tmp.path()).unwrap());
        assert_site_enabled(tmp.path(), "test-site", false);
        assert!(sites_available_dir(tmp.path()).join("test-site").exists());
    }

    #[test]
    fn disable_returns_false_when_not_enabled() {
        let tmp = temp_nginx_dir();
        seed_site(tmp.path(), "test-site", "server {\n}\n");
        assert!(!disable_site("test-site", tmp.path()).unwrap());
        assert!(!disable_site("never-created", tmp.path()).unwrap());
    }

    #[test]
    fn list_reports_enabled_state_sorted() {
        let tmp = temp_nginx_dir();
        seed_site(tmp.path(), "zeta", "# z\n");
        seed_site(tmp.path(), "alpha", "# a\n");
        enable_site("zeta", tmp.path()).unwrap();

        let sites = list_sites(tmp.path()).unwrap();
        assert_eq!(
            sites,
            vec![
                SiteStatus {
                    name: "alpha".into(),
                    enabled: false,
                },
                SiteStatus {
                    name: "zeta".into(),
                    enabled: true,
                },
            ]
        );
    }

    #[test]
    fn list_on_fresh_dir_is_empty() {
        let tmp = temp_nginx_dir();
        assert!(list_sites(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn site_definition_parses_from_json() {
        let site: NginxSite = serde_json::from_str(
            r#"{
                "name": "my-site",
                "enabled": true,
                "config": [
                    {"type": "server", "children": [
                        {"type": "listen", "values": ["80"]},
                        {"type": "location", "uri": "/", "children": [
                            {"type": "proxy_pass", "url": "http://localhost:3000"}
                        ]}
                    ]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(site.name, "my-site");
        assert!(site.enabled);
        assert_eq!(site.config.len(), 1);
    }
}
