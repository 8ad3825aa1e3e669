//! Shared test utilities for the nginx-sites test suite.
//!
//! Provides an isolated temp nginx directory plus seed/read/assert helpers
//! for the `sites-available`/`sites-enabled` layout, so site and https tests
//! never touch the real `/etc/nginx`.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::site::{sites_available_dir, sites_enabled_dir};

/// A fresh, empty nginx directory for one test.
pub fn temp_nginx_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a `sites-available` entry directly, creating the directory.
pub fn seed_site(nginx_dir: &Path, name: &str, text: &str) {
    let available = sites_available_dir(nginx_dir);
    fs::create_dir_all(&available).unwrap();
    fs::write(available.join(name), text).unwrap();
}

/// Read a site's config text. Panics with context on a miss.
pub fn read_site(nginx_dir: &Path, name: &str) -> String {
    let path = sites_available_dir(nginx_dir).join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("site '{name}' not readable at {}: {e}", path.display()))
}

/// Assert a site's enabled symlink matches the expected state.
pub fn assert_site_enabled(nginx_dir: &Path, name: &str, expected: bool) {
    let link = sites_enabled_dir(nginx_dir).join(name);
    let enabled = link.symlink_metadata().is_ok();
    assert_eq!(
        enabled,
        expected,
        "site '{name}' enabled state at {}",
        link.display()
    );
}
