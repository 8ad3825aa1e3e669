//! CLI output formatting.
//!
//! Every entity follows the same two-level pattern: a header line naming the
//! thing, then indented context lines with paths and status. Formatters are
//! pure functions returning lines, so tests assert on strings and `main`
//! just prints.

use crate::cert::CertPaths;
use crate::site::{CreatedSite, SiteStatus};

const INDENT: &str = "    ";

/// Summary of a created site.
///
/// ```text
/// Created my-site
///     Config: /etc/nginx/sites-available/my-site
///     Enabled: yes
/// ```
pub fn format_created_site(name: &str, created: &CreatedSite) -> Vec<String> {
    vec![
        format!("Created {name}"),
        format!("{INDENT}Config: {}", created.path.display()),
        format!("{INDENT}Enabled: {}", yes_no(created.enabled)),
    ]
}

/// Summary of generated certificate files.
pub fn format_cert_paths(paths: &CertPaths) -> Vec<String> {
    vec![
        "Certificate files".to_string(),
        format!("{INDENT}Key: {}", paths.key.display()),
        format!("{INDENT}Certificate: {}", paths.certificate.display()),
        format!("{INDENT}DH params: {}", paths.dh_param.display()),
    ]
}

/// Site listing, one header per site.
pub fn format_site_list(sites: &[SiteStatus]) -> Vec<String> {
    if sites.is_empty() {
        return vec!["No sites in sites-available".to_string()];
    }
    let mut lines = Vec::new();
    for site in sites {
        lines.push(site.name.clone());
        lines.push(format!("{INDENT}Enabled: {}", yes_no(site.enabled)));
    }
    lines
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
