//! One-call HTTPS site creation.
//!
//! Assembles a complete HTTPS server config from a handful of inputs: the
//! caller provides a site name and its `location` blocks, this module
//! provides everything else: dual-stack TLS listens, a hardened set of SSL
//! parameters, security headers, certificate file paths from
//! [`cert`](crate::cert), and a port-80 server that upgrades every request
//! to HTTPS with a 301.
//!
//! The hardening defaults are deliberately opinionated (TLSv1.3 only,
//! session tickets off, OCSP stapling on); callers needing different
//! parameters can assemble their own `server` block and use
//! [`site::create_site`](crate::site::create_site) directly.

use crate::blocks::{Block, ReturnTarget, SslProtocol};
use crate::cert::{CertError, CertParams, CertPaths, create_self_signed_certificate};
use crate::site::{CreatedSite, NginxSite, SiteError, create_site};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpsError {
    #[error("Certificate error: {0}")]
    Cert(#[from] CertError),
    #[error("Site error: {0}")]
    Site(#[from] SiteError),
}

/// An HTTPS site definition: like [`NginxSite`] but the config is derived,
/// with only the `location` blocks supplied by the caller.
#[derive(Debug, Clone)]
pub struct HttpsSite {
    pub name: String,
    pub enabled: bool,
    /// `location` blocks for the HTTPS server, e.g. a `proxy_pass` to a
    /// local backend.
    pub locations: Vec<Block>,
}

/// What [`create_https_site`] produced.
#[derive(Debug)]
pub struct CreatedHttpsSite {
    pub site: CreatedSite,
    pub certs: CertPaths,
}

/// Dual-stack TLS listens for the HTTPS server.
pub fn https_listen_blocks() -> Vec<Block> {
    vec![
        Block::Listen {
            values: vec!["443".into(), "ssl".into()],
        },
        Block::Listen {
            values: vec!["[::]:443".into(), "ssl".into()],
        },
    ]
}

/// A port-80 server that 301-redirects everything to HTTPS.
pub fn http_upgrade_server() -> Block {
    Block::Server {
        children: vec![
            Block::Listen {
                values: vec!["80".into()],
            },
            Block::Listen {
                values: vec!["[::]:80".into()],
            },
            Block::Return(ReturnTarget::Redirect {
                code: Some(301),
                url: "https://$host$request_uri".into(),
            }),
        ],
    }
}

/// Hardened TLS parameters and security headers for the HTTPS server.
pub fn ssl_hardening_blocks() -> Vec<Block> {
    vec![
        Block::SslProtocols {
            protocols: vec![SslProtocol::TlsV1_3],
        },
        Block::SslPreferServerCiphers { enabled: true },
        Block::SslEcdhCurve {
            curves: vec!["secp384r1".into()],
        },
        Block::SslSessionTimeout { time: "10m".into() },
        Block::SslSessionCache {
            values: vec!["shared:SSL:10m".into()],
        },
        Block::SslSessionTickets { enabled: false },
        Block::SslStapling { enabled: true },
        Block::SslStaplingVerify { enabled: true },
        Block::AddHeader {
            name: "X-Frame-Options".into(),
            value: "DENY".into(),
            always: false,
        },
        Block::AddHeader {
            name: "X-Content-Type-Options".into(),
            value: "nosniff".into(),
            always: false,
        },
        Block::AddHeader {
            name: "X-XSS-Protection".into(),
            value: "\"1; mode=block\"".into(),
            always: false,
        },
    ]
}

/// The full block config for an HTTPS site: the TLS server (listens, cert
/// files, hardening, caller locations) plus the HTTP upgrade server.
pub fn https_site_config(certs: &CertPaths, locations: Vec<Block>) -> Vec<Block> {
    let mut children = https_listen_blocks();
    children.push(Block::SslCertificate {
        file: certs.certificate.display().to_string(),
    });
    children.push(Block::SslCertificateKey {
        file: certs.key.display().to_string(),
    });
    children.extend(ssl_hardening_blocks());
    children.push(Block::SslDhparam {
        file: certs.dh_param.display().to_string(),
    });
    children.extend(locations);

    vec![Block::Server { children }, http_upgrade_server()]
}

/// Create a self-signed certificate and an Nginx site that serves HTTPS with
/// it, redirecting plain HTTP to HTTPS.
///
/// Needs root against the default system paths, and Nginx must be reloaded
/// afterwards for the site to take effect.
pub fn create_https_site(
    site: &HttpsSite,
    cert_params: &CertParams,
    nginx_dir: &Path,
) -> Result<CreatedHttpsSite, HttpsError> {
    let certs = create_self_signed_certificate(&site.name, nginx_dir, cert_params)?;
    let config = https_site_config(&certs, site.locations.clone());
    let created = create_site(
        &NginxSite {
            name: site.name.clone(),
            enabled: site.enabled,
            config,
        },
        nginx_dir,
    )?;
    Ok(CreatedHttpsSite {
        site: created,
        certs,
    })
}
