//! # nginx-sites
//!
//! Programmatic Nginx site configuration: build configs as typed block
//! trees, render them to exact Nginx syntax, and manage them on disk:
//! including one-call HTTPS sites with self-signed certificates.
//!
//! # Architecture: Pure Core, Thin I/O Shell
//!
//! The core is a pure transformation layer with no state and no I/O:
//!
//! ```text
//! Vec<Block>  →  validate_blocks()  →  render_blocks()  →  config text
//! ```
//!
//! Everything that touches the system (writing `sites-available` entries,
//! toggling `sites-enabled` symlinks, invoking `openssl`) lives at the
//! edges and consumes only the rendered text or the site name. An invalid
//! tree fails validation before any text is produced, so a half-correct
//! config never reaches disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`blocks`] | Typed directive variants, context sets, the derived containment table, tree validation |
//! | [`render`] | Pure recursive renderer: block tree → Nginx config text |
//! | [`site`] | `sites-available`/`sites-enabled` management: create, enable, disable, list |
//! | [`cert`] | Self-signed certificate generation via the system `openssl` |
//! | [`https`] | Canned HTTPS site assembly: hardened TLS defaults + cert paths + caller locations |
//! | [`config`] | `nginx-sites.toml` loading, validation, and the stock config template |
//! | [`output`] | CLI output formatting, pure line builders |
//!
//! # Design Decisions
//!
//! ## Typed Blocks Over Templates
//!
//! Site configs are Rust values, not text templates. The compiler enforces
//! each directive's field shape (a `return` can't carry both a redirect URL
//! and a body; `gzip` takes a bool, not a string), and the containment table
//! in [`blocks`] rejects structurally misplaced directives before rendering.
//! Text only exists as the final, validated output.
//!
//! ## One Containment Table, Derived
//!
//! Each directive declares its valid parent contexts exactly once, in
//! [`blocks::DIRECTIVES`]. The container → permitted-children relation is
//! computed from that table at first use, never hand-maintained, so a
//! directive's declared parents and a container's accepted children cannot
//! disagree.
//!
//! ## JSON Site Definitions
//!
//! Blocks serialize as tagged JSON, so a site definition is a plain JSON
//! document the CLI can read:
//!
//! ```json
//! {
//!     "name": "my-site",
//!     "enabled": true,
//!     "config": [
//!         {"type": "server", "children": [
//!             {"type": "listen", "values": ["80"]},
//!             {"type": "location", "uri": "/", "children": [
//!                 {"type": "proxy_pass", "url": "http://localhost:3000"}
//!             ]}
//!         ]}
//!     ]
//! }
//! ```
//!
//! ## Shelling Out To openssl
//!
//! Certificates come from the system `openssl` binary rather than an
//! in-process TLS library. The two invocations (`req -x509`, `dhparam
//! -dsaparam`) are exactly what an operator would run by hand, which keeps
//! the generated files inspectable with standard tooling and the argument
//! lists unit-testable as plain vectors.

pub mod blocks;
pub mod cert;
pub mod config;
pub mod https;
pub mod output;
pub mod render;
pub mod site;

#[cfg(test)]
pub(crate) mod test_helpers;
