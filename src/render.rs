//! Rendering block trees to Nginx configuration text.
//!
//! A pure, stateless structural recursion: one line per simple directive, one
//! brace-delimited body per container, four spaces of indentation per nesting
//! level. The output is exact Nginx syntax (statement lines end with `;`,
//! container bodies are wrapped in `{`/`}`) and is deterministic for a given
//! tree.
//!
//! Rendering never fails. Trees are expected to have passed
//! [`validate_blocks`](crate::blocks::validate_blocks) first; behavior on a
//! force-constructed invalid tree is simply to print it, since structural
//! checking is the model's job, not the renderer's.
//!
//! ## Joining Rules
//!
//! Most multi-value directives space-join their values (`listen`,
//! `ssl_protocols`, `access_log`, `ssl_session_cache`). The OpenSSL-syntax
//! directives `ssl_ciphers` and `ssl_ecdh_curve` colon-join instead.
//! Optional parts (`error_log` level, `user` group, `return` code, the
//! `add_header` `always` token, a `location` matcher) are omitted entirely
//! when absent.

use crate::blocks::{Block, ReturnTarget};

/// Spaces per indentation level.
const INDENT_WIDTH: usize = 4;

/// Render an ordered block sequence, joining the rendered blocks with
/// newlines. This is what a whole site config or `nginx.conf` body goes
/// through; no trailing newline is appended.
pub fn render_blocks(blocks: &[Block], indent: usize) -> String {
    blocks
        .iter()
        .map(|block| render_block(block, indent))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single block at the given indentation level.
///
/// The indent prefix is applied to every line of the block's output,
/// including closing braces of nested containers.
pub fn render_block(block: &Block, indent: usize) -> String {
    let rendered = render(block);
    if indent == 0 {
        return rendered;
    }
    let prefix = " ".repeat(indent * INDENT_WIDTH);
    rendered
        .lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One statement line: space-joined parts, `;`-terminated.
fn statement(parts: &[&str]) -> String {
    format!("{};", parts.join(" "))
}

/// A statement whose values are joined with `sep` into a single part.
fn joined_statement(tag: &str, values: &[String], sep: &str) -> String {
    if values.is_empty() {
        return format!("{tag};");
    }
    format!("{tag} {};", values.join(sep))
}

/// Boolean flag directives render the literal `on`/`off` tokens.
fn flag_statement(tag: &str, enabled: bool) -> String {
    format!("{tag} {};", if enabled { "on" } else { "off" })
}

/// A container body: header line, children at one more indent level, closing
/// brace. The caller's indent is applied afterwards by [`render_block`], so
/// nesting accumulates naturally.
fn container(header: &str, children: &[Block]) -> String {
    let mut lines = vec![format!("{header} {{")];
    if !children.is_empty() {
        lines.push(render_blocks(children, 1));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

fn render(block: &Block) -> String {
    match block {
        // main is the top of the hierarchy: children only, no brace wrapper
        Block::Main { children } => render_blocks(children, 0),
        Block::Http { children } => container("http", children),
        Block::Server { children } => container("server", children),
        Block::Events { children } => container("events", children),
        Block::Location {
            matcher,
            uri,
            children,
        } => {
            let header = match matcher {
                Some(matcher) => format!("location {} {uri}", matcher.as_str()),
                None => format!("location {uri}"),
            };
            container(&header, children)
        }
        Block::Listen { values } => joined_statement("listen", values, " "),
        Block::AccessLog { values } => joined_statement("access_log", values, " "),
        Block::SslSessionCache { values } => joined_statement("ssl_session_cache", values, " "),
        Block::SslCiphers { ciphers } => joined_statement("ssl_ciphers", ciphers, ":"),
        Block::SslEcdhCurve { curves } => joined_statement("ssl_ecdh_curve", curves, ":"),
        Block::SslProtocols { protocols } => {
            let values: Vec<String> = protocols.iter().map(|p| p.as_str().to_string()).collect();
            joined_statement("ssl_protocols", &values, " ")
        }
        Block::Gzip { enabled } => flag_statement("gzip", *enabled),
        Block::Sendfile { enabled } => flag_statement("sendfile", *enabled),
        Block::TcpNopush { enabled } => flag_statement("tcp_nopush", *enabled),
        Block::SslPreferServerCiphers { enabled } => {
            flag_statement("ssl_prefer_server_ciphers", *enabled)
        }
        Block::SslSessionTickets { enabled } => flag_statement("ssl_session_tickets", *enabled),
        Block::SslStapling { enabled } => flag_statement("ssl_stapling", *enabled),
        Block::SslStaplingVerify { enabled } => flag_statement("ssl_stapling_verify", *enabled),
        Block::AuthBasic { value } => statement(&["auth_basic", value]),
        Block::AuthBasicUserFile { file } => statement(&["auth_basic_user_file", file]),
        Block::Include { file } => statement(&["include", file]),
        Block::LoadModule { file } => statement(&["load_module", file]),
        Block::SslDhparam { file } => statement(&["ssl_dhparam", file]),
        Block::SslCertificate { file } => statement(&["ssl_certificate", file]),
        Block::SslCertificateKey { file } => statement(&["ssl_certificate_key", file]),
        Block::Pid { file } => statement(&["pid", file]),
        Block::SslSessionTimeout { time } => statement(&["ssl_session_timeout", time]),
        Block::DefaultType { mime_type } => statement(&["default_type", mime_type]),
        Block::TypesHashMaxSize { size } => statement(&["types_hash_max_size", &size.to_string()]),
        Block::WorkerProcesses { count } => {
            statement(&["worker_processes", &count.to_string()])
        }
        Block::WorkerConnections { count } => {
            statement(&["worker_connections", &count.to_string()])
        }
        Block::User { user, group } => match group {
            Some(group) => statement(&["user", user, group]),
            None => statement(&["user", user]),
        },
        Block::ErrorLog { file, level } => match level {
            Some(level) => statement(&["error_log", file, level.as_str()]),
            None => statement(&["error_log", file]),
        },
        Block::AddHeader {
            name,
            value,
            always,
        } => {
            if *always {
                statement(&["add_header", name, value, "always"])
            } else {
                statement(&["add_header", name, value])
            }
        }
        Block::Return(target) => match target {
            ReturnTarget::Redirect { code, url } => match code {
                Some(code) => statement(&["return", &code.to_string(), url]),
                None => statement(&["return", url]),
            },
            ReturnTarget::Body { code, text } => {
                statement(&["return", &code.to_string(), text])
            }
        },
        Block::ProxyPass { url } => statement(&["proxy_pass", url]),
        Block::ProxySetHeader { name, value } => statement(&["proxy_set_header", name, value]),
    }
}
