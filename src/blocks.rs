//! Typed Nginx directive blocks and their containment rules.
//!
//! Every supported directive is one variant of [`Block`], tagged by its Nginx
//! name. Container directives (`main`, `http`, `server`, `events`, `location`)
//! carry an ordered `children` vector; everything else is a single statement.
//!
//! ## Context Sets
//!
//! Nginx only accepts a directive inside specific parent blocks: `listen`
//! belongs in `server`, `worker_connections` in `events`, and so on. Each
//! directive's valid parents are declared once in [`DIRECTIVES`], and the
//! inverse relation (container → permitted child tags) is derived from that
//! table at first use by [`permitted_children`]. Declaring the relation in one
//! place means a directive's valid parents and a container's valid children
//! can never drift apart.
//!
//! Trees are checked against the derived table by [`validate_blocks`] before
//! any text is rendered or written. The renderer itself assumes a validated
//! tree and never fails.
//!
//! ## Serialization
//!
//! Blocks serialize as tagged JSON objects, so a whole site definition is a
//! plain JSON document:
//!
//! ```json
//! {"type": "location", "uri": "/", "children": [
//!     {"type": "proxy_pass", "url": "http://localhost:3000"}
//! ]}
//! ```
//!
//! The `return` directive has two mutually exclusive shapes sharing one tag:
//! `{code?, url}` (redirect) and `{code, text}` (response body). They are
//! modeled as [`ReturnTarget`], a nested untagged enum, so a block with both
//! or neither target is unrepresentable in Rust and rejected at the JSON
//! boundary.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("directive '{child}' is not valid inside '{parent}'")]
    ContextViolation {
        child: &'static str,
        parent: &'static str,
    },
    #[error("malformed block: {0}")]
    MalformedBlock(String),
}

/// A parent scope a directive may appear in.
///
/// `LocationIf`, `LimitExcept`, `If`, `Mail`, and `Stream` occur in context
/// sets (Nginx allows directives there) but are not containers this crate can
/// build. The sets match the upstream directive documentation rather than
/// our container coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Context {
    Main,
    Events,
    Http,
    Server,
    Location,
    LocationIf,
    LimitExcept,
    If,
    Mail,
    Stream,
}

impl Context {
    pub const ALL: [Context; 10] = [
        Context::Main,
        Context::Events,
        Context::Http,
        Context::Server,
        Context::Location,
        Context::LocationIf,
        Context::LimitExcept,
        Context::If,
        Context::Mail,
        Context::Stream,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Context::Main => "main",
            Context::Events => "events",
            Context::Http => "http",
            Context::Server => "server",
            Context::Location => "location",
            Context::LocationIf => "location.if",
            Context::LimitExcept => "limit_except",
            Context::If => "if",
            Context::Mail => "mail",
            Context::Stream => "stream",
        }
    }
}

/// TLS protocol versions accepted by `ssl_protocols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SslProtocol {
    #[serde(rename = "SSLv2")]
    SslV2,
    #[serde(rename = "SSLv3")]
    SslV3,
    #[serde(rename = "TLSv1")]
    TlsV1,
    #[serde(rename = "TLSv1.1")]
    TlsV1_1,
    #[serde(rename = "TLSv1.2")]
    TlsV1_2,
    #[serde(rename = "TLSv1.3")]
    TlsV1_3,
}

impl SslProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            SslProtocol::SslV2 => "SSLv2",
            SslProtocol::SslV3 => "SSLv3",
            SslProtocol::TlsV1 => "TLSv1",
            SslProtocol::TlsV1_1 => "TLSv1.1",
            SslProtocol::TlsV1_2 => "TLSv1.2",
            SslProtocol::TlsV1_3 => "TLSv1.3",
        }
    }
}

/// Severity levels accepted by `error_log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Notice,
    Warn,
    Error,
    Crit,
    Alert,
    Emerg,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Notice => "notice",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Crit => "crit",
            LogLevel::Alert => "alert",
            LogLevel::Emerg => "emerg",
        }
    }
}

/// `location` match modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationMatcher {
    #[serde(rename = "=")]
    Exact,
    #[serde(rename = "~")]
    Regex,
    #[serde(rename = "~*")]
    RegexInsensitive,
    #[serde(rename = "^~")]
    Prefix,
}

impl LocationMatcher {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationMatcher::Exact => "=",
            LocationMatcher::Regex => "~",
            LocationMatcher::RegexInsensitive => "~*",
            LocationMatcher::Prefix => "^~",
        }
    }
}

/// `worker_processes` count: a fixed number or the `auto` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCount {
    Auto,
    Fixed(u64),
}

impl fmt::Display for WorkerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerCount::Auto => f.write_str("auto"),
            WorkerCount::Fixed(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for WorkerCount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WorkerCount::Auto => serializer.serialize_str("auto"),
            WorkerCount::Fixed(n) => serializer.serialize_u64(*n),
        }
    }
}

impl<'de> Deserialize<'de> for WorkerCount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = WorkerCount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a worker count or the string \"auto\"")
            }

            fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<WorkerCount, E> {
                Ok(WorkerCount::Fixed(value))
            }

            fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<WorkerCount, E> {
                u64::try_from(value)
                    .map(WorkerCount::Fixed)
                    .map_err(|_| E::custom("worker count must be non-negative"))
            }

            fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<WorkerCount, E> {
                if value == "auto" {
                    Ok(WorkerCount::Auto)
                } else {
                    Err(E::custom(format!(
                        "expected \"auto\" or a number, got \"{value}\""
                    )))
                }
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// The two mutually exclusive shapes of a `return` directive.
///
/// `Redirect` sends the client to a URL (status optional, defaults to 302 on
/// the Nginx side); `Body` answers with a literal response body and always
/// carries a status. A `return` with both a `url` and a `text`, or neither,
/// matches no shape and fails deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum ReturnTarget {
    Redirect {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<u16>,
        url: String,
    },
    Body { code: u16, text: String },
}

impl ReturnTarget {
    /// Build a target from loose optional parts, e.g. values collected from a
    /// command line. Exactly one of `url`/`text` must be present, and `text`
    /// requires a status code.
    pub fn from_parts(
        code: Option<u16>,
        url: Option<String>,
        text: Option<String>,
    ) -> Result<Self, BlockError> {
        match (url, text) {
            (Some(url), None) => Ok(ReturnTarget::Redirect { code, url }),
            (None, Some(text)) => match code {
                Some(code) => Ok(ReturnTarget::Body { code, text }),
                None => Err(BlockError::MalformedBlock(
                    "return with a text body requires a status code".into(),
                )),
            },
            (Some(_), Some(_)) => Err(BlockError::MalformedBlock(
                "return cannot have both a url and a text body".into(),
            )),
            (None, None) => Err(BlockError::MalformedBlock(
                "return requires either a url or a text body".into(),
            )),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One Nginx directive instance, simple or container.
///
/// Field order within each variant is positional rendering order. See the
/// module docs for the serialization format and [`DIRECTIVES`] for each
/// variant's valid parent contexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// The implicit top level of an `nginx.conf`. Renders without braces.
    Main { children: Vec<Block> },
    Listen { values: Vec<String> },
    Server { children: Vec<Block> },
    AuthBasic { value: String },
    AuthBasicUserFile { file: String },
    Include { file: String },
    LoadModule { file: String },
    SslProtocols { protocols: Vec<SslProtocol> },
    SslPreferServerCiphers { enabled: bool },
    Gzip { enabled: bool },
    AccessLog { values: Vec<String> },
    ErrorLog {
        file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<LogLevel>,
    },
    SslSessionTimeout { time: String },
    /// Values are space-joined, e.g. `["shared:SSL:10m"]`.
    SslSessionCache { values: Vec<String> },
    SslSessionTickets { enabled: bool },
    SslStapling { enabled: bool },
    SslStaplingVerify { enabled: bool },
    /// Ciphers are `:`-joined, matching the OpenSSL cipher-list syntax.
    SslCiphers { ciphers: Vec<String> },
    SslEcdhCurve { curves: Vec<String> },
    SslDhparam { file: String },
    AddHeader {
        name: String,
        value: String,
        #[serde(default, skip_serializing_if = "is_false")]
        always: bool,
    },
    Http { children: Vec<Block> },
    Sendfile { enabled: bool },
    TcpNopush { enabled: bool },
    DefaultType { mime_type: String },
    TypesHashMaxSize { size: u64 },
    WorkerProcesses { count: WorkerCount },
    User {
        user: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group: Option<String>,
    },
    Pid { file: String },
    WorkerConnections { count: u64 },
    Events { children: Vec<Block> },
    Return(ReturnTarget),
    Location {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matcher: Option<LocationMatcher>,
        uri: String,
        children: Vec<Block>,
    },
    SslCertificate { file: String },
    SslCertificateKey { file: String },
    ProxySetHeader { name: String, value: String },
    ProxyPass { url: String },
}

/// Valid parent contexts per directive tag. `None` means the directive is
/// accepted anywhere (`include` is the only such directive). `main` has an
/// empty set: it is the top of the hierarchy and never a child.
///
/// Context sets follow the Nginx module documentation for each directive.
pub static DIRECTIVES: &[(&str, Option<&[Context]>)] = {
    use Context::*;
    &[
        ("main", Some(&[])),
        ("listen", Some(&[Server])),
        ("server", Some(&[Http])),
        ("auth_basic", Some(&[Http, Server, Location, LimitExcept])),
        ("auth_basic_user_file", Some(&[Http, Server, Location, LimitExcept])),
        ("include", None),
        ("load_module", Some(&[Main])),
        ("ssl_protocols", Some(&[Http, Server])),
        ("ssl_prefer_server_ciphers", Some(&[Http, Server])),
        ("gzip", Some(&[Http, Server, Location, LocationIf])),
        ("access_log", Some(&[Http, Server, Location, LocationIf, LimitExcept])),
        ("error_log", Some(&[Main, Http, Mail, Stream, Server, Location])),
        ("ssl_session_timeout", Some(&[Http, Server])),
        ("ssl_session_cache", Some(&[Http, Server])),
        ("ssl_session_tickets", Some(&[Http, Server])),
        ("ssl_stapling", Some(&[Http, Server])),
        ("ssl_stapling_verify", Some(&[Http, Server])),
        ("ssl_ciphers", Some(&[Http, Server])),
        ("ssl_ecdh_curve", Some(&[Http, Server])),
        ("ssl_dhparam", Some(&[Http, Server])),
        ("add_header", Some(&[Http, Server, Location, LocationIf])),
        ("http", Some(&[Main])),
        ("sendfile", Some(&[Http, Server, Location, LocationIf])),
        ("tcp_nopush", Some(&[Http, Server, Location])),
        ("default_type", Some(&[Http, Server, Location])),
        ("types_hash_max_size", Some(&[Http, Server, Location])),
        ("worker_processes", Some(&[Main])),
        ("user", Some(&[Main])),
        ("pid", Some(&[Main])),
        ("worker_connections", Some(&[Events])),
        ("events", Some(&[Main])),
        ("return", Some(&[Server, Location, If])),
        ("location", Some(&[Server, Location])),
        ("ssl_certificate", Some(&[Http, Server])),
        ("ssl_certificate_key", Some(&[Http, Server])),
        ("proxy_set_header", Some(&[Http, Server, Location])),
        ("proxy_pass", Some(&[Location, LocationIf, LimitExcept])),
    ]
};

/// Container context → tags permitted inside it, derived once by inverting
/// [`DIRECTIVES`].
static PERMITTED: LazyLock<BTreeMap<Context, BTreeSet<&'static str>>> = LazyLock::new(|| {
    Context::ALL
        .iter()
        .map(|&context| {
            let tags = DIRECTIVES
                .iter()
                .filter(|(_, contexts)| match contexts {
                    None => true,
                    Some(contexts) => contexts.contains(&context),
                })
                .map(|&(tag, _)| tag)
                .collect();
            (context, tags)
        })
        .collect()
});

/// Directive tags structurally valid inside the given context.
pub fn permitted_children(context: Context) -> &'static BTreeSet<&'static str> {
    &PERMITTED[&context]
}

impl Block {
    /// The directive name, as it appears in config text and JSON.
    pub fn tag(&self) -> &'static str {
        match self {
            Block::Main { .. } => "main",
            Block::Listen { .. } => "listen",
            Block::Server { .. } => "server",
            Block::AuthBasic { .. } => "auth_basic",
            Block::AuthBasicUserFile { .. } => "auth_basic_user_file",
            Block::Include { .. } => "include",
            Block::LoadModule { .. } => "load_module",
            Block::SslProtocols { .. } => "ssl_protocols",
            Block::SslPreferServerCiphers { .. } => "ssl_prefer_server_ciphers",
            Block::Gzip { .. } => "gzip",
            Block::AccessLog { .. } => "access_log",
            Block::ErrorLog { .. } => "error_log",
            Block::SslSessionTimeout { .. } => "ssl_session_timeout",
            Block::SslSessionCache { .. } => "ssl_session_cache",
            Block::SslSessionTickets { .. } => "ssl_session_tickets",
            Block::SslStapling { .. } => "ssl_stapling",
            Block::SslStaplingVerify { .. } => "ssl_stapling_verify",
            Block::SslCiphers { .. } => "ssl_ciphers",
            Block::SslEcdhCurve { .. } => "ssl_ecdh_curve",
            Block::SslDhparam { .. } => "ssl_dhparam",
            Block::AddHeader { .. } => "add_header",
            Block::Http { .. } => "http",
            Block::Sendfile { .. } => "sendfile",
            Block::TcpNopush { .. } => "tcp_nopush",
            Block::DefaultType { .. } => "default_type",
            Block::TypesHashMaxSize { .. } => "types_hash_max_size",
            Block::WorkerProcesses { .. } => "worker_processes",
            Block::User { .. } => "user",
            Block::Pid { .. } => "pid",
            Block::WorkerConnections { .. } => "worker_connections",
            Block::Events { .. } => "events",
            Block::Return(_) => "return",
            Block::Location { .. } => "location",
            Block::SslCertificate { .. } => "ssl_certificate",
            Block::SslCertificateKey { .. } => "ssl_certificate_key",
            Block::ProxySetHeader { .. } => "proxy_set_header",
            Block::ProxyPass { .. } => "proxy_pass",
        }
    }

    /// This directive's declared valid parents; `None` means any parent.
    pub fn context(&self) -> Option<&'static [Context]> {
        let tag = self.tag();
        DIRECTIVES
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, contexts)| *contexts)
            .unwrap_or(None)
    }

    /// The context this block provides to its children, for containers.
    pub fn container_context(&self) -> Option<Context> {
        match self {
            Block::Main { .. } => Some(Context::Main),
            Block::Http { .. } => Some(Context::Http),
            Block::Server { .. } => Some(Context::Server),
            Block::Events { .. } => Some(Context::Events),
            Block::Location { .. } => Some(Context::Location),
            _ => None,
        }
    }

    /// Child blocks, for containers.
    pub fn children(&self) -> Option<&[Block]> {
        match self {
            Block::Main { children }
            | Block::Http { children }
            | Block::Server { children }
            | Block::Events { children }
            | Block::Location { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Validate this block's subtree against the containment table.
    ///
    /// The block itself is assumed to be in a legal position; only its
    /// descendants are checked.
    pub fn validate(&self) -> Result<(), BlockError> {
        if let (Some(context), Some(children)) = (self.container_context(), self.children()) {
            validate_blocks(children, context)?;
        }
        Ok(())
    }
}

/// Validate an ordered block sequence as children of `parent`, recursively.
///
/// Fails with [`BlockError::ContextViolation`] on the first directive whose
/// context set excludes its actual parent. Must pass before a tree is handed
/// to the renderer.
pub fn validate_blocks(blocks: &[Block], parent: Context) -> Result<(), BlockError> {
    for block in blocks {
        if !permitted_children(parent).contains(block.tag()) {
            return Err(BlockError::ContextViolation {
                child: block.tag(),
                parent: parent.name(),
            });
        }
        block.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_table_is_complete_and_unique() {
        let tags: BTreeSet<&str> = DIRECTIVES.iter().map(|&(tag, _)| tag).collect();
        assert_eq!(tags.len(), DIRECTIVES.len(), "duplicate tag in DIRECTIVES");
        assert_eq!(DIRECTIVES.len(), 37);
    }

    /// X is permitted under C if and only if C is in X's context set
    /// (or X has no context set).
    #[test]
    fn containment_law_matches_declared_contexts() {
        for &context in &Context::ALL {
            let permitted = permitted_children(context);
            for &(tag, contexts) in DIRECTIVES {
                let expected = match contexts {
                    None => true,
                    Some(contexts) => contexts.contains(&context),
                };
                assert_eq!(
                    permitted.contains(tag),
                    expected,
                    "tag '{tag}' under context '{}'",
                    context.name()
                );
            }
        }
    }

    #[test]
    fn include_is_valid_everywhere() {
        for &context in &Context::ALL {
            assert!(permitted_children(context).contains("include"));
        }
    }

    #[test]
    fn main_is_never_a_child() {
        for &context in &Context::ALL {
            assert!(!permitted_children(context).contains("main"));
        }
    }

    #[test]
    fn events_permits_worker_connections_only_plus_include() {
        let permitted = permitted_children(Context::Events);
        assert_eq!(
            permitted.iter().copied().collect::<Vec<_>>(),
            vec!["include", "worker_connections"]
        );
    }

    #[test]
    fn valid_tree_passes() {
        let server = Block::Server {
            children: vec![
                Block::Listen {
                    values: vec!["443".into(), "ssl".into()],
                },
                Block::Location {
                    matcher: None,
                    uri: "/".into(),
                    children: vec![Block::ProxyPass {
                        url: "http://localhost:3000".into(),
                    }],
                },
            ],
        };
        validate_blocks(std::slice::from_ref(&server), Context::Http).unwrap();
    }

    #[test]
    fn session_timeout_rejected_inside_location() {
        let location = Block::Location {
            matcher: None,
            uri: "/".into(),
            children: vec![Block::SslSessionTimeout { time: "4m".into() }],
        };
        let err = location.validate().unwrap_err();
        assert_eq!(
            err,
            BlockError::ContextViolation {
                child: "ssl_session_timeout",
                parent: "location",
            }
        );
    }

    #[test]
    fn violation_is_reported_for_deep_nesting() {
        let tree = Block::Http {
            children: vec![Block::Server {
                children: vec![Block::Location {
                    matcher: None,
                    uri: "/api".into(),
                    // worker_connections only belongs in events
                    children: vec![Block::WorkerConnections { count: 768 }],
                }],
            }],
        };
        let err = tree.validate().unwrap_err();
        assert_eq!(
            err,
            BlockError::ContextViolation {
                child: "worker_connections",
                parent: "location",
            }
        );
    }

    #[test]
    fn listen_rejected_directly_under_http() {
        let err = validate_blocks(
            &[Block::Listen {
                values: vec!["80".into()],
            }],
            Context::Http,
        )
        .unwrap_err();
        assert_eq!(
            err,
            BlockError::ContextViolation {
                child: "listen",
                parent: "http",
            }
        );
    }

    #[test]
    fn block_json_round_trip() {
        let block = Block::Server {
            children: vec![
                Block::Listen {
                    values: vec!["80".into()],
                },
                Block::Return(ReturnTarget::Redirect {
                    code: Some(301),
                    url: "https://$host$request_uri".into(),
                }),
            ],
        };
        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn block_deserializes_from_tagged_json() {
        let block: Block = serde_json::from_str(
            r#"{"type": "add_header", "name": "X-Frame-Options", "value": "DENY"}"#,
        )
        .unwrap();
        assert_eq!(
            block,
            Block::AddHeader {
                name: "X-Frame-Options".into(),
                value: "DENY".into(),
                always: false,
            }
        );
    }

    #[test]
    fn return_redirect_shape_deserializes() {
        let block: Block =
            serde_json::from_str(r#"{"type": "return", "code": 301, "url": "https://a"}"#).unwrap();
        assert_eq!(
            block,
            Block::Return(ReturnTarget::Redirect {
                code: Some(301),
                url: "https://a".into(),
            })
        );
    }

    #[test]
    fn return_body_shape_deserializes() {
        let block: Block =
            serde_json::from_str(r#"{"type": "return", "code": 200, "text": "ok"}"#).unwrap();
        assert_eq!(
            block,
            Block::Return(ReturnTarget::Body {
                code: 200,
                text: "ok".into(),
            })
        );
    }

    #[test]
    fn return_with_both_targets_is_rejected() {
        let result: Result<Block, _> =
            serde_json::from_str(r#"{"type": "return", "code": 301, "url": "https://a", "text": "ok"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn return_with_no_target_is_rejected() {
        let result: Result<Block, _> = serde_json::from_str(r#"{"type": "return", "code": 301}"#);
        assert!(result.is_err());
    }

    #[test]
    fn return_from_parts_rules() {
        assert_eq!(
            ReturnTarget::from_parts(None, Some("https://a".into()), None).unwrap(),
            ReturnTarget::Redirect {
                code: None,
                url: "https://a".into(),
            }
        );
        assert_eq!(
            ReturnTarget::from_parts(Some(200), None, Some("ok".into())).unwrap(),
            ReturnTarget::Body {
                code: 200,
                text: "ok".into(),
            }
        );
        // text without a code, both targets, and no target are all malformed
        assert!(ReturnTarget::from_parts(None, None, Some("ok".into())).is_err());
        assert!(ReturnTarget::from_parts(Some(301), Some("https://a".into()), Some("ok".into())).is_err());
        assert!(ReturnTarget::from_parts(Some(301), None, None).is_err());
    }

    #[test]
    fn worker_count_serde() {
        let auto: WorkerCount = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(auto, WorkerCount::Auto);
        let fixed: WorkerCount = serde_json::from_str("4").unwrap();
        assert_eq!(fixed, WorkerCount::Fixed(4));
        assert_eq!(serde_json::to_string(&WorkerCount::Auto).unwrap(), "\"auto\"");
        assert_eq!(serde_json::to_string(&WorkerCount::Fixed(4)).unwrap(), "4");
        assert!(serde_json::from_str::<WorkerCount>("\"many\"").is_err());
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&Block::User {
            user: "www-data".into(),
            group: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"user","user":"www-data"}"#);

        let json = serde_json::to_string(&Block::AddHeader {
            name: "X".into(),
            value: "y".into(),
            always: false,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"add_header","name":"X","value":"y"}"#);
    }
}
