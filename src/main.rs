use clap::{Parser, Subcommand};
use nginx_sites::blocks::Block;
use nginx_sites::https::HttpsSite;
use nginx_sites::site::NginxSite;
use nginx_sites::{config, https, output, render, site};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "nginx-sites")]
#[command(about = "Typed Nginx site config generation and management")]
#[command(long_about = "\
Typed Nginx site config generation and management

Site configs are JSON documents of typed directive blocks. Each block is
checked against Nginx's containment rules (listen belongs in server,
worker_connections in events, ...) before any text is rendered or written.

Site definition format:

  {
    \"name\": \"my-site\",
    \"enabled\": true,
    \"config\": [
      {\"type\": \"server\", \"children\": [
        {\"type\": \"listen\", \"values\": [\"80\"]},
        {\"type\": \"location\", \"uri\": \"/\", \"children\": [
          {\"type\": \"proxy_pass\", \"url\": \"http://localhost:3000\"}
        ]}
      ]}
    ]
  }

Layout under the nginx directory (default /etc/nginx):

  sites-available/<name>          rendered config, written by create/https
  sites-enabled/<name>            symlink, toggled by enable/disable

Writing to the real /etc/nginx needs root, and Nginx picks up changes only
after a reload (systemctl reload nginx).

Run 'nginx-sites gen-config' to generate a documented nginx-sites.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Nginx directory (overrides the config file)
    #[arg(long, global = true)]
    nginx_dir: Option<PathBuf>,

    /// Tool config file
    #[arg(long, default_value = "nginx-sites.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a site definition and print its rendered config
    Render {
        /// Site definition JSON file
        site: PathBuf,
    },
    /// Create a site in sites-available from a site definition
    Create {
        /// Site definition JSON file
        site: PathBuf,
        /// Enable the site even if the definition says otherwise
        #[arg(long)]
        enable: bool,
    },
    /// Create an HTTPS site with a self-signed certificate
    Https(HttpsArgs),
    /// Enable a site (symlink it into sites-enabled)
    Enable { name: String },
    /// Disable a site (remove its sites-enabled symlink)
    Disable { name: String },
    /// List sites-available entries and their enabled status
    List,
    /// Print a stock nginx-sites.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct HttpsArgs {
    /// Site name
    #[arg(long)]
    name: String,

    /// Backend URL to proxy / to, e.g. http://localhost:3000
    #[arg(long)]
    upstream: String,

    /// Enable the site after creating it
    #[arg(long)]
    enable: bool,

    /// Certificate validity in days
    #[arg(long)]
    days: Option<u32>,

    /// Certificate CN: the site's fully qualified domain name
    #[arg(long)]
    hostname: Option<String>,

    /// Certificate 2-letter country code
    #[arg(long)]
    country: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let tool = config::load_optional(&cli.config)?;
    let nginx_dir = cli.nginx_dir.unwrap_or(tool.nginx_dir.clone());

    match cli.command {
        Command::Render { site } => {
            let definition = read_site_definition(&site)?;
            nginx_sites::blocks::validate_blocks(
                &definition.config,
                nginx_sites::blocks::Context::Http,
            )?;
            println!("{}", render::render_blocks(&definition.config, 0));
        }
        Command::Create { site, enable } => {
            let mut definition = read_site_definition(&site)?;
            if enable {
                definition.enabled = true;
            }
            let created = site::create_site(&definition, &nginx_dir)?;
            print_lines(&output::format_created_site(&definition.name, &created));
        }
        Command::Https(args) => {
            let mut cert_params = tool.cert.clone();
            if args.days.is_some() {
                cert_params.days = args.days;
            }
            if args.hostname.is_some() {
                cert_params.website_hostname = args.hostname;
            }
            if args.country.is_some() {
                cert_params.country_code = args.country;
            }

            let https_site = HttpsSite {
                name: args.name.clone(),
                enabled: args.enable,
                locations: vec![Block::Location {
                    matcher: None,
                    uri: "/".into(),
                    children: vec![Block::ProxyPass {
                        url: args.upstream,
                    }],
                }],
            };
            let created = https::create_https_site(&https_site, &cert_params, &nginx_dir)?;
            print_lines(&output::format_cert_paths(&created.certs));
            print_lines(&output::format_created_site(&args.name, &created.site));
        }
        Command::Enable { name } => {
            let link = site::enable_site(&name, &nginx_dir)?;
            println!("Enabled {name}");
            println!("    Link: {}", link.display());
        }
        Command::Disable { name } => {
            if site::disable_site(&name, &nginx_dir)? {
                println!("Disabled {name}");
            } else {
                println!("{name} was not enabled");
            }
        }
        Command::List => {
            let sites = site::list_sites(&nginx_dir)?;
            print_lines(&output::format_site_list(&sites));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn read_site_definition(path: &std::path::Path) -> Result<NginxSite, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let definition: NginxSite = serde_json::from_str(&content)?;
    Ok(definition)
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
