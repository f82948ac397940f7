use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use lens_query::config::{find_config_file, get_config, load_config, Config};
use lens_query::fetch::{HttpFetcher, PageFetcher};
use lens_query::models::{
    BooleanOp, DateRange, FieldScope, Jurisdiction, NameFilter, Ranking, SearchRequest,
};
use lens_query::QueryUrlBuilder;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// lens-query - Build (and optionally fetch) Lens patent search URLs
#[derive(Parser, Debug)]
#[command(name = "lens-query")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build search URLs for the Lens patent search interface", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show all environment variables
    #[arg(long)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the search URL(s) for a request
    #[command(alias = "u")]
    Urls {
        #[command(flatten)]
        request: RequestArgs,

        /// Print a JSON array instead of one URL per line
        #[arg(long)]
        json: bool,
    },

    /// Fetch every results page and save the raw HTML
    #[command(alias = "f")]
    Fetch {
        #[command(flatten)]
        request: RequestArgs,

        /// Directory the pages are written to
        #[arg(long, short, default_value = "./pages")]
        out: PathBuf,

        /// Seconds to wait between page requests (overrides the config file)
        #[arg(long)]
        delay: Option<u64>,
    },

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a configuration file with default values
    Init {
        /// Where to write the file
        #[arg(default_value = "lens-query.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// Search options, given as flags or as a JSON/TOML request file
#[derive(Args, Debug)]
struct RequestArgs {
    /// Read the request from a JSON or TOML file instead of flags
    #[arg(long, conflicts_with = "query")]
    request: Option<PathBuf>,

    /// Search term (repeat for several terms)
    #[arg(long, short = 'Q')]
    query: Vec<String>,

    /// Operator joining several terms (OR, AND)
    #[arg(long)]
    boolean: Option<BooleanOp>,

    /// Field scope (fulltext, title, abstract, claims, tac)
    #[arg(long = "type", value_name = "FIELD")]
    field: Option<FieldScope>,

    /// Applicant name (repeat for several names)
    #[arg(long)]
    applicant: Vec<String>,

    /// Operator joining several applicants
    #[arg(long)]
    applicant_boolean: Option<BooleanOp>,

    /// Inventor name (repeat for several names)
    #[arg(long)]
    inventor: Vec<String>,

    /// Operator joining several inventors
    #[arg(long)]
    inventor_boolean: Option<BooleanOp>,

    /// Earliest publication date (YYYYMMDD)
    #[arg(long)]
    publn_date_start: Option<u32>,

    /// Latest publication date (YYYYMMDD)
    #[arg(long)]
    publn_date_end: Option<u32>,

    /// Earliest filing date (YYYYMMDD)
    #[arg(long)]
    filing_date_start: Option<u32>,

    /// Latest filing date (YYYYMMDD)
    #[arg(long)]
    filing_date_end: Option<u32>,

    /// Ranking (citing, family, sequences, latest_publn, earliest_publn, latest_filing, earliest_filing)
    #[arg(long)]
    rank: Option<Ranking>,

    /// Two-letter jurisdiction code, or the group "main" or "ops"
    #[arg(long)]
    jurisdiction: Option<Jurisdiction>,

    /// One publication per family
    #[arg(long)]
    families: bool,

    /// Let the service apply stemming
    #[arg(long)]
    stemming: bool,

    /// Number of results wanted (up to 500)
    #[arg(long)]
    results: Option<u32>,
}

impl RequestArgs {
    fn into_request(self) -> Result<SearchRequest> {
        if let Some(path) = &self.request {
            return read_request_file(path);
        }

        if self.query.is_empty() {
            bail!("At least one --query (or a --request file) is required");
        }

        Ok(SearchRequest {
            query: self.query,
            boolean: self.boolean,
            field: self.field.unwrap_or_default(),
            applicant: name_filter(self.applicant, self.applicant_boolean),
            inventor: name_filter(self.inventor, self.inventor_boolean),
            publication_date: DateRange::new(self.publn_date_start, self.publn_date_end),
            filing_date: DateRange::new(self.filing_date_start, self.filing_date_end),
            ranking: self.rank,
            jurisdiction: self.jurisdiction,
            families: self.families,
            stemming: self.stemming,
            results: self.results,
        })
    }
}

fn name_filter(names: Vec<String>, boolean: Option<BooleanOp>) -> Option<NameFilter> {
    if names.is_empty() {
        None
    } else {
        Some(NameFilter { names, boolean })
    }
}

fn read_request_file(path: &Path) -> Result<SearchRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", path.display()))?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let request = if is_toml {
        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML request in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON request in {}", path.display()))?
    };

    Ok(request)
}

fn print_env_vars() {
    println!("lens-query Environment Variables");
    println!("================================");
    println!();
    println!("Builder Settings:");
    println!("  LENS_QUERY_BUILDER__SEARCH_BASE     Base path for single-page searches");
    println!("  LENS_QUERY_BUILDER__PAGED_BASE      Base path for paginated searches");
    println!("  LENS_QUERY_BUILDER__PAGE_SIZE       Results per page (default: 50)");
    println!("  LENS_QUERY_BUILDER__MAX_RESULTS     Maximum retrievable results (default: 500)");
    println!();
    println!("Fetch Settings:");
    println!("  LENS_QUERY_FETCH__REQUEST_DELAY_SECS  Seconds between page requests (default: 20)");
    println!("  LENS_QUERY_FETCH__TIMEOUT_SECS        Request timeout in seconds (default: 30)");
    println!("  LENS_QUERY_FETCH__USER_AGENT          User agent override");
    println!();
    println!("Logging Settings:");
    println!("  LENS_QUERY_LOGGING__LEVEL             Default log level (default: info)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging filter, overrides -v/-q and the configured level");
    std::process::exit(0);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
    }

    let config_file = cli.config.clone().or_else(find_config_file);
    let config = match &config_file {
        Some(config_path) => load_config(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?,
        None => get_config()?,
    };

    let directive = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| config.logging.directive(cli.verbose, cli.quiet));

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(directive))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(config_path) = &config_file {
        tracing::info!("Using config file: {}", config_path.display());
    }

    let builder = QueryUrlBuilder::new(config.builder.clone());

    match cli.command {
        Some(Commands::Urls { request, json }) => {
            let request = request.into_request()?;
            let urls = builder.build(&request)?;

            if json {
                println!("{}", serde_json::to_string_pretty(urls.urls())?);
            } else {
                for url in urls.urls() {
                    println!("{}", url);
                }
            }
        }

        Some(Commands::Fetch {
            request,
            out,
            delay,
        }) => {
            let request = request.into_request()?;
            let urls = builder.build(&request)?;

            let delay = delay
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.fetch.request_delay());
            let fetcher = HttpFetcher::from_config(&config.fetch)?;
            let pages = fetcher.fetch_all(&urls, delay).await?;

            tokio::fs::create_dir_all(&out)
                .await
                .with_context(|| format!("Failed to create {}", out.display()))?;
            for (index, page) in pages.iter().enumerate() {
                let path = out.join(format!("page-{}.html", index));
                tokio::fs::write(&path, page)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }

            if !cli.quiet {
                eprintln!("Saved {} page(s) to {}", pages.len(), out.display());
            }
        }

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { path, force } => {
                if path.exists() && !force {
                    bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                Config::default().save(&path)?;
                if !cli.quiet {
                    eprintln!("Wrote default configuration to {}", path.display());
                }
            }
            ConfigAction::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        },

        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
