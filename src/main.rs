use anyhow::Result;
use changelogger::{
    commands,
    config::{Config, DEFAULT_MIRROR_URL, DEFAULT_NPM_COMMAND, DEFAULT_RAW_URL, DEFAULT_WEB_URL},
    http::HttpClient,
    registry::NpmRegistry,
    resolver::ChangelogResolver,
};
use clap::Parser;
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

/// changelogger - find CHANGELOG.md URLs for npm packages
///
/// Tries, in order: the unpkg.com copy of the published package, the GitHub
/// repository behind the package's bug tracker, the repository reported by
/// `npm repo`, and finally a GitHub compare view between the installed and
/// latest versions.
///
/// Examples:
///   changelogger react
///   changelogger -v @babel/core lodash
#[derive(Parser, Debug)]
#[command(author, version = env!("CHANGELOGGER_VERSION"), about)]
struct Cli {
    /// One or more npm package names
    #[arg(value_name = "PACKAGE", required = true)]
    packages: Vec<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    verbose: bool,

    /// npm executable used for registry lookups
    #[arg(
        long,
        env = "CHANGELOGGER_NPM",
        value_name = "PATH",
        default_value = DEFAULT_NPM_COMMAND
    )]
    npm: PathBuf,

    /// Timeout in seconds for each URL check
    #[arg(
        long,
        env = "CHANGELOGGER_TIMEOUT",
        value_name = "SECONDS",
        default_value_t = 10
    )]
    timeout: u64,

    /// Base URL of the package CDN mirror
    #[arg(
        long,
        env = "CHANGELOGGER_MIRROR_URL",
        value_name = "URL",
        default_value = DEFAULT_MIRROR_URL,
        hide = true
    )]
    mirror_url: String,

    /// Base URL for raw repository contents
    #[arg(
        long,
        env = "CHANGELOGGER_RAW_URL",
        value_name = "URL",
        default_value = DEFAULT_RAW_URL,
        hide = true
    )]
    raw_url: String,

    /// Base URL of the GitHub web UI
    #[arg(
        long,
        env = "CHANGELOGGER_WEB_URL",
        value_name = "URL",
        default_value = DEFAULT_WEB_URL,
        hide = true
    )]
    web_url: String,
}

impl Cli {
    fn config(&self) -> Config {
        Config::default()
            .with_mirror_url(&self.mirror_url)
            .with_raw_url(&self.raw_url)
            .with_web_url(&self.web_url)
            .with_http_timeout(Duration::from_secs(self.timeout))
            .with_npm(&self.npm)
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "warn,changelogger=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config();
    let prober = HttpClient::with_timeout(config.http_timeout)?;
    let registry = NpmRegistry::from_config(&config);
    let resolver = ChangelogResolver::new(prober, registry, config);

    let summary = commands::run(
        &resolver,
        &cli.packages,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await?;

    debug!(
        "Resolved {} of {} package(s)",
        summary.found,
        cli.packages.len()
    );
    if !summary.not_found.is_empty() {
        debug!("Not found: {}", summary.not_found.join(", "));
    }

    Ok(())
}
