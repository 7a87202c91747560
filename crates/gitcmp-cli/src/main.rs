//! gitcmp - compare the refs of two remote git repositories.

use clap::Parser;
use gitcmp_remote::{FetchConfig, RefFetcher};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;

/// Exit code when the repositories advertise different refs, or a fetch fails.
const EXIT_DIFFERENT: i32 = 1;

/// Compare the branches and tags of two remote git repositories
#[derive(Parser, Debug)]
#[command(name = "gitcmp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// First repository URL
    repo1: String,

    /// Second repository URL
    repo2: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = report::Format::Text)]
    format: report::Format,

    /// Whole-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Connect timeout in seconds
    #[arg(long)]
    connect_timeout: Option<u64>,

    /// User-Agent header to send
    #[arg(long)]
    user_agent: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::default();
        if let Some(secs) = self.timeout {
            config = config.with_timeout(secs);
        }
        if let Some(secs) = self.connect_timeout {
            config = config.with_connect_timeout(secs);
        }
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        config
    }
}

/// Runs the comparison, returning whether the repositories matched.
async fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = cli.fetch_config();
    tracing::debug!(?config, "Fetch configuration");

    let fetcher = RefFetcher::new(&config)?;
    let diff = fetcher.compare(&cli.repo1, &cli.repo2).await?;

    let mut stdout = std::io::stdout().lock();
    report::write(&mut stdout, cli.format, &cli.repo1, &cli.repo2, &diff)?;

    Ok(diff.is_identical())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!("gitcmp={log_level},gitcmp_git={log_level},gitcmp_remote={log_level}")
                        .into()
                }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_DIFFERENT),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(EXIT_DIFFERENT);
        }
    }
}
