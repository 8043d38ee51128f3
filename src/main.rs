use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use almi::{
    commands::{self, OutputFormat},
    config::Config,
    poll::{DEFAULT_DELAY_MS, DEFAULT_MAX_ATTEMPTS, PollPolicy},
    runtime::RealRuntime,
};

/// almi - ALM integration client
///
/// Bind code hosting organizations and provision projects through the
/// ALM integration web services.
///
/// If the ALM_TOKEN environment variable is set, it is sent as a bearer token.
///
/// Examples:
///   almi organization 9001            # Show the organization of installation 9001
///   almi provision acme acme/api|1    # Provision a project from a repository
#[derive(Parser, Debug)]
#[command(author, version = env!("ALMI_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server URL (defaults to http://localhost:9000; also via ALM_SERVER_URL)
    #[arg(long = "server-url", env = "ALM_SERVER_URL", value_name = "URL", global = true)]
    pub server_url: Option<String>,

    /// Number of lookups while waiting for an organization to appear
    #[arg(
        long = "max-attempts",
        env = "ALM_POLL_ATTEMPTS",
        value_name = "N",
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..),
        global = true
    )]
    pub max_attempts: u32,

    /// Delay between two lookups, in milliseconds
    #[arg(
        long = "poll-delay-ms",
        env = "ALM_POLL_DELAY_MS",
        value_name = "MS",
        default_value_t = DEFAULT_DELAY_MS,
        global = true
    )]
    pub poll_delay_ms: u64,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Bind an ALM installation to an organization
    Bind(BindArgs),

    /// Show the ALM application the server is registered as
    AppInfo,

    /// Show the ALM organization of an installation, waiting for it to appear
    Organization(OrganizationArgs),

    /// List the repositories of an organization
    Repos(ReposArgs),

    /// List ALM installations not bound to any organization
    UnboundApps,

    /// Provision projects from repositories
    Provision(ProvisionArgs),
}

#[derive(clap::Args, Debug)]
pub struct BindArgs {
    #[arg(value_name = "INSTALLATION_ID")]
    pub installation_id: String,

    #[arg(value_name = "ORGANIZATION")]
    pub organization: String,
}

#[derive(clap::Args, Debug)]
pub struct OrganizationArgs {
    #[arg(value_name = "INSTALLATION_ID")]
    pub installation_id: String,
}

#[derive(clap::Args, Debug)]
pub struct ReposArgs {
    #[arg(value_name = "ORGANIZATION")]
    pub organization: String,
}

#[derive(clap::Args, Debug)]
pub struct ProvisionArgs {
    #[arg(value_name = "ORGANIZATION")]
    pub organization: String,

    /// Installation keys of the repositories to provision
    #[arg(value_name = "KEY", required = true)]
    pub installation_keys: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let policy = PollPolicy::new(cli.max_attempts, Duration::from_millis(cli.poll_delay_ms))?;
    let config = Config::new(&RealRuntime, cli.server_url, policy)?;
    let api = &config.alm;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let output = match cli.command {
        Commands::Bind(args) => {
            commands::bind(api, &args.installation_id, &args.organization).await?
        }
        Commands::AppInfo => commands::app_info(api, format).await?,
        Commands::Organization(args) => {
            commands::organization(api, &args.installation_id, format).await?
        }
        Commands::Repos(args) => commands::repositories(api, &args.organization, format).await?,
        Commands::UnboundApps => commands::unbound_applications(api, format).await?,
        Commands::Provision(args) => {
            commands::provision(api, &args.organization, &args.installation_keys, format).await?
        }
    };

    println!("{}", output);
    Ok(())
}
