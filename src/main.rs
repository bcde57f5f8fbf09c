use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use pssh::connection::{self, CommandTemplate};
use pssh::event::{AppEvent, EventHandler};
use pssh::ssh_config::source;
use pssh::{Action, App, Host, HostSet, handler, tui, ui};

#[derive(Parser)]
#[command(
    name = "pssh",
    about = "pssh is a TUI ssh manager",
    long_about = "Fuzzy-search the hosts in your SSH config and connect to one.\n\
                  Reads /etc/ssh/ssh_config, ~/.ssh/config and --ssh-config,\n\
                  follows Include directives and merges hosts sharing a HostName.",
    version
)]
struct Cli {
    /// Start with this search query
    #[arg(value_name = "QUERY")]
    query: Option<String>,

    /// Path to SSH config file
    #[arg(long, default_value = source::USER_CONFIG)]
    ssh_config: String,

    /// Loop until SSH connection successfully connects
    #[arg(long = "loop")]
    retry: bool,

    /// Command to run for the selected host ({name}, {user}, {hostname}, {port}, ...)
    #[arg(long, default_value = connection::DEFAULT_TEMPLATE)]
    command: String,

    /// List all configured hosts and exit
    #[arg(short, long)]
    list: bool,

    /// With --list, print JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    #[command(subcommand)]
    subcommand: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the version
    Version,
}

/// Log to stderr, filtered by PSSH_LOG (default: warn).
fn init_logging() {
    let filter = EnvFilter::try_from_env("PSSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    init_logging();
    ui::theme::init();
    let cli = Cli::parse();

    // Shell completions (no config file needed)
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "pssh", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(Commands::Version) = cli.subcommand {
        println!("pssh version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let home = pssh::home_dir()?;
    let paths = source::default_paths(&cli.ssh_config, &home);
    let hosts = HostSet::load(&paths, &home).context("an error occurred while loading ssh config")?;
    tracing::info!(hosts = hosts.len(), "host list ready");

    if cli.list {
        return print_hosts(&hosts, cli.json);
    }

    let app = match cli.query.as_deref() {
        Some(query) => App::with_query(hosts.hosts(), query),
        None => App::new(hosts.hosts()),
    };
    let Some(selected) = run_tui(app)? else {
        return Ok(());
    };

    let template = CommandTemplate::new(cli.command);
    let status = connection::connect(&hosts, &selected, &template, cli.retry)?;
    if !status.success() {
        std::process::exit(status.code().unwrap_or(1));
    }
    Ok(())
}

/// Drive the selection until it commits or is cancelled.
fn run_tui(mut app: App<'_>) -> Result<Option<Host>> {
    let mut terminal = tui::Tui::enter()?;
    let mut events = EventHandler::new(250);

    while !app.is_finished() {
        terminal.draw(&app)?;

        let action = match events.next()? {
            AppEvent::Key(key) => handler::action_for_key(key),
            AppEvent::Resize(w, h) => Some(Action::Resize(w, h)),
            AppEvent::Tick => None,
        };
        if let Some(action) = action {
            app = app.update(action);
        }
    }

    // The child command must own the tty once the picker is gone
    events.stop();
    terminal.exit()?;
    Ok(app.into_selection())
}

fn print_hosts(hosts: &HostSet, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(hosts.hosts())?);
        return Ok(());
    }
    if hosts.is_empty() {
        println!("No hosts found in your SSH config.");
        return Ok(());
    }
    for host in hosts.hosts() {
        let user = if host.user.is_empty() {
            String::new()
        } else {
            format!("{}@", host.user)
        };
        let port = if host.port.is_empty() {
            String::new()
        } else {
            format!(":{}", host.port)
        };
        let line = format!(
            "{:<20} {}{}{} {}",
            host.name, user, host.hostname, port, host.aliases
        );
        println!("{}", line.trim_end());
    }
    Ok(())
}
