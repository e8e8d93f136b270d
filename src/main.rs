use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::BufReader;
use tokio::sync::RwLock;

use chess_onboard::auth::{AuthActions, HttpAuthClient};
use chess_onboard::cli::{self, Prompter, SignupEnd, StderrNotifier};
use chess_onboard::config::{ClientConfig, ServerConfig};
use chess_onboard::devserver;
use chess_onboard::store::{AppStore, ThemeMode};
use chess_onboard::wizard::{WizardController, WizardVariant};

#[derive(Debug, Parser)]
#[command(name = "chess-onboard")]
#[command(version)]
#[command(about = "Sign up, log in and manage the session for the chess coaching platform")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Base URL of the auth API (overrides CHESS_ONBOARD_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path of the persisted client store (overrides CHESS_ONBOARD_STORE_PATH).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Create an account with the player or coach wizard")]
    Signup {
        #[arg(value_enum)]
        role: SignupRole,
    },
    #[command(about = "Log in with email and password")]
    Login,
    #[command(about = "End the current session")]
    Logout,
    #[command(about = "Show the signed-in user")]
    Whoami,
    #[command(about = "Run the in-memory auth API for local development")]
    Serve {
        /// Address to bind (overrides CHESS_ONBOARD_BIND).
        #[arg(long)]
        bind: Option<std::net::SocketAddr>,
    },
    #[command(about = "Set the persisted theme mode")]
    Theme {
        #[arg(value_enum)]
        mode: ThemeArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SignupRole {
    Player,
    Coach,
}

impl From<SignupRole> for WizardVariant {
    fn from(role: SignupRole) -> Self {
        match role {
            SignupRole::Player => WizardVariant::Player,
            SignupRole::Coach => WizardVariant::Coach,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for ThemeMode {
    fn from(mode: ThemeArg) -> Self {
        match mode {
            ThemeArg::Light => ThemeMode::Light,
            ThemeArg::Dark => ThemeMode::Dark,
            ThemeArg::System => ThemeMode::System,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the prompts.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match args.command {
        Command::Serve { bind } => {
            let mut config = ServerConfig::from_env()?;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            eprintln!("♟ chess-onboard auth dev server v{}", env!("CARGO_PKG_VERSION"));
            eprintln!("   API: http://{}/api/auth", config.bind_addr);
            devserver::serve(&config).await?;
        }
        Command::Signup { role } => {
            let (actions, mut prompter) = connect(args.api_url, args.store).await?;
            let mut wizard = WizardController::new(role.into());
            match cli::run_signup(&mut prompter, &mut wizard, &actions).await? {
                SignupEnd::Registered(_) => {}
                SignupEnd::Quit => eprintln!("Signup abandoned; nothing was saved."),
            }
        }
        Command::Login => {
            let (actions, mut prompter) = connect(args.api_url, args.store).await?;
            cli::run_login(&mut prompter, &actions).await?;
        }
        Command::Logout => {
            let (actions, mut prompter) = connect(args.api_url, args.store).await?;
            cli::run_logout(&mut prompter, &actions).await?;
        }
        Command::Whoami => {
            let (actions, mut prompter) = connect(args.api_url, args.store).await?;
            cli::run_whoami(&mut prompter, &actions).await?;
        }
        Command::Theme { mode } => {
            let (actions, mut prompter) = connect(args.api_url, args.store).await?;
            let mode = ThemeMode::from(mode);
            actions
                .store()
                .write()
                .await
                .update(|s| s.theme.set_mode(mode))
                .await
                .context("failed to save theme")?;
            prompter.say(format!("Theme set to {mode:?}."))?;
        }
    }

    Ok(())
}

type StdioPrompter = Prompter<BufReader<tokio::io::Stdin>, std::io::Stdout>;

/// Resolve client config, load the store and wire the auth actions.
async fn connect(
    api_url: Option<String>,
    store_path: Option<PathBuf>,
) -> anyhow::Result<(AuthActions, StdioPrompter)> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = api_url {
        url::Url::parse(&url).with_context(|| format!("invalid --api-url {url:?}"))?;
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(path) = store_path {
        config.store_path = path;
    }
    tracing::debug!(api = %config.api_base_url, store = %config.store_path.display(), "Client configured");

    let store = AppStore::load(&config.store_path).await;
    let api = HttpAuthClient::new(&config)?;
    let actions = AuthActions::new(
        Arc::new(api),
        Arc::new(RwLock::new(store)),
        Arc::new(StderrNotifier),
    );
    let prompter = Prompter::new(BufReader::new(tokio::io::stdin()), std::io::stdout());
    Ok((actions, prompter))
}
