mod logging;
mod serve;

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use gsi_shot_core::{ensure_screenshot_dir, CaptureOutcome, Config, ScreenshotAction};
use tracing::{error, info};

/// Environment variable naming the config file when `--config` is absent.
const CONFIG_ENV: &str = "GSI_SHOT_CONFIG";

/// Dota 2 game state listener that screenshots the desktop when strategy time begins.
#[derive(Parser)]
#[command(
    name = "gsi-shot",
    version,
    about = "Dota 2 game state listener that screenshots the desktop when strategy time begins"
)]
struct Cli {
    /// Path to a TOML config file (falls back to $GSI_SHOT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Command-line values that take precedence over the config file.
#[derive(Args)]
struct Overrides {
    /// Port to listen on
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Address to bind
    #[arg(long, global = true)]
    bind: Option<IpAddr>,
    /// Directory that holds the screenshot
    #[arg(long, global = true)]
    screenshot_dir: Option<PathBuf>,
    /// Rebroadcast in-game snapshots to overlay clients on /ws
    #[arg(long, global = true)]
    overlay: bool,
}

impl Overrides {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(dir) = &self.screenshot_dir {
            config.screenshot.dir = dir.clone();
        }
        if self.overlay {
            config.overlay.enabled = true;
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for game state updates (the default)
    Serve,
    /// Run the screenshot action once and exit
    Capture,
    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => cli.overrides.apply(config),
        Err(e) => {
            error!(error = %e, "failed to load config");
            process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd_serve(config),
        Commands::Capture => cmd_capture(&config),
        Commands::Config => cmd_config(&config),
    }
}

fn load_config(path: Option<&Path>) -> gsi_shot_core::Result<Config> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            Config::load(&path)
        }
        None => Ok(Config::default()),
    }
}

fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to create tokio runtime");
            process::exit(1);
        }
    }
}

fn cmd_serve(config: Config) {
    if let Err(e) = runtime().block_on(serve::start_server(config)) {
        error!(error = %e, "server error");
        process::exit(1);
    }
}

fn cmd_capture(config: &Config) {
    let dir = match ensure_screenshot_dir(&config.screenshot.dir) {
        Ok(dir) => dir,
        Err(e) => {
            error!(error = %e, "cannot capture");
            process::exit(1);
        }
    };
    let action = ScreenshotAction::from_config(&config.screenshot, dir);
    let report = runtime().block_on(action.run());

    match report.outcome {
        CaptureOutcome::Saved => println!("{}", report.destination.display()),
        CaptureOutcome::Missing | CaptureOutcome::Failed(_) => process::exit(1),
    }
}

fn cmd_config(config: &Config) {
    match config.to_toml() {
        Ok(rendered) => print!("{}", rendered),
        Err(e) => {
            error!(error = %e, "failed to render config");
            process::exit(1);
        }
    }
}
