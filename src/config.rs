use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use crate::modes::Mode;
use crate::rpc_utils::RpcAuth;
use crate::theme::Theme;

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8332/";

/// Chainmon - terminal dashboard for a blockchain node
///
/// Polls the node's JSON-RPC interface and shows best-block statistics.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "chainmon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal dashboard for a blockchain node", long_about = None)]
pub struct CliArgs {
    /// Node JSON-RPC endpoint URL
    #[arg(long, env = "CHAINMON_RPC_URL")]
    pub rpc_url: Option<String>,

    /// RPC user name (basic auth)
    #[arg(long, env = "CHAINMON_RPC_USER")]
    pub rpc_user: Option<String>,

    /// RPC password (basic auth)
    #[arg(long, env = "CHAINMON_RPC_PASSWORD")]
    pub rpc_password: Option<String>,

    /// Cookie file holding "user:password", used when no user/password is given
    #[arg(long, env = "CHAINMON_RPC_COOKIE_FILE")]
    pub rpc_cookie_file: Option<PathBuf>,

    /// Best block polling interval in milliseconds (100-60000)
    #[arg(long, env = "POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// Clock tick interval in milliseconds (100-10000)
    #[arg(long, env = "TICK_INTERVAL_MS")]
    pub tick_interval_ms: Option<u64>,

    /// RPC request timeout in milliseconds (1000-60000)
    #[arg(long, env = "RPC_TIMEOUT_MS")]
    pub rpc_timeout_ms: Option<u64>,

    /// Number of retry attempts for failed RPC requests (0-10)
    #[arg(long, env = "RPC_RETRIES")]
    pub rpc_retries: Option<u32>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Mode shown at startup (monitor, peers, wallet, ...)
    #[arg(long, env = "CHAINMON_MODE", value_parser = clap::value_parser!(Mode))]
    pub mode: Option<Mode>,

    /// Colour theme: classic, mono or amber
    #[arg(long, env = "CHAINMON_THEME", value_parser = clap::value_parser!(Theme))]
    pub theme: Option<Theme>,

    /// Write logs to this file (logging is off without it)
    #[arg(long, env = "CHAINMON_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub rpc_url: String,
    pub rpc_auth: Option<RpcAuth>,
    pub poll_interval_ms: u64,
    pub tick_interval_ms: u64,
    pub rpc_timeout_ms: u64,
    pub rpc_retries: u32,
    pub render_fps: u32,
    pub mode: Mode,
    pub theme: Theme,
    pub log_file: Option<PathBuf>,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!(
            "{name} must start with http:// or https://, got '{url}'"
        ))
    }
}

/// Parse the node's `user:password` cookie contents.
pub fn parse_cookie(contents: &str) -> Result<RpcAuth> {
    let line = contents.lines().next().unwrap_or_default().trim();
    let (user, password) = line
        .split_once(':')
        .ok_or_else(|| anyhow!("cookie must look like user:password"))?;
    Ok(RpcAuth {
        user: user.to_string(),
        password: password.to_string(),
    })
}

fn read_cookie(path: &Path) -> Result<RpcAuth> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("cannot read RPC cookie file {}", path.display()))?;
    parse_cookie(&contents).with_context(|| format!("bad RPC cookie file {}", path.display()))
}

/// Explicit credentials beat the cookie file.
fn resolve_auth(args: &CliArgs) -> Result<Option<RpcAuth>> {
    match (&args.rpc_user, &args.rpc_password) {
        (Some(user), password) => Ok(Some(RpcAuth {
            user: user.clone(),
            password: password.clone().unwrap_or_default(),
        })),
        (None, Some(_)) => Err(anyhow!("CHAINMON_RPC_PASSWORD given without CHAINMON_RPC_USER")),
        (None, None) => args.rpc_cookie_file.as_deref().map(read_cookie).transpose(),
    }
}

pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

pub fn from_args(args: CliArgs) -> Result<Config> {
    let rpc_url = args.rpc_url.clone().unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
    validate_url(&rpc_url, "CHAINMON_RPC_URL")?;

    let rpc_auth = resolve_auth(&args)?;

    let poll_interval_ms = validate_in_range(
        args.poll_interval_ms.unwrap_or(2000),
        100,
        60000,
        "POLL_INTERVAL_MS",
    )?;
    let tick_interval_ms = validate_in_range(
        args.tick_interval_ms.unwrap_or(1000),
        100,
        10000,
        "TICK_INTERVAL_MS",
    )?;
    let rpc_timeout_ms =
        validate_in_range(args.rpc_timeout_ms.unwrap_or(8000), 1000, 60000, "RPC_TIMEOUT_MS")?;
    let rpc_retries = validate_in_range(args.rpc_retries.unwrap_or(2), 0, 10, "RPC_RETRIES")?;
    let render_fps = validate_in_range(args.render_fps.unwrap_or(30), 1, 120, "RENDER_FPS")?;

    Ok(Config {
        rpc_url,
        rpc_auth,
        poll_interval_ms,
        tick_interval_ms,
        rpc_timeout_ms,
        rpc_retries,
        render_fps,
        mode: args.mode.unwrap_or(Mode::Monitor),
        theme: args.theme.unwrap_or_default(),
        log_file: args.log_file,
    })
}

impl Config {
    pub fn log_summary(&self) {
        log::info!("Chainmon configuration:");
        log::info!("  RPC URL: {}", self.rpc_url);
        match &self.rpc_auth {
            Some(auth) => log::info!("  RPC user: {}", auth.user),
            None => log::info!("  RPC auth: none"),
        }
        log::info!("  Poll interval: {}ms", self.poll_interval_ms);
        log::info!("  Tick interval: {}ms", self.tick_interval_ms);
        log::info!("  RPC timeout: {}ms, retries: {}", self.rpc_timeout_ms, self.rpc_retries);
        log::info!("  Render FPS: {}", self.render_fps);
        log::info!("  Start mode: {}, theme: {}", self.mode, self.theme);
    }
}
