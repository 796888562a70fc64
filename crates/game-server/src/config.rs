//! Configuration for the game TCP server.
//!
//! Values come from the environment first, then command-line flags
//! override them:
//!
//! - `GAME_BIND_ADDR`       / `--bind`                   (default: "0.0.0.0")
//! - `GAME_PORT`            / `--port`                   (default: 8080)
//! - `GAME_MAX_CLIENTS`     (default: 1024)
//! - `GAME_CONFIG_FILE`     / `--config-file`, `-c`      (required)
//! - `GAME_TICK_PERIOD_MS`  / `--tick-period`, `-t`      (default: none, manual ticks)
//! - `GAME_RANDOMIZE_SPAWN` / `--randomize-spawn-points` (default: false)

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use clap::Parser;

/// Command-line flags.
#[derive(Debug, Parser)]
#[clap(name = "game-server")]
#[clap(about = "Multi-client server for the dog-walk simulation")]
pub struct Cli {
    /// Game config file (maps, roads, dog speeds)
    #[clap(short, long)]
    pub config_file: Option<PathBuf>,

    /// Automatic tick period in milliseconds. Disables the tick command.
    #[clap(short, long)]
    pub tick_period: Option<u64>,

    /// Spawn new dogs at a random road point instead of the first road's start
    #[clap(long)]
    pub randomize_spawn_points: bool,

    /// Address to bind to
    #[clap(long)]
    pub bind: Option<String>,

    /// TCP port to listen on
    #[clap(long)]
    pub port: Option<u16>,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    pub config_file: Option<PathBuf>,

    /// `None` means clients drive the clock with `tick`.
    pub tick_period: Option<Duration>,

    pub randomize_spawn_points: bool,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env::var("GAME_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = read_env_or_default("GAME_PORT", 8080u16)?;
        let max_clients = read_env_or_default("GAME_MAX_CLIENTS", 1024usize)?;
        let config_file = env::var_os("GAME_CONFIG_FILE").map(PathBuf::from);
        let tick_period = read_env_or_default("GAME_TICK_PERIOD_MS", 0u64)?;
        let randomize_spawn_points = read_env_or_default("GAME_RANDOMIZE_SPAWN", false)?;

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            config_file,
            tick_period: tick_period_from_millis(tick_period),
            randomize_spawn_points,
        })
    }

    /// Environment first, then flags.
    pub fn load(cli: Cli) -> anyhow::Result<Self> {
        Config::from_env()?.apply_cli(cli)
    }

    pub fn apply_cli(mut self, cli: Cli) -> anyhow::Result<Self> {
        if let Some(path) = cli.config_file {
            self.config_file = Some(path);
        }
        if let Some(ms) = cli.tick_period {
            if ms == 0 {
                bail!("--tick-period must be greater than zero");
            }
            self.tick_period = tick_period_from_millis(ms);
        }
        if cli.randomize_spawn_points {
            self.randomize_spawn_points = true;
        }
        if let Some(bind) = cli.bind {
            self.bind_addr = bind;
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        Ok(self)
    }

    /// The game config path. There is no default.
    pub fn config_path(&self) -> anyhow::Result<&Path> {
        self.config_file
            .as_deref()
            .ok_or_else(|| anyhow!("no game config file: pass --config-file or set GAME_CONFIG_FILE"))
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn tick_period_from_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn read_env_or_default<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: {:?}", key, val)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            max_clients: 16,
            config_file: None,
            tick_period: None,
            randomize_spawn_points: false,
        }
    }

    #[test]
    fn flags_override_environment() {
        let cli = Cli::try_parse_from([
            "game-server",
            "-c",
            "data/config.json",
            "-t",
            "50",
            "--randomize-spawn-points",
            "--port",
            "9100",
        ])
        .unwrap();

        let config = base().apply_cli(cli).unwrap();
        assert_eq!(config.config_path().unwrap(), Path::new("data/config.json"));
        assert_eq!(config.tick_period, Some(Duration::from_millis(50)));
        assert!(config.randomize_spawn_points);
        assert_eq!(config.socket_addr_string(), "0.0.0.0:9100");
    }

    #[test]
    fn config_file_is_required() {
        let cli = Cli::try_parse_from(["game-server"]).unwrap();
        let config = base().apply_cli(cli).unwrap();
        assert!(config.config_path().is_err());
        assert_eq!(config.tick_period, None);
    }

    #[test]
    fn zero_tick_period_is_rejected() {
        let cli = Cli::try_parse_from(["game-server", "-c", "x.json", "-t", "0"]).unwrap();
        assert!(base().apply_cli(cli).is_err());
    }
}
