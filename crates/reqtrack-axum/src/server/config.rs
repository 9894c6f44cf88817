//! Command-line and environment configuration.
//!
//! [`CliArgs`] is parsed by `clap` (each flag falls back to a `REQTRACK_*`
//! environment variable, which `dotenvy` may populate from `.env`) and then
//! validated into a [`ServerConfig`].

use anyhow::bail;
use clap::{ArgAction, Parser};
use core::time::Duration;
use reqtrack::{
    DEFAULT_ID_LEN, DEFAULT_MAX_ID_ATTEMPTS, RandSource, Registry, RegistryConfig, SeededRandom,
    ThreadRandom,
};

/// Random source used by the service registry.
///
/// The thread-local RNG by default, or a seeded RNG when `--seed` is given so
/// identifier sequences can be replayed.
#[derive(Debug)]
pub enum ServerRandom {
    Thread(ThreadRandom),
    Seeded(SeededRandom),
}

impl RandSource<u64> for ServerRandom {
    fn rand(&self) -> u64 {
        match self {
            Self::Thread(rng) => rng.rand(),
            Self::Seeded(rng) => rng.rand(),
        }
    }
}

/// The registry shared by handlers and workers. Payloads are integers.
pub type AppRegistry = Registry<i64, ServerRandom>;

#[derive(Parser, Debug, Clone)]
#[command(name = "reqtrack-axum", version, about = "HTTP front end for the reqtrack registry")]
pub struct CliArgs {
    /// Address to listen on.
    #[arg(long, env = "REQTRACK_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: String,

    /// Number of completion workers.
    #[arg(long, env = "REQTRACK_WORKERS", default_value_t = 4)]
    pub workers: usize,

    /// Simulated work time before a worker completes a request.
    #[arg(long, env = "REQTRACK_WORK_DELAY_MS", default_value_t = 1000)]
    pub work_delay_ms: u64,

    /// Hand every submitted request to the worker pool.
    #[arg(long, env = "REQTRACK_AUTO_COMPLETE", default_value_t = true, action = ArgAction::Set)]
    pub auto_complete: bool,

    /// Length of generated request identifiers.
    #[arg(long, env = "REQTRACK_ID_LEN", default_value_t = DEFAULT_ID_LEN)]
    pub id_len: usize,

    /// Identifiers tried per submission before reporting exhaustion.
    #[arg(long, env = "REQTRACK_MAX_ID_ATTEMPTS", default_value_t = DEFAULT_MAX_ID_ATTEMPTS)]
    pub max_id_attempts: usize,

    /// Seed for deterministic identifiers.
    #[arg(long, env = "REQTRACK_SEED")]
    pub seed: Option<u64>,

    /// Seconds to let queued work drain on shutdown.
    #[arg(long, env = "REQTRACK_SHUTDOWN_TIMEOUT", default_value_t = 3)]
    pub shutdown_timeout: u64,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub num_workers: usize,
    pub work_delay: Duration,
    pub auto_complete: bool,
    pub registry: RegistryConfig,
    pub seed: Option<u64>,
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Builds the registry described by this configuration.
    pub fn build_registry(&self) -> AppRegistry {
        let rng = match self.seed {
            Some(seed) => ServerRandom::Seeded(SeededRandom::new(seed)),
            None => ServerRandom::Thread(ThreadRandom),
        };
        Registry::with_config(self.registry, rng)
    }
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.workers == 0 {
            bail!("--workers must be at least 1");
        }
        // A single letter allows only 52 live requests.
        if args.id_len < 2 {
            bail!("--id-len must be at least 2, got {}", args.id_len);
        }
        if args.max_id_attempts == 0 {
            bail!("--max-id-attempts must be at least 1");
        }

        Ok(Self {
            server_addr: args.addr,
            num_workers: args.workers,
            work_delay: Duration::from_millis(args.work_delay_ms),
            auto_complete: args.auto_complete,
            registry: RegistryConfig::default()
                .with_id_len(args.id_len)
                .with_max_id_attempts(args.max_id_attempts),
            seed: args.seed,
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqtrack::RequestState;

    fn parse(args: &[&str]) -> anyhow::Result<ServerConfig> {
        let argv = std::iter::once("reqtrack-axum").chain(args.iter().copied());
        ServerConfig::try_from(CliArgs::try_parse_from(argv)?)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.num_workers, 4);
        assert_eq!(config.work_delay, Duration::from_secs(1));
        assert!(config.auto_complete);
        assert_eq!(config.registry, RegistryConfig::default());
        assert_eq!(config.shutdown_timeout, Duration::from_secs(3));
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--workers",
            "8",
            "--work-delay-ms",
            "25",
            "--auto-complete",
            "false",
            "--id-len",
            "16",
            "--seed",
            "7",
        ])
        .unwrap();
        assert_eq!(config.num_workers, 8);
        assert_eq!(config.work_delay, Duration::from_millis(25));
        assert!(!config.auto_complete);
        assert_eq!(config.registry.id_len, 16);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn rejects_degenerate_values() {
        assert!(parse(&["--workers", "0"]).is_err());
        assert!(parse(&["--id-len", "1"]).is_err());
        assert!(parse(&["--max-id-attempts", "0"]).is_err());
    }

    #[test]
    fn seeded_registries_replay() {
        let config = parse(&["--seed", "11"]).unwrap();
        let a = config.build_registry();
        let b = config.build_registry();
        let id = a.submit(1);
        assert_eq!(b.submit(1), id);
        assert_eq!(a.query(id.as_str()), RequestState::New);
    }
}
