//! Remote shell entry point for gatehouse
//!
//! Installed as the forced command of a remote shell login. The login layer
//! binds the viewer; the client's requested command arrives either as
//! trailing arguments or in `SSH_ORIGINAL_COMMAND`.

use anyhow::{Context, Result};
use clap::Parser;
use gatehouse_core::{ErrorChannel, GateConfig, OperationHandoff, RequestArgs, ViewerId};
use gatehouse_effects::{ConfiguredDirectory, ConfiguredPolicy, NoopHandoff, ProcessHandoff};
use gatehouse_workflow::{WorkflowDispatcher, EXIT_FAILURE, EXIT_SUCCESS};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/gatehouse/gatehouse.toml";
/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "GATEHOUSE_LOG";
/// Environment variable the remote shell server sets to the client's command
pub const ORIGINAL_COMMAND_ENV: &str = "SSH_ORIGINAL_COMMAND";

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "gatehouse")]
#[command(about = "Gate repository operations requested over a remote shell", long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "GATEHOUSE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Authorize the request but do not start the service process
    #[arg(long)]
    pub dry_run: bool,

    /// Authenticated user the session acts for
    #[arg(long, env = "GATEHOUSE_VIEWER")]
    pub viewer: String,

    /// Remote command; defaults to $SSH_ORIGINAL_COMMAND
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Where the remote command came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Already split into arguments
    Args(RequestArgs),
    /// Raw command line still to be split
    Line(String),
}

impl RemoteCommand {
    /// Prefer explicit trailing arguments, then the original-command variable
    pub fn select(trailing: &[String], original: Option<String>) -> Self {
        if trailing.is_empty() {
            Self::Line(original.unwrap_or_default())
        } else {
            Self::Args(RequestArgs::from_argv(trailing.iter().cloned()))
        }
    }
}

/// Pick the log filter: `--verbose`, then `$GATEHOUSE_LOG`, then the config file
pub fn log_directive(verbose: bool, env_directive: Option<String>, config: &GateConfig) -> String {
    if verbose {
        return "debug".to_owned();
    }
    env_directive
        .filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| config.logging.level.clone())
}

/// Install the stderr log subscriber
///
/// Stdout carries the data-plane protocol, so logs go to stderr only.
pub fn init_logging(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Exit status for a command line clap refused to parse
///
/// Help output is a success; every usage error is an ordinary failure.
pub fn usage_exit_status(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

/// Load configuration, install logging, and dispatch the remote command
///
/// Returns the process exit status. Only configuration failures surface as
/// `Err`; every request failure is reported on `channel` and becomes status `1`.
pub fn run<C: ErrorChannel>(cli: &Cli, command: RemoteCommand, channel: C) -> Result<i32> {
    let config = GateConfig::load_from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_logging(&log_directive(cli.verbose, std::env::var(LOG_ENV).ok(), &config));
    Ok(dispatch(cli, &config, command, channel))
}

/// Dispatch against an already-loaded configuration
pub fn dispatch<C: ErrorChannel>(
    cli: &Cli,
    config: &GateConfig,
    command: RemoteCommand,
    channel: C,
) -> i32 {
    let directory = ConfiguredDirectory::from_config(config);
    let policy = ConfiguredPolicy::from_config(config);
    let handoff: Box<dyn OperationHandoff> = if cli.dry_run {
        Box::new(NoopHandoff)
    } else {
        Box::new(ProcessHandoff::new())
    };
    debug!(repositories = directory.len(), dry_run = cli.dry_run, "Collaborators ready");

    let viewer = ViewerId::new(cli.viewer.as_str());
    let mut dispatcher = WorkflowDispatcher::new(directory, policy, channel);
    match command {
        RemoteCommand::Args(args) => dispatcher.execute_args(viewer, args, handoff.as_ref()),
        RemoteCommand::Line(line) => dispatcher.execute_command(viewer, &line, handoff.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_arguments_take_precedence() {
        let trailing = vec!["git-upload-pack".to_owned(), "/diffusion/X/".to_owned()];
        assert_eq!(
            RemoteCommand::select(&trailing, Some("git-receive-pack /diffusion/Y/".to_owned())),
            RemoteCommand::Args(RequestArgs::from_argv(["git-upload-pack", "/diffusion/X/"]))
        );
        assert_eq!(
            RemoteCommand::select(&[], Some("git-receive-pack /diffusion/Y/".to_owned())),
            RemoteCommand::Line("git-receive-pack /diffusion/Y/".to_owned())
        );
        assert_eq!(RemoteCommand::select(&[], None), RemoteCommand::Line(String::new()));
    }

    #[test]
    fn test_log_directive_precedence() {
        let config = GateConfig::from_toml_str("[logging]\nlevel = \"info\"\n").unwrap();
        assert_eq!(log_directive(true, Some("trace".to_owned()), &config), "debug");
        assert_eq!(log_directive(false, Some("trace".to_owned()), &config), "trace");
        assert_eq!(log_directive(false, Some("  ".to_owned()), &config), "info");
        assert_eq!(log_directive(false, None, &config), "info");
    }

    #[test]
    fn test_parses_forced_command_invocation() {
        let cli = Cli::try_parse_from([
            "gatehouse",
            "--viewer",
            "alice",
            "--dry-run",
            "-c",
            "/tmp/g.toml",
            "git-upload-pack",
            "/diffusion/X/",
        ])
        .unwrap();
        assert_eq!(cli.viewer, "alice");
        assert!(cli.dry_run);
        assert!(!cli.verbose);
        assert_eq!(cli.config, PathBuf::from("/tmp/g.toml"));
        assert_eq!(cli.command, ["git-upload-pack", "/diffusion/X/"]);
    }

    #[test]
    fn test_usage_errors_exit_with_failure() {
        let err = Cli::try_parse_from(["gatehouse", "--viewer"]).unwrap_err();
        assert_eq!(usage_exit_status(&err), EXIT_FAILURE);

        let help = Cli::try_parse_from(["gatehouse", "--help"]).unwrap_err();
        assert_eq!(usage_exit_status(&help), EXIT_SUCCESS);
    }
}
