//! Gatehouse entry point
//!
//! Typical `authorized_keys` line:
//!
//! ```text
//! command="gatehouse --viewer alice",no-port-forwarding,no-pty ssh-ed25519 AAAA...
//! ```

use clap::Parser;
use gatehouse_cli::{run, usage_exit_status, Cli, RemoteCommand, ORIGINAL_COMMAND_ENV};
use gatehouse_effects::StderrChannel;
use gatehouse_workflow::EXIT_FAILURE;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(usage_exit_status(&err));
        }
    };

    let command = RemoteCommand::select(&cli.command, std::env::var(ORIGINAL_COMMAND_ENV).ok());
    match run(&cli, command, StderrChannel) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}
