//! Command-line workflows for the trackhub registry.
//!
//! `args` defines the clap surface, `config` layers flags over the config
//! file, `transport` executes requests with ureq and `commands` strings
//! sessions together for each subcommand.

pub mod args;
pub mod commands;
pub mod config;
pub mod transport;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use trackhub_core::Draft4Validator;

use args::{Cli, Command};
use commands::Connection;
use config::Config;
use transport::UreqTransport;

/// Run one parsed invocation, writing normal output to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<ExitCode> {
    let connect = || -> Result<Connection<UreqTransport>> {
        let config = Config::resolve(&cli.global)?;
        let endpoint = config.endpoint();
        Ok(Connection {
            transport: UreqTransport::new(&endpoint),
            credentials: config.credentials()?,
            endpoint,
        })
    };

    match cli.command {
        Command::Validate { schema, file } => {
            let valid = commands::validate(&Draft4Validator, &schema, &file, out)?;
            return Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        Command::Login => commands::login(connect()?, out)?,
        Command::Logout => commands::logout(connect()?, out)?,
        Command::List => commands::list(connect()?, out)?,
        Command::Register { url, assemblies } => commands::register(connect()?, &url, &assemblies, out)?,
        Command::Show { id } => commands::show(connect()?, id, out)?,
        Command::Delete { id } => commands::delete(connect()?, id, out)?,
    }
    Ok(ExitCode::SUCCESS)
}
