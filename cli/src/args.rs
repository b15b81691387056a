//! Command-line surface of the `trackhub` binary.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "trackhub", version, about = "Register and inspect trackhubs on a trackhub registry")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection settings; each overrides the config file.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// TOML file with server/user/password/verify_tls/timeout_secs
    #[arg(long, global = true, env = "TRACKHUB_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Registry base URL, e.g. http://127.0.0.1:3000
    #[arg(long, global = true, env = "TRACKHUB_SERVER", value_name = "URL")]
    pub server: Option<String>,

    #[arg(long, global = true, env = "TRACKHUB_USER")]
    pub user: Option<String>,

    #[arg(long, global = true, env = "TRACKHUB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Per-request timeout
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and print the issued auth token
    Login,
    /// Log in, then log out again
    Logout,
    /// List the trackhubs registered by the user
    List,
    /// Register a trackhub
    Register {
        /// URL of the hub's hub.txt
        #[arg(long)]
        url: String,

        /// Assembly covered by the hub, repeatable
        #[arg(long = "assembly", value_name = "NAME=ACCESSION", required = true, value_parser = parse_assembly)]
        assemblies: Vec<(String, String)>,
    },
    /// Show one registered trackhub
    Show { id: Uuid },
    /// Remove a registered trackhub
    Delete { id: Uuid },
    /// Validate a JSON document against a JSON Schema (draft 4)
    Validate {
        #[arg(short = 's', long = "schema", value_name = "SCHEMA")]
        schema: PathBuf,

        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: PathBuf,
    },
}

fn parse_assembly(s: &str) -> Result<(String, String), String> {
    let (name, accession) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=ACCESSION, got `{s}`"))?;
    let (name, accession) = (name.trim(), accession.trim());
    if name.is_empty() || accession.is_empty() {
        return Err(format!("expected NAME=ACCESSION, got `{s}`"));
    }
    Ok((name.to_string(), accession.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_assembly_splits_on_first_equals() {
        assert_eq!(
            parse_assembly("araTha1=GCA_000001735.1"),
            Ok(("araTha1".to_string(), "GCA_000001735.1".to_string()))
        );
        assert!(parse_assembly("araTha1").is_err());
        assert!(parse_assembly("=GCA_1").is_err());
        assert!(parse_assembly("araTha1=").is_err());
    }

    #[test]
    fn register_collects_repeated_assemblies() {
        let cli = Cli::try_parse_from([
            "trackhub",
            "register",
            "--url",
            "http://h/hub.txt",
            "--assembly",
            "araTha1=GCA_000001735.1",
            "--assembly",
            "ricCom1=GCA_000151685.2",
        ])
        .unwrap();
        match cli.command {
            Command::Register { url, assemblies } => {
                assert_eq!(url, "http://h/hub.txt");
                assert_eq!(assemblies.len(), 2);
                assert_eq!(assemblies[1].0, "ricCom1");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn validate_requires_both_files_and_exits_with_usage_code() {
        let err = Cli::try_parse_from(["trackhub", "validate", "-s", "schema.json"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let cli = Cli::try_parse_from(["trackhub", "validate", "-s", "schema.json", "-f", "hub.json"]).unwrap();
        assert!(matches!(cli.command, Command::Validate { .. }));
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["trackhub", "list", "--insecure", "--timeout", "5", "-vv"]).unwrap();
        assert!(cli.global.insecure);
        assert_eq!(cli.global.timeout, Some(5));
        assert_eq!(cli.global.verbose, 2);
    }
}
