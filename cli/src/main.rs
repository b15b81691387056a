use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use trackhub_cli::args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.global.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str())).init();

    match trackhub_cli::run(cli, &mut std::io::stdout().lock()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
