use clap::Parser;
use std::io::IsTerminal;
use std::process::exit;
use vqe_watch::{cli::Cli, config::Config, controller, log, watch::DisplayOptions};

fn main() {
    let cli = Cli::parse();

    // input comes from a file; the keyboard must be a terminal
    if !std::io::stdin().is_terminal() {
        eprintln!("please run interactively.");
        exit(1);
    }

    let logging = match log::init() {
        Ok(()) => true,
        Err(e) => {
            eprintln!("vqe-watch: logging disabled: {e:#}");
            false
        }
    };

    if let Err(e) = run(cli) {
        tracing::error!("{e:#}");
        eprintln!("vqe-watch: {e:#}");
        if logging {
            eprintln!("details in {}.*", log::log_file().display());
        }
        exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env(cli.path)?;
    let path = config.source.resolve()?;
    let options = DisplayOptions {
        color: config.color,
        ..DisplayOptions::default()
    };
    controller::run(path, options)
}
