#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::mod_module_files)]

use std::process;

mod commands;
mod file;
mod interact;

use commands::Commands;

use clap::{Args, Parser};
use log::trace;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                interact,
                verbosity,
                quiet,
            },
    } = Cli::parse();

    setup_errlog(usize::from(verbosity), quiet)?;

    // `quiet` wins over `interact`
    let interact = interact && !quiet;

    if interact {
        trace!("Interact mode enabled");
    }

    let message = command.execute(interact)?;
    println!("{message}");
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show warnings and errors
    let verbosity = if quiet { 1 } else { verbosity + 2 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "bibdoi")]
#[clap(about = "Resolve the DOI names found in text files into BibTeX records")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// Enables interactive mode, which asks what to do with the resolved records.
    #[clap(short, long, global = true)]
    interact: bool,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Only warnings and errors are logged to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,
}
