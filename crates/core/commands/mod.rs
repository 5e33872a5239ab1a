use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use bibdoi::{metadata::Metadata, Config, Doi, Style};

use clap::{AppSettings, Subcommand};
use eyre::{Context, Result};
use log::{info, trace};

use crate::{file, interact};

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Resolve the DOI names found in the input and print a BibTeX record for each of them
    Resolve {
        /// Files to search for DOI names, stdin is read when none is given or for `-`
        #[clap(parse(from_os_str))]
        files: Vec<PathBuf>,

        /// Write the resolved records to this file
        #[clap(short, long, parse(from_os_str))]
        output: Option<PathBuf>,

        /// The metadata service the DOI names are resolved against
        #[clap(long, default_value = "https://doi.org/")]
        api: String,

        /// Milliseconds to wait between two requests
        #[clap(long, default_value = "50")]
        delay: u64,

        /// Seconds before a single request is abandoned, 0 waits indefinitely
        #[clap(long, default_value = "30")]
        timeout: u64,

        /// Ask the service for BibTeX instead of composing records from CSL-JSON
        #[clap(long)]
        bibtex: bool,
    },
    /// Print the DOI names found in the input, one per line, without resolving them
    Extract {
        /// Files to search for DOI names, stdin is read when none is given or for `-`
        #[clap(parse(from_os_str))]
        files: Vec<PathBuf>,
    },
    /// Compose the BibTeX record of a CSL-JSON file
    #[clap(setting(AppSettings::ArgRequiredElseHelp))]
    Format {
        /// The CSL-JSON file
        #[clap(parse(from_os_str))]
        file: PathBuf,
    },
}

impl Commands {
    pub fn execute(self, interact: bool) -> Result<String> {
        match self {
            Commands::Resolve {
                files,
                output,
                api,
                delay,
                timeout,
                bibtex,
            } => {
                let config = Config {
                    base_url: api,
                    style: if bibtex { Style::BibTex } else { Style::Csl },
                    delay: Duration::from_millis(delay),
                    timeout: (timeout > 0).then_some(Duration::from_secs(timeout)),
                    ..Config::default()
                };
                trace!("Resolving with {config:?}");

                let text = file::read_inputs(&files)?;
                resolve(&config, &text, output.as_deref(), interact)
            }
            Commands::Extract { files } => {
                let text = file::read_inputs(&files)?;
                Ok(bibdoi::extract(&text)
                    .iter()
                    .map(Doi::as_str)
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Commands::Format { file } => {
                let json = file::read_input(&file)?;
                let metadata = Metadata::from_csl_json(&json).wrap_err_with(|| {
                    format!("'{}' does not hold usable CSL-JSON", file.display())
                })?;
                Ok(bibdoi::format::format(&metadata))
            }
        }
    }
}

fn resolve(
    config: &Config,
    text: &str,
    output: Option<&Path>,
    interact: bool,
) -> Result<String> {
    let mut controller = config
        .controller()
        .wrap_err("Cannot set up the HTTP client")?;

    let records = controller.resolve(text, |record| println!("{record}\n"));
    let resolved = records.iter().filter(|r| r.is_success()).count();
    let message = format!("Resolved {resolved} of {} DOI names", records.len());

    let database = controller.export_text();

    if let Some(path) = output {
        file::write_database(path, &database)?;
        info!("Database written to '{}'", path.display());
    }

    if interact {
        interact::user_export(&database)?;
    }

    Ok(message)
}
