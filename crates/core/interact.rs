use std::path::Path;

use bibdoi::record::EXPORT_FILE_NAME;

use eyre::{eyre, Context, Result};
use log::info;

use crate::file;

pub fn user_select<S: ToString>(prompt: &str, items: &[S]) -> Result<usize> {
    let selection = dialoguer::Select::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .default(0)
        .items(items)
        .interact_opt()
        .wrap_err_with(|| eyre!("User selection cancelled"))?;

    if let Some(index) = selection {
        Ok(index)
    } else {
        Err(eyre!("No selection made - cancelling operation"))
    }
}

/// Ask whether the database should be saved, printed or left alone.
pub fn user_export(database: &str) -> Result<()> {
    if database.is_empty() {
        info!("Nothing to export - no DOI name was resolved");
        return Ok(());
    }

    let items = [
        format!("Save as {EXPORT_FILE_NAME}"),
        "Print the database".to_owned(),
        "Done".to_owned(),
    ];

    match user_select("Export the resolved records", &items)? {
        0 => {
            file::write_database(Path::new(EXPORT_FILE_NAME), database)?;
            info!("Database written to '{EXPORT_FILE_NAME}'");
            Ok(())
        }
        1 => {
            println!("{database}");
            Ok(())
        }
        _ => Ok(()),
    }
}
