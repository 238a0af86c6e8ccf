use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::OwoColorize;

use super::{EXIT_ERRORS, EXIT_OK, EXIT_SOURCE};
use crate::file;
use crate::ui::Ui;

const CURRENT_DIR: &str = "./";

/// "current" for the working directory, the quoted path otherwise.
fn friendly_dir(path: &Path) -> String {
    if path == Path::new(CURRENT_DIR) {
        "current".to_string()
    } else {
        format!("'{}'", path.display())
    }
}

pub fn run(path: Option<PathBuf>) -> Result<u8> {
    let ui = Ui::new(false);
    let dir = path.unwrap_or_else(|| PathBuf::from(CURRENT_DIR));

    let ics_files = match file::list_ics_files(&dir) {
        Ok(files) => files,
        Err(e) => {
            ui.fatal("Unable to read directory files");
            ui.fatal(e);
            ui.hint("\nThis is most likely due to a lack of permissions,");
            ui.hint("check you have (at least) read access to this directory.");
            return Ok(EXIT_ERRORS);
        }
    };

    if ics_files.is_empty() {
        ui.output(format!(
            "No ICS files found in the {} directory.",
            friendly_dir(&dir)
        ));
        return Ok(EXIT_SOURCE);
    }

    println!("Found {} ICS files:", ics_files.len());
    for name in &ics_files {
        println!("-- {}", name.bold());
    }

    ui.output("\nConvert ics->markdown file using:");
    ui.output("$ ics-to-markdown run <FILE>".dimmed());

    Ok(EXIT_OK)
}
