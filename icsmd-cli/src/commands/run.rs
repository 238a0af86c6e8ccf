use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use icsmd_core::{DecodeError, EventFilter, decode, filter, render};

use super::{EXIT_ERRORS, EXIT_OK, EXIT_SOURCE};
use crate::config::AppConfig;
use crate::file;
use crate::format::{self, FormatError};
use crate::source::Source;
use crate::ui::{Ui, create_spinner};

#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub file: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub output: Option<PathBuf>,
    pub no_format: bool,
    pub stdout_only: bool,
}

/// Decode, filter and render one calendar.
pub fn convert(raw: &[u8], window: &EventFilter) -> Result<String, DecodeError> {
    let decoded = decode(raw)?;
    let events = filter(&decoded.events, window);
    Ok(render(events, &decoded.presence))
}

/// Align the table, or hand back the unaligned text with the reason.
pub fn pretty(markdown: String) -> (String, Option<FormatError>) {
    match format::format_table(&markdown) {
        Ok(formatted) => (formatted, None),
        Err(e) => (markdown, Some(e)),
    }
}

pub async fn run(args: RunArgs, config: &AppConfig, strict: bool) -> Result<u8> {
    let time_start = Instant::now();
    let mut ui = Ui::new(strict);

    let input = match args.file.as_deref() {
        Some(name) => file::elastic_extension(name),
        None => {
            let default = file::add_ics_extension(&file::elastic_extension(&config.default_file));
            ui.warn("No file entered.")?;
            ui.hint(format!("Trying default '{default}' instead.\n"));
            default
        }
    };

    let source = match Source::resolve(&input) {
        Ok(source) => source,
        Err(e) => {
            ui.fatal(&e);
            ui.hint(e.hint());
            return Ok(EXIT_SOURCE);
        }
    };

    let spinner = source
        .is_remote()
        .then(|| create_spinner("Fetching URL data..."));
    let fetched = source.fetch().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let raw = match fetched {
        Ok(raw) => raw,
        Err(e) => {
            ui.fatal(format!("Unable to read calendar from '{source}'."));
            ui.fatal(&e);
            ui.hint(format!("\n{}", e.hint()));
            return Ok(EXIT_SOURCE);
        }
    };

    let (window, filter_errors) = EventFilter::from_args(args.from.as_deref(), args.to.as_deref());
    for e in filter_errors {
        ui.error(format!("{e}, ignoring this bound."))?;
    }

    let spinner = create_spinner("Running...");
    let converted = convert(&raw, &window);
    spinner.finish_and_clear();
    let table = converted.with_context(|| format!("Error parsing ICS data from '{source}'"))?;

    let markdown = if args.no_format || !config.format {
        table
    } else {
        let (markdown, format_error) = pretty(table);
        if let Some(e) = format_error {
            ui.error(format!("Error formatting markdown: {e}"))?;
        }
        markdown
    };

    print!("{markdown}");

    if !args.stdout_only {
        let output = args.output.clone().unwrap_or_else(|| {
            file::output_path(config.output_dir(), source.base_name().as_deref())
        });
        tracing::debug!(path = %output.display(), "writing markdown");
        if let Err(e) = tokio::fs::write(&output, markdown.as_bytes()).await {
            ui.error(format!("Error writing to file '{}': {e}", output.display()))?;
        }
    }

    let elapsed = time_start.elapsed();
    if ui.error_count() > 0 {
        ui.hint("\nUse '--strict' flag to stop immediately if any errors occur");
        ui.partial_success(
            format!("ICS file converted (with {} errors)", ui.error_count()),
            elapsed,
        );
        return Ok(EXIT_ERRORS);
    }

    ui.success("ICS file converted", elapsed);
    Ok(EXIT_OK)
}
