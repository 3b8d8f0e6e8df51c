use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::CliError;
use crate::commands::import_disc;

/// Import a disc and write its structure as JSON to `output`, or stdout.
pub(crate) fn run_info(
    path: &Path,
    output: Option<&Path>,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let imported = import_disc(path, quiet)?;

    match output {
        Some(output) => {
            let mut writer = BufWriter::new(File::create(output)?);
            write_json(&mut writer, &imported.info, compact)?;
            writer.flush()?;
            log::info!(
                "{} {}",
                "Wrote".if_supports_color(Stderr, |t| t.green()),
                output.display().if_supports_color(Stderr, |t| t.cyan()),
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            write_json(&mut stdout, &imported.info, compact)?;
            stdout.flush()?;
        }
    }

    let problems = imported.problems().count();
    if problems > 0 {
        log::warn!("{problems} problem(s) reported while reading");
    }
    Ok(())
}

fn write_json(
    writer: &mut impl Write,
    info: &dvd_archive_lib::DiscInfo,
    compact: bool,
) -> Result<(), CliError> {
    if compact {
        serde_json::to_writer(&mut *writer, info)?;
    } else {
        serde_json::to_writer_pretty(&mut *writer, info)?;
    }
    writeln!(writer)?;
    Ok(())
}
