use std::path::Path;

use dvd_archive_lib::{DiscInfo, Severity};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::CliError;
use crate::commands::import_disc;

/// Import a disc and summarize it. Fails if the reader reported any
/// warnings or errors.
pub(crate) fn run_check(path: &Path, quiet: bool) -> Result<(), CliError> {
    let imported = import_disc(path, quiet)?;

    log::info!(
        "{} {}",
        "Disc".if_supports_color(Stderr, |t| t.bold()),
        path.display().if_supports_color(Stderr, |t| t.cyan()),
    );
    for line in summary(&imported.info) {
        log::info!("  {line}");
    }
    crate::log_blank();

    let problems: Vec<_> = imported.problems().collect();
    if problems.is_empty() {
        log::info!(
            "{}",
            "No problems found".if_supports_color(Stderr, |t| t.green()),
        );
        return Ok(());
    }

    log::info!(
        "{}",
        "Problems".if_supports_color(Stderr, |t| t.bold()),
    );
    for (severity, text) in &problems {
        let marker = match severity {
            Severity::Error => "error",
            _ => "warning",
        };
        log::info!(
            "  {} {text}",
            marker.if_supports_color(Stderr, |t| t.yellow()),
        );
    }
    Err(CliError::Problems(problems.len()))
}

/// One line per fact about the disc, then one per title.
fn summary(info: &DiscInfo) -> Vec<String> {
    let mut lines = vec![
        format!("Provider:    {}", display_or_dash(&info.provider)),
        format!("Disc ID:     {}", info.disc_id_hex()),
        format!("Version:     {}", info.specification),
        format!(
            "Volume:      {} of {}, side {}",
            info.volume_index, info.total_volume_count, info.disc_side
        ),
        format!("Title sets:  {}", info.title_sets.len()),
    ];

    for (set_index, title_set) in &info.title_sets {
        for (title_index, title) in &title_set.titles {
            lines.push(format!(
                "Title {:>3}:   title set {set_index} title {title_index}, {} part(s), {} angle(s)",
                title.global_index,
                title.parts.len(),
                title.viewing_angle_count,
            ));
        }
    }
    lines
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

#[cfg(test)]
#[path = "../tests/check_tests.rs"]
mod tests;
