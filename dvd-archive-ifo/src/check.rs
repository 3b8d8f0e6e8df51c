//! Consistency checks between the assembled model and the counts the
//! information files declare.

use std::collections::HashSet;

use dvd_archive_core::DiscInfo;
use dvd_archive_core::model::{FrameRate, ProgramChain};
use thiserror::Error;

use crate::ifo::ManagerInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Inconsistency {
    #[error("inconsistent VTS count")]
    TitleSetCount,

    #[error("inconsistent title count")]
    TitleCount,

    #[error("inconsistent parts count")]
    PartCount,

    #[error("inconsistent frame rates")]
    FrameRates,
}

/// Counts declared by the video manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declared {
    pub title_sets: usize,
    /// Part count of each title, in global title order.
    pub parts: Vec<u16>,
}

impl From<&ManagerInfo> for Declared {
    fn from(manager: &ManagerInfo) -> Self {
        Self {
            title_sets: usize::from(manager.title_set_count),
            parts: manager.titles.iter().map(|title| title.part_count).collect(),
        }
    }
}

/// Compare `info` against `declared`.
///
/// The count checks stop at the first mismatch since later counts are
/// meaningless once an earlier one is off. Frame rates are checked
/// independently.
pub fn check(info: &DiscInfo, declared: &Declared) -> Vec<Inconsistency> {
    let mut found = Vec::new();
    if let Some(count) = count_mismatch(info, declared) {
        found.push(count);
    }
    if !frame_rates_consistent(info) {
        found.push(Inconsistency::FrameRates);
    }
    found
}

fn count_mismatch(info: &DiscInfo, declared: &Declared) -> Option<Inconsistency> {
    if info.title_sets.len() != declared.title_sets {
        return Some(Inconsistency::TitleSetCount);
    }

    let titles = info.titles_by_global_index();
    if titles.len() != declared.parts.len() {
        return Some(Inconsistency::TitleCount);
    }

    let parts_match = titles
        .iter()
        .zip(&declared.parts)
        .all(|(title, &count)| title.parts.len() == usize::from(count));
    (!parts_match).then_some(Inconsistency::PartCount)
}

/// Within a program chain, the chain, its cells and every interaction
/// timestamp must share one frame rate.
fn frame_rates_consistent(info: &DiscInfo) -> bool {
    let domains = std::iter::once(&info.top_level_menus).chain(
        info.title_sets
            .values()
            .flat_map(|title_set| [&title_set.menus, &title_set.content]),
    );
    let mut chains: Vec<&ProgramChain> = info.start.iter().collect();
    chains.extend(domains.flat_map(|domain| domain.program_chains.all()));

    chains.into_iter().all(|chain| frame_rates(chain).len() <= 1)
}

fn frame_rates(chain: &ProgramChain) -> HashSet<FrameRate> {
    let mut rates = HashSet::from([chain.duration.rate]);
    for cell in chain.cells.values() {
        rates.insert(cell.duration.rate);
        rates.extend(
            cell.interactions
                .iter()
                .filter_map(|interaction| interaction.linear_playback_timestamp)
                .map(|time| time.rate),
        );
    }
    rates
}

#[cfg(test)]
#[path = "tests/check_tests.rs"]
mod tests;
