use chrono_tz::Tz;

use crate::time::{Timestamp, day_label, time_label};

pub const MOVIE_UPDATES_HEADING: &str = "## Movie updates";

/// Starting document for a market without a changelog yet.
pub fn new_document(market: &str) -> String {
    format!("# {market}\n{MOVIE_UPDATES_HEADING}")
}

/// Heading text of a dated section, in the market's zone.
pub fn section_stamp(now: Timestamp, tz: Tz) -> String {
    format!("{} {}", day_label(now, tz), time_label(now, tz))
}

/// Puts a new `### <stamp>` section right below the updates heading, above
/// older sections. Everything around the heading is kept byte for byte.
pub fn insert_section(document: &str, stamp: &str, block: &str) -> String {
    let (prefix, suffix) = match document.split_once(MOVIE_UPDATES_HEADING) {
        Some(parts) => parts,
        None if document.is_empty() || document.ends_with('\n') => (document, ""),
        None => return insert_section(&format!("{document}\n"), stamp, block),
    };
    format!("{prefix}{MOVIE_UPDATES_HEADING}\n### {stamp}\n{block}{suffix}")
}
