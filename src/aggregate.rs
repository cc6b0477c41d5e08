use chrono_tz::Tz;
use indexmap::IndexMap;
use log::warn;

use crate::snapshot::Session;
use crate::time::{Timestamp, day_label, time_label};

/// New screenings of one presentation, grouped by local day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedScreening {
    pub presentation_slug: String,
    pub days: Vec<DayScreenings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayScreenings {
    pub day_label: String,
    pub time_labels: Vec<String>,
}

/// Groups sessions by presentation, then by day in `tz`. Both levels keep the
/// order in which they were first seen; times within a day are sorted by
/// instant. Sessions without a usable show time are left out.
pub fn aggregate(sessions: &[Session], tz: Tz) -> Vec<GroupedScreening> {
    let mut by_slug: IndexMap<&str, IndexMap<String, Vec<Timestamp>>> = IndexMap::new();
    for session in sessions {
        let Some(show_time) = session.show_time_utc else {
            warn!("Session {} has no show time, not listing it", session.session_id);
            continue;
        };
        by_slug
            .entry(session.presentation_slug.as_str())
            .or_default()
            .entry(day_label(show_time, tz))
            .or_default()
            .push(show_time);
    }

    by_slug
        .into_iter()
        .map(|(slug, by_day)| GroupedScreening {
            presentation_slug: slug.to_owned(),
            days: by_day
                .into_iter()
                .map(|(day_label, mut times)| {
                    times.sort();
                    DayScreenings {
                        day_label,
                        time_labels: times.into_iter().map(|t| time_label(t, tz)).collect(),
                    }
                })
                .collect(),
        })
        .collect()
}
