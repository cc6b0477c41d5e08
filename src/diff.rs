use std::collections::HashSet;

use crate::snapshot::{Presentation, Session, Snapshot};

#[derive(Debug, Default)]
pub struct ScheduleDiff {
    pub new_presentations: Vec<Presentation>,
    pub new_sessions: Vec<Session>,
}

impl ScheduleDiff {
    pub fn is_empty(&self) -> bool {
        self.new_presentations.is_empty() && self.new_sessions.is_empty()
    }

    /// Titles of the new presentations. A slug listed twice only counts once.
    pub fn new_titles(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.new_presentations
            .iter()
            .filter(|p| seen.insert(p.slug.as_str()))
            .map(Presentation::title)
            .collect()
    }
}

/// Presentations are matched by slug and sessions by id. Only on-sale sessions
/// take part; a session going off sale is not a removal.
pub fn compute_diff(old: &Snapshot, new: &Snapshot) -> ScheduleDiff {
    let old_slugs: HashSet<_> = old.presentations().iter().map(|p| &p.slug).collect();
    let old_sessions: HashSet<_> = old.on_sale_sessions().map(|s| &s.session_id).collect();

    ScheduleDiff {
        new_presentations: new
            .presentations()
            .iter()
            .filter(|p| !old_slugs.contains(&p.slug))
            .cloned()
            .collect(),
        new_sessions: new
            .on_sale_sessions()
            .filter(|s| !old_sessions.contains(&s.session_id))
            .cloned()
            .collect(),
    }
}
