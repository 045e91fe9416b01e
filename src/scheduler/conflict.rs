//! Pairwise conflict relation: structural exclusion, time overlap, and
//! auto-enroll dependency violation, plus busy-time self-exclusion.

use std::collections::BTreeSet;

use crate::scheduler::section::Section;
use crate::scheduler::timetable::TimetableRange;

/// An unordered pair of section indices, canonicalised so `(a, b)` and `(b, a)`
/// are never both stored.
pub type ConflictPair = (usize, usize);

fn canonical_pair(a: usize, b: usize) -> ConflictPair {
    if a <= b { (a, b) } else { (b, a) }
}

/// True iff sections `s` and `o` conflict on at least one of the three axes.
pub fn conflicts(s: &Section, o: &Section) -> bool {
    structural_exclusion(s, o) || time_overlap(s, o) || dependency_violation(s, o)
}

fn structural_exclusion(s: &Section, o: &Section) -> bool {
    s.id.course == o.id.course && s.id.component == o.id.component && s.id.label != o.id.label
}

fn time_overlap(s: &Section, o: &Section) -> bool {
    s.range.overlaps(&o.range)
}

fn dependency_violation(s: &Section, o: &Section) -> bool {
    if s.id.course != o.id.course {
        return false;
    }
    if s.auto_enroll_label.is_none() && o.auto_enroll_label.is_none() {
        return false;
    }
    let s_targets_o = s
        .auto_enroll_label
        .as_deref()
        .is_some_and(|label| label == o.id.label && s.auto_enroll_component == Some(o.id.component));
    let o_targets_s = o
        .auto_enroll_label
        .as_deref()
        .is_some_and(|label| label == s.id.label && o.auto_enroll_component == Some(s.id.component));
    !(s_targets_o || o_targets_s)
}

/// Builds the full conflict set over a flat section list: every non-conflicting
/// axis-independent pair plus, separately, the reflexive self-exclusions implied
/// by overlap with any declared busy time.
pub struct ConflictSet {
    pub pairs: BTreeSet<ConflictPair>,
    pub self_excluded: BTreeSet<usize>,
}

pub fn build_conflict_set(sections: &[Section], busy_times: &[TimetableRange]) -> ConflictSet {
    let mut pairs = BTreeSet::new();
    for i in 0..sections.len() {
        for j in (i + 1)..sections.len() {
            if conflicts(&sections[i], &sections[j]) {
                pairs.insert(canonical_pair(i, j));
            }
        }
    }

    let mut self_excluded = BTreeSet::new();
    for (i, section) in sections.iter().enumerate() {
        if busy_times.iter().any(|b| section.range.overlaps(b)) {
            self_excluded.insert(i);
        }
    }

    ConflictSet { pairs, self_excluded }
}
