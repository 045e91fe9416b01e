//! Encodes a flat section list plus its conflict set as a CNF formula.
//!
//! Variables are 1-indexed section positions (DIMACS convention); clauses are
//! plain `Vec<i32>` literal lists so they can be handed directly to the SAT backend.

use crate::scheduler::conflict::ConflictSet;
use crate::scheduler::section::Component;

/// A CNF formula plus the grouping needed to map a model back to a schedule.
pub struct Encoding {
    pub num_vars: usize,
    pub clauses: Vec<Vec<i32>>,
}

fn var(index: usize) -> i32 {
    (index + 1) as i32
}

/// Builds the coverage clauses (one per requested component, "at least one
/// section") and the exclusion clauses (one per conflicting pair, plus unit
/// clauses for busy-time self-exclusions).
pub fn encode(components: &[Component], flat_sections_len: usize, offsets: &[usize], conflicts: &ConflictSet) -> Encoding {
    let mut clauses = Vec::new();

    for (component, &offset) in components.iter().zip(offsets) {
        let clause: Vec<i32> = (0..component.sections.len()).map(|i| var(offset + i)).collect();
        clauses.push(clause);
    }

    for &(a, b) in &conflicts.pairs {
        clauses.push(vec![-var(a), -var(b)]);
    }

    for &i in &conflicts.self_excluded {
        clauses.push(vec![-var(i)]);
    }

    Encoding {
        num_vars: flat_sections_len,
        clauses,
    }
}

/// The blocking clause that forbids exactly the given positive assignment from
/// recurring in a later model: the negation of the conjunction of its literals.
pub fn blocking_clause(positive_indices: &[usize]) -> Vec<i32> {
    positive_indices.iter().map(|&i| -var(i)).collect()
}
