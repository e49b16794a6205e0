use std::collections::BTreeMap;

use crate::draft::DraftForm;
use crate::fields::FieldKey;

/// Static parent → dependents edges for the record form.
///
/// Only declared edges are acted on. A chain has to be spelled out edge by
/// edge; there is no transitive inference.
#[derive(Clone, Debug, Default)]
pub struct DependencyMap {
    edges: BTreeMap<FieldKey, Vec<FieldKey>>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, parent: FieldKey, dependents: Vec<FieldKey>) -> Self {
        self.edges.insert(parent, dependents);
        self
    }

    /// The two edges observed on the record-entry form: a zone change clears
    /// the planting area, a work-type change clears the piece count.
    pub fn work_record() -> Self {
        Self::new()
            .with(FieldKey::Zone, vec![FieldKey::PlantingArea])
            .with(FieldKey::WorkType, vec![FieldKey::PieceCount])
    }

    pub fn dependents_of(&self, parent: FieldKey) -> &[FieldKey] {
        self.edges.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Unset every declared dependent of `changed`, in declared order. Runs
    /// synchronously so no reader ever observes a stale child next to a new
    /// parent value. Parents with no entry are a no-op.
    pub fn invalidate_dependents(&self, draft: &mut DraftForm, changed: FieldKey) {
        for dependent in self.dependents_of(changed) {
            draft.unset(*dependent);
        }
    }
}
