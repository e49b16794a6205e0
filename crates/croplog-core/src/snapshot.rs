use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::draft::DraftForm;
use crate::fields::{FieldKey, FieldValue};
use crate::model::Employee;
use crate::selection::SelectionSet;

/// Bump when the persisted layout changes. Readers discard snapshots carrying
/// any other version and start from baseline; the serialized form is not a
/// public contract.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything one logical task persists between page navigations.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TaskSnapshot {
    pub version: u32,
    #[serde(default)]
    pub selection: Vec<Employee>,
    #[serde(default)]
    pub draft: BTreeMap<FieldKey, FieldValue>,
}

impl TaskSnapshot {
    pub fn capture(selection: &SelectionSet<Employee>, draft: &DraftForm) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            selection: selection.items().to_vec(),
            draft: draft.fields().clone(),
        }
    }
}
