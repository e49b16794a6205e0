use std::collections::BTreeMap;

use crate::fields::{FieldKey, FieldValue};

/// Partial work record under construction.
///
/// Absent keys are unset. Nothing is materialized implicitly beyond the
/// baseline applied at creation; validation is a form-level concern and does
/// not happen here.
#[derive(Clone, Debug, PartialEq)]
pub struct DraftForm {
    fields: BTreeMap<FieldKey, FieldValue>,
}

impl DraftForm {
    /// The empty-draft baseline: no employees, zero counters.
    pub fn baseline() -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(FieldKey::EmployeeIds, FieldValue::Ids(Vec::new()));
        fields.insert(FieldKey::PieceCount, FieldValue::Count(0));
        fields.insert(FieldKey::WorkTimeHour, FieldValue::Hours(0.0));
        Self { fields }
    }

    /// Rebuild from persisted fields, exactly as stored.
    pub fn from_fields(fields: BTreeMap<FieldKey, FieldValue>) -> Self {
        Self { fields }
    }

    pub fn set(&mut self, key: FieldKey, value: FieldValue) {
        self.fields.insert(key, value);
    }

    pub fn unset(&mut self, key: FieldKey) {
        self.fields.remove(&key);
    }

    /// Merge-patch: last write wins per key, untouched keys stay.
    pub fn patch(&mut self, partial: impl IntoIterator<Item = (FieldKey, FieldValue)>) {
        for (key, value) in partial {
            self.fields.insert(key, value);
        }
    }

    /// Replace everything with the baseline.
    pub fn reset(&mut self) {
        *self = Self::baseline();
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.fields.get(&key)
    }

    pub fn fields(&self) -> &BTreeMap<FieldKey, FieldValue> {
        &self.fields
    }

    pub fn is_baseline(&self) -> bool {
        *self == Self::baseline()
    }
}

impl Default for DraftForm {
    fn default() -> Self {
        Self::baseline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_merges_and_last_write_wins_per_key() {
        let mut draft = DraftForm::baseline();
        draft.patch(vec![(FieldKey::Zone, FieldValue::Id(1))]);
        draft.patch(vec![(FieldKey::Category, FieldValue::Id(2))]);
        assert_eq!(draft.get(FieldKey::Zone), Some(&FieldValue::Id(1)));
        assert_eq!(draft.get(FieldKey::Category), Some(&FieldValue::Id(2)));

        draft.patch(vec![(FieldKey::Zone, FieldValue::Id(3))]);
        assert_eq!(draft.get(FieldKey::Zone), Some(&FieldValue::Id(3)));
        assert_eq!(draft.get(FieldKey::Category), Some(&FieldValue::Id(2)));
    }

    #[test]
    fn unset_removes_the_key_entirely() {
        let mut draft = DraftForm::baseline();
        draft.set(FieldKey::PlantingArea, FieldValue::Id(3));
        draft.unset(FieldKey::PlantingArea);
        assert_eq!(draft.get(FieldKey::PlantingArea), None);
    }

    #[test]
    fn reset_restores_the_baseline() {
        let mut draft = DraftForm::baseline();
        draft.set(FieldKey::Remark, FieldValue::Text("wet field".to_string()));
        draft.set(FieldKey::PieceCount, FieldValue::Count(40));
        assert!(!draft.is_baseline());

        draft.reset();
        assert!(draft.is_baseline());
        assert_eq!(draft.get(FieldKey::PieceCount), Some(&FieldValue::Count(0)));
        assert_eq!(draft.get(FieldKey::Remark), None);
    }
}
