use croplog_core::{DraftForm, Employee, FieldKey, FieldValue, SelectionSet};
use serde::Serialize;
use thiserror::Error;

/// What the submit endpoint receives. Employee ids come from the selection
/// set, the work type from the cascade choice, everything else from the
/// draft as-is.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RecordPayload {
    pub base_id: String,
    pub employee_ids: Vec<String>,
    pub work_type_id: i64,
    pub zone_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piece_unit_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piece_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_time_hour: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

/// Required-field failures caught before anything reaches the submitter.
/// The draft store itself never validates; this is the form-level rule set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("no employees selected")]
    NoEmployees,
    #[error("no work type chosen")]
    MissingWorkType,
    #[error("a work-type group is not submittable; pick a leaf work type")]
    GroupNotSubmittable,
    #[error("no zone chosen")]
    MissingZone,
}

pub fn assemble_payload(
    base_id: &str,
    selection: &SelectionSet<Employee>,
    draft: &DraftForm,
) -> Result<RecordPayload, PayloadError> {
    if selection.is_empty() {
        return Err(PayloadError::NoEmployees);
    }
    let work_type_id = match draft.get(FieldKey::WorkType) {
        Some(FieldValue::Choice(choice)) => choice
            .work_type_id()
            .ok_or(PayloadError::GroupNotSubmittable)?,
        _ => return Err(PayloadError::MissingWorkType),
    };
    let zone_id = match draft.get(FieldKey::Zone) {
        Some(FieldValue::Id(id)) => *id,
        _ => return Err(PayloadError::MissingZone),
    };

    Ok(RecordPayload {
        base_id: base_id.to_string(),
        employee_ids: selection.keys().map(str::to_string).collect(),
        work_type_id,
        zone_id,
        piece_unit_id: draft.get(FieldKey::PieceUnit).and_then(FieldValue::as_id),
        piece_count: draft.get(FieldKey::PieceCount).and_then(FieldValue::as_count),
        work_time_hour: draft
            .get(FieldKey::WorkTimeHour)
            .and_then(FieldValue::as_hours),
        area_id: draft
            .get(FieldKey::PlantingArea)
            .and_then(FieldValue::as_id),
        category_id: draft.get(FieldKey::Category).and_then(FieldValue::as_id),
        remark: draft
            .get(FieldKey::Remark)
            .and_then(FieldValue::as_text)
            .map(str::to_string),
        start_time: draft
            .get(FieldKey::StartTime)
            .and_then(FieldValue::as_instant),
        end_time: draft.get(FieldKey::EndTime).and_then(FieldValue::as_instant),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use croplog_core::CascadeChoice;

    fn emp(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            employee_no: format!("no-{id}"),
            name: format!("name-{id}"),
            position_id: 1,
            position_name: "picker".to_string(),
            clock_in: None,
        }
    }

    fn ready_draft() -> DraftForm {
        let mut draft = DraftForm::baseline();
        draft.set(
            FieldKey::WorkType,
            FieldValue::Choice(CascadeChoice::WorkType(12)),
        );
        draft.set(FieldKey::Zone, FieldValue::Id(7));
        draft
    }

    #[test]
    fn assembles_from_selection_and_draft() {
        let mut selection = SelectionSet::new();
        selection.add(emp("e1"));
        selection.add(emp("e2"));
        let mut draft = ready_draft();
        draft.set(FieldKey::PieceUnit, FieldValue::Id(3));
        draft.set(FieldKey::PieceCount, FieldValue::Count(40));
        draft.set(FieldKey::PlantingArea, FieldValue::Id(3));
        draft.set(FieldKey::Remark, FieldValue::Text("wet field".to_string()));

        let payload = assemble_payload("base-1", &selection, &draft).unwrap();
        assert_eq!(payload.employee_ids, vec!["e1", "e2"]);
        assert_eq!(payload.work_type_id, 12);
        assert_eq!(payload.zone_id, 7);
        assert_eq!(payload.piece_unit_id, Some(3));
        assert_eq!(payload.piece_count, Some(40));
        assert_eq!(payload.area_id, Some(3));
        assert_eq!(payload.remark.as_deref(), Some("wet field"));
    }

    #[test]
    fn requires_a_selection() {
        let selection = SelectionSet::new();
        let draft = ready_draft();
        assert_eq!(
            assemble_payload("base-1", &selection, &draft),
            Err(PayloadError::NoEmployees)
        );
    }

    #[test]
    fn requires_work_type_and_zone() {
        let mut selection = SelectionSet::new();
        selection.add(emp("e1"));

        let draft = DraftForm::baseline();
        assert_eq!(
            assemble_payload("base-1", &selection, &draft),
            Err(PayloadError::MissingWorkType)
        );

        let mut draft = DraftForm::baseline();
        draft.set(
            FieldKey::WorkType,
            FieldValue::Choice(CascadeChoice::WorkType(12)),
        );
        assert_eq!(
            assemble_payload("base-1", &selection, &draft),
            Err(PayloadError::MissingZone)
        );
    }

    #[test]
    fn a_group_choice_is_not_submittable() {
        let mut selection = SelectionSet::new();
        selection.add(emp("e1"));
        let mut draft = ready_draft();
        draft.set(
            FieldKey::WorkType,
            FieldValue::Choice(CascadeChoice::Group(2)),
        );
        assert_eq!(
            assemble_payload("base-1", &selection, &draft),
            Err(PayloadError::GroupNotSubmittable)
        );
    }
}
