use serde::{Deserialize, Serialize};

use crate::cascade::CascadeChoice;

/// Closed set of work-record form fields.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    EmployeeIds,
    WorkType,
    PieceUnit,
    PieceCount,
    WorkTimeHour,
    Zone,
    PlantingArea,
    Category,
    Remark,
    StartTime,
    EndTime,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::EmployeeIds => "employee_ids",
            FieldKey::WorkType => "work_type",
            FieldKey::PieceUnit => "piece_unit",
            FieldKey::PieceCount => "piece_count",
            FieldKey::WorkTimeHour => "work_time_hour",
            FieldKey::Zone => "zone",
            FieldKey::PlantingArea => "planting_area",
            FieldKey::Category => "category",
            FieldKey::Remark => "remark",
            FieldKey::StartTime => "start_time",
            FieldKey::EndTime => "end_time",
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);

impl std::str::FromStr for FieldKey {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee_ids" => Ok(FieldKey::EmployeeIds),
            "work_type" => Ok(FieldKey::WorkType),
            "piece_unit" => Ok(FieldKey::PieceUnit),
            "piece_count" => Ok(FieldKey::PieceCount),
            "work_time_hour" => Ok(FieldKey::WorkTimeHour),
            "zone" => Ok(FieldKey::Zone),
            "planting_area" => Ok(FieldKey::PlantingArea),
            "category" => Ok(FieldKey::Category),
            "remark" => Ok(FieldKey::Remark),
            "start_time" => Ok(FieldKey::StartTime),
            "end_time" => Ok(FieldKey::EndTime),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Tagged form value. Which variant a field carries is per-field convention;
/// the draft store itself does not validate.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Ids(Vec<String>),
    Id(i64),
    Count(u32),
    Hours(f64),
    Text(String),
    Instant(i64),
    Choice(CascadeChoice),
}

impl FieldValue {
    pub fn as_ids(&self) -> Option<&[String]> {
        match self {
            FieldValue::Ids(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<i64> {
        match self {
            FieldValue::Id(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u32> {
        match self {
            FieldValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_hours(&self) -> Option<f64> {
        match self {
            FieldValue::Hours(h) => Some(*h),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_instant(&self) -> Option<i64> {
        match self {
            FieldValue::Instant(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<CascadeChoice> {
        match self {
            FieldValue::Choice(c) => Some(*c),
            _ => None,
        }
    }
}
