use serde::{Deserialize, Serialize};

/// Clock-in status carried on the roster and used as a filter value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClockIn {
    Yes,
    No,
}

/// One selectable employee as shown on the selection page.
///
/// Identity is `id`; the remaining fields are display data and never enter
/// equality checks made by the selection set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: String,
    pub employee_no: String,
    pub name: String,
    pub position_id: i64,
    pub position_name: String,
    #[serde(default)]
    pub clock_in: Option<ClockIn>,
}
