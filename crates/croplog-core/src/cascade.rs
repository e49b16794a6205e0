use serde::{Deserialize, Serialize};

/// A pick inside the work-type cascader.
///
/// Group nodes can be landed on mid-drill; only a leaf work type is
/// submittable. Decoding is by pattern matching, never by splitting a
/// composite string token.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CascadeChoice {
    Group(i64),
    WorkType(i64),
}

impl CascadeChoice {
    /// The leaf work-type id, if this choice is submittable.
    pub fn work_type_id(&self) -> Option<i64> {
        match self {
            CascadeChoice::WorkType(id) => Some(*id),
            CascadeChoice::Group(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_leaf_choices_are_submittable() {
        assert_eq!(CascadeChoice::WorkType(12).work_type_id(), Some(12));
        assert_eq!(CascadeChoice::Group(3).work_type_id(), None);
    }
}
