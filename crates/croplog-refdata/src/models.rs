use std::collections::BTreeMap;

use croplog_core::{ClockIn, Employee};
use serde::{Deserialize, Serialize};

/// One node of the zone cascade. Any node can be picked as the record's zone;
/// the page drills to whatever depth the base is mapped at.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZoneNode {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub children: Vec<ZoneNode>,
}

/// Leaf work type. Group membership is carried flat; the cascade grouping is
/// derived with `group_work_types`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkType {
    pub id: i64,
    pub name: String,
    pub piece_unit_id: i64,
    pub piece_unit_name: String,
    pub group_id: i64,
    pub group_name: String,
}

/// One level of the work-type cascade: the group and its leaf work types.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkTypeGroup {
    pub id: i64,
    pub name: String,
    pub work_types: Vec<WorkType>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlantingArea {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub id: i64,
    pub name: String,
}

/// Roster query as sent by the selection page.
#[derive(Clone, Debug, Default)]
pub struct EmployeeFilter {
    pub position_id: Option<i64>,
    /// None matches everyone, the page's "all" tab.
    pub clock_in: Option<ClockIn>,
    /// Substring match over employee number and name, case-insensitive.
    pub keywords: Option<String>,
}

/// Depth-first lookup of a zone id anywhere in the cascade.
pub fn find_zone(zones: &[ZoneNode], id: i64) -> Option<&ZoneNode> {
    for zone in zones {
        if zone.id == id {
            return Some(zone);
        }
        if let Some(found) = find_zone(&zone.children, id) {
            return Some(found);
        }
    }
    None
}

/// Derive the cascade grouping, preserving first-seen group order.
pub fn group_work_types(work_types: &[WorkType]) -> Vec<WorkTypeGroup> {
    let mut groups: Vec<WorkTypeGroup> = Vec::new();
    for wt in work_types {
        match groups.iter_mut().find(|g| g.id == wt.group_id) {
            Some(group) => group.work_types.push(wt.clone()),
            None => groups.push(WorkTypeGroup {
                id: wt.group_id,
                name: wt.group_name.clone(),
                work_types: vec![wt.clone()],
            }),
        }
    }
    groups
}

/// Lookup map used to resolve a chosen work type's piece unit.
pub fn work_type_map(work_types: &[WorkType]) -> BTreeMap<i64, WorkType> {
    work_types.iter().map(|wt| (wt.id, wt.clone())).collect()
}

pub fn filter_employees(roster: &[Employee], filter: &EmployeeFilter) -> Vec<Employee> {
    let keywords = filter
        .keywords
        .as_deref()
        .map(str::to_lowercase)
        .filter(|k| !k.is_empty());
    roster
        .iter()
        .filter(|emp| match filter.position_id {
            Some(position_id) => emp.position_id == position_id,
            None => true,
        })
        .filter(|emp| match filter.clock_in {
            Some(clock_in) => emp.clock_in == Some(clock_in),
            None => true,
        })
        .filter(|emp| match &keywords {
            Some(k) => {
                emp.employee_no.to_lowercase().contains(k) || emp.name.to_lowercase().contains(k)
            }
            None => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wt(id: i64, group_id: i64, group_name: &str) -> WorkType {
        WorkType {
            id,
            name: format!("wt-{id}"),
            piece_unit_id: 1,
            piece_unit_name: "kg".to_string(),
            group_id,
            group_name: group_name.to_string(),
        }
    }

    fn emp(id: &str, no: &str, name: &str, position_id: i64, clock_in: Option<ClockIn>) -> Employee {
        Employee {
            id: id.to_string(),
            employee_no: no.to_string(),
            name: name.to_string(),
            position_id,
            position_name: "picker".to_string(),
            clock_in,
        }
    }

    #[test]
    fn find_zone_walks_the_whole_tree() {
        let zones = vec![ZoneNode {
            id: 1,
            name: "North".to_string(),
            code: "N".to_string(),
            children: vec![ZoneNode {
                id: 7,
                name: "N-7".to_string(),
                code: "N7".to_string(),
                children: vec![],
            }],
        }];
        assert_eq!(find_zone(&zones, 7).map(|z| z.name.as_str()), Some("N-7"));
        assert_eq!(find_zone(&zones, 99), None);
    }

    #[test]
    fn grouping_preserves_first_seen_order() {
        let list = vec![wt(10, 2, "harvest"), wt(11, 1, "plant"), wt(12, 2, "harvest")];
        let groups = group_work_types(&list);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "harvest");
        assert_eq!(groups[0].work_types.len(), 2);
        assert_eq!(groups[1].work_types.len(), 1);
    }

    #[test]
    fn map_resolves_piece_units() {
        let list = vec![wt(10, 1, "g"), wt(11, 1, "g")];
        let map = work_type_map(&list);
        assert_eq!(map.get(&10).map(|w| w.piece_unit_name.as_str()), Some("kg"));
        assert!(!map.contains_key(&99));
    }

    #[test]
    fn filter_matches_position_clock_in_and_keywords() {
        let roster = vec![
            emp("1", "1001", "Alice", 1, Some(ClockIn::Yes)),
            emp("2", "1002", "Bob", 1, Some(ClockIn::No)),
            emp("3", "2001", "Carol", 2, Some(ClockIn::Yes)),
        ];

        let by_position = filter_employees(
            &roster,
            &EmployeeFilter {
                position_id: Some(1),
                ..Default::default()
            },
        );
        assert_eq!(by_position.len(), 2);

        let clocked_in = filter_employees(
            &roster,
            &EmployeeFilter {
                clock_in: Some(ClockIn::Yes),
                ..Default::default()
            },
        );
        assert_eq!(clocked_in.len(), 2);

        let by_no = filter_employees(
            &roster,
            &EmployeeFilter {
                keywords: Some("100".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_no.len(), 2);

        let by_name = filter_employees(
            &roster,
            &EmployeeFilter {
                keywords: Some("caro".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "3");
    }

    #[test]
    fn empty_filter_returns_everyone() {
        let roster = vec![emp("1", "1001", "Alice", 1, None)];
        assert_eq!(filter_employees(&roster, &EmployeeFilter::default()).len(), 1);
    }
}
