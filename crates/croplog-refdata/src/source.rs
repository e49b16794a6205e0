use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use croplog_core::Employee;

use crate::models::{
    filter_employees, Category, EmployeeFilter, PlantingArea, Position, WorkType, ZoneNode,
};

/// Reference data the entry pages need.
///
/// Providers are opaque to the state core: no caching, no retries here, the
/// calling page owns both.
pub trait ReferenceSource {
    fn zones(&self) -> Result<Vec<ZoneNode>>;
    fn work_types(&self) -> Result<Vec<WorkType>>;
    /// Zone id → selectable planting areas within it.
    fn area_map(&self) -> Result<BTreeMap<i64, Vec<PlantingArea>>>;
    fn categories(&self) -> Result<Vec<Category>>;
    fn positions(&self) -> Result<Vec<Position>>;
    fn employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>>;
}

/// YAML files under `<root>/<base_id>/`, one file per dataset.
pub struct FileSource {
    base_dir: PathBuf,
}

impl FileSource {
    pub fn new(root: &Path, base_id: &str) -> Self {
        Self {
            base_dir: root.join(base_id),
        }
    }

    fn load<T: serde::de::DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.base_dir.join(file);
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("read reference data {}", path.display()))?;
        serde_yaml::from_str(&s).with_context(|| format!("parse {}", path.display()))
    }
}

impl ReferenceSource for FileSource {
    fn zones(&self) -> Result<Vec<ZoneNode>> {
        self.load("zones.yaml")
    }

    fn work_types(&self) -> Result<Vec<WorkType>> {
        let list: Vec<WorkType> = self.load("work_types.yaml")?;
        validate_work_types(&list)?;
        Ok(list)
    }

    fn area_map(&self) -> Result<BTreeMap<i64, Vec<PlantingArea>>> {
        self.load("area_map.yaml")
    }

    fn categories(&self) -> Result<Vec<Category>> {
        self.load("categories.yaml")
    }

    fn positions(&self) -> Result<Vec<Position>> {
        self.load("positions.yaml")
    }

    fn employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        let roster: Vec<Employee> = self.load("employees.yaml")?;
        Ok(filter_employees(&roster, filter))
    }
}

/// A duplicate id would silently lose an entry in the lookup map.
pub fn validate_work_types(list: &[WorkType]) -> Result<()> {
    let mut seen = HashSet::new();
    for wt in list {
        if !seen.insert(wt.id) {
            return Err(anyhow!("duplicate work type id {}", wt.id));
        }
    }
    Ok(())
}
