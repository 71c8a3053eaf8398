use crate::Components::component::{Component, ComponentError, ComponentRecord};
use log::{info, warn};
use prettytable::{Table, row};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use thiserror::Error;

/// JSON document with the default component records shipped with the crate
pub const DEFAULT_COMPONENTS_JSON: &str = include_str!("default_components.json");

#[derive(Debug, Error)]
pub enum ComponentLibError {
    #[error("failed to parse component library: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read or write component library file: {0}")]
    Io(#[from] std::io::Error),
    #[error("duplicate record id '{0}' in component library")]
    Duplicate(String),
    #[error("no record with id '{0}' in component library")]
    NotFound(String),
    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// Basis functionality to search in the library of component records
pub struct ComponentLib {
    /// records in library order
    pub records: Vec<ComponentRecord>,
}

impl ComponentLib {
    /// Opens the default library embedded in the crate.
    pub fn new() -> Result<Self, ComponentLibError> {
        Self::from_json_str(DEFAULT_COMPONENTS_JSON)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ComponentLibError> {
        let records: Vec<ComponentRecord> = serde_json::from_str(json)?;
        let lib = Self { records };
        lib.check_unique()?;
        info!("component library opened with {} records", lib.records.len());
        Ok(lib)
    }

    fn check_unique(&self) -> Result<(), ComponentLibError> {
        let mut seen = HashSet::new();
        for record in &self.records {
            if !seen.insert(record.id.clone()) {
                return Err(ComponentLibError::Duplicate(record.id.clone()));
            }
        }
        Ok(())
    }

    /// ids of all records in library order
    pub fn ids(&self) -> Vec<String> {
        self.records.iter().map(|record| record.id.clone()).collect()
    }

    pub fn get_record(&self, id: &str) -> Option<&ComponentRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// append a user record to the library
    pub fn append_record(&mut self, record: ComponentRecord) -> Result<(), ComponentLibError> {
        if self.get_record(&record.id).is_some() {
            warn!("record '{}' already present in the library", record.id);
            return Err(ComponentLibError::Duplicate(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    /// remove a record from the library
    pub fn remove_by_name(&mut self, id: &str) -> Result<(), ComponentLibError> {
        let position = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| ComponentLibError::NotFound(id.to_string()))?;
        self.records.remove(position);
        Ok(())
    }

    /// Materializes every record into a Component, in library order.
    pub fn to_components(&self) -> Result<Vec<Component>, ComponentLibError> {
        self.records
            .iter()
            .cloned()
            .map(|record| record.into_component().map_err(ComponentLibError::from))
            .collect()
    }

    /// Materializes a chosen subset of records, in the order given.
    pub fn subset(&self, ids: &[&str]) -> Result<Vec<Component>, ComponentLibError> {
        ids.iter()
            .map(|id| {
                let record = self
                    .get_record(id)
                    .ok_or_else(|| ComponentLibError::NotFound(id.to_string()))?;
                record.clone().into_component().map_err(ComponentLibError::from)
            })
            .collect()
    }

    ///////////////////INPUT/OUTPUT/////////////////////////////////////////////////
    pub fn save_to_json(&self, filename: &str) -> Result<(), ComponentLibError> {
        let json = serde_json::to_string_pretty(&self.records)?;
        let mut file = File::create(filename)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn load_from_json(filename: &str) -> Result<Self, ComponentLibError> {
        let mut file = File::open(filename)?;
        let mut file_contents = String::new();
        file.read_to_string(&mut file_contents)?;
        Self::from_json_str(&file_contents)
    }

    /// Prints a table of the library records.
    pub fn print_library_summary(&self) {
        let mut table = Table::new();
        table.add_row(row![
            "id",
            "formula",
            "measured as",
            "particle size",
            "degradability",
            "organic"
        ]);
        for record in &self.records {
            table.add_row(row![
                record.id,
                record.formula.clone().unwrap_or_default(),
                record.measured_as.clone().unwrap_or_default(),
                record.particle_size,
                record.degradability,
                record.organic
            ]);
        }
        table.printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_library_materializes() {
        let lib = ComponentLib::new().unwrap();
        assert_eq!(lib.records.len(), 21);
        let components = lib.to_components().unwrap();
        assert_eq!(components.len(), lib.records.len());
        for component in &components {
            component.validate().unwrap();
        }
    }

    #[test]
    fn test_default_library_values() {
        let lib = ComponentLib::new().unwrap();
        let components = lib.subset(&["S_NO3", "S_O2", "S_CO3"]).unwrap();
        // nitrate: electron acceptor measured as N
        assert_relative_eq!(components[0].ratios().i_COD, -4.569, epsilon = 1e-2);
        // dissolved oxygen: -1 g COD per g O2
        assert_relative_eq!(components[1].ratios().i_COD, -1.0, epsilon = 1e-3);
        // carbonate measured as C
        assert_relative_eq!(components[2].ratios().i_mass, 60.008 / 12.011, epsilon = 1e-3);
    }

    #[test]
    fn test_subset_unknown_id() {
        let lib = ComponentLib::new().unwrap();
        assert!(matches!(
            lib.subset(&["S_Unobtainium"]),
            Err(ComponentLibError::NotFound(_))
        ));
    }

    #[test]
    fn test_append_and_remove() {
        let mut lib = ComponentLib::new().unwrap();
        let n_records = lib.records.len();
        let record = ComponentRecord {
            id: "S_Glc".to_string(),
            formula: Some("C6H12O6".to_string()),
            measured_as: Some("COD".to_string()),
            particle_size: "Soluble".to_string(),
            degradability: "Readily".to_string(),
            organic: true,
            ratios: Default::default(),
            description: "Glucose".to_string(),
        };
        lib.append_record(record.clone()).unwrap();
        assert_eq!(lib.records.len(), n_records + 1);
        assert!(matches!(
            lib.append_record(record),
            Err(ComponentLibError::Duplicate(_))
        ));
        lib.remove_by_name("S_Glc").unwrap();
        assert_eq!(lib.records.len(), n_records);
        assert!(matches!(
            lib.remove_by_name("S_Glc"),
            Err(ComponentLibError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_components.json");
        let path = path.to_str().unwrap();

        let lib = ComponentLib::new().unwrap();
        lib.save_to_json(path).unwrap();
        let reloaded = ComponentLib::load_from_json(path).unwrap();
        assert_eq!(reloaded.ids(), lib.ids());
    }
}
