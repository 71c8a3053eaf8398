use crate::Components::component::{Component, ComponentRecord};
use crate::Components::registry::ComponentSet;
use log::{error, info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub struct LoadComponents {
    pub file_name: String,
}

impl LoadComponents {
    pub fn new(file_name: String) -> Self {
        LoadComponents { file_name }
    }

    pub fn load_records(&self) -> Result<Vec<ComponentRecord>, String> {
        load_records_from_file(&self.file_name)
    }

    pub fn load_component_set(&self) -> Result<ComponentSet, String> {
        load_component_set_from_file(&self.file_name)
    }
}

/// Parses a JSON document holding an array of component records.
pub fn load_records_from_file(file_name: &str) -> Result<Vec<ComponentRecord>, String> {
    let path = Path::new(file_name);
    if !path.exists() {
        error!("file '{}' does not exist", file_name);
        return Err(format!("File '{}' does not exist", file_name));
    }

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Err(format!("Failed to open file '{}': {}", file_name, e)),
    };
    let mut contents = String::new();
    if let Err(e) = file.read_to_string(&mut contents) {
        return Err(format!("Failed to read file '{}': {}", file_name, e));
    }

    let records: Vec<ComponentRecord> = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse component records from '{}': {}", file_name, e))?;
    info!(
        "loaded {} component records from '{}'",
        records.len(),
        file_name
    );
    Ok(records)
}

/// Loads a user component set from a JSON file. Records that fail to
/// materialize into components are skipped with a warning; a file with no
/// valid record is an error.
pub fn load_component_set_from_file(file_name: &str) -> Result<ComponentSet, String> {
    let records = load_records_from_file(file_name)?;
    let mut valid: Vec<Component> = Vec::new();
    let mut skipped = 0usize;
    for record in records {
        let id = record.id.clone();
        match record.into_component() {
            Ok(component) => valid.push(component),
            Err(e) => {
                warn!("skipping record '{}': {}", id, e);
                skipped += 1;
            }
        }
    }
    if valid.is_empty() {
        return Err(format!("No valid component records in file '{}'", file_name));
    }
    if skipped > 0 {
        warn!("{} records skipped while loading '{}'", skipped, file_name);
    }
    ComponentSet::from_components(valid)
        .map_err(|e| format!("Failed to build component set from '{}': {}", file_name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const USER_COMPONENTS: &str = r#"[
        {
            "id": "S_Glc",
            "formula": "C6H12O6",
            "measured_as": "COD",
            "particle_size": "Soluble",
            "degradability": "Readily",
            "organic": true,
            "description": "Glucose"
        },
        {
            "id": "S_broken",
            "formula": "C6H12O6",
            "measured_as": "COD",
            "particle_size": "NoSuchClass",
            "degradability": "Readily",
            "organic": true
        },
        {
            "id": "X_Ash",
            "particle_size": "Particulate",
            "degradability": "Undegradable",
            "organic": false,
            "ratios": { "f_Vmass_Totmass": 0.0 }
        }
    ]"#;

    #[test]
    fn test_load_component_set_skips_invalid_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_components.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(USER_COMPONENTS.as_bytes()).unwrap();

        let set = load_component_set_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(set.ids(), vec!["S_Glc".to_string(), "X_Ash".to_string()]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_records_from_file("no_such_components.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_loader_struct() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_components.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(USER_COMPONENTS.as_bytes()).unwrap();

        let loader = LoadComponents::new(path.to_str().unwrap().to_string());
        let records = loader.load_records().unwrap();
        assert_eq!(records.len(), 3);
    }
}
