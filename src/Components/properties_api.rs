use crate::Components::molmass::{
    FormulaError, calculate_molar_mass, extract_charge, parse_formula,
};
use enum_dispatch::enum_dispatch;
use std::collections::HashMap;

/// The seam towards the chemical-properties provider: everything the
/// registry and the streams need to know about a species that is not encoded
/// in its conversion ratios.
#[enum_dispatch]
pub trait PropertyCalculator {
    /// molar mass, g/mol
    fn molar_mass(&self, name: &str) -> Result<f64, FormulaError>;
    /// atomic composition of the species
    fn composition(&self, name: &str) -> Result<HashMap<String, usize>, FormulaError>;
    /// ionic charge per molecule
    fn charge(&self, name: &str) -> Result<i32, FormulaError>;
}

/// Calculator working directly off the chemical formula and the embedded
/// atomic-mass table.
#[derive(Debug, Clone, Default)]
pub struct FormulaProps {
    /// special chemical groups (Me, Ph, ...) and their atomic composition
    pub groups: Option<HashMap<String, HashMap<String, usize>>>,
}

impl PropertyCalculator for FormulaProps {
    fn molar_mass(&self, name: &str) -> Result<f64, FormulaError> {
        let (molar_mass, _) = calculate_molar_mass(name.to_string(), self.groups.clone())?;
        Ok(molar_mass)
    }

    fn composition(&self, name: &str) -> Result<HashMap<String, usize>, FormulaError> {
        parse_formula(name.to_string(), self.groups.clone())
    }

    fn charge(&self, name: &str) -> Result<i32, FormulaError> {
        Ok(extract_charge(name).1)
    }
}

/// Calculator backed by user-tabulated data, for species without a parseable
/// formula (lumped substrates, commercial mixtures). Keys are the names the
/// registry or the stream will ask for, usually component ids.
#[derive(Debug, Clone, Default)]
pub struct TabulatedProps {
    pub molar_masses: HashMap<String, f64>,
    pub compositions: HashMap<String, HashMap<String, usize>>,
    pub charges: HashMap<String, i32>,
}

impl TabulatedProps {
    pub fn set_molar_mass(&mut self, name: &str, value: f64) {
        self.molar_masses.insert(name.to_string(), value);
    }
}

impl PropertyCalculator for TabulatedProps {
    fn molar_mass(&self, name: &str) -> Result<f64, FormulaError> {
        self.molar_masses
            .get(name)
            .copied()
            .ok_or(FormulaError::NoData(name.to_string()))
    }

    fn composition(&self, name: &str) -> Result<HashMap<String, usize>, FormulaError> {
        self.compositions
            .get(name)
            .cloned()
            .ok_or(FormulaError::NoData(name.to_string()))
    }

    fn charge(&self, name: &str) -> Result<i32, FormulaError> {
        Ok(self.charges.get(name).copied().unwrap_or(0))
    }
}

#[enum_dispatch(PropertyCalculator)]
#[derive(Debug, Clone)]
pub enum PropsEnum {
    Formula(FormulaProps),
    Tabulated(TabulatedProps),
}

pub fn create_props_calculator_by_name(name: &str) -> PropsEnum {
    match name {
        "tabulated" => PropsEnum::Tabulated(TabulatedProps::default()),
        _ => PropsEnum::Formula(FormulaProps::default()),
    }
}
