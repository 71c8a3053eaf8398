use crate::Components::component::{Component, ComponentError};
use log::info;
use nalgebra::DMatrix;
use prettytable::{Table, row};
use std::collections::HashMap;

// Column layout of the compiled conversion-factor matrix.
pub const COL_I_C: usize = 0;
pub const COL_I_N: usize = 1;
pub const COL_I_P: usize = 2;
pub const COL_I_K: usize = 3;
pub const COL_I_MG: usize = 4;
pub const COL_I_CA: usize = 5;
pub const COL_I_MASS: usize = 6;
pub const COL_I_CHARGE: usize = 7;
pub const COL_I_COD: usize = 8;
pub const COL_I_NOD: usize = 9;
pub const COL_F_BOD5_COD: usize = 10;
pub const COL_F_UBOD_COD: usize = 11;
pub const COL_F_VMASS_TOTMASS: usize = 12;
pub const N_FACTOR_COLUMNS: usize = 13;

/// An ordered collection of unique components, mutable until compiled.
#[derive(Debug, Clone, Default)]
pub struct ComponentSet {
    vec_of_components: Vec<Component>,
    map_of_indices: HashMap<String, usize>,
}

impl ComponentSet {
    pub fn new() -> Self {
        Self {
            vec_of_components: Vec::new(),
            map_of_indices: HashMap::new(),
        }
    }

    pub fn from_components(components: Vec<Component>) -> Result<Self, ComponentError> {
        let mut set = Self::new();
        for component in components {
            set.append(component)?;
        }
        Ok(set)
    }

    pub fn append(&mut self, component: Component) -> Result<(), ComponentError> {
        if self.map_of_indices.contains_key(&component.id) {
            return Err(ComponentError::DuplicateId(component.id.clone()));
        }
        self.map_of_indices
            .insert(component.id.clone(), self.vec_of_components.len());
        self.vec_of_components.push(component);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vec_of_components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec_of_components.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.vec_of_components
            .iter()
            .map(|component| component.id.clone())
            .collect()
    }

    /// Validates every component and freezes the set, building the
    /// id -> index map and the dense matrix of conversion factors (one row
    /// per component, one column per ratio or fraction) used by the
    /// composite calculations.
    pub fn compile(self) -> Result<CompiledComponents, ComponentError> {
        for component in &self.vec_of_components {
            component.validate()?;
        }
        let n_components = self.vec_of_components.len();
        let mut factor_matrix = DMatrix::zeros(n_components, N_FACTOR_COLUMNS);
        for (i, component) in self.vec_of_components.iter().enumerate() {
            let r = component.ratios();
            factor_matrix[(i, COL_I_C)] = r.i_C;
            factor_matrix[(i, COL_I_N)] = r.i_N;
            factor_matrix[(i, COL_I_P)] = r.i_P;
            factor_matrix[(i, COL_I_K)] = r.i_K;
            factor_matrix[(i, COL_I_MG)] = r.i_Mg;
            factor_matrix[(i, COL_I_CA)] = r.i_Ca;
            factor_matrix[(i, COL_I_MASS)] = r.i_mass;
            factor_matrix[(i, COL_I_CHARGE)] = r.i_charge;
            factor_matrix[(i, COL_I_COD)] = r.i_COD;
            factor_matrix[(i, COL_I_NOD)] = r.i_NOD;
            factor_matrix[(i, COL_F_BOD5_COD)] = component.f_BOD5_COD;
            factor_matrix[(i, COL_F_UBOD_COD)] = component.f_uBOD_COD;
            factor_matrix[(i, COL_F_VMASS_TOTMASS)] = component.f_Vmass_Totmass;
        }
        info!("compiled component registry with {} components", n_components);
        Ok(CompiledComponents {
            components: self.vec_of_components,
            index_map: self.map_of_indices,
            factor_matrix,
        })
    }
}

/// A compiled, immutable component registry.
#[derive(Debug, Clone)]
pub struct CompiledComponents {
    components: Vec<Component>,
    index_map: HashMap<String, usize>,
    factor_matrix: DMatrix<f64>,
}

impl CompiledComponents {
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.components
            .iter()
            .map(|component| component.id.clone())
            .collect()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.index_of(id).map(|index| &self.components[index])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_map.get(id).copied()
    }

    pub fn factor_matrix(&self) -> &DMatrix<f64> {
        &self.factor_matrix
    }

    /// conversion factor of one component, by row index and COL_ constant
    pub fn factor(&self, index: usize, column: usize) -> f64 {
        self.factor_matrix[(index, column)]
    }

    pub fn molar_mass_of(&self, id: &str) -> Option<f64> {
        self.get(id).and_then(|component| component.molar_mass)
    }

    /// Prints a table of the registry with the most used conversion factors.
    pub fn print_components_summary(&self) {
        let mut table = Table::new();
        table.add_row(row![
            "id",
            "formula",
            "measured as",
            "particle size",
            "degradability",
            "organic",
            "i_COD",
            "i_N",
            "i_P",
            "i_mass"
        ]);
        for component in &self.components {
            let r = component.ratios();
            table.add_row(row![
                component.id,
                component.formula.clone().unwrap_or_default(),
                component.measured_as.as_str(),
                component.particle_size.as_str(),
                component.degradability.as_str(),
                component.organic,
                format!("{:.4}", r.i_COD),
                format!("{:.4}", r.i_N),
                format!("{:.4}", r.i_P),
                format!("{:.4}", r.i_mass)
            ]);
        }
        table.printstd();
    }
}
