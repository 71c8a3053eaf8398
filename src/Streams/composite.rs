use crate::Components::component::{Component, Degradability, ParticleSize};
use crate::Components::registry::{
    COL_F_BOD5_COD, COL_F_UBOD_COD, COL_F_VMASS_TOTMASS, COL_I_C, COL_I_CA, COL_I_CHARGE,
    COL_I_COD, COL_I_K, COL_I_MASS, COL_I_MG, COL_I_N, COL_I_NOD, COL_I_P, CompiledComponents,
};

/// The target quantity of a composite request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeVariable {
    COD,
    BOD,
    UBOD,
    NOD,
    C,
    N,
    P,
    K,
    Mg,
    Ca,
    Solids,
    Charge,
}

impl CompositeVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::COD => "COD",
            Self::BOD => "BOD",
            Self::UBOD => "uBOD",
            Self::NOD => "NOD",
            Self::C => "C",
            Self::N => "N",
            Self::P => "P",
            Self::K => "K",
            Self::Mg => "Mg",
            Self::Ca => "Ca",
            Self::Solids => "solids",
            Self::Charge => "charge",
        }
    }

    /// unit of the concentration returned for this variable
    pub fn unit(&self) -> &'static str {
        match self {
            Self::COD | Self::BOD | Self::UBOD | Self::NOD => "g O2/m3",
            Self::C => "g C/m3",
            Self::N => "g N/m3",
            Self::P => "g P/m3",
            Self::K => "g K/m3",
            Self::Mg => "g Mg/m3",
            Self::Ca => "g Ca/m3",
            Self::Solids => "g/m3",
            Self::Charge => "mol/m3",
        }
    }
}

/// Predicates restricting a composite request to part of the registry. All
/// present filters must hold for a component to contribute.
#[derive(Debug, Clone, Default)]
pub struct CompositeFilters {
    pub particle_size: Option<ParticleSize>,
    pub degradability: Option<Degradability>,
    pub organic: Option<bool>,
    /// Solids requests only: Some(true) keeps the volatile part of each
    /// component's mass (times f_Vmass_Totmass), Some(false) the fixed part
    /// (times 1 - f_Vmass_Totmass), None the whole of it.
    pub volatile: Option<bool>,
    /// restrict to this subset of component ids
    pub specification: Option<Vec<String>>,
}

impl CompositeFilters {
    pub fn none() -> Self {
        Self::default()
    }
}

fn component_passes(component: &Component, filters: &CompositeFilters) -> bool {
    if let Some(particle_size) = filters.particle_size {
        if component.particle_size != particle_size {
            return false;
        }
    }
    if let Some(degradability) = filters.degradability {
        if component.degradability != degradability {
            return false;
        }
    }
    if let Some(organic) = filters.organic {
        if component.organic != organic {
            return false;
        }
    }
    if let Some(specification) = &filters.specification {
        if !specification.iter().any(|id| *id == component.id) {
            return false;
        }
    }
    true
}

fn factor_column(variable: CompositeVariable) -> usize {
    match variable {
        CompositeVariable::COD | CompositeVariable::BOD | CompositeVariable::UBOD => COL_I_COD,
        CompositeVariable::NOD => COL_I_NOD,
        CompositeVariable::C => COL_I_C,
        CompositeVariable::N => COL_I_N,
        CompositeVariable::P => COL_I_P,
        CompositeVariable::K => COL_I_K,
        CompositeVariable::Mg => COL_I_MG,
        CompositeVariable::Ca => COL_I_CA,
        CompositeVariable::Solids => COL_I_MASS,
        CompositeVariable::Charge => COL_I_CHARGE,
    }
}

/// The composite kernel: filters the component set, multiplies each matching
/// component's flow by its conversion factor for the requested variable and
/// sums. Flows are per-day amounts of each component's measured basis; the
/// result is the per-day amount of the target quantity (kg/d, kmol/d for
/// Charge). BOD and uBOD scale the COD factor by the respective per-component
/// fraction, volatile/fixed solids by the volatile mass fraction.
pub fn composite_of_flows(
    cmps: &CompiledComponents,
    flows: &[f64],
    variable: CompositeVariable,
    filters: &CompositeFilters,
) -> f64 {
    let column = factor_column(variable);
    let mut total = 0.0;
    for (index, component) in cmps.components().iter().enumerate() {
        if index >= flows.len() {
            break;
        }
        if !component_passes(component, filters) {
            continue;
        }
        let mut factor = cmps.factor(index, column);
        match variable {
            CompositeVariable::BOD => factor *= cmps.factor(index, COL_F_BOD5_COD),
            CompositeVariable::UBOD => factor *= cmps.factor(index, COL_F_UBOD_COD),
            CompositeVariable::Solids => match filters.volatile {
                Some(true) => factor *= cmps.factor(index, COL_F_VMASS_TOTMASS),
                Some(false) => factor *= 1.0 - cmps.factor(index, COL_F_VMASS_TOTMASS),
                None => {}
            },
            _ => {}
        }
        total += flows[index] * factor;
    }
    total
}
