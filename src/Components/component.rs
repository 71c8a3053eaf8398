use crate::Components::molmass::{
    FormulaError, atomic_mass, calculate_molar_mass_for_composition, extract_charge,
    parse_formula, theoretical_oxygen_demand,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// g O2 consumed per g N nitrified all the way to nitrate, 64/14.
pub const NITRIFICATION_DEMAND: f64 = 4.57;

/// Particle size class of a component in suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleSize {
    DissolvedGas,
    Soluble,
    Colloidal,
    Particulate,
}

pub const PARTICLE_SIZE_CLASSES: [ParticleSize; 4] = [
    ParticleSize::DissolvedGas,
    ParticleSize::Soluble,
    ParticleSize::Colloidal,
    ParticleSize::Particulate,
];

impl ParticleSize {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DissolvedGas" => Some(Self::DissolvedGas),
            "Soluble" => Some(Self::Soluble),
            "Colloidal" => Some(Self::Colloidal),
            "Particulate" => Some(Self::Particulate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::DissolvedGas => "DissolvedGas",
            Self::Soluble => "Soluble",
            Self::Colloidal => "Colloidal",
            Self::Particulate => "Particulate",
        }
    }
}

/// Degradability class of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Degradability {
    Readily,
    Slowly,
    Undegradable,
}

impl Degradability {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Readily" => Some(Self::Readily),
            "Slowly" => Some(Self::Slowly),
            "Undegradable" => Some(Self::Undegradable),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Readily => "Readily",
            Self::Slowly => "Slowly",
            Self::Undegradable => "Undegradable",
        }
    }
}

/// The quantity one gram of the component stands for in flow vectors and
/// concentrations: plain mass, g COD, or g of a single element (e.g. "N" for
/// ammonium given as g N).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasuredAs {
    Mass,
    COD,
    Element(String),
}

impl MeasuredAs {
    pub fn from_str(s: Option<&str>) -> Self {
        match s {
            None | Some("") => Self::Mass,
            Some("COD") => Self::COD,
            Some(element) => Self::Element(element.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Mass => "",
            Self::COD => "COD",
            Self::Element(element) => element,
        }
    }
}

/// The full set of conversion ratios of a component: grams of the target
/// quantity (mol of charge for i_charge) per gram of the measured basis.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConversionRatios {
    pub i_C: f64,
    pub i_N: f64,
    pub i_P: f64,
    pub i_K: f64,
    pub i_Mg: f64,
    pub i_Ca: f64,
    pub i_mass: f64,
    pub i_charge: f64,
    pub i_COD: f64,
    pub i_NOD: f64,
}

/// Ratio and fraction values supplied by the user for a component without a
/// formula (all of them), or alongside a formula (i_NOD and the f_ fractions
/// only; everything else is derived and must not be overwritten).
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RatioOverrides {
    pub i_C: Option<f64>,
    pub i_N: Option<f64>,
    pub i_P: Option<f64>,
    pub i_K: Option<f64>,
    pub i_Mg: Option<f64>,
    pub i_Ca: Option<f64>,
    pub i_mass: Option<f64>,
    pub i_charge: Option<f64>,
    pub i_COD: Option<f64>,
    pub i_NOD: Option<f64>,
    pub f_BOD5_COD: Option<f64>,
    pub f_uBOD_COD: Option<f64>,
    pub f_Vmass_Totmass: Option<f64>,
}

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("component '{id}': invalid formula")]
    Formula {
        id: String,
        #[source]
        source: FormulaError,
    },
    #[error("component '{id}' is measured as COD but its theoretical oxygen demand is not positive")]
    ZeroCodBasis { id: String },
    #[error("component '{id}' is measured as element '{element}' which is absent from formula '{formula}'")]
    MissingBasisElement {
        id: String,
        element: String,
        formula: String,
    },
    #[error("component '{id}' supplies no value for required ratio '{ratio}'")]
    MissingRatio { id: String, ratio: &'static str },
    #[error("component '{id}' has a formula, its conversion ratios are derived and must not be overwritten (offending ratio '{ratio}')")]
    ConflictingRatioSource { id: String, ratio: &'static str },
    #[error("component '{id}': ratio '{ratio}' = {value} is not usable")]
    InvalidRatio {
        id: String,
        ratio: &'static str,
        value: f64,
    },
    #[error("component '{id}': fraction '{name}' = {value} outside [0, 1]")]
    FractionOutOfRange {
        id: String,
        name: &'static str,
        value: f64,
    },
    #[error("duplicate component id '{0}'")]
    DuplicateId(String),
    #[error("unknown component id '{0}'")]
    UnknownId(String),
    #[error("component '{id}': unknown {what} class '{value}'")]
    UnknownClass {
        id: String,
        what: &'static str,
        value: String,
    },
}

/// One chemical constituent of a waste stream.
///
/// The conversion ratios are frozen at construction: either derived in full
/// from the formula, or supplied in full for formula-less components.
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Component {
    pub id: String,
    pub formula: Option<String>,
    /// parsed atomic composition, empty for formula-less components
    pub composition: HashMap<String, usize>,
    /// ionic charge per molecule
    pub charge: i32,
    /// g/mol, available only when a formula was given
    pub molar_mass: Option<f64>,
    pub measured_as: MeasuredAs,
    pub particle_size: ParticleSize,
    pub degradability: Degradability,
    pub organic: bool,
    ratios: ConversionRatios,
    /// g BOD5 per g COD of this component
    pub f_BOD5_COD: f64,
    /// g ultimate BOD per g COD of this component
    pub f_uBOD_COD: f64,
    /// volatile mass over total mass
    pub f_Vmass_Totmass: f64,
    pub description: String,
}

fn ratio_field_mut<'a>(ratios: &'a mut ConversionRatios, element: &str) -> Option<&'a mut f64> {
    match element {
        "C" => Some(&mut ratios.i_C),
        "N" => Some(&mut ratios.i_N),
        "P" => Some(&mut ratios.i_P),
        "K" => Some(&mut ratios.i_K),
        "Mg" => Some(&mut ratios.i_Mg),
        "Ca" => Some(&mut ratios.i_Ca),
        _ => None,
    }
}

impl Component {
    /// Builds a component from its chemical formula, deriving the whole set
    /// of conversion ratios from the atomic composition, the ionic charge and
    /// the theoretical oxygen demand, rescaled to the measured basis.
    ///
    /// i_NOD is the one ratio that cannot be read off the composition (it
    /// depends on whether the nitrogen is nitrifiable), so it may be supplied
    /// here; when it is not, degradable organic nitrogen is assumed
    /// nitrifiable and i_NOD defaults to 4.57 * i_N, otherwise 0.
    #[allow(non_snake_case)]
    pub fn from_formula(
        id: &str,
        formula: &str,
        measured_as: MeasuredAs,
        particle_size: ParticleSize,
        degradability: Degradability,
        organic: bool,
        i_NOD: Option<f64>,
    ) -> Result<Self, ComponentError> {
        let (bare, charge) = extract_charge(formula);
        let composition = parse_formula(bare, None).map_err(|source| ComponentError::Formula {
            id: id.to_string(),
            source,
        })?;
        let molar_mass = calculate_molar_mass_for_composition(&composition).map_err(|source| {
            ComponentError::Formula {
                id: id.to_string(),
                source,
            }
        })?;
        let mass_of = |element: &str| -> f64 {
            composition
                .get(element)
                .map(|count| atomic_mass(element).unwrap_or(0.0) * *count as f64)
                .unwrap_or(0.0)
        };
        let thod = theoretical_oxygen_demand(&composition, charge);
        // grams of the measured basis carried by one mole of the component
        let basis_per_mole = match &measured_as {
            MeasuredAs::Mass => molar_mass,
            MeasuredAs::COD => {
                if thod <= 0.0 {
                    return Err(ComponentError::ZeroCodBasis { id: id.to_string() });
                }
                thod
            }
            MeasuredAs::Element(element) => {
                let mass = mass_of(element);
                if mass <= 0.0 {
                    return Err(ComponentError::MissingBasisElement {
                        id: id.to_string(),
                        element: element.clone(),
                        formula: formula.to_string(),
                    });
                }
                mass
            }
        };
        let mut ratios = ConversionRatios {
            i_C: mass_of("C") / basis_per_mole,
            i_N: mass_of("N") / basis_per_mole,
            i_P: mass_of("P") / basis_per_mole,
            i_K: mass_of("K") / basis_per_mole,
            i_Mg: mass_of("Mg") / basis_per_mole,
            i_Ca: mass_of("Ca") / basis_per_mole,
            i_mass: molar_mass / basis_per_mole,
            i_charge: charge as f64 / basis_per_mole,
            i_COD: thod / basis_per_mole,
            i_NOD: 0.0,
        };
        ratios.i_NOD = match i_NOD {
            Some(value) => value,
            None if organic && degradability != Degradability::Undegradable => {
                NITRIFICATION_DEMAND * ratios.i_N
            }
            None => 0.0,
        };
        Ok(Self {
            id: id.to_string(),
            formula: Some(formula.to_string()),
            composition,
            charge,
            molar_mass: Some(molar_mass),
            measured_as,
            particle_size,
            degradability,
            organic,
            ratios,
            f_BOD5_COD: 0.0,
            f_uBOD_COD: 0.0,
            f_Vmass_Totmass: if organic { 1.0 } else { 0.0 },
            description: String::new(),
        })
    }

    /// Builds a formula-less component from user-supplied conversion ratios.
    /// Unsupplied ratios default to 0, except the basis ratio of the measured
    /// quantity (i_mass for a mass basis, i_COD for a COD basis, i_E for an
    /// element basis) which defaults to 1; i_mass itself must be supplied for
    /// any basis other than plain mass.
    pub fn from_ratios(
        id: &str,
        measured_as: MeasuredAs,
        particle_size: ParticleSize,
        degradability: Degradability,
        organic: bool,
        overrides: RatioOverrides,
    ) -> Result<Self, ComponentError> {
        let i_mass = match overrides.i_mass {
            Some(value) => value,
            None => match measured_as {
                MeasuredAs::Mass => 1.0,
                _ => {
                    return Err(ComponentError::MissingRatio {
                        id: id.to_string(),
                        ratio: "i_mass",
                    });
                }
            },
        };
        let mut ratios = ConversionRatios {
            i_C: overrides.i_C.unwrap_or(0.0),
            i_N: overrides.i_N.unwrap_or(0.0),
            i_P: overrides.i_P.unwrap_or(0.0),
            i_K: overrides.i_K.unwrap_or(0.0),
            i_Mg: overrides.i_Mg.unwrap_or(0.0),
            i_Ca: overrides.i_Ca.unwrap_or(0.0),
            i_mass,
            i_charge: overrides.i_charge.unwrap_or(0.0),
            i_COD: overrides.i_COD.unwrap_or(0.0),
            i_NOD: overrides.i_NOD.unwrap_or(0.0),
        };
        match &measured_as {
            MeasuredAs::Mass => {}
            MeasuredAs::COD => {
                if overrides.i_COD.is_none() {
                    ratios.i_COD = 1.0;
                }
            }
            MeasuredAs::Element(element) => {
                if let Some(field) = ratio_field_mut(&mut ratios, element) {
                    *field = 1.0;
                }
            }
        }
        Ok(Self {
            id: id.to_string(),
            formula: None,
            composition: HashMap::new(),
            charge: 0,
            molar_mass: None,
            measured_as,
            particle_size,
            degradability,
            organic,
            ratios,
            f_BOD5_COD: 0.0,
            f_uBOD_COD: 0.0,
            f_Vmass_Totmass: if organic { 1.0 } else { 0.0 },
            description: String::new(),
        })
    }

    pub fn ratios(&self) -> &ConversionRatios {
        &self.ratios
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    /// Sets the BOD and volatile-mass fractions, each within [0, 1].
    #[allow(non_snake_case)]
    pub fn set_fractions(
        &mut self,
        f_BOD5_COD: f64,
        f_uBOD_COD: f64,
        f_Vmass_Totmass: f64,
    ) -> Result<(), ComponentError> {
        for (name, value) in [
            ("f_BOD5_COD", f_BOD5_COD),
            ("f_uBOD_COD", f_uBOD_COD),
            ("f_Vmass_Totmass", f_Vmass_Totmass),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ComponentError::FractionOutOfRange {
                    id: self.id.clone(),
                    name,
                    value,
                });
            }
        }
        self.f_BOD5_COD = f_BOD5_COD;
        self.f_uBOD_COD = f_uBOD_COD;
        self.f_Vmass_Totmass = f_Vmass_Totmass;
        Ok(())
    }

    /// Whether the nitrogen of this component counts towards Total Kjeldahl
    /// Nitrogen. Oxidized inorganic nitrogen species carry no hydrogen
    /// (NO2-, NO3-, N2), reduced ones do (NH4+), which is the discriminator
    /// used here; components without a formula are taken as Kjeldahl.
    pub fn is_kjeldahl_nitrogen(&self) -> bool {
        if self.ratios.i_N == 0.0 || self.organic || self.composition.is_empty() {
            return true;
        }
        let has_n = self.composition.contains_key("N");
        let has_h = self.composition.contains_key("H");
        !(has_n && !has_h)
    }

    /// Value-level validation run at registry compile time: every ratio must
    /// be finite, i_mass positive, fractions within [0, 1].
    pub fn validate(&self) -> Result<(), ComponentError> {
        let r = &self.ratios;
        for (name, value) in [
            ("i_C", r.i_C),
            ("i_N", r.i_N),
            ("i_P", r.i_P),
            ("i_K", r.i_K),
            ("i_Mg", r.i_Mg),
            ("i_Ca", r.i_Ca),
            ("i_charge", r.i_charge),
            ("i_COD", r.i_COD),
            ("i_NOD", r.i_NOD),
        ] {
            if !value.is_finite() {
                return Err(ComponentError::InvalidRatio {
                    id: self.id.clone(),
                    ratio: name,
                    value,
                });
            }
        }
        if !(r.i_mass > 0.0 && r.i_mass.is_finite()) {
            return Err(ComponentError::InvalidRatio {
                id: self.id.clone(),
                ratio: "i_mass",
                value: r.i_mass,
            });
        }
        for (name, value) in [
            ("f_BOD5_COD", self.f_BOD5_COD),
            ("f_uBOD_COD", self.f_uBOD_COD),
            ("f_Vmass_Totmass", self.f_Vmass_Totmass),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ComponentError::FractionOutOfRange {
                    id: self.id.clone(),
                    name,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Serializable form of a component, the schema of library and user JSON
/// files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub id: String,
    #[serde(default)]
    pub formula: Option<String>,
    /// None or "" for a plain mass basis, "COD", or an element symbol
    #[serde(default)]
    pub measured_as: Option<String>,
    pub particle_size: String,
    pub degradability: String,
    pub organic: bool,
    #[serde(default)]
    pub ratios: RatioOverrides,
    #[serde(default)]
    pub description: String,
}

impl ComponentRecord {
    pub fn into_component(self) -> Result<Component, ComponentError> {
        let particle_size = ParticleSize::from_str(&self.particle_size).ok_or_else(|| {
            ComponentError::UnknownClass {
                id: self.id.clone(),
                what: "particle size",
                value: self.particle_size.clone(),
            }
        })?;
        let degradability = Degradability::from_str(&self.degradability).ok_or_else(|| {
            ComponentError::UnknownClass {
                id: self.id.clone(),
                what: "degradability",
                value: self.degradability.clone(),
            }
        })?;
        let measured_as = MeasuredAs::from_str(self.measured_as.as_deref());
        let mut component = match &self.formula {
            Some(formula) => {
                // conversion ratios of a formula component are derived in
                // full, only i_NOD and the f_ fractions may be supplied
                for (name, value) in [
                    ("i_C", self.ratios.i_C),
                    ("i_N", self.ratios.i_N),
                    ("i_P", self.ratios.i_P),
                    ("i_K", self.ratios.i_K),
                    ("i_Mg", self.ratios.i_Mg),
                    ("i_Ca", self.ratios.i_Ca),
                    ("i_mass", self.ratios.i_mass),
                    ("i_charge", self.ratios.i_charge),
                    ("i_COD", self.ratios.i_COD),
                ] {
                    if value.is_some() {
                        return Err(ComponentError::ConflictingRatioSource {
                            id: self.id.clone(),
                            ratio: name,
                        });
                    }
                }
                Component::from_formula(
                    &self.id,
                    formula,
                    measured_as,
                    particle_size,
                    degradability,
                    self.organic,
                    self.ratios.i_NOD,
                )?
            }
            None => Component::from_ratios(
                &self.id,
                measured_as,
                particle_size,
                degradability,
                self.organic,
                self.ratios,
            )?,
        };
        let f_bod5 = self.ratios.f_BOD5_COD.unwrap_or(component.f_BOD5_COD);
        let f_ubod = self.ratios.f_uBOD_COD.unwrap_or(component.f_uBOD_COD);
        let f_vmass = self.ratios.f_Vmass_Totmass.unwrap_or(component.f_Vmass_Totmass);
        component.set_fractions(f_bod5, f_ubod, f_vmass)?;
        component.set_description(&self.description);
        Ok(component)
    }
}
