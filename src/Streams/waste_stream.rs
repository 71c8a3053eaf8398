use crate::Components::component::ParticleSize;
use crate::Components::properties_api::{PropertyCalculator, PropsEnum};
use crate::Components::registry::{COL_I_MASS, CompiledComponents};
use crate::Streams::composite::{CompositeFilters, CompositeVariable, composite_of_flows};
use log::debug;
use prettytable::{Table, row};
use std::sync::Arc;
use thiserror::Error;

/// g CaCO3 per mol of charge equivalents, 100/2.
const ALKALINITY_CACO3: f64 = 50.0;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("flow vector has {got} entries but the registry has {expected} components")]
    FlowLengthMismatch { expected: usize, got: usize },
    #[error("unknown component id '{0}'")]
    UnknownComponent(String),
    #[error("negative flow {flow} for component '{id}'")]
    NegativeFlow { id: String, flow: f64 },
    #[error("no molar mass available for component '{0}'")]
    NoMolarMass(String),
    #[error("density must be positive, got {0}")]
    BadDensity(f64),
}

/// A composite wastewater stream: a compiled registry reference, one flow per
/// component in the units of that component's measured basis (kg/d), and the
/// stream state.
#[derive(Debug, Clone)]
pub struct WasteStream {
    components: Arc<CompiledComponents>,
    /// kg/d of each component's measured basis, registry order
    mass_flows: Vec<f64>,
    /// K
    pub temperature: f64,
    /// Pa
    pub pressure: f64,
    pub phase: char,
    /// kg/m3, used to derive the volumetric flow from the total mass flow
    density: f64,
}

impl WasteStream {
    /// An empty stream over the given registry at 298.15 K and 1 atm.
    pub fn new(components: Arc<CompiledComponents>) -> Self {
        let n_components = components.len();
        Self {
            components,
            mass_flows: vec![0.0; n_components],
            temperature: 298.15,
            pressure: 101325.0,
            phase: 'l',
            density: 1000.0,
        }
    }

    /// A stream from per-component flows, kg/d of each component's measured
    /// basis, in registry order.
    pub fn from_mass_flows(
        components: Arc<CompiledComponents>,
        mass_flows: Vec<f64>,
    ) -> Result<Self, StreamError> {
        if mass_flows.len() != components.len() {
            return Err(StreamError::FlowLengthMismatch {
                expected: components.len(),
                got: mass_flows.len(),
            });
        }
        for (index, flow) in mass_flows.iter().enumerate() {
            if *flow < 0.0 {
                return Err(StreamError::NegativeFlow {
                    id: components.components()[index].id.clone(),
                    flow: *flow,
                });
            }
        }
        let mut stream = Self::new(components);
        stream.mass_flows = mass_flows;
        Ok(stream)
    }

    /// A stream from per-component molar flows, kmol/d, in registry order.
    /// The molar mass comes from the component formula when there is one,
    /// otherwise from the supplied properties calculator (looked up by the
    /// component id).
    pub fn from_molar_flows(
        components: Arc<CompiledComponents>,
        molar_flows: Vec<f64>,
        props: &PropsEnum,
    ) -> Result<Self, StreamError> {
        if molar_flows.len() != components.len() {
            return Err(StreamError::FlowLengthMismatch {
                expected: components.len(),
                got: molar_flows.len(),
            });
        }
        let mut mass_flows = vec![0.0; components.len()];
        for (index, component) in components.components().iter().enumerate() {
            let flow = molar_flows[index];
            if flow == 0.0 {
                continue;
            }
            if flow < 0.0 {
                return Err(StreamError::NegativeFlow {
                    id: component.id.clone(),
                    flow,
                });
            }
            let molar_mass = match component.molar_mass {
                Some(value) => value,
                None => props
                    .molar_mass(component.formula.as_deref().unwrap_or(&component.id))
                    .map_err(|_| StreamError::NoMolarMass(component.id.clone()))?,
            };
            // kmol/d * g/mol = kg/d of component mass, over i_mass to land in
            // the units of the measured basis
            mass_flows[index] = flow * molar_mass / component.ratios().i_mass;
        }
        let mut stream = Self::new(components);
        stream.mass_flows = mass_flows;
        Ok(stream)
    }

    pub fn components(&self) -> &CompiledComponents {
        &self.components
    }

    pub fn mass_flows(&self) -> &[f64] {
        &self.mass_flows
    }

    pub fn set_flow(&mut self, id: &str, flow: f64) -> Result<(), StreamError> {
        let index = self
            .components
            .index_of(id)
            .ok_or_else(|| StreamError::UnknownComponent(id.to_string()))?;
        if flow < 0.0 {
            return Err(StreamError::NegativeFlow {
                id: id.to_string(),
                flow,
            });
        }
        self.mass_flows[index] = flow;
        Ok(())
    }

    pub fn flow(&self, id: &str) -> Result<f64, StreamError> {
        let index = self
            .components
            .index_of(id)
            .ok_or_else(|| StreamError::UnknownComponent(id.to_string()))?;
        Ok(self.mass_flows[index])
    }

    pub fn set_state(&mut self, temperature: f64, pressure: f64, phase: char) {
        self.temperature = temperature;
        self.pressure = pressure;
        self.phase = phase;
    }

    pub fn set_density(&mut self, density: f64) -> Result<(), StreamError> {
        if !(density > 0.0 && density.is_finite()) {
            return Err(StreamError::BadDensity(density));
        }
        self.density = density;
        Ok(())
    }

    /// Total mass flow, kg/d: basis flows scaled to real mass through each
    /// component's i_mass.
    pub fn total_mass_flow(&self) -> f64 {
        self.mass_flows
            .iter()
            .enumerate()
            .map(|(index, flow)| flow * self.components.factor(index, COL_I_MASS))
            .sum()
    }

    /// Volumetric flow, m3/d.
    pub fn volumetric_flow(&self) -> f64 {
        self.total_mass_flow() / self.density
    }

    /// Composite measure of the stream as a concentration, g/m3 of the
    /// target quantity (mol/m3 for Charge). An empty stream yields 0.0 for
    /// any request.
    pub fn composite(&self, variable: CompositeVariable, filters: &CompositeFilters) -> f64 {
        let volumetric_flow = self.volumetric_flow();
        if volumetric_flow == 0.0 {
            debug!("composite {} over an empty stream", variable.as_str());
            return 0.0;
        }
        let total = composite_of_flows(&self.components, &self.mass_flows, variable, filters);
        // kg/m3 -> g/m3
        total / volumetric_flow * 1000.0
    }

    ////////////////////////DERIVED MEASURES////////////////////////////////

    /// chemical oxygen demand, g O2/m3
    pub fn cod(&self) -> f64 {
        self.composite(CompositeVariable::COD, &CompositeFilters::none())
    }

    /// 5-day biochemical oxygen demand, g O2/m3
    pub fn bod(&self) -> f64 {
        self.composite(CompositeVariable::BOD, &CompositeFilters::none())
    }

    /// ultimate biochemical oxygen demand, g O2/m3
    pub fn ubod(&self) -> f64 {
        self.composite(CompositeVariable::UBOD, &CompositeFilters::none())
    }

    /// nitrogenous oxygen demand, g O2/m3
    pub fn nod(&self) -> f64 {
        self.composite(CompositeVariable::NOD, &CompositeFilters::none())
    }

    /// total carbon, g C/m3
    pub fn tc(&self) -> f64 {
        self.composite(CompositeVariable::C, &CompositeFilters::none())
    }

    /// total organic carbon, g C/m3
    pub fn toc(&self) -> f64 {
        self.composite(
            CompositeVariable::C,
            &CompositeFilters {
                organic: Some(true),
                ..Default::default()
            },
        )
    }

    /// total nitrogen, g N/m3
    pub fn tn(&self) -> f64 {
        self.composite(CompositeVariable::N, &CompositeFilters::none())
    }

    /// Total Kjeldahl nitrogen, g N/m3: total nitrogen minus the oxidized
    /// inorganic species (nitrite, nitrate, dissolved dinitrogen).
    pub fn tkn(&self) -> f64 {
        let non_kjeldahl: Vec<String> = self
            .components
            .components()
            .iter()
            .filter(|component| !component.is_kjeldahl_nitrogen())
            .map(|component| component.id.clone())
            .collect();
        if non_kjeldahl.is_empty() {
            return self.tn();
        }
        self.tn()
            - self.composite(
                CompositeVariable::N,
                &CompositeFilters {
                    specification: Some(non_kjeldahl),
                    ..Default::default()
                },
            )
    }

    /// total phosphorus, g P/m3
    pub fn tp(&self) -> f64 {
        self.composite(CompositeVariable::P, &CompositeFilters::none())
    }

    /// total potassium, g K/m3
    pub fn tk(&self) -> f64 {
        self.composite(CompositeVariable::K, &CompositeFilters::none())
    }

    /// total magnesium, g Mg/m3
    pub fn tmg(&self) -> f64 {
        self.composite(CompositeVariable::Mg, &CompositeFilters::none())
    }

    /// total calcium, g Ca/m3
    pub fn tca(&self) -> f64 {
        self.composite(CompositeVariable::Ca, &CompositeFilters::none())
    }

    /// total suspended solids, g/m3 (particulate fraction)
    pub fn tss(&self) -> f64 {
        self.composite(
            CompositeVariable::Solids,
            &CompositeFilters {
                particle_size: Some(ParticleSize::Particulate),
                ..Default::default()
            },
        )
    }

    /// volatile suspended solids, g/m3
    pub fn vss(&self) -> f64 {
        self.composite(
            CompositeVariable::Solids,
            &CompositeFilters {
                particle_size: Some(ParticleSize::Particulate),
                volatile: Some(true),
                ..Default::default()
            },
        )
    }

    /// inorganic (fixed) suspended solids, g/m3
    pub fn iss(&self) -> f64 {
        self.composite(
            CompositeVariable::Solids,
            &CompositeFilters {
                particle_size: Some(ParticleSize::Particulate),
                volatile: Some(false),
                ..Default::default()
            },
        )
    }

    /// net ionic charge, mol/m3
    pub fn charge(&self) -> f64 {
        self.composite(CompositeVariable::Charge, &CompositeFilters::none())
    }

    /// alkalinity, g CaCO3/m3, balancing the net negative charge
    pub fn alkalinity(&self) -> f64 {
        -ALKALINITY_CACO3 * self.charge()
    }

    /// Prints a table of the composite measures of the stream.
    pub fn print_composite_summary(&self) {
        let mut table = Table::new();
        table.add_row(row!["measure", "value", "unit"]);
        for (name, value, unit) in [
            ("COD", self.cod(), "g O2/m3"),
            ("BOD5", self.bod(), "g O2/m3"),
            ("uBOD", self.ubod(), "g O2/m3"),
            ("TC", self.tc(), "g C/m3"),
            ("TOC", self.toc(), "g C/m3"),
            ("TN", self.tn(), "g N/m3"),
            ("TKN", self.tkn(), "g N/m3"),
            ("TP", self.tp(), "g P/m3"),
            ("TK", self.tk(), "g K/m3"),
            ("TSS", self.tss(), "g/m3"),
            ("VSS", self.vss(), "g/m3"),
            ("ISS", self.iss(), "g/m3"),
            ("alkalinity", self.alkalinity(), "g CaCO3/m3"),
        ] {
            table.add_row(row![name, format!("{:.2}", value), unit]);
        }
        table.printstd();
    }
}
