#[cfg(test)]
mod tests {
    use crate::Components::component::PARTICLE_SIZE_CLASSES;
    use crate::Components::component_lib_api::ComponentLib;
    use crate::Components::properties_api::{PropsEnum, TabulatedProps, create_props_calculator_by_name};
    use crate::Components::registry::{CompiledComponents, ComponentSet};
    use crate::Streams::composite::{CompositeFilters, CompositeVariable};
    use crate::Streams::waste_stream::{StreamError, WasteStream};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn default_registry() -> Arc<CompiledComponents> {
        let lib = ComponentLib::new().unwrap();
        let cmps = ComponentSet::from_components(lib.to_components().unwrap())
            .unwrap()
            .compile()
            .unwrap();
        Arc::new(cmps)
    }

    fn subset_registry(ids: &[&str]) -> Arc<CompiledComponents> {
        let lib = ComponentLib::new().unwrap();
        let cmps = ComponentSet::from_components(lib.subset(ids).unwrap())
            .unwrap()
            .compile()
            .unwrap();
        Arc::new(cmps)
    }

    #[test]
    fn test_empty_stream_yields_zero() {
        let ws = WasteStream::new(default_registry());
        for variable in [
            CompositeVariable::COD,
            CompositeVariable::BOD,
            CompositeVariable::NOD,
            CompositeVariable::C,
            CompositeVariable::N,
            CompositeVariable::P,
            CompositeVariable::Solids,
            CompositeVariable::Charge,
        ] {
            assert_eq!(ws.composite(variable, &CompositeFilters::none()), 0.0);
        }
        assert_eq!(ws.cod(), 0.0);
        assert_eq!(ws.tkn(), 0.0);
        assert_eq!(ws.alkalinity(), 0.0);
    }

    #[test]
    fn test_cod_and_bod_of_acetate_solution() {
        let mut ws = WasteStream::new(default_registry());
        ws.set_flow("H2O", 1000.0).unwrap();
        ws.set_flow("S_Ac", 0.5).unwrap();

        // 0.5 kg COD/d of acetate in roughly one cubic meter of water per day
        assert_relative_eq!(ws.cod(), 499.77, epsilon = 0.1);
        // BOD5 of acetate is its f_BOD5_COD share of the COD
        assert_relative_eq!(ws.bod(), 0.717 * ws.cod(), epsilon = 1e-9);
        assert_relative_eq!(ws.ubod(), 0.96 * ws.cod(), epsilon = 1e-9);
    }

    #[test]
    fn test_carbon_measures_split_organic_inorganic() {
        let mut ws = WasteStream::new(default_registry());
        ws.set_flow("H2O", 1000.0).unwrap();
        ws.set_flow("S_Ac", 0.5).unwrap();
        ws.set_flow("S_CO3", 0.012).unwrap();

        assert_relative_eq!(ws.toc(), 187.6, epsilon = 0.2);
        // carbonate carbon shows up in TC but not in TOC
        assert_relative_eq!(ws.tc() - ws.toc(), 11.99, epsilon = 0.05);
    }

    #[test]
    fn test_nitrogen_measures() {
        let mut ws = WasteStream::new(default_registry());
        ws.set_flow("H2O", 1000.0).unwrap();
        ws.set_flow("S_NH4", 0.04).unwrap();
        ws.set_flow("S_NO3", 0.02).unwrap();
        ws.set_flow("X_OHO", 0.3).unwrap();

        assert_relative_eq!(ws.tn(), 86.23, epsilon = 0.05);
        // Kjeldahl nitrogen excludes the nitrate
        assert_relative_eq!(ws.tn() - ws.tkn(), 19.99, epsilon = 0.05);
        // ammonium and biomass nitrogen are nitrifiable
        assert_relative_eq!(ws.nod(), 302.7, epsilon = 0.2);
    }

    #[test]
    fn test_solids_measures() {
        let mut ws = WasteStream::new(default_registry());
        ws.set_flow("H2O", 1000.0).unwrap();
        ws.set_flow("X_OHO", 0.3).unwrap();
        ws.set_flow("X_Ig_ISS", 0.1).unwrap();
        ws.set_flow("X_B_Subst", 0.5).unwrap();
        // soluble material must not show up in the suspended solids
        ws.set_flow("S_Ac", 0.4).unwrap();

        assert_relative_eq!(ws.tss(), 698.1, epsilon = 0.5);
        assert_relative_eq!(ws.vss(), 550.3, epsilon = 0.5);
        assert_relative_eq!(ws.iss(), ws.tss() - ws.vss(), epsilon = 1e-9);
    }

    #[test]
    fn test_alkalinity_and_charge() {
        let mut ws = WasteStream::new(default_registry());
        ws.set_flow("H2O", 1000.0).unwrap();
        ws.set_flow("S_CO3", 0.012).unwrap();

        assert_relative_eq!(ws.charge(), -2.0, epsilon = 0.01);
        assert_relative_eq!(ws.alkalinity(), 99.9, epsilon = 0.5);
    }

    #[test]
    fn test_particle_size_classes_partition_the_total() {
        let mut ws = WasteStream::new(default_registry());
        for (id, flow) in [
            ("H2O", 1000.0),
            ("S_Ac", 0.4),
            ("S_F", 0.3),
            ("C_B_Subst", 0.2),
            ("X_B_Subst", 0.5),
            ("X_OHO", 0.3),
            ("S_CH4", 0.05),
            ("S_NH4", 0.04),
            ("S_NO3", 0.02),
            ("X_Ig_ISS", 0.1),
        ] {
            ws.set_flow(id, flow).unwrap();
        }
        for variable in [
            CompositeVariable::COD,
            CompositeVariable::N,
            CompositeVariable::C,
            CompositeVariable::Solids,
        ] {
            let total = ws.composite(variable, &CompositeFilters::none());
            let partitioned: f64 = PARTICLE_SIZE_CLASSES
                .iter()
                .map(|particle_size| {
                    ws.composite(
                        variable,
                        &CompositeFilters {
                            particle_size: Some(*particle_size),
                            ..Default::default()
                        },
                    )
                })
                .sum();
            assert_relative_eq!(partitioned, total, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_molar_flows() {
        let cmps = subset_registry(&["H2O", "S_NH4"]);
        let props = create_props_calculator_by_name("formula");
        let ws = WasteStream::from_molar_flows(cmps, vec![55.5, 1.0], &props).unwrap();
        // one kmol of ammonium a day is 14.007 kg N/d
        assert_relative_eq!(ws.flow("S_NH4").unwrap(), 14.007, epsilon = 1e-3);
        assert_relative_eq!(ws.flow("H2O").unwrap(), 999.83, epsilon = 0.05);
    }

    #[test]
    fn test_molar_flows_need_a_molar_mass() {
        let cmps = subset_registry(&["S_F"]);
        let props = create_props_calculator_by_name("formula");
        assert!(matches!(
            WasteStream::from_molar_flows(cmps.clone(), vec![1.0], &props),
            Err(StreamError::NoMolarMass(_))
        ));

        let mut tabulated = TabulatedProps::default();
        tabulated.set_molar_mass("S_F", 230.0);
        let props = PropsEnum::Tabulated(tabulated);
        let ws = WasteStream::from_molar_flows(cmps, vec![1.0], &props).unwrap();
        // 230 kg/d of lumped substrate mass, over i_mass to g COD basis
        assert_relative_eq!(ws.flow("S_F").unwrap(), 230.0 / 0.747, epsilon = 1e-6);
    }

    #[test]
    fn test_flow_errors() {
        let cmps = default_registry();
        assert!(matches!(
            WasteStream::from_mass_flows(cmps.clone(), vec![1.0, 2.0]),
            Err(StreamError::FlowLengthMismatch { .. })
        ));
        let mut ws = WasteStream::new(cmps);
        assert!(matches!(
            ws.set_flow("S_Unobtainium", 1.0),
            Err(StreamError::UnknownComponent(_))
        ));
        assert!(matches!(
            ws.set_flow("S_Ac", -1.0),
            Err(StreamError::NegativeFlow { .. })
        ));
        assert!(matches!(ws.set_density(0.0), Err(StreamError::BadDensity(_))));
        assert!(matches!(
            ws.set_density(f64::NAN),
            Err(StreamError::BadDensity(_))
        ));
    }

    #[test]
    fn test_summary_prints() {
        let mut ws = WasteStream::new(default_registry());
        ws.set_flow("H2O", 1000.0).unwrap();
        ws.set_flow("S_Ac", 0.5).unwrap();
        ws.set_state(293.15, 101325.0, 'l');
        ws.print_composite_summary();
    }
}
