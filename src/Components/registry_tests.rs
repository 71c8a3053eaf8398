#[cfg(test)]
mod tests {
    use crate::Components::component::{
        Component, ComponentError, Degradability, MeasuredAs, ParticleSize, RatioOverrides,
    };
    use crate::Components::component_lib_api::ComponentLib;
    use crate::Components::registry::{
        COL_F_VMASS_TOTMASS, COL_I_CHARGE, COL_I_COD, COL_I_MASS, COL_I_N, ComponentSet,
        N_FACTOR_COLUMNS,
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_compile_default_library() {
        let lib = ComponentLib::new().unwrap();
        let set = ComponentSet::from_components(lib.to_components().unwrap()).unwrap();
        let n_components = set.len();
        let cmps = set.compile().unwrap();

        assert_eq!(cmps.len(), n_components);
        assert_eq!(cmps.factor_matrix().nrows(), n_components);
        assert_eq!(cmps.factor_matrix().ncols(), N_FACTOR_COLUMNS);
        // insertion order is preserved through compilation
        assert_eq!(cmps.ids(), lib.ids());
        for (index, id) in cmps.ids().iter().enumerate() {
            assert_eq!(cmps.index_of(id), Some(index));
        }
    }

    #[test]
    fn test_factor_matrix_values() {
        let lib = ComponentLib::new().unwrap();
        let set = ComponentSet::from_components(lib.to_components().unwrap()).unwrap();
        let cmps = set.compile().unwrap();

        let i_ac = cmps.index_of("S_Ac").unwrap();
        assert_relative_eq!(cmps.factor(i_ac, COL_I_COD), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cmps.factor(i_ac, COL_I_MASS), 59.044 / 64.0, epsilon = 1e-4);
        assert_relative_eq!(cmps.factor(i_ac, COL_I_CHARGE), -1.0 / 64.0, epsilon = 1e-6);

        let i_nh4 = cmps.index_of("S_NH4").unwrap();
        assert_relative_eq!(cmps.factor(i_nh4, COL_I_N), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cmps.factor(i_nh4, COL_I_COD), 0.0, epsilon = 1e-12);

        let i_iss = cmps.index_of("X_Ig_ISS").unwrap();
        assert_relative_eq!(cmps.factor(i_iss, COL_I_MASS), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cmps.factor(i_iss, COL_F_VMASS_TOTMASS), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let lib = ComponentLib::new().unwrap();
        let mut components = lib.subset(&["S_Ac"]).unwrap();
        components.push(components[0].clone());
        assert!(matches!(
            ComponentSet::from_components(components),
            Err(ComponentError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_compile_fails_on_missing_mass_ratio() {
        // i_mass supplied as zero passes construction but cannot be compiled
        let broken = Component::from_ratios(
            "S_broken",
            MeasuredAs::COD,
            ParticleSize::Soluble,
            Degradability::Readily,
            true,
            RatioOverrides {
                i_mass: Some(0.0),
                ..Default::default()
            },
        )
        .unwrap();
        let mut set = ComponentSet::new();
        set.append(broken).unwrap();
        assert!(matches!(
            set.compile(),
            Err(ComponentError::InvalidRatio {
                ratio: "i_mass",
                ..
            })
        ));
    }

    #[test]
    fn test_lookup_api() {
        let lib = ComponentLib::new().unwrap();
        let cmps = ComponentSet::from_components(lib.to_components().unwrap())
            .unwrap()
            .compile()
            .unwrap();
        assert!(cmps.get("S_NO3").is_some());
        assert!(cmps.get("S_Unobtainium").is_none());
        assert_relative_eq!(cmps.molar_mass_of("H2O").unwrap(), 18.015, epsilon = 1e-2);
        // formula-less components expose no molar mass
        assert!(cmps.molar_mass_of("S_F").is_none());
        cmps.print_components_summary();
    }
}
