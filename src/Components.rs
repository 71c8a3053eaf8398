/// Module to calculate the atomic composition, molar mass, ionic charge and
/// theoretical oxygen demand of a chemical formula
///
///  # Examples
/// ```
/// use SanChem::Components::molmass::{calculate_molar_mass, extract_charge};
/// let (molar_mass, composition) = calculate_molar_mass("C6H12O6".to_string(), None).unwrap();
/// println!("Element counts: {:?}", composition);
/// println!("Molar mass: {:?} g/mol", molar_mass);
/// let (base, charge) = extract_charge("PO4-3");
/// assert_eq!((base.as_str(), charge), ("PO4", -3));
/// ```
pub mod molmass;
/// The Component struct: one chemical constituent of a waste stream with its
/// classification (particle size, degradability, organic flag), measurement
/// basis and the full set of conversion ratios (i_C, i_N, i_P, i_K, i_Mg,
/// i_Ca, i_mass, i_charge, i_COD, i_NOD). Ratios are derived from the formula
/// once at construction or supplied in full, never partially overwritten.
///
///  # Examples
/// ```
/// use SanChem::Components::component::{Component, Degradability, MeasuredAs, ParticleSize};
/// let acetate = Component::from_formula(
///     "S_Ac",
///     "C2H3O2-",
///     MeasuredAs::COD,
///     ParticleSize::Soluble,
///     Degradability::Readily,
///     true,
///     None,
/// )
/// .unwrap();
/// // measured as COD, so i_COD is unity by definition
/// assert!((acetate.ratios().i_COD - 1.0).abs() < 1e-12);
/// ```
pub mod component;
/// main functionality to open the component library shipped with the crate:
/// list records, fetch single records, append user records, save and load
/// user libraries as JSON files
pub mod component_lib_api;
/// The registry: an ordered set of unique components which is validated and
/// frozen by compile(), producing an id -> index map and a dense matrix of
/// conversion factors for fast composite computations
///
///  # Examples
/// ```
/// use SanChem::Components::component::{Component, Degradability, MeasuredAs, ParticleSize};
/// use SanChem::Components::registry::ComponentSet;
/// let water = Component::from_formula(
///     "H2O",
///     "H2O",
///     MeasuredAs::Mass,
///     ParticleSize::Soluble,
///     Degradability::Undegradable,
///     false,
///     None,
/// )
/// .unwrap();
/// let mut set = ComponentSet::new();
/// set.append(water).unwrap();
/// let cmps = set.compile().unwrap();
/// assert_eq!(cmps.index_of("H2O"), Some(0));
/// ```
pub mod registry;
/// tests
pub mod registry_tests;
/// chemical-properties provider seam: molar mass, composition and charge for
/// a formula, dispatched over the available calculators
pub mod properties_api;
