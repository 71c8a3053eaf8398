/// composite measure requests (target variable + filters) and the
/// filter-multiply-sum kernel over a compiled registry
pub mod composite;
/// The WasteStream struct: per-component flows plus state, with composite
/// measures (COD, BOD, TN, TKN, TP, TK, TC, TOC, TSS, VSS, alkalinity and so
/// on) computed from the compiled registry it references
///
///  # Examples
/// ```
/// use std::sync::Arc;
/// use SanChem::Components::component_lib_api::ComponentLib;
/// use SanChem::Components::registry::ComponentSet;
/// use SanChem::Streams::waste_stream::WasteStream;
/// let lib = ComponentLib::new().unwrap();
/// let cmps = ComponentSet::from_components(lib.to_components().unwrap())
///     .unwrap()
///     .compile()
///     .unwrap();
/// let cmps = Arc::new(cmps);
/// let mut ws = WasteStream::new(cmps.clone());
/// ws.set_flow("H2O", 1000.0).unwrap();
/// ws.set_flow("S_Ac", 0.5).unwrap();
/// // half a kilogram of acetate COD in roughly a cubic meter of water
/// assert!((ws.cod() - 500.0).abs() < 1.0);
/// ```
pub mod waste_stream;
/// tests
pub mod waste_stream_tests;
