use crate::Components::component_lib_api::ComponentLib;
use crate::Components::registry::ComponentSet;
use crate::Streams::waste_stream::WasteStream;
use std::sync::Arc;

pub fn stream_examples(task: usize) {
    match task {
        0 => {
            // inspect the default component library shipped with the crate
            let lib = ComponentLib::new().unwrap();
            println!("library records: {:?}", lib.ids());
            lib.print_library_summary();
        }
        1 => {
            // compile the default library and look at the derived conversion
            // factors
            let lib = ComponentLib::new().unwrap();
            let cmps = ComponentSet::from_components(lib.to_components().unwrap())
                .unwrap()
                .compile()
                .unwrap();
            cmps.print_components_summary();
            let nitrate = cmps.get("S_NO3").unwrap();
            println!(
                "nitrate takes {} g COD per g N when used as an electron acceptor",
                -nitrate.ratios().i_COD
            );
        }
        2 => {
            // a typical medium-strength municipal influent, flows in kg/d of
            // each component's measured basis
            let lib = ComponentLib::new().unwrap();
            let cmps = Arc::new(
                ComponentSet::from_components(lib.to_components().unwrap())
                    .unwrap()
                    .compile()
                    .unwrap(),
            );
            let mut ws = WasteStream::new(cmps);
            for (id, flow) in [
                ("H2O", 1000.0),
                ("S_F", 0.15),
                ("S_Ac", 0.05),
                ("S_U_Inf", 0.03),
                ("C_B_Subst", 0.08),
                ("X_B_Subst", 0.18),
                ("X_U_Inf", 0.05),
                ("X_Ig_ISS", 0.04),
                ("S_NH4", 0.025),
                ("S_PO4", 0.008),
                ("S_CO3", 0.012),
            ] {
                ws.set_flow(id, flow).unwrap();
            }
            ws.print_composite_summary();
            println!("COD: {:.1} g O2/m3", ws.cod());
            println!("BOD5: {:.1} g O2/m3", ws.bod());
            println!("TKN: {:.1} g N/m3", ws.tkn());
            println!("TSS: {:.1} g/m3", ws.tss());
            println!("alkalinity: {:.1} g CaCO3/m3", ws.alkalinity());
        }
        _ => {
            println!("no such example: {}", task);
        }
    }
}
