/// Module to calculate the atomic composition, molar mass, ionic charge and
/// theoretical oxygen demand of a chemical formula
///
///
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

/// Atomic masses, g/mol, of the elements encountered in wastewater
/// characterization and in the common mineral constituents.
const ELEMENTS: &[(&str, f64)] = &[
    ("H", 1.008),
    ("He", 4.0026),
    ("Li", 6.94),
    ("Be", 9.0122),
    ("B", 10.81),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998),
    ("Ne", 20.18),
    ("Na", 22.99),
    ("Mg", 24.305),
    ("Al", 26.98),
    ("Si", 28.085),
    ("P", 30.974),
    ("S", 32.065),
    ("Cl", 35.45),
    ("Ar", 39.948),
    ("K", 39.102),
    ("Ca", 40.08),
    ("Ti", 47.867),
    ("Cr", 51.9961),
    ("Mn", 54.938),
    ("Fe", 55.845),
    ("Co", 58.933),
    ("Ni", 58.69),
    ("Cu", 63.546),
    ("Zn", 65.38),
    ("As", 74.9216),
    ("Se", 78.96),
    ("Br", 79.904),
    ("Sr", 87.62),
    ("Mo", 95.94),
    ("Ag", 107.868),
    ("Cd", 112.41),
    ("I", 126.904),
    ("Ba", 137.327),
    ("Hg", 200.59),
    ("Pb", 207.2),
];

/// Atomic mass of an element symbol, g/mol.
pub fn atomic_mass(symbol: &str) -> Option<f64> {
    ELEMENTS
        .iter()
        .find(|(name, _)| *name == symbol)
        .map(|(_, mass)| *mass)
}

/// Electron equivalents donated by one atom on full oxidation with end
/// products CO2, H2O, NH3, H3PO4 and H2SO4. Nitrogen is conserved as NH3 in
/// the COD test, hence the -3.
fn electron_equivalents(element: &str) -> f64 {
    match element {
        "C" => 4.0,
        "H" => 1.0,
        "O" => -2.0,
        "N" => -3.0,
        "P" => 5.0,
        "S" => 6.0,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormulaError {
    EmptyFormula,
    UnknownElement(String),
    UnbalancedBrackets(String),
    UnexpectedSymbol {
        formula: String,
        position: usize,
        symbol: char,
    },
    NoData(String),
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormulaError::EmptyFormula => write!(f, "empty chemical formula"),
            FormulaError::UnknownElement(element) => {
                write!(f, "unknown element symbol: {}", element)
            }
            FormulaError::UnbalancedBrackets(formula) => {
                write!(f, "unbalanced brackets in formula '{}'", formula)
            }
            FormulaError::UnexpectedSymbol {
                formula,
                position,
                symbol,
            } => {
                write!(
                    f,
                    "unexpected symbol '{}' at position {} in formula '{}'",
                    symbol, position, formula
                )
            }
            FormulaError::NoData(name) => {
                write!(f, "no tabulated data for '{}'", name)
            }
        }
    }
}

impl Error for FormulaError {}

// Phase marks like (g), (l), (s), (aq) are metadata, not composition
fn strip_phase_marks(formula: &str) -> String {
    let re = Regex::new(r"\((aq|g|l|s|c|G|L|S|C)\)").unwrap();
    re.replace_all(formula, "").into_owned()
}

/// Splits an ionic formula into its bare composition part and the ionic
/// charge given as a trailing sign with an optional magnitude, e.g.
/// "NH4+" -> ("NH4", +1), "PO4-3" -> ("PO4", -3). Phase marks and spaces are
/// stripped; a formula without a charge suffix returns charge 0.
pub fn extract_charge(formula: &str) -> (String, i32) {
    let formula = strip_phase_marks(&formula.replace(' ', ""));
    let re = Regex::new(r"^(.+?)([+-])(\d*)$").unwrap();
    match re.captures(&formula) {
        Some(caps) => {
            let base = caps[1].to_string();
            let magnitude: i32 = if caps[3].is_empty() {
                1
            } else {
                caps[3].parse().unwrap_or(1)
            };
            let sign = if &caps[2] == "-" { -1 } else { 1 };
            (base, sign * magnitude)
        }
        None => (formula, 0),
    }
}

// Chemical formulae may contain special names for chemical groups i.e. groups of atoms,
// e.g. Me (methyl) group, which is converted into {"C":1, "H":3}
// so we need to convert them into regular elements
fn handle_groups(
    mut counts: HashMap<String, usize>,
    groups: Option<HashMap<String, HashMap<String, usize>>>,
) -> HashMap<String, usize> {
    if let Some(groups) = groups {
        for (chemical_group, atomic_composition) in groups.iter() {
            if let Some(&number_of_groups) = counts.get(chemical_group) {
                counts.remove(chemical_group);
                for (atom, &quantity) in atomic_composition.iter() {
                    *counts.entry(atom.clone()).or_insert(0) += quantity * number_of_groups;
                }
            }
        }
    }
    counts
}

// reads the stoichiometric count following an element symbol or a closing
// bracket; absence of digits means 1
fn read_count(chars: &[char], mut i: usize) -> (usize, usize) {
    let start = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if start == i {
        (1, i)
    } else {
        let count: usize = chars[start..i]
            .iter()
            .collect::<String>()
            .parse()
            .unwrap_or(1);
        (count, i)
    }
}

/// Parses a chemical formula into a map of element symbols to atom counts.
/// Brackets (round or square) with trailing multipliers are supported, phase
/// marks and a trailing ionic charge are stripped. The optional `groups`
/// argument names special chemical groups like Me, Ph and their atomic
/// composition, e.g. { "Me": {"C":1, "H":3} }.
pub fn parse_formula(
    formula: String,
    groups: Option<HashMap<String, HashMap<String, usize>>>,
) -> Result<HashMap<String, usize>, FormulaError> {
    let initial_formula = formula.clone();
    let (bare, _charge) = extract_charge(&formula);
    if bare.is_empty() {
        return Err(FormulaError::EmptyFormula);
    }
    debug!("parsing formula {}", initial_formula);
    let chars: Vec<char> = bare.chars().collect();
    let mut stack: Vec<HashMap<String, usize>> = vec![HashMap::new()];
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '(' || c == '[' {
            stack.push(HashMap::new());
            i += 1;
        } else if c == ')' || c == ']' {
            let inner = match stack.pop() {
                Some(inner) => inner,
                None => return Err(FormulaError::UnbalancedBrackets(initial_formula)),
            };
            if stack.is_empty() {
                return Err(FormulaError::UnbalancedBrackets(initial_formula));
            }
            i += 1;
            let (multiplier, next) = read_count(&chars, i);
            i = next;
            if let Some(top) = stack.last_mut() {
                for (element, count) in inner {
                    *top.entry(element).or_insert(0) += count * multiplier;
                }
            }
        } else if c.is_ascii_uppercase() {
            let start = i;
            i += 1;
            while i < chars.len() && chars[i].is_ascii_lowercase() {
                i += 1;
            }
            let symbol: String = chars[start..i].iter().collect();
            let (count, next) = read_count(&chars, i);
            i = next;
            if let Some(top) = stack.last_mut() {
                *top.entry(symbol).or_insert(0) += count;
            }
        } else {
            return Err(FormulaError::UnexpectedSymbol {
                formula: initial_formula,
                position: i,
                symbol: c,
            });
        }
    }
    if stack.len() != 1 {
        return Err(FormulaError::UnbalancedBrackets(initial_formula));
    }
    let counts = handle_groups(stack.pop().unwrap_or_default(), groups);
    // after group expansion every key must be a real element
    for element in counts.keys() {
        if atomic_mass(element).is_none() {
            return Err(FormulaError::UnknownElement(element.clone()));
        }
    }
    debug!("parsed {} into {:?}", initial_formula, counts);
    Ok(counts)
}

/// Molar mass, g/mol, of an already parsed atomic composition.
pub fn calculate_molar_mass_for_composition(
    composition: &HashMap<String, usize>,
) -> Result<f64, FormulaError> {
    let mut molar_mass = 0.0;
    for (element, count) in composition {
        let mass = atomic_mass(element).ok_or(FormulaError::UnknownElement(element.clone()))?;
        molar_mass += mass * *count as f64;
    }
    Ok(molar_mass)
}

/// Function to calculate the molar mass of a substance given its chemical formula.
/// Returns the molar mass, g/mol, together with the parsed atomic composition.
pub fn calculate_molar_mass(
    formula: String,
    groups: Option<HashMap<String, HashMap<String, usize>>>,
) -> Result<(f64, HashMap<String, usize>), FormulaError> {
    let counts = parse_formula(formula, groups)?;
    let molar_mass = calculate_molar_mass_for_composition(&counts)?;
    Ok((molar_mass, counts))
}

/// Theoretical oxygen demand of one mole of the given composition, g O2/mol,
/// from the electron balance with end products CO2, H2O, NH3, H3PO4 and
/// H2SO4. The ionic charge correction is applied only when the composition
/// contains redox-active elements, so that spectator ions like K+ or Ca+2
/// carry no oxygen demand. Negative values mean the species is an electron
/// acceptor (O2 itself, nitrite, nitrate).
pub fn theoretical_oxygen_demand(composition: &HashMap<String, usize>, charge: i32) -> f64 {
    let redox_active = composition
        .keys()
        .any(|element| electron_equivalents(element) != 0.0);
    let mut electrons: f64 = composition
        .iter()
        .map(|(element, count)| electron_equivalents(element) * *count as f64)
        .sum();
    if redox_active {
        electrons -= charge as f64;
    }
    // one mole of O2 accepts 4 electrons, 32/4 = 8 g O2 per electron equivalent
    8.0 * electrons
}
