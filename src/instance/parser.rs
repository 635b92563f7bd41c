//! Whitespace-token parser for the benchmark text format.

use std::fs;
use std::path::Path;

use super::types::{Customer, Facility, InstanceError, ProblemInstance};

/// Fixed capacity table for the three large benchmark families. The
/// textual capacity column of these files is ignored; the caller selects
/// one of the four values per family instead.
const FAMILY_CAPACITIES: &[(&str, [f64; 4])] = &[
    ("capa", [8000.0, 10000.0, 12000.0, 14000.0]),
    ("capb", [5000.0, 6000.0, 7000.0, 8000.0]),
    ("capc", [5000.0, 5750.0, 6500.0, 7250.0]),
];

/// Errors reading or parsing an instance file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read instance file")]
    Io(#[from] std::io::Error),

    #[error("unknown instance family '{0}', expected one of: capa, capb, capc")]
    UnknownInstanceFamily(String),

    #[error("capacity index {0} out of range, family tables have 4 entries")]
    CapacityIndexOutOfRange(usize),

    #[error("unexpected end of input while reading {0}")]
    MissingToken(&'static str),

    #[error("invalid number '{token}' while reading {context}")]
    InvalidNumber {
        context: &'static str,
        token: String,
    },

    #[error(transparent)]
    Instance(#[from] InstanceError),
}

/// The capacity table entry for a family name, if the family is known.
pub fn family_capacities(family: &str) -> Option<[f64; 4]> {
    FAMILY_CAPACITIES
        .iter()
        .find(|(name, _)| *name == family)
        .map(|&(_, capacities)| capacities)
}

struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            iter: input.split_whitespace(),
        }
    }

    fn next_f64(&mut self, context: &'static str) -> Result<f64, ParseError> {
        let token = self.iter.next().ok_or(ParseError::MissingToken(context))?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            context,
            token: token.to_string(),
        })
    }

    fn next_usize(&mut self, context: &'static str) -> Result<usize, ParseError> {
        let token = self.iter.next().ok_or(ParseError::MissingToken(context))?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            context,
            token: token.to_string(),
        })
    }

    fn skip(&mut self, context: &'static str) -> Result<(), ParseError> {
        self.iter
            .next()
            .map(|_| ())
            .ok_or(ParseError::MissingToken(context))
    }
}

fn parse_with(
    input: &str,
    capacity_override: Option<f64>,
) -> Result<ProblemInstance, ParseError> {
    let mut tokens = Tokens::new(input);

    let m = tokens.next_usize("facility count")?;
    let n = tokens.next_usize("customer count")?;

    let mut facilities = Vec::with_capacity(m);
    for _ in 0..m {
        // Family files put a non-numeric placeholder in the capacity
        // column; it is consumed but never parsed when an override is set.
        let capacity = match capacity_override {
            Some(capacity) => {
                tokens.skip("facility capacity")?;
                capacity
            }
            None => tokens.next_f64("facility capacity")?,
        };
        let fixed_cost = tokens.next_f64("facility fixed cost")?;
        facilities.push(Facility { capacity, fixed_cost });
    }

    let mut customers = Vec::with_capacity(n);
    for _ in 0..n {
        let demand = tokens.next_f64("customer demand")?;
        let mut costs = Vec::with_capacity(m);
        for _ in 0..m {
            costs.push(tokens.next_f64("assignment cost")?);
        }
        customers.push(Customer { demand, costs });
    }

    Ok(ProblemInstance::new(facilities, customers)?)
}

/// Parses an instance in the standard format, taking capacities from the
/// facility records.
pub fn parse_instance(input: &str) -> Result<ProblemInstance, ParseError> {
    parse_with(input, None)
}

/// Parses a family-variant instance: the textual capacity column is
/// replaced by the family's table entry at `capacity_index`.
pub fn parse_family_instance(
    input: &str,
    family: &str,
    capacity_index: usize,
) -> Result<ProblemInstance, ParseError> {
    let capacities = family_capacities(family)
        .ok_or_else(|| ParseError::UnknownInstanceFamily(family.to_string()))?;
    let capacity = *capacities
        .get(capacity_index)
        .ok_or(ParseError::CapacityIndexOutOfRange(capacity_index))?;
    parse_with(input, Some(capacity))
}

/// Reads and parses a standard-format instance file.
pub fn read_instance(path: impl AsRef<Path>) -> Result<ProblemInstance, ParseError> {
    parse_instance(&fs::read_to_string(path)?)
}

/// Reads and parses a family-variant instance file. The family name is
/// the lowercased file stem (`instances/capa.txt` -> `capa`).
pub fn read_family_instance(
    path: impl AsRef<Path>,
    capacity_index: usize,
) -> Result<ProblemInstance, ParseError> {
    let path = path.as_ref();
    let family = path_family(path);
    parse_family_instance(&fs::read_to_string(path)?, &family, capacity_index)
}

fn path_family(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "2 2\n10 100\n10 50\n5 1 2\n5 2 1\n";

    #[test]
    fn test_parse_standard_instance() {
        let instance = parse_instance(SMALL).unwrap();
        assert_eq!(instance.num_facilities(), 2);
        assert_eq!(instance.num_customers(), 2);
        assert!((instance.facilities()[0].capacity - 10.0).abs() < 1e-12);
        assert!((instance.facilities()[1].fixed_cost - 50.0).abs() < 1e-12);
        assert!((instance.customers()[0].demand - 5.0).abs() < 1e-12);
        assert_eq!(instance.customers()[1].costs, vec![2.0, 1.0]);
    }

    #[test]
    fn test_parse_is_line_break_agnostic() {
        // Customer records in the large benchmark files wrap across
        // physical lines.
        let wrapped = "2 2 10 100 10\n50 5 1\n2 5 2 1";
        assert_eq!(parse_instance(wrapped).unwrap(), parse_instance(SMALL).unwrap());
    }

    #[test]
    fn test_parse_family_overrides_capacity() {
        let instance = parse_family_instance(SMALL, "capb", 1).unwrap();
        assert!((instance.facilities()[0].capacity - 6000.0).abs() < 1e-12);
        assert!((instance.facilities()[1].capacity - 6000.0).abs() < 1e-12);
        // fixed costs come from the file unchanged
        assert!((instance.facilities()[0].fixed_cost - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_family_accepts_placeholder_capacity_column() {
        let input = "2 2\ncapacity 100\ncapacity 50\n5 1 2\n5 2 1\n";
        let instance = parse_family_instance(input, "capa", 0).unwrap();
        assert!((instance.facilities()[0].capacity - 8000.0).abs() < 1e-12);
        assert!((instance.facilities()[1].fixed_cost - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_family() {
        let err = parse_family_instance(SMALL, "capd", 0).unwrap_err();
        assert!(matches!(err, ParseError::UnknownInstanceFamily(name) if name == "capd"));
    }

    #[test]
    fn test_capacity_index_out_of_range() {
        let err = parse_family_instance(SMALL, "capa", 4).unwrap_err();
        assert!(matches!(err, ParseError::CapacityIndexOutOfRange(4)));
    }

    #[test]
    fn test_family_capacity_table() {
        assert_eq!(
            family_capacities("capc"),
            Some([5000.0, 5750.0, 6500.0, 7250.0])
        );
        assert_eq!(family_capacities("cap"), None);
    }

    #[test]
    fn test_missing_token() {
        let err = parse_instance("2 2\n10 100\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingToken(_)));
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_instance("2 x\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber { token, .. } if token == "x"
        ));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let err = read_instance("/nonexistent/instance.txt").unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }

    #[test]
    fn test_path_family_from_stem() {
        assert_eq!(path_family(Path::new("instances/capa.txt")), "capa");
        assert_eq!(path_family(Path::new("CAPB.TXT")), "capb");
    }
}
