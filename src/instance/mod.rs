//! Problem instance data and benchmark file parsing.
//!
//! An instance is a set of facilities (capacity, fixed opening cost) and
//! customers (demand, one assignment cost per facility). Instances are
//! read from a whitespace-delimited text format: a header line `m n`,
//! then `m` facility records `capacity fixed_cost`, then `n` customer
//! records `demand cost_1 .. cost_m`. Records may wrap across physical
//! lines; parsing is token-based.
//!
//! The three large benchmark families (`capa`, `capb`, `capc`) carry no
//! usable capacity column — each family selects one of four fixed
//! capacity values instead, chosen by an index supplied by the caller.

mod parser;
mod types;

pub use parser::{
    family_capacities, parse_family_instance, parse_instance, read_family_instance,
    read_instance, ParseError,
};
pub use types::{Customer, Facility, InstanceError, ProblemInstance};
