//! Facility, customer, and validated instance container types.

use std::fmt;

/// A candidate facility site.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facility {
    /// Maximum total demand the facility can serve.
    pub capacity: f64,
    /// Cost charged when the facility serves at least one customer.
    pub fixed_cost: f64,
}

/// A customer with a demand and per-facility assignment costs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Customer {
    /// Demand that must be served entirely by a single facility.
    pub demand: f64,
    /// `costs[j]` is the cost of serving this customer from facility `j`.
    pub costs: Vec<f64>,
}

/// Errors building a [`ProblemInstance`] from raw parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstanceError {
    #[error("customer {customer} has {actual} assignment costs, expected {expected}")]
    CostDimensionMismatch {
        customer: usize,
        expected: usize,
        actual: usize,
    },
}

/// Immutable CFLP instance data.
///
/// Facilities and customers are identified by their index in the ordered
/// sequences; the ordering carries no semantics beyond reproducible
/// iteration. The instance is read-only and can be shared freely between
/// independent solver runs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProblemInstance {
    facilities: Vec<Facility>,
    customers: Vec<Customer>,
}

impl ProblemInstance {
    /// Builds an instance, checking that every customer carries exactly
    /// one assignment cost per facility.
    pub fn new(
        facilities: Vec<Facility>,
        customers: Vec<Customer>,
    ) -> Result<Self, InstanceError> {
        let expected = facilities.len();
        for (customer, c) in customers.iter().enumerate() {
            if c.costs.len() != expected {
                return Err(InstanceError::CostDimensionMismatch {
                    customer,
                    expected,
                    actual: c.costs.len(),
                });
            }
        }
        Ok(Self {
            facilities,
            customers,
        })
    }

    pub fn num_facilities(&self) -> usize {
        self.facilities.len()
    }

    pub fn num_customers(&self) -> usize {
        self.customers.len()
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Capacity available if every facility were opened.
    pub fn total_capacity(&self) -> f64 {
        self.facilities.iter().map(|f| f.capacity).sum()
    }

    /// Aggregate demand of all customers.
    pub fn total_demand(&self) -> f64 {
        self.customers.iter().map(|c| c.demand).sum()
    }

    /// True when no assignment can ever be feasible: aggregate demand
    /// exceeds the capacity of all facilities combined.
    pub fn is_structurally_infeasible(&self) -> bool {
        self.total_demand() > self.total_capacity()
    }
}

impl fmt::Display for ProblemInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} facilities, {} customers, total capacity {}, total demand {}",
            self.num_facilities(),
            self.num_customers(),
            self.total_capacity(),
            self.total_demand()
        )
    }
}
