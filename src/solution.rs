//! Candidate solution representation and cost/capacity bookkeeping.
//!
//! A [`Solution`] is bound to one [`ProblemInstance`], which is passed by
//! reference into every operation. Facility open flags are derived state:
//! a facility is open exactly while it serves at least one customer, so a
//! facility's fixed cost is charged if and only if it is actually used.
//! The cached total cost is refreshed by [`Solution::recompute_cost`]
//! after a batch of mutations; [`Solution::is_feasible`] audits the
//! capacity invariant independently of the incremental bookkeeping.

use std::fmt;

use crate::instance::ProblemInstance;

/// A candidate assignment of customers to facilities.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Serving facility per customer.
    assignment: Vec<usize>,
    /// Open flag per facility; true iff `assigned[i] > 0`.
    open: Vec<bool>,
    /// Remaining capacity per facility under the current assignment.
    spare: Vec<f64>,
    /// Number of customers served per facility.
    assigned: Vec<u32>,
    /// Cached total cost; stale between a mutation and the next
    /// [`Solution::recompute_cost`].
    total_cost: f64,
}

impl Solution {
    /// Builds a solution from a complete assignment vector, deriving the
    /// open flags, spare capacities, and total cost.
    ///
    /// Every entry must be a valid facility index. The assignment is not
    /// required to be feasible; an overloaded facility shows up as
    /// negative spare capacity and through [`Solution::is_feasible`].
    pub fn from_assignment(instance: &ProblemInstance, assignment: Vec<usize>) -> Self {
        debug_assert_eq!(assignment.len(), instance.num_customers());

        let mut spare: Vec<f64> = instance.facilities().iter().map(|f| f.capacity).collect();
        let mut assigned = vec![0u32; instance.num_facilities()];
        for (customer, &facility) in assignment.iter().enumerate() {
            debug_assert!(facility < instance.num_facilities());
            spare[facility] -= instance.customers()[customer].demand;
            assigned[facility] += 1;
        }
        let open = assigned.iter().map(|&count| count > 0).collect();

        let mut solution = Self {
            assignment,
            open,
            spare,
            assigned,
            total_cost: 0.0,
        };
        solution.recompute_cost(instance);
        solution
    }

    /// Serving facility per customer.
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    /// Open flag per facility.
    pub fn open(&self) -> &[bool] {
        &self.open
    }

    pub fn is_open(&self, facility: usize) -> bool {
        self.open[facility]
    }

    /// Remaining capacity per facility.
    pub fn spare_capacity(&self) -> &[f64] {
        &self.spare
    }

    /// Cached total cost: fixed costs of open facilities plus all
    /// assignment costs.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Moves `customer` to `facility`, updating spare capacities, serving
    /// counts, and open flags of both facilities. Does not touch the
    /// cached cost; call [`Solution::recompute_cost`] after a batch of
    /// moves. The caller is responsible for having checked that `facility`
    /// has spare capacity for the customer's demand.
    pub fn move_customer(
        &mut self,
        instance: &ProblemInstance,
        customer: usize,
        facility: usize,
    ) {
        let from = self.assignment[customer];
        if from == facility {
            return;
        }
        let demand = instance.customers()[customer].demand;

        self.spare[from] += demand;
        self.spare[facility] -= demand;
        self.assigned[from] -= 1;
        self.assigned[facility] += 1;
        self.open[from] = self.assigned[from] > 0;
        self.open[facility] = true;
        self.assignment[customer] = facility;
    }

    /// Recomputes the cached total cost from the open flags and the
    /// assignment vector. Pure function of the current state: calling it
    /// twice in succession yields the same value.
    pub fn recompute_cost(&mut self, instance: &ProblemInstance) -> f64 {
        let mut cost = 0.0;
        for (facility, &open) in self.open.iter().enumerate() {
            if open {
                cost += instance.facilities()[facility].fixed_cost;
            }
        }
        for (customer, &facility) in self.assignment.iter().enumerate() {
            cost += instance.customers()[customer].costs[facility];
        }
        self.total_cost = cost;
        cost
    }

    /// Audits the capacity invariant from scratch: the demand assigned to
    /// every facility must not exceed its capacity. A `false` result is a
    /// diagnostic for the caller, never an error.
    pub fn is_feasible(&self, instance: &ProblemInstance) -> bool {
        let mut used = vec![0.0f64; instance.num_facilities()];
        for (customer, &facility) in self.assignment.iter().enumerate() {
            used[facility] += instance.customers()[customer].demand;
        }
        used.iter()
            .zip(instance.facilities())
            .all(|(&load, f)| load <= f.capacity)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open: Vec<usize> = self
            .open
            .iter()
            .enumerate()
            .filter_map(|(facility, &is_open)| is_open.then_some(facility))
            .collect();
        writeln!(f, "total cost: {}", self.total_cost)?;
        writeln!(f, "open facilities: {open:?}")?;
        write!(f, "assignments: {:?}", self.assignment)
    }
}
