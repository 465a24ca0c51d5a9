//! Budget accounting.
//!
//! The budget check is the single hard precondition of a compilation: it runs
//! against the full parameter list before any graph mutation and either
//! passes as a whole or rejects as a whole.

use crate::error::BudgetExceeded;
use crate::param::ParameterSpec;

/// Result of a passed budget check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    /// Capacity the check ran against.
    pub capacity: u32,
    /// Capacity consumed by the parameter list. Always `<= capacity`.
    pub used: u32,
}

impl Budget {
    /// Capacity left after the parameter list is applied.
    pub fn remaining(&self) -> u32 {
        self.capacity - self.used
    }
}

/// Sums the transport cost of every spec.
///
/// A quantized parameter costs one discrete unit per bit (plus one for the
/// sign bit), anything else costs one continuous channel.
pub fn total_cost(specs: &[ParameterSpec]) -> u32 {
    specs.iter().map(ParameterSpec::cost).sum()
}

/// Checks the parameter list against `capacity`.
///
/// Rejects iff `total_cost(specs) > capacity`. Pure: nothing is mutated on
/// either outcome.
pub fn check_budget(specs: &[ParameterSpec], capacity: u32) -> Result<Budget, BudgetExceeded> {
    let used = total_cost(specs);
    if used > capacity {
        return Err(BudgetExceeded { used, capacity });
    }
    Ok(Budget { capacity, used })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_free() {
        assert_eq!(total_cost(&[]), 0);
        assert_eq!(check_budget(&[], 0), Ok(Budget { capacity: 0, used: 0 }));
    }

    #[test]
    fn mixed_list_sums() {
        let specs = vec![
            ParameterSpec::new("Smile"),
            ParameterSpec::new("Jump").with_quantization(3, true),
            ParameterSpec::new("Blink").with_quantization(7, false),
        ];
        assert_eq!(total_cost(&specs), 8 + 4 + 7);
    }

    #[test]
    fn exact_fit_passes() {
        let specs = vec![ParameterSpec::new("A"), ParameterSpec::new("B")];
        let budget = check_budget(&specs, 16).unwrap();
        assert_eq!(budget.used, 16);
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn one_over_rejects_with_numbers() {
        let specs = vec![ParameterSpec::new("A"), ParameterSpec::new("B")];
        assert_eq!(
            check_budget(&specs, 15),
            Err(BudgetExceeded {
                used: 16,
                capacity: 15
            })
        );
    }
}
