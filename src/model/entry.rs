//! One materialized natural number.

use super::number_theory::{factorize, is_prime};
use std::collections::BTreeSet;
use std::fmt;

/// A natural number annotated with primality and proper divisors.
///
/// Primality and factors are computed once, in [`Entry::compute`], and never
/// change afterwards. Fields are private so the three values cannot drift
/// apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    value: u64,
    is_prime: bool,
    factors: BTreeSet<u64>,
}

impl Entry {
    /// Compute the entry for `value`. O(√value).
    pub fn compute(value: u64) -> Self {
        Self {
            value,
            is_prime: is_prime(value),
            factors: factorize(value),
        }
    }

    /// The number itself.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Whether the number is prime.
    pub fn is_prime(&self) -> bool {
        self.is_prime
    }

    /// Divisors excluding 1 and the number itself. Empty for 0, 1, primes.
    pub fn factors(&self) -> &BTreeSet<u64> {
        &self.factors
    }

    /// Whether selecting this entry should show a factor highlight.
    ///
    /// Primes and 0..=3 have nothing to highlight.
    pub fn is_highlightable(&self) -> bool {
        !self.is_prime && self.value > 3
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(prime={})", self.value, self.is_prime)
    }
}
