//! Primality and divisor arithmetic for a single `u64`.
//!
//! Pure functions, no state. Every function is total over the whole domain.

use std::collections::BTreeSet;

/// Check whether `n` is prime.
///
/// Trial division by 2 and 3, then by candidate pairs `i`, `i + 2` for
/// `i = 5, 11, 17, ...` up to `√n`. O(√n) time, O(1) space.
///
/// The loop bound is written as `i <= n / i` so it never overflows, even
/// for values close to `u64::MAX`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut i: u64 = 5;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Proper divisors of `n`, excluding 1 and `n` itself.
///
/// For every `i` in `[2, ⌊√n⌋]` that divides `n`, both `i` and `n / i` are
/// inserted. A perfect square contributes its root once because the result
/// is a set. Empty for 0, 1, and every prime.
pub fn factorize(n: u64) -> BTreeSet<u64> {
    let mut factors = BTreeSet::new();
    // 0 and 1 have no proper divisors, 2 and 3 are prime.
    if n < 4 {
        return factors;
    }

    let mut i: u64 = 2;
    while i <= n / i {
        if n % i == 0 {
            factors.insert(i);
            factors.insert(n / i);
        }
        i += 1;
    }
    factors
}

/// True iff the two factor sets share at least one element.
pub fn has_common_factor(a: &BTreeSet<u64>, b: &BTreeSet<u64>) -> bool {
    // Iterate the smaller set, look up in the larger.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().any(|factor| large.contains(factor))
}

/// Whether a cell with `value`/`factors` should be highlighted for a
/// selection whose factor set is `selected`.
///
/// A cell matches when its value is itself one of the selected factors, or
/// when its own factors intersect the selection.
pub fn shares_factor_with(selected: &BTreeSet<u64>, value: u64, factors: &BTreeSet<u64>) -> bool {
    selected.contains(&value) || has_common_factor(selected, factors)
}
