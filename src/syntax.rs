pub mod print;
pub mod term;
pub mod ty;

pub use self::print::{render, render_type, RenderMode};
pub use self::term::{numeral, substitute_top, Branches, Fields, Term};
pub use self::ty::Type;

use crate::context::Binding;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Eval(Term),
    Bind(String, Binding),
}

pub trait Shift {
    /// Add `d` to every free index at or above `cutoff`, bumping the cutoff
    /// by one whenever a binder is crossed
    fn shift_above(&self, d: isize, cutoff: usize) -> Self;

    fn shift(&self, d: isize) -> Self
    where
        Self: Sized,
    {
        self.shift_above(d, 0)
    }
}

pub(crate) fn shift_index(index: usize, d: isize, cutoff: usize) -> usize {
    if index < cutoff {
        return index;
    }
    let shifted = (index as isize).checked_add(d).filter(|shifted| *shifted >= 0);
    debug_assert!(shifted.is_some(), "shifted free index {} below zero", index);
    shifted.map_or(index, |shifted| shifted as usize)
}

const MIN_STACK_RED_ZONE: usize = 32 * 1024;
const STACK_GROWTH_SIZE: usize = 1024 * 1024;

/// Numerals are chains of `succ`, so every pass over a term recurses once
/// per unit. Recursive passes go through here to move onto a fresh stack
/// segment before the current one runs out.
pub(crate) fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_index_respects_cutoff() {
        assert_eq!(shift_index(0, 3, 1), 0);
        assert_eq!(shift_index(2, -1, 1), 1);
        assert_eq!(shift_index(2, 2, 0), 4);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "below zero"))]
    fn shift_below_zero_keeps_index() {
        assert_eq!(shift_index(0, -1, 0), 0);
    }
}
