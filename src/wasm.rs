use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::eval::EvalMode;
use crate::program::Program;

thread_local! {
    static PROGRAM: RefCell<Program> = RefCell::new(Program::new());
}

#[wasm_bindgen]
pub fn eval_line(code: &str) -> String {
    PROGRAM.with(|program| program.borrow_mut().eval_line(code))
}

#[wasm_bindgen]
pub fn eval_program(code: &str) -> String {
    PROGRAM.with(|program| program.borrow_mut().eval(code))
}

/// 0 selects small-step evaluation, 1 big-step. Returns false and leaves the
/// mode alone for anything else.
#[wasm_bindgen]
pub fn set_eval_mode(serialized: u8) -> bool {
    let mode = match serialized {
        0b0000_0000 => EvalMode::SmallStep,
        0b0000_0001 => EvalMode::BigStep,
        _ => return false,
    };
    PROGRAM.with(|program| program.borrow_mut().set_mode(mode));
    true
}

#[wasm_bindgen]
pub fn reset() {
    PROGRAM.with(|program| program.borrow_mut().reset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session() {
        reset();
        assert!(set_eval_mode(1));
        assert!(!set_eval_mode(7));
        assert_eq!(eval_line("two = 2"), "");
        assert_eq!(eval_line("iszero (pred (pred two))"), "true");
        // a whole program starts over
        assert_eq!(eval_program("two;"), "error: name error: variable two not found\n");
        assert!(set_eval_mode(0));
        PROGRAM.with(|program| {
            assert_eq!(program.borrow().config().mode, EvalMode::SmallStep)
        });
    }
}
