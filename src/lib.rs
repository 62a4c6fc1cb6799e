//! Parse arithmetic relations like `(373.15 - x) * 3/2 < y` and rearrange
//! them to isolate a single variable.
//!
//! ```rust
//! use isolate::{solve_for, Relation};
//!
//! let relation: Relation = "x = 2 * y".parse().unwrap();
//! let solved = solve_for(&relation, "y").unwrap();
//!
//! assert_eq!(solved.to_string(), "y = (x / 2)");
//! ```

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod algebra;
mod relation;
mod solve;

pub use algebra::{
    parse, BinaryOperation, Expression, FactorError, ParseError, Token,
};
pub use relation::{Relation, RelationOp};
pub use solve::{
    solve_for, RelationSolver, SolveError, SolveOptions, SymbolicDivisor,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_thread_safe() {
        assert_send_sync::<Token>();
        assert_send_sync::<Expression>();
        assert_send_sync::<Relation>();
        assert_send_sync::<RelationSolver>();
        assert_send_sync::<ParseError>();
        assert_send_sync::<SolveError>();
        assert_send_sync::<algebra::render::HostRenderer>();
    }

    #[test]
    fn solve_on_another_thread() {
        let relation: Relation = "x = 2 * y".parse().unwrap();

        let got = std::thread::spawn(move || solve_for(&relation, "y"))
            .join()
            .unwrap()
            .unwrap();

        assert_eq!(got.to_string(), "y = (x / 2)");
    }
}
