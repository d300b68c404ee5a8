pub mod error;
pub mod evaluator;
