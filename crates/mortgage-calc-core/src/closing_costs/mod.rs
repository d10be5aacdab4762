pub mod brackets;
pub mod estimator;
pub mod jurisdiction;
