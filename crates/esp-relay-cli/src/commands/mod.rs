//! Command implementations.

pub mod switch;

pub use switch::run_switch;
