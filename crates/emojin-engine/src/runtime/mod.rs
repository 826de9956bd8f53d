//! emojin runtime types: values and the variable environment.

pub mod environment;
pub mod value;

pub use environment::Environment;
pub use value::Value;
