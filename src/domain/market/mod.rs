pub mod frame;
pub mod signal;
pub mod types;
