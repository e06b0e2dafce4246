//! Module for additional computational capabilities
pub mod math_utils;
pub mod test_helper;
pub mod unlimited;
pub mod uom_macros;
pub use math_utils::{f64_to_usize, is_close, is_zero, linspace, usize_to_f64, EPSILON};
