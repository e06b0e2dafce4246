#![warn(missing_docs)]
//! Macros for creating wavelengths (or lists of wavelengths) as [`uom`] lengths.
//!
//! The matrix engine itself is unit-agnostic. Wavelengths handed to
//! [`RefractiveIndex`](crate::refractive_index::RefractiveIndex) models carry their unit explicitly.
/// helper macro to create the units
#[macro_export]
macro_rules! uom_unit_creator {
    ($unit:ident, $unit_type:ident, $val1:expr) => {
        $unit_type::new::<$unit>($val1)
    };
    ($unit:ident, $unit_type:ident, $( $x:expr ),*) => {
        {
            use std::vec::Vec;
            let mut temp_vec = Vec::new();
            $(
                temp_vec.push($unit_type::new::<$unit>($x));
            )*
            temp_vec
        }
    };
}
///macro to create a Length in micrometer
#[macro_export]
macro_rules! micrometer {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Length, length::micrometer};
        $crate::uom_unit_creator![micrometer, Length, $( $x ),*]
    }};
}
///macro to create a Length in nanometer
#[macro_export]
macro_rules! nanometer {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Length, length::nanometer};
        $crate::uom_unit_creator![nanometer, Length, $( $x ),*]
    }};
}
