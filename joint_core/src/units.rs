//! # Unit Types
//!
//! The engine computes in N, mm and MPa (N/mm²). Results are reported in
//! kN, kNm and kNm/rad; these wrappers carry the conversion so it is written
//! once.
//!
//! | Quantity | Internal | Reported |
//! |---|---|---|
//! | Force | N | kN |
//! | Moment | N·mm | kN·m |
//! | Rotational stiffness | N·mm/rad | kN·m/rad |
//!
//! ## Example
//!
//! ```rust
//! use joint_core::units::{Kilonewtons, KilonewtonMeters, NewtonMillimeters, Newtons};
//!
//! let f = Kilonewtons::from(Newtons(245_000.0));
//! assert_eq!(f.value(), 245.0);
//!
//! let m = KilonewtonMeters::from(NewtonMillimeters(58.0e6));
//! assert_eq!(m.value(), 58.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Declares an internal unit, its reported unit and the divisor between them.
macro_rules! reported_unit {
    ($(#[$imeta:meta])* $internal:ident => $(#[$rmeta:meta])* $reported:ident, $divisor:expr) => {
        $(#[$imeta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $internal(pub f64);

        $(#[$rmeta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $reported(pub f64);

        impl From<$internal> for $reported {
            fn from(v: $internal) -> Self {
                $reported(v.0 / $divisor)
            }
        }

        impl $reported {
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl Mul<f64> for $reported {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                $reported(self.0 * rhs)
            }
        }
    };
}

reported_unit!(
    /// Force in newtons
    Newtons =>
    /// Force in kilonewtons
    Kilonewtons, 1.0e3
);

reported_unit!(
    /// Moment in newton-millimeters
    NewtonMillimeters =>
    /// Moment in kilonewton-meters
    KilonewtonMeters, 1.0e6
);

reported_unit!(
    /// Rotational stiffness in newton-millimeters per radian
    NewtonMillimetersPerRad =>
    /// Rotational stiffness in kilonewton-meters per radian
    KilonewtonMetersPerRad, 1.0e6
);

/// Force in N reported in kN
pub fn kn(newtons: f64) -> f64 {
    Kilonewtons::from(Newtons(newtons)).value()
}
