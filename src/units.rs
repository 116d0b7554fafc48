//! System of units used by the simulation archives.
//!
//! Values stored in depo and frame archives are expressed in a system where
//! the millimetre and the nanosecond are both `1.0`. Divide a raw value by one
//! of these constants to express it in that unit.

/// One nanosecond (time base unit).
pub const NANOSECOND: f64 = 1.0;
/// One microsecond.
pub const MICROSECOND: f64 = 1000.0 * NANOSECOND;
/// One millisecond.
pub const MILLISECOND: f64 = 1000.0 * MICROSECOND;
/// One second.
pub const SECOND: f64 = 1000.0 * MILLISECOND;

/// One millimetre (length base unit).
pub const MILLIMETER: f64 = 1.0;
/// One centimetre.
pub const CENTIMETER: f64 = 10.0 * MILLIMETER;
/// One metre.
pub const METER: f64 = 1000.0 * MILLIMETER;

/// Short alias for [`NANOSECOND`].
pub const NS: f64 = NANOSECOND;
/// Short alias for [`MICROSECOND`].
pub const US: f64 = MICROSECOND;
/// Short alias for [`MILLISECOND`].
pub const MS: f64 = MILLISECOND;
/// Short alias for [`MILLIMETER`].
pub const MM: f64 = MILLIMETER;
/// Short alias for [`CENTIMETER`].
pub const CM: f64 = CENTIMETER;
