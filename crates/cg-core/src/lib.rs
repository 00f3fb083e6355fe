//! cg-core: shared foundation for ceagen.
//!
//! Contains:
//! - units (uom SI types, constructors, bar/atm conversions)
//! - numeric (Real + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CgError, CgResult};
pub use numeric::*;
pub use units::*;
