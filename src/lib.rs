//! Fixed-payment loan amortization.
//!
//! A schedule is built from a principal and anything implementing [`RateSpec`]:
//!
//! ```
//! use amortize::{amortize, Rate};
//! use rust_decimal_macros::dec;
//!
//! let schedule = amortize(dec!(200000), &Rate::new(dec!(0.005), 360)).unwrap();
//! assert_eq!(schedule.payment(), dec!(-1199.10));
//! ```

pub mod amortization;
pub mod error;
pub mod rate;

pub use amortization::{amortize, payment, round_cents, Amortization, Period};
pub use error::{AmortizationError, Result};
pub use rate::{Compounding, Rate, RateSpec};
