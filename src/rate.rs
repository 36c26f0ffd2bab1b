use log::trace;
use rust_decimal::{Decimal, MathematicalOps};
use std::fmt;

use crate::error::{AmortizationError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Source of the periodic rate and term an [`Amortization`](crate::Amortization) is built from.
pub trait RateSpec {
    /// Monthly rate as a decimal fraction (0.005 for 0.5% a month).
    fn monthly(&self) -> Decimal;

    /// Number of monthly periods in the term.
    fn duration(&self) -> u32;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Compounding {
    Daily,
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
}

impl Compounding {
    pub fn periods_per_year(self) -> u32 {
        match self {
            Compounding::Daily => 365,
            Compounding::Monthly => 12,
            Compounding::Quarterly => 4,
            Compounding::SemiAnnually => 2,
            Compounding::Annually => 1,
        }
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::Daily => "daily",
            Compounding::Monthly => "monthly",
            Compounding::Quarterly => "quarterly",
            Compounding::SemiAnnually => "semi-annually",
            Compounding::Annually => "annually",
        };
        write!(f, "{}", name)
    }
}

/// A constant monthly rate over a fixed number of periods.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rate {
    monthly: Decimal,
    duration: u32,
}

// precision kept for converted monthly rates
const MONTHLY_RATE_DP: u32 = 15;

impl Rate {
    pub fn new(monthly: Decimal, duration: u32) -> Self {
        Self { monthly, duration }
    }

    /// Converts a nominal annual rate compounded `compounding` times a year into the
    /// equivalent monthly rate, `(1 + nominal / m)^(m / 12) - 1`.
    ///
    /// Monthly compounding is exactly `nominal / 12`.
    pub fn from_annual(nominal: Decimal, compounding: Compounding, duration: u32) -> Result<Self> {
        let per_year = Decimal::from(compounding.periods_per_year());
        let months = Decimal::from(12);

        let monthly = if compounding == Compounding::Monthly || nominal.is_zero() {
            nominal / months
        } else {
            let growth = Decimal::ONE
                .checked_add(nominal / per_year)
                .and_then(|periodic| periodic.checked_powd(per_year / months))
                .ok_or(AmortizationError::Overflow {
                    context: "monthly rate conversion",
                })?;
            (growth - Decimal::ONE).round_dp(MONTHLY_RATE_DP)
        };
        trace!(
            "nominal {} compounded {} -> monthly rate {}",
            nominal,
            compounding,
            monthly
        );

        Ok(Self { monthly, duration })
    }
}

impl RateSpec for Rate {
    fn monthly(&self) -> Decimal {
        self.monthly
    }

    fn duration(&self) -> u32 {
        self.duration
    }
}
