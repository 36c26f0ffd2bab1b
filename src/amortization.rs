use chrono::{Months, NaiveDate};
use log::{debug, trace, warn};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{AmortizationError, Result};
use crate::rate::RateSpec;

/// Rounds to whole cents, halves away from zero.
pub fn round_cents(amt: Decimal) -> Decimal {
    let rounded = amt.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// One settled period of a schedule.
///
/// `payment` is a cash outflow and therefore negative.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Period {
    pub principal: Decimal,
    pub rate: Decimal,
    pub payment: Decimal,
}

impl Period {
    pub fn new(principal: Decimal, rate: Decimal, payment: Decimal) -> Self {
        Self {
            principal,
            rate,
            payment,
        }
    }

    /// Interest charged for the period.
    pub fn interest(&self) -> Decimal {
        round_cents(self.principal * self.rate)
    }

    /// Balance owed at the end of the period.
    pub fn balance(&self) -> Decimal {
        self.principal + self.payment + self.interest()
    }

    /// Part of the payment that went to principal rather than interest.
    pub fn principal_paid(&self) -> Decimal {
        -self.payment - self.interest()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "principal ${:.2}, payment ${:.2}, interest ${:.2}, ending balance ${:.2}",
            self.principal,
            self.payment,
            self.interest(),
            round_cents(self.balance())
        )
    }
}

/// Fixed payment that amortizes `balance` over `periods` periods at periodic `rate`,
/// `-(balance * (rate + rate / ((1 + rate)^periods - 1)))` rounded to cents.
///
/// A zero rate pays the balance off in equal instalments.
pub fn payment(balance: Decimal, rate: Decimal, periods: u32) -> Result<Decimal> {
    if periods == 0 {
        return Err(AmortizationError::InvalidArgument {
            field: "periods",
            reason: "must be greater than zero".to_string(),
        });
    }
    if balance < Decimal::ZERO {
        return Err(AmortizationError::InvalidArgument {
            field: "balance",
            reason: format!("must not be negative, got {}", balance),
        });
    }

    let count = Decimal::from(periods);
    if rate.is_zero() {
        return Ok(round_cents(-(balance / count)));
    }

    let growth = Decimal::ONE
        .checked_add(rate)
        .and_then(|base| base.checked_powu(u64::from(periods)))
        .ok_or(AmortizationError::Overflow {
            context: "compound growth factor",
        })?;
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        // rate too small to register over the term
        return Ok(round_cents(-(balance / count)));
    }

    let factor = rate
        .checked_div(denominator)
        .and_then(|spread| rate.checked_add(spread))
        .ok_or(AmortizationError::Overflow {
            context: "payment factor",
        })?;
    let amount = balance
        .checked_mul(factor)
        .ok_or(AmortizationError::Overflow { context: "payment" })?;

    Ok(round_cents(-amount))
}

/// A fixed-payment amortization schedule.
///
/// Built in one shot by [`Amortization::new`]; periods are produced until the balance
/// reaches exactly zero or the term runs out.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Amortization {
    principal: Decimal,
    rate: Decimal,
    duration: u32,
    balance: Decimal,
    payment: Decimal,
    periods: Vec<Period>,
}

impl Amortization {
    pub fn new<R: RateSpec + ?Sized>(principal: Decimal, rate: &R) -> Result<Self> {
        let duration = rate.duration();
        if duration == 0 {
            return Err(AmortizationError::InvalidConfiguration(
                "rate duration must be at least one period".to_string(),
            ));
        }
        if principal < Decimal::ZERO {
            return Err(AmortizationError::InvalidArgument {
                field: "principal",
                reason: format!("must not be negative, got {}", principal),
            });
        }

        let mut schedule = Self {
            principal,
            rate: rate.monthly(),
            duration,
            balance: principal,
            payment: Decimal::ZERO,
            periods: Vec::new(),
        };
        schedule.compute()?;
        Ok(schedule)
    }

    /// Runs the recurrence over the remaining term.
    ///
    /// A payment larger than the payoff amount (balance plus the period's interest) is
    /// cut to exactly that amount, so the final period ends on zero. A clamped payment
    /// can therefore exceed the period's opening principal by that period's interest.
    fn compute(&mut self) -> Result<()> {
        // periods is empty on the only call, so this is the full term
        let remaining = self.duration - self.periods.len() as u32;
        self.payment = payment(self.balance, self.rate, remaining)?;
        debug!(
            "principal {}, monthly rate {}, {} periods, payment {}",
            self.principal, self.rate, remaining, self.payment
        );

        for _ in 0..remaining {
            // never pay more than it takes to clear the balance
            let payoff = self
                .balance
                .checked_mul(self.rate)
                .and_then(|interest| self.balance.checked_add(round_cents(interest)))
                .ok_or(AmortizationError::Overflow { context: "payoff" })?;
            let pmt = if -self.payment > payoff {
                -payoff
            } else {
                self.payment
            };

            let period = Period::new(self.balance, self.rate, pmt);
            self.balance = period.balance();
            trace!("period {}, {}", self.periods.len() + 1, period);
            self.periods.push(period);

            if self.balance.is_zero() {
                break;
            }
        }

        if self.balance.is_zero() {
            debug!("settled after {} of {} periods", self.periods.len(), self.duration);
        } else {
            warn!(
                "term of {} periods exhausted with residual balance {}",
                self.duration, self.balance
            );
        }
        Ok(())
    }

    pub fn principal(&self) -> Decimal {
        self.principal
    }

    /// Monthly rate applied to every period.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Nominal number of periods.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Balance left after the last produced period.
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// The fixed payment. A final period may pay less, see [`Period::payment`].
    pub fn payment(&self) -> Decimal {
        self.payment
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    /// Period by its 1-based number.
    pub fn period(&self, number: usize) -> Option<&Period> {
        number.checked_sub(1).and_then(|i| self.periods.get(i))
    }

    pub fn interest(&self) -> Vec<Decimal> {
        self.periods.iter().map(Period::interest).collect()
    }

    pub fn payments(&self) -> Vec<Decimal> {
        self.periods.iter().map(|p| p.payment).collect()
    }

    pub fn total_interest(&self) -> Decimal {
        self.periods.iter().map(Period::interest).sum()
    }

    pub fn total_payments(&self) -> Decimal {
        self.periods.iter().map(|p| p.payment).sum()
    }

    pub fn is_settled_early(&self) -> bool {
        self.balance.is_zero() && self.periods.len() < self.duration as usize
    }

    /// Due date of each produced period, one calendar month apart starting at `first`.
    ///
    /// Dates are offset from `first` rather than chained, so a schedule starting on the
    /// 31st returns to the 31st whenever the month has one.
    pub fn payment_dates(&self, first: NaiveDate) -> Result<Vec<NaiveDate>> {
        (0..self.periods.len() as u32)
            .map(|i| {
                first
                    .checked_add_months(Months::new(i))
                    .ok_or(AmortizationError::Overflow {
                        context: "payment date",
                    })
            })
            .collect()
    }
}

impl fmt::Display for Amortization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, period) in self.periods.iter().enumerate() {
            writeln!(f, "period {}, {}", i + 1, period)?;
        }
        Ok(())
    }
}

/// Amortizes `principal` against `rate`; shorthand for [`Amortization::new`].
pub fn amortize<R: RateSpec + ?Sized>(principal: Decimal, rate: &R) -> Result<Amortization> {
    Amortization::new(principal, rate)
}
