// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fixed-point monetary amounts.
//!
//! Every amount in the ledger flows through [`Money`], a thin wrapper over
//! [`rust_decimal::Decimal`], so sums never pick up binary floating-point drift.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

fn saturate(value: Option<Decimal>, negative: bool) -> Decimal {
    value.unwrap_or(if negative { Decimal::MIN } else { Decimal::MAX })
}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Upper bound on the magnitude of anything written to a ledger: one quadrillion.
    pub const LIMIT: Money = Money(Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0));

    pub fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Builds an amount from integer minor units, e.g. `from_minor(5673, 2)` is `56.73`.
    pub fn from_minor(units: i64, scale: u32) -> Self {
        Money(Decimal::new(units, scale))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Multiplies by a plain factor (used for prorating budgets). Saturates.
    pub fn scale(&self, factor: Decimal) -> Self {
        let negative = self.0.is_sign_negative() != factor.is_sign_negative();
        Money(saturate(self.0.checked_mul(factor), negative))
    }

    /// `self / whole * 100`, or zero when `whole` is not positive. Saturates.
    pub fn percent_of(&self, whole: Money) -> Decimal {
        if !whole.is_positive() {
            return Decimal::ZERO;
        }
        let negative = self.is_negative();
        let ratio = saturate(self.0.checked_div(whole.0), negative);
        saturate(ratio.checked_mul(Decimal::ONE_HUNDRED), negative)
    }

    pub fn round_cents(&self) -> Self {
        Money(self.0.round_dp(2))
    }

    /// Whole cents within [`Money::LIMIT`]; anything else is refused at the store boundary.
    pub fn is_storable(&self) -> bool {
        self.0.abs() <= Money::LIMIT.0 && *self == self.round_cents()
    }

    /// Short form with K/M suffixes for dashboards: `$950.00`, `$1.2K`, `$3.4M`.
    /// The suffix is picked after rounding, so `999.996` reads `$1.0K`.
    pub fn compact(&self) -> String {
        let round = |d: Decimal, dp: u32| {
            d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        };
        let sign = if self.is_negative() { "-" } else { "" };
        let mag = round(self.0.abs(), 2);
        let million = Decimal::from(1_000_000);
        let thousand = Decimal::from(1_000);
        let thousands = round(mag / thousand, 1);
        if mag >= million || thousands >= thousand {
            format!("{}${:.1}M", sign, round(mag / million, 1))
        } else if mag >= thousand {
            format!("{}${:.1}K", sign, thousands)
        } else {
            format!("{}${:.2}", sign, mag)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<Decimal>().map(Money)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money(d)
    }
}

impl From<i64> for Money {
    fn from(v: i64) -> Self {
        Money(Decimal::from(v))
    }
}

/// Arithmetic saturates at `Decimal::MIN`/`Decimal::MAX` instead of panicking.
impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(saturate(self.0.checked_add(rhs.0), rhs.is_negative()))
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(saturate(self.0.checked_sub(rhs.0), rhs.is_positive()))
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}
