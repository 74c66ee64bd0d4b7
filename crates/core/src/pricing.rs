//! Pricing Snapshots
//!
//! The pricing columns shared by a booking and its legacy reservation, in whole minor units.

use std::{fmt, num::TryFromIntError};

use rusty_money::{Money, iso::Currency};
use serde::Serialize;
use thiserror::Error;

use crate::{
    balance::{BalanceError, calculate_balance},
    discounts::{DiscountCategory, DiscountSet},
};

/// Errors raised while repricing a snapshot.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// An amount does not fit in signed minor units.
    #[error("amount out of range")]
    OutOfRange(#[from] TryFromIntError),

    /// The balance could not be calculated.
    #[error(transparent)]
    Balance(#[from] BalanceError),
}

/// A pricing column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingField {
    /// List price
    ListPrice,

    /// Deposit
    Deposit,

    /// One of the discount columns
    Discount(DiscountCategory),

    /// Derived final balance
    FinalBalance,
}

impl fmt::Display for PricingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListPrice => f.write_str("list_price"),
            Self::Deposit => f.write_str("deposit"),
            Self::Discount(category) => write!(f, "{category}_discount"),
            Self::FinalBalance => f.write_str("final_balance"),
        }
    }
}

/// Numeric pricing state of a booking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PricingSnapshot {
    /// Quoted list price
    pub list_price: u64,

    /// Deposit already paid
    pub deposit: u64,

    /// Event discount
    pub event_discount: u64,

    /// Partner code discount
    pub referral_discount: u64,

    /// Review discount
    pub review_discount: u64,

    /// Manual admin discount
    pub special_discount: u64,

    /// Remaining payment due
    pub final_balance: u64,
}

impl PricingSnapshot {
    /// Discount column for a category.
    #[must_use]
    pub const fn discount(&self, category: DiscountCategory) -> u64 {
        match category {
            DiscountCategory::Event => self.event_discount,
            DiscountCategory::Referral => self.referral_discount,
            DiscountCategory::Review => self.review_discount,
            DiscountCategory::Special => self.special_discount,
        }
    }

    /// Replace the discount column for a category.
    pub const fn set_discount(&mut self, category: DiscountCategory, amount: u64) {
        match category {
            DiscountCategory::Event => self.event_discount = amount,
            DiscountCategory::Referral => self.referral_discount = amount,
            DiscountCategory::Review => self.review_discount = amount,
            DiscountCategory::Special => self.special_discount = amount,
        }
    }

    /// Collect the non-zero discount columns into a [`DiscountSet`].
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::OutOfRange`] if an amount does not fit in `i64`.
    pub fn discount_set<'a>(&self, currency: &'a Currency) -> Result<DiscountSet<'a>, PricingError> {
        DiscountCategory::ALL
            .into_iter()
            .filter(|category| self.discount(*category) > 0)
            .map(|category| -> Result<_, PricingError> {
                let amount = i64::try_from(self.discount(category))?;

                Ok((category, Money::from_minor(amount, currency)))
            })
            .collect()
    }

    /// Recalculate the final balance from the other columns.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if an amount is out of range or the balance cannot be computed.
    pub fn repriced(self, currency: &Currency) -> Result<Self, PricingError> {
        let list_price = Money::from_minor(i64::try_from(self.list_price)?, currency);
        let deposit = Money::from_minor(i64::try_from(self.deposit)?, currency);
        let discounts = self.discount_set(currency)?;

        let balance = calculate_balance(&list_price, &deposit, &discounts)?;

        Ok(Self {
            final_balance: u64::try_from(balance.final_balance.to_minor_units())?,
            ..self
        })
    }

    /// Columns whose values differ between `self` and `other`.
    #[must_use]
    pub fn drift(&self, other: &Self) -> Vec<PricingField> {
        let mut fields = Vec::new();

        if self.list_price != other.list_price {
            fields.push(PricingField::ListPrice);
        }

        if self.deposit != other.deposit {
            fields.push(PricingField::Deposit);
        }

        fields.extend(
            DiscountCategory::ALL
                .into_iter()
                .filter(|category| self.discount(*category) != other.discount(*category))
                .map(PricingField::Discount),
        );

        if self.final_balance != other.final_balance {
            fields.push(PricingField::FinalBalance);
        }

        fields
    }
}
