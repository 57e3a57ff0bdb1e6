use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// Currency code for the oracle fee token.
pub const FEE_TOKEN_CODE: &str = "LINK";
/// The fee token uses 18 decimal places, as do native chain assets.
pub const FEE_TOKEN_DECIMALS: u32 = 18;

//--------------------------------------    TokenAmount      ---------------------------------------------------------
/// An amount of a fungible token, in base (indivisible) units.
///
/// Both the oracle fee token and traded crypto assets are denominated in 18-decimal base units, so a single amount
/// type covers fee debits, escrow locks and settlement transfers.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct TokenAmount(i64);

op!(binary TokenAmount, Add, add);
op!(binary TokenAmount, Sub, sub);
op!(inplace TokenAmount, SubAssign, sub_assign);
op!(unary TokenAmount, Neg, neg);

impl Mul<i64> for TokenAmount {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a token amount: {0}")]
pub struct TokenAmountConversionError(String);

impl From<i64> for TokenAmount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for TokenAmount {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for TokenAmount {}

impl TryFrom<u64> for TokenAmount {
    type Error = TokenAmountConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(TokenAmountConversionError(format!("Value {} is too large to convert to TokenAmount", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 < 10_000 {
            write!(f, "{} base units", self.0)
        } else {
            let whole = self.0 as f64 / 10f64.powi(FEE_TOKEN_DECIMALS as i32);
            write!(f, "{whole:0.6} tokens")
        }
    }
}

impl TokenAmount {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// One whole token, i.e. 10^18 base units.
    pub fn one_token() -> Self {
        Self(10i64.pow(FEE_TOKEN_DECIMALS))
    }

    pub fn from_tokens(tokens: i64) -> Self {
        Self(tokens * 10i64.pow(FEE_TOKEN_DECIMALS))
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}
