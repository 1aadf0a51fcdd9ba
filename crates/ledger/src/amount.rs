//! Amounts of native or issued currency.

use newcoin_common::{AccountId, Currency};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A currency together with the account that issues it.
///
/// The native currency has no issuer and is represented by the zero account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Issue {
    pub currency: Currency,
    pub issuer: AccountId,
}

impl Issue {
    /// The native currency.
    pub const NATIVE: Self = Self {
        currency: Currency::XNS,
        issuer: AccountId::ZERO,
    };

    pub fn new(currency: Currency, issuer: AccountId) -> Self {
        Self { currency, issuer }
    }

    pub fn is_native(&self) -> bool {
        self.currency.is_native()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "XNS")
        } else {
            write!(f, "{}/{}", self.currency, self.issuer)
        }
    }
}

/// A signed quantity of one [`Issue`].
///
/// Values are integral units: drops for the native currency, and the
/// smallest unit the issuer recognises otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Amount {
    pub value: i64,
    pub currency: Currency,
    #[serde(default)]
    pub issuer: AccountId,
}

impl Amount {
    /// A native amount in drops.
    pub fn native(value: i64) -> Self {
        Self {
            value,
            currency: Currency::XNS,
            issuer: AccountId::ZERO,
        }
    }

    /// An amount of `currency` issued by `issuer`.
    pub fn issued(value: i64, currency: Currency, issuer: AccountId) -> Self {
        Self {
            value,
            currency,
            issuer,
        }
    }

    pub fn is_native(&self) -> bool {
        self.currency.is_native()
    }

    pub fn is_positive(&self) -> bool {
        self.value > 0
    }

    pub fn issue(&self) -> Issue {
        Issue::new(self.currency, self.issuer)
    }

    /// Same issue, different value.
    pub fn with_value(&self, value: i64) -> Self {
        Self { value, ..*self }
    }

    /// Native amounts must carry the zero issuer, issued amounts a real one.
    pub fn is_well_formed(&self) -> bool {
        if self.is_native() {
            self.issuer.is_zero()
        } else {
            !self.issuer.is_zero()
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.issue())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_amount() {
        let amount = Amount::native(100);
        assert!(amount.is_native());
        assert!(amount.is_well_formed());
        assert_eq!(amount.issue(), Issue::NATIVE);
        assert_eq!(amount.to_string(), "100 XNS");
    }

    #[test]
    fn test_issued_amount() {
        let usd = Currency::from_code("USD").unwrap();
        let issuer = AccountId([1u8; 20]);
        let amount = Amount::issued(5, usd, issuer);
        assert!(!amount.is_native());
        assert!(amount.is_well_formed());
        assert_eq!(amount.with_value(7).value, 7);
        assert_eq!(amount.with_value(7).issue(), amount.issue());
        assert!(!Amount::issued(5, usd, AccountId::ZERO).is_well_formed());
    }

    #[test]
    fn test_json_form() {
        let usd = Currency::from_code("USD").unwrap();
        let amount = Amount::issued(5, usd, AccountId([0xab; 20]));
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(
            json,
            r#"{"value":5,"currency":"USD","issuer":"abababababababababababababababababababab"}"#
        );
        let native: Amount = serde_json::from_str(r#"{"value":9,"currency":"XNS"}"#).unwrap();
        assert_eq!(native, Amount::native(9));
    }
}
