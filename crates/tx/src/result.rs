//! Transaction engine results.
//!
//! Every apply call ends in exactly one [`TransactionEngineResult`]. Results
//! fall into five bands that decide what happens to the transaction next:
//!
//! | Band | Codes | Fee | Retry |
//! |------|-------|-----|-------|
//! | [`Malformed`] | −300…−201 | claimed | never |
//! | [`Rejected`] | −200…−101 | claimed | never |
//! | [`Fault`] | −100…−1 | not claimed | never; operator-visible |
//! | success | 0 | claimed | n/a |
//! | [`Retry`] | > 0 | not yet claimed | in a later ledger |
//!
//! The band is carried by the enum variant, so no code can drift between
//! bands. Numeric codes are *not* stable across versions: logs, RPC and
//! cross-node comparison use [`TransactionEngineResult::token`].

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Result of handlers, directory operations and validation steps.
///
/// `Err` carries the classified failure; `?` propagates it unchanged.
pub type TerResult<T = ()> = std::result::Result<T, TransactionEngineResult>;

/// Short alias used throughout the handlers.
pub type Ter = TransactionEngineResult;

/// Result bands, most negative first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResultBand {
    Malformed,
    LedgerRejected,
    EngineFault,
    Success,
    Retriable,
}

macro_rules! band_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $base:expr, {
            $($variant:ident => ($token:literal, $human:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every code of this band in numeric order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// First numeric code of the band.
            pub const BASE: i32 = $base;

            pub fn code(self) -> i32 {
                Self::BASE + self as i32
            }

            pub fn from_code(code: i32) -> Option<Self> {
                let offset = code.checked_sub(Self::BASE)?;
                usize::try_from(offset).ok().and_then(|i| Self::ALL.get(i).copied())
            }

            pub fn token(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }

            pub fn human(self) -> &'static str {
                match self {
                    $($name::$variant => $human),+
                }
            }
        }
    };
}

band_enum!(
    /// Transaction is invalid whatever the ledger state.
    Malformed, -300, {
        GenInUse => ("tenGEN_IN_USE", "Generator already in use."),
        BadAddAuth => ("tenBAD_ADD_AUTH", "Not authorized to add account."),
        BadAmount => ("tenBAD_AMOUNT", "Can only send positive amounts."),
        BadClaimId => ("tenBAD_CLAIM_ID", "Malformed: Bad claim id."),
        BadGenAuth => ("tenBAD_GEN_AUTH", "Not authorized to claim generator."),
        BadSetId => ("tenBAD_SET_ID", "Malformed: Bad set id."),
        CreateXns => ("tenCREATEXNS", "Can not specify non XNS for Create."),
        DstIsSrc => ("tenDST_IS_SRC", "Destination may not be source."),
        DstNeeded => ("tenDST_NEEDED", "Destination not specified."),
        ExplicitXns => ("tenEXPLICITXNS", "XNS is used by default, don't specify it."),
        Redundant => ("tenREDUNDANT", "Sends same currency to self."),
        RippleEmpty => ("tenRIPPLE_EMPTY", "PathSet with no paths."),
        BadSignature => ("tenBAD_SIGNATURE", "Transaction has bad signature."),
        BadPath => ("tenBAD_PATH", "Malformed: Bad path."),
        BadOffer => ("tenBAD_OFFER", "Malformed: Bad offer."),
        BadTransit => ("tenBAD_TRANSIT", "Malformed: Bad transit parameters."),
    }
);

band_enum!(
    /// The ledger forbids this transaction instance for good.
    Rejected, -200, {
        Claimed => ("tenCLAIMED", "Can not claim a previously claimed account."),
        BadAuthMaster => ("tenBAD_AUTH_MASTER", "Auth for unclaimed account needs correct master key."),
        BadRipple => ("tenBAD_RIPPLE", "Ledger prevents ripple from succeeding."),
        Created => ("tenCREATED", "Can not create a previously created account."),
        MsgSet => ("tenMSG_SET", "Can't change a message key."),
        Already => ("terALREADY", "The exact transaction was already in this ledger."),
    }
);

band_enum!(
    /// The engine could not process the transaction.
    Fault, -100, {
        Failed => ("tenFAILED", "Something broke horribly"),
        InsufFeeP => ("tenINSUF_FEE_P", "fee totally insufficient"),
        Invalid => ("tenINVALID", "The transaction is ill-formed"),
        Unknown => ("tenUNKNOWN", "The transactions requires logic not implemented yet"),
        BadLedger => ("tenBAD_LEDGER", "The target ledger is not available"),
    }
);

band_enum!(
    /// Conflicts with the current ledger; may succeed later.
    Retry, 1, {
        BadAuth => ("terBAD_AUTH", "Not authorized to use account."),
        BadRipple => ("terBAD_RIPPLE", "No ripple path can be satisfied."),
        BadSeq => ("terBAD_SEQ", "This sequence number should be zero for prepaid transactions."),
        Created => ("terCREATED", "Can not create a previously created account."),
        DirFull => ("terDIR_FULL", "Can not add entry to full dir."),
        FundsSpent => ("terFUNDS_SPENT", "Can't set password, password set funds already spent."),
        InsufFeeB => ("terINSUF_FEE_B", "Account balance can't pay fee"),
        InsufFeeT => ("terINSUF_FEE_T", "fee insufficient now (account doesn't exist, network load)"),
        NodeNotFound => ("terNODE_NOT_FOUND", "Can not delete a dir node."),
        NodeNotMentioned => ("terNODE_NOT_MENTIONED", "Could not remove node from a dir."),
        NodeNoRoot => ("terNODE_NO_ROOT", "Directory doesn't exist."),
        NoAccount => ("terNO_ACCOUNT", "The source account does not exist"),
        NoDst => ("terNO_DST", "The destination does not exist"),
        NoLineNoZero => ("terNO_LINE_NO_ZERO", "Can't zero non-existant line, destination might make it."),
        NoPath => ("terNO_PATH", "No path existed or met transaction/balance requirements"),
        OverLimit => ("terOVER_LIMIT", "Over limit."),
        PastLedger => ("terPAST_LEDGER", "The transaction expired and can't be applied"),
        PastSeq => ("terPAST_SEQ", "This sequence number has already past"),
        PreSeq => ("terPRE_SEQ", "Missing/inapplicable prior transaction"),
        SetMissingDst => ("terSET_MISSING_DST", "Can't set password, destination missing."),
        Unclaimed => ("terUNCLAIMED", "Can not use an unclaimed account."),
        Unfunded => ("terUNFUNDED", "Source account had insufficient balance for transaction."),
        Owners => ("terOWNERS", "Account still owns ledger objects."),
        NoOffer => ("terNO_OFFER", "Offer does not exist."),
        NoEntry => ("terNO_ENTRY", "No such entry."),
        NicknameInUse => ("terNICKNAME_IN_USE", "Nickname is held by another account."),
    }
);

/// Outcome of applying one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionEngineResult {
    Malformed(Malformed),
    LedgerRejected(Rejected),
    EngineFault(Fault),
    Success,
    Retriable(Retry),
}

impl TransactionEngineResult {
    pub fn band(&self) -> ResultBand {
        match self {
            Ter::Malformed(_) => ResultBand::Malformed,
            Ter::LedgerRejected(_) => ResultBand::LedgerRejected,
            Ter::EngineFault(_) => ResultBand::EngineFault,
            Ter::Success => ResultBand::Success,
            Ter::Retriable(_) => ResultBand::Retriable,
        }
    }

    /// Numeric code. Unstable across versions; use [`Self::token`] externally.
    pub fn code(&self) -> i32 {
        match self {
            Ter::Malformed(r) => r.code(),
            Ter::LedgerRejected(r) => r.code(),
            Ter::EngineFault(r) => r.code(),
            Ter::Success => 0,
            Ter::Retriable(r) => r.code(),
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Ter::Success),
            c if c <= -201 => Malformed::from_code(c).map(Ter::Malformed),
            c if c <= -101 => Rejected::from_code(c).map(Ter::LedgerRejected),
            c if c < 0 => Fault::from_code(c).map(Ter::EngineFault),
            _ => Retry::from_code(code).map(Ter::Retriable),
        }
    }

    /// Stable token such as `terNO_PATH`.
    pub fn token(&self) -> &'static str {
        match self {
            Ter::Malformed(r) => r.token(),
            Ter::LedgerRejected(r) => r.token(),
            Ter::EngineFault(r) => r.token(),
            Ter::Success => "terSUCCESS",
            Ter::Retriable(r) => r.token(),
        }
    }

    pub fn human(&self) -> &'static str {
        match self {
            Ter::Malformed(r) => r.human(),
            Ter::LedgerRejected(r) => r.human(),
            Ter::EngineFault(r) => r.human(),
            Ter::Success => "The transaction was applied",
            Ter::Retriable(r) => r.human(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Ter::Success)
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self, Ter::Retriable(_))
    }

    /// Whether the failure permanently claims the fee.
    pub fn claims_fee(&self) -> bool {
        matches!(self, Ter::Malformed(_) | Ter::LedgerRejected(_))
    }

    /// `Ok(())` for success, `Err(self)` otherwise.
    pub fn into_result(self) -> TerResult {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Every result, band by band.
    pub fn all() -> impl Iterator<Item = Ter> {
        Malformed::ALL
            .iter()
            .map(|r| Ter::Malformed(*r))
            .chain(Rejected::ALL.iter().map(|r| Ter::LedgerRejected(*r)))
            .chain(Fault::ALL.iter().map(|r| Ter::EngineFault(*r)))
            .chain(std::iter::once(Ter::Success))
            .chain(Retry::ALL.iter().map(|r| Ter::Retriable(*r)))
    }

    /// Looks a result up by token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::all().find(|r| r.token() == token)
    }
}

impl From<TerResult> for TransactionEngineResult {
    fn from(result: TerResult) -> Self {
        match result {
            Ok(()) => Ter::Success,
            Err(ter) => ter,
        }
    }
}

impl From<Malformed> for TransactionEngineResult {
    fn from(r: Malformed) -> Self {
        Ter::Malformed(r)
    }
}

impl From<Rejected> for TransactionEngineResult {
    fn from(r: Rejected) -> Self {
        Ter::LedgerRejected(r)
    }
}

impl From<Fault> for TransactionEngineResult {
    fn from(r: Fault) -> Self {
        Ter::EngineFault(r)
    }
}

impl From<Retry> for TransactionEngineResult {
    fn from(r: Retry) -> Self {
        Ter::Retriable(r)
    }
}

impl fmt::Display for TransactionEngineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for TransactionEngineResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for TransactionEngineResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::from_token(&token)
            .ok_or_else(|| de::Error::custom(format!("unknown result token {}", token)))
    }
}

/// Token and human-readable description for a numeric code.
///
/// Defined for every code the engine produces; `None` means the caller holds
/// a number from some other version of the enumeration.
pub fn classify(code: i32) -> Option<(&'static str, &'static str)> {
    TransactionEngineResult::from_code(code).map(|r| (r.token(), r.human()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_stay_in_their_band() {
        for result in Ter::all() {
            let code = result.code();
            match result.band() {
                ResultBand::Malformed => assert!((-300..=-201).contains(&code), "{}", result),
                ResultBand::LedgerRejected => assert!((-200..=-101).contains(&code), "{}", result),
                ResultBand::EngineFault => assert!((-100..=-1).contains(&code), "{}", result),
                ResultBand::Success => assert_eq!(code, 0),
                ResultBand::Retriable => assert!(code > 0, "{}", result),
            }
        }
    }

    #[test]
    fn test_classify_is_total() {
        let mut tokens = HashSet::new();
        for result in Ter::all() {
            let (token, human) = classify(result.code()).unwrap();
            assert!(!token.is_empty());
            assert!(!human.is_empty());
            assert!(tokens.insert(token), "duplicate token {}", token);
            assert_eq!(Ter::from_code(result.code()), Some(result));
            assert_eq!(Ter::from_token(token), Some(result));
        }
        assert_eq!(tokens.len(), 16 + 6 + 5 + 1 + 26);
    }

    #[test]
    fn test_header_values() {
        assert_eq!(Ter::Malformed(Malformed::GenInUse).code(), -300);
        assert_eq!(Ter::Malformed(Malformed::RippleEmpty).code(), -289);
        assert_eq!(Ter::LedgerRejected(Rejected::Already).code(), -195);
        assert_eq!(Ter::EngineFault(Fault::Unknown).code(), -97);
        assert_eq!(Ter::Retriable(Retry::BadAuth).code(), 1);
        assert_eq!(Ter::Retriable(Retry::Unfunded).code(), 22);
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(classify(-250), None);
        assert_eq!(classify(-1), None);
        assert_eq!(classify(1000), None);
        assert_eq!(classify(i32::MIN), None);
    }

    #[test]
    fn test_fee_and_retry_semantics() {
        assert!(Ter::Malformed(Malformed::BadAmount).claims_fee());
        assert!(Ter::LedgerRejected(Rejected::Already).claims_fee());
        assert!(!Ter::EngineFault(Fault::Failed).claims_fee());
        assert!(!Ter::Retriable(Retry::NoPath).claims_fee());
        assert!(Ter::Retriable(Retry::NoPath).is_retriable());
        assert!(Ter::Success.is_success());
        assert_eq!(Ter::Success.into_result(), Ok(()));
        assert_eq!(Ter::from(Err(Retry::DirFull.into())), Ter::Retriable(Retry::DirFull));
    }

    #[test]
    fn test_display_is_token() {
        assert_eq!(Ter::Retriable(Retry::NoPath).to_string(), "terNO_PATH");
        assert_eq!(Ter::Success.to_string(), "terSUCCESS");
    }
}
