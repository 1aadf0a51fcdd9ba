//! Transactions.
//!
//! A [`Transaction`] carries the fields every type shares (source, sequence,
//! fee, signing key, signature) and a [`TransactionKind`] with the
//! type-specific payload. Ids and signing hashes are computed over the
//! bincode encoding with a four-byte prefix, so a signature can never be
//! replayed as an id or the other way round.

use bitflags::bitflags;
use newcoin_common::{AccountId, Hash256};
use newcoin_crypto::{PublicKey, SecretKey, Signature};
use newcoin_ledger::Amount;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TxError};

/// Prefix of the transaction id preimage.
pub const PREFIX_TX_ID: [u8; 4] = *b"TXN\0";
/// Prefix of the signing preimage.
pub const PREFIX_TX_SIGN: [u8; 4] = *b"STX\0";

bitflags! {
    /// Payment options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PaymentFlags: u32 {
        /// Create the destination account with the payment.
        const CREATE_ACCOUNT = 0x0001;
    }
}

bitflags! {
    /// Offer options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct OfferFlags: u32 {
        /// Cross resting offers before placing the remainder.
        const TAKE = 0x0001;
    }
}

bitflags! {
    /// NicknameSet options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct NicknameFlags: u32 {
        /// Give up a nickname the source holds.
        const RELEASE = 0x0001;
    }
}

bitflags! {
    /// Account flag changes requested by AccountSet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct AccountSetFlags: u32 {
        const SET_DISALLOW_XNS = 0x0001;
        const CLEAR_DISALLOW_XNS = 0x0002;
    }
}

macro_rules! empty_default {
    ($($ty:ty),+) => {
        $(impl Default for $ty {
            fn default() -> Self {
                Self::empty()
            }
        })+
    };
}

empty_default!(PaymentFlags, OfferFlags, NicknameFlags, AccountSetFlags);

/// Intermediary accounts value ripples through, source and destination
/// excluded.
pub type Path = Vec<AccountId>;

/// Proof that the holder of `public_key` controls a generator.
///
/// `signature` signs the SHA-512-half of `generator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorProof {
    pub generator: Vec<u8>,
    pub public_key: PublicKey,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSetTx {
    pub email_hash: Option<Hash256>,
    pub wallet_locator: Option<Hash256>,
    pub message_key: Option<Vec<u8>>,
    pub domain: Option<String>,
    pub flags: AccountSetFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimTx {
    pub proof: GeneratorProof,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditSetTx {
    pub destination: AccountId,
    /// Currency and the limit extended to `destination`.
    pub limit: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTx {
    /// Receives the remaining native balance.
    pub destination: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceTx {
    /// Sequence of an own invoice to cancel first.
    pub cancel_sequence: Option<u32>,
    /// Who is billed. Required, with `amount`, to create an invoice.
    pub destination: Option<AccountId>,
    pub amount: Option<Amount>,
    pub invoice_id: Option<Hash256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferTx {
    /// Sequence of an own offer to cancel first.
    pub cancel_sequence: Option<u32>,
    /// What a taker of the new offer pays, i.e. what the source receives.
    pub taker_pays: Option<Amount>,
    /// What a taker of the new offer gets, i.e. what the source gives.
    pub taker_gets: Option<Amount>,
    pub flags: OfferFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicknameSetTx {
    /// Hash of the nickname.
    pub nickname: Hash256,
    #[serde(default)]
    pub minimum_offer: Option<Amount>,
    #[serde(default)]
    pub flags: NicknameFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordFundTx {
    pub destination: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordSetTx {
    /// The new regular key.
    pub authorized_key: AccountId,
    pub proof: GeneratorProof,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTx {
    pub destination: AccountId,
    pub amount: Amount,
    #[serde(default)]
    pub send_max: Option<Amount>,
    /// Explicit paths. `None` lets the engine find its own.
    #[serde(default)]
    pub paths: Option<Vec<Path>>,
    #[serde(default)]
    pub flags: PaymentFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTx {
    pub key: Hash256,
    /// Empty data removes the entry.
    #[serde(default)]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeTx {
    /// Owner of the resting offer.
    pub owner: AccountId,
    /// Sequence the owner created the offer with.
    pub offer_sequence: u32,
    /// How much of the offer's `taker_gets` to take.
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitSetTx {
    pub rate: Option<u32>,
    pub start: Option<u32>,
    pub expire: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAddTx {
    /// Master key of the new account.
    pub public_key: PublicKey,
    /// Regular key of the new account.
    pub authorized_key: AccountId,
    /// Signature by `public_key` over the SHA-512-half of `authorized_key`.
    pub signature: Signature,
    /// Native drops moved into the new account.
    pub amount: i64,
}

/// Transaction types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    AccountSet,
    Claim,
    CreditSet,
    Delete,
    Invoice,
    Offer,
    NicknameSet,
    PasswordFund,
    PasswordSet,
    Payment,
    Store,
    Take,
    TransitSet,
    WalletAdd,
}

impl TransactionType {
    pub const ALL: [TransactionType; 14] = [
        TransactionType::AccountSet,
        TransactionType::Claim,
        TransactionType::CreditSet,
        TransactionType::Delete,
        TransactionType::Invoice,
        TransactionType::Offer,
        TransactionType::NicknameSet,
        TransactionType::PasswordFund,
        TransactionType::PasswordSet,
        TransactionType::Payment,
        TransactionType::Store,
        TransactionType::Take,
        TransactionType::TransitSet,
        TransactionType::WalletAdd,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TransactionType::AccountSet => "AccountSet",
            TransactionType::Claim => "Claim",
            TransactionType::CreditSet => "CreditSet",
            TransactionType::Delete => "Delete",
            TransactionType::Invoice => "Invoice",
            TransactionType::Offer => "Offer",
            TransactionType::NicknameSet => "NicknameSet",
            TransactionType::PasswordFund => "PasswordFund",
            TransactionType::PasswordSet => "PasswordSet",
            TransactionType::Payment => "Payment",
            TransactionType::Store => "Store",
            TransactionType::Take => "Take",
            TransactionType::TransitSet => "TransitSet",
            TransactionType::WalletAdd => "WalletAdd",
        }
    }

    /// Parses a type name as used in configuration.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| TxError::UnknownType(name.to_string()))
    }

    /// Prepaid types carry sequence 0 and pay no fee of their own.
    pub fn is_prepaid(&self) -> bool {
        matches!(self, TransactionType::Claim | TransactionType::PasswordSet)
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Type-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    AccountSet(AccountSetTx),
    Claim(ClaimTx),
    CreditSet(CreditSetTx),
    Delete(DeleteTx),
    Invoice(InvoiceTx),
    Offer(OfferTx),
    NicknameSet(NicknameSetTx),
    PasswordFund(PasswordFundTx),
    PasswordSet(PasswordSetTx),
    Payment(PaymentTx),
    Store(StoreTx),
    Take(TakeTx),
    TransitSet(TransitSetTx),
    WalletAdd(WalletAddTx),
}

impl TransactionKind {
    pub fn tx_type(&self) -> TransactionType {
        match self {
            TransactionKind::AccountSet(_) => TransactionType::AccountSet,
            TransactionKind::Claim(_) => TransactionType::Claim,
            TransactionKind::CreditSet(_) => TransactionType::CreditSet,
            TransactionKind::Delete(_) => TransactionType::Delete,
            TransactionKind::Invoice(_) => TransactionType::Invoice,
            TransactionKind::Offer(_) => TransactionType::Offer,
            TransactionKind::NicknameSet(_) => TransactionType::NicknameSet,
            TransactionKind::PasswordFund(_) => TransactionType::PasswordFund,
            TransactionKind::PasswordSet(_) => TransactionType::PasswordSet,
            TransactionKind::Payment(_) => TransactionType::Payment,
            TransactionKind::Store(_) => TransactionType::Store,
            TransactionKind::Take(_) => TransactionType::Take,
            TransactionKind::TransitSet(_) => TransactionType::TransitSet,
            TransactionKind::WalletAdd(_) => TransactionType::WalletAdd,
        }
    }
}

/// A transaction as submitted to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub source: AccountId,
    pub sequence: u32,
    /// Fee offered, in drops.
    pub fee: i64,
    #[serde(default)]
    pub signing_pub_key: Option<PublicKey>,
    #[serde(default)]
    pub signature: Signature,
    /// Last ledger the transaction may be applied in.
    #[serde(default)]
    pub last_ledger_sequence: Option<u32>,
    pub kind: TransactionKind,
}

impl Transaction {
    /// An unsigned transaction.
    pub fn new(source: AccountId, sequence: u32, fee: i64, kind: TransactionKind) -> Self {
        Self {
            source,
            sequence,
            fee,
            signing_pub_key: None,
            signature: Signature::EMPTY,
            last_ledger_sequence: None,
            kind,
        }
    }

    pub fn tx_type(&self) -> TransactionType {
        self.kind.tx_type()
    }

    /// Transaction id: SHA-512-half of the prefixed, fully signed encoding.
    pub fn id(&self) -> Result<Hash256> {
        let body = bincode::serialize(self)?;
        Ok(Hash256::sha512_half_multi(&[&PREFIX_TX_ID, &body]))
    }

    /// Hash the signature covers: the encoding with an empty signature.
    pub fn signing_hash(&self) -> Result<Hash256> {
        let mut unsigned = self.clone();
        unsigned.signature = Signature::EMPTY;
        let body = bincode::serialize(&unsigned)?;
        Ok(Hash256::sha512_half_multi(&[&PREFIX_TX_SIGN, &body]))
    }

    /// Sets the signing key and signs.
    pub fn sign(&mut self, secret: &SecretKey) -> Result<()> {
        self.signing_pub_key = Some(secret.public_key());
        let hash = self.signing_hash()?;
        self.signature = secret.sign(hash.as_bytes());
        Ok(())
    }

    /// Builder form of [`Transaction::sign`].
    pub fn signed(mut self, secret: &SecretKey) -> Result<Self> {
        self.sign(secret)?;
        Ok(self)
    }

    /// Account id of the signing key, if any.
    pub fn signer(&self) -> Option<AccountId> {
        self.signing_pub_key.map(|key| key.account_id())
    }
}
