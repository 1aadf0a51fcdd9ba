//! Ledger index derivation.
//!
//! Each entry's index is the SHA-512-half of a two-byte namespace followed
//! by the fields that identify the object. Different namespaces keep
//! different object kinds from colliding even when their fields coincide.

use newcoin_common::math::{mul_div_u64, Rounding, RATE_ONE};
use newcoin_common::{AccountId, Currency, Hash256};

use crate::amount::Issue;

/// Two-byte namespaces, one per object kind.
pub mod space {
    pub const ACCOUNT: [u8; 2] = [0, b'a'];
    pub const DIR_NODE: [u8; 2] = [0, b'd'];
    pub const GENERATOR: [u8; 2] = [0, b'g'];
    pub const NICKNAME: [u8; 2] = [0, b'n'];
    pub const RIPPLE: [u8; 2] = [0, b'r'];
    pub const OFFER: [u8; 2] = [0, b'o'];
    pub const OWNER_DIR: [u8; 2] = [0, b'O'];
    pub const BOOK_DIR: [u8; 2] = [0, b'B'];
    pub const INVOICE: [u8; 2] = [0, b'i'];
    pub const STORE: [u8; 2] = [0, b's'];
}

/// Index of an account root.
pub fn account_root(account: &AccountId) -> Hash256 {
    Hash256::sha512_half_multi(&[&space::ACCOUNT, account.as_bytes()])
}

/// Index of a generator map entry.
pub fn generator(generator: &AccountId) -> Hash256 {
    Hash256::sha512_half_multi(&[&space::GENERATOR, generator.as_bytes()])
}

/// Index of a nickname entry. `nickname` is already a hash of the name.
pub fn nickname(nickname: &Hash256) -> Hash256 {
    Hash256::sha512_half_multi(&[&space::NICKNAME, nickname.as_bytes()])
}

/// Orders two accounts as (low, high).
pub fn order_accounts(a: &AccountId, b: &AccountId) -> (AccountId, AccountId) {
    if a < b {
        (*a, *b)
    } else {
        (*b, *a)
    }
}

/// Index of the trust line between `a` and `b` in `currency`.
///
/// Symmetric in `a` and `b`.
pub fn ripple_state(a: &AccountId, b: &AccountId, currency: &Currency) -> Hash256 {
    let (low, high) = order_accounts(a, b);
    Hash256::sha512_half_multi(&[
        &space::RIPPLE,
        low.as_bytes(),
        high.as_bytes(),
        &currency.0,
    ])
}

/// Index of the offer `account` created with transaction sequence `sequence`.
pub fn offer(account: &AccountId, sequence: u32) -> Hash256 {
    Hash256::sha512_half_multi(&[&space::OFFER, account.as_bytes(), &sequence.to_be_bytes()])
}

/// Root of `account`'s owner directory.
pub fn owner_dir(account: &AccountId) -> Hash256 {
    Hash256::sha512_half_multi(&[&space::OWNER_DIR, account.as_bytes()])
}

/// Base of the order book trading `taker_pays` for `taker_gets`.
///
/// The low 8 bytes are zero; [`book_dir`] fills them with a quality so that
/// all directories of one book sort together, best quality first.
pub fn book_base(taker_pays: &Issue, taker_gets: &Issue) -> Hash256 {
    let mut hash = Hash256::sha512_half_multi(&[
        &space::BOOK_DIR,
        &taker_pays.currency.0,
        &taker_gets.currency.0,
        taker_pays.issuer.as_bytes(),
        taker_gets.issuer.as_bytes(),
    ]);
    hash.0[24..].copy_from_slice(&[0u8; 8]);
    hash
}

/// Directory holding the offers of one book at one quality.
pub fn book_dir(base: &Hash256, quality: u64) -> Hash256 {
    let mut hash = *base;
    hash.0[24..].copy_from_slice(&quality.to_be_bytes());
    hash
}

/// Last index belonging to the book starting at `base`.
pub fn book_end(base: &Hash256) -> Hash256 {
    book_dir(base, u64::MAX)
}

/// Quality encoded in a book directory index.
pub fn book_quality(dir: &Hash256) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&dir.0[24..]);
    u64::from_be_bytes(bytes)
}

/// Price of an offer for a taker: `taker_pays / taker_gets`, scaled by 1e9.
///
/// Lower is better for the taker. `None` when the ratio does not fit.
pub fn offer_quality(taker_pays: i64, taker_gets: i64) -> Option<u64> {
    if taker_pays <= 0 || taker_gets <= 0 {
        return None;
    }
    mul_div_u64(
        taker_pays as u64,
        RATE_ONE as u64,
        taker_gets as u64,
        Rounding::Down,
    )
    .ok()
}

/// Index of page `node` of the directory rooted at `root`.
///
/// Page 0 is the root itself.
pub fn dir_node(root: &Hash256, node: u64) -> Hash256 {
    if node == 0 {
        return *root;
    }
    Hash256::sha512_half_multi(&[&space::DIR_NODE, root.as_bytes(), &node.to_be_bytes()])
}

/// Index of the invoice `account` created with transaction sequence `sequence`.
pub fn invoice(account: &AccountId, sequence: u32) -> Hash256 {
    Hash256::sha512_half_multi(&[&space::INVOICE, account.as_bytes(), &sequence.to_be_bytes()])
}

/// Index of the blob stored by `account` under `key`.
pub fn store(account: &AccountId, key: &Hash256) -> Hash256 {
    Hash256::sha512_half_multi(&[&space::STORE, account.as_bytes(), key.as_bytes()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(b: u8) -> AccountId {
        AccountId([b; 20])
    }

    #[test]
    fn test_ripple_state_is_symmetric() {
        let usd = Currency::from_code("USD").unwrap();
        let eur = Currency::from_code("EUR").unwrap();
        assert_eq!(
            ripple_state(&acct(1), &acct(2), &usd),
            ripple_state(&acct(2), &acct(1), &usd)
        );
        assert_ne!(
            ripple_state(&acct(1), &acct(2), &usd),
            ripple_state(&acct(1), &acct(2), &eur)
        );
    }

    #[test]
    fn test_namespaces_separate_kinds() {
        let a = acct(9);
        assert_ne!(account_root(&a), owner_dir(&a));
        assert_ne!(offer(&a, 1), invoice(&a, 1));
    }

    #[test]
    fn test_dir_node_zero_is_root() {
        let root = owner_dir(&acct(1));
        assert_eq!(dir_node(&root, 0), root);
        assert_ne!(dir_node(&root, 1), root);
        assert_ne!(dir_node(&root, 1), dir_node(&root, 2));
    }

    #[test]
    fn test_book_dirs_sort_by_quality() {
        let usd = Issue::new(Currency::from_code("USD").unwrap(), acct(1));
        let base = book_base(&Issue::NATIVE, &usd);
        let cheap = book_dir(&base, offer_quality(1, 2).unwrap());
        let dear = book_dir(&base, offer_quality(2, 1).unwrap());
        assert!(base <= cheap);
        assert!(cheap < dear);
        assert!(dear <= book_end(&base));
        assert_eq!(book_quality(&cheap), 500_000_000);
        assert_ne!(base, book_base(&usd, &Issue::NATIVE));
    }

    #[test]
    fn test_offer_quality_rejects_non_positive() {
        assert_eq!(offer_quality(0, 1), None);
        assert_eq!(offer_quality(1, 0), None);
        assert_eq!(offer_quality(3, 3), Some(RATE_ONE as u64));
    }
}
