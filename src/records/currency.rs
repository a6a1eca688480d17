use crate::records::base58ck;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Currencies accepted for escrow and block-ownership payments.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Nothing = 0,
    Bitcoin = 1,
    Litecoin = 2,
}

// base58check version bytes, by currency and network
const BITCOIN_LIVE: [u8; 2] = [0x00, 0x05]; // P2PKH, P2SH
const BITCOIN_TEST: [u8; 2] = [0x6f, 0xc4];
const LITECOIN_LIVE: [u8; 2] = [0x30, 0x32];
const LITECOIN_TEST: [u8; 2] = [0x6f, 0x3a];

impl Currency {
    pub fn to_u64(self) -> u64 {
        self as u64
    }

    pub fn from_u64(value: u64) -> Result<Currency> {
        match value {
            0 => Ok(Currency::Nothing),
            1 => Ok(Currency::Bitcoin),
            2 => Ok(Currency::Litecoin),
            _ => Err(Error::InvalidCurrency),
        }
    }

    /// Validate an address against this currency's grammar on the given
    /// network.
    ///
    /// Only legacy base58check addresses are accepted: a 21-byte payload of
    /// version byte plus 160-bit hash, with the version byte drawn from the
    /// currency's per-network set.
    pub fn validate_address(&self, address: &str, test_net: bool) -> Result<()> {
        let versions = match (self, test_net) {
            (Currency::Bitcoin, false) => BITCOIN_LIVE,
            (Currency::Bitcoin, true) => BITCOIN_TEST,
            (Currency::Litecoin, false) => LITECOIN_LIVE,
            (Currency::Litecoin, true) => LITECOIN_TEST,
            (Currency::Nothing, _) => return Err(Error::InvalidCurrency),
        };
        let payload = base58ck::decode_with_checksum(address)
            .map_err(|_| Error::InvalidCurrencyAddress(address.to_string()))?;
        if payload.len() != 21 || !versions.contains(&payload[0]) {
            return Err(Error::InvalidCurrencyAddress(address.to_string()));
        }
        Ok(())
    }
}

/// A set of currencies, value-comparable.
///
/// One bit per currency. Read-only after construction; used for the
/// version-indexed legal-currency tables.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct CurrencySet(u64);

impl CurrencySet {
    pub const EMPTY: CurrencySet = CurrencySet(0);

    pub const fn of(currencies: &[Currency]) -> CurrencySet {
        let mut bits = 0u64;
        let mut i = 0;
        while i < currencies.len() {
            bits |= 1 << currencies[i] as u64;
            i += 1;
        }
        CurrencySet(bits)
    }

    pub fn add(&mut self, currency: Currency) {
        self.0 |= 1 << currency.to_u64();
    }

    pub fn contains(&self, currency: Currency) -> bool {
        self.0 & (1 << currency.to_u64()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_values() {
        assert_eq!(Currency::Bitcoin.to_u64(), 1);
        assert_eq!(Currency::from_u64(2).unwrap(), Currency::Litecoin);
        assert!(Currency::from_u64(3).is_err());
        assert!(Currency::from_u64(u64::max_value()).is_err());
    }

    #[test]
    fn bitcoin_addresses() {
        // live P2PKH and P2SH
        assert!(Currency::Bitcoin
            .validate_address("154BHe8d7Dmm7pWLG8J9gceXiCfCRDtWAo", false)
            .is_ok());
        assert!(Currency::Bitcoin
            .validate_address("3P14159f73E4gFr7JterCCQh9QjiTjiZrG", false)
            .is_ok());
        // live address is not valid on the testing network
        assert!(Currency::Bitcoin
            .validate_address("154BHe8d7Dmm7pWLG8J9gceXiCfCRDtWAo", true)
            .is_err());
        // testnet P2PKH
        assert!(Currency::Bitcoin
            .validate_address("mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn", true)
            .is_ok());
        assert!(Currency::Bitcoin
            .validate_address("mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn", false)
            .is_err());
        // garbage
        assert!(Currency::Bitcoin.validate_address("", false).is_err());
        assert!(Currency::Bitcoin
            .validate_address("not an address", false)
            .is_err());
    }

    #[test]
    fn litecoin_addresses() {
        // live P2PKH (L-prefix, version 0x30)
        assert!(Currency::Litecoin
            .validate_address("LaMT348PWRnrqeeWArpwQPbuanpXDZGEUz", false)
            .is_ok());
        // bitcoin live address is not a litecoin address
        assert!(Currency::Litecoin
            .validate_address("154BHe8d7Dmm7pWLG8J9gceXiCfCRDtWAo", false)
            .is_err());
    }

    #[test]
    fn nothing_has_no_addresses() {
        assert!(Currency::Nothing
            .validate_address("154BHe8d7Dmm7pWLG8J9gceXiCfCRDtWAo", false)
            .is_err());
    }

    #[test]
    fn set_equality() {
        let a = CurrencySet::of(&[Currency::Bitcoin, Currency::Litecoin]);
        let b = CurrencySet::of(&[Currency::Litecoin, Currency::Bitcoin]);
        assert_eq!(a, b);
        assert!(a.contains(Currency::Bitcoin));
        assert!(!CurrencySet::of(&[Currency::Bitcoin]).contains(Currency::Litecoin));
        assert_ne!(a, CurrencySet::of(&[Currency::Bitcoin]));
        assert!(CurrencySet::EMPTY.is_empty());
    }
}
