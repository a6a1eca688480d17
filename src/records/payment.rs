use crate::records::currency::{Currency, CurrencySet};
use crate::records::encoding::{Builder, Cursor, MAX_FIELD_LENGTH};
use crate::records::network::Network;
use crate::records::var_int::varint_encode;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Version-indexed table of the exact currency set a payment map must
/// supply. Index 0 is deliberately empty: version 0 is never valid. New
/// coin sets are appended here and nowhere else.
static VERSIONS: &[CurrencySet] = &[
    CurrencySet::EMPTY,
    CurrencySet::of(&[Currency::Bitcoin, Currency::Litecoin]),
];

/// The currency set required by a payment map version.
pub fn version_set(version: u64) -> Result<CurrencySet> {
    let set = VERSIONS
        .get(version as usize)
        .ok_or(Error::InvalidPaymentVersion)?;
    if set.is_empty() {
        return Err(Error::InvalidPaymentVersion);
    }
    Ok(*set)
}

/// An optional escrow payment attached to a transfer: ownership only moves
/// if this payment is observed on the named currency's chain.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Payment {
    pub currency: Currency,
    pub address: String,
    pub amount: u64,
}

impl Payment {
    fn check(&self, test_net: bool) -> Result<()> {
        self.currency.validate_address(&self.address, test_net)
    }
}

/// Append an optional escrow payment: a presence byte, then the tuple.
pub(crate) fn pack_escrow(
    builder: &mut Builder,
    escrow: Option<&Payment>,
    test_net: bool,
) -> Result<()> {
    match escrow {
        None => builder.byte(0x00),
        Some(payment) => {
            payment.check(test_net)?;
            builder.byte(0x01);
            builder.u64(payment.currency.to_u64());
            builder.bytes(payment.address.as_bytes());
            builder.u64(payment.amount);
        }
    }
    Ok(())
}

/// Read an optional escrow payment; any presence byte other than 0 or 1 is
/// structural garbage.
pub(crate) fn unpack_escrow(cursor: &mut Cursor, network: Network) -> Result<Option<Payment>> {
    match cursor.byte()? {
        0x00 => Ok(None),
        0x01 => {
            let currency = Currency::from_u64(cursor.u64()?)?;
            let address = String::from_utf8(cursor.field(1, MAX_FIELD_LENGTH)?.to_vec())
                .map_err(|_| Error::NotTransactionPack)?;
            let amount = cursor.u64()?;
            let payment = Payment {
                currency,
                address,
                amount,
            };
            payment.check(network.is_testing())?;
            Ok(Some(payment))
        }
        _ => Err(Error::NotTransactionPack),
    }
}

/// A currency → address payment map for block-foundation records.
///
/// Packing is deterministic: pairs are emitted in ascending currency order.
/// Both pack and unpack require the key set to equal exactly the set the
/// declared version names, so a map can never mix currency sets from two
/// format versions.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
pub struct PaymentMap {
    entries: BTreeMap<Currency, String>,
}

impl PaymentMap {
    pub fn new() -> PaymentMap {
        PaymentMap {
            entries: BTreeMap::new(),
        }
    }

    /// Add a currency/address pair; the same currency may only appear once.
    pub fn insert(&mut self, currency: Currency, address: &str) -> Result<()> {
        if self.entries.contains_key(&currency) {
            return Err(Error::DuplicateCurrency);
        }
        self.entries.insert(currency, address.to_string());
        Ok(())
    }

    pub fn get(&self, currency: Currency) -> Option<&str> {
        self.entries.get(&currency).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn currency_set(&self) -> CurrencySet {
        let mut set = CurrencySet::EMPTY;
        for currency in self.entries.keys() {
            set.add(*currency);
        }
        set
    }

    /// Pack the map standalone. The caller embeds the result as one
    /// length-prefixed blob.
    pub(crate) fn pack(&self, version: u64, test_net: bool) -> Result<Vec<u8>> {
        if self.currency_set() != version_set(version)? {
            return Err(Error::WrongCurrencySetForVersion);
        }
        let mut blob = Vec::new();
        for (currency, address) in &self.entries {
            currency.validate_address(address, test_net)?;
            varint_encode(&mut blob, currency.to_u64());
            varint_encode(&mut blob, address.len() as u64);
            blob.extend_from_slice(address.as_bytes());
        }
        Ok(blob)
    }

    /// Parse a standalone map blob; the pair count is derived from blob
    /// exhaustion.
    pub(crate) fn unpack(blob: &[u8], version: u64, network: Network) -> Result<PaymentMap> {
        let required = version_set(version)?;
        let mut map = PaymentMap::new();
        let mut cursor = Cursor::new(blob);
        while cursor.consumed() < blob.len() {
            let currency = Currency::from_u64(cursor.u64()?)?;
            let address = String::from_utf8(cursor.field(1, MAX_FIELD_LENGTH)?.to_vec())
                .map_err(|_| Error::NotTransactionPack)?;
            currency.validate_address(&address, network.is_testing())?;
            map.insert(currency, &address)?;
        }
        if map.currency_set() != required {
            return Err(Error::WrongCurrencySetForVersion);
        }
        Ok(map)
    }
}
