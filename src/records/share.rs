use crate::records::account::Account;
use crate::records::digest::Link;
use crate::records::encoding::{Builder, Cursor, PackError, Packed, MAX_SIGNATURE_LENGTH};
use crate::records::network::Network;
use crate::records::transaction::Tag;
use crate::{Error, Result};
use serde::Serialize;

/// Conversion of a bitmark into a quantity of fungible shares.
///
/// Signed by the owner of the linked bitmark, who is not embedded; the
/// ledger verifies the signature against the linked record's owner. The
/// share id of the resulting shares is this record's own link.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct BitmarkShare {
    pub link: Link,
    pub quantity: u64,
    #[serde(with = "hex")]
    pub signature: Vec<u8>,
}

impl BitmarkShare {
    /// Structural validation, identical on pack and unpack.
    pub fn check(&self) -> Result<()> {
        if self.quantity < 1 {
            return Err(Error::ShareQuantityTooSmall);
        }
        if self.signature.len() > MAX_SIGNATURE_LENGTH {
            return Err(Error::SignatureTooLong);
        }
        Ok(())
    }

    /// Pack and verify. `signer` is the owner of the linked bitmark.
    pub fn pack(&self, signer: &Account) -> std::result::Result<Packed, PackError> {
        if signer.is_zero() {
            return Err(Error::InvalidOwnerOrRegistrant.into());
        }
        self.check()?;
        let mut b = Builder::new(Tag::BitmarkShare as u64);
        b.raw(&self.link.raw);
        b.u64(self.quantity);
        b.sign(signer, &self.signature)?;
        Ok(b.finish())
    }

    pub(crate) fn unpack(cursor: &mut Cursor, _network: Network) -> Result<BitmarkShare> {
        let link = Link::from_slice(cursor.fixed(Link::SIZE)?)
            .map_err(|_| Error::NotTransactionPack)?;
        let quantity = cursor.u64()?;
        // owner is not embedded; the ledger verifies this signature
        let signature = cursor.signature()?.to_vec();
        let record = BitmarkShare {
            link,
            quantity,
            signature,
        };
        record.check()?;
        Ok(record)
    }
}

/// Grant of a quantity of shares from owner to recipient, valid only until
/// the named block height. Owner signs, recipient countersigns.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct ShareGrant {
    pub share_id: Link,
    pub quantity: u64,
    pub owner: Account,
    pub recipient: Account,
    pub before_block: u64,
    #[serde(with = "hex")]
    pub signature: Vec<u8>,
    #[serde(with = "hex")]
    pub countersignature: Vec<u8>,
}

impl ShareGrant {
    /// Structural validation, identical on pack and unpack.
    pub fn check(&self) -> Result<()> {
        if self.quantity < 1 {
            return Err(Error::ShareQuantityTooSmall);
        }
        if self.owner.is_zero() || self.recipient.is_zero() {
            return Err(Error::InvalidOwnerOrRegistrant);
        }
        if self.owner == self.recipient {
            return Err(Error::OwnerMustDiffer);
        }
        if self.owner.is_testing() != self.recipient.is_testing() {
            return Err(Error::WrongNetworkForPublicKey);
        }
        if self.signature.len() > MAX_SIGNATURE_LENGTH
            || self.countersignature.len() > MAX_SIGNATURE_LENGTH
        {
            return Err(Error::SignatureTooLong);
        }
        Ok(())
    }

    /// Pack and verify both rounds. `signer` must be the owner; the
    /// recipient countersigns.
    pub fn pack(&self, signer: &Account) -> std::result::Result<Packed, PackError> {
        if signer.is_zero() || *signer != self.owner {
            return Err(Error::InvalidOwnerOrRegistrant.into());
        }
        self.check()?;
        let mut b = Builder::new(Tag::ShareGrant as u64);
        b.raw(&self.share_id.raw);
        b.u64(self.quantity);
        b.account(&self.owner);
        b.account(&self.recipient);
        b.u64(self.before_block);
        b.sign(&self.owner, &self.signature)?;
        b.countersign(&self.recipient, &self.countersignature)?;
        Ok(b.finish())
    }

    pub(crate) fn unpack(cursor: &mut Cursor, network: Network) -> Result<ShareGrant> {
        let share_id = Link::from_slice(cursor.fixed(Link::SIZE)?)
            .map_err(|_| Error::NotTransactionPack)?;
        let quantity = cursor.u64()?;
        let owner = cursor.account(network)?;
        let recipient = cursor.account(network)?;
        let before_block = cursor.u64()?;
        let message = cursor.signed_prefix();
        let signature = cursor.signature()?.to_vec();
        owner.check_signature(message, &signature)?;
        let countersigned = cursor.signed_prefix();
        let countersignature = cursor.signature()?.to_vec();
        recipient
            .check_signature(countersigned, &countersignature)
            .map_err(|_| Error::InvalidCountersignature)?;
        let record = ShareGrant {
            share_id,
            quantity,
            owner,
            recipient,
            before_block,
            signature,
            countersignature,
        };
        record.check()?;
        Ok(record)
    }
}

/// Atomic swap of two share quantities between two owners, valid only
/// until the named block height. The first owner signs, the second
/// countersigns.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct ShareSwap {
    pub share_id_one: Link,
    pub quantity_one: u64,
    pub owner_one: Account,
    pub share_id_two: Link,
    pub quantity_two: u64,
    pub owner_two: Account,
    pub before_block: u64,
    #[serde(with = "hex")]
    pub signature: Vec<u8>,
    #[serde(with = "hex")]
    pub countersignature: Vec<u8>,
}

impl ShareSwap {
    /// Structural validation, identical on pack and unpack.
    pub fn check(&self) -> Result<()> {
        if self.quantity_one < 1 || self.quantity_two < 1 {
            return Err(Error::ShareQuantityTooSmall);
        }
        if self.share_id_one == self.share_id_two {
            return Err(Error::ShareIdsMustDiffer);
        }
        if self.owner_one.is_zero() || self.owner_two.is_zero() {
            return Err(Error::InvalidOwnerOrRegistrant);
        }
        if self.owner_one.is_testing() != self.owner_two.is_testing() {
            return Err(Error::WrongNetworkForPublicKey);
        }
        if self.signature.len() > MAX_SIGNATURE_LENGTH
            || self.countersignature.len() > MAX_SIGNATURE_LENGTH
        {
            return Err(Error::SignatureTooLong);
        }
        Ok(())
    }

    /// Pack and verify both rounds. `signer` must be the first owner; the
    /// second owner countersigns.
    pub fn pack(&self, signer: &Account) -> std::result::Result<Packed, PackError> {
        if signer.is_zero() || *signer != self.owner_one {
            return Err(Error::InvalidOwnerOrRegistrant.into());
        }
        self.check()?;
        let mut b = Builder::new(Tag::ShareSwap as u64);
        b.raw(&self.share_id_one.raw);
        b.u64(self.quantity_one);
        b.account(&self.owner_one);
        b.raw(&self.share_id_two.raw);
        b.u64(self.quantity_two);
        b.account(&self.owner_two);
        b.u64(self.before_block);
        b.sign(&self.owner_one, &self.signature)?;
        b.countersign(&self.owner_two, &self.countersignature)?;
        Ok(b.finish())
    }

    pub(crate) fn unpack(cursor: &mut Cursor, network: Network) -> Result<ShareSwap> {
        let share_id_one = Link::from_slice(cursor.fixed(Link::SIZE)?)
            .map_err(|_| Error::NotTransactionPack)?;
        let quantity_one = cursor.u64()?;
        let owner_one = cursor.account(network)?;
        let share_id_two = Link::from_slice(cursor.fixed(Link::SIZE)?)
            .map_err(|_| Error::NotTransactionPack)?;
        let quantity_two = cursor.u64()?;
        let owner_two = cursor.account(network)?;
        let before_block = cursor.u64()?;
        let message = cursor.signed_prefix();
        let signature = cursor.signature()?.to_vec();
        owner_one.check_signature(message, &signature)?;
        let countersigned = cursor.signed_prefix();
        let countersignature = cursor.signature()?.to_vec();
        owner_two
            .check_signature(countersigned, &countersignature)
            .map_err(|_| Error::InvalidCountersignature)?;
        let record = ShareSwap {
            share_id_one,
            quantity_one,
            owner_one,
            share_id_two,
            quantity_two,
            owner_two,
            before_block,
            signature,
            countersignature,
        };
        record.check()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::account::PrivateKey;
    use crate::records::Transaction;

    fn owner() -> PrivateKey {
        PrivateKey::from_seed(&[0x81; 32], true)
    }

    fn counterparty() -> PrivateKey {
        PrivateKey::from_seed(&[0x82; 32], true)
    }

    fn share_id(tag: &[u8]) -> Link {
        Link::from_packed(tag)
    }

    fn grant(o: &PrivateKey, r: &PrivateKey) -> ShareGrant {
        ShareGrant {
            share_id: share_id(b"share one"),
            quantity: 50,
            owner: o.account(),
            recipient: r.account(),
            before_block: 500_000,
            signature: Vec::new(),
            countersignature: Vec::new(),
        }
    }

    fn swap(a: &PrivateKey, b: &PrivateKey) -> ShareSwap {
        ShareSwap {
            share_id_one: share_id(b"share one"),
            quantity_one: 10,
            owner_one: a.account(),
            share_id_two: share_id(b"share two"),
            quantity_two: 25,
            owner_two: b.account(),
            before_block: 500_000,
            signature: Vec::new(),
            countersignature: Vec::new(),
        }
    }

    #[test]
    fn share_round_trip() {
        let key = owner();
        let mut record = BitmarkShare {
            link: share_id(b"a bitmark"),
            quantity: 1000,
            signature: Vec::new(),
        };
        match record.pack(&key.account()) {
            Err(PackError::InvalidSignature(unsigned)) => {
                record.signature = key.sign(unsigned.as_slice());
            }
            other => panic!("expected signature request, got {:?}", other.err()),
        }
        let packed = record.pack(&key.account()).unwrap();
        let (tx, used) = Transaction::unpack(packed.as_slice(), Network::Testing).unwrap();
        assert_eq!(used, packed.len());
        assert_eq!(tx.record_name(), "BitmarkShare");
        match tx {
            Transaction::BitmarkShare(back) => assert_eq!(back, record),
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn zero_quantity_rejected_both_sides() {
        let key = owner();
        let record = BitmarkShare {
            link: share_id(b"a bitmark"),
            quantity: 0,
            signature: Vec::new(),
        };
        // pack side
        assert!(matches!(
            record.pack(&key.account()),
            Err(PackError::Rejected(Error::ShareQuantityTooSmall))
        ));
        // unpack side: pack a valid record, then zero the quantity byte
        let mut valid = BitmarkShare {
            quantity: 1,
            ..record.clone()
        };
        match valid.pack(&key.account()) {
            Err(PackError::InvalidSignature(unsigned)) => {
                valid.signature = key.sign(unsigned.as_slice());
            }
            other => panic!("expected signature request, got {:?}", other.err()),
        }
        let packed = valid.pack(&key.account()).unwrap();
        let mut bytes = packed.as_slice().to_vec();
        // quantity varint sits right after tag + 32-byte link
        assert_eq!(bytes[33], 0x01);
        bytes[33] = 0x00;
        assert!(Transaction::unpack(&bytes, Network::Testing).is_err());
    }

    #[test]
    fn grant_round_trip() {
        let o = owner();
        let r = counterparty();
        let mut record = grant(&o, &r);
        match record.pack(&o.account()) {
            Err(PackError::InvalidSignature(unsigned)) => {
                record.signature = o.sign(unsigned.as_slice());
            }
            other => panic!("expected signature request, got {:?}", other.err()),
        }
        match record.pack(&o.account()) {
            Err(PackError::InvalidCountersignature(unsigned)) => {
                record.countersignature = r.sign(unsigned.as_slice());
            }
            other => panic!("expected countersignature request, got {:?}", other.err()),
        }
        let packed = record.pack(&o.account()).unwrap();
        let (tx, used) = Transaction::unpack(packed.as_slice(), Network::Testing).unwrap();
        assert_eq!(used, packed.len());
        assert_eq!(tx.record_name(), "ShareGrant");
        match tx {
            Transaction::ShareGrant(back) => assert_eq!(back, record),
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn grant_owner_recipient_must_differ() {
        let o = owner();
        let record = grant(&o, &o);
        assert!(matches!(
            record.pack(&o.account()),
            Err(PackError::Rejected(Error::OwnerMustDiffer))
        ));
    }

    #[test]
    fn grant_zero_quantity_rejected() {
        let o = owner();
        let r = counterparty();
        let mut record = grant(&o, &r);
        record.quantity = 0;
        assert!(matches!(
            record.pack(&o.account()),
            Err(PackError::Rejected(Error::ShareQuantityTooSmall))
        ));
    }

    #[test]
    fn grant_zero_recipient_rejected() {
        let o = owner();
        let r = counterparty();
        let mut record = grant(&o, &r);
        record.recipient = Account::new([0u8; 32], true);
        assert!(matches!(
            record.pack(&o.account()),
            Err(PackError::Rejected(Error::InvalidOwnerOrRegistrant))
        ));
    }

    #[test]
    fn swap_round_trip() {
        let a = owner();
        let b = counterparty();
        let mut record = swap(&a, &b);
        match record.pack(&a.account()) {
            Err(PackError::InvalidSignature(unsigned)) => {
                record.signature = a.sign(unsigned.as_slice());
            }
            other => panic!("expected signature request, got {:?}", other.err()),
        }
        match record.pack(&a.account()) {
            Err(PackError::InvalidCountersignature(unsigned)) => {
                record.countersignature = b.sign(unsigned.as_slice());
            }
            other => panic!("expected countersignature request, got {:?}", other.err()),
        }
        let packed = record.pack(&a.account()).unwrap();
        let (tx, used) = Transaction::unpack(packed.as_slice(), Network::Testing).unwrap();
        assert_eq!(used, packed.len());
        assert_eq!(tx.record_name(), "ShareSwap");
        match tx {
            Transaction::ShareSwap(back) => assert_eq!(back, record),
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn swap_share_ids_must_differ() {
        let a = owner();
        let b = counterparty();
        let mut record = swap(&a, &b);
        record.share_id_two = record.share_id_one;
        assert!(matches!(
            record.pack(&a.account()),
            Err(PackError::Rejected(Error::ShareIdsMustDiffer))
        ));
    }

    #[test]
    fn swap_signer_must_be_owner_one() {
        let a = owner();
        let b = counterparty();
        let record = swap(&a, &b);
        assert!(matches!(
            record.pack(&b.account()),
            Err(PackError::Rejected(Error::InvalidOwnerOrRegistrant))
        ));
    }
}
