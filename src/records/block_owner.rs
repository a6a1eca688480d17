use crate::records::account::Account;
use crate::records::digest::Link;
use crate::records::encoding::{Builder, Cursor, PackError, Packed, MAX_FIELD_LENGTH, MAX_SIGNATURE_LENGTH};
use crate::records::network::Network;
use crate::records::payment::{pack_escrow, unpack_escrow, Payment, PaymentMap};
use crate::records::transaction::Tag;
use crate::{Error, Result};
use serde::Serialize;

/// Ownership claim over a mined block: the owner names the payment
/// addresses that future block-linked fees must be sent to. The `version`
/// selects which currency set the map must cover.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct BlockFoundation {
    pub version: u64,
    pub payments: PaymentMap,
    pub owner: Account,
    pub nonce: u64,
    #[serde(with = "hex")]
    pub signature: Vec<u8>,
}

impl BlockFoundation {
    /// Structural validation, identical on pack and unpack. Map/version
    /// agreement is enforced by the payment map codec itself.
    pub fn check(&self) -> Result<()> {
        if self.owner.is_zero() {
            return Err(Error::InvalidOwnerOrRegistrant);
        }
        if self.signature.len() > MAX_SIGNATURE_LENGTH {
            return Err(Error::SignatureTooLong);
        }
        Ok(())
    }

    /// Pack and verify. `signer` must be the owner.
    pub fn pack(&self, signer: &Account) -> std::result::Result<Packed, PackError> {
        if signer.is_zero() || *signer != self.owner {
            return Err(Error::InvalidOwnerOrRegistrant.into());
        }
        self.check()?;
        let blob = self.payments.pack(self.version, signer.is_testing())?;
        let mut b = Builder::new(Tag::BlockFoundation as u64);
        b.u64(self.version);
        b.bytes(&blob);
        b.account(&self.owner);
        b.u64(self.nonce);
        b.sign(&self.owner, &self.signature)?;
        Ok(b.finish())
    }

    pub(crate) fn unpack(cursor: &mut Cursor, network: Network) -> Result<BlockFoundation> {
        let version = cursor.u64()?;
        let blob = cursor.field(1, MAX_FIELD_LENGTH)?;
        let payments = PaymentMap::unpack(blob, version, network)?;
        let owner = cursor.account(network)?;
        let nonce = cursor.u64()?;
        let message = cursor.signed_prefix();
        let signature = cursor.signature()?.to_vec();
        owner.check_signature(message, &signature)?;
        let record = BlockFoundation {
            version,
            payments,
            owner,
            nonce,
            signature,
        };
        record.check()?;
        Ok(record)
    }
}

/// Transfer of a block's ownership (and its payment addresses) to a new
/// owner. The current owner signs; the new owner countersigns.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct BlockOwnerTransfer {
    pub link: Link,
    pub escrow: Option<Payment>,
    pub version: u64,
    pub payments: PaymentMap,
    pub owner: Account,
    #[serde(with = "hex")]
    pub signature: Vec<u8>,
    #[serde(with = "hex")]
    pub countersignature: Vec<u8>,
}

impl BlockOwnerTransfer {
    /// Structural validation, identical on pack and unpack.
    pub fn check(&self) -> Result<()> {
        if self.owner.is_zero() {
            return Err(Error::InvalidOwnerOrRegistrant);
        }
        if self.signature.len() > MAX_SIGNATURE_LENGTH
            || self.countersignature.len() > MAX_SIGNATURE_LENGTH
        {
            return Err(Error::SignatureTooLong);
        }
        Ok(())
    }

    /// Pack and verify both rounds. `signer` is the current block owner.
    pub fn pack(&self, signer: &Account) -> std::result::Result<Packed, PackError> {
        if signer.is_zero() {
            return Err(Error::InvalidOwnerOrRegistrant.into());
        }
        if signer.is_testing() != self.owner.is_testing() {
            return Err(Error::WrongNetworkForPublicKey.into());
        }
        self.check()?;
        let blob = self.payments.pack(self.version, signer.is_testing())?;
        let mut b = Builder::new(Tag::BlockOwnerTransfer as u64);
        b.raw(&self.link.raw);
        pack_escrow(&mut b, self.escrow.as_ref(), signer.is_testing())?;
        b.u64(self.version);
        b.bytes(&blob);
        b.account(&self.owner);
        b.sign(signer, &self.signature)?;
        b.countersign(&self.owner, &self.countersignature)?;
        Ok(b.finish())
    }

    pub(crate) fn unpack(cursor: &mut Cursor, network: Network) -> Result<BlockOwnerTransfer> {
        let link = Link::from_slice(cursor.fixed(Link::SIZE)?)
            .map_err(|_| Error::NotTransactionPack)?;
        let escrow = unpack_escrow(cursor, network)?;
        let version = cursor.u64()?;
        let blob = cursor.field(1, MAX_FIELD_LENGTH)?;
        let payments = PaymentMap::unpack(blob, version, network)?;
        let owner = cursor.account(network)?;
        // prior owner's signature is ledger-verified; the new owner's
        // countersignature is checked right here
        let signature = cursor.signature()?.to_vec();
        let message = cursor.signed_prefix();
        let countersignature = cursor.signature()?.to_vec();
        owner
            .check_signature(message, &countersignature)
            .map_err(|_| Error::InvalidCountersignature)?;
        let record = BlockOwnerTransfer {
            link,
            escrow,
            version,
            payments,
            owner,
            signature,
            countersignature,
        };
        record.check()?;
        Ok(record)
    }
}
