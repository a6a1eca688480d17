use crate::records::account::Account;
use crate::records::digest::Link;
use crate::records::encoding::{Builder, Cursor, PackError, Packed, MAX_SIGNATURE_LENGTH};
use crate::records::network::Network;
use crate::records::payment::{pack_escrow, unpack_escrow, Payment};
use crate::records::transaction::Tag;
use crate::{Error, Result};
use serde::Serialize;

/// One-party transfer of a bitmark to a new owner.
///
/// Signed by the current owner, who is named only through `link` (the id of
/// the record being transferred) and is therefore not embedded here; the
/// ledger layer verifies the signature against the linked record's owner.
/// The new owner may be the zero sentinel, permanently burning the bitmark.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct BitmarkTransferUnratified {
    pub link: Link,
    pub escrow: Option<Payment>,
    pub owner: Account,
    #[serde(with = "hex")]
    pub signature: Vec<u8>,
}

impl BitmarkTransferUnratified {
    /// Structural validation, identical on pack and unpack.
    pub fn check(&self) -> Result<()> {
        if self.signature.len() > MAX_SIGNATURE_LENGTH {
            return Err(Error::SignatureTooLong);
        }
        Ok(())
    }

    /// Pack and verify. `signer` is the current owner of the linked record.
    pub fn pack(&self, signer: &Account) -> std::result::Result<Packed, PackError> {
        if signer.is_zero() {
            return Err(Error::InvalidOwnerOrRegistrant.into());
        }
        if signer.is_testing() != self.owner.is_testing() {
            return Err(Error::WrongNetworkForPublicKey.into());
        }
        self.check()?;
        let mut b = Builder::new(Tag::BitmarkTransferUnratified as u64);
        b.raw(&self.link.raw);
        pack_escrow(&mut b, self.escrow.as_ref(), signer.is_testing())?;
        b.account(&self.owner);
        b.sign(signer, &self.signature)?;
        Ok(b.finish())
    }

    pub(crate) fn unpack(
        cursor: &mut Cursor,
        network: Network,
    ) -> Result<BitmarkTransferUnratified> {
        let link = Link::from_slice(cursor.fixed(Link::SIZE)?)
            .map_err(|_| Error::NotTransactionPack)?;
        let escrow = unpack_escrow(cursor, network)?;
        let owner = cursor.account(network)?;
        // prior owner is not embedded; the ledger verifies this signature
        let signature = cursor.signature()?.to_vec();
        let record = BitmarkTransferUnratified {
            link,
            escrow,
            owner,
            signature,
        };
        record.check()?;
        Ok(record)
    }
}

/// Two-party transfer: the current owner signs, the new owner countersigns
/// over the already-signed bytes. Because the new owner must sign, it can
/// never be the zero sentinel.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct BitmarkTransferCountersigned {
    pub link: Link,
    pub escrow: Option<Payment>,
    pub owner: Account,
    #[serde(with = "hex")]
    pub signature: Vec<u8>,
    #[serde(with = "hex")]
    pub countersignature: Vec<u8>,
}

impl BitmarkTransferCountersigned {
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

    /// Pack and verify both rounds. `signer` is the current owner of the
    /// linked record; the countersignature is verified against the embedded
    /// new owner.
    pub fn pack(&self, signer: &Account) -> std::result::Result<Packed, PackError> {
        if signer.is_zero() {
            return Err(Error::InvalidOwnerOrRegistrant.into());
        }
        if signer.is_testing() != self.owner.is_testing() {
            return Err(Error::WrongNetworkForPublicKey.into());
        }
        self.check()?;
        let mut b = Builder::new(Tag::BitmarkTransferCountersigned as u64);
        b.raw(&self.link.raw);
        pack_escrow(&mut b, self.escrow.as_ref(), signer.is_testing())?;
        b.account(&self.owner);
        b.sign(signer, &self.signature)?;
        b.countersign(&self.owner, &self.countersignature)?;
        Ok(b.finish())
    }

    pub(crate) fn unpack(
        cursor: &mut Cursor,
        network: Network,
    ) -> Result<BitmarkTransferCountersigned> {
        let link = Link::from_slice(cursor.fixed(Link::SIZE)?)
            .map_err(|_| Error::NotTransactionPack)?;
        let escrow = unpack_escrow(cursor, network)?;
        let owner = cursor.account(network)?;
        // prior owner's signature is ledger-verified; the new owner's
        // countersignature is checked right here
        let signature = cursor.signature()?.to_vec();
        let message = cursor.signed_prefix();
        let countersignature = cursor.signature()?.to_vec();
        owner
            .check_signature(message, &countersignature)
            .map_err(|_| Error::InvalidCountersignature)?;
        let record = BitmarkTransferCountersigned {
            link,
            escrow,
            owner,
            signature,
            countersignature,
        };
        record.check()?;
        Ok(record)
    }
}
