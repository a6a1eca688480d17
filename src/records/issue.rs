use crate::records::account::Account;
use crate::records::digest::AssetIdentifier;
use crate::records::encoding::{Builder, Cursor, PackError, Packed, MAX_SIGNATURE_LENGTH};
use crate::records::network::Network;
use crate::records::transaction::Tag;
use crate::{Error, Result};
use serde::Serialize;

/// Issue of a bitmark against a registered asset.
///
/// The nonce lets one owner issue many bitmarks against the same asset,
/// each with a distinct transaction id.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct BitmarkIssue {
    pub asset_id: AssetIdentifier,
    pub owner: Account,
    pub nonce: u64,
    #[serde(with = "hex")]
    pub signature: Vec<u8>,
}

impl BitmarkIssue {
    /// Structural validation, identical on pack and unpack.
    pub fn check(&self) -> Result<()> {
        if self.owner.is_zero() {
            return Err(Error::InvalidOwnerOrRegistrant);
        }
        if self.signature.len() > MAX_SIGNATURE_LENGTH {
            return Err(Error::SignatureTooLong);
        }
        Ok(())
    }

    /// Pack and verify. `signer` must be the issuing owner.
    pub fn pack(&self, signer: &Account) -> std::result::Result<Packed, PackError> {
        if signer.is_zero() || *signer != self.owner {
            return Err(Error::InvalidOwnerOrRegistrant.into());
        }
        self.check()?;
        let mut b = Builder::new(Tag::BitmarkIssue as u64);
        b.raw(&self.asset_id.raw);
        b.account(&self.owner);
        b.u64(self.nonce);
        b.sign(&self.owner, &self.signature)?;
        Ok(b.finish())
    }

    pub(crate) fn unpack(cursor: &mut Cursor, network: Network) -> Result<BitmarkIssue> {
        let asset_id = AssetIdentifier::from_slice(cursor.fixed(AssetIdentifier::SIZE)?)
            .map_err(|_| Error::NotTransactionPack)?;
        let owner = cursor.account(network)?;
        let nonce = cursor.u64()?;
        let message = cursor.signed_prefix();
        let signature = cursor.signature()?.to_vec();
        owner.check_signature(message, &signature)?;
        let record = BitmarkIssue {
            asset_id,
            owner,
            nonce,
            signature,
        };
        record.check()?;
        Ok(record)
    }
}
