use crate::records::account::Account;
use crate::records::digest::AssetIdentifier;
use crate::records::encoding::{Builder, Cursor, PackError, Packed, MAX_SIGNATURE_LENGTH};
use crate::records::network::Network;
use crate::records::transaction::Tag;
use crate::{Error, Result};
use serde::Serialize;

/// Ceiling on an asset name.
pub const MAX_NAME_LENGTH: usize = 64;
/// Bounds on an asset fingerprint. A fingerprint identifies the asset's
/// content and must not be empty.
pub const MIN_FINGERPRINT_LENGTH: usize = 1;
pub const MAX_FINGERPRINT_LENGTH: usize = 1024;
/// Ceiling on the metadata string.
pub const MAX_METADATA_LENGTH: usize = 2048;

/// Registration of an asset: a name, a content fingerprint and a
/// NUL-separated key/value metadata string, signed by the registrant.
///
/// The asset's identity is [AssetIdentifier] over the fingerprint alone, so
/// re-registering the same fingerprint collapses to the same asset.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct AssetData {
    pub name: String,
    pub fingerprint: String,
    pub metadata: String,
    pub registrant: Account,
    #[serde(with = "hex")]
    pub signature: Vec<u8>,
}

impl AssetData {
    /// The identifier this registration resolves to.
    pub fn asset_id(&self) -> AssetIdentifier {
        AssetIdentifier::from_fingerprint(&self.fingerprint)
    }

    /// Structural validation, identical on pack and unpack.
    pub fn check(&self) -> Result<()> {
        if self.registrant.is_zero() {
            return Err(Error::InvalidOwnerOrRegistrant);
        }
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(Error::NameTooLong);
        }
        if self.fingerprint.len() < MIN_FINGERPRINT_LENGTH {
            return Err(Error::FingerprintTooShort);
        }
        if self.fingerprint.len() > MAX_FINGERPRINT_LENGTH {
            return Err(Error::FingerprintTooLong);
        }
        if self.metadata.len() > MAX_METADATA_LENGTH {
            return Err(Error::MetadataTooLong);
        }
        check_metadata(&self.metadata)?;
        if self.signature.len() > MAX_SIGNATURE_LENGTH {
            return Err(Error::SignatureTooLong);
        }
        Ok(())
    }

    /// Pack and verify. `signer` must be the registrant; an absent or
    /// unverifiable signature returns the canonical bytes to sign.
    pub fn pack(&self, signer: &Account) -> std::result::Result<Packed, PackError> {
        if signer.is_zero() || *signer != self.registrant {
            return Err(Error::InvalidOwnerOrRegistrant.into());
        }
        self.check()?;
        let mut b = Builder::new(Tag::AssetData as u64);
        b.bytes(self.name.as_bytes());
        b.bytes(self.fingerprint.as_bytes());
        b.bytes(self.metadata.as_bytes());
        b.account(&self.registrant);
        b.sign(&self.registrant, &self.signature)?;
        Ok(b.finish())
    }

    pub(crate) fn unpack(cursor: &mut Cursor, network: Network) -> Result<AssetData> {
        let name = string_field(cursor, 0, MAX_NAME_LENGTH)?;
        let fingerprint = string_field(cursor, MIN_FINGERPRINT_LENGTH, MAX_FINGERPRINT_LENGTH)?;
        let metadata = string_field(cursor, 0, MAX_METADATA_LENGTH)?;
        let registrant = cursor.account(network)?;
        let message = cursor.signed_prefix();
        let signature = cursor.signature()?.to_vec();
        registrant.check_signature(message, &signature)?;
        let record = AssetData {
            name,
            fingerprint,
            metadata,
            registrant,
            signature,
        };
        record.check()?;
        Ok(record)
    }
}

/// Metadata must be empty or a NUL-separated list of non-empty strings of
/// even cardinality: key NUL value NUL key NUL value ...
fn check_metadata(metadata: &str) -> Result<()> {
    if metadata.is_empty() {
        return Ok(());
    }
    let mut count = 0;
    for segment in metadata.split('\u{0}') {
        if segment.is_empty() {
            return Err(Error::MetadataIsNotMap);
        }
        count += 1;
    }
    if count % 2 != 0 {
        return Err(Error::MetadataIsNotMap);
    }
    Ok(())
}

pub(crate) fn string_field(cursor: &mut Cursor, min: usize, max: usize) -> Result<String> {
    String::from_utf8(cursor.field(min, max)?.to_vec()).map_err(|_| Error::NotTransactionPack)
}
