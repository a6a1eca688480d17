use crate::records::account::Account;
use crate::records::asset::AssetData;
use crate::records::block_owner::{BlockFoundation, BlockOwnerTransfer};
use crate::records::digest::Link;
use crate::records::encoding::{Cursor, PackError, Packed};
use crate::records::issue::BitmarkIssue;
use crate::records::network::Network;
use crate::records::share::{BitmarkShare, ShareGrant, ShareSwap};
use crate::records::transfer::{BitmarkTransferCountersigned, BitmarkTransferUnratified};
use crate::{Error, Result};
use hex::FromHex;
use log::trace;
use serde::Serialize;

/// Record tags: the leading varint of every packed record.
///
/// This is the single table both directions run off: the packer emits the
/// tag its variant maps to and the unpacker branches on it, so the two can
/// never drift apart. New record kinds are registered here and nowhere
/// else.
///
/// 0x01 is permanently reserved (the retired first-generation foundation
/// record) and decodes like any unknown tag. `Null` and `Invalid` are
/// range sentinels, never emitted.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u64)]
pub enum Tag {
    Null = 0x00,
    AssetData = 0x02,
    BitmarkIssue = 0x03,
    BitmarkTransferUnratified = 0x04,
    BitmarkTransferCountersigned = 0x05,
    BlockFoundation = 0x06,
    BlockOwnerTransfer = 0x07,
    BitmarkShare = 0x08,
    ShareGrant = 0x09,
    ShareSwap = 0x0a,
    Invalid = 0x0b,
}

/// Diagnostics-only lookup from a raw tag value to a record name.
///
/// Returns the name and whether the tag is a live record kind. Never used
/// for decoding decisions.
pub fn record_name(tag: u64) -> (&'static str, bool) {
    match tag {
        t if t == Tag::AssetData as u64 => ("AssetData", true),
        t if t == Tag::BitmarkIssue as u64 => ("BitmarkIssue", true),
        t if t == Tag::BitmarkTransferUnratified as u64 => ("BitmarkTransferUnratified", true),
        t if t == Tag::BitmarkTransferCountersigned as u64 => {
            ("BitmarkTransferCountersigned", true)
        }
        t if t == Tag::BlockFoundation as u64 => ("BlockFoundation", true),
        t if t == Tag::BlockOwnerTransfer as u64 => ("BlockOwnerTransfer", true),
        t if t == Tag::BitmarkShare as u64 => ("BitmarkShare", true),
        t if t == Tag::ShareGrant as u64 => ("ShareGrant", true),
        t if t == Tag::ShareSwap as u64 => ("ShareSwap", true),
        _ => ("*unknown*", false),
    }
}

/// A typed transaction record, any variant.
///
/// The uniform capability over all nine record kinds: pack with a signer,
/// inspect the tag/name, and reconstruct from untrusted bytes via
/// [Transaction::unpack].
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "record")]
pub enum Transaction {
    AssetData(AssetData),
    BitmarkIssue(BitmarkIssue),
    BitmarkTransferUnratified(BitmarkTransferUnratified),
    BitmarkTransferCountersigned(BitmarkTransferCountersigned),
    BlockFoundation(BlockFoundation),
    BlockOwnerTransfer(BlockOwnerTransfer),
    BitmarkShare(BitmarkShare),
    ShareGrant(ShareGrant),
    ShareSwap(ShareSwap),
}

impl Transaction {
    /// The tag this variant packs under.
    pub fn tag(&self) -> Tag {
        match self {
            Transaction::AssetData(_) => Tag::AssetData,
            Transaction::BitmarkIssue(_) => Tag::BitmarkIssue,
            Transaction::BitmarkTransferUnratified(_) => Tag::BitmarkTransferUnratified,
            Transaction::BitmarkTransferCountersigned(_) => Tag::BitmarkTransferCountersigned,
            Transaction::BlockFoundation(_) => Tag::BlockFoundation,
            Transaction::BlockOwnerTransfer(_) => Tag::BlockOwnerTransfer,
            Transaction::BitmarkShare(_) => Tag::BitmarkShare,
            Transaction::ShareGrant(_) => Tag::ShareGrant,
            Transaction::ShareSwap(_) => Tag::ShareSwap,
        }
    }

    /// Diagnostics name of this variant.
    pub fn record_name(&self) -> &'static str {
        record_name(self.tag() as u64).0
    }

    /// Structural validation of the inner record.
    pub fn check(&self) -> Result<()> {
        match self {
            Transaction::AssetData(r) => r.check(),
            Transaction::BitmarkIssue(r) => r.check(),
            Transaction::BitmarkTransferUnratified(r) => r.check(),
            Transaction::BitmarkTransferCountersigned(r) => r.check(),
            Transaction::BlockFoundation(r) => r.check(),
            Transaction::BlockOwnerTransfer(r) => r.check(),
            Transaction::BitmarkShare(r) => r.check(),
            Transaction::ShareGrant(r) => r.check(),
            Transaction::ShareSwap(r) => r.check(),
        }
    }

    /// Pack the inner record; see the variant `pack` methods for the
    /// signer contract.
    pub fn pack(&self, signer: &Account) -> std::result::Result<Packed, PackError> {
        match self {
            Transaction::AssetData(r) => r.pack(signer),
            Transaction::BitmarkIssue(r) => r.pack(signer),
            Transaction::BitmarkTransferUnratified(r) => r.pack(signer),
            Transaction::BitmarkTransferCountersigned(r) => r.pack(signer),
            Transaction::BlockFoundation(r) => r.pack(signer),
            Transaction::BlockOwnerTransfer(r) => r.pack(signer),
            Transaction::BitmarkShare(r) => r.pack(signer),
            Transaction::ShareGrant(r) => r.pack(signer),
            Transaction::ShareSwap(r) => r.pack(signer),
        }
    }

    /// The transaction id the record would have once packed.
    pub fn link(&self, signer: &Account) -> std::result::Result<Link, PackError> {
        Ok(self.pack(signer)?.link())
    }

    /// Reconstruct a typed record from an untrusted buffer.
    ///
    /// Returns the record and the exact number of bytes consumed, so the
    /// caller can detect trailing garbage. Every embedded account is
    /// checked against `network`, every verifiable signature is
    /// re-verified, and the variant's `check` is re-run, so unpack
    /// enforces exactly the invariants pack does. Callers must cap the
    /// buffer size; each length field is independently clipped.
    pub fn unpack(buffer: &[u8], network: Network) -> Result<(Transaction, usize)> {
        let mut cursor = Cursor::new(buffer);
        let tag = cursor.u64()?;
        let tx = match tag {
            t if t == Tag::AssetData as u64 => {
                Transaction::AssetData(AssetData::unpack(&mut cursor, network)?)
            }
            t if t == Tag::BitmarkIssue as u64 => {
                Transaction::BitmarkIssue(BitmarkIssue::unpack(&mut cursor, network)?)
            }
            t if t == Tag::BitmarkTransferUnratified as u64 => {
                Transaction::BitmarkTransferUnratified(BitmarkTransferUnratified::unpack(
                    &mut cursor,
                    network,
                )?)
            }
            t if t == Tag::BitmarkTransferCountersigned as u64 => {
                Transaction::BitmarkTransferCountersigned(BitmarkTransferCountersigned::unpack(
                    &mut cursor,
                    network,
                )?)
            }
            t if t == Tag::BlockFoundation as u64 => {
                Transaction::BlockFoundation(BlockFoundation::unpack(&mut cursor, network)?)
            }
            t if t == Tag::BlockOwnerTransfer as u64 => {
                Transaction::BlockOwnerTransfer(BlockOwnerTransfer::unpack(&mut cursor, network)?)
            }
            t if t == Tag::BitmarkShare as u64 => {
                Transaction::BitmarkShare(BitmarkShare::unpack(&mut cursor, network)?)
            }
            t if t == Tag::ShareGrant as u64 => {
                Transaction::ShareGrant(ShareGrant::unpack(&mut cursor, network)?)
            }
            t if t == Tag::ShareSwap as u64 => {
                Transaction::ShareSwap(ShareSwap::unpack(&mut cursor, network)?)
            }
            _ => {
                trace!("unpack: unknown tag {}", tag);
                return Err(Error::NotTransactionPack);
            }
        };
        trace!(
            "unpack: {} ({} bytes)",
            tx.record_name(),
            cursor.consumed()
        );
        Ok((tx, cursor.consumed()))
    }

    /// Unpack from a hex string.
    pub fn unpack_hex(hex: &str, network: Network) -> Result<(Transaction, usize)> {
        let packed = Packed::from_hex(hex)?;
        Transaction::unpack(packed.as_slice(), network)
    }
}
