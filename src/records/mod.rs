//! Transaction record types and their binary codec.
//!
//! Every record packs to a tag varint followed by its fields; every
//! variable-length field carries a varint length prefix. [Transaction]
//! is the entry point for decoding untrusted bytes, the individual
//! record types are the entry points for building and signing.

pub mod account;
pub mod asset;
pub mod base58ck;
pub mod block_owner;
pub mod currency;
pub mod digest;
pub mod encoding;
pub mod issue;
pub mod network;
pub mod payment;
pub mod share;
pub mod transaction;
pub mod transfer;
pub mod var_int;


pub use crate::records::account::{
    Account, PrivateKey, ACCOUNT_SIZE, PUBLIC_KEY_SIZE, SIGNATURE_SIZE,
};
pub use crate::records::asset::{
    AssetData, MAX_FINGERPRINT_LENGTH, MAX_METADATA_LENGTH, MAX_NAME_LENGTH,
    MIN_FINGERPRINT_LENGTH,
};
pub use crate::records::block_owner::{BlockFoundation, BlockOwnerTransfer};
pub use crate::records::currency::{Currency, CurrencySet};
pub use crate::records::digest::{AssetIdentifier, Link};
pub use crate::records::encoding::{
    PackError, Packed, Unsigned, MAX_FIELD_LENGTH, MAX_SIGNATURE_LENGTH,
};
pub use crate::records::issue::BitmarkIssue;
pub use crate::records::network::Network;
pub use crate::records::payment::{Payment, PaymentMap};
pub use crate::records::share::{BitmarkShare, ShareGrant, ShareSwap};
pub use crate::records::transaction::{record_name, Tag, Transaction};
pub use crate::records::transfer::{BitmarkTransferCountersigned, BitmarkTransferUnratified};
pub use crate::records::var_int::{varint_decode, varint_encode, varint_size, MAX_VARINT_SIZE};
pub use hex::{FromHex, ToHex};
