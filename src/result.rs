use base58::FromBase58Error;
use hex::FromHexError;

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;

/// Standard error type used in the library
///
/// Structural and bounds failures on untrusted input are deliberately
/// collapsed into the single [Error::NotTransactionPack] value so that the
/// decoder does not act as an oracle for an attacker probing the wire
/// format. Semantic and authorization failures are distinguished because
/// they are reported back through RPC to the record's author.
#[derive(Debug)]
pub enum Error {
    /// The buffer is not a packed transaction record: truncated, length
    /// field out of bounds, unknown tag, or trailing garbage.
    NotTransactionPack,

    // semantic failures
    /// Asset name exceeds the permitted length
    NameTooLong,
    /// Asset fingerprint is empty
    FingerprintTooShort,
    /// Asset fingerprint exceeds the permitted length
    FingerprintTooLong,
    /// Asset metadata exceeds the permitted length
    MetadataTooLong,
    /// Asset metadata is not a NUL-separated list of key/value pairs
    MetadataIsNotMap,
    /// A signature field exceeds the permitted length
    SignatureTooLong,
    /// A share quantity must be at least one
    ShareQuantityTooSmall,
    /// The two share ids in a swap must differ
    ShareIdsMustDiffer,
    /// Owner and recipient must be different accounts
    OwnerMustDiffer,
    /// The currency value is not recognized
    InvalidCurrency,
    /// The same currency appears twice in a payment map
    DuplicateCurrency,
    /// The address does not parse under the currency's address grammar
    InvalidCurrencyAddress(String),
    /// The payment version is outside the version table
    InvalidPaymentVersion,
    /// The currency set does not match the set required by the version
    WrongCurrencySetForVersion,

    // authorization failures
    /// Missing or unverifiable signature
    InvalidSignature,
    /// Missing or unverifiable countersignature
    InvalidCountersignature,
    /// The signing account is absent, or is the zero/destroyed sentinel
    InvalidOwnerOrRegistrant,
    /// An embedded account belongs to the other network
    WrongNetworkForPublicKey,
    /// The account bytes are not a recognizable public key
    CannotDecodeAccount,

    /// Hex string could not be decoded
    FromHexError(FromHexError),
    /// Base58 string could not be decoded
    FromBase58Error(FromBase58Error),
    /// The data did not match the checksum.
    ChecksumMismatch,
    /// An argument provided is invalid
    BadArgument(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::NotTransactionPack => f.write_str("not a transaction pack"),
            Error::NameTooLong => f.write_str("name too long"),
            Error::FingerprintTooShort => f.write_str("fingerprint too short"),
            Error::FingerprintTooLong => f.write_str("fingerprint too long"),
            Error::MetadataTooLong => f.write_str("metadata too long"),
            Error::MetadataIsNotMap => f.write_str("metadata is not a map"),
            Error::SignatureTooLong => f.write_str("signature too long"),
            Error::ShareQuantityTooSmall => f.write_str("share quantity too small"),
            Error::ShareIdsMustDiffer => f.write_str("share ids must differ"),
            Error::OwnerMustDiffer => f.write_str("owner and recipient must differ"),
            Error::InvalidCurrency => f.write_str("invalid currency"),
            Error::DuplicateCurrency => f.write_str("duplicate currency"),
            Error::InvalidCurrencyAddress(s) => {
                f.write_str(&format!("invalid currency address: {}", s))
            }
            Error::InvalidPaymentVersion => f.write_str("invalid payment version"),
            Error::WrongCurrencySetForVersion => {
                f.write_str("wrong currency set for payment version")
            }
            Error::InvalidSignature => f.write_str("invalid signature"),
            Error::InvalidCountersignature => f.write_str("invalid countersignature"),
            Error::InvalidOwnerOrRegistrant => f.write_str("invalid owner or registrant"),
            Error::WrongNetworkForPublicKey => f.write_str("wrong network for public key"),
            Error::CannotDecodeAccount => f.write_str("cannot decode account"),
            Error::FromHexError(e) => f.write_str(&format!("hex decoding error: {}", e)),
            Error::FromBase58Error(e) => f.write_str(&format!("base58 decoding error: {:?}", e)),
            Error::ChecksumMismatch => f.write_str("checksum mismatch"),
            Error::BadArgument(s) => f.write_str(&format!("bad argument: {}", s)),
        }
    }
}

impl std::error::Error for Error {}

impl From<FromHexError> for Error {
    fn from(e: FromHexError) -> Self {
        Error::FromHexError(e)
    }
}

impl From<FromBase58Error> for Error {
    fn from(e: FromBase58Error) -> Self {
        Error::FromBase58Error(e)
    }
}
