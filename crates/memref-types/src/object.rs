use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Width of an object identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectFormat {
    /// 20-byte identifiers (SHA-1 repositories).
    Sha1,
    /// 32-byte identifiers (SHA-256 repositories).
    Sha256,
}

impl ObjectFormat {
    /// Raw byte length of identifiers in this format.
    pub const fn byte_len(self) -> usize {
        match self {
            ObjectFormat::Sha1 => 20,
            ObjectFormat::Sha256 => 32,
        }
    }

    /// Hex length of identifiers in this format.
    pub const fn hex_len(self) -> usize {
        self.byte_len() * 2
    }
}

/// Content-addressed identifier of an object in the host engine's store.
///
/// memref never computes these; it only stores and compares them. Two ids of
/// different formats are never equal, even if one is a prefix of the other.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ObjectId {
    Sha1([u8; 20]),
    Sha256([u8; 32]),
}

impl ObjectId {
    /// The null id of the given format (all zeros). Represents "no object".
    pub const fn null(format: ObjectFormat) -> Self {
        match format {
            ObjectFormat::Sha1 => ObjectId::Sha1([0u8; 20]),
            ObjectFormat::Sha256 => ObjectId::Sha256([0u8; 32]),
        }
    }

    /// Build an id from raw bytes. The length selects the format.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        match bytes.len() {
            20 => {
                let mut arr = [0u8; 20];
                arr.copy_from_slice(bytes);
                Ok(ObjectId::Sha1(arr))
            }
            32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(bytes);
                Ok(ObjectId::Sha256(arr))
            }
            actual => Err(TypeError::InvalidLength { actual }),
        }
    }

    /// Parse from a 40- or 64-digit hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn format(&self) -> ObjectFormat {
        match self {
            ObjectId::Sha1(_) => ObjectFormat::Sha1,
            ObjectId::Sha256(_) => ObjectFormat::Sha256,
        }
    }

    /// The raw bytes, 20 or 32 long.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ObjectId::Sha1(b) => b,
            ObjectId::Sha256(b) => b,
        }
    }

    /// Returns `true` if every byte is zero.
    pub fn is_null(&self) -> bool {
        self.as_bytes().iter().all(|b| *b == 0)
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.as_bytes()[..4])
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 20]> for ObjectId {
    fn from(bytes: [u8; 20]) -> Self {
        ObjectId::Sha1(bytes)
    }
}

impl From<[u8; 32]> for ObjectId {
    fn from(bytes: [u8; 32]) -> Self {
        ObjectId::Sha256(bytes)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn null_is_all_zeros() {
        let null = ObjectId::null(ObjectFormat::Sha1);
        assert!(null.is_null());
        assert_eq!(null.as_bytes(), &[0u8; 20]);
        assert!(ObjectId::null(ObjectFormat::Sha256).is_null());
    }

    #[test]
    fn non_null_id() {
        let id = ObjectId::from([0xAAu8; 20]);
        assert!(!id.is_null());
        assert_eq!(id.format(), ObjectFormat::Sha1);
    }

    #[test]
    fn hex_length_selects_format() {
        let sha1 = ObjectId::from_hex(&"ab".repeat(20)).unwrap();
        assert_eq!(sha1.format(), ObjectFormat::Sha1);
        assert_eq!(sha1.to_hex().len(), ObjectFormat::Sha1.hex_len());

        let sha256 = ObjectId::from_hex(&"cd".repeat(32)).unwrap();
        assert_eq!(sha256.format(), ObjectFormat::Sha256);
        assert_eq!(sha256.as_bytes().len(), 32);
    }

    #[test]
    fn reject_bad_hex() {
        assert!(matches!(
            ObjectId::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
        assert_eq!(
            ObjectId::from_hex("abcd"),
            Err(TypeError::InvalidLength { actual: 2 })
        );
    }

    #[test]
    fn formats_never_compare_equal() {
        let short = ObjectId::from([0u8; 20]);
        let long = ObjectId::from([0u8; 32]);
        assert_ne!(short, long);
    }

    #[test]
    fn short_hex_is_8_chars() {
        let id = ObjectId::from([0x12u8; 32]);
        assert_eq!(id.short_hex(), "12121212");
        assert_eq!(format!("{id:?}"), "ObjectId(12121212)");
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = ObjectId::from([0xAAu8; 20]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "aa".repeat(20)));
        let parsed: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    proptest! {
        #[test]
        fn from_slice_accepts_only_known_widths(bytes in proptest::collection::vec(any::<u8>(), 0..48)) {
            let result = ObjectId::from_slice(&bytes);
            prop_assert_eq!(result.is_ok(), bytes.len() == 20 || bytes.len() == 32);
            if let Ok(id) = result {
                prop_assert_eq!(id.as_bytes(), &bytes[..]);
            }
        }
    }
}
