//! See [`Id`].

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use derive_more::derive::{AsMut, AsRef, Deref, DerefMut};
use rand::RngCore;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgHasArrayType, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres, Type,
};
use thiserror::Error;

/// A user's ID.
pub type UserId = Id<[u8; 8]>;

/// A campsite's ID.
pub type CampsiteId = Id<[u8; 8]>;

/// A 128-byte session token.
pub type Token = Id<[u8; 128]>;

/// A fixed-size ID that can be deserialized from and serialized to `base64url` (without padding),
/// and stored in Postgres as `BYTEA`.
#[derive(
    Deref,
    DerefMut,
    AsRef,
    AsMut,
    DeserializeFromStr,
    SerializeDisplay,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
)]
#[as_ref(forward)]
#[as_mut(forward)]
pub struct Id<T>(T);

impl<const N: usize> Id<[u8; N]> {
    /// Generates a cryptographically secure pseudorandom ID.
    pub fn generate() -> Self {
        let mut id = Self([0; N]);
        id.reroll();
        id
    }

    /// Gets the ID's bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl<T: AsMut<[u8]>> Id<T> {
    /// Overwrites this ID with a new cryptographically secure pseudorandom ID, reusing the existing
    /// memory.
    pub fn reroll(&mut self) {
        rand::rng().fill_bytes(self.as_mut());
    }
}

impl<T: AsRef<[u8]>> Display for Id<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", URL_SAFE_NO_PAD.encode(self))
    }
}

impl<T> From<T> for Id<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

/// An error constructing an [`Id`].
#[derive(Error, Clone, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The ID isn't valid Base64.
    #[error("failed to construct ID from Base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The size of the decoded bytes doesn't match the expected size of the ID's type.
    #[error("expected ID to be {expected} bytes, found {found} bytes")]
    Size {
        /// The expected size of the ID's type.
        expected: usize,

        /// The size of the decoded bytes.
        found: usize,
    },
}

impl<const N: usize> TryFrom<&[u8]> for Id<[u8; N]> {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; N] = bytes.try_into().map_err(|_| Error::Size {
            expected: N,
            found: bytes.len(),
        })?;

        Ok(Self(bytes))
    }
}

impl<const N: usize> FromStr for Id<[u8; N]> {
    type Err = Error;

    fn from_str(str: &str) -> Result<Self, Self::Err> {
        let bytes = URL_SAFE_NO_PAD.decode(str)?;
        Self::try_from(bytes.as_slice())
    }
}

impl<const N: usize> Type<Postgres> for Id<[u8; N]> {
    fn type_info() -> PgTypeInfo {
        <&[u8] as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&[u8] as Type<Postgres>>::compatible(ty)
    }
}

impl<const N: usize> PgHasArrayType for Id<[u8; N]> {
    fn array_type_info() -> PgTypeInfo {
        <&[u8] as PgHasArrayType>::array_type_info()
    }
}

impl<const N: usize> Encode<'_, Postgres> for Id<[u8; N]> {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&[u8] as Encode<Postgres>>::encode_by_ref(&self.as_slice(), buf)
    }
}

impl<'r, const N: usize> Decode<'r, Postgres> for Id<[u8; N]> {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let bytes = <&[u8] as Decode<Postgres>>::decode(value)?;
        Ok(Self::try_from(bytes)?)
    }
}
