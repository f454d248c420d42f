use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// The result of an authorisation attempt, as reported by the payment service.
///
/// Values outside the documented set are carried through as [`ResultCode::Other`]
/// rather than being reinterpreted.
#[derive(Clone, Debug, Eq, PartialEq, Hash, strum::EnumString)]
pub enum ResultCode {
    /// The payment was authorised; an authorisation code is available.
    Authorised,
    /// The payment was refused; a refusal reason is available.
    Refused,
    /// Processing failed on the payment service side.
    Error,
    /// The payment was received and its final state is pending.
    Received,
    #[strum(default)]
    Other(String),
}

impl ResultCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Authorised => "Authorised",
            Self::Refused => "Refused",
            Self::Error => "Error",
            Self::Received => "Received",
            Self::Other(value) => value,
        }
    }

    pub fn is_authorised(&self) -> bool {
        matches!(self, Self::Authorised)
    }

    pub fn is_refused(&self) -> bool {
        matches!(self, Self::Refused)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResultCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResultCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(de::Error::custom)
    }
}
