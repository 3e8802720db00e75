use serde::Serializer;
use steamid_ng::SteamID;

/// Serializes and deserializes numbers Steam encodes as strings.
pub mod string {
    use std::fmt::Display;
    use std::str::FromStr;
    use serde::{de, Serializer, Deserialize, Deserializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
        where T: Display,
              S: Serializer
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
        where T: FromStr,
              T::Err: Display,
              D: Deserializer<'de>
    {
        String::deserialize(deserializer)?.parse().map_err(de::Error::custom)
    }
}

/// As [`string`], but for optional fields. Absent, `null`, and empty-string
/// values all deserialize to `None`.
pub mod option_string {
    use std::fmt::Display;
    use std::str::FromStr;
    use serde::{de, Serializer, Deserialize, Deserializer};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
        where T: Display,
              S: Serializer
    {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
        where T: FromStr,
              T::Err: Display,
              D: Deserializer<'de>
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.is_empty() => s.parse().map(Some).map_err(de::Error::custom),
            _ => Ok(None),
        }
    }
}

pub fn steamid_as_string<S>(steamid: &SteamID, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer
{
    s.serialize_str(&u64::from(*steamid).to_string())
}

/// Serializes and deserializes an optional [`SteamID`] as a 64-bit number.
pub mod option_steamid {
    use serde::{Serializer, Deserialize, Deserializer};
    use steamid_ng::SteamID;

    pub fn serialize<S>(value: &Option<SteamID>, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        match value {
            Some(steamid) => serializer.serialize_u64(u64::from(*steamid)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SteamID>, D::Error>
        where D: Deserializer<'de>
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(SteamID::from))
    }
}
