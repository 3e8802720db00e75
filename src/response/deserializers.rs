//! Deserializers for the irregular encodings in Steam responses.

use super::inventory::ClassInfo;
use crate::types::{ClassId, InstanceId};
use serde::de::{self, DeserializeOwned, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Deserializes a boolean Steam encodes as `0` or `1`.
pub fn from_int_to_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: u8 = Deserialize::deserialize(deserializer)?;

    Ok(value == 1)
}

/// Deserializes an id Steam encodes as either a number or a string. `-1`,
/// empty, and absent values deserialize to `None`.
pub fn option_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::String(value)) if !value.is_empty() && value != "-1" => {
            Ok(Some(value))
        },
        Some(StringOrNumber::Number(value)) if value > 0 => Ok(Some(value.to_string())),
        _ => Ok(None),
    }
}

/// Deserializes a value from a field holding JSON encoded as a string.
pub fn from_json_string<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(encoded) if !encoded.is_empty() => {
            serde_json::from_str(&encoded)
                .map(Some)
                .map_err(de::Error::custom)
        },
        _ => Ok(None),
    }
}

/// Collects item descriptions into a map keyed by classid and instanceid.
pub fn to_classinfo_map<'de, D>(
    deserializer: D,
) -> Result<HashMap<(ClassId, InstanceId), Arc<ClassInfo>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ClassInfoVisitor;

    impl<'de> Visitor<'de> for ClassInfoVisitor {
        type Value = HashMap<(ClassId, InstanceId), Arc<ClassInfo>>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a sequence of classinfos")
        }

        fn visit_seq<V>(self, mut seq: V) -> Result<Self::Value, V::Error>
        where
            V: SeqAccess<'de>,
        {
            let mut map = HashMap::with_capacity(seq.size_hint().unwrap_or(0));

            while let Some(classinfo) = seq.next_element::<ClassInfo>()? {
                map.insert((classinfo.classid, classinfo.instanceid), Arc::new(classinfo));
            }

            Ok(map)
        }
    }

    deserializer.deserialize_seq(ClassInfoVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Response {
        #[serde(default, deserialize_with = "super::option_string_or_number")]
        captcha_gid: Option<String>,
    }

    #[test]
    fn negative_one_gid_is_none() {
        let response: Response = serde_json::from_str(r#"{"captcha_gid":-1}"#).unwrap();

        assert_eq!(response.captcha_gid, None);
    }

    #[test]
    fn numeric_gid_is_stringified() {
        let response: Response = serde_json::from_str(r#"{"captcha_gid":3122988401908795871}"#).unwrap();

        assert_eq!(response.captcha_gid.as_deref(), Some("3122988401908795871"));
    }

    #[test]
    fn string_gid_is_kept() {
        let response: Response = serde_json::from_str(r#"{"captcha_gid":"3122988401908795871"}"#).unwrap();

        assert_eq!(response.captcha_gid.as_deref(), Some("3122988401908795871"));
    }
}
