//! Resource APIs of the shared file systems service
//!
//! Each resource module supplies its option types, its domain model, the
//! CRUD calls and a `list` function returning a [`Pager`](crate::pagination::Pager)
//! configured with the resource's page strategy.

pub mod security_services;
pub mod share_networks;
pub mod shares;

use serde::{Deserialize, Serialize};

/// Hypermedia link attached to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
}

/// Server timestamps
///
/// The API emits naive UTC timestamps such as `2015-09-18T10:25:24.000000`;
/// some deployments append a `Z`. Both forms are accepted, null is `None`.
pub(crate) mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let trimmed = raw.trim_end_matches('Z');
        NaiveDateTime::parse_from_str(trimmed, FORMAT)
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Stamped {
        #[serde(default, with = "super::timestamp")]
        created_at: Option<chrono::NaiveDateTime>,
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2015, 9, 18)
            .unwrap()
            .and_hms_opt(10, 25, 24)
            .unwrap();

        let plain: Stamped =
            serde_json::from_str(r#"{"created_at": "2015-09-18T10:25:24.000000"}"#).unwrap();
        assert_eq!(plain.created_at, Some(expected));

        let zulu: Stamped = serde_json::from_str(r#"{"created_at": "2015-09-18T10:25:24Z"}"#).unwrap();
        assert_eq!(zulu.created_at, Some(expected));

        let null: Stamped = serde_json::from_str(r#"{"created_at": null}"#).unwrap();
        assert_eq!(null.created_at, None);

        let missing: Stamped = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.created_at, None);
    }

    #[test]
    fn test_timestamp_invalid() {
        let result: Result<Stamped, _> = serde_json::from_str(r#"{"created_at": "yesterday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_timestamp_serialize() {
        let stamped: Stamped =
            serde_json::from_str(r#"{"created_at": "2015-09-18T10:25:24.5"}"#).unwrap();
        assert_eq!(
            serde_json::to_value(&stamped).unwrap(),
            serde_json::json!({"created_at": "2015-09-18T10:25:24.500000"})
        );
    }
}
