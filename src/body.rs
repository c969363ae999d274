//! Request-body building for create and update calls
//!
//! Options are serialized with serde (unset fields carry
//! `skip_serializing_if`) and nested under a single root key, after
//! [`Validate::validate`] has checked required fields.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::Serialize;

/// Checks run on options before any request is sent
pub trait Validate {
    /// Fail with `Error::Validation` when a required field is unset
    fn validate(&self) -> Result<()>;
}

/// Require a non-empty string field
pub fn require_str(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::missing_field(field));
    }
    Ok(())
}

/// Require a non-zero numeric field
pub fn require_positive(field: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(Error::validation(field, "must be greater than zero"));
    }
    Ok(())
}

/// Serialize `opts` as `{root: {...}}` after validating it
pub fn build_request_body<T>(opts: &T, root: &str) -> Result<JsonValue>
where
    T: Serialize + Validate,
{
    opts.validate()?;

    let inner = serde_json::to_value(opts)?;
    if !inner.is_object() {
        return Err(Error::validation(
            root,
            "request options must serialize to a JSON object",
        ));
    }

    let mut body = JsonObject::new();
    body.insert(root.to_string(), inner);
    Ok(JsonValue::Object(body))
}

/// `skip_serializing_if` helper for flags that are only sent when set
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Serialize, Default)]
    struct VolumeOpts {
        name: String,
        size: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "is_false")]
        is_public: bool,
    }

    impl Validate for VolumeOpts {
        fn validate(&self) -> Result<()> {
            require_str("name", &self.name)?;
            require_positive("size", self.size)
        }
    }

    #[test]
    fn test_body_nested_under_root() {
        let opts = VolumeOpts {
            name: "vol".to_string(),
            size: 2,
            ..Default::default()
        };

        let body = build_request_body(&opts, "volume").unwrap();
        assert_eq!(body, json!({"volume": {"name": "vol", "size": 2}}));
    }

    #[test]
    fn test_optional_fields_included_when_set() {
        let opts = VolumeOpts {
            name: "vol".to_string(),
            size: 2,
            description: Some("d".to_string()),
            is_public: true,
        };

        let body = build_request_body(&opts, "volume").unwrap();
        assert_eq!(body["volume"]["description"], "d");
        assert_eq!(body["volume"]["is_public"], true);
    }

    #[test]
    fn test_missing_required_field() {
        let opts = VolumeOpts {
            size: 2,
            ..Default::default()
        };

        let err = build_request_body(&opts, "volume").unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_zero_size_rejected() {
        let opts = VolumeOpts {
            name: "vol".to_string(),
            ..Default::default()
        };

        let err = build_request_body(&opts, "volume").unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "size"));
    }

    #[test]
    fn test_non_object_rejected() {
        struct Scalar;

        impl Serialize for Scalar {
            fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.serialize_u8(1)
            }
        }

        impl Validate for Scalar {
            fn validate(&self) -> Result<()> {
                Ok(())
            }
        }

        assert!(build_request_body(&Scalar, "x").is_err());
    }
}
