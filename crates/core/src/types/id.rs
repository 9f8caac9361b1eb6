//! Newtype IDs for type-safe entity references.
//!
//! The backend keys every document by an opaque string (`_id`), but older
//! records and hand-written fixtures carry numeric ids. Use the `define_id!`
//! macro to create wrappers that accept either form and never mix entity types.

use core::fmt;

use serde::de::{self, Deserializer, Visitor};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` with `#[serde(transparent)]`
/// - `Deserialize` from a JSON string, a JSON number (stringified), or `null`
///   (decoded as the empty id)
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Default`
/// - Conversion methods: `new()`, `as_str()`, `is_empty()`
///
/// # Example
///
/// ```rust
/// # use threadline_core::define_id;
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget = WidgetId::new("66a1f0");
/// let gadget = GadgetId::new("66a1f0");
///
/// // These are different types, so this won't compile:
/// // let _: WidgetId = gadget;
/// assert_eq!(widget.as_str(), gadget.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID is missing (empty).
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::deserialize_lenient_id(deserializer).map(Self)
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);
define_id!(QuestionId);
define_id!(AnswerId);
define_id!(BannerId);

/// Deserialize an id from a string, an integer, or `null`.
///
/// `0`, `false` and `null` decode as the empty id.
///
/// Used by [`define_id!`]; not intended to be called directly.
///
/// # Errors
///
/// Returns the deserializer's error for any other JSON shape.
#[doc(hidden)]
pub fn deserialize_lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientIdVisitor)
}

struct LenientIdVisitor;

impl<'de> Visitor<'de> for LenientIdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer id")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        if v {
            Err(E::invalid_value(de::Unexpected::Bool(v), &self))
        } else {
            Ok(String::new())
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(if v == 0 { String::new() } else { v.to_string() })
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(if v == 0 { String::new() } else { v.to_string() })
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_string_id() {
        let id: ProductId = serde_json::from_str("\"66a1f0c2\"").unwrap();
        assert_eq!(id.as_str(), "66a1f0c2");
        assert!(!id.is_empty());
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let id: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ProductId::new("42"));
    }

    #[test]
    fn test_null_id_is_empty() {
        let id: ProductId = serde_json::from_str("null").unwrap();
        assert!(id.is_empty());
    }

    #[test]
    fn test_zero_and_false_are_empty() {
        let zero: ProductId = serde_json::from_str("0").unwrap();
        let falsy: ProductId = serde_json::from_str("false").unwrap();
        assert!(zero.is_empty());
        assert!(falsy.is_empty());
        assert_eq!(serde_json::from_str::<ProductId>("\"0\"").unwrap().as_str(), "0");
        assert!(serde_json::from_str::<ProductId>("true").is_err());
    }

    #[test]
    fn test_rejects_objects() {
        assert!(serde_json::from_str::<ProductId>("{\"a\":1}").is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&OrderId::new("ORD001")).unwrap();
        assert_eq!(json, "\"ORD001\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(BannerId::from("b1").to_string(), "b1");
    }
}
