//! Per-filter configuration payloads and their `google.protobuf.Any` envelope.
//!
//! Everything attached to a route-scoped construct's `typed_per_filter_config`
//! map travels as an Envoy `Any`. This module is the codec seam between the
//! messages filter plugins produce and that envelope:
//!
//! - [`ConfigMessage`] is anything that can be packed: a type URL plus bytes.
//! - [`TypedMessage`] gives a prost message a static type URL. Every
//!   `TypedMessage` is a `ConfigMessage`, and can be read back with
//!   [`unpack_message`].
//! - [`TypedConfig`] carries a payload that is already encoded, e.g. one
//!   received over a REST API as base64.
//!
//! # Example
//!
//! ```rust,ignore
//! use filterbind::xds::filters::{pack_message, struct_from_json};
//!
//! let config = struct_from_json(&serde_json::json!({ "enabled": true }))?;
//! let any = pack_message(&config)?;
//! assert_eq!(any.type_url, "type.googleapis.com/google.protobuf.Struct");
//! ```

pub mod per_route;
pub mod structs;

pub use per_route::{disabled_filter_config, optional_filter_config};
pub use structs::{struct_from_json, struct_to_json};

use crate::errors::{FilterBindError, Result};
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine;
use envoy_types::pb::google::protobuf::Any;
use prost::Message;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A configuration message that can be packed into an `Any`.
pub trait ConfigMessage {
    /// Fully-qualified type URL, e.g. `type.googleapis.com/google.protobuf.Struct`
    fn type_url(&self) -> Cow<'_, str>;

    /// Protobuf wire encoding of the message
    fn encode_payload(&self) -> Vec<u8>;
}

/// A prost message with a well-known type URL.
pub trait TypedMessage: Message + Default {
    const TYPE_URL: &'static str;
}

impl<M: TypedMessage> ConfigMessage for M {
    fn type_url(&self) -> Cow<'_, str> {
        Cow::Borrowed(M::TYPE_URL)
    }

    fn encode_payload(&self) -> Vec<u8> {
        self.encode_to_vec()
    }
}

/// Wrapper for binary protobuf payloads serialized as base64 in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Base64Bytes(pub Vec<u8>);

impl Serialize for Base64Bytes {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&BASE64_ENGINE.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Base64Bytes {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let decoded = BASE64_ENGINE
            .decode(encoded.as_bytes())
            .map_err(|err| serde::de::Error::custom(err.to_string()))?;
        Ok(Base64Bytes(decoded))
    }
}

/// An already-encoded configuration payload.
///
/// Serializes as `{ "type_url": ..., "value": "<base64>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedConfig {
    pub type_url: String,
    #[serde(default)]
    pub value: Base64Bytes,
}

impl TypedConfig {
    /// Creates a typed config from a prost message and an explicit type URL.
    pub fn from_message<M: Message>(type_url: impl Into<String>, msg: &M) -> Self {
        Self { type_url: type_url.into(), value: Base64Bytes(msg.encode_to_vec()) }
    }

    pub fn to_any(&self) -> Any {
        Any { type_url: self.type_url.clone(), value: self.value.0.clone() }
    }
}

impl From<Any> for TypedConfig {
    fn from(any: Any) -> Self {
        Self { type_url: any.type_url, value: Base64Bytes(any.value) }
    }
}

impl ConfigMessage for TypedConfig {
    fn type_url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.type_url)
    }

    fn encode_payload(&self) -> Vec<u8> {
        self.value.0.clone()
    }
}

/// Check a type URL against the `Any` envelope's constraints: it must contain
/// a `/`, and the type name after the last `/` must be non-empty and free of
/// whitespace.
pub fn validate_type_url(type_url: &str) -> Result<()> {
    let Some((_, type_name)) = type_url.rsplit_once('/') else {
        return Err(FilterBindError::serialization(format!(
            "type URL '{}' must contain a '/' before the message type name",
            type_url
        )));
    };

    if type_name.is_empty() || type_name.chars().any(char::is_whitespace) {
        return Err(FilterBindError::serialization(format!(
            "type URL '{}' has an invalid message type name",
            type_url
        )));
    }

    Ok(())
}

/// Pack a configuration message into the `Any` envelope.
pub fn pack_message<M: ConfigMessage + ?Sized>(msg: &M) -> Result<Any> {
    let type_url = msg.type_url();
    validate_type_url(&type_url)?;

    Ok(Any { type_url: type_url.into_owned(), value: msg.encode_payload() })
}

/// Unpack an `Any` into the message type it claims to carry.
pub fn unpack_message<M: TypedMessage>(any: &Any) -> Result<M> {
    if any.type_url != M::TYPE_URL {
        return Err(FilterBindError::serialization(format!(
            "expected payload of type '{}', found '{}'",
            M::TYPE_URL,
            any.type_url
        )));
    }

    M::decode(any.value.as_slice())
        .map_err(|e| FilterBindError::decode(format!("Failed to decode '{}'", M::TYPE_URL), e))
}
