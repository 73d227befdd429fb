//! Shared types for the UniSender client
//!
//! Values passed to the remote API are modeled as a small recursive tree
//! ([`NestedValue`]) so request encoding and list fingerprinting can match on
//! the shape instead of inspecting untyped JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// A leaf value of a request tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Value as it appears in a form-encoded request body.
    /// Booleans go out as `1`/`0`, which is what the API expects for flags.
    pub fn to_wire_string(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::UInt(u) => u.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Str(s) => s.clone(),
        }
    }

    /// Value as it appears in content fingerprints.
    ///
    /// Uses the conventional textual forms `True`/`False`, `None` and
    /// shortest round-trip floats that always carry a fraction or exponent
    /// (`2.0`, `1e+16`, `1.5e-05`), so fingerprints agree with other UniSender
    /// clients hashing the same recipients.
    pub fn to_repr_string(&self) -> String {
        match self {
            Scalar::Null => "None".to_string(),
            Scalar::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            Scalar::Float(f) => float_repr(*f),
            other => other.to_wire_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        // `{:e}` gives `1.5e-5`; the exponent needs a sign and two digits
        let formatted = format!("{:e}", f);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }

    let formatted = f.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_string())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<u64> for Scalar {
    fn from(i: u64) -> Self {
        i64::try_from(i).map(Scalar::Int).unwrap_or(Scalar::UInt(i))
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i as i64)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// Recursive request value: scalars, key-sorted maps and ordered sequences.
///
/// Map keys are kept in a `BTreeMap`, so two maps with the same entries are
/// equal and encode identically no matter how they were built. Sequence order
/// is significant and becomes the positional index in encoded key-paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum NestedValue {
    Scalar(Scalar),
    Map(BTreeMap<String, NestedValue>),
    Seq(Vec<NestedValue>),
}

impl NestedValue {
    pub fn null() -> Self {
        NestedValue::Scalar(Scalar::Null)
    }

    pub fn empty_map() -> Self {
        NestedValue::Map(BTreeMap::new())
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            NestedValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, NestedValue>> {
        match self {
            NestedValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[NestedValue]> {
        match self {
            NestedValue::Seq(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Value> for NestedValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => NestedValue::null(),
            Value::Bool(b) => NestedValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => {
                let scalar = if let Some(i) = n.as_i64() {
                    Scalar::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Scalar::UInt(u)
                } else {
                    Scalar::Float(n.as_f64().unwrap_or_default())
                };
                NestedValue::Scalar(scalar)
            }
            Value::String(s) => NestedValue::Scalar(Scalar::Str(s)),
            Value::Array(items) => NestedValue::Seq(items.into_iter().map(NestedValue::from).collect()),
            Value::Object(map) => NestedValue::Map(
                map.into_iter().map(|(k, v)| (k, NestedValue::from(v))).collect(),
            ),
        }
    }
}

impl From<NestedValue> for Value {
    fn from(value: NestedValue) -> Self {
        match value {
            NestedValue::Scalar(Scalar::Null) => Value::Null,
            NestedValue::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            NestedValue::Scalar(Scalar::Int(i)) => Value::from(i),
            NestedValue::Scalar(Scalar::UInt(u)) => Value::from(u),
            NestedValue::Scalar(Scalar::Float(f)) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            NestedValue::Scalar(Scalar::Str(s)) => Value::String(s),
            NestedValue::Seq(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            NestedValue::Map(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<Scalar> for NestedValue {
    fn from(s: Scalar) -> Self {
        NestedValue::Scalar(s)
    }
}

impl From<&str> for NestedValue {
    fn from(s: &str) -> Self {
        NestedValue::Scalar(s.into())
    }
}

impl From<String> for NestedValue {
    fn from(s: String) -> Self {
        NestedValue::Scalar(s.into())
    }
}

impl From<i64> for NestedValue {
    fn from(i: i64) -> Self {
        NestedValue::Scalar(i.into())
    }
}

impl From<u64> for NestedValue {
    fn from(i: u64) -> Self {
        NestedValue::Scalar(i.into())
    }
}

impl From<bool> for NestedValue {
    fn from(b: bool) -> Self {
        NestedValue::Scalar(b.into())
    }
}

impl<T: Into<NestedValue>> From<Vec<T>> for NestedValue {
    fn from(items: Vec<T>) -> Self {
        NestedValue::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<NestedValue>> From<BTreeMap<String, T>> for NestedValue {
    fn from(map: BTreeMap<String, T>) -> Self {
        NestedValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// A contact to import: field name to value. Must carry an `email` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipient(BTreeMap<String, Scalar>);

impl Recipient {
    pub fn new(email: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("email".to_string(), Scalar::Str(email.into()));
        Self(fields)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Scalar::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.0.get(field)
    }

    pub fn field_names(&self) -> BTreeSet<String> {
        self.0.keys().cloned().collect()
    }

    pub fn fields(&self) -> &BTreeMap<String, Scalar> {
        &self.0
    }
}

impl From<BTreeMap<String, Scalar>> for Recipient {
    fn from(fields: BTreeMap<String, Scalar>) -> Self {
        Self(fields)
    }
}

impl From<&Recipient> for NestedValue {
    fn from(recipient: &Recipient) -> Self {
        NestedValue::Map(
            recipient.0.iter()
                .map(|(k, v)| (k.clone(), NestedValue::Scalar(v.clone())))
                .collect(),
        )
    }
}

/// Mailing list as returned by `getLists`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailingList {
    pub id: u64,
    pub title: String,
}

/// Contact field as returned by `getFields`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactField {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
}

/// Kind of email message, each with its own required fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailType {
    Html,
    Template,
    SystemTemplate,
}

impl EmailType {
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            EmailType::Html => &["body", "sender_email", "sender_name", "subject"],
            EmailType::Template => &["sender_email", "sender_name", "template_id"],
            EmailType::SystemTemplate => &["sender_email", "sender_name", "system_template_id"],
        }
    }

    /// Guess the message kind from the keys present in the message data
    pub fn detect<'a, I>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keys: BTreeSet<&str> = keys.into_iter().collect();
        if keys.contains("system_template_id") {
            Some(EmailType::SystemTemplate)
        } else if keys.contains("template_id") {
            Some(EmailType::Template)
        } else if keys.contains("body") || keys.contains("text_body") {
            Some(EmailType::Html)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailType::Html => "html",
            EmailType::Template => "template",
            EmailType::SystemTemplate => "system_template",
        }
    }
}

impl fmt::Display for EmailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown email type: {0}")]
pub struct ParseEmailTypeError(pub String);

impl FromStr for EmailType {
    type Err = ParseEmailTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(EmailType::Html),
            "template" => Ok(EmailType::Template),
            "system_template" => Ok(EmailType::SystemTemplate),
            other => Err(ParseEmailTypeError(other.to_string())),
        }
    }
}
