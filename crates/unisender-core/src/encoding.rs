//! Key-path encoding of nested request arguments
//!
//! The API takes flat form fields, so nested arguments are flattened into
//! bracketed key-paths:
//!
//! ```text
//! {"field_names": ["email", "name"], "data": [["a@x.com", "A"]]}
//!   => field_names[0]=email, field_names[1]=name,
//!      data[0][0]=a@x.com, data[0][1]=A
//! ```

use indexmap::IndexMap;
use unisender_types::{NestedValue, Scalar};

/// Flat, insertion-ordered request parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParameters(IndexMap<String, Scalar>);

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, keeping the original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        self.0.insert(key.into(), value.into());
    }

    /// Merge `other` into `self`; keys from `other` win
    pub fn extend(&mut self, other: RequestParameters) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Scalar)> {
        self.0.iter()
    }

    /// Pairs ready for `application/x-www-form-urlencoded`
    pub fn to_form_pairs(&self) -> Vec<(String, String)> {
        self.0.iter()
            .map(|(k, v)| (k.clone(), v.to_wire_string()))
            .collect()
    }
}

/// Flatten `value` into key-path parameters.
///
/// Every non-null scalar reachable in the tree yields exactly one entry.
/// Null scalars and empty containers yield nothing. A bare scalar with no
/// prefix has no key to live under and is dropped as well.
pub fn encode(value: &NestedValue, prefix: Option<&str>) -> RequestParameters {
    let mut params = RequestParameters::new();
    encode_into(value, prefix, &mut params);
    params
}

fn encode_into(value: &NestedValue, prefix: Option<&str>, params: &mut RequestParameters) {
    match value {
        NestedValue::Scalar(Scalar::Null) => {}
        NestedValue::Scalar(scalar) => {
            if let Some(key) = prefix {
                params.insert(key, scalar.clone());
            }
        }
        NestedValue::Map(map) => {
            for (key, child) in map {
                let child_prefix = child_key(prefix, key);
                encode_into(child, Some(&child_prefix), params);
            }
        }
        NestedValue::Seq(items) => {
            for (index, child) in items.iter().enumerate() {
                let child_prefix = child_key(prefix, &index.to_string());
                encode_into(child, Some(&child_prefix), params);
            }
        }
    }
}

fn child_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}[{}]", prefix, key),
        None => key.to_string(),
    }
}
