//! Literal and indirect option values
//!
//! An option value either is used as written or names a parameter bound by
//! the enclosing test invocation. Two spellings mark indirection:
//!
//! - the legacy sentinel, where an indirection-eligible key holds its own
//!   name: `distro = "distro"`, `cdn = "cdn"`;
//! - the explicit form, usable on any key:
//!   `distro = { from_param = "distro" }`.
//!
//! The sentinel only applies to the eligible keys, so `distro = "cdn"` is a
//! literal distro named `cdn`.

use serde_json::Value;

use crate::constants::FROM_PARAM_FIELD;

/// A classified option value
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Used as written
    Literal(Value),
    /// Replaced by the value bound to `param`
    Indirect {
        /// Name of the bound parameter
        param: String,
    },
}

impl OptionValue {
    /// Classifies the value declared for `key`.
    ///
    /// `indirection_keys` lists the keys for which the legacy sentinel is
    /// honoured.
    pub fn classify<S: AsRef<str>>(key: &str, value: &Value, indirection_keys: &[S]) -> Self {
        if let Some(param) = explicit_param(value) {
            return Self::Indirect {
                param: param.to_string(),
            };
        }

        let eligible = indirection_keys.iter().any(|k| k.as_ref() == key);
        match value {
            Value::String(s) if eligible && s == key => Self::Indirect {
                param: key.to_string(),
            },
            other => Self::Literal(other.clone()),
        }
    }

    /// Whether the value must be looked up.
    pub fn is_indirect(&self) -> bool {
        matches!(self, Self::Indirect { .. })
    }
}

fn explicit_param(value: &Value) -> Option<&str> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get(FROM_PARAM_FIELD)?.as_str()
}
