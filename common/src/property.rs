//! # Property Model
//!
//! A property is one `key=value` element of a hypervisor option, e.g. the
//! `mac=8E:4E:E1:EA:B7:BB` in `-device e1000,mac=8E:4E:E1:EA:B7:BB`.
//!
//! Values form a closed set ([`Value`]) with exactly one stringification rule per
//! variant, so rendering never has to guess at the type of what it prints.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ConstructionError, QcmdError};

/// Implemented by the typed enums the device facades expose (display types, disk
/// formats, monitor modes...), so they can be stored as [`Value::Enum`].
pub trait OptionEnum {
    fn as_str(&self) -> &'static str;
}

/// A scalar property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Str(String),
    Int(i64),
    /// Rendered as `on` / `off`.
    Bool(bool),
    Enum(&'static str),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(&escape(s)),
            Value::Int(i) => write!(f, "{i}"),
            Value::Bool(true) => f.write_str("on"),
            Value::Bool(false) => f.write_str("off"),
            Value::Enum(e) => f.write_str(e),
        }
    }
}

/// Doubles every `,` the way the hypervisor's option parser expects.
pub(crate) fn escape(s: &str) -> String {
    s.replace(',', ",,")
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<&Path> for Value {
    fn from(value: &Path) -> Self {
        Value::Str(value.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for Value {
    fn from(value: PathBuf) -> Self {
        Value::from(value.as_path())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

macro_rules! value_from_small_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

value_from_small_int!(i32, u32, u16, u8);

/// An immutable `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    key: String,
    value: Value,
}

impl Property {
    /// Builds a property, rejecting keys that could not survive rendering.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Result<Self, QcmdError> {
        let key: String = key.into();
        validate_key(&key)?;

        Ok(Self {
            key,
            value: value.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Renders as `<key>=<value>`.
    pub fn render(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

fn validate_key(key: &str) -> Result<(), ConstructionError> {
    if key.is_empty() {
        return Err(ConstructionError::EmptyKey);
    }
    if key.contains([',', '=']) || key.chars().any(char::is_whitespace) {
        return Err(ConstructionError::InvalidKey(key.to_string()));
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn renders_key_and_string_value() {
        let prop = Property::new("mac", "8E:4E:E1:EA:B7:BB").unwrap();
        assert_eq!(prop.render(), "mac=8E:4E:E1:EA:B7:BB");
    }

    #[test]
    fn renders_booleans_as_on_off() {
        assert_eq!(Property::new("gl", true).unwrap().render(), "gl=on");
        assert_eq!(Property::new("gl", false).unwrap().render(), "gl=off");
    }

    #[test]
    fn renders_integers_and_enums() {
        assert_eq!(Property::new("nodeid", 3u32).unwrap().render(), "nodeid=3");
        assert_eq!(Property::new("val", -1i64).unwrap().render(), "val=-1");
        assert_eq!(
            Property::new("mode", Value::Enum("control")).unwrap().render(),
            "mode=control"
        );
    }

    #[test]
    fn doubles_commas_in_strings() {
        let prop = Property::new("file", "/tmp/a,b.img").unwrap();
        assert_eq!(prop.render(), "file=/tmp/a,,b.img");
    }

    #[test]
    fn rejects_empty_and_malformed_keys() {
        assert_eq!(
            Property::new("", "x"),
            Err(QcmdError::Construction(ConstructionError::EmptyKey))
        );
        assert!(matches!(
            Property::new("a=b", "x"),
            Err(QcmdError::Construction(ConstructionError::InvalidKey(_)))
        ));
        assert!(Property::new("a b", "x").is_err());
        assert!(Property::new("a,b", "x").is_err());
    }

    #[test]
    fn converts_paths_lossily() {
        let value = Value::from(PathBuf::from("/var/lib/disk.qcow2"));
        assert_eq!(value, Value::Str("/var/lib/disk.qcow2".into()));
    }

    proptest! {
        #[test]
        fn boolean_values_never_render_true_false(key in "[a-z][a-z0-9.-]{0,12}", flag: bool) {
            let rendered = Property::new(key, flag).unwrap().render();
            prop_assert!(rendered.ends_with("=on") || rendered.ends_with("=off"));
            prop_assert!(!rendered.ends_with("=true") && !rendered.ends_with("=false"));
        }
    }
}
