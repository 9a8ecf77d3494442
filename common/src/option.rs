//! # Option Rendering
//!
//! A [`CmdOption`] is the frozen, renderable view of one hypervisor switch. It
//! renders to at most two argument tokens:
//!
//! * `-<flag>` (or the bare flag when the leading dash is suppressed).
//! * `<name>[,<key>=<value>]*`, omitted entirely when there is neither a name
//!   nor any property. Commas in the name and in string values are doubled.
//!
//! Switches such as `-append` and `-kernel` take one verbatim argument instead
//! of a comma list. Those are built with [`CmdOption::raw`] and are never
//! escaped or split.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ConstructionError, QcmdError};
use crate::property::{Property, Value, escape};

/// Flags whose argument [`CmdOption::parse`] reads back as one verbatim token.
pub const RAW_ARGUMENT_FLAGS: &[&str] = &["append", "kernel", "initrd", "dtb", "bios", "L", "pidfile"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdOption {
    flag: String,
    name: Option<String>,
    properties: Vec<Property>,
    positional: bool,
    raw: bool,
}

impl CmdOption {
    /// Builds a regular `-flag [name,props]` option.
    ///
    /// An empty `name` is treated as no name at all.
    pub fn new(
        flag: impl Into<String>,
        name: Option<String>,
        properties: Vec<Property>,
    ) -> Result<Self, QcmdError> {
        let flag: String = flag.into();
        validate_flag(&flag)?;

        let name: Option<String> = name.filter(|n| !n.is_empty());
        if let Some(name) = &name
            && name.contains('=')
        {
            return Err(ConstructionError::InvalidName(name.clone()).into());
        }

        Ok(Self {
            flag,
            name,
            properties,
            positional: false,
            raw: false,
        })
    }

    /// Builds `-flag <argument>` where the argument is passed through untouched,
    /// e.g. a kernel command line.
    pub fn raw(flag: impl Into<String>, argument: impl Into<String>) -> Result<Self, QcmdError> {
        let flag: String = flag.into();
        validate_flag(&flag)?;

        let argument: String = argument.into();
        if argument.is_empty() {
            return Err(ConstructionError::MissingArgument { flag }.into());
        }

        Ok(Self {
            flag,
            name: Some(argument),
            properties: Vec::new(),
            positional: false,
            raw: true,
        })
    }

    /// Builds a bare token rendered without a leading dash (e.g. a trailing image path).
    pub fn positional(token: impl Into<String>) -> Result<Self, QcmdError> {
        let token: String = token.into();
        if token.is_empty() {
            return Err(ConstructionError::EmptyFlag.into());
        }

        Ok(Self {
            flag: token,
            name: None,
            properties: Vec::new(),
            positional: true,
            raw: false,
        })
    }

    pub(crate) fn with_suppressed_dash(
        flag: String,
        name: Option<String>,
        properties: Vec<Property>,
    ) -> Result<Self, QcmdError> {
        let has_name = name.as_deref().is_some_and(|n| !n.is_empty());
        if has_name || !properties.is_empty() {
            return Err(ConstructionError::PositionalWithArguments { flag }.into());
        }
        Self::positional(flag)
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    /// `true` when the name is a single verbatim argument.
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Renders the argument tokens for this switch.
    pub fn render(&self) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::with_capacity(2);

        if self.positional {
            tokens.push(self.flag.clone());
        } else {
            tokens.push(format!("-{}", self.flag));
        }

        if self.raw {
            tokens.extend(self.name.iter().cloned());
            return tokens;
        }

        let elements: Vec<String> = self
            .name
            .iter()
            .map(|name| escape(name))
            .chain(self.properties.iter().map(Property::render))
            .collect();

        if !elements.is_empty() {
            tokens.push(elements.join(","));
        }

        tokens
    }

    /// Space-joined [`render`](Self::render), handy for display and golden tests.
    pub fn render_string(&self) -> String {
        self.render().join(" ")
    }

    /// Properties keyed by name, holding the rendered value text. Last occurrence wins.
    pub fn as_table(&self) -> BTreeMap<String, String> {
        self.properties
            .iter()
            .map(|prop| (prop.key().to_string(), prop.value().to_string()))
            .collect()
    }

    /// Reads back tokens produced by [`render`](Self::render).
    ///
    /// Every value comes back as [`Value::Str`], so the original variant is lost
    /// but the rendered text is preserved.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, QcmdError> {
        let Some((first, rest)) = tokens.split_first() else {
            return Err(ConstructionError::NoTokens.into());
        };
        let first: &str = first.as_ref();

        let Some(flag) = first.strip_prefix('-') else {
            if !rest.is_empty() {
                return Err(ConstructionError::TrailingTokens {
                    flag: first.to_string(),
                }
                .into());
            }
            return Self::positional(first);
        };

        let (body, trailing) = match rest.split_first() {
            Some((body, trailing)) => (Some(body.as_ref()), trailing),
            None => (None, rest),
        };
        if !trailing.is_empty() {
            return Err(ConstructionError::TrailingTokens {
                flag: flag.to_string(),
            }
            .into());
        }

        if let Some(argument) = body
            && RAW_ARGUMENT_FLAGS.contains(&flag)
        {
            return Self::raw(flag, argument);
        }

        let mut name: Option<String> = None;
        let mut properties: Vec<Property> = Vec::new();

        for (idx, element) in body.map(split_elements).unwrap_or_default().into_iter().enumerate() {
            match element.split_once('=') {
                Some((key, value)) => properties.push(Property::new(key, Value::Str(value.to_string()))?),
                None if idx == 0 => name = Some(element),
                None => return Err(ConstructionError::MalformedProperty(element).into()),
            }
        }

        Self::new(flag, name, properties)
    }
}

impl fmt::Display for CmdOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_string())
    }
}

fn validate_flag(flag: &str) -> Result<(), ConstructionError> {
    if flag.is_empty() {
        return Err(ConstructionError::EmptyFlag);
    }
    if flag.starts_with('-') || flag.chars().any(char::is_whitespace) {
        return Err(ConstructionError::InvalidFlag(flag.to_string()));
    }
    Ok(())
}

/// Splits on single commas; `,,` is an escaped literal comma.
fn split_elements(body: &str) -> Vec<String> {
    let mut elements: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ',' {
            current.push(c);
            continue;
        }
        if chars.peek() == Some(&',') {
            chars.next();
            current.push(',');
        } else {
            elements.push(std::mem::take(&mut current));
        }
    }
    elements.push(current);

    elements
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
