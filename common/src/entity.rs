//! # Entity Builder
//!
//! An [`Entity`] is the mutable builder behind one hypervisor switch. Device
//! facades own an entity and drive it through typed setters; the entity freezes
//! into a [`CmdOption`] with [`Entity::compile`].
//!
//! Keys are unique by default: setting a key that is already present overwrites
//! it in place, so output order stays the order in which keys were first set.
//! Multi-valued keys (`hostfwd`, `dnssearch`, ...) must be declared with
//! [`Entity::repeatable`] before they may appear more than once.
//!
//! Setters never fail on the spot. An invalid key is remembered and returned by
//! `compile`, which keeps long setter chains readable.

use std::collections::BTreeSet;

use tracing::trace;

use crate::error::{ConstructionError, QcmdError, ValidationError};
use crate::option::CmdOption;
use crate::property::{Property, Value};

/// A predicate over the compiled option, run by [`Entity::compile`].
pub type Validator = fn(&CmdOption) -> Result<(), QcmdError>;

#[derive(Debug, Clone)]
pub struct Entity {
    flag: String,
    name: String,
    properties: Vec<Property>,
    repeatable: BTreeSet<String>,
    validators: Vec<Validator>,
    positional: bool,
    raw: bool,
    error: Option<QcmdError>,
}

impl Entity {
    pub fn new(flag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            name: name.into(),
            properties: Vec::new(),
            repeatable: BTreeSet::new(),
            validators: Vec::new(),
            positional: false,
            raw: false,
            error: None,
        }
    }

    /// A switch without arguments, e.g. `-nographic`.
    pub fn flag_only(flag: impl Into<String>) -> Self {
        Self::new(flag, "")
    }

    /// A bare token rendered without a leading dash.
    pub fn positional(token: impl Into<String>) -> Self {
        let mut entity = Self::new(token, "");
        entity.positional = true;
        entity
    }

    /// `-flag <argument>` with the argument rendered verbatim, e.g. `-append`.
    pub fn raw(flag: impl Into<String>, argument: impl Into<String>) -> Self {
        let mut entity = Self::new(flag, argument);
        entity.raw = true;
        entity
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Declares `key` as multi-valued.
    pub fn repeatable(&mut self, key: impl Into<String>) -> &mut Self {
        self.repeatable.insert(key.into());
        self
    }

    pub fn is_repeatable(&self, key: &str) -> bool {
        self.repeatable.contains(key)
    }

    /// Appends for repeatable keys, upserts for everything else.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let Some(prop) = self.build(key, value) else {
            return self;
        };

        if self.is_repeatable(prop.key()) {
            self.properties.push(prop);
        } else {
            self.upsert(prop);
        }
        self
    }

    /// Overwrites the first property named `key`, or appends when there is none.
    ///
    /// Later duplicates of the key are dropped, leaving exactly one.
    pub fn upsert_property(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        if let Some(prop) = self.build(key, value) {
            self.upsert(prop);
        }
        self
    }

    /// Appends unconditionally. Only repeatable keys may be appended twice.
    pub fn append_property(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let Some(prop) = self.build(key, value) else {
            return self;
        };

        if !self.is_repeatable(prop.key()) && self.has_property(prop.key()) {
            let err = ValidationError::DuplicateKey {
                flag: self.flag.clone(),
                key: prop.key().to_string(),
            };
            self.record(err.into());
            return self;
        }

        self.properties.push(prop);
        self
    }

    /// Removes every property named `key`.
    pub fn remove_property(&mut self, key: &str) -> &mut Self {
        self.properties.retain(|prop| prop.key() != key);
        self
    }

    /// The last property named `key`.
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.iter().rev().find(|prop| prop.key() == key)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.iter().any(|prop| prop.key() == key)
    }

    /// Rebinds the rendered flag, e.g. to turn a `netdev` backend into a `nic`.
    pub fn set_option_flag(&mut self, flag: impl Into<String>) -> &mut Self {
        self.flag = flag.into();
        self
    }

    /// Rebinds the rendered name. An empty name removes it.
    pub fn set_option_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn validate_with(&mut self, validator: Validator) -> &mut Self {
        self.validators.push(validator);
        self
    }

    /// Freezes the current state into a [`CmdOption`].
    ///
    /// Reports the first setter error, then runs every registered validator.
    pub fn compile(&self) -> Result<CmdOption, QcmdError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }

        let name: Option<String> = Some(self.name.clone());
        let option: CmdOption = if self.positional {
            CmdOption::with_suppressed_dash(self.flag.clone(), name, self.properties.clone())?
        } else if self.raw {
            if !self.properties.is_empty() {
                return Err(ConstructionError::RawWithProperties {
                    flag: self.flag.clone(),
                }
                .into());
            }
            CmdOption::raw(self.flag.clone(), self.name.clone())?
        } else {
            CmdOption::new(self.flag.clone(), name, self.properties.clone())?
        };

        for validator in &self.validators {
            validator(&option)?;
        }

        trace!(option = %option, "compiled entity");
        Ok(option)
    }

    fn build(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Property> {
        match Property::new(key, value) {
            Ok(prop) => Some(prop),
            Err(err) => {
                self.record(err);
                None
            }
        }
    }

    fn upsert(&mut self, prop: Property) {
        let Some(idx) = self.properties.iter().position(|p| p.key() == prop.key()) else {
            self.properties.push(prop);
            return;
        };

        trace!(flag = %self.flag, key = prop.key(), "overwriting property");
        let key: String = prop.key().to_string();
        self.properties[idx] = prop;

        let mut seen_first = false;
        self.properties.retain(|p| {
            if p.key() != key {
                return true;
            }
            let keep = !seen_first;
            seen_first = true;
            keep
        });
    }

    /// Keeps the first error only.
    fn record(&mut self, err: QcmdError) {
        self.error.get_or_insert(err);
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
