use crate::chain::ChainReader;
use crate::scenario::value::Value;
use alloy::primitives::Address;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Outcome of the most recent state-mutating step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invokation {
    pub description: String,
    pub result: Result<Option<Value>, String>,
}

impl Invokation {
    pub fn returned(description: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            description: description.into(),
            result: Ok(value),
        }
    }

    pub fn failed(description: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            result: Err(error.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for Invokation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(Some(value)) => write!(f, "Invokation<{}, value={}>", self.description, value),
            Ok(None) => write!(f, "Invokation<{}, ok>", self.description),
            Err(error) => write!(f, "Invokation<{}, error={}>", self.description, error),
        }
    }
}

/// Mutable scenario context: chain handle, address book, last step outcome and the
/// failures recorded so far. Owned by the scenario runner and lent to checkers.
pub struct World {
    reader: Arc<dyn ChainReader>,
    aliases: BTreeMap<String, Address>,
    last_invokation: Option<Invokation>,
    failures: Vec<String>,
}

impl World {
    pub fn new(reader: Arc<dyn ChainReader>) -> Self {
        Self {
            reader,
            aliases: BTreeMap::new(),
            last_invokation: None,
            failures: Vec::new(),
        }
    }

    pub fn with_alias(mut self, name: impl Into<String>, address: Address) -> Self {
        self.set_alias(name, address);
        self
    }

    pub fn set_alias(&mut self, name: impl Into<String>, address: Address) {
        self.aliases.insert(name.into(), address);
    }

    pub fn alias(&self, name: &str) -> Option<Address> {
        self.aliases.get(name).copied()
    }

    pub fn reader(&self) -> &dyn ChainReader {
        self.reader.as_ref()
    }

    pub fn last_invokation(&self) -> Option<&Invokation> {
        self.last_invokation.as_ref()
    }

    pub fn set_invokation(&mut self, invokation: Invokation) {
        self.last_invokation = Some(invokation);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("[SCENARIO] {}", message);
        self.failures.push(message);
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn has_failed(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("aliases", &self.aliases)
            .field("last_invokation", &self.last_invokation)
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}
