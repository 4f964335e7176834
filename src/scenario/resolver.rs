use crate::error::ResolutionError;
use crate::math::{parse_mantissa, parse_units};
use crate::scenario::event::Event;
use crate::scenario::value::Value;
use crate::scenario::world::World;
use alloy::primitives::{Address, U256};
use std::str::FromStr;

/// Evaluates condition expressions against the world and live chain state.
///
/// Supported forms:
/// - atoms: integers, `True`/`False`, `0x`-prefixed addresses, registered aliases
/// - `(Exactly n)`, `(Exp d)`, `(Bool b)`, `(String s)`, `(Address name)`
/// - `(Read <contract> <field>)` reads a one-word view from `contract`; `ReadExp` reads
///   the same word as an 18-decimal mantissa
/// - `(LastInvokation)` is the last step's return value, `Nothing` if none
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreValueResolver;

fn unknown(event: &Event) -> ResolutionError {
    ResolutionError::UnknownPath(event.to_string())
}

fn malformed(event: &Event, reason: &str) -> ResolutionError {
    ResolutionError::Malformed {
        expr: event.to_string(),
        reason: reason.to_string(),
    }
}

fn single_atom<'e>(event: &'e Event) -> Result<&'e str, ResolutionError> {
    match event.args() {
        [Event::Atom(arg)] => Ok(arg.as_str()),
        _ => Err(malformed(event, "expected exactly one literal argument")),
    }
}

fn parse_integer(event: &Event, raw: &str) -> Result<Value, ResolutionError> {
    if raw.contains('.') {
        return Err(malformed(event, "expected an integer"));
    }
    parse_units(raw, 0)
        .map(Value::Number)
        .map_err(|source| ResolutionError::Literal {
            expr: event.to_string(),
            source,
        })
}

fn is_address_literal(raw: &str) -> bool {
    raw.len() == 42
        && raw.starts_with("0x")
        && raw[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

impl CoreValueResolver {
    pub fn new() -> Self {
        Self
    }

    pub async fn resolve(&self, world: &World, event: &Event) -> Result<Value, ResolutionError> {
        match event {
            Event::Atom(raw) => self.resolve_atom(world, event, raw),
            Event::List(_) => self.resolve_list(world, event).await,
        }
    }

    fn resolve_atom(&self, world: &World, event: &Event, raw: &str) -> Result<Value, ResolutionError> {
        match raw {
            "True" => return Ok(Value::Bool(true)),
            "False" => return Ok(Value::Bool(false)),
            _ => {}
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            return parse_integer(event, raw);
        }
        if let Ok(address) = self.resolve_address(world, event) {
            return Ok(Value::Address(address));
        }
        Err(unknown(event))
    }

    /// An address from a literal, an alias, or an `(Address name)` form.
    pub fn resolve_address(&self, world: &World, event: &Event) -> Result<Address, ResolutionError> {
        match event {
            Event::Atom(raw) if is_address_literal(raw) => {
                Address::from_str(raw).map_err(|e| malformed(event, &e.to_string()))
            }
            Event::Atom(raw) => world.alias(raw).ok_or_else(|| unknown(event)),
            Event::List(_) if event.head() == Some("Address") => {
                let name = single_atom(event)?;
                self.resolve_address(world, &Event::atom(name))
            }
            Event::List(_) => Err(unknown(event)),
        }
    }

    async fn read_word(&self, world: &World, event: &Event) -> Result<U256, ResolutionError> {
        let [contract, Event::Atom(field)] = event.args() else {
            return Err(malformed(event, "expected (Read <contract> <field>)"));
        };
        let contract = self.resolve_address(world, contract)?;
        world
            .reader()
            .read_field(contract, field)
            .await
            .map_err(|source| ResolutionError::Read {
                expr: event.to_string(),
                source,
            })
    }

    async fn resolve_list(&self, world: &World, event: &Event) -> Result<Value, ResolutionError> {
        let Some(head) = event.head() else {
            return Err(malformed(event, "expression must start with a name"));
        };
        match head {
            "Exactly" => parse_integer(event, single_atom(event)?),
            "Exp" => parse_mantissa(single_atom(event)?)
                .map(Value::Exp)
                .map_err(|source| ResolutionError::Literal {
                    expr: event.to_string(),
                    source,
                }),
            "Bool" => match single_atom(event)? {
                "True" => Ok(Value::Bool(true)),
                "False" => Ok(Value::Bool(false)),
                _ => Err(malformed(event, "expected True or False")),
            },
            "String" => Ok(Value::String(single_atom(event)?.to_string())),
            "Address" => self.resolve_address(world, event).map(Value::Address),
            "LastInvokation" => Ok(match world.last_invokation() {
                Some(invokation) => match &invokation.result {
                    Ok(Some(value)) => value.clone(),
                    _ => Value::Nothing,
                },
                None => Value::Nothing,
            }),
            "Read" => self.read_word(world, event).await.map(Value::Number),
            "ReadExp" => self.read_word(world, event).await.map(Value::Exp),
            _ => Err(unknown(event)),
        }
    }
}
