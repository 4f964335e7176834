//! Declarative state checks for scenario tests.
//!
//! A [`Scenario`] owns the [`World`]; expectations and invariants are checked when
//! registered and again after every step, and record failures on the world instead of
//! returning errors.

pub mod event;
pub mod expectation;
pub mod invariant;
pub mod resolver;
pub mod runner;
pub mod value;
pub mod world;

pub use event::Event;
pub use expectation::{ChangesExpectation, Direction, Expectation, RemainsExpectation};
pub use invariant::{Invariant, RemainsInvariant, StaticInvariant, SuccessInvariant};
pub use resolver::CoreValueResolver;
pub use runner::{Action, Scenario};
pub use value::Value;
pub use world::{Invokation, World};
