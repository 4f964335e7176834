use crate::scenario::event::Event;
use crate::scenario::expectation::resolve_or_fail;
use crate::scenario::value::Value;
use crate::scenario::world::World;
use async_trait::async_trait;

/// A global property re-checked after every step for the whole scenario.
#[async_trait]
pub trait Invariant: Send {
    async fn checker(&mut self, world: &mut World, initial_check: bool);

    fn held(&self) -> bool;

    fn describe(&self) -> String;
}

/// The last step must not have failed.
#[derive(Debug, Clone, Default)]
pub struct SuccessInvariant {
    pub held: bool,
}

impl SuccessInvariant {
    pub fn new() -> Self {
        Self { held: false }
    }
}

#[async_trait]
impl Invariant for SuccessInvariant {
    async fn checker(&mut self, world: &mut World, _initial_check: bool) {
        let Some(invokation) = world.last_invokation() else {
            return;
        };
        if !invokation.success() {
            let message = format!("Success invariant broken! Expected successful execution, but had error {invokation}");
            world.fail(message);
        }
    }

    fn held(&self) -> bool {
        self.held
    }

    fn describe(&self) -> String {
        "SuccessInvariant".to_string()
    }
}

/// `condition` must equal `value` at every check.
#[derive(Debug, Clone)]
pub struct RemainsInvariant {
    pub condition: Event,
    pub value: Value,
    pub held: bool,
}

impl RemainsInvariant {
    pub fn new(condition: Event, value: Value) -> Self {
        Self {
            condition,
            value,
            held: false,
        }
    }
}

#[async_trait]
impl Invariant for RemainsInvariant {
    async fn checker(&mut self, world: &mut World, initial_check: bool) {
        let Some(current) = resolve_or_fail(world, &self.condition, "RemainsInvariant").await
        else {
            self.held = false;
            return;
        };
        self.held = current == self.value;
        if !self.held {
            let verb = if initial_check { "started as" } else { "became" };
            world.fail(format!(
                "Invariant broken! Expected {} to remain {}, but {verb} {current}",
                self.condition, self.value
            ));
        }
    }

    fn held(&self) -> bool {
        self.held
    }

    fn describe(&self) -> String {
        format!("RemainsInvariant<{}={}>", self.condition, self.value)
    }
}

/// `condition` must keep whatever value it had at the first check.
#[derive(Debug, Clone)]
pub struct StaticInvariant {
    pub condition: Event,
    captured: Option<Value>,
    pub held: bool,
}

impl StaticInvariant {
    pub fn new(condition: Event) -> Self {
        Self {
            condition,
            captured: None,
            held: false,
        }
    }

    pub fn captured(&self) -> Option<&Value> {
        self.captured.as_ref()
    }
}

#[async_trait]
impl Invariant for StaticInvariant {
    async fn checker(&mut self, world: &mut World, _initial_check: bool) {
        let Some(current) = resolve_or_fail(world, &self.condition, "StaticInvariant").await
        else {
            self.held = false;
            return;
        };
        match &self.captured {
            None => {
                self.captured = Some(current);
                self.held = true;
            }
            Some(captured) if *captured == current => self.held = true,
            Some(captured) => {
                self.held = false;
                world.fail(format!(
                    "Static invariant broken! Expected {} to remain static at {captured}, but became {current}",
                    self.condition
                ));
            }
        }
    }

    fn held(&self) -> bool {
        self.held
    }

    fn describe(&self) -> String {
        format!("StaticInvariant<{}>", self.condition)
    }
}
