use crate::scenario::event::Event;
use crate::scenario::resolver::CoreValueResolver;
use crate::scenario::value::Value;
use crate::scenario::world::World;
use async_trait::async_trait;

/// A condition checked once when registered and again after every step.
///
/// Checkers never return errors: a violated expectation is recorded on the world so the
/// scenario keeps running and reports every independent failure at the end.
#[async_trait]
pub trait Expectation: Send {
    async fn checker(&mut self, world: &mut World, initial_check: bool);

    fn describe(&self) -> String;
}

/// Resolves `condition`, recording a failure on the world if it cannot be evaluated.
pub(crate) async fn resolve_or_fail(
    world: &mut World,
    condition: &Event,
    context: &str,
) -> Option<Value> {
    match CoreValueResolver::new().resolve(world, condition).await {
        Ok(value) => Some(value),
        Err(e) => {
            world.fail(format!("{context}: failed to resolve {condition}: {e}"));
            None
        }
    }
}

/// `condition` must equal `value` at registration and after every step.
#[derive(Debug, Clone)]
pub struct RemainsExpectation {
    pub condition: Event,
    pub value: Value,
}

impl RemainsExpectation {
    pub fn new(condition: Event, value: Value) -> Self {
        Self { condition, value }
    }
}

#[async_trait]
impl Expectation for RemainsExpectation {
    async fn checker(&mut self, world: &mut World, initial_check: bool) {
        let Some(current) = resolve_or_fail(world, &self.condition, "RemainsExpectation").await
        else {
            return;
        };
        if current != self.value {
            let verb = if initial_check { "started as" } else { "became" };
            world.fail(format!(
                "{}: Expected {} to remain {}, but {verb} {current}",
                self.describe(),
                self.condition,
                self.value
            ));
        }
    }

    fn describe(&self) -> String {
        format!("RemainsExpectation<{}={}>", self.condition, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increase,
    Decrease,
}

/// `condition` must move by exactly `delta` from its value at registration.
#[derive(Debug, Clone)]
pub struct ChangesExpectation {
    pub condition: Event,
    pub delta: Value,
    pub direction: Direction,
    original: Option<Value>,
}

impl ChangesExpectation {
    pub fn new(condition: Event, delta: Value, direction: Direction) -> Self {
        Self {
            condition,
            delta,
            direction,
            original: None,
        }
    }

    pub fn original(&self) -> Option<&Value> {
        self.original.as_ref()
    }

    fn expected(&self, original: &Value) -> Option<Value> {
        match self.direction {
            Direction::Increase => original.checked_add(&self.delta),
            Direction::Decrease => original.checked_sub(&self.delta),
        }
    }
}

#[async_trait]
impl Expectation for ChangesExpectation {
    async fn checker(&mut self, world: &mut World, initial_check: bool) {
        let Some(current) = resolve_or_fail(world, &self.condition, "ChangesExpectation").await
        else {
            return;
        };
        if initial_check {
            self.original = Some(current);
            return;
        }
        let Some(original) = self.original.clone() else {
            world.fail(format!(
                "{}: no initial value was captured",
                self.describe()
            ));
            return;
        };
        match self.expected(&original) {
            Some(expected) if expected == current => {}
            Some(expected) => world.fail(format!(
                "{}: Expected {} to change from {original} to {expected}, but became {current}",
                self.describe(),
                self.condition
            )),
            None => world.fail(format!(
                "{}: cannot apply {} of {} to {original}",
                self.describe(),
                self.direction.as_str(),
                self.delta
            )),
        }
    }

    fn describe(&self) -> String {
        format!(
            "ChangesExpectation<{} {} by {}>",
            self.condition,
            self.direction.as_str(),
            self.delta
        )
    }
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        }
    }
}
