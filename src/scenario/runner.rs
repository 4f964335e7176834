use crate::error::{HarnessError, Result};
use crate::scenario::expectation::Expectation;
use crate::scenario::invariant::Invariant;
use crate::scenario::world::{Invokation, World};
use async_trait::async_trait;

/// A state-mutating step. Failures are reported through the returned invokation.
#[async_trait]
pub trait Action: Send + Sync {
    async fn apply(&self, world: &mut World) -> Invokation;
}

/// Drives a scenario: every registered checker runs once when added and again after
/// each step, in registration order, invariants first.
pub struct Scenario {
    world: World,
    invariants: Vec<Box<dyn Invariant>>,
    expectations: Vec<Box<dyn Expectation>>,
    steps: usize,
}

impl Scenario {
    pub fn new(world: World) -> Self {
        Self {
            world,
            invariants: Vec::new(),
            expectations: Vec::new(),
            steps: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub async fn add_invariant(&mut self, mut invariant: Box<dyn Invariant>) {
        tracing::debug!("[SCENARIO] + {}", invariant.describe());
        invariant.checker(&mut self.world, true).await;
        self.invariants.push(invariant);
    }

    pub async fn add_expectation(&mut self, mut expectation: Box<dyn Expectation>) {
        tracing::debug!("[SCENARIO] + {}", expectation.describe());
        expectation.checker(&mut self.world, true).await;
        self.expectations.push(expectation);
    }

    pub async fn step(&mut self, action: &dyn Action) {
        let invokation = action.apply(&mut self.world).await;
        self.steps += 1;
        tracing::info!("[SCENARIO] step {}: {}", self.steps, invokation);
        self.world.set_invokation(invokation);

        for invariant in &mut self.invariants {
            invariant.checker(&mut self.world, false).await;
        }
        for expectation in &mut self.expectations {
            expectation.checker(&mut self.world, false).await;
        }
    }

    /// Consumes the scenario; any recorded failure fails the run.
    pub fn finish(self) -> Result<World> {
        if self.world.has_failed() {
            tracing::warn!(
                "[SCENARIO] finished after {} steps with {} failure(s)",
                self.steps,
                self.world.failures().len()
            );
            return Err(HarnessError::ScenarioFailed(self.world.failures().to_vec()));
        }
        tracing::info!("[SCENARIO] finished after {} steps, all checks held", self.steps);
        Ok(self.world)
    }
}
