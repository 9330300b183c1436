//! Weighted-probability yes/no evaluation.
//!
//! A [`Decision`] starts positive (an implicit factor of 1.0) and behavior
//! handlers multiply in independent probability factors. The first resolution
//! draws once and the result is memoized; deterministic rules can bypass the
//! draw with [`Decision::force_yes`] / [`Decision::force_no`].

use crate::domain::Money;
use crate::rng::Randomizer;

/// Side-channel results a handler computes while weighing a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecisionOutputs {
    /// How many houses the handler settled on buying.
    pub houses_to_buy: Option<u8>,
    /// The amount a trade handler settled on offering.
    pub offer: Option<Money>,
}

/// One weighted yes/no evaluation. Ephemeral: built, resolved, discarded.
#[derive(Debug, Clone)]
pub struct Decision {
    factors: Vec<f64>,
    outcome: Option<bool>,
    pub outputs: DecisionOutputs,
}

impl Decision {
    pub fn new() -> Self {
        Decision {
            factors: vec![1.0],
            outcome: None,
            outputs: DecisionOutputs::default(),
        }
    }

    /// Multiply in one independent consideration, in `[0, 1]` by convention.
    /// Nothing clamps the product: anything over 1.0 always resolves yes.
    pub fn add_factor(&mut self, factor: f64) {
        self.factors.push(factor);
    }

    /// The combined probability: the product of all factors.
    pub fn probability(&self) -> f64 {
        self.factors.iter().product()
    }

    pub fn force_yes(&mut self) {
        self.outcome = Some(true);
    }

    pub fn force_no(&mut self) {
        self.outcome = Some(false);
    }

    /// Resolve the decision, drawing once on first call and returning the
    /// cached answer thereafter.
    pub fn resolve(&mut self, rng: &mut dyn Randomizer) -> bool {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        let draw = rng.uniform(1, 100);
        let outcome = (draw as f64) < self.probability() * 100.0;
        self.outcome = Some(outcome);
        outcome
    }

    /// The memoized answer, if the decision has been resolved or forced.
    pub fn outcome(&self) -> Option<bool> {
        self.outcome
    }
}

impl Default for Decision {
    fn default() -> Self {
        Decision::new()
    }
}
