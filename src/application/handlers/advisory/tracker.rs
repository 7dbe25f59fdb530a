//! AdviceTracker - keeps only the newest advice per scenario.
//!
//! Advice requests may finish out of order. Each request is issued a token;
//! a response is kept only if its token is still the latest one issued for
//! that scenario.

use std::collections::HashMap;

use super::Advice;
use crate::domain::foundation::ScenarioId;

/// Identifies one advisory request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    scenario_id: ScenarioId,
    sequence: u64,
}

impl RequestToken {
    pub fn scenario_id(&self) -> &ScenarioId {
        &self.scenario_id
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Per-scenario record of issued tokens and accepted advice.
#[derive(Debug, Default)]
pub struct AdviceTracker {
    next_sequence: u64,
    latest: HashMap<ScenarioId, u64>,
    accepted: HashMap<ScenarioId, Advice>,
}

impl AdviceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token that supersedes every earlier one for the scenario.
    pub fn issue(&mut self, scenario_id: &ScenarioId) -> RequestToken {
        self.next_sequence += 1;
        self.latest.insert(scenario_id.clone(), self.next_sequence);
        RequestToken {
            scenario_id: scenario_id.clone(),
            sequence: self.next_sequence,
        }
    }

    /// Whether the token is the newest issued for its scenario.
    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.latest.get(&token.scenario_id) == Some(&token.sequence)
    }

    /// Stores advice if its token is current. Returns whether it was kept.
    pub fn accept(&mut self, token: &RequestToken, advice: Advice) -> bool {
        if !self.is_current(token) {
            tracing::debug!(
                scenario_id = %token.scenario_id,
                sequence = token.sequence,
                "Discarding stale advice"
            );
            return false;
        }
        self.accepted.insert(token.scenario_id.clone(), advice);
        true
    }

    /// Latest accepted advice for a scenario.
    pub fn current(&self, scenario_id: &ScenarioId) -> Option<&Advice> {
        self.accepted.get(scenario_id)
    }

    /// Forgets a scenario; in-flight responses for it become stale.
    pub fn forget(&mut self, scenario_id: &ScenarioId) {
        self.latest.remove(scenario_id);
        self.accepted.remove(scenario_id);
    }
}
