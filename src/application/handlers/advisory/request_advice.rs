//! AdvisoryHandler - asks the AI provider for a written scenario analysis.
//!
//! Provider failures never reach the caller: they are logged and replaced by
//! a fixed fallback message.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use super::tracker::{AdviceTracker, RequestToken};
use crate::domain::analysis::{AnalysisResult, CostNormalizer, ScenarioAggregator};
use crate::domain::costing::{CostRule, CostType, Scenario, DEFAULT_CURRENCY_SYMBOL};
use crate::domain::foundation::{ProjectId, ScenarioId};
use crate::ports::{AIProvider, CompletionRequest, RequestMetadata};

/// Shown when the provider call fails.
pub const ADVISORY_UNAVAILABLE: &str =
    "Unable to generate AI analysis at this time. Please check your API key.";

/// Shown when the provider returns no text.
pub const ADVISORY_EMPTY: &str = "Analysis could not be generated.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisoryError {
    /// A scenario with no positive total is not sent for analysis.
    #[error("Scenario {0} has no cost to analyse")]
    NothingToAnalyze(ScenarioId),
}

/// Where the advice text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceSource {
    Generated,
    Fallback,
}

/// Advisory text for one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice {
    pub scenario_id: ScenarioId,
    pub text: String,
    pub source: AdviceSource,
}

impl Advice {
    fn fallback(scenario_id: ScenarioId, text: &str) -> Self {
        Self {
            scenario_id,
            text: text.to_string(),
            source: AdviceSource::Fallback,
        }
    }
}

/// Command to request advice for a scenario.
#[derive(Debug, Clone)]
pub struct RequestAdviceCommand {
    pub project_id: Option<ProjectId>,
    pub scenario: Scenario,
    pub analysis: AnalysisResult,
    pub currency_symbol: String,
}

impl RequestAdviceCommand {
    /// Builds the command, aggregating the scenario.
    pub fn new(scenario: Scenario) -> Self {
        let analysis = ScenarioAggregator::aggregate(&scenario);
        Self {
            project_id: None,
            scenario,
            analysis,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    pub fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }
}

/// Outcome of a tracked request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceOutcome {
    /// The advice is now the scenario's current advice.
    Applied(Advice),
    /// A newer request for the same scenario was issued meanwhile.
    Superseded(Advice),
}

/// Handler for advisory requests.
pub struct AdvisoryHandler {
    provider: Arc<dyn AIProvider>,
    tracker: Arc<Mutex<AdviceTracker>>,
}

impl AdvisoryHandler {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            tracker: Arc::new(Mutex::new(AdviceTracker::new())),
        }
    }

    /// Requests advice and records it unless a newer request superseded it.
    pub async fn handle(&self, cmd: RequestAdviceCommand) -> Result<AdviceOutcome, AdvisoryError> {
        Self::ensure_has_cost(&cmd)?;

        let token: RequestToken = self.tracker.lock().await.issue(&cmd.scenario.id);
        let advice = self.generate(&cmd).await;

        let mut tracker = self.tracker.lock().await;
        if tracker.accept(&token, advice.clone()) {
            Ok(AdviceOutcome::Applied(advice))
        } else {
            Ok(AdviceOutcome::Superseded(advice))
        }
    }

    /// Requests advice without tracking.
    pub async fn request(&self, cmd: RequestAdviceCommand) -> Result<Advice, AdvisoryError> {
        Self::ensure_has_cost(&cmd)?;
        Ok(self.generate(&cmd).await)
    }

    /// Current advice for a scenario.
    pub async fn current(&self, scenario_id: &ScenarioId) -> Option<Advice> {
        self.tracker.lock().await.current(scenario_id).cloned()
    }

    /// Drops everything held for a deleted scenario.
    pub async fn forget(&self, scenario_id: &ScenarioId) {
        self.tracker.lock().await.forget(scenario_id);
    }

    fn ensure_has_cost(cmd: &RequestAdviceCommand) -> Result<(), AdvisoryError> {
        if cmd.analysis.has_cost() {
            Ok(())
        } else {
            Err(AdvisoryError::NothingToAnalyze(cmd.scenario.id.clone()))
        }
    }

    async fn generate(&self, cmd: &RequestAdviceCommand) -> Advice {
        let scenario_id = cmd.scenario.id.clone();
        let mut metadata = RequestMetadata::for_scenario(scenario_id.clone());
        if let Some(project_id) = &cmd.project_id {
            metadata = metadata.with_project(project_id.clone());
        }
        let trace_id = metadata.trace_id.clone();
        let request = CompletionRequest::new(build_prompt(cmd), metadata);

        match self.provider.complete(request).await {
            Ok(response) if response.content.trim().is_empty() => {
                tracing::warn!(%scenario_id, %trace_id, "Advisory provider returned no text");
                Advice::fallback(scenario_id, ADVISORY_EMPTY)
            }
            Ok(response) => {
                tracing::info!(
                    %scenario_id,
                    %trace_id,
                    model = %response.model,
                    total_tokens = response.usage.total_tokens,
                    "Advisory generated"
                );
                Advice {
                    scenario_id,
                    text: response.content,
                    source: AdviceSource::Generated,
                }
            }
            Err(e) => {
                tracing::error!(%scenario_id, %trace_id, error = %e, "Advisory request failed");
                Advice::fallback(scenario_id, ADVISORY_UNAVAILABLE)
            }
        }
    }
}

/// Builds the analyst prompt for a scenario.
pub fn build_prompt(cmd: &RequestAdviceCommand) -> String {
    let symbol = &cmd.currency_symbol;
    let scenario = &cmd.scenario;

    let mut prompt = format!(
        "You are a senior product manager and financial analyst for a SaaS startup.\n\n\
         We are analyzing a scenario named: \"{}\"\n\
         Description: \"{}\"\n\n\
         Here is the cost breakdown (Components):\n",
        scenario.name, scenario.description
    );

    for component in &scenario.components {
        prompt.push_str(&format!(
            "- {}: {}. Monthly: {}{:.4}\n",
            component.name,
            describe_rule(&component.rule, symbol),
            symbol,
            CostNormalizer::monthly_cost(component)
        ));
    }

    prompt.push_str(&format!(
        "\nTotal Cost for this scenario: {}{:.4}\n\n",
        symbol, cmd.analysis.total_cost
    ));
    prompt.push_str(
        "Please provide a concise analysis (max 3 paragraphs) covering:\n\
         1. Viability assessment.\n\
         2. Identification of the primary cost driver.\n\
         3. Specific optimization advice based on the component types (Fixed vs Unit vs One-Time).\n\n\
         Keep the tone professional, objective, and concise.",
    );

    prompt
}

fn describe_rule(rule: &CostRule, symbol: &str) -> String {
    match rule {
        CostRule::UnitBased {
            quantity,
            price_per_unit,
            unit_denominator,
            unit_measurement,
        } => {
            let noun = CostType::UnitBased.price_noun();
            let per = match (unit_denominator, unit_measurement) {
                (Some(d), Some(m)) => format!("{} {}", d, m),
                (Some(d), None) => format!("{} {}s", d, noun),
                (None, Some(m)) => m.clone(),
                (None, None) => noun.to_string(),
            };
            format!(
                "{} {}s @ {}{}/{} ({})",
                quantity,
                noun,
                symbol,
                price_per_unit,
                per,
                CostType::UnitBased
            )
        }
        CostRule::FixedRecurring {
            price_per_unit,
            recurrence,
        } => format!(
            "{}{}/{} ({})",
            symbol,
            price_per_unit,
            recurrence.unwrap_or_default(),
            CostType::FixedRecurring
        ),
        CostRule::OneTime { price_per_unit } => format!(
            "{}{}/{} ({})",
            symbol,
            price_per_unit,
            CostType::OneTime.price_noun(),
            CostType::OneTime
        ),
        CostRule::Unrecognized { cost_type, .. } => {
            format!("unrecognized cost type \"{}\"", cost_type)
        }
    }
}
