//! Project - a named collection of scenarios.

use serde::{Deserialize, Serialize};

use super::{InvalidComponent, Scenario};
use crate::domain::foundation::{ComponentId, ProjectId, ScenarioId, Timestamp};

/// Currency symbol shown when a project does not set one.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Name given to freshly created projects.
pub const NEW_PROJECT_NAME: &str = "New Project";

/// A stored component that fails validation, located within its project.
#[derive(Debug, Clone, PartialEq)]
pub struct FlaggedComponent {
    pub project_id: ProjectId,
    pub scenario_id: ScenarioId,
    pub component_id: ComponentId,
    pub error: InvalidComponent,
}

/// A unit-economics model: several scenarios of the same product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub last_updated: Timestamp,
    /// Display-only currency symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Project {
    /// Creates a project with a fresh id and no scenarios.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            description: description.into(),
            last_updated: Timestamp::now(),
            currency_symbol: None,
            scenarios: Vec::new(),
        }
    }

    /// The new-project template: one empty base-case scenario.
    pub fn from_template() -> Self {
        let mut project = Self::new(NEW_PROJECT_NAME, "");
        project.scenarios.push(Scenario::initial());
        project
    }

    /// Sets the currency symbol.
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = Some(symbol.into());
        self
    }

    /// Appends a scenario.
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Currency symbol to display, falling back to `$`.
    pub fn currency_symbol(&self) -> &str {
        self.currency_symbol
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
    }

    /// Finds a scenario by id.
    pub fn scenario(&self, id: &ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| &s.id == id)
    }

    /// Finds a scenario by id for mutation.
    pub fn scenario_mut(&mut self, id: &ScenarioId) -> Option<&mut Scenario> {
        self.scenarios.iter_mut().find(|s| &s.id == id)
    }

    /// Stamps the project as modified now.
    pub fn touch(&mut self) {
        self.last_updated = Timestamp::now();
    }

    /// Validates every component of every scenario.
    pub fn validate(&self) -> Result<(), InvalidComponent> {
        self.scenarios.iter().try_for_each(Scenario::validate)
    }

    /// Every component that fails validation, in scenario order.
    pub fn invalid_components(&self) -> Vec<FlaggedComponent> {
        self.scenarios
            .iter()
            .flat_map(|scenario| {
                scenario.components.iter().filter_map(move |component| {
                    component.validate().err().map(|error| FlaggedComponent {
                        project_id: self.id.clone(),
                        scenario_id: scenario.id.clone(),
                        component_id: component.id.clone(),
                        error,
                    })
                })
            })
            .collect()
    }
}
