//! Scenario - one named business-model variant and its components.

use serde::{Deserialize, Serialize};

use super::{Component, InvalidComponent};
use crate::domain::foundation::{ComponentId, ScenarioId};

/// Name of the scenario every new project starts with.
pub const INITIAL_SCENARIO_NAME: &str = "Initial Scenario";

/// Description of the scenario every new project starts with.
pub const INITIAL_SCENARIO_DESCRIPTION: &str = "Base case analysis";

/// A named collection of cost components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Scenario {
    /// Creates an empty scenario with a fresh id.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: ScenarioId::new(),
            name: name.into(),
            description: description.into(),
            components: Vec::new(),
        }
    }

    /// The base-case scenario a new project starts with.
    pub fn initial() -> Self {
        Self::new(INITIAL_SCENARIO_NAME, INITIAL_SCENARIO_DESCRIPTION)
    }

    /// Appends a component.
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Finds a component by id.
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| &c.id == id)
    }

    /// Finds a component by id for mutation.
    pub fn component_mut(&mut self, id: &ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| &c.id == id)
    }

    /// Returns the first component whose name matches exactly (case-sensitive).
    ///
    /// Later components with the same name are never returned.
    pub fn first_named(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Removes a component, returning it if it existed.
    pub fn remove_component(&mut self, id: &ComponentId) -> Option<Component> {
        let index = self.components.iter().position(|c| &c.id == id)?;
        Some(self.components.remove(index))
    }

    /// Copies the scenario under a fresh id, named "<name> (Copy)".
    ///
    /// Every component also receives a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: ScenarioId::new(),
            name: format!("{} (Copy)", self.name),
            description: self.description.clone(),
            components: self.components.iter().map(Component::with_fresh_id).collect(),
        }
    }

    /// Validates every component.
    pub fn validate(&self) -> Result<(), InvalidComponent> {
        self.components.iter().try_for_each(Component::validate)
    }
}
