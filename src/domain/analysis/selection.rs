//! Scenario selection state for side-by-side comparison.

use thiserror::Error;

use crate::domain::costing::Scenario;
use crate::domain::foundation::ScenarioId;

/// How many scenarios a fresh selection starts with.
pub const DEFAULT_SELECTION_SIZE: usize = 3;

/// Errors from changing a selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("cannot deselect {0}: at least one scenario must stay selected")]
    WouldBeEmpty(ScenarioId),
}

/// Outcome of a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
}

/// Set of scenario ids chosen for comparison.
///
/// Toggling never empties a non-empty selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioSelection {
    ids: Vec<ScenarioId>,
}

impl ScenarioSelection {
    /// The first [`DEFAULT_SELECTION_SIZE`] scenarios in project order.
    pub fn initial(scenarios: &[Scenario]) -> Self {
        Self::from_ids(
            scenarios
                .iter()
                .take(DEFAULT_SELECTION_SIZE)
                .map(|s| s.id.clone()),
        )
    }

    /// Builds a selection from ids, dropping duplicates.
    pub fn from_ids(ids: impl IntoIterator<Item = ScenarioId>) -> Self {
        let mut selection = Self::default();
        for id in ids {
            if !selection.contains(&id) {
                selection.ids.push(id);
            }
        }
        selection
    }

    /// Adds the id if absent, removes it if present.
    ///
    /// Removing the only selected id is refused.
    pub fn toggle(&mut self, id: &ScenarioId) -> Result<Toggle, SelectionError> {
        match self.ids.iter().position(|s| s == id) {
            Some(_) if self.ids.len() == 1 => Err(SelectionError::WouldBeEmpty(id.clone())),
            Some(index) => {
                self.ids.remove(index);
                Ok(Toggle::Deselected)
            }
            None => {
                self.ids.push(id.clone());
                Ok(Toggle::Selected)
            }
        }
    }

    /// Drops ids whose scenario no longer exists.
    ///
    /// Selects the first scenario if nothing survives.
    pub fn reconcile(&mut self, scenarios: &[Scenario]) {
        self.ids
            .retain(|id| scenarios.iter().any(|scenario| &scenario.id == id));
        if self.ids.is_empty() {
            if let Some(first) = scenarios.first() {
                self.ids.push(first.id.clone());
            }
        }
    }

    pub fn contains(&self, id: &ScenarioId) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in the order they were selected.
    pub fn ids(&self) -> &[ScenarioId] {
        &self.ids
    }
}
