//! ComponentDraft - raw form input validated into a Component.
//!
//! Numbers arrive as optional values (a cleared input is `None`) or as text.
//! Nothing reaches the normalizer until it passes [`ComponentDraft::validate`].

use super::{Component, CostRule, CostType, CustomField, InvalidComponent, RecurrencePeriod};
use crate::domain::foundation::{ensure_finite, ValidationError};

/// Unvalidated component input.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDraft {
    pub name: String,
    pub cost_type: CostType,
    pub quantity: Option<f64>,
    pub price_per_unit: Option<f64>,
    pub unit_denominator: Option<f64>,
    pub unit_measurement: Option<String>,
    pub recurrence: Option<RecurrencePeriod>,
    pub custom_fields: Option<Vec<CustomField>>,
}

impl ComponentDraft {
    /// Creates a draft with the defaults a new-component form starts from:
    /// quantity 1, price 0, denominator 1, monthly recurrence.
    pub fn new(name: impl Into<String>, cost_type: CostType) -> Self {
        Self {
            name: name.into(),
            cost_type,
            quantity: Some(1.0),
            price_per_unit: Some(0.0),
            unit_denominator: Some(1.0),
            unit_measurement: None,
            recurrence: Some(RecurrencePeriod::Monthly),
            custom_fields: None,
        }
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price_per_unit = Some(price);
        self
    }

    pub fn with_denominator(mut self, denominator: f64) -> Self {
        self.unit_denominator = Some(denominator);
        self
    }

    pub fn with_unit_measurement(mut self, measurement: impl Into<String>) -> Self {
        self.unit_measurement = Some(measurement.into());
        self
    }

    pub fn with_recurrence(mut self, recurrence: RecurrencePeriod) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn with_custom_fields(mut self, fields: Vec<CustomField>) -> Self {
        self.custom_fields = Some(fields);
        self
    }

    /// Validates the draft and builds a component with a fresh id.
    ///
    /// Only the fields the chosen cost type reads are checked and kept.
    pub fn validate(self) -> Result<Component, InvalidComponent> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(InvalidComponent::new(
                self.name,
                ValidationError::empty_field("name"),
            ));
        }

        let rule = self
            .build_rule()
            .map_err(|reason| InvalidComponent::new(&name, reason))?;

        let mut component = Component::new(name, rule);
        component.custom_fields = self.custom_fields;
        Ok(component)
    }

    fn build_rule(&self) -> Result<CostRule, ValidationError> {
        let price_per_unit = required("pricePerUnit", self.price_per_unit)?;

        match self.cost_type {
            CostType::UnitBased => {
                let quantity = required("quantity", self.quantity)?;
                if let Some(denominator) = self.unit_denominator {
                    ensure_finite("unitDenominator", denominator)?;
                }
                let unit_measurement = self
                    .unit_measurement
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string);

                Ok(CostRule::UnitBased {
                    quantity,
                    price_per_unit,
                    unit_denominator: self.unit_denominator,
                    unit_measurement,
                })
            }
            CostType::FixedRecurring => Ok(CostRule::FixedRecurring {
                price_per_unit,
                recurrence: Some(self.recurrence.unwrap_or_default()),
            }),
            CostType::OneTime => Ok(CostRule::OneTime { price_per_unit }),
        }
    }
}

fn required(field: &str, value: Option<f64>) -> Result<f64, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::missing(field))?;
    ensure_finite(field, value)?;
    Ok(value)
}

/// Parses a numeric form input.
///
/// Blank input yields `None` (a cleared field); anything that is not a
/// finite number is rejected.
pub fn parse_amount(field: &str, input: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, format!("'{}' is not a number", trimmed)))?;
    ensure_finite(field, value)?;
    Ok(Some(value))
}
