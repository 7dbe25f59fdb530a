//! Component - a single cost line item and its billing rule.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::rule_record::RuleRecord;
use super::{CostType, RecurrencePeriod};
use crate::domain::foundation::{ensure_finite, ComponentId, CustomFieldId, ValidationError};

/// Billing rule of a component.
///
/// Each variant carries only the fields its cost type reads, so a fixed
/// recurring cost has no quantity to misinterpret. Stored flat under the
/// `costType` tag; fields belonging to other cost types are ignored on read.
/// A tag this version does not know is kept verbatim, with its fields, and
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleRecord", into = "RuleRecord")]
pub enum CostRule {
    /// Price quoted per `unit_denominator` units, consumed `quantity` times a month.
    UnitBased {
        quantity: f64,
        price_per_unit: f64,
        unit_denominator: Option<f64>,
        unit_measurement: Option<String>,
    },

    /// Flat bill charged every period; a missing recurrence means monthly.
    FixedRecurring {
        price_per_unit: f64,
        recurrence: Option<RecurrencePeriod>,
    },

    /// Single upfront fee.
    OneTime { price_per_unit: f64 },

    /// A `costType` tag this version does not know. Normalizes to zero.
    Unrecognized {
        cost_type: String,
        /// Every stored field of the rule other than the tag.
        fields: Map<String, Value>,
    },
}

impl CostRule {
    /// An unknown rule with no fields besides its tag.
    pub fn unrecognized(cost_type: impl Into<String>) -> Self {
        CostRule::Unrecognized {
            cost_type: cost_type.into(),
            fields: Map::new(),
        }
    }

    /// Returns the cost type, or `None` for an unrecognized rule.
    pub fn cost_type(&self) -> Option<CostType> {
        match self {
            CostRule::UnitBased { .. } => Some(CostType::UnitBased),
            CostRule::FixedRecurring { .. } => Some(CostType::FixedRecurring),
            CostRule::OneTime { .. } => Some(CostType::OneTime),
            CostRule::Unrecognized { .. } => None,
        }
    }

    /// Returns the raw vendor-quoted price, if the rule has one.
    pub fn price_per_unit(&self) -> Option<f64> {
        match self {
            CostRule::UnitBased { price_per_unit, .. }
            | CostRule::FixedRecurring { price_per_unit, .. }
            | CostRule::OneTime { price_per_unit } => Some(*price_per_unit),
            CostRule::Unrecognized { .. } => None,
        }
    }

    /// Checks every numeric field for NaN and infinities.
    ///
    /// Sign and magnitude are deliberately left alone.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            CostRule::UnitBased {
                quantity,
                price_per_unit,
                unit_denominator,
                ..
            } => {
                ensure_finite("quantity", *quantity)?;
                ensure_finite("pricePerUnit", *price_per_unit)?;
                if let Some(denominator) = unit_denominator {
                    ensure_finite("unitDenominator", *denominator)?;
                }
                Ok(())
            }
            CostRule::FixedRecurring { price_per_unit, .. }
            | CostRule::OneTime { price_per_unit } => ensure_finite("pricePerUnit", *price_per_unit),
            CostRule::Unrecognized { .. } => Ok(()),
        }
    }
}

/// Free-form metadata attached to a component. Never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: CustomFieldId,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
}

impl CustomField {
    /// Creates a text custom field with a fresh id.
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: CustomFieldId::new(),
            key: key.into(),
            value: value.into(),
            field_type: CustomFieldType::Text,
        }
    }
}

/// Input widget hint for a custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    Text,
    Number,
    Date,
    Select,
}

/// A single cost line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: ComponentId,
    /// Display label. Not required to be unique within a scenario.
    pub name: String,
    #[serde(flatten)]
    pub rule: CostRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomField>>,
}

impl Component {
    /// Creates a component with a fresh id.
    pub fn new(name: impl Into<String>, rule: CostRule) -> Self {
        Self {
            id: ComponentId::new(),
            name: name.into(),
            rule,
            custom_fields: None,
        }
    }

    /// Unit based cost priced per single unit.
    pub fn unit_based(name: impl Into<String>, price_per_unit: f64, quantity: f64) -> Self {
        Self::new(
            name,
            CostRule::UnitBased {
                quantity,
                price_per_unit,
                unit_denominator: None,
                unit_measurement: None,
            },
        )
    }

    /// Fixed recurring cost.
    pub fn fixed_recurring(
        name: impl Into<String>,
        price_per_unit: f64,
        recurrence: RecurrencePeriod,
    ) -> Self {
        Self::new(
            name,
            CostRule::FixedRecurring {
                price_per_unit,
                recurrence: Some(recurrence),
            },
        )
    }

    /// One-time cost.
    pub fn one_time(name: impl Into<String>, price_per_unit: f64) -> Self {
        Self::new(name, CostRule::OneTime { price_per_unit })
    }

    /// Sets the "price per N units" denominator. No effect on other cost types.
    pub fn with_denominator(mut self, denominator: f64) -> Self {
        if let CostRule::UnitBased {
            unit_denominator, ..
        } = &mut self.rule
        {
            *unit_denominator = Some(denominator);
        }
        self
    }

    /// Sets the display-only unit label. No effect on other cost types.
    pub fn with_unit_measurement(mut self, measurement: impl Into<String>) -> Self {
        if let CostRule::UnitBased {
            unit_measurement, ..
        } = &mut self.rule
        {
            *unit_measurement = Some(measurement.into());
        }
        self
    }

    /// Attaches custom metadata fields.
    pub fn with_custom_fields(mut self, fields: Vec<CustomField>) -> Self {
        self.custom_fields = Some(fields);
        self
    }

    /// Returns the cost type, or `None` for an unrecognized stored rule.
    pub fn cost_type(&self) -> Option<CostType> {
        self.rule.cost_type()
    }

    /// Returns a copy with a fresh id.
    pub fn with_fresh_id(&self) -> Self {
        Self {
            id: ComponentId::new(),
            ..self.clone()
        }
    }

    /// Checks the name and every numeric field.
    pub fn validate(&self) -> Result<(), InvalidComponent> {
        if self.name.trim().is_empty() {
            return Err(InvalidComponent::new(
                &self.name,
                ValidationError::empty_field("name"),
            ));
        }
        self.rule
            .validate()
            .map_err(|reason| InvalidComponent::new(&self.name, reason))
    }
}

/// A component rejected at the validation boundary.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid component '{name}': {reason}")]
pub struct InvalidComponent {
    /// Name of the rejected component (may be empty).
    pub name: String,
    #[source]
    pub reason: ValidationError,
}

impl InvalidComponent {
    pub fn new(name: impl Into<String>, reason: ValidationError) -> Self {
        Self {
            name: name.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unit_based_serializes_flat_with_cost_type_tag() {
        let component = Component::unit_based("GPT-4 API", 0.002, 50_000.0)
            .with_denominator(1000.0)
            .with_unit_measurement("Tokens");
        let value = serde_json::to_value(&component).unwrap();

        assert_eq!(value["costType"], "Unit Based Cost");
        assert_eq!(value["name"], "GPT-4 API");
        assert_eq!(value["pricePerUnit"], 0.002);
        assert_eq!(value["quantity"], 50_000.0);
        assert_eq!(value["unitDenominator"], 1000.0);
        assert_eq!(value["unitMeasurement"], "Tokens");
        assert!(value.get("customFields").is_none());
        assert!(value.get("recurrence").is_none());
    }

    #[test]
    fn reads_stored_record_and_ignores_irrelevant_fields() {
        let record = json!({
            "id": "abc123xyz",
            "name": "Hosting",
            "costType": "Fixed Recurring Cost",
            "quantity": 7,
            "pricePerUnit": 120,
            "recurrence": "Yearly"
        });

        let component: Component = serde_json::from_value(record).unwrap();
        assert_eq!(component.id.as_str(), "abc123xyz");
        assert_eq!(component.cost_type(), Some(CostType::FixedRecurring));
        assert_eq!(
            component.rule,
            CostRule::FixedRecurring {
                price_per_unit: 120.0,
                recurrence: Some(RecurrencePeriod::Yearly),
            }
        );

        let written = serde_json::to_value(&component).unwrap();
        assert!(written.get("quantity").is_none());
    }

    #[test]
    fn unknown_cost_type_is_kept_verbatim() {
        let record = json!({
            "id": "c9",
            "name": "Mystery",
            "costType": "Variable Cost",
            "quantity": 3,
            "pricePerUnit": 10,
            "tier": "gold"
        });

        let component: Component = serde_json::from_value(record.clone()).unwrap();
        assert_eq!(component.cost_type(), None);
        assert_eq!(component.rule.price_per_unit(), None);
        match &component.rule {
            CostRule::Unrecognized { cost_type, fields } => {
                assert_eq!(cost_type, "Variable Cost");
                assert_eq!(fields["quantity"], 3);
                assert!(fields.get("id").is_none());
            }
            other => panic!("expected unrecognized rule, got {:?}", other),
        }

        assert_eq!(serde_json::to_value(&component).unwrap(), record);
    }

    #[test]
    fn null_numbers_read_as_nan_and_fail_validation() {
        let record = json!({
            "id": "c2",
            "name": "Tokens",
            "costType": "Unit Based Cost",
            "quantity": null,
            "pricePerUnit": 0.5,
            "unitDenominator": null
        });

        let component: Component = serde_json::from_value(record).unwrap();
        match component.rule {
            CostRule::UnitBased {
                quantity,
                unit_denominator,
                ..
            } => {
                assert!(quantity.is_nan());
                assert_eq!(unit_denominator, None);
            }
            ref other => panic!("expected unit based rule, got {:?}", other),
        }
        assert_eq!(component.validate().unwrap_err().reason.field(), "quantity");

        let written = serde_json::to_value(&component).unwrap();
        assert!(written["quantity"].is_null());
    }

    #[test]
    fn missing_cost_type_is_an_error() {
        let record = json!({ "id": "c1", "name": "Untagged", "pricePerUnit": 5 });
        assert!(serde_json::from_value::<Component>(record).is_err());
    }

    #[test]
    fn wrongly_typed_number_is_an_error() {
        let record = json!({
            "id": "c1",
            "name": "Setup",
            "costType": "One Time Cost",
            "pricePerUnit": "lots"
        });
        assert!(serde_json::from_value::<Component>(record).is_err());
    }

    #[test]
    fn optional_fields_round_trip() {
        let component = Component::one_time("Setup", 500.0)
            .with_custom_fields(vec![CustomField::text("vendor", "Acme")]);
        let json = serde_json::to_string(&component).unwrap();
        let parsed: Component = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, component);
    }

    #[test]
    fn missing_recurrence_is_preserved_as_absent() {
        let record = json!({
            "id": "r1",
            "name": "Support plan",
            "costType": "Fixed Recurring Cost",
            "pricePerUnit": 40
        });
        let component: Component = serde_json::from_value(record).unwrap();
        assert_eq!(
            component.rule,
            CostRule::FixedRecurring {
                price_per_unit: 40.0,
                recurrence: None,
            }
        );
    }

    #[test]
    fn builders_ignore_fields_of_other_cost_types() {
        let component = Component::one_time("Setup", 500.0).with_denominator(1000.0);
        assert_eq!(component.rule, CostRule::OneTime { price_per_unit: 500.0 });
    }

    #[test]
    fn validate_rejects_non_finite_numbers() {
        let component = Component::unit_based("Tokens", f64::NAN, 10.0);
        let err = component.validate().unwrap_err();
        assert_eq!(err.name, "Tokens");
        assert_eq!(err.reason.field(), "pricePerUnit");
    }

    #[test]
    fn validate_rejects_blank_name() {
        let component = Component::one_time("  ", 5.0);
        let err = component.validate().unwrap_err();
        assert_eq!(err.reason, ValidationError::empty_field("name"));
    }

    #[test]
    fn validate_accepts_negative_prices() {
        let refund = Component::one_time("Credit", -50.0);
        assert!(refund.validate().is_ok());
    }

    #[test]
    fn fresh_id_keeps_everything_else() {
        let original = Component::fixed_recurring("Hosting", 20.0, RecurrencePeriod::Monthly);
        let copy = original.with_fresh_id();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.name, original.name);
        assert_eq!(copy.rule, original.rule);
    }
}
