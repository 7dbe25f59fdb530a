//! Stored JSON layout of a cost rule.
//!
//! The rule is flattened into the component object, so it travels as a raw
//! field map. Known tags are read field by field; anything else is kept as-is.
//! Numbers stored as `null` (or missing) read as NaN so that one damaged field
//! is flagged by validation instead of failing the whole record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{CostRule, CostType, RecurrencePeriod};

const COST_TYPE: &str = "costType";
const QUANTITY: &str = "quantity";
const PRICE_PER_UNIT: &str = "pricePerUnit";
const UNIT_DENOMINATOR: &str = "unitDenominator";
const UNIT_MEASUREMENT: &str = "unitMeasurement";
const RECURRENCE: &str = "recurrence";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub(super) struct RuleRecord(Map<String, Value>);

impl TryFrom<RuleRecord> for CostRule {
    type Error = String;

    fn try_from(RuleRecord(mut fields): RuleRecord) -> Result<Self, Self::Error> {
        let tag = match fields.remove(COST_TYPE) {
            Some(Value::String(tag)) => tag,
            Some(other) => return Err(format!("invalid `{}`: {}", COST_TYPE, other)),
            None => return Err(format!("missing field `{}`", COST_TYPE)),
        };

        let Some(cost_type) = CostType::from_label(&tag) else {
            return Ok(CostRule::Unrecognized {
                cost_type: tag,
                fields,
            });
        };

        let price_per_unit = number(&fields, PRICE_PER_UNIT)?;
        Ok(match cost_type {
            CostType::UnitBased => CostRule::UnitBased {
                quantity: number(&fields, QUANTITY)?,
                price_per_unit,
                unit_denominator: optional_number(&fields, UNIT_DENOMINATOR)?,
                unit_measurement: optional_text(&fields, UNIT_MEASUREMENT)?,
            },
            CostType::FixedRecurring => CostRule::FixedRecurring {
                price_per_unit,
                recurrence: match fields.get(RECURRENCE) {
                    None | Some(Value::Null) => None,
                    Some(value) => Some(
                        RecurrencePeriod::deserialize(value)
                            .map_err(|e| format!("invalid `{}`: {}", RECURRENCE, e))?,
                    ),
                },
            },
            CostType::OneTime => CostRule::OneTime { price_per_unit },
        })
    }
}

impl From<CostRule> for RuleRecord {
    fn from(rule: CostRule) -> Self {
        let mut fields = Map::new();
        let mut put = |key: &str, value: Value| {
            fields.insert(key.to_string(), value);
        };

        match rule {
            CostRule::UnitBased {
                quantity,
                price_per_unit,
                unit_denominator,
                unit_measurement,
            } => {
                put(COST_TYPE, CostType::UnitBased.label().into());
                put(QUANTITY, quantity.into());
                put(PRICE_PER_UNIT, price_per_unit.into());
                if let Some(denominator) = unit_denominator {
                    put(UNIT_DENOMINATOR, denominator.into());
                }
                if let Some(measurement) = unit_measurement {
                    put(UNIT_MEASUREMENT, measurement.into());
                }
            }
            CostRule::FixedRecurring {
                price_per_unit,
                recurrence,
            } => {
                put(COST_TYPE, CostType::FixedRecurring.label().into());
                put(PRICE_PER_UNIT, price_per_unit.into());
                if let Some(recurrence) = recurrence {
                    put(RECURRENCE, recurrence.to_string().into());
                }
            }
            CostRule::OneTime { price_per_unit } => {
                put(COST_TYPE, CostType::OneTime.label().into());
                put(PRICE_PER_UNIT, price_per_unit.into());
            }
            CostRule::Unrecognized {
                cost_type,
                fields: stored,
            } => {
                // Stored fields first so the tag always wins
                for (key, value) in stored {
                    put(&key, value);
                }
                put(COST_TYPE, cost_type.into());
            }
        }

        RuleRecord(fields)
    }
}

fn number(fields: &Map<String, Value>, key: &str) -> Result<f64, String> {
    Ok(optional_number(fields, key)?.unwrap_or(f64::NAN))
}

fn optional_number(fields: &Map<String, Value>, key: &str) -> Result<Option<f64>, String> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(format!("invalid `{}`: expected a number, got {}", key, other)),
    }
}

fn optional_text(fields: &Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(format!("invalid `{}`: expected a string, got {}", key, other)),
    }
}
