// Fleet data model and JSON ingestion.
//
// A fleet is a plain ordered Vec<ShipRecord> owned by the application state.
// Loading a new fleet replaces the whole Vec atomically: parse_fleet either
// returns a complete new fleet or an error, never a partial one, so a failed
// load leaves the current fleet untouched.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// One spacecraft as found in the input JSON.
///
/// Only the top-level shape of the input (an array) is validated at load
/// time. Individual records are converted leniently: missing or non-numeric
/// fields become `None` / empty strings and are handled downstream (the
/// layout floor rules in `layout.rs`, placeholders in the list panel).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShipRecord {
    #[serde(default)]
    pub ship_name: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default, rename = "type")]
    pub ship_type: String,
    /// Hull length in metres.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub length: Option<f64>,
    /// Hull width in metres.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub beam: Option<f64>,
    /// Hull height in metres.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub height: Option<f64>,
    /// Cargo capacity in cubic metres.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cargo: Option<f64>,
    /// Purchase price in aUEC.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: Option<f64>,
}

/// Accept any JSON value; anything that isn't a number deserializes to None
/// instead of failing the whole record.
fn lenient_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(de)?;
    Ok(value.as_f64())
}

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("fleet JSON must be an array of ship objects")]
    Format,
    #[error("failed to parse fleet JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse JSON text into a new fleet.
///
/// The top-level value must be an array. Elements that fail to convert to a
/// ShipRecord (wrong types, not an object) degrade to a default record rather
/// than rejecting the load.
pub fn parse_fleet(text: &str) -> Result<Vec<ShipRecord>, FleetError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Array(items) = value else {
        return Err(FleetError::Format);
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// Sum of the `value` field across the fleet, missing values counting as 0.
pub fn total_value(fleet: &[ShipRecord]) -> f64 {
    fleet.iter().map(|s| s.value.unwrap_or(0.0)).sum()
}

/// Fleet installed at startup so the scene is never empty on launch.
pub fn sample_fleet() -> Vec<ShipRecord> {
    vec![
        ShipRecord {
            ship_name: "Carrack".into(),
            manufacturer: "Anvil Aerospace".into(),
            ship_type: "Explorer".into(),
            length: Some(126.0),
            beam: Some(76.0),
            height: Some(30.0),
            cargo: Some(456.0),
            value: Some(60_000_000.0),
        },
        ShipRecord {
            ship_name: "Cutlass Black".into(),
            manufacturer: "Drake Interplanetary".into(),
            ship_type: "Medium Fighter".into(),
            length: Some(36.0),
            beam: Some(26.0),
            height: Some(10.0),
            cargo: Some(46.0),
            value: Some(2_500_000.0),
        },
        ShipRecord {
            ship_name: "Aurora MR".into(),
            manufacturer: "Roberts Space Industries".into(),
            ship_type: "Starter".into(),
            length: Some(20.0),
            beam: Some(14.0),
            height: Some(6.0),
            cargo: Some(6.0),
            value: Some(45_000.0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fleet_accepts_array() {
        let fleet =
            parse_fleet(r#"[{"ship_name":"A","length":10,"beam":10,"height":10}]"#).unwrap();
        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet[0].ship_name, "A");
        assert_eq!(fleet[0].length, Some(10.0));
        assert_eq!(fleet[0].cargo, None);
    }

    #[test]
    fn test_parse_fleet_rejects_non_array() {
        match parse_fleet(r#"{"not":"an array"}"#) {
            Err(FleetError::Format) => {}
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_fleet_rejects_malformed_json() {
        assert!(matches!(parse_fleet("[{"), Err(FleetError::Parse(_))));
    }

    #[test]
    fn test_malformed_records_degrade_to_defaults() {
        // Non-numeric length and a non-object element both survive the load.
        let fleet = parse_fleet(r#"[{"ship_name":"B","length":"huge"}, 42]"#).unwrap();
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet[0].ship_name, "B");
        assert_eq!(fleet[0].length, None);
        assert_eq!(fleet[1].ship_name, "");
    }

    #[test]
    fn test_total_value_treats_missing_as_zero() {
        let fleet =
            parse_fleet(r#"[{"value":100},{"value":200},{}]"#).unwrap();
        assert_eq!(fleet.len(), 3);
        assert_eq!(total_value(&fleet), 300.0);
    }

    #[test]
    fn test_sample_fleet_shape() {
        let fleet = sample_fleet();
        assert_eq!(fleet.len(), 3);
        assert_eq!(total_value(&fleet), 62_545_000.0);
    }
}
