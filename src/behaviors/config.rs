//! Behavior configuration schema and merging.
//!
//! Every behavior kind declares an ordered list of [`ConfigField`]s. The
//! editor builds its controls from that list and the runtime computes its
//! defaults from the same list, so the two can never disagree.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Behavior config as stored in level files.
pub type ConfigMap = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Number,
    Boolean,
    String,
    /// Name of a keyboard key, e.g. `"ArrowLeft"` or `" "`.
    Key,
    /// Reference to an uploaded asset. `null` when unset.
    Asset,
    /// Nested structure edited with the sprite editor widget.
    SpriteEditor,
}

impl FieldType {
    /// Whether `value` has the JSON shape this field expects.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::String | FieldType::Key => value.is_string(),
            FieldType::Asset => value.is_string() || value.is_null(),
            FieldType::SpriteEditor => value.is_object(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub default: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl ConfigField {
    fn plain(key: &str, label: &str, field_type: FieldType, default: Value) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field_type,
            default,
            min: None,
            max: None,
            step: None,
        }
    }

    pub fn number(key: &str, label: &str, default: f64, min: f64, max: f64, step: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step: Some(step),
            ..Self::plain(key, label, FieldType::Number, Value::from(default))
        }
    }

    /// A whole-number field. The default is stored as a JSON integer.
    pub fn integer(key: &str, label: &str, default: u32, min: f64, max: f64, step: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step: Some(step),
            ..Self::plain(key, label, FieldType::Number, Value::from(default))
        }
    }

    pub fn boolean(key: &str, label: &str, default: bool) -> Self {
        Self::plain(key, label, FieldType::Boolean, Value::Bool(default))
    }

    pub fn string(key: &str, label: &str, default: &str) -> Self {
        Self::plain(key, label, FieldType::String, Value::from(default))
    }

    pub fn key(key: &str, label: &str, default: &str) -> Self {
        Self::plain(key, label, FieldType::Key, Value::from(default))
    }

    pub fn asset(key: &str, label: &str) -> Self {
        Self::plain(key, label, FieldType::Asset, Value::Null)
    }

    pub fn sprite_editor(key: &str, label: &str, default: Value) -> Self {
        Self::plain(key, label, FieldType::SpriteEditor, default)
    }
}

/// Schema defaults as a config map.
pub fn default_config(schema: &[ConfigField]) -> ConfigMap {
    schema
        .iter()
        .map(|field| (field.key.clone(), field.default.clone()))
        .collect()
}

/// Overlay `overrides` on the schema defaults.
///
/// An override whose JSON type does not match its schema field is dropped
/// with a warning and the default stays. Keys the schema does not know are
/// kept so that configs written by newer editors survive a round trip.
pub fn merge_config(kind: &str, schema: &[ConfigField], overrides: &ConfigMap) -> ConfigMap {
    let mut merged = default_config(schema);
    for (key, value) in overrides {
        match schema.iter().find(|field| &field.key == key) {
            Some(field) if !field.field_type.accepts(value) => {
                warn!(
                    "{}: config '{}' expects {:?}, got {}; using default",
                    kind, key, field.field_type, value
                );
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

/// Whole floats such as `32.0` become JSON integers so integer fields accept
/// what number inputs write.
fn integral_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
                if f < 0.0 {
                    Value::from(f as i64)
                } else {
                    Value::from(f as u64)
                }
            }
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(integral_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, integral_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Read a merged config into its typed form.
///
/// `T` must fill missing fields from its `Default` (`#[serde(default)]`).
/// A field whose value does not fit is dropped with a warning and takes its
/// default; the other fields are kept.
pub fn typed_config<T>(kind: &str, config: &ConfigMap) -> T
where
    T: DeserializeOwned + Default,
{
    let config: ConfigMap = config
        .iter()
        .map(|(key, value)| (key.clone(), integral_numbers(value.clone())))
        .collect();
    let e = match serde_json::from_value(Value::Object(config.clone())) {
        Ok(typed) => return typed,
        Err(e) => e,
    };
    let fitting: ConfigMap = config
        .into_iter()
        .filter(|(key, value)| {
            let mut single = ConfigMap::new();
            single.insert(key.clone(), value.clone());
            let fits = serde_json::from_value::<T>(Value::Object(single)).is_ok();
            if !fits {
                warn!("{}: invalid config '{}' ({}); using its default", kind, key, e);
            }
            fits
        })
        .collect();
    match serde_json::from_value(Value::Object(fitting)) {
        Ok(typed) => typed,
        Err(e) => {
            warn!("{}: invalid config ({}); using defaults", kind, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Vec<ConfigField> {
        vec![
            ConfigField::number("speed", "Speed", 200.0, 50.0, 800.0, 10.0),
            ConfigField::key("leftKey", "Left Key", "ArrowLeft"),
            ConfigField::boolean("snap", "Snap", false),
            ConfigField::asset("sheet", "Sheet"),
        ]
    }

    fn map(value: Value) -> ConfigMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_default_config_from_schema() {
        let defaults = default_config(&schema());
        assert_eq!(defaults["speed"], json!(200.0));
        assert_eq!(defaults["leftKey"], "ArrowLeft");
        assert_eq!(defaults["snap"], false);
        assert!(defaults["sheet"].is_null());
    }

    #[test]
    fn test_merge_overrides_and_keeps_unknown_keys() {
        let merged = merge_config(
            "test",
            &schema(),
            &map(json!({ "speed": 300, "sheet": "a1", "extra": [1, 2] })),
        );
        assert_eq!(merged["speed"], 300);
        assert_eq!(merged["sheet"], "a1");
        assert_eq!(merged["extra"], json!([1, 2]));
        assert_eq!(merged["leftKey"], "ArrowLeft");
    }

    #[test]
    fn test_merge_rejects_mismatched_types() {
        let merged = merge_config(
            "test",
            &schema(),
            &map(json!({ "speed": "fast", "snap": 1 })),
        );
        assert_eq!(merged["speed"], json!(200.0));
        assert_eq!(merged["snap"], false);
    }

    #[test]
    fn test_schema_serializes_type_key() {
        let field = serde_json::to_value(ConfigField::boolean("xOnly", "X Only", true)).unwrap();
        assert_eq!(field["type"], "boolean");
        assert!(field.get("min").is_none());
        let sprite = serde_json::to_value(ConfigField::sprite_editor("defs", "Defs", json!({}))).unwrap();
        assert_eq!(sprite["type"], "spriteEditor");
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase", default)]
    struct Speedy {
        speed: f32,
        tile: u32,
        name: String,
    }

    #[test]
    fn test_typed_config_falls_back_per_field() {
        let ok: Speedy = typed_config("test", &map(json!({ "speed": 12, "tile": 16 })));
        assert_eq!(ok.speed, 12.0);
        assert_eq!(ok.tile, 16);
        let bad: Speedy = typed_config(
            "test",
            &map(json!({ "speed": "x", "tile": 8, "name": "crate" })),
        );
        assert_eq!(
            bad,
            Speedy {
                speed: 0.0,
                tile: 8,
                name: "crate".to_string()
            }
        );
    }

    #[test]
    fn test_whole_floats_fill_integer_fields() {
        let typed: Speedy = typed_config("test", &map(json!({ "speed": 2.5, "tile": 32.0 })));
        assert_eq!(typed.speed, 2.5);
        assert_eq!(typed.tile, 32);
        let negative: Speedy = typed_config("test", &map(json!({ "tile": -4.0, "name": "n" })));
        assert_eq!(negative.tile, 0);
        assert_eq!(negative.name, "n");
    }

    #[test]
    fn test_integer_field_default_is_integral() {
        let defaults = default_config(&[ConfigField::integer("frameWidth", "W", 32, 4.0, 512.0, 1.0)]);
        assert_eq!(defaults["frameWidth"], json!(32));
        assert!(defaults["frameWidth"].is_u64());
    }
}
