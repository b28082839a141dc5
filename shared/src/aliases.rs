//! Prioritized field-name aliases for loosely authored fragments
//!
//! Fragment authors use different names for the same field ("Alvo", "Praga",
//! "Doenca"). Each field has an ordered alias list; the first alias present
//! with a non-empty value wins, otherwise the caller applies a fallback.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current alias table version
pub const ALIASES_VERSION: &str = "1";

/// Alias lists for every catalog field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldAliases {
    pub version: String,
    pub base_temperature: Vec<String>,
    pub varieties: Vec<String>,
    pub phases: Vec<String>,
    pub crop_coefficient: Vec<String>,
    pub thermal_unit_target: Vec<String>,
    pub variety_description: Vec<String>,
    pub phase_description: Vec<String>,
    pub physiology_note: Vec<String>,
    pub management_note: Vec<String>,
    pub chemical_protocol: Vec<String>,
    pub target: Vec<String>,
    pub active_ingredient: Vec<String>,
    pub strategy_note: Vec<String>,
    pub resistance_group: Vec<String>,
    pub action_type: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            version: ALIASES_VERSION.to_string(),
            base_temperature: names(&["t_base", "base_temperature", "tbase"]),
            varieties: names(&["vars", "variedades", "varieties"]),
            phases: names(&["fases", "phases", "estadios"]),
            crop_coefficient: names(&["kc", "crop_coefficient"]),
            thermal_unit_target: names(&["gda_meta", "gda", "thermal_target"]),
            variety_description: names(&["info", "descricao", "description"]),
            phase_description: names(&["desc", "descricao", "description"]),
            physiology_note: names(&["fisiologia", "physiology"]),
            management_note: names(&["manejo", "management"]),
            chemical_protocol: names(&["quimica", "protocolo", "chemicals"]),
            target: names(&["Alvo", "Doenca", "Praga", "target"]),
            active_ingredient: names(&["Ativo", "Ingrediente", "Produto", "active"]),
            strategy_note: names(&["Estrategia", "Obs", "Manejo", "Nota", "strategy"]),
            resistance_group: names(&["Grupo", "Codigos", "Mecanismo", "group"]),
            action_type: names(&["Tipo", "type"]),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// First non-blank value among the aliases, matched case-insensitively
pub fn resolve<'a>(record: &'a Map<String, Value>, aliases: &[String]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| {
        record
            .iter()
            .find(|(key, value)| key.eq_ignore_ascii_case(alias) && !is_blank(value))
            .map(|(_, value)| value)
    })
}

/// Text value; numbers are rendered as text
pub fn resolve_text(record: &Map<String, Value>, aliases: &[String]) -> Option<String> {
    match resolve(record, aliases)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text value or a documented fallback label
pub fn resolve_text_or(record: &Map<String, Value>, aliases: &[String], fallback: &str) -> String {
    resolve_text(record, aliases).unwrap_or_else(|| fallback.to_string())
}

/// Finite number; numeric strings with a decimal comma are accepted
pub fn resolve_number(record: &Map<String, Value>, aliases: &[String]) -> Option<f64> {
    let number = match resolve(record, aliases)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

pub fn resolve_map<'a>(
    record: &'a Map<String, Value>,
    aliases: &[String],
) -> Option<&'a Map<String, Value>> {
    resolve(record, aliases)?.as_object()
}

pub fn resolve_list<'a>(record: &'a Map<String, Value>, aliases: &[String]) -> Option<&'a Vec<Value>> {
    resolve(record, aliases)?.as_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_first_alias_wins() {
        let aliases = FieldAliases::default();
        let entry = record(json!({"Praga": "Percevejo", "Alvo": "Ferrugem"}));
        assert_eq!(resolve_text(&entry, &aliases.target).as_deref(), Some("Ferrugem"));
    }

    #[test]
    fn test_case_insensitive() {
        let aliases = FieldAliases::default();
        let entry = record(json!({"alvo": "Ferrugem", "ATIVO": "Mancozebe"}));
        assert_eq!(resolve_text(&entry, &aliases.target).as_deref(), Some("Ferrugem"));
        assert_eq!(
            resolve_text(&entry, &aliases.active_ingredient).as_deref(),
            Some("Mancozebe")
        );
    }

    #[test]
    fn test_blank_values_fall_through() {
        let aliases = FieldAliases::default();
        let entry = record(json!({"Grupo": "  ", "Codigos": "FRAC 3 + 11"}));
        assert_eq!(
            resolve_text(&entry, &aliases.resistance_group).as_deref(),
            Some("FRAC 3 + 11")
        );
    }

    #[test]
    fn test_fallback_label() {
        let aliases = FieldAliases::default();
        let entry = record(json!({"Estrategia": null}));
        assert_eq!(
            resolve_text_or(&entry, &aliases.strategy_note, "Follow the label."),
            "Follow the label."
        );
    }

    #[test]
    fn test_numbers() {
        let aliases = FieldAliases::default();
        assert_eq!(resolve_number(&record(json!({"kc": 1.15})), &aliases.crop_coefficient), Some(1.15));
        assert_eq!(resolve_number(&record(json!({"kc": "1,2"})), &aliases.crop_coefficient), Some(1.2));
        assert_eq!(resolve_number(&record(json!({"kc": "alto"})), &aliases.crop_coefficient), None);
        assert_eq!(resolve_number(&record(json!({"t_base": 10})), &aliases.base_temperature), Some(10.0));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let aliases: FieldAliases =
            serde_json::from_value(json!({"version": "2", "target": ["Target"]})).unwrap();
        assert_eq!(aliases.version, "2");
        assert_eq!(aliases.target, vec!["Target".to_string()]);
        assert_eq!(aliases.phases, FieldAliases::default().phases);
    }
}
