//! Crop catalog models

use serde::{Deserialize, Serialize};

/// A crop with its varieties and phenological phases
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Crop {
    pub name: String,
    /// Base temperature (°C) for thermal-unit accumulation
    pub base_temperature: f64,
    /// Varieties in authoring order
    pub varieties: Vec<Variety>,
    /// Phases in authoring (phenological) order
    pub phases: Vec<Phase>,
}

impl Crop {
    pub fn variety(&self, name: &str) -> Option<&Variety> {
        self.varieties.iter().find(|v| v.name == name)
    }

    pub fn phase(&self, name: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.name == name)
    }
}

/// A commercial variety (cultivar or hybrid)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variety {
    pub name: String,
    /// Crop coefficient (kc) applied to reference evapotranspiration
    pub crop_coefficient: f64,
    /// Degree-days to physiological maturity
    pub thermal_unit_target: f64,
    pub description: String,
}

/// A growth phase with its management notes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Phase {
    pub name: String,
    pub description: String,
    pub physiology_note: String,
    pub management_note: String,
    /// `None` when no fragment supplied a protocol for this phase
    pub chemical_protocol: Option<Vec<ChemicalEntry>>,
}

impl Phase {
    /// Protocol entries, empty when absent
    pub fn protocol(&self) -> &[ChemicalEntry] {
        self.chemical_protocol.as_deref().unwrap_or(&[])
    }
}

/// One product recommendation inside a phase protocol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChemicalEntry {
    pub target: String,
    pub active_ingredient: String,
    /// FRAC/IRAC/HRAC code or chemical group
    pub resistance_group: Option<String>,
    pub action_type: ActionType,
    /// Product-type label exactly as authored (e.g. "Químico Sistêmico")
    pub type_label: String,
    pub strategy_note: Option<String>,
}

/// Mode of action of a product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Systemic,
    Contact,
    Physiological,
    Biological,
    Other,
}

impl ActionType {
    /// Categorize a free-text product-type label.
    ///
    /// Systemic is checked first so mixed labels such as "Sistêmico + Choque"
    /// keep the stricter uptake requirement.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| label.contains(n));

        if has(&["sistêm", "sistem", "systemic", "mesostêm", "mesostem"]) {
            ActionType::Systemic
        } else if has(&["contat", "contact", "choque", "protetor"]) {
            ActionType::Contact
        } else if has(&["fisiol", "physiolog", "regulador"]) {
            ActionType::Physiological
        } else if has(&["biológ", "biolog"]) {
            ActionType::Biological
        } else {
            ActionType::Other
        }
    }

    pub fn is_systemic(&self) -> bool {
        matches!(self, ActionType::Systemic)
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Systemic => write!(f, "Systemic"),
            ActionType::Contact => write!(f, "Contact"),
            ActionType::Physiological => write!(f, "Physiological"),
            ActionType::Biological => write!(f, "Biological"),
            ActionType::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for ActionType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ActionType::from_label(s))
    }
}

/// Crop summary for listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropSummary {
    pub name: String,
    pub base_temperature: f64,
    pub varieties: Vec<String>,
    pub phases: Vec<String>,
}

impl From<&Crop> for CropSummary {
    fn from(crop: &Crop) -> Self {
        Self {
            name: crop.name.clone(),
            base_temperature: crop.base_temperature,
            varieties: crop.varieties.iter().map(|v| v.name.clone()).collect(),
            phases: crop.phases.iter().map(|p| p.name.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_from_label() {
        assert_eq!(ActionType::from_label("Químico Sistêmico"), ActionType::Systemic);
        assert_eq!(ActionType::from_label("Sistêmico + Choque"), ActionType::Systemic);
        assert_eq!(ActionType::from_label("Sistêmico/Mesostêmico"), ActionType::Systemic);
        assert_eq!(ActionType::from_label("Systemic"), ActionType::Systemic);
        assert_eq!(ActionType::from_label("Ingestão/Contato"), ActionType::Contact);
        assert_eq!(ActionType::from_label("Protetor Obrigatório"), ActionType::Contact);
        assert_eq!(ActionType::from_label("Químico Choque"), ActionType::Contact);
        assert_eq!(
            ActionType::from_label("Fisiológico (Dose baixa sequencial)"),
            ActionType::Physiological
        );
        assert_eq!(ActionType::from_label("Biológico"), ActionType::Biological);
        assert_eq!(ActionType::from_label("Tratamento Sementes"), ActionType::Other);
        assert_eq!(ActionType::from_label(""), ActionType::Other);
    }

    #[test]
    fn test_phase_protocol_absent_is_empty() {
        let phase = Phase {
            name: "VE".to_string(),
            description: String::new(),
            physiology_note: String::new(),
            management_note: String::new(),
            chemical_protocol: None,
        };
        assert!(phase.protocol().is_empty());
    }
}
