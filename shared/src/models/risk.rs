//! Spray-window risk classification
//!
//! Rules are ordered tables per axis. Within an axis the first matching rule
//! fires; the verdict status is the worst severity across axes, and alerts
//! keep firing order so the most safety-critical reason is listed first.

use serde::{Deserialize, Serialize};

use crate::models::ActionType;
use crate::physics;

/// Verdict severity, ordered from best to worst
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskStatus {
    Fit,
    Caution,
    Avoid,
    Stop,
}

impl RiskStatus {
    pub fn color(&self) -> StatusColor {
        match self {
            RiskStatus::Fit => StatusColor::Green,
            RiskStatus::Caution | RiskStatus::Avoid => StatusColor::Amber,
            RiskStatus::Stop => StatusColor::Red,
        }
    }

    /// Label used by the Portuguese field interface
    pub fn label_pt(&self) -> &'static str {
        match self {
            RiskStatus::Fit => "APTO",
            RiskStatus::Caution => "ATENÇÃO",
            RiskStatus::Avoid => "EVITAR",
            RiskStatus::Stop => "PARE",
        }
    }
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskStatus::Fit => write!(f, "FIT"),
            RiskStatus::Caution => write!(f, "CAUTION"),
            RiskStatus::Avoid => write!(f, "AVOID"),
            RiskStatus::Stop => write!(f, "STOP"),
        }
    }
}

/// Display color derived from a status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Green,
    Amber,
    Red,
}

impl StatusColor {
    pub fn hex(&self) -> &'static str {
        match self {
            StatusColor::Green => "#16a34a",
            StatusColor::Amber => "#ca8a04",
            StatusColor::Red => "#dc2626",
        }
    }
}

/// One reason behind a verdict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAlert {
    pub severity: RiskStatus,
    pub title: String,
    pub explanation: String,
    pub title_pt: String,
    pub explanation_pt: String,
}

/// Ranked spraying/management verdict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskVerdict {
    pub overall_status: RiskStatus,
    pub status_label_pt: String,
    pub status_color: StatusColor,
    pub status_hex: String,
    pub alerts: Vec<RiskAlert>,
}

/// Inputs to the classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SprayConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub wet_bulb_depression: f64,
    pub product_type: ActionType,
}

/// Static text of a rule
#[derive(Debug, Clone, Copy)]
pub struct RuleMessage {
    pub title: &'static str,
    pub explanation: &'static str,
    pub title_pt: &'static str,
    pub explanation_pt: &'static str,
}

/// A single classifier rule
#[derive(Debug, Clone, Copy)]
pub struct RiskRule {
    pub id: &'static str,
    pub applies: fn(&SprayConditions) -> bool,
    pub severity: RiskStatus,
    pub message: RuleMessage,
}

impl RiskRule {
    fn alert(&self) -> RiskAlert {
        RiskAlert {
            severity: self.severity,
            title: self.message.title.to_string(),
            explanation: self.message.explanation.to_string(),
            title_pt: self.message.title_pt.to_string(),
            explanation_pt: self.message.explanation_pt.to_string(),
        }
    }
}

/// Evaporation/drift axis, independent of the product
pub const DEPOSITION_RULES: &[RiskRule] = &[
    RiskRule {
        id: "delta_t_inversion",
        applies: |c| c.wet_bulb_depression < 2.0,
        severity: RiskStatus::Stop,
        message: RuleMessage {
            title: "Drift / inversion risk",
            explanation: "Droplets too fine to settle or evaporate too slowly.",
            title_pt: "Risco de Deriva/Inversão",
            explanation_pt: "Gotas muito finas podem não decantar ou evaporar muito lentamente.",
        },
    },
    RiskRule {
        id: "delta_t_critical_evaporation",
        applies: |c| c.wet_bulb_depression > 10.0,
        severity: RiskStatus::Stop,
        message: RuleMessage {
            title: "Critical evaporation",
            explanation: "Droplet lost before reaching the target. Application prohibited.",
            title_pt: "Evaporação Crítica",
            explanation_pt: "Perda imediata da gota. Aplicação proibida.",
        },
    },
    RiskRule {
        id: "delta_t_high_evaporation",
        applies: |c| c.wet_bulb_depression > 8.0,
        severity: RiskStatus::Caution,
        message: RuleMessage {
            title: "High evaporation",
            explanation: "Drift-reducing oil or adjuvant required.",
            title_pt: "Alta Evaporação",
            explanation_pt: "Obrigatório uso de óleo/adjuvante redutor de deriva.",
        },
    },
];

/// VPD above which stomata start closing (kPa)
pub const STOMATAL_CLOSURE_VPD: f64 = 2.0;

/// Air temperature above which stomata start closing (°C)
pub const STOMATAL_CLOSURE_TEMPERATURE: f64 = 32.0;

/// Uptake axis, evaluated only for systemic products
pub const PHYSIOLOGY_RULES: &[RiskRule] = &[RiskRule {
    id: "stomatal_closure",
    applies: |c| {
        physics::vapor_pressure_deficit(c.temperature, c.humidity) > STOMATAL_CLOSURE_VPD
            || c.temperature > STOMATAL_CLOSURE_TEMPERATURE
    },
    severity: RiskStatus::Avoid,
    message: RuleMessage {
        title: "Physiological stress",
        explanation: "Plant closing stomata. Systemic product will not be absorbed.",
        title_pt: "Estresse Fisiológico",
        explanation_pt: "Planta fechando estômatos. Produto sistêmico não será absorvido.",
    },
}];

/// A group of rules evaluated first-match-wins
pub struct RuleAxis {
    pub name: &'static str,
    pub enabled: fn(&SprayConditions) -> bool,
    pub rules: &'static [RiskRule],
}

impl RuleAxis {
    pub fn evaluate(&self, conditions: &SprayConditions) -> Option<&'static RiskRule> {
        if !(self.enabled)(conditions) {
            return None;
        }
        self.rules.iter().find(|rule| (rule.applies)(conditions))
    }
}

/// Axes in evaluation order
pub const RULE_AXES: &[RuleAxis] = &[
    RuleAxis {
        name: "deposition",
        enabled: |_| true,
        rules: DEPOSITION_RULES,
    },
    RuleAxis {
        name: "physiology",
        enabled: |c| c.product_type.is_systemic(),
        rules: PHYSIOLOGY_RULES,
    },
];

/// Classify a spray window
pub fn classify(
    temperature: f64,
    humidity: f64,
    wet_bulb_depression: f64,
    product_type: ActionType,
) -> RiskVerdict {
    classify_conditions(&SprayConditions {
        temperature,
        humidity,
        wet_bulb_depression,
        product_type,
    })
}

pub fn classify_conditions(conditions: &SprayConditions) -> RiskVerdict {
    let fired: Vec<&RiskRule> = RULE_AXES
        .iter()
        .filter_map(|axis| axis.evaluate(conditions))
        .collect();

    let overall_status = fired
        .iter()
        .map(|rule| rule.severity)
        .max()
        .unwrap_or(RiskStatus::Fit);

    let status_color = overall_status.color();
    RiskVerdict {
        overall_status,
        status_label_pt: overall_status.label_pt().to_string(),
        status_color,
        status_hex: status_color.hex().to_string(),
        alerts: fired.iter().map(|rule| rule.alert()).collect(),
    }
}
