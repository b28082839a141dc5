//! Crop catalog built from independently authored knowledge-base fragments
//!
//! Each fragment is a JSON object keyed by crop name. Fragments are folded
//! into one tree with [`deep_merge`]: nested objects are unioned, while
//! scalars and lists are replaced by whichever fragment is merged last. Two
//! fragments that set the same scalar leaf therefore have an order-dependent
//! winner.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::aliases::{self, FieldAliases};
use crate::models::{ActionType, ChemicalEntry, Crop, CropSummary, Phase, Variety};
use crate::validation;

pub const NO_DESCRIPTION: &str = "No description available.";
pub const NO_PHYSIOLOGY_NOTE: &str = "No physiology note available.";
pub const NO_MANAGEMENT_NOTE: &str = "No management note available.";
pub const UNKNOWN_TARGET: &str = "Biological target";
pub const UNKNOWN_ACTIVE_INGREDIENT: &str = "Active ingredient not informed";
pub const GENERAL_TYPE_LABEL: &str = "General";
pub const NO_PROTOCOL: &str = "No product registered for this phase in the knowledge base.";
pub const DEFAULT_CROP_COEFFICIENT: f64 = 1.0;

/// Merge `incoming` into `target`.
///
/// Objects present on both sides are merged recursively; any other incoming
/// value replaces what was there.
pub fn deep_merge(target: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => deep_merge(existing, nested),
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// Why a fragment was skipped
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FragmentError {
    #[error("fragment could not be read: {0}")]
    Unreadable(String),

    #[error("fragment is empty")]
    Empty,

    #[error("fragment is not valid JSON: {0}")]
    Malformed(String),

    #[error("fragment root must be an object keyed by crop name")]
    NotAnObject,
}

/// Why a merged crop was left out of the typed catalog
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("crop entry is not an object")]
    NotAnObject,

    #[error("base temperature is missing or invalid")]
    InvalidBaseTemperature,

    #[error("crop has no varieties")]
    NoVarieties,

    #[error("crop has no phases")]
    NoPhases,

    #[error("{0}")]
    Invalid(&'static str),
}

/// Outcome of one fragment
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FragmentOutcome {
    pub source: String,
    pub merged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Crop keys contributed by the fragment
    pub crops: Vec<String>,
}

/// Crop left out of the typed catalog
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RejectedCrop {
    pub name: String,
    pub reason: String,
}

/// Diagnostics of one knowledge-base load
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MergeReport {
    pub fragments: Vec<FragmentOutcome>,
    pub rejected_crops: Vec<RejectedCrop>,
}

impl MergeReport {
    pub fn merged_count(&self) -> usize {
        self.fragments.iter().filter(|f| f.merged).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.fragments.len() - self.merged_count()
    }
}

/// Accumulates fragments into one merged tree
#[derive(Debug, Default)]
pub struct KnowledgeBaseMerger {
    merged: Map<String, Value>,
    report: MergeReport,
}

impl KnowledgeBaseMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and merge a fragment's text. A rejected fragment leaves the
    /// merged tree untouched.
    pub fn ingest(&mut self, source: &str, text: &str) -> Result<(), FragmentError> {
        let result = parse_fragment(text).map(|fragment| {
            let crops: Vec<String> = fragment.keys().cloned().collect();
            deep_merge(&mut self.merged, fragment);
            crops
        });
        self.record(source, result)
    }

    /// Merge an already parsed fragment
    pub fn ingest_value(&mut self, source: &str, value: Value) -> Result<(), FragmentError> {
        let result = fragment_object(value).map(|fragment| {
            let crops: Vec<String> = fragment.keys().cloned().collect();
            deep_merge(&mut self.merged, fragment);
            crops
        });
        self.record(source, result)
    }

    /// Record a fragment that failed before it could be parsed (e.g. I/O)
    pub fn skip(&mut self, source: &str, error: FragmentError) {
        let _ = self.record(source, Err(error));
    }

    fn record(
        &mut self,
        source: &str,
        result: Result<Vec<String>, FragmentError>,
    ) -> Result<(), FragmentError> {
        match result {
            Ok(crops) => {
                self.report.fragments.push(FragmentOutcome {
                    source: source.to_string(),
                    merged: true,
                    error: None,
                    crops,
                });
                Ok(())
            }
            Err(error) => {
                self.report.fragments.push(FragmentOutcome {
                    source: source.to_string(),
                    merged: false,
                    error: Some(error.to_string()),
                    crops: Vec::new(),
                });
                Err(error)
            }
        }
    }

    /// Convert the merged tree into a typed catalog
    pub fn finish(self, aliases: &FieldAliases) -> (Catalog, MergeReport) {
        let mut report = self.report;
        let mut crops = Vec::new();

        for (name, entry) in &self.merged {
            match crop_from_value(name, entry, aliases) {
                Ok(crop) => crops.push(crop),
                Err(error) => report.rejected_crops.push(RejectedCrop {
                    name: name.clone(),
                    reason: error.to_string(),
                }),
            }
        }

        let catalog = Catalog {
            crops,
            raw: Value::Object(self.merged),
            aliases_version: aliases.version.clone(),
        };
        (catalog, report)
    }
}

fn parse_fragment(text: &str) -> Result<Map<String, Value>, FragmentError> {
    if text.trim().is_empty() {
        return Err(FragmentError::Empty);
    }
    let value: Value =
        serde_json::from_str(text).map_err(|e| FragmentError::Malformed(e.to_string()))?;
    fragment_object(value)
}

fn fragment_object(value: Value) -> Result<Map<String, Value>, FragmentError> {
    match value {
        Value::Object(map) if map.is_empty() => Err(FragmentError::Empty),
        Value::Object(map) => Ok(map),
        Value::Null => Err(FragmentError::Empty),
        _ => Err(FragmentError::NotAnObject),
    }
}

/// Typed crop from a merged entry
pub fn crop_from_value(name: &str, entry: &Value, aliases: &FieldAliases) -> Result<Crop, CatalogError> {
    let record = entry.as_object().ok_or(CatalogError::NotAnObject)?;

    let base_temperature = aliases::resolve_number(record, &aliases.base_temperature)
        .filter(|t| *t >= 0.0)
        .ok_or(CatalogError::InvalidBaseTemperature)?;

    let varieties: Vec<Variety> = aliases::resolve_map(record, &aliases.varieties)
        .map(|map| {
            map.iter()
                .filter_map(|(name, v)| v.as_object().map(|v| variety_from_map(name, v, aliases)))
                .collect()
        })
        .unwrap_or_default();
    if varieties.is_empty() {
        return Err(CatalogError::NoVarieties);
    }

    let phases: Vec<Phase> = aliases::resolve_map(record, &aliases.phases)
        .map(|map| {
            map.iter()
                .filter_map(|(name, p)| p.as_object().map(|p| phase_from_map(name, p, aliases)))
                .collect()
        })
        .unwrap_or_default();
    if phases.is_empty() {
        return Err(CatalogError::NoPhases);
    }

    let crop = Crop {
        name: name.to_string(),
        base_temperature,
        varieties,
        phases,
    };
    validation::validate_crop(&crop).map_err(CatalogError::Invalid)?;
    Ok(crop)
}

fn variety_from_map(name: &str, record: &Map<String, Value>, aliases: &FieldAliases) -> Variety {
    Variety {
        name: name.to_string(),
        crop_coefficient: aliases::resolve_number(record, &aliases.crop_coefficient)
            .filter(|kc| *kc > 0.0)
            .unwrap_or(DEFAULT_CROP_COEFFICIENT),
        thermal_unit_target: aliases::resolve_number(record, &aliases.thermal_unit_target)
            .filter(|gda| *gda >= 0.0)
            .unwrap_or(0.0),
        description: aliases::resolve_text_or(record, &aliases.variety_description, NO_DESCRIPTION),
    }
}

fn phase_from_map(name: &str, record: &Map<String, Value>, aliases: &FieldAliases) -> Phase {
    let chemical_protocol = aliases::resolve_list(record, &aliases.chemical_protocol).map(|items| {
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|entry| chemical_from_map(entry, aliases))
            .collect()
    });

    Phase {
        name: name.to_string(),
        description: aliases::resolve_text_or(record, &aliases.phase_description, NO_DESCRIPTION),
        physiology_note: aliases::resolve_text_or(
            record,
            &aliases.physiology_note,
            NO_PHYSIOLOGY_NOTE,
        ),
        management_note: aliases::resolve_text_or(
            record,
            &aliases.management_note,
            NO_MANAGEMENT_NOTE,
        ),
        chemical_protocol,
    }
}

fn chemical_from_map(record: &Map<String, Value>, aliases: &FieldAliases) -> ChemicalEntry {
    let type_label = aliases::resolve_text_or(record, &aliases.action_type, GENERAL_TYPE_LABEL);
    ChemicalEntry {
        target: aliases::resolve_text_or(record, &aliases.target, UNKNOWN_TARGET),
        active_ingredient: aliases::resolve_text_or(
            record,
            &aliases.active_ingredient,
            UNKNOWN_ACTIVE_INGREDIENT,
        ),
        resistance_group: aliases::resolve_text(record, &aliases.resistance_group),
        action_type: ActionType::from_label(&type_label),
        type_label,
        strategy_note: aliases::resolve_text(record, &aliases.strategy_note),
    }
}

/// Immutable crop catalog shared by every consumer
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    crops: Vec<Crop>,
    /// Merged tree as authored, including crops that failed validation
    raw: Value,
    aliases_version: String,
}

impl Catalog {
    /// Merge already parsed fragments in order
    pub fn from_fragments<I>(fragments: I, aliases: &FieldAliases) -> (Catalog, MergeReport)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut merger = KnowledgeBaseMerger::new();
        for (source, value) in fragments {
            let _ = merger.ingest_value(&source, value);
        }
        merger.finish(aliases)
    }

    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }

    pub fn crop(&self, name: &str) -> Option<&Crop> {
        self.crops.iter().find(|c| c.name == name)
    }

    pub fn summaries(&self) -> Vec<CropSummary> {
        self.crops.iter().map(CropSummary::from).collect()
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn aliases_version(&self) -> &str {
        &self.aliases_version
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn soy_biology() -> Value {
        json!({
            "Soja (Glycine max)": {
                "t_base": 10,
                "vars": {
                    "Brasmax": {"kc": 1.15, "gda_meta": 1350, "info": "Alto teto produtivo."}
                },
                "fases": {
                    "V3 - Terceiro Trifólio": {
                        "desc": "Três nós abertos.",
                        "fisiologia": "Definição de nós produtivos.",
                        "manejo": "Monitoramento de lagartas."
                    },
                    "R1 - Início Floração": {
                        "desc": "Início do florescimento.",
                        "fisiologia": "Mudança hormonal. Alta demanda de Boro.",
                        "manejo": "Entrada obrigatória de fungicidas."
                    }
                }
            }
        })
    }

    fn soy_protocols() -> Value {
        json!({
            "Soja (Glycine max)": {
                "fases": {
                    "R1 - Início Floração": {
                        "quimica": [
                            {
                                "Alvo": "Ferrugem Asiática",
                                "Ativo": "Protioconazol + Trifloxistrobina",
                                "Codigos": "FRAC 3 + 11",
                                "Tipo": "Químico Sistêmico",
                                "Estrategia": "Base do programa preventivo."
                            },
                            {
                                "Ativo": "Mancozebe",
                                "Tipo": "Químico Protetor"
                            }
                        ]
                    }
                }
            }
        })
    }

    #[test]
    fn test_deep_merge_unions_nested_maps() {
        let mut target = obj(soy_biology());
        deep_merge(&mut target, obj(soy_protocols()));

        let phase = &target["Soja (Glycine max)"]["fases"]["R1 - Início Floração"];
        assert_eq!(phase["desc"], "Início do florescimento.");
        assert_eq!(phase["quimica"].as_array().unwrap().len(), 2);
        assert_eq!(target["Soja (Glycine max)"]["t_base"], 10);
    }

    #[test]
    fn test_deep_merge_replaces_scalars_and_lists() {
        let mut target = obj(json!({"a": {"kc": 1.1, "list": [1, 2, 3]}}));
        deep_merge(&mut target, obj(json!({"a": {"kc": 1.2, "list": [9]}})));
        assert_eq!(target["a"]["kc"], 1.2);
        assert_eq!(target["a"]["list"], json!([9]));
    }

    #[test]
    fn test_deep_merge_object_over_scalar_replaces() {
        let mut target = obj(json!({"a": 1}));
        deep_merge(&mut target, obj(json!({"a": {"b": 2}})));
        assert_eq!(target["a"], json!({"b": 2}));

        deep_merge(&mut target, obj(json!({"a": "flat"})));
        assert_eq!(target["a"], "flat");
    }

    #[test]
    fn test_biology_and_protocol_fragments_both_survive() {
        let mut merger = KnowledgeBaseMerger::new();
        merger.ingest("biologia.json", &soy_biology().to_string()).unwrap();
        merger.ingest("manejo_avancado.json", &soy_protocols().to_string()).unwrap();
        let (catalog, report) = merger.finish(&FieldAliases::default());

        assert_eq!(report.merged_count(), 2);
        let soy = catalog.crop("Soja (Glycine max)").unwrap();
        assert_eq!(soy.base_temperature, 10.0);
        assert_eq!(soy.variety("Brasmax").unwrap().crop_coefficient, 1.15);

        let r1 = soy.phase("R1 - Início Floração").unwrap();
        assert_eq!(r1.physiology_note, "Mudança hormonal. Alta demanda de Boro.");
        let protocol = r1.protocol();
        assert_eq!(protocol.len(), 2);
        assert_eq!(protocol[0].resistance_group.as_deref(), Some("FRAC 3 + 11"));
        assert_eq!(protocol[0].action_type, ActionType::Systemic);
        assert_eq!(protocol[1].target, UNKNOWN_TARGET);
        assert_eq!(protocol[1].action_type, ActionType::Contact);
        assert_eq!(protocol[1].strategy_note, None);

        assert!(soy.phase("V3 - Terceiro Trifólio").unwrap().chemical_protocol.is_none());
    }

    #[test]
    fn test_phase_order_is_authoring_order() {
        let (catalog, _) =
            Catalog::from_fragments([("a".to_string(), soy_biology())], &FieldAliases::default());
        let names: Vec<&str> = catalog.crops()[0].phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["V3 - Terceiro Trifólio", "R1 - Início Floração"]);
    }

    #[test]
    fn test_bad_fragments_do_not_block_valid_ones() {
        let mut merger = KnowledgeBaseMerger::new();
        assert_eq!(merger.ingest("empty.json", ""), Err(FragmentError::Empty));
        assert_eq!(merger.ingest("blank.json", "{}"), Err(FragmentError::Empty));
        assert!(matches!(
            merger.ingest("broken.json", "{\"Soja\": {"),
            Err(FragmentError::Malformed(_))
        ));
        assert_eq!(merger.ingest("list.json", "[1, 2]"), Err(FragmentError::NotAnObject));
        merger.skip("locked.json", FragmentError::Unreadable("permission denied".into()));
        merger.ingest("biologia.json", &soy_biology().to_string()).unwrap();

        let (catalog, report) = merger.finish(&FieldAliases::default());
        assert_eq!(catalog.len(), 1);
        assert_eq!(report.merged_count(), 1);
        assert_eq!(report.skipped_count(), 5);
        assert!(report.fragments[0].error.is_some());
    }

    #[test]
    fn test_protocol_only_crop_is_rejected_but_kept_raw() {
        let (catalog, report) = Catalog::from_fragments(
            [("manejo.json".to_string(), soy_protocols())],
            &FieldAliases::default(),
        );
        assert!(catalog.is_empty());
        assert_eq!(report.rejected_crops.len(), 1);
        assert_eq!(
            report.rejected_crops[0].reason,
            CatalogError::InvalidBaseTemperature.to_string()
        );
        assert!(catalog.raw()["Soja (Glycine max)"]["fases"].is_object());
    }

    #[test]
    fn test_crop_invariants() {
        let aliases = FieldAliases::default();
        let no_vars = json!({"t_base": 10, "fases": {"VE": {"desc": "x"}}});
        assert_eq!(crop_from_value("c", &no_vars, &aliases), Err(CatalogError::NoVarieties));

        let no_phases = json!({"t_base": 10, "vars": {"A": {"kc": 1.0}}});
        assert_eq!(crop_from_value("c", &no_phases, &aliases), Err(CatalogError::NoPhases));

        let negative = json!({"t_base": -5, "vars": {"A": {}}, "fases": {"VE": {}}});
        assert_eq!(
            crop_from_value("c", &negative, &aliases),
            Err(CatalogError::InvalidBaseTemperature)
        );

        let wild_kc = json!({"t_base": 10, "vars": {"A": {"kc": 4.0}}, "fases": {"VE": {}}});
        assert!(matches!(
            crop_from_value("c", &wild_kc, &aliases),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_fields_use_fallbacks() {
        let entry = json!({"t_base": 7, "vars": {"Albion": {}}, "fases": {"Produção": {}}});
        let crop = crop_from_value("Morango", &entry, &FieldAliases::default()).unwrap();
        let variety = crop.variety("Albion").unwrap();
        assert_eq!(variety.crop_coefficient, DEFAULT_CROP_COEFFICIENT);
        assert_eq!(variety.thermal_unit_target, 0.0);
        assert_eq!(variety.description, NO_DESCRIPTION);
        let phase = crop.phase("Produção").unwrap();
        assert_eq!(phase.management_note, NO_MANAGEMENT_NOTE);
        assert!(phase.chemical_protocol.is_none());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut once = Map::new();
        deep_merge(&mut once, obj(soy_biology()));

        let mut twice = Map::new();
        deep_merge(&mut twice, obj(soy_biology()));
        deep_merge(&mut twice, obj(soy_biology()));

        assert_eq!(once, twice);
    }

    fn branch_strategy() -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-z]{1,6}", 0i64..1000, 1..4)
            .prop_map(|leaves| json!(leaves))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_disjoint_branches_merge_in_any_order(
            a in branch_strategy(),
            b in branch_strategy(),
            c in branch_strategy()
        ) {
            let fragments = [
                obj(json!({"Crop": {"fases": {"A": a.clone()}}})),
                obj(json!({"Crop": {"fases": {"B": b.clone()}}})),
                obj(json!({"Crop": {"vars": {"C": c.clone()}}})),
            ];

            let mut forward = Map::new();
            for f in fragments.iter().cloned() {
                deep_merge(&mut forward, f);
            }
            let mut backward = Map::new();
            for f in fragments.iter().rev().cloned() {
                deep_merge(&mut backward, f);
            }

            for tree in [&forward, &backward] {
                prop_assert_eq!(&tree["Crop"]["fases"]["A"], &a);
                prop_assert_eq!(&tree["Crop"]["fases"]["B"], &b);
                prop_assert_eq!(&tree["Crop"]["vars"]["C"], &c);
            }
        }

        #[test]
        fn prop_remerge_is_idempotent(a in branch_strategy(), b in branch_strategy()) {
            let fragment = obj(json!({"Crop": {"fases": {"A": a, "B": b}}}));
            let mut once = Map::new();
            deep_merge(&mut once, fragment.clone());
            let mut twice = once.clone();
            deep_merge(&mut twice, fragment);
            prop_assert_eq!(once, twice);
        }
    }
}
