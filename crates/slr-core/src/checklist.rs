//! PRISMA reporting-quality checklist
//!
//! A fixed set of 8 compliance items, each scored in [0, 1]. Items missing
//! from an input map default to 0 so a partial report is never rejected,
//! only scored low.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The 8 checklist item names, in scoring order
pub const CHECKLIST_ITEMS: [&str; 8] = [
    "search_strategy_documented",
    "inclusion_criteria_clear",
    "exclusion_criteria_clear",
    "study_selection_process",
    "data_extraction_systematic",
    "quality_assessment_performed",
    "results_synthesized",
    "limitations_discussed",
];

/// PRISMA compliance scores for one review
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrismaChecklist {
    #[serde(default)]
    pub search_strategy_documented: f32,
    #[serde(default)]
    pub inclusion_criteria_clear: f32,
    #[serde(default)]
    pub exclusion_criteria_clear: f32,
    #[serde(default)]
    pub study_selection_process: f32,
    #[serde(default)]
    pub data_extraction_systematic: f32,
    #[serde(default)]
    pub quality_assessment_performed: f32,
    #[serde(default)]
    pub results_synthesized: f32,
    #[serde(default)]
    pub limitations_discussed: f32,
}

impl PrismaChecklist {
    /// Build from a name/value map; unknown names are ignored and missing
    /// items stay at 0.
    pub fn from_map(map: &HashMap<String, f32>) -> Self {
        let mut checklist = Self::default();
        for (name, value) in map {
            checklist.set(name, *value);
        }
        checklist
    }

    /// Look up an item score by name
    pub fn get(&self, name: &str) -> Option<f32> {
        match name {
            "search_strategy_documented" => Some(self.search_strategy_documented),
            "inclusion_criteria_clear" => Some(self.inclusion_criteria_clear),
            "exclusion_criteria_clear" => Some(self.exclusion_criteria_clear),
            "study_selection_process" => Some(self.study_selection_process),
            "data_extraction_systematic" => Some(self.data_extraction_systematic),
            "quality_assessment_performed" => Some(self.quality_assessment_performed),
            "results_synthesized" => Some(self.results_synthesized),
            "limitations_discussed" => Some(self.limitations_discussed),
            _ => None,
        }
    }

    /// Set an item score by name, clamped to [0, 1]. Returns false for an
    /// unknown name.
    pub fn set(&mut self, name: &str, value: f32) -> bool {
        let value = value.clamp(0.0, 1.0);
        let slot = match name {
            "search_strategy_documented" => &mut self.search_strategy_documented,
            "inclusion_criteria_clear" => &mut self.inclusion_criteria_clear,
            "exclusion_criteria_clear" => &mut self.exclusion_criteria_clear,
            "study_selection_process" => &mut self.study_selection_process,
            "data_extraction_systematic" => &mut self.data_extraction_systematic,
            "quality_assessment_performed" => &mut self.quality_assessment_performed,
            "results_synthesized" => &mut self.results_synthesized,
            "limitations_discussed" => &mut self.limitations_discussed,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// All items as (name, value) pairs, in `CHECKLIST_ITEMS` order
    pub fn items(&self) -> Vec<(&'static str, f32)> {
        CHECKLIST_ITEMS
            .iter()
            .map(|name| (*name, self.get(name).unwrap_or(0.0)))
            .collect()
    }

    /// Mean score over all 8 items
    pub fn mean(&self) -> f32 {
        let sum: f32 = self.items().iter().map(|(_, v)| v).sum();
        sum / CHECKLIST_ITEMS.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_item_addressable_by_name() {
        let mut checklist = PrismaChecklist::default();
        for name in CHECKLIST_ITEMS {
            assert!(checklist.set(name, 0.5), "cannot set {name}");
            assert_eq!(checklist.get(name), Some(0.5));
        }
        assert!(!checklist.set("unknown_item", 1.0));
        assert!(checklist.get("unknown_item").is_none());
    }

    #[test]
    fn test_from_map_missing_items_default_to_zero() {
        let mut map = HashMap::new();
        map.insert("results_synthesized".to_string(), 0.9);
        let checklist = PrismaChecklist::from_map(&map);

        assert_eq!(checklist.results_synthesized, 0.9);
        assert_eq!(checklist.search_strategy_documented, 0.0);
    }

    #[test]
    fn test_set_clamps_to_unit_interval() {
        let mut checklist = PrismaChecklist::default();
        checklist.set("results_synthesized", 1.5);
        assert_eq!(checklist.results_synthesized, 1.0);
        checklist.set("results_synthesized", -0.5);
        assert_eq!(checklist.results_synthesized, 0.0);
    }

    #[test]
    fn test_mean() {
        let mut checklist = PrismaChecklist::default();
        for name in CHECKLIST_ITEMS {
            checklist.set(name, 1.0);
        }
        assert!((checklist.mean() - 1.0).abs() < 1e-6);

        checklist.set("limitations_discussed", 0.0);
        assert!((checklist.mean() - 7.0 / 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_serde_uses_exact_item_names() {
        let mut checklist = PrismaChecklist::default();
        checklist.set("search_strategy_documented", 1.0);
        let json = serde_json::to_string(&checklist).unwrap();
        assert!(json.contains("\"search_strategy_documented\":1.0"));

        // Partial input is accepted; absent items default to 0
        let parsed: PrismaChecklist =
            serde_json::from_str("{\"inclusion_criteria_clear\": 0.7}").unwrap();
        assert_eq!(parsed.inclusion_criteria_clear, 0.7);
        assert_eq!(parsed.results_synthesized, 0.0);
    }
}
