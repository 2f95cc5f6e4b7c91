//! Training module catalog and prerequisite graph
//!
//! Static configuration loaded at process start and never mutated. Each
//! module maps to a training mode and at most one prerequisite.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use calltrainer_core::{ModeKind, ModuleId};

/// Pass condition on a prerequisite module, specific to the module's type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PassCondition {
    /// Best score in the prerequisite must reach this bar
    BestScoreAtLeast { score: u32 },
    /// The prerequisite marathon must have been passed
    MarathonPassed,
}

/// A prerequisite edge in the unlock graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prerequisite {
    pub module: ModuleId,
    pub condition: PassCondition,
}

/// One entry of the module catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub id: ModuleId,
    pub title: String,
    pub kind: ModeKind,
    /// None means the module is always unlocked
    pub prerequisite: Option<Prerequisite>,
}

static CATALOG: Lazy<Vec<ModuleSpec>> = Lazy::new(|| {
    vec![
        ModuleSpec {
            id: ModuleId::from("1.1"),
            title: "First Dials".to_string(),
            kind: ModeKind::Practice,
            prerequisite: None,
        },
        ModuleSpec {
            id: ModuleId::from("1.2"),
            title: "Ten-Call Gauntlet".to_string(),
            kind: ModeKind::Marathon,
            prerequisite: Some(Prerequisite {
                module: ModuleId::from("1.1"),
                condition: PassCondition::BestScoreAtLeast { score: 70 },
            }),
        },
        ModuleSpec {
            id: ModuleId::from("1.3"),
            title: "Warm-up Challenge".to_string(),
            kind: ModeKind::Quiz,
            prerequisite: None,
        },
        ModuleSpec {
            id: ModuleId::from("2.1"),
            title: "Full Simulation".to_string(),
            kind: ModeKind::Simulation,
            prerequisite: Some(Prerequisite {
                module: ModuleId::from("1.2"),
                condition: PassCondition::MarathonPassed,
            }),
        },
        ModuleSpec {
            id: ModuleId::from("2.2"),
            title: "Power Hour".to_string(),
            kind: ModeKind::PowerHour,
            prerequisite: Some(Prerequisite {
                module: ModuleId::from("2.1"),
                condition: PassCondition::BestScoreAtLeast { score: 70 },
            }),
        },
    ]
});

/// The static module catalog
pub fn module_catalog() -> &'static [ModuleSpec] {
    &CATALOG
}

/// Look up one module by id
pub fn find_module(id: &ModuleId) -> Option<&'static ModuleSpec> {
    CATALOG.iter().find(|m| &m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_all_five_modes() {
        let kinds: Vec<ModeKind> = module_catalog().iter().map(|m| m.kind).collect();
        for kind in [
            ModeKind::Practice,
            ModeKind::Marathon,
            ModeKind::Quiz,
            ModeKind::Simulation,
            ModeKind::PowerHour,
        ] {
            assert!(kinds.contains(&kind), "missing {:?}", kind);
        }
    }

    #[test]
    fn test_prerequisites_reference_existing_modules() {
        for spec in module_catalog() {
            if let Some(pre) = &spec.prerequisite {
                assert!(
                    find_module(&pre.module).is_some(),
                    "{} references unknown prerequisite {}",
                    spec.id,
                    pre.module
                );
            }
        }
    }

    #[test]
    fn test_simulation_requires_marathon_pass() {
        let sim = find_module(&ModuleId::from("2.1")).unwrap();
        let pre = sim.prerequisite.as_ref().unwrap();
        assert_eq!(pre.module, ModuleId::from("1.2"));
        assert_eq!(pre.condition, PassCondition::MarathonPassed);
    }

    #[test]
    fn test_entry_modules_always_unlocked() {
        assert!(find_module(&ModuleId::from("1.1")).unwrap().prerequisite.is_none());
        assert!(find_module(&ModuleId::from("1.3")).unwrap().prerequisite.is_none());
    }
}
