//! Prospect personas
//!
//! Practice and Marathon use the neutral default prospect. Simulation
//! draws one of four archetypes, which shapes the oracle prompt and the
//! persona's hang-up sensitivity.

use serde::{Deserialize, Serialize};

use calltrainer_core::RngSource;

/// Buyer-style archetype for simulation prospects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaArchetype {
    Analytical,
    Driver,
    Expressive,
    Amiable,
}

impl PersonaArchetype {
    pub const ALL: [PersonaArchetype; 4] = [
        PersonaArchetype::Analytical,
        PersonaArchetype::Driver,
        PersonaArchetype::Expressive,
        PersonaArchetype::Amiable,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PersonaArchetype::Analytical => "Alex",
            PersonaArchetype::Driver => "Dana",
            PersonaArchetype::Expressive => "Riley",
            PersonaArchetype::Amiable => "Morgan",
        }
    }

    /// Style guidance embedded in the oracle prompt
    pub fn style_guidance(&self) -> &'static str {
        match self {
            PersonaArchetype::Analytical => {
                "Analytical and precise. You want numbers, proof and specifics. \
                 Vague claims annoy you; concrete details earn a little patience."
            }
            PersonaArchetype::Driver => {
                "Direct and impatient. You value your time above everything. \
                 Get to the point or you are gone. You interrupt ramblers."
            }
            PersonaArchetype::Expressive => {
                "Talkative and warm, but easily distracted. You go on tangents \
                 and respond well to energy and stories, poorly to dry facts."
            }
            PersonaArchetype::Amiable => {
                "Friendly and conflict-averse. You rarely object outright but \
                 you also rarely commit. You say 'maybe' a lot."
            }
        }
    }

    /// Multiplier on the mode's hang-up probability
    pub fn hangup_sensitivity(&self) -> f64 {
        match self {
            PersonaArchetype::Analytical => 0.9,
            PersonaArchetype::Driver => 1.3,
            PersonaArchetype::Expressive => 0.8,
            PersonaArchetype::Amiable => 0.6,
        }
    }

    /// Draw a random archetype
    pub fn pick(rng: &dyn RngSource) -> Self {
        Self::ALL[rng.pick_index(Self::ALL.len())]
    }
}

impl std::fmt::Display for PersonaArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PersonaArchetype::Analytical => "analytical",
            PersonaArchetype::Driver => "driver",
            PersonaArchetype::Expressive => "expressive",
            PersonaArchetype::Amiable => "amiable",
        };
        write!(f, "{}", s)
    }
}

/// Concrete prospect for one call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    /// Style guidance for the oracle prompt; empty means default skeptic
    pub style: String,
    /// Multiplier on hang-up probability
    pub hangup_sensitivity: f64,
    /// Archetype, when one was drawn
    pub archetype: Option<PersonaArchetype>,
}

impl Persona {
    /// The default skeptical-but-fair prospect
    pub fn neutral() -> Self {
        Self {
            name: "Sam".to_string(),
            style: String::new(),
            hangup_sensitivity: 1.0,
            archetype: None,
        }
    }

    pub fn from_archetype(archetype: PersonaArchetype) -> Self {
        Self {
            name: archetype.display_name().to_string(),
            style: archetype.style_guidance().to_string(),
            hangup_sensitivity: archetype.hangup_sensitivity(),
            archetype: Some(archetype),
        }
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calltrainer_core::SeededRng;

    #[test]
    fn test_archetype_sensitivities_bracket_neutral() {
        let neutral = Persona::neutral().hangup_sensitivity;
        assert!(PersonaArchetype::Driver.hangup_sensitivity() > neutral);
        assert!(PersonaArchetype::Amiable.hangup_sensitivity() < neutral);
    }

    #[test]
    fn test_pick_is_deterministic_under_seed() {
        let a = PersonaArchetype::pick(&SeededRng::seed_from_u64(5));
        let b = PersonaArchetype::pick(&SeededRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_archetype_carries_style() {
        let p = Persona::from_archetype(PersonaArchetype::Driver);
        assert_eq!(p.name, "Dana");
        assert!(p.style.contains("impatient"));
        assert_eq!(p.archetype, Some(PersonaArchetype::Driver));
    }
}
