use crate::logic::RosterProfile;

/// A named league setup: which kind of clubs take the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    pub profile: RosterProfile,
}

const CATALOG: [Scenario; 4] = [
    Scenario {
        key: "league",
        description: "League-average rosters, the calibration baseline",
        profile: RosterProfile::LEAGUE,
    },
    Scenario {
        key: "power",
        description: "Power-heavy lineups that lift the ball and strike out",
        profile: RosterProfile {
            contact: -8,
            power: 18,
            loft: 12,
            eye: 0,
            speed: -5,
            control: 0,
            stuff: 0,
        },
    },
    Scenario {
        key: "contact",
        description: "Contact-heavy lineups with speed and a good eye",
        profile: RosterProfile {
            contact: 18,
            power: -12,
            loft: -10,
            eye: 10,
            speed: 10,
            control: 0,
            stuff: 0,
        },
    },
    Scenario {
        key: "aces",
        description: "High-control staffs with deep repertoires",
        profile: RosterProfile {
            contact: 0,
            power: 0,
            loft: 0,
            eye: 0,
            speed: 0,
            control: 22,
            stuff: 12,
        },
    },
];

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG
        .iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

pub fn get_scenario(name: &str) -> Option<Scenario> {
    CATALOG
        .iter()
        .find(|scenario| scenario.key.eq_ignore_ascii_case(name))
        .copied()
}

/// Expand `all` into every catalogued scenario, keeping the requested order
/// otherwise and dropping repeats.
pub fn expand_scenarios(requested: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    for name in requested {
        if name.eq_ignore_ascii_case("all") {
            for scenario in &CATALOG {
                if !expanded.iter().any(|s| s == scenario.key) {
                    expanded.push(scenario.key.to_string());
                }
            }
        } else if !expanded.contains(name) {
            expanded.push(name.clone());
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_every_scenario() {
        let keys: Vec<_> = list_scenarios().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["league", "power", "contact", "aces"]);
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(get_scenario("POWER").map(|s| s.key), Some("power"));
        assert!(get_scenario("bogus").is_none());
    }

    #[test]
    fn all_expands_without_duplicates() {
        let requested = vec!["aces".to_string(), "all".to_string(), "aces".to_string()];
        assert_eq!(
            expand_scenarios(&requested),
            vec!["aces", "league", "power", "contact"]
        );
    }
}
