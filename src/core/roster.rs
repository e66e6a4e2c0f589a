//! Known staff and the fixed choice lists offered to borrowers.

use super::record::Role;
use serde::{Deserialize, Serialize};

/// Placeholder a form submits when no destination unit was picked.
pub const UNSELECTED_LOCATION: &str = "unselected";

/// Staff allowed to borrow, per role.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub doctors: Vec<String>,
    pub nurse_practitioners: Vec<String>,
}

impl Roster {
    pub fn members(&self, role: Role) -> &[String] {
        match role {
            Role::Doctor => &self.doctors,
            Role::NursePractitioner => &self.nurse_practitioners,
        }
    }

    pub fn contains(&self, role: Role, name: &str) -> bool {
        let name = name.trim();
        self.members(role).iter().any(|m| m.trim() == name)
    }

    /// Any role that lists this name.
    pub fn role_of(&self, name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| self.contains(*r, name))
    }

    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty() && self.nurse_practitioners.is_empty()
    }
}

/// Fixed catalogs for the free-choice fields. An empty list accepts anything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub body_parts: Vec<String>,
    pub locations: Vec<String>,
}

impl Catalog {
    pub fn allows_body_part(&self, body_part: &str) -> bool {
        allows(&self.body_parts, body_part)
    }

    pub fn allows_location(&self, location: &str) -> bool {
        allows(&self.locations, location)
    }
}

fn allows(list: &[String], value: &str) -> bool {
    list.is_empty() || list.iter().any(|v| v.trim() == value.trim())
}

/// True when the location is blank or the form placeholder.
pub fn is_unselected(location: &str) -> bool {
    let location = location.trim();
    location.is_empty() || location == UNSELECTED_LOCATION
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster {
            doctors: vec!["朱戈靖".to_string(), "陳柏宇".to_string()],
            nurse_practitioners: vec!["王淑芬".to_string()],
        }
    }

    #[test]
    fn contains_checks_the_role_list_only() {
        let roster = roster();
        assert!(roster.contains(Role::Doctor, "朱戈靖"));
        assert!(!roster.contains(Role::NursePractitioner, "朱戈靖"));
        assert!(roster.contains(Role::NursePractitioner, " 王淑芬 "));
    }

    #[test]
    fn role_of_finds_any_listing() {
        let roster = roster();
        assert_eq!(roster.role_of("王淑芬"), Some(Role::NursePractitioner));
        assert_eq!(roster.role_of("無名氏"), None);
    }

    #[test]
    fn empty_catalog_accepts_everything() {
        let catalog = Catalog::default();
        assert!(catalog.allows_body_part("anything"));
        assert!(catalog.allows_location("7C"));
    }

    #[test]
    fn catalog_restricts_to_listed_values() {
        let catalog = Catalog {
            body_parts: vec!["心臟 (Cardiac)".to_string()],
            locations: vec!["6B".to_string()],
        };
        assert!(catalog.allows_body_part("心臟 (Cardiac)"));
        assert!(!catalog.allows_body_part("肺部 (Lung)"));
        assert!(catalog.allows_location("6B"));
        assert!(!catalog.allows_location("ER"));
    }

    #[test]
    fn placeholder_and_blank_are_unselected() {
        assert!(is_unselected(UNSELECTED_LOCATION));
        assert!(is_unselected("  "));
        assert!(!is_unselected("6B"));
    }
}
