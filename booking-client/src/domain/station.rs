//! Station type.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A station as returned by the station search.
///
/// Identity is the site's station id; the name is display-only and two
/// stations with the same id compare equal whatever their names.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: String,
    pub name: String,
}

impl Station {
    /// Create a station from its site id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_id() {
        let a = Station::new("2200001", "Київ-Пасажирський");
        let b = Station::new("2200001", "Kyiv");
        let c = Station::new("2218000", "Львів");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Station::new("2200001", "Kyiv"));
        assert!(set.contains(&Station::new("2200001", "")));
        assert!(!set.contains(&Station::new("2218000", "")));
    }

    #[test]
    fn display() {
        let s = Station::new("2218000", "Львів");
        assert_eq!(s.to_string(), "Львів (2218000)");
    }
}
