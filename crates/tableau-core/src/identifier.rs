//! Figure identifiers backed by a global string interner
//!
//! Every figure in a scene is addressed by an [`Id`]. Scenes create a lot of
//! numbered figures (pillars, particles, matrix entries), so identifiers are
//! interned once and compared as symbols afterwards.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Interned identifier of a scene figure
///
/// # Examples
///
/// ```
/// use tableau_core::identifier::Id;
///
/// let title = Id::new("title");
/// assert_eq!(title, "title");
///
/// let pillar = Id::indexed("pillar", &[2, 7]);
/// assert_eq!(pillar, "pillar_2_7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates (or looks up) the identifier for `name`.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates a numbered identifier such as `pillar_0_3` or `particle_12`.
    pub fn indexed(prefix: &str, indices: &[usize]) -> Self {
        let mut name = String::from(prefix);
        for idx in indices {
            name.push('_');
            name.push_str(&idx.to_string());
        }
        Self::new(&name)
    }

    /// Creates a derived identifier `parent/suffix`, used for the pieces of
    /// compound figures (a label belonging to a node, a copy of a group).
    ///
    /// ```
    /// use tableau_core::identifier::Id;
    ///
    /// let node = Id::new("node_1");
    /// assert_eq!(node.child("label"), "node_1/label");
    /// ```
    pub fn child(&self, suffix: &str) -> Self {
        let name = format!("{self}/{suffix}");
        Self::new(&name)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = interner();
        let name = guard.resolve(self.0).unwrap_or("<unknown>");
        f.write_str(name)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_interning() {
        let a = Id::new("pillar");
        let b = Id::from("pillar");
        assert_eq!(a, b);
        assert_ne!(a, Id::new("particle"));
    }

    #[test]
    fn test_id_indexed() {
        assert_eq!(Id::indexed("row", &[3]), "row_3");
        assert_eq!(Id::indexed("cell", &[]), "cell");
        assert_eq!(Id::indexed("entry", &[1, 4]), Id::new("entry_1_4"));
    }

    #[test]
    fn test_id_display_roundtrip() {
        let id = Id::new("lane_label");
        assert_eq!(id.to_string(), "lane_label");
    }

    #[test]
    fn test_id_child() {
        let copy = Id::new("graph").child("copy");
        assert_eq!(copy, "graph/copy");
        assert_eq!(copy.child("node"), "graph/copy/node");
    }
}
