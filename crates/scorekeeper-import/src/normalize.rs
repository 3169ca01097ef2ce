// Name cleanup shared by both converters: apostrophe folding, non-ASCII
// stripping, slug generation, and the team alias table.

use crate::table::Cell;
use std::collections::HashMap;

/// Known misspellings and apostrophe variants, keyed by normalized name.
const BUILTIN_ALIASES: &[(&str, &str)] = &[("Slappy Gilmores", "Slappy Gilmore's")];

/// Fold U+2019 to `'`, drop every other non-ASCII character, trim.
pub fn normalize_text(raw: &str) -> String {
    let folded: String = raw
        .chars()
        .map(|c| if c == '\u{2019}' { '\'' } else { c })
        .filter(char::is_ascii)
        .collect();
    folded.trim().to_string()
}

/// Normalize any cell through its text form. Missing cells give "".
pub fn normalize_cell(cell: &Cell) -> String {
    match cell {
        Cell::Missing => String::new(),
        Cell::Text(s) => normalize_text(s),
        other => normalize_text(&other.to_string()),
    }
}

/// Lowercased normalized text with every non-alphanumeric character replaced
/// by `_`. Only used to build identifiers.
pub fn slugify(value: &str) -> String {
    normalize_text(value)
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

// ---------------------------------------------------------------------------
// Team aliases
// ---------------------------------------------------------------------------

/// Corrective mapping from a normalized team name to its display form.
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAliases {
    map: HashMap<String, String>,
}

impl TeamAliases {
    /// The built-in table.
    pub fn builtin() -> Self {
        Self::with_overrides(std::iter::empty::<(String, String)>())
    }

    /// The built-in table extended by `overrides`; an override replaces a
    /// built-in entry with the same key. Keys and values are normalized, and
    /// entries that normalize to empty on either side are ignored.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = HashMap::new();
        let builtin = BUILTIN_ALIASES
            .iter()
            .map(|(k, v)| (normalize_text(k), normalize_text(v)));
        let extra = overrides
            .into_iter()
            .map(|(k, v)| (normalize_text(k.as_ref()), normalize_text(v.as_ref())));
        for (key, value) in builtin.chain(extra) {
            if key.is_empty() || value.is_empty() {
                continue;
            }
            map.insert(key, value);
        }
        Self { map }
    }

    /// Canonical form of an already-normalized name.
    pub fn resolve(&self, name: String) -> String {
        match self.map.get(&name) {
            Some(canonical) => canonical.clone(),
            None => name,
        }
    }

    /// Normalize a team cell and resolve it through the table.
    pub fn canonical_team(&self, cell: &Cell) -> String {
        self.resolve(normalize_cell(cell))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for TeamAliases {
    fn default() -> Self {
        Self::builtin()
    }
}
