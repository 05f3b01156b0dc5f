//! # Country Codes
//!
//! Passports identify issuing states and nationalities by ICAO 9303
//! alpha-3 codes (`FRA`, `D<<`, `UTO`). Token metadata shows the full name
//! when a mapping is configured and falls back to the raw code otherwise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from alpha-3 code to display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCodes {
    names: BTreeMap<String, String>,
}

impl CountryCodes {
    /// Empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `mapping` in. Later entries overwrite earlier ones.
    pub fn extend<I, K, V>(&mut self, mapping: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (code, name) in mapping {
            self.names.insert(normalize(&code.into()), name.into());
        }
    }

    /// The configured name for `code`, if any.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.names.get(&normalize(code)).map(String::as_str)
    }

    /// The configured name for `code`, or the trimmed code itself.
    pub fn display(&self, code: &str) -> String {
        self.name_of(code)
            .map(str::to_string)
            .unwrap_or_else(|| code.trim().to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CountryCodes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut codes = Self::new();
        codes.extend(iter);
        codes
    }
}

// MRZ filler and the rendered space both pad short codes such as `D<<`.
fn normalize(code: &str) -> String {
    code.trim_end_matches(['<', ' ']).to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_filler_and_case() {
        let codes: CountryCodes = [("FRA", "France"), ("D", "Germany")].into_iter().collect();
        assert_eq!(codes.name_of("fra"), Some("France"));
        assert_eq!(codes.name_of("D<<"), Some("Germany"));
        assert_eq!(codes.display("D "), "Germany");
        assert_eq!(codes.len(), 2);
    }

    #[test]
    fn unknown_code_falls_back_to_raw() {
        let codes = CountryCodes::new();
        assert!(codes.is_empty());
        assert_eq!(codes.display("UTO"), "UTO");
    }

    #[test]
    fn later_entries_overwrite() {
        let mut codes = CountryCodes::new();
        codes.extend([("GBR", "Britain")]);
        codes.extend([("GBR", "United Kingdom")]);
        assert_eq!(codes.name_of("GBR"), Some("United Kingdom"));
    }

    #[test]
    fn deserializes_from_yaml_style_map() {
        let codes: CountryCodes = serde_json::from_str(r#"{"USA": "United States"}"#).unwrap();
        assert_eq!(codes.name_of("USA"), Some("United States"));
    }
}
