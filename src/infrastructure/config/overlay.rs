use std::collections::BTreeMap;

use tracing::debug;

/// Environment values available to `%(NAME)s` interpolation
///
/// Only allowlisted variables that are set and non-empty are captured. Names
/// are matched case-insensitively, like the keys they stand in for. The
/// overlay is never merged into sections; it only feeds interpolation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    values: BTreeMap<String, String>,
}

impl EnvOverlay {
    /// Capture allowlisted variables from the process environment.
    pub fn from_env<I, S>(allowlist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_lookup(allowlist, |name| std::env::var(name).ok())
    }

    /// Capture allowlisted variables from an arbitrary lookup.
    pub fn from_lookup<I, S, F>(allowlist: I, lookup: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut values = BTreeMap::new();
        for name in allowlist {
            let name = name.as_ref();
            match lookup(name) {
                Some(value) if !value.is_empty() => {
                    debug!(variable = name, "environment variable available for interpolation");
                    values.entry(name.to_lowercase()).or_insert(value);
                }
                _ => debug!(variable = name, "allowlisted environment variable unset or empty"),
            }
        }
        Self { values }
    }

    /// Build an overlay from explicit name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(name, value)| (name.as_ref().to_lowercase(), value.into()))
            .filter(|(_, value)| !value.is_empty())
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_allowlisted_nonempty_variables() {
        let overlay = EnvOverlay::from_lookup(["IEX_TOKEN", "EMPTY", "UNSET"], |name| match name {
            "IEX_TOKEN" => Some("pk_123".to_string()),
            "EMPTY" => Some(String::new()),
            "SECRET" => Some("hidden".to_string()),
            _ => None,
        });

        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay.get("IEX_TOKEN"), Some("pk_123"));
        assert_eq!(overlay.get("iex_token"), Some("pk_123"));
        assert_eq!(overlay.get("EMPTY"), None);
        assert_eq!(overlay.get("SECRET"), None);
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        temp_env::with_vars(
            [
                ("INKYSTOCK_TEST_TOKEN", Some("pk_env")),
                ("INKYSTOCK_TEST_OTHER", Some("ignored")),
            ],
            || {
                let overlay = EnvOverlay::from_env(["INKYSTOCK_TEST_TOKEN"]);
                assert_eq!(overlay.get("INKYSTOCK_TEST_TOKEN"), Some("pk_env"));
                assert_eq!(overlay.get("INKYSTOCK_TEST_OTHER"), None);
            },
        );
    }

    #[test]
    fn test_first_spelling_wins_for_case_variants() {
        let overlay = EnvOverlay::from_lookup(["Token", "TOKEN"], |name| Some(name.to_string()));
        assert_eq!(overlay.get("token"), Some("Token"));
    }

    #[test]
    fn test_empty_allowlist() {
        let overlay = EnvOverlay::from_env(Vec::<String>::new());
        assert!(overlay.is_empty());
    }
}
