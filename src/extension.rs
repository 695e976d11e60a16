/// Extension allow-list and lookup-key decomposition
///
/// An extension is a government-domain suffix such as `.gov` or `.gov.uk`.
/// The allow-list is fixed at startup; everything downstream (cache keys,
/// store filters) is derived from a matched extension.
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};

/// A validated domain extension from the allow-list.
///
/// Stored lowercase with its leading dot, exactly as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension(String);

impl Extension {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decompose into ordered lookup-key parts.
    ///
    /// Labels are reversed so `part1` is the effective TLD:
    /// `.gov.uk` -> part1 = "uk", part2 = "gov", part3 = None.
    pub fn lookup_key(&self) -> LookupKey {
        let mut labels = self.0.split('.').rev().filter(|l| !l.is_empty());

        LookupKey {
            // A matched extension always has at least one label
            part1: labels.next().unwrap_or_default().to_string(),
            part2: labels.next().map(str::to_string),
            part3: labels.next().map(str::to_string),
        }
    }
}

impl std::fmt::Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered lookup-key components for the store filter.
///
/// `part1` is always present; absent parts impose no constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupKey {
    pub part1: String,
    pub part2: Option<String>,
    pub part3: Option<String>,
}

impl LookupKey {
    /// Rejoin the parts (most-specific first) under a leading dot.
    pub fn to_extension_string(&self) -> String {
        let mut labels: Vec<&str> = Vec::with_capacity(3);
        if let Some(p3) = &self.part3 {
            labels.push(p3);
        }
        if let Some(p2) = &self.part2 {
            labels.push(p2);
        }
        labels.push(&self.part1);
        format!(".{}", labels.join("."))
    }
}

/// Fixed allow-list of extensions, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct ExtensionRegistry {
    extensions: Vec<Extension>,
}

impl ExtensionRegistry {
    /// Build a registry from configured extension strings.
    ///
    /// Each entry must carry a leading dot and at most three labels.
    pub fn new<I, S>(configured: I) -> ApiResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extensions = Vec::new();

        for raw in configured {
            let raw = raw.as_ref().trim().to_lowercase();
            if raw.is_empty() {
                continue;
            }
            if !raw.starts_with('.') {
                return Err(ApiError::Validation(format!(
                    "Extension '{}' must start with '.'",
                    raw
                )));
            }
            let labels = raw[1..].split('.').count();
            if raw[1..].split('.').any(|l| l.is_empty()) {
                return Err(ApiError::Validation(format!(
                    "Extension '{}' has an empty label",
                    raw
                )));
            }
            if labels > 3 {
                return Err(ApiError::Validation(format!(
                    "Extension '{}' has more than three labels",
                    raw
                )));
            }
            extensions.push(Extension(raw));
        }

        if extensions.is_empty() {
            return Err(ApiError::Validation(
                "Extension allow-list cannot be empty".to_string(),
            ));
        }

        Ok(Self { extensions })
    }

    /// Match a request path segment against the allow-list.
    ///
    /// Exact match, case-insensitive. Direct string comparison on
    /// purpose: the segment space is small and fixed, and nothing
    /// derived from the request ever becomes a pattern.
    pub fn match_segment(&self, segment: &str) -> ApiResult<&Extension> {
        let lowered = segment.to_lowercase();

        self.extensions
            .iter()
            .find(|ext| ext.0 == lowered)
            .ok_or_else(|| ApiError::UnsupportedExtension {
                allowed: self.allowed(),
            })
    }

    /// The configured allow-list, in configuration order.
    pub fn allowed(&self) -> Vec<String> {
        self.extensions.iter().map(|e| e.0.clone()).collect()
    }

    /// Error value enumerating the allow-list, for unmatched routes.
    pub fn unsupported(&self) -> ApiError {
        ApiError::UnsupportedExtension {
            allowed: self.allowed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ExtensionRegistry {
        ExtensionRegistry::new([".gov", ".gov.uk", ".gov.br"]).unwrap()
    }

    #[test]
    fn matches_exact_extension() {
        let reg = registry();
        let ext = reg.match_segment(".gov.uk").unwrap();
        assert_eq!(ext.as_str(), ".gov.uk");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let reg = registry();
        let ext = reg.match_segment(".GOV.Uk").unwrap();
        assert_eq!(ext.as_str(), ".gov.uk");
    }

    #[test]
    fn rejects_unknown_extension_with_allow_list() {
        let reg = registry();
        let err = reg.match_segment(".mil").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Extension must be one of: .gov, .gov.uk, .gov.br"
        );
    }

    #[test]
    fn rejects_prefix_and_substring_matches() {
        let reg = registry();
        assert!(reg.match_segment(".gov.ukx").is_err());
        assert!(reg.match_segment("gov.uk").is_err());
        assert!(reg.match_segment(".gov.uk.extra").is_err());
    }

    #[test]
    fn two_label_extension_decomposes_to_two_parts() {
        let reg = registry();
        let key = reg.match_segment(".gov.uk").unwrap().lookup_key();
        assert_eq!(key.part1, "uk");
        assert_eq!(key.part2.as_deref(), Some("gov"));
        assert_eq!(key.part3, None);
    }

    #[test]
    fn single_label_extension_decomposes_to_one_part() {
        let reg = registry();
        let key = reg.match_segment(".gov").unwrap().lookup_key();
        assert_eq!(key.part1, "gov");
        assert_eq!(key.part2, None);
        assert_eq!(key.part3, None);
    }

    #[test]
    fn three_label_extension_decomposes_to_three_parts() {
        let reg = ExtensionRegistry::new([".nsw.gov.au"]).unwrap();
        let key = reg.match_segment(".nsw.gov.au").unwrap().lookup_key();
        assert_eq!(key.part1, "au");
        assert_eq!(key.part2.as_deref(), Some("gov"));
        assert_eq!(key.part3.as_deref(), Some("nsw"));
    }

    #[test]
    fn decomposition_is_reversible() {
        let reg = ExtensionRegistry::new([".gov", ".gov.uk", ".nsw.gov.au"]).unwrap();
        for raw in [".gov", ".gov.uk", ".nsw.gov.au"] {
            let ext = reg.match_segment(raw).unwrap();
            assert_eq!(ext.lookup_key().to_extension_string(), raw);
        }
    }

    #[test]
    fn registry_rejects_missing_leading_dot() {
        assert!(ExtensionRegistry::new(["gov"]).is_err());
    }

    #[test]
    fn registry_rejects_more_than_three_labels() {
        assert!(ExtensionRegistry::new([".a.b.c.d"]).is_err());
    }

    #[test]
    fn registry_rejects_empty_allow_list() {
        assert!(ExtensionRegistry::new(Vec::<String>::new()).is_err());
    }
}
