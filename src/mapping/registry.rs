//! Caller-owned mapping registry
//!
//! The registry holds the built-in table and a custom table on top of it. Lookups never
//! fail: unknown tags fall back to `mj-text`.

use super::defaults::{default_mappings, fallback};
use super::ElementMapping;
use crate::error::ConvertError;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Registry of element mappings
///
/// # Examples
///
/// ```ignore
/// let mut registry = MappingRegistry::new();
/// registry.register("callout", ElementMapping::new("mj-text"))?;
///
/// assert_eq!(registry.lookup("CALLOUT").mjml_tag, "mj-text");
/// ```
#[derive(Debug, Clone)]
pub struct MappingRegistry {
    defaults: HashMap<String, ElementMapping>,
    custom: HashMap<String, ElementMapping>,
    fallback: ElementMapping,
}

impl MappingRegistry {
    /// Create a registry seeded with the built-in table
    pub fn new() -> Self {
        MappingRegistry {
            defaults: default_mappings(),
            custom: HashMap::new(),
            fallback: fallback(),
        }
    }

    /// Find the mapping for `tag`: custom table, then built-ins, then `mj-text`
    pub fn lookup(&self, tag: &str) -> &ElementMapping {
        let key = tag.to_ascii_lowercase();
        self.custom
            .get(&key)
            .or_else(|| self.defaults.get(&key))
            .unwrap_or(&self.fallback)
    }

    /// Register a mapping for `tag`
    ///
    /// Any earlier registration for the same tag is replaced, not merged.
    pub fn register(&mut self, tag: &str, mapping: ElementMapping) -> Result<(), ConvertError> {
        let key = tag.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(ConvertError::InvalidMapping(
                "mapping tag must not be empty".to_string(),
            ));
        }
        if mapping.mjml_tag.trim().is_empty() {
            return Err(ConvertError::InvalidMapping(format!(
                "mapping for '{}' has an empty target tag",
                key
            )));
        }
        self.custom.insert(key, mapping);
        Ok(())
    }

    /// Check whether `tag` has an explicit (built-in or custom) mapping
    pub fn has(&self, tag: &str) -> bool {
        let key = tag.to_ascii_lowercase();
        self.custom.contains_key(&key) || self.defaults.contains_key(&key)
    }

    /// List the tags with custom mappings (sorted)
    pub fn list_custom(&self) -> Vec<String> {
        let mut names: Vec<_> = self.custom.keys().cloned().collect();
        names.sort();
        names
    }

    /// A copy of this registry with `overrides` registered on top
    pub fn with_overrides(
        &self,
        overrides: &IndexMap<String, ElementMapping>,
    ) -> Result<MappingRegistry, ConvertError> {
        let mut registry = self.clone();
        for (tag, mapping) in overrides {
            registry.register(tag, mapping.clone())?;
        }
        Ok(registry)
    }
}

impl Default for MappingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Transform;

    #[test]
    fn test_lookup_defaults() {
        let registry = MappingRegistry::new();
        assert_eq!(registry.lookup("p").mjml_tag, "mj-text");
        assert_eq!(registry.lookup("IMG").mjml_tag, "mj-image");
        assert_eq!(registry.lookup("body").mjml_tag, "mj-body");
    }

    #[test]
    fn test_unknown_tags_fall_back() {
        let registry = MappingRegistry::new();
        assert_eq!(registry.lookup("section").mjml_tag, "mj-text");
        assert!(!registry.has("section"));
    }

    #[test]
    fn test_register_overrides_default() {
        let mut registry = MappingRegistry::new();
        registry
            .register("Div", ElementMapping::new("mj-wrapper"))
            .unwrap();

        let mapping = registry.lookup("div");
        assert_eq!(mapping.mjml_tag, "mj-wrapper");
        assert!(mapping.transform.is_none());
        assert_eq!(registry.list_custom(), vec!["div"]);
    }

    #[test]
    fn test_register_replaces_earlier_registration() {
        let mut registry = MappingRegistry::new();
        registry
            .register("x-card", ElementMapping::new("mj-section").self_closing())
            .unwrap();
        registry
            .register("x-card", ElementMapping::new("mj-column"))
            .unwrap();

        let mapping = registry.lookup("x-card");
        assert_eq!(mapping.mjml_tag, "mj-column");
        assert!(!mapping.self_closing);
    }

    #[test]
    fn test_register_rejects_empty_names() {
        let mut registry = MappingRegistry::new();
        assert!(matches!(
            registry.register("  ", ElementMapping::new("mj-text")),
            Err(ConvertError::InvalidMapping(_))
        ));
        assert!(matches!(
            registry.register("card", ElementMapping::new("")),
            Err(ConvertError::InvalidMapping(_))
        ));
        assert!(registry.list_custom().is_empty());
    }

    #[test]
    fn test_overrides_do_not_touch_the_original() {
        let registry = MappingRegistry::new();
        let mut overrides = IndexMap::new();
        overrides.insert(
            "p".to_string(),
            ElementMapping::new("mj-raw").with_transform(|a| Transform::Rewrite(a.clone())),
        );

        let layered = registry.with_overrides(&overrides).unwrap();
        assert_eq!(layered.lookup("p").mjml_tag, "mj-raw");
        assert_eq!(registry.lookup("p").mjml_tag, "mj-text");
    }
}
