//! Shared configuration loader for html2mjml.
//!
//! `defaults/html2mjml.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`Html2MjmlConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use html2mjml::{ConversionOptions, ConvertError, ElementMapping, MappingRegistry, Transform};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/html2mjml.default.toml");

/// Top-level configuration consumed by html2mjml applications.
#[derive(Debug, Clone, Deserialize)]
pub struct Html2MjmlConfig {
    pub convert: ConvertConfig,
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub mappings: BTreeMap<String, MappingConfig>,
}

/// Mirrors [`ConversionOptions`], minus the per-call mappings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConvertConfig {
    pub validate_output: bool,
    pub preserve_class_names: bool,
    pub inline_styles: bool,
    pub wrap_content: bool,
    pub show_warnings: bool,
    pub validate_passthrough: bool,
    pub max_input_bytes: usize,
}

impl ConvertConfig {
    pub fn to_options(&self) -> ConversionOptions {
        ConversionOptions {
            validate_output: self.validate_output,
            preserve_class_names: self.preserve_class_names,
            inline_styles: self.inline_styles,
            custom_element_mappings: Default::default(),
            wrap_content: self.wrap_content,
            show_warnings: self.show_warnings,
            validate_passthrough: self.validate_passthrough,
        }
    }
}

/// Where to find the `mjml` executable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompilerConfig {
    pub search_path: bool,
    #[serde(default)]
    pub binary: Option<String>,
}

/// A declarative element mapping.
///
/// `attributes` are static values layered over the source element's attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MappingConfig {
    pub mjml_tag: String,
    #[serde(default)]
    pub self_closing: bool,
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub inline: bool,
    #[serde(default)]
    pub omit: bool,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl MappingConfig {
    pub fn to_mapping(&self) -> ElementMapping {
        let mut mapping = ElementMapping::new(self.mjml_tag.clone());
        if !self.attributes.is_empty() {
            let extra = self.attributes.clone();
            mapping = mapping.with_transform(move |source| {
                let mut attributes = source.clone();
                for (name, value) in &extra {
                    attributes.insert(name.clone(), value.clone());
                }
                Transform::Rewrite(attributes)
            });
        }
        if self.self_closing {
            mapping = mapping.self_closing();
        }
        if self.special {
            mapping = mapping.special();
        }
        if self.inline {
            mapping = mapping.inline();
        }
        if self.omit {
            mapping = mapping.omitted();
        }
        if let Some(container) = &self.container {
            mapping = mapping.with_children_container(container.clone());
        }
        if let Some(warning) = &self.warning {
            mapping = mapping.with_warning(warning.clone());
        }
        mapping
    }
}

impl Html2MjmlConfig {
    /// Register every configured mapping into `registry`.
    pub fn register_mappings(&self, registry: &mut MappingRegistry) -> Result<(), ConvertError> {
        for (tag, mapping) in &self.mappings {
            registry.register(tag, mapping.to_mapping())?;
        }
        Ok(())
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<Html2MjmlConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Html2MjmlConfig, ConfigError> {
    Loader::new().build()
}
