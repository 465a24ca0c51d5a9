//! Setup file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use oscmooth_core::{CompileOptions, DEFAULT_NAMESPACE, ParameterSpec};

use crate::error::ConfigError;

/// Setup file describing one compilation.
///
/// A setup holds the compile options shared by every parameter plus the
/// ordered parameter list. Order matters: it is the order channels and
/// filters are generated in.
///
/// # TOML Format
///
/// ```toml
/// name = "Face"
/// description = "Facial expression smoothing"
/// namespace = "OSCm"
/// obfuscate_bits = false
/// capacity = 256
///
/// [[parameters]]
/// name = "Smile"
/// local_smoothness = 0.8
/// remote_smoothness = 0.5
///
/// [[parameters]]
/// name = "Jump"
/// quantization_bits = 3
/// use_sign_bit = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Setup {
    /// Name of the setup.
    pub name: String,

    /// Optional description of the setup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Namespace root and synthesis tag (defaults to `OSCm`).
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Obfuscate the names of synced bit channels.
    #[serde(default)]
    pub obfuscate_bits: bool,

    /// Fixed synced capacity. When absent, the capacity left in the host
    /// graph is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,

    /// Parameters to compile, in order.
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Setup {
    /// Create a new empty setup.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            namespace: default_namespace(),
            obfuscate_bits: false,
            capacity: None,
            parameters: Vec::new(),
        }
    }

    /// Create a setup with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the namespace root.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Enable or disable bit channel obfuscation.
    pub fn with_obfuscation(mut self, enabled: bool) -> Self {
        self.obfuscate_bits = enabled;
        self
    }

    /// Fix the synced capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Add a parameter to the setup.
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Load a setup from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let setup: Setup = toml::from_str(&content)?;
        Ok(setup)
    }

    /// Load a setup from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the setup to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the setup to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the number of parameters in the setup.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Check if the setup is empty.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Result<&ParameterSpec, ConfigError> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::ParameterNotFound(name.to_string()))
    }

    /// Compile options for this setup, using `available` when no capacity is
    /// fixed.
    pub fn compile_options(&self, available: u32) -> CompileOptions {
        CompileOptions::new()
            .with_namespace(self.namespace.as_str())
            .with_obfuscation(self.obfuscate_bits)
            .with_capacity(self.capacity.unwrap_or(available))
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_defaults() {
        let setup = Setup::new("Face");
        assert_eq!(setup.namespace, "OSCm");
        assert!(!setup.obfuscate_bits);
        assert!(setup.capacity.is_none());
        assert!(setup.is_empty());
    }

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let setup = Setup::from_toml(
            r#"
            name = "Face"

            [[parameters]]
            name = "Smile"
            "#,
        )
        .unwrap();
        assert_eq!(setup.len(), 1);
        let smile = setup.parameter("Smile").unwrap();
        assert_eq!(smile.local_smoothness, 0.5);
        assert_eq!(smile.remote_smoothness, 0.7);
        assert_eq!(smile.quantization_bits, 0);
        assert!(smile.use_proxy_rename);
    }

    #[test]
    fn test_toml_roundtrip() {
        let setup = Setup::new("Face")
            .with_description("expressions")
            .with_capacity(64)
            .with_parameter(ParameterSpec::new("Smile").with_smoothness(0.8, 0.5))
            .with_parameter(ParameterSpec::new("Jump").with_quantization(3, true));
        let toml = setup.to_toml().unwrap();
        assert_eq!(Setup::from_toml(&toml).unwrap(), setup);
    }

    #[test]
    fn test_missing_parameter() {
        let setup = Setup::new("Face");
        assert!(matches!(
            setup.parameter("Smile"),
            Err(ConfigError::ParameterNotFound(name)) if name == "Smile"
        ));
    }

    #[test]
    fn test_compile_options_capacity_fallback() {
        let setup = Setup::new("Face").with_namespace("Gen").with_obfuscation(true);
        let options = setup.compile_options(200);
        assert_eq!(options.capacity, 200);
        assert_eq!(options.names.root(), "Gen");
        assert!(options.obfuscate_bits);
        assert_eq!(setup.with_capacity(10).compile_options(200).capacity, 10);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Setup::from_toml("name = "),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
