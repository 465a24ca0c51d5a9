//! Setup validation.
//!
//! Checks a [`Setup`] the way a compilation would, but collects every
//! problem instead of stopping at the first one, so a user editing a setup
//! file sees the whole list at once.
//!
//! # Example
//!
//! ```rust
//! use oscmooth_config::{Setup, validate_setup};
//! use oscmooth_core::ParameterSpec;
//!
//! let setup = Setup::new("Face").with_parameter(ParameterSpec::new("Smile"));
//! validate_setup(&setup).expect("setup should be valid");
//! ```

use std::collections::HashSet;

use oscmooth_core::{MAX_QUANTIZATION_BITS, ParameterSpec, total_cost};
use thiserror::Error;

use crate::setup::Setup;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The namespace root is empty.
    #[error("namespace must not be empty")]
    EmptyNamespace,

    /// The namespace root contains a hierarchy separator.
    #[error("namespace '{0}' must not contain '/'")]
    NamespaceSeparator(String),

    /// A parameter has an empty name.
    #[error("parameter #{index} has an empty name")]
    EmptyName {
        /// Position in the parameter list.
        index: usize,
    },

    /// A parameter name is listed twice.
    #[error("parameter '{0}' is listed more than once")]
    DuplicateParameter(String),

    /// A parameter name collides with the namespace root.
    #[error("parameter '{param}' contains the namespace '{namespace}'")]
    ReservedName {
        /// Name of the parameter.
        param: String,
        /// Namespace root.
        namespace: String,
    },

    /// Smoothing coefficient out of range.
    #[error("parameter '{param}' {field} {value} out of range [0, 1]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// Field holding the value.
        field: &'static str,
        /// The value that was out of range.
        value: f32,
    },

    /// Quantization width above the supported maximum.
    #[error("parameter '{param}' requests {bits} quantization bits (maximum is {max})")]
    QuantizationWidth {
        /// Name of the parameter.
        param: String,
        /// Requested width.
        bits: u8,
        /// Maximum width.
        max: u8,
    },

    /// The parameter list does not fit the fixed capacity.
    #[error("parameters use {used} units of synced capacity but only {capacity} are available")]
    OverBudget {
        /// Total cost.
        used: u32,
        /// Fixed capacity.
        capacity: u32,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validate a single parameter in isolation.
pub fn validate_parameter(index: usize, spec: &ParameterSpec) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if spec.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName { index });
    }
    for (field, value) in [
        ("local_smoothness", spec.local_smoothness),
        ("remote_smoothness", spec.remote_smoothness),
    ] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            errors.push(ValidationError::OutOfRange {
                param: spec.name.clone(),
                field,
                value,
            });
        }
    }
    if spec.quantization_bits > MAX_QUANTIZATION_BITS {
        errors.push(ValidationError::QuantizationWidth {
            param: spec.name.clone(),
            bits: spec.quantization_bits,
            max: MAX_QUANTIZATION_BITS,
        });
    }

    collect(errors)
}

/// Validate a setup's options and parameters.
///
/// The budget is checked only when the setup fixes a capacity; otherwise it
/// depends on the host graph and is left to the compiler.
pub fn validate_setup(setup: &Setup) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if setup.namespace.is_empty() {
        errors.push(ValidationError::EmptyNamespace);
    } else if setup.namespace.contains('/') {
        errors.push(ValidationError::NamespaceSeparator(setup.namespace.clone()));
    }

    let mut seen = HashSet::new();
    for (index, spec) in setup.parameters.iter().enumerate() {
        match validate_parameter(index, spec) {
            Ok(()) => {}
            Err(ValidationError::Multiple(inner)) => errors.extend(inner),
            Err(e) => errors.push(e),
        }
        if !spec.name.is_empty() && !seen.insert(spec.name.as_str()) {
            errors.push(ValidationError::DuplicateParameter(spec.name.clone()));
        }
        if !setup.namespace.is_empty() && spec.name.contains(setup.namespace.as_str()) {
            errors.push(ValidationError::ReservedName {
                param: spec.name.clone(),
                namespace: setup.namespace.clone(),
            });
        }
    }

    if let Some(capacity) = setup.capacity {
        let used = total_cost(&setup.parameters);
        if used > capacity {
            errors.push(ValidationError::OverBudget { used, capacity });
        }
    }

    collect(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_setup() {
        let setup = Setup::new("Face")
            .with_capacity(12)
            .with_parameter(ParameterSpec::new("Smile"))
            .with_parameter(ParameterSpec::new("Jump").with_quantization(3, true));
        assert!(validate_setup(&setup).is_ok());
    }

    #[test]
    fn test_single_error_is_not_wrapped() {
        let setup = Setup::new("Face").with_parameter(ParameterSpec::new("Smile").with_quantization(9, false));
        assert_eq!(
            validate_setup(&setup),
            Err(ValidationError::QuantizationWidth {
                param: "Smile".to_string(),
                bits: 9,
                max: 7,
            })
        );
    }

    #[test]
    fn test_errors_are_aggregated() {
        let setup = Setup::new("Face")
            .with_capacity(8)
            .with_parameter(ParameterSpec::new("Smile").with_smoothness(1.5, -0.1))
            .with_parameter(ParameterSpec::new("Smile"))
            .with_parameter(ParameterSpec::new(""));
        let Err(ValidationError::Multiple(errors)) = validate_setup(&setup) else {
            panic!("expected multiple errors");
        };
        assert!(errors.contains(&ValidationError::DuplicateParameter("Smile".to_string())));
        assert!(errors.contains(&ValidationError::EmptyName { index: 2 }));
        assert!(errors.contains(&ValidationError::OverBudget { used: 24, capacity: 8 }));
        let out_of_range = errors
            .iter()
            .filter(|e| matches!(e, ValidationError::OutOfRange { .. }))
            .count();
        assert_eq!(out_of_range, 2);
    }

    #[test]
    fn test_namespace_rules() {
        let setup = Setup::new("Face").with_namespace("");
        assert_eq!(validate_setup(&setup), Err(ValidationError::EmptyNamespace));

        let setup = Setup::new("Face").with_namespace("a/b");
        assert!(matches!(validate_setup(&setup), Err(ValidationError::NamespaceSeparator(_))));

        let setup = Setup::new("Face").with_parameter(ParameterSpec::new("OSCm/Proxy/Smile"));
        assert!(matches!(validate_setup(&setup), Err(ValidationError::ReservedName { .. })));
    }

    #[test]
    fn test_multiple_display_joins_messages() {
        let err = ValidationError::Multiple(vec![
            ValidationError::EmptyNamespace,
            ValidationError::DuplicateParameter("A".to_string()),
        ]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: namespace must not be empty; parameter 'A' is listed more than once"
        );
    }
}
