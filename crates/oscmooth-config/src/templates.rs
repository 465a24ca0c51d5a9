//! Built-in setup templates.

use oscmooth_core::ParameterSpec;

use crate::setup::Setup;

/// Names of all built-in templates.
pub const TEMPLATE_NAMES: &[&str] = &["example", "face", "locomotion"];

/// Mixed example: one smoothed float and one signed 3-bit parameter.
pub fn example_setup() -> Setup {
    Setup::new("Example")
        .with_description("One smoothed float and one quantized parameter")
        .with_parameter(ParameterSpec::new("Smile").with_smoothness(0.8, 0.5))
        .with_parameter(
            ParameterSpec::new("Jump")
                .with_smoothness(0.6, 0.8)
                .with_quantization(3, true),
        )
}

fn face_setup() -> Setup {
    Setup::new("Face")
        .with_description("Light local smoothing for facial tracking")
        .with_parameter(ParameterSpec::new("FT/EyeLidLeft").with_smoothness(0.5, 0.7))
        .with_parameter(ParameterSpec::new("FT/EyeLidRight").with_smoothness(0.5, 0.7))
        .with_parameter(ParameterSpec::new("FT/JawOpen").with_quantization(4, false))
        .with_parameter(ParameterSpec::new("FT/MouthSmile").with_quantization(4, true))
}

fn locomotion_setup() -> Setup {
    Setup::new("Locomotion")
        .with_description("Heavy remote smoothing to hide transport jitter")
        .with_obfuscation(true)
        .with_parameter(ParameterSpec::new("VelocityX").with_smoothness(0.2, 0.9))
        .with_parameter(ParameterSpec::new("VelocityZ").with_smoothness(0.2, 0.9))
}

/// Get a built-in template by name (case-insensitive).
pub fn get_template(name: &str) -> Option<Setup> {
    match name.to_ascii_lowercase().as_str() {
        "example" => Some(example_setup()),
        "face" => Some(face_setup()),
        "locomotion" => Some(locomotion_setup()),
        _ => None,
    }
}

/// Check whether `name` is a built-in template.
pub fn is_template(name: &str) -> bool {
    get_template(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_setup;

    #[test]
    fn test_every_template_is_valid() {
        for name in TEMPLATE_NAMES {
            let setup = get_template(name).unwrap();
            assert!(validate_setup(&setup).is_ok(), "template '{name}' invalid");
            assert!(!setup.is_empty());
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(is_template("FACE"));
        assert!(!is_template("unknown"));
    }
}
