//! Setup files for oscmooth parameter compilation.
//!
//! This crate provides the on-disk configuration surface of oscmooth: TOML
//! setup files holding the compile options and the ordered parameter list,
//! plus validation that reports every problem in a setup at once.
//!
//! # Features
//!
//! - **Setups**: Load and save [`Setup`] files from TOML
//! - **Validation**: Aggregate range, width, naming and budget errors
//! - **Templates**: Built-in starting points for `oscmooth init`
//!
//! # Example
//!
//! ```rust,no_run
//! use oscmooth_config::{Setup, validate_setup};
//! use oscmooth_core::ParameterSpec;
//!
//! let setup = Setup::new("Face")
//!     .with_parameter(ParameterSpec::new("Smile").with_smoothness(0.8, 0.5))
//!     .with_parameter(ParameterSpec::new("Jump").with_quantization(3, true));
//! validate_setup(&setup).unwrap();
//! setup.save("face.toml").unwrap();
//!
//! let loaded = Setup::load("face.toml").unwrap();
//! assert_eq!(loaded, setup);
//! ```

mod error;
mod setup;

/// Setup validation.
pub mod validation;

/// Built-in setup templates.
pub mod templates;

pub use error::ConfigError;
pub use setup::Setup;
pub use templates::{TEMPLATE_NAMES, example_setup, get_template, is_template};
pub use validation::{ValidationError, ValidationResult, validate_parameter, validate_setup};
