//! Shared CLI helpers used across multiple commands.

use anyhow::Context as _;
use indicatif::{ProgressBar, ProgressStyle};
use oscmooth_config::{Setup, get_template, validate_setup};
use oscmooth_core::{HostGraph, Progress};
use std::path::{Path, PathBuf};

/// Load a setup by template name or path, and validate it.
///
/// Searches in this order:
/// 1. File path (if the file exists)
/// 2. Built-in templates (by name)
pub fn load_setup(name: &Path) -> anyhow::Result<Setup> {
    let setup = if name.exists() {
        Setup::load(name)?
    } else if let Some(template) = name.to_str().and_then(get_template) {
        template
    } else {
        anyhow::bail!(
            "Setup '{}' not found. Use 'oscmooth init' to create one.",
            name.display()
        );
    };
    validate_setup(&setup).with_context(|| format!("invalid setup '{}'", name.display()))?;
    Ok(setup)
}

/// Read a host graph document (JSON).
pub fn load_graph(path: &Path) -> anyhow::Result<HostGraph> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read graph '{}'", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse graph '{}'", path.display()))
}

/// Write a host graph document (JSON), pretty-printed.
pub fn save_graph(graph: &HostGraph, path: &Path) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(graph)?;
    std::fs::write(path, content + "\n")
        .with_context(|| format!("failed to write graph '{}'", path.display()))
}

/// Output path: `output` if given, otherwise the input file is rewritten.
pub fn output_path(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| input.to_path_buf())
}

/// Progress bar over the parameters of one compilation.
pub struct CompileProgress {
    bar: ProgressBar,
}

impl CompileProgress {
    /// Creates a hidden bar; it becomes visible on [`Progress::start`].
    pub fn new() -> anyhow::Result<Self> {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("##-"),
        );
        Ok(Self { bar })
    }
}

impl Progress for CompileProgress {
    fn start(&mut self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn parameter(&mut self, name: &str) {
        self.bar.set_message(name.to_string());
        self.bar.inc(1);
    }

    fn finish(&mut self) {
        self.bar.finish_with_message("done");
    }
}
