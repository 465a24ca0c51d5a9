//! Write a starting setup file.

use clap::Args;
use oscmooth_config::{TEMPLATE_NAMES, get_template};
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Where to write the setup
    #[arg(value_name = "PATH", default_value = "oscmooth.toml")]
    path: PathBuf,

    /// Built-in template to start from
    #[arg(short, long, default_value = "example")]
    template: String,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    let Some(setup) = get_template(&args.template) else {
        anyhow::bail!(
            "Unknown template '{}'. Available: {}",
            args.template,
            TEMPLATE_NAMES.join(", ")
        );
    };

    if args.path.exists() && !args.force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite.",
            args.path.display()
        );
    }

    setup.save(&args.path)?;
    println!(
        "Wrote '{}' setup with {} parameters to {}",
        setup.name,
        setup.len(),
        args.path.display()
    );
    Ok(())
}
