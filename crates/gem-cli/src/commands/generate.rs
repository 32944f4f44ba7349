//! The `generate` command

use std::sync::Arc;

use colored::Colorize;

use gem_core::{Generator, GitIdentity, SyncEngine};

use crate::context::Context;
use crate::error::Result;

/// Create or regenerate the recipe for `gem`, pinned to `slot` if given.
pub async fn run_generate(context: &Context, gem: &str, slot: Option<&str>) -> Result<()> {
    let package = gem_index::distro_name(&context.config.distro_prefix, gem, slot);
    println!("{} Generating {}...", "=>".blue().bold(), package.cyan());

    let index = context.index();
    let artifacts = context.artifacts();
    let versions = SyncEngine::new(
        context.config.clone(),
        context.store(),
        index.clone(),
        artifacts.clone(),
    )
    .load_versions()
    .await?;

    let generator = Generator::new(
        context.config.clone(),
        context.store(),
        index,
        artifacts,
        Arc::new(GitIdentity),
    );
    let generated = generator
        .generate(gem, slot, &versions, &context.probe())
        .await?;

    for warning in &generated.warnings {
        println!("   {} {}", "WARN".yellow().bold(), warning);
    }

    let recipe = &generated.recipe;
    let verb = match &generated.diff {
        None => "Created",
        Some(diff) if diff.is_empty() => "Regenerated (no changes)",
        Some(_) => "Updated",
    };
    println!(
        "{} {} {} {}-{}",
        "OK".green().bold(),
        verb,
        recipe.package_name().cyan(),
        recipe.gem_version,
        recipe.release
    );
    println!("   recipe:   {}", generated.path.display());
    println!("   artifact: {}", generated.artifact_path.display());
    Ok(())
}
