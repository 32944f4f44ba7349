//! The `sync` command

use std::sync::Arc;

use colored::Colorize;

use gem_core::{
    GitVersionControl, MakepkgBuilder, RecipeOutcome, RecipeStatus, SyncEngine, SyncOptions,
    SyncReport,
};

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the sync command
///
/// Blocked and skipped recipes are reported but do not fail the command;
/// recipes that could not be processed do, as do failed builds and commits.
pub async fn run_sync(context: &Context, dry_run: bool, build: bool, commit: bool) -> Result<()> {
    let verb = if dry_run { "Checking" } else { "Synchronizing" };
    println!(
        "{} {} recipes under {}...",
        "=>".blue().bold(),
        verb,
        context.root.display()
    );

    let config = context.config.clone();
    let mut engine = SyncEngine::new(
        config.clone(),
        context.store(),
        context.index(),
        context.artifacts(),
    );
    if build {
        engine = engine.with_builder(Arc::new(MakepkgBuilder::new(
            config.makepkg_command.clone(),
            config.upload_command.clone(),
        )));
    }

    if commit {
        let vcs = GitVersionControl::discover(&context.root)?;
        tracing::debug!(workdir = %vcs.workdir().display(), "committing updates");
        engine = engine.with_version_control(Arc::new(vcs));
    }

    let options = SyncOptions { dry_run, build };
    let report = engine.sync_all(&context.probe(), &options).await?;

    for outcome in &report.outcomes {
        print_outcome(outcome, dry_run);
    }
    print_summary(&report, dry_run);

    if report.has_failures() {
        return Err(CliError::user(format!(
            "{} recipe(s) could not be processed",
            report.failed()
        )));
    }
    if report.build_failures() > 0 {
        return Err(CliError::user(format!(
            "{} package(s) failed to build or upload",
            report.build_failures()
        )));
    }
    if report.commit_failures() > 0 {
        return Err(CliError::user(format!(
            "{} recipe(s) could not be committed",
            report.commit_failures()
        )));
    }
    Ok(())
}

fn print_outcome(outcome: &RecipeOutcome, dry_run: bool) {
    let name = outcome.display_name();
    match &outcome.status {
        RecipeStatus::Updated { diff } => {
            let mut changes = Vec::new();
            if diff.version_changed {
                changes.push("new version");
            }
            if diff.deps_changed {
                changes.push("dependencies");
            }
            let tag = if dry_run { "WOULD UPDATE" } else { "UPDATED" };
            println!(
                "   {} {} ({})",
                tag.green().bold(),
                name.cyan(),
                changes.join(", ")
            );
            if let Some(patch) = &outcome.patch {
                for line in patch.lines() {
                    println!("      {}", colorize_patch_line(line));
                }
            }
        }
        RecipeStatus::Unchanged => {
            println!("   {} {}", "OK".green(), name.dimmed());
        }
        RecipeStatus::Blocked { reasons } => {
            println!("   {} {}", "BLOCKED".yellow().bold(), name.cyan());
            for reason in reasons {
                println!("      {} {}", "-".yellow(), reason);
            }
        }
        RecipeStatus::Skipped { reason } => {
            println!("   {} {}: {}", "SKIPPED".dimmed(), name, reason);
        }
        RecipeStatus::Failed { error } => {
            println!("   {} {}: {}", "FAILED".red().bold(), name.cyan(), error);
        }
    }
    if let Some(error) = &outcome.build_error {
        println!("      {} build: {}", "!".red(), error);
    }
    if let Some(error) = &outcome.commit_error {
        println!("      {} commit: {}", "!".red(), error);
    }
}

fn colorize_patch_line(line: &str) -> String {
    if line.starts_with("+++") || line.starts_with("---") {
        line.bold().to_string()
    } else if line.starts_with('+') {
        line.green().to_string()
    } else if line.starts_with('-') {
        line.red().to_string()
    } else if line.starts_with("@@") {
        line.cyan().to_string()
    } else {
        line.to_string()
    }
}

fn print_summary(report: &SyncReport, dry_run: bool) {
    println!();
    let label = if report.has_failures() {
        "DONE".yellow().bold()
    } else {
        "OK".green().bold()
    };
    println!("{} {}", label, report);
    if dry_run && report.updated() > 0 {
        println!("Run {} to apply.", "gembridge sync".cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_patch_line_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(colorize_patch_line("+pkgver=1.1"), "+pkgver=1.1");
        assert_eq!(colorize_patch_line(" unchanged"), " unchanged");
    }
}
