//! [`Recipe`] -> PKGBUILD text.

use std::fmt::Write;

use crate::recipe::Recipe;
use crate::shell::{quote, quote_if_needed};

/// Render the canonical PKGBUILD text for `recipe`.
///
/// The output depends on nothing but the recipe value, and field order is
/// fixed, so re-rendering an unchanged recipe yields identical bytes.
pub fn render(recipe: &Recipe) -> String {
    let mut out = String::new();

    for comment in &recipe.header_comments {
        out.push_str(comment);
        out.push('\n');
    }
    for maintainer in &recipe.maintainers {
        let _ = writeln!(out, "# Maintainer: {maintainer}");
    }
    for contributor in &recipe.contributors {
        let _ = writeln!(out, "# Contributor: {contributor}");
    }
    if !out.is_empty() {
        out.push('\n');
    }

    let _ = writeln!(out, "_gemname={}", quote_if_needed(&recipe.gem_name));
    let slot = recipe
        .slot
        .as_deref()
        .map(|s| format!("-{s}"))
        .unwrap_or_default();
    let _ = writeln!(out, "pkgname={}-$_gemname{slot}", recipe.prefix);
    let _ = writeln!(out, "pkgver={}", recipe.gem_version);
    let _ = writeln!(out, "pkgrel={}", recipe.release);
    let _ = writeln!(out, "pkgdesc={}", quote(&recipe.description));
    let _ = writeln!(out, "arch=({})", array(&recipe.arch));
    let _ = writeln!(out, "url={}", quote(&recipe.url));
    let _ = writeln!(out, "license=({})", array(&recipe.licenses));
    let _ = writeln!(out, "depends=({})", array(recipe.depends()));

    for extra in &recipe.extra_fields {
        out.push_str(extra);
        out.push('\n');
    }

    if let Some(checksum) = &recipe.checksum {
        let values: Vec<String> = checksum.values.iter().map(|v| quote(v)).collect();
        let _ = writeln!(out, "{}=({})", checksum.kind.field(), values.join(" "));
    }

    if !recipe.package_body.is_empty() {
        out.push('\n');
        out.push_str(&recipe.package_body);
        out.push('\n');
    }

    out
}

fn array<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| quote_if_needed(item.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
