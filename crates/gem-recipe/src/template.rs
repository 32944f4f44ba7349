//! Fresh recipes for gem releases that have none yet.

use gem_index::GemRelease;

use crate::recipe::{Checksum, ChecksumKind, Recipe};

const DEFAULT_PACKAGE_BODY: &str = r#"package() {
  local _gemdir="$(ruby -e'puts Gem.default_dir')"
  gem install --ignore-dependencies --no-user-install -i "$pkgdir/$_gemdir" -n "$pkgdir/usr/bin" $_gemname-$pkgver.gem
  rm "$pkgdir/$_gemdir/cache/$_gemname-$pkgver.gem"
  for _license in LICENSE LICENSE.txt LICENSE.md MIT-LICENSE COPYING; do
    if [[ -f "$pkgdir/$_gemdir/gems/$_gemname-$pkgver/$_license" ]]; then
      install -D -m644 "$pkgdir/$_gemdir/gems/$_gemname-$pkgver/$_license" "$pkgdir/usr/share/licenses/$pkgname/$_license"
    fi
  done
}"#;

/// Settings that shape a newly created recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTemplate {
    pub prefix: String,
    /// Seed for `depends`; kept verbatim from then on.
    pub native_dependencies: Vec<String>,
    /// Base URL the `source=` array downloads from.
    pub download_url: String,
    pub checksum_kind: ChecksumKind,
}

impl Default for RecipeTemplate {
    fn default() -> Self {
        Self {
            prefix: "ruby".to_string(),
            native_dependencies: vec!["ruby".to_string()],
            download_url: gem_index::DEFAULT_RUBYGEMS_URL.to_string(),
            checksum_kind: ChecksumKind::Sha256,
        }
    }
}

impl Recipe {
    /// Build a recipe for `release` from scratch.
    ///
    /// `generated_dependencies` are the distro names of the release's
    /// resolved runtime dependencies; `checksum` is the artifact digest in
    /// `template.checksum_kind`.
    pub fn new_for_release(
        release: &GemRelease,
        slot: Option<&str>,
        generated_dependencies: Vec<String>,
        checksum: Option<String>,
        template: &RecipeTemplate,
    ) -> Self {
        let download_url = template.download_url.trim_end_matches('/');
        let mut recipe = Recipe::new(&template.prefix, &release.name, release.version.clone());
        recipe.slot = slot.map(str::to_string);
        recipe.description = summary_line(&release.summary);
        recipe.arch = arch_for(release);
        recipe.url = release
            .homepage
            .clone()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| format!("{download_url}/gems/{}", release.name));
        recipe.licenses = release.licenses.clone();
        recipe.native_dependencies = template.native_dependencies.clone();
        recipe.generated_dependencies = generated_dependencies;
        recipe.checksum = checksum.map(|value| Checksum::single(template.checksum_kind, value));
        recipe.extra_fields = vec![
            "options=(!emptydirs)".to_string(),
            format!("source=({download_url}/downloads/$_gemname-$pkgver.gem)"),
            "noextract=($_gemname-$pkgver.gem)".to_string(),
        ];
        recipe.package_body = DEFAULT_PACKAGE_BODY.to_string();
        recipe
    }

    /// Replace the metadata that follows upstream, leaving hand-maintained
    /// fields alone. Licenses are only taken when upstream declares some.
    pub fn refresh_from_release(&mut self, release: &GemRelease) {
        self.gem_version = release.version.clone();
        let summary = summary_line(&release.summary);
        if !summary.is_empty() {
            self.description = summary;
        }
        if let Some(homepage) = release.homepage.as_ref().filter(|h| !h.trim().is_empty()) {
            self.url = homepage.clone();
        }
        if !release.licenses.is_empty() {
            self.licenses = release.licenses.clone();
        }
        // a hand-written architecture list is left alone
        if self.arch == ["any"] || self.arch == ["x86_64"] {
            self.arch = arch_for(release);
        }
    }
}

fn arch_for(release: &GemRelease) -> Vec<String> {
    let arch = if release.has_extensions { "x86_64" } else { "any" };
    vec![arch.to_string()]
}

/// Collapse a gem summary onto one line without a trailing full stop.
fn summary_line(summary: &str) -> String {
    let joined = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    joined.trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gem_index::Version;

    #[test]
    fn test_summary_is_single_line() {
        assert_eq!(summary_line("A  gem\nfor things.\n"), "A gem for things");
    }

    #[test]
    fn test_new_recipe_defaults() {
        let mut release = GemRelease::new("foo", Version::parse("1.0").unwrap());
        release.summary = "Foo things.".to_string();
        let recipe = Recipe::new_for_release(
            &release,
            Some("1"),
            vec!["ruby-bar".to_string()],
            Some("abc".to_string()),
            &RecipeTemplate::default(),
        );

        assert_eq!(recipe.package_name(), "ruby-foo-1");
        assert_eq!(recipe.release, 1);
        assert_eq!(recipe.url, "https://rubygems.org/gems/foo");
        assert_eq!(recipe.depends(), vec!["ruby", "ruby-bar"]);
        assert_eq!(recipe.arch, vec!["any"]);
        assert!(recipe.package_body.starts_with("package() {"));
    }

    #[test]
    fn test_native_gem_is_architecture_specific() {
        let mut release = GemRelease::new("nokogiri", Version::parse("1.15.4").unwrap());
        release.has_extensions = true;
        let recipe =
            Recipe::new_for_release(&release, None, Vec::new(), None, &RecipeTemplate::default());

        assert_eq!(recipe.arch, vec!["x86_64"]);
    }

    #[test]
    fn test_refresh_follows_extensions_but_keeps_custom_arch() {
        let mut release = GemRelease::new("json", Version::parse("2.7.0").unwrap());
        release.has_extensions = true;

        let mut generated = Recipe::new("ruby", "json", Version::parse("2.6.0").unwrap());
        generated.refresh_from_release(&release);
        assert_eq!(generated.arch, vec!["x86_64"]);

        let mut custom = Recipe::new("ruby", "json", Version::parse("2.6.0").unwrap());
        custom.arch = vec!["x86_64".to_string(), "aarch64".to_string()];
        custom.refresh_from_release(&release);
        assert_eq!(custom.arch, vec!["x86_64", "aarch64"]);
    }
}
