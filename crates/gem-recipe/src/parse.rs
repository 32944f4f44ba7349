//! PKGBUILD text -> [`Recipe`].
//!
//! The parser understands the flat assignment style every generated recipe
//! uses: `name=value` and `name=( ... )` (arrays may span lines), leading
//! `# Maintainer:` / `# Contributor:` tags, and a trailing block of shell
//! functions which is carried verbatim.

use std::sync::LazyLock;

use gem_index::Version;
use regex::Regex;

use crate::error::{Error, Result};
use crate::recipe::{Checksum, ChecksumKind, Recipe};
use crate::shell::split_words;

static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)=(.*)$").unwrap());

static FUNCTION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:function\s+)?[A-Za-z_][A-Za-z0-9_]*\s*\(\s*\)").unwrap()
});

static PERSON_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*(Maintainer|Contributor)\s*:\s*(.*?)\s*$").unwrap());

static PKGNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>.+?)-(?:\$_gemname|\$\{_gemname\})(?:-(?P<slot>.+))?$").unwrap()
});

const DEFAULT_PREFIX: &str = "ruby";

/// One logical statement of the variable section.
struct Statement {
    name: String,
    value: String,
    raw: String,
}

#[derive(Default)]
struct Fields {
    gem_name: Option<String>,
    pkgname: Option<String>,
    version: Option<String>,
    release: Option<String>,
    description: Option<String>,
    arch: Option<Vec<String>>,
    url: Option<String>,
    licenses: Option<Vec<String>>,
    depends: Option<Vec<String>>,
    checksum: Option<Checksum>,
}

/// Parse recipe text.
///
/// Fails with [`Error::MalformedRecipe`] when any of `_gemname`, `pkgname`,
/// `pkgver`, `pkgrel` or `depends` is missing, or when a managed value
/// cannot be understood.
pub fn parse(text: &str) -> Result<Recipe> {
    let lines: Vec<&str> = text.lines().collect();
    let body_start = lines
        .iter()
        .position(|line| FUNCTION_START.is_match(line))
        .unwrap_or(lines.len());

    let mut maintainers = Vec::new();
    let mut contributors = Vec::new();
    let mut header_comments = Vec::new();
    let mut extra_fields = Vec::new();
    let mut fields = Fields::default();
    let mut seen_assignment = false;

    let mut index = 0;
    while index < body_start {
        let line = lines[index];
        let trimmed = line.trim();
        index += 1;

        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('#') {
            if let Some(caps) = PERSON_TAG.captures(trimmed) {
                let who = caps[2].to_string();
                match &caps[1] {
                    "Maintainer" => maintainers.push(who),
                    _ => contributors.push(who),
                }
            } else if seen_assignment {
                extra_fields.push(line.to_string());
            } else {
                header_comments.push(trimmed.to_string());
            }
            continue;
        }

        let Some(caps) = ASSIGNMENT.captures(trimmed) else {
            tracing::debug!(line = index, "keeping unrecognised statement verbatim");
            extra_fields.push(line.to_string());
            continue;
        };
        seen_assignment = true;

        let name = caps[1].to_string();
        let mut value = caps[2].to_string();
        let mut raw = line.to_string();

        if value.starts_with('(') {
            while !array_closed(&value) {
                if index >= body_start {
                    return Err(Error::malformed(format!("unterminated array '{name}'")));
                }
                value.push('\n');
                value.push_str(lines[index]);
                raw.push('\n');
                raw.push_str(lines[index]);
                index += 1;
            }
        }

        let statement = Statement { name, value, raw };
        if let Some(extra) = fields.absorb(statement)? {
            extra_fields.push(extra);
        }
    }

    let package_body = lines[body_start..].join("\n").trim_end().to_string();
    fields.into_recipe(RecipeParts {
        maintainers,
        contributors,
        header_comments,
        extra_fields,
        package_body,
    })
}

struct RecipeParts {
    maintainers: Vec<String>,
    contributors: Vec<String>,
    header_comments: Vec<String>,
    extra_fields: Vec<String>,
    package_body: String,
}

impl Fields {
    /// Record a managed field; unmanaged statements are handed back verbatim.
    fn absorb(&mut self, statement: Statement) -> Result<Option<String>> {
        let Statement { name, value, raw } = statement;
        match name.as_str() {
            "_gemname" => self.gem_name = Some(scalar(&value)),
            "pkgname" => self.pkgname = Some(scalar(&value)),
            "pkgver" => self.version = Some(scalar(&value)),
            "pkgrel" => self.release = Some(scalar(&value)),
            "pkgdesc" => self.description = Some(scalar(&value)),
            "url" => self.url = Some(scalar(&value)),
            "arch" => self.arch = Some(array(&name, &value)?),
            "license" => self.licenses = Some(array(&name, &value)?),
            "depends" => self.depends = Some(array(&name, &value)?),
            other => match ChecksumKind::from_field(other) {
                Some(kind) if self.checksum.is_none() => {
                    self.checksum = Some(Checksum {
                        kind,
                        values: array(&name, &value)?,
                    });
                }
                _ => return Ok(Some(raw)),
            },
        }
        Ok(None)
    }

    fn into_recipe(self, parts: RecipeParts) -> Result<Recipe> {
        let gem_name = required(self.gem_name, "_gemname")?;
        let pkgname = required(self.pkgname, "pkgname")?;
        let version = required(self.version, "pkgver")?;
        let release = required(self.release, "pkgrel")?;
        let depends = required(self.depends, "depends")?;

        if gem_name.is_empty() {
            return Err(Error::malformed("_gemname is empty"));
        }
        let (prefix, slot) = split_pkgname(&pkgname, &gem_name)?;

        let gem_version = Version::parse(&version)
            .map_err(|e| Error::malformed(format!("pkgver: {e}")))?;
        let release: u32 = release
            .parse()
            .ok()
            .filter(|r| *r >= 1)
            .ok_or_else(|| Error::malformed(format!("pkgrel '{release}' is not a positive integer")))?;

        let namespace = format!("{prefix}-");
        let (generated_dependencies, native_dependencies): (Vec<String>, Vec<String>) = depends
            .into_iter()
            .partition(|entry: &String| entry.starts_with(&namespace));

        Ok(Recipe {
            gem_name,
            gem_version,
            release,
            slot,
            prefix,
            description: self.description.unwrap_or_default(),
            arch: self.arch.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            licenses: self.licenses.unwrap_or_default(),
            native_dependencies,
            generated_dependencies,
            checksum: self.checksum,
            maintainers: parts.maintainers,
            contributors: parts.contributors,
            header_comments: parts.header_comments,
            extra_fields: parts.extra_fields,
            package_body: parts.package_body,
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::malformed(format!("missing required field '{field}'")))
}

fn scalar(value: &str) -> String {
    split_words(value).join(" ")
}

fn array(name: &str, value: &str) -> Result<Vec<String>> {
    let inner = value
        .trim()
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .ok_or_else(|| Error::malformed(format!("'{name}' must be an array")))?;
    Ok(split_words(inner))
}

/// True once `value` holds its closing `)` outside of any quotes.
fn array_closed(value: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in value.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some('\''), '\'') => quote = None,
            (Some('\''), _) => {}
            (_, '\\') => escaped = true,
            (Some('"'), '"') => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return true;
                }
            }
            (None, _) => {}
        }
    }
    false
}

/// `ruby-$_gemname-2.1` -> (`ruby`, Some(`2.1`)). A literal package name
/// such as `ruby-foo-2.1` is accepted too.
fn split_pkgname(pkgname: &str, gem_name: &str) -> Result<(String, Option<String>)> {
    if let Some(caps) = PKGNAME.captures(pkgname) {
        let slot = caps.name("slot").map(|m| m.as_str().to_string());
        return Ok((caps["prefix"].to_string(), slot));
    }

    let marker = format!("-{gem_name}");
    if let Some(at) = pkgname.find(&marker) {
        let prefix = &pkgname[..at];
        let rest = &pkgname[at + marker.len()..];
        let slot = match rest {
            "" => None,
            r if r.starts_with('-') && r.len() > 1 => Some(r[1..].to_string()),
            _ => return Err(Error::malformed(format!("pkgname '{pkgname}' does not name {gem_name}"))),
        };
        if !prefix.is_empty() {
            return Ok((prefix.to_string(), slot));
        }
    }

    if pkgname == gem_name {
        return Ok((DEFAULT_PREFIX.to_string(), None));
    }
    Err(Error::malformed(format!(
        "pkgname '{pkgname}' does not name {gem_name}"
    )))
}
