//! The gemspec packed inside a `.gem` file.
//!
//! A `.gem` is an uncompressed tar holding `metadata.gz` (the gzipped YAML
//! specification), `data.tar.gz` and `checksums.yaml.gz`. The JSON API does
//! not say whether a gem compiles native code, so that is read from here.

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use serde_yaml::Value;

use crate::error::{Error, Result};

/// Archive member holding the specification.
pub const METADATA_ENTRY: &str = "metadata.gz";

/// The parts of a gem specification gembridge uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GemSpec {
    pub name: String,
    pub version: String,
    /// Build scripts such as `ext/nokogiri/extconf.rb`.
    pub extensions: Vec<String>,
}

impl GemSpec {
    /// Read the specification out of `.gem` bytes; `artifact` labels errors.
    pub fn from_gem(artifact: &str, bytes: &[u8]) -> Result<Self> {
        let mut archive = tar::Archive::new(bytes);
        let entries = archive.entries().map_err(|e| Error::gemspec(artifact, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| Error::gemspec(artifact, e))?;
            let is_metadata = entry
                .path()
                .is_ok_and(|p| p.as_ref() == Path::new(METADATA_ENTRY));
            if !is_metadata {
                continue;
            }

            let mut yaml = String::new();
            GzDecoder::new(entry)
                .read_to_string(&mut yaml)
                .map_err(|e| Error::gemspec(artifact, e))?;
            return Self::from_yaml(artifact, &yaml);
        }

        Err(Error::gemspec(artifact, format!("no {METADATA_ENTRY} entry")))
    }

    /// Parse the YAML dump RubyGems writes (`--- !ruby/object:Gem::Specification`).
    pub fn from_yaml(artifact: &str, yaml: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(yaml).map_err(|e| Error::gemspec(artifact, e))?;
        let spec = untagged(&document);
        if !spec.is_mapping() {
            return Err(Error::gemspec(artifact, "specification is not a mapping"));
        }

        let text = |value: Option<&Value>| match value.map(untagged) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        // Gem::Version dumps as a tagged mapping with its own `version` key
        let version = spec.get("version").map(untagged);
        let version = match version {
            Some(v) if v.is_mapping() => text(v.get("version")),
            other => text(other),
        };

        let extensions = match spec.get("extensions").map(untagged) {
            Some(Value::Sequence(items)) => items
                .iter()
                .filter_map(|item| untagged(item).as_str())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            name: text(spec.get("name")),
            version,
            extensions,
        })
    }

    /// Whether the gem compiles native code at install time.
    pub fn has_extensions(&self) -> bool {
        !self.extensions.is_empty()
    }
}

fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}
