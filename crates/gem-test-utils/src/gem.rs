//! Minimal `.gem` archives for artifact fixtures.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

/// A `.gem` holding only `metadata.gz`, with `extensions` listed in the spec.
///
/// Byte-for-byte deterministic, so digests of it can be precomputed.
pub fn gem_archive(name: &str, version: &str, extensions: &[&str]) -> Vec<u8> {
    let extensions = if extensions.is_empty() {
        " []\n".to_string()
    } else {
        extensions.iter().map(|e| format!("\n- {e}")).collect::<String>() + "\n"
    };
    let spec = format!(
        "--- !ruby/object:Gem::Specification\n\
         name: {name}\n\
         version: !ruby/object:Gem::Version\n  version: '{version}'\n\
         platform: ruby\n\
         summary: The {name} gem\n\
         extensions:{extensions}"
    );

    let mut gz = GzEncoder::new(Vec::new(), Compression::default());
    gz.write_all(spec.as_bytes()).unwrap();
    let metadata = gz.finish().unwrap();

    let mut header = tar::Header::new_gnu();
    header.set_size(metadata.len() as u64);
    header.set_mode(0o444);
    header.set_mtime(0);
    header.set_cksum();

    let mut builder = tar::Builder::new(Vec::new());
    builder
        .append_data(&mut header, gem_core::gemspec::METADATA_ENTRY, metadata.as_slice())
        .unwrap();
    builder.into_inner().unwrap()
}
