use std::collections::BTreeSet;
use std::path::Path;

use plist;
use xattr;

use error::*;

/// Finder tags, stored by macOS as a property list of `"Name\n<color>"` strings.
const FINDER_TAGS_ATTRIBUTE: &str = "com.apple.metadata:_kMDItemUserTags";
/// freedesktop.org tags, a comma separated list.
const XDG_TAGS_ATTRIBUTE: &str = "user.xdg.tags";

pub trait TagReader {
    fn read_tags(&self, path: &Path) -> Result<BTreeSet<String>>;
}

/// Reads tags from the file's extended attributes.
pub struct XattrTagReader;

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
#[derive(Debug, Clone, Copy)]
enum TagAttribute {
    Finder,
    Xdg,
}

// Linux refuses attribute names outside its namespaces, so the Finder attribute is only
// worth asking for on macOS.
#[cfg(target_os = "macos")]
const TAG_ATTRIBUTES: &[TagAttribute] = &[TagAttribute::Finder, TagAttribute::Xdg];
#[cfg(not(target_os = "macos"))]
const TAG_ATTRIBUTES: &[TagAttribute] = &[TagAttribute::Xdg];

impl TagAttribute {
    fn name(&self) -> &'static str {
        match *self {
            TagAttribute::Finder => FINDER_TAGS_ATTRIBUTE,
            TagAttribute::Xdg => XDG_TAGS_ATTRIBUTE,
        }
    }

    fn decode(&self, raw: &[u8]) -> Result<Vec<String>> {
        match *self {
            TagAttribute::Finder => decode_finder_tags(raw),
            TagAttribute::Xdg => Ok(decode_xdg_tags(raw)),
        }
    }
}

impl TagReader for XattrTagReader {
    fn read_tags(&self, path: &Path) -> Result<BTreeSet<String>> {
        let mut tags = BTreeSet::new();
        for attribute in TAG_ATTRIBUTES {
            let raw = xattr::get(path, attribute.name()).chain_err(|| {
                format!("Unable to read attribute {} of {}", attribute.name(), path.to_string_lossy())
            })?;
            if let Some(raw) = raw {
                tags.extend(attribute.decode(&raw)?);
            }
        }
        Ok(tags)
    }
}

pub fn decode_finder_tags(raw: &[u8]) -> Result<Vec<String>> {
    let entries: Vec<String> = plist::from_bytes(raw).chain_err(|| "Finder tags are not a list of strings")?;
    Ok(entries
        .iter()
        .filter_map(|entry| entry.split('\n').next())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .collect())
}

pub fn decode_xdg_tags(raw: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .split(',')
        .map(|tag| tag.trim_matches(|c: char| c.is_whitespace() || c == '\0'))
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.to_string())
        .collect()
}
