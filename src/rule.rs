use scanner::DirectoryEntry;

/// Selects the entries carrying a tag. Matching is exact and case sensitive.
#[derive(Debug)]
pub struct TagRule {
    tag: String,
}

impl TagRule {
    pub fn new(tag: &str) -> TagRule {
        TagRule { tag: tag.to_string() }
    }

    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        entry.tags.contains(&self.tag)
    }
}
