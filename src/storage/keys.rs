//! Key-space layout for heroes: `hero.<id>`.

pub const HERO_PREFIX: &str = "hero";
pub const SEPARATOR: char = '.';

/// Pattern matching every hero key during a scan
pub fn scan_pattern() -> String {
    format!("{}{}*", HERO_PREFIX, SEPARATOR)
}

pub fn hero_key(id: &str) -> String {
    format!("{}{}{}", HERO_PREFIX, SEPARATOR, id)
}

/// Recover the id from a scanned key. Keys outside the hero namespace yield `None`.
pub fn id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(HERO_PREFIX)?
        .strip_prefix(SEPARATOR)
        .filter(|id| !id.is_empty())
}
