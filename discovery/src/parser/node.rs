//! Parsed VDF tree.

/// A value in a VDF document: a string leaf or a nested section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VdfNode {
    Value(String),
    Section(VdfSection),
}

impl VdfNode {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            Self::Section(_) => None,
        }
    }

    pub fn as_section(&self) -> Option<&VdfSection> {
        match self {
            Self::Section(section) => Some(section),
            Self::Value(_) => None,
        }
    }
}

impl From<&str> for VdfNode {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<String> for VdfNode {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl From<VdfSection> for VdfNode {
    fn from(section: VdfSection) -> Self {
        Self::Section(section)
    }
}

/// An ordered key/value mapping delimited by braces.
///
/// Keys are unique. Inserting an existing key replaces its value but keeps
/// the position of the first insertion.
///
/// # Examples
///
/// ```
/// use launcher_sync_discovery::parser::{VdfNode, VdfSection};
///
/// let mut section = VdfSection::new();
/// section.insert("appid", "440");
/// section.insert("name", "Team Fortress 2");
/// section.insert("appid", "441");
///
/// assert_eq!(section.len(), 2);
/// assert_eq!(section.get_str("appid"), Some("441"));
/// assert_eq!(section.keys().collect::<Vec<_>>(), vec!["appid", "name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VdfSection {
    entries: Vec<(String, VdfNode)>,
}

impl VdfSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`, returning the entry's position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<VdfNode>) -> usize {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(index) => {
                self.entries[index].1 = value;
                index
            }
            None => {
                self.entries.push((key, value));
                self.entries.len() - 1
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&VdfNode> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, node)| node)
    }

    /// Returns the string value under `key`, or `None` if absent or a section.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(VdfNode::as_str)
    }

    /// Returns the section under `key`, or `None` if absent or a plain value.
    pub fn get_section(&self, key: &str) -> Option<&VdfSection> {
        self.get(key).and_then(VdfNode::as_section)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VdfNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Iterates child sections in document order, skipping plain values.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &VdfSection)> {
        self.entries
            .iter()
            .filter_map(|(key, node)| node.as_section().map(|section| (key.as_str(), section)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(super) fn replace_at(&mut self, index: usize, node: VdfNode) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.1 = node;
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_replaced_by_section_keeps_position() {
        let mut section = VdfSection::new();
        section.insert("a", "1");
        section.insert("b", "2");
        section.insert("a", VdfSection::new());

        assert_eq!(section.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(section.get_section("a").is_some());
        assert_eq!(section.get_str("a"), None);
    }

    #[test]
    fn test_sections_skips_plain_values() {
        let mut child = VdfSection::new();
        child.insert("path", "/games");

        let mut section = VdfSection::new();
        section.insert("contentstatsid", "123");
        section.insert("0", child.clone());

        let sections: Vec<_> = section.sections().collect();
        assert_eq!(sections, vec![("0", &child)]);
    }
}
