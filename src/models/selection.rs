use serde::{Deserialize, Serialize};

/// Set of selected region ids. Insertion order is kept for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SelectedRegionSet {
    ids: Vec<String>,
}

impl SelectedRegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `region_id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, region_id: &str) -> bool {
        if let Some(position) = self.ids.iter().position(|id| id == region_id) {
            self.ids.remove(position);
            false
        } else {
            self.ids.push(region_id.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, region_id: &str) -> bool {
        self.ids.iter().any(|id| id == region_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }
}

impl From<Vec<String>> for SelectedRegionSet {
    fn from(ids: Vec<String>) -> Self {
        let mut set = SelectedRegionSet::new();
        for id in ids {
            if !set.contains(&id) {
                set.ids.push(id);
            }
        }
        set
    }
}

impl From<SelectedRegionSet> for Vec<String> {
    fn from(set: SelectedRegionSet) -> Self {
        set.ids
    }
}

impl<'a> FromIterator<&'a str> for SelectedRegionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_previous_state() {
        let mut set: SelectedRegionSet = ["tip", "eraser"].into_iter().collect();
        let before = set.clone();
        assert!(set.toggle("middle-shaft"));
        assert!(!set.toggle("middle-shaft"));
        assert_eq!(set, before);

        let mut empty = SelectedRegionSet::new();
        empty.toggle("tip");
        empty.toggle("tip");
        assert!(empty.is_empty());
    }

    #[test]
    fn deserializing_drops_duplicates() {
        let set: SelectedRegionSet = serde_json::from_str(r#"["tip","tip","eraser"]"#).unwrap();
        assert_eq!(set.as_slice(), ["tip", "eraser"]);
    }
}
