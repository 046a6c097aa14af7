//! [`TagIndex`] — the in-memory tag name → identity map used for one run.
//!
//! The index is seeded from the store at the start of a run and updated as
//! the normaliser sees new names, so every record in the run agrees on tag
//! identities without reading them back after each insert.

use std::collections::HashMap;

/// Tag name → synthetic identity.
///
/// Identities are never reused: a new name always gets one past the highest
/// identity seen so far.
#[derive(Debug, Clone)]
pub struct TagIndex {
  ids:     HashMap<String, i64>,
  next_id: i64,
}

impl Default for TagIndex {
  fn default() -> Self { Self::new() }
}

impl TagIndex {
  /// An empty index; the first allocated identity is `1`.
  pub fn new() -> Self {
    Self { ids: HashMap::new(), next_id: 1 }
  }

  /// Build an index from `(id, name)` pairs already present in a store.
  pub fn from_existing(tags: impl IntoIterator<Item = (i64, String)>) -> Self {
    let mut index = Self::new();
    for (id, name) in tags {
      index.next_id = index.next_id.max(id + 1);
      index.ids.insert(name, id);
    }
    index
  }

  /// The identity assigned to `name`, if any.
  pub fn get(&self, name: &str) -> Option<i64> { self.ids.get(name).copied() }

  /// Return the identity for `name`, allocating the next one on first sight.
  pub fn resolve(&mut self, name: &str) -> i64 {
    if let Some(id) = self.ids.get(name) {
      return *id;
    }
    let id = self.next_id;
    self.next_id += 1;
    self.ids.insert(name.to_owned(), id);
    id
  }

  pub fn len(&self) -> usize { self.ids.len() }

  pub fn is_empty(&self) -> bool { self.ids.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolve_allocates_once_per_name() {
    let mut index = TagIndex::new();
    let hiking = index.resolve("Hiking");
    let camping = index.resolve("Camping");

    assert_eq!(hiking, 1);
    assert_eq!(camping, 2);
    assert_eq!(index.resolve("Hiking"), hiking);
    assert_eq!(index.len(), 2);
  }

  #[test]
  fn seeded_index_reuses_ids_and_continues_after_max() {
    let mut index = TagIndex::from_existing([
      (3, "Hiking".to_string()),
      (7, "Camping".to_string()),
    ]);

    assert_eq!(index.get("Camping"), Some(7));
    assert_eq!(index.resolve("Hiking"), 3);
    assert_eq!(index.resolve("Fishing"), 8);
    assert_eq!(index.resolve("Boating"), 9);
  }

  #[test]
  fn names_are_case_sensitive() {
    let mut index = TagIndex::new();
    assert_ne!(index.resolve("hiking"), index.resolve("Hiking"));
  }
}
