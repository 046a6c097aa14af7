//! Park types: the raw provider shape, the normalised write shape, and the
//! read models served back out of the store.

use serde::{Deserialize, Deserializer, Serialize};

// ─── Raw provider records ────────────────────────────────────────────────────

/// Treat an explicit JSON `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One park as returned by the provider's `/parks` endpoint.
///
/// Every field is optional on the wire; anything missing or `null` becomes its
/// empty value so a sparse record still normalises.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPark {
  #[serde(default, deserialize_with = "nullable")]
  pub park_code:    String,
  #[serde(default, deserialize_with = "nullable")]
  pub full_name:    String,
  #[serde(default, deserialize_with = "nullable")]
  pub designation:  String,
  #[serde(default, deserialize_with = "nullable")]
  pub description:  String,
  #[serde(default, deserialize_with = "nullable")]
  pub url:          String,
  #[serde(default, deserialize_with = "nullable")]
  pub weather_info: String,
  /// Comma-joined partition keys, e.g. `"CA,NV"`.
  #[serde(default, deserialize_with = "nullable")]
  pub states:       String,
  #[serde(default, deserialize_with = "nullable")]
  pub activities:   Vec<RawActivity>,
  #[serde(default, deserialize_with = "nullable")]
  pub images:       Vec<RawImage>,
  #[serde(default, deserialize_with = "nullable")]
  pub contacts:     RawContacts,
}

impl RawPark {
  /// The partition keys this park reports membership in.
  pub fn partition_keys(&self) -> impl Iterator<Item = &str> {
    self.states.split(',').map(str::trim).filter(|s| !s.is_empty())
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawActivity {
  #[serde(default, deserialize_with = "nullable")]
  pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawImage {
  #[serde(default, deserialize_with = "nullable")]
  pub title:   String,
  #[serde(default, deserialize_with = "nullable")]
  pub caption: String,
  #[serde(default, deserialize_with = "nullable")]
  pub url:     String,
  #[serde(default, deserialize_with = "nullable")]
  pub credit:  String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContacts {
  #[serde(default, deserialize_with = "nullable")]
  pub phone_numbers: Vec<RawPhone>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPhone {
  #[serde(default)]
  pub name:         Option<String>,
  #[serde(default, rename = "type")]
  pub kind:         Option<String>,
  #[serde(default)]
  pub phone_number: Option<String>,
}

// ─── Normalised records ──────────────────────────────────────────────────────

/// The scalar columns of an `entities` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Park {
  pub code:         String,
  pub name:         String,
  pub designation:  String,
  pub description:  String,
  pub url:          String,
  pub weather_info: String,
}

/// A tag with the identity assigned to it by the
/// [`TagIndex`](crate::tags::TagIndex).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagRef {
  pub id:   i64,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
  pub title:   String,
  pub caption: String,
  pub url:     String,
  pub credit:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub name: String,
  pub role: String,
}

/// A fully-resolved park, ready to be applied to a store.
///
/// Everything is keyed by `park.code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPark {
  pub park:               Park,
  /// Known partition codes to link, sorted and unique.
  pub partitions:         Vec<String>,
  /// Tags to link, sorted by name and unique.
  pub tags:               Vec<TagRef>,
  pub media:              Vec<MediaItem>,
  pub people:             Vec<Person>,
  /// Reported partition keys that are not in the partition list.
  pub ignored_partitions: Vec<String>,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// A park with everything joined to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkDetail {
  pub park:       Park,
  /// Tag names, sorted.
  pub tags:       Vec<String>,
  /// Partition codes, sorted.
  pub partitions: Vec<String>,
  pub media:      Vec<MediaItem>,
  pub people:     Vec<Person>,
}

/// Row counts for every table in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
  pub partitions:         u64,
  pub entities:           u64,
  pub partition_entities: u64,
  pub tags:               u64,
  pub entity_tags:        u64,
  pub media_items:        u64,
  pub people:             u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn raw_park_tolerates_missing_and_null_fields() {
    let raw: RawPark = serde_json::from_str(
      r#"{
        "parkCode": "yose",
        "fullName": "Yosemite National Park",
        "description": null,
        "states": "CA",
        "activities": [{"id": "x", "name": "Hiking"}, {"name": null}],
        "images": null,
        "contacts": {"phoneNumbers": [{"phoneNumber": "2093720200", "type": "Voice"}]}
      }"#,
    )
    .unwrap();

    assert_eq!(raw.park_code, "yose");
    assert_eq!(raw.description, "");
    assert_eq!(raw.designation, "");
    assert!(raw.images.is_empty());
    assert_eq!(raw.activities.len(), 2);
    assert_eq!(raw.activities[1].name, "");
    assert_eq!(raw.contacts.phone_numbers[0].kind.as_deref(), Some("Voice"));
    assert!(raw.contacts.phone_numbers[0].name.is_none());
  }

  #[test]
  fn partition_keys_split_comma_list() {
    let raw = RawPark { states: "CA, NV,,".into(), ..Default::default() };
    assert_eq!(raw.partition_keys().collect::<Vec<_>>(), ["CA", "NV"]);

    let empty = RawPark::default();
    assert_eq!(empty.partition_keys().count(), 0);
  }
}
