//! Conversion from raw provider records to [`NormalizedPark`].

use std::collections::{BTreeMap, BTreeSet};

use crate::{
  Error, Result,
  park::{MediaItem, NormalizedPark, Park, Person, RawPark, TagRef},
  partition::find_partition,
  tags::TagIndex,
};

/// Placeholder for contact fields the provider leaves out.
pub const UNKNOWN: &str = "N/A";

/// Normalise one raw record fetched under partition `fetched_under`.
///
/// New tag names are allocated identities in `index`; the index is the only
/// state this touches.
pub fn normalize(
  raw:           RawPark,
  fetched_under: &str,
  index:         &mut TagIndex,
) -> Result<NormalizedPark> {
  let code = raw.park_code.trim();
  if code.is_empty() {
    return Err(Error::MissingCode);
  }
  let fetched = find_partition(fetched_under)
    .ok_or_else(|| Error::UnknownPartition(fetched_under.to_owned()))?;

  let mut partitions = BTreeSet::from([fetched.code.to_owned()]);
  let mut ignored = BTreeSet::new();
  for key in raw.partition_keys() {
    match find_partition(key) {
      Some(p) => partitions.insert(p.code.to_owned()),
      None    => ignored.insert(key.to_owned()),
    };
  }

  // Keyed by name so the output order does not depend on allocation order.
  let tags: BTreeMap<&str, i64> = raw
    .activities
    .iter()
    .map(|a| a.name.trim())
    .filter(|name| !name.is_empty())
    .map(|name| (name, index.resolve(name)))
    .collect();
  let tags = tags
    .into_iter()
    .map(|(name, id)| TagRef { id, name: name.to_owned() })
    .collect();

  let media = raw
    .images
    .into_iter()
    .filter(|img| !img.url.trim().is_empty())
    .map(|img| MediaItem {
      title:   img.title,
      caption: img.caption,
      url:     img.url,
      credit:  img.credit,
    })
    .collect();

  let people = raw
    .contacts
    .phone_numbers
    .into_iter()
    .map(|phone| Person {
      name: non_empty_or_unknown(phone.name),
      role: non_empty_or_unknown(phone.kind),
    })
    .collect();

  Ok(NormalizedPark {
    park: Park {
      code:         code.to_owned(),
      name:         raw.full_name,
      designation:  raw.designation,
      description:  raw.description,
      url:          raw.url,
      weather_info: raw.weather_info,
    },
    partitions: partitions.into_iter().collect(),
    tags,
    media,
    people,
    ignored_partitions: ignored.into_iter().collect(),
  })
}

fn non_empty_or_unknown(value: Option<String>) -> String {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
    .unwrap_or_else(|| UNKNOWN.to_owned())
}
