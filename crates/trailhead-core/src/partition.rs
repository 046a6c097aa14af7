//! The fixed set of partitions (US states) the catalog is synchronised by.
//!
//! The list is embedded so that every run walks the same partitions in the
//! same order.

use serde::Serialize;

/// A region code and its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Partition {
  pub code: &'static str,
  pub name: &'static str,
}

const fn p(code: &'static str, name: &'static str) -> Partition {
  Partition { code, name }
}

static PARTITIONS: [Partition; 50] = [
  p("AL", "Alabama"),
  p("AK", "Alaska"),
  p("AZ", "Arizona"),
  p("AR", "Arkansas"),
  p("CA", "California"),
  p("CO", "Colorado"),
  p("CT", "Connecticut"),
  p("DE", "Delaware"),
  p("FL", "Florida"),
  p("GA", "Georgia"),
  p("HI", "Hawaii"),
  p("ID", "Idaho"),
  p("IL", "Illinois"),
  p("IN", "Indiana"),
  p("IA", "Iowa"),
  p("KS", "Kansas"),
  p("KY", "Kentucky"),
  p("LA", "Louisiana"),
  p("ME", "Maine"),
  p("MD", "Maryland"),
  p("MA", "Massachusetts"),
  p("MI", "Michigan"),
  p("MN", "Minnesota"),
  p("MS", "Mississippi"),
  p("MO", "Missouri"),
  p("MT", "Montana"),
  p("NE", "Nebraska"),
  p("NV", "Nevada"),
  p("NH", "New Hampshire"),
  p("NJ", "New Jersey"),
  p("NM", "New Mexico"),
  p("NY", "New York"),
  p("NC", "North Carolina"),
  p("ND", "North Dakota"),
  p("OH", "Ohio"),
  p("OK", "Oklahoma"),
  p("OR", "Oregon"),
  p("PA", "Pennsylvania"),
  p("RI", "Rhode Island"),
  p("SC", "South Carolina"),
  p("SD", "South Dakota"),
  p("TN", "Tennessee"),
  p("TX", "Texas"),
  p("UT", "Utah"),
  p("VT", "Vermont"),
  p("VA", "Virginia"),
  p("WA", "Washington"),
  p("WV", "West Virginia"),
  p("WI", "Wisconsin"),
  p("WY", "Wyoming"),
];

/// Every partition, in sync order.
pub fn list_partitions() -> &'static [Partition] { &PARTITIONS }

/// Look up a partition by code. Codes are matched case-insensitively.
pub fn find_partition(code: &str) -> Option<Partition> {
  PARTITIONS
    .iter()
    .find(|p| p.code.eq_ignore_ascii_case(code))
    .copied()
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn partitions_are_unique_and_stable() {
    let codes: Vec<&str> = list_partitions().iter().map(|p| p.code).collect();
    let unique: HashSet<&str> = codes.iter().copied().collect();
    assert_eq!(codes.len(), 50);
    assert_eq!(unique.len(), codes.len());
    assert_eq!(codes.first(), Some(&"AL"));
    assert_eq!(codes.last(), Some(&"WY"));
    assert_eq!(codes, list_partitions().iter().map(|p| p.code).collect::<Vec<_>>());
  }

  #[test]
  fn find_partition_ignores_case() {
    assert_eq!(find_partition("ca").map(|p| p.name), Some("California"));
    assert_eq!(find_partition("NY").map(|p| p.code), Some("NY"));
    assert!(find_partition("DC").is_none());
    assert!(find_partition("").is_none());
  }
}
