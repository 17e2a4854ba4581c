//! Canonical address reduction.
//!
//! A broad postal code can map to several towns. The canonical address is
//! the longest prefix shared by every candidate's concatenated address, so
//! `東京都千代田区丸の内` and `東京都千代田区大手町` reduce to `東京都千代田区`.
//! The comparison is over the concatenated string rather than field by field,
//! because differing town names can still share leading characters.

use crate::location::LocationRecord;

/// Longest common prefix of every record's `prefecture + city + town`.
///
/// Trims whole characters only, so a multi-byte character is never split.
/// Returns an empty string for an empty slice or when nothing is shared.
#[must_use]
pub fn common_address(records: &[LocationRecord]) -> String {
    let mut iter = records.iter();
    let Some(first) = iter.next() else {
        return String::new();
    };

    let mut common = first.full_address();
    for record in iter {
        if common.is_empty() {
            break;
        }
        let candidate = record.full_address();
        while !candidate.starts_with(common.as_str()) {
            common.pop();
        }
    }
    common
}
