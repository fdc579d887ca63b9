// WMI range notation
//
// Source tables describe blocks of codes compactly:
//   "AA-AH"     -> AA, AB, AC, AD, AE, AF, AG, AH
//   "H"         -> HA, HB, ... HZ, H0, ... H9      (2-char tier only)
//   "PV"        -> PV
//   "1, 4, 5"   -> every code starting with 1, 4 or 5
//   "JH1-JH5"   -> JH1, JH2, JH3, JH4, JH5
//   "AA9/CN1"   -> AA9, CN1                          (slash lists, trailing '/' allowed)
//
// Only the final character of a hyphen range varies; it walks the VIN
// alphabet, so "A8-AB" is not a range but "AX-A2" is.

use std::collections::HashSet;

use crate::error::RangeError;
use crate::reference::alphabet::{index_of, VIN_ALPHABET};

/// Expand a range spec into explicit codes of `code_length` characters
///
/// Codes are returned in spec order (alphabet order within each range) with
/// duplicates removed.
pub fn expand(spec: &str, code_length: usize) -> Result<Vec<String>, RangeError> {
    if !(1..=3).contains(&code_length) {
        return Err(RangeError::malformed(spec, format!("unsupported code length {}", code_length)));
    }

    let normalized = spec.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(RangeError::malformed(spec, "empty range"));
    }

    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    if normalized.contains([',', '/']) {
        for part in normalized.split([',', '/']).map(str::trim) {
            if part.is_empty() {
                continue;
            }
            for code in expand_segment(part, code_length)? {
                if seen.insert(code.clone()) {
                    codes.push(code);
                }
            }
        }
        if codes.is_empty() {
            return Err(RangeError::malformed(spec, "list contains no codes"));
        }
    } else {
        codes = expand_segment(&normalized, code_length)?;
    }

    Ok(codes)
}

/// Expand one list segment (no commas or slashes)
fn expand_segment(segment: &str, code_length: usize) -> Result<Vec<String>, RangeError> {
    if segment.contains('-') {
        return expand_hyphen(segment, code_length);
    }

    let chars: Vec<char> = segment.chars().collect();

    // Single character shorthand: "H" -> H + every symbol
    if chars.len() == 1 && code_length == 2 {
        let first = chars[0];
        check_symbols(segment, &chars)?;
        return Ok(VIN_ALPHABET.iter().map(|c| format!("{}{}", first, c)).collect());
    }

    if chars.len() == code_length {
        check_symbols(segment, &chars)?;
        return Ok(vec![segment.to_string()]);
    }

    Err(RangeError::malformed(
        segment,
        format!("expected a {}-character code", code_length),
    ))
}

fn expand_hyphen(segment: &str, code_length: usize) -> Result<Vec<String>, RangeError> {
    let parts: Vec<&str> = segment.split('-').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(RangeError::malformed(segment, "expected exactly one '-'"));
    }

    let start: Vec<char> = parts[0].chars().collect();
    let end: Vec<char> = parts[1].chars().collect();
    if start.len() != code_length || end.len() != code_length {
        return Err(RangeError::malformed(
            segment,
            format!("expected {}-character endpoints", code_length),
        ));
    }

    let prefix = &start[..code_length - 1];
    if prefix != &end[..code_length - 1] {
        return Err(RangeError::order(segment, "endpoints must share all but the last character"));
    }
    check_symbols(segment, prefix)?;

    let last = code_length - 1;
    let start_idx = index_of(start[last]).ok_or_else(|| {
        RangeError::order(segment, format!("'{}' is not a VIN symbol", start[last]))
    })?;
    let end_idx = index_of(end[last]).ok_or_else(|| {
        RangeError::order(segment, format!("'{}' is not a VIN symbol", end[last]))
    })?;
    if start_idx > end_idx {
        return Err(RangeError::order(
            segment,
            format!("'{}' comes after '{}'", start[last], end[last]),
        ));
    }

    let prefix: String = prefix.iter().collect();
    Ok(VIN_ALPHABET[start_idx..=end_idx]
        .iter()
        .map(|c| format!("{}{}", prefix, c))
        .collect())
}

fn check_symbols(segment: &str, chars: &[char]) -> Result<(), RangeError> {
    match chars.iter().find(|c| index_of(**c).is_none()) {
        Some(bad) => Err(RangeError::malformed(segment, format!("'{}' is not a VIN symbol", bad))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphen_range_two_chars() {
        let codes = expand("AA-AH", 2).unwrap();
        assert_eq!(codes, vec!["AA", "AB", "AC", "AD", "AE", "AF", "AG", "AH"]);
    }

    #[test]
    fn test_hyphen_range_count_matches_alphabet_distance() {
        // H..J skips I; Z..0 crosses from letters to digits
        assert_eq!(expand("AH-AJ", 2).unwrap(), vec!["AH", "AJ"]);
        assert_eq!(expand("AX-A2", 2).unwrap(), vec!["AX", "AY", "AZ", "A0", "A1", "A2"]);
        let codes = expand("SA-SM", 2).unwrap();
        assert_eq!(codes.len(), index_of('M').unwrap() - index_of('A').unwrap() + 1);
    }

    #[test]
    fn test_hyphen_range_three_chars() {
        assert_eq!(
            expand("JH1-JH5", 3).unwrap(),
            vec!["JH1", "JH2", "JH3", "JH4", "JH5"]
        );
    }

    #[test]
    fn test_single_char_shorthand() {
        let codes = expand("H", 2).unwrap();
        assert_eq!(codes.len(), VIN_ALPHABET.len());
        assert!(codes.iter().all(|c| c.starts_with('H') && c.len() == 2));
        assert_eq!(codes.first().map(String::as_str), Some("HA"));
        assert_eq!(codes.last().map(String::as_str), Some("H9"));
    }

    #[test]
    fn test_exact_code() {
        assert_eq!(expand("PV", 2).unwrap(), vec!["PV"]);
        assert_eq!(expand(" jhm ", 3).unwrap(), vec!["JHM"]);
        assert_eq!(expand("J", 1).unwrap(), vec!["J"]);
    }

    #[test]
    fn test_comma_list_unions_segments() {
        let codes = expand("1, 4, 5", 2).unwrap();
        let n = VIN_ALPHABET.len();
        assert_eq!(codes.len(), 3 * n);
        assert_eq!(codes[0], "1A");
        assert_eq!(codes[n], "4A");
        assert_eq!(codes[2 * n], "5A");
    }

    #[test]
    fn test_list_removes_duplicates() {
        let codes = expand("AA-AC, AB, AC-AD", 2).unwrap();
        assert_eq!(codes, vec!["AA", "AB", "AC", "AD"]);
    }

    #[test]
    fn test_slash_list() {
        assert_eq!(expand("AA9/CN1", 3).unwrap(), vec!["AA9", "CN1"]);
        assert_eq!(expand("BF9/", 3).unwrap(), vec!["BF9"]);
        assert_eq!(expand("1G1-1G3/1GC", 3).unwrap(), vec!["1G1", "1G2", "1G3", "1GC"]);
    }

    #[test]
    fn test_region_ranges() {
        assert_eq!(expand("A-C", 1).unwrap(), vec!["A", "B", "C"]);
        assert_eq!(expand("S, T", 1).unwrap(), vec!["S", "T"]);
    }

    #[test]
    fn test_mismatched_prefix_is_order_error() {
        let err = expand("AA-BH", 2).unwrap_err();
        assert!(matches!(err, RangeError::InvalidRangeOrder { .. }));
    }

    #[test]
    fn test_endpoint_outside_alphabet_is_order_error() {
        assert!(matches!(expand("AA-AI", 2), Err(RangeError::InvalidRangeOrder { .. })));
        assert!(matches!(expand("AQ-AZ", 2), Err(RangeError::InvalidRangeOrder { .. })));
    }

    #[test]
    fn test_reversed_range_is_order_error() {
        assert!(matches!(expand("AH-AA", 2), Err(RangeError::InvalidRangeOrder { .. })));
    }

    #[test]
    fn test_malformed_specs() {
        for spec in ["", "   ", "ABC", "A-B-C", "AAA-AAB", "I", "A*", ",", " / "] {
            assert!(
                matches!(expand(spec, 2), Err(RangeError::Malformed { .. })),
                "expected '{}' to be malformed",
                spec
            );
        }
        assert!(matches!(expand("JH", 3), Err(RangeError::Malformed { .. })));
        assert!(matches!(expand("AB", 4), Err(RangeError::Malformed { .. })));
    }

    #[test]
    fn test_malformed_segment_aborts_whole_list() {
        assert!(expand("AA-AC, XYZ", 2).is_err());
    }
}
