// VIN check digit (position 9)
// Reference: 49 CFR 565.15
//
// Each character is transliterated to a number, multiplied by its position
// weight, and the sum is reduced mod 11. A remainder of 10 is written 'X'.

pub const VIN_LENGTH: usize = 17;

/// Index of the check digit within the VIN
pub const CHECK_DIGIT_POSITION: usize = 8;

/// Per-position weights; the check digit itself carries weight 0
pub const WEIGHTS: [u32; VIN_LENGTH] = [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

/// Numeric value of a VIN character, or None for characters outside the alphabet
pub fn transliterate(c: char) -> Option<u32> {
    let value = match c {
        'A' | 'J' => 1,
        'B' | 'K' | 'S' => 2,
        'C' | 'L' | 'T' => 3,
        'D' | 'M' | 'U' => 4,
        'E' | 'N' | 'V' => 5,
        'F' | 'W' => 6,
        'G' | 'P' | 'X' => 7,
        'H' | 'Y' => 8,
        'R' | 'Z' => 9,
        '0'..='9' => c.to_digit(10)?,
        _ => return None,
    };
    Some(value)
}

/// Compute the check digit of a 17-character VIN
///
/// Characters without a transliteration contribute 0; callers validate the
/// alphabet before relying on the result.
pub fn compute_check_digit(vin: &str) -> char {
    let total: u32 = vin
        .chars()
        .zip(WEIGHTS.iter())
        .map(|(c, w)| transliterate(c).unwrap_or(0) * w)
        .sum();
    match total % 11 {
        10 => 'X',
        // remainder is 0..=9 here
        r => char::from_digit(r, 10).unwrap_or('0'),
    }
}

/// Check whether the character at position 9 matches the computed check digit
pub fn validate_check_digit(vin: &str) -> bool {
    vin.chars().nth(CHECK_DIGIT_POSITION) == Some(compute_check_digit(vin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transliteration_table() {
        assert_eq!(transliterate('A'), Some(1));
        assert_eq!(transliterate('J'), Some(1));
        assert_eq!(transliterate('S'), Some(2));
        assert_eq!(transliterate('H'), Some(8));
        assert_eq!(transliterate('Y'), Some(8));
        assert_eq!(transliterate('R'), Some(9));
        assert_eq!(transliterate('Z'), Some(9));
        assert_eq!(transliterate('7'), Some(7));
        assert_eq!(transliterate('I'), None);
        assert_eq!(transliterate('O'), None);
        assert_eq!(transliterate('Q'), None);
    }

    #[test]
    fn test_known_vin() {
        // 311 mod 11 = 3
        assert_eq!(compute_check_digit("1HGCM82633A004352"), '3');
        assert!(validate_check_digit("1HGCM82633A004352"));
        assert!(!validate_check_digit("1HGCM82643A004352"));
    }

    #[test]
    fn test_check_digit_position_does_not_affect_result() {
        assert_eq!(
            compute_check_digit("1M8GDM9A0KP042788"),
            compute_check_digit("1M8GDM9AXKP042788")
        );
    }

    #[test]
    fn test_remainder_ten_is_x() {
        assert_eq!(compute_check_digit("1M8GDM9AXKP042788"), 'X');
        assert!(validate_check_digit("1M8GDM9AXKP042788"));
    }
}
