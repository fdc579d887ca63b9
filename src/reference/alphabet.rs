// VIN alphabet
// Source: ISO 3779 / 49 CFR Part 565
//
// I, O and Q are never used in a VIN because they are easily confused
// with 1 and 0. Every code table (region, country, WMI) is keyed by
// strings drawn from the remaining 33 symbols, in this fixed order.

/// The 33 valid VIN symbols in canonical range order
pub const VIN_ALPHABET: [char; 33] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M',
    'N', 'P', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Characters explicitly excluded from VINs
pub const EXCLUDED_CHARS: [char; 3] = ['I', 'O', 'Q'];

/// Decimal digits, used for serial numbers
pub const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Position of a symbol in the VIN alphabet, or None if it is not a VIN symbol
pub fn index_of(c: char) -> Option<usize> {
    VIN_ALPHABET.iter().position(|&s| s == c)
}

/// Check whether a character is a valid VIN symbol
pub fn is_vin_char(c: char) -> bool {
    index_of(c).is_some()
}

/// Enumerate every code of the given length in alphabet order
///
/// `all_codes(2)` yields AA, AB, ... A9, BA, ... 99 (33 * 33 codes).
pub fn all_codes(len: usize) -> Vec<String> {
    let mut codes = vec![String::new()];
    for _ in 0..len {
        codes = codes
            .iter()
            .flat_map(|prefix| {
                VIN_ALPHABET.iter().map(move |c| {
                    let mut code = prefix.clone();
                    code.push(*c);
                    code
                })
            })
            .collect();
    }
    codes
}
