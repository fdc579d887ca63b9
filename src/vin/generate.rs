// Random VIN generation
//
// Generated VINs are well formed and carry a correct check digit. They use a
// known WMI when the manufacturer table has any, and a model year code that
// resolves to a non-future year.

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;

use crate::reference::alphabet::DIGITS;
use crate::reference::VIN_ALPHABET;

use super::checksum::{compute_check_digit, CHECK_DIGIT_POSITION};
use super::decode::VinCodec;
use super::model_year::valid_year_codes;

/// Year code used when no code resolves for the current year
const FALLBACK_YEAR_CODE: char = 'L';

impl VinCodec<'_> {
    /// Generate a random VIN using the thread-local RNG
    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate a random VIN from a caller-supplied RNG
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut vin = String::with_capacity(17);

        match self.tables.manufacturers.codes().choose(rng) {
            Some(wmi) => vin.push_str(wmi),
            None => (0..3).for_each(|_| vin.push(random_symbol(rng))),
        }

        (0..5).for_each(|_| vin.push(random_symbol(rng)));
        // check digit placeholder
        vin.push('0');

        let year_codes = valid_year_codes(self.current_year);
        vin.push(year_codes.choose(rng).copied().unwrap_or(FALLBACK_YEAR_CODE));
        vin.push(random_symbol(rng));
        (0..6).for_each(|_| vin.push(DIGITS[rng.gen_range(0..DIGITS.len())]));

        let check = compute_check_digit(&vin);
        vin.replace_range(CHECK_DIGIT_POSITION..=CHECK_DIGIT_POSITION, &check.to_string());
        vin
    }
}

fn random_symbol<R: Rng + ?Sized>(rng: &mut R) -> char {
    VIN_ALPHABET[rng.gen_range(0..VIN_ALPHABET.len())]
}
