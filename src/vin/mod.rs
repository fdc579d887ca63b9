// VIN codec - check digit, model year, decoding and generation

pub mod checksum;
pub mod decode;
pub mod generate;
pub mod model_year;

pub use checksum::{compute_check_digit, transliterate, validate_check_digit, VIN_LENGTH};
pub use decode::{normalize, DecodedVin, VinCodec};
pub use model_year::{current_year, resolve_model_year, valid_year_codes, ModelYear};
