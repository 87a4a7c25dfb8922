//! Strong password synthesis.
//!
//! Used when an item is created without a password. Guarantees at least one
//! character from each class, then shuffles so class positions are not
//! predictable.

use rand::seq::SliceRandom;
use rand::Rng;

use strongroom_common::{Error, Result};

/// Default length for generated passwords.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*()-_=+<>?";

/// Generate a random password of the given length.
///
/// # Postconditions
/// - Contains at least one uppercase, lowercase, digit, and special character
///
/// # Errors
/// - Returns `InvalidParameter` if `length` < 4, since all four classes
///   could not be represented
pub fn generate_password(length: usize) -> Result<String> {
    if length < 4 {
        return Err(Error::InvalidParameter(
            "Password length must be at least 4 to include all character types".to_string(),
        ));
    }

    let mut rng = rand::rngs::OsRng;
    let all: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SPECIAL].concat();

    let mut chars: Vec<u8> = vec![
        UPPERCASE[rng.gen_range(0..UPPERCASE.len())],
        LOWERCASE[rng.gen_range(0..LOWERCASE.len())],
        DIGITS[rng.gen_range(0..DIGITS.len())],
        SPECIAL[rng.gen_range(0..SPECIAL.len())],
    ];
    while chars.len() < length {
        chars.push(all[rng.gen_range(0..all.len())]);
    }
    chars.shuffle(&mut rng);

    // All source characters are ASCII
    Ok(String::from_utf8(chars).expect("password characters are ASCII"))
}
