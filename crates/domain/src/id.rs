//! Request correlation id generation.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of a request correlation id.
pub const REQUEST_ID_LEN: usize = 16;

/// Generates a random request correlation id of ASCII letters and digits.
#[must_use]
pub fn generate_request_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(REQUEST_ID_LEN)
        .map(char::from)
        .collect()
}
