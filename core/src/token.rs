//! Random identifiers for commit operations.
//!
//! Tokens come from `thread_rng` and are not collision-proof; the server
//! decides what happens when two commits reuse one.

use rand::Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of the operation ids the server hands out for its own items.
pub const OPERATION_ID_LEN: usize = 22;

/// `len` random ASCII letters.
pub fn random_token(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

pub fn new_operation_id() -> String {
    random_token(OPERATION_ID_LEN)
}
