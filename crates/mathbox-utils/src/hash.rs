use std::hash::Hash;

use siphasher::sip128::{Hasher128, SipHasher13};

/// Calculate a 128-bit siphash of a value.
///
/// The hash is stable across runs and platforms for the same value, which
/// makes it usable as a fingerprint of layout results.
pub fn hash128<T: Hash + ?Sized>(value: &T) -> u128 {
    let mut state = SipHasher13::new();
    value.hash(&mut state);
    state.finish128().as_u128()
}
