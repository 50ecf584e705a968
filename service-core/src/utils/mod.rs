use subtle::ConstantTimeEq;

/// Compare two byte strings without leaking where they differ.
///
/// Lengths are compared first, so only the length of a secret can be
/// observed through timing.
pub fn constant_time_eq(expected: &[u8], provided: &[u8]) -> bool {
    if expected.len() != provided.len() {
        return false;
    }

    expected.ct_eq(provided).into()
}
