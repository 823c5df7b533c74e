//! Small helpers shared across the samplers.

/// Draws a fresh 32-bit seed from process entropy. Used when a sample call
/// does not supply one; the drawn value still fully determines the call.
pub fn random_seed() -> u32 {
    rand::random()
}
