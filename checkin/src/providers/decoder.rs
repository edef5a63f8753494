//! Symbol decoder boundary.

use crate::error::Result;

/// The external decoding collaborator.
///
/// Takes a captured still image and recovers the embedded token string, if
/// any. This crate does not implement an optical decoder; it consumes the
/// contract and ships a programmable mock for tests and demos.
pub trait TokenDecoder: Send + Sync {
    /// Decode a captured frame.
    ///
    /// `Ok(None)` means no symbol was found in the image, which is routine
    /// while an operator lines up a code.
    ///
    /// # Errors
    ///
    /// Returns error only if the decoder itself fails.
    fn decode(&self, image: &[u8]) -> Result<Option<String>>;
}
