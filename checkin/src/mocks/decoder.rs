//! Mock symbol decoder.

use crate::error::{CheckinError, Result};
use crate::providers::TokenDecoder;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Programmable decoder for tests and demos.
///
/// Frames registered with [`MockTokenDecoder::register_symbol`] decode to
/// their token; any other frame decodes to "no symbol found".
#[derive(Debug, Clone, Default)]
pub struct MockTokenDecoder {
    symbols: Arc<Mutex<HashMap<Vec<u8>, String>>>,
}

impl MockTokenDecoder {
    /// Create a decoder that recognizes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Teach the decoder that `frame` contains `token`.
    ///
    /// # Errors
    ///
    /// Returns error only if the internal lock is poisoned.
    pub fn register_symbol(&self, frame: &[u8], token: &str) -> Result<()> {
        self.symbols
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?
            .insert(frame.to_vec(), token.to_string());
        Ok(())
    }
}

impl TokenDecoder for MockTokenDecoder {
    fn decode(&self, image: &[u8]) -> Result<Option<String>> {
        Ok(self
            .symbols
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?
            .get(image)
            .cloned())
    }
}
