//! Connection identifier generation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a connection (one per socket).
pub type ConnId = String;

/// Generates unique connection ids.
///
/// Format: 6-character base36 counter, e.g. "AAAAAC". Ids are unique
/// per process for the lifetime of the generator, which is all the
/// broadcast-exclusion logic requires.
pub struct ConnIdGenerator {
    counter: AtomicU64,
}

impl ConnIdGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Generate the next unique connection id.
    pub fn next(&self) -> ConnId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        base36_encode_6(n)
    }
}

impl Default for ConnIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a number as a 6-character base36 string.
fn base36_encode_6(mut n: u64) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut result = [b'A'; 6];

    for i in (0..6).rev() {
        result[i] = CHARS[(n % 36) as usize];
        n /= 36;
    }

    String::from_utf8_lossy(&result).into_owned()
}
