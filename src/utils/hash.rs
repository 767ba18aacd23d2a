//! Cache-key fingerprints using blake3.
//!
//! # Usage
//!
//! ```ignore
//! use webhead::utils::hash;
//!
//! let fp = hash::fingerprint(&[b"css/site.css", &mtime_bytes]); // -> "a1b2c3d4e5f60718"
//! ```

/// Length of the hex fingerprint embedded in cache-entry names.
pub const FINGERPRINT_LEN: usize = 16;

/// Hash a sequence of byte parts into a short hex fingerprint.
///
/// Each part is length-prefixed, so `["ab", "c"]` and `["a", "bc"]` differ.
pub fn fingerprint<T: AsRef<[u8]>>(parts: &[T]) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        let bytes = part.as_ref();
        hasher.update(&(bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }
    let mut hex = hex::encode(hasher.finalize().as_bytes());
    hex.truncate(FINGERPRINT_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        let a = fingerprint(&["css/site.css", "1700000000"]);
        let b = fingerprint(&["css/site.css", "1700000000"]);
        assert_eq!(a, b);
        assert_eq!(a.len(), FINGERPRINT_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_part_boundaries() {
        assert_ne!(fingerprint(&["ab", "c"]), fingerprint(&["a", "bc"]));
    }

    #[test]
    fn test_fingerprint_changes_with_input() {
        assert_ne!(
            fingerprint(&["css/site.css", "1"]),
            fingerprint(&["css/site.css", "2"])
        );
    }
}
