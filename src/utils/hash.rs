//! Filename fingerprints for unified bundles.
//!
//! A fingerprint is the hex SHA-1 of the source filenames concatenated in
//! order, with no separator. File contents are deliberately not hashed: the
//! same ordered set of filenames always maps to the same output name.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let fp = hash::fingerprint(["editor-style.css", "style.css"]);
//! // == sha1("editor-style.cssstyle.css")
//! ```

use sha1::{Digest, Sha1};

/// Compute the fingerprint of an ordered list of filenames.
pub fn fingerprint<I, S>(filenames: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha1::new();
    for name in filenames {
        hasher.update(name.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Compute hex SHA-1 of raw bytes.
#[inline]
pub fn sha1_hex<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    hex::encode(Sha1::digest(data.as_ref()))
}
