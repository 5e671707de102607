//! Merkle root over a list of entry data hashes.
//!
//! Duplicates the last hash when the working set is odd, per block-sealing
//! step 1. The empty list maps to the zero hash.

use platform_core::{sha256_hex, zero_hash};

pub fn merkle_root<I, S>(hashes: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut level: Vec<String> = hashes.into_iter().map(|h| h.as_ref().to_string()).collect();
    if level.is_empty() {
        return zero_hash();
    }
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            let last = level.last().cloned().expect("level is non-empty");
            level.push(last);
        }
        level = level
            .chunks(2)
            .map(|pair| sha256_hex(format!("{}{}", pair[0], pair[1])))
            .collect();
    }
    level.into_iter().next().expect("level is non-empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_maps_to_zero_hash() {
        assert_eq!(merkle_root(Vec::<String>::new()), zero_hash());
    }

    #[test]
    fn single_hash_is_its_own_root() {
        assert_eq!(merkle_root(vec!["abc"]), "abc");
    }

    #[test]
    fn odd_count_duplicates_last() {
        let a = merkle_root(vec!["a", "b", "c"]);
        let b = merkle_root(vec!["a", "b", "c", "c"]);
        assert_eq!(a, b);
    }

    #[test]
    fn pairwise_hash_is_order_sensitive() {
        let ab = merkle_root(vec!["a", "b"]);
        let ba = merkle_root(vec!["b", "a"]);
        assert_ne!(ab, ba);
    }
}
