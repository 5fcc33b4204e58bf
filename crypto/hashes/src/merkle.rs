use crate::{hasher::HashWriter, Hash};

/// Computes the merkle root over `leaves`.
///
/// Each interior node is `SHA256d(left || right)`. A level with an odd number of
/// nodes pairs its last node with itself. An empty leaf set yields the zero hash.
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return Hash::zeroed();
    }

    let mut level: Vec<Hash> = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                let mut writer = HashWriter::new();
                writer.update(left.as_bytes());
                writer.update(right.as_bytes());
                Hash::from(writer.finalize_double())
            })
            .collect();
    }
    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::double_sha256;

    fn leaf(n: u64) -> Hash {
        Hash::from_le_u64([n, 0, 0, 0])
    }

    fn parent(a: &Hash, b: &Hash) -> Hash {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(a.as_bytes());
        buf.extend_from_slice(b.as_bytes());
        Hash::from(double_sha256(&buf))
    }

    #[test]
    fn single_leaf_is_root() {
        assert_eq!(merkle_root(&[leaf(7)]), leaf(7));
    }

    #[test]
    fn empty_is_zero() {
        assert!(merkle_root(&[]).is_zero());
    }

    #[test]
    fn odd_level_duplicates_last() {
        let (a, b, c) = (leaf(1), leaf(2), leaf(3));
        let expected = parent(&parent(&a, &b), &parent(&c, &c));
        assert_eq!(merkle_root(&[a, b, c]), expected);
    }
}
