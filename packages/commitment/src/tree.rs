//! Tendermint-style simple Merkle trees.
//!
//! Leaves are hashed as `sha256(0x00 || leaf)` and inner nodes as
//! `sha256(0x01 || left || right)`. A tree of `n` leaves is split at the
//! largest power of two strictly below `n`. Key-value trees encode their
//! leaves the way [`ics23::tendermint_spec`] expects, so the proofs produced
//! here verify with the stock ics23 verifier.

use std::collections::BTreeMap;

use ics23::{
    commitment_proof::Proof, CommitmentProof, ExistenceProof, HashOp, InnerOp, LeafOp, LengthOp,
    NonExistenceProof,
};
use sha2::{Digest, Sha256};

use crate::{error::CommitmentError, Hash};

const LEAF_PREFIX: u8 = 0;
const INNER_PREFIX: u8 = 1;

/// Hash of an empty tree
#[must_use]
pub fn empty_hash() -> Hash {
    Sha256::digest([]).into()
}

/// Hash of a single leaf
#[must_use]
pub fn leaf_hash(leaf: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(leaf);
    hasher.finalize().into()
}

/// Hash of an inner node
#[must_use]
pub fn inner_hash(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([INNER_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Merkle root over arbitrary byte items, as used for validator set and block hashes
#[must_use]
pub fn simple_hash_from_byte_vectors<T: AsRef<[u8]>>(items: &[T]) -> Hash {
    let leaves: Vec<Hash> = items.iter().map(|item| leaf_hash(item.as_ref())).collect();
    root_from_leaves(&leaves)
}

/// Largest power of two strictly below `length`
fn split_point(length: usize) -> usize {
    debug_assert!(length > 1);
    1 << (usize::BITS - (length - 1).leading_zeros() - 1)
}

fn root_from_leaves(leaves: &[Hash]) -> Hash {
    match leaves.len() {
        0 => empty_hash(),
        1 => leaves[0],
        n => {
            let k = split_point(n);
            inner_hash(&root_from_leaves(&leaves[..k]), &root_from_leaves(&leaves[k..]))
        }
    }
}

/// Inner ops from the leaf at `index` up to the root
fn path_to_root(leaves: &[Hash], index: usize) -> Vec<InnerOp> {
    if leaves.len() <= 1 {
        return Vec::new();
    }
    let k = split_point(leaves.len());
    if index < k {
        let mut ops = path_to_root(&leaves[..k], index);
        ops.push(InnerOp {
            hash: HashOp::Sha256.into(),
            prefix: vec![INNER_PREFIX],
            suffix: root_from_leaves(&leaves[k..]).to_vec(),
        });
        ops
    } else {
        let mut ops = path_to_root(&leaves[k..], index - k);
        let mut prefix = vec![INNER_PREFIX];
        prefix.extend_from_slice(&root_from_leaves(&leaves[..k]));
        ops.push(InnerOp {
            hash: HashOp::Sha256.into(),
            prefix,
            suffix: Vec::new(),
        });
        ops
    }
}

/// The leaf operation of [`ics23::tendermint_spec`]
#[must_use]
pub fn leaf_op() -> LeafOp {
    LeafOp {
        hash: HashOp::Sha256.into(),
        prehash_key: HashOp::NoHash.into(),
        prehash_value: HashOp::Sha256.into(),
        length: LengthOp::VarProto.into(),
        prefix: vec![LEAF_PREFIX],
    }
}

/// Encodes a key-value pair the way the tendermint leaf op hashes it
fn kv_leaf(key: &[u8], value: &[u8]) -> Vec<u8> {
    let value_hash = Sha256::digest(value);
    let mut leaf = Vec::with_capacity(key.len() + value_hash.len() + 4);
    prost::encoding::encode_varint(key.len() as u64, &mut leaf);
    leaf.extend_from_slice(key);
    prost::encoding::encode_varint(value_hash.len() as u64, &mut leaf);
    leaf.extend_from_slice(&value_hash);
    leaf
}

/// An immutable Merkle tree over sorted key-value pairs
#[derive(Clone, Debug)]
pub struct SimpleMerkleTree {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    leaves: Vec<Hash>,
    root: Hash,
}

impl SimpleMerkleTree {
    /// Builds the tree over all entries of the map
    #[must_use]
    pub fn new(entries: &BTreeMap<Vec<u8>, Vec<u8>>) -> Self {
        let entries: Vec<(Vec<u8>, Vec<u8>)> = entries
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let leaves: Vec<Hash> = entries
            .iter()
            .map(|(key, value)| leaf_hash(&kv_leaf(key, value)))
            .collect();
        let root = root_from_leaves(&leaves);

        Self {
            entries,
            leaves,
            root,
        }
    }

    /// The root hash
    #[must_use]
    pub const fn root(&self) -> Hash {
        self.root
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &[u8]) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|(entry_key, _)| entry_key.as_slice().cmp(key))
    }

    fn existence_proof(&self, index: usize) -> ExistenceProof {
        let (key, value) = &self.entries[index];
        ExistenceProof {
            key: key.clone(),
            value: value.clone(),
            leaf: Some(leaf_op()),
            path: path_to_root(&self.leaves, index),
        }
    }

    /// Proves that `key` is in the tree
    /// # Errors
    /// Returns an error if the key is absent
    pub fn prove_existence(&self, key: &[u8]) -> Result<CommitmentProof, CommitmentError> {
        let index = self
            .position(key)
            .map_err(|_| CommitmentError::KeyNotFound(key.to_vec()))?;

        Ok(CommitmentProof {
            proof: Some(Proof::Exist(self.existence_proof(index))),
        })
    }

    fn absence_proof(&self, key: &[u8], index: usize) -> CommitmentProof {
        let left = index.checked_sub(1).map(|i| self.existence_proof(i));
        let right = (index < self.entries.len()).then(|| self.existence_proof(index));

        CommitmentProof {
            proof: Some(Proof::Nonexist(NonExistenceProof {
                key: key.to_vec(),
                left,
                right,
            })),
        }
    }

    /// Proves that `key` is not in the tree by exhibiting its neighbours
    /// # Errors
    /// Returns an error if the key is present
    pub fn prove_absence(&self, key: &[u8]) -> Result<CommitmentProof, CommitmentError> {
        match self.position(key) {
            Ok(_) => Err(CommitmentError::KeyExists(key.to_vec())),
            Err(index) => Ok(self.absence_proof(key, index)),
        }
    }

    /// Proves either the presence or the absence of `key`
    #[must_use]
    pub fn prove(&self, key: &[u8]) -> (Option<Vec<u8>>, CommitmentProof) {
        match self.position(key) {
            Ok(index) => (
                Some(self.entries[index].1.clone()),
                CommitmentProof {
                    proof: Some(Proof::Exist(self.existence_proof(index))),
                },
            ),
            Err(index) => (None, self.absence_proof(key, index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use ics23::HostFunctionsManager;
    use rstest::rstest;

    use super::*;

    fn tree_of(size: u8) -> SimpleMerkleTree {
        let entries = (0..size)
            .map(|i| (vec![b'k', i * 2], vec![i; 3]))
            .collect::<BTreeMap<_, _>>();
        SimpleMerkleTree::new(&entries)
    }

    #[rstest]
    #[case(2, 1)]
    #[case(3, 2)]
    #[case(4, 2)]
    #[case(5, 4)]
    #[case(8, 4)]
    #[case(9, 8)]
    fn split_point_is_largest_power_of_two_below_length(#[case] len: usize, #[case] k: usize) {
        assert_eq!(split_point(len), k);
    }

    #[test]
    fn empty_tree_hashes_to_sha256_of_nothing() {
        let tree = SimpleMerkleTree::new(&BTreeMap::new());
        assert_eq!(
            hex::encode(tree.root()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    #[case(16)]
    #[case(23)]
    fn every_key_verifies_against_root(#[case] size: u8) {
        let tree = tree_of(size);
        let root = tree.root().to_vec();
        for i in 0..size {
            let key = vec![b'k', i * 2];
            let proof = tree.prove_existence(&key).unwrap();
            assert!(ics23::verify_membership::<HostFunctionsManager>(
                &proof,
                &ics23::tendermint_spec(),
                &root,
                &key,
                &[i; 3],
            ));
        }
    }

    #[rstest]
    #[case::before_first(vec![b'a'])]
    #[case::between(vec![b'k', 3])]
    #[case::after_last(vec![b'z'])]
    fn absent_keys_verify_against_root(#[case] key: Vec<u8>) {
        let tree = tree_of(7);
        let root = tree.root().to_vec();
        let proof = tree.prove_absence(&key).unwrap();
        assert!(ics23::verify_non_membership::<HostFunctionsManager>(
            &proof,
            &ics23::tendermint_spec(),
            &root,
            &key,
        ));
    }

    #[test]
    fn existence_proof_rejects_wrong_value() {
        let tree = tree_of(4);
        let key = vec![b'k', 2];
        let proof = tree.prove_existence(&key).unwrap();
        assert!(!ics23::verify_membership::<HostFunctionsManager>(
            &proof,
            &ics23::tendermint_spec(),
            &tree.root().to_vec(),
            &key,
            b"other",
        ));
    }

    #[test]
    fn absence_cannot_be_proven_for_present_key() {
        let tree = tree_of(4);
        assert_eq!(
            tree.prove_absence(&[b'k', 0]),
            Err(CommitmentError::KeyExists(vec![b'k', 0]))
        );
        assert_eq!(
            CommitmentError::KeyExists(vec![b'k', 0]).to_string(),
            "key 6b00 is present in the tree"
        );
    }

    #[test]
    fn byte_vector_root_matches_manual_construction() {
        let items = [b"a".to_vec(), b"b".to_vec(), b"c".to_vec()];
        let expected = inner_hash(
            &inner_hash(&leaf_hash(b"a"), &leaf_hash(b"b")),
            &leaf_hash(b"c"),
        );
        assert_eq!(simple_hash_from_byte_vectors(&items), expected);
    }
}
