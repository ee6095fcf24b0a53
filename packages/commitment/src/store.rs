//! A versioned, provable key-value store.
//!
//! Writes go to a working set. [`MemoryStore::commit`] freezes the working set
//! as the version for the next height and computes its app hash: the root of
//! a multistore tree holding the root of the IBC sub-store under the store
//! name. Committed versions are never mutated, so reads and proofs at a given
//! height always see the same snapshot.
//!
//! Every commit copies the working set and rebuilds both trees, so its cost is
//! linear in the number of entries. Versions are kept until
//! [`MemoryStore::prune_below`] drops them.

use std::collections::BTreeMap;

use ics23::CommitmentProof;

use crate::{
    commitment::{CommitmentPrefix, CommitmentRoot},
    error::StoreError,
    merkle::MerkleProof,
    tree::SimpleMerkleTree,
};

/// Byte-oriented key-value storage
pub trait KvStore {
    /// Reads the value stored at `key`
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Writes `value` at `key`, replacing any previous value
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);

    /// Removes the value at `key`
    fn delete(&mut self, key: &[u8]);

    /// All entries whose key starts with `prefix`, in key order
    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;
}

impl KvStore for BTreeMap<Vec<u8>, Vec<u8>> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        BTreeMap::get(self, key).cloned()
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.insert(key, value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.remove(key);
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[derive(Clone, Debug)]
struct Snapshot {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
    store_tree: SimpleMerkleTree,
    multistore_tree: SimpleMerkleTree,
}

impl Snapshot {
    fn new(store_name: &[u8], entries: BTreeMap<Vec<u8>, Vec<u8>>) -> Self {
        let store_tree = SimpleMerkleTree::new(&entries);
        let multistore =
            BTreeMap::from([(store_name.to_vec(), store_tree.root().to_vec())]);
        let multistore_tree = SimpleMerkleTree::new(&multistore);

        Self {
            entries,
            store_tree,
            multistore_tree,
        }
    }
}

/// An in-memory [`KvStore`] that keeps every committed version
#[derive(Clone, Debug)]
pub struct MemoryStore {
    store_name: Vec<u8>,
    working: BTreeMap<Vec<u8>, Vec<u8>>,
    versions: BTreeMap<u64, Snapshot>,
}

impl MemoryStore {
    /// Creates an empty store whose IBC sub-store is named `store_name`
    #[must_use]
    pub fn new(store_name: impl Into<Vec<u8>>) -> Self {
        Self {
            store_name: store_name.into(),
            working: BTreeMap::new(),
            versions: BTreeMap::new(),
        }
    }

    /// The prefix counterparties must apply to paths in this store
    #[must_use]
    pub fn prefix(&self) -> CommitmentPrefix {
        CommitmentPrefix::new(self.store_name.clone())
    }

    /// The most recently committed height, if any
    #[must_use]
    pub fn latest_height(&self) -> Option<u64> {
        self.versions.keys().next_back().copied()
    }

    /// Commits the working set as the next height and returns that height and its app hash
    pub fn commit(&mut self) -> (u64, CommitmentRoot) {
        let height = self.latest_height().map_or(1, |h| h + 1);
        let snapshot = Snapshot::new(&self.store_name, self.working.clone());
        let root = CommitmentRoot::from_bytes(&snapshot.multistore_tree.root());
        self.versions.insert(height, snapshot);
        (height, root)
    }

    /// Drops every version below `height`, except the latest one.
    ///
    /// Returns the number of versions dropped. Reads and proofs at a dropped
    /// height fail with [`StoreError::VersionNotFound`].
    pub fn prune_below(&mut self, height: u64) -> usize {
        let Some(latest) = self.latest_height() else {
            return 0;
        };
        let kept = self.versions.split_off(&height.min(latest));
        let dropped = self.versions.len();
        self.versions = kept;
        dropped
    }

    /// The committed heights still held, in ascending order
    pub fn heights(&self) -> impl Iterator<Item = u64> + '_ {
        self.versions.keys().copied()
    }

    fn snapshot(&self, height: u64) -> Result<&Snapshot, StoreError> {
        self.versions
            .get(&height)
            .ok_or(StoreError::VersionNotFound(height))
    }

    /// The app hash committed at `height`
    /// # Errors
    /// Returns an error if nothing was committed at `height`
    pub fn root_at(&self, height: u64) -> Result<CommitmentRoot, StoreError> {
        let snapshot = self.snapshot(height)?;
        Ok(CommitmentRoot::from_bytes(&snapshot.multistore_tree.root()))
    }

    /// Reads `key` as of `height`
    /// # Errors
    /// Returns an error if nothing was committed at `height`
    pub fn get_at(&self, height: u64, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.snapshot(height)?.entries.get(key).cloned())
    }

    /// All entries under `prefix` as of `height`
    /// # Errors
    /// Returns an error if nothing was committed at `height`
    pub fn prefix_iter_at(
        &self,
        height: u64,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        Ok(self.snapshot(height)?.entries.prefix_iter(prefix))
    }

    /// Reads `key` as of `height` together with a proof of the result.
    ///
    /// The proof has two levels: membership or non-membership of `key` in the
    /// IBC sub-store, then membership of the sub-store root in the multistore.
    /// # Errors
    /// Returns an error if nothing was committed at `height`
    pub fn query_with_proof(
        &self,
        height: u64,
        key: &[u8],
    ) -> Result<(Option<Vec<u8>>, MerkleProof), StoreError> {
        let snapshot = self.snapshot(height)?;
        let (value, store_proof) = snapshot.store_tree.prove(key);
        let multistore_proof: CommitmentProof =
            snapshot.multistore_tree.prove_existence(&self.store_name)?;

        Ok((
            value,
            MerkleProof {
                proofs: vec![store_proof, multistore_proof],
            },
        ))
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.working.get(key).cloned()
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.working.insert(key, value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.working.remove(key);
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.working.prefix_iter(prefix)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{specs::ProofSpecs, CommitmentError};

    use super::*;

    fn store_with(entries: &[(&str, &str)]) -> MemoryStore {
        let mut store = MemoryStore::new(*b"ibc");
        for (key, value) in entries {
            store.set(key.as_bytes().to_vec(), value.as_bytes().to_vec());
        }
        store
    }

    #[test]
    fn commit_assigns_consecutive_heights() {
        let mut store = store_with(&[("a", "1")]);
        assert_eq!(store.latest_height(), None);
        assert_eq!(store.commit().0, 1);
        assert_eq!(store.commit().0, 2);
        assert_eq!(store.latest_height(), Some(2));
    }

    #[test]
    fn committed_versions_are_immutable() {
        let mut store = store_with(&[("a", "1")]);
        let (h1, root1) = store.commit();
        store.set(b"a".to_vec(), b"2".to_vec());
        store.delete(b"missing");
        let (h2, root2) = store.commit();

        assert_ne!(root1, root2);
        assert_eq!(store.root_at(h1).unwrap(), root1);
        assert_eq!(store.get_at(h1, b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get_at(h2, b"a").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn unknown_height_is_an_error() {
        let store = store_with(&[]);
        assert_eq!(store.root_at(3), Err(StoreError::VersionNotFound(3)));
    }

    #[test]
    fn proof_of_present_key_verifies_against_app_hash() {
        let mut store = store_with(&[("connections/connection-0", "conn"), ("x", "y")]);
        let (height, root) = store.commit();
        let (value, proof) = store
            .query_with_proof(height, b"connections/connection-0")
            .unwrap();

        assert_eq!(value.as_deref(), Some(b"conn".as_slice()));
        proof
            .verify_membership(
                &ProofSpecs::simple(),
                &root,
                &store.prefix().apply(b"connections/connection-0".to_vec()),
                b"conn".to_vec(),
            )
            .unwrap();
    }

    #[test]
    fn proof_of_absent_key_verifies_against_app_hash() {
        let mut store = store_with(&[("a", "1"), ("c", "3")]);
        let (height, root) = store.commit();
        let (value, proof) = store.query_with_proof(height, b"b").unwrap();

        assert_eq!(value, None);
        proof
            .verify_non_membership(&ProofSpecs::simple(), &root, &store.prefix().apply(*b"b"))
            .unwrap();
    }

    #[test]
    fn proof_from_old_height_fails_against_new_root() {
        let mut store = store_with(&[("a", "1")]);
        let (h1, _) = store.commit();
        store.set(b"a".to_vec(), b"2".to_vec());
        let (_, root2) = store.commit();
        let (_, proof) = store.query_with_proof(h1, b"a").unwrap();

        let err = proof
            .verify_membership(
                &ProofSpecs::simple(),
                &root2,
                &store.prefix().apply(*b"a"),
                b"1".to_vec(),
            )
            .unwrap_err();
        assert!(matches!(err, CommitmentError::RootMismatch { .. }));
    }

    #[test]
    fn prefix_iteration_stops_at_prefix_boundary() {
        let store = store_with(&[("clients/a", "1"), ("clients/b", "2"), ("connections/c", "3")]);
        let found = store.prefix_iter(b"clients/");
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].0, b"clients/b");
    }

    #[rstest]
    #[case::nothing_below(1, 0, &[1, 2, 3, 4])]
    #[case::older_versions(3, 2, &[3, 4])]
    #[case::latest_is_kept(10, 3, &[4])]
    fn pruning_drops_old_versions(
        #[case] below: u64,
        #[case] dropped: usize,
        #[case] remaining: &[u64],
    ) {
        let mut store = store_with(&[("a", "1")]);
        for _ in 0..4 {
            store.commit();
        }

        assert_eq!(store.prune_below(below), dropped);
        assert_eq!(store.heights().collect::<Vec<_>>(), remaining);
        assert_eq!(store.latest_height(), Some(4));
    }

    #[test]
    fn pruned_version_cannot_be_queried() {
        let mut store = store_with(&[("a", "1")]);
        let (h1, _) = store.commit();
        let (h2, root2) = store.commit();
        store.prune_below(h2);

        assert_eq!(
            store.query_with_proof(h1, b"a").unwrap_err(),
            StoreError::VersionNotFound(h1)
        );
        assert_eq!(store.root_at(h2).unwrap(), root2);
        assert_eq!(store.commit().0, h2 + 1);
    }

    #[test]
    fn pruning_an_empty_store_is_a_no_op() {
        let mut store = store_with(&[]);
        assert_eq!(store.prune_below(5), 0);
        assert_eq!(store.commit().0, 1);
    }
}
