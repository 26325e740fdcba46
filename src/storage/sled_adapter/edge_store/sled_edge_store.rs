use serde::de::DeserializeOwned;
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;
use tracing::debug;
use tracing::trace;

use crate::constants::M2S_SET_INDEX_TREE;
use crate::constants::MEMBER_TO_SET_TREE;
use crate::constants::S2S_PARENT_INDEX_TREE;
use crate::constants::SET_TO_SET_TREE;
use crate::storage::edge::member_prefix;
use crate::storage::edge::side_prefix;
use crate::EdgeStore;
use crate::MemberToSet;
use crate::Result;
use crate::SetToSet;
use crate::StorageError;

/// Sled-backed `SetToSet` / `MemberToSet` tables.
///
/// Each table is a primary tree keyed child/member side first, plus an index
/// tree keyed parent/set side first. Both hold the full row.
pub struct SledEdgeStore {
    db: sled::Db,
    set_to_set: sled::Tree,
    s2s_parent: sled::Tree,
    member_to_set: sled::Tree,
    m2s_set: sled::Tree,
}

impl std::fmt::Debug for SledEdgeStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SledEdgeStore")
            .field("set_to_set_len", &self.set_to_set.len())
            .field("member_to_set_len", &self.member_to_set.len())
            .finish()
    }
}

impl EdgeStore for SledEdgeStore {
    fn insert_set_to_set(
        &self,
        edge: &SetToSet,
    ) -> Result<bool> {
        let key = edge.child_key()?;
        let index_key = edge.parent_key()?;
        let row = bincode::serialize(edge).map_err(StorageError::from)?;

        let created = Self::insert_with_index(
            &self.set_to_set,
            &self.s2s_parent,
            &key,
            &index_key,
            &row,
        )?;
        trace!(created, ?edge, "insert_set_to_set");
        Ok(created)
    }

    fn insert_member_to_set(
        &self,
        edge: &MemberToSet,
    ) -> Result<bool> {
        let key = edge.member_key()?;
        let index_key = edge.set_key()?;
        let row = bincode::serialize(edge).map_err(StorageError::from)?;

        let created = Self::insert_with_index(
            &self.member_to_set,
            &self.m2s_set,
            &key,
            &index_key,
            &row,
        )?;
        trace!(created, ?edge, "insert_member_to_set");
        Ok(created)
    }

    fn flush(&self) -> Result<usize> {
        Ok(self.db.flush()?)
    }
}

impl SledEdgeStore {
    pub fn new(db: sled::Db) -> Result<Self> {
        debug!("opening edge trees");
        Ok(Self {
            set_to_set: db.open_tree(SET_TO_SET_TREE)?,
            s2s_parent: db.open_tree(S2S_PARENT_INDEX_TREE)?,
            member_to_set: db.open_tree(MEMBER_TO_SET_TREE)?,
            m2s_set: db.open_tree(M2S_SET_INDEX_TREE)?,
            db,
        })
    }

    /// Sets the given child set belongs to
    pub fn set_to_set_by_child(
        &self,
        child_type: &str,
        child_id: &str,
        child_relation: &str,
    ) -> Result<Vec<SetToSet>> {
        scan_rows(
            &self.set_to_set,
            side_prefix(child_type, child_id, child_relation)?,
        )
    }

    /// Sets directly contained in the given parent set
    pub fn set_to_set_by_parent(
        &self,
        parent_type: &str,
        parent_id: &str,
        parent_relation: &str,
    ) -> Result<Vec<SetToSet>> {
        scan_rows(
            &self.s2s_parent,
            side_prefix(parent_type, parent_id, parent_relation)?,
        )
    }

    /// Sets the given member belongs to
    pub fn member_to_set_by_member(
        &self,
        member_type: &str,
        member_id: &str,
        member_relation: Option<&str>,
    ) -> Result<Vec<MemberToSet>> {
        scan_rows(
            &self.member_to_set,
            member_prefix(member_type, member_id, member_relation)?,
        )
    }

    /// Members directly contained in the given set
    pub fn member_to_set_by_set(
        &self,
        set_type: &str,
        set_id: &str,
        set_relation: &str,
    ) -> Result<Vec<MemberToSet>> {
        scan_rows(&self.m2s_set, side_prefix(set_type, set_id, set_relation)?)
    }

    pub fn set_to_set_len(&self) -> usize {
        self.set_to_set.len()
    }

    pub fn member_to_set_len(&self) -> usize {
        self.member_to_set.len()
    }

    fn insert_with_index(
        rows: &sled::Tree,
        index: &sled::Tree,
        key: &[u8],
        index_key: &[u8],
        row: &[u8],
    ) -> Result<bool> {
        let created = (rows, index)
            .transaction(|(rows, index)| {
                let previous = rows.insert(key, row)?;
                index.insert(index_key, row)?;
                Ok::<_, ConflictableTransactionError<StorageError>>(previous.is_none())
            })
            .map_err(StorageError::from)?;
        Ok(created)
    }
}

fn scan_rows<T: DeserializeOwned>(
    tree: &sled::Tree,
    prefix: Vec<u8>,
) -> Result<Vec<T>> {
    tree.scan_prefix(prefix)
        .map(|item| -> Result<T> {
            let (key, value) = item?;
            let row = bincode::deserialize(&value).map_err(|e| StorageError::DataCorruption {
                location: format!("{}:{:?} ({e})", String::from_utf8_lossy(&tree.name()), key),
            })?;
            Ok(row)
        })
        .collect()
}
