//! Edge rows of the mirrored permission-set graph.
//!
//! Rows are keyed by their full natural key, serialized with bincode. Because
//! bincode writes tuple fields back to back with a length prefix per string,
//! the encoding of the first three fields is a byte prefix of the full key,
//! which is what the side lookups scan for.

use serde::Deserialize;
use serde::Serialize;

use crate::constants::MEMBER_TO_SET_TABLE;
use crate::constants::SET_TO_SET_TABLE;
use crate::StorageError;

/// Parent set contains child set (or child permission) in its definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetToSet {
    pub child_type: String,
    pub child_id: String,
    pub child_relation: String,
    pub parent_type: String,
    pub parent_id: String,
    pub parent_relation: String,
}

/// Member object belongs to a set, optionally through one of its own
/// relations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberToSet {
    pub member_type: String,
    pub member_id: String,
    /// `None` when the member is referenced directly
    pub member_relation: Option<String>,
    pub set_type: String,
    pub set_id: String,
    pub set_relation: String,
}

/// One structural fact, as produced by the materializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edge {
    SetToSet(SetToSet),
    MemberToSet(MemberToSet),
}

impl Edge {
    pub fn table(&self) -> &'static str {
        match self {
            Edge::SetToSet(_) => SET_TO_SET_TABLE,
            Edge::MemberToSet(_) => MEMBER_TO_SET_TABLE,
        }
    }
}

impl SetToSet {
    /// Primary key, led by the child side (`s2s_child`)
    pub(crate) fn child_key(&self) -> std::result::Result<Vec<u8>, StorageError> {
        Ok(bincode::serialize(&(
            &self.child_type,
            &self.child_id,
            &self.child_relation,
            &self.parent_type,
            &self.parent_id,
            &self.parent_relation,
        ))?)
    }

    /// Index key, led by the parent side (`s2s_parent`)
    pub(crate) fn parent_key(&self) -> std::result::Result<Vec<u8>, StorageError> {
        Ok(bincode::serialize(&(
            &self.parent_type,
            &self.parent_id,
            &self.parent_relation,
            &self.child_type,
            &self.child_id,
            &self.child_relation,
        ))?)
    }
}

impl MemberToSet {
    /// Primary key, led by the member side (`m2s_member`)
    pub(crate) fn member_key(&self) -> std::result::Result<Vec<u8>, StorageError> {
        Ok(bincode::serialize(&(
            &self.member_type,
            &self.member_id,
            &self.member_relation,
            &self.set_type,
            &self.set_id,
            &self.set_relation,
        ))?)
    }

    /// Index key, led by the set side (`m2s_set`)
    pub(crate) fn set_key(&self) -> std::result::Result<Vec<u8>, StorageError> {
        Ok(bincode::serialize(&(
            &self.set_type,
            &self.set_id,
            &self.set_relation,
            &self.member_type,
            &self.member_id,
            &self.member_relation,
        ))?)
    }
}

/// Prefix matching every key whose first three fields are the given side.
pub(crate) fn side_prefix(
    object_type: &str,
    object_id: &str,
    relation: &str,
) -> std::result::Result<Vec<u8>, StorageError> {
    Ok(bincode::serialize(&(object_type, object_id, relation))?)
}

/// Same as [`side_prefix`] for the member side, whose relation is optional.
pub(crate) fn member_prefix(
    member_type: &str,
    member_id: &str,
    member_relation: Option<&str>,
) -> std::result::Result<Vec<u8>, StorageError> {
    Ok(bincode::serialize(&(member_type, member_id, member_relation))?)
}
