use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::trace;

use crate::metrics::EDGES_MATERIALIZED;
use crate::metrics::MATERIALIZE_FAILURES;
use crate::proto::materialize::permission_change::Child;
use crate::proto::materialize::permission_change::Kind;
use crate::proto::materialize::PermissionChange;
use crate::Edge;
use crate::EdgeStore;
use crate::MemberToSet;
use crate::Result;
use crate::SetToSet;

/// Outcome of materializing one change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A new row was written
    Inserted(Edge),
    /// The edge was already mirrored
    Duplicate(Edge),
    /// The change carried no edge (missing parent set or child)
    Ignored,
}

/// Turns watch feed changes into edge rows.
pub struct ChangeMaterializer<S: EdgeStore> {
    store: Arc<S>,
}

impl<S: EdgeStore> ChangeMaterializer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Maps a change to the edge it describes.
    ///
    /// A child set yields a [`SetToSet`] edge, a child member a
    /// [`MemberToSet`] edge. An empty member relation means the member is
    /// referenced directly.
    pub fn classify(change: &PermissionChange) -> Option<Edge> {
        let parent = change.parent_set.as_ref()?;

        let edge = match change.child.as_ref()? {
            Child::ChildSet(child) => Edge::SetToSet(SetToSet {
                child_type: child.object_type.clone(),
                child_id: child.object_id.clone(),
                child_relation: child.permission_or_relation.clone(),
                parent_type: parent.object_type.clone(),
                parent_id: parent.object_id.clone(),
                parent_relation: parent.permission_or_relation.clone(),
            }),
            Child::ChildMember(member) => Edge::MemberToSet(MemberToSet {
                member_type: member.object_type.clone(),
                member_id: member.object_id.clone(),
                member_relation: Some(member.optional_permission_or_relation.clone())
                    .filter(|relation| !relation.is_empty()),
                set_type: parent.object_type.clone(),
                set_id: parent.object_id.clone(),
                set_relation: parent.permission_or_relation.clone(),
            }),
        };
        Some(edge)
    }

    /// Writes the edge carried by `change`.
    ///
    /// The change kind is not acted on: removals are mirrored as the edge
    /// they name, nothing is ever deleted.
    pub fn apply(
        &self,
        change: &PermissionChange,
    ) -> Result<Applied> {
        let Some(edge) = Self::classify(change) else {
            debug!(?change, "change carries no edge, ignored");
            return Ok(Applied::Ignored);
        };

        if change.kind() == Kind::MemberRemoved {
            debug!(?edge, "removal received, edge is kept");
        }

        let inserted = match &edge {
            Edge::SetToSet(row) => self.store.insert_set_to_set(row),
            Edge::MemberToSet(row) => self.store.insert_member_to_set(row),
        };

        match inserted {
            Ok(true) => {
                trace!(?edge, "edge inserted");
                EDGES_MATERIALIZED.with_label_values(&[edge.table(), "inserted"]).inc();
                Ok(Applied::Inserted(edge))
            }
            Ok(false) => {
                trace!(?edge, "edge already present");
                EDGES_MATERIALIZED.with_label_values(&[edge.table(), "duplicate"]).inc();
                Ok(Applied::Duplicate(edge))
            }
            Err(e) => {
                error!(table = edge.table(), "failed to insert edge {:?}: {:?}", edge, e);
                MATERIALIZE_FAILURES.with_label_values(&[edge.table()]).inc();
                Err(e)
            }
        }
    }
}
