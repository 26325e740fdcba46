//! Relationship tuples for the permissions service.
//!
//! The schema these builders target:
//!
//! ```text
//! definition user {}
//!
//! definition repo {
//!     relation owner: user
//!     relation collaborator: user
//!     permission view = owner + collaborator
//! }
//! ```

use crate::proto::v1::relationship_update::Operation;
use crate::proto::v1::ObjectReference;
use crate::proto::v1::Relationship;
use crate::proto::v1::RelationshipUpdate;
use crate::proto::v1::SubjectReference;

pub const SUBJECT_USER: &str = "user";
pub const RESOURCE_REPO: &str = "repo";
pub const RELATION_OWNER: &str = "owner";
pub const RELATION_COLLABORATOR: &str = "collaborator";
pub const PERMISSION_VIEW: &str = "view";

/// `(resource_type, resource_id)` has `relation` to `(subject_type, subject_id)`
pub fn relationship(
    resource: (&str, &str),
    relation: &str,
    subject: (&str, &str),
) -> Relationship {
    Relationship {
        resource: Some(ObjectReference {
            object_type: resource.0.to_string(),
            object_id: resource.1.to_string(),
        }),
        relation: relation.to_string(),
        subject: Some(SubjectReference {
            object: Some(ObjectReference {
                object_type: subject.0.to_string(),
                object_id: subject.1.to_string(),
            }),
            optional_relation: String::new(),
        }),
    }
}

pub fn repo_owner_relationship(
    repo_id: i64,
    owner_id: i64,
) -> Relationship {
    relationship(
        (RESOURCE_REPO, &repo_id.to_string()),
        RELATION_OWNER,
        (SUBJECT_USER, &owner_id.to_string()),
    )
}

pub fn repo_collaborator_relationship(
    repo_id: i64,
    collaborator_id: i64,
) -> Relationship {
    relationship(
        (RESOURCE_REPO, &repo_id.to_string()),
        RELATION_COLLABORATOR,
        (SUBJECT_USER, &collaborator_id.to_string()),
    )
}

/// Upsert of `relationship`; writing it twice is not an error.
pub fn touch(relationship: Relationship) -> RelationshipUpdate {
    RelationshipUpdate {
        operation: Operation::Touch as i32,
        relationship: Some(relationship),
    }
}
