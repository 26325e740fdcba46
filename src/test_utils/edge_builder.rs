use crate::proto::materialize::permission_change::Child;
use crate::proto::materialize::permission_change::Kind;
use crate::proto::materialize::watch_permission_sets_response::Response;
use crate::proto::materialize::MemberReference;
use crate::proto::materialize::PermissionChange;
use crate::proto::materialize::SetReference;
use crate::proto::materialize::WatchPermissionSetsResponse;
use crate::proto::v1::ZedToken;
use crate::MemberToSet;
use crate::SetToSet;

pub fn set_reference(
    object_type: &str,
    object_id: &str,
    relation: &str,
) -> SetReference {
    SetReference {
        object_type: object_type.to_string(),
        object_id: object_id.to_string(),
        permission_or_relation: relation.to_string(),
    }
}

/// `child` and `parent` are (type, id, relation)
pub fn set_change(
    child: (&str, &str, &str),
    parent: (&str, &str, &str),
) -> PermissionChange {
    PermissionChange {
        revision: None,
        kind: Kind::MemberAdded as i32,
        parent_set: Some(set_reference(parent.0, parent.1, parent.2)),
        child: Some(Child::ChildSet(set_reference(child.0, child.1, child.2))),
    }
}

/// `member` is (type, id, relation); an empty relation means a direct member
pub fn member_change(
    member: (&str, &str, &str),
    set: (&str, &str, &str),
) -> PermissionChange {
    PermissionChange {
        revision: None,
        kind: Kind::MemberAdded as i32,
        parent_set: Some(set_reference(set.0, set.1, set.2)),
        child: Some(Child::ChildMember(MemberReference {
            object_type: member.0.to_string(),
            object_id: member.1.to_string(),
            optional_permission_or_relation: member.2.to_string(),
        })),
    }
}

pub fn change_response(change: PermissionChange) -> WatchPermissionSetsResponse {
    WatchPermissionSetsResponse {
        response: Some(Response::Change(change)),
    }
}

pub fn completed_revision_response(token: &str) -> WatchPermissionSetsResponse {
    WatchPermissionSetsResponse {
        response: Some(Response::CompletedRevision(zed_token(token))),
    }
}

pub fn zed_token(token: &str) -> ZedToken {
    ZedToken {
        token: token.to_string(),
    }
}

pub fn set_to_set(
    child: (&str, &str, &str),
    parent: (&str, &str, &str),
) -> SetToSet {
    SetToSet {
        child_type: child.0.to_string(),
        child_id: child.1.to_string(),
        child_relation: child.2.to_string(),
        parent_type: parent.0.to_string(),
        parent_id: parent.1.to_string(),
        parent_relation: parent.2.to_string(),
    }
}

pub fn member_to_set(
    member: (&str, &str, Option<&str>),
    set: (&str, &str, &str),
) -> MemberToSet {
    MemberToSet {
        member_type: member.0.to_string(),
        member_id: member.1.to_string(),
        member_relation: member.2.map(str::to_string),
        set_type: set.0.to_string(),
        set_id: set.1.to_string(),
        set_relation: set.2.to_string(),
    }
}
