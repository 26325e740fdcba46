// -
// Database namespaces

/// Sled database tree namespaces
pub(crate) const SET_TO_SET_TREE: &str = "set_to_set";
pub(crate) const S2S_PARENT_INDEX_TREE: &str = "s2s_parent";
pub(crate) const MEMBER_TO_SET_TREE: &str = "member_to_set";
pub(crate) const M2S_SET_INDEX_TREE: &str = "m2s_set";
pub(crate) const WATCH_STATE_TREE: &str = "watch_state";

/// Sled entry key namespaces
pub(crate) const WATCH_STATE_RESUME_CURSOR_KEY: &str = "_watch_resume_cursor";

/// Database directory under `storage.db_root_dir`
pub(crate) const MIRROR_DB_DIR: &str = "permset_mirror";

/// Metric labels
pub(crate) const SET_TO_SET_TABLE: &str = "set_to_set";
pub(crate) const MEMBER_TO_SET_TABLE: &str = "member_to_set";
