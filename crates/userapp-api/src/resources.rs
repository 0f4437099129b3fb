//! The administered resources: their column registries and their payload types.

use serde::de::DeserializeOwned;

use query_engine_execution::mutation::Payload;
use query_engine_metadata::metadata::{ScalarType, TableInfo, TablesInfo};

use crate::payloads;

pub const GROUPS: &str = "groups";
pub const USERS: &str = "users";
pub const PROJECTS: &str = "projects";
pub const NOTES: &str = "notes";
pub const SUBMIT_NODES: &str = "submit_nodes";
pub const TOKENS: &str = "tokens";
pub const USER_GROUPS: &str = "user_groups";
pub const USER_PROJECTS: &str = "user_projects";
pub const USER_NOTES: &str = "user_notes";
pub const USER_SUBMITS: &str = "user_submits";
pub const JOINED_PROJECTS: &str = "joined_projects";
pub const PI_PROJECTS: &str = "pi_projects";
pub const USER_SUBMIT_NODES: &str = "user_submit_nodes";

const SCHEMA: &str = "public";

/// The column registries of every collection the service reads or writes.
///
/// Secrets (`users.password`, `tokens.token`) are left out, so they are never
/// selected, filtered on or written through the API.
pub fn tables_info() -> TablesInfo {
    use ScalarType::{Boolean, Enum, Integer, String as Text, Timestamp};

    TablesInfo(
        [
            TableInfo::new(
                SCHEMA,
                GROUPS,
                "id",
                &[
                    ("id", Integer),
                    ("name", Text),
                    ("point_of_contact", Text),
                    ("unix_gid", Integer),
                    ("has_groupdir", Boolean),
                ],
            ),
            TableInfo::new(
                SCHEMA,
                USERS,
                "id",
                &[
                    ("id", Integer),
                    ("username", Text),
                    ("name", Text),
                    ("email1", Text),
                    ("email2", Text),
                    ("netid", Text),
                    ("netid_exp_datetime", Timestamp),
                    ("phone1", Text),
                    ("phone2", Text),
                    ("is_admin", Boolean),
                    ("active", Boolean),
                    ("date", Timestamp),
                    ("unix_uid", Integer),
                    ("position", Enum),
                ],
            ),
            TableInfo::new(
                SCHEMA,
                PROJECTS,
                "id",
                &[
                    ("id", Integer),
                    ("name", Text),
                    ("pi", Integer),
                    ("staff1", Text),
                    ("staff2", Text),
                    ("status", Text),
                    ("access", Text),
                    ("accounting_group", Text),
                    ("url", Text),
                    ("date", Timestamp),
                    ("ticket", Integer),
                    ("last_contact", Timestamp),
                ],
            ),
            TableInfo::new(
                SCHEMA,
                NOTES,
                "id",
                &[
                    ("id", Integer),
                    ("ticket", Text),
                    ("note", Text),
                    ("author", Text),
                    ("date", Timestamp),
                ],
            ),
            TableInfo::new(
                SCHEMA,
                SUBMIT_NODES,
                "id",
                &[("id", Integer), ("name", Text)],
            ),
            TableInfo::new(
                SCHEMA,
                TOKENS,
                "id",
                &[
                    ("id", Integer),
                    ("created_by", Integer),
                    ("description", Text),
                    ("created_at", Timestamp),
                    ("expires_at", Timestamp),
                ],
            ),
            TableInfo::new(
                SCHEMA,
                USER_GROUPS,
                "id",
                &[
                    ("id", Integer),
                    ("group_id", Integer),
                    ("user_id", Integer),
                ],
            ),
            TableInfo::new(
                SCHEMA,
                USER_PROJECTS,
                "id",
                &[
                    ("id", Integer),
                    ("project_id", Integer),
                    ("user_id", Integer),
                    ("role", Enum),
                    ("is_primary", Boolean),
                ],
            ),
            TableInfo::new(
                SCHEMA,
                USER_NOTES,
                "id",
                &[
                    ("id", Integer),
                    ("project_id", Integer),
                    ("note_id", Integer),
                    ("user_id", Integer),
                ],
            ),
            TableInfo::new(
                SCHEMA,
                USER_SUBMITS,
                "id",
                &[
                    ("id", Integer),
                    ("user_id", Integer),
                    ("submit_node_id", Integer),
                    ("for_auth_netid", Boolean),
                    ("disk_quota", Integer),
                    ("hpc_diskquota", Integer),
                    ("hpc_inodequota", Integer),
                    ("hpc_joblimit", Integer),
                    ("hpc_corelimit", Integer),
                    ("hpc_fairshare", Integer),
                ],
            ),
            // views
            TableInfo::new(
                SCHEMA,
                JOINED_PROJECTS,
                "user_id",
                &[
                    ("user_id", Integer),
                    ("project_id", Integer),
                    ("project_name", Text),
                    ("project_staff1", Text),
                    ("project_staff2", Text),
                    ("project_status", Text),
                    ("project_last_contact", Timestamp),
                    ("project_accounting_group", Text),
                    ("is_primary", Boolean),
                    ("role", Enum),
                    ("username", Text),
                    ("name", Text),
                    ("email1", Text),
                    ("email2", Text),
                    ("netid", Text),
                    ("netid_exp_datetime", Timestamp),
                    ("phone1", Text),
                    ("phone2", Text),
                    ("is_admin", Boolean),
                    ("active", Boolean),
                    ("date", Timestamp),
                    ("unix_uid", Integer),
                    ("position", Enum),
                    ("last_note_ticket", Text),
                ],
            ),
            TableInfo::new(
                SCHEMA,
                PI_PROJECTS,
                "project_id",
                &[
                    ("user_id", Integer),
                    ("username", Text),
                    ("name", Text),
                    ("project_id", Integer),
                    ("project_name", Text),
                ],
            ),
            TableInfo::new(
                SCHEMA,
                USER_SUBMIT_NODES,
                "id",
                &[
                    ("id", Integer),
                    ("user_id", Integer),
                    ("submit_node_id", Integer),
                    ("submit_node_name", Text),
                    ("for_auth_netid", Boolean),
                    ("disk_quota", Integer),
                    ("hpc_diskquota", Integer),
                    ("hpc_inodequota", Integer),
                    ("hpc_joblimit", Integer),
                    ("hpc_corelimit", Integer),
                    ("hpc_fairshare", Integer),
                ],
            ),
        ]
        .into_iter()
        .map(|table| (table.table_name.clone(), table))
        .collect(),
    )
}

/// A collection exposed through the list, get and delete routes.
pub trait Collection: Send + Sync + 'static {
    const COLLECTION: &'static str;
}

/// A collection that can also be created and updated.
pub trait Resource: Collection {
    type Create: Payload + DeserializeOwned + Send + Sync + 'static;
    type Update: Payload + DeserializeOwned + Send + Sync + 'static;
}

macro_rules! resource {
    ($name:ident, $collection:expr) => {
        pub struct $name;

        impl Collection for $name {
            const COLLECTION: &'static str = $collection;
        }
    };
    ($name:ident, $collection:expr, $create:ty, $update:ty) => {
        resource!($name, $collection);

        impl Resource for $name {
            type Create = $create;
            type Update = $update;
        }
    };
}

resource!(
    Groups,
    GROUPS,
    payloads::GroupCreate,
    payloads::GroupUpdate
);
resource!(Users, USERS, payloads::UserCreate, payloads::UserUpdate);
resource!(
    Projects,
    PROJECTS,
    payloads::ProjectCreate,
    payloads::ProjectUpdate
);
resource!(Notes, NOTES, payloads::NoteCreate, payloads::NoteUpdate);
resource!(
    SubmitNodes,
    SUBMIT_NODES,
    payloads::SubmitNodeCreate,
    payloads::SubmitNodeUpdate
);
resource!(Tokens, TOKENS);
resource!(PiProjects, PI_PROJECTS);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_collection_is_keyed_by_its_table_name() {
        let tables = tables_info();
        for collection in [
            GROUPS,
            USERS,
            PROJECTS,
            NOTES,
            SUBMIT_NODES,
            TOKENS,
            USER_GROUPS,
            USER_PROJECTS,
            USER_NOTES,
            USER_SUBMITS,
            JOINED_PROJECTS,
            PI_PROJECTS,
            USER_SUBMIT_NODES,
        ] {
            let table = tables.get(collection).unwrap();
            assert_eq!(table.table_name, collection);
            assert!(table.column(&table.primary_key).is_some());
        }
    }

    #[test]
    fn secrets_are_not_registered() {
        let tables = tables_info();
        assert!(tables.get(USERS).unwrap().column("password").is_none());
        assert!(tables.get(TOKENS).unwrap().column("token").is_none());
    }
}
