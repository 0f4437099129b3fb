mod common;

mod records {
    use serde_json::json;

    use query_engine_execution::error::{Error, ErrorKind};
    use query_engine_execution::mutation::{self, Patch};
    use tests_common::database::test_database;

    use super::common::{self, Group, User};

    #[tokio::test]
    async fn create_update_delete() {
        let Some(database) = test_database().await else {
            return;
        };
        let tables = common::tables_info();
        let metrics = common::metrics();
        let mut connection = database.pool.acquire().await.unwrap();

        let created = mutation::create_one(
            &mut connection,
            &metrics,
            &tables,
            "groups",
            &Group {
                unix_gid: Patch::Value(6000),
                ..Group::named("geology")
            },
        )
        .await
        .unwrap();
        let id = created["id"].as_i64().unwrap();
        assert_eq!(
            created,
            json!({
                "id": id,
                "name": "geology",
                "point_of_contact": null,
                "unix_gid": 6000,
                "has_groupdir": true
            })
        );

        let updated = mutation::update_one(
            &mut connection,
            &metrics,
            &tables,
            "groups",
            id,
            &Group {
                name: Patch::Missing,
                point_of_contact: Patch::Value("Marie".to_string()),
                unix_gid: Patch::Null,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated["name"], json!("geology"));
        assert_eq!(updated["point_of_contact"], json!("Marie"));
        assert_eq!(updated["unix_gid"], json!(null));

        mutation::delete_one(&mut connection, &metrics, &tables, "groups", id)
            .await
            .unwrap();
        let err = mutation::get_one(&mut connection, &metrics, &tables, "groups", id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        assert_eq!(metrics.record_operations_total.get(), 3);
    }

    #[tokio::test]
    async fn empty_updates_only_reread() {
        let Some(database) = test_database().await else {
            return;
        };
        let tables = common::tables_info();
        let metrics = common::metrics();
        let mut connection = database.pool.acquire().await.unwrap();

        let created = mutation::create_one(
            &mut connection,
            &metrics,
            &tables,
            "groups",
            &Group::named("optics"),
        )
        .await
        .unwrap();
        let id = created["id"].as_i64().unwrap();

        let unchanged = mutation::update_one(
            &mut connection,
            &metrics,
            &tables,
            "groups",
            id,
            &Group {
                name: Patch::Missing,
                point_of_contact: Patch::Missing,
                unix_gid: Patch::Missing,
            },
        )
        .await
        .unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn the_database_converts_timestamps_and_enums() {
        let Some(database) = test_database().await else {
            return;
        };
        let tables = common::tables_info();
        let metrics = common::metrics();
        let mut connection = database.pool.acquire().await.unwrap();

        let created = mutation::create_one(
            &mut connection,
            &metrics,
            &tables,
            "users",
            &User {
                email1: "ada@example.org".to_string(),
                username: Some("ada".to_string()),
                date: Some("2024-01-31 12:00:00".to_string()),
                position: Some("FACULTY".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(created["date"], json!("2024-01-31T12:00:00"));
        assert_eq!(created["position"], json!("FACULTY"));

        let err = mutation::create_one(
            &mut connection,
            &metrics,
            &tables,
            "users",
            &User {
                email1: "bob@example.org".to_string(),
                username: None,
                date: None,
                position: Some("WIZARD".to_string()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)), "{err:?}");
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let Some(database) = test_database().await else {
            return;
        };
        let tables = common::tables_info();
        let metrics = common::metrics();
        let mut connection = database.pool.acquire().await.unwrap();

        let err = mutation::update_one(
            &mut connection,
            &metrics,
            &tables,
            "groups",
            99,
            &Group::named("nothing"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = mutation::delete_one(&mut connection, &metrics, &tables, "groups", 99)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(metrics.record_operations_total.get(), 0);
    }
}

mod listings {
    use serde_json::json;

    use query_engine_execution::{mutation, query};
    use query_engine_translation::translation;
    use query_engine_translation::translation::query::root::{JoinRestriction, Restriction};
    use tests_common::database::test_database;

    use super::common::{self, Group, Membership, User};

    #[tokio::test]
    async fn pages_and_counts_agree() {
        let Some(database) = test_database().await else {
            return;
        };
        let tables = common::tables_info();
        let metrics = common::metrics();
        let mut connection = database.pool.acquire().await.unwrap();

        for name in ["a1", "a2", "a3", "b1", "b2"] {
            mutation::create_one(
                &mut connection,
                &metrics,
                &tables,
                "groups",
                &Group::named(name),
            )
            .await
            .unwrap();
        }

        let plan = translation::query::translate(
            &tables,
            "groups",
            None,
            &common::params(&[
                ("name", "like.a%"),
                ("name", "order_by.desc"),
                ("page", "0"),
                ("page_size", "2"),
            ]),
        )
        .unwrap();
        let result = query::execute(&mut connection, &metrics, plan).await.unwrap();

        assert_eq!(result.total_count, 3);
        let names: Vec<_> = result
            .rows
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("a3"), json!("a2")]);
        assert_eq!(metrics.list_queries_total.get(), 1);
    }

    #[tokio::test]
    async fn empty_listings_are_empty_arrays() {
        let Some(database) = test_database().await else {
            return;
        };
        let tables = common::tables_info();
        let metrics = common::metrics();
        let mut connection = database.pool.acquire().await.unwrap();

        let plan = translation::query::translate(&tables, "groups", None, &[]).unwrap();
        let result = query::execute(&mut connection, &metrics, plan).await.unwrap();
        assert_eq!(result.rows, json!([]));
        assert_eq!(result.total_count, 0);
    }

    #[tokio::test]
    async fn join_restrictions_follow_memberships() {
        let Some(database) = test_database().await else {
            return;
        };
        let tables = common::tables_info();
        let metrics = common::metrics();
        let mut connection = database.pool.acquire().await.unwrap();

        let group = mutation::create_one(
            &mut connection,
            &metrics,
            &tables,
            "groups",
            &Group::named("hpc"),
        )
        .await
        .unwrap();
        let group_id = group["id"].as_i64().unwrap();

        let mut user_ids = vec![];
        for email in ["a@example.org", "b@example.org"] {
            let user = mutation::create_one(
                &mut connection,
                &metrics,
                &tables,
                "users",
                &User {
                    email1: email.to_string(),
                    username: None,
                    date: None,
                    position: None,
                },
            )
            .await
            .unwrap();
            user_ids.push(user["id"].as_i64().unwrap());
        }

        mutation::create_one(
            &mut connection,
            &metrics,
            &tables,
            "user_groups",
            &Membership {
                group_id,
                user_id: user_ids[0],
            },
        )
        .await
        .unwrap();

        let restriction = Restriction::Joined(JoinRestriction {
            join_collection: "user_groups".to_string(),
            source_column: "user_id".to_string(),
            target_column: "group_id".to_string(),
            target_id: group_id,
        });
        let plan = translation::query::translate(&tables, "users", Some(&restriction), &[]).unwrap();
        let result = query::execute(&mut connection, &metrics, plan).await.unwrap();
        assert_eq!(result.total_count, 1);
        assert_eq!(result.rows[0]["email1"], json!("a@example.org"));

        mutation::delete_matching(
            &mut connection,
            &metrics,
            &tables,
            "user_groups",
            &[("group_id", group_id), ("user_id", user_ids[0])],
        )
        .await
        .unwrap();
        let err = mutation::delete_matching(
            &mut connection,
            &metrics,
            &tables,
            "user_groups",
            &[("group_id", group_id), ("user_id", user_ids[0])],
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            query_engine_execution::error::Error::NotFound(_)
        ));
    }
}
