//! Execute single-record operations: get, create, update and delete by primary key.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Row;
use tracing::{info_span, Instrument};

use query_engine_metadata::metadata;
use query_engine_sql::sql;
use query_engine_translation::translation;

use crate::error::Error;
use crate::metrics;
use crate::query::build_query_with_params;

/// A typed body for creating or updating a record.
///
/// The payload serialises to a JSON object whose keys are column names. Fields
/// that should be left alone must be absent from the object.
pub trait Payload: Serialize {
    /// Check the payload before it reaches the database.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// A field of an update payload, telling apart a field that was left out from
/// one that was explicitly set to null.
///
/// Use with `#[serde(default, skip_serializing_if = "Patch::is_missing")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    /// The value, if one was given.
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(value) => Some(value),
            Patch::Missing | Patch::Null => None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            None => Patch::Null,
            Some(value) => Patch::Value(value),
        })
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Missing | Patch::Null => serializer.serialize_none(),
            Patch::Value(value) => value.serialize(serializer),
        }
    }
}

/// Validate a payload and turn it into the JSON object handed to the database.
/// Every key must be a column of the table. Empty strings become null.
pub fn to_record<P: Payload>(
    table_info: &metadata::TableInfo,
    payload: &P,
) -> Result<serde_json::Map<String, serde_json::Value>, Error> {
    payload.validate().map_err(Error::ValidationFailure)?;

    let serde_json::Value::Object(mut record) =
        serde_json::to_value(payload).map_err(|err| Error::ValidationFailure(err.to_string()))?
    else {
        return Err(Error::ValidationFailure(
            "payload must be a JSON object".to_string(),
        ));
    };

    if let Some(unknown) = record.keys().find(|key| table_info.column(key).is_none()) {
        return Err(Error::ValidationFailure(format!("unknown field '{unknown}'")));
    }

    for value in record.values_mut() {
        if value.as_str() == Some("") {
            *value = serde_json::Value::Null;
        }
    }

    Ok(record)
}

/// Fetch one record by primary key.
pub async fn get_one(
    connection: &mut sqlx::PgConnection,
    metrics: &metrics::Metrics,
    tables_info: &metadata::TablesInfo,
    collection: &str,
    id: i64,
) -> Result<serde_json::Value, Error> {
    let record = fetch_one(connection, tables_info, collection, id)
        .instrument(info_span!("Get record", collection, id))
        .await?
        .ok_or_else(|| not_found(collection, id))?;

    metrics.record_operations_total.inc();
    Ok(record)
}

/// Insert a record, then read it back to pick up the values the database filled in.
pub async fn create_one<P: Payload>(
    connection: &mut sqlx::PgConnection,
    metrics: &metrics::Metrics,
    tables_info: &metadata::TablesInfo,
    collection: &str,
    payload: &P,
) -> Result<serde_json::Value, Error> {
    let table_info = lookup_table(tables_info, collection)?;
    let record = to_record(table_info, payload)?;

    let created = async {
        let plan = translation::mutation::insert_one(tables_info, collection, &record)?;
        let query = plan.query.query_sql();
        log_statement(collection, &query);

        let row = build_query_with_params(&query)
            .fetch_one(&mut *connection)
            .await?;
        let id: i64 = row.try_get(0)?;

        fetch_one(connection, tables_info, collection, id)
            .await?
            .ok_or_else(|| not_found(collection, id))
    }
    .instrument(info_span!("Create record", collection))
    .await?;

    metrics.record_operations_total.inc();
    Ok(created)
}

/// Change the fields present in the payload, then read the record back.
pub async fn update_one<P: Payload>(
    connection: &mut sqlx::PgConnection,
    metrics: &metrics::Metrics,
    tables_info: &metadata::TablesInfo,
    collection: &str,
    id: i64,
    payload: &P,
) -> Result<serde_json::Value, Error> {
    let table_info = lookup_table(tables_info, collection)?;
    let record = to_record(table_info, payload)?;

    let updated = async {
        if fetch_one(connection, tables_info, collection, id)
            .await?
            .is_none()
        {
            return Err(not_found(collection, id));
        }

        if let Some(plan) = translation::mutation::update_one(tables_info, collection, id, &record)?
        {
            let query = plan.query.query_sql();
            log_statement(collection, &query);
            build_query_with_params(&query)
                .execute(&mut *connection)
                .await?;
        }

        fetch_one(connection, tables_info, collection, id)
            .await?
            .ok_or_else(|| not_found(collection, id))
    }
    .instrument(info_span!("Update record", collection, id))
    .await?;

    metrics.record_operations_total.inc();
    Ok(updated)
}

/// Delete a record by primary key.
pub async fn delete_one(
    connection: &mut sqlx::PgConnection,
    metrics: &metrics::Metrics,
    tables_info: &metadata::TablesInfo,
    collection: &str,
    id: i64,
) -> Result<(), Error> {
    async {
        if fetch_one(connection, tables_info, collection, id)
            .await?
            .is_none()
        {
            return Err(not_found(collection, id));
        }

        let plan = translation::mutation::delete_one(tables_info, collection, id)?;
        let query = plan.query.query_sql();
        log_statement(collection, &query);
        build_query_with_params(&query)
            .execute(&mut *connection)
            .await?;
        Ok(())
    }
    .instrument(info_span!("Delete record", collection, id))
    .await?;

    metrics.record_operations_total.inc();
    Ok(())
}

/// Delete the rows whose integer columns equal the given values.
/// Fails with `NotFound` when nothing matched.
pub async fn delete_matching(
    connection: &mut sqlx::PgConnection,
    metrics: &metrics::Metrics,
    tables_info: &metadata::TablesInfo,
    collection: &str,
    matching: &[(&str, i64)],
) -> Result<(), Error> {
    let plan = translation::mutation::delete_matching(tables_info, collection, matching)?;
    let query = plan.query.query_sql();
    log_statement(collection, &query);

    let deleted = build_query_with_params(&query)
        .execute(&mut *connection)
        .instrument(info_span!("Delete matching records", collection))
        .await?
        .rows_affected();

    if deleted == 0 {
        let description = matching
            .iter()
            .map(|(column, value)| format!("{column} = {value}"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::NotFound(format!("{collection} with {description}")));
    }

    metrics.record_operations_total.inc();
    Ok(())
}

async fn fetch_one(
    connection: &mut sqlx::PgConnection,
    tables_info: &metadata::TablesInfo,
    collection: &str,
    id: i64,
) -> Result<Option<serde_json::Value>, Error> {
    let plan = translation::mutation::get_one(tables_info, collection, id)?;
    let query = sql::execution_plan::select_to_sql(&plan.query);
    log_statement(collection, &query);

    let row = build_query_with_params(&query)
        .fetch_optional(&mut *connection)
        .await?;
    match row {
        None => Ok(None),
        Some(row) => Ok(Some(row.try_get(0)?)),
    }
}

fn lookup_table<'a>(
    tables_info: &'a metadata::TablesInfo,
    collection: &str,
) -> Result<&'a metadata::TableInfo, Error> {
    tables_info
        .get(collection)
        .ok_or_else(|| translation::error::Error::CollectionNotFound(collection.to_string()).into())
}

fn log_statement(collection: &str, query: &sql::string::SQL) {
    tracing::debug!(
        collection,
        generated_sql = query.sql,
        params = ?&query.params,
    );
}

fn not_found(collection: &str, id: i64) -> Error {
    Error::NotFound(format!("{collection} with id {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use metadata::ScalarType;

    #[derive(Serialize, Deserialize)]
    struct GroupPatch {
        #[serde(default, skip_serializing_if = "Patch::is_missing")]
        name: Patch<String>,
        #[serde(default, skip_serializing_if = "Patch::is_missing")]
        unix_gid: Patch<i64>,
    }

    impl Payload for GroupPatch {
        fn validate(&self) -> Result<(), String> {
            match self.name.as_value() {
                Some(name) if name.len() > 32 => Err("name is too long".to_string()),
                _ => Ok(()),
            }
        }
    }

    #[derive(Serialize)]
    struct Stray {
        password: String,
    }

    impl Payload for Stray {}

    fn groups() -> metadata::TableInfo {
        metadata::TableInfo::new(
            "public",
            "groups",
            "id",
            &[
                ("id", ScalarType::Integer),
                ("name", ScalarType::String),
                ("unix_gid", ScalarType::Integer),
            ],
        )
    }

    #[test]
    fn omitted_and_null_fields_are_told_apart() {
        let patch: GroupPatch = serde_json::from_str(r#"{"unix_gid": null}"#).unwrap();
        assert_eq!(patch.name, Patch::Missing);
        assert_eq!(patch.unix_gid, Patch::Null);

        let record = to_record(&groups(), &patch).unwrap();
        assert_eq!(
            serde_json::Value::Object(record),
            serde_json::json!({"unix_gid": null})
        );
    }

    #[test]
    fn values_are_kept() {
        let patch: GroupPatch = serde_json::from_str(r#"{"name": "physics"}"#).unwrap();
        assert_eq!(patch.name, Patch::Value("physics".to_string()));
        let record = to_record(&groups(), &patch).unwrap();
        assert_eq!(
            serde_json::Value::Object(record),
            serde_json::json!({"name": "physics"})
        );
    }

    #[test]
    fn empty_strings_become_null() {
        let patch: GroupPatch = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        let record = to_record(&groups(), &patch).unwrap();
        assert_eq!(
            serde_json::Value::Object(record),
            serde_json::json!({"name": null})
        );
    }

    #[test]
    fn failed_validation_is_a_validation_failure() {
        let patch = GroupPatch {
            name: Patch::Value("x".repeat(33)),
            unix_gid: Patch::Missing,
        };
        assert!(matches!(
            to_record(&groups(), &patch),
            Err(Error::ValidationFailure(message)) if message == "name is too long"
        ));
    }

    #[test]
    fn unknown_fields_are_a_validation_failure() {
        let stray = Stray {
            password: "hunter2".to_string(),
        };
        assert!(matches!(
            to_record(&groups(), &stray),
            Err(Error::ValidationFailure(message)) if message == "unknown field 'password'"
        ));
    }
}
