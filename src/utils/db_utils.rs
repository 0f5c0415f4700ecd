use actix_web::error::ErrorBadRequest;
use serde_json::Value;
use sqlx::MySqlPool;

/// Bindable value for a dynamic profile update. Profile fields are all
/// text-valued, so only strings and explicit nulls are accepted.
#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
    Null,
}

#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Build a dynamic UPDATE restricted to a column whitelist. Unknown columns
/// are rejected outright rather than silently dropped.
pub fn build_update_sql(
    table: &str,
    allowed: &[&str],
    payload: &Value,
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    let mut columns = Vec::with_capacity(obj.len());
    let mut values = Vec::with_capacity(obj.len() + 1);

    for (key, value) in obj {
        if !allowed.contains(&key.as_str()) {
            return Err(ErrorBadRequest(format!("Unknown field: {}", key)));
        }

        match value {
            Value::String(s) => values.push(SqlValue::String(s.clone())),
            Value::Null => values.push(SqlValue::Null),
            _ => return Err(ErrorBadRequest(format!("Field {} must be a string", key))),
        }

        columns.push(format!("{} = ?", key));
    }

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        table,
        columns.join(", "),
        id_column
    );

    values.push(SqlValue::U64(id_value));

    Ok(SqlUpdate { sql, values })
}

pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALLOWED: &[&str] = &["name", "phone", "department"];

    #[test]
    fn builds_update_for_allowed_fields() {
        let payload = json!({"name": "Jane Doe", "phone": "+8801712345678"});
        let update = build_update_sql("users", ALLOWED, &payload, "id", 7).unwrap();

        assert!(update.sql.starts_with("UPDATE users SET "));
        assert!(update.sql.contains("name = ?"));
        assert!(update.sql.contains("phone = ?"));
        assert!(update.sql.ends_with("WHERE id = ?"));
        assert_eq!(update.values.len(), 3); // two fields + id
        assert_eq!(*update.values.last().unwrap(), SqlValue::U64(7));
    }

    #[test]
    fn null_clears_a_field() {
        let payload = json!({"phone": null});
        let update = build_update_sql("users", ALLOWED, &payload, "id", 1).unwrap();
        assert_eq!(update.values[0], SqlValue::Null);
    }

    #[test]
    fn rejects_unknown_column() {
        let payload = json!({"role_id": "1"});
        assert!(build_update_sql("users", ALLOWED, &payload, "id", 1).is_err());
    }

    #[test]
    fn rejects_non_string_value() {
        let payload = json!({"name": 42});
        assert!(build_update_sql("users", ALLOWED, &payload, "id", 1).is_err());
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(build_update_sql("users", ALLOWED, &json!({}), "id", 1).is_err());
        assert!(build_update_sql("users", ALLOWED, &json!([1, 2]), "id", 1).is_err());
    }
}
