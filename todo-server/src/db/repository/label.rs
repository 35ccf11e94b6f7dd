//! Label Repository

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use shared::models::{Label, normalize_label_name};
use sqlx::{SqliteConnection, SqlitePool};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Label>> {
    let labels = sqlx::query_as::<_, Label>("SELECT id, name FROM label ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(labels)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Label>> {
    let label = sqlx::query_as::<_, Label>("SELECT id, name FROM label WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(label)
}

/// Find-or-create by name; an existing label with that name is returned as is
pub async fn create(pool: &SqlitePool, name: &str) -> RepoResult<Label> {
    let name = normalize(name)?;
    let mut conn = pool.acquire().await?;
    let id = find_or_create_id(&mut conn, &name).await?;
    Ok(Label { id, name })
}

pub async fn rename(pool: &SqlitePool, id: i64, name: &str) -> RepoResult<Label> {
    let name = normalize(name)?;
    let rows = sqlx::query("UPDATE label SET name = ? WHERE id = ?")
        .bind(&name)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => {
                RepoError::Duplicate(format!("Label '{}' already exists", name))
            }
            other => other,
        })?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Label {id} not found")));
    }
    Ok(Label { id, name })
}

/// Hard delete; links to todos go with it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM label WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Label {id} not found")));
    }
    Ok(true)
}

pub(crate) async fn find_or_create_id(conn: &mut SqliteConnection, name: &str) -> RepoResult<i64> {
    sqlx::query("INSERT INTO label (name) VALUES (?) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .execute(&mut *conn)
        .await?;
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM label WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
    Ok(id)
}

/// Replace the label set of a todo with `names`
pub(crate) async fn replace_todo_labels(
    conn: &mut SqliteConnection,
    todo_id: i64,
    names: &[String],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM todo_label WHERE todo_id = ?")
        .bind(todo_id)
        .execute(&mut *conn)
        .await?;

    for raw in names {
        let name = normalize(raw)?;
        let label_id = find_or_create_id(conn, &name).await?;
        sqlx::query("INSERT OR IGNORE INTO todo_label (todo_id, label_id) VALUES (?, ?)")
            .bind(todo_id)
            .bind(label_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub(crate) async fn names_for_todo(pool: &SqlitePool, todo_id: i64) -> RepoResult<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT l.name FROM todo_label tl JOIN label l ON l.id = tl.label_id WHERE tl.todo_id = ? ORDER BY l.name",
    )
    .bind(todo_id)
    .fetch_all(pool)
    .await?;
    Ok(names)
}

/// Label names of every active todo, keyed by todo id
pub(crate) async fn names_by_todo(pool: &SqlitePool) -> RepoResult<HashMap<i64, Vec<String>>> {
    let rows = sqlx::query_as::<_, (i64, String)>(
        "SELECT tl.todo_id, l.name FROM todo_label tl JOIN label l ON l.id = tl.label_id JOIN todo t ON t.id = tl.todo_id WHERE t.active = 1 ORDER BY l.name",
    )
    .fetch_all(pool)
    .await?;

    let mut map: HashMap<i64, Vec<String>> = HashMap::new();
    for (todo_id, name) in rows {
        map.entry(todo_id).or_default().push(name);
    }
    Ok(map)
}

fn normalize(name: &str) -> RepoResult<String> {
    normalize_label_name(name).map_err(|e| RepoError::Validation(e.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_create_is_find_or_create() {
        let db = DbService::in_memory().await.unwrap();

        let a = create(&db.pool, " work ").await.unwrap();
        let b = create(&db.pool, "work").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.name, "work");
        assert_eq!(find_all(&db.pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_conflict_and_missing() {
        let db = DbService::in_memory().await.unwrap();
        let home = create(&db.pool, "home").await.unwrap();
        create(&db.pool, "work").await.unwrap();

        let err = rename(&db.pool, home.id, "work").await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let err = rename(&db.pool, 999, "errands").await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        let renamed = rename(&db.pool, home.id, "house").await.unwrap();
        assert_eq!(find_by_id(&db.pool, home.id).await.unwrap(), Some(renamed));
    }

    #[tokio::test]
    async fn test_invalid_name_rejected() {
        let db = DbService::in_memory().await.unwrap();
        let err = create(&db.pool, "   ").await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
