//! User operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        cash_buffer: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

impl Database {
    /// Create a new user, returns the new user ID
    pub fn create_user(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO users (name) VALUES (?)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a user by ID
    pub fn get_user(&self, user_id: i64) -> Result<User> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, cash_buffer, created_at FROM users WHERE id = ?",
            params![user_id],
            row_to_user,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))
    }

    /// List all users ordered by creation
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, cash_buffer, created_at FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Update a user's cash safety buffer (minor units). None resets to the default.
    pub fn set_cash_buffer(&self, user_id: i64, buffer: Option<i64>) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET cash_buffer = ? WHERE id = ?",
            params![buffer, user_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get_user() {
        let db = Database::in_memory().unwrap();
        let id = db.create_user("Acme Bakery").unwrap();

        let user = db.get_user(id).unwrap();
        assert_eq!(user.name, "Acme Bakery");
        assert_eq!(user.cash_buffer, None);
    }

    #[test]
    fn test_set_cash_buffer() {
        let db = Database::in_memory().unwrap();
        let id = db.create_user("Acme Bakery").unwrap();

        db.set_cash_buffer(id, Some(1_000_000)).unwrap();
        assert_eq!(db.get_user(id).unwrap().cash_buffer, Some(1_000_000));

        db.set_cash_buffer(id, None).unwrap();
        assert_eq!(db.get_user(id).unwrap().cash_buffer, None);
    }

    #[test]
    fn test_get_missing_user() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(db.get_user(42), Err(Error::NotFound(_))));
    }
}
