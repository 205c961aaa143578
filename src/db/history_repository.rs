use crate::db::models::{HistoryRow, NewHistoryRow};
use crate::errors::Error;
use crate::schema::user_history;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::sqlite::SqliteConnection;

/// Repository for the `user_history` table. Every read and delete is scoped
/// to the owning user.
pub struct HistoryRepository<'a> {
    /// Database connection
    pub conn: &'a mut SqliteConnection,
}

impl<'a> HistoryRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        HistoryRepository { conn }
    }

    /// Inserts a history row and returns the id SQLite assigned to it
    ///
    /// # Errors
    ///
    /// Returns an Error if database operations fail
    pub fn insert(&mut self, row: &NewHistoryRow) -> Result<i64, Error> {
        self.conn.transaction(|conn| {
            diesel::insert_into(user_history::table)
                .values(row)
                .execute(conn)?;
            let id = diesel::select(diesel::dsl::sql::<BigInt>("last_insert_rowid()"))
                .get_result::<i64>(conn)?;
            Ok(id)
        })
    }

    /// Newest-first page of a user's records
    pub fn list_by_user(
        &mut self,
        owner: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HistoryRow>, Error> {
        use crate::schema::user_history::dsl::*;

        let rows = user_history
            .filter(user_id.eq(owner))
            .order((created_at.desc(), id.desc()))
            .limit(limit)
            .offset(offset)
            .select(HistoryRow::as_select())
            .load(self.conn)?;
        Ok(rows)
    }

    /// Looks a record up by id, only if `owner` owns it
    pub fn get(&mut self, record_id: i64, owner: i64) -> Result<Option<HistoryRow>, Error> {
        use crate::schema::user_history::dsl::*;

        let row = user_history
            .filter(id.eq(record_id))
            .filter(user_id.eq(owner))
            .select(HistoryRow::as_select())
            .first(self.conn)
            .optional()?;
        Ok(row)
    }

    /// Deletes a record owned by `owner`; returns whether a row was removed
    pub fn delete(&mut self, record_id: i64, owner: i64) -> Result<bool, Error> {
        use crate::schema::user_history::dsl::*;

        let deleted = diesel::delete(user_history.filter(id.eq(record_id)).filter(user_id.eq(owner)))
            .execute(self.conn)?;
        Ok(deleted > 0)
    }

    pub fn count_by_user(&mut self, owner: i64) -> Result<i64, Error> {
        use crate::schema::user_history::dsl::*;

        let count = user_history
            .filter(user_id.eq(owner))
            .count()
            .get_result(self.conn)?;
        Ok(count)
    }
}
