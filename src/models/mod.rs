use chrono::{DateTime, Utc};
use tokio_postgres::Row;

pub struct Note {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<Row> for Note {
    type Error = tokio_postgres::Error;

    // A table with other column types (e.g. SERIAL/TIMESTAMP) fails here instead of panicking
    fn try_from(row: Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            text: row.try_get("text")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
