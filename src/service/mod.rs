use crate::{
    dto::{NoteResponse, NoteTextRequest},
    error::ApiError,
    repository::Database,
};

/// Trims the submitted text and rejects it when nothing is left.
fn required_text(request: NoteTextRequest) -> Result<String, ApiError> {
    let text = request.text.unwrap_or_default();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ApiError::TextRequired);
    }
    Ok(trimmed.to_string())
}

#[derive(Clone)]
pub struct NoteService {
    db: Database,
}

impl NoteService {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create_note(&self, request: NoteTextRequest) -> Result<NoteResponse, ApiError> {
        let text = required_text(request)?;
        let note = self.db.create_note(&text).await?;
        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        id: i64,
        request: NoteTextRequest,
    ) -> Result<NoteResponse, ApiError> {
        let text = required_text(request)?;
        self.db
            .update_note(id, &text)
            .await?
            .map(Into::into)
            .ok_or(ApiError::NotFound)
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ApiError> {
        if self.db.delete_note(id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }

    pub async fn get_latest_note(&self) -> Result<Option<NoteResponse>, ApiError> {
        Ok(self.db.get_latest_note().await?.map(Into::into))
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, ApiError> {
        let notes = self.db.get_all_notes().await?;
        Ok(notes.into_iter().map(Into::into).collect())
    }
}
