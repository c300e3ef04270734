//! Manuscript, chapter and chapter-document endpoints.

use folio_domain::{
    ApiRequest, Chapter, ChapterDocument, CreateChapter, CreateManuscript, Manuscript,
    UpdateChapter, UpdateManuscript, sort_chapters,
};
use serde_json::Value;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ApiResult;

const MANUSCRIPTS: &str = "/manuscripts/";

fn manuscript_path(id: Uuid) -> String {
    format!("{MANUSCRIPTS}{id}/")
}

fn chapters_path(manuscript: Uuid) -> String {
    format!("{MANUSCRIPTS}{manuscript}/chapters/")
}

fn chapter_path(manuscript: Uuid, chapter: Uuid) -> String {
    format!("{MANUSCRIPTS}{manuscript}/chapters/{chapter}/")
}

/// Manuscript CRUD, nested chapters, and chapter documents.
#[derive(Debug, Clone)]
pub struct ManuscriptApi {
    client: ApiClient,
}

impl ManuscriptApi {
    pub(crate) const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists the manuscripts of a workspace.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn list(&self, workspace: Uuid) -> ApiResult<Vec<Manuscript>> {
        let path = format!("/workspaces/{workspace}/manuscripts/");
        self.client.fetch(&ApiRequest::get(path)).await
    }

    /// Fetches one manuscript.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn get(&self, id: Uuid) -> ApiResult<Manuscript> {
        self.client.fetch(&ApiRequest::get(manuscript_path(id))).await
    }

    /// Creates a manuscript.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for a blank title, otherwise the server error.
    pub async fn create(&self, manuscript: &CreateManuscript) -> ApiResult<Manuscript> {
        if manuscript.title.trim().is_empty() {
            return Err(folio_domain::DomainError::MissingField("title").into());
        }
        let request = ApiRequest::post(MANUSCRIPTS).with_json(manuscript)?;
        self.client.fetch(&request).await
    }

    /// Partially updates a manuscript.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for an empty update, otherwise the server error.
    pub async fn update(&self, id: Uuid, update: &UpdateManuscript) -> ApiResult<Manuscript> {
        update.validate()?;
        let request = ApiRequest::patch(manuscript_path(id)).with_json(update)?;
        self.client.fetch(&request).await
    }

    /// Deletes a manuscript.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        self.client.execute(&ApiRequest::delete(manuscript_path(id))).await
    }

    /// Lists a manuscript's chapters in reading order.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn chapters(&self, manuscript: Uuid) -> ApiResult<Vec<Chapter>> {
        let mut chapters: Vec<Chapter> = self
            .client
            .fetch(&ApiRequest::get(chapters_path(manuscript)))
            .await?;
        sort_chapters(&mut chapters);
        Ok(chapters)
    }

    /// Adds a chapter.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn create_chapter(
        &self,
        manuscript: Uuid,
        chapter: &CreateChapter,
    ) -> ApiResult<Chapter> {
        let request = ApiRequest::post(chapters_path(manuscript)).with_json(chapter)?;
        self.client.fetch(&request).await
    }

    /// Renames or moves a chapter.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for an invalid update, otherwise the server error.
    pub async fn update_chapter(
        &self,
        manuscript: Uuid,
        chapter: Uuid,
        update: &UpdateChapter,
    ) -> ApiResult<Chapter> {
        update.validate()?;
        let request = ApiRequest::patch(chapter_path(manuscript, chapter)).with_json(update)?;
        self.client.fetch(&request).await
    }

    /// Deletes a chapter.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn delete_chapter(&self, manuscript: Uuid, chapter: Uuid) -> ApiResult<()> {
        self.client
            .execute(&ApiRequest::delete(chapter_path(manuscript, chapter)))
            .await
    }

    /// Lists the documents attached to a chapter.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn chapter_documents(
        &self,
        manuscript: Uuid,
        chapter: Uuid,
    ) -> ApiResult<Vec<ChapterDocument>> {
        let path = format!("{}documents/", chapter_path(manuscript, chapter));
        self.client.fetch(&ApiRequest::get(path)).await
    }

    /// Fetches the office editor configuration for a document, as the
    /// server provides it.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn editor_config(&self, document: Uuid) -> ApiResult<Value> {
        let path = format!("/documents/onlyoffice/config/{document}/");
        self.client.fetch(&ApiRequest::get(path)).await
    }
}
