//! Typed REST client
//!
//! One method per backend endpoint. Every request carries the bearer token
//! when one is set, and every failure status is classified by
//! [`ClientError::from_status`], so a `401` surfaces the same way from any
//! endpoint.

use crate::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::backend::{NoteSource, NotesBackend};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, ErrorBody};
use crate::upload::UploadRequest;
use kithab_catalog::{
    Branch, BranchPayload, Catalog, Note, Regulation, RegulationPayload, Subject, SubjectPayload,
    User, decode_list,
};
use kithab_core::{BranchId, NoteId, RegulationId, Role, SubjectId, UserId};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the portal backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    /// API root, e.g. `http://localhost:5000/api`
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.backend_url.clone(),
            token: None,
        })
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Generic request helpers
    // ========================================================================

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and turn failure statuses into errors
    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "backend response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        Err(ClientError::from_status(status.as_u16(), body.into_message()))
    }

    async fn get_value(&self, path: &str) -> ClientResult<Value> {
        let response = self.send(self.client.get(self.url(path))).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// GET a list that may arrive bare or wrapped under `key`
    async fn get_list<T: DeserializeOwned>(&self, path: &str, key: &str) -> ClientResult<Vec<T>> {
        let value = self.get_value(path).await?;
        decode_list(value, key).map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>> {
        let response = self.send(self.client.get(self.url(path))).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let response = self.send(self.client.post(self.url(path)).json(body)).await?;
        Ok(response.json::<Value>().await.unwrap_or(Value::Null))
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let response = self.send(self.client.put(self.url(path)).json(body)).await?;
        Ok(response.json::<Value>().await.unwrap_or(Value::Null))
    }

    async fn delete(&self, path: &str) -> ClientResult<Value> {
        let response = self.send(self.client.delete(self.url(path))).await?;
        Ok(response.json::<Value>().await.unwrap_or(Value::Null))
    }

    // ========================================================================
    // Auth endpoints
    // ========================================================================

    /// POST /auth/<role>/login
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        debug!(role = %request.role, "login request");
        let response = self
            .client
            .post(self.url(&request.path()))
            .json(&request.body())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body
                    .into_message()
                    .unwrap_or_else(|| "Login failed".to_string()),
            });
        }
        let value = response
            .json::<Value>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        LoginResponse::from_value(request.role, value)
    }

    /// POST /auth/student/register
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<()> {
        self.post("/auth/student/register", request).await.map(drop)
    }

    /// POST /auth/forgot-password
    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        let body = serde_json::json!({ "email": email.trim() });
        self.post("/auth/forgot-password", &body).await.map(drop)
    }

    /// POST /auth/reset-password/:token
    pub async fn reset_password(&self, token: &str, new_password: &str) -> ClientResult<()> {
        let body = serde_json::json!({ "newPassword": new_password });
        self.post(&format!("/auth/reset-password/{}", token.trim()), &body)
            .await
            .map(drop)
    }

    // ========================================================================
    // Metadata endpoints
    // ========================================================================

    /// GET /meta/regulations
    pub async fn regulations(&self) -> ClientResult<Vec<Regulation>> {
        self.get_list("/meta/regulations", "regulations").await
    }

    /// GET /meta/branches
    pub async fn branches(&self) -> ClientResult<Vec<Branch>> {
        self.get_list("/meta/branches", "branches").await
    }

    /// GET /meta/subjects?populateBranch=true
    pub async fn subjects(&self) -> ClientResult<Vec<Subject>> {
        self.get_list("/meta/subjects?populateBranch=true", "subjects")
            .await
    }

    /// All three public lists, fetched concurrently
    pub async fn catalog(&self) -> ClientResult<Catalog> {
        let (regulations, branches, subjects) =
            tokio::try_join!(self.regulations(), self.branches(), self.subjects())?;
        debug!(
            regulations = regulations.len(),
            branches = branches.len(),
            subjects = subjects.len(),
            "catalog loaded"
        );
        Ok(Catalog::new(regulations, branches, subjects))
    }

    /// All three admin lists, fetched concurrently
    pub async fn admin_catalog(&self) -> ClientResult<Catalog> {
        let (regulations, branches, subjects) = tokio::try_join!(
            self.get_list::<Regulation>("/admin/regulations", "regulations"),
            self.get_list::<Branch>("/admin/branches", "branches"),
            self.get_list::<Subject>("/admin/subjects", "subjects"),
        )?;
        Ok(Catalog::new(regulations, branches, subjects))
    }

    // ========================================================================
    // Admin taxonomy endpoints
    // ========================================================================

    /// POST /admin/regulations
    pub async fn create_regulation(&self, payload: &RegulationPayload) -> ClientResult<()> {
        self.post("/admin/regulations", payload).await.map(drop)
    }

    /// PUT /admin/regulations/:id
    pub async fn update_regulation(
        &self,
        id: &RegulationId,
        payload: &RegulationPayload,
    ) -> ClientResult<()> {
        self.put(&format!("/admin/regulations/{}", id), payload)
            .await
            .map(drop)
    }

    /// DELETE /admin/regulations/:id (cascades server-side)
    pub async fn delete_regulation(&self, id: &RegulationId) -> ClientResult<()> {
        self.delete(&format!("/admin/regulations/{}", id)).await.map(drop)
    }

    /// POST /admin/branches
    pub async fn create_branch(&self, payload: &BranchPayload) -> ClientResult<()> {
        self.post("/admin/branches", payload).await.map(drop)
    }

    /// PUT /admin/branches/:id
    pub async fn update_branch(&self, id: &BranchId, payload: &BranchPayload) -> ClientResult<()> {
        self.put(&format!("/admin/branches/{}", id), payload)
            .await
            .map(drop)
    }

    /// DELETE /admin/branches/:id (cascades server-side)
    pub async fn delete_branch(&self, id: &BranchId) -> ClientResult<()> {
        self.delete(&format!("/admin/branches/{}", id)).await.map(drop)
    }

    /// POST /admin/subjects
    pub async fn create_subject(&self, payload: &SubjectPayload) -> ClientResult<()> {
        self.post("/admin/subjects", payload).await.map(drop)
    }

    /// PUT /admin/subjects/:id
    pub async fn update_subject(
        &self,
        id: &SubjectId,
        payload: &SubjectPayload,
    ) -> ClientResult<()> {
        self.put(&format!("/admin/subjects/{}", id), payload)
            .await
            .map(drop)
    }

    /// DELETE /admin/subjects/:id (cascades server-side)
    pub async fn delete_subject(&self, id: &SubjectId) -> ClientResult<()> {
        self.delete(&format!("/admin/subjects/{}", id)).await.map(drop)
    }

    // ========================================================================
    // Admin user endpoints
    // ========================================================================

    /// GET /admin/users?role=<role>
    pub async fn users(&self, role: Role) -> ClientResult<Vec<User>> {
        self.get_list(&format!("/admin/users?role={}", role.as_str()), "users")
            .await
    }

    /// PUT /admin/users/:id
    pub async fn update_user(&self, id: &UserId, body: &Value) -> ClientResult<()> {
        self.put(&format!("/admin/users/{}", id), body).await.map(drop)
    }

    /// DELETE /admin/users/:id
    pub async fn delete_user(&self, id: &UserId) -> ClientResult<()> {
        self.delete(&format!("/admin/users/{}", id)).await.map(drop)
    }

    // ========================================================================
    // Note endpoints
    // ========================================================================

    /// GET /notes/subject/:id
    pub async fn notes_for_subject(&self, subject: &SubjectId) -> ClientResult<Vec<Note>> {
        self.get_list(&format!("/notes/subject/{}", subject), "notes")
            .await
    }

    /// GET /admin/notes
    pub async fn all_notes(&self) -> ClientResult<Vec<Note>> {
        self.get_list("/admin/notes", "notes").await
    }

    /// GET /notes/my-uploads
    pub async fn my_uploads(&self) -> ClientResult<Vec<Note>> {
        self.get_list("/notes/my-uploads", "notes").await
    }

    /// GET /notes/:id
    pub async fn download_note(&self, id: &NoteId) -> ClientResult<Vec<u8>> {
        self.get_bytes(&format!("/notes/{}", id)).await
    }

    /// GET /admin/notes/:id/file
    pub async fn download_admin_note(&self, id: &NoteId) -> ClientResult<Vec<u8>> {
        self.get_bytes(&format!("/admin/notes/{}/file", id)).await
    }

    /// DELETE /admin/notes/:id
    pub async fn delete_note(&self, id: &NoteId) -> ClientResult<()> {
        self.delete(&format!("/admin/notes/{}", id)).await.map(drop)
    }

    /// POST or DELETE /notes/:id/favorite; returns the user's favourites
    pub async fn set_favorite(&self, id: &NoteId, favorite: bool) -> ClientResult<Vec<NoteId>> {
        let path = format!("/notes/{}/favorite", id);
        let value = if favorite {
            self.post(&path, &serde_json::json!({})).await?
        } else {
            self.delete(&path).await?
        };
        decode_list(value, "favoriteNotes").map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// POST /notes/upload (multipart)
    pub async fn upload(&self, request: &UploadRequest) -> ClientResult<()> {
        let mut form = Form::new()
            .text("regulation", request.filter.regulation.to_string())
            .text("branch", request.filter.branch.to_string())
            .text("semester", request.filter.semester.to_string())
            .text("subject", request.filter.subject.to_string())
            .text("uploadedBy", request.uploaded_by.to_string());
        for file in &request.files {
            let part = Part::bytes(file.data.clone())
                .file_name(file.name.clone())
                .mime_str(&file.content_type)?;
            form = form.part("files", part);
        }
        debug!(files = request.files.len(), "uploading notes");
        self.send(self.client.post(self.url("/notes/upload")).multipart(form))
            .await
            .map(drop)
    }
}

impl NotesBackend for ApiClient {
    async fn subject_notes(&self, subject: &SubjectId) -> ClientResult<Vec<Note>> {
        self.notes_for_subject(subject).await
    }

    async fn admin_notes(&self) -> ClientResult<Vec<Note>> {
        self.all_notes().await
    }

    async fn note_file(&self, id: &NoteId, source: NoteSource) -> ClientResult<Vec<u8>> {
        match source {
            NoteSource::Subject => self.download_note(id).await,
            NoteSource::Admin => self.download_admin_note(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_base_and_path() {
        let config = ClientConfig::default()
            .with_backend_url("http://127.0.0.1:5000/api/")
            .unwrap();
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/meta/regulations"), "http://127.0.0.1:5000/api/meta/regulations");
        assert!(!client.has_token());
        assert!(client.with_token("jwt").has_token());
    }
}
