//! Storage service API client.

use std::sync::Arc;

use beicun_protocol::constants::{
    self, CHECK_UPLOAD_PATH, CHUNK_FIELD, FILES_PATH, FOLDER_ID_FIELD, FOLDERS_PATH,
    IMAGES_FIELD, INIT_UPLOAD_PATH, LOGIN_PATH, LOGOUT_PATH, REFRESH_PATH, STORAGE_STATS_PATH,
    UPLOAD_CHUNK_PATH, UPLOAD_IMAGES_PATH, UPLOAD_PROGRESS_PATH,
};
use beicun_protocol::messages::{
    CreateFolderRequest, MoveFileRequest, MoveFolderRequest, UpdateFolderRequest,
};
use beicun_protocol::{
    ApiResponse, CheckUploadRequest, CheckUploadResponse, ChunkQuery, FileQuery,
    FileUploadResult, FileUploadStatus, Folder, FolderQuery, InitUploadRequest,
    InitUploadResponse, LoginRequest, Page, RefreshRequest, StorageFile, StorageStats,
    TokenResponse,
};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::{ClientError, ListingCache, SessionContext, TokenPair};

/// One image of a batch image upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Storage service client.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct HttpStorageClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionContext>,
    refresh_guard: tokio::sync::Mutex<()>,
    cache: ListingCache,
}

impl HttpStorageClient {
    /// Creates a client for the API rooted at `base_url`
    /// (e.g. `https://shop.example.com/api`).
    pub fn new(base_url: &str, session: Arc<SessionContext>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("beicun/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            refresh_guard: tokio::sync::Mutex::new(()),
            cache: ListingCache::new(),
        })
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // -----------------------------------------------------------------------
    // Auth middleware
    // -----------------------------------------------------------------------

    /// Sends a request built by `build`, attaching the bearer token.
    ///
    /// A 401 triggers [`refresh_after_unauthorized`](Self::refresh_after_unauthorized)
    /// and a single replay. `build` is called again for the replay, so
    /// bodies are rebuilt rather than cloned.
    async fn send<F>(&self, path: &str, build: F) -> Result<Response, ClientError>
    where
        F: Fn(&reqwest::Client, &str) -> Result<RequestBuilder, ClientError>,
    {
        let url = self.url(path);
        let token = self.session.access_token();

        let resp = with_bearer(build(&self.http, &url)?, token.as_deref())
            .send()
            .await?;
        if resp.status() != StatusCode::UNAUTHORIZED || path == REFRESH_PATH {
            return Ok(resp);
        }

        debug!(path, "401, refreshing session");
        let fresh = self.refresh_after_unauthorized(token.as_deref()).await?;
        let resp = with_bearer(build(&self.http, &url)?, Some(&fresh))
            .send()
            .await?;
        Ok(resp)
    }

    /// Obtains a usable access token after `stale` was rejected.
    ///
    /// Only one refresh runs at a time. A caller that waited on another
    /// caller's refresh reuses the rotated token.
    async fn refresh_after_unauthorized(&self, stale: Option<&str>) -> Result<String, ClientError> {
        let _guard = self.refresh_guard.lock().await;

        if let Some(current) = self.session.access_token() {
            if Some(current.as_str()) != stale {
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.session.refresh_token() else {
            self.session.clear()?;
            return Err(ClientError::Unauthenticated);
        };

        match self.request_refresh(refresh_token).await {
            Ok(tokens) => {
                let pair = TokenPair::from(tokens);
                let access = pair.access_token.clone();
                self.session.set_tokens(pair)?;
                info!("session refreshed");
                Ok(access)
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, clearing session");
                self.session.clear()?;
                Err(ClientError::Unauthenticated)
            }
        }
    }

    async fn request_refresh(&self, refresh_token: String) -> Result<TokenResponse, ClientError> {
        let resp = self
            .http
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        Ok(read_envelope::<TokenResponse>(resp).await?.into_data()?)
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self.send(path, |http, url| Ok(http.get(url))).await?;
        Ok(read_envelope::<T>(resp).await?.into_data()?)
    }

    // -----------------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------------

    /// Logs in and stores the issued tokens in the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            turnstile_token: None,
        };
        let resp = self.http.post(self.url(LOGIN_PATH)).json(&req).send().await?;
        let tokens = read_envelope::<TokenResponse>(resp).await?.into_data()?;
        self.session.set_tokens(TokenPair::from(tokens.clone()))?;
        self.cache.clear();
        info!(email, "logged in");
        Ok(tokens)
    }

    /// Logs out. The local session is cleared even if the call fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = async {
            let resp = self.send(LOGOUT_PATH, |http, url| Ok(http.post(url))).await?;
            read_envelope::<serde_json::Value>(resp)
                .await?
                .into_result()?;
            Ok::<(), ClientError>(())
        }
        .await;
        if let Err(e) = &result {
            warn!(error = %e, "logout call failed");
        }
        self.session.clear()?;
        self.cache.clear();
        result
    }

    // -----------------------------------------------------------------------
    // Upload workflow
    // -----------------------------------------------------------------------

    pub async fn check_file(
        &self,
        req: &CheckUploadRequest,
    ) -> Result<CheckUploadResponse, ClientError> {
        let resp = self
            .send(CHECK_UPLOAD_PATH, |http, url| Ok(http.post(url).json(req)))
            .await?;
        Ok(read_envelope(resp).await?.into_data()?)
    }

    /// Registers an upload session. A `null` payload counts as success.
    pub async fn init_upload(&self, req: &InitUploadRequest) -> Result<bool, ClientError> {
        let resp = self
            .send(INIT_UPLOAD_PATH, |http, url| Ok(http.post(url).json(req)))
            .await?;
        let data = read_envelope::<InitUploadResponse>(resp).await?.into_result()?;
        Ok(data.is_none_or(|d| d.success))
    }

    pub async fn upload_chunk(
        &self,
        file_id: &str,
        chunk_num: u32,
        total: u32,
        data: &[u8],
    ) -> Result<(), ClientError> {
        let query = ChunkQuery {
            file_id: file_id.to_string(),
            chunk_num,
            total,
        };
        let resp = self
            .send(UPLOAD_CHUNK_PATH, |http, url| {
                let part = Part::bytes(data.to_vec())
                    .file_name(format!("chunk-{chunk_num}"))
                    .mime_str("application/octet-stream")?;
                Ok(http
                    .post(url)
                    .query(&query)
                    .multipart(Form::new().part(CHUNK_FIELD, part)))
            })
            .await?;
        read_envelope::<serde_json::Value>(resp)
            .await?
            .into_result()?;
        debug!(file_id, chunk = chunk_num, total, "chunk stored");
        Ok(())
    }

    pub async fn upload_progress(&self, file_id: &str) -> Result<FileUploadStatus, ClientError> {
        let resp = self
            .send(UPLOAD_PROGRESS_PATH, |http, url| {
                Ok(http.get(url).query(&[("fileId", file_id)]))
            })
            .await?;
        Ok(read_envelope(resp).await?.into_data()?)
    }

    pub async fn upload_images(
        &self,
        folder_id: &str,
        images: &[ImageUpload],
    ) -> Result<Vec<FileUploadResult>, ClientError> {
        let resp = self
            .send(UPLOAD_IMAGES_PATH, |http, url| {
                let mut form = Form::new().text(FOLDER_ID_FIELD, folder_id.to_string());
                for image in images {
                    let part = Part::bytes(image.data.clone())
                        .file_name(image.name.clone())
                        .mime_str(&image.content_type)?;
                    form = form.part(IMAGES_FIELD, part);
                }
                Ok(http.post(url).multipart(form))
            })
            .await?;
        let results = read_envelope::<Vec<FileUploadResult>>(resp)
            .await?
            .into_result()?
            .unwrap_or_default();
        Ok(results)
    }

    // -----------------------------------------------------------------------
    // Files
    // -----------------------------------------------------------------------

    /// Lists files, reading through the listing cache.
    pub async fn list_files(&self, query: &FileQuery) -> Result<Page<StorageFile>, ClientError> {
        if let Some(page) = self.cache.files(query) {
            debug!(?query, "file listing served from cache");
            return Ok(page);
        }
        let resp = self
            .send(FILES_PATH, |http, url| Ok(http.get(url).query(query)))
            .await?;
        let page = read_envelope::<Vec<StorageFile>>(resp).await?.into_page()?;
        self.cache.put_files(query.clone(), page.clone());
        Ok(page)
    }

    pub async fn get_file(&self, id: &str) -> Result<StorageFile, ClientError> {
        self.get_data(&constants::file_path(id)).await
    }

    pub async fn delete_file(&self, id: &str) -> Result<(), ClientError> {
        let resp = self
            .send(&constants::file_path(id), |http, url| Ok(http.delete(url)))
            .await?;
        read_envelope::<serde_json::Value>(resp)
            .await?
            .into_result()?;
        self.cache.invalidate_files();
        self.cache.invalidate_stats();
        Ok(())
    }

    pub async fn move_file(&self, id: &str, target_folder_id: Option<&str>) -> Result<(), ClientError> {
        let req = MoveFileRequest {
            target_folder_id: target_folder_id.map(str::to_string),
        };
        let resp = self
            .send(&constants::file_move_path(id), |http, url| {
                Ok(http.post(url).json(&req))
            })
            .await?;
        read_envelope::<serde_json::Value>(resp)
            .await?
            .into_result()?;
        self.cache.invalidate_files();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Folders
    // -----------------------------------------------------------------------

    pub async fn create_folder(&self, req: &CreateFolderRequest) -> Result<Folder, ClientError> {
        let resp = self
            .send(FOLDERS_PATH, |http, url| Ok(http.post(url).json(req)))
            .await?;
        let folder = read_envelope(resp).await?.into_data()?;
        self.cache.invalidate_folders();
        self.cache.invalidate_stats();
        Ok(folder)
    }

    /// Lists folders, reading through the listing cache.
    pub async fn list_folders(&self, query: &FolderQuery) -> Result<Page<Folder>, ClientError> {
        if let Some(page) = self.cache.folders(query) {
            debug!(?query, "folder listing served from cache");
            return Ok(page);
        }
        let resp = self
            .send(FOLDERS_PATH, |http, url| Ok(http.get(url).query(query)))
            .await?;
        let page = read_envelope::<Vec<Folder>>(resp).await?.into_page()?;
        self.cache.put_folders(query.clone(), page.clone());
        Ok(page)
    }

    pub async fn get_folder(&self, id: &str) -> Result<Folder, ClientError> {
        self.get_data(&constants::folder_path(id)).await
    }

    pub async fn update_folder(
        &self,
        id: &str,
        req: &UpdateFolderRequest,
    ) -> Result<Folder, ClientError> {
        let resp = self
            .send(&constants::folder_path(id), |http, url| {
                Ok(http.patch(url).json(req))
            })
            .await?;
        let folder = read_envelope(resp).await?.into_data()?;
        self.cache.invalidate_folders();
        Ok(folder)
    }

    pub async fn delete_folder(&self, id: &str) -> Result<(), ClientError> {
        let resp = self
            .send(&constants::folder_path(id), |http, url| Ok(http.delete(url)))
            .await?;
        read_envelope::<serde_json::Value>(resp)
            .await?
            .into_result()?;
        self.cache.clear();
        Ok(())
    }

    pub async fn move_folder(
        &self,
        id: &str,
        target_parent_id: Option<&str>,
    ) -> Result<(), ClientError> {
        let req = MoveFolderRequest {
            target_parent_id: target_parent_id.map(str::to_string),
        };
        let resp = self
            .send(&constants::folder_move_path(id), |http, url| {
                Ok(http.post(url).json(&req))
            })
            .await?;
        read_envelope::<serde_json::Value>(resp)
            .await?
            .into_result()?;
        self.cache.invalidate_folders();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Stats
    // -----------------------------------------------------------------------

    /// Returns storage usage, reading through the listing cache.
    pub async fn storage_stats(&self) -> Result<StorageStats, ClientError> {
        if let Some(stats) = self.cache.stats() {
            return Ok(stats);
        }
        let stats: StorageStats = self.get_data(STORAGE_STATS_PATH).await?;
        self.cache.put_stats(stats.clone());
        Ok(stats)
    }

    /// Drops cached listings affected by a finished upload into `folder_id`.
    pub fn invalidate_after_upload(&self, folder_id: &str) {
        self.cache.invalidate_folder(folder_id);
        self.cache.invalidate_stats();
    }
}

fn with_bearer(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Reads a response body as an [`ApiResponse`] envelope.
///
/// Non-2xx responses that still carry an envelope surface as service
/// errors; anything else becomes [`ClientError::Api`].
async fn read_envelope<T: DeserializeOwned>(resp: Response) -> Result<ApiResponse<T>, ClientError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthenticated);
    }

    let body = resp.bytes().await?;
    if !status.is_success() {
        if let Ok(env) = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body) {
            if !env.is_success() {
                return Err(ClientError::Service {
                    code: env.code,
                    message: env.message,
                });
            }
        }
        return Err(ClientError::Api {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    Ok(serde_json::from_slice(&body)?)
}
