//! `StorageBackend` on top of the HTTP client.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use beicun_protocol::{
    CheckUploadRequest, CheckUploadResponse, FileUploadResult, FileUploadStatus,
    InitUploadRequest,
};
use beicun_storage_client::{ClientError, HttpStorageClient, ImageUpload};
use beicun_uploader::{ChunkPayload, ImagePayload, StorageBackend, UploadError};

pub struct ServiceBackend {
    client: Arc<HttpStorageClient>,
}

impl ServiceBackend {
    pub fn new(client: Arc<HttpStorageClient>) -> Self {
        Self { client }
    }
}

fn service_error(e: ClientError) -> UploadError {
    UploadError::Service(e.to_string())
}

impl StorageBackend for ServiceBackend {
    fn check_file(
        &self,
        req: CheckUploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CheckUploadResponse, UploadError>> + Send + '_>> {
        Box::pin(async move { self.client.check_file(&req).await.map_err(service_error) })
    }

    fn init_upload(
        &self,
        req: InitUploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<bool, UploadError>> + Send + '_>> {
        Box::pin(async move { self.client.init_upload(&req).await.map_err(service_error) })
    }

    fn upload_chunk(
        &self,
        chunk: ChunkPayload,
    ) -> Pin<Box<dyn Future<Output = Result<(), UploadError>> + Send + '_>> {
        Box::pin(async move {
            self.client
                .upload_chunk(&chunk.file_id, chunk.index, chunk.total, &chunk.data)
                .await
                .map_err(service_error)
        })
    }

    fn upload_progress(
        &self,
        file_id: String,
    ) -> Pin<Box<dyn Future<Output = Result<FileUploadStatus, UploadError>> + Send + '_>> {
        Box::pin(async move {
            self.client
                .upload_progress(&file_id)
                .await
                .map_err(service_error)
        })
    }

    fn upload_image(
        &self,
        image: ImagePayload,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FileUploadResult>, UploadError>> + Send + '_>>
    {
        Box::pin(async move {
            let upload = ImageUpload {
                name: image.name,
                content_type: image.content_type,
                data: image.data,
            };
            self.client
                .upload_images(&image.folder_id, std::slice::from_ref(&upload))
                .await
                .map_err(service_error)
        })
    }

    fn listings_changed(&self, folder_id: &str) {
        self.client.invalidate_after_upload(folder_id);
    }
}
