use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Uploads a locally persisted file to the blob store under a remote key and
/// resolves its public URL.
///
/// Failures (SDK errors, empty acknowledgement) are logged and reported as
/// `None`; they are never re-raised to the caller beyond that.
#[async_trait]
pub trait BlobPublisher: Send + Sync {
    async fn publish(&self, local_path: &Path, remote_key: &str) -> Option<String>;
}

/// Public URL template for a published object. Deterministic given bucket,
/// domain and key, independent of the upload response contents.
pub fn public_url(bucket: &str, domain: &str, remote_key: &str) -> String {
    format!("https://{}.{}/{}", bucket, domain, remote_key)
}

pub struct S3Publisher {
    client: Client,
    bucket: String,
    domain: String,
    part_size: usize,
}

impl S3Publisher {
    pub fn new(client: Client, bucket: String, domain: String, part_size: usize) -> Self {
        Self {
            client,
            bucket,
            domain,
            part_size,
        }
    }

    async fn upload(&self, local_path: &Path, remote_key: &str) -> anyhow::Result<Option<String>> {
        let mut reader = tokio::fs::File::open(local_path).await?;

        let multipart_upload_res = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(remote_key)
            .send()
            .await?;

        let upload_id = multipart_upload_res
            .upload_id()
            .ok_or_else(|| anyhow::anyhow!("No upload ID"))?;
        let mut part_number = 1;
        let mut completed_parts = Vec::new();
        let mut buffer = vec![0u8; self.part_size];

        loop {
            let mut n = 0;
            while n < self.part_size {
                let read = reader.read(&mut buffer[n..]).await?;
                if read == 0 {
                    break;
                }
                n += read;
            }

            // An empty object still needs one (empty) part to complete.
            if n == 0 && part_number > 1 {
                break;
            }

            let body = ByteStream::from(buffer[..n].to_vec());
            let upload_part_res = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(remote_key)
                .upload_id(upload_id)
                .body(body)
                .part_number(part_number)
                .send()
                .await?;

            completed_parts.push(
                CompletedPart::builder()
                    .e_tag(upload_part_res.e_tag().unwrap_or_default())
                    .part_number(part_number)
                    .build(),
            );

            if n < self.part_size {
                break;
            }
            part_number += 1;
        }

        let completed_multipart_upload = CompletedMultipartUpload::builder()
            .set_parts(Some(completed_parts))
            .build();

        let complete_res = self
            .client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(remote_key)
            .upload_id(upload_id)
            .multipart_upload(completed_multipart_upload)
            .send()
            .await?;

        // The store acknowledges a successful upload with a non-empty ETag.
        match complete_res.e_tag() {
            Some(tag) if !tag.is_empty() => {
                Ok(Some(public_url(&self.bucket, &self.domain, remote_key)))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl BlobPublisher for S3Publisher {
    async fn publish(&self, local_path: &Path, remote_key: &str) -> Option<String> {
        match self.upload(local_path, remote_key).await {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Blob upload failed for key {}: {:?}", remote_key, e);
                None
            }
        }
    }
}

/// In-memory publisher for tests: records published objects and can be
/// switched to always fail.
#[derive(Default)]
pub struct MemoryPublisher {
    pub objects: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
    pub fail: std::sync::atomic::AtomicBool,
}

impl MemoryPublisher {
    pub fn failing() -> Self {
        Self {
            fail: std::sync::atomic::AtomicBool::new(true),
            ..Self::default()
        }
    }
}

#[async_trait]
impl BlobPublisher for MemoryPublisher {
    async fn publish(&self, local_path: &Path, remote_key: &str) -> Option<String> {
        if self.fail.load(std::sync::atomic::Ordering::Relaxed) {
            tracing::error!("Blob upload failed for key {}: simulated failure", remote_key);
            return None;
        }

        let bytes = tokio::fs::read(local_path).await.ok()?;
        self.objects
            .lock()
            .unwrap()
            .insert(remote_key.to_string(), bytes);

        Some(public_url("test-bucket", "blob.test", remote_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_template() {
        assert_eq!(
            public_url("assets", "cos.ap-guangzhou.myqcloud.com", "images/cat.png"),
            "https://assets.cos.ap-guangzhou.myqcloud.com/images/cat.png"
        );
    }

    #[tokio::test]
    async fn test_memory_publisher_records_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("page.html");
        tokio::fs::write(&path, b"<p>hi</p>").await.unwrap();

        let publisher = MemoryPublisher::default();
        let url = publisher.publish(&path, "page.html").await.unwrap();
        assert!(url.ends_with("/page.html"));
        assert_eq!(
            publisher.objects.lock().unwrap().get("page.html").unwrap(),
            b"<p>hi</p>"
        );
    }

    #[tokio::test]
    async fn test_memory_publisher_failure_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("page.html");
        tokio::fs::write(&path, b"x").await.unwrap();

        let publisher = MemoryPublisher::failing();
        assert!(publisher.publish(&path, "page.html").await.is_none());
    }
}
