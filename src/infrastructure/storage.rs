use crate::config::AppConfig;
use crate::services::publisher::S3Publisher;
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::info;

/// Builds the blob-store client and publisher from the startup configuration.
pub async fn setup_publisher(config: &AppConfig) -> Arc<S3Publisher> {
    info!(
        "Blob store: bucket {} in {}",
        config.storage_bucket, config.storage_region
    );

    let mut loader = aws_config::from_env()
        .region(Region::new(config.storage_region.clone()))
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            config.storage_access_key.clone(),
            config.storage_secret_key.clone(),
            None,
            None,
            "static",
        ));

    if let Some(endpoint) = &config.storage_endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.storage_endpoint.is_some())
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);

    Arc::new(S3Publisher::new(
        s3_client,
        config.storage_bucket.clone(),
        config.storage_domain.clone(),
        config.upload_part_size,
    ))
}
