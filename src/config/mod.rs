use std::collections::HashSet;
use std::env;

/// Process-wide configuration, loaded once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Object storage region (default: "ap-guangzhou")
    pub storage_region: String,

    /// Object storage access key id
    pub storage_access_key: String,

    /// Object storage secret key
    pub storage_secret_key: String,

    /// Target bucket name
    pub storage_bucket: String,

    /// Domain suffix used to derive public URLs: https://<bucket>.<domain>/<key>
    pub storage_domain: String,

    /// Optional S3-compatible endpoint override (MinIO etc.)
    pub storage_endpoint: Option<String>,

    /// Public host or IP advertised in locally-served URLs
    pub server_host: String,

    /// Port advertised in locally-served URLs (default: 7789)
    pub serving_port: u16,

    /// Port the HTTP server binds to (default: 8000)
    pub bind_port: u16,

    /// Directory for persisted HTML files (default: "html_output")
    pub html_dir: String,

    /// Directory for persisted image files (default: "images")
    pub image_dir: String,

    /// Bearer tokens accepted by the auth gate
    pub valid_tokens: HashSet<String>,

    /// Timeout for fetching remote images, in seconds (default: 30)
    pub fetch_timeout_secs: u64,

    /// Multipart part size for uploads in bytes (default: 10 MB)
    pub upload_part_size: usize,

    /// Maximum accepted request body in bytes (default: 64 MB)
    pub max_body_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_region: "ap-guangzhou".to_string(),
            storage_access_key: String::new(),
            storage_secret_key: String::new(),
            storage_bucket: String::new(),
            storage_domain: "cos.ap-guangzhou.myqcloud.com".to_string(),
            storage_endpoint: None,
            server_host: "127.0.0.1".to_string(),
            serving_port: 7789,
            bind_port: 8000,
            html_dir: "html_output".to_string(),
            image_dir: "images".to_string(),
            valid_tokens: HashSet::new(),
            fetch_timeout_secs: 30,
            upload_part_size: 10 * 1024 * 1024, // 10 MB
            max_body_size: 64 * 1024 * 1024,    // 64 MB
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            storage_region: env::var("STORAGE_REGION").unwrap_or(default.storage_region),

            storage_access_key: env::var("STORAGE_ACCESS_KEY")
                .unwrap_or(default.storage_access_key),

            storage_secret_key: env::var("STORAGE_SECRET_KEY")
                .unwrap_or(default.storage_secret_key),

            storage_bucket: env::var("STORAGE_BUCKET").unwrap_or(default.storage_bucket),

            storage_domain: env::var("STORAGE_DOMAIN").unwrap_or(default.storage_domain),

            storage_endpoint: env::var("STORAGE_ENDPOINT").ok(),

            server_host: env::var("SERVER_HOST").unwrap_or(default.server_host),

            serving_port: env::var("SERVING_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.serving_port),

            bind_port: env::var("BIND_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.bind_port),

            html_dir: env::var("HTML_OUTPUT_DIR").unwrap_or(default.html_dir),

            image_dir: env::var("IMAGE_OUTPUT_DIR").unwrap_or(default.image_dir),

            valid_tokens: env::var("VALID_TOKENS")
                .map(|v| parse_token_list(&v))
                .unwrap_or(default.valid_tokens),

            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.fetch_timeout_secs),

            upload_part_size: env::var("UPLOAD_PART_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.upload_part_size),

            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_body_size),
        }
    }

    /// Create config for development and tests (local paths, one known token)
    pub fn development() -> Self {
        Self {
            storage_bucket: "publish-dev".to_string(),
            valid_tokens: ["dev-token".to_string()].into_iter().collect(),
            ..Self::default()
        }
    }

    /// Locally-served URL for a persisted HTML file.
    pub fn local_html_url(&self, filename: &str) -> String {
        format!(
            "http://{}:{}/html_output/{}",
            self.server_host, self.serving_port, filename
        )
    }
}

fn parse_token_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}
