use chrono::Local;
use rand::Rng;

pub const DEFAULT_EXTENSION: &str = "html";

/// Generates a `YYYYMMDDHHMMSS_<4-digit>.<ext>` filename.
///
/// Uniqueness is probabilistic only: two calls within the same second can
/// collide with probability ~1/9000 and no collision check is performed.
pub fn generate_filename(extension: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    let random_number = rand::thread_rng().gen_range(1000..=9999);
    format!("{}_{}.{}", timestamp, random_number, extension)
}
