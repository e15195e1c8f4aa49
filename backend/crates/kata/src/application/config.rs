use platform::upload::UploadPolicy;

pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_DESCRIPTION: &str = "Default description";
pub const DEFAULT_SOLUTION: &str = "Default Solution";
pub const DEFAULT_INTENTS: i32 = 1;

/// Kata context configuration
#[derive(Debug, Clone)]
pub struct KataConfig {
    pub upload: UploadPolicy,
    pub max_page_size: u64,
}

impl Default for KataConfig {
    fn default() -> Self {
        Self {
            upload: UploadPolicy::default(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl KataConfig {
    pub fn development() -> Self {
        Self::default()
    }

    /// Request body limit for the upload route: every file at full size,
    /// plus room for multipart framing
    pub fn upload_body_limit(&self) -> usize {
        self.upload
            .max_file_size
            .saturating_mul(self.upload.max_files)
            .saturating_add(64 * 1024)
    }
}
