use crate::{
    api::ImageService,
    config::{StudioConfig, DEFAULT_FILE_EXTENSION},
    error::{Result, StudioError},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Saves gallery images to local files named `<prefix><position>.<ext>`.
#[derive(Debug, Clone)]
pub struct Downloader {
    output_dir: PathBuf,
    prefix: String,
    extension: String,
}

impl Downloader {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            prefix: config.file_prefix.clone(),
            extension: DEFAULT_FILE_EXTENSION.to_string(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File name for the entry at zero-based `index`.
    pub fn file_name(&self, index: usize) -> String {
        format!("{}{}.{}", self.prefix, index + 1, self.extension)
    }

    pub fn target_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(self.file_name(index))
    }

    /// A fresh hidden sibling of the target for one save call. Saves of the
    /// same entry running at once never share it.
    fn partial_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!(".{}.{}.part", self.file_name(index), Uuid::new_v4().simple()))
    }

    /// Fetches `url` in full, then writes it next to its final name and
    /// renames it into place. Nothing is written unless the fetch succeeded.
    pub async fn save(
        &self,
        service: &dyn ImageService,
        url: &str,
        index: usize,
    ) -> Result<PathBuf> {
        let bytes = if url.starts_with("data:") {
            decode_data_url(url)?
        } else {
            service.fetch(url).await?
        };

        let target = self.target_path(index);
        let partial = self.partial_path(index);

        tokio::fs::create_dir_all(&self.output_dir).await?;
        if let Err(e) = write_then_rename(&partial, &target, &bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }

        log::debug!("Saved {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }
}

async fn write_then_rename(partial: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(partial, bytes).await?;
    tokio::fs::rename(partial, target).await?;
    Ok(())
}

pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let (header, payload) = url
        .split_once(',')
        .ok_or_else(|| StudioError::DownloadError("Malformed data URL".into()))?;

    if !header.ends_with(";base64") {
        return Err(StudioError::DownloadError(
            "Only base64 data URLs are supported".into(),
        ));
    }

    STANDARD
        .decode(payload)
        .map_err(|e| StudioError::DownloadError(format!("Invalid base64 payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeneratedImage;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Serves a large body so that concurrent writes overlap on disk.
    struct BulkService {
        body: Vec<u8>,
    }

    #[async_trait]
    impl ImageService for BulkService {
        async fn generate(&self, _credential: &str, _prompt: &str) -> Result<GeneratedImage> {
            Err(StudioError::ResponseError("not used".into()))
        }

        async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            tokio::task::yield_now().await;
            Ok(self.body.clone())
        }
    }

    #[test]
    fn partial_paths_are_unique_per_call() {
        let downloader = Downloader::new(&StudioConfig::new().with_output_dir("out"));
        let a = downloader.partial_path(0);
        let b = downloader.partial_path(0);

        assert_ne!(a, b);
        let name = a.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".generated-image-1.png."));
        assert!(name.ends_with(".part"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn same_entry_saved_twice_at_once() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = Arc::new(Downloader::new(
            &StudioConfig::new().with_output_dir(dir.path()),
        ));
        let body: Vec<u8> = (0..8 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
        let service = Arc::new(BulkService { body: body.clone() });

        for _ in 0..5 {
            let tasks: Vec<_> = (0..2)
                .map(|_| {
                    let downloader = downloader.clone();
                    let service = service.clone();
                    tokio::spawn(async move {
                        downloader
                            .save(service.as_ref(), "https://x/img.png", 0)
                            .await
                    })
                })
                .collect();

            for task in tasks {
                let path = task.await.unwrap().unwrap();
                assert_eq!(path, dir.path().join("generated-image-1.png"));
            }
        }

        assert_eq!(std::fs::read(dir.path().join("generated-image-1.png")).unwrap(), body);
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|name| name.to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty(), "temporary files left: {:?}", leftovers);
    }

    #[test]
    fn file_names_are_one_based() {
        let downloader = Downloader::new(&StudioConfig::new().with_output_dir("out"));
        assert_eq!(downloader.file_name(0), "generated-image-1.png");
        assert_eq!(downloader.file_name(4), "generated-image-5.png");
        assert_eq!(
            downloader.target_path(0),
            PathBuf::from("out").join("generated-image-1.png")
        );
    }

    #[test]
    fn decodes_base64_data_url() {
        let bytes = decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn rejects_non_base64_data_url() {
        assert!(decode_data_url("data:text/plain,hello").is_err());
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }
}
