use crate::{
    api::ImageService,
    config::StudioConfig,
    download::Downloader,
    error::{Result, StudioError},
    gallery::{self, GalleryCard},
    logger::{mask_secret, Timer},
    models::{GeneratedImage, GenerationPhase, Notification},
    notify::Notifier,
    prompt::assemble_prompt,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// What the user has typed into the form.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub credential: String,
    pub show_credential: bool,
    pub requirement: String,
}

/// Clears the in-flight flag when the generation call returns, whatever the outcome.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// The form, its single generation trigger and the gallery it feeds.
///
/// Share it as `Arc<Studio>` between the input loop and spawned tasks. Only
/// one generation can be outstanding; downloads are independent of it.
pub struct Studio {
    service: Arc<dyn ImageService>,
    notifier: Arc<dyn Notifier>,
    downloader: Downloader,
    template: String,
    form: Mutex<FormState>,
    gallery: RwLock<Vec<GeneratedImage>>,
    in_flight: AtomicBool,
}

impl Studio {
    pub fn new(
        config: &StudioConfig,
        service: Arc<dyn ImageService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            service,
            notifier,
            downloader: Downloader::new(config),
            template: config.template.clone(),
            form: Mutex::new(FormState::default()),
            gallery: RwLock::new(Vec::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    fn form(&self) -> MutexGuard<'_, FormState> {
        self.form.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn gallery_read(&self) -> RwLockReadGuard<'_, Vec<GeneratedImage>> {
        self.gallery
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn gallery_write(&self) -> RwLockWriteGuard<'_, Vec<GeneratedImage>> {
        self.gallery
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // --- form ---

    pub fn set_credential(&self, credential: impl Into<String>) {
        self.form().credential = credential.into();
    }

    pub fn set_requirement(&self, requirement: impl Into<String>) {
        self.form().requirement = requirement.into();
    }

    pub fn toggle_credential_visibility(&self) -> bool {
        let mut form = self.form();
        form.show_credential = !form.show_credential;
        form.show_credential
    }

    pub fn set_credential_visible(&self, visible: bool) {
        self.form().show_credential = visible;
    }

    /// The credential as the form shows it: in clear when visible, dots otherwise.
    pub fn credential_display(&self) -> String {
        let form = self.form();
        if form.show_credential {
            form.credential.clone()
        } else {
            "•".repeat(form.credential.chars().count())
        }
    }

    pub fn form_snapshot(&self) -> FormState {
        self.form().clone()
    }

    pub fn prompt(&self) -> String {
        assemble_prompt(&self.template, &self.form().requirement)
    }

    // --- generation ---

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> GenerationPhase {
        if self.is_generating() {
            GenerationPhase::Generating
        } else {
            GenerationPhase::Idle
        }
    }

    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                flag: &self.in_flight,
            })
    }

    /// Sends the assembled prompt and puts the result at the front of the gallery.
    ///
    /// Inert while another generation is outstanding ([`StudioError::Busy`],
    /// nothing is sent or reported). A blank credential is reported and
    /// nothing is sent.
    pub async fn generate(&self) -> Result<GeneratedImage> {
        if self.is_generating() {
            log::debug!("Generate ignored: a request is already in flight");
            return Err(StudioError::Busy);
        }

        let (credential, prompt) = {
            let form = self.form();
            (
                form.credential.clone(),
                assemble_prompt(&self.template, &form.requirement),
            )
        };

        if credential.trim().is_empty() {
            let err = StudioError::MissingCredential;
            self.notifier.notify(Notification::error(err.user_message()));
            return Err(err);
        }

        let _guard = match self.try_begin() {
            Some(guard) => guard,
            None => {
                log::debug!("Generate ignored: lost the race for the in-flight flag");
                return Err(StudioError::Busy);
            }
        };

        let request_id = Uuid::new_v4();
        log::info!(
            "Generating image [req:{}] key={} prompt_chars={}",
            request_id,
            mask_secret(&credential),
            prompt.chars().count()
        );
        let timer = Timer::new("image generation");

        let outcome = self.service.generate(&credential, &prompt).await;
        drop(timer);

        match outcome {
            Ok(image) => {
                self.gallery_write().insert(0, image.clone());
                log::info!("Image ready [req:{}]: {}", request_id, image.url);
                self.notifier.notify(Notification::success(
                    "Success",
                    "Image generated successfully!",
                ));
                Ok(image)
            }
            Err(e) => {
                log::error!("Error generating image [req:{}]: {}", request_id, e);
                self.notifier.notify(Notification::error(e.user_message()));
                Err(e)
            }
        }
    }

    // --- gallery ---

    /// Snapshot of the gallery, newest first.
    pub fn images(&self) -> Vec<GeneratedImage> {
        self.gallery_read().clone()
    }

    pub fn len(&self) -> usize {
        self.gallery_read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.gallery_read().is_empty()
    }

    pub fn cards(&self) -> Vec<GalleryCard> {
        gallery::cards(&self.gallery_read())
    }

    pub fn render_gallery(&self, show_colors: bool) -> String {
        gallery::render(&self.gallery_read(), show_colors)
    }

    // --- downloads ---

    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    /// Saves the entry at zero-based `index` to disk.
    pub async fn download(&self, index: usize) -> Result<PathBuf> {
        let url = match self.gallery_read().get(index) {
            Some(image) => image.url.clone(),
            None => {
                let err = StudioError::InvalidIndex(index + 1);
                self.notifier.notify(Notification::error(err.user_message()));
                return Err(err);
            }
        };

        match self.downloader.save(self.service.as_ref(), &url, index).await {
            Ok(path) => {
                self.notifier.notify(Notification::success(
                    "Downloaded",
                    format!("Saved {}", path.display()),
                ));
                Ok(path)
            }
            Err(e) => {
                log::warn!("Download of image {} failed: {}", index + 1, e);
                self.notifier.notify(Notification::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Downloads every gallery entry at once; each result stands on its own.
    pub async fn download_all(&self) -> Vec<Result<PathBuf>> {
        let count = self.len();
        futures::future::join_all((0..count).map(|index| self.download(index))).await
    }
}
