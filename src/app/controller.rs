use crate::{
    app::{Notifier, PageState, DOWNLOAD_FAILED_MESSAGE, GENERATE_FAILED_MESSAGE},
    error::{Result, StudioError},
    logger,
    models::{GeneratedImageRecord, GenerationOptions},
    replicate::{ImageDownloader, ImageGenerator},
    storage::PersistentList,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

struct Session {
    state: PageState,
    current: Option<GeneratedImageRecord>,
    images: Vec<GeneratedImageRecord>,
}

/// Owns the session state and runs the generate → store → render flow.
///
/// At most one generation is in flight per controller; a second submission
/// while one is running fails fast with [`StudioError::Busy`].
pub struct PageController {
    generator: Arc<dyn ImageGenerator>,
    downloader: Arc<dyn ImageDownloader>,
    history: PersistentList<GeneratedImageRecord>,
    notifier: Arc<dyn Notifier>,
    in_flight: AtomicBool,
    session: Mutex<Session>,
}

impl PageController {
    pub async fn load(
        generator: Arc<dyn ImageGenerator>,
        downloader: Arc<dyn ImageDownloader>,
        history: PersistentList<GeneratedImageRecord>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let images = history.read().await;
        log::debug!("Loaded {} history entries", images.len());

        Self {
            generator,
            downloader,
            history,
            notifier,
            in_flight: AtomicBool::new(false),
            session: Mutex::new(Session {
                state: PageState::Idle,
                current: None,
                images,
            }),
        }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GeneratedImageRecord> {
        let _guard = InFlightGuard::acquire(self).ok_or_else(|| {
            log::debug!("Ignoring submission while a generation is in flight");
            StudioError::Busy
        })?;

        self.transition(PageState::Generating);
        let _timer = logger::timer("Image generation");

        match self.generator.generate(prompt, options).await {
            Ok(record) => {
                let images = {
                    let mut session = self.session();
                    session.images.insert(0, record.clone());
                    session.current = Some(record.clone());
                    session.images.clone()
                };
                self.history.write(&images).await;

                self.transition(PageState::Success);
                self.transition(PageState::Idle);
                Ok(record)
            }
            Err(e) => {
                log::error!("Error generating image: {}", e);
                self.notifier.alert(GENERATE_FAILED_MESSAGE);

                self.transition(PageState::Failed);
                self.transition(PageState::Idle);
                Err(e)
            }
        }
    }

    pub async fn download(&self, url: &str) -> Result<PathBuf> {
        match self.downloader.download(url).await {
            Ok(path) => Ok(path),
            Err(e) => {
                log::error!("Error downloading image: {}", e);
                self.notifier.alert(DOWNLOAD_FAILED_MESSAGE);
                Err(e)
            }
        }
    }

    /// Downloads the history entry shown as `#index` (1-based, most recent first).
    pub async fn download_history(&self, index: usize) -> Result<PathBuf> {
        let url = {
            let session = self.session();
            index
                .checked_sub(1)
                .and_then(|i| session.images.get(i))
                .map(|record| record.url.clone())
        };

        match url {
            Some(url) => self.download(&url).await,
            None => Err(StudioError::Validation(format!(
                "No generated image #{} in history",
                index
            ))),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state() == PageState::Generating
    }

    pub fn state(&self) -> PageState {
        self.session().state
    }

    pub fn current_image(&self) -> Option<GeneratedImageRecord> {
        self.session().current.clone()
    }

    pub fn history(&self) -> Vec<GeneratedImageRecord> {
        self.session().images.clone()
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn transition(&self, next: PageState) {
        let mut session = self.session();
        if !session.state.can_transition_to(next) {
            log::warn!("Unexpected page state change {} -> {}", session.state, next);
        }
        log::debug!("Page state {} -> {}", session.state, next);
        session.state = next;
    }
}

/// Holds the single-flight slot; releasing it also recovers the page state
/// if the generation future was dropped before finishing.
struct InFlightGuard<'a> {
    controller: &'a PageController,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(controller: &'a PageController) -> Option<Self> {
        controller
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { controller })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        {
            let mut session = self.controller.session();
            if session.state == PageState::Generating {
                log::warn!("Generation abandoned before completion");
                session.state = PageState::Idle;
            }
        }
        self.controller.in_flight.store(false, Ordering::Release);
    }
}
