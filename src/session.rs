//! One photo selection at a time, parsed off the caller's task.
//!
//! Each call to [`PhotoSession::select`] starts a new selection generation and
//! decodes on a blocking worker. A finished parse is applied only if no newer
//! selection has been made in the meantime, so a slow decode of an older photo
//! can never replace the record of a newer one.
//!
//! ```rust,no_run
//! use exiframe::session::PhotoSession;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let session = PhotoSession::new();
//! let mut updates = session.subscribe();
//!
//! session.select(std::fs::read("photo.jpg")?).await?;
//! updates.changed().await?;
//! println!("{:?}", session.caption().lines());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::display::Caption;
use crate::exif::{self, ExifData};

/// Observable state of a [`PhotoSession`].
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Generation of the most recent selection.
    pub selection: u64,
    /// Generation the current `exif` record belongs to.
    pub record_selection: u64,
    /// `None` before the first parse finishes, or when the latest photo could not be decoded.
    pub exif: Option<Arc<ExifData>>,
    pub show_focal_length_in_35mm_film: bool,
}

impl SessionState {
    pub fn is_parsing(&self) -> bool {
        self.record_selection != self.selection
    }

    pub fn caption(&self) -> Caption {
        Caption::new(self.exif.as_deref(), self.show_focal_length_in_35mm_film)
    }
}

#[derive(Debug, Clone)]
pub struct PhotoSession {
    state: Arc<watch::Sender<SessionState>>,
}

impl Default for PhotoSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoSession {
    pub fn new() -> Self {
        Self::with_focal_length_in_35mm_film(false)
    }

    pub fn with_focal_length_in_35mm_film(show: bool) -> Self {
        let (state, _) = watch::channel(SessionState {
            show_focal_length_in_35mm_film: show,
            ..SessionState::default()
        });
        Self {
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn caption(&self) -> Caption {
        self.state.borrow().caption()
    }

    pub fn set_show_focal_length_in_35mm_film(&self, show: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.show_focal_length_in_35mm_film != show;
            state.show_focal_length_in_35mm_film = show;
            changed
        });
    }

    /// Start parsing a newly selected photo.
    ///
    /// Must be called from within a Tokio runtime. The returned handle
    /// resolves once the parse has finished and its result has been applied
    /// or discarded.
    pub fn select(&self, image_bytes: Vec<u8>) -> JoinHandle<()> {
        let generation = self.begin_selection();
        let session = self.clone();

        tokio::spawn(async move {
            let parsed = tokio::task::spawn_blocking(move || exif::read_exif(&image_bytes)).await;
            let record = match parsed {
                Ok(record) => record,
                Err(e) => {
                    log::error!("Metadata parse task failed: {e}");
                    None
                }
            };
            session.complete(generation, record);
        })
    }

    fn begin_selection(&self) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.selection += 1;
            generation = state.selection;
        });
        log::debug!("Selection {generation} started");
        generation
    }

    /// Apply a finished parse; returns whether it was still current.
    fn complete(&self, generation: u64, record: Option<ExifData>) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if state.selection != generation {
                return false;
            }
            state.exif = record.map(Arc::new);
            state.record_selection = generation;
            true
        });
        if !applied {
            log::debug!("Discarding parse of superseded selection {generation}");
        }
        applied
    }
}
