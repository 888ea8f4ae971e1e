//! Label modal controller.
//!
//! A small state machine for viewing and uploading one tote's barcode label.
//! Network work (image probe, upload) is described by request values the
//! caller executes; each request carries the tote id and a token so a
//! response arriving after the user moved on is dropped instead of applied.

use shared::{endpoints, ApiError, UploadLabelResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    /// Probe in flight
    Loading,
    Available,
    /// No label stored yet
    Absent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenModal {
    pub tote_id: String,
    pub preview: PreviewStatus,
    /// Cache-busted image URL of the latest probe
    pub preview_url: String,
    pub uploading: bool,
    /// User-visible failure from the last action
    pub error: Option<String>,
    /// User-visible confirmation from the last upload
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(OpenModal),
}

/// Metadata of the file the user picked. The adapter keeps the file itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSelection {
    pub name: String,
    pub size: u64,
}

/// Ask the caller to check whether a label image exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRequest {
    pub tote_id: String,
    pub token: u64,
    /// `?v=` value carried by `url`
    pub cache_bust: String,
    pub url: String,
}

/// Ask the caller to `POST` the selected file.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub tote_id: String,
    pub token: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModalError {
    #[error("No label is open")]
    NotOpen,

    #[error("Label for {0} is already open")]
    AlreadyOpen(String),

    #[error("Choose a file!")]
    NoFile,

    #[error("The selected file is empty")]
    EmptyFile,

    #[error("An upload is already in progress")]
    UploadInProgress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelModal {
    state: ModalState,
    /// Distinguishes cache-bust tokens across page loads
    session_seed: u64,
    next_token: u64,
    pending_probe: Option<u64>,
    pending_upload: Option<u64>,
}

impl LabelModal {
    pub fn new(session_seed: u64) -> Self {
        Self {
            state: ModalState::Closed,
            session_seed,
            next_token: 1,
            pending_probe: None,
            pending_upload: None,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn open_tote(&self) -> Option<&str> {
        match &self.state {
            ModalState::Open(modal) => Some(&modal.tote_id),
            ModalState::Closed => None,
        }
    }

    /// Closed -> Open(tote_id, Loading). Switching totes requires a close
    /// first so the preview always starts from scratch.
    pub fn open(&mut self, tote_id: &str) -> Result<ProbeRequest, ModalError> {
        if let Some(current) = self.open_tote() {
            return Err(ModalError::AlreadyOpen(current.to_string()));
        }
        self.pending_upload = None;
        let probe = self.issue_probe(tote_id);
        self.state = ModalState::Open(OpenModal {
            tote_id: tote_id.to_string(),
            preview: PreviewStatus::Loading,
            preview_url: probe.url.clone(),
            uploading: false,
            error: None,
            notice: None,
        });
        Ok(probe)
    }

    /// Open(*) -> Closed. Returns whether the modal was open.
    pub fn close(&mut self) -> bool {
        self.pending_probe = None;
        self.pending_upload = None;
        matches!(std::mem::take(&mut self.state), ModalState::Open(_))
    }

    /// Apply a probe result. Returns false when the result was stale.
    pub fn probe_finished(&mut self, tote_id: &str, token: u64, found: bool) -> bool {
        if self.pending_probe != Some(token) {
            log::debug!("Dropping stale label probe for {}", tote_id);
            return false;
        }
        let ModalState::Open(modal) = &mut self.state else {
            return false;
        };
        if modal.tote_id != tote_id {
            return false;
        }
        self.pending_probe = None;
        modal.preview = if found {
            PreviewStatus::Available
        } else {
            PreviewStatus::Absent
        };
        true
    }

    /// Validate the selection and describe the upload. Validation failures
    /// are recorded as the user-visible error and issue no request.
    pub fn upload(
        &mut self,
        selection: Option<&LabelSelection>,
    ) -> Result<UploadRequest, ModalError> {
        let ModalState::Open(modal) = &mut self.state else {
            return Err(ModalError::NotOpen);
        };
        let checked = match selection {
            _ if modal.uploading => Err(ModalError::UploadInProgress),
            None => Err(ModalError::NoFile),
            Some(file) if file.size == 0 => Err(ModalError::EmptyFile),
            Some(_) => Ok(()),
        };
        if let Err(err) = checked {
            modal.error = Some(err.to_string());
            modal.notice = None;
            return Err(err);
        }

        let token = self.next_token;
        self.next_token += 1;
        self.pending_upload = Some(token);
        modal.uploading = true;
        modal.error = None;
        modal.notice = None;
        Ok(UploadRequest {
            tote_id: modal.tote_id.clone(),
            token,
            url: endpoints::upload_label_path(&modal.tote_id),
        })
    }

    /// Apply an upload result. On success the preview becomes available and
    /// a cache-busted re-probe is returned; on failure the preview is kept
    /// and the error surfaced. Stale results return `None` and change
    /// nothing.
    pub fn upload_finished(
        &mut self,
        tote_id: &str,
        token: u64,
        result: Result<UploadLabelResponse, ApiError>,
    ) -> Option<ProbeRequest> {
        if self.pending_upload != Some(token) || self.open_tote() != Some(tote_id) {
            log::debug!("Dropping stale label upload result for {}", tote_id);
            return None;
        }
        self.pending_upload = None;

        let failure = match result {
            Ok(response) if response.ok => None,
            Ok(response) => Some(
                response
                    .error
                    .unwrap_or_else(|| "Upload was rejected".to_string()),
            ),
            Err(err) => Some(format!("Upload failed: {}", err)),
        };

        if let Some(message) = failure {
            log::warn!("Label upload for {} failed: {}", tote_id, message);
            if let ModalState::Open(modal) = &mut self.state {
                modal.uploading = false;
                modal.error = Some(message);
            }
            return None;
        }

        let probe = self.issue_probe(tote_id);
        if let ModalState::Open(modal) = &mut self.state {
            modal.uploading = false;
            modal.preview = PreviewStatus::Available;
            modal.preview_url = probe.url.clone();
            modal.notice = Some("Uploaded!".to_string());
        }
        Some(probe)
    }

    fn issue_probe(&mut self, tote_id: &str) -> ProbeRequest {
        let token = self.next_token;
        self.next_token += 1;
        self.pending_probe = Some(token);
        let cache_bust = format!("{}-{}", self.session_seed, token);
        ProbeRequest {
            tote_id: tote_id.to_string(),
            token,
            url: endpoints::label_image_path(tote_id, Some(&cache_bust)),
            cache_bust,
        }
    }
}
