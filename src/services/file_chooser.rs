//! File chooser bridge.
//!
//! Engines ask for files through a one-shot callback. The bridge guarantees
//! that every callback it accepts is answered exactly once, with an empty
//! selection on cancellation, replacement, or drop.

/// Callback receiving the selected resource handles.
pub type FileChooserCallback = Box<dyn FnOnce(Vec<String>)>;

/// What the platform picker is asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChooserRequest {
    pub allow_multiple: bool,
    pub accept_types: Vec<String>,
}

/// Platform picker UI. Results come back through [`FileChooserBridge::complete`].
pub trait FileChooser {
    fn launch(&mut self, request: &FileChooserRequest);
}

pub struct FileChooserBridge {
    chooser: Box<dyn FileChooser>,
    pending: Option<(FileChooserCallback, bool)>,
}

impl FileChooserBridge {
    pub fn new(chooser: Box<dyn FileChooser>) -> Self {
        Self {
            chooser,
            pending: None,
        }
    }

    /// Registers `callback` and launches the picker.
    ///
    /// A request still pending is answered with an empty selection first.
    /// Blank MIME filters are dropped; no filters means `*/*`.
    pub fn request(
        &mut self,
        callback: FileChooserCallback,
        allow_multiple: bool,
        accept_types: &[String],
    ) -> FileChooserRequest {
        if let Some((previous, _)) = self.pending.take() {
            log::debug!("file chooser superseded; answering previous request with nothing");
            previous(Vec::new());
        }

        let mut types: Vec<String> = accept_types
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if types.is_empty() {
            types.push("*/*".to_string());
        }

        let request = FileChooserRequest {
            allow_multiple,
            accept_types: types,
        };
        self.pending = Some((callback, allow_multiple));
        self.chooser.launch(&request);
        request
    }

    /// Delivers the picker's result. Returns `false` if nothing was pending.
    pub fn complete(&mut self, mut selection: Vec<String>) -> bool {
        match self.pending.take() {
            Some((callback, allow_multiple)) => {
                if !allow_multiple {
                    selection.truncate(1);
                }
                callback(selection);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) -> bool {
        self.complete(Vec::new())
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for FileChooserBridge {
    fn drop(&mut self) {
        if let Some((callback, _)) = self.pending.take() {
            callback(Vec::new());
        }
    }
}

/// Picker that answers nothing on its own; used by the headless demo.
#[derive(Debug, Default)]
pub struct LogFileChooser;

impl FileChooser for LogFileChooser {
    fn launch(&mut self, request: &FileChooserRequest) {
        log::info!(
            "file chooser requested (multiple: {}, types: {})",
            request.allow_multiple,
            request.accept_types.join(",")
        );
    }
}
