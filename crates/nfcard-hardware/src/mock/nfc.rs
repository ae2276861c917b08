//! Mock NFC radio for testing and development.
//!
//! [`MockNfc`] behaves like a phone's NFC radio: it must be claimed before
//! use, waits for tags, enforces tag capacity and read-only locks, and
//! counts releases. A [`MockNfcHandle`] plays the user and the environment,
//! presenting tags, pulling them away and cancelling sessions.

use crate::error::{NfcError, NfcResult};
use crate::traits::NfcDevice;
use crate::types::{ReaderInfo, TagInfo, TagType, Technology};
use nfcard_codec::ndef::tag_footprint;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

const DEFAULT_UID: [u8; 7] = [0x04, 0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6];

/// A simulated tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTag {
    pub uid: Vec<u8>,
    pub tag_type: TagType,

    /// Raw NDEF message bytes; empty for a blank tag.
    pub contents: Vec<u8>,

    pub read_only: bool,
}

impl MockTag {
    pub fn new(uid: Vec<u8>, tag_type: TagType) -> Self {
        Self {
            uid,
            tag_type,
            contents: Vec::new(),
            read_only: false,
        }
    }

    /// Blank writable tag with a fixed 7-byte UID.
    pub fn blank(tag_type: TagType) -> Self {
        Self::new(DEFAULT_UID.to_vec(), tag_type)
    }

    pub fn with_contents(mut self, contents: impl Into<Vec<u8>>) -> Self {
        self.contents = contents.into();
        self
    }

    pub fn locked(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn capacity(&self) -> usize {
        self.tag_type.capacity()
    }
}

#[derive(Debug)]
enum RadioEvent {
    TagPresented(MockTag),
    Cancelled,
}

#[derive(Debug)]
struct RadioState {
    supported: bool,
    enabled: bool,
    session: Option<Technology>,
    tag: Option<MockTag>,
    connected: bool,
    requests: usize,
    releases: usize,
    writes: Vec<Vec<u8>>,
    fail_next: Option<NfcError>,
}

impl Default for RadioState {
    fn default() -> Self {
        Self {
            supported: true,
            enabled: true,
            session: None,
            tag: None,
            connected: false,
            requests: 0,
            releases: 0,
            writes: Vec::new(),
            fail_next: None,
        }
    }
}

/// Mock NFC radio.
///
/// # Examples
///
/// ```
/// use nfcard_hardware::mock::{MockNfc, MockTag};
/// use nfcard_hardware::traits::NfcDevice;
/// use nfcard_hardware::types::{TagType, Technology};
///
/// #[tokio::main]
/// async fn main() -> nfcard_hardware::NfcResult<()> {
///     let (mut radio, handle) = MockNfc::new();
///
///     handle.present_tag(MockTag::blank(TagType::Ntag215)).await?;
///
///     radio.request_technology(Technology::Ndef).await?;
///     let tag = radio.wait_for_tag().await?;
///     radio.write_ndef(&[0xD0, 0x00, 0x00]).await?;
///     radio.cancel_technology_request().await?;
///
///     assert_eq!(tag.capacity(), 504);
///     assert_eq!(handle.last_written().await, Some(vec![0xD0, 0x00, 0x00]));
///     assert_eq!(handle.release_count().await, 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockNfc {
    event_rx: mpsc::Receiver<RadioEvent>,
    state: Arc<Mutex<RadioState>>,
    name: String,
}

impl MockNfc {
    /// Create a mock radio and the handle that drives it.
    pub fn new() -> (Self, MockNfcHandle) {
        Self::with_name("Mock NFC Radio")
    }

    pub fn with_name(name: impl Into<String>) -> (Self, MockNfcHandle) {
        let name = name.into();
        let (event_tx, event_rx) = mpsc::channel(32);
        let state = Arc::new(Mutex::new(RadioState::default()));

        let radio = Self {
            event_rx,
            state: state.clone(),
            name: name.clone(),
        };
        let handle = MockNfcHandle {
            event_tx,
            state,
            name,
        };

        (radio, handle)
    }
}

impl NfcDevice for MockNfc {
    async fn is_supported(&self) -> NfcResult<bool> {
        Ok(self.state.lock().await.supported)
    }

    async fn is_enabled(&self) -> NfcResult<bool> {
        let state = self.state.lock().await;
        Ok(state.supported && state.enabled)
    }

    async fn request_technology(&mut self, technology: Technology) -> NfcResult<()> {
        let mut state = self.state.lock().await;
        if !state.supported {
            return Err(NfcError::unsupported("device has no NFC radio"));
        }
        if !state.enabled {
            return Err(NfcError::NotEnabled);
        }
        if state.session.is_some() {
            return Err(NfcError::Busy);
        }

        state.session = Some(technology);
        state.requests += 1;
        Ok(())
    }

    async fn wait_for_tag(&mut self) -> NfcResult<TagInfo> {
        if self.state.lock().await.session.is_none() {
            return Err(NfcError::unknown("no technology request in progress"));
        }

        match self.event_rx.recv().await {
            Some(RadioEvent::TagPresented(tag)) => {
                let info = TagInfo::new(tag.uid.clone(), tag.tag_type.clone(), !tag.read_only)?;
                let mut state = self.state.lock().await;
                state.tag = Some(tag);
                state.connected = true;
                Ok(info)
            }
            Some(RadioEvent::Cancelled) => Err(NfcError::Cancelled),
            None => Err(NfcError::disconnected(self.name.clone())),
        }
    }

    async fn read_ndef(&mut self) -> NfcResult<Vec<u8>> {
        let mut state = self.state.lock().await;
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        if !state.connected {
            return Err(NfcError::tag_lost("read"));
        }

        match state.tag.as_ref() {
            Some(tag) if !tag.contents.is_empty() => Ok(tag.contents.clone()),
            Some(_) => Err(NfcError::EmptyTag),
            None => Err(NfcError::tag_lost("read")),
        }
    }

    async fn write_ndef(&mut self, message: &[u8]) -> NfcResult<()> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        if !state.connected {
            return Err(NfcError::tag_lost("write"));
        }

        let Some(tag) = state.tag.as_mut() else {
            return Err(NfcError::tag_lost("write"));
        };
        if tag.read_only {
            return Err(NfcError::ReadOnly);
        }
        let required = tag_footprint(message.len());
        if required > tag.capacity() {
            return Err(NfcError::CapacityExceeded {
                required,
                capacity: tag.capacity(),
            });
        }

        tag.contents = message.to_vec();
        state.writes.push(message.to_vec());
        Ok(())
    }

    async fn cancel_technology_request(&mut self) -> NfcResult<()> {
        // Tags or cancels queued for this session must not reach the next one.
        while self.event_rx.try_recv().is_ok() {}

        let mut state = self.state.lock().await;
        state.session = None;
        state.connected = false;
        state.releases += 1;
        Ok(())
    }

    async fn get_reader_info(&self) -> NfcResult<ReaderInfo> {
        Ok(ReaderInfo::new(
            self.name.clone(),
            vec![Technology::Ndef, Technology::NfcA],
        ))
    }
}

/// Handle for controlling a [`MockNfc`].
///
/// Clones share the radio they control.
///
/// # Examples
///
/// ```
/// use nfcard_hardware::mock::{MockNfc, MockTag};
/// use nfcard_hardware::types::TagType;
///
/// #[tokio::main]
/// async fn main() {
///     let (_radio, handle) = MockNfc::new();
///
///     handle.set_enabled(false).await;
///     assert!(!handle.session_active().await);
///     assert!(!handle.cancel().await);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockNfcHandle {
    event_tx: mpsc::Sender<RadioEvent>,
    state: Arc<Mutex<RadioState>>,
    name: String,
}

impl MockNfcHandle {
    /// Bring a tag into the field.
    ///
    /// # Errors
    ///
    /// Returns [`NfcError::Disconnected`] if the radio has been dropped.
    pub async fn present_tag(&self, tag: MockTag) -> NfcResult<()> {
        self.event_tx
            .send(RadioEvent::TagPresented(tag))
            .await
            .map_err(|_| NfcError::disconnected(self.name.clone()))
    }

    /// Pull the connected tag out of the field.
    pub async fn lose_tag(&self) {
        self.state.lock().await.connected = false;
    }

    /// Cancel the session in progress, as the user tapping "Cancel".
    ///
    /// Returns `false` when no session is active; nothing is queued then.
    pub async fn cancel(&self) -> bool {
        if self.state.lock().await.session.is_none() {
            return false;
        }
        self.event_tx.send(RadioEvent::Cancelled).await.is_ok()
    }

    pub async fn set_supported(&self, supported: bool) {
        self.state.lock().await.supported = supported;
    }

    pub async fn set_enabled(&self, enabled: bool) {
        self.state.lock().await.enabled = enabled;
    }

    /// Make the next tag read or write fail with `error`.
    pub async fn fail_next(&self, error: NfcError) {
        self.state.lock().await.fail_next = Some(error);
    }

    /// Every message written, oldest first.
    pub async fn written(&self) -> Vec<Vec<u8>> {
        self.state.lock().await.writes.clone()
    }

    pub async fn last_written(&self) -> Option<Vec<u8>> {
        self.state.lock().await.writes.last().cloned()
    }

    /// The most recently discovered tag, with its current contents.
    pub async fn tag(&self) -> Option<MockTag> {
        self.state.lock().await.tag.clone()
    }

    pub async fn session_active(&self) -> bool {
        self.state.lock().await.session.is_some()
    }

    pub async fn request_count(&self) -> usize {
        self.state.lock().await.requests
    }

    pub async fn release_count(&self) -> usize {
        self.state.lock().await.releases
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
