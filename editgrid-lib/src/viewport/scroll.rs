//! Scroll state with a per-frame request queue.

use log::trace;

use super::ItemSizes;

/// Actions that can be requested on scroll state.
///
/// Requests queue up and are applied together by
/// [`ScrollState::process_requests`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    /// Signed offset change; positive moves down.
    Delta(i64),
    ToOffset(u64),
    /// Bring a row index fully into the viewport.
    IntoView(usize),
    PageUp,
    PageDown,
    Home,
    End,
}

impl ScrollRequest {
    fn is_absolute(&self) -> bool {
        matches!(
            self,
            ScrollRequest::ToOffset(_)
                | ScrollRequest::IntoView(_)
                | ScrollRequest::Home
                | ScrollRequest::End
        )
    }
}

/// Scroll offset, viewport and content height.
///
/// Input handlers queue requests; the frame applies them once and clamps the
/// offset to `[0, content_height - viewport]`.
///
/// # Example
///
/// ```
/// use editgrid_lib::viewport::{FixedSize, ScrollState};
///
/// let sizes = FixedSize::new(100, 36);
/// let mut scroll = ScrollState::new(360);
/// scroll.set_content_height(3600);
///
/// scroll.scroll_by(20);
/// scroll.scroll_by(16);
/// scroll.process_requests(&sizes);
/// assert_eq!(scroll.offset, 36);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// Current scroll offset from the top.
    pub offset: u64,

    /// Viewport height.
    pub viewport: u64,

    /// Total content height.
    pub content_height: u64,

    requests: Vec<ScrollRequest>,
}

impl ScrollState {
    /// Create a scroll state for a viewport height.
    pub fn new(viewport: u64) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    /// Largest valid offset.
    pub fn max_offset(&self) -> u64 {
        self.content_height.saturating_sub(self.viewport)
    }

    /// Offset as a fraction of the scrollable range.
    pub fn progress(&self) -> f32 {
        let max = self.max_offset();
        if max == 0 {
            0.0
        } else {
            self.offset as f32 / max as f32
        }
    }

    /// Content overflows the viewport.
    pub fn can_scroll(&self) -> bool {
        self.content_height > self.viewport
    }

    /// Queue a request.
    ///
    /// Consecutive deltas are summed; an absolute request replaces whatever
    /// was queued before it.
    pub fn request(&mut self, request: ScrollRequest) {
        if request.is_absolute() {
            self.requests.clear();
        }
        if let (Some(ScrollRequest::Delta(queued)), ScrollRequest::Delta(d)) =
            (self.requests.last_mut(), request)
        {
            *queued = queued.saturating_add(d);
            return;
        }
        self.requests.push(request);
    }

    /// Queues a relative move.
    pub fn scroll_by(&mut self, delta: i64) {
        self.request(ScrollRequest::Delta(delta));
    }

    pub fn scroll_to(&mut self, offset: u64) {
        self.request(ScrollRequest::ToOffset(offset));
    }

    pub fn scroll_into_view(&mut self, index: usize) {
        self.request(ScrollRequest::IntoView(index));
    }

    pub fn page_up(&mut self) {
        self.request(ScrollRequest::PageUp);
    }

    pub fn page_down(&mut self) {
        self.request(ScrollRequest::PageDown);
    }

    pub fn home(&mut self) {
        self.request(ScrollRequest::Home);
    }

    pub fn end(&mut self) {
        self.request(ScrollRequest::End);
    }

    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }

    /// Set viewport size, clamping the offset.
    pub fn set_viewport(&mut self, height: u64) {
        self.viewport = height;
        self.clamp();
    }

    /// Set content height, clamping the offset.
    pub fn set_content_height(&mut self, height: u64) {
        self.content_height = height;
        self.clamp();
    }

    fn clamp(&mut self) {
        let max = self.max_offset();
        if self.offset > max {
            trace!("Clamping scroll offset {} to {}", self.offset, max);
            self.offset = max;
        }
    }

    /// Apply one request to the offset.
    pub fn apply_request(&mut self, request: ScrollRequest, sizes: &impl ItemSizes) {
        let max = self.max_offset();
        self.offset = match request {
            ScrollRequest::Delta(d) => self.offset.saturating_add_signed(d).min(max),
            ScrollRequest::ToOffset(o) => o.min(max),
            ScrollRequest::PageUp => self.offset.saturating_sub(self.viewport),
            ScrollRequest::PageDown => self.offset.saturating_add(self.viewport).min(max),
            ScrollRequest::Home => 0,
            ScrollRequest::End => max,
            ScrollRequest::IntoView(index) => {
                if index >= sizes.count() {
                    self.offset
                } else {
                    let top = sizes.offset_of(index);
                    let bottom = sizes.offset_of(index + 1);
                    if top < self.offset {
                        top
                    } else if bottom > self.offset + self.viewport {
                        bottom.saturating_sub(self.viewport).min(max)
                    } else {
                        self.offset
                    }
                }
            }
        };
    }

    /// Apply every queued request. Returns true if the offset changed.
    pub fn process_requests(&mut self, sizes: &impl ItemSizes) -> bool {
        if self.requests.is_empty() {
            return false;
        }
        let before = self.offset;
        for request in std::mem::take(&mut self.requests) {
            self.apply_request(request, sizes);
        }
        self.offset != before
    }
}
