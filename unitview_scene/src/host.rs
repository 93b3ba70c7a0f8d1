// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host collaborators: container surface, image loading and the ratio store.
//!
//! Each collaborator is a small trait so that hosts can wire in their own
//! windowing, decoding and storage, and tests can substitute in-memory
//! versions. The provided implementations are clonable handles whose clones
//! share state, so a host can keep one end while the viewport owns the other.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use kurbo::Size;

/// The container the viewport paints into.
pub trait Surface: fmt::Debug {
    /// Measures the current pixel size of the container.
    fn pixel_size(&self) -> Size;
}

/// A [`Surface`] whose size is set by the host.
///
/// Clones share the same size. A host updates the size and then signals
/// [`Viewport::on_container_resized`](crate::Viewport::on_container_resized).
#[derive(Clone, Debug, Default)]
pub struct SharedSurface {
    size: Rc<Cell<Size>>,
}

impl SharedSurface {
    /// Creates a surface with the given pixel size.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size: Rc::new(Cell::new(size)),
        }
    }

    /// Sets the pixel size seen by every clone.
    pub fn set_size(&self, size: Size) {
        self.size.set(size);
    }
}

impl Surface for SharedSurface {
    fn pixel_size(&self) -> Size {
        self.size.get()
    }
}

/// Identifies one background image request.
///
/// Completions carrying a ticket that is no longer current (the background
/// was replaced, or the viewport was torn down) are discarded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub(crate) u64);

/// A request to decode an image and report its pixel size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    /// Image URL.
    pub url: String,
    /// Ticket to echo back with the completion event.
    pub ticket: LoadTicket,
}

/// Asynchronous image loader.
///
/// `load` must not block. When decoding finishes the host delivers
/// [`ViewportEvent::BackgroundLoaded`](crate::ViewportEvent::BackgroundLoaded)
/// or [`ViewportEvent::BackgroundFailed`](crate::ViewportEvent::BackgroundFailed)
/// with the request's ticket.
pub trait ImageLoader: fmt::Debug {
    /// Starts loading the requested image.
    fn load(&mut self, request: ImageRequest);
}

/// An [`ImageLoader`] that only queues requests for the host to service.
///
/// Clones share the same queue.
#[derive(Clone, Debug, Default)]
pub struct QueuedLoader {
    queue: Rc<RefCell<VecDeque<ImageRequest>>>,
}

impl QueuedLoader {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the oldest pending request.
    pub fn pop(&self) -> Option<ImageRequest> {
        self.queue.borrow_mut().pop_front()
    }

    /// Returns the number of pending requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Returns `true` if no request is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl ImageLoader for QueuedLoader {
    fn load(&mut self, request: ImageRequest) {
        self.queue.borrow_mut().push_back(request);
    }
}

/// Key under which a background aspect ratio is remembered.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RatioKey(String);

impl RatioKey {
    /// Derives the key for a background image URL.
    #[must_use]
    pub fn for_image(url: &str) -> Self {
        Self(format!("unitview.aspect-ratio:{url}"))
    }

    /// Returns the key as a string, for stores that persist strings.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RatioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistent store of background aspect ratios.
///
/// It lets a viewport resolve its aspect ratio before the background image
/// has decoded, using the ratio observed in an earlier session.
pub trait RatioStore: fmt::Debug {
    /// Returns the remembered ratio for `key`, if any.
    fn get(&self, key: &RatioKey) -> Option<f64>;

    /// Remembers `ratio` under `key`.
    fn set(&mut self, key: RatioKey, ratio: f64);
}

/// In-memory [`RatioStore`].
///
/// Clones share the same map, which lets several viewports (or successive
/// "sessions" in a test) observe each other's ratios.
#[derive(Clone, Debug, Default)]
pub struct MemoryRatioStore {
    ratios: Rc<RefCell<HashMap<RatioKey, f64>>>,
}

impl MemoryRatioStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of remembered ratios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ratios.borrow().len()
    }

    /// Returns `true` if nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ratios.borrow().is_empty()
    }
}

impl RatioStore for MemoryRatioStore {
    fn get(&self, key: &RatioKey) -> Option<f64> {
        self.ratios.borrow().get(key).copied()
    }

    fn set(&mut self, key: RatioKey, ratio: f64) {
        self.ratios.borrow_mut().insert(key, ratio);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::{
        ImageLoader, ImageRequest, LoadTicket, MemoryRatioStore, QueuedLoader, RatioKey,
        RatioStore, SharedSurface, Surface,
    };

    #[test]
    fn shared_surface_clones_see_updates() {
        let surface = SharedSurface::new(Size::new(10.0, 20.0));
        let other = surface.clone();
        surface.set_size(Size::new(30.0, 40.0));
        assert_eq!(other.pixel_size(), Size::new(30.0, 40.0));
    }

    #[test]
    fn queued_loader_is_fifo() {
        let host = QueuedLoader::new();
        let mut loader = host.clone();
        loader.load(ImageRequest {
            url: "a.png".into(),
            ticket: LoadTicket(1),
        });
        loader.load(ImageRequest {
            url: "b.png".into(),
            ticket: LoadTicket(2),
        });
        assert_eq!(host.len(), 2);
        assert_eq!(host.pop().map(|r| r.url), Some("a.png".to_owned()));
        assert_eq!(host.pop().map(|r| r.ticket), Some(LoadTicket(2)));
        assert!(host.is_empty());
    }

    #[test]
    fn ratio_keys_are_per_image() {
        let mut store = MemoryRatioStore::new();
        let shared = store.clone();
        store.set(RatioKey::for_image("field.jpg"), 2.0);

        assert_eq!(shared.get(&RatioKey::for_image("field.jpg")), Some(2.0));
        assert_eq!(shared.get(&RatioKey::for_image("other.jpg")), None);
        assert_eq!(shared.len(), 1);
        assert!(RatioKey::for_image("field.jpg").as_str().ends_with("field.jpg"));
    }
}
