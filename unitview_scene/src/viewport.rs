// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::any::{Any, type_name};

use kurbo::{Point, Rect, Size, Vec2};
use tracing::{debug, trace, warn};
use unitview_space::CoordinateSpace;

use crate::axis::{AxisConfig, AxisLabel, AxisLabeler};
use crate::config::{Background, ViewportConfig};
use crate::drawable::{Drawable, DrawableId, Handle};
use crate::error::ViewportError;
use crate::host::{ImageLoader, ImageRequest, LoadTicket, RatioKey, RatioStore, Surface};
use crate::node::{DisplayNode, NodeContent, NodeId};
use crate::render::{Frame, Renderer};

/// Host collaborators a [`Viewport`] is wired to.
#[derive(Debug)]
pub struct Collaborators<R> {
    /// The container being painted into.
    pub surface: Box<dyn Surface>,
    /// Backend receiving display nodes.
    pub renderer: R,
    /// Asynchronous image decoder for the background.
    pub loader: Box<dyn ImageLoader>,
    /// Persistent store of background aspect ratios.
    pub ratio_store: Box<dyn RatioStore>,
}

/// Asynchronous notifications delivered to a [`Viewport`].
///
/// Each event runs to completion inside [`Viewport::handle`].
#[derive(Clone, Debug, PartialEq)]
pub enum ViewportEvent {
    /// The container (or window) was resized.
    ContainerResized,
    /// The background image decoded.
    BackgroundLoaded {
        /// Ticket of the originating request.
        ticket: LoadTicket,
        /// Natural width in pixels.
        width: f64,
        /// Natural height in pixels.
        height: f64,
    },
    /// The background image could not be loaded.
    BackgroundFailed {
        /// Ticket of the originating request.
        ticket: LoadTicket,
    },
    /// An animation frame is due.
    Frame,
}

#[derive(Debug)]
pub(crate) struct Layer {
    pub(crate) id: NodeId,
    pub(crate) node: DisplayNode,
}

#[derive(Debug)]
pub(crate) struct Entry {
    id: DrawableId,
    pub(crate) node_id: NodeId,
    pub(crate) node: DisplayNode,
    drawable: Box<dyn Drawable>,
}

#[derive(Debug)]
pub(crate) struct LabelNode {
    label: AxisLabel,
    pub(crate) id: NodeId,
    pub(crate) node: DisplayNode,
}

#[derive(Debug, Default)]
pub(crate) struct BackgroundState {
    config: Background,
    pending: Option<LoadTicket>,
    natural_size: Option<Size>,
    fill: Option<Layer>,
    sprite: Option<Layer>,
}

impl BackgroundState {
    pub(crate) fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.fill.iter().chain(self.sprite.iter())
    }
}

/// A responsive, unit-based 2D viewport with a scene of drawables.
///
/// The viewport owns a [`CoordinateSpace`], the background, the ordered
/// registry of [`Drawable`]s and the axis labels, and keeps all of their
/// display nodes consistent with the current container size:
/// - [`Viewport::update`] redraws every drawable and rasterizes once; a
///   clock calls it every animation frame.
/// - Container resizes, background loads and logical size changes all go
///   through one re-layout pass that recomputes the coordinate space and
///   then every node that depends on it.
///
/// Registration order is painter's order. Background nodes are painted
/// first and axis labels last.
#[derive(Debug)]
pub struct Viewport<R> {
    space: CoordinateSpace,
    pixel_box: Option<Size>,
    max_pixel_box: Option<Size>,
    surface: Box<dyn Surface>,
    renderer: R,
    loader: Box<dyn ImageLoader>,
    ratio_store: Box<dyn RatioStore>,
    background: BackgroundState,
    entries: Vec<Entry>,
    labeler: Option<AxisLabeler>,
    unit: Option<String>,
    labels: Vec<LabelNode>,
    next_node: u32,
    next_drawable: u64,
    next_ticket: u64,
    torn_down: bool,
}

impl<R: Renderer> Viewport<R> {
    /// Creates a viewport and performs the initial layout.
    ///
    /// - Measures the container unless `config.pixel_box` is set.
    /// - Seeds the aspect ratio with any ratio remembered for the
    ///   background image, so the layout is right before it decodes.
    /// - Attaches the background and requests the background image.
    #[must_use]
    pub fn new(config: ViewportConfig, collaborators: Collaborators<R>) -> Self {
        let Collaborators {
            surface,
            renderer,
            loader,
            ratio_store,
        } = collaborators;

        let container = measure(config.pixel_box, config.max_pixel_box, surface.as_ref());
        let mut space = CoordinateSpace::new(container);
        space.set_width_units(config.width_units);
        space.set_height_units(config.height_units);
        space.set_min_units(config.min_units);

        let mut viewport = Self {
            space,
            pixel_box: config.pixel_box,
            max_pixel_box: config.max_pixel_box,
            surface,
            renderer,
            loader,
            ratio_store,
            background: BackgroundState::default(),
            entries: Vec::new(),
            labeler: config
                .axes
                .map(|axes| AxisLabeler::new(axes).with_unit(config.unit.clone())),
            unit: config.unit,
            labels: Vec::new(),
            next_node: 0,
            next_drawable: 0,
            next_ticket: 0,
            torn_down: false,
        };
        debug!(
            width = container.width,
            height = container.height,
            "viewport created"
        );
        viewport.install_background(config.background);
        viewport.relayout();
        viewport
    }

    /// Returns the coordinate space.
    #[must_use]
    pub fn space(&self) -> &CoordinateSpace {
        &self.space
    }

    /// Returns the renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the renderer for mutation.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Returns the ratio store.
    #[must_use]
    pub fn ratio_store(&self) -> &dyn RatioStore {
        self.ratio_store.as_ref()
    }

    /// Returns the current background.
    #[must_use]
    pub fn background(&self) -> &Background {
        &self.background.config
    }

    /// Returns the unit name appended to axis labels, if any.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Returns the ticket of the background load in flight, if any.
    #[must_use]
    pub fn pending_background(&self) -> Option<LoadTicket> {
        self.background.pending
    }

    /// Returns the background image node, once the image has loaded.
    #[must_use]
    pub fn background_node(&self) -> Option<&DisplayNode> {
        self.background.sprite.as_ref().map(|layer| &layer.node)
    }

    /// Returns `true` once [`Viewport::teardown`] has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Returns the number of registered drawables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no drawable is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `id` names a registered drawable.
    #[must_use]
    pub fn contains(&self, id: impl Into<DrawableId>) -> bool {
        let id = id.into();
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Iterates over registered drawables in painter's order.
    pub fn drawable_ids(&self) -> impl Iterator<Item = DrawableId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    /// Returns the display node of a registered drawable.
    #[must_use]
    pub fn node(&self, id: impl Into<DrawableId>) -> Option<&DisplayNode> {
        let id = id.into();
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.node)
    }

    /// Iterates over the current axis labels.
    pub fn axis_labels(&self) -> impl Iterator<Item = &AxisLabel> + '_ {
        self.labels.iter().map(|label| &label.label)
    }

    /// Returns the resolved logical width in units.
    #[must_use]
    pub fn width_units(&self) -> f64 {
        self.space.width_units()
    }

    /// Returns the resolved logical height in units.
    #[must_use]
    pub fn height_units(&self) -> f64 {
        self.space.height_units()
    }

    /// Configures the logical width and re-lays out everything.
    ///
    /// `None` lets the width be derived again.
    pub fn set_width_units(&mut self, width: Option<f64>) {
        if self.ignore_after_teardown("set_width_units") {
            return;
        }
        self.space.set_width_units(width);
        self.relayout();
    }

    /// Configures the logical height and re-lays out everything.
    ///
    /// `None` lets the height be derived again.
    pub fn set_height_units(&mut self, height: Option<f64>) {
        if self.ignore_after_teardown("set_height_units") {
            return;
        }
        self.space.set_height_units(height);
        self.relayout();
    }

    /// Moves the unit-space origin and re-lays out everything.
    pub fn set_min_units(&mut self, min_units: Point) {
        if self.ignore_after_teardown("set_min_units") {
            return;
        }
        self.space.set_min_units(min_units);
        self.relayout();
    }

    /// Replaces the axis label configuration and regenerates the labels.
    pub fn set_axes(&mut self, axes: Option<AxisConfig>) {
        if self.ignore_after_teardown("set_axes") {
            return;
        }
        let unit = self.unit.clone();
        self.labeler = axes.map(|axes| AxisLabeler::new(axes).with_unit(unit));
        self.rebuild_labels();
        self.rasterize();
    }

    /// Replaces the background.
    ///
    /// Any load in flight for the previous image is abandoned; its
    /// completion will be ignored.
    pub fn set_background(&mut self, background: Background) {
        if self.ignore_after_teardown("set_background") {
            return;
        }
        if let Some(layer) = self.background.fill.take() {
            self.renderer.detach(layer.id);
        }
        if let Some(layer) = self.background.sprite.take() {
            self.renderer.detach(layer.id);
        }
        self.install_background(background);
        self.relayout();
    }

    /// Registers `drawable`, attaches its node and runs one redraw pass.
    ///
    /// The drawable moves into the viewport, so it can only ever be
    /// registered once.
    pub fn register<T: Drawable>(&mut self, drawable: T) -> Result<Handle<T>, ViewportError> {
        if self.torn_down {
            warn!(kind = type_name::<T>(), "register on a torn down viewport");
            return Err(ViewportError::TornDown);
        }
        let id = DrawableId(self.next_drawable);
        self.next_drawable += 1;
        let node_id = self.alloc_node();

        let mut node = drawable.create_node();
        drawable.on_resize(&self.space, &mut node);
        self.renderer.attach(node_id, &node);
        self.entries.push(Entry {
            id,
            node_id,
            node,
            drawable: Box::new(drawable),
        });
        debug!(?id, ?node_id, kind = type_name::<T>(), "drawable registered");

        self.update();
        Ok(Handle::new(id))
    }

    /// Removes a drawable of any type and detaches its node.
    pub fn unregister(&mut self, id: impl Into<DrawableId>) -> Result<Box<dyn Drawable>, ViewportError> {
        let id = id.into();
        let index = self.index_of(id)?;
        let entry = self.entries.remove(index);
        self.renderer.detach(entry.node_id);
        debug!(?id, node_id = ?entry.node_id, "drawable unregistered");
        Ok(entry.drawable)
    }

    /// Destroys a drawable: removes it, detaches its node and hands it back.
    ///
    /// The handle is stale afterwards; using it again is an error. The
    /// returned value is no longer part of the scene. Spawning it again
    /// registers a new entity under a fresh identifier and handle.
    pub fn destroy<T: Drawable>(&mut self, handle: Handle<T>) -> Result<T, ViewportError> {
        let id = handle.id();
        let index = self.index_of(id)?;
        {
            let drawable: &dyn Drawable = &*self.entries[index].drawable;
            let any: &dyn Any = drawable;
            if !any.is::<T>() {
                return Err(kind_mismatch::<T>(id));
            }
        }
        let entry = self.entries.remove(index);
        self.renderer.detach(entry.node_id);
        debug!(?id, node_id = ?entry.node_id, "drawable destroyed");
        let any: Box<dyn Any> = entry.drawable;
        any.downcast::<T>()
            .map(|drawable| *drawable)
            .map_err(|_| kind_mismatch::<T>(id))
    }

    /// Returns a registered drawable.
    pub fn get<T: Drawable>(&self, handle: Handle<T>) -> Result<&T, ViewportError> {
        let id = handle.id();
        let index = self.index_of(id)?;
        let drawable: &dyn Drawable = &*self.entries[index].drawable;
        let any: &dyn Any = drawable;
        any.downcast_ref::<T>().ok_or_else(|| kind_mismatch::<T>(id))
    }

    /// Returns a registered drawable for mutation.
    ///
    /// Changes are picked up by the next [`Viewport::update`]. Use
    /// [`Viewport::edit`] to apply them immediately.
    pub fn get_mut<T: Drawable>(&mut self, handle: Handle<T>) -> Result<&mut T, ViewportError> {
        let id = handle.id();
        let index = self.index_of(id)?;
        let drawable: &mut dyn Drawable = &mut *self.entries[index].drawable;
        let any: &mut dyn Any = drawable;
        any.downcast_mut::<T>().ok_or_else(|| kind_mismatch::<T>(id))
    }

    /// Mutates a drawable and repaints it out of band.
    ///
    /// After `f` runs, the drawable's [`Drawable::on_resize`] and
    /// [`Drawable::draw`] are invoked against the current coordinate space
    /// and one rasterization is requested.
    pub fn edit<T: Drawable, O>(
        &mut self,
        handle: Handle<T>,
        f: impl FnOnce(&mut T) -> O,
    ) -> Result<O, ViewportError> {
        let id = handle.id();
        let index = self.index_of(id)?;
        let entry = &mut self.entries[index];
        let out = {
            let drawable: &mut dyn Drawable = &mut *entry.drawable;
            let any: &mut dyn Any = drawable;
            let typed = any
                .downcast_mut::<T>()
                .ok_or_else(|| kind_mismatch::<T>(id))?;
            f(typed)
        };
        entry.drawable.on_resize(&self.space, &mut entry.node);
        entry.drawable.draw(&self.space, &mut entry.node);
        self.rasterize();
        Ok(out)
    }

    /// Per-frame entry point.
    ///
    /// Redraws every drawable in registration order from its current
    /// unit-space state, then requests one rasterization. Never blocks.
    pub fn update(&mut self) {
        if self.torn_down {
            trace!("frame after teardown ignored");
            return;
        }
        for entry in &mut self.entries {
            entry.drawable.draw(&self.space, &mut entry.node);
        }
        trace!(drawables = self.entries.len(), "frame");
        self.rasterize();
    }

    /// Reacts to a container resize.
    ///
    /// Re-measures the container (unless the pixel box is fixed) and
    /// re-lays out everything.
    pub fn on_container_resized(&mut self) {
        if self.torn_down {
            debug!("resize after teardown ignored");
            return;
        }
        self.relayout();
    }

    /// Reacts to the background image finishing decoding.
    ///
    /// Unless both logical dimensions are configured, the image ratio is
    /// remembered in the ratio store and adopted as the aspect ratio. The
    /// image is then scaled to cover the logical unit box and everything is
    /// re-laid out. Completions for abandoned requests are ignored.
    pub fn on_background_loaded(&mut self, ticket: LoadTicket, width: f64, height: f64) {
        if !self.accepts(ticket) {
            debug!(?ticket, "stale background load ignored");
            return;
        }
        self.background.pending = None;
        let Some(url) = self.background.config.image.clone() else {
            return;
        };
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            warn!(%url, width, height, "background image has no usable size");
            self.drop_background_image();
            self.relayout();
            return;
        }

        let natural = Size::new(width, height);
        let ratio = width / height;
        if !self.space.has_explicit_size() {
            self.ratio_store.set(RatioKey::for_image(&url), ratio);
            self.space.set_remembered_ratio(Some(ratio));
        }
        self.background.natural_size = Some(natural);

        let mut node = DisplayNode::new(NodeContent::Sprite {
            image: url.clone(),
            native_size: Some(natural),
        });
        node.anchor = Point::ZERO;
        let id = self.alloc_node();
        self.renderer.attach(id, &node);
        if let Some(old) = self.background.sprite.replace(Layer { id, node }) {
            self.renderer.detach(old.id);
        }
        debug!(%url, ratio, "background loaded");
        self.relayout();
    }

    /// Reacts to the background image failing to load.
    ///
    /// The background image is left out and the aspect ratio falls back to
    /// the container ratio. There is no retry.
    pub fn on_background_failed(&mut self, ticket: LoadTicket) {
        if !self.accepts(ticket) {
            debug!(?ticket, "stale background failure ignored");
            return;
        }
        self.background.pending = None;
        warn!(url = ?self.background.config.image, "background image failed to load");
        self.drop_background_image();
        self.relayout();
    }

    /// Dispatches an asynchronous event to its handler.
    pub fn handle(&mut self, event: ViewportEvent) {
        match event {
            ViewportEvent::ContainerResized => self.on_container_resized(),
            ViewportEvent::BackgroundLoaded {
                ticket,
                width,
                height,
            } => self.on_background_loaded(ticket, width, height),
            ViewportEvent::BackgroundFailed { ticket } => self.on_background_failed(ticket),
            ViewportEvent::Frame => self.update(),
        }
    }

    /// Detaches every node, clears the registry and stops reacting to events.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        for entry in self.entries.drain(..) {
            self.renderer.detach(entry.node_id);
        }
        for label in self.labels.drain(..) {
            self.renderer.detach(label.id);
        }
        for layer in [self.background.fill.take(), self.background.sprite.take()]
            .into_iter()
            .flatten()
        {
            self.renderer.detach(layer.id);
        }
        self.background.pending = None;
        self.torn_down = true;
        debug!("viewport torn down");
    }

    /// Recomputes the coordinate space and every node that depends on it.
    ///
    /// This is the one place resizes, background loads and logical size
    /// changes converge.
    fn relayout(&mut self) {
        let container = measure(self.pixel_box, self.max_pixel_box, self.surface.as_ref());
        self.space.set_container(container);
        debug!(
            width = container.width,
            height = container.height,
            ratio = self.space.aspect_ratio(),
            source = ?self.space.ratio_source(),
            pixels_per_unit = self.space.pixels_per_unit(),
            "relayout"
        );
        for entry in &mut self.entries {
            entry.drawable.on_resize(&self.space, &mut entry.node);
            entry.drawable.draw(&self.space, &mut entry.node);
        }
        self.rebuild_labels();
        self.fit_background();
        self.rasterize();
    }

    fn rebuild_labels(&mut self) {
        for label in self.labels.drain(..) {
            self.renderer.detach(label.id);
        }
        let Some(labeler) = &self.labeler else {
            return;
        };
        let labels = labeler.labels(&self.space);
        for label in labels {
            let node = label.to_node();
            let id = self.alloc_node();
            self.renderer.attach(id, &node);
            self.labels.push(LabelNode { label, id, node });
        }
    }

    fn fit_background(&mut self) {
        let container = self.space.container();
        if let Some(fill) = &mut self.background.fill {
            if let NodeContent::Fill { rect, .. } = &mut fill.node.content {
                *rect = Rect::from_origin_size(Point::ZERO, container);
            }
        }
        // Cover the logical unit box without distortion.
        let target = self.space.unit_box_pixel_rect();
        if let (Some(sprite), Some(natural)) =
            (&mut self.background.sprite, self.background.natural_size)
        {
            let scale = (target.width() / natural.width).max(target.height() / natural.height);
            sprite.node.position = target.origin();
            sprite.node.scale = Vec2::new(scale, scale);
        }
    }

    fn install_background(&mut self, background: Background) {
        self.background.pending = None;
        self.background.natural_size = None;
        if let Some(color) = background.color {
            let node = DisplayNode::new(NodeContent::Fill {
                rect: Rect::from_origin_size(Point::ZERO, self.space.container()),
                color,
            });
            let id = self.alloc_node();
            self.renderer.attach(id, &node);
            self.background.fill = Some(Layer { id, node });
        }
        let remembered = background
            .image
            .as_deref()
            .and_then(|url| self.ratio_store.get(&RatioKey::for_image(url)));
        self.space.set_remembered_ratio(remembered);
        if let Some(url) = background.image.clone() {
            let ticket = LoadTicket(self.next_ticket);
            self.next_ticket += 1;
            self.background.pending = Some(ticket);
            debug!(%url, ?ticket, ?remembered, "requesting background");
            self.loader.load(ImageRequest { url, ticket });
        }
        self.background.config = background;
    }

    fn drop_background_image(&mut self) {
        self.background.natural_size = None;
        if let Some(layer) = self.background.sprite.take() {
            self.renderer.detach(layer.id);
        }
        self.space.set_remembered_ratio(None);
    }

    fn rasterize(&mut self) {
        let frame = Frame {
            container: self.space.container(),
            background: &self.background,
            entries: &self.entries,
            labels: &self.labels,
        };
        self.renderer.rasterize(&frame);
    }

    fn accepts(&self, ticket: LoadTicket) -> bool {
        !self.torn_down && self.background.pending == Some(ticket)
    }

    fn ignore_after_teardown(&self, operation: &'static str) -> bool {
        if self.torn_down {
            warn!(operation, "call on a torn down viewport ignored");
        }
        self.torn_down
    }

    fn alloc_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    fn index_of(&self, id: DrawableId) -> Result<usize, ViewportError> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| {
                warn!(?id, "stale drawable handle");
                ViewportError::StaleHandle(id)
            })
    }
}

fn measure(pixel_box: Option<Size>, max_pixel_box: Option<Size>, surface: &dyn Surface) -> Size {
    if let Some(fixed) = pixel_box {
        return fixed;
    }
    let measured = surface.pixel_size();
    match max_pixel_box {
        Some(max) => Size::new(measured.width.min(max.width), measured.height.min(max.height)),
        None => measured,
    }
}

fn kind_mismatch<T>(id: DrawableId) -> ViewportError {
    warn!(?id, expected = type_name::<T>(), "drawable handle of the wrong type");
    ViewportError::KindMismatch {
        id,
        expected: type_name::<T>(),
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};
    use peniko::Color;

    use super::{Collaborators, Viewport};
    use crate::config::ViewportConfig;
    use crate::drawable::Handle;
    use crate::error::ViewportError;
    use crate::host::{MemoryRatioStore, QueuedLoader, SharedSurface};
    use crate::render::RecordingRenderer;
    use crate::shapes::{Circle, LineSegment};

    fn viewport() -> Viewport<RecordingRenderer> {
        Viewport::new(
            ViewportConfig::new().with_width_units(10.0),
            Collaborators {
                surface: Box::new(SharedSurface::new(Size::new(100.0, 100.0))),
                renderer: RecordingRenderer::new(),
                loader: Box::new(QueuedLoader::new()),
                ratio_store: Box::new(MemoryRatioStore::new()),
            },
        )
    }

    #[test]
    fn wrong_handle_type_is_rejected() {
        let mut viewport = viewport();
        let circle = Circle::new(Point::ZERO, 1.0, Color::WHITE)
            .spawn(&mut viewport)
            .unwrap();
        let as_line: Handle<LineSegment> = Handle::new(circle.id());

        let err = viewport.get(as_line).unwrap_err();
        assert!(matches!(err, ViewportError::KindMismatch { id, .. } if id == circle.id()));
        assert!(viewport.destroy(as_line).is_err());
        assert!(viewport.contains(circle));
    }

    #[test]
    fn unregister_returns_the_boxed_drawable() {
        let mut viewport = viewport();
        let circle = Circle::new(Point::ZERO, 1.0, Color::WHITE)
            .spawn(&mut viewport)
            .unwrap();
        let boxed = viewport.unregister(circle).unwrap();
        assert_eq!(boxed.placement().width_units, Some(2.0));
        assert!(viewport.is_empty());
        assert_eq!(
            viewport.unregister(circle).unwrap_err(),
            ViewportError::StaleHandle(circle.id())
        );
    }

    #[test]
    fn register_attaches_and_rasterizes_once() {
        let mut viewport = viewport();
        viewport.renderer_mut().clear_calls();
        Circle::new(Point::ZERO, 1.0, Color::WHITE)
            .spawn(&mut viewport)
            .unwrap();
        assert_eq!(viewport.renderer().attached().len(), 1);
        assert_eq!(viewport.renderer().rasterize_count(), 1);
    }
}
