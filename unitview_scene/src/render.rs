// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer seam and a recording implementation.

use kurbo::Size;

use crate::node::{DisplayNode, NodeId};
use crate::viewport::{BackgroundState, Entry, LabelNode};

/// Backend that paints display nodes to a surface.
///
/// A [`Viewport`](crate::Viewport) attaches a node when a visual comes into
/// existence, detaches it when the visual is removed, and asks for one
/// rasterization per frame with the complete, ordered [`Frame`].
pub trait Renderer {
    /// A node joined the display tree.
    fn attach(&mut self, id: NodeId, node: &DisplayNode);

    /// A node left the display tree.
    fn detach(&mut self, id: NodeId);

    /// Paint all nodes of `frame` in painter's order.
    fn rasterize(&mut self, frame: &Frame<'_>);
}

/// Borrowed view of the display tree of a viewport, in painter's order.
///
/// Background nodes come first, then drawables in registration order, then
/// axis labels.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub(crate) container: Size,
    pub(crate) background: &'a BackgroundState,
    pub(crate) entries: &'a [Entry],
    pub(crate) labels: &'a [LabelNode],
}

impl<'a> Frame<'a> {
    /// Returns the container pixel box the frame is painted into.
    #[must_use]
    pub fn container(&self) -> Size {
        self.container
    }

    /// Returns the number of nodes in the frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.background.layers().count() + self.entries.len() + self.labels.len()
    }

    /// Returns `true` if the frame has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all nodes in painter's order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &'a DisplayNode)> + use<'a> {
        let background: &'a BackgroundState = self.background;
        let entries: &'a [Entry] = self.entries;
        let labels: &'a [LabelNode] = self.labels;
        background
            .layers()
            .map(|layer| (layer.id, &layer.node))
            .chain(entries.iter().map(|entry| (entry.node_id, &entry.node)))
            .chain(labels.iter().map(|label| (label.id, &label.node)))
    }
}

/// Call recorded by [`RecordingRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderCall {
    /// [`Renderer::attach`] was called for the node.
    Attach(NodeId),
    /// [`Renderer::detach`] was called for the node.
    Detach(NodeId),
    /// [`Renderer::rasterize`] was called with a frame of this many nodes.
    Rasterize {
        /// Number of nodes in the frame.
        nodes: usize,
    },
}

/// Headless renderer that records calls and the last rasterized frame.
///
/// It does not produce pixels. It is intended for tests and for hosts that
/// want to inspect what would be painted.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Vec<RenderCall>,
    attached: Vec<NodeId>,
    last_frame: Vec<(NodeId, DisplayNode)>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Forgets the recorded calls but keeps the attached set and last frame.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Returns the currently attached nodes in attach order.
    #[must_use]
    pub fn attached(&self) -> &[NodeId] {
        &self.attached
    }

    /// Returns a copy of the nodes of the most recent frame, in painter's order.
    #[must_use]
    pub fn last_frame(&self) -> &[(NodeId, DisplayNode)] {
        &self.last_frame
    }

    /// Returns how many rasterizations were recorded since the last clear.
    #[must_use]
    pub fn rasterize_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, RenderCall::Rasterize { .. }))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn attach(&mut self, id: NodeId, _node: &DisplayNode) {
        self.calls.push(RenderCall::Attach(id));
        if !self.attached.contains(&id) {
            self.attached.push(id);
        }
    }

    fn detach(&mut self, id: NodeId) {
        self.calls.push(RenderCall::Detach(id));
        self.attached.retain(|attached| *attached != id);
    }

    fn rasterize(&mut self, frame: &Frame<'_>) {
        self.last_frame.clear();
        self.last_frame
            .extend(frame.nodes().map(|(id, node)| (id, node.clone())));
        self.calls.push(RenderCall::Rasterize {
            nodes: self.last_frame.len(),
        });
    }
}
