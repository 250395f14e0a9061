use std::sync::mpsc;
use std::time::Instant;

use vello::Scene;

use crate::fetch::{self, types::FetchOutcome};
use crate::layout::{self, Layout, LayoutConfig};
use crate::render::scene::{build_scene, LabelStyle};
use crate::render::text::TextRenderer;
use crate::tree::{self, arena::FileTree};
use crate::viewport::{ViewportSize, ViewportTracker};

/// Application state machine phases.
#[derive(Debug, PartialEq, Eq)]
pub enum AppPhase {
    /// Listing request in flight
    Fetching,
    /// Tree available (possibly empty), ready to render
    Ready,
}

/// Top-level application state.
///
/// Tree, viewport size, and layout are each replaced wholesale by a pure
/// recompute whenever an upstream input changes; nothing is patched in
/// place.
pub struct App {
    pub phase: AppPhase,
    pub endpoint: String,

    // Fetch state
    fetch_rx: Option<mpsc::Receiver<FetchOutcome>>,

    // Data
    pub tree: Option<FileTree>,
    pub layout: Option<Layout>,
    pub layout_config: LayoutConfig,
    pub label_style: LabelStyle,
    pub text_renderer: TextRenderer,

    // Viewport
    pub tracker: ViewportTracker,

    // Rendering
    pub scene: Scene,
    pub needs_relayout: bool,
}

impl App {
    pub fn new(endpoint: String) -> Self {
        let mut text_renderer = TextRenderer::new();
        if text_renderer.load_system_font().is_err() {
            tracing::warn!("Failed to load a system font, tile labels will not be drawn");
        }

        Self {
            phase: AppPhase::Fetching,
            endpoint,
            fetch_rx: None,
            tree: None,
            layout: None,
            layout_config: LayoutConfig::default(),
            label_style: LabelStyle::default(),
            text_renderer,
            tracker: ViewportTracker::new(),
            scene: Scene::new(),
            needs_relayout: false,
        }
    }

    /// Start fetching the listing on a background thread.
    pub fn start_fetch(&mut self) {
        self.phase = AppPhase::Fetching;
        self.fetch_rx = Some(fetch::spawn_fetch(self.endpoint.clone()));
    }

    /// Poll for fetch completion. Call this from the event loop.
    /// Returns true when the outcome arrived this call.
    pub fn poll_fetch(&mut self) -> bool {
        let Some(rx) = &self.fetch_rx else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(mpsc::TryRecvError::Empty) => return false,
            Err(mpsc::TryRecvError::Disconnected) => FetchOutcome::Failed {
                message: "fetch worker exited without a response".to_string(),
            },
        };

        let entries = match outcome {
            FetchOutcome::Completed { entries } => entries,
            FetchOutcome::Failed { message } => {
                // Fetch failure is "no data", not a fault: an empty tree
                // renders nothing.
                tracing::warn!("Rendering empty view after fetch failure: {message}");
                Vec::new()
            }
        };

        self.tree = Some(tree::build_tree(&entries));
        self.phase = AppPhase::Ready;
        self.needs_relayout = true;
        self.fetch_rx = None;
        true
    }

    /// A host resize notification; reschedules the debounced measurement.
    pub fn notify_resize(&mut self, now: Instant) {
        self.tracker.notify_resize(now);
    }

    /// Fire the debounced viewport measurement if due. Returns true when a
    /// new size was published (and a relayout is now pending).
    pub fn poll_viewport<F>(&mut self, now: Instant, measure: F) -> bool
    where
        F: FnOnce() -> Option<ViewportSize>,
    {
        if let Some(size) = self.tracker.poll(now, measure) {
            tracing::info!("Viewport settled at {:.0}x{:.0}", size.width, size.height);
            self.needs_relayout = true;
            true
        } else {
            false
        }
    }

    /// Publish the initial viewport size without debouncing.
    pub fn mount_viewport<F>(&mut self, measure: F)
    where
        F: FnOnce() -> Option<ViewportSize>,
    {
        if self.tracker.mount(measure).is_some() {
            self.needs_relayout = true;
        }
    }

    /// Recompute the layout for the current tree and viewport. Withheld
    /// until both a tree and a real (nonzero) viewport size exist.
    pub fn relayout(&mut self) {
        let Some(tree) = &self.tree else {
            return;
        };
        let Some(size) = self.tracker.current() else {
            return;
        };
        if !size.is_renderable() {
            tracing::debug!("Withholding layout: viewport size not yet known");
            return;
        }

        let computed = layout::compute_layout(
            tree,
            tree.root,
            size.width,
            size.height,
            &self.layout_config,
        );
        tracing::info!(
            "Layout computed: {} tiles in {:.0}x{:.0}",
            computed.rects.len().saturating_sub(1),
            size.width,
            size.height
        );

        self.layout = Some(computed);
        self.needs_relayout = false;
    }

    /// Rebuild the vello scene from the current layout.
    pub fn rebuild_scene(&mut self) {
        if let (Some(tree), Some(layout)) = (&self.tree, &self.layout) {
            build_scene(
                &mut self.scene,
                tree,
                layout,
                self.layout_config.gap,
                &self.label_style,
                &mut self.text_renderer,
            );
        } else {
            self.scene.reset();
        }
    }

    /// Teardown: cancel the pending measurement and drop the fetch
    /// receiver so a late response is discarded instead of acted on.
    pub fn teardown(&mut self) {
        self.tracker.shutdown();
        self.fetch_rx = None;
    }
}
