mod app;
mod fetch;
mod layout;
mod render;
mod tree;
mod viewport;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use app::{App, AppPhase};
use render::RenderState;
use viewport::ViewportSize;

/// Main application handler for winit's event loop.
struct MfsViewApp {
    app: App,
    render_state: Option<RenderState>,
    window: Option<Arc<Window>>,
}

impl MfsViewApp {
    fn new(endpoint: String) -> Self {
        Self {
            app: App::new(endpoint),
            render_state: None,
            window: None,
        }
    }

    fn measure(window: &Option<Arc<Window>>) -> Option<ViewportSize> {
        window.as_ref().map(|w| {
            let size = w.inner_size();
            ViewportSize {
                width: size.width as f32,
                height: size.height as f32,
            }
        })
    }
}

impl ApplicationHandler for MfsViewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("MFSView-rs — IPFS File Store Visualizer")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match pollster::block_on(RenderState::new(window.clone())) {
            Ok(state) => {
                self.render_state = Some(state);
            }
            Err(e) => {
                tracing::error!("Failed to initialize GPU: {e}");
                event_loop.exit();
                return;
            }
        }

        // Initial mount: publish the rendered size once, undebounced.
        let win = self.window.clone();
        self.app.mount_viewport(|| Self::measure(&win));

        self.app.start_fetch();
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.app.teardown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                // The GPU surface must track the window immediately; the
                // layout waits for the debounced measurement.
                if let Some(render) = &mut self.render_state {
                    render.resize(size.width, size.height);
                }
                self.app.notify_resize(Instant::now());
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                if self.app.phase == AppPhase::Fetching {
                    self.app.poll_fetch();
                }

                if self.app.needs_relayout {
                    self.app.relayout();
                }

                self.app.rebuild_scene();
                if let Some(render) = &mut self.render_state {
                    if let Err(e) = render.render(&self.app.scene) {
                        tracing::error!("Render error: {e}");
                    }
                }

                // Keep polling while the fetch is in flight.
                if self.app.phase == AppPhase::Fetching {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let win = self.window.clone();
        if self.app.poll_viewport(now, || Self::measure(&win)) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        // Sleep exactly until the debounce deadline, if one is pending.
        match self.app.tracker.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mfsview_rs=info".parse()?),
        )
        .init();

    // Optional endpoint argument, defaults to a local node's MFS listing.
    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| fetch::DEFAULT_ENDPOINT.to_string());

    tracing::info!("MFSView-rs starting, listing endpoint: {endpoint}");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = MfsViewApp::new(endpoint);
    event_loop.run_app(&mut app)?;

    Ok(())
}
