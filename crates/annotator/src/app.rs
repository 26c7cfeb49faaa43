use std::sync::Arc;

use document::PngFileIo;
use driver::{InputCommand, PointerInput};
use renderer::{CursorOverlay, FrameStyle, Presenter, ViewportFrame, compose_viewport_frame};
use session::{AnnotatorController, CommandOutcome};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorIcon, Window, WindowAttributes, WindowId};

use crate::keymap;

const WINDOW_TITLE: &str = "annotator";

pub struct App {
    controller: AnnotatorController<PngFileIo>,
    style: FrameStyle,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    frame: ViewportFrame,
    title: String,
    control_held: bool,
    grab_cursor_shown: bool,
    last_cursor_position: Option<(f32, f32)>,
    fatal_error: Option<anyhow::Error>,
}

impl App {
    pub fn new(controller: AnnotatorController<PngFileIo>) -> Self {
        let config = controller.config();
        let style = FrameStyle {
            mask_opacity: config.mask_opacity,
            background: config.background_color(),
        };
        let (width, height) = controller.workbench().viewport_size();
        Self {
            controller,
            style,
            window: None,
            presenter: None,
            frame: ViewportFrame::new(width, height),
            title: String::new(),
            control_held: false,
            grab_cursor_shown: false,
            last_cursor_position: None,
            fatal_error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn into_result(self) -> anyhow::Result<()> {
        match self.fatal_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn window_id(&self) -> Option<WindowId> {
        self.window.as_ref().map(|window| window.id())
    }

    fn request_redraw(&self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn apply_command(&mut self, command: InputCommand) {
        match self.controller.handle_command(command) {
            Ok(CommandOutcome::Unchanged) => {}
            Ok(CommandOutcome::Saved | CommandOutcome::Redraw) => self.request_redraw(),
            Ok(CommandOutcome::SampleChanged { index }) => {
                log::debug!("switched to sample index {index}");
                self.request_redraw();
            }
            Err(error) => log::error!("{command:?} failed: {error}"),
        }
    }

    fn apply_pointer(&mut self, input: PointerInput) {
        self.controller.handle_pointer(input);
        self.sync_cursor_icon();
        self.request_redraw();
    }

    // The brush ring replaces the system cursor except while panning.
    fn sync_cursor_icon(&mut self) {
        let panning = self.controller.workbench().is_panning();
        if panning == self.grab_cursor_shown {
            return;
        }
        if let Some(window) = self.window.as_ref() {
            window.set_cursor(CursorIcon::Grabbing);
            window.set_cursor_visible(panning);
        }
        self.grab_cursor_shown = panning;
    }

    fn sync_title(&mut self) {
        let session = self.controller.session();
        let title = match (session.current_sample(), session.current_index()) {
            (Some(sample), Some(index)) => {
                let modified = self.controller.workbench().label_layer().is_modified();
                format!(
                    "{WINDOW_TITLE} - {} ({}/{}){}",
                    sample.stem(),
                    index + 1,
                    session.catalog().len(),
                    if modified { " *" } else { "" }
                )
            }
            _ => WINDOW_TITLE.to_owned(),
        };
        if title == self.title {
            return;
        }
        if let Some(window) = self.window.as_ref() {
            window.set_title(&title);
        }
        self.title = title;
    }

    fn anchor_point(&self) -> (f32, f32) {
        self.last_cursor_position.unwrap_or_else(|| {
            let (width, height) = self.controller.workbench().viewport_size();
            (width as f32 * 0.5, height as f32 * 0.5)
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.controller.resize(size.width, size.height);
        let (width, height) = self.controller.workbench().viewport_size();
        self.frame.resize(width, height);
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.resize(width, height);
        }
        self.request_redraw();
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        self.sync_title();
        let bench = self.controller.workbench();
        let cursor = bench
            .cursor()
            .filter(|_| !bench.is_panning())
            .map(|(x, y)| CursorOverlay::from_brush(self.controller.brush(), bench.view(), x, y));
        compose_viewport_frame(
            &mut self.frame,
            bench.image(),
            bench.label_layer().mask(),
            bench.view(),
            self.style,
            cursor,
        );

        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        match presenter.present(&self.frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                presenter.reconfigure();
                self.request_redraw();
            }
            Err(wgpu::SurfaceError::Timeout) => self.request_redraw(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fatal_error = Some(anyhow::anyhow!("surface out of memory"));
                event_loop.exit();
            }
            Err(error) => {
                log::warn!("present failed: {error}");
                self.request_redraw();
            }
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(error) = self.controller.shutdown() {
            log::error!("saving mask on exit failed: {error}");
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        if self.window.is_some() {
            return;
        }

        let (width, height) = self.controller.workbench().viewport_size();
        let window = match event_loop.create_window(
            WindowAttributes::default()
                .with_title(WINDOW_TITLE)
                .with_inner_size(PhysicalSize::new(width, height)),
        ) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                self.fatal_error = Some(anyhow::anyhow!("create window: {error}"));
                event_loop.exit();
                return;
            }
        };
        window.set_cursor_visible(false);

        let size = window.inner_size();
        let presenter = match pollster::block_on(Presenter::new(
            window.clone(),
            size.width,
            size.height,
        )) {
            Ok(presenter) => presenter,
            Err(error) => {
                self.fatal_error = Some(anyhow::anyhow!("{error}"));
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self.presenter = Some(presenter);
        self.resize(size);
        self.apply_command(InputCommand::ResetView);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window_id() != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.control_held = modifiers.state().control_key();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    for command in keymap::commands_for_key(code) {
                        self.apply_command(command);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = keymap::pointer_button(button) else {
                    return;
                };
                let (x, y) = self.anchor_point();
                let input = match state {
                    ElementState::Pressed => PointerInput::down(button, x, y),
                    ElementState::Released => PointerInput::up(button, x, y),
                };
                self.apply_pointer(input);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.last_cursor_position = Some((x, y));
                self.apply_pointer(PointerInput::moved(x, y));
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_cursor_position = None;
                self.controller.pointer_left();
                self.request_redraw();
            }
            WindowEvent::Focused(false) => {
                let (x, y) = self.anchor_point();
                self.apply_pointer(PointerInput::cancel(x, y));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = keymap::scroll_lines(delta);
                let anchor = self.anchor_point();
                for command in keymap::commands_for_wheel(lines, self.control_held, anchor) {
                    self.apply_command(command);
                }
            }
            WindowEvent::Resized(new_size) => self.resize(new_size),
            WindowEvent::RedrawRequested => self.render(event_loop),
            _ => {}
        }
    }
}
