//! Core application state and lifecycle.

use kurbo::Point;
use shapepad_core::storage::LAST_SESSION_KEY;
use shapepad_core::{
    Editor, FileStorage, InputState, MouseButton, PointerEvent, Storage, StorageError,
};
use shapepad_render::{DrawingSurface, RenderContext, VelloSurface, render};
use std::sync::Arc;
use thiserror::Error;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::AppConfig;
use crate::shortcuts::ShortcutRegistry;
use crate::ui::{UiAction, UiState, render_ui};

#[cfg(feature = "native")]
mod file_ops {
    use crate::ui::DEFAULT_FILE_NAME;

    /// Write a document through a native save dialog.
    pub fn save_document(bytes: &[u8]) {
        let dialog = rfd::FileDialog::new()
            .set_title("Save Shapes")
            .set_file_name(DEFAULT_FILE_NAME)
            .add_filter("Shapes", &["json"]);

        if let Some(path) = dialog.save_file() {
            if let Err(e) = std::fs::write(&path, bytes) {
                log::error!("Failed to write file: {}", e);
            } else {
                log::info!("Saved document to: {:?}", path);
            }
        }
    }

    /// Read a document picked in a native open dialog.
    pub fn load_document() -> Option<Vec<u8>> {
        let dialog = rfd::FileDialog::new()
            .set_title("Open Shapes")
            .add_filter("Shapes", &["json"]);

        let path = dialog.pick_file()?;
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::info!("Read document from: {:?}", path);
                Some(bytes)
            }
            Err(e) => {
                log::error!("Failed to read file: {}", e);
                None
            }
        }
    }
}

#[cfg(not(feature = "native"))]
mod file_ops {
    pub fn save_document(_bytes: &[u8]) {
        log::warn!("File dialogs need the `native` feature");
    }

    pub fn load_document() -> Option<Vec<u8>> {
        log::warn!("File dialogs need the `native` feature");
        None
    }
}

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Failed to create surface: {0}")]
    Surface(String),
    #[error("Failed to create renderer: {0}")]
    Renderer(String),
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_surface: VelloSurface,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    editor: Editor,
    input: InputState,
    /// Where the session is restored from and saved to, if enabled.
    session_storage: Option<FileStorage>,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Initialization failure to report once the event loop returns.
    error: Option<AppError>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            error: None,
        }
    }

    /// Run the application until the window closes.
    pub fn run(mut self) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut self)?;
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn create_state(&mut self, event_loop: &ActiveEventLoop) -> Result<AppState, AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        log::info!("Window created, initializing renderer...");

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        let render_cx = self.render_cx.get_or_insert_with(vello::util::RenderContext::new);
        let surface: RenderSurface<'static> = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .map_err(|e| AppError::Surface(e.to_string()))?;

        let device = &render_cx.devices[surface.dev_id].device;
        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| AppError::Renderer(e.to_string()))?;

        // Vello renders to Rgba8Unorm; the surface format may differ.
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let mut shape_surface = VelloSurface::new();
        shape_surface.set_scale(window.scale_factor());
        shape_surface.set_font_size(self.config.font_size);

        let mut editor = Editor::new();
        let session_storage = if self.config.restore_last_session {
            open_session(&mut editor)
        } else {
            None
        };

        log::info!("Shapepad initialized - {}x{}", surface.config.width, surface.config.height);
        log::info!("Keyboard shortcuts: {}", ShortcutRegistry::summary());

        Ok(AppState {
            window,
            surface,
            vello_renderer,
            shape_surface,
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            editor,
            input: InputState::new(),
            session_storage,
        })
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Open the session store and load the last session into `editor`.
fn open_session(editor: &mut Editor) -> Option<FileStorage> {
    let storage = match FileStorage::default_location() {
        Ok(storage) => storage,
        Err(e) => {
            log::warn!("Session restore disabled: {}", e);
            return None;
        }
    };
    match pollster::block_on(storage.load(LAST_SESSION_KEY)) {
        Ok(shapes) => {
            let count = editor.replace_shapes(shapes);
            log::info!("Restored {} shapes from the last session", count);
        }
        Err(StorageError::NotFound(_)) => log::debug!("No previous session"),
        Err(e) => log::warn!("Could not restore last session: {}", e),
    }
    Some(storage)
}

impl AppState {
    fn apply_ui_action(&mut self, action: UiAction) {
        match action {
            UiAction::AddText(text) => {
                if let Err(e) = self.editor.add_text(text) {
                    log::warn!("Could not add text: {}", e);
                }
            }
            UiAction::AddPolyline => {
                if let Err(e) = self.editor.add_example_polyline() {
                    log::warn!("Could not add polyline: {}", e);
                }
            }
            UiAction::AddCircle => {
                if let Err(e) = self.editor.add_example_circle() {
                    log::warn!("Could not add circle: {}", e);
                }
            }
            UiAction::SaveDocument => match self.editor.save() {
                Ok(bytes) => file_ops::save_document(&bytes),
                Err(e) => log::error!("Failed to serialize document: {}", e),
            },
            UiAction::LoadDocument => {
                if let Some(bytes) = file_ops::load_document() {
                    if let Err(e) = self.editor.load(&bytes) {
                        log::error!("Failed to load document: {}", e);
                    }
                }
            }
        }
    }

    fn save_session(&self) {
        let Some(storage) = &self.session_storage else {
            return;
        };
        match pollster::block_on(storage.save(LAST_SESSION_KEY, self.editor.scene())) {
            Ok(()) => log::info!("Saved session to {}", storage.base_path().display()),
            Err(e) => log::error!("Failed to save session: {}", e),
        }
    }

    /// Surface-local position of the pointer, in logical units.
    fn logical_point(&self, position: winit::dpi::PhysicalPosition<f64>) -> Point {
        let logical = position.to_logical::<f64>(self.window.scale_factor());
        Point::new(logical.x, logical.y)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");
        match self.create_state(event_loop) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }

        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input()
            || state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                state.save_session();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                state.shape_surface.set_scale(scale_factor);
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let egui_input = state.egui_state.take_egui_input(&state.window);
                let mut ui_action = None;
                let egui_output = state.egui_ctx.run(egui_input, |ctx| {
                    ui_action = render_ui(ctx, &mut state.ui_state);
                });
                if let Some(action) = ui_action {
                    state.apply_ui_action(action);
                }
                state
                    .egui_state
                    .handle_platform_output(&state.window, egui_output.platform_output);
                let egui_primitives = state
                    .egui_ctx
                    .tessellate(egui_output.shapes, egui_output.pixels_per_point);

                // Build the shape scene
                let ctx = RenderContext::new(state.editor.scene())
                    .with_stroke_width(self.config.stroke_width)
                    .with_font_size(self.config.font_size);
                render(&ctx, &mut state.shape_surface);
                state.editor.take_redraw();

                state.ui_state.shape_count = state.editor.scene().len();
                state.ui_state.selected = state
                    .editor
                    .selection()
                    .map(|selection| selection.id.to_string());

                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };

                let device_handle = &render_cx.devices[state.surface.dev_id];
                let device = &device_handle.device;
                let queue = &device_handle.queue;

                let surface_texture = match state.surface.surface.get_current_texture() {
                    Ok(t) => t,
                    Err(e) => {
                        log::warn!("Failed to get surface texture: {:?}", e);
                        return;
                    }
                };

                let width = state.surface.config.width;
                let height = state.surface.config.height;

                let params = RenderParams {
                    base_color: self.config.background(),
                    width,
                    height,
                    antialiasing_method: AaConfig::Area,
                };

                // Vello's compute shaders need a StorageBinding target, which
                // only Rgba8Unorm offers everywhere.
                let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
                    label: Some("vello render texture"),
                    size: vello::wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: vello::wgpu::TextureDimension::D2,
                    format: vello::wgpu::TextureFormat::Rgba8Unorm,
                    usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                        | vello::wgpu::TextureUsages::COPY_SRC
                        | vello::wgpu::TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                });
                let render_texture_view = render_texture
                    .create_view(&vello::wgpu::TextureViewDescriptor::default());

                if let Err(e) = state.vello_renderer.render_to_texture(
                    device,
                    queue,
                    state.shape_surface.scene(),
                    &render_texture_view,
                    &params,
                ) {
                    log::error!("Failed to render: {:?}", e);
                    return;
                }

                let surface_view = surface_texture
                    .texture
                    .create_view(&vello::wgpu::TextureViewDescriptor::default());

                {
                    let mut blit_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("blit encoder"),
                        });
                    state.texture_blitter.copy(
                        device,
                        &mut blit_encoder,
                        &render_texture_view,
                        &surface_view,
                    );
                    queue.submit(std::iter::once(blit_encoder.finish()));
                }

                for (id, image_delta) in &egui_output.textures_delta.set {
                    state.egui_renderer.update_texture(device, queue, *id, image_delta);
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [width, height],
                    pixels_per_point: egui_output.pixels_per_point,
                };

                {
                    let mut egui_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("egui encoder"),
                        });
                    state.egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut egui_encoder,
                        &egui_primitives,
                        &screen_descriptor,
                    );

                    let render_pass =
                        egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                            label: Some("egui render pass"),
                            color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                                view: &surface_view,
                                resolve_target: None,
                                ops: vello::wgpu::Operations {
                                    load: vello::wgpu::LoadOp::Load,
                                    store: vello::wgpu::StoreOp::Store,
                                },
                                depth_slice: None,
                            })],
                            depth_stencil_attachment: None,
                            timestamp_writes: None,
                            occlusion_query_set: None,
                        });

                    // egui-wgpu wants a 'static render pass
                    let mut render_pass = render_pass.forget_lifetime();
                    state
                        .egui_renderer
                        .render(&mut render_pass, &egui_primitives, &screen_descriptor);
                    drop(render_pass);

                    queue.submit(std::iter::once(egui_encoder.finish()));
                }

                for id in &egui_output.textures_delta.free {
                    state.egui_renderer.free_texture(id);
                }
                surface_texture.present();

                let repaint_now = egui_output
                    .viewport_output
                    .get(&egui::ViewportId::ROOT)
                    .is_some_and(|viewport| viewport.repaint_delay.is_zero());
                if repaint_now {
                    state.window.request_redraw();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = PointerEvent::Move {
                    position: state.logical_point(position),
                };
                state.input.handle_pointer_event(&event);

                if egui_wants_input {
                    return;
                }
                state
                    .editor
                    .handle_pointer_event(&event, &mut state.shape_surface);
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                if egui_wants_input {
                    return;
                }

                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    _ => return,
                };
                let position = state.input.pointer_position;
                let event = match btn_state {
                    ElementState::Pressed => PointerEvent::Down { position, button },
                    ElementState::Released => PointerEvent::Up { position, button },
                };
                state.input.handle_pointer_event(&event);
                state
                    .editor
                    .handle_pointer_event(&event, &mut state.shape_surface);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_input {
                    return;
                }
                if let Some(key_event) =
                    ShortcutRegistry::key_event(&event.logical_key, event.state, event.repeat)
                {
                    state.editor.handle_key_event(&key_event);
                }
            }

            _ => {}
        }

        if let Some(state) = &mut self.state {
            if state.editor.take_redraw() {
                state.window.request_redraw();
            }
        }
    }
}
