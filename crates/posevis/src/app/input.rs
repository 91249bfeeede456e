use super::{
    ActiveEventLoop, App, ApplicationHandler, Arc, ElementState, FutureExt, KeyCode, LogicalSize,
    MouseButton, MouseScrollDelta, PhysicalKey, PosevisError, RenderEngine, Window, WindowEvent,
    WindowId,
};

/// Radians of orbit per pixel of drag.
const ORBIT_SPEED: f32 = 0.01;
/// Pan per pixel, as a fraction of the distance to the target.
const PAN_SPEED: f32 = 0.002;
/// Zoom per wheel line, as a fraction of the distance to the target.
const ZOOM_SPEED: f32 = 0.1;

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(PosevisError::Render(format!("failed to create window: {e}")));
                event_loop.exit();
                return;
            }
        };

        let mut engine = match RenderEngine::new_windowed(window.clone()).block_on() {
            Ok(engine) => engine,
            Err(e) => {
                self.fail(e.into());
                event_loop.exit();
                return;
            }
        };
        engine.upload_scene(&self.vertices);

        self.window = Some(window.clone());
        self.engine = Some(engine);
        self.apply_viewpoint();
        window.request_redraw();
    }

    #[allow(clippy::cast_possible_truncation)]
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_down = modifiers.state().shift_key();
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.left_mouse_down = pressed,
                    MouseButton::Right => self.right_mouse_down = pressed,
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let delta_x = (position.x - self.mouse_pos.0) as f32;
                let delta_y = (position.y - self.mouse_pos.1) as f32;
                self.mouse_pos = (position.x, position.y);

                // Left drag orbits; shift+left or right drag pans.
                if let Some(engine) = &mut self.engine {
                    let is_rotate = self.left_mouse_down && !self.shift_down;
                    let is_pan = self.right_mouse_down || (self.left_mouse_down && self.shift_down);
                    if is_rotate {
                        engine
                            .camera
                            .orbit(delta_x * ORBIT_SPEED, delta_y * ORBIT_SPEED);
                    } else if is_pan {
                        let scale = engine.camera.distance() * PAN_SPEED;
                        engine.camera.pan(-delta_x * scale, delta_y * scale);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(engine) = &mut self.engine {
                    let scroll = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                    };
                    let scale = engine.camera.distance() * ZOOM_SPEED;
                    engine.camera.zoom(scroll * scale);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    self.close_requested = true;
                }
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }
}
