use super::{App, RenderError};

impl App {
    /// Draws one frame, reconfiguring the surface when it was lost.
    pub(super) fn render(&mut self) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        match engine.render(self.background_color) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => {
                log::debug!("surface lost, reconfiguring");
                let (width, height) = (engine.width, engine.height);
                engine.resize(width, height);
            }
            Err(err) => self.fail(err.into()),
        }
    }
}
