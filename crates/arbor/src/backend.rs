//! Window/graphics collaborator.
//!
//! Settings application pushes the `window` and `graphics` sections through
//! [`WindowBackend`]. A real host wraps its window (a winit window plus a
//! renderer); [`HeadlessWindow`] records the calls and logs them, which is
//! what tests and tools use.

use crate::ecs::AsAny;
use crate::settings::WindowSettings;

pub trait WindowBackend: AsAny {
    fn set_window_mode(&mut self, width: u32, height: u32, options: &WindowSettings);
    fn set_window_title(&mut self, title: &str);
    /// RGBA in `[0, 1]`.
    fn set_background_color(&mut self, color: [f32; 4]);
    fn set_default_font(&mut self, font: Option<&str>, size: f32);
}

/// A window that only remembers what it was told.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessWindow {
    pub mode: Option<(u32, u32)>,
    pub options: Option<WindowSettings>,
    pub title: Option<String>,
    pub background: Option<[f32; 4]>,
    pub font: Option<(Option<String>, f32)>,
}

impl WindowBackend for HeadlessWindow {
    fn set_window_mode(&mut self, width: u32, height: u32, options: &WindowSettings) {
        log::debug!("window mode {width}x{height} (fullscreen: {})", options.fullscreen);
        self.mode = Some((width, height));
        self.options = Some(options.clone());
    }

    fn set_window_title(&mut self, title: &str) {
        log::debug!("window title `{title}`");
        self.title = Some(title.to_string());
    }

    fn set_background_color(&mut self, color: [f32; 4]) {
        log::debug!("background color {color:?}");
        self.background = Some(color);
    }

    fn set_default_font(&mut self, font: Option<&str>, size: f32) {
        log::debug!("default font {} at {size}", font.unwrap_or("<builtin>"));
        self.font = Some((font.map(str::to_string), size));
    }
}
