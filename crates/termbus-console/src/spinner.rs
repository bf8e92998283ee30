//! Progress spinner shown next to the last loading message

/// Unix style spinner frames
pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next frame, wrapping around
    pub fn advance(&mut self) {
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn glyph(&self) -> &'static str {
        SPINNER_FRAMES[self.frame]
    }
}
