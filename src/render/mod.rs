//! Renderer seam between the puzzle logic and the display hardware
//!
//! The core never touches the display coprocessor directly: it issues
//! intent-named requests against the [`Renderer`] trait, and an adapter
//! translates them into whatever the target understands. The VDU adapter
//! emits the platform's command byte stream, the terminal adapter paints
//! colour cells with crossterm, and the headless adapter records every call
//! for tests.

pub mod headless;
pub mod manager;
pub mod terminal;
pub mod vdu;

use crate::grid::Tile;
use crate::image::{PuzzleImage, TILE_HEIGHT, TILE_WIDTH};
use std::fmt;

/// Pixel row where the picker's thumbnail grid starts.
pub const THUMB_TOP: u16 = 24;
/// Thumbnails per picker row.
pub const THUMBS_PER_ROW: usize = 4;
/// Thumbnail size in pixels (a quarter-scale tile grid cell).
pub const THUMB_WIDTH: u16 = TILE_WIDTH as u16;
pub const THUMB_HEIGHT: u16 = TILE_HEIGHT as u16;

/// Top-left pixel of a thumbnail slot in the picker's row-major layout.
pub fn thumbnail_origin(slot: usize) -> (u16, u16) {
    let x = (slot % THUMBS_PER_ROW) as u16 * THUMB_WIDTH;
    let y = THUMB_TOP + (slot / THUMBS_PER_ROW) as u16 * THUMB_HEIGHT;
    (x, y)
}

/// Text colours on the platform palette (bright range).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColour {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl TextColour {
    /// Platform text-colour code (bright palette entries 8..15).
    pub fn code(&self) -> u8 {
        match self {
            TextColour::Black => 8,
            TextColour::Red => 9,
            TextColour::Green => 10,
            TextColour::Yellow => 11,
            TextColour::Blue => 12,
            TextColour::Magenta => 13,
            TextColour::Cyan => 14,
            TextColour::White => 15,
        }
    }

    /// Approximate RGB for terminal rendering.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            TextColour::Black => (85, 85, 85),
            TextColour::Red => (255, 85, 85),
            TextColour::Green => (85, 255, 85),
            TextColour::Yellow => (255, 255, 85),
            TextColour::Blue => (85, 85, 255),
            TextColour::Magenta => (255, 85, 255),
            TextColour::Cyan => (85, 255, 255),
            TextColour::White => (255, 255, 255),
        }
    }
}

/// A full row or column of the tile grid, as a capturable screen region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneRegion {
    Row(usize),
    Column(usize),
}

/// Audio cues the game asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Scroll sample played while a lane slides
    Woosh,
    /// Level-completed sample
    Fanfare,
    /// Short UI note (picker navigation, scan progress)
    Note { frequency: u16, duration_ms: u16 },
}

/// Renderer error type
#[derive(Debug, Clone)]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render error: {}", self.message)
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(error: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", error))
    }
}

impl From<RenderError> for String {
    fn from(error: RenderError) -> String {
        error.message
    }
}

/// The narrow display-service interface the puzzle core draws through.
pub trait Renderer {
    /// Prepare the display: screen mode, cursor off, sprite reset, audio
    /// channels. Called once before the first screen.
    fn init(&mut self) -> Result<(), RenderError>;

    /// Restore whatever `init` disturbed (cursor visibility, raw state).
    fn cleanup(&mut self) -> Result<(), RenderError>;

    /// Push any buffered output to the device.
    fn flush(&mut self) -> Result<(), RenderError>;

    fn clear_screen(&mut self) -> Result<(), RenderError>;

    fn set_text_colour(&mut self, colour: TextColour) -> Result<(), RenderError>;

    /// Position the text cursor at character cell (x, y).
    fn cursor_tab(&mut self, x: u8, y: u8) -> Result<(), RenderError>;

    fn print(&mut self, text: &str) -> Result<(), RenderError>;

    /// Load the current puzzle image and slice it into the 16 tile bitmaps.
    fn upload_image(&mut self, image: &PuzzleImage) -> Result<(), RenderError>;

    /// Draw one tile bitmap at grid cell (col, row).
    fn draw_tile(&mut self, tile: Tile, col: usize, row: usize) -> Result<(), RenderError>;

    /// Capture the pixels of a whole row or column into the scratch bitmap.
    fn capture_region(&mut self, region: LaneRegion) -> Result<(), RenderError>;

    /// Draw the scratch bitmap with its origin at pixel (x, y); negative
    /// coordinates hang off the screen edge during scroll animation.
    fn draw_captured(&mut self, x: i16, y: i16) -> Result<(), RenderError>;

    /// Derive and store the quarter-scale thumbnail for a catalog slot.
    fn prepare_thumbnail(&mut self, slot: usize, image: &PuzzleImage) -> Result<(), RenderError>;

    /// Draw a stored thumbnail in its picker grid position.
    fn draw_thumbnail(&mut self, slot: usize) -> Result<(), RenderError>;

    /// Frame a thumbnail slot (red when selected, background otherwise).
    fn draw_highlight(&mut self, slot: usize, selected: bool) -> Result<(), RenderError>;

    /// Draw a thumbnail through an affine transform: rotated by `degrees`
    /// and scaled by `scale`, origin at pixel (x, y). Used by the picker's
    /// spin-out animation.
    fn draw_transformed_thumbnail(
        &mut self,
        slot: usize,
        degrees: u16,
        scale: f32,
        x: i16,
        y: i16,
    ) -> Result<(), RenderError>;

    /// Show or hide the row/column control labels around the grid.
    fn set_controls_visible(&mut self, visible: bool) -> Result<(), RenderError>;

    fn play_sound(&mut self, cue: SoundCue) -> Result<(), RenderError>;
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn init(&mut self) -> Result<(), RenderError> {
        (**self).init()
    }
    fn cleanup(&mut self) -> Result<(), RenderError> {
        (**self).cleanup()
    }
    fn flush(&mut self) -> Result<(), RenderError> {
        (**self).flush()
    }
    fn clear_screen(&mut self) -> Result<(), RenderError> {
        (**self).clear_screen()
    }
    fn set_text_colour(&mut self, colour: TextColour) -> Result<(), RenderError> {
        (**self).set_text_colour(colour)
    }
    fn cursor_tab(&mut self, x: u8, y: u8) -> Result<(), RenderError> {
        (**self).cursor_tab(x, y)
    }
    fn print(&mut self, text: &str) -> Result<(), RenderError> {
        (**self).print(text)
    }
    fn upload_image(&mut self, image: &PuzzleImage) -> Result<(), RenderError> {
        (**self).upload_image(image)
    }
    fn draw_tile(&mut self, tile: Tile, col: usize, row: usize) -> Result<(), RenderError> {
        (**self).draw_tile(tile, col, row)
    }
    fn capture_region(&mut self, region: LaneRegion) -> Result<(), RenderError> {
        (**self).capture_region(region)
    }
    fn draw_captured(&mut self, x: i16, y: i16) -> Result<(), RenderError> {
        (**self).draw_captured(x, y)
    }
    fn prepare_thumbnail(&mut self, slot: usize, image: &PuzzleImage) -> Result<(), RenderError> {
        (**self).prepare_thumbnail(slot, image)
    }
    fn draw_thumbnail(&mut self, slot: usize) -> Result<(), RenderError> {
        (**self).draw_thumbnail(slot)
    }
    fn draw_highlight(&mut self, slot: usize, selected: bool) -> Result<(), RenderError> {
        (**self).draw_highlight(slot, selected)
    }
    fn draw_transformed_thumbnail(
        &mut self,
        slot: usize,
        degrees: u16,
        scale: f32,
        x: i16,
        y: i16,
    ) -> Result<(), RenderError> {
        (**self).draw_transformed_thumbnail(slot, degrees, scale, x, y)
    }
    fn set_controls_visible(&mut self, visible: bool) -> Result<(), RenderError> {
        (**self).set_controls_visible(visible)
    }
    fn play_sound(&mut self, cue: SoundCue) -> Result<(), RenderError> {
        (**self).play_sound(cue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_layout_is_row_major() {
        assert_eq!(thumbnail_origin(0), (0, THUMB_TOP));
        assert_eq!(thumbnail_origin(3), (240, THUMB_TOP));
        assert_eq!(thumbnail_origin(4), (0, THUMB_TOP + THUMB_HEIGHT));
        assert_eq!(thumbnail_origin(11), (240, THUMB_TOP + 2 * THUMB_HEIGHT));
    }

    #[test]
    fn colour_codes_sit_in_the_bright_range() {
        assert_eq!(TextColour::Black.code(), 8);
        assert_eq!(TextColour::White.code(), 15);
        assert_eq!(TextColour::Red.code(), 9);
    }
}
