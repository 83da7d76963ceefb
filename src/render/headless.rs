//! Headless renderer for testing and CI environments
//!
//! Records every operation without displaying anything, so tests can
//! assert on exactly what the game asked the display service to do.

use crate::grid::Tile;
use crate::image::PuzzleImage;
use crate::render::{LaneRegion, RenderError, Renderer, SoundCue, TextColour};
use log::debug;

/// One recorded renderer operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    Init,
    Cleanup,
    ClearScreen,
    SetTextColour(TextColour),
    CursorTab(u8, u8),
    Print(String),
    UploadImage,
    DrawTile { tile: Tile, col: usize, row: usize },
    CaptureRegion(LaneRegion),
    DrawCaptured(i16, i16),
    PrepareThumbnail(usize),
    DrawThumbnail(usize),
    DrawHighlight { slot: usize, selected: bool },
    DrawTransformedThumbnail { slot: usize, degrees: u16 },
    SetControlsVisible(bool),
    PlaySound(SoundCue),
}

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    ops: Vec<RenderOp>,
    uploads: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in call order.
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    pub fn count<F: Fn(&RenderOp) -> bool>(&self, pred: F) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// All printed text joined into one string.
    pub fn printed(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::Print(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of whole-image uploads (one per image-store reload).
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    fn record(&mut self, op: RenderOp) {
        debug!("headless: {:?}", op);
        self.ops.push(op);
    }
}

impl Renderer for HeadlessRenderer {
    fn init(&mut self) -> Result<(), RenderError> {
        self.record(RenderOp::Init);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), RenderError> {
        self.record(RenderOp::Cleanup);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), RenderError> {
        self.record(RenderOp::ClearScreen);
        Ok(())
    }

    fn set_text_colour(&mut self, colour: TextColour) -> Result<(), RenderError> {
        self.record(RenderOp::SetTextColour(colour));
        Ok(())
    }

    fn cursor_tab(&mut self, x: u8, y: u8) -> Result<(), RenderError> {
        self.record(RenderOp::CursorTab(x, y));
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), RenderError> {
        self.record(RenderOp::Print(text.to_string()));
        Ok(())
    }

    fn upload_image(&mut self, _image: &PuzzleImage) -> Result<(), RenderError> {
        self.uploads += 1;
        self.record(RenderOp::UploadImage);
        Ok(())
    }

    fn draw_tile(&mut self, tile: Tile, col: usize, row: usize) -> Result<(), RenderError> {
        self.record(RenderOp::DrawTile { tile, col, row });
        Ok(())
    }

    fn capture_region(&mut self, region: LaneRegion) -> Result<(), RenderError> {
        self.record(RenderOp::CaptureRegion(region));
        Ok(())
    }

    fn draw_captured(&mut self, x: i16, y: i16) -> Result<(), RenderError> {
        self.record(RenderOp::DrawCaptured(x, y));
        Ok(())
    }

    fn prepare_thumbnail(&mut self, slot: usize, _image: &PuzzleImage) -> Result<(), RenderError> {
        self.record(RenderOp::PrepareThumbnail(slot));
        Ok(())
    }

    fn draw_thumbnail(&mut self, slot: usize) -> Result<(), RenderError> {
        self.record(RenderOp::DrawThumbnail(slot));
        Ok(())
    }

    fn draw_highlight(&mut self, slot: usize, selected: bool) -> Result<(), RenderError> {
        self.record(RenderOp::DrawHighlight { slot, selected });
        Ok(())
    }

    fn draw_transformed_thumbnail(
        &mut self,
        slot: usize,
        degrees: u16,
        _scale: f32,
        _x: i16,
        _y: i16,
    ) -> Result<(), RenderError> {
        self.record(RenderOp::DrawTransformedThumbnail { slot, degrees });
        Ok(())
    }

    fn set_controls_visible(&mut self, visible: bool) -> Result<(), RenderError> {
        self.record(RenderOp::SetControlsVisible(visible));
        Ok(())
    }

    fn play_sound(&mut self, cue: SoundCue) -> Result<(), RenderError> {
        self.record(RenderOp::PlaySound(cue));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_operations_in_order() {
        let mut r = HeadlessRenderer::new();
        r.clear_screen().unwrap();
        r.print("hello").unwrap();
        r.draw_tile(7, 1, 3).unwrap();
        assert_eq!(
            r.ops(),
            &[
                RenderOp::ClearScreen,
                RenderOp::Print("hello".to_string()),
                RenderOp::DrawTile {
                    tile: 7,
                    col: 1,
                    row: 3
                },
            ]
        );
    }

    #[test]
    fn printed_concatenates_text() {
        let mut r = HeadlessRenderer::new();
        r.print("a").unwrap();
        r.cursor_tab(0, 1).unwrap();
        r.print("b").unwrap();
        assert_eq!(r.printed(), "ab");
    }
}
