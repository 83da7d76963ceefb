//! Terminal preview renderer
//!
//! Paints a coarse colour-cell approximation of the puzzle with crossterm
//! for local play without the real display hardware. Every 8x10 pixel
//! block of the 320x240 screen becomes one terminal cell, so the whole
//! board is 40x24 cells. Coprocessor-only operations (region capture,
//! affine transforms) have no terminal equivalent and degrade to no-ops;
//! the game's post-scroll redraw keeps the board correct anyway.

use crate::grid::Tile;
use crate::image::{PuzzleImage, Rgba, TILE_HEIGHT, TILE_WIDTH};
use crate::render::{
    thumbnail_origin, LaneRegion, RenderError, Renderer, SoundCue, TextColour,
};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use std::io::{self, Stdout, Write};

// pixels per terminal cell
const CELL_W: usize = 8;
const CELL_H: usize = 10;

// cells per tile
const TILE_COLS: usize = TILE_WIDTH / CELL_W;
const TILE_ROWS: usize = TILE_HEIGHT / CELL_H;

const MAX_THUMBS: usize = 12;

pub struct TerminalRenderer {
    stdout: Stdout,
    text_colour: Color,
    image: Option<PuzzleImage>,
    thumbs: Vec<Option<Vec<Rgba>>>,
}

impl TerminalRenderer {
    pub fn new() -> Result<Self, RenderError> {
        Ok(TerminalRenderer {
            stdout: io::stdout(),
            text_colour: Color::White,
            image: None,
            thumbs: vec![None; MAX_THUMBS],
        })
    }

    fn cell_colour(rgba: Rgba) -> Color {
        Color::Rgb {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
        }
    }

    /// Paint one terminal cell as a coloured space.
    fn paint_cell(&mut self, col: u16, row: u16, colour: Color) -> io::Result<()> {
        queue!(
            self.stdout,
            MoveTo(col, row),
            SetBackgroundColor(colour),
            Print(" "),
            ResetColor
        )
    }

    /// Paint the 10x6 cell block for a thumbnail slot from stored samples.
    fn paint_thumb_block(&mut self, slot: usize) -> io::Result<()> {
        let Some(samples) = self.thumbs.get(slot).cloned().flatten() else {
            return Ok(());
        };
        let (px, py) = thumbnail_origin(slot);
        let (col0, row0) = (px as usize / CELL_W, py as usize / CELL_H);
        for cy in 0..TILE_ROWS {
            for cx in 0..TILE_COLS {
                let colour = Self::cell_colour(samples[cy * TILE_COLS + cx]);
                self.paint_cell((col0 + cx) as u16, (row0 + cy) as u16, colour)?;
            }
        }
        Ok(())
    }
}

impl Renderer for TerminalRenderer {
    fn init(&mut self) -> Result<(), RenderError> {
        debug!("terminal renderer: entering alternate screen");
        execute!(
            self.stdout,
            EnterAlternateScreen,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), RenderError> {
        execute!(self.stdout, ResetColor, Show, LeaveAlternateScreen)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        self.stdout.flush()?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), RenderError> {
        queue!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn set_text_colour(&mut self, colour: TextColour) -> Result<(), RenderError> {
        let (r, g, b) = colour.rgb();
        self.text_colour = Color::Rgb { r, g, b };
        Ok(())
    }

    fn cursor_tab(&mut self, x: u8, y: u8) -> Result<(), RenderError> {
        queue!(self.stdout, MoveTo(x as u16, y as u16))?;
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), RenderError> {
        queue!(
            self.stdout,
            SetForegroundColor(self.text_colour),
            Print(text),
            ResetColor
        )?;
        Ok(())
    }

    fn upload_image(&mut self, image: &PuzzleImage) -> Result<(), RenderError> {
        self.image = Some(image.clone());
        Ok(())
    }

    fn draw_tile(&mut self, tile: Tile, col: usize, row: usize) -> Result<(), RenderError> {
        let Some(image) = self.image.clone() else {
            return Err(RenderError::new("draw_tile before upload_image"));
        };
        // source tile in the original picture
        let src_row = tile as usize / 4;
        let src_col = tile as usize % 4;
        for cy in 0..TILE_ROWS {
            for cx in 0..TILE_COLS {
                let sx = src_col * TILE_WIDTH + cx * CELL_W + CELL_W / 2;
                let sy = src_row * TILE_HEIGHT + cy * CELL_H + CELL_H / 2;
                let colour = Self::cell_colour(image.sample(sx, sy));
                self.paint_cell(
                    (col * TILE_COLS + cx) as u16,
                    (row * TILE_ROWS + cy) as u16,
                    colour,
                )?;
            }
        }
        // tile number in the corner so near-uniform tiles stay tellable
        queue!(
            self.stdout,
            MoveTo((col * TILE_COLS) as u16, (row * TILE_ROWS) as u16),
            SetForegroundColor(Color::White),
            Print(format!("{:X}", tile)),
            ResetColor
        )?;
        Ok(())
    }

    fn capture_region(&mut self, region: LaneRegion) -> Result<(), RenderError> {
        // no pixel scratchpad in a terminal; the post-scroll redraw covers it
        debug!("terminal renderer: capture {:?} ignored", region);
        Ok(())
    }

    fn draw_captured(&mut self, _x: i16, _y: i16) -> Result<(), RenderError> {
        Ok(())
    }

    fn prepare_thumbnail(&mut self, slot: usize, image: &PuzzleImage) -> Result<(), RenderError> {
        if slot < MAX_THUMBS {
            self.thumbs[slot] = Some(image.thumbnail(TILE_COLS, TILE_ROWS));
        }
        Ok(())
    }

    fn draw_thumbnail(&mut self, slot: usize) -> Result<(), RenderError> {
        self.paint_thumb_block(slot)?;
        Ok(())
    }

    fn draw_highlight(&mut self, slot: usize, selected: bool) -> Result<(), RenderError> {
        if selected {
            let (px, py) = thumbnail_origin(slot);
            let (col0, row0) = (px as usize / CELL_W, py as usize / CELL_H);
            let red = Color::Rgb { r: 255, g: 85, b: 85 };
            for cx in 0..TILE_COLS {
                self.paint_cell((col0 + cx) as u16, row0 as u16, red)?;
                self.paint_cell((col0 + cx) as u16, (row0 + TILE_ROWS - 1) as u16, red)?;
            }
            for cy in 0..TILE_ROWS {
                self.paint_cell(col0 as u16, (row0 + cy) as u16, red)?;
                self.paint_cell((col0 + TILE_COLS - 1) as u16, (row0 + cy) as u16, red)?;
            }
        } else {
            // restore the edge cells from the stored samples
            self.paint_thumb_block(slot)?;
        }
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
        debug!(
            "terminal renderer: spin frame slot {} at {} degrees ignored",
            slot, degrees
        );
        Ok(())
    }

    fn set_controls_visible(&mut self, visible: bool) -> Result<(), RenderError> {
        // column keys under the board, row keys to its right
        for n in 0..4usize {
            let digit = if visible {
                format!("{}", n + 1)
            } else {
                " ".to_string()
            };
            let letter = if visible {
                format!("{}", (b'a' + n as u8) as char)
            } else {
                " ".to_string()
            };
            queue!(
                self.stdout,
                MoveTo((n * TILE_COLS + TILE_COLS / 2) as u16, (4 * TILE_ROWS) as u16),
                SetForegroundColor(Color::Cyan),
                Print(digit),
                MoveTo((4 * TILE_COLS + 1) as u16, (n * TILE_ROWS + TILE_ROWS / 2) as u16),
                Print(letter),
                ResetColor
            )?;
        }
        Ok(())
    }

    fn play_sound(&mut self, cue: SoundCue) -> Result<(), RenderError> {
        if cue == SoundCue::Fanfare {
            // terminal bell is the closest thing to a fanfare
            queue!(self.stdout, Print("\x07"))?;
        }
        Ok(())
    }
}
