//! Picker screen: browse thumbnails and choose a puzzle image
//!
//! Thumbnails sit in a row-major grid; a highlight moves left and right
//! with wraparound at the catalog bounds. Confirming spins the chosen icon
//! out toward the top-left corner before play returns to the menu.

use crate::catalog::Catalog;
use crate::game::Pacing;
use crate::input::{Key, KeySource};
use crate::render::{thumbnail_origin, Renderer, SoundCue, TextColour};
use log::debug;

/// Index of the highlighted catalog entry while the picker is open.
#[derive(Debug, Clone, Copy)]
pub struct SelectionCursor {
    index: usize,
    len: usize,
}

impl SelectionCursor {
    pub fn new(index: usize, len: usize) -> Self {
        debug_assert!(len > 0 && index < len);
        SelectionCursor { index, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move left, wrapping from the first entry to the last.
    pub fn move_left(&mut self) {
        self.index = if self.index == 0 {
            self.len - 1
        } else {
            self.index - 1
        };
    }

    /// Move right, wrapping from the last entry to the first.
    pub fn move_right(&mut self) {
        self.index = if self.index + 1 == self.len {
            0
        } else {
            self.index + 1
        };
    }
}

/// How the picker screen ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    Chosen(usize),
    Exit,
}

const NOTE_PREV: u16 = 500;
const NOTE_NEXT: u16 = 600;
const NOTE_CONFIRM: u16 = 800;

/// Run the picker screen until the player confirms or exits.
pub fn run_picker<R: Renderer, K: KeySource>(
    renderer: &mut R,
    keys: &mut K,
    catalog: &Catalog,
    start: usize,
    pacing: &Pacing,
) -> Result<PickerOutcome, String> {
    let mut cursor = SelectionCursor::new(start, catalog.len());

    renderer.set_controls_visible(false)?;
    renderer.clear_screen()?;
    renderer.cursor_tab(0, 1)?;
    renderer.set_text_colour(TextColour::White)?;
    renderer.print("Select Picture < > then ENTER\n\n")?;

    for slot in 0..catalog.len() {
        renderer.draw_thumbnail(slot)?;
        renderer.draw_highlight(slot, false)?;
    }
    renderer.draw_highlight(cursor.index(), true)?;
    show_name(renderer, catalog, cursor.index())?;
    renderer.flush()?;

    loop {
        let key = keys.next_key()?;
        match key {
            Key::Left | Key::Right => {
                let previous = cursor.index();
                let frequency = if key == Key::Left {
                    cursor.move_left();
                    NOTE_PREV
                } else {
                    cursor.move_right();
                    NOTE_NEXT
                };
                renderer.play_sound(SoundCue::Note {
                    frequency,
                    duration_ms: 50,
                })?;
                renderer.draw_highlight(previous, false)?;
                renderer.draw_highlight(cursor.index(), true)?;
                show_name(renderer, catalog, cursor.index())?;
                renderer.flush()?;
            }
            Key::Enter => {
                renderer.play_sound(SoundCue::Note {
                    frequency: NOTE_CONFIRM,
                    duration_ms: 80,
                })?;
                spin_out(renderer, cursor.index(), pacing)?;
                debug!("picker: chose entry {}", cursor.index());
                return Ok(PickerOutcome::Chosen(cursor.index()));
            }
            Key::Escape => return Ok(PickerOutcome::Exit),
            _ => {}
        }
    }
}

fn show_name<R: Renderer>(
    renderer: &mut R,
    catalog: &Catalog,
    index: usize,
) -> Result<(), String> {
    renderer.set_text_colour(TextColour::White)?;
    renderer.cursor_tab(0, 29)?;
    renderer.print(&format!("Puzzle: {:<24}", catalog.entry(index).name))?;
    Ok(())
}

/// Spin the chosen icon out toward the corner, growing and rotating a
/// little more each frame.
fn spin_out<R: Renderer>(renderer: &mut R, slot: usize, pacing: &Pacing) -> Result<(), String> {
    let (start_x, start_y) = thumbnail_origin(slot);
    let steps = pacing.spin_steps;
    for n in 1..=steps {
        let degrees = n * 40;
        let scale = (n + 3) as f32 / 2.0;
        // drift from the slot position toward the top-left corner
        let remaining = (steps + 1 - n) as i32;
        let x = ((20 + start_x as i32) * remaining / (steps + 1) as i32) as i16;
        let y = (start_y as i32 * remaining / (steps + 1) as i32) as i16;
        renderer.draw_transformed_thumbnail(slot, degrees, scale, x, y)?;
        renderer.flush()?;
        pacing.pace(pacing.spin_delay);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_left_from_zero() {
        let mut cursor = SelectionCursor::new(0, 5);
        cursor.move_left();
        assert_eq!(cursor.index(), 4);
    }

    #[test]
    fn cursor_wraps_right_from_last() {
        let mut cursor = SelectionCursor::new(4, 5);
        cursor.move_right();
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn cursor_moves_are_inverses() {
        let mut cursor = SelectionCursor::new(2, 7);
        cursor.move_right();
        cursor.move_left();
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn single_entry_catalog_pins_the_cursor() {
        let mut cursor = SelectionCursor::new(0, 1);
        cursor.move_left();
        assert_eq!(cursor.index(), 0);
        cursor.move_right();
        assert_eq!(cursor.index(), 0);
    }
}
