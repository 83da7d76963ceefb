//! Game session: the menu / playing / completed state machine
//!
//! One synchronous control loop owns the grid, the catalog, the current
//! image and the renderer, and blocks on key input between state changes.
//! Animation pacing is an explicit parameter rather than sleeps buried in
//! drawing code, so tests can run the whole session instantly and count
//! the intermediate frames.

use crate::catalog::Catalog;
use crate::grid::{PuzzleGrid, RotateOp, GRID_SIZE};
use crate::image::{PuzzleImage, IMAGE_HEIGHT, IMAGE_WIDTH, TILE_HEIGHT, TILE_WIDTH};
use crate::input::{action_for, Action, Key, KeySource};
use crate::picker::{run_picker, PickerOutcome};
use crate::render::{LaneRegion, Renderer, SoundCue, TextColour};
use crate::shuffle::SlideRand;
use log::{debug, info, warn};
use std::thread;
use std::time::Duration;

/// Animation pacing: how many frames each effect gets and how long each
/// frame lingers. `instant` keeps the frame structure with zero delay.
#[derive(Debug, Clone)]
pub struct Pacing {
    /// Intermediate frames in one lane scroll
    pub scroll_steps: u16,
    /// Delay between scroll frames
    pub frame_delay: Duration,
    /// Frames in the picker spin-out
    pub spin_steps: u16,
    /// Delay between spin-out frames
    pub spin_delay: Duration,
    /// Pause before and between shuffle moves
    pub shuffle_pause: Duration,
}

impl Pacing {
    pub fn instant() -> Self {
        Pacing {
            frame_delay: Duration::ZERO,
            spin_delay: Duration::ZERO,
            shuffle_pause: Duration::ZERO,
            ..Pacing::default()
        }
    }

    pub fn pace(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            scroll_steps: 16,
            frame_delay: Duration::from_millis(8),
            spin_steps: 9,
            spin_delay: Duration::from_millis(80),
            shuffle_pause: Duration::from_millis(500),
        }
    }
}

/// What the menu resolved to.
enum MenuChoice {
    Level(u8),
    Exit,
}

/// How a level ended.
enum PlayOutcome {
    Solved,
    GaveUp,
    Exit,
}

pub struct GameSession<R: Renderer, K: KeySource> {
    renderer: R,
    keys: K,
    catalog: Catalog,
    current: usize,
    image: Option<PuzzleImage>,
    grid: PuzzleGrid,
    rng: SlideRand,
    pacing: Pacing,
}

impl<R: Renderer, K: KeySource> GameSession<R, K> {
    pub fn new(renderer: R, keys: K, catalog: Catalog, rng: SlideRand, pacing: Pacing) -> Self {
        GameSession {
            renderer,
            keys,
            catalog,
            current: 0,
            image: None,
            grid: PuzzleGrid::new(),
            rng,
            pacing,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn grid(&self) -> &PuzzleGrid {
        &self.grid
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The image store's active image, if one has been loaded.
    pub fn image(&self) -> Option<&PuzzleImage> {
        self.image.as_ref()
    }

    /// Restore display state; call once after `run` regardless of outcome.
    pub fn cleanup(&mut self) {
        if let Err(e) = self.renderer.cleanup() {
            warn!("renderer cleanup failed: {}", e);
        }
    }

    /// Run the whole session: set up thumbnails, then loop through the
    /// menu / playing / completed states until the player exits.
    pub fn run(&mut self) -> Result<(), String> {
        self.renderer.init()?;
        self.setup_catalog()?;

        loop {
            match self.menu_screen()? {
                MenuChoice::Exit => break,
                MenuChoice::Level(level) => {
                    self.init_level(level)?;
                    match self.game_screen()? {
                        PlayOutcome::Exit => break,
                        PlayOutcome::GaveUp => continue,
                        PlayOutcome::Solved => {
                            if !self.completed_screen()? {
                                break;
                            }
                        }
                    }
                }
            }
        }
        debug!("session: exiting");
        Ok(())
    }

    /// Load every catalog entry once: failures are reported and dropped,
    /// survivors get thumbnails. The first survivor becomes the active
    /// image.
    fn setup_catalog(&mut self) -> Result<(), String> {
        let mut kept = Vec::new();
        let mut images = Vec::new();

        for entry in self.catalog.entries().to_vec() {
            self.renderer
                .print(&format!("Scanning file {}\r\n", entry.name))?;
            match PuzzleImage::load(&entry.path) {
                Ok(image) => {
                    kept.push(entry.name.clone());
                    images.push(image);
                }
                Err(e) => {
                    warn!("dropping {}: {}", entry.name, e);
                    self.renderer
                        .print(&format!("Error opening file {}\r\n", entry.name))?;
                }
            }
        }
        self.catalog.retain(|e| kept.contains(&e.name));

        if self.catalog.is_empty() || images.is_empty() {
            return Err("No puzzles found".to_string());
        }

        for (slot, image) in images.iter().enumerate() {
            self.renderer.prepare_thumbnail(slot, image)?;
            self.renderer.play_sound(SoundCue::Note {
                frequency: 400 + 24 * slot as u16,
                duration_ms: 60,
            })?;
        }
        self.renderer.flush()?;

        info!("{} puzzles ready", self.catalog.len());
        self.current = 0;
        let first = images.remove(0);
        self.set_image(first)?;
        Ok(())
    }

    /// Replace the active image; the previous tile set is discarded.
    fn set_image(&mut self, image: PuzzleImage) -> Result<(), String> {
        self.renderer.upload_image(&image)?;
        self.image = Some(image);
        Ok(())
    }

    fn menu_screen(&mut self) -> Result<MenuChoice, String> {
        loop {
            self.renderer.set_controls_visible(false)?;
            self.draw_menu()?;
            self.renderer.flush()?;

            loop {
                match self.keys.next_key()? {
                    Key::Escape => return Ok(MenuChoice::Exit),
                    Key::Char(c) if ('1'..='9').contains(&c) => {
                        return Ok(MenuChoice::Level(c as u8 - b'0'));
                    }
                    Key::Char('s') => {
                        let outcome = run_picker(
                            &mut self.renderer,
                            &mut self.keys,
                            &self.catalog,
                            self.current,
                            &self.pacing,
                        )?;
                        match outcome {
                            PickerOutcome::Exit => return Ok(MenuChoice::Exit),
                            PickerOutcome::Chosen(index) => {
                                self.current = index;
                                let path = self.catalog.entry(index).path.clone();
                                let image = PuzzleImage::load(&path).map_err(|e| {
                                    format!(
                                        "cannot reload {}: {}",
                                        self.catalog.entry(index).name,
                                        e
                                    )
                                })?;
                                self.set_image(image)?;
                            }
                        }
                        break; // redraw the menu
                    }
                    _ => {}
                }
            }
        }
    }

    fn draw_menu(&mut self) -> Result<(), String> {
        let r = &mut self.renderer;
        r.clear_screen()?;
        r.cursor_tab(0, 1)?;
        r.set_text_colour(TextColour::Red)?;
        r.print("            S L I D E R\n\n\n")?;
        r.set_text_colour(TextColour::White)?;
        r.print("     Press:")?;
        r.set_text_colour(TextColour::Yellow)?;
        r.print(" 1 - 9 for level\n\n")?;
        r.print("            S to Swap puzzle\n\n")?;
        r.set_text_colour(TextColour::White)?;
        r.print("   In game: ")?;
        r.set_text_colour(TextColour::Yellow)?;
        r.print("Q to Give up\n\n")?;
        r.print("            ESC to exit program\n\n")?;
        r.print("            1-4 & A-D to scroll\n\n")?;
        r.print("            SHIFT reverse direction\n\n")?;

        // key diagram
        r.cursor_tab(0, 17)?;
        r.set_text_colour(TextColour::Cyan)?;
        r.print("               1 2 3 4\n")?;
        r.print("               v v v v\n\n")?;
        for row in 0..GRID_SIZE as u8 {
            r.set_text_colour(TextColour::Cyan)?;
            r.print(&format!("            {}> ", (b'a' + row) as char))?;
            r.set_text_colour(TextColour::Blue)?;
            r.print("X X X X\n\n")?;
        }

        r.set_text_colour(TextColour::White)?;
        r.cursor_tab(0, 29)?;
        r.print(&format!(
            "Puzzle: {:<24}",
            self.catalog.entry(self.current).name
        ))?;
        Ok(())
    }

    /// Reset the grid to solved, show it, then scramble it on screen with
    /// exactly `level` animated scrolls.
    fn init_level(&mut self, level: u8) -> Result<(), String> {
        info!("starting level {}", level);
        self.grid = PuzzleGrid::new();
        self.renderer.clear_screen()?;
        self.redraw_grid()?;
        self.renderer.flush()?;

        self.pacing.pace(self.pacing.shuffle_pause);
        let moves = self.rng.scroll_sequence(level);
        for op in moves {
            self.apply_rotation(op)?;
            self.pacing.pace(self.pacing.shuffle_pause);
        }

        self.renderer.set_controls_visible(true)?;
        self.renderer.flush()?;
        Ok(())
    }

    fn game_screen(&mut self) -> Result<PlayOutcome, String> {
        loop {
            let key = self.keys.next_key()?;
            match action_for(key) {
                Some(Action::Rotate(op)) => {
                    self.apply_rotation(op)?;
                    if self.grid.is_solved() {
                        return Ok(PlayOutcome::Solved);
                    }
                }
                Some(Action::GiveUp) => return Ok(PlayOutcome::GaveUp),
                Some(Action::Exit) => return Ok(PlayOutcome::Exit),
                None => {}
            }
        }
    }

    fn completed_screen(&mut self) -> Result<bool, String> {
        let banner = [
            "+++++++++++++++++++",
            "+                 +",
            "+    Well Done    +",
            "+                 +",
            "+  Press Any Key  +",
            "+                 +",
            "+++++++++++++++++++",
        ];
        self.renderer.set_text_colour(TextColour::White)?;
        for (n, line) in banner.iter().enumerate() {
            self.renderer.cursor_tab(10, 18 + n as u8)?;
            self.renderer.print(line)?;
        }
        self.renderer.play_sound(SoundCue::Fanfare)?;
        self.renderer.flush()?;

        Ok(self.keys.next_key()? != Key::Escape)
    }

    fn redraw_grid(&mut self) -> Result<(), String> {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                self.renderer
                    .draw_tile(self.grid.tile_at(row, col), col, row)?;
            }
        }
        Ok(())
    }

    /// One animated lane scroll: capture the lane, slide it across with
    /// paced intermediate frames, then commit the rotation and redraw.
    fn apply_rotation(&mut self, op: RotateOp) -> Result<(), String> {
        debug!("rotation: {}", op);
        let region = match op {
            RotateOp::Row(r, _) => LaneRegion::Row(r),
            RotateOp::Column(c, _) => LaneRegion::Column(c),
        };
        self.renderer.capture_region(region)?;
        self.renderer.play_sound(SoundCue::Woosh)?;
        self.animate_scroll(op)?;

        self.grid.apply(op);
        self.redraw_grid()?;
        self.renderer.flush()?;
        Ok(())
    }

    fn animate_scroll(&mut self, op: RotateOp) -> Result<(), String> {
        use crate::grid::Direction::Forward;
        let steps = self.pacing.scroll_steps.max(1);
        for i in 0..=steps {
            match op {
                RotateOp::Row(r, dir) => {
                    let y = (r * TILE_HEIGHT) as i16;
                    let off = (i as usize * TILE_WIDTH / steps as usize) as i16;
                    let off = if dir == Forward { off } else { -off };
                    let wrap = if dir == Forward {
                        off - IMAGE_WIDTH as i16
                    } else {
                        off + IMAGE_WIDTH as i16
                    };
                    self.renderer.draw_captured(off, y)?;
                    self.renderer.draw_captured(wrap, y)?;
                }
                RotateOp::Column(c, dir) => {
                    let x = (c * TILE_WIDTH) as i16;
                    let off = (i as usize * TILE_HEIGHT / steps as usize) as i16;
                    let off = if dir == Forward { off } else { -off };
                    let wrap = if dir == Forward {
                        off - IMAGE_HEIGHT as i16
                    } else {
                        off + IMAGE_HEIGHT as i16
                    };
                    self.renderer.draw_captured(x, off)?;
                    self.renderer.draw_captured(x, wrap)?;
                }
            }
            self.renderer.flush()?;
            self.pacing.pace(self.pacing.frame_delay);
        }
        Ok(())
    }
}
