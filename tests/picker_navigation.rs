//! Picker screen behaviour against the headless renderer

use slideways::catalog::Catalog;
use slideways::game::Pacing;
use slideways::input::{Key, ScriptedKeys};
use slideways::picker::{run_picker, PickerOutcome, SelectionCursor};
use slideways::render::headless::{HeadlessRenderer, RenderOp};
use slideways::render::SoundCue;
use std::fs::{self, File};
use std::path::PathBuf;

struct TempDir(PathBuf);

impl TempDir {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "slideways-picker-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        TempDir(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn five_entry_catalog(dir: &TempDir) -> Catalog {
    for name in ["alpha", "bravo", "charlie", "delta", "echo"] {
        File::create(dir.0.join(name)).unwrap();
    }
    let catalog = Catalog::scan(&dir.0).unwrap();
    assert_eq!(catalog.len(), 5);
    catalog
}

#[test]
fn cursor_wraps_at_both_catalog_bounds() {
    let mut cursor = SelectionCursor::new(0, 5);
    cursor.move_left();
    assert_eq!(cursor.index(), 4);

    let mut cursor = SelectionCursor::new(4, 5);
    cursor.move_right();
    assert_eq!(cursor.index(), 0);
}

#[test]
fn navigation_beeps_and_confirm_returns_the_highlighted_entry() {
    let dir = TempDir::new("confirm");
    let catalog = five_entry_catalog(&dir);

    let mut renderer = HeadlessRenderer::new();
    let mut keys = ScriptedKeys::new([Key::Right, Key::Right, Key::Char('x'), Key::Enter]);
    let outcome = run_picker(&mut renderer, &mut keys, &catalog, 0, &Pacing::instant()).unwrap();

    assert_eq!(outcome, PickerOutcome::Chosen(2));
    // two navigation notes plus the confirmation note
    let notes = renderer.count(|op| matches!(op, RenderOp::PlaySound(SoundCue::Note { .. })));
    assert_eq!(notes, 3);
    // every entry got a thumbnail draw on entry to the screen
    let thumbs = renderer.count(|op| matches!(op, RenderOp::DrawThumbnail(_)));
    assert_eq!(thumbs, 5);
}

#[test]
fn wrapping_left_from_the_first_entry_selects_the_last() {
    let dir = TempDir::new("wrap");
    let catalog = five_entry_catalog(&dir);

    let mut renderer = HeadlessRenderer::new();
    let mut keys = ScriptedKeys::new([Key::Left, Key::Enter]);
    let outcome = run_picker(&mut renderer, &mut keys, &catalog, 0, &Pacing::instant()).unwrap();
    assert_eq!(outcome, PickerOutcome::Chosen(4));
}

#[test]
fn confirm_runs_the_spin_out_animation() {
    let dir = TempDir::new("spin");
    let catalog = five_entry_catalog(&dir);

    let mut renderer = HeadlessRenderer::new();
    let mut keys = ScriptedKeys::new([Key::Enter]);
    let pacing = Pacing::instant();
    run_picker(&mut renderer, &mut keys, &catalog, 1, &pacing).unwrap();

    let frames =
        renderer.count(|op| matches!(op, RenderOp::DrawTransformedThumbnail { slot: 1, .. }));
    assert_eq!(frames, pacing.spin_steps as usize);
}

#[test]
fn escape_exits_without_choosing() {
    let dir = TempDir::new("escape");
    let catalog = five_entry_catalog(&dir);

    let mut renderer = HeadlessRenderer::new();
    let mut keys = ScriptedKeys::new([Key::Right, Key::Escape]);
    let outcome = run_picker(&mut renderer, &mut keys, &catalog, 0, &Pacing::instant()).unwrap();
    assert_eq!(outcome, PickerOutcome::Exit);
}
