//! VDU adapter: renderer intents to coprocessor command sequences
//!
//! This is the one place where puzzle intent meets the platform protocol.
//! Bitmap real estate follows the platform program layout: legacy bitmap
//! 30 is the scroll capture scratch, buffers 20-23 hold upload bands,
//! buffers 40-55 hold the sixteen tiles, 100+ hold picker icons, 97-99 are
//! transform scratch. Sample slots -1 and -2 carry the scroll and
//! completion sounds on channels 3 and 4.

use crate::grid::{Tile, GRID_SIZE};
use crate::image::{PuzzleImage, IMAGE_HEIGHT, IMAGE_WIDTH, TILE_HEIGHT, TILE_WIDTH};
use crate::labels::{label_bitmap, label_layout, LABEL_COUNT, LABEL_SIZE};
use crate::render::{
    thumbnail_origin, LaneRegion, RenderError, Renderer, SoundCue, TextColour,
};
use crate::vdu::VduStream;
use log::debug;
use std::io::Write;

const SCREEN_MODE: u8 = 8; // 320x240, 64 colours
const RGBA2222_FORMAT: u8 = 1;

const CAPTURE_BITMAP: u8 = 30;
const BAND_BUFFER_BASE: u16 = 20;
const TILE_BUFFER_BASE: u16 = 40;
const ICON_BUFFER_BASE: u16 = 100;
const SPIN_BITMAP_BUFFER: u16 = 200;
const SPIN_MATRIX_BUFFER: u16 = 97;
const SCALE_MATRIX_BUFFER: u16 = 98;
const TEMP_IMAGE_BUFFER: u16 = 99;

// legacy 8-bit bitmap n aliases buffer 64000+n; label sprites use 0..7
const LEGACY_BITMAP_BASE: u16 = 64000;

const NOTE_CHANNEL: u8 = 0;
const WOOSH_CHANNEL: u8 = 3;
const FANFARE_CHANNEL: u8 = 4;
const WOOSH_SAMPLE: i8 = -1;
const FANFARE_SAMPLE: i8 = -2;

// system variables: 1 enables the transform pipeline, 2 the hardware
// sprite test flag
const SYSVAR_TRANSFORMS: u8 = 1;
const SYSVAR_HW_SPRITES: u8 = 2;

// icon scale matrix: 2 / 2^3 = quarter scale, the thumbnail ratio
const ICON_SCALE_FACTOR: u16 = 2;
const ICON_SCALE_SHIFT: u8 = 3;

// transformed-bitmap options as the platform program uses them
const TRANSFORM_OPT_RESIZE: u8 = 1;
const TRANSFORM_OPT_SPIN: u8 = 5;

// upload band: one grid row of pixels, small enough for a block write
const BAND_BYTES: usize = IMAGE_WIDTH * TILE_HEIGHT;

/// Renderer that emits the display coprocessor's command byte stream.
pub struct VduRenderer<W: Write> {
    vdu: VduStream<W>,
}

impl<W: Write> VduRenderer<W> {
    pub fn new(sink: W) -> Self {
        VduRenderer {
            vdu: VduStream::new(sink),
        }
    }

    /// Consume the renderer and hand back the sink (used by tests).
    pub fn into_sink(self) -> W {
        self.vdu.into_inner()
    }

    fn upload_label_sprites(&mut self) -> Result<(), RenderError> {
        self.vdu.set_system_variable(SYSVAR_HW_SPRITES, 1)?;
        for (n, (glyph, x, y)) in label_layout().iter().enumerate() {
            let buffer = LEGACY_BITMAP_BASE + n as u16;
            let bitmap = label_bitmap(glyph);
            self.vdu.buffer_clear(buffer)?;
            self.vdu.buffer_write_block(buffer, &bitmap)?;
            self.vdu.buffer_consolidate(buffer)?;
            self.vdu.select_buffer_bitmap(buffer)?;
            self.vdu
                .bitmap_from_buffer(LABEL_SIZE as u16, LABEL_SIZE as u16, RGBA2222_FORMAT)?;
            self.vdu.select_sprite(n as u8)?;
            self.vdu.clear_sprite()?;
            self.vdu.sprite_add_bitmap(n as u8)?;
            self.vdu.set_hardware_sprite()?;
            self.vdu.move_sprite_to(*x, *y)?;
            self.vdu.hide_sprite()?;
        }
        self.vdu.activate_sprites(LABEL_COUNT as u8)?;
        self.vdu.refresh_sprites()?;
        Ok(())
    }

    fn load_audio_samples(&mut self) -> Result<(), RenderError> {
        self.vdu.audio_enable_channel(WOOSH_CHANNEL)?;
        self.vdu.audio_enable_channel(FANFARE_CHANNEL)?;
        self.vdu.audio_load_sample(WOOSH_SAMPLE, &synth_woosh())?;
        self.vdu
            .audio_set_waveform_sample(WOOSH_CHANNEL, WOOSH_SAMPLE)?;
        self.vdu
            .audio_load_sample(FANFARE_SAMPLE, &synth_fanfare())?;
        self.vdu
            .audio_set_waveform_sample(FANFARE_CHANNEL, FANFARE_SAMPLE)?;
        Ok(())
    }

    /// Upload a full image into the temp buffer in band-sized blocks and
    /// turn it into a bitmap. Block writes carry 16-bit lengths, so the
    /// image goes up one grid-row band at a time.
    fn upload_temp_image(&mut self, image: &PuzzleImage) -> Result<(), RenderError> {
        self.vdu.buffer_clear(TEMP_IMAGE_BUFFER)?;
        for row in 0..GRID_SIZE {
            self.vdu
                .buffer_write_block(TEMP_IMAGE_BUFFER, image.row_band(row))?;
        }
        self.vdu.buffer_consolidate(TEMP_IMAGE_BUFFER)?;
        self.vdu.select_buffer_bitmap(TEMP_IMAGE_BUFFER)?;
        self.vdu.bitmap_from_buffer(
            IMAGE_WIDTH as u16,
            IMAGE_HEIGHT as u16,
            RGBA2222_FORMAT,
        )?;
        Ok(())
    }
}

impl<W: Write> Renderer for VduRenderer<W> {
    fn init(&mut self) -> Result<(), RenderError> {
        debug!("vdu renderer: init, mode {}", SCREEN_MODE);
        self.vdu.set_mode(SCREEN_MODE)?;
        self.vdu.cursor_enable(false)?;
        self.vdu.clear_screen()?;
        self.vdu.set_pixel_coordinates()?;
        self.vdu.reset_sprites()?;
        self.vdu.set_system_variable(SYSVAR_TRANSFORMS, 1)?;
        self.vdu
            .transform_scale(SCALE_MATRIX_BUFFER, ICON_SCALE_FACTOR, ICON_SCALE_SHIFT)?;
        self.load_audio_samples()?;
        self.upload_label_sprites()?;
        self.vdu.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), RenderError> {
        self.vdu.cursor_enable(true)?;
        self.vdu.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        self.vdu.flush()?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), RenderError> {
        self.vdu.clear_screen()?;
        Ok(())
    }

    fn set_text_colour(&mut self, colour: TextColour) -> Result<(), RenderError> {
        self.vdu.set_text_colour(colour.code())?;
        Ok(())
    }

    fn cursor_tab(&mut self, x: u8, y: u8) -> Result<(), RenderError> {
        self.vdu.cursor_tab(x, y)?;
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), RenderError> {
        self.vdu.print(text)?;
        Ok(())
    }

    fn upload_image(&mut self, image: &PuzzleImage) -> Result<(), RenderError> {
        debug!("vdu renderer: uploading image and slicing tiles");
        for band in 0..GRID_SIZE as u16 {
            self.vdu.buffer_clear(BAND_BUFFER_BASE + band)?;
        }
        for tile in 0..GRID_SIZE as u16 * GRID_SIZE as u16 {
            self.vdu.buffer_clear(TILE_BUFFER_BASE + tile)?;
        }

        // one band per grid row, split by width into the four tiles
        for row in 0..GRID_SIZE {
            let band = image.row_band(row);
            debug_assert_eq!(band.len(), BAND_BYTES);
            let band_buffer = BAND_BUFFER_BASE + row as u16;
            self.vdu.buffer_write_block(band_buffer, band)?;
            self.vdu.buffer_split_by_width(
                band_buffer,
                TILE_WIDTH as u16,
                GRID_SIZE as u16,
                TILE_BUFFER_BASE + (row * GRID_SIZE) as u16,
            )?;
        }

        for tile in 0..GRID_SIZE as u16 * GRID_SIZE as u16 {
            self.vdu.select_buffer_bitmap(TILE_BUFFER_BASE + tile)?;
            self.vdu
                .bitmap_from_buffer(TILE_WIDTH as u16, TILE_HEIGHT as u16, RGBA2222_FORMAT)?;
        }

        // band data is no longer needed once split
        for band in 0..GRID_SIZE as u16 {
            self.vdu.buffer_clear(BAND_BUFFER_BASE + band)?;
        }
        Ok(())
    }

    fn draw_tile(&mut self, tile: Tile, col: usize, row: usize) -> Result<(), RenderError> {
        self.vdu
            .select_buffer_bitmap(TILE_BUFFER_BASE + tile as u16)?;
        self.vdu
            .plot_bitmap((col * TILE_WIDTH) as i16, (row * TILE_HEIGHT) as i16)?;
        Ok(())
    }

    fn capture_region(&mut self, region: LaneRegion) -> Result<(), RenderError> {
        let (left, top, right, bottom) = match region {
            LaneRegion::Row(r) => (
                0,
                (r * TILE_HEIGHT) as u16,
                IMAGE_WIDTH as u16 - 1,
                ((r + 1) * TILE_HEIGHT) as u16 - 1,
            ),
            LaneRegion::Column(c) => (
                (c * TILE_WIDTH) as u16,
                0,
                ((c + 1) * TILE_WIDTH) as u16 - 1,
                IMAGE_HEIGHT as u16 - 1,
            ),
        };
        self.vdu.move_to(left, top)?;
        self.vdu.move_to(right, bottom)?;
        self.vdu.capture_bitmap(CAPTURE_BITMAP)?;
        self.vdu.select_bitmap(CAPTURE_BITMAP)?;
        Ok(())
    }

    fn draw_captured(&mut self, x: i16, y: i16) -> Result<(), RenderError> {
        self.vdu.plot_bitmap(x, y)?;
        Ok(())
    }

    fn prepare_thumbnail(&mut self, slot: usize, image: &PuzzleImage) -> Result<(), RenderError> {
        debug!("vdu renderer: icon for slot {}", slot);
        self.upload_temp_image(image)?;
        self.vdu.transformed_bitmap(
            ICON_BUFFER_BASE + slot as u16,
            TRANSFORM_OPT_RESIZE,
            SCALE_MATRIX_BUFFER,
            TEMP_IMAGE_BUFFER,
        )?;
        // source pixels are not needed once the icon exists
        self.vdu.buffer_clear(TEMP_IMAGE_BUFFER)?;
        Ok(())
    }

    fn draw_thumbnail(&mut self, slot: usize) -> Result<(), RenderError> {
        let (x, y) = thumbnail_origin(slot);
        self.vdu.select_buffer_bitmap(ICON_BUFFER_BASE + slot as u16)?;
        self.vdu.plot_bitmap(x as i16, y as i16)?;
        Ok(())
    }

    fn draw_highlight(&mut self, slot: usize, selected: bool) -> Result<(), RenderError> {
        let (x, y) = thumbnail_origin(slot);
        let colour = if selected { TextColour::Red.code() } else { 0 };
        self.vdu.set_graphics_colour(0, colour)?;
        self.vdu.rectangle(
            x,
            y,
            x + TILE_WIDTH as u16 - 1,
            y + TILE_HEIGHT as u16 - 1,
        )?;
        self.vdu.rectangle(
            x + 1,
            y + 1,
            x + TILE_WIDTH as u16 - 2,
            y + TILE_HEIGHT as u16 - 2,
        )?;
        Ok(())
    }

    fn draw_transformed_thumbnail(
        &mut self,
        slot: usize,
        degrees: u16,
        scale: f32,
        x: i16,
        y: i16,
    ) -> Result<(), RenderError> {
        self.vdu.buffer_clear(SPIN_BITMAP_BUFFER)?;
        self.vdu.buffer_clear(SPIN_MATRIX_BUFFER)?;
        self.vdu.transform_rotate_deg(SPIN_MATRIX_BUFFER, degrees % 360)?;
        // half-step fixed point: one fractional bit
        let factor = (scale * 2.0).round().max(1.0) as u16;
        self.vdu.transform_scale(SPIN_MATRIX_BUFFER, factor, 1)?;
        self.vdu.transformed_bitmap(
            SPIN_BITMAP_BUFFER,
            TRANSFORM_OPT_SPIN,
            SPIN_MATRIX_BUFFER,
            ICON_BUFFER_BASE + slot as u16,
        )?;
        self.vdu.select_buffer_bitmap(SPIN_BITMAP_BUFFER)?;
        self.vdu.plot_bitmap(x, y)?;
        Ok(())
    }

    fn set_controls_visible(&mut self, visible: bool) -> Result<(), RenderError> {
        for n in 0..LABEL_COUNT as u8 {
            self.vdu.select_sprite(n)?;
            if visible {
                self.vdu.show_sprite()?;
            } else {
                self.vdu.hide_sprite()?;
            }
        }
        self.vdu.refresh_sprites()?;
        Ok(())
    }

    fn play_sound(&mut self, cue: SoundCue) -> Result<(), RenderError> {
        match cue {
            SoundCue::Woosh => self.vdu.audio_play_sample(WOOSH_CHANNEL, 127)?,
            SoundCue::Fanfare => self.vdu.audio_play_sample(FANFARE_CHANNEL, 127)?,
            SoundCue::Note {
                frequency,
                duration_ms,
            } => self
                .vdu
                .audio_play_note(NOTE_CHANNEL, 127, frequency, duration_ms)?,
        }
        Ok(())
    }
}

/// Short decaying noise burst for the scroll sound, signed 8-bit PCM.
fn synth_woosh() -> Vec<u8> {
    const LEN: usize = 2000;
    let mut out = Vec::with_capacity(LEN);
    let mut lfsr: u16 = 0xACE1;
    for i in 0..LEN {
        lfsr = (lfsr >> 1) ^ (if lfsr & 1 != 0 { 0xB400 } else { 0 });
        let amp = (120 * (LEN - i) / LEN) as i32;
        let noise = (lfsr & 0xFF) as i32 - 128;
        out.push(((noise * amp) / 128) as i8 as u8);
    }
    out
}

/// Three-note rising fanfare for level completion, signed 8-bit PCM at the
/// platform's 16 kHz sample rate.
fn synth_fanfare() -> Vec<u8> {
    const RATE: usize = 16384;
    const NOTE_LEN: usize = RATE / 4;
    let mut out = Vec::with_capacity(3 * NOTE_LEN);
    for &freq in &[523usize, 659, 784] {
        let half_period = RATE / (2 * freq);
        for i in 0..NOTE_LEN {
            let fade = (NOTE_LEN - i) as i32;
            let level = (100 * fade / NOTE_LEN as i32).max(8);
            let sample = if (i / half_period) % 2 == 0 {
                level
            } else {
                -level
            };
            out.push(sample as i8 as u8);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::IMAGE_BYTES;

    fn renderer() -> VduRenderer<Vec<u8>> {
        VduRenderer::new(Vec::new())
    }

    fn flat_image() -> PuzzleImage {
        PuzzleImage::from_bytes(vec![0xC3; IMAGE_BYTES]).unwrap()
    }

    #[test]
    fn draw_tile_selects_then_plots() {
        let mut r = renderer();
        r.draw_tile(5, 2, 1).unwrap();
        let bytes = r.into_sink();
        // select buffer bitmap 45, then plot at (160, 60)
        assert_eq!(
            bytes,
            vec![23, 27, 0x20, 45, 0, 23, 27, 3, 160, 0, 60, 0]
        );
    }

    #[test]
    fn upload_image_splits_each_band_into_four_tiles() {
        let mut r = renderer();
        r.upload_image(&flat_image()).unwrap();
        let bytes = r.into_sink();
        let split_count = bytes
            .windows(3)
            .filter(|w| *w == [20u8, 80, 0])
            .count();
        // four split-by-width commands, width 80
        assert!(split_count >= 4);
    }

    #[test]
    fn capture_row_brackets_the_full_width() {
        let mut r = renderer();
        r.capture_region(LaneRegion::Row(2)).unwrap();
        let bytes = r.into_sink();
        // move to (0,120); move to (319,179); capture into 30; select 30
        let mut expected = vec![25, 4, 0, 0, 120, 0];
        expected.extend([25, 4, 63, 1, 179, 0]);
        expected.extend([23, 27, 1, 30, 0, 0, 0]);
        expected.extend([23, 27, 0, 30]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn woosh_cue_plays_the_sample_channel() {
        let mut r = renderer();
        r.play_sound(SoundCue::Woosh).unwrap();
        let bytes = r.into_sink();
        assert_eq!(&bytes[..5], &[23, 0, 0x85, 3, 0]);
    }

    #[test]
    fn synth_samples_have_sensible_lengths() {
        assert_eq!(synth_woosh().len(), 2000);
        assert_eq!(synth_fanfare().len(), 3 * (16384 / 4));
    }
}
