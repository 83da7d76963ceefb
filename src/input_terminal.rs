//! Terminal key source
//!
//! Turns crossterm's event stream into the game's key model. Raw mode is
//! entered lazily on the first read and always released on drop. When
//! stdin is a pipe rather than a terminal (scripted playback, CI), keys
//! are read byte-by-byte from the pipe instead.

use crate::input::{Key, KeySource};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use log::debug;
use std::io::{self, Read};

pub struct TerminalKeys {
    in_raw_mode: bool,
}

impl TerminalKeys {
    pub fn new() -> Self {
        TerminalKeys { in_raw_mode: false }
    }

    fn ensure_raw_mode(&mut self) -> Result<(), String> {
        if !self.in_raw_mode {
            terminal::enable_raw_mode()
                .map_err(|e| format!("failed to enable raw mode: {}", e))?;
            self.in_raw_mode = true;
        }
        Ok(())
    }

    fn release_raw_mode(&mut self) {
        if self.in_raw_mode {
            let _ = terminal::disable_raw_mode();
            self.in_raw_mode = false;
        }
    }

    /// Byte-at-a-time reads for piped stdin; EOF ends the session.
    fn read_piped(&self) -> Result<Key, String> {
        let mut byte = [0u8; 1];
        loop {
            let n = io::stdin()
                .read(&mut byte)
                .map_err(|e| format!("failed to read input: {}", e))?;
            if n == 0 {
                return Err("end of piped input".to_string());
            }
            match byte[0] {
                0x1b => return Ok(Key::Escape),
                b'\n' | b'\r' => return Ok(Key::Enter),
                b if b.is_ascii_graphic() || b == b' ' => return Ok(Key::Char(b as char)),
                other => debug!("ignoring piped byte {:#04x}", other),
            }
        }
    }
}

impl Default for TerminalKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<Key, String> {
        if !atty::is(atty::Stream::Stdin) {
            return self.read_piped();
        }

        self.ensure_raw_mode()?;
        loop {
            let ev = event::read().map_err(|e| format!("event read error: {}", e))?;
            let Event::Key(key) = ev else { continue };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char(c) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                        return Err("interrupted by Ctrl+C".to_string());
                    }
                    // crossterm already applies shift to the character
                    return Ok(Key::Char(c));
                }
                KeyCode::Enter => return Ok(Key::Enter),
                KeyCode::Esc => return Ok(Key::Escape),
                KeyCode::Left => return Ok(Key::Left),
                KeyCode::Right => return Ok(Key::Right),
                other => debug!("ignoring key {:?}", other),
            }
        }
    }
}

impl Drop for TerminalKeys {
    fn drop(&mut self) {
        self.release_raw_mode();
    }
}
