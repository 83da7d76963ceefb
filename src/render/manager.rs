//! Renderer construction and mode selection
//!
//! Decides which renderer adapter to build: the VDU byte-stream adapter
//! when driving real hardware (or a capture file), the crossterm preview
//! for interactive terminals, or the headless recorder when there is no
//! usable output at all.

use crate::render::terminal::TerminalRenderer;
use crate::render::vdu::VduRenderer;
use crate::render::headless::HeadlessRenderer;
use crate::render::{RenderError, Renderer};

use log::debug;
use std::fs::File;
use std::io;
use std::path::Path;

/// Display mode selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Terminal preview when interactive, headless otherwise
    #[default]
    Auto,
    /// Emit the coprocessor command stream to stdout
    Vdu,
    /// Emit the coprocessor command stream to a device or file
    VduTo(String),
    /// Force the crossterm preview
    Terminal,
    /// No output (tests, CI)
    Headless,
}

impl DisplayMode {
    /// Parse a mode name from config or the command line.
    pub fn parse(name: &str) -> Result<Self, String> {
        match name {
            "auto" => Ok(DisplayMode::Auto),
            "vdu" => Ok(DisplayMode::Vdu),
            "terminal" => Ok(DisplayMode::Terminal),
            "headless" => Ok(DisplayMode::Headless),
            other => Err(format!(
                "unknown display mode '{}' (expected auto, vdu, terminal or headless)",
                other
            )),
        }
    }
}

/// Display environment capabilities
#[derive(Debug)]
pub struct DisplayCapabilities {
    pub has_terminal: bool,
    pub is_interactive: bool,
}

impl DisplayCapabilities {
    /// Detect current environment capabilities
    pub fn detect() -> Self {
        Self {
            has_terminal: atty::is(atty::Stream::Stdout),
            is_interactive: atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout),
        }
    }

    pub fn supports_terminal(&self) -> bool {
        self.has_terminal && self.is_interactive
    }
}

/// Create a renderer for the requested mode.
pub fn create_renderer(mode: DisplayMode) -> Result<Box<dyn Renderer>, RenderError> {
    let caps = DisplayCapabilities::detect();
    debug!("display capabilities: {:?}, mode {:?}", caps, mode);

    let renderer: Box<dyn Renderer> = match mode {
        DisplayMode::Auto => {
            if caps.supports_terminal() {
                debug!("auto display: using terminal preview");
                Box::new(TerminalRenderer::new()?)
            } else {
                debug!("auto display: no interactive terminal, going headless");
                Box::new(HeadlessRenderer::new())
            }
        }
        DisplayMode::Vdu => Box::new(VduRenderer::new(io::stdout())),
        DisplayMode::VduTo(path) => {
            let file = File::create(Path::new(&path))
                .map_err(|e| RenderError::new(format!("cannot open '{}': {}", path, e)))?;
            Box::new(VduRenderer::new(file))
        }
        DisplayMode::Terminal => Box::new(TerminalRenderer::new()?),
        DisplayMode::Headless => Box::new(HeadlessRenderer::new()),
    };

    Ok(renderer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_parse() {
        assert_eq!(DisplayMode::parse("auto").unwrap(), DisplayMode::Auto);
        assert_eq!(DisplayMode::parse("vdu").unwrap(), DisplayMode::Vdu);
        assert_eq!(
            DisplayMode::parse("terminal").unwrap(),
            DisplayMode::Terminal
        );
        assert_eq!(
            DisplayMode::parse("headless").unwrap(),
            DisplayMode::Headless
        );
        assert!(DisplayMode::parse("ratatui").is_err());
    }

    #[test]
    fn headless_mode_always_constructs() {
        assert!(create_renderer(DisplayMode::Headless).is_ok());
    }
}
