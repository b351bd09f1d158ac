//! Output sinks: the real terminal, or an in-memory buffer.

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::tty::IsTty;
use parking_lot::Mutex;

const DEFAULT_WIDTH: u16 = 80;

/// Where a display writes, and whether that place can redraw in place.
pub struct Sink {
    writer: Box<dyn Write + Send>,
    interactive: bool,
    /// Ask the terminal for its size when no explicit size is set.
    terminal: bool,
    width: Option<u16>,
    height: Option<u16>,
}

impl Sink {
    /// Standard output. Interactive when stdout is a TTY.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let interactive = out.is_tty();
        Self {
            writer: Box::new(out),
            interactive,
            terminal: true,
            width: None,
            height: None,
        }
    }

    /// Any writer, with an explicit interactivity flag.
    pub fn writer(writer: impl Write + Send + 'static, interactive: bool) -> Self {
        Self {
            writer: Box::new(writer),
            interactive,
            terminal: false,
            width: Some(DEFAULT_WIDTH),
            height: None,
        }
    }

    /// In-memory sink plus a handle for reading what was written.
    pub fn buffer(interactive: bool) -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Self::writer(buffer.clone(), interactive), buffer)
    }

    #[cfg(test)]
    pub(crate) fn with_height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Width in columns; the terminal size when unset, 80 if that fails.
    pub fn width(&self) -> u16 {
        self.width
            .or_else(|| self.terminal_size().map(|(w, _)| w))
            .unwrap_or(DEFAULT_WIDTH)
    }

    /// Height in rows. `None` means unbounded (buffers, or no terminal).
    pub fn height(&self) -> Option<u16> {
        self.height.or_else(|| self.terminal_size().map(|(_, h)| h))
    }

    fn terminal_size(&self) -> Option<(u16, u16)> {
        if self.terminal {
            crossterm::terminal::size().ok()
        } else {
            None
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Clonable byte buffer; all clones see the same bytes.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_clones_share_bytes() {
        let (mut sink, buffer) = Sink::buffer(false);
        assert!(buffer.is_empty());
        write!(sink, "hello").unwrap();
        assert_eq!(buffer.contents(), "hello");
        assert!(!sink.is_interactive());
    }

    #[test]
    fn buffers_have_fixed_width_and_no_height() {
        let (sink, _) = Sink::buffer(true);
        assert_eq!(sink.width(), DEFAULT_WIDTH);
        assert_eq!(sink.height(), None);
        assert_eq!(sink.with_height(12).height(), Some(12));
    }
}
