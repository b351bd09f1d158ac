//! Screen writer: redraw a region in place, or append static blocks.
//!
//! The live region sits below the cursor's starting row. Each frame moves
//! back to the top of the previous frame, erases downwards and prints the
//! new lines. Append mode writes plain text only, since the sink is a pipe
//! or a log.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveToPreviousLine, Show};
use crossterm::queue;
use crossterm::style::{Print, PrintStyledContent, StyledContent};
use crossterm::terminal::{Clear, ClearType};
use ratatui::backend::IntoCrossterm;
use ratatui::style::Style;
use ratatui::text::Line;
use tracing::trace;

use super::sink::Sink;

pub struct Screen {
    sink: Sink,
    live: bool,
    /// Lines of the frame currently on screen (live mode).
    height: usize,
    cursor_hidden: bool,
}

impl Screen {
    pub fn new(sink: Sink, live: bool) -> Self {
        Self {
            sink,
            live,
            height: 0,
            cursor_hidden: false,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn width(&self) -> u16 {
        self.sink.width()
    }

    /// Replace the live region with `frame`.
    ///
    /// Frames taller than the terminal are cropped to its height minus one
    /// row; the cursor cannot move back over lines that scrolled away.
    pub fn draw(&mut self, frame: &[Line<'static>]) -> io::Result<()> {
        let frame = match self.sink.height() {
            Some(rows) if frame.len() >= usize::from(rows) => {
                let keep = usize::from(rows.saturating_sub(1));
                trace!(lines = frame.len(), keep, "cropping frame to terminal");
                &frame[..keep]
            }
            _ => frame,
        };
        if !self.cursor_hidden {
            queue!(self.sink, Hide)?;
            self.cursor_hidden = true;
        }
        self.erase()?;
        for line in frame {
            write_styled(&mut self.sink, line)?;
            queue!(self.sink, Print("\r\n"))?;
        }
        self.height = frame.len();
        self.sink.flush()
    }

    /// Append lines below everything written so far.
    pub fn append(&mut self, lines: &[Line<'static>]) -> io::Result<()> {
        for line in lines {
            writeln!(self.sink, "{line}")?;
        }
        self.sink.flush()
    }

    /// End of session: optionally clear the live region, restore the cursor.
    pub fn finish(&mut self, clear: bool) -> io::Result<()> {
        if self.live && clear {
            self.erase()?;
        }
        if self.cursor_hidden {
            queue!(self.sink, Show)?;
            self.cursor_hidden = false;
        }
        self.sink.flush()
    }

    fn erase(&mut self) -> io::Result<()> {
        if self.height == 0 {
            return Ok(());
        }
        let rows = u16::try_from(self.height).unwrap_or(u16::MAX);
        queue!(self.sink, MoveToPreviousLine(rows), Clear(ClearType::FromCursorDown))?;
        self.height = 0;
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        // Unwinding out of a render pass must not leave the cursor hidden.
        if self.cursor_hidden {
            let _ = queue!(self.sink, Show);
            let _ = self.sink.flush();
        }
    }
}

fn write_styled(w: &mut impl Write, line: &Line<'static>) -> io::Result<()> {
    for span in &line.spans {
        if span.style == Style::default() {
            queue!(w, Print(span.content.as_ref()))?;
        } else {
            let styled = StyledContent::new(span.style.into_crossterm(), span.content.as_ref());
            queue!(w, PrintStyledContent(styled))?;
        }
    }
    Ok(())
}
