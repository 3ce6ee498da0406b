use anyhow::Result;
use crossterm::{queue, style::ResetColor};
use std::io::Write;

use super::sink::RenderSink;

/// Console attribute order (bit 0 blue, bit 2 red) to ANSI order (bit 0 red, bit 2 blue).
#[inline(always)]
pub fn console_to_ansi(index: u8) -> u8 {
    (index & 0b1010) | ((index & 0b0001) << 2) | ((index & 0b0100) >> 2)
}

/// SGR foreground code for a console color: 30-37, or 90-97 when bright
#[inline(always)]
fn fg_code(index: u8) -> u8 {
    let ansi = console_to_ansi(index & 0x0F);
    if ansi & 0b1000 != 0 {
        90 + (ansi & 0b0111)
    } else {
        30 + ansi
    }
}

/// SGR background code: 40-47, or 100-107 when bright
#[inline(always)]
fn bg_code(index: u8) -> u8 {
    fg_code(index) + 10
}

/// Writes cells as 16-color ANSI escape sequences.
///
/// Rows are buffered and written on each newline. Colors are only re-sent
/// when they change, and attributes are reset at the end of every row and
/// when the sink is dropped.
pub struct AnsiSink<W: Write> {
    out: W,
    render_buffer: Vec<u8>,
    last_colors: Option<(u8, u8)>,
}

impl<W: Write> AnsiSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            render_buffer: Vec::with_capacity(16 * 1024),
            last_colors: None,
        }
    }

    // Helper for zero-allocation integer writing
    #[inline(always)]
    fn write_u8_fast(buffer: &mut Vec<u8>, mut n: u8) {
        if n >= 100 {
            buffer.push(b'0' + (n / 100));
            n %= 100;
            buffer.push(b'0' + (n / 10));
            n %= 10;
            buffer.push(b'0' + n);
        } else if n >= 10 {
            buffer.push(b'0' + (n / 10));
            n %= 10;
            buffer.push(b'0' + n);
        } else {
            buffer.push(b'0' + n);
        }
    }

    /// Write any buffered partial row and flush the underlying writer.
    pub fn finish(&mut self) -> Result<()> {
        self.out.write_all(&self.render_buffer)?;
        self.render_buffer.clear();
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> RenderSink for AnsiSink<W> {
    fn emit(&mut self, glyph: char, fg: u8, bg: u8) -> Result<()> {
        let buffer = &mut self.render_buffer;

        if self.last_colors != Some((fg, bg)) {
            // \x1b[FG;BGm
            buffer.extend_from_slice(b"\x1b[");
            Self::write_u8_fast(buffer, fg_code(fg));
            buffer.push(b';');
            Self::write_u8_fast(buffer, bg_code(bg));
            buffer.push(b'm');
            self.last_colors = Some((fg, bg));
        }

        let mut b_dst = [0u8; 4];
        buffer.extend_from_slice(glyph.encode_utf8(&mut b_dst).as_bytes());
        Ok(())
    }

    fn emit_newline(&mut self) -> Result<()> {
        // Reset before the line break so the background doesn't bleed to the edge
        self.render_buffer.extend_from_slice(b"\x1b[0m\n");
        self.last_colors = None;

        self.out.write_all(&self.render_buffer)?;
        self.render_buffer.clear();
        Ok(())
    }
}

impl<W: Write> Drop for AnsiSink<W> {
    fn drop(&mut self) {
        let _ = self.out.write_all(&self.render_buffer);
        let _ = queue!(self.out, ResetColor);
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_to_ansi_swaps_red_and_blue() {
        assert_eq!(console_to_ansi(0), 0); // black
        assert_eq!(console_to_ansi(1), 4); // blue
        assert_eq!(console_to_ansi(2), 2); // green
        assert_eq!(console_to_ansi(3), 6); // cyan
        assert_eq!(console_to_ansi(4), 1); // red
        assert_eq!(console_to_ansi(6), 3); // yellow
        assert_eq!(console_to_ansi(9), 12); // bright blue
        assert_eq!(console_to_ansi(12), 9); // bright red
        assert_eq!(console_to_ansi(15), 15);
    }

    #[test]
    fn test_sgr_codes() {
        assert_eq!(fg_code(0), 30);
        assert_eq!(fg_code(4), 31);
        assert_eq!(fg_code(7), 37);
        assert_eq!(fg_code(8), 90);
        assert_eq!(fg_code(12), 91);
        assert_eq!(fg_code(15), 97);
        assert_eq!(bg_code(1), 44);
        assert_eq!(bg_code(15), 107);
    }

    #[test]
    fn test_colors_sent_only_on_change() {
        let mut out = Vec::new();
        {
            let mut sink = AnsiSink::new(&mut out);
            sink.emit('\u{2588}', 15, 0).unwrap();
            sink.emit('\u{2588}', 15, 0).unwrap();
            sink.emit(' ', 4, 1).unwrap();
            sink.emit_newline().unwrap();
            sink.emit(' ', 4, 1).unwrap();
            sink.emit_newline().unwrap();
            sink.finish().unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[97;40m\u{2588}\u{2588}\x1b[31;44m \x1b[0m\n"));
        // colors are re-sent after a newline reset
        assert!(text.contains("\x1b[0m\n\x1b[31;44m \x1b[0m\n"));
        assert_eq!(text.matches("\x1b[97;40m").count(), 1);
    }

    #[test]
    fn test_partial_row_written_on_drop() {
        let mut out = Vec::new();
        {
            let mut sink = AnsiSink::new(&mut out);
            sink.emit('x', 7, 0).unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[37;40mx"));
        assert!(text.ends_with("\x1b[0m"));
    }
}
