use platformer_common::Vector2;
use std::io::{self, Write};

/// Writes one text line per frame: the label and where it was drawn.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn render(&mut self, frame: u64, label: &str, anchor: Vector2) -> io::Result<()> {
        write!(self.out, "frame {}: {} at ", frame, label)?;
        anchor.write_to(&mut self.out)?;
        writeln!(self.out)
    }
}
