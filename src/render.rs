//! Text layout of the output document.
//!
//! ```text
//! =====...
//! DIRECTORY STRUCTURE
//! =====...
//!
//! a.py
//! pkg/b.py
//!
//! =====...
//! FILE CONTENTS
//! =====...
//!
//! =====...
//! ФАЙЛ: a.py
//! =====...
//!
//! <content>
//!
//! =====...
//! END OF FILE CONTENTS
//! ```

use crate::types::FileEntry;
use std::io::{self, Write};

pub const BANNER: &str =
    "=============================================================================";
pub const STRUCTURE_LABEL: &str = "DIRECTORY STRUCTURE";
pub const CONTENTS_LABEL: &str = "FILE CONTENTS";
pub const FILE_LABEL: &str = "ФАЙЛ:";
pub const CLOSING_LABEL: &str = "END OF FILE CONTENTS";

/// Append-only writer for the aggregated document
pub struct OutputDocument<W: Write> {
    out: W,
}

impl<W: Write> OutputDocument<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn section_header(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "{}", BANNER)?;
        writeln!(self.out, "{}", label)?;
        writeln!(self.out, "{}", BANNER)
    }

    pub fn write_structure(&mut self, files: &[FileEntry]) -> io::Result<()> {
        self.section_header(STRUCTURE_LABEL)?;
        writeln!(self.out)?;
        for file in files {
            writeln!(self.out, "{}", file.rel_path)?;
        }
        writeln!(self.out)
    }

    pub fn begin_contents(&mut self) -> io::Result<()> {
        self.section_header(CONTENTS_LABEL)
    }

    fn file_heading(&mut self, rel_path: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", BANNER)?;
        writeln!(self.out, "{} {}", FILE_LABEL, rel_path)?;
        writeln!(self.out, "{}", BANNER)?;
        writeln!(self.out)
    }

    pub fn write_file_block(&mut self, rel_path: &str, content: &str) -> io::Result<()> {
        self.file_heading(rel_path)?;
        self.out.write_all(content.as_bytes())?;
        writeln!(self.out)?;
        writeln!(self.out)
    }

    /// Same framing as a file block, with an error note in place of the content
    pub fn write_error_block(
        &mut self,
        rel_path: &str,
        reason: &dyn std::fmt::Display,
    ) -> io::Result<()> {
        self.write_file_block(rel_path, &format!("[ERROR: {}]", reason))
    }

    /// Writes the closing marker and hands back the sink, flushed.
    pub fn finish(mut self) -> io::Result<W> {
        writeln!(self.out, "{}", BANNER)?;
        writeln!(self.out, "{}", CLOSING_LABEL)?;
        self.out.flush()?;
        Ok(self.out)
    }
}
