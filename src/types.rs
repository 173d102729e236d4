use std::path::PathBuf;

/// A matched input file, alive only until its block has been written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Relative to the scan root, always with forward slashes
    pub rel_path: String,
    pub abs_path: PathBuf,
}

/// What a finished run reports back to the operator
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub files_written: usize,
    pub fallback_decoded: usize,
    pub unreadable: usize,
}

impl RunSummary {
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "Done: {} file(s) written to {}",
            self.files_written,
            self.output.display()
        );
        if self.fallback_decoded > 0 || self.unreadable > 0 {
            line.push_str(&format!(
                " ({} decoded with fallback encoding, {} unreadable)",
                self.fallback_decoded, self.unreadable
            ));
        }
        line
    }
}
