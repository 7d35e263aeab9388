//! Frame File Naming
//!
//! ```text
//! chaos, all mode     fractal_chaosgame_gen{g}.{ext}   reverse_fractal_chaosgame_gen{g}.{ext}
//! chaos, final mode   fractal_chaosgame.{ext}          reverse_fractal_chaosgame.{ext}
//! ifs8                {name_base}_gen{g}.{ext}
//! ```
//!
//! License: MIT

use std::path::{Path, PathBuf};

use crate::config::OutputFormat;

const CHAOS_STEM: &str = "fractal_chaosgame";
const REVERSE_PREFIX: &str = "reverse_";

/// Builds output paths under one directory
#[derive(Debug, Clone, PartialEq)]
pub struct FrameNamer {
    out_dir: PathBuf,
    format: OutputFormat,
}

impl FrameNamer {
    pub fn new(out_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            out_dir: out_dir.into(),
            format,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn file(&self, stem: String) -> PathBuf {
        self.out_dir.join(format!("{}.{}", stem, self.format.extension()))
    }

    fn chaos_stem(generation: Option<usize>) -> String {
        match generation {
            Some(g) => format!("{}_gen{}", CHAOS_STEM, g),
            None => CHAOS_STEM.to_string(),
        }
    }

    /// Forward chaos game frame; `None` names the final-mode frame
    pub fn chaos_forward(&self, generation: Option<usize>) -> PathBuf {
        self.file(Self::chaos_stem(generation))
    }

    /// Reverse chaos game frame; `None` names the final-mode frame
    pub fn chaos_reverse(&self, generation: Option<usize>) -> PathBuf {
        self.file(format!("{}{}", REVERSE_PREFIX, Self::chaos_stem(generation)))
    }

    /// Subdivision frame for generation `g`
    pub fn subdivision(&self, name_base: &str, generation: usize) -> PathBuf {
        self.file(format!("{}_gen{}", name_base, generation))
    }
}
