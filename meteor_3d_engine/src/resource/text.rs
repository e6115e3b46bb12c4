/// Text resources and the tokenizer the parsers share.

use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::resource::resource_root;

/// Longest accepted line in a text resource, in bytes
pub const LINE_MAX_CHAR_COUNT: usize = 4096;

/// A text file loaded into one contiguous buffer, with its line count.
///
/// The model/material/scene parsers take the data as `&str`; the line
/// count pre-sizes their per-line work buffers.
pub struct TextResource {
    file: String,
    data: String,
    line_count: usize,
}

impl TextResource {
    /// Load `<resource root>/<relative>`.
    ///
    /// # Errors
    ///
    /// `FileOpen` when the file cannot be read, `ResourceTooLarge` when a
    /// line exceeds [`LINE_MAX_CHAR_COUNT`].
    pub fn create(relative: &str) -> Result<Self> {
        let path = resource_root().join(relative);
        let resource = Self::load(&path, relative)?;

        crate::engine_info!("meteor3d::Resource", "Resource '{}' loaded", relative);

        Ok(resource)
    }

    /// Load from an explicit path; `name` labels the resource in errors.
    pub fn load(path: &Path, name: &str) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|io| {
            crate::engine_err!(
                "meteor3d::Resource",
                Error::FileOpen {
                    path: path.display().to_string(),
                    message: io.to_string(),
                }
            )
        })?;

        let mut data = String::new();
        let mut line_count = 0;

        for line in BufReader::new(file).lines() {
            let line = line.map_err(|io| {
                crate::engine_err!(
                    "meteor3d::Resource",
                    Error::FileOpen {
                        path: path.display().to_string(),
                        message: io.to_string(),
                    }
                )
            })?;

            if line.len() > LINE_MAX_CHAR_COUNT {
                crate::engine_bail!(
                    "meteor3d::Resource",
                    Error::ResourceTooLarge(format!(
                        "'{}' line {} exceeds {} characters",
                        name,
                        line_count + 1,
                        LINE_MAX_CHAR_COUNT
                    ))
                );
            }

            data.push_str(&line);
            data.push('\n');
            line_count += 1;
        }

        Ok(Self {
            file: name.to_string(),
            data,
            line_count,
        })
    }

    /// Wrap an in-memory string (tests, embedded defaults)
    pub fn from_string(name: &str, data: &str) -> Self {
        Self {
            file: name.to_string(),
            data: data.to_string(),
            line_count: data.lines().count(),
        }
    }

    /// Resource name relative to the resource root
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The concatenated file content
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Number of lines in the file
    pub fn line_count(&self) -> usize {
        self.line_count
    }
}

/// Split `source` on `separator`, yielding at most `max` non-empty views.
///
/// Views borrow from `source`; nothing is allocated per token beyond the
/// output vector. Consecutive separators produce no empty tokens, so
/// joining the result with the separator reproduces the source exactly
/// whenever the source had no leading/trailing/doubled separators.
pub fn tokenize<'a>(source: &'a str, separator: &str, max: usize) -> Vec<&'a str> {
    let mut tokens = Vec::new();

    for token in source.split(separator) {
        if tokens.len() == max {
            break;
        }
        if !token.is_empty() {
            tokens.push(token);
        }
    }

    tokens
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
