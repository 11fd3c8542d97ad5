/// ShaderSource - split a combined `.shader` file into its two stages
///
/// Format: a line containing `#shader` is a marker. If it also contains
/// `vertex` the following lines go to the vertex stage, else if it contains
/// `fragment` they go to the fragment stage. Any other marker closes the
/// current section. Lines outside a section are dropped; marker lines never
/// reach either stage.

use std::path::Path;

use crate::error::{Error, Result};
use crate::graphics_device::ShaderStage;

const MARKER: &str = "#shader";

/// Vertex and fragment source text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    /// Parse combined source text
    ///
    /// # Example
    ///
    /// ```
    /// use quad_engine::quad::resource::ShaderSource;
    ///
    /// let source = ShaderSource::parse("#shader vertex\nA\n#shader fragment\nB\n");
    /// assert_eq!(source.vertex, "A\n");
    /// assert_eq!(source.fragment, "B\n");
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut source = ShaderSource::default();
        let mut active: Option<ShaderStage> = None;

        for line in text.lines() {
            if let Some(position) = line.find(MARKER) {
                active = stage_of_marker(&line[position + MARKER.len()..]);
                if active.is_none() {
                    crate::engine_warn!(
                        "quad::Shader",
                        "Unrecognized stage marker '{}', skipping section",
                        line.trim()
                    );
                }
                continue;
            }

            let target = match active {
                Some(ShaderStage::Vertex) => &mut source.vertex,
                Some(ShaderStage::Fragment) => &mut source.fragment,
                None => continue,
            };
            target.push_str(line);
            target.push('\n');
        }

        source
    }

    /// Read and parse a combined source file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            crate::engine_error!(
                "quad::Shader",
                "Failed to read shader source '{}': {}",
                path.display(),
                e
            );
            Error::ShaderSourceRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        Ok(Self::parse(&text))
    }

    /// Source text of one stage
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// Stage named after the marker; `vertex` is checked before `fragment`
fn stage_of_marker(rest: &str) -> Option<ShaderStage> {
    if rest.contains("vertex") {
        Some(ShaderStage::Vertex)
    } else if rest.contains("fragment") {
        Some(ShaderStage::Fragment)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "shader_source_tests.rs"]
mod tests;
