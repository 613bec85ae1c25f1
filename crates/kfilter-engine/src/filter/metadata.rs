use std::fmt;
use std::sync::Arc;

use crate::gl::{Gl, ProgramId, UniformLocation};

/// Uniform carrying the frame time in milliseconds (`uniform int`).
pub const FRAME_TIME_UNIFORM: &str = "kfilterTime";

/// Value uploaded to a metadata uniform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Metadata {
    Uniform1i(i32),
    Uniform1f(f32),
}

type Compute = Arc<dyn Fn(u64) -> Metadata + Send + Sync>;

#[derive(Clone)]
struct Entry {
    name: String,
    compute: Compute,
    location: Option<UniformLocation>,
}

/// Per-frame uniforms derived from the frame time.
///
/// Names absent from the program are skipped with a warning; a shader does
/// not have to consume every value the provider offers.
#[derive(Clone, Default)]
pub struct MetadataProvider {
    entries: Vec<Entry>,
}

impl fmt::Debug for MetadataProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (&e.name, e.location)))
            .finish()
    }
}

impl MetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider offering [`FRAME_TIME_UNIFORM`].
    pub fn with_frame_time() -> Self {
        // GL has no 64-bit ints; wraps after ~24 days like any int clock would.
        Self::new().with(FRAME_TIME_UNIFORM, |ms| Metadata::Uniform1i(ms as i32))
    }

    /// Adds (or replaces) the uniform `name`.
    pub fn with<F>(mut self, name: &str, compute: F) -> Self
    where
        F: Fn(u64) -> Metadata + Send + Sync + 'static,
    {
        let compute: Compute = Arc::new(compute);
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(e) => {
                e.compute = compute;
                e.location = None;
            }
            None => self.entries.push(Entry { name: name.to_owned(), compute, location: None }),
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Resolves every uniform against `program`.
    pub fn initialise(&mut self, gl: &dyn Gl, program: ProgramId) {
        for e in &mut self.entries {
            e.location = gl.uniform_location(program, &e.name);
            if e.location.is_none() {
                log::warn!(
                    "ignored uniform named {} as it was not present in the program",
                    e.name
                );
            }
        }
    }

    /// Uploads every resolved uniform for `frame_time_ms`.
    pub fn apply(&self, gl: &dyn Gl, frame_time_ms: u64) {
        for e in &self.entries {
            let Some(location) = e.location else { continue };
            match (e.compute)(frame_time_ms) {
                Metadata::Uniform1i(v) => gl.uniform_1i(location, v),
                Metadata::Uniform1f(v) => gl.uniform_1f(location, v),
            }
        }
    }

    /// Forgets resolved locations (they belong to a single program).
    pub fn reset(&mut self) {
        for e in &mut self.entries {
            e.location = None;
        }
    }
}
