use thiserror::Error;

use super::ShaderStage;

/// Fatal failure while preparing GL state for rendering.
///
/// Setup is all-or-nothing: when one of these is returned the renderer is
/// left without a program and the filter's initialisation hook has not run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("setup called on a renderer that is already set up")]
    AlreadySetUp,

    #[error("failed to create {stage:?} shader: {reason}")]
    ShaderCreate { stage: ShaderStage, reason: String },

    #[error("could not compile {stage:?} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("failed creating program: {0}")]
    ProgramCreate(String),

    #[error("could not link program: {0}")]
    Link(String),

    #[error("could not get attrib location for {0}")]
    MissingAttribute(&'static str),

    #[error("could not get uniform location for {0}")]
    MissingUniform(&'static str),

    #[error("failed to allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },
}

/// Failure to issue a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum DrawError {
    #[error("draw called before setup completed")]
    NotSetUp,
}
