//! Shader/program helpers and error checkpoints.

use super::{Gl, NO_ERROR, ProgramId, SetupError, ShaderId, ShaderStage};

/// Reads one pending GL error and logs it against `label`.
///
/// Returns the error code, or `None` when the flag was clear. Purely
/// diagnostic: callers continue regardless.
pub fn check_gl_error(gl: &dyn Gl, label: &str) -> Option<u32> {
    let error = gl.get_error();
    if error == NO_ERROR {
        return None;
    }
    log::error!("{label}: glError 0x{error:04x}");
    Some(error)
}

/// Reads and discards one pending GL error.
///
/// Used after calls known to raise spurious errors on some drivers.
pub fn drain_gl_error(gl: &dyn Gl) {
    let error = gl.get_error();
    if error != NO_ERROR {
        log::trace!("ignored glError 0x{error:04x}");
    }
}

/// Creates and compiles a shader of `stage` from `source`.
pub fn compile_shader(gl: &dyn Gl, stage: ShaderStage, source: &str) -> Result<ShaderId, SetupError> {
    let shader = gl
        .create_shader(stage)
        .map_err(|reason| SetupError::ShaderCreate { stage, reason })?;
    check_gl_error(gl, "glCreateShader");

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.shader_compile_status(shader) {
        let info = gl.shader_info_log(shader);
        log::error!("could not compile {stage:?} shader: {info}");
        gl.delete_shader(shader);
        return Err(SetupError::ShaderCompile { stage, log: info });
    }

    Ok(shader)
}

/// Compiles both stages and links them into a program.
///
/// Intermediate shader objects are flagged for deletion once attached, and
/// the program is deleted again if linking fails.
pub fn create_program(
    gl: &dyn Gl,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<ProgramId, SetupError> {
    let vertex = compile_shader(gl, ShaderStage::Vertex, vertex_source)?;
    let fragment = match compile_shader(gl, ShaderStage::Fragment, fragment_source) {
        Ok(s) => s,
        Err(e) => {
            gl.delete_shader(vertex);
            return Err(e);
        }
    };

    let program = match gl.create_program() {
        Ok(p) => p,
        Err(reason) => {
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);
            return Err(SetupError::ProgramCreate(reason));
        }
    };
    check_gl_error(gl, "glCreateProgram");

    gl.attach_shader(program, vertex);
    check_gl_error(gl, "glAttachShader");
    gl.attach_shader(program, fragment);
    check_gl_error(gl, "glAttachShader");
    gl.link_program(program);

    // Attached shaders stay alive until the program is deleted.
    gl.delete_shader(vertex);
    gl.delete_shader(fragment);

    if !gl.program_link_status(program) {
        let info = gl.program_info_log(program);
        log::error!("could not link program: {info}");
        gl.delete_program(program);
        return Err(SetupError::Link(info));
    }

    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{GlCall, INVALID_ENUM, RecordingGl};

    const VS: &str = "attribute vec4 aPosition;\nvoid main() { gl_Position = aPosition; }\n";
    const FS: &str = "precision mediump float;\nvoid main() { gl_FragColor = vec4(1.0); }\n";

    // ── check_gl_error ────────────────────────────────────────────────────

    #[test]
    fn check_returns_none_when_clear() {
        let gl = RecordingGl::new();
        assert_eq!(check_gl_error(&gl, "noop"), None);
    }

    #[test]
    fn check_returns_pending_code_once() {
        let gl = RecordingGl::new();
        gl.push_error(INVALID_ENUM);
        assert_eq!(check_gl_error(&gl, "first"), Some(INVALID_ENUM));
        assert_eq!(check_gl_error(&gl, "second"), None);
    }

    #[test]
    fn drain_consumes_one_error() {
        let gl = RecordingGl::new();
        gl.push_error(INVALID_ENUM);
        drain_gl_error(&gl);
        assert_eq!(gl.get_error(), NO_ERROR);
    }

    // ── create_program ────────────────────────────────────────────────────

    #[test]
    fn create_program_links_valid_sources() {
        let gl = RecordingGl::new();
        let program = create_program(&gl, VS, FS).unwrap();
        assert!(gl.calls().contains(&GlCall::LinkProgram(program)));
        assert_eq!(gl.attrib_location(program, "aPosition"), Some(0));
        assert_eq!(gl.live_programs(), 1);
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn compile_failure_reports_stage_and_cleans_up() {
        let gl = RecordingGl::new();
        gl.fail_compile(ShaderStage::Fragment);
        let err = create_program(&gl, VS, FS).unwrap_err();
        assert!(matches!(err, SetupError::ShaderCompile { stage: ShaderStage::Fragment, .. }));
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn link_failure_deletes_program() {
        let gl = RecordingGl::new();
        gl.fail_link();
        let err = create_program(&gl, VS, FS).unwrap_err();
        assert!(matches!(err, SetupError::Link(_)));
        assert_eq!(gl.live_programs(), 0);
    }
}
