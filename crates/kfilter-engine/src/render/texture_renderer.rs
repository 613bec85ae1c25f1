use crate::coords::{Mat4, Viewport};
use crate::filter::Filter;
use crate::gl::program::{check_gl_error, create_program, drain_gl_error};
use crate::gl::{
    BufferId, ClearMask, DrawError, Gl, Primitive, ProgramId, SetupError, TextureId,
    UniformLocation,
};
use crate::surface::TextureSurface;

use super::quad::{
    ATTR_POSITION, ATTR_TEXTURE_COORD, POSITION_COMPONENTS, POSITION_OFFSET_BYTES, QUAD_VERTICES,
    QuadVertex, STRIDE_BYTES, UNIFORM_MVP_MATRIX, UNIFORM_ST_MATRIX, UV_COMPONENTS,
    UV_OFFSET_BYTES, VERTEX_COUNT, VERTEX_SHADER,
};
use super::split::{Split, SplitScissor, split_to_scissor};

/// Renderer configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererConfig {
    /// Colour the target is cleared to before each frame.
    pub clear_color: [f32; 4],

    /// Block on `glFinish` after every frame.
    ///
    /// Gives deterministic frame completion for capture/export at the cost of
    /// pipelining. Disable for interactive preview.
    pub finish_after_draw: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            finish_after_draw: true,
        }
    }
}

/// GL objects and locations resolved by `setup`.
#[derive(Debug, Copy, Clone)]
struct GlState {
    program: ProgramId,
    a_position: u32,
    a_texture_coord: u32,
    u_mvp: UniformLocation,
    u_st: UniformLocation,
    quad_vbo: BufferId,
}

/// Draws the filter's input texture as a full-screen quad through the
/// filter's fragment shader.
///
/// Lifecycle:
/// 1. [`new`](Self::new) (no GL calls, may precede context creation)
/// 2. [`setup`](Self::setup) once the context is current
/// 3. [`draw`](Self::draw) per frame
/// 4. [`release`](Self::release) before the context goes away
///
/// Not reentrant; one frame at a time on the context's thread.
pub struct TextureRenderer<F: Filter = Box<dyn Filter>> {
    filter: F,
    config: RendererConfig,

    vertices: [QuadVertex; 4],
    mvp: Mat4,
    st: Mat4,

    input_size: Viewport,
    target_size: Viewport,

    gl_state: Option<GlState>,
}

impl<F: Filter> TextureRenderer<F> {
    pub fn new(filter: F) -> Self {
        Self::with_config(filter, RendererConfig::default())
    }

    pub fn with_config(filter: F, config: RendererConfig) -> Self {
        let size = filter.output_size().unwrap_or_default();
        Self {
            filter,
            config,
            vertices: QUAD_VERTICES,
            mvp: Mat4::IDENTITY,
            st: Mat4::IDENTITY,
            input_size: size,
            target_size: size,
            gl_state: None,
        }
    }

    /// Texture the producer should write into (available once the filter
    /// has allocated it, i.e. after `setup` for self-allocating filters).
    pub fn input_texture_id(&self) -> Option<TextureId> {
        self.filter.input_texture()
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut F {
        &mut self.filter
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn is_set_up(&self) -> bool {
        self.gl_state.is_some()
    }

    /// Texture transform used by the most recent frame.
    pub fn texture_transform(&self) -> &Mat4 {
        &self.st
    }

    pub fn mvp_matrix(&self) -> &Mat4 {
        &self.mvp
    }

    pub fn input_size(&self) -> Viewport {
        self.input_size
    }

    pub fn target_size(&self) -> Viewport {
        self.target_size
    }

    /// Records media and target sizes; the target drives split draws.
    ///
    /// Once set up, the new sizes are forwarded to the filter immediately.
    /// Before that they are forwarded by `setup`.
    pub fn set_dimensions(&mut self, input: Viewport, target: Viewport) {
        self.input_size = input;
        self.target_size = target;
        if self.gl_state.is_some() {
            self.resize_filter();
        }
    }

    fn resize_filter(&mut self) {
        // Zero-area sizes are unknown; the filter keeps what it had.
        if self.input_size.is_valid() && self.target_size.is_valid() {
            self.filter.resize(self.input_size, self.target_size);
        }
    }

    /// Links the program, resolves locations, uploads the quad and
    /// initialises the filter.
    ///
    /// All-or-nothing: on error every object created here is deleted and the
    /// filter's `initialise` has not run.
    pub fn setup(&mut self, gl: &dyn Gl) -> Result<(), SetupError> {
        if self.gl_state.is_some() {
            return Err(SetupError::AlreadySetUp);
        }

        let program = create_program(gl, VERTEX_SHADER, &self.filter.fragment_shader())?;

        let state = match self.resolve(gl, program) {
            Ok(state) => state,
            Err(e) => {
                gl.delete_program(program);
                return Err(e);
            }
        };

        self.resize_filter();
        if let Err(e) = self.filter.initialise(gl, program) {
            gl.delete_buffer(state.quad_vbo);
            gl.delete_program(program);
            return Err(e);
        }

        log::debug!("texture renderer set up with program {}", program.get());
        self.gl_state = Some(state);
        Ok(())
    }

    fn resolve(&self, gl: &dyn Gl, program: ProgramId) -> Result<GlState, SetupError> {
        let a_position = gl.attrib_location(program, ATTR_POSITION);
        check_gl_error(gl, "glGetAttribLocation aPosition");
        let a_position = a_position.ok_or(SetupError::MissingAttribute(ATTR_POSITION))?;

        let a_texture_coord = gl.attrib_location(program, ATTR_TEXTURE_COORD);
        check_gl_error(gl, "glGetAttribLocation aTextureCoord");
        let a_texture_coord =
            a_texture_coord.ok_or(SetupError::MissingAttribute(ATTR_TEXTURE_COORD))?;

        let u_mvp = gl.uniform_location(program, UNIFORM_MVP_MATRIX);
        check_gl_error(gl, "glGetUniformLocation uMVPMatrix");
        let u_mvp = u_mvp.ok_or(SetupError::MissingUniform(UNIFORM_MVP_MATRIX))?;

        let u_st = gl.uniform_location(program, UNIFORM_ST_MATRIX);
        check_gl_error(gl, "glGetUniformLocation uSTMatrix");
        let u_st = u_st.ok_or(SetupError::MissingUniform(UNIFORM_ST_MATRIX))?;

        let quad_vbo = gl
            .create_buffer()
            .map_err(|reason| SetupError::Allocation { what: "quad vertex buffer", reason })?;
        gl.bind_array_buffer(Some(quad_vbo));
        gl.array_buffer_data(bytemuck::cast_slice(&self.vertices));
        gl.bind_array_buffer(None);
        check_gl_error(gl, "glBufferData quad");

        Ok(GlState { program, a_position, a_texture_coord, u_mvp, u_st, quad_vbo })
    }

    /// Draws one full frame.
    pub fn draw(&mut self, gl: &dyn Gl, surface: &dyn TextureSurface) -> Result<(), DrawError> {
        self.draw_split(gl, surface, Split::FULL)
    }

    /// Draws one frame restricted to `split` of the target width.
    ///
    /// The scissor test is enabled only for the duration of this frame.
    pub fn draw_split(
        &mut self,
        gl: &dyn Gl,
        surface: &dyn TextureSurface,
        split: Split,
    ) -> Result<(), DrawError> {
        let Some(state) = self.gl_state else {
            return Err(DrawError::NotSetUp);
        };

        let scissor = match split_to_scissor(split, self.target_size) {
            SplitScissor::Skip => return Ok(()),
            SplitScissor::Full => None,
            SplitScissor::Rect(rect) => Some(rect),
        };
        if let Some(rect) = scissor {
            gl.set_scissor_test(true);
            gl.scissor(rect);
        }

        check_gl_error(gl, "draw start");
        self.st = surface.transform_matrix();
        gl.clear_color(self.config.clear_color);
        gl.clear(ClearMask::COLOR_AND_DEPTH);

        gl.use_program(Some(state.program));
        check_gl_error(gl, "glUseProgram");

        let frame_time_ms = u64::try_from(surface.timestamp_ns()).unwrap_or(0) / 1_000_000;
        self.filter.apply(gl, frame_time_ms);
        // Some drivers flag errors from the filter's uniform updates that
        // have no visible effect.
        drain_gl_error(gl);

        gl.bind_array_buffer(Some(state.quad_vbo));
        gl.vertex_attrib_pointer(
            state.a_position,
            POSITION_COMPONENTS,
            STRIDE_BYTES,
            POSITION_OFFSET_BYTES,
        );
        check_gl_error(gl, "glVertexAttribPointer aPosition");
        gl.enable_vertex_attrib_array(state.a_position);
        check_gl_error(gl, "glEnableVertexAttribArray aPosition");
        gl.vertex_attrib_pointer(state.a_texture_coord, UV_COMPONENTS, STRIDE_BYTES, UV_OFFSET_BYTES);
        check_gl_error(gl, "glVertexAttribPointer aTextureCoord");
        gl.enable_vertex_attrib_array(state.a_texture_coord);
        check_gl_error(gl, "glEnableVertexAttribArray aTextureCoord");

        self.mvp.set_identity();
        gl.uniform_matrix_4fv(state.u_mvp, &self.mvp);
        gl.uniform_matrix_4fv(state.u_st, &self.st);

        gl.draw_arrays(Primitive::TriangleStrip, 0, VERTEX_COUNT);
        check_gl_error(gl, "glDrawArrays");

        if scissor.is_some() {
            gl.set_scissor_test(false);
        }
        if self.config.finish_after_draw {
            gl.finish();
        }
        Ok(())
    }

    /// Deletes renderer GL objects and releases the filter. The renderer can
    /// be set up again afterwards.
    pub fn release(&mut self, gl: &dyn Gl) {
        if let Some(state) = self.gl_state.take() {
            gl.delete_buffer(state.quad_vbo);
            gl.delete_program(state.program);
        }
        self.filter.release(gl);
    }

    pub fn into_filter(self) -> F {
        self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ScissorRect;
    use crate::filter::{self, ShaderFilter};
    use crate::gl::{GlCall, INVALID_OPERATION, NO_ERROR, RecordingGl, TextureTarget};
    use crate::surface::StaticSurface;

    const MARK_UNIT: u32 = 7;

    const COUNTING_SHADER: &str = "precision mediump float;
varying vec2 textureCoord;
void main() { gl_FragColor = vec4(textureCoord, 0.0, 1.0); }
";

    /// Filter that counts hook invocations and marks `apply` in the call log.
    #[derive(Default)]
    struct Counting {
        init_calls: usize,
        apply_calls: usize,
        released: bool,
        last_time_ms: Option<u64>,
    }

    impl Filter for Counting {
        fn fragment_shader(&self) -> String {
            COUNTING_SHADER.to_owned()
        }

        fn input_texture(&self) -> Option<TextureId> {
            TextureId::new(5)
        }

        fn initialise(&mut self, _gl: &dyn Gl, _program: ProgramId) -> Result<(), SetupError> {
            self.init_calls += 1;
            Ok(())
        }

        fn apply(&mut self, gl: &dyn Gl, frame_time_ms: u64) {
            self.apply_calls += 1;
            self.last_time_ms = Some(frame_time_ms);
            gl.active_texture(MARK_UNIT);
        }

        fn release(&mut self, _gl: &dyn Gl) {
            self.released = true;
        }
    }

    fn ready(gl: &RecordingGl) -> TextureRenderer<Counting> {
        let mut r = TextureRenderer::new(Counting::default());
        r.setup(gl).unwrap();
        gl.take_calls();
        r
    }

    fn position(calls: &[GlCall], pred: impl Fn(&GlCall) -> bool) -> usize {
        calls.iter().position(pred).expect("call not recorded")
    }

    fn matrices(calls: &[GlCall]) -> Vec<(UniformLocation, Mat4)> {
        calls
            .iter()
            .filter_map(|c| match c {
                GlCall::UniformMatrix4(loc, m) => Some((*loc, *m)),
                _ => None,
            })
            .collect()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_is_inert() {
        let r = TextureRenderer::new(Counting::default());
        assert!(!r.is_set_up());
        assert!(r.texture_transform().is_identity());
        assert_eq!(r.vertices, QUAD_VERTICES);
    }

    #[test]
    fn input_texture_comes_from_filter() {
        let r = TextureRenderer::new(Counting::default());
        assert_eq!(r.input_texture_id(), TextureId::new(5));
    }

    // ── setup ─────────────────────────────────────────────────────────────

    #[test]
    fn setup_resolves_all_locations() {
        let gl = RecordingGl::new();
        let mut r = TextureRenderer::new(Counting::default());
        r.setup(&gl).unwrap();

        let state = r.gl_state.unwrap();
        // Declaration order in the vertex shader.
        assert_eq!(state.a_position, 0);
        assert_eq!(state.a_texture_coord, 1);
        assert_eq!(state.u_mvp, UniformLocation(0));
        assert_eq!(state.u_st, UniformLocation(1));
        assert_eq!(r.filter().init_calls, 1);
    }

    #[test]
    fn setup_uploads_quad_once() {
        let gl = RecordingGl::new();
        let mut r = TextureRenderer::new(Counting::default());
        r.setup(&gl).unwrap();

        let uploads: Vec<_> = gl
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GlCall::ArrayBufferData(bytes) => Some(bytes),
                _ => None,
            })
            .collect();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0], bytemuck::cast_slice::<QuadVertex, u8>(&QUAD_VERTICES));
        assert_eq!(uploads[0].len(), 80);
    }

    #[test]
    fn missing_attribute_is_fatal_and_skips_filter_init() {
        for name in [ATTR_POSITION, ATTR_TEXTURE_COORD] {
            let gl = RecordingGl::new();
            gl.strip_symbol(name);
            let mut r = TextureRenderer::new(Counting::default());

            let err = r.setup(&gl).unwrap_err();
            assert!(matches!(err, SetupError::MissingAttribute(n) if n == name));
            assert_eq!(r.filter().init_calls, 0);
            assert!(!r.is_set_up());
            assert_eq!(gl.live_programs(), 0);
        }
    }

    #[test]
    fn missing_uniform_is_fatal_and_skips_filter_init() {
        for name in [UNIFORM_MVP_MATRIX, UNIFORM_ST_MATRIX] {
            let gl = RecordingGl::new();
            gl.strip_symbol(name);
            let mut r = TextureRenderer::new(Counting::default());

            let err = r.setup(&gl).unwrap_err();
            assert!(matches!(err, SetupError::MissingUniform(n) if n == name));
            assert_eq!(r.filter().init_calls, 0);
            assert!(!r.is_set_up());
            assert_eq!(gl.live_programs(), 0);
            assert_eq!(gl.live_buffers(), 0);
        }
    }

    #[test]
    fn link_failure_is_fatal() {
        let gl = RecordingGl::new();
        gl.fail_link();
        let mut r = TextureRenderer::new(Counting::default());
        assert!(matches!(r.setup(&gl), Err(SetupError::Link(_))));
        assert_eq!(r.filter().init_calls, 0);
    }

    #[test]
    fn filter_init_failure_rolls_back() {
        let gl = RecordingGl::new();
        // No externalTexture sampler in the counting shader.
        let shader = COUNTING_SHADER.to_owned();
        let mut r = TextureRenderer::new(ShaderFilter::new("no-sampler", shader));
        let err = r.setup(&gl).unwrap_err();
        assert!(matches!(err, SetupError::MissingUniform("externalTexture")));
        assert!(!r.is_set_up());
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.live_buffers(), 0);
    }

    #[test]
    fn second_setup_is_rejected() {
        let gl = RecordingGl::new();
        let mut r = ready(&gl);
        assert!(matches!(r.setup(&gl), Err(SetupError::AlreadySetUp)));
        assert!(gl.calls().is_empty());
    }

    // ── draw ──────────────────────────────────────────────────────────────

    #[test]
    fn draw_before_setup_is_rejected() {
        let gl = RecordingGl::new();
        let mut r = TextureRenderer::new(Counting::default());
        let surface = StaticSurface::default();
        assert_eq!(r.draw(&gl, &surface), Err(DrawError::NotSetUp));
        assert!(gl.calls().is_empty());
        assert_eq!(r.filter().apply_calls, 0);
    }

    #[test]
    fn apply_runs_once_between_use_program_and_draw() {
        let gl = RecordingGl::new();
        let mut r = ready(&gl);
        r.draw(&gl, &StaticSurface::default()).unwrap();

        let calls = gl.calls();
        let used = position(&calls, |c| matches!(c, GlCall::UseProgram(Some(_))));
        let applied = position(&calls, |c| *c == GlCall::ActiveTexture(MARK_UNIT));
        let attrib = position(&calls, |c| matches!(c, GlCall::VertexAttribPointer { .. }));
        let drawn = position(&calls, |c| matches!(c, GlCall::DrawArrays { .. }));
        assert!(used < applied && applied < attrib && attrib < drawn);
        assert_eq!(r.filter().apply_calls, 1);
    }

    #[test]
    fn frame_calls_follow_draw_order() {
        let gl = RecordingGl::new();
        let mut r = ready(&gl);
        r.draw(&gl, &StaticSurface::default()).unwrap();

        let calls = gl.calls();
        let cleared = position(&calls, |c| matches!(c, GlCall::Clear(_)));
        let used = position(&calls, |c| matches!(c, GlCall::UseProgram(Some(_))));
        let mvp = position(&calls, |c| matches!(c, GlCall::UniformMatrix4(UniformLocation(0), _)));
        let st = position(&calls, |c| matches!(c, GlCall::UniformMatrix4(UniformLocation(1), _)));
        let drawn = position(&calls, |c| matches!(c, GlCall::DrawArrays { .. }));
        let finished = position(&calls, |c| *c == GlCall::Finish);
        assert!(cleared < used);
        assert!(used < mvp && mvp < st && st < drawn);
        assert!(drawn < finished);
    }

    #[test]
    fn texture_transform_tracks_latest_surface() {
        let gl = RecordingGl::new();
        let mut r = ready(&gl);

        let first = Mat4::from_cols_array([
            0.0, -1.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, 1.0,
        ]);
        let second = Mat4::from_cols_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, -1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, 1.0,
        ]);

        r.draw(&gl, &StaticSurface::new(first)).unwrap();
        assert_eq!(matrices(&gl.take_calls())[1], (UniformLocation(1), first));
        assert_eq!(*r.texture_transform(), first);

        r.draw(&gl, &StaticSurface::new(second)).unwrap();
        assert_eq!(matrices(&gl.take_calls())[1], (UniformLocation(1), second));
    }

    #[test]
    fn mvp_is_always_identity() {
        let gl = RecordingGl::new();
        let mut r = ready(&gl);
        r.mvp = Mat4::from_cols_array([3.0; 16]);

        for _ in 0..2 {
            r.draw(&gl, &StaticSurface::default()).unwrap();
            let uploaded = matrices(&gl.take_calls());
            assert_eq!(uploaded[0], (UniformLocation(0), Mat4::IDENTITY));
        }
    }

    #[test]
    fn end_to_end_passthrough_frame() {
        let gl = RecordingGl::new();
        let mut r = TextureRenderer::new(filter::passthrough());
        r.setup(&gl).unwrap();
        let texture = r.input_texture_id().expect("texture allocated by setup");
        gl.take_calls();

        r.draw(&gl, &StaticSurface::new(Mat4::IDENTITY)).unwrap();
        let calls = gl.calls();

        let draws: Vec<_> =
            calls.iter().filter(|c| matches!(c, GlCall::DrawArrays { .. })).collect();
        assert_eq!(
            draws,
            vec![&GlCall::DrawArrays { mode: Primitive::TriangleStrip, first: 0, count: 4 }]
        );
        assert!(calls.contains(&GlCall::EnableVertexAttribArray(0)));
        assert!(calls.contains(&GlCall::EnableVertexAttribArray(1)));
        assert!(calls.contains(&GlCall::ClearColor([0.0, 0.0, 0.0, 1.0])));
        assert!(calls.contains(&GlCall::Clear(ClearMask::COLOR_AND_DEPTH)));
        assert!(calls.contains(&GlCall::BindTexture(TextureTarget::ExternalOes, Some(texture))));
        assert_eq!(calls.last(), Some(&GlCall::Finish));
    }

    #[test]
    fn attributes_use_interleaved_layout() {
        let gl = RecordingGl::new();
        let mut r = ready(&gl);
        r.draw(&gl, &StaticSurface::default()).unwrap();
        let calls = gl.calls();
        assert!(calls.contains(&GlCall::VertexAttribPointer {
            index: 0,
            components: 3,
            stride: 20,
            offset: 0
        }));
        assert!(calls.contains(&GlCall::VertexAttribPointer {
            index: 1,
            components: 2,
            stride: 20,
            offset: 12
        }));
    }

    #[test]
    fn error_after_apply_is_drained_and_draw_proceeds() {
        let gl = RecordingGl::new();
        let mut r = ready(&gl);
        // Consumed by the "draw start" and "glUseProgram" checkpoints.
        gl.push_error(NO_ERROR);
        gl.push_error(NO_ERROR);
        gl.push_error(INVALID_OPERATION);

        r.draw(&gl, &StaticSurface::default()).unwrap();
        let calls = gl.calls();
        let applied = position(&calls, |c| *c == GlCall::ActiveTexture(MARK_UNIT));
        assert_eq!(calls[applied + 1], GlCall::GetError(INVALID_OPERATION));
        assert!(calls.iter().any(|c| matches!(c, GlCall::DrawArrays { .. })));
    }

    #[test]
    fn frame_time_is_surface_timestamp_in_ms() {
        let gl = RecordingGl::new();
        let mut r = ready(&gl);
        let surface = StaticSurface::default().with_timestamp_ns(2_500_000_000);
        r.draw(&gl, &surface).unwrap();
        assert_eq!(r.filter().last_time_ms, Some(2500));
    }

    #[test]
    fn finish_can_be_disabled() {
        let gl = RecordingGl::new();
        let config = RendererConfig { finish_after_draw: false, ..Default::default() };
        let mut r = TextureRenderer::with_config(Counting::default(), config);
        r.setup(&gl).unwrap();
        r.draw(&gl, &StaticSurface::default()).unwrap();
        assert!(!gl.calls().contains(&GlCall::Finish));
    }

    // ── split ─────────────────────────────────────────────────────────────

    #[test]
    fn zero_split_draws_nothing() {
        let gl = RecordingGl::new();
        let mut r = ready(&gl);
        r.draw_split(&gl, &StaticSurface::default(), Split::left(0.0)).unwrap();
        assert!(gl.calls().is_empty());
        assert_eq!(r.filter().apply_calls, 0);
    }

    #[test]
    fn partial_split_scissors_only_this_frame() {
        let gl = RecordingGl::new();
        let mut r = ready(&gl);
        r.set_dimensions(Viewport::new(640, 480), Viewport::new(800, 600));
        r.draw_split(&gl, &StaticSurface::default(), Split::right(0.5)).unwrap();

        let calls = gl.calls();
        assert_eq!(calls[0], GlCall::SetScissorTest(true));
        assert_eq!(calls[1], GlCall::Scissor(ScissorRect::new(400, 0, 400, 600)));
        let disabled = position(&calls, |c| *c == GlCall::SetScissorTest(false));
        let drawn = position(&calls, |c| matches!(c, GlCall::DrawArrays { .. }));
        assert!(drawn < disabled);
    }

    // ── dimensions ────────────────────────────────────────────────────────

    #[test]
    fn setup_forwards_dimensions_to_filter() {
        let gl = RecordingGl::new();
        let mut r = TextureRenderer::new(filter::passthrough());
        r.set_dimensions(Viewport::new(640, 480), Viewport::new(800, 600));
        assert_eq!(r.filter().input_size(), None);

        r.setup(&gl).unwrap();
        r.draw(&gl, &StaticSurface::default()).unwrap();
        assert_eq!(r.filter().input_size(), Some(Viewport::new(640, 480)));
        assert_eq!(r.filter().output_size(), Some(Viewport::new(800, 600)));
    }

    #[test]
    fn dimensions_after_setup_reach_filter() {
        let gl = RecordingGl::new();
        let mut r = TextureRenderer::new(filter::grayscale());
        r.setup(&gl).unwrap();
        assert_eq!(r.filter().input_size(), None);

        r.set_dimensions(Viewport::new(1920, 1080), Viewport::new(1280, 720));
        assert_eq!(r.filter().input_size(), Some(Viewport::new(1920, 1080)));
        assert_eq!(r.filter().output_size(), Some(Viewport::new(1280, 720)));
        assert_eq!(r.target_size(), Viewport::new(1280, 720));
    }

    #[test]
    fn unknown_dimensions_are_not_forwarded() {
        let gl = RecordingGl::new();
        let mut r = TextureRenderer::new(filter::passthrough());
        r.setup(&gl).unwrap();
        r.set_dimensions(Viewport::new(640, 480), Viewport::default());
        assert_eq!(r.filter().input_size(), None);
    }

    // ── release ───────────────────────────────────────────────────────────

    #[test]
    fn release_deletes_objects_and_allows_new_setup() {
        let gl = RecordingGl::new();
        let mut r = ready(&gl);
        r.release(&gl);

        assert!(!r.is_set_up());
        assert!(r.filter().released);
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.live_buffers(), 0);
        assert_eq!(r.draw(&gl, &StaticSurface::default()), Err(DrawError::NotSetUp));

        r.setup(&gl).unwrap();
        assert_eq!(r.filter().init_calls, 2);
    }

    #[test]
    fn boxed_filters_are_accepted() {
        let gl = RecordingGl::new();
        let boxed: Box<dyn Filter> = Box::new(filter::sepia());
        let mut r: TextureRenderer = TextureRenderer::new(boxed);
        r.setup(&gl).unwrap();
        r.draw(&gl, &StaticSurface::default()).unwrap();
        r.release(&gl);
        assert_eq!(gl.live_textures(), 0);
    }
}
