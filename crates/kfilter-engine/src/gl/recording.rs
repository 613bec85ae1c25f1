use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::coords::{Mat4, ScissorRect};

use super::{
    BufferId, ClearMask, Gl, NO_ERROR, Primitive, ProgramId, ShaderId, ShaderStage, TexParam,
    TexValue, TextureId, TextureTarget, UniformLocation,
};

/// One observed GL call.
///
/// Queries that only read state (`*_status`, `*_info_log`, locations) are not
/// recorded; `get_error` is, since draining errors is part of frame behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateShader(ShaderStage, ShaderId),
    CompileShader(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram(ProgramId),
    AttachShader(ProgramId, ShaderId),
    LinkProgram(ProgramId),
    DeleteProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    Uniform1i(UniformLocation, i32),
    Uniform1f(UniformLocation, f32),
    UniformMatrix4(UniformLocation, Mat4),
    CreateBuffer(BufferId),
    BindArrayBuffer(Option<BufferId>),
    ArrayBufferData(Vec<u8>),
    DeleteBuffer(BufferId),
    VertexAttribPointer { index: u32, components: i32, stride: i32, offset: i32 },
    EnableVertexAttribArray(u32),
    CreateTexture(TextureId),
    ActiveTexture(u32),
    BindTexture(TextureTarget, Option<TextureId>),
    TexParameter(TextureTarget, TexParam, TexValue),
    DeleteTexture(TextureId),
    ClearColor([f32; 4]),
    Clear(ClearMask),
    SetScissorTest(bool),
    Scissor(ScissorRect),
    DrawArrays { mode: Primitive, first: i32, count: i32 },
    Finish,
    GetError(u32),
}

#[derive(Debug, Default)]
struct ProgramState {
    shaders: Vec<ShaderId>,
    linked: bool,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    next_name: u32,
    shaders: HashMap<ShaderId, (ShaderStage, String)>,
    programs: HashMap<ProgramId, ProgramState>,
    buffers: HashSet<BufferId>,
    textures: HashSet<TextureId>,
    calls: Vec<GlCall>,
    errors: VecDeque<u32>,
    failing_stage: Option<ShaderStage>,
    failing_link: bool,
    stripped: HashSet<String>,
}

impl State {
    fn next_name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }
}

/// Headless [`Gl`] that records calls instead of talking to a driver.
///
/// Attribute and uniform locations are resolved from the `attribute` /
/// `uniform` declarations of the shaders attached at link time, numbered in
/// declaration order. Failure modes can be injected with [`fail_compile`],
/// [`fail_link`], [`strip_symbol`] and [`push_error`].
///
/// [`fail_compile`]: Self::fail_compile
/// [`fail_link`]: Self::fail_link
/// [`strip_symbol`]: Self::strip_symbol
/// [`push_error`]: Self::push_error
#[derive(Debug, Default)]
pub struct RecordingGl {
    state: RefCell<State>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent compile of `stage` fail.
    pub fn fail_compile(&self, stage: ShaderStage) {
        self.state.borrow_mut().failing_stage = Some(stage);
    }

    /// Makes every subsequent link fail.
    pub fn fail_link(&self) {
        self.state.borrow_mut().failing_link = true;
    }

    /// Hides `name` from location lookups, like a driver optimizing out an
    /// unused attribute or uniform.
    pub fn strip_symbol(&self, name: &str) {
        self.state.borrow_mut().stripped.insert(name.to_owned());
    }

    /// Queues an error flag for the next `get_error`.
    pub fn push_error(&self, code: u32) {
        self.state.borrow_mut().errors.push_back(code);
    }

    /// Snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    /// Returns the recorded calls and starts a fresh log.
    pub fn take_calls(&self) -> Vec<GlCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    fn record(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

/// Extracts the declared names following `keyword` (e.g. `uniform mat4 uX;`).
fn declarations(source: &str, keyword: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let mut tokens = line.split_whitespace();
            if tokens.next() != Some(keyword) {
                return None;
            }
            let name = tokens.last()?.trim_end_matches(';');
            let name = name.split('[').next().unwrap_or(name);
            (!name.is_empty()).then(|| name.to_owned())
        })
        .collect()
}

impl Gl for RecordingGl {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
        let mut s = self.state.borrow_mut();
        let id = ShaderId::new(s.next_name()).ok_or("name space exhausted")?;
        s.shaders.insert(id, (stage, String::new()));
        s.calls.push(GlCall::CreateShader(stage, id));
        Ok(id)
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        if let Some(entry) = self.state.borrow_mut().shaders.get_mut(&shader) {
            entry.1 = source.to_owned();
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        self.record(GlCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        let s = self.state.borrow();
        match s.shaders.get(&shader) {
            Some((stage, _)) => s.failing_stage != Some(*stage),
            None => false,
        }
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            "ERROR: 0:1: injected compile failure".to_owned()
        }
    }

    fn delete_shader(&self, shader: ShaderId) {
        let mut s = self.state.borrow_mut();
        s.shaders.remove(&shader);
        s.calls.push(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<ProgramId, String> {
        let mut s = self.state.borrow_mut();
        let id = ProgramId::new(s.next_name()).ok_or("name space exhausted")?;
        s.programs.insert(id, ProgramState::default());
        s.calls.push(GlCall::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut s = self.state.borrow_mut();
        if let Some(p) = s.programs.get_mut(&program) {
            p.shaders.push(shader);
        }
        s.calls.push(GlCall::AttachShader(program, shader));
    }

    fn link_program(&self, program: ProgramId) {
        let mut s = self.state.borrow_mut();
        let failing = s.failing_link;

        let sources: Vec<String> = match s.programs.get(&program) {
            Some(p) => p
                .shaders
                .iter()
                .filter_map(|id| s.shaders.get(id).map(|(_, src)| src.clone()))
                .collect(),
            None => Vec::new(),
        };

        let mut attributes = Vec::new();
        let mut uniforms = Vec::new();
        for src in &sources {
            attributes.extend(declarations(src, "attribute"));
            for name in declarations(src, "uniform") {
                if !uniforms.contains(&name) {
                    uniforms.push(name);
                }
            }
        }

        if let Some(p) = s.programs.get_mut(&program) {
            p.linked = !failing;
            p.attributes = attributes;
            p.uniforms = uniforms;
        }
        s.calls.push(GlCall::LinkProgram(program));
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.state.borrow().programs.get(&program).is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            "injected link failure".to_owned()
        }
    }

    fn delete_program(&self, program: ProgramId) {
        let mut s = self.state.borrow_mut();
        s.programs.remove(&program);
        s.calls.push(GlCall::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<ProgramId>) {
        self.record(GlCall::UseProgram(program));
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        let s = self.state.borrow();
        let p = s.programs.get(&program).filter(|p| p.linked)?;
        if s.stripped.contains(name) {
            return None;
        }
        p.attributes.iter().position(|a| a == name).map(|i| i as u32)
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let s = self.state.borrow();
        let p = s.programs.get(&program).filter(|p| p.linked)?;
        if s.stripped.contains(name) {
            return None;
        }
        p.uniforms
            .iter()
            .position(|u| u == name)
            .map(|i| UniformLocation(i as u32))
    }

    fn uniform_1i(&self, location: UniformLocation, value: i32) {
        self.record(GlCall::Uniform1i(location, value));
    }

    fn uniform_1f(&self, location: UniformLocation, value: f32) {
        self.record(GlCall::Uniform1f(location, value));
    }

    fn uniform_matrix_4fv(&self, location: UniformLocation, matrix: &Mat4) {
        self.record(GlCall::UniformMatrix4(location, *matrix));
    }

    fn create_buffer(&self) -> Result<BufferId, String> {
        let mut s = self.state.borrow_mut();
        let id = BufferId::new(s.next_name()).ok_or("name space exhausted")?;
        s.buffers.insert(id);
        s.calls.push(GlCall::CreateBuffer(id));
        Ok(id)
    }

    fn bind_array_buffer(&self, buffer: Option<BufferId>) {
        self.record(GlCall::BindArrayBuffer(buffer));
    }

    fn array_buffer_data(&self, data: &[u8]) {
        self.record(GlCall::ArrayBufferData(data.to_vec()));
    }

    fn delete_buffer(&self, buffer: BufferId) {
        let mut s = self.state.borrow_mut();
        s.buffers.remove(&buffer);
        s.calls.push(GlCall::DeleteBuffer(buffer));
    }

    fn vertex_attrib_pointer(&self, index: u32, components: i32, stride: i32, offset: i32) {
        self.record(GlCall::VertexAttribPointer { index, components, stride, offset });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn create_texture(&self) -> Result<TextureId, String> {
        let mut s = self.state.borrow_mut();
        let id = TextureId::new(s.next_name()).ok_or("name space exhausted")?;
        s.textures.insert(id);
        s.calls.push(GlCall::CreateTexture(id));
        Ok(id)
    }

    fn active_texture(&self, unit: u32) {
        self.record(GlCall::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureId>) {
        self.record(GlCall::BindTexture(target, texture));
    }

    fn tex_parameter(&self, target: TextureTarget, param: TexParam, value: TexValue) {
        self.record(GlCall::TexParameter(target, param, value));
    }

    fn delete_texture(&self, texture: TextureId) {
        let mut s = self.state.borrow_mut();
        s.textures.remove(&texture);
        s.calls.push(GlCall::DeleteTexture(texture));
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.record(GlCall::ClearColor(rgba));
    }

    fn clear(&self, mask: ClearMask) {
        self.record(GlCall::Clear(mask));
    }

    fn set_scissor_test(&self, enabled: bool) {
        self.record(GlCall::SetScissorTest(enabled));
    }

    fn scissor(&self, rect: ScissorRect) {
        self.record(GlCall::Scissor(rect));
    }

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32) {
        self.record(GlCall::DrawArrays { mode, first, count });
    }

    fn finish(&self) {
        self.record(GlCall::Finish);
    }

    fn get_error(&self) -> u32 {
        let mut s = self.state.borrow_mut();
        let code = s.errors.pop_front().unwrap_or(NO_ERROR);
        s.calls.push(GlCall::GetError(code));
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_handle_qualifiers_and_arrays() {
        let src = "uniform mat4 uMVPMatrix;\n  attribute highp vec4 aPosition;\nuniform float weights[4];\n";
        assert_eq!(declarations(src, "uniform"), vec!["uMVPMatrix", "weights"]);
        assert_eq!(declarations(src, "attribute"), vec!["aPosition"]);
    }

    #[test]
    fn locations_follow_declaration_order() {
        let gl = RecordingGl::new();
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(vs, "attribute vec4 a;\nattribute vec2 b;\nuniform mat4 m;\n");
        let fs = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.shader_source(fs, "uniform mat4 m;\nuniform sampler2D t;\n");
        let p = gl.create_program().unwrap();
        gl.attach_shader(p, vs);
        gl.attach_shader(p, fs);
        gl.link_program(p);

        assert_eq!(gl.attrib_location(p, "b"), Some(1));
        assert_eq!(gl.uniform_location(p, "t"), Some(UniformLocation(1)));
        assert_eq!(gl.uniform_location(p, "missing"), None);
    }

    #[test]
    fn stripped_symbols_do_not_resolve() {
        let gl = RecordingGl::new();
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(vs, "attribute vec4 a;\n");
        let p = gl.create_program().unwrap();
        gl.attach_shader(p, vs);
        gl.link_program(p);
        gl.strip_symbol("a");
        assert_eq!(gl.attrib_location(p, "a"), None);
    }

    #[test]
    fn unlinked_program_resolves_nothing() {
        let gl = RecordingGl::new();
        let p = gl.create_program().unwrap();
        assert_eq!(gl.attrib_location(p, "a"), None);
        assert!(!gl.program_link_status(p));
    }
}
