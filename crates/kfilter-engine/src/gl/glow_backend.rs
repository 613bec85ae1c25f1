use std::ffi::c_void;
use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::Result;
use glow::HasContext;

use crate::coords::{Mat4, ScissorRect};

use super::{
    BufferId, ClearMask, Gl, Primitive, ProgramId, ShaderId, ShaderStage, TexParam, TexValue,
    TextureId, TextureTarget, UniformLocation,
};

/// `GL_TEXTURE_EXTERNAL_OES` from `OES_EGL_image_external`.
const TEXTURE_EXTERNAL_OES: u32 = 0x8D65;

/// [`Gl`] backed by a `glow` context.
///
/// The wrapped context must stay current on the thread that uses this value.
/// `glow` calls are `unsafe` for exactly that reason; this type discharges the
/// obligation once, at construction.
pub struct GlowContext {
    gl: Arc<glow::Context>,
}

impl GlowContext {
    /// Wraps an existing `glow` context.
    ///
    /// # Safety
    ///
    /// `gl` must be a valid ES 2.0 (or compatible) context that is current on
    /// the calling thread, and it must remain current for every call made
    /// through the returned value.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Self {
        Self { gl }
    }

    /// Loads GL entry points through `loader` (e.g. `eglGetProcAddress`).
    ///
    /// # Safety
    ///
    /// Same requirements as [`GlowContext::new`]; `loader` must return valid
    /// function pointers for the current context.
    pub unsafe fn from_loader_function<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&str) -> *const c_void,
    {
        let gl = unsafe { glow::Context::from_loader_function(loader) };
        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        anyhow::ensure!(!version.is_empty(), "GL context reports no version");
        log::debug!("GL context loaded: {version}");
        Ok(Self { gl: Arc::new(gl) })
    }

    /// Returns the shared `glow` context.
    pub fn raw(&self) -> &Arc<glow::Context> {
        &self.gl
    }
}

fn shader_kind(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn primitive(mode: Primitive) -> u32 {
    match mode {
        Primitive::Triangles => glow::TRIANGLES,
        Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
    }
}

fn texture_target(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2d => glow::TEXTURE_2D,
        TextureTarget::ExternalOes => TEXTURE_EXTERNAL_OES,
    }
}

fn tex_param(param: TexParam) -> u32 {
    match param {
        TexParam::MinFilter => glow::TEXTURE_MIN_FILTER,
        TexParam::MagFilter => glow::TEXTURE_MAG_FILTER,
        TexParam::WrapS => glow::TEXTURE_WRAP_S,
        TexParam::WrapT => glow::TEXTURE_WRAP_T,
    }
}

fn tex_value(value: TexValue) -> i32 {
    let raw = match value {
        TexValue::Nearest => glow::NEAREST,
        TexValue::Linear => glow::LINEAR,
        TexValue::ClampToEdge => glow::CLAMP_TO_EDGE,
    };
    raw as i32
}

fn clear_bits(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.color {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.depth {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    bits
}

// ── name conversion ───────────────────────────────────────────────────────

fn native_shader(id: ShaderId) -> glow::NativeShader {
    glow::NativeShader(nz(id.get()))
}

fn native_program(id: ProgramId) -> glow::NativeProgram {
    glow::NativeProgram(nz(id.get()))
}

fn native_buffer(id: BufferId) -> glow::NativeBuffer {
    glow::NativeBuffer(nz(id.get()))
}

fn native_texture(id: TextureId) -> glow::NativeTexture {
    glow::NativeTexture(nz(id.get()))
}

fn native_uniform(location: UniformLocation) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(location.0)
}

// Our ids are NonZeroU32 by construction.
fn nz(raw: u32) -> NonZeroU32 {
    NonZeroU32::new(raw).unwrap_or(NonZeroU32::MIN)
}

impl Gl for GlowContext {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
        let shader = unsafe { self.gl.create_shader(shader_kind(stage))? };
        ShaderId::new(shader.0.get()).ok_or_else(|| "driver returned shader 0".to_owned())
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        unsafe { self.gl.shader_source(native_shader(shader), source) }
    }

    fn compile_shader(&self, shader: ShaderId) {
        unsafe { self.gl.compile_shader(native_shader(shader)) }
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        unsafe { self.gl.get_shader_compile_status(native_shader(shader)) }
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        unsafe { self.gl.get_shader_info_log(native_shader(shader)) }
    }

    fn delete_shader(&self, shader: ShaderId) {
        unsafe { self.gl.delete_shader(native_shader(shader)) }
    }

    fn create_program(&self) -> Result<ProgramId, String> {
        let program = unsafe { self.gl.create_program()? };
        ProgramId::new(program.0.get()).ok_or_else(|| "driver returned program 0".to_owned())
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe { self.gl.attach_shader(native_program(program), native_shader(shader)) }
    }

    fn link_program(&self, program: ProgramId) {
        unsafe { self.gl.link_program(native_program(program)) }
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        unsafe { self.gl.get_program_link_status(native_program(program)) }
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        unsafe { self.gl.get_program_info_log(native_program(program)) }
    }

    fn delete_program(&self, program: ProgramId) {
        unsafe { self.gl.delete_program(native_program(program)) }
    }

    fn use_program(&self, program: Option<ProgramId>) {
        unsafe { self.gl.use_program(program.map(native_program)) }
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(native_program(program), name) }
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        unsafe { self.gl.get_uniform_location(native_program(program), name) }
            .map(|loc| UniformLocation(loc.0))
    }

    fn uniform_1i(&self, location: UniformLocation, value: i32) {
        unsafe { self.gl.uniform_1_i32(Some(&native_uniform(location)), value) }
    }

    fn uniform_1f(&self, location: UniformLocation, value: f32) {
        unsafe { self.gl.uniform_1_f32(Some(&native_uniform(location)), value) }
    }

    fn uniform_matrix_4fv(&self, location: UniformLocation, matrix: &Mat4) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(&native_uniform(location)), false, matrix.as_slice())
        }
    }

    fn create_buffer(&self) -> Result<BufferId, String> {
        let buffer = unsafe { self.gl.create_buffer()? };
        BufferId::new(buffer.0.get()).ok_or_else(|| "driver returned buffer 0".to_owned())
    }

    fn bind_array_buffer(&self, buffer: Option<BufferId>) {
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer.map(native_buffer)) }
    }

    fn array_buffer_data(&self, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW)
        }
    }

    fn delete_buffer(&self, buffer: BufferId) {
        unsafe { self.gl.delete_buffer(native_buffer(buffer)) }
    }

    fn vertex_attrib_pointer(&self, index: u32, components: i32, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, components, glow::FLOAT, false, stride, offset)
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn create_texture(&self) -> Result<TextureId, String> {
        let texture = unsafe { self.gl.create_texture()? };
        TextureId::new(texture.0.get()).ok_or_else(|| "driver returned texture 0".to_owned())
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureId>) {
        unsafe {
            self.gl
                .bind_texture(texture_target(target), texture.map(native_texture))
        }
    }

    fn tex_parameter(&self, target: TextureTarget, param: TexParam, value: TexValue) {
        unsafe {
            self.gl
                .tex_parameter_i32(texture_target(target), tex_param(param), tex_value(value))
        }
    }

    fn delete_texture(&self, texture: TextureId) {
        unsafe { self.gl.delete_texture(native_texture(texture)) }
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        let [r, g, b, a] = rgba;
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear(&self, mask: ClearMask) {
        unsafe { self.gl.clear(clear_bits(mask)) }
    }

    fn set_scissor_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::SCISSOR_TEST);
            } else {
                self.gl.disable(glow::SCISSOR_TEST);
            }
        }
    }

    fn scissor(&self, rect: ScissorRect) {
        unsafe { self.gl.scissor(rect.x, rect.y, rect.width, rect.height) }
    }

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(primitive(mode), first, count) }
    }

    fn finish(&self) {
        unsafe { self.gl.finish() }
    }

    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_texture_target_is_oes_enum() {
        assert_eq!(texture_target(TextureTarget::ExternalOes), 0x8D65);
        assert_eq!(texture_target(TextureTarget::Texture2d), 0x0DE1);
    }

    #[test]
    fn shader_and_primitive_enums() {
        assert_eq!(shader_kind(ShaderStage::Vertex), 0x8B31);
        assert_eq!(shader_kind(ShaderStage::Fragment), 0x8B30);
        assert_eq!(primitive(Primitive::Triangles), 0x0004);
        assert_eq!(primitive(Primitive::TriangleStrip), 0x0005);
    }

    #[test]
    fn texture_parameters() {
        assert_eq!(tex_param(TexParam::MinFilter), 0x2801);
        assert_eq!(tex_param(TexParam::MagFilter), 0x2800);
        assert_eq!(tex_param(TexParam::WrapS), 0x2802);
        assert_eq!(tex_param(TexParam::WrapT), 0x2803);
        assert_eq!(tex_value(TexValue::Nearest), 0x2600);
        assert_eq!(tex_value(TexValue::Linear), 0x2601);
        assert_eq!(tex_value(TexValue::ClampToEdge), 0x812F);
    }

    #[test]
    fn clear_mask_bits() {
        assert_eq!(clear_bits(ClearMask::COLOR_AND_DEPTH), 0x4000 | 0x0100);
        assert_eq!(clear_bits(ClearMask { color: true, depth: false }), 0x4000);
        assert_eq!(clear_bits(ClearMask { color: false, depth: false }), 0);
    }

    #[test]
    fn zero_names_never_reach_glow() {
        assert_eq!(nz(0), NonZeroU32::MIN);
        assert_eq!(nz(9).get(), 9);
    }
}
