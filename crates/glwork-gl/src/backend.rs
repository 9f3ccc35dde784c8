//! The seam between the dispatcher and a GL implementation.

use std::ffi::CStr;

use glwork_core::handles::*;

/// One method per supported GL entry point, with typed arguments.
///
/// Implementations exist for the real driver ([`crate::NativeGl`]) and for
/// tests ([`crate::RecordingGl`]). Every method maps onto exactly one GL call;
/// GL errors are left in the driver for [`GlBackend::get_error`] to collect.
pub trait GlBackend {
    fn active_texture(&mut self, texture: Enum);
    fn attach_shader(&mut self, program: Program, shader: Shader);
    fn bind_buffer(&mut self, target: Enum, buffer: Buffer);
    fn bind_texture(&mut self, target: Enum, texture: Texture);
    fn bind_vertex_array(&mut self, array: VertexArray);
    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn blend_func(&mut self, sfactor: Enum, dfactor: Enum);
    fn buffer_data(&mut self, target: Enum, data: &[u8], usage: Enum);
    fn clear(&mut self, mask: u32);
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn compile_shader(&mut self, shader: Shader);
    fn create_program(&mut self) -> Program;
    fn create_shader(&mut self, ty: Enum) -> Shader;
    fn delete_buffer(&mut self, buffer: Buffer);
    fn delete_texture(&mut self, texture: Texture);
    fn disable(&mut self, cap: Enum);
    fn draw_arrays(&mut self, mode: Enum, first: i32, count: i32);
    fn enable(&mut self, cap: Enum);
    fn enable_vertex_attrib_array(&mut self, attrib: Attrib);
    fn flush(&mut self);
    fn gen_buffer(&mut self) -> Buffer;
    fn gen_texture(&mut self) -> Texture;
    fn gen_vertex_array(&mut self) -> VertexArray;
    /// Returns `-1` when `name` is not an active attribute.
    fn get_attrib_location(&mut self, program: Program, name: &CStr) -> i32;
    fn get_error(&mut self) -> Enum;
    /// Writes a NUL-terminated log into `buf`; returns the length excluding the NUL.
    fn get_shader_info_log(&mut self, shader: Shader, buf: &mut [u8]) -> usize;
    /// Writes NUL-terminated source into `buf`; returns the length excluding the NUL.
    fn get_shader_source(&mut self, shader: Shader, buf: &mut [u8]) -> usize;
    fn get_shaderi(&mut self, shader: Shader, pname: Enum) -> i32;
    fn get_tex_parameteri(&mut self, target: Enum, pname: Enum) -> i32;
    fn get_uniform_location(&mut self, program: Program, name: &CStr) -> Uniform;
    fn link_program(&mut self, program: Program);
    /// `out` is exactly as long as the rectangle requires.
    #[allow(clippy::too_many_arguments)]
    fn read_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: Enum,
        ty: Enum,
        out: &mut [u8],
    );
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn shader_source(&mut self, shader: Shader, source: &str);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &mut self,
        target: Enum,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: Enum,
        ty: Enum,
        pixels: Option<&[u8]>,
    );
    fn tex_parameteri(&mut self, target: Enum, pname: Enum, param: i32);
    fn uniform1f(&mut self, location: Uniform, value: f32);
    fn uniform4f(&mut self, location: Uniform, values: [f32; 4]);
    fn uniform4fv(&mut self, location: Uniform, values: &[[f32; 4]]);
    fn use_program(&mut self, program: Program);
    fn vertex_attrib_pointer(
        &mut self,
        attrib: Attrib,
        size: i32,
        ty: Enum,
        normalized: bool,
        stride: i32,
        offset: usize,
    );
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
}
