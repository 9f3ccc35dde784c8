//! [`GlBackend`] over the real driver, through the `gl` crate.

use std::ffi::{c_void, CStr};
use std::marker::PhantomData;
use std::ptr;

use anyhow::{bail, Result};
use gl::types::{GLboolean, GLchar, GLint, GLsizei, GLsizeiptr};
use glwork_core::handles::*;
use once_cell::sync::OnceCell;

use crate::backend::GlBackend;

/// Which loader resolved the process-wide GL function pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlLoader {
    /// `gl_loader`, through [`NativeGl::load`].
    Default,
    /// A caller-supplied loader, through [`NativeGl::load_with`].
    Custom,
}

static GL_LOADED: OnceCell<GlLoader> = OnceCell::new();

/// Calls straight into the driver's function pointers.
///
/// The value is `!Send`: GL state belongs to the thread whose context is
/// current, and that is where the value has to stay.
#[derive(Debug)]
pub struct NativeGl {
    _not_send: PhantomData<*const ()>,
}

impl NativeGl {
    /// Resolve GL function pointers through `gl_loader`, unless some loader
    /// already ran in this process.
    ///
    /// # Safety
    ///
    /// A GL context must be current on the calling thread whenever a method
    /// of the returned value runs.
    pub unsafe fn load() -> Result<Self> {
        GL_LOADED.get_or_init(|| {
            gl_loader::init_gl();
            gl::load_with(|s| gl_loader::get_proc_address(s).cast());
            tracing::debug!("GL function pointers loaded via gl_loader");
            GlLoader::Default
        });

        unsafe { Self::checked() }
    }

    /// Resolve GL function pointers with a platform loader such as
    /// `eglGetProcAddress`. Later calls replace earlier pointers, and
    /// [`NativeGl::load`] keeps them from then on.
    ///
    /// # Safety
    ///
    /// Same as [`NativeGl::load`].
    pub unsafe fn load_with<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        let _ = GL_LOADED.set(GlLoader::Custom);
        tracing::debug!("GL function pointers loaded via custom loader");

        unsafe { Self::checked() }
    }

    /// The loader that first resolved the function pointers, if any has run.
    pub fn loader() -> Option<GlLoader> {
        GL_LOADED.get().copied()
    }

    unsafe fn checked() -> Result<Self> {
        if !gl::Viewport::is_loaded() || !gl::GetError::is_loaded() {
            bail!("GL entry points could not be resolved");
        }
        Ok(Self {
            _not_send: PhantomData,
        })
    }
}

fn gl_bool(value: bool) -> GLboolean {
    if value {
        gl::TRUE
    } else {
        gl::FALSE
    }
}

fn clamp_len(len: usize) -> GLsizei {
    len.min(GLsizei::MAX as usize) as GLsizei
}

impl GlBackend for NativeGl {
    fn active_texture(&mut self, texture: Enum) {
        unsafe { gl::ActiveTexture(texture) }
    }

    fn attach_shader(&mut self, program: Program, shader: Shader) {
        unsafe { gl::AttachShader(program.0, shader.0) }
    }

    fn bind_buffer(&mut self, target: Enum, buffer: Buffer) {
        unsafe { gl::BindBuffer(target, buffer.0) }
    }

    fn bind_texture(&mut self, target: Enum, texture: Texture) {
        unsafe { gl::BindTexture(target, texture.0) }
    }

    fn bind_vertex_array(&mut self, array: VertexArray) {
        unsafe { gl::BindVertexArray(array.0) }
    }

    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { gl::BlendColor(red, green, blue, alpha) }
    }

    fn blend_func(&mut self, sfactor: Enum, dfactor: Enum) {
        unsafe { gl::BlendFunc(sfactor, dfactor) }
    }

    fn buffer_data(&mut self, target: Enum, data: &[u8], usage: Enum) {
        unsafe {
            gl::BufferData(
                target,
                data.len() as GLsizeiptr,
                data.as_ptr().cast(),
                usage,
            )
        }
    }

    fn clear(&mut self, mask: u32) {
        unsafe { gl::Clear(mask) }
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { gl::ClearColor(red, green, blue, alpha) }
    }

    fn compile_shader(&mut self, shader: Shader) {
        unsafe { gl::CompileShader(shader.0) }
    }

    fn create_program(&mut self) -> Program {
        Program(unsafe { gl::CreateProgram() })
    }

    fn create_shader(&mut self, ty: Enum) -> Shader {
        Shader(unsafe { gl::CreateShader(ty) })
    }

    fn delete_buffer(&mut self, buffer: Buffer) {
        unsafe { gl::DeleteBuffers(1, &buffer.0) }
    }

    fn delete_texture(&mut self, texture: Texture) {
        unsafe { gl::DeleteTextures(1, &texture.0) }
    }

    fn disable(&mut self, cap: Enum) {
        unsafe { gl::Disable(cap) }
    }

    fn draw_arrays(&mut self, mode: Enum, first: i32, count: i32) {
        unsafe { gl::DrawArrays(mode, first, count) }
    }

    fn enable(&mut self, cap: Enum) {
        unsafe { gl::Enable(cap) }
    }

    fn enable_vertex_attrib_array(&mut self, attrib: Attrib) {
        unsafe { gl::EnableVertexAttribArray(attrib.0) }
    }

    fn flush(&mut self) {
        unsafe { gl::Flush() }
    }

    fn gen_buffer(&mut self) -> Buffer {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        Buffer(id)
    }

    fn gen_texture(&mut self) -> Texture {
        let mut id = 0;
        unsafe { gl::GenTextures(1, &mut id) };
        Texture(id)
    }

    fn gen_vertex_array(&mut self) -> VertexArray {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        VertexArray(id)
    }

    fn get_attrib_location(&mut self, program: Program, name: &CStr) -> i32 {
        unsafe { gl::GetAttribLocation(program.0, name.as_ptr()) }
    }

    fn get_error(&mut self) -> Enum {
        unsafe { gl::GetError() }
    }

    fn get_shader_info_log(&mut self, shader: Shader, buf: &mut [u8]) -> usize {
        let mut len: GLsizei = 0;
        unsafe {
            gl::GetShaderInfoLog(
                shader.0,
                clamp_len(buf.len()),
                &mut len,
                buf.as_mut_ptr() as *mut GLchar,
            )
        };
        len.max(0) as usize
    }

    fn get_shader_source(&mut self, shader: Shader, buf: &mut [u8]) -> usize {
        let mut len: GLsizei = 0;
        unsafe {
            gl::GetShaderSource(
                shader.0,
                clamp_len(buf.len()),
                &mut len,
                buf.as_mut_ptr() as *mut GLchar,
            )
        };
        len.max(0) as usize
    }

    fn get_shaderi(&mut self, shader: Shader, pname: Enum) -> i32 {
        let mut value: GLint = 0;
        unsafe { gl::GetShaderiv(shader.0, pname, &mut value) };
        value
    }

    fn get_tex_parameteri(&mut self, target: Enum, pname: Enum) -> i32 {
        let mut value: GLint = 0;
        unsafe { gl::GetTexParameteriv(target, pname, &mut value) };
        value
    }

    fn get_uniform_location(&mut self, program: Program, name: &CStr) -> Uniform {
        Uniform(unsafe { gl::GetUniformLocation(program.0, name.as_ptr()) })
    }

    fn link_program(&mut self, program: Program) {
        unsafe { gl::LinkProgram(program.0) }
    }

    fn read_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: Enum,
        ty: Enum,
        out: &mut [u8],
    ) {
        unsafe { gl::ReadPixels(x, y, width, height, format, ty, out.as_mut_ptr().cast()) }
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Scissor(x, y, width, height) }
    }

    fn shader_source(&mut self, shader: Shader, source: &str) {
        let text = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(shader.0, 1, &text, &len) }
    }

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
    ) {
        let data = pixels.map_or(ptr::null(), |p| p.as_ptr().cast());
        unsafe {
            gl::TexImage2D(
                target,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                ty,
                data,
            )
        }
    }

    fn tex_parameteri(&mut self, target: Enum, pname: Enum, param: i32) {
        unsafe { gl::TexParameteri(target, pname, param) }
    }

    fn uniform1f(&mut self, location: Uniform, value: f32) {
        unsafe { gl::Uniform1f(location.0, value) }
    }

    fn uniform4f(&mut self, location: Uniform, [x, y, z, w]: [f32; 4]) {
        unsafe { gl::Uniform4f(location.0, x, y, z, w) }
    }

    fn uniform4fv(&mut self, location: Uniform, values: &[[f32; 4]]) {
        unsafe { gl::Uniform4fv(location.0, clamp_len(values.len()), values.as_ptr().cast()) }
    }

    fn use_program(&mut self, program: Program) {
        unsafe { gl::UseProgram(program.0) }
    }

    fn vertex_attrib_pointer(
        &mut self,
        attrib: Attrib,
        size: i32,
        ty: Enum,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) {
        unsafe {
            gl::VertexAttribPointer(
                attrib.0,
                size,
                ty,
                gl_bool(normalized),
                stride,
                offset as *const c_void,
            )
        }
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) }
    }
}
