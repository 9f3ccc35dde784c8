//! A [`GlBackend`] that records every invocation instead of drawing.
//!
//! Useful for testing code that issues GL calls without a context. Return
//! values are scripted through the public fields.

use std::collections::HashMap;
use std::ffi::{CStr, CString};

use glwork_core::handles::*;
use glwork_core::GlFn;

use crate::backend::GlBackend;

/// One recorded GL invocation with owned copies of its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    ActiveTexture { texture: Enum },
    AttachShader { program: Program, shader: Shader },
    BindBuffer { target: Enum, buffer: Buffer },
    BindTexture { target: Enum, texture: Texture },
    BindVertexArray { array: VertexArray },
    BlendColor { rgba: [f32; 4] },
    BlendFunc { sfactor: Enum, dfactor: Enum },
    BufferData { target: Enum, data: Vec<u8>, usage: Enum },
    Clear { mask: u32 },
    ClearColor { rgba: [f32; 4] },
    CompileShader { shader: Shader },
    CreateProgram,
    CreateShader { ty: Enum },
    DeleteBuffer { buffer: Buffer },
    DeleteTexture { texture: Texture },
    Disable { cap: Enum },
    DrawArrays { mode: Enum, first: i32, count: i32 },
    Enable { cap: Enum },
    EnableVertexAttribArray { attrib: Attrib },
    Flush,
    GenBuffer,
    GenTexture,
    GenVertexArray,
    GetAttribLocation { program: Program, name: CString },
    GetError,
    GetShaderInfoLog { shader: Shader, buf_size: usize },
    GetShaderSource { shader: Shader, buf_size: usize },
    GetShaderiv { shader: Shader, pname: Enum },
    GetTexParameteriv { target: Enum, pname: Enum },
    GetUniformLocation { program: Program, name: CString },
    LinkProgram { program: Program },
    ReadPixels { x: i32, y: i32, width: i32, height: i32, format: Enum, ty: Enum, len: usize },
    Scissor { x: i32, y: i32, width: i32, height: i32 },
    ShaderSource { shader: Shader, source: String },
    TexImage2D {
        target: Enum,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: Enum,
        ty: Enum,
        pixels: Option<Vec<u8>>,
    },
    TexParameteri { target: Enum, pname: Enum, param: i32 },
    Uniform1f { location: Uniform, value: f32 },
    Uniform4f { location: Uniform, values: [f32; 4] },
    Uniform4fv { location: Uniform, values: Vec<[f32; 4]> },
    UseProgram { program: Program },
    VertexAttribPointer {
        attrib: Attrib,
        size: i32,
        ty: Enum,
        normalized: bool,
        stride: i32,
        offset: usize,
    },
    Viewport { x: i32, y: i32, width: i32, height: i32 },
}

impl Invocation {
    pub fn function(&self) -> GlFn {
        match self {
            Invocation::ActiveTexture { .. } => GlFn::ActiveTexture,
            Invocation::AttachShader { .. } => GlFn::AttachShader,
            Invocation::BindBuffer { .. } => GlFn::BindBuffer,
            Invocation::BindTexture { .. } => GlFn::BindTexture,
            Invocation::BindVertexArray { .. } => GlFn::BindVertexArray,
            Invocation::BlendColor { .. } => GlFn::BlendColor,
            Invocation::BlendFunc { .. } => GlFn::BlendFunc,
            Invocation::BufferData { .. } => GlFn::BufferData,
            Invocation::Clear { .. } => GlFn::Clear,
            Invocation::ClearColor { .. } => GlFn::ClearColor,
            Invocation::CompileShader { .. } => GlFn::CompileShader,
            Invocation::CreateProgram => GlFn::CreateProgram,
            Invocation::CreateShader { .. } => GlFn::CreateShader,
            Invocation::DeleteBuffer { .. } => GlFn::DeleteBuffer,
            Invocation::DeleteTexture { .. } => GlFn::DeleteTexture,
            Invocation::Disable { .. } => GlFn::Disable,
            Invocation::DrawArrays { .. } => GlFn::DrawArrays,
            Invocation::Enable { .. } => GlFn::Enable,
            Invocation::EnableVertexAttribArray { .. } => GlFn::EnableVertexAttribArray,
            Invocation::Flush => GlFn::Flush,
            Invocation::GenBuffer => GlFn::GenBuffer,
            Invocation::GenTexture => GlFn::GenTexture,
            Invocation::GenVertexArray => GlFn::GenVertexArray,
            Invocation::GetAttribLocation { .. } => GlFn::GetAttribLocation,
            Invocation::GetError => GlFn::GetError,
            Invocation::GetShaderInfoLog { .. } => GlFn::GetShaderInfoLog,
            Invocation::GetShaderSource { .. } => GlFn::GetShaderSource,
            Invocation::GetShaderiv { .. } => GlFn::GetShaderiv,
            Invocation::GetTexParameteriv { .. } => GlFn::GetTexParameteriv,
            Invocation::GetUniformLocation { .. } => GlFn::GetUniformLocation,
            Invocation::LinkProgram { .. } => GlFn::LinkProgram,
            Invocation::ReadPixels { .. } => GlFn::ReadPixels,
            Invocation::Scissor { .. } => GlFn::Scissor,
            Invocation::ShaderSource { .. } => GlFn::ShaderSource,
            Invocation::TexImage2D { .. } => GlFn::TexImage2D,
            Invocation::TexParameteri { .. } => GlFn::TexParameteri,
            Invocation::Uniform1f { .. } => GlFn::Uniform1f,
            Invocation::Uniform4f { .. } => GlFn::Uniform4f,
            Invocation::Uniform4fv { .. } => GlFn::Uniform4fv,
            Invocation::UseProgram { .. } => GlFn::UseProgram,
            Invocation::VertexAttribPointer { .. } => GlFn::VertexAttribPointer,
            Invocation::Viewport { .. } => GlFn::Viewport,
        }
    }
}

/// Records invocations in order and answers queries from scripted state.
#[derive(Debug, Default)]
pub struct RecordingGl {
    pub calls: Vec<Invocation>,
    /// Returned (and cleared) by the next `get_error`.
    pub pending_error: Enum,
    pub info_log: String,
    /// Source returned by `get_shader_source`, keyed by shader.
    pub sources: HashMap<Shader, String>,
    pub attrib_locations: HashMap<String, i32>,
    pub uniform_locations: HashMap<String, i32>,
    pub shader_param: i32,
    pub tex_param: i32,
    next_name: u32,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent invocation, if any.
    pub fn last(&self) -> Option<&Invocation> {
        self.calls.last()
    }

    fn record(&mut self, invocation: Invocation) {
        tracing::trace!(?invocation, "recorded");
        self.calls.push(invocation);
    }

    fn next_name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }
}

/// GL string query semantics: copy up to `buf.len() - 1` bytes and a NUL.
fn copy_c_string(text: &str, buf: &mut [u8]) -> usize {
    let Some(room) = buf.len().checked_sub(1) else {
        return 0;
    };
    let n = text.len().min(room);
    buf[..n].copy_from_slice(&text.as_bytes()[..n]);
    buf[n] = 0;
    n
}

fn lookup(table: &HashMap<String, i32>, name: &CStr) -> i32 {
    name.to_str()
        .ok()
        .and_then(|n| table.get(n).copied())
        .unwrap_or(-1)
}

impl GlBackend for RecordingGl {
    fn active_texture(&mut self, texture: Enum) {
        self.record(Invocation::ActiveTexture { texture });
    }

    fn attach_shader(&mut self, program: Program, shader: Shader) {
        self.record(Invocation::AttachShader { program, shader });
    }

    fn bind_buffer(&mut self, target: Enum, buffer: Buffer) {
        self.record(Invocation::BindBuffer { target, buffer });
    }

    fn bind_texture(&mut self, target: Enum, texture: Texture) {
        self.record(Invocation::BindTexture { target, texture });
    }

    fn bind_vertex_array(&mut self, array: VertexArray) {
        self.record(Invocation::BindVertexArray { array });
    }

    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(Invocation::BlendColor {
            rgba: [red, green, blue, alpha],
        });
    }

    fn blend_func(&mut self, sfactor: Enum, dfactor: Enum) {
        self.record(Invocation::BlendFunc { sfactor, dfactor });
    }

    fn buffer_data(&mut self, target: Enum, data: &[u8], usage: Enum) {
        self.record(Invocation::BufferData {
            target,
            data: data.to_vec(),
            usage,
        });
    }

    fn clear(&mut self, mask: u32) {
        self.record(Invocation::Clear { mask });
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(Invocation::ClearColor {
            rgba: [red, green, blue, alpha],
        });
    }

    fn compile_shader(&mut self, shader: Shader) {
        self.record(Invocation::CompileShader { shader });
    }

    fn create_program(&mut self) -> Program {
        self.record(Invocation::CreateProgram);
        Program(self.next_name())
    }

    fn create_shader(&mut self, ty: Enum) -> Shader {
        self.record(Invocation::CreateShader { ty });
        Shader(self.next_name())
    }

    fn delete_buffer(&mut self, buffer: Buffer) {
        self.record(Invocation::DeleteBuffer { buffer });
    }

    fn delete_texture(&mut self, texture: Texture) {
        self.record(Invocation::DeleteTexture { texture });
    }

    fn disable(&mut self, cap: Enum) {
        self.record(Invocation::Disable { cap });
    }

    fn draw_arrays(&mut self, mode: Enum, first: i32, count: i32) {
        self.record(Invocation::DrawArrays { mode, first, count });
    }

    fn enable(&mut self, cap: Enum) {
        self.record(Invocation::Enable { cap });
    }

    fn enable_vertex_attrib_array(&mut self, attrib: Attrib) {
        self.record(Invocation::EnableVertexAttribArray { attrib });
    }

    fn flush(&mut self) {
        self.record(Invocation::Flush);
    }

    fn gen_buffer(&mut self) -> Buffer {
        self.record(Invocation::GenBuffer);
        Buffer(self.next_name())
    }

    fn gen_texture(&mut self) -> Texture {
        self.record(Invocation::GenTexture);
        Texture(self.next_name())
    }

    fn gen_vertex_array(&mut self) -> VertexArray {
        self.record(Invocation::GenVertexArray);
        VertexArray(self.next_name())
    }

    fn get_attrib_location(&mut self, program: Program, name: &CStr) -> i32 {
        self.record(Invocation::GetAttribLocation {
            program,
            name: name.to_owned(),
        });
        lookup(&self.attrib_locations, name)
    }

    fn get_error(&mut self) -> Enum {
        self.record(Invocation::GetError);
        std::mem::take(&mut self.pending_error)
    }

    fn get_shader_info_log(&mut self, shader: Shader, buf: &mut [u8]) -> usize {
        self.record(Invocation::GetShaderInfoLog {
            shader,
            buf_size: buf.len(),
        });
        copy_c_string(&self.info_log, buf)
    }

    fn get_shader_source(&mut self, shader: Shader, buf: &mut [u8]) -> usize {
        self.record(Invocation::GetShaderSource {
            shader,
            buf_size: buf.len(),
        });
        let source = self.sources.get(&shader).map_or("", String::as_str);
        copy_c_string(source, buf)
    }

    fn get_shaderi(&mut self, shader: Shader, pname: Enum) -> i32 {
        self.record(Invocation::GetShaderiv { shader, pname });
        self.shader_param
    }

    fn get_tex_parameteri(&mut self, target: Enum, pname: Enum) -> i32 {
        self.record(Invocation::GetTexParameteriv { target, pname });
        self.tex_param
    }

    fn get_uniform_location(&mut self, program: Program, name: &CStr) -> Uniform {
        self.record(Invocation::GetUniformLocation {
            program,
            name: name.to_owned(),
        });
        Uniform(lookup(&self.uniform_locations, name))
    }

    fn link_program(&mut self, program: Program) {
        self.record(Invocation::LinkProgram { program });
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
        self.record(Invocation::ReadPixels {
            x,
            y,
            width,
            height,
            format,
            ty,
            len: out.len(),
        });
        // Deterministic pattern so callers can check what landed where.
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = i as u8;
        }
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Invocation::Scissor {
            x,
            y,
            width,
            height,
        });
    }

    fn shader_source(&mut self, shader: Shader, source: &str) {
        self.sources.insert(shader, source.to_string());
        self.record(Invocation::ShaderSource {
            shader,
            source: source.to_string(),
        });
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
        self.record(Invocation::TexImage2D {
            target,
            level,
            internal_format,
            width,
            height,
            format,
            ty,
            pixels: pixels.map(<[u8]>::to_vec),
        });
    }

    fn tex_parameteri(&mut self, target: Enum, pname: Enum, param: i32) {
        self.record(Invocation::TexParameteri {
            target,
            pname,
            param,
        });
    }

    fn uniform1f(&mut self, location: Uniform, value: f32) {
        self.record(Invocation::Uniform1f { location, value });
    }

    fn uniform4f(&mut self, location: Uniform, values: [f32; 4]) {
        self.record(Invocation::Uniform4f { location, values });
    }

    fn uniform4fv(&mut self, location: Uniform, values: &[[f32; 4]]) {
        self.record(Invocation::Uniform4fv {
            location,
            values: values.to_vec(),
        });
    }

    fn use_program(&mut self, program: Program) {
        self.record(Invocation::UseProgram { program });
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
        self.record(Invocation::VertexAttribPointer {
            attrib,
            size,
            ty,
            normalized,
            stride,
            offset,
        });
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Invocation::Viewport {
            x,
            y,
            width,
            height,
        });
    }
}
