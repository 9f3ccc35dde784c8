//! Typed GL calls and their fixed-shape wire encoding.
//!
//! [`GlCall`] is what Rust code builds; [`FnArgs`] plus a `parg` pointer is
//! what crosses the C boundary. [`GlCall::encode`] and [`GlCall::from_raw`]
//! convert between the two following the slot layout of each function.

use std::ffi::{c_char, CStr};
use std::marker::PhantomData;
use std::{ptr, slice};

use crate::error::DispatchError;
use crate::ffi::{word, FnArgs, GlFn};
use crate::handles::*;
use crate::pixels;

/// One GL call with its arguments in their real types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlCall<'a> {
    ActiveTexture {
        texture: Enum,
    },
    AttachShader {
        program: Program,
        shader: Shader,
    },
    BindBuffer {
        target: Enum,
        buffer: Buffer,
    },
    BindTexture {
        target: Enum,
        texture: Texture,
    },
    BindVertexArray {
        array: VertexArray,
    },
    BlendColor {
        red: f32,
        green: f32,
        blue: f32,
        alpha: f32,
    },
    BlendFunc {
        sfactor: Enum,
        dfactor: Enum,
    },
    BufferData {
        target: Enum,
        data: &'a [u8],
        usage: Enum,
    },
    Clear {
        mask: u32,
    },
    ClearColor {
        red: f32,
        green: f32,
        blue: f32,
        alpha: f32,
    },
    CompileShader {
        shader: Shader,
    },
    CreateProgram,
    CreateShader {
        ty: Enum,
    },
    DeleteBuffer {
        buffer: Buffer,
    },
    DeleteTexture {
        texture: Texture,
    },
    Disable {
        cap: Enum,
    },
    DrawArrays {
        mode: Enum,
        first: i32,
        count: i32,
    },
    Enable {
        cap: Enum,
    },
    EnableVertexAttribArray {
        attrib: Attrib,
    },
    Flush,
    GenBuffer,
    GenTexture,
    GenVertexArray,
    GetAttribLocation {
        program: Program,
        name: &'a CStr,
    },
    GetError,
    /// Writes the log into the output buffer; its length is the GL buffer size.
    GetShaderInfoLog {
        shader: Shader,
    },
    GetShaderSource {
        shader: Shader,
    },
    /// Returns the parameter value itself as a sign-extended word; no output
    /// buffer is written.
    GetShaderiv {
        shader: Shader,
        pname: Enum,
    },
    /// Writes one native-endian `i32` into the output buffer.
    GetTexParameteriv {
        target: Enum,
        pname: Enum,
    },
    GetUniformLocation {
        program: Program,
        name: &'a CStr,
    },
    LinkProgram {
        program: Program,
    },
    ReadPixels {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: Enum,
        ty: Enum,
    },
    Scissor {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    ShaderSource {
        shader: Shader,
        source: &'a str,
    },
    TexImage2D {
        target: Enum,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: Enum,
        ty: Enum,
        pixels: Option<&'a [u8]>,
    },
    TexParameteri {
        target: Enum,
        pname: Enum,
        param: i32,
    },
    Uniform1f {
        location: Uniform,
        value: f32,
    },
    Uniform4f {
        location: Uniform,
        values: [f32; 4],
    },
    Uniform4fv {
        location: Uniform,
        values: &'a [[f32; 4]],
    },
    UseProgram {
        program: Program,
    },
    VertexAttribPointer {
        attrib: Attrib,
        size: i32,
        ty: Enum,
        normalized: bool,
        stride: i32,
        offset: usize,
    },
    Viewport {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// An encoded call: the record plus the pointer argument.
///
/// The lifetime ties the raw pointers to the call and output buffer they
/// were taken from.
#[derive(Debug)]
pub struct RawCall<'a> {
    pub args: FnArgs,
    pub parg: *mut c_char,
    _borrow: PhantomData<&'a mut [u8]>,
}

/// A call decoded from the wire together with the caller's output buffer.
#[derive(Debug)]
pub struct Decoded<'a> {
    pub call: GlCall<'a>,
    pub out: Option<&'a mut [u8]>,
}

impl<'a> GlCall<'a> {
    pub fn function(&self) -> GlFn {
        match self {
            GlCall::ActiveTexture { .. } => GlFn::ActiveTexture,
            GlCall::AttachShader { .. } => GlFn::AttachShader,
            GlCall::BindBuffer { .. } => GlFn::BindBuffer,
            GlCall::BindTexture { .. } => GlFn::BindTexture,
            GlCall::BindVertexArray { .. } => GlFn::BindVertexArray,
            GlCall::BlendColor { .. } => GlFn::BlendColor,
            GlCall::BlendFunc { .. } => GlFn::BlendFunc,
            GlCall::BufferData { .. } => GlFn::BufferData,
            GlCall::Clear { .. } => GlFn::Clear,
            GlCall::ClearColor { .. } => GlFn::ClearColor,
            GlCall::CompileShader { .. } => GlFn::CompileShader,
            GlCall::CreateProgram => GlFn::CreateProgram,
            GlCall::CreateShader { .. } => GlFn::CreateShader,
            GlCall::DeleteBuffer { .. } => GlFn::DeleteBuffer,
            GlCall::DeleteTexture { .. } => GlFn::DeleteTexture,
            GlCall::Disable { .. } => GlFn::Disable,
            GlCall::DrawArrays { .. } => GlFn::DrawArrays,
            GlCall::Enable { .. } => GlFn::Enable,
            GlCall::EnableVertexAttribArray { .. } => GlFn::EnableVertexAttribArray,
            GlCall::Flush => GlFn::Flush,
            GlCall::GenBuffer => GlFn::GenBuffer,
            GlCall::GenTexture => GlFn::GenTexture,
            GlCall::GenVertexArray => GlFn::GenVertexArray,
            GlCall::GetAttribLocation { .. } => GlFn::GetAttribLocation,
            GlCall::GetError => GlFn::GetError,
            GlCall::GetShaderInfoLog { .. } => GlFn::GetShaderInfoLog,
            GlCall::GetShaderSource { .. } => GlFn::GetShaderSource,
            GlCall::GetShaderiv { .. } => GlFn::GetShaderiv,
            GlCall::GetTexParameteriv { .. } => GlFn::GetTexParameteriv,
            GlCall::GetUniformLocation { .. } => GlFn::GetUniformLocation,
            GlCall::LinkProgram { .. } => GlFn::LinkProgram,
            GlCall::ReadPixels { .. } => GlFn::ReadPixels,
            GlCall::Scissor { .. } => GlFn::Scissor,
            GlCall::ShaderSource { .. } => GlFn::ShaderSource,
            GlCall::TexImage2D { .. } => GlFn::TexImage2D,
            GlCall::TexParameteri { .. } => GlFn::TexParameteri,
            GlCall::Uniform1f { .. } => GlFn::Uniform1f,
            GlCall::Uniform4f { .. } => GlFn::Uniform4f,
            GlCall::Uniform4fv { .. } => GlFn::Uniform4fv,
            GlCall::UseProgram { .. } => GlFn::UseProgram,
            GlCall::VertexAttribPointer { .. } => GlFn::VertexAttribPointer,
            GlCall::Viewport { .. } => GlFn::Viewport,
        }
    }

    /// Bytes the output buffer must hold for this call, if it writes one.
    pub fn output_len(&self, out_len: usize) -> Result<Option<usize>, DispatchError> {
        match *self {
            GlCall::ReadPixels {
                width,
                height,
                format,
                ty,
                ..
            } => pixels::image_len(width, height, format, ty).map(Some),
            GlCall::GetTexParameteriv { .. } => Ok(Some(std::mem::size_of::<i32>())),
            GlCall::GetShaderInfoLog { .. } | GlCall::GetShaderSource { .. } => Ok(Some(out_len)),
            _ => Ok(None),
        }
    }

    /// Encode into the wire record.
    ///
    /// Output buffers are checked here because the record cannot carry
    /// their length for every function.
    pub fn encode<'b>(&'b self, out: Option<&'b mut [u8]>) -> Result<RawCall<'b>, DispatchError> {
        let func = self.function();
        let mut record = FnArgs::new(func);
        let mut parg: *mut c_char = ptr::null_mut();
        let out_len = out.as_ref().map_or(0, |o| o.len());

        if let Some(needed) = self.output_len(out_len)? {
            let out = out.ok_or(DispatchError::MissingOutput(func))?;
            if out.len() < needed {
                return Err(DispatchError::BufferTooSmall {
                    func,
                    needed,
                    got: out.len(),
                });
            }
            parg = out.as_mut_ptr().cast();
        }

        let a = &mut record.args;

        match *self {
            GlCall::ActiveTexture { texture } => a[0] = word::from_u32(texture),
            GlCall::AttachShader { program, shader } => {
                a[0] = word::from_u32(program.0);
                a[1] = word::from_u32(shader.0);
            }
            GlCall::BindBuffer { target, buffer } => {
                a[0] = word::from_u32(target);
                a[1] = word::from_u32(buffer.0);
            }
            GlCall::BindTexture { target, texture } => {
                a[0] = word::from_u32(target);
                a[1] = word::from_u32(texture.0);
            }
            GlCall::BindVertexArray { array } => a[0] = word::from_u32(array.0),
            GlCall::BlendColor {
                red,
                green,
                blue,
                alpha,
            }
            | GlCall::ClearColor {
                red,
                green,
                blue,
                alpha,
            } => {
                a[0] = word::from_f32(red);
                a[1] = word::from_f32(green);
                a[2] = word::from_f32(blue);
                a[3] = word::from_f32(alpha);
            }
            GlCall::BlendFunc { sfactor, dfactor } => {
                a[0] = word::from_u32(sfactor);
                a[1] = word::from_u32(dfactor);
            }
            GlCall::BufferData {
                target,
                data,
                usage,
            } => {
                a[0] = word::from_u32(target);
                a[1] = data.len();
                a[2] = word::from_u32(usage);
                parg = data.as_ptr() as *mut c_char;
            }
            GlCall::Clear { mask } => a[0] = word::from_u32(mask),
            GlCall::CompileShader { shader } => a[0] = word::from_u32(shader.0),
            GlCall::CreateShader { ty } => a[0] = word::from_u32(ty),
            GlCall::DeleteBuffer { buffer } => a[0] = word::from_u32(buffer.0),
            GlCall::DeleteTexture { texture } => a[0] = word::from_u32(texture.0),
            GlCall::Disable { cap } | GlCall::Enable { cap } => a[0] = word::from_u32(cap),
            GlCall::DrawArrays { mode, first, count } => {
                a[0] = word::from_u32(mode);
                a[1] = word::from_i32(first);
                a[2] = word::from_i32(count);
            }
            GlCall::EnableVertexAttribArray { attrib } => a[0] = word::from_u32(attrib.0),
            GlCall::GetAttribLocation { program, name }
            | GlCall::GetUniformLocation { program, name } => {
                a[0] = word::from_u32(program.0);
                a[1] = name.as_ptr() as usize;
            }
            GlCall::GetShaderInfoLog { shader } | GlCall::GetShaderSource { shader } => {
                a[0] = word::from_u32(shader.0);
                a[1] = out_len;
            }
            GlCall::GetShaderiv { shader, pname } => {
                a[0] = word::from_u32(shader.0);
                a[1] = word::from_u32(pname);
            }
            GlCall::GetTexParameteriv { target, pname } => {
                a[0] = word::from_u32(target);
                a[1] = word::from_u32(pname);
            }
            GlCall::LinkProgram { program } | GlCall::UseProgram { program } => {
                a[0] = word::from_u32(program.0)
            }
            GlCall::ReadPixels {
                x,
                y,
                width,
                height,
                format,
                ty,
            } => {
                a[0] = word::from_i32(x);
                a[1] = word::from_i32(y);
                a[2] = word::from_i32(width);
                a[3] = word::from_i32(height);
                a[4] = word::from_u32(format);
                a[5] = word::from_u32(ty);
            }
            GlCall::Scissor {
                x,
                y,
                width,
                height,
            }
            | GlCall::Viewport {
                x,
                y,
                width,
                height,
            } => {
                a[0] = word::from_i32(x);
                a[1] = word::from_i32(y);
                a[2] = word::from_i32(width);
                a[3] = word::from_i32(height);
            }
            GlCall::ShaderSource { shader, source } => {
                a[0] = word::from_u32(shader.0);
                a[1] = source.as_ptr() as usize;
                a[2] = source.len();
            }
            GlCall::TexImage2D {
                target,
                level,
                internal_format,
                width,
                height,
                format,
                ty,
                pixels,
            } => {
                a[0] = word::from_u32(target);
                a[1] = word::from_i32(level);
                a[2] = word::from_i32(internal_format);
                a[3] = word::from_i32(width);
                a[4] = word::from_i32(height);
                a[5] = word::from_u32(format);
                a[6] = word::from_u32(ty);
                if let Some(pixels) = pixels {
                    parg = pixels.as_ptr() as *mut c_char;
                }
            }
            GlCall::TexParameteri {
                target,
                pname,
                param,
            } => {
                a[0] = word::from_u32(target);
                a[1] = word::from_u32(pname);
                a[2] = word::from_i32(param);
            }
            GlCall::Uniform1f { location, value } => {
                a[0] = word::from_i32(location.0);
                a[1] = word::from_f32(value);
            }
            GlCall::Uniform4f { location, values } => {
                a[0] = word::from_i32(location.0);
                for (slot, value) in a[1..5].iter_mut().zip(values) {
                    *slot = word::from_f32(value);
                }
            }
            GlCall::Uniform4fv { location, values } => {
                a[0] = word::from_i32(location.0);
                a[1] = values.len();
                parg = values.as_ptr() as *mut c_char;
            }
            GlCall::VertexAttribPointer {
                attrib,
                size,
                ty,
                normalized,
                stride,
                offset,
            } => {
                a[0] = word::from_u32(attrib.0);
                a[1] = word::from_i32(size);
                a[2] = word::from_u32(ty);
                a[3] = word::from_bool(normalized);
                a[4] = word::from_i32(stride);
                a[5] = offset;
            }
            GlCall::CreateProgram
            | GlCall::Flush
            | GlCall::GenBuffer
            | GlCall::GenTexture
            | GlCall::GenVertexArray
            | GlCall::GetError => {}
        }

        Ok(RawCall {
            args: record,
            parg,
            _borrow: PhantomData,
        })
    }

    /// Decode a wire record.
    ///
    /// Only the slots the function defines are read.
    ///
    /// # Safety
    ///
    /// Every address in the record and `parg` must be valid for the length
    /// the function's slot layout implies, for the whole of `'a`, and output
    /// memory must not be aliased elsewhere during that time.
    pub unsafe fn from_raw(args: &FnArgs, parg: *mut c_char) -> Result<Decoded<'a>, DispatchError> {
        let func = args.function()?;
        let a = &args.args;
        let mut out = None;

        let call = match func {
            GlFn::Undefined => return Err(DispatchError::Undefined),
            GlFn::ActiveTexture => GlCall::ActiveTexture {
                texture: word::to_u32(a[0]),
            },
            GlFn::AttachShader => GlCall::AttachShader {
                program: Program(word::to_u32(a[0])),
                shader: Shader(word::to_u32(a[1])),
            },
            GlFn::BindBuffer => GlCall::BindBuffer {
                target: word::to_u32(a[0]),
                buffer: Buffer(word::to_u32(a[1])),
            },
            GlFn::BindTexture => GlCall::BindTexture {
                target: word::to_u32(a[0]),
                texture: Texture(word::to_u32(a[1])),
            },
            GlFn::BindVertexArray => GlCall::BindVertexArray {
                array: VertexArray(word::to_u32(a[0])),
            },
            GlFn::BlendColor => GlCall::BlendColor {
                red: word::to_f32(a[0]),
                green: word::to_f32(a[1]),
                blue: word::to_f32(a[2]),
                alpha: word::to_f32(a[3]),
            },
            GlFn::BlendFunc => GlCall::BlendFunc {
                sfactor: word::to_u32(a[0]),
                dfactor: word::to_u32(a[1]),
            },
            GlFn::BufferData => GlCall::BufferData {
                target: word::to_u32(a[0]),
                data: input_slice(func, parg.cast(), a[1])?,
                usage: word::to_u32(a[2]),
            },
            GlFn::Clear => GlCall::Clear {
                mask: word::to_u32(a[0]),
            },
            GlFn::ClearColor => GlCall::ClearColor {
                red: word::to_f32(a[0]),
                green: word::to_f32(a[1]),
                blue: word::to_f32(a[2]),
                alpha: word::to_f32(a[3]),
            },
            GlFn::CompileShader => GlCall::CompileShader {
                shader: Shader(word::to_u32(a[0])),
            },
            GlFn::CreateProgram => GlCall::CreateProgram,
            GlFn::CreateShader => GlCall::CreateShader {
                ty: word::to_u32(a[0]),
            },
            GlFn::DeleteBuffer => GlCall::DeleteBuffer {
                buffer: Buffer(word::to_u32(a[0])),
            },
            GlFn::DeleteTexture => GlCall::DeleteTexture {
                texture: Texture(word::to_u32(a[0])),
            },
            GlFn::Disable => GlCall::Disable {
                cap: word::to_u32(a[0]),
            },
            GlFn::DrawArrays => GlCall::DrawArrays {
                mode: word::to_u32(a[0]),
                first: word::to_i32(a[1]),
                count: word::to_i32(a[2]),
            },
            GlFn::Enable => GlCall::Enable {
                cap: word::to_u32(a[0]),
            },
            GlFn::EnableVertexAttribArray => GlCall::EnableVertexAttribArray {
                attrib: Attrib(word::to_u32(a[0])),
            },
            GlFn::Flush => GlCall::Flush,
            GlFn::GenBuffer => GlCall::GenBuffer,
            GlFn::GenTexture => GlCall::GenTexture,
            GlFn::GenVertexArray => GlCall::GenVertexArray,
            GlFn::GetAttribLocation => GlCall::GetAttribLocation {
                program: Program(word::to_u32(a[0])),
                name: c_str(func, a[1])?,
            },
            GlFn::GetError => GlCall::GetError,
            GlFn::GetShaderInfoLog | GlFn::GetShaderSource => {
                let shader = Shader(word::to_u32(a[0]));
                out = Some(output_slice(func, parg, a[1])?);
                if func == GlFn::GetShaderInfoLog {
                    GlCall::GetShaderInfoLog { shader }
                } else {
                    GlCall::GetShaderSource { shader }
                }
            }
            GlFn::GetShaderiv => GlCall::GetShaderiv {
                shader: Shader(word::to_u32(a[0])),
                pname: word::to_u32(a[1]),
            },
            GlFn::GetTexParameteriv => {
                out = Some(output_slice(func, parg, std::mem::size_of::<i32>())?);
                GlCall::GetTexParameteriv {
                    target: word::to_u32(a[0]),
                    pname: word::to_u32(a[1]),
                }
            }
            GlFn::GetUniformLocation => GlCall::GetUniformLocation {
                program: Program(word::to_u32(a[0])),
                name: c_str(func, a[1])?,
            },
            GlFn::LinkProgram => GlCall::LinkProgram {
                program: Program(word::to_u32(a[0])),
            },
            GlFn::ReadPixels => {
                let (width, height) = (word::to_i32(a[2]), word::to_i32(a[3]));
                let (format, ty) = (word::to_u32(a[4]), word::to_u32(a[5]));
                let len = pixels::image_len(width, height, format, ty)?;
                out = Some(output_slice(func, parg, len)?);
                GlCall::ReadPixels {
                    x: word::to_i32(a[0]),
                    y: word::to_i32(a[1]),
                    width,
                    height,
                    format,
                    ty,
                }
            }
            GlFn::Scissor => GlCall::Scissor {
                x: word::to_i32(a[0]),
                y: word::to_i32(a[1]),
                width: word::to_i32(a[2]),
                height: word::to_i32(a[3]),
            },
            GlFn::ShaderSource => {
                let bytes = input_slice(func, a[1] as *const u8, a[2])?;
                GlCall::ShaderSource {
                    shader: Shader(word::to_u32(a[0])),
                    source: std::str::from_utf8(bytes)
                        .map_err(|_| DispatchError::InvalidSource)?,
                }
            }
            GlFn::TexImage2D => {
                let (width, height) = (word::to_i32(a[3]), word::to_i32(a[4]));
                let (format, ty) = (word::to_u32(a[5]), word::to_u32(a[6]));
                let pixels = if parg.is_null() {
                    None
                } else {
                    let len = pixels::image_len(width, height, format, ty)?;
                    Some(input_slice(func, parg.cast(), len)?)
                };
                GlCall::TexImage2D {
                    target: word::to_u32(a[0]),
                    level: word::to_i32(a[1]),
                    internal_format: word::to_i32(a[2]),
                    width,
                    height,
                    format,
                    ty,
                    pixels,
                }
            }
            GlFn::TexParameteri => GlCall::TexParameteri {
                target: word::to_u32(a[0]),
                pname: word::to_u32(a[1]),
                param: word::to_i32(a[2]),
            },
            GlFn::Uniform1f => GlCall::Uniform1f {
                location: Uniform(word::to_i32(a[0])),
                value: word::to_f32(a[1]),
            },
            GlFn::Uniform4f => GlCall::Uniform4f {
                location: Uniform(word::to_i32(a[0])),
                values: [
                    word::to_f32(a[1]),
                    word::to_f32(a[2]),
                    word::to_f32(a[3]),
                    word::to_f32(a[4]),
                ],
            },
            GlFn::Uniform4fv => GlCall::Uniform4fv {
                location: Uniform(word::to_i32(a[0])),
                values: input_slice(func, parg as *const [f32; 4], a[1])?,
            },
            GlFn::UseProgram => GlCall::UseProgram {
                program: Program(word::to_u32(a[0])),
            },
            GlFn::VertexAttribPointer => GlCall::VertexAttribPointer {
                attrib: Attrib(word::to_u32(a[0])),
                size: word::to_i32(a[1]),
                ty: word::to_u32(a[2]),
                normalized: word::to_bool(a[3]),
                stride: word::to_i32(a[4]),
                offset: a[5],
            },
            GlFn::Viewport => GlCall::Viewport {
                x: word::to_i32(a[0]),
                y: word::to_i32(a[1]),
                width: word::to_i32(a[2]),
                height: word::to_i32(a[3]),
            },
        };

        Ok(Decoded { call, out })
    }
}

unsafe fn input_slice<'a, T>(func: GlFn, data: *const T, len: usize) -> Result<&'a [T], DispatchError> {
    if len == 0 {
        return Ok(&[]);
    }
    if data.is_null() {
        return Err(DispatchError::NullPointer(func));
    }
    if !data.is_aligned() {
        return Err(DispatchError::Misaligned(func));
    }
    if len.saturating_mul(std::mem::size_of::<T>()) > isize::MAX as usize {
        return Err(DispatchError::LengthOverflow(func));
    }
    Ok(unsafe { slice::from_raw_parts(data, len) })
}

unsafe fn output_slice<'a>(func: GlFn, data: *mut c_char, len: usize) -> Result<&'a mut [u8], DispatchError> {
    if len == 0 {
        return Ok(&mut []);
    }
    if data.is_null() {
        return Err(DispatchError::NullPointer(func));
    }
    if len > isize::MAX as usize {
        return Err(DispatchError::LengthOverflow(func));
    }
    Ok(unsafe { slice::from_raw_parts_mut(data.cast(), len) })
}

unsafe fn c_str<'a>(func: GlFn, address: usize) -> Result<&'a CStr, DispatchError> {
    if address == 0 {
        return Err(DispatchError::NullPointer(func));
    }
    Ok(unsafe { CStr::from_ptr(address as *const c_char) })
}
