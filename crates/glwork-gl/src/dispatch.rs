//! Routing one call to one GL function.

use std::ffi::c_char;

use glwork_core::{word, DispatchError, FnArgs, GlCall, GlFn};
use tracing::trace;

use crate::backend::GlBackend;

fn require_out<'o>(
    func: GlFn,
    out: Option<&'o mut [u8]>,
    needed: usize,
) -> Result<&'o mut [u8], DispatchError> {
    let out = out.ok_or(DispatchError::MissingOutput(func))?;
    if out.len() < needed {
        return Err(DispatchError::BufferTooSmall {
            func,
            needed,
            got: out.len(),
        });
    }
    Ok(&mut out[..needed])
}

/// Execute `call` on `gl` and produce the result word.
///
/// Void calls yield `0`. Calls that fill `out` yield the number of bytes
/// written. Must run on the thread that owns the current GL context.
pub fn dispatch<B>(
    gl: &mut B,
    call: &GlCall<'_>,
    out: Option<&mut [u8]>,
) -> Result<usize, DispatchError>
where
    B: GlBackend + ?Sized,
{
    let func = call.function();
    trace!(%func, "dispatch");

    let result = match *call {
        GlCall::ActiveTexture { texture } => {
            gl.active_texture(texture);
            0
        }
        GlCall::AttachShader { program, shader } => {
            gl.attach_shader(program, shader);
            0
        }
        GlCall::BindBuffer { target, buffer } => {
            gl.bind_buffer(target, buffer);
            0
        }
        GlCall::BindTexture { target, texture } => {
            gl.bind_texture(target, texture);
            0
        }
        GlCall::BindVertexArray { array } => {
            gl.bind_vertex_array(array);
            0
        }
        GlCall::BlendColor {
            red,
            green,
            blue,
            alpha,
        } => {
            gl.blend_color(red, green, blue, alpha);
            0
        }
        GlCall::BlendFunc { sfactor, dfactor } => {
            gl.blend_func(sfactor, dfactor);
            0
        }
        GlCall::BufferData {
            target,
            data,
            usage,
        } => {
            gl.buffer_data(target, data, usage);
            0
        }
        GlCall::Clear { mask } => {
            gl.clear(mask);
            0
        }
        GlCall::ClearColor {
            red,
            green,
            blue,
            alpha,
        } => {
            gl.clear_color(red, green, blue, alpha);
            0
        }
        GlCall::CompileShader { shader } => {
            gl.compile_shader(shader);
            0
        }
        GlCall::CreateProgram => word::from_u32(gl.create_program().0),
        GlCall::CreateShader { ty } => word::from_u32(gl.create_shader(ty).0),
        GlCall::DeleteBuffer { buffer } => {
            gl.delete_buffer(buffer);
            0
        }
        GlCall::DeleteTexture { texture } => {
            gl.delete_texture(texture);
            0
        }
        GlCall::Disable { cap } => {
            gl.disable(cap);
            0
        }
        GlCall::DrawArrays { mode, first, count } => {
            gl.draw_arrays(mode, first, count);
            0
        }
        GlCall::Enable { cap } => {
            gl.enable(cap);
            0
        }
        GlCall::EnableVertexAttribArray { attrib } => {
            gl.enable_vertex_attrib_array(attrib);
            0
        }
        GlCall::Flush => {
            gl.flush();
            0
        }
        GlCall::GenBuffer => word::from_u32(gl.gen_buffer().0),
        GlCall::GenTexture => word::from_u32(gl.gen_texture().0),
        GlCall::GenVertexArray => word::from_u32(gl.gen_vertex_array().0),
        GlCall::GetAttribLocation { program, name } => {
            word::from_i32(gl.get_attrib_location(program, name))
        }
        GlCall::GetError => word::from_u32(gl.get_error()),
        GlCall::GetShaderInfoLog { shader } => {
            let out = out.ok_or(DispatchError::MissingOutput(func))?;
            gl.get_shader_info_log(shader, out)
        }
        GlCall::GetShaderSource { shader } => {
            let out = out.ok_or(DispatchError::MissingOutput(func))?;
            gl.get_shader_source(shader, out)
        }
        GlCall::GetShaderiv { shader, pname } => word::from_i32(gl.get_shaderi(shader, pname)),
        GlCall::GetTexParameteriv { target, pname } => {
            let out = require_out(func, out, std::mem::size_of::<i32>())?;
            let value = gl.get_tex_parameteri(target, pname);
            out.copy_from_slice(&value.to_ne_bytes());
            out.len()
        }
        GlCall::GetUniformLocation { program, name } => {
            word::from_i32(gl.get_uniform_location(program, name).0)
        }
        GlCall::LinkProgram { program } => {
            gl.link_program(program);
            0
        }
        GlCall::ReadPixels {
            x,
            y,
            width,
            height,
            format,
            ty,
        } => {
            let needed = call.output_len(0)?.unwrap_or(0);
            let out = require_out(func, out, needed)?;
            gl.read_pixels(x, y, width, height, format, ty, out);
            out.len()
        }
        GlCall::Scissor {
            x,
            y,
            width,
            height,
        } => {
            gl.scissor(x, y, width, height);
            0
        }
        GlCall::ShaderSource { shader, source } => {
            gl.shader_source(shader, source);
            0
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
            if let Some(pixels) = pixels {
                let needed = glwork_core::pixels::image_len(width, height, format, ty)?;
                if pixels.len() < needed {
                    return Err(DispatchError::BufferTooSmall {
                        func,
                        needed,
                        got: pixels.len(),
                    });
                }
            }
            gl.tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                format,
                ty,
                pixels,
            );
            0
        }
        GlCall::TexParameteri {
            target,
            pname,
            param,
        } => {
            gl.tex_parameteri(target, pname, param);
            0
        }
        GlCall::Uniform1f { location, value } => {
            gl.uniform1f(location, value);
            0
        }
        GlCall::Uniform4f { location, values } => {
            gl.uniform4f(location, values);
            0
        }
        GlCall::Uniform4fv { location, values } => {
            gl.uniform4fv(location, values);
            0
        }
        GlCall::UseProgram { program } => {
            gl.use_program(program);
            0
        }
        GlCall::VertexAttribPointer {
            attrib,
            size,
            ty,
            normalized,
            stride,
            offset,
        } => {
            gl.vertex_attrib_pointer(attrib, size, ty, normalized, stride, offset);
            0
        }
        GlCall::Viewport {
            x,
            y,
            width,
            height,
        } => {
            gl.viewport(x, y, width, height);
            0
        }
    };

    Ok(result)
}

/// Decode a wire record and dispatch it.
///
/// # Safety
///
/// See [`GlCall::from_raw`]: the addresses in `args` and `parg` must be valid
/// for the slot layout of the record's function.
pub unsafe fn process_fn<B>(
    gl: &mut B,
    args: &FnArgs,
    parg: *mut c_char,
) -> Result<usize, DispatchError>
where
    B: GlBackend + ?Sized,
{
    let decoded = unsafe { GlCall::from_raw(args, parg) }?;
    dispatch(gl, &decoded.call, decoded.out)
}
