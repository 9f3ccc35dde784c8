use std::ffi::CString;

use glwork_core::handles::*;
use glwork_core::{word, DispatchError, FnArgs, GlCall, GlFn, ResultKind};
use glwork_gl::{process_fn, GlQueue, GlWorker, Invocation, RecordingGl};

static VERTICES: [u8; 12] = [0; 12];
static TEXELS: [u8; 4] = [255, 0, 0, 255];
static COLORS: [[f32; 4]; 2] = [[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]];

fn sample(func: GlFn) -> GlCall<'static> {
    match func {
        GlFn::Undefined => unreachable!("undefined has no call"),
        GlFn::ActiveTexture => GlCall::ActiveTexture { texture: gl::TEXTURE0 },
        GlFn::AttachShader => GlCall::AttachShader {
            program: Program(1),
            shader: Shader(2),
        },
        GlFn::BindBuffer => GlCall::BindBuffer {
            target: gl::ARRAY_BUFFER,
            buffer: Buffer(3),
        },
        GlFn::BindTexture => GlCall::BindTexture {
            target: gl::TEXTURE_2D,
            texture: Texture(4),
        },
        GlFn::BindVertexArray => GlCall::BindVertexArray { array: VertexArray(5) },
        GlFn::BlendColor => GlCall::BlendColor {
            red: 0.1,
            green: 0.2,
            blue: 0.3,
            alpha: 0.4,
        },
        GlFn::BlendFunc => GlCall::BlendFunc {
            sfactor: gl::SRC_ALPHA,
            dfactor: gl::ONE_MINUS_SRC_ALPHA,
        },
        GlFn::BufferData => GlCall::BufferData {
            target: gl::ARRAY_BUFFER,
            data: &VERTICES,
            usage: gl::STATIC_DRAW,
        },
        GlFn::Clear => GlCall::Clear {
            mask: gl::COLOR_BUFFER_BIT,
        },
        GlFn::ClearColor => GlCall::ClearColor {
            red: 0.0,
            green: 0.0,
            blue: 0.0,
            alpha: 1.0,
        },
        GlFn::CompileShader => GlCall::CompileShader { shader: Shader(2) },
        GlFn::CreateProgram => GlCall::CreateProgram,
        GlFn::CreateShader => GlCall::CreateShader {
            ty: gl::FRAGMENT_SHADER,
        },
        GlFn::DeleteBuffer => GlCall::DeleteBuffer { buffer: Buffer(3) },
        GlFn::DeleteTexture => GlCall::DeleteTexture { texture: Texture(4) },
        GlFn::Disable => GlCall::Disable { cap: gl::BLEND },
        GlFn::DrawArrays => GlCall::DrawArrays {
            mode: gl::TRIANGLES,
            first: 0,
            count: 3,
        },
        GlFn::Enable => GlCall::Enable { cap: gl::BLEND },
        GlFn::EnableVertexAttribArray => GlCall::EnableVertexAttribArray { attrib: Attrib(0) },
        GlFn::Flush => GlCall::Flush,
        GlFn::GenBuffer => GlCall::GenBuffer,
        GlFn::GenTexture => GlCall::GenTexture,
        GlFn::GenVertexArray => GlCall::GenVertexArray,
        GlFn::GetAttribLocation => GlCall::GetAttribLocation {
            program: Program(1),
            name: c"position",
        },
        GlFn::GetError => GlCall::GetError,
        GlFn::GetShaderInfoLog => GlCall::GetShaderInfoLog { shader: Shader(2) },
        GlFn::GetShaderSource => GlCall::GetShaderSource { shader: Shader(2) },
        GlFn::GetShaderiv => GlCall::GetShaderiv {
            shader: Shader(2),
            pname: gl::COMPILE_STATUS,
        },
        GlFn::GetTexParameteriv => GlCall::GetTexParameteriv {
            target: gl::TEXTURE_2D,
            pname: gl::TEXTURE_MIN_FILTER,
        },
        GlFn::GetUniformLocation => GlCall::GetUniformLocation {
            program: Program(1),
            name: c"tint",
        },
        GlFn::LinkProgram => GlCall::LinkProgram { program: Program(1) },
        GlFn::ReadPixels => GlCall::ReadPixels {
            x: 5,
            y: 6,
            width: 2,
            height: 2,
            format: gl::RGBA,
            ty: gl::UNSIGNED_BYTE,
        },
        GlFn::Scissor => GlCall::Scissor {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        },
        GlFn::ShaderSource => GlCall::ShaderSource {
            shader: Shader(2),
            source: "void main() {}",
        },
        GlFn::TexImage2D => GlCall::TexImage2D {
            target: gl::TEXTURE_2D,
            level: 0,
            internal_format: gl::RGBA as i32,
            width: 1,
            height: 1,
            format: gl::RGBA,
            ty: gl::UNSIGNED_BYTE,
            pixels: Some(&TEXELS),
        },
        GlFn::TexParameteri => GlCall::TexParameteri {
            target: gl::TEXTURE_2D,
            pname: gl::TEXTURE_MAG_FILTER,
            param: gl::LINEAR as i32,
        },
        GlFn::Uniform1f => GlCall::Uniform1f {
            location: Uniform(0),
            value: 0.5,
        },
        GlFn::Uniform4f => GlCall::Uniform4f {
            location: Uniform(1),
            values: [0.1, 0.2, 0.3, 0.4],
        },
        GlFn::Uniform4fv => GlCall::Uniform4fv {
            location: Uniform(2),
            values: &COLORS,
        },
        GlFn::UseProgram => GlCall::UseProgram { program: Program(1) },
        GlFn::VertexAttribPointer => GlCall::VertexAttribPointer {
            attrib: Attrib(1),
            size: 3,
            ty: gl::FLOAT,
            normalized: true,
            stride: 12,
            offset: 24,
        },
        GlFn::Viewport => GlCall::Viewport {
            x: 10,
            y: 20,
            width: 640,
            height: 480,
        },
    }
}

/// What the recording backend must see for `sample(func)`, field for field.
fn expected(func: GlFn) -> Invocation {
    match func {
        GlFn::Undefined => unreachable!("undefined has no call"),
        GlFn::ActiveTexture => Invocation::ActiveTexture { texture: gl::TEXTURE0 },
        GlFn::AttachShader => Invocation::AttachShader {
            program: Program(1),
            shader: Shader(2),
        },
        GlFn::BindBuffer => Invocation::BindBuffer {
            target: gl::ARRAY_BUFFER,
            buffer: Buffer(3),
        },
        GlFn::BindTexture => Invocation::BindTexture {
            target: gl::TEXTURE_2D,
            texture: Texture(4),
        },
        GlFn::BindVertexArray => Invocation::BindVertexArray { array: VertexArray(5) },
        GlFn::BlendColor => Invocation::BlendColor {
            rgba: [0.1, 0.2, 0.3, 0.4],
        },
        GlFn::BlendFunc => Invocation::BlendFunc {
            sfactor: gl::SRC_ALPHA,
            dfactor: gl::ONE_MINUS_SRC_ALPHA,
        },
        GlFn::BufferData => Invocation::BufferData {
            target: gl::ARRAY_BUFFER,
            data: VERTICES.to_vec(),
            usage: gl::STATIC_DRAW,
        },
        GlFn::Clear => Invocation::Clear {
            mask: gl::COLOR_BUFFER_BIT,
        },
        GlFn::ClearColor => Invocation::ClearColor {
            rgba: [0.0, 0.0, 0.0, 1.0],
        },
        GlFn::CompileShader => Invocation::CompileShader { shader: Shader(2) },
        GlFn::CreateProgram => Invocation::CreateProgram,
        GlFn::CreateShader => Invocation::CreateShader {
            ty: gl::FRAGMENT_SHADER,
        },
        GlFn::DeleteBuffer => Invocation::DeleteBuffer { buffer: Buffer(3) },
        GlFn::DeleteTexture => Invocation::DeleteTexture { texture: Texture(4) },
        GlFn::Disable => Invocation::Disable { cap: gl::BLEND },
        GlFn::DrawArrays => Invocation::DrawArrays {
            mode: gl::TRIANGLES,
            first: 0,
            count: 3,
        },
        GlFn::Enable => Invocation::Enable { cap: gl::BLEND },
        GlFn::EnableVertexAttribArray => Invocation::EnableVertexAttribArray { attrib: Attrib(0) },
        GlFn::Flush => Invocation::Flush,
        GlFn::GenBuffer => Invocation::GenBuffer,
        GlFn::GenTexture => Invocation::GenTexture,
        GlFn::GenVertexArray => Invocation::GenVertexArray,
        GlFn::GetAttribLocation => Invocation::GetAttribLocation {
            program: Program(1),
            name: CString::from(c"position"),
        },
        GlFn::GetError => Invocation::GetError,
        GlFn::GetShaderInfoLog => Invocation::GetShaderInfoLog {
            shader: Shader(2),
            buf_size: 64,
        },
        GlFn::GetShaderSource => Invocation::GetShaderSource {
            shader: Shader(2),
            buf_size: 64,
        },
        GlFn::GetShaderiv => Invocation::GetShaderiv {
            shader: Shader(2),
            pname: gl::COMPILE_STATUS,
        },
        GlFn::GetTexParameteriv => Invocation::GetTexParameteriv {
            target: gl::TEXTURE_2D,
            pname: gl::TEXTURE_MIN_FILTER,
        },
        GlFn::GetUniformLocation => Invocation::GetUniformLocation {
            program: Program(1),
            name: CString::from(c"tint"),
        },
        GlFn::LinkProgram => Invocation::LinkProgram { program: Program(1) },
        GlFn::ReadPixels => Invocation::ReadPixels {
            x: 5,
            y: 6,
            width: 2,
            height: 2,
            format: gl::RGBA,
            ty: gl::UNSIGNED_BYTE,
            len: 16,
        },
        GlFn::Scissor => Invocation::Scissor {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        },
        GlFn::ShaderSource => Invocation::ShaderSource {
            shader: Shader(2),
            source: "void main() {}".to_owned(),
        },
        GlFn::TexImage2D => Invocation::TexImage2D {
            target: gl::TEXTURE_2D,
            level: 0,
            internal_format: gl::RGBA as i32,
            width: 1,
            height: 1,
            format: gl::RGBA,
            ty: gl::UNSIGNED_BYTE,
            pixels: Some(TEXELS.to_vec()),
        },
        GlFn::TexParameteri => Invocation::TexParameteri {
            target: gl::TEXTURE_2D,
            pname: gl::TEXTURE_MAG_FILTER,
            param: gl::LINEAR as i32,
        },
        GlFn::Uniform1f => Invocation::Uniform1f {
            location: Uniform(0),
            value: 0.5,
        },
        GlFn::Uniform4f => Invocation::Uniform4f {
            location: Uniform(1),
            values: [0.1, 0.2, 0.3, 0.4],
        },
        GlFn::Uniform4fv => Invocation::Uniform4fv {
            location: Uniform(2),
            values: COLORS.to_vec(),
        },
        GlFn::UseProgram => Invocation::UseProgram { program: Program(1) },
        GlFn::VertexAttribPointer => Invocation::VertexAttribPointer {
            attrib: Attrib(1),
            size: 3,
            ty: gl::FLOAT,
            normalized: true,
            stride: 12,
            offset: 24,
        },
        GlFn::Viewport => Invocation::Viewport {
            x: 10,
            y: 20,
            width: 640,
            height: 480,
        },
    }
}

fn run_raw(gl: &mut RecordingGl, call: &GlCall<'_>, out: &mut [u8]) -> Result<usize, DispatchError> {
    let needs_out = call.output_len(out.len())?.is_some();
    let raw = call.encode(needs_out.then_some(out))?;
    unsafe { process_fn(gl, &raw.args, raw.parg) }
}

#[test]
fn every_function_reaches_its_backend_method_with_exact_arguments() {
    for &func in GlFn::ALL.iter().filter(|f| **f != GlFn::Undefined) {
        let mut gl = RecordingGl::new();
        gl.info_log = "ok".to_owned();
        let mut out = [0u8; 64];

        let call = sample(func);
        let ret = run_raw(&mut gl, &call, &mut out).unwrap_or_else(|err| panic!("{func}: {err}"));

        assert_eq!(gl.calls, vec![expected(func)], "{func}");
        assert_eq!(gl.calls[0].function(), func);
        if func.schema().result == ResultKind::Void {
            assert_eq!(ret, 0, "{func} is void");
        }
    }
}

#[test]
fn wire_values_survive_the_trip() {
    let mut gl = RecordingGl::new();
    let mut out = [0u8; 0];

    run_raw(&mut gl, &sample(GlFn::BlendColor), &mut out).unwrap();
    run_raw(&mut gl, &sample(GlFn::Uniform4fv), &mut out).unwrap();
    run_raw(&mut gl, &sample(GlFn::DrawArrays), &mut out).unwrap();

    assert_eq!(
        gl.calls,
        vec![
            Invocation::BlendColor {
                rgba: [0.1, 0.2, 0.3, 0.4]
            },
            Invocation::Uniform4fv {
                location: Uniform(2),
                values: COLORS.to_vec()
            },
            Invocation::DrawArrays {
                mode: gl::TRIANGLES,
                first: 0,
                count: 3
            },
        ]
    );
}

#[test]
fn missing_locations_come_back_as_minus_one() {
    let mut gl = RecordingGl::new();
    gl.attrib_locations.insert("position".to_owned(), 2);
    let mut out = [0u8; 0];

    let found = run_raw(&mut gl, &sample(GlFn::GetAttribLocation), &mut out).unwrap();
    let missing = run_raw(&mut gl, &sample(GlFn::GetUniformLocation), &mut out).unwrap();

    assert_eq!(word::to_i32(found), 2);
    assert_eq!(word::to_i32(missing), -1);
}

#[test]
fn hand_built_records_are_accepted() {
    let mut gl = RecordingGl::new();
    let mut args = FnArgs::new(GlFn::Viewport);
    args.args[0] = word::from_i32(-10);
    args.args[1] = word::from_i32(20);
    args.args[2] = word::from_i32(300);
    args.args[3] = word::from_i32(400);

    let ret = unsafe { process_fn(&mut gl, &args, std::ptr::null_mut()) }.unwrap();

    assert_eq!(ret, 0);
    assert_eq!(
        gl.last(),
        Some(&Invocation::Viewport {
            x: -10,
            y: 20,
            width: 300,
            height: 400
        })
    );
}

#[test]
fn queue_serves_a_shader_round_trip() {
    let (mut worker, queue): (GlWorker<RecordingGl>, GlQueue) = GlWorker::new(RecordingGl::new());
    worker.backend_mut().shader_param = gl::TRUE as i32;

    let issuer = std::thread::spawn(move || {
        let shader = Shader(queue.call(&GlCall::CreateShader { ty: gl::VERTEX_SHADER }, None)? as u32);
        queue.call(
            &GlCall::ShaderSource {
                shader,
                source: "attribute vec4 p;",
            },
            None,
        )?;
        queue.call(&GlCall::CompileShader { shader }, None)?;
        queue.call(
            &GlCall::GetShaderiv {
                shader,
                pname: gl::COMPILE_STATUS,
            },
            None,
        )
    });

    worker.run();
    let status = issuer.join().unwrap().unwrap();

    assert_eq!(word::to_i32(status), gl::TRUE as i32);
    let recorded: Vec<GlFn> = worker.backend().calls.iter().map(Invocation::function).collect();
    assert_eq!(
        recorded,
        vec![
            GlFn::CreateShader,
            GlFn::ShaderSource,
            GlFn::CompileShader,
            GlFn::GetShaderiv
        ]
    );
}
