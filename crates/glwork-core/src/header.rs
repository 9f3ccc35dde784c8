//! Renders the C view of the function table.
//!
//! Host code that fills `struct fnargs` from C includes the output of
//! [`render_c_header`] instead of keeping its own copy of the numbering.

use std::fmt::Write;
use std::io;
use std::path::Path;

use crate::ffi::{GlFn, ARG_SLOTS};

pub fn render_c_header() -> String {
    let mut out = String::new();

    out.push_str("// Generated by glwork. Do not edit.\n\n");
    out.push_str("#ifndef GLWORK_H\n#define GLWORK_H\n\n");
    out.push_str("#include <stdint.h>\n\n");

    out.push_str("typedef enum {\n");
    for func in std::iter::once(GlFn::Undefined).chain(GlFn::ALL.iter().copied()) {
        let _ = writeln!(out, "\t{} = {},", func.c_name(), func.tag());
    }
    out.push_str("} glfn;\n\n");

    out.push_str("struct fnargs {\n\tglfn fn;\n\n");
    for slot in 0..ARG_SLOTS {
        let _ = writeln!(out, "\tuintptr_t a{slot};");
    }
    out.push_str("};\n\n");

    out.push_str("extern uintptr_t processFn(struct fnargs* args, char* parg);\n");
    out.push_str(
        "extern int32_t processFnChecked(struct fnargs* args, char* parg, uintptr_t* ret);\n\n",
    );
    out.push_str("#endif\n");
    out
}

/// Write the header from a consumer `build.rs`.
///
/// The file is only rewritten when its contents change, so dependents are
/// not rebuilt needlessly.
pub fn write_c_header(path: &Path) -> io::Result<()> {
    let header = render_c_header();
    if std::fs::read_to_string(path).is_ok_and(|old| old == header) {
        return Ok(());
    }
    std::fs::write(path, header)
}
