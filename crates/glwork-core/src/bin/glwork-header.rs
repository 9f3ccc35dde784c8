//! Print the C header for `struct fnargs` and `processFn`.
//!
//! Usage: `glwork-header > glwork.h`. Build scripts can call
//! `glwork_core::header::write_c_header` instead.

fn main() {
    print!("{}", glwork_core::header::render_c_header());
}
