//! Typed wrappers around the integer names GL hands out.

use std::fmt;

/// Equivalent to `GLenum`.
pub type Enum = u32;

macro_rules! gl_handle {
    ($(#[$doc:meta])* $name:ident($inner:ty)) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

gl_handle!(
    /// A compiled and linkable shader program.
    Program(u32)
);
gl_handle!(
    /// A GLSL shader object.
    Shader(u32)
);
gl_handle!(
    /// A buffer object.
    Buffer(u32)
);
gl_handle!(
    /// A texture object.
    Texture(u32)
);
gl_handle!(VertexArray(u32));
gl_handle!(
    /// Location of a uniform variable. `-1` means the name is not active.
    Uniform(i32)
);
gl_handle!(
    /// Index of a vertex attribute.
    Attrib(u32)
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_handle_kind() {
        assert_eq!(Program(3).to_string(), "Program(3)");
        assert_eq!(Uniform(-1).to_string(), "Uniform(-1)");
        assert_eq!(VertexArray(9).to_string(), "VertexArray(9)");
    }
}
