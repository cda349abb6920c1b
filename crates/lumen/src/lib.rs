//! Lighting-choreography compiler and link tooling.
//!
//! lumen compiles lume choreography scripts into compact opcode streams and
//! delivers them to a remote controller over a small-MTU wireless link.
//!
//! # Crate Structure
//!
//! - [`wire`] — payload layout, control payloads, frame chunking
//! - [`script`] — lexer, opcode tables, code generator
//! - [`link`] — corridor delivery, timeline sync, connection lifecycle

/// Re-export wire types.
pub mod wire {
    pub use lumen_wire::*;
}

/// Re-export script compiler types.
pub mod script {
    pub use lumen_script::*;
}

/// Re-export link types.
pub mod link {
    pub use lumen_link::*;
}
