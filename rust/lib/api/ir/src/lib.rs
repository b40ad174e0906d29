//! kun Intermediate Representation (IR)
//!
//! Plain data structures shared between:
//! - the resolver (`kun-parser`), which consumes signatures and produces a spec
//! - the codegen shell, which loads signatures and writes the spec out
//! - renderers, which read the spec
//!
//! Two halves:
//! 1. Signature: the input contract from the reflection layer
//! 2. Spec: resolved operations, requests, bindings and responses

pub mod types;
pub mod signature;
pub mod spec;

pub use types::*;
pub use signature::*;
pub use spec::*;
