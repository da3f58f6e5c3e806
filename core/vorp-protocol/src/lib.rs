#![no_std] // Shared with the WASM façade

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod ids;
pub mod normalize;
pub mod script;

// Re-export core types for convenience
pub use ids::GlossId;
pub use normalize::{is_word_char, normalize};
pub use script::{SegmentationMode, ScriptFlags};

pub mod model;
pub use model::*;
