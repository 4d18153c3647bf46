//! Deploy validation utilities
//!
//! Re-walks the input tree after a copy to confirm the output mirrors it

mod verify;

pub use verify::verify_deploy;
