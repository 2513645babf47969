pub mod cube;
pub mod domain;
pub mod error;
pub mod presses;
pub mod protocol;
