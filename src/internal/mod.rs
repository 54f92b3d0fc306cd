// Internal utilities shared across schemasketch modules

pub mod error;
