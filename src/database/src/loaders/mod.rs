mod demo;

pub use demo::*;
