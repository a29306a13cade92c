//! Case Copilot: case workbench and assistant chat session for
//! financial-crime investigations.

pub mod assistant;
pub mod cases;
pub mod config;
pub mod console;
pub mod error;
pub mod session;
