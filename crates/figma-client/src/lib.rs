pub mod client;

pub use client::{FigmaClient, FigmaClientFactory, DEFAULT_API_BASE};
