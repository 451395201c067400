pub mod error;
pub mod traits;
pub mod types;

pub use error::Error;
pub use traits::{FigmaApi, FigmaApiFactory};
pub use types::{Credential, ImageFormat, SessionId, ToolRequest};
