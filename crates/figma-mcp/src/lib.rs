pub mod args;
pub mod dispatch;
pub mod jsonrpc;
pub mod tools;

pub use dispatch::{Dispatcher, ToolContent, ToolInvocation, ToolResult};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use tools::{ToolDefinition, ToolRegistry};
