//! JSON-RPC 2.0 envelopes shared by the protocol service and client.

pub mod types;

pub use types::{RpcError, RpcRequest, RpcResponse};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;
