pub mod model;
pub mod rpc;
pub mod server;
pub mod social;
