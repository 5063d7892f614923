//! Transport Adapter - reqwest 实现与测试用脚本化实现

mod http_transport;
mod scripted_transport;

pub use http_transport::{HttpTransport, HttpTransportConfig};
pub use scripted_transport::{RecordedCall, ScriptedTransport};
