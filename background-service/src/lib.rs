pub mod messages;
pub mod orchestrator;

pub use messages::{ActionResponse, BackgroundMessage, GenerateReplyRequest, TestConnectionRequest};
pub use orchestrator::RequestOrchestrator;
