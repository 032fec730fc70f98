mod request;
mod response;

pub use request::{MessageRequest, ShapeRequest};
pub use response::{HealthResponse, MessageResponse, SelectionView, SessionView, TurnView};
