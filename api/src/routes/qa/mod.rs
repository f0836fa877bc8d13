pub mod qa_request;
pub mod qa_route;
