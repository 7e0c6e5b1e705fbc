pub mod attempt_flow;
pub mod page_ctx;

pub use attempt_flow::AttemptFlow;
pub use page_ctx::PageCtx;
