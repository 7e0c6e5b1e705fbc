pub mod page;

pub use page::{AttemptOutcome, Classification, FailedPage, PageImage, PageOutcome, PageResult};
