pub mod failure_quarantine;
pub mod page_enumerator;
pub mod response_extractor;
pub mod result_aggregator;

pub use failure_quarantine::FailureQuarantine;
pub use page_enumerator::{PageEnumerator, PageFilter};
pub use response_extractor::ResponseExtractor;
pub use result_aggregator::ResultAggregator;
