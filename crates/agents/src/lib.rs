//! Analysis agents: thin prompting and parsing layers around the chat
//! collaborator. Each agent hands the model structured JSON, asks for a
//! fixed reply format, and recovers anything unparseable into a clearly
//! labelled default record so the pipeline always gets *some* output.

pub mod insight;
pub mod narrative;
pub mod offset;
mod parse;
mod payload;
pub mod testing;
pub mod tradeoff;

pub use insight::InsightGenerator;
pub use narrative::NarrativeGenerator;
pub use offset::OffsetAdvisor;
pub use tradeoff::TradeOffEvaluator;
