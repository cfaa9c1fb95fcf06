pub mod catalog;
pub mod command;
pub mod consumer;
pub mod document;
pub mod error;
pub mod input;
pub mod operators;
pub mod state;
pub mod test_util;
pub mod types;

pub use catalog::EventCatalogSource;
pub use command::FilterCommand;
pub use consumer::FilterConsumer;
pub use document::FilterDocument;
pub use error::FilterError;
pub use error::Result;
pub use operators::AttributeOperator;
pub use state::FilterState;
pub use state::StateChange;
pub use types::AttributeFilter;
pub use types::AttributeValue;
pub use types::FilterStep;
pub use types::RangeValue;
