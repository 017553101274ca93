//! Processor module - the per-message pipeline.

mod message_processor;

pub use message_processor::{MessageProcessor, ProcessorConfig, RenderedReply};
