//! Speech narration pipeline
//!
//! Narration requests from session operations are queued and rendered by a
//! single worker that owns the synthesis device. Enqueueing never blocks and
//! never fails visibly; device errors are absorbed and recovered here.

mod backend;
mod narrator;
mod worker;

pub use backend::{HttpSpeechBackend, SpeechBackend};
pub use narrator::{NarrationItem, Narrator};
pub use worker::SpeechPipeline;
