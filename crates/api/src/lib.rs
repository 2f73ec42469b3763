#![forbid(unsafe_code)]

pub mod client;
pub mod http;
pub mod memory;

pub use client::{
    ApiError, AssessmentApi, Backend, LearningPathApi, PayloadStream, ScheduleApi,
};
pub use http::{HttpBackend, SseDecoder};
pub use memory::{InMemoryBackend, ScriptedFrame};
