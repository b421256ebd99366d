pub use builder::EngineBuilder;
pub use config::{Ambiguity, Config, ConfigBuilder, GeometryPolicy, Multimapping, ZeroTail};
pub use counter::{Counter, Diagnostics, Tally};
pub use emitter::{Annotation, Collect, Discard, Emitter, TsvEmitter};
pub use engine::Engine;
pub use result::{Row, Summary};

pub mod annotation;
mod builder;
pub mod classify;
mod config;
mod counter;
pub mod emitter;
mod engine;
pub mod report;
mod result;
mod worker;
