pub mod orchestrator;

pub use orchestrator::{NoopObserver, SearchObserver, SearchOrchestrator, SearchOutcome, SessionRateState};
