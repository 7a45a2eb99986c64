pub mod discovery;
pub mod orchestrator;
pub mod report;
pub mod routing;

pub use discovery::discover_resumes;
pub use orchestrator::BatchOrchestrator;
pub use report::write_report;
pub use routing::OutputRouter;
