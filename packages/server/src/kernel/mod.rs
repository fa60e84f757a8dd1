//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod edge_functions;
pub mod email;
pub mod jobs;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use ai::OpenAIAdapter;
pub use deps::{MissingConfig, ServerDeps};
pub use edge_functions::{EdgeFunctionError, SupabaseEdgeFunctions};
pub use email::ResendAdapter;
pub use jobs::{ChannelJobQueue, Job, JobHandler, JobQueue, JobRunner};
pub use test_dependencies::TestDependencies;
pub use traits::*;
