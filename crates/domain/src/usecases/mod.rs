//! Application use cases / business logic

pub mod aggregate;
pub mod cycle;
pub mod format;
pub mod publish;
pub mod schedule;

pub use aggregate::ContentAggregator;
pub use cycle::{CycleConfig, CycleError, CycleRunner, PostingCycle};
pub use format::{FormatConfig, FormatPath, FormattedPost, TweetFormatter};
pub use publish::PostPublisher;
pub use schedule::{PeriodicTimer, ScheduleConfig, Scheduler};
