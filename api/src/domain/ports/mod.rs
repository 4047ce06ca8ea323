//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod directory;
pub mod notifier;
pub mod repositories;
pub mod trace;

pub use directory::{resolve_profile, PlayerDirectory, ProfileSource, ResolvedProfile};
pub use notifier::{Notification, NotificationKind, NotificationSink};
pub use repositories::EvaluationRepository;
pub use trace::{RatingSnapshot, RatingStats, TraceContext, TraceSink};
