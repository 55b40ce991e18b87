//! # quorum-engine
//!
//! Deterministic multi-attendee availability resolution for meeting scheduling.
//!
//! Given a set of calendar owners, a date range, and a meeting duration, the
//! engine derives each attendee's free time within business hours, sweeps the
//! combined free time at a fixed resolution, and returns the windows in which a
//! quorum of attendees is simultaneously free, ranked by confidence (the
//! fraction of attendees available).
//!
//! ## Modules
//!
//! - [`interval`] - Time intervals, busy slots, candidate slots
//! - [`policy`] - Business-day and business-hours configuration
//! - [`freebusy`] - Busy slots → free intervals within business hours
//! - [`source`] - The calendar source trait and an in-memory implementation
//! - [`aggregate`] - Concurrent per-attendee fetch and derivation
//! - [`sweep`] - Discretized common-slot finder
//! - [`rank`] - Confidence ranking and overlap deduplication
//! - [`resolve`] - End-to-end meeting time resolution
//! - [`error`] - Error types

pub mod aggregate;
pub mod error;
pub mod freebusy;
pub mod interval;
pub mod policy;
pub mod rank;
pub mod resolve;
pub mod source;
pub mod sweep;

pub use aggregate::{aggregate, AggregateOptions, Aggregation, SkipReason, SkippedAttendee};
pub use error::ResolveError;
pub use freebusy::derive_free;
pub use interval::{AttendeeAvailability, BusySlot, CandidateSlot, TimeInterval};
pub use policy::BusinessCalendarPolicy;
pub use rank::{rank, DEFAULT_MAX_RESULTS};
pub use resolve::{resolve_meeting_times, resolve_meeting_times_with, Resolution, ResolveOptions};
pub use source::{CalendarSource, InMemoryCalendarSource};
pub use sweep::{find_common, find_common_with_resolution, DEFAULT_RESOLUTION_MINUTES};
