//! Domain models shared by the service and data layers.
//!
//! These are plain, core-owned types. Serenity objects are converted into them once,
//! at the Discord adapter boundary in `data::discord`, so the selection pipeline never
//! holds a reference to a platform type.

pub mod avatar;
pub mod emoji;
pub mod message;
pub mod reply;
pub mod role;
pub mod selection;
pub mod sticky;
pub mod submission;
