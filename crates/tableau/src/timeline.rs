//! Scene scripts and their playback.
//!
//! A [`Scene`] is an ordered list of [`Step`]s: animations played
//! concurrently, explicit waits, and instant [`Change`]s. The
//! [`TimelinePlayer`] runs a scene against a [`SceneState`] at a fixed frame
//! rate and hands every frame to a [`FrameSink`](crate::export::FrameSink).
//!
//! Decorations that must track moving figures (measurement arrows, labels)
//! are bound with an [`Anchor`] instead of being animated themselves; the
//! player re-derives them after every tick.

mod anchor;
mod animation;
mod easing;
mod player;
mod scene;

pub use anchor::Anchor;
pub use animation::Animation;
pub use easing::Easing;
pub use player::TimelinePlayer;
pub use scene::{Change, Scene, SceneState, Step};
