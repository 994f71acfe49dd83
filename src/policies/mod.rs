//! Timing policies.
//!
//! ## Contents
//! - [`JitterPolicy`] randomization of the music interval
//!
//! ## Quick wiring
//! ```text
//! GameConfig { music: Duration, music_jitter: JitterPolicy, .. }
//!      └─► core::coordinator::Coordinator uses music_jitter.apply(music)
//!          for every "music playing" pause
//! ```

mod jitter;

pub use jitter::JitterPolicy;
