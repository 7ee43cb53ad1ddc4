//! Nodes that generate audio.

mod player;
mod sine;
mod stream;

pub use player::SamplePlayer;
pub use sine::Sine;
pub use stream::{StreamFeed, StreamSource};
