//! Play a synthesized 5.1 clip on whatever the default device is.
//!
//! Run with: cargo run --example surround_downmix --features cpal_sink
//!
//! Each speaker of the clip gets its own tone. On a stereo device you hear
//! them folded into two channels; on a surround device they land where they
//! were authored.

use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use verteiler::nodes::{CpalOutput, SamplePlayer};
use verteiler::{AudioNode, ChannelLayout};

fn surround_clip(sample_rate: u32, seconds: f32) -> SamplePlayer {
    // FL, FR, FC, LFE, BL, BR
    let tones = [220.0, 277.18, 329.63, 55.0, 440.0, 554.37];
    let channels = ChannelLayout::Surround5_1.channel_count();
    let frames = (sample_rate as f32 * seconds) as usize;

    let mut samples = Vec::with_capacity(frames * channels);
    for frame in 0..frames {
        let t = frame as f32 / sample_rate as f32;
        for freq in tones {
            samples.push((t * freq * std::f32::consts::TAU).sin() * 0.1);
        }
    }

    SamplePlayer::new(samples, channels, sample_rate)
}

fn main() -> Result<(), verteiler::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let output = CpalOutput::open_default()?;
    println!(
        "Using: {} @ {}Hz, {} ch",
        output.name(),
        output.sample_rate(),
        output.channels()
    );

    let clip = Arc::new(surround_clip(output.sample_rate(), 3.0));
    output.root().attach(clip.clone())?;

    while !clip.completed() {
        sleep(Duration::from_millis(50));
    }

    output.root().detach();
    Ok(())
}
