//! Audio layer: tone descriptions, the sink capability, the shared mixing
//! bus, UI sound effects and the generative ambient loop.

mod ambient;
mod bus;
mod sfx;
mod sink;
mod tone;

pub use ambient::{
    chord_voices, tinkle_voice, AmbientConfig, AmbientFiring, AmbientScheduler, AmbientTick,
    CHORD_NOTES, CHORD_PEAK_GAIN, CHORD_SIZE, TINKLE_NOTES, TINKLE_PEAK_GAIN,
};
pub use bus::{MixBus, DEFAULT_MASTER_GAIN};
pub use sfx::{UiSound, UiSoundEffects};
pub use sink::{AudioSink, MemorySink, SilentSink};
pub use tone::{Automation, AutomationPoint, Ramp, Tone, Waveform};
