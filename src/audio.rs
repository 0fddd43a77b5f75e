//! Tone feedback for gameplay events
//!
//! Every sound is a single decaying oscillator note - no external files.
//! Playback is fire-and-forget: callers log a failed tone and move on.

use std::fmt;

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One decaying note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_secs: f32,
    pub waveform: Waveform,
    /// Starting gain, decays exponentially over the duration
    pub gain: f32,
}

/// Default starting gain for every effect
pub const TONE_GAIN: f32 = 0.1;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a side wall or the ceiling
    WallBounce,
    /// Ball hits the paddle
    PaddleBounce,
    /// Brick destroyed
    BrickHit,
    /// Ball fell past the paddle
    LifeLost,
}

impl SoundEffect {
    pub fn tone(self) -> Tone {
        let (frequency_hz, duration_secs, waveform) = match self {
            SoundEffect::WallBounce => (440.0, 0.1, Waveform::Sine),
            SoundEffect::PaddleBounce => (660.0, 0.1, Waveform::Sine),
            SoundEffect::BrickHit => (880.0, 0.05, Waveform::Sine),
            SoundEffect::LifeLost => (220.0, 0.5, Waveform::Sawtooth),
        };
        Tone {
            frequency_hz,
            duration_secs,
            waveform,
            gain: TONE_GAIN,
        }
    }
}

impl From<&GameEvent> for SoundEffect {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::WallBounce => SoundEffect::WallBounce,
            GameEvent::PaddleBounce => SoundEffect::PaddleBounce,
            GameEvent::BrickBroken { .. } => SoundEffect::BrickHit,
            GameEvent::LifeLost => SoundEffect::LifeLost,
        }
    }
}

/// Why a tone could not be played
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// No audio context (insecure origin, no device, native build)
    Unavailable,
    /// The backend rejected a node or parameter change
    Backend(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable => write!(f, "audio output unavailable"),
            AudioError::Backend(msg) => write!(f, "audio backend error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

/// Anything that can sound a tone
pub trait ToneGenerator {
    fn play(&mut self, tone: Tone) -> Result<(), AudioError>;
}

/// Records tones instead of playing them (headless runs, tests)
#[derive(Debug, Default, Clone)]
pub struct ToneLog {
    pub played: Vec<Tone>,
}

impl ToneGenerator for ToneLog {
    fn play(&mut self, tone: Tone) -> Result<(), AudioError> {
        self.played.push(tone);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioError, Tone, ToneGenerator, Waveform};
    use crate::settings::Settings;

    /// Level the gain ramps down to; exponential ramps cannot reach zero
    const RAMP_FLOOR: f32 = 0.001;

    fn backend(e: wasm_bindgen::JsValue) -> AudioError {
        AudioError::Backend(format!("{:?}", e))
    }

    /// Web Audio tone generator
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // May fail if not in secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Pick up volume or mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let osc = ctx.create_oscillator().map_err(backend)?;
            let gain = ctx.create_gain().map_err(backend)?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(backend)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(backend)?;

            Ok((osc, gain))
        }
    }

    impl ToneGenerator for WebAudio {
        fn play(&mut self, tone: Tone) -> Result<(), AudioError> {
            let gain_level = tone.gain * self.volume;
            if gain_level <= 0.0 {
                return Ok(());
            }
            let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

            // Browsers suspend the context until a user gesture
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            };
            let (osc, gain) = Self::create_osc(ctx, tone.frequency_hz, osc_type)?;
            let t = ctx.current_time();
            let end = t + f64::from(tone.duration_secs);

            gain.gain()
                .set_value_at_time(gain_level, t)
                .map_err(backend)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(RAMP_FLOOR.min(gain_level), end)
                .map_err(backend)?;

            osc.start_with_when(t).map_err(backend)?;
            osc.stop_with_when(end).map_err(backend)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tones() {
        let wall = SoundEffect::from(&GameEvent::WallBounce).tone();
        assert_eq!((wall.frequency_hz, wall.duration_secs), (440.0, 0.1));

        let paddle = SoundEffect::from(&GameEvent::PaddleBounce).tone();
        assert_eq!(paddle.frequency_hz, 660.0);

        let brick = SoundEffect::from(&GameEvent::BrickBroken { column: 2, row: 1 }).tone();
        assert_eq!((brick.frequency_hz, brick.duration_secs), (880.0, 0.05));
        assert_eq!(brick.waveform, Waveform::Sine);

        let lost = SoundEffect::from(&GameEvent::LifeLost).tone();
        assert_eq!((lost.frequency_hz, lost.duration_secs), (220.0, 0.5));
        assert_eq!(lost.waveform, Waveform::Sawtooth);
        assert_eq!(lost.gain, TONE_GAIN);
    }

    #[test]
    fn test_tone_log_records_in_order() {
        let mut log = ToneLog::default();
        log.play(SoundEffect::BrickHit.tone()).unwrap();
        log.play(SoundEffect::WallBounce.tone()).unwrap();
        let freqs: Vec<f32> = log.played.iter().map(|t| t.frequency_hz).collect();
        assert_eq!(freqs, vec![880.0, 440.0]);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(AudioError::Unavailable.to_string(), "audio output unavailable");
        assert!(
            AudioError::Backend("NotAllowed".into())
                .to_string()
                .contains("NotAllowed")
        );
    }
}
