//! Procedural audio - no sample files
//!
//! Every sound is synthesized from oscillators and noise buffers via the
//! Web Audio API. The named sounds are presets over two public primitives,
//! `play_tone` and `play_noise`. On native builds the manager keeps its
//! volume state but plays nothing; the headless demo only needs the
//! bookkeeping.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, AudioNode, GainNode, OscillatorNode, OscillatorType};

/// Background music note cycle (A3, B3, D4, E4) and step period
pub const MUSIC_NOTES: [f32; 4] = [220.0, 246.94, 293.66, 329.63];
pub const MUSIC_NOTE_PERIOD: f32 = 0.8;
/// Music bus gain relative to master volume
#[cfg(target_arch = "wasm32")]
const MUSIC_GAIN: f32 = 0.1;

/// Oscillator shapes for `play_tone`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[cfg(target_arch = "wasm32")]
impl From<Waveform> for OscillatorType {
    fn from(waveform: Waveform) -> Self {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
            Waveform::Triangle => OscillatorType::Triangle,
        }
    }
}

/// Named game sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// Ball bounces off a wall or the paddle
    Hit,
    /// Brick shattered
    Break,
    /// Missile launch
    Launch,
    /// Run ended
    GameOver,
    /// Missile explosion
    Explosion,
}

/// Audio manager for one game instance
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    /// Persistent bus all music notes route through; retuning it changes
    /// the volume of notes already sounding
    #[cfg(target_arch = "wasm32")]
    music_bus: Option<GainNode>,
    master_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(master_volume: f32) -> Self {
        let master_volume = master_volume.clamp(0.0, 1.0);

        #[cfg(target_arch = "wasm32")]
        let (ctx, music_bus) = {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let music_bus = ctx.as_ref().and_then(|ctx| {
                let bus = ctx.create_gain().ok()?;
                bus.gain().set_value(master_volume * MUSIC_GAIN);
                bus.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(bus)
            });
            (ctx, music_bus)
        };

        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            #[cfg(target_arch = "wasm32")]
            music_bus,
            master_volume,
            muted: false,
        }
    }

    /// Resume the audio context (browsers require a user gesture first)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0). One-shot sounds pick the new level up
    /// on their next trigger; the music bus is retuned immediately so notes
    /// already sounding follow too.
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.retune_music_bus();
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.retune_music_bus();
    }

    fn retune_music_bus(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(bus) = &self.music_bus {
            bus.gain().set_value(self.effective_volume() * MUSIC_GAIN);
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a named sound
    pub fn play(&self, sound: Sound) {
        match sound {
            Sound::Hit => self.play_tone(800.0, 0.1, Waveform::Sine, 0.3),
            Sound::Break => self.play_tone(400.0, 0.2, Waveform::Square, 0.3),
            Sound::Launch => self.play_tone(200.0, 0.5, Waveform::Sawtooth, 0.4),
            Sound::GameOver => self.play_tone(150.0, 0.8, Waveform::Sine, 0.4),
            Sound::Explosion => self.play_explosion(),
        }
    }

    /// Single decaying tone; `gain` is scaled by the master volume
    pub fn play_tone(&self, freq: f32, duration: f32, waveform: Waveform, gain: f32) {
        let vol = self.effective_volume() * gain;
        if vol <= 0.0 {
            return;
        }

        #[cfg(target_arch = "wasm32")]
        {
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            let Some((osc, env)) = self.create_osc(ctx, freq, waveform.into(), &ctx.destination())
            else {
                return;
            };
            let t = ctx.current_time();
            let duration = duration as f64;

            env.gain().set_value_at_time(vol, t).ok();
            env.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + duration + 0.05).ok();
        }

        #[cfg(not(target_arch = "wasm32"))]
        log::trace!("tone {freq} Hz {waveform:?} for {duration} s at {vol}");
    }

    /// White-noise burst; `gain` is scaled by the master volume
    pub fn play_noise(&self, duration: f32, gain: f32) {
        let vol = self.effective_volume() * gain;
        if vol <= 0.0 {
            return;
        }

        #[cfg(target_arch = "wasm32")]
        {
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            let _ = self.noise_burst(ctx, duration, vol);
        }

        #[cfg(not(target_arch = "wasm32"))]
        log::trace!("noise for {duration} s at {vol}");
    }

    /// One step of the background loop; the caller owns the note cycle
    #[cfg(target_arch = "wasm32")]
    pub fn play_music_note(&self, freq: f32) {
        if self.effective_volume() <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        let Some(bus) = &self.music_bus else { return };
        let Some((osc, env)) = self.create_osc(ctx, freq, OscillatorType::Sine, bus) else {
            return;
        };
        let t = ctx.current_time();
        let duration = MUSIC_NOTE_PERIOD as f64;

        // The bus carries the volume; the envelope only shapes the note
        env.gain().set_value_at_time(1.0, t).ok();
        env.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + duration + 0.05).ok();
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn play_music_note(&self, _freq: f32) {}

    // === Synthesis ===

    /// Create an oscillator routed through its own envelope gain into `dest`
    #[cfg(target_arch = "wasm32")]
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        dest: &AudioNode,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(dest).ok()?;

        Some((osc, gain))
    }

    /// Random-sample buffer through a decaying gain; stops itself at the
    /// buffer's end
    #[cfg(target_arch = "wasm32")]
    fn noise_burst(&self, ctx: &AudioContext, duration: f32, vol: f32) -> Option<()> {
        let sample_rate = ctx.sample_rate();
        let len = ((duration * sample_rate) as u32).max(1);
        let buffer = ctx.create_buffer(1, len, sample_rate).ok()?;

        let mut samples = vec![0.0f32; len as usize];
        for sample in &mut samples {
            *sample = rand::random_range(-1.0..1.0);
        }
        buffer.copy_to_channel(&mut samples, 0).ok()?;

        let src = ctx.create_buffer_source().ok()?;
        src.set_buffer(Some(&buffer));
        let env = ctx.create_gain().ok()?;
        src.connect_with_audio_node(&env).ok()?;
        env.connect_with_audio_node(&ctx.destination()).ok()?;

        let t = ctx.current_time();
        env.gain().set_value_at_time(vol, t).ok()?;
        env.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration as f64)
            .ok()?;
        src.start().ok()?;
        Some(())
    }

    /// Explosion: descending sawtooth rumble plus a noise crackle
    fn play_explosion(&self) {
        #[cfg(target_arch = "wasm32")]
        {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            let t = ctx.current_time();

            if let Some((osc, env)) =
                self.create_osc(ctx, 80.0, OscillatorType::Sawtooth, &ctx.destination())
            {
                env.gain().set_value_at_time(vol * 0.5, t).ok();
                env.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                    .ok();
                osc.frequency().set_value_at_time(80.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(40.0, t + 0.6)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.7).ok();
            }
        }

        self.play_noise(0.3, 0.2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_is_clamped_on_construction_and_update() {
        let mut audio = AudioManager::new(2.0);
        assert_eq!(audio.master_volume(), 1.0);
        audio.set_master_volume(-0.5);
        assert_eq!(audio.master_volume(), 0.0);
    }

    #[test]
    fn muted_audio_is_silent() {
        let mut audio = AudioManager::new(0.5);
        audio.set_muted(true);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_muted(false);
        assert_eq!(audio.effective_volume(), 0.5);
    }

    #[test]
    fn primitives_are_callable_without_an_audio_device() {
        let audio = AudioManager::new(0.5);
        audio.play_tone(440.0, 0.1, Waveform::Triangle, 0.3);
        audio.play_noise(0.2, 0.2);
        audio.play(Sound::Explosion);
        audio.play_music_note(MUSIC_NOTES[0]);
    }

    #[test]
    fn music_cycle_has_four_notes() {
        assert_eq!(MUSIC_NOTES.len(), 4);
        assert!(MUSIC_NOTES.windows(2).all(|w| w[0] < w[1]));
    }
}
