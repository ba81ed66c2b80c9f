#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
//! Ambient soundtrack, synthesized through the Web Audio API.
//!
//! No audio files: one oscillator per note, a master gain, and a batch
//! of note events scheduled ahead of time on the audio clock. Starts
//! muted; unmuting lazily creates the context (browsers refuse audio
//! before a user gesture) and schedules the melody. Native builds keep
//! the mute state but make no sound.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorType};

/// Pentatonic ambient loop, in Hz.
const MELODY: [f32; 8] = [261.63, 329.63, 392.0, 523.25, 392.0, 329.63, 261.63, 220.0];
const NOTE_DURATION: f64 = 0.9;
/// Loops scheduled per unmute; ~2.4 minutes of music in one batch.
const SCHEDULED_LOOPS: usize = 20;
const MASTER_GAIN: f32 = 0.07;
const NOTE_PEAK: f32 = 0.4;

pub struct AmbientMusic {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    #[cfg(target_arch = "wasm32")]
    master: Option<GainNode>,
    muted: bool,
    scheduled: bool,
}

impl AmbientMusic {
    pub fn new() -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx: None,
            #[cfg(target_arch = "wasm32")]
            master: None,
            muted: true,
            scheduled: false,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip mute. Never throws: a missing or refused audio context just
    /// leaves the application silent.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if self.muted {
            self.stop();
        } else {
            self.start();
        }
        self.muted
    }

    #[cfg(target_arch = "wasm32")]
    fn start(&mut self) {
        if self.scheduled {
            return;
        }

        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(e) => {
                    tracing::warn!("audio unavailable: {e:?}");
                    return;
                }
            }
        }
        let Some(ctx) = &self.ctx else { return };

        // suspended until a user gesture; the toggle itself is one
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let Ok(master) = ctx.create_gain() else {
            tracing::warn!("audio unavailable: no gain node");
            return;
        };
        master.gain().set_value(MASTER_GAIN);
        if master.connect_with_audio_node(&ctx.destination()).is_err() {
            tracing::warn!("audio unavailable: destination refused");
            return;
        }

        let loop_duration = MELODY.len() as f64 * NOTE_DURATION;
        let base = ctx.current_time();
        for lap in 0..SCHEDULED_LOOPS {
            for (i, &freq) in MELODY.iter().enumerate() {
                let start = base + lap as f64 * loop_duration + i as f64 * NOTE_DURATION;
                self.schedule_note(ctx, &master, freq, start);
            }
        }

        self.master = Some(master);
        self.scheduled = true;
        tracing::info!(loops = SCHEDULED_LOOPS, "ambient melody scheduled");
    }

    #[cfg(target_arch = "wasm32")]
    fn schedule_note(&self, ctx: &AudioContext, master: &GainNode, freq: f32, start: f64) {
        let (Ok(osc), Ok(gain)) = (ctx.create_oscillator(), ctx.create_gain()) else {
            return;
        };

        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value(freq);

        // quick attack, long exponential tail
        gain.gain().set_value_at_time(0.0, start).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(NOTE_PEAK, start + 0.05)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, start + NOTE_DURATION * 0.85)
            .ok();

        if osc.connect_with_audio_node(&gain).is_err()
            || gain.connect_with_audio_node(master).is_err()
        {
            return;
        }

        osc.start_with_when(start).ok();
        osc.stop_with_when(start + NOTE_DURATION).ok();
    }

    #[cfg(target_arch = "wasm32")]
    fn stop(&mut self) {
        if let (Some(ctx), Some(master)) = (&self.ctx, &self.master) {
            master.gain().set_value_at_time(0.0, ctx.current_time()).ok();
        }
        self.scheduled = false;
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn start(&mut self) {
        tracing::info!("audio is only available in the browser build");
        self.scheduled = true;
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn stop(&mut self) {
        self.scheduled = false;
    }
}

impl Default for AmbientMusic {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_muted() {
        assert!(AmbientMusic::new().is_muted());
    }

    #[test]
    fn toggling_without_a_context_never_panics() {
        let mut music = AmbientMusic::new();
        assert!(!music.toggle_mute());
        assert!(music.toggle_mute());
        assert!(!music.toggle_mute());
    }

    #[test]
    fn unmute_then_mute_rearms_scheduling() {
        let mut music = AmbientMusic::new();
        music.toggle_mute();
        assert!(music.scheduled);
        music.toggle_mute();
        assert!(!music.scheduled);
    }

    #[test]
    fn melody_loops_cleanly() {
        // the loop tail resolves back toward the tonic below it
        assert_eq!(MELODY.len() as f64 * NOTE_DURATION, 7.2);
        assert!(MELODY[7] < MELODY[0]);
    }
}
