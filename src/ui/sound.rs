/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

/// One sound effect per kind of game event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Hop,
    Splash,
    Squash,
    Home,
    Bonus,
    Clear,
    GameOver,
    Victory,
}

/// The effect that accompanies `ev`.
pub fn effect_for(ev: &GameEvent) -> Sfx {
    match ev {
        GameEvent::Hopped { .. } => Sfx::Hop,
        GameEvent::Drowned => Sfx::Splash,
        GameEvent::Crushed => Sfx::Squash,
        GameEvent::GoalReached { .. } => Sfx::Home,
        GameEvent::BoundaryBonus { .. } => Sfx::Bonus,
        GameEvent::LevelCleared { .. } => Sfx::Clear,
        GameEvent::GameOver => Sfx::GameOver,
        GameEvent::Victory { .. } => Sfx::Victory,
    }
}

/// The effect to actually play for a batch: the last (most significant)
/// event wins, so a hop that ends in a splash only plays the splash.
pub fn effect_for_batch(events: &[GameEvent]) -> Option<Sfx> {
    events.last().map(effect_for)
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::Sfx;

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::PI * 2.0;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_hop: Arc<Vec<u8>>,
        sfx_splash: Arc<Vec<u8>>,
        sfx_squash: Arc<Vec<u8>>,
        sfx_home: Arc<Vec<u8>>,
        sfx_bonus: Arc<Vec<u8>>,
        sfx_clear: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
        sfx_victory: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_hop: Arc::new(make_wav(&gen_hop())),
                sfx_splash: Arc::new(make_wav(&gen_splash())),
                sfx_squash: Arc::new(make_wav(&gen_squash())),
                sfx_home: Arc::new(make_wav(&gen_arpeggio(&[784.0, 988.0, 1175.0], 0.05))),
                sfx_bonus: Arc::new(make_wav(&gen_blip(1319.0, 0.08, 0.25))),
                sfx_clear: Arc::new(make_wav(&gen_arpeggio(&[523.0, 659.0, 784.0, 1047.0], 0.1))),
                sfx_game_over: Arc::new(make_wav(&gen_game_over())),
                sfx_victory: Arc::new(make_wav(&gen_victory())),
            })
        }

        pub fn play(&self, sfx: Sfx) {
            let buf = match sfx {
                Sfx::Hop => &self.sfx_hop,
                Sfx::Splash => &self.sfx_splash,
                Sfx::Squash => &self.sfx_squash,
                Sfx::Home => &self.sfx_home,
                Sfx::Bonus => &self.sfx_bonus,
                Sfx::Clear => &self.sfx_clear,
                Sfx::GameOver => &self.sfx_game_over,
                Sfx::Victory => &self.sfx_victory,
            };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn samples_for(duration: f32) -> usize {
        (SAMPLE_RATE as f32 * duration) as usize
    }

    /// Simple sine blip at given frequency and duration
    fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = samples_for(duration);
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                (t * freq * TAU).sin() * env * volume
            })
            .collect()
    }

    /// Hop: very short upward chirp
    fn gen_hop() -> Vec<f32> {
        let n = samples_for(0.05);
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = 400.0 + p * 500.0;
                let t = i as f32 / SAMPLE_RATE as f32;
                (t * freq * TAU).sin() * (1.0 - p) * 0.2
            })
            .collect()
    }

    /// Splash: filtered noise, loud attack, long tail
    fn gen_splash() -> Vec<f32> {
        let n = samples_for(0.35);
        let mut rng: u32 = 2024;
        let mut prev = 0.0_f32;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                // One-pole low-pass, darker as it fades
                let k = 0.6 - p * 0.5;
                prev += (noise - prev) * k;
                prev * (1.0 - p).powf(1.5) * 0.45
            })
            .collect()
    }

    /// Squash: low thud with a noise crunch
    fn gen_squash() -> Vec<f32> {
        let n = samples_for(0.18);
        let mut rng: u32 = 777;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = 160.0 - p * 100.0;
                let t = i as f32 / SAMPLE_RATE as f32;
                let tone = (t * freq * TAU).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (tone * 0.6 + noise * 0.4) * (1.0 - p).powf(0.8) * 0.4
            })
            .collect()
    }

    /// Notes in sequence, sine plus 2nd harmonic, each decaying
    fn gen_arpeggio(notes: &[f32], note_dur: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in notes {
            let n = samples_for(note_dur);
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.4;
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.28);
            }
        }
        samples
    }

    /// Game over: sad descending tone with a fade
    fn gen_game_over() -> Vec<f32> {
        let mut samples = gen_arpeggio(&[440.0, 370.0, 311.0, 261.0], 0.16);
        let fade_len = samples.len() / 3;
        let total = samples.len();
        for (i, s) in samples.iter_mut().enumerate().skip(total - fade_len) {
            *s *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }

    /// Victory: fanfare with a sustained top note
    fn gen_victory() -> Vec<f32> {
        let mut samples = gen_arpeggio(&[523.0, 659.0, 784.0, 1047.0, 784.0, 1047.0], 0.09);
        samples.extend(gen_blip(1047.0, 0.4, 0.3));
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_is_well_formed() {
            let wav = make_wav(&gen_hop());
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
            assert_eq!(wav.len(), 44 + data_size as usize);
        }

        #[test]
        fn generated_samples_stay_in_range() {
            for s in [gen_hop(), gen_splash(), gen_squash(), gen_game_over(), gen_victory()] {
                assert!(!s.is_empty());
                assert!(s.iter().all(|v| v.abs() <= 1.0));
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_event_has_an_effect() {
        assert_eq!(effect_for(&GameEvent::Hopped { col: 0, row: 0 }), Sfx::Hop);
        assert_eq!(effect_for(&GameEvent::Drowned), Sfx::Splash);
        assert_eq!(effect_for(&GameEvent::Crushed), Sfx::Squash);
        assert_eq!(effect_for(&GameEvent::GoalReached { slot: 1, points: 100 }), Sfx::Home);
        assert_eq!(effect_for(&GameEvent::BoundaryBonus { points: 50 }), Sfx::Bonus);
        assert_eq!(effect_for(&GameEvent::LevelCleared { level: 1 }), Sfx::Clear);
        assert_eq!(effect_for(&GameEvent::GameOver), Sfx::GameOver);
        assert_eq!(effect_for(&GameEvent::Victory { bonus: 500 }), Sfx::Victory);
    }

    #[test]
    fn batch_plays_last_event() {
        let events = [
            GameEvent::Hopped { col: 5, row: 3 },
            GameEvent::Drowned,
            GameEvent::GameOver,
        ];
        assert_eq!(effect_for_batch(&events), Some(Sfx::GameOver));
        assert_eq!(effect_for_batch(&[]), None);
    }
}
