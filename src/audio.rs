//! Audio cues for simulation events
//!
//! The simulation only emits `GameEvent`s. This module maps them to short
//! procedurally generated tones; on the web they are played through the Web
//! Audio API, elsewhere the cue table is still available for tests and logs.

use crate::sim::{GameEvent, HitCause};

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

/// A single decaying tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub frequency: f32,
    /// Seconds
    pub duration: f32,
    pub waveform: Waveform,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fires a volley
    Shoot,
    /// Player rammed by an enemy
    PlayerHitByEnemy,
    /// Player struck by an enemy bullet
    PlayerHitByBullet,
    /// Enemy destroyed
    EnemyKilled,
    /// Bullet upgrade collected
    PowerPickup,
    /// Bonus apple collected
    PointsPickup,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shoot { .. } => Some(SoundEffect::Shoot),
            GameEvent::PlayerHit { cause, .. } => Some(match cause {
                HitCause::Enemy => SoundEffect::PlayerHitByEnemy,
                HitCause::EnemyBullet => SoundEffect::PlayerHitByBullet,
            }),
            GameEvent::EnemyKilled { .. } => Some(SoundEffect::EnemyKilled),
            GameEvent::PowerPickup { .. } => Some(SoundEffect::PowerPickup),
            GameEvent::PointsPickup { .. } => Some(SoundEffect::PointsPickup),
            GameEvent::LevelWon { .. } | GameEvent::GameOver { .. } => None,
        }
    }

    pub const fn tone(self) -> Tone {
        let (frequency, duration, waveform) = match self {
            SoundEffect::Shoot => (600.0, 0.1, Waveform::Sine),
            SoundEffect::PlayerHitByEnemy => (300.0, 0.3, Waveform::Square),
            SoundEffect::PlayerHitByBullet => (200.0, 0.2, Waveform::Square),
            SoundEffect::EnemyKilled => (800.0, 0.15, Waveform::Sine),
            SoundEffect::PowerPickup => (1000.0, 0.2, Waveform::Sine),
            SoundEffect::PointsPickup => (1200.0, 0.18, Waveform::Sine),
        };
        Tone {
            frequency,
            duration,
            waveform,
        }
    }
}

/// Cues for a batch of events, in order
pub fn cues(events: &[GameEvent]) -> impl Iterator<Item = SoundEffect> + '_ {
    events.iter().filter_map(SoundEffect::from_event)
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Waveform};
    use crate::settings::Settings;

    /// Starting gain of every tone before the master/sfx volume is applied
    const TONE_GAIN: f32 = 0.3;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            if self.play_tone(ctx, effect.tone(), vol).is_none() {
                log::warn!("Failed to play {:?}", effect);
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            tone: &Tone,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
            });
            osc.frequency().set_value(tone.frequency);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Tone with an exponential fade to near silence
        fn play_tone(&self, ctx: &AudioContext, tone: Tone, vol: f32) -> Option<()> {
            let (osc, gain) = self.create_osc(ctx, &tone)?;
            let t = ctx.current_time();
            let end = t + tone.duration as f64;

            gain.gain().set_value_at_time(TONE_GAIN * vol, t).ok()?;
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok()?;

            osc.start().ok()?;
            osc.stop_with_when(end).ok()?;
            Some(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EnemyKind;
    use glam::Vec2;

    #[test]
    fn test_event_cues() {
        let events = [
            GameEvent::Shoot { bullets: 2 },
            GameEvent::PlayerHit {
                cause: HitCause::Enemy,
                lives_left: 2,
            },
            GameEvent::PlayerHit {
                cause: HitCause::EnemyBullet,
                lives_left: 1,
            },
            GameEvent::EnemyKilled {
                kind: EnemyKind::Small,
                pos: Vec2::ZERO,
            },
            GameEvent::PowerPickup { bullet_count: 2 },
            GameEvent::PointsPickup { points: 50 },
            GameEvent::LevelWon {
                level: 1,
                score: 1000,
            },
        ];
        let played: Vec<_> = cues(&events).collect();
        assert_eq!(
            played,
            vec![
                SoundEffect::Shoot,
                SoundEffect::PlayerHitByEnemy,
                SoundEffect::PlayerHitByBullet,
                SoundEffect::EnemyKilled,
                SoundEffect::PowerPickup,
                SoundEffect::PointsPickup,
            ]
        );
    }

    #[test]
    fn test_tone_table() {
        assert_eq!(
            SoundEffect::Shoot.tone(),
            Tone {
                frequency: 600.0,
                duration: 0.1,
                waveform: Waveform::Sine
            }
        );
        assert_eq!(SoundEffect::PlayerHitByEnemy.tone().waveform, Waveform::Square);
        assert_eq!(SoundEffect::PlayerHitByBullet.tone().frequency, 200.0);
        assert_eq!(SoundEffect::PointsPickup.tone().frequency, 1200.0);
        assert_eq!(SoundEffect::PowerPickup.tone().duration, 0.2);
    }

    #[test]
    fn test_game_over_is_silent() {
        let event = GameEvent::GameOver { level: 3, score: 10 };
        assert_eq!(SoundEffect::from_event(&event), None);
    }
}
