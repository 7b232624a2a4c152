//! Sound effects boundary
//!
//! Playback is fire-and-forget: the session never waits on audio.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Target hit
    Hit,
}

/// Something that can play sound effects
pub trait SoundPlayer {
    fn play(&mut self, effect: SoundEffect);

    fn play_hit_sound(&mut self) {
        self.play(SoundEffect::Hit);
    }
}

/// Logs effects instead of playing them (headless runs)
#[derive(Debug, Default)]
pub struct LogSoundPlayer {
    volume: f32,
}

impl LogSoundPlayer {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

impl SoundPlayer for LogSoundPlayer {
    fn play(&mut self, effect: SoundEffect) {
        if self.volume > 0.0 {
            log::debug!("play {:?} at volume {:.2}", effect, self.volume);
        }
    }
}

/// Plays nothing
#[derive(Debug, Default)]
pub struct MutedSoundPlayer;

impl SoundPlayer for MutedSoundPlayer {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Counts effects, for tests
#[derive(Debug, Default)]
pub struct CountingSoundPlayer {
    pub played: Vec<SoundEffect>,
}

impl SoundPlayer for CountingSoundPlayer {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_hit_sound_routes_to_play() {
        let mut player = CountingSoundPlayer::default();
        player.play_hit_sound();
        player.play_hit_sound();
        assert_eq!(player.played, vec![SoundEffect::Hit, SoundEffect::Hit]);
    }

    #[test]
    fn test_volume_clamped() {
        let player = LogSoundPlayer::new(3.0);
        assert_eq!(player.volume, 1.0);
    }

    #[test]
    fn test_players_usable_as_trait_objects() {
        let mut players: Vec<Box<dyn SoundPlayer>> = vec![
            Box::new(MutedSoundPlayer),
            Box::new(LogSoundPlayer::new(0.0)),
        ];
        for player in &mut players {
            player.play_hit_sound();
        }
    }
}
