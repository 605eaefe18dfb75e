/// Score & outcome tracking: a hit counter that only goes up and a
/// game-over latch that only goes from false to true.  `reset` is the one
/// way back.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    score: u32,
    over: bool,
}

impl Scoreboard {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Count one hit.  Returns the new score, or `None` once the game is over.
    pub fn record_hit(&mut self) -> Option<u32> {
        if self.over {
            return None;
        }
        self.score = self.score.saturating_add(1);
        Some(self.score)
    }

    /// Latch game over.  Returns the final score the first time only.
    pub fn latch_game_over(&mut self) -> Option<u32> {
        if self.over {
            return None;
        }
        self.over = true;
        Some(self.score)
    }

    pub fn reset(&mut self) {
        *self = Scoreboard::default();
    }
}
