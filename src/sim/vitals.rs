//! Score and health bookkeeping
//!
//! Pure data plus the mutation rules the collision step applies.

/// Session score; only ever grows until the session is reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score(u32);

impl Score {
    pub fn value(self) -> u32 {
        self.0
    }

    pub fn add(&mut self, points: u32) {
        self.0 = self.0.saturating_add(points);
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

/// Player health and remaining lives
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    health: i32,
    max_health: i32,
    lives: u32,
    /// Fractional damage not yet taken off `health`, in [0, 1)
    wound: f32,
}

impl Vitals {
    pub fn new(max_health: i32, lives: u32) -> Self {
        let max_health = max_health.max(1);
        Self {
            health: max_health,
            max_health,
            lives,
            wound: 0.0,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Health as a fraction of max, for the health bar
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.max_health as f32
    }

    /// Subtract health; returns true when it is depleted.
    ///
    /// Fractions carry over to the next hit, so the whole-number health only
    /// ever drops by what has accumulated.
    pub fn damage(&mut self, amount: f32) -> bool {
        let total = amount.max(0.0) + self.wound;
        let whole = total.floor();
        self.wound = total - whole;
        self.health = (self.health as f32 - whole).clamp(0.0, self.max_health as f32) as i32;
        if self.health == 0 {
            self.wound = 0.0;
        }
        self.health == 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).clamp(0, self.max_health);
        if self.health == self.max_health {
            self.wound = 0.0;
        }
    }

    pub fn restore(&mut self) {
        self.health = self.max_health;
        self.wound = 0.0;
    }

    /// Drop one life; returns the lives left
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    #[cfg(test)]
    pub(crate) fn set_health(&mut self, health: i32) {
        self.health = health.clamp(0, self.max_health);
    }
}
