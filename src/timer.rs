/// Frame-counter countdown shared by every cooldown, duration, and lifetime
/// in the simulation. Never goes negative; `tick` reports the frame on which
/// the counter reaches zero so edge actions (cooldown ready, attack over)
/// fire exactly once.
#[derive(Clone, Copy, Debug, Default)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn armed(frames: u32) -> Self {
        Self { remaining: frames }
    }

    pub fn arm(&mut self, frames: u32) {
        self.remaining = frames;
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }

    /// Advance one frame. Returns true on the tick that hits zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn is_idle(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_clamps() {
        let mut timer = Countdown::armed(2);
        assert!(timer.is_active());
        assert!(!timer.tick());
        assert!(timer.tick());
        assert!(timer.is_idle());
        // further ticks stay at zero and do not re-fire
        assert!(!timer.tick());
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn rearm_overwrites() {
        let mut timer = Countdown::armed(5);
        timer.tick();
        timer.arm(3);
        assert_eq!(timer.remaining(), 3);
        timer.clear();
        assert!(timer.is_idle());
    }
}
