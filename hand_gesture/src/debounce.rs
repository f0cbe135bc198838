//! Streak-based hysteresis for per-frame classifications.

/// The exposed value only changes once a new value has repeated more than
/// this many times in a row.
pub const STREAK_THRESHOLD: u32 = 4;

/// Holds a stable value until a competing value wins its own streak.
///
/// Every observation is compared with the previous observation (not with
/// the stable value).  A repeat extends the streak, anything else restarts
/// it at zero.  When the streak passes [`STREAK_THRESHOLD`] the observed
/// value becomes stable.  There is no roll-back: the stable value survives
/// any amount of flicker that never holds long enough.
#[derive(Clone, Debug)]
pub struct DebounceWindow<T> {
    stable:   T,
    previous: T,
    streak:   u32,
}

impl<T: Copy + PartialEq> DebounceWindow<T> {
    /// Start with `initial` as both the stable and the last observed value.
    pub fn new(initial: T) -> Self {
        DebounceWindow { stable: initial, previous: initial, streak: 0 }
    }

    /// Feed one frame's instantaneous value; returns the stable value.
    pub fn observe(&mut self, value: T) -> T {
        if value == self.previous {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak   = 0;
            self.previous = value;
        }
        if self.streak > STREAK_THRESHOLD {
            self.stable = value;
        }
        self.stable
    }

    pub fn stable(&self) -> T {
        self.stable
    }

    pub fn previous(&self) -> T {
        self.previous
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_value_needs_five_repeats() {
        let mut w = DebounceWindow::new(0u8);
        // First sighting starts the streak; five more repeats are needed.
        for _ in 0..5 {
            assert_eq!(w.observe(7), 0);
        }
        assert_eq!(w.observe(7), 7);
    }

    #[test]
    fn long_hold_transitions_once() {
        let mut w = DebounceWindow::new(0u8);
        let mut transitions = 0;
        let mut last = w.stable();
        for _ in 0..50 {
            let s = w.observe(3);
            if s != last {
                transitions += 1;
                last = s;
            }
        }
        assert_eq!(transitions, 1);
        assert_eq!(w.stable(), 3);
    }

    #[test]
    fn oscillation_never_transitions() {
        let mut w = DebounceWindow::new(1u8);
        for i in 0..200 {
            let v = if (i / 4) % 2 == 0 { 2 } else { 3 };
            assert_eq!(w.observe(v), 1);
        }
    }

    #[test]
    fn flicker_does_not_roll_back() {
        let mut w = DebounceWindow::new(0u8);
        for _ in 0..6 { w.observe(5); }
        assert_eq!(w.stable(), 5);
        w.observe(9);
        w.observe(5);
        assert_eq!(w.stable(), 5);
        assert_eq!(w.streak(), 0);
        assert_eq!(w.previous(), 5);
    }

    #[test]
    fn repeating_the_initial_value_keeps_it() {
        let mut w = DebounceWindow::new(4u8);
        for _ in 0..10 {
            assert_eq!(w.observe(4), 4);
        }
        assert_eq!(w.streak(), 10);
    }
}
