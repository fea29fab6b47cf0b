//! Timed-event schedules on a controllable clock
//!
//! Every delayed action is an explicit {delay, action} entry advanced by
//! the frame clock, so tests can step virtual time instead of sleeping.
//! Screens must drop their timelines/timers on exit so nothing fires into
//! a stale screen.

/// One-shot schedule of actions at fixed offsets from its start
#[derive(Debug, Clone)]
pub struct Timeline<A> {
    entries: Vec<(f32, A)>,
    elapsed: f32,
    cursor: usize,
}

impl<A: Clone> Timeline<A> {
    /// Build from {delay, action} pairs; ordering of the input is irrelevant
    pub fn new(mut entries: Vec<(f32, A)>) -> Self {
        entries.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self {
            entries,
            elapsed: 0.0,
            cursor: 0,
        }
    }

    /// Convenience for a single delayed action
    pub fn after(delay: f32, action: A) -> Self {
        Self::new(vec![(delay, action)])
    }

    /// Advance the clock, appending every action whose delay has now passed
    pub fn advance(&mut self, dt: f32, fired: &mut Vec<A>) {
        self.elapsed += dt;
        while self.cursor < self.entries.len() && self.entries[self.cursor].0 <= self.elapsed {
            fired.push(self.entries[self.cursor].1.clone());
            self.cursor += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.entries.len()
    }
}

/// Fixed-period repeating timer
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    period: f32,
    acc: f32,
}

impl RepeatingTimer {
    pub fn new(period: f32) -> Self {
        debug_assert!(period > 0.0);
        Self { period, acc: 0.0 }
    }

    /// Number of whole periods that elapsed this step
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.acc += dt;
        let fires = (self.acc / self.period) as u32;
        self.acc -= fires as f32 * self.period;
        fires
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Cue {
        A,
        B,
        C,
    }

    #[test]
    fn fires_in_delay_order_regardless_of_insertion_order() {
        let mut tl = Timeline::new(vec![(2.0, Cue::C), (0.5, Cue::A), (1.0, Cue::B)]);
        let mut fired = Vec::new();

        tl.advance(0.4, &mut fired);
        assert!(fired.is_empty());

        tl.advance(0.2, &mut fired); // t = 0.6
        assert_eq!(fired, vec![Cue::A]);

        fired.clear();
        tl.advance(2.0, &mut fired); // t = 2.6, both remaining fire
        assert_eq!(fired, vec![Cue::B, Cue::C]);
        assert!(tl.is_finished());
    }

    #[test]
    fn single_action_helper() {
        let mut tl = Timeline::after(1.0, Cue::A);
        let mut fired = Vec::new();
        tl.advance(1.0, &mut fired);
        assert_eq!(fired, vec![Cue::A]);
        assert!(tl.is_finished());
    }

    #[test]
    fn repeating_timer_counts_whole_periods() {
        let mut timer = RepeatingTimer::new(0.5);
        assert_eq!(timer.advance(0.4), 0);
        assert_eq!(timer.advance(0.2), 1); // 0.6 elapsed, 0.1 carried
        assert_eq!(timer.advance(0.9), 2); // 1.0 accumulated
    }

    #[test]
    fn dropping_a_timeline_cancels_pending_actions() {
        // Nothing fires once the owner lets go; this is the whole cancellation
        // model: schedules are owned by the screen that created them.
        let tl = Timeline::after(1.0, Cue::A);
        drop(tl);
    }
}
