//! Score / lives / level readout
//!
//! The HUD itself is host-owned (a DOM overlay in the browser, log lines in
//! the headless demo). The game pushes session values through a sink, and a
//! change detector keeps the pushes to frames where something moved.

use crate::sim::Session;

/// Where HUD values go
pub trait HudSink {
    fn show_session(&mut self, session: &Session);
    fn set_visible(&mut self, visible: bool);
}

/// Native / fallback sink: one log line per change
#[derive(Debug, Default)]
pub struct LogHud;

impl HudSink for LogHud {
    fn show_session(&mut self, session: &Session) {
        log::info!(
            "score {} | lives {} | level {}",
            session.score,
            session.lives,
            session.level
        );
    }

    fn set_visible(&mut self, visible: bool) {
        log::debug!("hud visible: {visible}");
    }
}

/// Pushes to the sink only when the session or visibility actually changed
#[derive(Debug, Default)]
pub struct Hud {
    last: Option<Session>,
    visible: bool,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(&mut self, session: &Session, sink: &mut dyn HudSink) {
        if self.last != Some(*session) {
            sink.show_session(session);
            self.last = Some(*session);
        }
    }

    pub fn set_visible(&mut self, visible: bool, sink: &mut dyn HudSink) {
        if self.visible != visible {
            sink.set_visible(visible);
            self.visible = visible;
        }
    }

    /// Forget the last pushed value so the next sync always pushes
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        sessions: Vec<Session>,
        visibility: Vec<bool>,
    }

    impl HudSink for RecordingSink {
        fn show_session(&mut self, session: &Session) {
            self.sessions.push(*session);
        }
        fn set_visible(&mut self, visible: bool) {
            self.visibility.push(visible);
        }
    }

    #[test]
    fn pushes_only_on_change() {
        let mut hud = Hud::new();
        let mut sink = RecordingSink::default();
        let mut session = Session::default();

        hud.sync(&session, &mut sink);
        hud.sync(&session, &mut sink);
        assert_eq!(sink.sessions.len(), 1);

        session.award_brick();
        hud.sync(&session, &mut sink);
        assert_eq!(sink.sessions.len(), 2);
        assert_eq!(sink.sessions[1].score, session.score);
    }

    #[test]
    fn visibility_is_edge_triggered() {
        let mut hud = Hud::new();
        let mut sink = RecordingSink::default();

        hud.set_visible(true, &mut sink);
        hud.set_visible(true, &mut sink);
        hud.set_visible(false, &mut sink);
        assert_eq!(sink.visibility, vec![true, false]);
    }

    #[test]
    fn invalidate_forces_a_push() {
        let mut hud = Hud::new();
        let mut sink = RecordingSink::default();
        let session = Session::default();

        hud.sync(&session, &mut sink);
        hud.invalidate();
        hud.sync(&session, &mut sink);
        assert_eq!(sink.sessions.len(), 2);
    }
}
