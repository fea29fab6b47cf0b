//! Pointer-driven UI: hit-testing, hover feedback, the volume slider
//!
//! Screens live in `menu`; this module holds the shared control/hit-test
//! machinery. All pointer math happens in world units on the UI plane (see
//! `pointer_to_world`).

pub mod label;
pub mod menu;

pub use menu::{GameOverScreen, MenuScreen, SettingsScreen};

use glam::Vec2;

use crate::fx::{Animator, Channel, Ease, TweenDesc};
use crate::scene::NodeId;

/// Axis-aligned hit region
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (p.x - self.center.x).abs() <= self.half.x && (p.y - self.center.y).abs() <= self.half.y
    }
}

/// Every interactive control in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    Start,
    Settings,
    Quit,
    Back,
    VolumeHandle,
    ReturnToMenu,
}

/// A control: label-carrying body node plus its hit region
#[derive(Debug, Clone, Copy)]
pub struct Control {
    pub id: ControlId,
    pub rect: Rect,
    pub node: NodeId,
}

/// First control under the pointer, if any
pub fn hit_test(controls: &[Control], p: Vec2) -> Option<&Control> {
    controls.iter().find(|c| c.rect.contains(p))
}

/// Tracks which control the pointer is over and drives hover tweens.
///
/// Hover feedback is only applied where the caller asks for it (menu state);
/// click actions require the control to be both hit and currently hovered.
#[derive(Debug, Default)]
pub struct HoverState {
    hovered: Option<(ControlId, NodeId)>,
}

impl HoverState {
    pub fn hovered(&self) -> Option<ControlId> {
        self.hovered.map(|(id, _)| id)
    }

    /// Update hover from the pointer position, animating enter/leave
    pub fn update(&mut self, point: Vec2, controls: &[Control], anim: &mut impl Animator) {
        let hit = hit_test(controls, point).map(|c| (c.id, c.node));

        if hit == self.hovered {
            return;
        }

        if let Some((_, node)) = self.hovered.take() {
            Self::unhover(node, anim);
        }

        if let Some((id, node)) = hit {
            // Pop out with a slight tilt
            for channel in [Channel::ScaleX, Channel::ScaleY, Channel::ScaleZ] {
                anim.schedule(TweenDesc::new(node, channel, 1.15, 0.3).ease(Ease::BackOut));
            }
            anim.schedule(TweenDesc::new(node, Channel::RotZ, 0.05, 0.3));
            self.hovered = Some((id, node));
        }
    }

    /// Drop the current hover (used when leaving a screen)
    pub fn clear(&mut self, anim: &mut impl Animator) {
        if let Some((_, node)) = self.hovered.take() {
            Self::unhover(node, anim);
        }
    }

    /// Resolve a click: the control under the pointer, but only if it is the
    /// one already hovered
    pub fn click(&self, point: Vec2, controls: &[Control]) -> Option<ControlId> {
        let hit = hit_test(controls, point)?;
        (self.hovered() == Some(hit.id)).then_some(hit.id)
    }

    fn unhover(node: NodeId, anim: &mut impl Animator) {
        anim.kill_tweens_of(node);
        for channel in [Channel::ScaleX, Channel::ScaleY, Channel::ScaleZ] {
            anim.schedule(TweenDesc::new(node, channel, 1.0, 0.3));
        }
        anim.schedule(TweenDesc::new(node, Channel::RotZ, 0.0, 0.3));
    }
}

// === Volume slider mapping ===

/// Slider track half-length in world units
pub const SLIDER_HALF_LENGTH: f32 = 6.0;

/// Map pointer NDC x to a handle x on the track
pub fn slider_handle_from_ndc(ndc_x: f32) -> f32 {
    (ndc_x * crate::consts::POINTER_SCALE_X).clamp(-SLIDER_HALF_LENGTH, SLIDER_HALF_LENGTH)
}

/// Handle x maps linearly onto volume in [0, 1]
pub fn volume_from_handle(handle_x: f32) -> f32 {
    (handle_x / (2.0 * SLIDER_HALF_LENGTH) + 0.5).clamp(0.0, 1.0)
}

/// Inverse mapping for placing the handle from a stored volume
pub fn handle_from_volume(volume: f32) -> f32 {
    (volume.clamp(0.0, 1.0) - 0.5) * 2.0 * SLIDER_HALF_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::TweenDesc;

    /// Records scheduling calls instead of animating
    #[derive(Default)]
    pub struct RecordingAnimator {
        pub scheduled: Vec<TweenDesc>,
        pub killed: Vec<NodeId>,
    }

    impl Animator for RecordingAnimator {
        fn schedule(&mut self, desc: TweenDesc) {
            self.scheduled.push(desc);
        }
        fn kill_tweens_of(&mut self, target: NodeId) {
            self.killed.push(target);
        }
    }

    fn controls() -> (crate::scene::Scene, Vec<Control>) {
        use crate::scene::{Material, Node, Primitive, Scene};
        let mut scene = Scene::new();
        let mut mk = |id, y: f32| Control {
            id,
            rect: Rect::new(Vec2::new(0.0, y), Vec2::new(4.0, 1.0)),
            node: scene.add(Node::new(
                Primitive::Extruded {
                    width: 8.0,
                    height: 2.0,
                    depth: 0.8,
                },
                Material::glass(0x00d9ff, 0.25),
            )),
        };
        let list = vec![
            mk(ControlId::Start, 2.0),
            mk(ControlId::Settings, -1.0),
            mk(ControlId::Quit, -4.0),
        ];
        (scene, list)
    }

    #[test]
    fn hover_then_click_hits_the_same_control() {
        let (_scene, controls) = controls();
        let mut hover = HoverState::default();
        let mut anim = RecordingAnimator::default();

        let on_start = Vec2::new(0.0, 2.0);
        hover.update(on_start, &controls, &mut anim);
        assert_eq!(hover.hovered(), Some(ControlId::Start));
        assert_eq!(hover.click(on_start, &controls), Some(ControlId::Start));
    }

    #[test]
    fn click_without_hover_is_ignored() {
        let (_scene, controls) = controls();
        let hover = HoverState::default();
        assert_eq!(hover.click(Vec2::new(0.0, 2.0), &controls), None);
    }

    #[test]
    fn moving_off_a_control_unhovers_it() {
        let (_scene, controls) = controls();
        let mut hover = HoverState::default();
        let mut anim = RecordingAnimator::default();

        hover.update(Vec2::new(0.0, 2.0), &controls, &mut anim);
        let node = controls[0].node;
        hover.update(Vec2::new(15.0, 9.0), &controls, &mut anim);
        assert_eq!(hover.hovered(), None);
        // Leave animation killed the hover tweens before scheduling the return
        assert_eq!(anim.killed, vec![node]);
    }

    #[test]
    fn hover_swap_between_controls() {
        let (_scene, controls) = controls();
        let mut hover = HoverState::default();
        let mut anim = RecordingAnimator::default();

        hover.update(Vec2::new(0.0, 2.0), &controls, &mut anim);
        hover.update(Vec2::new(0.0, -1.0), &controls, &mut anim);
        assert_eq!(hover.hovered(), Some(ControlId::Settings));
    }

    #[test]
    fn slider_mapping_matches_track_geometry() {
        // Pointer at screen center -> handle centered -> 50%
        assert_eq!(slider_handle_from_ndc(0.0), 0.0);
        assert_eq!(volume_from_handle(0.0), 0.5);
        // Far right clamps to the track end -> 100%
        assert_eq!(slider_handle_from_ndc(1.0), SLIDER_HALF_LENGTH);
        assert_eq!(volume_from_handle(SLIDER_HALF_LENGTH), 1.0);
        // Far left -> 0%
        assert_eq!(volume_from_handle(slider_handle_from_ndc(-1.0)), 0.0);
        // Round trip
        let v = 0.25;
        assert!((volume_from_handle(handle_from_volume(v)) - v).abs() < 1e-6);
    }
}
