//! Animation collaborator: tween engine and particle bursts
//!
//! The engine interpolates one scalar channel of a scene node toward a
//! target value over a duration, optionally yoyo-looping forever, and can
//! cancel every tween attached to a node. Screens must kill their tweens on
//! exit; re-entrant visits would otherwise stack duplicate loops.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::scene::{Material, Node, NodeId, Primitive, Scene};

/// Which scalar a tween drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    PosX,
    PosY,
    PosZ,
    RotX,
    RotY,
    RotZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    Opacity,
    Emissive,
    ColorR,
    ColorG,
    ColorB,
}

impl Channel {
    fn read(self, node: &Node) -> f32 {
        match self {
            Channel::PosX => node.position.x,
            Channel::PosY => node.position.y,
            Channel::PosZ => node.position.z,
            Channel::RotX => node.rotation.x,
            Channel::RotY => node.rotation.y,
            Channel::RotZ => node.rotation.z,
            Channel::ScaleX => node.scale.x,
            Channel::ScaleY => node.scale.y,
            Channel::ScaleZ => node.scale.z,
            Channel::Opacity => node.material.opacity,
            Channel::Emissive => node.material.emissive,
            Channel::ColorR => node.material.color.x,
            Channel::ColorG => node.material.color.y,
            Channel::ColorB => node.material.color.z,
        }
    }

    fn write(self, node: &mut Node, value: f32) {
        match self {
            Channel::PosX => node.position.x = value,
            Channel::PosY => node.position.y = value,
            Channel::PosZ => node.position.z = value,
            Channel::RotX => node.rotation.x = value,
            Channel::RotY => node.rotation.y = value,
            Channel::RotZ => node.rotation.z = value,
            Channel::ScaleX => node.scale.x = value,
            Channel::ScaleY => node.scale.y = value,
            Channel::ScaleZ => node.scale.z = value,
            Channel::Opacity => node.material.opacity = value,
            Channel::Emissive => node.material.emissive = value,
            Channel::ColorR => node.material.color.x = value,
            Channel::ColorG => node.material.color.y = value,
            Channel::ColorB => node.material.color.z = value,
        }
    }
}

/// Easing curves (the subset the screens actually use)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    SineInOut,
    /// Accelerating
    QuadIn,
    /// Decelerating
    QuadOut,
    /// Overshooting settle
    BackOut,
}

impl Ease {
    fn apply(self, t: f32) -> f32 {
        match self {
            Ease::Linear => t,
            Ease::SineInOut => -(f32::cos(std::f32::consts::PI * t) - 1.0) / 2.0,
            Ease::QuadIn => t * t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

/// What to do when a (non-looping) tween finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnComplete {
    #[default]
    Nothing,
    /// Remove the target node from the scene (particle cleanup)
    RemoveNode,
}

/// A scheduled interpolation
#[derive(Debug, Clone)]
pub struct TweenDesc {
    pub target: NodeId,
    pub channel: Channel,
    pub to: f32,
    pub duration: f32,
    pub ease: Ease,
    /// Ping-pong between start and target forever
    pub yoyo: bool,
    pub on_complete: OnComplete,
}

impl TweenDesc {
    pub fn new(target: NodeId, channel: Channel, to: f32, duration: f32) -> Self {
        Self {
            target,
            channel,
            to,
            duration,
            ease: Ease::Linear,
            yoyo: false,
            on_complete: OnComplete::Nothing,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    pub fn then_remove(mut self) -> Self {
        self.on_complete = OnComplete::RemoveNode;
        self
    }
}

/// Scheduling surface the screens talk to; the engine and test fakes both
/// implement it.
pub trait Animator {
    fn schedule(&mut self, desc: TweenDesc);
    /// Cancel every tween attached to a node
    fn kill_tweens_of(&mut self, target: NodeId);
}

#[derive(Debug, Clone)]
struct Tween {
    desc: TweenDesc,
    /// Captured from the node on first advance
    from: Option<f32>,
    elapsed: f32,
    forward: bool,
}

/// The concrete tween engine
#[derive(Debug, Default)]
pub struct TweenEngine {
    tweens: Vec<Tween>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// Number of tweens currently attached to a node
    pub fn count_for(&self, target: NodeId) -> usize {
        self.tweens.iter().filter(|t| t.desc.target == target).count()
    }

    /// Advance all tweens by `dt` seconds, mutating the scene in place
    pub fn advance(&mut self, scene: &mut Scene, dt: f32) {
        let mut i = 0;
        while i < self.tweens.len() {
            let tween = &mut self.tweens[i];

            let Some(node) = scene.get_mut(tween.desc.target) else {
                // Target gone; drop the tween silently
                self.tweens.swap_remove(i);
                continue;
            };

            let from = *tween.from.get_or_insert_with(|| tween.desc.channel.read(node));
            tween.elapsed += dt;
            let t = (tween.elapsed / tween.desc.duration).clamp(0.0, 1.0);
            let eased = tween.desc.ease.apply(t);
            let (a, b) = if tween.forward {
                (from, tween.desc.to)
            } else {
                (tween.desc.to, from)
            };
            tween.desc.channel.write(node, a + (b - a) * eased);

            if t >= 1.0 {
                if tween.desc.yoyo {
                    tween.forward = !tween.forward;
                    tween.elapsed = 0.0;
                    i += 1;
                } else {
                    let done = self.tweens.swap_remove(i);
                    if done.desc.on_complete == OnComplete::RemoveNode {
                        scene.remove(done.desc.target);
                    }
                }
            } else {
                i += 1;
            }
        }
    }
}

impl Animator for TweenEngine {
    fn schedule(&mut self, desc: TweenDesc) {
        self.tweens.push(Tween {
            desc,
            from: None,
            elapsed: 0.0,
            forward: true,
        });
    }

    fn kill_tweens_of(&mut self, target: NodeId) {
        self.tweens.retain(|t| t.desc.target != target);
    }
}

// === Particle bursts ===
//
// Display-only dressing: spawn short-lived nodes and let RemoveNode tweens
// reap them. Directions come from the game's seeded RNG so replays look
// identical.

/// Missile-explosion burst: 50 particles flying outward plus a white flash
pub fn spawn_explosion(scene: &mut Scene, anim: &mut impl Animator, rng: &mut Pcg32, pos: Vec3) {
    for _ in 0..50 {
        let color = if rng.random::<bool>() { 0xff006e } else { 0xff6600 };
        let dir = random_unit(rng);
        let id = scene.add(
            Node::new(Primitive::Sphere { radius: 0.2 }, Material::neon(color)).at(pos),
        );
        for (channel, delta) in [
            (Channel::PosX, dir.x * 10.0),
            (Channel::PosY, dir.y * 10.0),
            (Channel::PosZ, dir.z * 10.0),
        ] {
            anim.schedule(
                TweenDesc::new(id, channel, pos_component(pos, channel) + delta, 1.0)
                    .ease(Ease::QuadOut),
            );
        }
        anim.schedule(TweenDesc::new(id, Channel::Opacity, 0.0, 1.0).then_remove());
    }

    flash(scene, anim, pos, 0xffffff, 10.0, 0.5);
}

/// Glass-break burst for a destroyed brick: 20 shards, 10 sparks, a flash
pub fn spawn_glass_break(
    scene: &mut Scene,
    anim: &mut impl Animator,
    rng: &mut Pcg32,
    pos: Vec3,
    color: u32,
) {
    let shard_count = 20;
    for i in 0..shard_count {
        let id = scene.add(
            Node::new(
                Primitive::Box {
                    half: Vec3::new(
                        rng.random_range(0.15..0.55),
                        rng.random_range(0.15..0.55),
                        rng.random_range(0.05..0.15),
                    ),
                },
                Material::glass(color, 0.85),
            )
            .at(pos),
        );

        let angle = i as f32 / shard_count as f32 * std::f32::consts::TAU;
        let throw = rng.random_range(3.0..5.0);
        // Outward fan with a downward pull, like falling glass
        anim.schedule(
            TweenDesc::new(id, Channel::PosX, pos.x + angle.cos() * throw, 1.2).ease(Ease::QuadOut),
        );
        anim.schedule(
            TweenDesc::new(id, Channel::PosY, pos.y + angle.sin() * throw - 5.0, 1.2)
                .ease(Ease::QuadOut),
        );
        anim.schedule(
            TweenDesc::new(
                id,
                Channel::RotZ,
                rng.random_range(0.0..std::f32::consts::TAU * 2.0),
                1.2,
            ),
        );
        anim.schedule(TweenDesc::new(id, Channel::ScaleX, 0.1, 1.2).ease(Ease::QuadIn));
        anim.schedule(TweenDesc::new(id, Channel::ScaleY, 0.1, 1.2).ease(Ease::QuadIn));
        anim.schedule(
            TweenDesc::new(id, Channel::Opacity, 0.0, 1.2)
                .ease(Ease::QuadIn)
                .then_remove(),
        );
    }

    for _ in 0..10 {
        let id = scene.add(
            Node::new(Primitive::Sphere { radius: 0.1 }, Material::neon(0xffffff)).at(pos),
        );
        let dir = random_unit(rng);
        anim.schedule(
            TweenDesc::new(id, Channel::PosX, pos.x + dir.x * 4.0, 0.6).ease(Ease::QuadOut),
        );
        anim.schedule(
            TweenDesc::new(id, Channel::PosY, pos.y + dir.y * 4.0, 0.6).ease(Ease::QuadOut),
        );
        anim.schedule(TweenDesc::new(id, Channel::Opacity, 0.0, 0.6).then_remove());
    }

    flash(scene, anim, pos, color, 8.0, 0.4);
}

/// Single exhaust puff: drifts down behind the ship, fades, self-removes
pub fn spawn_exhaust_puff(scene: &mut Scene, anim: &mut impl Animator, pos: Vec3) {
    let id = scene.add(
        Node::new(Primitive::Sphere { radius: 0.2 }, Material::glass(0xffbe0b, 0.8)).at(pos),
    );
    anim.schedule(TweenDesc::new(id, Channel::PosY, pos.y - 3.0, 1.0).ease(Ease::QuadOut));
    anim.schedule(TweenDesc::new(id, Channel::Opacity, 0.0, 1.0).then_remove());
}

/// Short-lived point light that fades itself out
fn flash(
    scene: &mut Scene,
    anim: &mut impl Animator,
    pos: Vec3,
    color: u32,
    intensity: f32,
    duration: f32,
) {
    let id = scene.add(Node::new(Primitive::Light { intensity }, Material::neon(color)).at(pos));
    anim.schedule(TweenDesc::new(id, Channel::Emissive, 0.0, duration).then_remove());
}

fn random_unit(rng: &mut Pcg32) -> Vec3 {
    Vec3::new(
        rng.random_range(-1.0..1.0f32),
        rng.random_range(-1.0..1.0f32),
        rng.random_range(-1.0..1.0f32),
    )
    .normalize_or_zero()
}

fn pos_component(pos: Vec3, channel: Channel) -> f32 {
    match channel {
        Channel::PosX => pos.x,
        Channel::PosY => pos.y,
        _ => pos.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn scene_with_node() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let id = scene.add(Node::new(
            Primitive::Sphere { radius: 1.0 },
            Material::neon(0x00d9ff),
        ));
        (scene, id)
    }

    #[test]
    fn tween_reaches_target_at_duration() {
        let (mut scene, id) = scene_with_node();
        let mut engine = TweenEngine::new();
        engine.schedule(TweenDesc::new(id, Channel::PosX, 10.0, 1.0));

        engine.advance(&mut scene, 0.5);
        let mid = scene.get(id).unwrap().position.x;
        assert!(mid > 0.0 && mid < 10.0);

        engine.advance(&mut scene, 0.5);
        assert_eq!(scene.get(id).unwrap().position.x, 10.0);
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn yoyo_returns_to_start() {
        let (mut scene, id) = scene_with_node();
        let mut engine = TweenEngine::new();
        engine.schedule(TweenDesc::new(id, Channel::ScaleX, 2.0, 1.0).yoyo());

        engine.advance(&mut scene, 1.0);
        assert_eq!(scene.get(id).unwrap().scale.x, 2.0);
        engine.advance(&mut scene, 1.0);
        assert!((scene.get(id).unwrap().scale.x - 1.0).abs() < 1e-5);
        // Still looping
        assert_eq!(engine.active_count(), 1);
    }

    #[test]
    fn kill_tweens_of_cancels_everything_on_target() {
        let (mut scene, id) = scene_with_node();
        let mut engine = TweenEngine::new();
        engine.schedule(TweenDesc::new(id, Channel::PosX, 10.0, 1.0));
        engine.schedule(TweenDesc::new(id, Channel::PosY, 10.0, 1.0).yoyo());
        assert_eq!(engine.count_for(id), 2);

        engine.kill_tweens_of(id);
        assert_eq!(engine.active_count(), 0);

        engine.advance(&mut scene, 1.0);
        assert_eq!(scene.get(id).unwrap().position.x, 0.0);
    }

    #[test]
    fn remove_node_on_complete() {
        let (mut scene, id) = scene_with_node();
        let mut engine = TweenEngine::new();
        engine.schedule(TweenDesc::new(id, Channel::Opacity, 0.0, 0.5).then_remove());

        engine.advance(&mut scene, 0.6);
        assert!(scene.get(id).is_none());
    }

    #[test]
    fn tween_on_removed_node_is_dropped() {
        let (mut scene, id) = scene_with_node();
        let mut engine = TweenEngine::new();
        engine.schedule(TweenDesc::new(id, Channel::PosX, 10.0, 1.0));
        scene.remove(id);

        engine.advance(&mut scene, 0.1);
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn exhaust_puff_fades_and_removes_itself() {
        let mut scene = Scene::new();
        let mut engine = TweenEngine::new();

        spawn_exhaust_puff(&mut scene, &mut engine, Vec3::new(8.0, -6.0, 5.0));
        assert_eq!(scene.len(), 1);

        engine.advance(&mut scene, 1.1);
        assert!(scene.is_empty());
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn glass_break_cleans_itself_up() {
        let mut scene = Scene::new();
        let mut engine = TweenEngine::new();
        let mut rng = Pcg32::seed_from_u64(7);

        spawn_glass_break(&mut scene, &mut engine, &mut rng, Vec3::ZERO, 0xff006e);
        // 20 shards + 10 sparks + flash
        assert_eq!(scene.len(), 31);

        for _ in 0..30 {
            engine.advance(&mut scene, 0.1);
        }
        assert!(scene.is_empty());
        assert_eq!(engine.active_count(), 0);
    }
}
