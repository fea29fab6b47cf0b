//! The three full-screen panels: menu, settings, game over
//!
//! Each screen owns its scene nodes and knows how to start and kill its own
//! animations. The kill-before-restart discipline matters: a screen that is
//! re-entered must come back from a clean baseline or idle tweens pile up.

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use super::label::render_label;
use super::{Control, ControlId, Rect, handle_from_volume};
use crate::fx::{Animator, Channel, Ease, TweenDesc};
use crate::hex_rgb;
use crate::scene::{Material, Node, NodeId, Primitive, Scene};

/// Flash palette shared by the title and game-over banners
pub const FLASH_COLORS: [u32; 5] = [0xff006e, 0x00d9ff, 0x9d4edd, 0x06ffa5, 0xffbe0b];

const PANEL_COLOR: u32 = 0x1a1a2e;

fn label_node(text: &str, color: u32, width: f32, height: f32, pos: Vec3) -> Node {
    Node::new(
        Primitive::Label {
            image: render_label(text, color),
            width,
            height,
        },
        Material::neon(color),
    )
    .at(pos)
}

fn button_body(color: u32, y: f32) -> Node {
    Node::new(
        Primitive::Extruded {
            width: 8.0,
            height: 2.0,
            depth: 0.8,
        },
        Material::glass(color, 0.25),
    )
    .at(Vec3::new(0.0, y, 5.0))
}

fn button_rect(y: f32) -> Rect {
    Rect::new(Vec2::new(0.0, y), Vec2::new(4.0, 1.0))
}

/// Title screen: flashing banner, three glass buttons, idle float
#[derive(Debug)]
pub struct MenuScreen {
    pub panel: NodeId,
    pub title: NodeId,
    pub buttons: Vec<Control>,
    labels: Vec<NodeId>,
    flash_index: usize,
}

impl MenuScreen {
    pub fn build(scene: &mut Scene) -> Self {
        let panel = scene.add(
            Node::new(
                Primitive::Box {
                    half: Vec3::new(12.0, 10.0, 0.25),
                },
                Material::glass(PANEL_COLOR, 0.4),
            )
            .at(Vec3::new(0.0, 0.0, 3.0)),
        );

        let title = scene.add(label_node(
            "BRICK BREAKER",
            FLASH_COLORS[0],
            20.0,
            5.0,
            Vec3::new(0.0, 8.0, 5.5),
        ));

        let mut buttons = Vec::new();
        let mut labels = Vec::new();
        for (id, text, color, y) in [
            (ControlId::Start, "START", 0x00d9ff, 2.0),
            (ControlId::Settings, "SETTINGS", 0xff006e, -1.0),
            (ControlId::Quit, "QUIT", 0xffffff, -4.0),
        ] {
            let node = scene.add(button_body(color, y));
            labels.push(scene.add(label_node(text, color, 6.0, 1.5, Vec3::new(0.0, y, 6.0))));
            buttons.push(Control {
                id,
                rect: button_rect(y),
                node,
            });
        }

        Self {
            panel,
            title,
            buttons,
            labels,
            flash_index: 0,
        }
    }

    pub fn all_nodes(&self) -> Vec<NodeId> {
        let mut nodes = vec![self.panel, self.title];
        nodes.extend(self.buttons.iter().map(|b| b.node));
        nodes.extend(&self.labels);
        nodes
    }

    pub fn set_visible(&self, scene: &mut Scene, visible: bool) {
        for id in self.all_nodes() {
            if let Some(node) = scene.get_mut(id) {
                node.visible = visible;
            }
        }
    }

    /// Slow breathing float of the whole panel plus a color pulse
    pub fn start_idle_animations(&self, anim: &mut impl Animator) {
        anim.schedule(
            TweenDesc::new(self.panel, Channel::PosY, 1.0, 2.0)
                .ease(Ease::SineInOut)
                .yoyo(),
        );
        anim.schedule(
            TweenDesc::new(self.panel, Channel::RotY, 0.15, 3.0)
                .ease(Ease::SineInOut)
                .yoyo(),
        );
        for channel in [Channel::ScaleX, Channel::ScaleY, Channel::ScaleZ] {
            anim.schedule(
                TweenDesc::new(self.panel, channel, 1.05, 2.5)
                    .ease(Ease::SineInOut)
                    .yoyo(),
            );
        }
        for (channel, to) in [
            (Channel::ColorR, 0.2),
            (Channel::ColorG, 0.2),
            (Channel::ColorB, 0.4),
        ] {
            anim.schedule(
                TweenDesc::new(self.panel, channel, to, 3.0)
                    .ease(Ease::SineInOut)
                    .yoyo(),
            );
        }
    }

    /// Kill every animation this screen owns (clean baseline on exit)
    pub fn kill_animations(&self, anim: &mut impl Animator) {
        for id in self.all_nodes() {
            anim.kill_tweens_of(id);
        }
    }

    /// Snap the panel back to its resting transform
    pub fn reset_transforms(&self, scene: &mut Scene) {
        if let Some(panel) = scene.get_mut(self.panel) {
            panel.position = Vec3::new(0.0, 0.0, 3.0);
            panel.rotation = Vec3::ZERO;
            panel.scale = Vec3::ONE;
            panel.material.color = hex_rgb(PANEL_COLOR);
        }
    }

    /// Cycle the banner color and give it a brief shake
    pub fn flash_title(&mut self, scene: &mut Scene, anim: &mut impl Animator, rng: &mut Pcg32) {
        self.flash_index = (self.flash_index + 1) % FLASH_COLORS.len();
        flash_banner(
            scene,
            anim,
            rng,
            self.title,
            "BRICK BREAKER",
            FLASH_COLORS[self.flash_index],
        );
    }
}

/// Volume panel; slid in over whatever mode it was opened from
#[derive(Debug)]
pub struct SettingsScreen {
    pub panel: NodeId,
    pub title: NodeId,
    pub volume_label: NodeId,
    pub track: NodeId,
    pub handle: NodeId,
    pub percent: NodeId,
    pub back: Control,
    back_label: NodeId,
}

impl SettingsScreen {
    /// Build hidden; `show` flips visibility when the screen slides in
    pub fn build(scene: &mut Scene, volume: f32) -> Self {
        let panel = scene.add(
            Node::new(
                Primitive::Box {
                    half: Vec3::new(10.0, 8.0, 0.25),
                },
                Material::glass(PANEL_COLOR, 0.5),
            )
            .at(Vec3::new(0.0, 0.0, -100.0))
            .hidden(),
        );
        let title = scene.add(
            label_node("SETTINGS", 0xff006e, 12.0, 3.0, Vec3::new(0.0, 6.0, 5.0)).hidden(),
        );
        let volume_label = scene.add(
            label_node("VOLUME", 0x00d9ff, 8.0, 2.0, Vec3::new(0.0, 2.0, 5.0)).hidden(),
        );
        let track = scene.add(
            Node::new(
                Primitive::Box {
                    half: Vec3::new(super::SLIDER_HALF_LENGTH, 0.2, 0.15),
                },
                Material::neon(0x333355),
            )
            .at(Vec3::new(0.0, 0.0, 4.0))
            .hidden(),
        );
        let handle = scene.add(
            Node::new(Primitive::Sphere { radius: 0.6 }, Material::neon(0x00d9ff))
                .at(Vec3::new(handle_from_volume(volume), 0.0, 5.0))
                .hidden(),
        );
        let percent = scene.add(
            label_node(
                &format!("{}%", (volume * 100.0).round() as u32),
                0x00d9ff,
                4.0,
                2.0,
                Vec3::new(0.0, -2.0, 5.0),
            )
            .hidden(),
        );
        let back_node = scene.add(button_body(0x06ffa5, -5.0).hidden());
        let back_label = scene.add(
            label_node("BACK", 0x06ffa5, 6.0, 1.5, Vec3::new(0.0, -5.0, 6.0)).hidden(),
        );

        Self {
            panel,
            title,
            volume_label,
            track,
            handle,
            percent,
            back: Control {
                id: ControlId::Back,
                rect: button_rect(-5.0),
                node: back_node,
            },
            back_label,
        }
    }

    pub fn all_nodes(&self) -> Vec<NodeId> {
        vec![
            self.panel,
            self.title,
            self.volume_label,
            self.track,
            self.handle,
            self.percent,
            self.back.node,
            self.back_label,
        ]
    }

    pub fn set_visible(&self, scene: &mut Scene, visible: bool) {
        for id in self.all_nodes() {
            if let Some(node) = scene.get_mut(id) {
                node.visible = visible;
            }
        }
    }

    /// Hit region of the draggable handle at its current position
    pub fn handle_rect(&self, scene: &Scene) -> Rect {
        let x = scene.get(self.handle).map(|n| n.position.x).unwrap_or(0.0);
        Rect::new(Vec2::new(x, 0.0), Vec2::new(0.8, 0.8))
    }

    /// Move the handle and refresh the percentage readout
    pub fn set_volume_visual(&self, scene: &mut Scene, volume: f32) {
        if let Some(handle) = scene.get_mut(self.handle) {
            handle.position.x = handle_from_volume(volume);
        }
        if let Some(node) = scene.get_mut(self.percent) {
            if let Primitive::Label { image, .. } = &mut node.primitive {
                *image = render_label(&format!("{}%", (volume * 100.0).round() as u32), 0x00d9ff);
            }
        }
    }
}

/// Where the escape ship sits before takeoff
const SHIP_START: Vec3 = Vec3::new(8.0, -6.0, 5.0);
const SHIP_SCALE: f32 = 0.8;

/// End-of-run panel: flashing banner, final score, one button, and the
/// little ship that abandons the arena
#[derive(Debug)]
pub struct GameOverScreen {
    pub panel: NodeId,
    pub title: NodeId,
    pub score_label: NodeId,
    pub menu_button: Control,
    button_label: NodeId,
    ship: Vec<NodeId>,
    ship_body: NodeId,
    flash_index: usize,
}

impl GameOverScreen {
    pub fn build(scene: &mut Scene, final_score: u64) -> Self {
        let panel = scene.add(
            Node::new(
                Primitive::Box {
                    half: Vec3::new(13.0, 9.0, 0.25),
                },
                Material::glass(PANEL_COLOR, 0.5),
            )
            // Slides in from behind the camera plane
            .at(Vec3::new(0.0, 0.0, -20.0)),
        );
        let title = scene.add(label_node(
            "GAME OVER",
            FLASH_COLORS[0],
            22.0,
            5.5,
            Vec3::new(0.0, 6.0, 5.0),
        ));
        let score_label = scene.add(label_node(
            &format!("FINAL SCORE: {final_score}"),
            0x00d9ff,
            16.0,
            4.0,
            Vec3::new(0.0, 1.0, 5.0),
        ));
        let button_node = scene.add(button_body(0x06ffa5, -4.5));
        let button_label = scene.add(label_node(
            "RETURN TO MENU",
            0x06ffa5,
            6.0,
            1.5,
            Vec3::new(0.0, -4.5, 6.0),
        ));

        let (ship, ship_body) = build_ship(scene);

        Self {
            panel,
            title,
            score_label,
            menu_button: Control {
                id: ControlId::ReturnToMenu,
                rect: button_rect(-4.5),
                node: button_node,
            },
            button_label,
            ship,
            ship_body,
            flash_index: 0,
        }
    }

    pub fn all_nodes(&self) -> Vec<NodeId> {
        let mut nodes = vec![
            self.panel,
            self.title,
            self.score_label,
            self.menu_button.node,
            self.button_label,
        ];
        nodes.extend(&self.ship);
        nodes
    }

    /// Send the ship off: up and away over 3.5 s while spinning and shrinking
    pub fn start_takeoff(&self, scene: &Scene, anim: &mut impl Animator) {
        for &part in &self.ship {
            let Some(node) = scene.get(part) else { continue };
            anim.schedule(
                TweenDesc::new(part, Channel::PosY, node.position.y + 26.0, 3.5)
                    .ease(Ease::QuadIn),
            );
            anim.schedule(
                TweenDesc::new(part, Channel::PosX, node.position.x + 4.0, 3.5)
                    .ease(Ease::QuadIn),
            );
            for channel in [Channel::ScaleX, Channel::ScaleY, Channel::ScaleZ] {
                anim.schedule(TweenDesc::new(part, channel, 0.2, 3.5));
            }
            anim.schedule(TweenDesc::new(part, Channel::RotZ, node.rotation.z + 6.3, 3.5));
            anim.schedule(TweenDesc::new(part, Channel::RotY, node.rotation.y + 4.2, 3.5));
        }
    }

    /// Where exhaust puffs spawn: just below the hull, wherever it is now
    pub fn exhaust_source(&self, scene: &Scene) -> Option<Vec3> {
        scene
            .get(self.ship_body)
            .map(|node| node.position - Vec3::new(0.0, 2.0, 0.0))
    }

    pub fn flash_title(&mut self, scene: &mut Scene, anim: &mut impl Animator, rng: &mut Pcg32) {
        self.flash_index = (self.flash_index + 1) % FLASH_COLORS.len();
        flash_banner(
            scene,
            anim,
            rng,
            self.title,
            "GAME OVER",
            FLASH_COLORS[self.flash_index],
        );
    }

    /// Tear the screen down, cancelling anything still animating it
    pub fn destroy(self, scene: &mut Scene, anim: &mut impl Animator) {
        for id in self.all_nodes() {
            anim.kill_tweens_of(id);
            scene.remove(id);
        }
    }
}

/// Escape ship: nose-down cone hull, three fins, an exhaust plume.
/// Returns all part nodes plus the hull for position queries.
fn build_ship(scene: &mut Scene) -> (Vec<NodeId>, NodeId) {
    let mut ship = Vec::new();

    let mut hull = Node::new(
        Primitive::Cone {
            radius: 0.8,
            height: 3.0,
        },
        Material::neon(0x00d9ff),
    )
    .at(SHIP_START);
    hull.rotation.x = std::f32::consts::PI;
    hull.scale = Vec3::splat(SHIP_SCALE);
    let hull_id = scene.add(hull);
    ship.push(hull_id);

    for i in 0..3 {
        let mut fin = Node::new(
            Primitive::Box {
                half: Vec3::new(0.6, 0.05, 0.3),
            },
            Material::neon(0xff006e),
        )
        .at(SHIP_START + Vec3::new(0.0, -1.0 * SHIP_SCALE, 0.0));
        fin.rotation.y = i as f32 * std::f32::consts::TAU / 3.0;
        fin.scale = Vec3::splat(SHIP_SCALE);
        ship.push(scene.add(fin));
    }

    let mut plume = Node::new(
        Primitive::Cone {
            radius: 0.6,
            height: 1.5,
        },
        Material::glass(0xffbe0b, 0.8),
    )
    .at(SHIP_START + Vec3::new(0.0, -2.5 * SHIP_SCALE, 0.0));
    plume.scale = Vec3::splat(SHIP_SCALE);
    ship.push(scene.add(plume));

    (ship, hull_id)
}

/// Re-render a banner label in a new color and kick a small settle-back shake
fn flash_banner(
    scene: &mut Scene,
    anim: &mut impl Animator,
    rng: &mut Pcg32,
    banner: NodeId,
    text: &str,
    color: u32,
) {
    let Some(node) = scene.get_mut(banner) else {
        return;
    };
    if let Primitive::Label { image, .. } = &mut node.primitive {
        *image = render_label(text, color);
    }
    node.material.color = hex_rgb(color);
    node.rotation.z = (rng.random::<f32>() - 0.5) * 0.05;
    anim.schedule(TweenDesc::new(banner, Channel::RotZ, 0.0, 0.1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::TweenEngine;
    use rand::SeedableRng;

    #[test]
    fn menu_builds_three_buttons() {
        let mut scene = Scene::new();
        let menu = MenuScreen::build(&mut scene);
        assert_eq!(menu.buttons.len(), 3);
        assert_eq!(menu.buttons[0].id, ControlId::Start);
        assert!(scene.len() >= 8);
    }

    #[test]
    fn idle_animations_restart_from_clean_baseline() {
        let mut scene = Scene::new();
        let menu = MenuScreen::build(&mut scene);
        let mut engine = TweenEngine::new();

        menu.start_idle_animations(&mut engine);
        let first = engine.active_count();

        // Re-entering the menu without killing would stack duplicates
        menu.kill_animations(&mut engine);
        menu.reset_transforms(&mut scene);
        menu.start_idle_animations(&mut engine);
        assert_eq!(engine.active_count(), first);
    }

    #[test]
    fn settings_volume_visual_moves_handle_and_percent() {
        let mut scene = Scene::new();
        let settings = SettingsScreen::build(&mut scene, 0.5);
        assert_eq!(scene.get(settings.handle).unwrap().position.x, 0.0);

        settings.set_volume_visual(&mut scene, 1.0);
        assert_eq!(
            scene.get(settings.handle).unwrap().position.x,
            super::super::SLIDER_HALF_LENGTH
        );
        let Primitive::Label { image, .. } = &scene.get(settings.percent).unwrap().primitive
        else {
            panic!("percent node is a label");
        };
        assert_eq!(*image, render_label("100%", 0x00d9ff));
    }

    #[test]
    fn settings_builds_hidden() {
        let mut scene = Scene::new();
        let settings = SettingsScreen::build(&mut scene, 0.5);
        assert!(settings
            .all_nodes()
            .iter()
            .all(|&id| !scene.get(id).unwrap().visible));
    }

    #[test]
    fn banner_flash_cycles_palette() {
        let mut scene = Scene::new();
        let mut menu = MenuScreen::build(&mut scene);
        let mut engine = TweenEngine::new();
        let mut rng = Pcg32::seed_from_u64(1);

        menu.flash_title(&mut scene, &mut engine, &mut rng);
        let color = scene.get(menu.title).unwrap().material.color;
        assert_eq!(color, hex_rgb(FLASH_COLORS[1]));

        for _ in 0..FLASH_COLORS.len() {
            menu.flash_title(&mut scene, &mut engine, &mut rng);
        }
        let color = scene.get(menu.title).unwrap().material.color;
        assert_eq!(color, hex_rgb(FLASH_COLORS[1]));
    }

    #[test]
    fn game_over_destroy_removes_all_nodes() {
        let mut scene = Scene::new();
        let mut engine = TweenEngine::new();
        let screen = GameOverScreen::build(&mut scene, 240);
        let before = scene.len();
        // Panel, banner, score, button + label, and the five-part ship
        assert_eq!(before, 10);

        screen.destroy(&mut scene, &mut engine);
        assert!(scene.is_empty());
    }

    #[test]
    fn takeoff_flies_the_ship_off_screen() {
        let mut scene = Scene::new();
        let mut engine = TweenEngine::new();
        let screen = GameOverScreen::build(&mut scene, 0);
        let start = screen.exhaust_source(&scene).unwrap();

        screen.start_takeoff(&scene, &mut engine);
        assert!(engine.active_count() > 0);

        for _ in 0..40 {
            engine.advance(&mut scene, 0.1);
        }
        let end = screen.exhaust_source(&scene).unwrap();
        // Up 26, right 4, shrunk to a fifth
        assert!((end.y - (start.y + 26.0)).abs() < 1e-3);
        assert!((end.x - (start.x + 4.0)).abs() < 1e-3);
        let hull = scene.get(screen.ship_body).unwrap();
        assert!((hull.scale.x - 0.2).abs() < 1e-3);
    }

    #[test]
    fn destroy_mid_takeoff_cancels_the_flight() {
        let mut scene = Scene::new();
        let mut engine = TweenEngine::new();
        let screen = GameOverScreen::build(&mut scene, 0);
        screen.start_takeoff(&scene, &mut engine);
        engine.advance(&mut scene, 0.5);

        screen.destroy(&mut scene, &mut engine);
        assert!(scene.is_empty());
        assert_eq!(engine.active_count(), 0);
    }
}
