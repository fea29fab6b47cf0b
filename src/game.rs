//! The per-instance game context
//!
//! `Game` owns everything one running game needs: sim state, display list,
//! tween engine, screens, schedules, audio, settings. Nothing is
//! process-global; two `Game` values in one process stay independent, which
//! is what the tests rely on.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioManager, MUSIC_NOTES, MUSIC_NOTE_PERIOD, Sound};
use crate::consts::*;
use crate::fx::{
    Animator, Channel, Ease, TweenEngine, TweenDesc, spawn_exhaust_puff, spawn_explosion,
    spawn_glass_break,
};
use crate::hud::{Hud, HudSink};
use crate::pointer_to_world;
use crate::scene::{Material, Node, NodeId, Primitive, Scene};
use crate::settings::Settings;
use crate::sim::{self, Event, GameState, Mode, TickInput};
use crate::timeline::{RepeatingTimer, Timeline};
use crate::ui::{
    ControlId, GameOverScreen, HoverState, MenuScreen, SettingsScreen, hit_test,
    slider_handle_from_ndc, volume_from_handle,
};

/// Banner flash period (menu and game-over titles)
const TITLE_FLASH_PERIOD: f32 = 0.5;
/// Missile flight time; explosion fires when it ends
const LAUNCH_FLIGHT: f32 = 2.0;
/// Gameplay begins this long after START
const LAUNCH_TOTAL: f32 = 3.0;
/// Game-over panel appears this long after the final ball drops
const GAME_OVER_PANEL_DELAY: f32 = 1.5;
/// Ship takeoff begins this long after the panel, exhaust stops at the end
const TAKEOFF_DELAY: f32 = 1.0;
const TAKEOFF_EXHAUST_END: f32 = 4.5;
/// Exhaust puff spawn period during takeoff
const EXHAUST_PERIOD: f32 = 0.1;
/// Idle animations restart this long after closing settings over the menu
const MENU_IDLE_RESTART_DELAY: f32 = 0.9;

/// Keys the host forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Pause,
    Settings,
}

/// Delayed one-shot actions owned by the context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    /// Missile reached the top: burst and boom
    Explode,
    /// Launch sequence over: spawn the field and play
    BeginPlay,
    /// Slide the game-over panel in
    ShowGameOverPanel,
    /// The escape ship lifts off the game-over screen
    ShipTakeoff,
    /// Takeoff done; no more exhaust puffs
    StopExhaust,
    /// Settings closed over the menu: idle tweens resume
    RestartMenuIdle,
}

pub struct Game {
    pub state: GameState,
    pub scene: Scene,
    pub anim: TweenEngine,
    pub settings: Settings,
    pub audio: AudioManager,
    /// Demo mode: the paddle plays itself
    pub idle_demo: bool,
    /// Set by QUIT; the native loop exits on it, the browser just logs
    pub quit_requested: bool,

    rng: Pcg32,
    pointer_ndc: Vec2,
    hover: HoverState,
    dragging_volume: bool,
    hud: Hud,

    menu: MenuScreen,
    settings_screen: SettingsScreen,
    game_over: Option<GameOverScreen>,

    launch_cue: Option<Timeline<Cue>>,
    post_cue: Option<Timeline<Cue>>,
    title_flash: Option<RepeatingTimer>,
    exhaust: Option<RepeatingTimer>,
    music: Option<RepeatingTimer>,
    music_note: usize,

    stars: Vec<NodeId>,
    paddle_node: Option<NodeId>,
    ball_node: Option<NodeId>,
    /// In lockstep with `state.bricks`
    brick_nodes: Vec<NodeId>,
    missile: Option<NodeId>,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        let settings = Settings::load();
        let audio = AudioManager::new(settings.master_volume);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut scene = Scene::new();
        let mut anim = TweenEngine::new();

        let stars = spawn_starfield(&mut scene, &mut rng);
        let menu = MenuScreen::build(&mut scene);
        menu.start_idle_animations(&mut anim);
        let settings_screen = SettingsScreen::build(&mut scene, settings.master_volume);

        log::info!("game ready (seed {seed})");

        Self {
            state: GameState::new(),
            scene,
            anim,
            settings,
            audio,
            idle_demo: false,
            quit_requested: false,
            rng,
            pointer_ndc: Vec2::ZERO,
            hover: HoverState::default(),
            dragging_volume: false,
            hud: Hud::new(),
            menu,
            settings_screen,
            game_over: None,
            launch_cue: None,
            post_cue: None,
            title_flash: Some(RepeatingTimer::new(TITLE_FLASH_PERIOD)),
            exhaust: None,
            music: None,
            music_note: 0,
            stars,
            paddle_node: None,
            ball_node: None,
            brick_nodes: Vec::new(),
            missile: None,
        }
    }

    // === Input routing ===

    /// Pointer moved; position in NDC (-1..1, +y up)
    pub fn pointer_moved(&mut self, ndc: Vec2) {
        self.pointer_ndc = ndc;
        let world = pointer_to_world(ndc);

        match self.state.mode {
            Mode::Menu => {
                self.hover.update(world, &self.menu.buttons, &mut self.anim);
            }
            Mode::Settings if self.dragging_volume => {
                let volume = volume_from_handle(slider_handle_from_ndc(ndc.x));
                self.apply_volume(volume);
            }
            _ => {}
        }
    }

    pub fn pointer_down(&mut self, ndc: Vec2) {
        self.pointer_ndc = ndc;
        self.audio.resume();
        let world = pointer_to_world(ndc);

        match self.state.mode {
            Mode::Menu => {
                match self.hover.click(world, &self.menu.buttons) {
                    Some(ControlId::Start) => self.start_game(),
                    Some(ControlId::Settings) => self.open_settings(),
                    Some(ControlId::Quit) => {
                        log::info!("quit requested");
                        self.quit_requested = true;
                    }
                    _ => {}
                }
            }
            Mode::Settings => {
                if self.settings_screen.handle_rect(&self.scene).contains(world) {
                    self.dragging_volume = true;
                    let volume = volume_from_handle(slider_handle_from_ndc(ndc.x));
                    self.apply_volume(volume);
                } else if self.settings_screen.back.rect.contains(world) {
                    self.close_settings();
                }
            }
            Mode::GameOver => {
                if let Some(screen) = &self.game_over {
                    if hit_test(&[screen.menu_button], world).is_some() {
                        self.return_to_menu();
                    }
                }
            }
            _ => {}
        }
    }

    pub fn pointer_up(&mut self) {
        if self.dragging_volume {
            self.dragging_volume = false;
            self.settings.save();
        }
    }

    pub fn key_pressed(&mut self, key: Key) {
        match key {
            Key::Pause => {
                if matches!(self.state.mode, Mode::Playing | Mode::Paused) {
                    self.state.toggle_pause();
                    log::info!("state -> {:?}", self.state.mode);
                }
            }
            Key::Settings => match self.state.mode {
                Mode::Menu | Mode::Playing | Mode::Paused => self.open_settings(),
                Mode::Settings => self.close_settings(),
                _ => {}
            },
        }
    }

    /// Tab hidden / window blurred
    pub fn focus_lost(&mut self) {
        if self.state.mode == Mode::Playing && self.settings.pause_on_blur {
            self.state.toggle_pause();
            log::info!("auto-paused on blur");
        }
    }

    // === Frame ===

    /// Advance the whole game by `dt` seconds of wall-clock time
    pub fn frame(&mut self, dt: f32, sink: &mut dyn HudSink) {
        // Delayed cues first so mode changes land before this frame's tick
        let mut cues = Vec::new();
        if let Some(tl) = &mut self.launch_cue {
            tl.advance(dt, &mut cues);
            if tl.is_finished() {
                self.launch_cue = None;
            }
        }
        if let Some(tl) = &mut self.post_cue {
            tl.advance(dt, &mut cues);
            if tl.is_finished() {
                self.post_cue = None;
            }
        }
        for cue in cues {
            self.fire(cue);
        }

        // Banner flash on the menu and game-over screens
        if let Some(timer) = &mut self.title_flash {
            for _ in 0..timer.advance(dt) {
                match self.state.mode {
                    Mode::Menu => {
                        self.menu
                            .flash_title(&mut self.scene, &mut self.anim, &mut self.rng);
                    }
                    Mode::GameOver => {
                        if let Some(screen) = &mut self.game_over {
                            screen.flash_title(&mut self.scene, &mut self.anim, &mut self.rng);
                        }
                    }
                    _ => {}
                }
            }
        }

        // Gameplay
        if self.state.mode == Mode::Playing {
            let input = TickInput {
                paddle_target_x: Some(pointer_to_world(self.pointer_ndc).x),
                idle_mode: self.idle_demo,
            };
            let mut events = Vec::new();
            sim::tick(&mut self.state, &input, &mut events);
            for event in events {
                self.handle_event(event);
            }

            if self.settings.music {
                if let Some(timer) = &mut self.music {
                    for _ in 0..timer.advance(dt) {
                        self.audio.play_music_note(MUSIC_NOTES[self.music_note]);
                        self.music_note = (self.music_note + 1) % MUSIC_NOTES.len();
                    }
                }
            }
        }

        // Exhaust trail behind the escaping ship
        if self.state.mode == Mode::GameOver {
            if let Some(timer) = &mut self.exhaust {
                let fires = timer.advance(dt);
                if let Some(screen) = &self.game_over {
                    for _ in 0..fires {
                        if let Some(pos) = screen.exhaust_source(&self.scene) {
                            spawn_exhaust_puff(&mut self.scene, &mut self.anim, pos);
                        }
                    }
                }
            }
        }

        self.sync_world_nodes();

        // Slow background drift
        for &star in &self.stars {
            if let Some(node) = self.scene.get_mut(star) {
                node.rotation.z += 0.2 * dt;
            }
        }

        self.anim.advance(&mut self.scene, dt);

        let hud_visible = matches!(
            self.state.mode,
            Mode::Playing | Mode::Paused | Mode::GameOver
        );
        self.hud.set_visible(hud_visible, sink);
        if hud_visible {
            self.hud.sync(&self.state.session, sink);
        }
    }

    // === Transitions ===

    fn start_game(&mut self) {
        self.state.begin_launch();
        log::info!("state -> launching");

        self.hover.clear(&mut self.anim);
        self.menu.kill_animations(&mut self.anim);
        self.menu.reset_transforms(&mut self.scene);
        self.menu.set_visible(&mut self.scene, false);
        self.title_flash = None;

        // Missile rises from the paddle line to the ceiling
        let missile = self.scene.add(
            Node::new(
                Primitive::Extruded {
                    width: 0.8,
                    height: 3.0,
                    depth: 0.8,
                },
                Material::neon(0xff006e),
            )
            .at(Vec3::new(0.0, PADDLE_Y, 0.0)),
        );
        self.anim.schedule(
            TweenDesc::new(missile, Channel::PosY, WALL_TOP_Y, LAUNCH_FLIGHT).ease(Ease::QuadIn),
        );
        self.missile = Some(missile);
        self.audio.play(Sound::Launch);

        self.launch_cue = Some(Timeline::new(vec![
            (LAUNCH_FLIGHT, Cue::Explode),
            (LAUNCH_TOTAL, Cue::BeginPlay),
        ]));
    }

    fn fire(&mut self, cue: Cue) {
        match cue {
            Cue::Explode => {
                if let Some(missile) = self.missile.take() {
                    self.anim.kill_tweens_of(missile);
                    self.scene.remove(missile);
                }
                if self.settings.particles {
                    spawn_explosion(
                        &mut self.scene,
                        &mut self.anim,
                        &mut self.rng,
                        Vec3::new(0.0, WALL_TOP_Y, 0.0),
                    );
                }
                self.audio.play(Sound::Explosion);
            }
            Cue::BeginPlay => {
                self.state.begin_playing();
                log::info!("state -> playing");

                self.paddle_node = Some(self.scene.add(
                    Node::new(
                        Primitive::Box {
                            half: Vec3::new(4.0, 0.5, 0.5),
                        },
                        Material::neon(0x00d9ff),
                    )
                    .at(Vec3::new(0.0, PADDLE_Y, 0.0)),
                ));
                self.ball_node = Some(self.scene.add(
                    Node::new(
                        Primitive::Sphere {
                            radius: BALL_RADIUS,
                        },
                        Material::neon(0xffffff),
                    )
                    .at(BALL_SPAWN_POS.extend(0.0)),
                ));
                self.rebuild_brick_nodes();

                self.hud.invalidate();
                self.music = Some(RepeatingTimer::new(MUSIC_NOTE_PERIOD));
                self.music_note = 0;
                if self.settings.music {
                    self.audio.play_music_note(MUSIC_NOTES[0]);
                    self.music_note = 1;
                }
            }
            Cue::ShowGameOverPanel => {
                self.teardown_world();
                let screen = GameOverScreen::build(&mut self.scene, self.state.session.score);
                self.anim.schedule(
                    TweenDesc::new(screen.panel, Channel::PosZ, 3.0, 0.5).ease(Ease::BackOut),
                );
                self.game_over = Some(screen);
                self.title_flash = Some(RepeatingTimer::new(TITLE_FLASH_PERIOD));
                self.post_cue = Some(Timeline::new(vec![
                    (TAKEOFF_DELAY, Cue::ShipTakeoff),
                    (TAKEOFF_EXHAUST_END, Cue::StopExhaust),
                ]));
            }
            Cue::ShipTakeoff => {
                if let Some(screen) = &self.game_over {
                    screen.start_takeoff(&self.scene, &mut self.anim);
                    self.exhaust = Some(RepeatingTimer::new(EXHAUST_PERIOD));
                }
            }
            Cue::StopExhaust => {
                self.exhaust = None;
            }
            Cue::RestartMenuIdle => {
                if self.state.mode == Mode::Menu {
                    self.menu.start_idle_animations(&mut self.anim);
                }
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::WallHit | Event::PaddleHit => self.audio.play(Sound::Hit),
            Event::BrickDestroyed { index, pos, color } => {
                if index < self.brick_nodes.len() {
                    let node = self.brick_nodes.remove(index);
                    self.anim.kill_tweens_of(node);
                    self.scene.remove(node);
                }
                if self.settings.particles {
                    spawn_glass_break(
                        &mut self.scene,
                        &mut self.anim,
                        &mut self.rng,
                        pos.extend(0.0),
                        color,
                    );
                }
                self.audio.play(Sound::Break);
            }
            Event::WaveCleared { level } => {
                log::info!("wave cleared, level {level}");
                self.rebuild_brick_nodes();
            }
            Event::BallLost { lives_left } => {
                log::info!("ball lost, {lives_left} lives left");
            }
            Event::GameOver => {
                log::info!("state -> game over, score {}", self.state.session.score);
                self.audio.play(Sound::GameOver);
                self.music = None;
                self.post_cue = Some(Timeline::after(GAME_OVER_PANEL_DELAY, Cue::ShowGameOverPanel));
            }
        }
    }

    fn open_settings(&mut self) {
        self.state.enter_settings();
        log::info!("state -> settings");
        self.hover.clear(&mut self.anim);

        self.menu.kill_animations(&mut self.anim);
        self.menu.reset_transforms(&mut self.scene);
        self.menu.set_visible(&mut self.scene, false);
        self.title_flash = None;

        let volume = self.settings.master_volume;
        self.settings_screen.set_visible(&mut self.scene, true);
        self.settings_screen.set_volume_visual(&mut self.scene, volume);
        if let Some(panel) = self.scene.get_mut(self.settings_screen.panel) {
            panel.position = Vec3::new(0.0, 0.0, -20.0);
        }
        self.anim.schedule(
            TweenDesc::new(self.settings_screen.panel, Channel::PosZ, 3.0, 0.5)
                .ease(Ease::BackOut),
        );
    }

    fn close_settings(&mut self) {
        let back_to = self.state.leave_settings();
        log::info!("state -> {back_to:?}");
        self.dragging_volume = false;
        self.settings_screen.set_visible(&mut self.scene, false);
        self.anim.kill_tweens_of(self.settings_screen.panel);
        self.settings.save();

        if back_to == Mode::Menu {
            self.menu.set_visible(&mut self.scene, true);
            self.title_flash = Some(RepeatingTimer::new(TITLE_FLASH_PERIOD));
            self.post_cue = Some(Timeline::after(MENU_IDLE_RESTART_DELAY, Cue::RestartMenuIdle));
        }
    }

    fn return_to_menu(&mut self) {
        self.state.return_to_menu();
        log::info!("state -> menu");

        if let Some(screen) = self.game_over.take() {
            screen.destroy(&mut self.scene, &mut self.anim);
        }
        // Cancel any pending takeoff cues and the emitter with the screen
        self.post_cue = None;
        self.exhaust = None;
        self.menu.set_visible(&mut self.scene, true);
        self.menu.reset_transforms(&mut self.scene);
        self.menu.start_idle_animations(&mut self.anim);
        self.title_flash = Some(RepeatingTimer::new(TITLE_FLASH_PERIOD));
        self.hud.invalidate();
    }

    // === Internals ===

    fn apply_volume(&mut self, volume: f32) {
        self.settings.set_master_volume(volume);
        self.audio.set_master_volume(volume);
        self.settings_screen
            .set_volume_visual(&mut self.scene, volume);
    }

    fn rebuild_brick_nodes(&mut self) {
        for node in self.brick_nodes.drain(..) {
            self.anim.kill_tweens_of(node);
            self.scene.remove(node);
        }
        for brick in &self.state.bricks {
            let id = self.scene.add(
                Node::new(
                    Primitive::Box {
                        half: Vec3::new(BRICK_WIDTH / 2.0, BRICK_HEIGHT / 2.0, 0.75),
                    },
                    Material::neon(brick.color),
                )
                .at(brick.pos.extend(0.0)),
            );
            // Each brick drifts on its own depth phase
            self.anim.schedule(
                TweenDesc::new(
                    id,
                    Channel::PosZ,
                    self.rng.random_range(-0.25..0.25),
                    2.0 + self.rng.random_range(0.0..1.0),
                )
                .ease(Ease::SineInOut)
                .yoyo(),
            );
            self.brick_nodes.push(id);
        }
    }

    fn teardown_world(&mut self) {
        for node in self.brick_nodes.drain(..) {
            self.anim.kill_tweens_of(node);
            self.scene.remove(node);
        }
        for node in [self.paddle_node.take(), self.ball_node.take()]
            .into_iter()
            .flatten()
        {
            self.anim.kill_tweens_of(node);
            self.scene.remove(node);
        }
    }

    fn sync_world_nodes(&mut self) {
        if let Some(id) = self.ball_node {
            if let Some(node) = self.scene.get_mut(id) {
                node.position = self.state.ball.pos.extend(0.0);
            }
        }
        if let Some(id) = self.paddle_node {
            if let Some(node) = self.scene.get_mut(id) {
                node.position.x = self.state.paddle.x;
            }
        }
    }
}

/// Background stars: random position, tint, and spin phase from the seed
fn spawn_starfield(scene: &mut Scene, rng: &mut Pcg32) -> Vec<NodeId> {
    let palette = [0xffffff, 0x00d9ff, 0xff006e];
    (0..STAR_COUNT)
        .map(|_| {
            let color = palette[rng.random_range(0..palette.len())];
            let mut node = Node::new(Primitive::Sphere { radius: 0.06 }, Material::neon(color)).at(
                Vec3::new(
                    rng.random_range(-30.0..30.0),
                    rng.random_range(-16.0..16.0),
                    rng.random_range(-25.0..-5.0),
                ),
            );
            node.rotation.z = rng.random_range(0.0..std::f32::consts::TAU);
            scene.add(node)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::LogHud;

    fn step(game: &mut Game, seconds: f32) {
        let mut hud = LogHud;
        let mut t = 0.0;
        while t < seconds {
            game.frame(1.0 / 60.0, &mut hud);
            t += 1.0 / 60.0;
        }
    }

    /// Hover then press the control centered at `world`
    fn click_at(game: &mut Game, world: Vec2) {
        let ndc = Vec2::new(world.x / POINTER_SCALE_X, world.y / POINTER_SCALE_Y);
        game.pointer_moved(ndc);
        game.pointer_down(ndc);
        game.pointer_up();
    }

    fn start_button() -> Vec2 {
        Vec2::new(0.0, 2.0)
    }

    fn into_playing(game: &mut Game) {
        click_at(game, start_button());
        assert_eq!(game.state.mode, Mode::Launching);
        step(game, LAUNCH_TOTAL + 0.1);
        assert_eq!(game.state.mode, Mode::Playing);
    }

    #[test]
    fn menu_to_playing_spawns_fresh_session_and_wave() {
        let mut game = Game::new(1);
        assert_eq!(game.state.mode, Mode::Menu);

        into_playing(&mut game);
        assert_eq!(game.state.bricks.len(), BRICK_ROWS * BRICK_COLS);
        assert_eq!(game.brick_nodes.len(), BRICK_ROWS * BRICK_COLS);
        assert_eq!(game.state.session.score, 0);
        assert_eq!(game.state.session.lives, STARTING_LIVES);
        assert_eq!(game.state.session.level, 1);
    }

    #[test]
    fn missile_is_gone_once_playing_starts() {
        let mut game = Game::new(2);
        into_playing(&mut game);
        assert!(game.missile.is_none());
    }

    #[test]
    fn settings_round_trip_preserves_a_playing_session() {
        let mut game = Game::new(3);
        into_playing(&mut game);
        game.state.session.score = 70;
        let session = game.state.session;

        game.key_pressed(Key::Settings);
        assert_eq!(game.state.mode, Mode::Settings);
        step(&mut game, 0.5);

        game.key_pressed(Key::Settings);
        assert_eq!(game.state.mode, Mode::Playing);
        assert_eq!(game.state.session, session);
    }

    #[test]
    fn volume_drag_maps_pointer_to_master_volume() {
        let mut game = Game::new(4);
        click_at(&mut game, Vec2::new(0.0, -1.0)); // SETTINGS button
        assert_eq!(game.state.mode, Mode::Settings);

        // Handle sits at center for the default 50%
        game.pointer_down(Vec2::ZERO);
        assert!(game.dragging_volume);
        game.pointer_moved(Vec2::new(1.0, 0.0));
        assert_eq!(game.settings.master_volume, 1.0);
        assert_eq!(game.audio.master_volume(), 1.0);

        game.pointer_moved(Vec2::new(-1.0, 0.0));
        assert_eq!(game.settings.master_volume, 0.0);

        game.pointer_up();
        assert!(!game.dragging_volume);
    }

    #[test]
    fn back_from_menu_settings_returns_to_menu() {
        let mut game = Game::new(5);
        click_at(&mut game, Vec2::new(0.0, -1.0));
        assert_eq!(game.state.mode, Mode::Settings);

        // BACK button
        game.pointer_down(Vec2::new(0.0, -0.5));
        assert_eq!(game.state.mode, Mode::Menu);
    }

    #[test]
    fn pause_freezes_and_resumes() {
        let mut game = Game::new(6);
        into_playing(&mut game);
        let pos = game.state.ball.pos;

        game.key_pressed(Key::Pause);
        assert_eq!(game.state.mode, Mode::Paused);
        step(&mut game, 0.5);
        assert_eq!(game.state.ball.pos, pos);

        game.key_pressed(Key::Pause);
        step(&mut game, 0.5);
        assert_ne!(game.state.ball.pos, pos);
    }

    #[test]
    fn blur_auto_pauses_only_while_playing() {
        let mut game = Game::new(7);
        game.focus_lost();
        assert_eq!(game.state.mode, Mode::Menu);

        into_playing(&mut game);
        game.focus_lost();
        assert_eq!(game.state.mode, Mode::Paused);
        // Losing focus again must not unpause
        game.focus_lost();
        assert_eq!(game.state.mode, Mode::Paused);
    }

    #[test]
    fn game_over_panel_appears_after_delay_then_returns_to_menu() {
        let mut game = Game::new(8);
        into_playing(&mut game);
        game.state.session.score = 240;
        game.state.session.lives = 1;
        game.state.ball.pos = Vec2::new(0.0, FLOOR_Y - 0.1);
        game.state.ball.vel = Vec2::new(0.0, -0.5);

        step(&mut game, 0.1);
        assert_eq!(game.state.mode, Mode::GameOver);
        assert!(game.game_over.is_none());

        step(&mut game, GAME_OVER_PANEL_DELAY + 0.1);
        assert!(game.game_over.is_some());
        // World nodes were torn down with the panel's arrival
        assert!(game.ball_node.is_none());
        assert!(game.brick_nodes.is_empty());

        // RETURN TO MENU
        game.pointer_down(Vec2::new(0.0, -0.45));
        assert_eq!(game.state.mode, Mode::Menu);
        assert_eq!(game.state.session.score, 0);
        assert_eq!(game.state.session.lives, STARTING_LIVES);
        assert!(game.game_over.is_none());
    }

    #[test]
    fn quit_sets_the_flag_without_touching_state() {
        let mut game = Game::new(9);
        click_at(&mut game, Vec2::new(0.0, -4.0));
        assert!(game.quit_requested);
        assert_eq!(game.state.mode, Mode::Menu);
    }

    #[test]
    fn destroying_a_brick_keeps_nodes_in_lockstep() {
        let mut game = Game::new(10);
        into_playing(&mut game);

        // Park the ball inside the first brick
        game.state.ball.pos = game.state.bricks[0].pos;
        game.state.ball.vel = Vec2::ZERO;
        step(&mut game, 1.0 / 30.0);

        assert_eq!(game.state.bricks.len(), game.brick_nodes.len());
        assert!(game.state.bricks.len() < BRICK_ROWS * BRICK_COLS);
    }

    #[test]
    fn bricks_float_on_their_own_idle_tweens() {
        let mut game = Game::new(14);
        into_playing(&mut game);
        for &node in &game.brick_nodes {
            assert_eq!(game.anim.count_for(node), 1);
        }

        step(&mut game, 0.5);
        let drifted = game.brick_nodes.iter().any(|&id| {
            game.scene
                .get(id)
                .is_some_and(|n| n.position.z.abs() > 1e-4)
        });
        assert!(drifted);
    }

    #[test]
    fn game_over_ship_takes_off_and_puffs_exhaust() {
        let mut game = Game::new(15);
        into_playing(&mut game);
        game.state.session.lives = 1;
        game.state.ball.pos = Vec2::new(0.0, FLOOR_Y - 0.1);
        game.state.ball.vel = Vec2::new(0.0, -0.5);
        step(&mut game, 0.1);
        assert_eq!(game.state.mode, Mode::GameOver);

        // Panel slides in, then the ship lifts off and starts puffing
        step(&mut game, GAME_OVER_PANEL_DELAY + TAKEOFF_DELAY + 0.2);
        assert!(game.exhaust.is_some());
        let before = game.scene.len();
        step(&mut game, 0.5);
        assert!(game.scene.len() > before);

        // Emitter shuts down once the flight is over
        step(&mut game, TAKEOFF_EXHAUST_END);
        assert!(game.exhaust.is_none());
    }

    #[test]
    fn a_full_run_leaves_no_stray_nodes() {
        let mut game = Game::new(16);
        let baseline = game.scene.len();
        into_playing(&mut game);
        game.state.session.lives = 1;
        game.state.ball.pos = Vec2::new(0.0, FLOOR_Y - 0.1);
        game.state.ball.vel = Vec2::new(0.0, -0.5);
        step(&mut game, 0.1);
        assert_eq!(game.state.mode, Mode::GameOver);

        // Ride the whole set piece out, then go home
        step(&mut game, GAME_OVER_PANEL_DELAY + TAKEOFF_EXHAUST_END + 0.2);
        game.pointer_down(Vec2::new(0.0, -0.45));
        assert_eq!(game.state.mode, Mode::Menu);
        assert!(game.exhaust.is_none());

        // The last exhaust puffs fade themselves out
        step(&mut game, 1.2);
        assert_eq!(game.scene.len(), baseline);
    }

    #[test]
    fn idle_demo_moves_the_paddle() {
        let mut game = Game::new(11);
        into_playing(&mut game);
        game.idle_demo = true;
        game.state.ball.pos = Vec2::new(7.0, 0.0);
        game.state.ball.vel = Vec2::ZERO;
        step(&mut game, 1.0 / 30.0);
        assert_eq!(game.state.paddle.x, 7.0);
    }

    #[test]
    fn two_games_are_independent() {
        let mut a = Game::new(12);
        let b = Game::new(13);
        into_playing(&mut a);
        assert_eq!(a.state.mode, Mode::Playing);
        assert_eq!(b.state.mode, Mode::Menu);
    }
}
