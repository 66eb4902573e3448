//! Side-scrolling platformer built on scenes, copies and collision links
//!
//! The menu scene holds a single start button. The level scene holds a
//! ground strip drawn as copies of one tile, a player linked to the
//! `ground` group, and coins that can be collected by clicking them. A HUD
//! scene nested under the level shows the score.

use std::cell::Cell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene_engine::prelude::*;
use thiserror::Error;

const TILE_WIDTH: f32 = 64.0;
const TILE_HEIGHT: f32 = 40.0;
const TILE_COUNT: u32 = 60;
const PLAYER_SPEED: f32 = 4.0;
const JUMP_VELOCITY: f32 = 12.0;
const GRAVITY: f32 = 30.0;
const COIN_SIZE: f32 = 16.0;

/// Errors specific to the demo
#[derive(Error, Debug)]
pub enum DemoError {
    /// The level was used before `initialize` built it
    #[error("Level not built yet")]
    NotInitialized,
}

impl From<DemoError> for AppError {
    fn from(err: DemoError) -> Self {
        Self::GameLogic(err.to_string())
    }
}

struct Level {
    menu: SceneId,
    start_button: usize,
    level: SceneId,
    hud: SceneId,
    player: EntityId,
    coins: Vec<EntityId>,
}

/// The demo game
pub struct Platformer {
    resources: ResourceRegistry,
    seed: u64,
    coin_count: usize,
    grounded: Rc<Cell<bool>>,
    score: u32,
    level: Option<Level>,
}

impl Platformer {
    /// Create the game; `seed` fixes coin placement
    pub fn new(resources: ResourceRegistry, seed: u64, coin_count: usize) -> Self {
        Self {
            resources,
            seed,
            coin_count,
            grounded: Rc::new(Cell::new(false)),
            score: 0,
            level: None,
        }
    }

    pub const fn score(&self) -> u32 {
        self.score
    }

    fn sprite(&self, material: &str) -> Result<Entity, AppError> {
        Ok(Entity::new(Dimension::TwoD, self.resources.material(material)?)
            .with_geometry(self.resources.geometry("quad")?))
    }

    fn build_menu(&self, ctx: &mut FrameContext<'_>) -> Result<(SceneId, usize), AppError> {
        let menu = ctx.scenes.create_scene("menu")?;
        let (w, h) = ctx.screen_size;
        let face = self
            .sprite("button")?
            .with_position(w / 2.0 - 80.0, h / 2.0 - 20.0, 0.0)
            .with_scale(160.0, 40.0, 1.0)
            .with_collider(Collider::sized(160.0, 40.0))
            .with_static_view();
        let face = ctx.scenes.create_entity(face);
        let start_button = ctx.scenes.add_ui(menu, UiElement::button("Start", vec![face]))?;
        ctx.scenes.add_text(menu, TextElement::new("Start", w / 2.0 - 24.0, h / 2.0))?;
        Ok((menu, start_button))
    }

    fn build_level(&self, ctx: &mut FrameContext<'_>) -> Result<(SceneId, SceneId, EntityId, Vec<EntityId>), AppError> {
        let level = ctx.scenes.create_scene("level")?;

        let tiles = (0..TILE_COUNT)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f32 * TILE_WIDTH;
                let copy = EntityCopy::new(i, Vec3::new(x, 0.0, 0.0));
                // Every fourth tile is drawn darker
                if i % 4 == 0 {
                    copy.with_darkness(0.6)
                } else {
                    copy
                }
            })
            .collect();
        let ground = self
            .sprite("ground")?
            .with_scale(TILE_WIDTH, TILE_HEIGHT, 1.0)
            .with_collider(Collider::sized(TILE_WIDTH, TILE_HEIGHT))
            .with_copies(tiles);
        let ground = ctx.scenes.instance_entity(level, ground)?;
        ctx.collisions.create_group("ground");
        ctx.collisions.add_to_group(ctx.scenes.entities_mut(), ground, "ground")?;

        let player = self
            .sprite("player")?
            .with_position(100.0, TILE_HEIGHT, 0.0)
            .with_scale(32.0, 48.0, 1.0)
            .with_collider(Collider::sized(32.0, 48.0))
            .with_gravity(GRAVITY);
        let player = ctx.scenes.instance_entity(level, player)?;
        let grounded = Rc::clone(&self.grounded);
        ctx.collisions.link(ctx.scenes.entities(), player, "ground", move |entity, results| {
            let on_ground = results.get(CollisionSide::Bottom);
            if on_ground {
                entity.velocity.y = 0.0;
            }
            if results.get(CollisionSide::Left) || results.get(CollisionSide::Right) {
                entity.velocity.x = 0.0;
            }
            grounded.set(on_ground);
        })?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        #[allow(clippy::cast_precision_loss)]
        let level_width = TILE_COUNT as f32 * TILE_WIDTH;
        let mut coins = Vec::with_capacity(self.coin_count);
        for _ in 0..self.coin_count {
            let x = rng.gen_range(200.0..level_width - 200.0);
            let y = rng.gen_range(TILE_HEIGHT + 40.0..TILE_HEIGHT + 160.0);
            let coin = self
                .sprite("coin")?
                .with_position(x, y, 0.0)
                .with_scale(COIN_SIZE, COIN_SIZE, 1.0)
                .with_collider(Collider::sized(COIN_SIZE, COIN_SIZE));
            let coin = ctx.scenes.instance_entity(level, coin)?;
            ctx.collisions.register_mouse(ctx.scenes.entities(), coin, |entity, hovered| {
                entity.tint = if hovered { 0.5 } else { 1.0 };
            })?;
            coins.push(coin);
        }

        let hud = ctx.scenes.create_scene("hud")?;
        let mut score = TextElement::new("Score: 0", 16.0, ctx.screen_size.1 - 32.0);
        score.is_static = true;
        ctx.scenes.add_text(hud, score)?;
        ctx.scenes.add_subscene(level, hud)?;

        Ok((level, hud, player, coins))
    }

    fn move_player(&self, ctx: &mut FrameContext<'_>, player: EntityId) -> Result<(), AppError> {
        let left = ctx.input.is_key_down(KeyCode::A) || ctx.input.is_key_down(KeyCode::Left);
        let right = ctx.input.is_key_down(KeyCode::D) || ctx.input.is_key_down(KeyCode::Right);
        let jump = ctx.input.is_key_down(KeyCode::Space) && self.grounded.get();

        let entity = ctx.scenes.entity_mut(player)?;
        entity.velocity.x = match (left, right) {
            (true, false) => -PLAYER_SPEED,
            (false, true) => PLAYER_SPEED,
            _ => 0.0,
        };
        if jump {
            entity.velocity.y = JUMP_VELOCITY;
            self.grounded.set(false);
        }
        let center = entity.position.x;

        // Follow the player horizontally; world Y stays aligned with the screen
        let height = ctx.screen_size.1;
        ctx.camera_mut().set_position(Vec3::new(center, height / 2.0, 0.0));
        Ok(())
    }

    fn collect_clicked_coins(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AppError> {
        if !ctx.input.is_mouse_down(MouseButton::Left) {
            return Ok(());
        }
        let level = self.level.as_mut().ok_or(DemoError::NotInitialized)?;
        let clicked: Vec<EntityId> = level
            .coins
            .iter()
            .copied()
            .filter(|coin| ctx.collisions.mouse_hit(*coin))
            .collect();
        if clicked.is_empty() {
            return Ok(());
        }

        for coin in &clicked {
            ctx.remove_entity(*coin)?;
        }
        level.coins.retain(|coin| !clicked.contains(coin));
        self.score += u32::try_from(clicked.len()).unwrap_or(u32::MAX);
        log::info!("Collected {} coin(s), score {}", clicked.len(), self.score);

        let hud = level.hud;
        if let Some(text) = ctx.scenes.scene_mut(hud)?.texts_mut().first_mut() {
            text.content = format!("Score: {}", self.score);
        }
        Ok(())
    }
}

impl Application for Platformer {
    fn initialize(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AppError> {
        let (menu, start_button) = self.build_menu(ctx)?;
        let (level, hud, player, coins) = self.build_level(ctx)?;
        ctx.scenes.set_current_scene(menu)?;
        ctx.set_camera_controls(false);

        log::info!("Platformer ready: {} coins placed", coins.len());
        self.level = Some(Level {
            menu,
            start_button,
            level,
            hud,
            player,
            coins,
        });
        Ok(())
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AppError> {
        if ctx.input.is_key_down(KeyCode::Escape) {
            ctx.request_close();
            return Ok(());
        }

        let (menu, start_button, level, player) = {
            let level = self.level.as_ref().ok_or(DemoError::NotInitialized)?;
            (level.menu, level.start_button, level.level, level.player)
        };

        if ctx.scenes.scene(menu)?.is_active() {
            if ctx.scenes.button_clicked(menu, start_button) {
                log::info!("Start clicked, entering level");
                ctx.scenes.set_current_scene(level)?;
            }
            return Ok(());
        }

        self.move_player(ctx, player)?;
        self.collect_clicked_coins(ctx)?;

        let position = ctx.scenes.entity(player)?.position;
        if position.y < -TILE_HEIGHT * 4.0 {
            return Err(AppError::GameLogic(format!("player fell out of the world at x = {:.1}", position.x)));
        }
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut FrameContext<'_>) {
        log::info!("Final score: {}", self.score);
    }
}
