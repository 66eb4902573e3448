//! Frame ordering, culling and collision through complete frames

use std::cell::RefCell;
use std::rc::Rc;

use super::{block, config, engine, engine_with};
use crate::application::AppError;
use crate::core::config::Dimension;
use crate::engine::FrameContext;
use crate::foundation::math::{Mat4, Vec3};
use crate::input::{InputEvent, MouseButton};
use crate::physics::CollisionSide;
use crate::platform::HeadlessPlatform;
use crate::render::{FrameTarget, GeometryHandle, MaterialHandle, RenderCommand, Skybox};
use crate::scene::{EntityCopy, TextElement, UiElement};
use approx::assert_relative_eq;

fn noop(_: &mut FrameContext<'_>) -> Result<(), AppError> {
    Ok(())
}

#[test]
fn test_frame_follows_fixed_order() {
    let mut engine = engine(1);
    let level = engine.scenes_mut().create_scene("level").unwrap();
    let id = engine.scenes_mut().instance_entity(level, block(0.0, 0.0)).unwrap();
    engine.scenes_mut().add_text(level, TextElement::new("score", 10.0, 10.0)).unwrap();
    engine.scenes_mut().set_current_scene(level).unwrap();

    engine.start_renderer(&mut noop).unwrap();

    let commands = engine.backend().commands();
    assert_eq!(commands[0], RenderCommand::Initialize);
    assert_eq!(commands[1], RenderCommand::Prepare(id));
    assert_eq!(commands[2], RenderCommand::BeginFrame(FrameTarget::Screen));
    assert!(matches!(commands[3], RenderCommand::SetLighting { .. }));
    assert_eq!(commands[4], RenderCommand::BindGeometry(GeometryHandle::new(1, 6)));

    let position = |wanted: &RenderCommand| commands.iter().position(|c| c == wanted).unwrap();
    let draw = position(&RenderCommand::Draw { vertex_count: 6 });
    let text = position(&RenderCommand::DrawText("score".to_string()));
    let present = position(&RenderCommand::Present);
    assert!(draw < text && text < present);
    assert_eq!(commands.last(), Some(&RenderCommand::Shutdown));
    assert_eq!(engine.last_frame_stats().texts, 1);
}

#[test]
fn test_post_processing_renders_offscreen_then_composes() {
    let mut config = config();
    config.renderer.post_processing = true;
    let mut engine = engine_with(config, HeadlessPlatform::new(800.0, 600.0).close_after(1));

    engine.start_renderer(&mut noop).unwrap();

    let commands = engine.backend().commands();
    assert!(commands.contains(&RenderCommand::BeginFrame(FrameTarget::Offscreen)));
    let compose = commands
        .iter()
        .position(|c| *c == RenderCommand::ComposePostProcessing)
        .unwrap();
    let present = commands.iter().position(|c| *c == RenderCommand::Present).unwrap();
    assert!(compose < present);
}

#[test]
fn test_delta_never_below_frame_floor() {
    let config = config().with_max_fps(Some(20));
    let mut engine = engine_with(config, HeadlessPlatform::new(800.0, 600.0).close_after(3));
    let mut deltas = Vec::new();
    let mut app = |ctx: &mut FrameContext<'_>| -> Result<(), AppError> {
        deltas.push(ctx.delta_time);
        Ok(())
    };

    engine.start_renderer(&mut app).unwrap();

    assert_eq!(deltas.len(), 3);
    assert_relative_eq!(deltas[0], 0.05, epsilon = 1e-6);
    for delta in deltas {
        assert!(delta >= 0.05 - 1e-6, "delta {delta} below floor");
    }
}

#[test]
fn test_gravity_then_motion_commit() {
    let config = config().with_max_fps(Some(20));
    let mut engine = engine_with(config, HeadlessPlatform::new(800.0, 600.0).close_after(1));
    let level = engine.scenes_mut().create_scene("level").unwrap();
    let id = engine
        .scenes_mut()
        .instance_entity(level, block(0.0, 100.0).with_gravity(10.0))
        .unwrap();
    engine.scenes_mut().set_current_scene(level).unwrap();

    engine.start_renderer(&mut noop).unwrap();

    let entity = engine.scenes().entity(id).unwrap();
    assert_relative_eq!(entity.velocity.y, -0.5, epsilon = 1e-6);
    assert_relative_eq!(entity.position.y, 99.5, epsilon = 1e-4);
}

#[test]
fn test_scene_switch_from_callback_is_exclusive() {
    let mut engine = engine(3);
    let a = engine.scenes_mut().create_scene("a").unwrap();
    let b = engine.scenes_mut().create_scene("b").unwrap();
    let in_a = engine.scenes_mut().instance_entity(a, block(0.0, 0.0)).unwrap();
    let in_b = engine
        .scenes_mut()
        .instance_entity(b, block(0.0, 0.0).with_geometry(GeometryHandle::new(2, 6)))
        .unwrap();
    engine.scenes_mut().set_current_scene(a).unwrap();

    let mut app = |ctx: &mut FrameContext<'_>| -> Result<(), AppError> {
        if ctx.frame == 1 {
            let b = ctx.scenes.scene_by_name("b")?;
            ctx.scenes.set_current_scene(b)?;
        }
        Ok(())
    };
    engine.start_renderer(&mut app).unwrap();

    assert_eq!(engine.scenes().active_entities(), vec![in_b]);
    assert!(!engine.scenes().entity(in_a).unwrap().is_active());
    let bound: Vec<u64> = engine
        .backend()
        .commands()
        .iter()
        .filter_map(|c| match c {
            RenderCommand::BindGeometry(geometry) => Some(geometry.id),
            _ => None,
        })
        .collect();
    assert_eq!(bound, vec![1, 1, 2]);
}

#[test]
fn test_culled_copy_is_invisible_to_collision() {
    let mut engine = engine(2);
    engine.camera_mut().set_position(Vec3::zeros());
    let level = engine.scenes_mut().create_scene("level").unwrap();
    let tiles = block(0.0, 0.0).with_copies(vec![EntityCopy::new(7, Vec3::new(2000.0, 0.0, 0.0))]);
    let ground = engine.scenes_mut().instance_entity(level, tiles).unwrap();
    let player = engine.scenes_mut().instance_entity(level, block(2000.0, 12.0)).unwrap();
    engine.scenes_mut().set_current_scene(level).unwrap();

    let hits = Rc::new(RefCell::new(Vec::new()));
    {
        let (scenes, collisions) = engine.scenes_and_collisions_mut();
        collisions.add_to_group(scenes.entities_mut(), ground, "ground").unwrap();
        let sink = Rc::clone(&hits);
        collisions
            .link(scenes.entities(), player, "ground", move |_, results| {
                sink.borrow_mut().push(results.get(CollisionSide::Bottom));
            })
            .unwrap();
    }

    let mut app = |ctx: &mut FrameContext<'_>| -> Result<(), AppError> {
        let entity = ctx.scenes.entity_mut(player)?;
        entity.position = Vec3::new(2000.0, 12.0, 0.0);
        entity.velocity = Vec3::new(0.0, -5.0, 0.0);
        if ctx.frame == 0 {
            ctx.camera_mut().set_position(Vec3::new(1500.0, 0.0, 0.0));
        }
        Ok(())
    };
    engine.start_renderer(&mut app).unwrap();

    // Frame 0 culls against the cached camera at the origin; frame 1 sees
    // the camera moved during frame 0.
    assert_eq!(*hits.borrow(), vec![false, true]);
    assert_eq!(engine.scenes().entity(ground).unwrap().current_copy_indices(), &[0]);
}

#[test]
fn test_static_entity_ignores_camera() {
    let mut engine = engine(1);
    engine.camera_mut().set_position(Vec3::new(1200.0, 300.0, 0.0));
    engine.camera_mut().look();
    let level = engine.scenes_mut().create_scene("level").unwrap();
    engine.scenes_mut().instance_entity(level, block(0.0, 0.0)).unwrap();
    engine
        .scenes_mut()
        .instance_entity(level, block(0.0, 0.0).with_static_view())
        .unwrap();
    engine.scenes_mut().set_current_scene(level).unwrap();

    engine.start_renderer(&mut noop).unwrap();

    let views = engine.backend().uniforms("view");
    assert_eq!(views.len(), 2);
    assert_relative_eq!(views[0][(0, 3)], -2.0, epsilon = 1e-5);
    assert_relative_eq!(views[1], Mat4::identity(), epsilon = 1e-6);
}

#[test]
fn test_skybox_is_centered_on_camera() {
    let mut config = config().with_dimension(Dimension::ThreeD);
    config.renderer.skybox = true;
    config.camera.start_position = Some([1.0, 2.0, 3.0]);
    let mut engine = engine_with(config, HeadlessPlatform::new(800.0, 600.0).close_after(1));
    engine.set_skybox(Some(Skybox {
        geometry: GeometryHandle::new(9, 36),
        material: MaterialHandle(9),
        scale: 50.0,
    }));

    engine.start_renderer(&mut noop).unwrap();

    let expected = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0)) * Mat4::new_scaling(50.0);
    assert_relative_eq!(engine.backend().model_matrices()[0], expected, epsilon = 1e-5);
    assert_eq!(engine.backend().draw_count(), 1);
}

#[test]
fn test_skybox_skipped_in_2d() {
    let mut config = config();
    config.renderer.skybox = true;
    let mut engine = engine_with(config, HeadlessPlatform::new(800.0, 600.0).close_after(1));
    engine.set_skybox(Some(Skybox {
        geometry: GeometryHandle::new(9, 36),
        material: MaterialHandle(9),
        scale: 50.0,
    }));

    engine.start_renderer(&mut noop).unwrap();
    assert_eq!(engine.backend().draw_count(), 0);
}

#[test]
fn test_button_click_reaches_next_callback() {
    let platform = HeadlessPlatform::new(800.0, 600.0)
        .close_after(3)
        .with_event(0, InputEvent::MouseMove(110.0, 490.0))
        .with_event(0, InputEvent::MouseButton(MouseButton::Left, true));
    let mut engine = engine_with(config(), platform);
    let menu = engine.scenes_mut().create_scene("menu").unwrap();
    let face = engine
        .scenes_mut()
        .create_entity(block(100.0, 100.0).with_collider(crate::physics::Collider::sized(20.0, 20.0)).with_static_view());
    let start = engine
        .scenes_mut()
        .add_ui(menu, UiElement::button("Start", vec![face]))
        .unwrap();
    engine.scenes_mut().set_current_scene(menu).unwrap();

    let mut clicks = Vec::new();
    let mut app = |ctx: &mut FrameContext<'_>| -> Result<(), AppError> {
        clicks.push(ctx.scenes.button_clicked(menu, start));
        Ok(())
    };
    engine.start_renderer(&mut app).unwrap();

    assert_eq!(clicks, vec![false, true, false]);
}

#[test]
fn test_entities_created_mid_run_are_prepared_once() {
    let mut engine = engine(3);
    let level = engine.scenes_mut().create_scene("level").unwrap();
    engine.scenes_mut().instance_entity(level, block(0.0, 0.0)).unwrap();
    engine.scenes_mut().set_current_scene(level).unwrap();

    let mut app = |ctx: &mut FrameContext<'_>| -> Result<(), AppError> {
        if ctx.frame == 0 {
            let level = ctx.scenes.scene_by_name("level")?;
            ctx.scenes.instance_entity(level, block(50.0, 0.0))?;
        }
        Ok(())
    };
    engine.start_renderer(&mut app).unwrap();

    let prepares = engine
        .backend()
        .commands()
        .iter()
        .filter(|c| matches!(c, RenderCommand::Prepare(_)))
        .count();
    assert_eq!(prepares, 2);
    assert_eq!(engine.backend().draws_last_frame(), 2);
}

#[test]
fn test_undrawn_copies_stop_colliding() {
    let mut engine = engine(3);
    engine.camera_mut().set_position(Vec3::zeros());
    let level = engine.scenes_mut().create_scene("level").unwrap();
    let tiles = block(0.0, 0.0).with_copies(vec![EntityCopy::new(0, Vec3::zeros())]);
    let ground = engine.scenes_mut().instance_entity(level, tiles).unwrap();
    let player = engine.scenes_mut().instance_entity(level, block(0.0, 12.0)).unwrap();
    engine.scenes_mut().set_current_scene(level).unwrap();

    let hits = Rc::new(RefCell::new(Vec::new()));
    {
        let (scenes, collisions) = engine.scenes_and_collisions_mut();
        collisions.add_to_group(scenes.entities_mut(), ground, "ground").unwrap();
        let sink = Rc::clone(&hits);
        collisions
            .link(scenes.entities(), player, "ground", move |_, results| {
                sink.borrow_mut().push(results.get(CollisionSide::Bottom));
            })
            .unwrap();
    }

    let mut app = |ctx: &mut FrameContext<'_>| -> Result<(), AppError> {
        let entity = ctx.scenes.entity_mut(player)?;
        entity.position = Vec3::new(0.0, 12.0, 0.0);
        entity.velocity = Vec3::new(0.0, -5.0, 0.0);
        if ctx.frame == 0 {
            ctx.scenes.scene_mut(level)?.automatic_rendering = false;
        }
        Ok(())
    };
    engine.start_renderer(&mut app).unwrap();

    assert_eq!(*hits.borrow(), vec![true, false, false]);
    assert!(engine.scenes().entity(ground).unwrap().current_copy_indices().is_empty());
    assert_eq!(engine.backend().draws_last_frame(), 0);
}

#[test]
fn test_manual_scene_drawn_from_callback() {
    let mut engine = engine(2);
    engine.camera_mut().set_position(Vec3::zeros());
    let level = engine.scenes_mut().create_scene("level").unwrap();
    let overlay = engine.scenes_mut().create_scene("overlay").unwrap();
    engine.scenes_mut().scene_mut(overlay).unwrap().automatic_rendering = false;
    let tiles = block(0.0, 0.0).with_copies(vec![
        EntityCopy::new(0, Vec3::zeros()),
        EntityCopy::new(1, Vec3::new(2000.0, 0.0, 0.0)),
    ]);
    let tiles = engine.scenes_mut().instance_entity(overlay, tiles).unwrap();
    engine.scenes_mut().add_subscene(level, overlay).unwrap();
    engine.scenes_mut().set_current_scene(level).unwrap();

    let mut app = |ctx: &mut FrameContext<'_>| -> Result<(), AppError> {
        if ctx.frame == 1 {
            ctx.render_entity(tiles)?;
        }
        Ok(())
    };
    engine.start_renderer(&mut app).unwrap();

    let prepares: Vec<_> = engine
        .backend()
        .commands()
        .iter()
        .filter(|c| matches!(c, RenderCommand::Prepare(_)))
        .collect();
    assert_eq!(prepares, vec![&RenderCommand::Prepare(tiles)]);
    assert_eq!(engine.backend().draws_last_frame(), 1);
    let stats = engine.last_frame_stats();
    assert_eq!(stats.copies_drawn, 1);
    assert_eq!(stats.copies_culled, 1);
    assert_eq!(engine.scenes().entity(tiles).unwrap().current_copy_indices(), &[0]);
}
