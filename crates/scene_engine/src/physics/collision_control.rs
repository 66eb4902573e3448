//! Group collision and mouse hit-testing
//!
//! [`CollisionControl`] keeps three registration tables, all keyed by
//! [`EntityId`]:
//!
//! - **groups**: named buckets of entities that can be collided with
//! - **links**: one per entity; the group it tests against plus a callback
//!   receiving the four side flags
//! - **mouse**: entities that want a mouse-over flag every frame
//!
//! Once per frame [`CollisionControl::update`] evaluates every link, then
//! fires the link callbacks, then evaluates and fires the mouse callbacks.
//! Registrations are never pruned implicitly; call
//! [`CollisionControl::unregister`] when an entity is removed.

use std::collections::HashMap;

use crate::foundation::math::{Vec2, Vec3};
use crate::input::InputState;
use crate::physics::{Collider, CollisionError, CollisionResults};
use crate::scene::{Entity, EntityId, EntityStore};

/// Callback invoked with a linked entity's collision results
pub type LinkCallback = Box<dyn FnMut(&mut Entity, CollisionResults)>;

/// Callback invoked with an entity's mouse-over flag
pub type MouseCallback = Box<dyn FnMut(&mut Entity, bool)>;

struct Link {
    group: String,
    callback: LinkCallback,
}

/// Where the camera is and how large the screen is, for mouse transforms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSpace {
    /// Camera position in pixels
    pub camera: Vec2,
    /// Screen size in pixels
    pub size: (f32, f32),
}

impl ScreenSpace {
    /// Screen space for a camera position and screen size
    #[must_use]
    pub fn new(camera: Vec3, size: (f32, f32)) -> Self {
        Self { camera: camera.xy(), size }
    }

    /// Screen space with the camera at the screen center, used for
    /// screen-anchored entities
    #[must_use]
    pub fn centered(size: (f32, f32)) -> Self {
        Self {
            camera: Vec2::new(size.0 / 2.0, size.1 / 2.0),
            size,
        }
    }

    /// Screen pixel (origin top-left, Y down) to world (Y up)
    #[must_use]
    pub fn mouse_to_world(&self, mouse: Vec2) -> Vec2 {
        Vec2::new(
            mouse.x + self.camera.x - self.size.0 / 2.0,
            -(mouse.y - self.camera.y - self.size.1 / 2.0),
        )
    }

    /// Inverse of [`ScreenSpace::mouse_to_world`]
    #[must_use]
    pub fn world_to_mouse(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            world.x - self.camera.x + self.size.0 / 2.0,
            -world.y + self.camera.y + self.size.1 / 2.0,
        )
    }
}

/// Collision registrations and per-frame evaluation
pub struct CollisionControl {
    groups: HashMap<String, Vec<EntityId>>,
    links: Vec<(EntityId, Link)>,
    mouse: Vec<(EntityId, MouseCallback)>,
    mouse_hits: HashMap<EntityId, bool>,
    mouse_collider: Collider,
}

impl std::fmt::Debug for CollisionControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionControl")
            .field("groups", &self.groups)
            .field("links", &self.links.len())
            .field("mouse", &self.mouse.len())
            .finish_non_exhaustive()
    }
}

impl Default for CollisionControl {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl CollisionControl {
    /// Create with the given mouse collider size
    #[must_use]
    pub fn new(mouse_collider_size: f32) -> Self {
        Self {
            groups: HashMap::new(),
            links: Vec::new(),
            mouse: Vec::new(),
            mouse_hits: HashMap::new(),
            mouse_collider: Collider::centered(mouse_collider_size),
        }
    }

    /// Create an empty group; existing groups are left untouched
    pub fn create_group(&mut self, group: impl Into<String>) {
        self.groups.entry(group.into()).or_default();
    }

    /// Members of a group
    pub fn group_members(&self, group: &str) -> Result<&[EntityId], CollisionError> {
        self.groups
            .get(group)
            .map(Vec::as_slice)
            .ok_or_else(|| CollisionError::UnknownGroup(group.to_string()))
    }

    /// Add an entity to a group, creating the group on first use
    pub fn add_to_group(&mut self, store: &mut EntityStore, id: EntityId, group: &str) -> Result<(), CollisionError> {
        let entity = store.get_mut(id).ok_or(CollisionError::DanglingEntity(id))?;
        if entity.collider.is_none() {
            return Err(CollisionError::MissingCollider(id));
        }
        entity.group = Some(group.to_string());
        let members = self.groups.entry(group.to_string()).or_default();
        if !members.contains(&id) {
            members.push(id);
            log::debug!("Entity {:?} joined collision group '{}'", id, group);
        }
        Ok(())
    }

    /// Remove an entity from a group
    pub fn remove_from_group(&mut self, id: EntityId, group: &str) -> Result<bool, CollisionError> {
        let members = self
            .groups
            .get_mut(group)
            .ok_or_else(|| CollisionError::UnknownGroup(group.to_string()))?;
        let before = members.len();
        members.retain(|member| *member != id);
        Ok(members.len() != before)
    }

    /// Link an entity to a group; replaces any previous link of the entity
    pub fn link(
        &mut self,
        store: &EntityStore,
        id: EntityId,
        group: &str,
        callback: impl FnMut(&mut Entity, CollisionResults) + 'static,
    ) -> Result<(), CollisionError> {
        if !self.groups.contains_key(group) {
            return Err(CollisionError::UnknownGroup(group.to_string()));
        }
        let entity = store.get(id).ok_or(CollisionError::DanglingEntity(id))?;
        if entity.collider.is_none() {
            return Err(CollisionError::MissingCollider(id));
        }
        self.links.retain(|(linked, _)| *linked != id);
        self.links.push((
            id,
            Link {
                group: group.to_string(),
                callback: Box::new(callback),
            },
        ));
        log::debug!("Entity {:?} linked to collision group '{}'", id, group);
        Ok(())
    }

    /// Remove an entity's link
    pub fn unlink(&mut self, id: EntityId) -> bool {
        let before = self.links.len();
        self.links.retain(|(linked, _)| *linked != id);
        self.links.len() != before
    }

    /// Register an entity for mouse hit-testing; replaces any previous
    /// registration
    pub fn register_mouse(
        &mut self,
        store: &EntityStore,
        id: EntityId,
        callback: impl FnMut(&mut Entity, bool) + 'static,
    ) -> Result<(), CollisionError> {
        let entity = store.get(id).ok_or(CollisionError::DanglingEntity(id))?;
        if entity.collider.is_none() {
            return Err(CollisionError::MissingCollider(id));
        }
        self.mouse.retain(|(registered, _)| *registered != id);
        self.mouse.push((id, Box::new(callback)));
        Ok(())
    }

    /// Stop mouse hit-testing for an entity
    pub fn unregister_mouse(&mut self, id: EntityId) -> bool {
        self.mouse_hits.remove(&id);
        let before = self.mouse.len();
        self.mouse.retain(|(registered, _)| *registered != id);
        self.mouse.len() != before
    }

    /// Remove an entity from every table
    pub fn unregister(&mut self, id: EntityId) {
        for members in self.groups.values_mut() {
            members.retain(|member| *member != id);
        }
        self.unlink(id);
        self.unregister_mouse(id);
    }

    /// Whether the mouse was over the entity at the last update
    #[must_use]
    pub fn mouse_hit(&self, id: EntityId) -> bool {
        self.mouse_hits.get(&id).copied().unwrap_or(false)
    }

    /// Test an entity, at its position with its current velocity, against
    /// every other active member of a group and OR the sides together.
    ///
    /// Members in copy mode are tested only at the copies that passed
    /// culling this frame.
    pub fn check_collision_with_group(
        &self,
        store: &EntityStore,
        id: EntityId,
        group: &str,
    ) -> Result<CollisionResults, CollisionError> {
        let members = self.group_members(group)?;
        let entity = store.get(id).ok_or(CollisionError::DanglingEntity(id))?;
        let collider = entity.collider.ok_or(CollisionError::MissingCollider(id))?;

        let mut results = CollisionResults::NONE;
        for member in members {
            if *member == id {
                continue;
            }
            let other = store.get(*member).ok_or(CollisionError::DanglingEntity(*member))?;
            if !other.is_active() {
                continue;
            }
            results.merge(test_against(
                &collider,
                entity.position,
                entity.velocity,
                other,
            ));
        }
        Ok(results)
    }

    /// Whether the mouse collider overlaps an entity
    #[must_use]
    pub fn mouse_over(&self, entity: &Entity, input: &InputState, view: &ScreenSpace) -> bool {
        let view = if entity.is_static { ScreenSpace::centered(view.size) } else { *view };
        let point = view.mouse_to_world(input.mouse_position());
        test_against(
            &self.mouse_collider,
            Vec3::new(point.x, point.y, 0.0),
            Vec3::zeros(),
            entity,
        )
        .any()
    }

    /// Per-frame evaluation: links first, then mouse registrations
    ///
    /// All link results are computed before any link callback runs, so the
    /// outcome does not depend on registration order. Every mouse callback
    /// fires each frame; an inactive entity always reports `false`.
    pub fn update(
        &mut self,
        store: &mut EntityStore,
        input: &InputState,
        view: &ScreenSpace,
    ) -> Result<(), CollisionError> {
        let mut pending = Vec::with_capacity(self.links.len());
        for (index, (id, link)) in self.links.iter().enumerate() {
            let entity = store.get(*id).ok_or(CollisionError::DanglingEntity(*id))?;
            if !entity.is_active() {
                continue;
            }
            pending.push((index, self.check_collision_with_group(store, *id, &link.group)?));
        }
        for (index, results) in pending {
            let (id, link) = &mut self.links[index];
            let entity = store.get_mut(*id).ok_or(CollisionError::DanglingEntity(*id))?;
            (link.callback)(entity, results);
        }

        for index in 0..self.mouse.len() {
            let id = self.mouse[index].0;
            let entity = store.get(id).ok_or(CollisionError::DanglingEntity(id))?;
            let hit = entity.is_active() && self.mouse_over(entity, input, view);
            self.mouse_hits.insert(id, hit);
            let entity = store.get_mut(id).ok_or(CollisionError::DanglingEntity(id))?;
            (self.mouse[index].1)(entity, hit);
        }
        Ok(())
    }
}

fn test_against(collider: &Collider, position: Vec3, velocity: Vec3, other: &Entity) -> CollisionResults {
    let mut results = CollisionResults::NONE;
    let Some(other_collider) = other.collider else {
        return results;
    };
    let mut test = |at: Vec3| {
        if let Some(side) = collider.check_collision(
            position.x,
            position.y,
            velocity.x,
            velocity.y,
            at.x,
            at.y,
            &other_collider,
        ) {
            results.set(side);
        }
    };
    if other.copying_enabled() {
        for copy in other.current_copies() {
            test(copy.position);
        }
    } else {
        test(other.position);
    }
    results
}
