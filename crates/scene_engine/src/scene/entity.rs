//! Renderable entities and their lightweight copies
//!
//! An [`Entity`] renders in exactly one of two modes per frame:
//!
//! - **Single**: its own transform, one draw call.
//! - **Copy**: copying is enabled and each authored [`EntityCopy`] is drawn
//!   with the entity's geometry and material at its own position, optionally
//!   with a material override and a darkness scalar.
//!
//! In copy mode the render pass records which copies passed the
//! render-distance test in the entity's *current copies*. That list is
//! cleared at the start of every frame and is the only copy set the
//! collision engine tests against.

use crate::core::config::Dimension;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use crate::physics::Collider;
use crate::render::{GeometryHandle, MaterialHandle, RenderError, TextureHandle};
use crate::scene::EntityId;

/// One instance of an entity's geometry at an independent position
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCopy {
    /// Caller-chosen identifier
    pub id: u32,
    /// World position
    pub position: Vec3,
    /// Material used instead of the owning entity's, if any
    pub material_override: Option<MaterialHandle>,
    /// Darkness/tint scalar handed to the material
    pub darkness: f32,
}

impl EntityCopy {
    /// Create a copy at a position with no override and full brightness
    #[must_use]
    pub const fn new(id: u32, position: Vec3) -> Self {
        Self {
            id,
            position,
            material_override: None,
            darkness: 1.0,
        }
    }

    /// Use a different material for this copy
    #[must_use]
    pub const fn with_material(mut self, material: MaterialHandle) -> Self {
        self.material_override = Some(material);
        self
    }

    /// Set the darkness scalar
    #[must_use]
    pub const fn with_darkness(mut self, darkness: f32) -> Self {
        self.darkness = darkness;
        self
    }
}

/// A renderable game object
///
/// Positions are pixels in 2D and world units in 3D. `velocity` is the
/// displacement intended for the current frame: gravity accumulates into it
/// during the update step, collision callbacks may adjust it, and
/// [`Entity::commit_motion`] applies it once collision has run.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    /// Which culling test and camera variant this entity is drawn with
    pub dimension: Dimension,
    /// Position
    pub position: Vec3,
    /// Displacement for the current frame
    pub velocity: Vec3,
    /// Euler rotation in degrees (X, Y, Z); ignored by 2D materials
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
    /// Downward acceleration applied to `velocity.y` per second
    pub gravity: f32,
    /// Material handle
    pub material: MaterialHandle,
    /// Tint scalar handed to the material in single mode
    pub tint: f32,
    /// Optional collider
    pub collider: Option<Collider>,
    /// Per-entity render distance; `None` or non-positive uses the global one
    pub render_distance: Option<f32>,
    /// Collision group this entity belongs to, informational
    pub group: Option<String>,
    /// Drawn with the camera's static view (screen-anchored UI/HUD)
    pub is_static: bool,
    geometry: Option<GeometryHandle>,
    textures: Vec<TextureHandle>,
    active: bool,
    copying_enabled: bool,
    copies: Vec<EntityCopy>,
    current_copies: Vec<usize>,
}

impl Entity {
    /// Create an entity with a material and no geometry yet
    #[must_use]
    pub fn new(dimension: Dimension, material: MaterialHandle) -> Self {
        Self {
            id: EntityId::default(),
            dimension,
            position: Vec3::zeros(),
            velocity: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            gravity: 0.0,
            material,
            tint: 1.0,
            collider: None,
            render_distance: None,
            group: None,
            is_static: false,
            geometry: None,
            textures: Vec::new(),
            active: false,
            copying_enabled: false,
            copies: Vec::new(),
            current_copies: Vec::new(),
        }
    }

    /// Set the geometry
    #[must_use]
    pub fn with_geometry(mut self, geometry: GeometryHandle) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set the position
    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Set the scale
    #[must_use]
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vec3::new(x, y, z);
        self
    }

    /// Set the collider
    #[must_use]
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Set gravity
    #[must_use]
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Render with the static view
    #[must_use]
    pub fn with_static_view(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Set the per-entity render distance
    #[must_use]
    pub fn with_render_distance(mut self, distance: f32) -> Self {
        self.render_distance = Some(distance);
        self
    }

    /// Author copies and enable copy mode
    #[must_use]
    pub fn with_copies(mut self, copies: Vec<EntityCopy>) -> Self {
        self.copies = copies;
        self.copying_enabled = true;
        self
    }

    /// Identifier assigned when the entity was instanced into a scene
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    /// Whether the entity is active
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Set the active flag. Deactivation drops the current copies so an
    /// inactive entity is never visible to collision.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.current_copies.clear();
        }
    }

    /// Geometry handle, if uploaded
    #[must_use]
    pub const fn geometry(&self) -> Option<GeometryHandle> {
        self.geometry
    }

    /// Attach or replace the geometry
    pub fn set_geometry(&mut self, geometry: GeometryHandle) {
        self.geometry = Some(geometry);
    }

    /// Attach a texture. Geometry must already be present.
    pub fn attach_texture(&mut self, texture: TextureHandle) -> Result<(), RenderError> {
        if self.geometry.is_none() {
            return Err(RenderError::InvalidAttachmentOrder { entity: self.id });
        }
        self.textures.push(texture);
        Ok(())
    }

    /// Attached textures
    #[must_use]
    pub fn textures(&self) -> &[TextureHandle] {
        &self.textures
    }

    /// Whether copy mode is selected
    #[must_use]
    pub const fn copying_enabled(&self) -> bool {
        self.copying_enabled
    }

    /// Switch between single and copy mode
    pub fn set_copying_enabled(&mut self, enabled: bool) {
        self.copying_enabled = enabled;
        if !enabled {
            self.current_copies.clear();
        }
    }

    /// Authored copies
    #[must_use]
    pub fn copies(&self) -> &[EntityCopy] {
        &self.copies
    }

    /// Append an authored copy, returning its index
    pub fn add_copy(&mut self, copy: EntityCopy) -> usize {
        self.copies.push(copy);
        self.copies.len() - 1
    }

    /// Remove the first authored copy with the given identifier
    ///
    /// Current-copy indices are dropped since they refer to positions in
    /// the authored list; the next render pass rebuilds them.
    pub fn remove_copy(&mut self, copy_id: u32) -> Option<EntityCopy> {
        let index = self.copies.iter().position(|c| c.id == copy_id)?;
        self.current_copies.clear();
        Some(self.copies.remove(index))
    }

    /// Mutable access to an authored copy
    pub fn copy_mut(&mut self, index: usize) -> Option<&mut EntityCopy> {
        self.copies.get_mut(index)
    }

    /// Indices of the copies that passed culling this frame
    #[must_use]
    pub fn current_copy_indices(&self) -> &[usize] {
        &self.current_copies
    }

    /// Copies that passed culling this frame
    pub fn current_copies(&self) -> impl Iterator<Item = &EntityCopy> {
        self.current_copies.iter().filter_map(|i| self.copies.get(*i))
    }

    /// Forget last frame's visible copies
    pub fn clear_current_copies(&mut self) {
        self.current_copies.clear();
    }

    pub(crate) fn mark_copy_visible(&mut self, index: usize) {
        self.current_copies.push(index);
    }

    /// Render distance to use for this entity's copies
    #[must_use]
    pub fn effective_render_distance(&self, global: f32) -> f32 {
        match self.render_distance {
            Some(distance) if distance > 0.0 => distance,
            _ => global,
        }
    }

    /// Per-frame update: integrate gravity into this frame's displacement
    pub fn update(&mut self, delta_time: f32) {
        if self.gravity != 0.0 {
            self.velocity.y -= self.gravity * delta_time;
        }
    }

    /// Apply this frame's displacement to the position
    pub fn commit_motion(&mut self) {
        self.position += self.velocity;
    }

    /// Model matrix at the entity's own position
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        self.model_matrix_at(self.position)
    }

    /// Model matrix at an arbitrary position with this entity's scale and
    /// rotation: translate x scale x rotX x rotY x rotZ
    #[must_use]
    pub fn model_matrix_at(&self, position: Vec3) -> Mat4 {
        Mat4::new_translation(&position)
            * Mat4::new_nonuniform_scaling(&self.scale)
            * Mat4::rotation_x(utils::deg_to_rad(self.rotation.x))
            * Mat4::rotation_y(utils::deg_to_rad(self.rotation.y))
            * Mat4::rotation_z(utils::deg_to_rad(self.rotation.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> GeometryHandle {
        GeometryHandle::new(1, 6)
    }

    #[test]
    fn test_texture_before_geometry_is_rejected() {
        let mut entity = Entity::new(Dimension::TwoD, MaterialHandle(1));
        let err = entity.attach_texture(TextureHandle(9)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidAttachmentOrder { .. }));

        entity.set_geometry(quad());
        assert!(entity.attach_texture(TextureHandle(9)).is_ok());
        assert_eq!(entity.textures(), &[TextureHandle(9)]);
    }

    #[test]
    fn test_gravity_accumulates_then_commits() {
        let mut entity = Entity::new(Dimension::TwoD, MaterialHandle(1))
            .with_position(0.0, 100.0, 0.0)
            .with_gravity(10.0);
        entity.update(0.5);
        assert_relative_eq!(entity.velocity.y, -5.0);
        assert_relative_eq!(entity.position.y, 100.0);
        entity.commit_motion();
        assert_relative_eq!(entity.position.y, 95.0);
    }

    #[test]
    fn test_model_matrix_order() {
        let mut entity = Entity::new(Dimension::ThreeD, MaterialHandle(1))
            .with_position(10.0, 0.0, 0.0)
            .with_scale(2.0, 2.0, 2.0);
        entity.rotation = Vec3::new(0.0, 0.0, 90.0);

        // Rotate first, then scale, then translate.
        let p = entity.model_matrix().transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.coords, Vec3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_render_distance_override() {
        let entity = Entity::new(Dimension::TwoD, MaterialHandle(1));
        assert_relative_eq!(entity.effective_render_distance(1000.0), 1000.0);
        let entity = entity.with_render_distance(0.0);
        assert_relative_eq!(entity.effective_render_distance(1000.0), 1000.0);
        let entity = entity.with_render_distance(50.0);
        assert_relative_eq!(entity.effective_render_distance(1000.0), 50.0);
    }

    #[test]
    fn test_current_copies_follow_marks_and_clear() {
        let mut entity = Entity::new(Dimension::TwoD, MaterialHandle(1)).with_copies(vec![
            EntityCopy::new(0, Vec3::new(0.0, 0.0, 0.0)),
            EntityCopy::new(1, Vec3::new(50.0, 0.0, 0.0)),
        ]);
        entity.mark_copy_visible(1);
        let ids: Vec<u32> = entity.current_copies().map(|c| c.id).collect();
        assert_eq!(ids, vec![1]);

        entity.clear_current_copies();
        assert_eq!(entity.current_copies().count(), 0);
    }

    #[test]
    fn test_deactivation_drops_current_copies() {
        let mut entity = Entity::new(Dimension::TwoD, MaterialHandle(1))
            .with_copies(vec![EntityCopy::new(0, Vec3::zeros())]);
        entity.set_active(true);
        entity.mark_copy_visible(0);
        entity.set_active(false);
        assert!(entity.current_copy_indices().is_empty());
    }

    #[test]
    fn test_remove_copy_by_id() {
        let mut entity = Entity::new(Dimension::TwoD, MaterialHandle(1)).with_copies(vec![
            EntityCopy::new(4, Vec3::zeros()),
            EntityCopy::new(7, Vec3::zeros()),
        ]);
        assert_eq!(entity.remove_copy(4).map(|c| c.id), Some(4));
        assert!(entity.remove_copy(4).is_none());
        assert_eq!(entity.copies().len(), 1);
    }
}
