//! Per-entity draw submission
//!
//! [`RenderPass`] carries the matrices and culling inputs shared by every
//! entity in a frame and submits one entity at a time to a
//! [`RenderBackend`]. It is also where copy culling feeds the entity's
//! current-copies list.

use crate::core::config::Dimension;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::backend::{BackendResult, RenderBackend, UNIFORM_MODEL, UNIFORM_PROJECTION, UNIFORM_VIEW};
use crate::render::{within_render_distance, RenderError};
use crate::scene::Entity;

/// Counters for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Entities submitted
    pub entities: u32,
    /// Draw calls issued
    pub draw_calls: u32,
    /// Copies drawn
    pub copies_drawn: u32,
    /// Copies rejected by render distance
    pub copies_culled: u32,
    /// Text elements drawn
    pub texts: u32,
}

/// Shared state for submitting entities in one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderPass<'a> {
    /// Camera view
    pub view: &'a Mat4,
    /// View for screen-anchored entities
    pub static_view: &'a Mat4,
    /// Camera projection
    pub projection: &'a Mat4,
    /// Camera position used for copy culling
    pub camera_position: Vec3,
    /// Global render distance
    pub render_distance: f32,
    /// Rendering dimension
    pub dimension: Dimension,
    /// Seconds since the renderer started, for animated materials
    pub elapsed: f32,
}

impl RenderPass<'_> {
    /// Clear the entity's current copies, then draw it in single or copy
    /// mode
    ///
    /// # Errors
    /// [`RenderError::MissingGeometry`] when the entity has no geometry, or
    /// any backend failure.
    pub fn submit<B: RenderBackend + ?Sized>(
        &self,
        backend: &mut B,
        entity: &mut Entity,
        stats: &mut FrameStats,
    ) -> Result<(), RenderError> {
        entity.clear_current_copies();
        let geometry = entity.geometry().ok_or(RenderError::MissingGeometry(entity.id()))?;

        backend.bind_geometry(geometry)?;
        backend.bind_material(entity.material, entity.tint, self.elapsed)?;
        if !entity.textures().is_empty() {
            backend.bind_textures(entity.textures())?;
        }
        let view = if entity.is_static { self.static_view } else { self.view };
        backend.set_uniform_mat4(UNIFORM_VIEW, view)?;
        backend.set_uniform_mat4(UNIFORM_PROJECTION, self.projection)?;
        stats.entities += 1;

        if entity.copying_enabled() {
            self.submit_copies(backend, entity, geometry.vertex_count, stats)
        } else {
            backend.set_uniform_mat4(UNIFORM_MODEL, &entity.model_matrix())?;
            backend.draw(geometry.vertex_count)?;
            stats.draw_calls += 1;
            Ok(())
        }
    }

    fn submit_copies<B: RenderBackend + ?Sized>(
        &self,
        backend: &mut B,
        entity: &mut Entity,
        vertex_count: u32,
        stats: &mut FrameStats,
    ) -> BackendResult<()> {
        let distance = entity.effective_render_distance(self.render_distance);
        let mut rebound = false;

        for index in 0..entity.copies().len() {
            let copy = entity.copies()[index].clone();
            if !within_render_distance(&copy.position, &self.camera_position, distance, self.dimension) {
                stats.copies_culled += 1;
                continue;
            }
            entity.mark_copy_visible(index);

            // Copies with their own look rebind; the next plain copy restores
            // the entity's material.
            if copy.material_override.is_some() || (copy.darkness - 1.0).abs() > f32::EPSILON {
                let material = copy.material_override.unwrap_or(entity.material);
                backend.bind_material(material, entity.tint * copy.darkness, self.elapsed)?;
                rebound = true;
            } else if rebound {
                backend.bind_material(entity.material, entity.tint, self.elapsed)?;
                rebound = false;
            }

            backend.set_uniform_mat4(UNIFORM_MODEL, &entity.model_matrix_at(copy.position))?;
            backend.draw(vertex_count)?;
            stats.draw_calls += 1;
            stats.copies_drawn += 1;
        }
        Ok(())
    }
}
