//! Named lookup of backend resource handles
//!
//! Asset loading outside the core produces handles; applications register
//! them here under names and resolve them while building scenes. A lookup
//! of an unregistered name is an error, never a default handle.

use std::collections::HashMap;
use std::fmt;

use crate::render::{GeometryHandle, MaterialHandle, RenderError, TextureHandle};

/// Kind of named resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Geometry buffer
    Geometry,
    /// Material
    Material,
    /// Texture
    Texture,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry => write!(f, "geometry"),
            Self::Material => write!(f, "material"),
            Self::Texture => write!(f, "texture"),
        }
    }
}

/// Name to handle registry
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    geometry: HashMap<String, GeometryHandle>,
    materials: HashMap<String, MaterialHandle>,
    textures: HashMap<String, TextureHandle>,
}

impl ResourceRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register geometry under a name, replacing any previous entry
    pub fn register_geometry(&mut self, name: impl Into<String>, handle: GeometryHandle) {
        let name = name.into();
        log::debug!("Registered geometry '{}' ({} vertices)", name, handle.vertex_count);
        self.geometry.insert(name, handle);
    }

    /// Register a material under a name
    pub fn register_material(&mut self, name: impl Into<String>, handle: MaterialHandle) {
        let name = name.into();
        log::debug!("Registered material '{}'", name);
        self.materials.insert(name, handle);
    }

    /// Register a texture under a name
    pub fn register_texture(&mut self, name: impl Into<String>, handle: TextureHandle) {
        let name = name.into();
        log::debug!("Registered texture '{}'", name);
        self.textures.insert(name, handle);
    }

    /// Look up geometry by name
    pub fn geometry(&self, name: &str) -> Result<GeometryHandle, RenderError> {
        self.geometry.get(name).copied().ok_or_else(|| unknown(ResourceKind::Geometry, name))
    }

    /// Look up a material by name
    pub fn material(&self, name: &str) -> Result<MaterialHandle, RenderError> {
        self.materials.get(name).copied().ok_or_else(|| unknown(ResourceKind::Material, name))
    }

    /// Look up a texture by name
    pub fn texture(&self, name: &str) -> Result<TextureHandle, RenderError> {
        self.textures.get(name).copied().ok_or_else(|| unknown(ResourceKind::Texture, name))
    }
}

fn unknown(kind: ResourceKind, name: &str) -> RenderError {
    RenderError::UnknownResource { kind, name: name.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_registered() {
        let mut registry = ResourceRegistry::new();
        registry.register_geometry("quad", GeometryHandle::new(1, 6));
        registry.register_texture("brick", TextureHandle(3));
        assert_eq!(registry.geometry("quad").unwrap().vertex_count, 6);
        assert_eq!(registry.texture("brick").unwrap(), TextureHandle(3));
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let registry = ResourceRegistry::new();
        let err = registry.texture("missing").unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnknownResource { kind: ResourceKind::Texture, ref name } if name == "missing"
        ));
        assert_eq!(err.to_string(), "Unknown texture: missing");
    }
}
