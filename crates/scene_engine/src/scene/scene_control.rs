//! Scene ownership, activation and the flattened per-frame view
//!
//! [`SceneControl`] owns every scene and every entity. Exactly one scene is
//! *current*; switching is exclusive: every known scene is deactivated
//! before the new current scene tree is activated. The frame scheduler reads
//! the current tree through [`SceneControl::active_entities`] and
//! [`SceneControl::active_texts`], both recomputed on every call since
//! activation can change at any point during a frame.

use slotmap::SlotMap;

use crate::scene::{
    Entity, EntityId, EntityStore, Scene, SceneError, SceneId, TextElement, UiElement, UiKind,
};

/// Owns scenes and entities
#[derive(Debug, Default)]
pub struct SceneControl {
    entities: EntityStore,
    scenes: SlotMap<SceneId, Scene>,
    current: Option<SceneId>,
}

impl SceneControl {
    /// Create an empty scene control
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new, inactive scene
    pub fn create_scene(&mut self, name: impl Into<String>) -> Result<SceneId, SceneError> {
        let name = name.into();
        if self.scenes.values().any(|s| s.name() == name) {
            return Err(SceneError::DuplicateScene(name));
        }
        log::debug!("Created scene '{}'", name);
        Ok(self.scenes.insert(Scene::new(name)))
    }

    /// Look up a scene identifier by name
    pub fn scene_by_name(&self, name: &str) -> Result<SceneId, SceneError> {
        self.scenes
            .iter()
            .find(|(_, scene)| scene.name() == name)
            .map(|(id, _)| id)
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))
    }

    /// Borrow a scene
    pub fn scene(&self, id: SceneId) -> Result<&Scene, SceneError> {
        self.scenes.get(id).ok_or(SceneError::UnknownSceneId(id))
    }

    /// Mutably borrow a scene
    pub fn scene_mut(&mut self, id: SceneId) -> Result<&mut Scene, SceneError> {
        self.scenes.get_mut(id).ok_or(SceneError::UnknownSceneId(id))
    }

    /// Identifiers of all scenes
    pub fn scene_ids(&self) -> impl Iterator<Item = SceneId> + '_ {
        self.scenes.keys()
    }

    /// The current scene, if one has been set
    #[must_use]
    pub const fn current_scene(&self) -> Option<SceneId> {
        self.current
    }

    /// Entity storage
    #[must_use]
    pub const fn entities(&self) -> &EntityStore {
        &self.entities
    }

    /// Mutable entity storage
    pub fn entities_mut(&mut self) -> &mut EntityStore {
        &mut self.entities
    }

    /// Borrow an entity
    pub fn entity(&self, id: EntityId) -> Result<&Entity, SceneError> {
        self.entities.get(id).ok_or(SceneError::UnknownEntity(id))
    }

    /// Mutably borrow an entity
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, SceneError> {
        self.entities.get_mut(id).ok_or(SceneError::UnknownEntity(id))
    }

    /// Nest `child` inside `parent`
    ///
    /// A scene can have at most one parent and nesting may not form a cycle.
    /// The child keeps its own activation flag until the parent is next
    /// activated or deactivated.
    pub fn add_subscene(&mut self, parent: SceneId, child: SceneId) -> Result<(), SceneError> {
        self.scene(parent)?;
        self.scene(child)?;
        if parent == child || self.reaches(child, parent) {
            return Err(SceneError::CyclicSubscene { parent, child });
        }
        if self.scenes.values().any(|s| s.subscenes.contains(&child)) {
            return Err(SceneError::AlreadyNested(child));
        }
        self.scene_mut(parent)?.subscenes.push(child);
        Ok(())
    }

    fn reaches(&self, from: SceneId, target: SceneId) -> bool {
        self.scenes.get(from).is_some_and(|scene| {
            scene
                .subscenes
                .iter()
                .any(|sub| *sub == target || self.reaches(*sub, target))
        })
    }

    /// Store an entity without attaching it to any scene's entity list
    ///
    /// Used for entities owned by UI elements. The entity stays inactive
    /// until the element is added to a scene.
    pub fn create_entity(&mut self, entity: Entity) -> EntityId {
        self.entities.insert(entity)
    }

    /// Instance an entity into a scene
    ///
    /// The entity takes the scene's activation flag at the time of the call.
    pub fn instance_entity(&mut self, scene: SceneId, mut entity: Entity) -> Result<EntityId, SceneError> {
        let active = self.scene(scene)?.active;
        entity.set_active(active);
        let id = self.entities.insert(entity);
        self.scene_mut(scene)?.entities.push(id);
        log::trace!("Instanced entity {:?} into scene {:?} (active: {})", id, scene, active);
        Ok(id)
    }

    /// Remove an entity from its scene (or UI element) and from storage
    ///
    /// Collision registrations are not touched here; the engine-level
    /// removal unregisters them as well.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity, SceneError> {
        let entity = self.entities.remove(id).ok_or(SceneError::UnknownEntity(id))?;
        for scene in self.scenes.values_mut() {
            scene.entities.retain(|e| *e != id);
            for element in &mut scene.ui {
                element.entities.retain(|e| *e != id);
            }
        }
        Ok(entity)
    }

    /// Add a UI element to a scene, returning its index
    pub fn add_ui(&mut self, scene: SceneId, element: UiElement) -> Result<usize, SceneError> {
        let active = self.scene(scene)?.active;
        for id in &element.entities {
            self.entity_mut(*id)?.set_active(active);
        }
        let ui = &mut self.scene_mut(scene)?.ui;
        ui.push(element);
        Ok(ui.len() - 1)
    }

    /// Add a text element to a scene, returning its index
    pub fn add_text(&mut self, scene: SceneId, text: TextElement) -> Result<usize, SceneError> {
        let texts = &mut self.scene_mut(scene)?.texts;
        texts.push(text);
        Ok(texts.len() - 1)
    }

    /// Activate a scene tree: the scene, its entities, its UI entities and
    /// every nested subscene
    pub fn activate(&mut self, scene: SceneId) -> Result<(), SceneError> {
        self.set_tree_active(scene, true)
    }

    /// Deactivate a scene tree; contents are kept
    pub fn deactivate(&mut self, scene: SceneId) -> Result<(), SceneError> {
        self.set_tree_active(scene, false)
    }

    fn set_tree_active(&mut self, id: SceneId, active: bool) -> Result<(), SceneError> {
        let scene = self.scenes.get_mut(id).ok_or(SceneError::UnknownSceneId(id))?;
        scene.active = active;
        let members: Vec<EntityId> = scene
            .entities
            .iter()
            .chain(scene.ui.iter().flat_map(|element| element.entities.iter()))
            .copied()
            .collect();
        let subscenes = scene.subscenes.clone();

        for entity in members {
            if let Some(entity) = self.entities.get_mut(entity) {
                entity.set_active(active);
            }
        }
        for subscene in subscenes {
            self.set_tree_active(subscene, active)?;
        }
        Ok(())
    }

    /// Make `scene` the only active scene tree
    pub fn set_current_scene(&mut self, scene: SceneId) -> Result<(), SceneError> {
        self.scene(scene)?;
        let all: Vec<SceneId> = self.scenes.keys().collect();
        for id in all {
            self.set_tree_active(id, false)?;
        }
        self.set_tree_active(scene, true)?;
        self.current = Some(scene);
        log::info!("Current scene: '{}'", self.scene(scene)?.name());
        Ok(())
    }

    /// Flattened view of a scene: its own entities, its UI entities and
    /// those of active subscenes, recursively. Empty when the scene is
    /// inactive.
    pub fn children(&self, scene: SceneId) -> Result<Vec<EntityId>, SceneError> {
        let mut out = Vec::new();
        self.collect_children(scene, false, &mut out)?;
        Ok(out)
    }

    fn collect_children(&self, id: SceneId, rendered_only: bool, out: &mut Vec<EntityId>) -> Result<(), SceneError> {
        let scene = self.scene(id)?;
        if !scene.active {
            return Ok(());
        }
        if !rendered_only || scene.automatic_rendering {
            out.extend_from_slice(&scene.entities);
            for element in &scene.ui {
                out.extend_from_slice(&element.entities);
            }
        }
        for subscene in &scene.subscenes {
            self.collect_children(*subscene, rendered_only, out)?;
        }
        Ok(())
    }

    /// Active entities of the current scene tree, in traversal order
    #[must_use]
    pub fn active_entities(&self) -> Vec<EntityId> {
        let Some(current) = self.current else {
            return Vec::new();
        };
        self.children(current)
            .unwrap_or_default()
            .into_iter()
            .filter(|id| self.entities.get(*id).is_some_and(Entity::is_active))
            .collect()
    }

    /// Active entities the frame scheduler draws: those of the current scene
    /// tree whose owning scene has automatic rendering enabled
    #[must_use]
    pub fn rendered_entities(&self) -> Vec<EntityId> {
        let Some(current) = self.current else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if self.collect_children(current, true, &mut out).is_err() {
            return Vec::new();
        }
        out.retain(|id| self.entities.get(*id).is_some_and(Entity::is_active));
        out
    }

    /// Text elements of the current scene tree
    #[must_use]
    pub fn active_texts(&self) -> Vec<&TextElement> {
        let mut out = Vec::new();
        if let Some(current) = self.current {
            self.collect_texts(current, &mut out);
        }
        out
    }

    fn collect_texts<'a>(&'a self, id: SceneId, out: &mut Vec<&'a TextElement>) {
        let Some(scene) = self.scenes.get(id) else {
            return;
        };
        if !scene.active {
            return;
        }
        out.extend(scene.texts.iter());
        for subscene in &scene.subscenes {
            self.collect_texts(*subscene, out);
        }
    }

    /// Drive the buttons of every active scene
    ///
    /// `is_hovered` reports whether the mouse is over an entity this frame.
    /// Returns the `(scene, element index)` of every button that clicked.
    pub fn update_ui(
        &mut self,
        mut is_hovered: impl FnMut(&Entity) -> bool,
        left_down: bool,
    ) -> Vec<(SceneId, usize)> {
        let mut clicked = Vec::new();
        let entities = &self.entities;
        for (scene_id, scene) in &mut self.scenes {
            if !scene.active {
                continue;
            }
            for (index, element) in scene.ui.iter_mut().enumerate() {
                let UiKind::Button(button) = &mut element.kind else {
                    continue;
                };
                let hovered = element
                    .entities
                    .iter()
                    .filter_map(|id| entities.get(*id))
                    .any(|entity| entity.is_active() && is_hovered(entity));
                if button.update(hovered, left_down) {
                    log::debug!("Button '{}' clicked", button.label());
                    clicked.push((scene_id, index));
                }
            }
        }
        clicked
    }

    /// Whether the button at `index` in `scene` clicked during the last UI
    /// update
    #[must_use]
    pub fn button_clicked(&self, scene: SceneId, index: usize) -> bool {
        self.scenes
            .get(scene)
            .and_then(|s| s.ui.get(index))
            .and_then(UiElement::as_button)
            .is_some_and(|b| b.just_clicked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Dimension;
    use crate::render::MaterialHandle;

    fn entity() -> Entity {
        Entity::new(Dimension::TwoD, MaterialHandle(1))
    }

    #[test]
    fn test_instanced_entity_inherits_scene_flag() {
        let mut control = SceneControl::new();
        let scene = control.create_scene("level").unwrap();
        let inactive = control.instance_entity(scene, entity()).unwrap();
        control.activate(scene).unwrap();
        let active = control.instance_entity(scene, entity()).unwrap();
        assert!(control.entity(inactive).unwrap().is_active());
        assert!(control.entity(active).unwrap().is_active());

        control.deactivate(scene).unwrap();
        let late = control.instance_entity(scene, entity()).unwrap();
        assert!(!control.entity(late).unwrap().is_active());
    }

    #[test]
    fn test_deactivate_recurses_into_subscenes() {
        let mut control = SceneControl::new();
        let root = control.create_scene("root").unwrap();
        let child = control.create_scene("child").unwrap();
        control.add_subscene(root, child).unwrap();
        let a = control.instance_entity(root, entity()).unwrap();
        let b = control.instance_entity(child, entity()).unwrap();

        control.activate(root).unwrap();
        assert_eq!(control.children(root).unwrap(), vec![a, b]);

        control.deactivate(root).unwrap();
        assert!(!control.entity(a).unwrap().is_active());
        assert!(!control.entity(b).unwrap().is_active());
        assert!(!control.scene(child).unwrap().is_active());
        assert!(control.children(root).unwrap().is_empty());
    }

    #[test]
    fn test_inactive_scene_has_no_children_even_with_active_entities() {
        let mut control = SceneControl::new();
        let scene = control.create_scene("menu").unwrap();
        let id = control.instance_entity(scene, entity()).unwrap();
        control.entity_mut(id).unwrap().set_active(true);
        assert!(control.children(scene).unwrap().is_empty());
    }

    #[test]
    fn test_set_current_scene_is_exclusive() {
        let mut control = SceneControl::new();
        let a = control.create_scene("a").unwrap();
        let b = control.create_scene("b").unwrap();
        let in_a = control.instance_entity(a, entity()).unwrap();
        let in_b = control.instance_entity(b, entity()).unwrap();

        control.set_current_scene(a).unwrap();
        assert_eq!(control.active_entities(), vec![in_a]);

        control.set_current_scene(b).unwrap();
        assert_eq!(control.active_entities(), vec![in_b]);
        assert!(!control.entity(in_a).unwrap().is_active());
        assert!(!control.scene(a).unwrap().is_active());
    }

    #[test]
    fn test_subscene_cycles_and_double_nesting_rejected() {
        let mut control = SceneControl::new();
        let a = control.create_scene("a").unwrap();
        let b = control.create_scene("b").unwrap();
        let c = control.create_scene("c").unwrap();
        control.add_subscene(a, b).unwrap();
        control.add_subscene(b, c).unwrap();

        assert!(matches!(control.add_subscene(c, a), Err(SceneError::CyclicSubscene { .. })));
        assert!(matches!(control.add_subscene(a, a), Err(SceneError::CyclicSubscene { .. })));
        assert!(matches!(control.add_subscene(a, c), Err(SceneError::AlreadyNested(_))));
    }

    #[test]
    fn test_unknown_scene_name_is_an_error() {
        let mut control = SceneControl::new();
        control.create_scene("title").unwrap();
        assert!(control.scene_by_name("title").is_ok());
        assert!(matches!(control.scene_by_name("credits"), Err(SceneError::UnknownScene(_))));
        assert!(matches!(control.create_scene("title"), Err(SceneError::DuplicateScene(_))));
    }

    #[test]
    fn test_ui_entities_are_part_of_children() {
        let mut control = SceneControl::new();
        let scene = control.create_scene("hud").unwrap();
        let own = control.instance_entity(scene, entity()).unwrap();
        let icon = control.create_entity(entity());
        control.add_ui(scene, UiElement::panel(vec![icon])).unwrap();

        control.set_current_scene(scene).unwrap();
        assert_eq!(control.active_entities(), vec![own, icon]);
    }

    #[test]
    fn test_remove_entity_detaches_it() {
        let mut control = SceneControl::new();
        let scene = control.create_scene("level").unwrap();
        let id = control.instance_entity(scene, entity()).unwrap();
        control.set_current_scene(scene).unwrap();
        control.remove_entity(id).unwrap();
        assert!(control.active_entities().is_empty());
        assert!(matches!(control.remove_entity(id), Err(SceneError::UnknownEntity(_))));
    }

    #[test]
    fn test_texts_follow_activation() {
        let mut control = SceneControl::new();
        let a = control.create_scene("a").unwrap();
        let b = control.create_scene("b").unwrap();
        control.add_text(a, TextElement::new("score", 10.0, 10.0)).unwrap();
        control.add_text(b, TextElement::new("paused", 10.0, 10.0)).unwrap();
        control.set_current_scene(a).unwrap();
        let texts: Vec<&str> = control.active_texts().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(texts, vec!["score"]);
    }

    #[test]
    fn test_button_clicks_only_in_active_scenes() {
        let mut control = SceneControl::new();
        let menu = control.create_scene("menu").unwrap();
        let other = control.create_scene("other").unwrap();
        let face = control.create_entity(entity());
        let hidden_face = control.create_entity(entity());
        let start = control.add_ui(menu, UiElement::button("Start", vec![face])).unwrap();
        control.add_ui(other, UiElement::button("Quit", vec![hidden_face])).unwrap();
        control.set_current_scene(menu).unwrap();

        let clicked = control.update_ui(|_| true, true);
        assert_eq!(clicked, vec![(menu, start)]);
        assert!(control.button_clicked(menu, start));

        let clicked = control.update_ui(|_| true, true);
        assert!(clicked.is_empty());
    }

    #[test]
    fn test_manually_rendered_scene_is_excluded_from_drawing() {
        let mut control = SceneControl::new();
        let world = control.create_scene("world").unwrap();
        let overlay = control.create_scene("overlay").unwrap();
        let ground = control.instance_entity(world, entity()).unwrap();
        let custom = control.instance_entity(overlay, entity()).unwrap();
        control.add_subscene(world, overlay).unwrap();
        control.scene_mut(overlay).unwrap().automatic_rendering = false;
        control.set_current_scene(world).unwrap();

        assert_eq!(control.active_entities(), vec![ground, custom]);
        assert_eq!(control.rendered_entities(), vec![ground]);
    }
}
