//! Display-list collaborator
//!
//! The game core does not render; it maintains a list of nodes with mutable
//! transforms and cosmetic materials, and a host (DOM/WebGL/terminal) draws
//! them however it likes. Nodes are stored in a generational arena so a
//! stale handle held by a finished tween can never touch a recycled slot.

use generational_arena::Arena;
use glam::Vec3;

use crate::hex_rgb;
use crate::ui::label::LabelImage;

/// Handle to a scene node
pub type NodeId = generational_arena::Index;

/// What a node looks like; never consulted by physics
#[derive(Debug, Clone)]
pub enum Primitive {
    Box { half: Vec3 },
    Sphere { radius: f32 },
    /// Cone pointing along +y (ship hull, exhaust plume)
    Cone { radius: f32, height: f32 },
    /// Extruded 2D outline (buttons, paddle, bricks)
    Extruded { width: f32, height: f32, depth: f32 },
    /// Rasterized text plane
    Label { image: LabelImage, width: f32, height: f32 },
    /// Point light flash
    Light { intensity: f32 },
}

/// Cosmetic surface properties
#[derive(Debug, Clone, Copy)]
pub struct Material {
    /// rgb in [0, 1] (tweenable)
    pub color: Vec3,
    pub emissive: f32,
    pub opacity: f32,
    pub roughness: f32,
    pub metalness: f32,
}

impl Material {
    pub fn neon(hex: u32) -> Self {
        Self {
            color: hex_rgb(hex),
            emissive: 0.5,
            opacity: 1.0,
            roughness: 0.1,
            metalness: 0.8,
        }
    }

    /// Translucent glass-panel look
    pub fn glass(hex: u32, opacity: f32) -> Self {
        Self {
            color: hex_rgb(hex),
            emissive: 0.0,
            opacity,
            roughness: 0.05,
            metalness: 0.1,
        }
    }
}

/// One entry in the display list
#[derive(Debug, Clone)]
pub struct Node {
    pub primitive: Primitive,
    pub material: Material,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    /// Hidden nodes stay in the list but are skipped by hosts
    pub visible: bool,
}

impl Node {
    pub fn new(primitive: Primitive, material: Material) -> Self {
        Self {
            primitive,
            material,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            visible: true,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// The display list itself
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Arena<Node>,
}

impl Scene {
    pub fn new() -> Self {
        Self { nodes: Arena::new() }
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    pub fn remove(&mut self, id: NodeId) {
        self.nodes.remove(id);
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut Node)> {
        self.nodes.iter_mut()
    }
}
