//! Scene initialization
//!
//! One traversal over a freshly loaded scene graph: classifies meshes by
//! name, rewrites materials to the office policy, and caches handles to
//! the meshes the room controls mutate later. Runs at most once per scene
//! instance.

use thiserror::Error;

use super::graph::{GraphError, MeshId, NodeKind, SceneGraph};
use super::material::{Color, FlatMaterial, Material, MaterialKind};

/// Tint of untouched privacy glass.
pub const GLASS_TINT: u32 = 0xc8dce8;
/// Opacity of untouched privacy glass.
pub const GLASS_OPACITY: f32 = 0.3;
/// Translucent geometry draws after opaque geometry.
pub const GLASS_RENDER_ORDER: i32 = 1;
/// Backfill metalness when the author left it unset.
pub const DEFAULT_METALNESS: f32 = 0.1;
/// Backfill roughness when the author left it unset.
pub const DEFAULT_ROUGHNESS: f32 = 0.8;
/// Warm emissive tint for light fixtures.
pub const LIGHT_EMISSIVE: u32 = 0xfff8e1;
pub const LIGHT_EMISSIVE_INTENSITY: f32 = 0.8;

/// Initialization failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    #[error("scene graph traversal failed: {0}")]
    Traversal(#[from] GraphError),
    #[error("scene instance was already initialized")]
    AlreadyInitialized,
}

/// A cached mesh handle plus the material variant it ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedRef {
    pub mesh: MeshId,
    pub kind: MaterialKind,
}

/// Handles to the meshes the room controls act on, built once per scene.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedMeshes {
    door_glass: Option<ClassifiedRef>,
    screens: Vec<ClassifiedRef>,
    curtain: Option<ClassifiedRef>,
    curtain_rest_y: Option<f32>,
}

impl ClassifiedMeshes {
    /// The door's privacy-glass pane, when the model has one.
    pub fn door_glass(&self) -> Option<ClassifiedRef> {
        self.door_glass
    }

    /// All meeting screens.
    pub fn screens(&self) -> &[ClassifiedRef] {
        &self.screens
    }

    /// The motorized curtain mesh, when the model has one.
    pub fn curtain(&self) -> Option<ClassifiedRef> {
        self.curtain
    }

    /// The curtain's Y position before any raising was applied.
    pub fn curtain_rest_y(&self) -> Option<f32> {
        self.curtain_rest_y
    }
}

/// Traverse, classify, and rewrite materials on a loaded scene.
///
/// `shadows_enabled` comes from the device tier; when false no mesh casts
/// or receives shadows regardless of classification.
pub fn initialize(
    graph: &mut SceneGraph,
    shadows_enabled: bool,
) -> Result<ClassifiedMeshes, InitError> {
    if graph.is_initialized() {
        return Err(InitError::AlreadyInitialized);
    }

    let mut refs = ClassifiedMeshes::default();

    let visited = graph.visit_meshes_mut(|id, node| {
        let name = node.name.to_lowercase();
        let is_glass = name.contains("glass");

        // Capture the curtain's rest height before anything moves it
        if name.contains("curtain") && refs.curtain_rest_y.is_none() {
            refs.curtain_rest_y = Some(node.position.y);
        }

        let NodeKind::Mesh(data) = &mut node.kind else {
            return;
        };

        if is_glass {
            data.material = Material::Flat(FlatMaterial::glass(
                Color::from_hex(GLASS_TINT),
                GLASS_OPACITY,
            ));
            data.render_order = GLASS_RENDER_ORDER;
            data.cast_shadow = false;
            data.receive_shadow = false;
        } else {
            match &mut data.material {
                Material::Lit(lit) => {
                    lit.transparent = false;
                    lit.opacity = 1.0;
                    // Only backfill what the author left unset
                    lit.metalness.get_or_insert(DEFAULT_METALNESS);
                    lit.roughness.get_or_insert(DEFAULT_ROUGHNESS);
                    if name.contains("light") {
                        lit.emissive = Color::from_hex(LIGHT_EMISSIVE);
                        lit.emissive_intensity = LIGHT_EMISSIVE_INTENSITY;
                    }
                }
                Material::Flat(flat) => {
                    flat.transparent = false;
                    flat.opacity = 1.0;
                }
            }
            data.cast_shadow = shadows_enabled;
            data.receive_shadow = shadows_enabled;
        }

        let kind = if is_glass {
            MaterialKind::Glass
        } else {
            data.material.variant_kind()
        };
        let entry = ClassifiedRef { mesh: id, kind };

        if name.contains("door") && is_glass && refs.door_glass.is_none() {
            refs.door_glass = Some(entry);
        }
        if name.contains("screen") || name.contains("tv") {
            refs.screens.push(entry);
        }
        if name.contains("curtain") && refs.curtain.is_none() {
            refs.curtain = Some(entry);
        }
    })?;

    graph.mark_initialized();
    log::info!(
        "Scene initialized: {} meshes ({} screens, door glass: {}, curtain: {})",
        visited,
        refs.screens.len(),
        refs.door_glass.is_some(),
        refs.curtain.is_some()
    );
    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::graph::SceneNode;
    use crate::scene::material::LitMaterial;
    use glam::Vec3;

    fn fixture_graph() -> SceneGraph {
        let mut graph = SceneGraph::new();
        let names_and_y = [
            ("Door_Glass_01", 1.0),
            ("TV_Screen", 1.7),
            ("Curtain_Main", 1.25),
            ("Wall_01", 1.5),
        ];
        for (name, y) in names_and_y {
            let id = graph.insert(SceneNode::mesh(
                name,
                Vec3::new(0.0, y, 0.0),
                Material::Lit(LitMaterial::default()),
            ));
            graph.add_root(id);
        }
        graph
    }

    #[test]
    fn test_classification_fixture() {
        let mut graph = fixture_graph();
        let refs = initialize(&mut graph, true).unwrap();

        assert_eq!(refs.door_glass().unwrap().mesh, MeshId(0));
        assert_eq!(refs.door_glass().unwrap().kind, MaterialKind::Glass);
        assert_eq!(refs.screens().len(), 1);
        assert_eq!(refs.screens()[0].mesh, MeshId(1));
        assert_eq!(refs.curtain().unwrap().mesh, MeshId(2));
        assert_eq!(refs.curtain_rest_y(), Some(1.25));
    }

    #[test]
    fn test_glass_material_replaced() {
        let mut graph = fixture_graph();
        initialize(&mut graph, true).unwrap();

        let node = graph.mesh(MeshId(0)).unwrap();
        let NodeKind::Mesh(data) = &node.kind else {
            panic!("expected mesh");
        };
        assert!(!data.cast_shadow);
        assert!(!data.receive_shadow);
        assert_eq!(data.render_order, GLASS_RENDER_ORDER);
        match &data.material {
            Material::Flat(flat) => {
                assert!(flat.transparent);
                assert!(!flat.depth_write);
                assert_eq!(flat.opacity, GLASS_OPACITY);
            }
            Material::Lit(_) => panic!("glass must be flat"),
        }
    }

    #[test]
    fn test_opaque_path_backfills_unset_only() {
        let mut graph = SceneGraph::new();
        let authored = graph.insert(SceneNode::mesh(
            "Desk",
            Vec3::ZERO,
            Material::Lit(LitMaterial {
                metalness: Some(0.6),
                roughness: None,
                ..LitMaterial::default()
            }),
        ));
        graph.add_root(authored);
        initialize(&mut graph, true).unwrap();

        match graph.material(MeshId(authored)).unwrap() {
            Material::Lit(lit) => {
                assert_eq!(lit.metalness, Some(0.6));
                assert_eq!(lit.roughness, Some(DEFAULT_ROUGHNESS));
                assert_eq!(lit.opacity, 1.0);
                assert!(!lit.transparent);
            }
            Material::Flat(_) => panic!("expected lit"),
        }
    }

    #[test]
    fn test_light_fixture_gets_emissive() {
        let mut graph = SceneGraph::new();
        let id = graph.insert(SceneNode::mesh(
            "Ceiling_Light_01",
            Vec3::ZERO,
            Material::Lit(LitMaterial::default()),
        ));
        graph.add_root(id);
        initialize(&mut graph, true).unwrap();

        match graph.material(MeshId(id)).unwrap() {
            Material::Lit(lit) => {
                assert_eq!(lit.emissive, Color::from_hex(LIGHT_EMISSIVE));
                assert_eq!(lit.emissive_intensity, LIGHT_EMISSIVE_INTENSITY);
            }
            Material::Flat(_) => panic!("expected lit"),
        }
    }

    #[test]
    fn test_tier_can_disable_shadows() {
        let mut graph = fixture_graph();
        initialize(&mut graph, false).unwrap();

        let node = graph.mesh(MeshId(3)).unwrap();
        let NodeKind::Mesh(data) = &node.kind else {
            panic!("expected mesh");
        };
        assert!(!data.cast_shadow);
        assert!(!data.receive_shadow);
    }

    #[test]
    fn test_initialize_is_guarded() {
        let mut graph = fixture_graph();
        initialize(&mut graph, true).unwrap();
        assert_eq!(
            initialize(&mut graph, true).unwrap_err(),
            InitError::AlreadyInitialized
        );
    }

    #[test]
    fn test_traversal_failure_propagates() {
        let mut graph = SceneGraph::new();
        let broken = graph.insert(SceneNode::group("G", Vec3::ZERO, vec![7]));
        graph.add_root(broken);
        assert!(matches!(
            initialize(&mut graph, true).unwrap_err(),
            InitError::Traversal(_)
        ));
    }

    #[test]
    fn test_first_curtain_wins() {
        let mut graph = SceneGraph::new();
        for (name, y) in [("Curtain_A", 0.5), ("Curtain_B", 2.0)] {
            let id = graph.insert(SceneNode::mesh(
                name,
                Vec3::new(0.0, y, 0.0),
                Material::Lit(LitMaterial::default()),
            ));
            graph.add_root(id);
        }
        let refs = initialize(&mut graph, true).unwrap();
        assert_eq!(refs.curtain().unwrap().mesh, MeshId(0));
        assert_eq!(refs.curtain_rest_y(), Some(0.5));
    }
}
