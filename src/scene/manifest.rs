//! Scene manifest loading
//!
//! The office model ships as a JSON manifest of named nodes with transforms
//! and material parameters. The loader worker parses it and builds the
//! in-memory [`SceneGraph`] the initializer runs over.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::graph::{SceneGraph, SceneNode};
use super::material::{Color, FlatMaterial, LitMaterial, Material};

/// Structural problems in a parsed manifest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("node {0:?} has both a mesh and children")]
    MeshWithChildren(String),
    #[error("manifest contains no nodes")]
    Empty,
}

/// Material parameters of a manifest mesh. Absent fields stay unset so the
/// initializer can tell author-provided values from defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestMaterial {
    pub base_color: Option<Color>,
    pub opacity: Option<f32>,
    pub metalness: Option<f32>,
    pub roughness: Option<f32>,
    pub unlit: bool,
}

impl ManifestMaterial {
    fn to_material(&self) -> Material {
        let opacity = self.opacity.unwrap_or(1.0);
        if self.unlit {
            Material::Flat(FlatMaterial {
                color: self.base_color.unwrap_or(Color::WHITE),
                opacity,
                transparent: opacity < 1.0,
                ..FlatMaterial::default()
            })
        } else {
            Material::Lit(LitMaterial {
                base_color: self.base_color.unwrap_or(Color::WHITE),
                opacity,
                transparent: opacity < 1.0,
                metalness: self.metalness,
                roughness: self.roughness,
                ..LitMaterial::default()
            })
        }
    }
}

/// One manifest node: a mesh leaf or a group with children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestNode {
    pub name: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ManifestNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<ManifestMaterial>,
}

impl ManifestNode {
    /// Create a group node.
    pub fn group(name: impl Into<String>, children: Vec<ManifestNode>) -> Self {
        Self {
            name: name.into(),
            position: [0.0; 3],
            children,
            mesh: None,
        }
    }

    /// Create a mesh leaf.
    pub fn mesh(name: impl Into<String>, position: [f32; 3], material: ManifestMaterial) -> Self {
        Self {
            name: name.into(),
            position,
            children: Vec::new(),
            mesh: Some(material),
        }
    }
}

/// A complete scene asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneManifest {
    pub name: String,
    pub nodes: Vec<ManifestNode>,
}

impl SceneManifest {
    /// Build the runtime scene graph. Meshes must be leaves.
    pub fn build(&self) -> Result<SceneGraph, ManifestError> {
        if self.nodes.is_empty() {
            return Err(ManifestError::Empty);
        }
        let mut graph = SceneGraph::new();
        for node in &self.nodes {
            let index = Self::build_node(&mut graph, node)?;
            graph.add_root(index);
        }
        Ok(graph)
    }

    fn build_node(graph: &mut SceneGraph, node: &ManifestNode) -> Result<usize, ManifestError> {
        let position = glam::Vec3::from_array(node.position);
        match &node.mesh {
            Some(material) => {
                if !node.children.is_empty() {
                    return Err(ManifestError::MeshWithChildren(node.name.clone()));
                }
                Ok(graph.insert(SceneNode::mesh(
                    node.name.clone(),
                    position,
                    material.to_material(),
                )))
            }
            None => {
                let children = node
                    .children
                    .iter()
                    .map(|child| Self::build_node(graph, child))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(graph.insert(SceneNode::group(node.name.clone(), position, children)))
            }
        }
    }

    /// Load a manifest from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let manifest: Self = serde_json::from_str(&json)?;
        log::info!("Loaded scene manifest from {:?}", path);
        Ok(manifest)
    }

    /// Save a manifest to a JSON file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Saved scene manifest to {:?}", path);
        Ok(())
    }

    /// The bundled office used when no asset file is configured.
    pub fn demo_office() -> Self {
        let lit = |metalness: Option<f32>, roughness: Option<f32>| ManifestMaterial {
            metalness,
            roughness,
            ..ManifestMaterial::default()
        };

        let structure = ManifestNode::group(
            "Structure",
            vec![
                ManifestNode::mesh("Floor_Main", [4.5, 0.0, -12.0], lit(Some(0.0), Some(0.9))),
                ManifestNode::mesh("Wall_North", [4.5, 1.5, -18.0], lit(None, None)),
                ManifestNode::mesh("Wall_South", [4.5, 1.5, -6.0], lit(None, None)),
                ManifestNode::mesh("Wall_East", [9.0, 1.5, -12.0], lit(None, None)),
                ManifestNode::mesh("Wall_West", [0.0, 1.5, -12.0], lit(None, None)),
                ManifestNode::mesh("Ceiling_Main", [4.5, 3.0, -12.0], lit(None, None)),
            ],
        );

        let fixtures = ManifestNode::group(
            "Fixtures",
            vec![
                ManifestNode::mesh("Door_Frame", [1.2, 1.0, -6.0], lit(Some(0.6), Some(0.4))),
                ManifestNode::mesh("Door_Glass_01", [1.2, 1.0, -6.02], lit(None, None)),
                ManifestNode::mesh("Window_Glass_West", [0.02, 1.6, -10.5], lit(None, None)),
                ManifestNode::mesh("Curtain_Main", [0.25, 0.4, -10.5], lit(None, Some(1.0))),
                ManifestNode::mesh("Ceiling_Light_01", [3.0, 2.95, -10.0], lit(None, None)),
                ManifestNode::mesh("Ceiling_Light_02", [6.0, 2.95, -14.0], lit(None, None)),
            ],
        );

        let furniture = ManifestNode::group(
            "Furniture",
            vec![
                ManifestNode::mesh("Desk_Main", [5.0, 0.75, -13.0], lit(Some(0.2), Some(0.6))),
                ManifestNode::mesh("Chair_01", [5.0, 0.5, -12.2], lit(None, None)),
                ManifestNode::mesh("TV_Screen_Main", [4.5, 1.7, -17.9], lit(Some(0.3), Some(0.2))),
                ManifestNode::mesh(
                    "Monitor_Screen_Desk",
                    [5.0, 1.1, -13.3],
                    ManifestMaterial {
                        unlit: true,
                        base_color: Some(Color::from_hex(0x333333)),
                        opacity: Some(0.3),
                        ..ManifestMaterial::default()
                    },
                ),
            ],
        );

        Self {
            name: "Smart Office".to_string(),
            nodes: vec![structure, fixtures, furniture],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_office_builds() {
        let manifest = SceneManifest::demo_office();
        let graph = manifest.build().unwrap();
        assert!(graph.mesh_count() >= 10);
        assert_eq!(graph.node_count(), graph.mesh_count() + 3);
    }

    #[test]
    fn test_round_trip_through_json() {
        let manifest = SceneManifest::demo_office();
        let json = serde_json::to_string(&manifest).unwrap();
        let parsed: SceneManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, manifest.name);
        assert_eq!(parsed.build().unwrap().mesh_count(), manifest.build().unwrap().mesh_count());
    }

    #[test]
    fn test_mesh_with_children_is_invalid() {
        let manifest = SceneManifest {
            name: "bad".to_string(),
            nodes: vec![ManifestNode {
                name: "Mesh_With_Kids".to_string(),
                position: [0.0; 3],
                children: vec![ManifestNode::mesh(
                    "Child",
                    [0.0; 3],
                    ManifestMaterial::default(),
                )],
                mesh: Some(ManifestMaterial::default()),
            }],
        };
        assert_eq!(
            manifest.build().unwrap_err(),
            ManifestError::MeshWithChildren("Mesh_With_Kids".to_string())
        );
    }

    #[test]
    fn test_empty_manifest_is_invalid() {
        let manifest = SceneManifest {
            name: "empty".to_string(),
            nodes: Vec::new(),
        };
        assert_eq!(manifest.build().unwrap_err(), ManifestError::Empty);
    }

    #[test]
    fn test_unlit_material_becomes_flat() {
        let material = ManifestMaterial {
            unlit: true,
            opacity: Some(0.3),
            ..ManifestMaterial::default()
        };
        assert!(matches!(material.to_material(), Material::Flat(f) if f.transparent));
    }
}
