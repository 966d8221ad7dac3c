//! Turn a parsed [`SceneDescription`] into a renderable scene graph.
//!
//! All validation that needs geometry happens here: unknown materials,
//! degenerate primitives, singular transforms and geometry nodes with
//! children are reported as [`SceneError`]s before any ray is cast.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::camera::Camera;
use crate::material::{BumpMaterial, Material, PhongMaterial, TextureMaterial};
use crate::node::{NodeKind, SceneNode};
use crate::primitive::{Cone, Cube, Cylinder, Disc, Mesh, Polygon, Shape, Sphere};
use crate::scene::Scene;
use lumen_core::description::{
    MaterialDescription, NodeDescription, NodeKindDescription, PrimitiveDescription,
};
use lumen_core::{Color, Light, SceneDescription, SceneError, SceneResult, TextureCache};
use lumen_math::Vec3;

/// An owned scene graph plus everything needed to view it.
#[derive(Debug)]
pub struct BuiltScene {
    pub root: SceneNode,
    pub camera: Camera,
    pub ambient: Color,
    pub lights: Vec<Light>,
}

impl BuiltScene {
    /// Borrow as a render context.
    pub fn scene(&self) -> SceneResult<Scene<'_>> {
        Scene::new(&self.root, self.camera, self.ambient, self.lights.clone())
    }
}

type MaterialTable = HashMap<String, Arc<dyn Material>>;

/// Build a scene from its description.
///
/// Texture paths are resolved against `base_dir`, normally the directory the
/// scene file lives in.
pub fn build_scene(desc: &SceneDescription, base_dir: impl AsRef<Path>) -> SceneResult<BuiltScene> {
    let cam = &desc.camera;
    let camera = Camera::new(
        Vec3::from(cam.eye),
        Vec3::from(cam.view),
        Vec3::from(cam.up),
        cam.fov,
        cam.width,
        cam.height,
    )?;

    let mut textures = TextureCache::with_base_dir(base_dir.as_ref());
    let materials = build_materials(desc, &mut textures)?;

    let mut root = build_node(&desc.root, &materials)?;
    root.rebuild_caches()?;

    let lights: Vec<Light> = desc.lights.iter().map(|l| l.to_light()).collect();

    log::info!(
        "Built scene: {} nodes, {} materials, {} textures, {} lights",
        root.node_count(),
        materials.len(),
        textures.len(),
        lights.len()
    );

    Ok(BuiltScene {
        root,
        camera,
        ambient: Color::from(desc.ambient),
        lights,
    })
}

fn build_materials(desc: &SceneDescription, textures: &mut TextureCache) -> SceneResult<MaterialTable> {
    let mut table = MaterialTable::new();

    for (name, material) in &desc.materials {
        let texture_error = |source| SceneError::Texture {
            material: name.clone(),
            source,
        };

        let built: Arc<dyn Material> = match material {
            MaterialDescription::Phong {
                kd,
                ks,
                shininess,
                transparency,
                refractive_index,
            } => Arc::new(
                PhongMaterial::new(Color::from(*kd), Color::from(*ks), *shininess)
                    .with_transparency(*transparency, *refractive_index),
            ),
            MaterialDescription::Texture {
                path,
                ks,
                shininess,
                transparency,
                refractive_index,
            } => {
                let texture = textures.load(path).map_err(texture_error)?;
                Arc::new(
                    TextureMaterial::new(texture, Color::from(*ks), *shininess)
                        .with_transparency(*transparency, *refractive_index),
                )
            }
            MaterialDescription::Bump {
                kd,
                ks,
                shininess,
                path,
                strength,
            } => {
                let bump = textures.load(path).map_err(texture_error)?;
                Arc::new(BumpMaterial::new(
                    Color::from(*kd),
                    Color::from(*ks),
                    *shininess,
                    bump,
                    *strength,
                ))
            }
        };

        log::debug!("Material '{}': {:?}", name, built);
        table.insert(name.clone(), built);
    }

    Ok(table)
}

fn build_node(desc: &NodeDescription, materials: &MaterialTable) -> SceneResult<SceneNode> {
    let mut node = match desc.kind {
        NodeKindDescription::Group => SceneNode::new(&desc.name, NodeKind::Group),
        NodeKindDescription::Union => SceneNode::new(&desc.name, NodeKind::Union),
        NodeKindDescription::Intersection => SceneNode::new(&desc.name, NodeKind::Intersection),
        NodeKindDescription::Difference => SceneNode::new(&desc.name, NodeKind::Difference),
        NodeKindDescription::Geometry => {
            if !desc.children.is_empty() {
                return Err(SceneError::GeometryWithChildren(desc.name.clone()));
            }
            let primitive = desc.primitive.as_ref().ok_or_else(|| SceneError::InvalidPrimitive {
                node: desc.name.clone(),
                reason: "missing primitive".to_string(),
            })?;
            let material_name = desc.material.as_deref().unwrap_or_default();
            let material = materials
                .get(material_name)
                .cloned()
                .ok_or_else(|| SceneError::UnknownMaterial {
                    node: desc.name.clone(),
                    material: material_name.to_string(),
                })?;
            SceneNode::geometry(&desc.name, build_shape(&desc.name, primitive)?, material)
        }
    };

    let local = desc
        .local_transform()
        .ok_or_else(|| SceneError::SingularTransform(desc.name.clone()))?;
    node.set_transform(local);

    for child in &desc.children {
        node.add_child(build_node(child, materials)?)?;
    }

    Ok(node)
}

fn build_shape(node: &str, desc: &PrimitiveDescription) -> SceneResult<Shape> {
    let points = |v: &[[f32; 3]]| v.iter().copied().map(Vec3::from).collect::<Vec<_>>();

    let shape = match desc {
        PrimitiveDescription::Sphere => Ok(Shape::Sphere(Sphere)),
        PrimitiveDescription::Cube => Ok(Shape::Cube(Cube)),
        PrimitiveDescription::Cylinder => Ok(Shape::Cylinder(Cylinder::new())),
        PrimitiveDescription::Cone => Ok(Shape::Cone(Cone::new())),
        PrimitiveDescription::Polygon {
            points: corners,
            normal,
            up,
        } => Polygon::new(
            points(corners),
            normal.map(Vec3::from),
            up.map(Vec3::from),
        )
        .map(Shape::Polygon),
        PrimitiveDescription::Disc {
            center,
            normal,
            radius,
            up,
        } => Disc::new(
            Vec3::from(*center),
            Vec3::from(*normal),
            *radius,
            up.map(Vec3::from),
        )
        .map(Shape::Disc),
        PrimitiveDescription::Mesh { vertices, faces } => {
            Mesh::new(points(vertices), faces.clone()).map(Shape::Mesh)
        }
    };

    shape.map_err(|e| SceneError::InvalidPrimitive {
        node: node.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::parse_description;

    fn scene_with_root(root: &str) -> SceneDescription {
        let json = format!(
            r#"{{
                "camera": {{ "eye": [0, 0, 5], "view": [0, 0, -1], "up": [0, 1, 0],
                            "fov": 45, "width": 16, "height": 16 }},
                "lights": [ {{ "position": [0, 5, 5], "colour": [1, 1, 1] }} ],
                "materials": {{
                    "white": {{ "type": "phong", "kd": [1, 1, 1], "ks": [0, 0, 0], "shininess": 1 }}
                }},
                "root": {}
            }}"#,
            root
        );
        parse_description(&json).unwrap()
    }

    #[test]
    fn test_build_csg_tree() {
        let desc = scene_with_root(
            r#"{ "name": "root", "kind": "difference", "children": [
                { "name": "ball", "kind": "geometry", "primitive": { "type": "sphere" }, "material": "white" },
                { "name": "hole", "kind": "geometry", "primitive": { "type": "cylinder" }, "material": "white",
                  "transform": [ { "scale": [0.3, 0.3, 4] }, { "translate": [0, 0, -0.5] } ] }
            ] }"#,
        );
        let built = build_scene(&desc, ".").unwrap();
        assert_eq!(built.root.node_count(), 3);
        assert!(matches!(built.root.kind(), NodeKind::Difference));
        assert!(built.root.find_stale().is_none());
        assert_eq!(built.lights.len(), 1);

        let scene = built.scene().unwrap();
        assert_eq!(scene.camera.width, 16);
    }

    #[test]
    fn test_unknown_material() {
        let desc = scene_with_root(
            r#"{ "name": "ball", "kind": "geometry", "primitive": { "type": "sphere" }, "material": "gold" }"#,
        );
        assert!(matches!(
            build_scene(&desc, "."),
            Err(SceneError::UnknownMaterial { node, material }) if node == "ball" && material == "gold"
        ));
    }

    #[test]
    fn test_missing_primitive() {
        let desc = scene_with_root(r#"{ "name": "ball", "kind": "geometry", "material": "white" }"#);
        assert!(matches!(
            build_scene(&desc, "."),
            Err(SceneError::InvalidPrimitive { node, .. }) if node == "ball"
        ));
    }

    #[test]
    fn test_degenerate_polygon() {
        let desc = scene_with_root(
            r#"{ "name": "sliver", "kind": "geometry", "material": "white",
                 "primitive": { "type": "polygon", "points": [[0, 0, 0], [1, 0, 0]] } }"#,
        );
        assert!(matches!(
            build_scene(&desc, "."),
            Err(SceneError::InvalidPrimitive { node, .. }) if node == "sliver"
        ));
    }

    #[test]
    fn test_geometry_with_children() {
        let desc = scene_with_root(
            r#"{ "name": "ball", "kind": "geometry", "primitive": { "type": "sphere" }, "material": "white",
                 "children": [ { "name": "inner" } ] }"#,
        );
        assert!(matches!(
            build_scene(&desc, "."),
            Err(SceneError::GeometryWithChildren(name)) if name == "ball"
        ));
    }

    #[test]
    fn test_singular_transform() {
        let desc = scene_with_root(
            r#"{ "name": "flat", "transform": [ { "scale": [1, 0, 1] } ] }"#,
        );
        assert!(matches!(
            build_scene(&desc, "."),
            Err(SceneError::SingularTransform(name)) if name == "flat"
        ));

        let desc = scene_with_root(
            r#"{ "name": "spun", "transform": [ { "rotate": { "axis": [0, 0, 0], "degrees": 10 } } ] }"#,
        );
        assert!(matches!(
            build_scene(&desc, "."),
            Err(SceneError::SingularTransform(name)) if name == "spun"
        ));
    }

    #[test]
    fn test_missing_texture() {
        let mut desc = scene_with_root(r#"{ "name": "root" }"#);
        desc.materials.insert(
            "wood".to_string(),
            MaterialDescription::Texture {
                path: "no_such_texture.png".to_string(),
                ks: [0.0; 3],
                shininess: 1.0,
                transparency: 0.0,
                refractive_index: 1.0,
            },
        );
        assert!(matches!(
            build_scene(&desc, "/nonexistent"),
            Err(SceneError::Texture { material, .. }) if material == "wood"
        ));
    }
}
