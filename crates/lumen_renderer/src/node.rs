//! Scene graph: transform nodes combined by boolean operators.
//!
//! Rays travel down the tree through each node's cached inverse; segment
//! normals travel back up through the inverse-transpose. Ray parameters are
//! never rescaled, so every `t` in a [`SegmentList`] refers to the ray the
//! caller passed in.

use std::sync::Arc;

use crate::material::Material;
use crate::primitive::{Primitive, Shape};
use crate::segment::SegmentList;
use lumen_core::{SceneError, SceneResult};
use lumen_math::{Mat4, Quat, Ray, TransformPair, Vec3};

/// A leaf's payload: the shape and how it looks.
#[derive(Debug, Clone)]
pub struct GeometryNode {
    pub primitive: Arc<Shape>,
    pub material: Arc<dyn Material>,
}

impl GeometryNode {
    pub fn new(primitive: Arc<Shape>, material: Arc<dyn Material>) -> Self {
        Self {
            primitive,
            material,
        }
    }

    /// Cut-out at this point: the surface is neither seen nor casts shadows.
    pub fn is_cutout_at(&self, local_point: Vec3) -> bool {
        self.material.has_zero_alpha(&self.primitive, local_point)
    }

    /// Fully blocks light at this point.
    pub fn occludes_at(&self, local_point: Vec3) -> bool {
        self.material.transparency() <= 0.0 && !self.is_cutout_at(local_point)
    }
}

/// How a node combines its children.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain multiset union
    Group,
    /// Union with overlapping spans merged
    Union,
    Intersection,
    /// First child minus all the others
    Difference,
    Geometry(GeometryNode),
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    local: Mat4,
    cache: TransformPair,
    stale: bool,
    children: Vec<SceneNode>,
    kind: NodeKind,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            local: Mat4::IDENTITY,
            cache: TransformPair::IDENTITY,
            stale: false,
            children: Vec::new(),
            kind,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn geometry(name: impl Into<String>, primitive: Shape, material: Arc<dyn Material>) -> Self {
        Self::new(
            name,
            NodeKind::Geometry(GeometryNode::new(Arc::new(primitive), material)),
        )
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Caches are out of date until [`rebuild_caches`](Self::rebuild_caches).
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn add_child(&mut self, child: SceneNode) -> SceneResult<()> {
        if matches!(self.kind, NodeKind::Geometry(_)) {
            return Err(SceneError::GeometryWithChildren(self.name.clone()));
        }
        self.children.push(child);
        Ok(())
    }

    /// Builder form of [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: SceneNode) -> SceneResult<Self> {
        self.add_child(child)?;
        Ok(self)
    }

    pub fn set_transform(&mut self, matrix: Mat4) {
        self.local = matrix;
        self.stale = true;
    }

    pub fn translate(&mut self, amount: Vec3) {
        self.set_transform(self.local * Mat4::from_translation(amount));
    }

    pub fn scale(&mut self, amount: Vec3) {
        self.set_transform(self.local * Mat4::from_scale(amount));
    }

    /// Rotate about `axis` by `degrees`. A zero axis leaves the node as is.
    pub fn rotate(&mut self, axis: Vec3, degrees: f32) {
        if let Some(axis) = axis.try_normalize() {
            let rotation = Mat4::from_quat(Quat::from_axis_angle(axis, degrees.to_radians()));
            self.set_transform(self.local * rotation);
        }
    }

    /// Recompute inverse and inverse-transpose caches for the whole subtree.
    pub fn rebuild_caches(&mut self) -> SceneResult<()> {
        if self.stale {
            self.cache = TransformPair::new(self.local)
                .ok_or_else(|| SceneError::SingularTransform(self.name.clone()))?;
            self.stale = false;
        }
        for child in &mut self.children {
            child.rebuild_caches()?;
        }
        Ok(())
    }

    /// Name of the first node in this subtree with out-of-date caches.
    pub fn find_stale(&self) -> Option<&str> {
        if self.stale {
            return Some(&self.name);
        }
        self.children.iter().find_map(SceneNode::find_stale)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Everything inside this subtree along `ray`, in the parent's space.
    pub fn intersect(&self, ray: &Ray, offset: f32) -> SegmentList<'_> {
        let local_ray = ray.transformed(&self.cache.inverse);

        let mut segments = match &self.kind {
            NodeKind::Geometry(geometry) => {
                let hits = geometry.primitive.filtered_intersect(&local_ray, offset);
                SegmentList::from_hits(hits, geometry)
            }
            NodeKind::Group => self.union_children(&local_ray, offset),
            NodeKind::Union => {
                let mut segments = self.union_children(&local_ray, offset);
                segments.merge_overlapping();
                segments
            }
            NodeKind::Intersection => {
                let mut children = self.children.iter();
                let mut segments = match children.next() {
                    Some(first) => first.intersect(&local_ray, offset),
                    None => SegmentList::new(),
                };
                for child in children {
                    if segments.is_empty() {
                        break;
                    }
                    segments = segments.intersect(&child.intersect(&local_ray, offset));
                }
                segments
            }
            NodeKind::Difference => {
                let mut children = self.children.iter();
                let mut segments = match children.next() {
                    Some(first) => first.intersect(&local_ray, offset),
                    None => SegmentList::new(),
                };
                for child in children {
                    if segments.is_empty() {
                        break;
                    }
                    segments = segments.subtract(child.intersect(&local_ray, offset));
                }
                segments
            }
        };

        segments.transform_normals(&self.cache);
        segments
    }

    fn union_children(&self, ray: &Ray, offset: f32) -> SegmentList<'_> {
        let mut segments = SegmentList::new();
        for child in &self.children {
            segments.union(child.intersect(ray, offset));
        }
        segments
    }
}
