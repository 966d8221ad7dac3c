//! Inside-spans along a ray and the boolean combinators over them.

use crate::node::GeometryNode;
use crate::primitive::Hit;
use lumen_math::{Interval, TransformPair, Vec3};

/// One end of a segment: where the ray crosses a surface.
#[derive(Debug, Clone, Copy)]
pub struct Boundary<'a> {
    pub t: f32,
    /// Surface normal in the space of the node that produced the list
    pub normal: Vec3,
    /// Crossing point in the owning primitive's object space
    pub local_point: Vec3,
    pub owner: &'a GeometryNode,
}

impl<'a> Boundary<'a> {
    fn from_hit(hit: &Hit, owner: &'a GeometryNode) -> Self {
        Self {
            t: hit.t,
            normal: hit.normal,
            local_point: hit.local_point,
            owner,
        }
    }

    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// The part of the ray between two boundaries that lies inside a solid.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    pub start: Boundary<'a>,
    pub end: Boundary<'a>,
}

impl<'a> Segment<'a> {
    /// Orders the two boundaries so that `start.t <= end.t`.
    pub fn new(a: Boundary<'a>, b: Boundary<'a>) -> Self {
        if a.t <= b.t {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn span(&self) -> Interval {
        Interval::new(self.start.t, self.end.t)
    }

    fn overlaps(&self, other: &Segment<'_>) -> bool {
        self.span().overlaps(&other.span())
    }
}

/// A multiset of segments.
///
/// Segments may overlap after [`union`](Self::union); `intersect` and
/// `subtract` are correct on overlapping input.
#[derive(Debug, Clone, Default)]
pub struct SegmentList<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> SegmentList<'a> {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Pair sorted hits into entry/exit segments owned by `owner`.
    ///
    /// An odd count means the primitive is malformed along this ray; the
    /// whole result is dropped.
    pub fn from_hits(mut hits: Vec<Hit>, owner: &'a GeometryNode) -> Self {
        if hits.len() % 2 != 0 {
            log::warn!(
                "Odd hit count ({}) from {} primitive, ignoring it for this ray",
                hits.len(),
                owner.primitive.kind_name()
            );
            return Self::new();
        }

        hits.sort_by(|a, b| a.t.total_cmp(&b.t));
        let segments = hits
            .chunks_exact(2)
            .map(|pair| {
                Segment::new(
                    Boundary::from_hit(&pair[0], owner),
                    Boundary::from_hit(&pair[1], owner),
                )
            })
            .collect();
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment<'a>> {
        self.segments.iter()
    }

    pub fn push(&mut self, segment: Segment<'a>) {
        self.segments.push(segment);
    }

    /// Multiset union; overlaps are kept.
    pub fn union(&mut self, other: SegmentList<'a>) {
        self.segments.extend(other.segments);
    }

    /// Coalesce overlapping or touching segments.
    pub fn merge_overlapping(&mut self) {
        if self.segments.len() < 2 {
            return;
        }
        self.segments
            .sort_by(|a, b| a.start.t.total_cmp(&b.start.t));

        let mut merged: Vec<Segment<'a>> = Vec::with_capacity(self.segments.len());
        for seg in self.segments.drain(..) {
            match merged.last_mut() {
                Some(last) if seg.start.t <= last.end.t => {
                    if seg.end.t > last.end.t {
                        last.end = seg.end;
                    }
                }
                _ => merged.push(seg),
            }
        }
        self.segments = merged;
    }

    /// Pairwise intersection. Pairs that do not overlap are discarded.
    pub fn intersect(self, other: &SegmentList<'a>) -> SegmentList<'a> {
        let mut result = SegmentList::new();
        for a in &other.segments {
            for b in &self.segments {
                if a.overlaps(b) {
                    let start = if a.start.t >= b.start.t { a.start } else { b.start };
                    let end = if a.end.t <= b.end.t { a.end } else { b.end };
                    result.push(Segment { start, end });
                }
            }
        }
        result
    }

    /// Remove every span covered by `other`.
    ///
    /// Boundaries contributed by `other` face the opposite way in the result,
    /// since the ray now crosses them from the carved-out side.
    pub fn subtract(self, other: SegmentList<'a>) -> SegmentList<'a> {
        let cutters: Vec<Segment<'a>> = other
            .segments
            .into_iter()
            .map(|s| Segment {
                start: s.start.flipped(),
                end: s.end.flipped(),
            })
            .collect();

        let mut result = SegmentList::new();
        for seg in self.segments {
            let mut pieces = vec![seg];
            for cutter in &cutters {
                pieces = pieces
                    .into_iter()
                    .flat_map(|piece| {
                        if !piece.overlaps(cutter) {
                            return vec![piece];
                        }
                        let mut kept = Vec::with_capacity(2);
                        if piece.start.t < cutter.start.t {
                            kept.push(Segment {
                                start: piece.start,
                                end: cutter.start,
                            });
                        }
                        if piece.end.t > cutter.end.t {
                            kept.push(Segment {
                                start: cutter.end,
                                end: piece.end,
                            });
                        }
                        kept
                    })
                    .collect();
            }
            result.segments.extend(pieces);
        }
        result
    }

    /// The nearest boundary (start or end) strictly past `offset`.
    pub fn nearest(&self, offset: f32) -> Option<Boundary<'a>> {
        self.segments
            .iter()
            .filter_map(|s| {
                if s.start.t > offset {
                    Some(s.start)
                } else if s.end.t > offset {
                    Some(s.end)
                } else {
                    None
                }
            })
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    /// Every boundary strictly past `offset`, nearest first.
    pub fn boundaries_after(&self, offset: f32) -> Vec<Boundary<'a>> {
        let mut boundaries: Vec<Boundary<'a>> = self
            .segments
            .iter()
            .flat_map(|s| [s.start, s.end])
            .filter(|b| b.t > offset)
            .collect();
        boundaries.sort_by(|a, b| a.t.total_cmp(&b.t));
        boundaries
    }

    /// Carry every normal up through a node's transform.
    pub fn transform_normals(&mut self, transform: &TransformPair) {
        for seg in &mut self.segments {
            seg.start.normal = transform.transform_normal(seg.start.normal);
            seg.end.normal = transform.transform_normal(seg.end.normal);
        }
    }
}

impl<'a> IntoIterator for SegmentList<'a> {
    type Item = Segment<'a>;
    type IntoIter = std::vec::IntoIter<Segment<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> FromIterator<Segment<'a>> for SegmentList<'a> {
    fn from_iter<I: IntoIterator<Item = Segment<'a>>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::PhongMaterial;
    use crate::primitive::{Shape, Sphere};
    use lumen_core::Color;
    use std::sync::Arc;

    fn owner() -> GeometryNode {
        GeometryNode::new(
            Arc::new(Shape::Sphere(Sphere)),
            Arc::new(PhongMaterial::new(Color::ONE, Color::ZERO, 1.0)),
        )
    }

    fn list<'a>(owner: &'a GeometryNode, spans: &[(f32, f32)]) -> SegmentList<'a> {
        spans
            .iter()
            .map(|&(a, b)| {
                let hit = |t| Boundary {
                    t,
                    normal: Vec3::Z,
                    local_point: Vec3::ZERO,
                    owner,
                };
                Segment::new(hit(a), hit(b))
            })
            .collect()
    }

    fn spans(list: &SegmentList<'_>) -> Vec<(f32, f32)> {
        let mut v: Vec<(f32, f32)> = list.iter().map(|s| (s.start.t, s.end.t)).collect();
        v.sort_by(|a, b| a.0.total_cmp(&b.0));
        v
    }

    #[test]
    fn test_union_with_self_after_merge() {
        let g = owner();
        let mut a = list(&g, &[(1.0, 3.0), (5.0, 7.0)]);
        a.union(list(&g, &[(1.0, 3.0), (5.0, 7.0)]));
        assert_eq!(a.len(), 4);
        a.merge_overlapping();
        assert_eq!(spans(&a), vec![(1.0, 3.0), (5.0, 7.0)]);
    }

    #[test]
    fn test_merge_chains() {
        let g = owner();
        let mut a = list(&g, &[(4.0, 6.0), (1.0, 3.0), (2.0, 4.5), (8.0, 9.0)]);
        a.merge_overlapping();
        assert_eq!(spans(&a), vec![(1.0, 6.0), (8.0, 9.0)]);
    }

    #[test]
    fn test_intersect_with_self() {
        let g = owner();
        let a = list(&g, &[(1.0, 3.0), (5.0, 7.0)]);
        let b = list(&g, &[(1.0, 3.0), (5.0, 7.0)]);
        assert_eq!(spans(&a.intersect(&b)), vec![(1.0, 3.0), (5.0, 7.0)]);
    }

    #[test]
    fn test_intersect_partial_overlap() {
        let g = owner();
        let a = list(&g, &[(1.0, 4.0), (6.0, 9.0)]);
        let b = list(&g, &[(3.0, 7.0)]);
        assert_eq!(spans(&a.intersect(&b)), vec![(3.0, 4.0), (6.0, 7.0)]);

        let disjoint = list(&g, &[(1.0, 2.0)]).intersect(&list(&g, &[(2.0, 3.0)]));
        assert!(disjoint.is_empty());
    }

    #[test]
    fn test_subtract_self_is_empty() {
        let g = owner();
        let a = list(&g, &[(1.0, 3.0), (5.0, 7.0)]);
        let b = list(&g, &[(1.0, 3.0), (5.0, 7.0)]);
        assert!(a.subtract(b).is_empty());
    }

    #[test]
    fn test_subtract_splits_and_flips() {
        let g = owner();
        let a = list(&g, &[(0.0, 10.0)]);
        let result = a.subtract(list(&g, &[(2.0, 3.0)]));
        assert_eq!(spans(&result), vec![(0.0, 2.0), (3.0, 10.0)]);

        for seg in result.iter() {
            // Uncut boundaries keep their normal, carved ones are flipped
            if seg.start.t == 0.0 {
                assert_eq!(seg.end.normal, -Vec3::Z);
            } else {
                assert_eq!(seg.start.normal, -Vec3::Z);
                assert_eq!(seg.end.normal, Vec3::Z);
            }
        }
    }

    #[test]
    fn test_subtract_overlapping_cutters() {
        let g = owner();
        let a = list(&g, &[(0.0, 10.0)]);
        let cutters = list(&g, &[(2.0, 4.0), (3.0, 5.0), (7.0, 8.0)]);
        assert_eq!(
            spans(&a.subtract(cutters)),
            vec![(0.0, 2.0), (5.0, 7.0), (8.0, 10.0)]
        );
    }

    #[test]
    fn test_nearest() {
        let g = owner();
        let a = list(&g, &[(1.0, 3.0), (5.0, 7.0)]);
        assert_eq!(a.nearest(0.0).map(|b| b.t), Some(1.0));
        assert_eq!(a.nearest(2.0).map(|b| b.t), Some(3.0));
        assert_eq!(a.nearest(3.0).map(|b| b.t), Some(5.0));
        assert!(a.nearest(7.0).is_none());
    }

    #[test]
    fn test_boundaries_after_sorted() {
        let g = owner();
        let a = list(&g, &[(5.0, 7.0), (1.0, 3.0)]);
        let ts: Vec<f32> = a.boundaries_after(2.0).iter().map(|b| b.t).collect();
        assert_eq!(ts, vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_odd_hits_dropped() {
        let g = owner();
        let hit = Hit {
            t: 1.0,
            normal: Vec3::Z,
            local_point: Vec3::ZERO,
        };
        assert!(SegmentList::from_hits(vec![hit], &g).is_empty());
        assert_eq!(SegmentList::from_hits(vec![hit, hit], &g).len(), 1);
    }
}
