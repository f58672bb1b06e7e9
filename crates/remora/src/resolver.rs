//! Incrementally maintained binding index and endpoint resolution.
//!
//! The resolver owns an inverted index from target element id to the arrows bound to it, plus a
//! per-arrow snapshot of its `(start, end)` target pair for cheap change detection. The index is
//! derived state: any full rebuild from the document produces the same index, and staleness is
//! bounded by the document version check. Callers with non-monotonic version sequences
//! (undo/redo) must call [`BindingResolver::invalidate`] instead of relying on incremental
//! updates.

use crate::bind::resolve_bound_point;
use crate::config::EngineConfig;
use crate::recenter::recenter;
use crate::router::{route_elbow_end, symmetrize_crossbar};
use crate::shaft::{normalize_local, resolve_world_points};
use indexmap::IndexMap;
use remora_core::binding::ElementId;
use remora_core::element::{Element, FixedSegment, LineEnd};
use remora_core::geom::Point;
use remora_core::style::ShaftKind;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

type TargetPair = (Option<ElementId>, Option<ElementId>);

/// Endpoint movement below this is considered settled during dual-bound fixed-point passes.
const SETTLE_EPS: f64 = 1e-6;

#[derive(Debug, Default)]
pub struct BindingResolver {
    config: EngineConfig,
    /// target id → arrows bound to it.
    index: FxHashMap<ElementId, FxHashSet<ElementId>>,
    /// arrow id → (start target, end target) as of the last index update.
    snapshots: FxHashMap<ElementId, TargetPair>,
    last_version: Option<u64>,
}

fn target_pair(element: &Element) -> TargetPair {
    match element.linear() {
        Some(data) => (
            data.start_binding.as_ref().map(|b| b.element_id.clone()),
            data.end_binding.as_ref().map(|b| b.element_id.clone()),
        ),
        None => (None, None),
    }
}

impl BindingResolver {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            index: FxHashMap::default(),
            snapshots: FxHashMap::default(),
            last_version: None,
        }
    }

    /// Forget the index; the next `resolve` rebuilds from scratch. Required after undo/redo or
    /// any other non-monotonic version jump.
    pub fn invalidate(&mut self) {
        trace!("binding index invalidated");
        self.index.clear();
        self.snapshots.clear();
        self.last_version = None;
    }

    /// Recompute the endpoints of every arrow bound to an element in `changed_ids` and return
    /// the replacement elements. `overlay` shadows `base` (e.g. in-flight drag state); arrows
    /// whose geometry did not actually change are dropped from the result.
    pub fn resolve(
        &mut self,
        base: &IndexMap<ElementId, Element>,
        overlay: &IndexMap<ElementId, Element>,
        changed_ids: &[ElementId],
        version: Option<u64>,
    ) -> IndexMap<ElementId, Element> {
        let lookup = |id: &str| overlay.get(id).or_else(|| base.get(id));

        let incremental = matches!(
            (self.last_version, version),
            (Some(prev), Some(v)) if v >= prev && v - prev <= 1
        );

        if incremental {
            for id in changed_ids {
                self.update_entry(id, lookup(id));
            }
        } else {
            debug!(
                from = ?self.last_version,
                to = ?version,
                "rebuilding binding index"
            );
            self.index.clear();
            self.snapshots.clear();
            for (id, element) in base {
                if !overlay.contains_key(id) {
                    self.update_entry(id, Some(element));
                }
            }
            for (id, element) in overlay {
                self.update_entry(id, Some(element));
            }
        }
        self.last_version = version;

        let changed: FxHashSet<&str> = changed_ids.iter().map(|id| id.as_str()).collect();
        let mut candidate_ids: Vec<&ElementId> = Vec::new();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for id in changed_ids {
            if let Some(bucket) = self.index.get(id) {
                for arrow_id in bucket {
                    if seen.insert(arrow_id.as_str()) {
                        candidate_ids.push(arrow_id);
                    }
                }
            }
        }
        candidate_ids.sort_unstable();

        let mut result: IndexMap<ElementId, Element> = IndexMap::new();
        for arrow_id in candidate_ids {
            let Some(arrow) = lookup(arrow_id.as_str()) else {
                continue;
            };
            if let Some(updated) = self.resolve_arrow(arrow, &changed, &lookup) {
                result.insert(updated.id.clone(), updated);
            }
        }
        result
    }

    /// Convenience wrapper over [`resolve`] for callers holding a whole document.
    pub fn resolve_document(
        &mut self,
        document: &remora_core::element::Document,
        changed_ids: &[ElementId],
    ) -> IndexMap<ElementId, Element> {
        self.resolve(
            &document.elements,
            &IndexMap::new(),
            changed_ids,
            Some(document.elements_version),
        )
    }

    fn update_entry(&mut self, id: &str, element: Option<&Element>) {
        let new_pair = element.map(target_pair).unwrap_or((None, None));
        let old_pair = self.snapshots.get(id).cloned().unwrap_or((None, None));
        if new_pair == old_pair {
            if element.is_none() {
                self.snapshots.remove(id);
            }
            return;
        }

        for target in [&old_pair.0, &old_pair.1].into_iter().flatten() {
            if let Some(bucket) = self.index.get_mut(target) {
                bucket.remove(id);
                if bucket.is_empty() {
                    self.index.remove(target);
                }
            }
        }
        for target in [&new_pair.0, &new_pair.1].into_iter().flatten() {
            self.index
                .entry(target.clone())
                .or_default()
                .insert(id.to_string());
        }
        if element.is_some() {
            self.snapshots.insert(id.to_string(), new_pair);
        } else {
            self.snapshots.remove(id);
        }
    }

    fn resolve_arrow<'a>(
        &self,
        arrow: &Element,
        changed: &FxHashSet<&str>,
        lookup: &impl Fn(&str) -> Option<&'a Element>,
    ) -> Option<Element> {
        let data = arrow.linear()?;
        let start_needs = data
            .start_binding
            .as_ref()
            .is_some_and(|b| changed.contains(b.element_id.as_str()));
        let end_needs = data
            .end_binding
            .as_ref()
            .is_some_and(|b| changed.contains(b.element_id.as_str()));
        if !start_needs && !end_needs {
            return None;
        }

        let mut world = resolve_world_points(&arrow.rect, arrow.rotation, &data.points);
        let dual = data.start_binding.is_some() && data.end_binding.is_some();

        if dual {
            // Both endpoints settle against each other: each pass re-aims one end using the
            // other's latest position, bounded by a fixed number of passes.
            for pass in 0..self.config.max_bind_passes {
                let mut moved = 0.0f64;
                moved = moved.max(self.update_end(&mut world, data, LineEnd::Start, lookup));
                moved = moved.max(self.update_end(&mut world, data, LineEnd::End, lookup));
                if moved <= SETTLE_EPS {
                    trace!(arrow = %arrow.id, passes = pass + 1, "dual binding settled");
                    break;
                }
            }
        } else {
            if start_needs {
                self.update_end(&mut world, data, LineEnd::Start, lookup);
            }
            if end_needs {
                self.update_end(&mut world, data, LineEnd::End, lookup);
            }
        }

        let mut fixed_segments = data.fixed_segments.clone();
        if data.kind == ShaftKind::Elbow {
            world = self.route_elbow(world, data, &mut fixed_segments, lookup);
            if dual && world.len() == 4 {
                symmetrize_crossbar(&mut world);
            }
        }

        let old_space = arrow.space();
        let local_moved: Vec<Point> = world.iter().map(|w| old_space.from_world(*w)).collect();
        let (new_rect, new_local) = recenter(&arrow.rect, arrow.rotation, &local_moved);
        let normalized: Vec<Point> = new_local
            .iter()
            .map(|p| normalize_local(&new_rect, *p))
            .collect();

        let mut updated = arrow.clone();
        updated.rect = new_rect;
        let updated_data = updated.linear_mut().expect("arrow-like");
        updated_data.points = normalized;
        updated_data.fixed_segments = fixed_segments;
        if updated == *arrow {
            return None;
        }
        updated.revision = arrow.revision + 1;
        Some(updated)
    }

    /// Recompute one bound endpoint; returns how far it moved.
    fn update_end<'a>(
        &self,
        world: &mut [Point],
        data: &remora_core::element::LinearData,
        end: LineEnd,
        lookup: &impl Fn(&str) -> Option<&'a Element>,
    ) -> f64 {
        let Some(binding) = data.binding(end) else {
            return 0.0;
        };
        let Some(target) = lookup(binding.element_id.as_str()) else {
            // Bound target missing from both maps: leave the endpoint where it was.
            return 0.0;
        };
        let n = world.len();
        let (idx, ref_idx) = match end {
            LineEnd::Start => (0, 1.min(n - 1)),
            LineEnd::End => (n - 1, n.saturating_sub(2)),
        };
        let reference = world[ref_idx];
        let resolved = resolve_bound_point(
            target,
            binding,
            reference,
            data.is_exact(end),
            &self.config,
        );
        let moved = resolved.distance_to(world[idx]);
        world[idx] = resolved;
        moved
    }

    /// Elbow edit path: re-route each orbit-bound terminal approach, preserving user-pinned
    /// fixed segments by shifting their indices with the front of the path.
    fn route_elbow<'a>(
        &self,
        world: Vec<Point>,
        data: &remora_core::element::LinearData,
        fixed_segments: &mut Option<Vec<FixedSegment>>,
        lookup: &impl Fn(&str) -> Option<&'a Element>,
    ) -> Vec<Point> {
        let mut points = world;
        let mut front_delta: isize = 0;

        for end in [LineEnd::Start, LineEnd::End] {
            let Some(binding) = data.binding(end) else {
                continue;
            };
            if binding.mode != remora_core::binding::BindingMode::Orbit {
                continue;
            }
            let Some(target) = lookup(binding.element_id.as_str()) else {
                continue;
            };
            let before = points.len() as isize;
            let routed = route_elbow_end(
                &points,
                end,
                target,
                binding,
                data.is_exact(end),
                &self.config,
            );
            points = routed.points;
            if end == LineEnd::Start {
                front_delta += points.len() as isize - before;
            }
        }

        if let Some(segments) = fixed_segments {
            let last_valid = points.len().saturating_sub(1);
            segments.retain_mut(|seg| {
                let shifted = seg.index as isize + front_delta;
                if shifted < 0 || shifted as usize >= last_valid {
                    return false;
                }
                seg.index = shifted as usize;
                true
            });
            if segments.is_empty() {
                *fixed_segments = None;
            }
        }

        points
    }
}
