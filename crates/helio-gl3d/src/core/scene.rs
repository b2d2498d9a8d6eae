use glam::DVec3;
use crate::api::config::RoiConfig;
use crate::api::types::{MetaDataProvider, NodeId, Region, RegionSink, ViewMode};
use crate::renderer::camera::Camera;
use crate::renderer::ray::HitReferenceShape;
use crate::systems::orientation::{corona_alpha, phi_from_orientation, phi_rotation, view_angle_degrees};
use crate::systems::roi::estimate_region;

/// An image placed in the scene, with its cached visible region.
pub struct ImageLayer {
    metadata: Box<dyn MetaDataProvider>,
    /// Direction the image plane faces, in scene coordinates.
    orientation: DVec3,
    phi: f64,
    /// Ray-casting accelerator, created by `SceneGraph::init_layer`.
    hit_shape: Option<NodeId>,
    region: Option<Region>,
    view_angle: Option<f64>,
    corona_alpha: f64,
}

impl ImageLayer {
    pub fn new(metadata: Box<dyn MetaDataProvider>, orientation: DVec3) -> Self {
        Self {
            metadata,
            orientation,
            phi: 0.0,
            hit_shape: None,
            region: None,
            view_angle: None,
            corona_alpha: 1.0,
        }
    }

    pub fn metadata(&self) -> &dyn MetaDataProvider {
        self.metadata.as_ref()
    }

    pub fn orientation(&self) -> DVec3 {
        self.orientation
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn hit_shape(&self) -> Option<NodeId> {
        self.hit_shape
    }

    pub fn is_initialized(&self) -> bool {
        self.hit_shape.is_some()
    }

    /// Last successfully estimated visible region.
    pub fn region(&self) -> Option<Region> {
        self.region
    }

    /// Degrees between the view direction and the layer, as of the last update.
    pub fn view_angle(&self) -> Option<f64> {
        self.view_angle
    }

    pub fn corona_alpha(&self) -> f64 {
        self.corona_alpha
    }

    fn refresh_view_angle(&mut self, camera_rotation: glam::DQuat) {
        let normal = self.orientation.try_normalize().unwrap_or(DVec3::Z);
        let angle = view_angle_degrees(camera_rotation, normal);
        if self.view_angle != Some(angle) {
            self.view_angle = Some(angle);
            self.corona_alpha = corona_alpha(angle);
        }
    }
}

impl std::fmt::Debug for ImageLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLayer")
            .field("physical_region", &self.metadata.physical_region())
            .field("orientation", &self.orientation)
            .field("phi", &self.phi)
            .field("hit_shape", &self.hit_shape)
            .field("region", &self.region)
            .field("view_angle", &self.view_angle)
            .finish()
    }
}

#[derive(Debug)]
pub enum NodeKind {
    Group,
    ImageLayer(ImageLayer),
    /// Invisible sphere (and plane) that rays are cast against.
    HitShape(HitReferenceShape),
}

#[derive(Debug)]
pub struct SceneNode {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    hidden: bool,
    /// Epoch of the last change to this node or its subtree.
    changed_at: u64,
    /// Epoch up to which the node's cached state is current.
    synced_at: u64,
    kind: NodeKind,
}

impl SceneNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_changed(&self) -> bool {
        self.changed_at > self.synced_at
    }

    pub fn as_layer(&self) -> Option<&ImageLayer> {
        match &self.kind {
            NodeKind::ImageLayer(layer) => Some(layer),
            _ => None,
        }
    }

    fn as_layer_mut(&mut self) -> Option<&mut ImageLayer> {
        match &mut self.kind {
            NodeKind::ImageLayer(layer) => Some(layer),
            _ => None,
        }
    }
}

/// One visible node, in draw order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub depth: usize,
    /// Set for image layers.
    pub corona_alpha: Option<f64>,
}

/// Camera state the graph last reacted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CameraStamp {
    mode: ViewMode,
    moved: u64,
    revision: u64,
}

/// Arena of scene nodes addressed by `NodeId`.
///
/// Change tracking uses epoch stamps: `mark_changed` stamps the node and its
/// ancestors with a new epoch, and a node is stale while its change stamp is
/// newer than its sync stamp. The graph observes the camera by comparing its
/// `moved_generation` and `revision` with the values seen on the previous
/// `update`.
///
/// `update` and `draw_list` are not reentrant. Hosts that add or remove nodes
/// from another thread must serialize those changes with the per-frame calls
/// (for example by keeping the graph behind the same mutex as the render pass).
#[derive(Debug, Default)]
pub struct SceneGraph {
    slots: Vec<Option<SceneNode>>,
    /// Vacant slot indices, reused before the arena grows.
    free: Vec<u32>,
    roots: Vec<NodeId>,
    epoch: u64,
    camera_seen: Option<CameraStamp>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Structure ----

    pub fn add_group(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        self.insert(name, parent, NodeKind::Group)
    }

    pub fn add_image_layer(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        metadata: Box<dyn MetaDataProvider>,
        orientation: DVec3,
    ) -> NodeId {
        self.insert(name, parent, NodeKind::ImageLayer(ImageLayer::new(metadata, orientation)))
    }

    fn insert(&mut self, name: &str, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let node = SceneNode {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            hidden: false,
            changed_at: 0,
            synced_at: 0,
            kind,
        };

        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() as u32 - 1)
            }
        };

        let parent = match parent {
            Some(p) if self.contains(p) => Some(p),
            Some(p) => {
                log::warn!("parent {:?} of '{}' does not exist, adding as root", p, name);
                None
            }
            None => None,
        };
        self.link(id, parent);
        self.mark_changed(id);
        id
    }

    fn link(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            node.parent = parent;
        }
        match parent.and_then(|p| self.node_mut(p)) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let parent = self.get(id).and_then(|n| n.parent);
        match parent.and_then(|p| self.node_mut(p)) {
            Some(parent_node) => parent_node.children.retain(|&c| c != id),
            None => self.roots.retain(|&r| r != id),
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Move `child` under `parent`, or to the roots with `None`.
    /// Refuses moves that would create a cycle.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> bool {
        if !self.contains(child) || parent.is_some_and(|p| !self.contains(p)) {
            return false;
        }
        if let Some(p) = parent {
            if p == child || self.ancestors(p).contains(&child) {
                log::warn!("refusing to parent {:?} under its own descendant {:?}", child, p);
                return false;
            }
        }
        if let Some(old) = self.get(child).and_then(|n| n.parent) {
            self.mark_changed(old);
        }
        self.unlink(child);
        self.link(child, parent);
        self.mark_changed(child);
        true
    }

    /// Remove a node. Its children become roots, except an image layer's hit
    /// shape, which goes with it. Removed ids may be handed out again.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if let Some(parent) = self.get(id).and_then(|n| n.parent) {
            self.mark_changed(parent);
        }
        self.unlink(id);

        let Some(node) = self.slots[id.index()].take() else {
            return false;
        };
        self.free.push(id.0);

        let owned = match &node.kind {
            NodeKind::ImageLayer(layer) => layer.hit_shape,
            _ => None,
        };
        for child in node.children {
            if Some(child) == owned {
                if let Some(shape) = self.slots[child.index()].take() {
                    self.free.push(child.0);
                    for orphan in shape.children {
                        self.orphan(orphan);
                    }
                }
            } else {
                self.orphan(child);
            }
        }
        log::debug!("removed node '{}' ({:?})", node.name, id);
        true
    }

    fn orphan(&mut self, id: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
            self.roots.push(id);
            self.mark_changed(id);
        }
    }

    // ---- Lookup ----

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots.get(id.index()).and_then(|s| s.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.slots.get_mut(id.index()).and_then(|s| s.as_mut())
    }

    pub fn layer(&self, id: NodeId) -> Option<&ImageLayer> {
        self.get(id).and_then(|n| n.as_layer())
    }

    pub fn hit_shape(&self, id: NodeId) -> Option<&HitReferenceShape> {
        match self.get(id).map(|n| &n.kind) {
            Some(NodeKind::HitShape(shape)) => Some(shape),
            _ => None,
        }
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            chain.push(p);
            current = self.get(p).and_then(|n| n.parent);
        }
        chain
    }

    /// All nodes, depth first from the roots.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                out.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Image layers in traversal order.
    pub fn layers(&self) -> Vec<NodeId> {
        self.traverse()
            .into_iter()
            .filter(|&id| self.layer(id).is_some())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---- Visibility ----

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.hidden != hidden {
            node.hidden = hidden;
            self.mark_changed(id);
        }
        true
    }

    /// Neither the node nor any ancestor is hidden.
    pub fn is_visible(&self, id: NodeId) -> bool {
        match self.get(id) {
            Some(node) if !node.hidden => self.ancestors(id).iter().all(|&p| self.get(p).is_some_and(|n| !n.hidden)),
            _ => false,
        }
    }

    // ---- Change tracking ----

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Stamp `id` and its ancestors with a new epoch.
    pub fn mark_changed(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.epoch += 1;
        let epoch = self.epoch;
        let mut current = Some(id);
        while let Some(n) = current {
            match self.node_mut(n) {
                Some(node) => {
                    node.changed_at = epoch;
                    current = node.parent;
                }
                None => break,
            }
        }
    }

    pub fn is_changed(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.is_changed())
    }

    /// Whether `id` changed since the last call, clearing the mark.
    pub fn take_changed(&mut self, id: NodeId) -> bool {
        match self.node_mut(id) {
            Some(node) if node.is_changed() => {
                node.synced_at = node.changed_at;
                true
            }
            _ => false,
        }
    }

    // ---- Layers ----

    /// Resolve the layer's phi, attach its hit shape and, in 3D, turn the
    /// camera to face the image. Returns false if `id` is not an
    /// uninitialized image layer.
    pub fn init_layer(&mut self, id: NodeId, camera: &mut Camera) -> bool {
        let Some(layer) = self.layer(id) else {
            return false;
        };
        if layer.is_initialized() {
            return false;
        }

        let phi = phi_from_orientation(layer.orientation);
        let shape = HitReferenceShape::new(camera.config().sun_radius, phi).with_plane(true);
        let shape_id = self.insert("hit shape", Some(id), NodeKind::HitShape(shape));
        if let Some(layer) = self.node_mut(id).and_then(|n| n.as_layer_mut()) {
            layer.phi = phi;
            layer.hit_shape = Some(shape_id);
        }
        self.mark_changed(id);

        if camera.mode() == ViewMode::Mode3D {
            camera.set_rotation(phi_rotation(phi));
            camera.update_transformation();
        }
        log::debug!("initialized layer {:?} with phi {:.4}", id, phi);
        true
    }

    /// Initialize every layer that is not yet. Returns how many were.
    pub fn init_layers(&mut self, camera: &mut Camera) -> usize {
        self.layers()
            .into_iter()
            .filter(|&id| self.init_layer(id, camera))
            .count()
    }

    // ---- Per frame ----

    /// Bring cached layer state up to date with `camera`.
    ///
    /// Layers are marked stale when the camera reports a committed move (or a
    /// different camera is passed). Stale, visible, initialized layers get a
    /// new region estimate, which is pushed to `sink`; when the estimate fails
    /// the previous region is kept. View angles follow every camera change.
    /// Returns the number of regions pushed.
    pub fn update(&mut self, camera: &Camera, config: &RoiConfig, sink: &mut dyn RegionSink) -> usize {
        let stamp = CameraStamp {
            mode: camera.mode(),
            moved: camera.moved_generation(),
            revision: camera.revision(),
        };
        let seen = self.camera_seen.replace(stamp);
        let moved = seen.map_or(true, |s| s.mode != stamp.mode || s.moved != stamp.moved);
        let moving = seen != Some(stamp);

        let layers = self.layers();
        if moved {
            for &id in &layers {
                if let Some(shape) = self.layer(id).and_then(|l| l.hit_shape) {
                    self.mark_changed(shape);
                }
                self.mark_changed(id);
            }
        }
        if moving {
            let rotation = camera.rotation();
            for &id in &layers {
                if let Some(layer) = self.node_mut(id).and_then(|n| n.as_layer_mut()) {
                    layer.refresh_view_angle(rotation);
                }
            }
        }

        let mut pushed = 0;
        for id in layers {
            if !self.is_visible(id) {
                continue;
            }
            let Some(layer) = self.layer(id) else { continue };
            let Some(shape) = layer.hit_shape.and_then(|s| self.hit_shape(s)) else {
                continue;
            };
            if !self.is_changed(id) {
                continue;
            }

            let result = estimate_region(camera, shape, layer.metadata(), config);
            let shape_id = layer.hit_shape;
            self.take_changed(id);
            if let Some(shape_id) = shape_id {
                self.take_changed(shape_id);
            }

            match result {
                Ok(region) => {
                    if let Some(layer) = self.node_mut(id).and_then(|n| n.as_layer_mut()) {
                        layer.region = Some(region);
                    }
                    sink.set_region(id, region);
                    pushed += 1;
                }
                Err(err) => {
                    let name = self.get(id).map(|n| n.name.as_str()).unwrap_or_default();
                    log::warn!("layer '{}' keeps its previous region: {}", name, err);
                }
            }
        }

        // Groups carry no cached state of their own.
        for node in self.slots.iter_mut().flatten() {
            if matches!(node.kind, NodeKind::Group) {
                node.synced_at = node.changed_at;
            }
        }
        pushed
    }

    /// Visible nodes depth first, skipping hidden subtrees and hit shapes.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut out = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|&id| (id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            if node.hidden {
                continue;
            }
            match &node.kind {
                NodeKind::HitShape(_) => continue,
                NodeKind::ImageLayer(layer) => out.push(DrawItem {
                    node: id,
                    depth,
                    corona_alpha: Some(layer.corona_alpha),
                }),
                NodeKind::Group => out.push(DrawItem {
                    node: id,
                    depth,
                    corona_alpha: None,
                }),
            }
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::CameraConfig;
    use crate::api::types::ImageMetaData;
    use glam::{DQuat, DVec2};
    use std::f64::consts::FRAC_PI_2;

    const R: f64 = 100.0;

    fn camera(mode: ViewMode) -> Camera {
        let config = CameraConfig {
            sun_radius: R,
            ..CameraConfig::default()
        };
        let mut cam = Camera::new(mode, &config);
        cam.set_viewport(800.0, 600.0);
        cam.set_z_translation(-150.0);
        cam.update_transformation_silent();
        cam
    }

    fn metadata() -> Box<dyn MetaDataProvider> {
        Box::new(ImageMetaData::new(DVec2::splat(-100.0), DVec2::splat(100.0)))
    }

    fn layer(scene: &mut SceneGraph, parent: Option<NodeId>) -> NodeId {
        scene.add_image_layer("aia", parent, metadata(), DVec3::Z)
    }

    #[test]
    fn parent_child_relationship() {
        let mut scene = SceneGraph::new();
        let root = scene.add_group("root", None);
        let child = layer(&mut scene, Some(root));
        assert_eq!(scene.get(child).unwrap().parent(), Some(root));
        assert_eq!(scene.get(root).unwrap().children(), &[child]);
        assert_eq!(scene.roots(), &[root]);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn missing_parent_adds_root() {
        let mut scene = SceneGraph::new();
        let id = scene.add_group("g", Some(NodeId(42)));
        assert_eq!(scene.roots(), &[id]);
    }

    #[test]
    fn remove_orphans_children() {
        let mut scene = SceneGraph::new();
        let root = scene.add_group("root", None);
        let a = scene.add_group("a", Some(root));
        let b = scene.add_group("b", Some(a));

        assert!(scene.remove(a));
        assert!(!scene.contains(a));
        assert_eq!(scene.get(b).unwrap().parent(), None);
        assert!(scene.roots().contains(&b));
        assert!(scene.get(root).unwrap().children().is_empty());

        // The vacated slot is reused.
        let c = scene.add_group("c", None);
        assert_eq!(c, a);
    }

    #[test]
    fn removing_layer_drops_its_hit_shape() {
        let mut scene = SceneGraph::new();
        let mut cam = camera(ViewMode::Mode3D);
        let id = layer(&mut scene, None);
        scene.init_layer(id, &mut cam);
        assert_eq!(scene.len(), 2);

        scene.remove(id);
        assert!(scene.is_empty());
        assert!(scene.roots().is_empty());
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let mut scene = SceneGraph::new();
        let a = scene.add_group("a", None);
        let b = scene.add_group("b", Some(a));
        assert!(!scene.set_parent(a, Some(b)));
        assert!(!scene.set_parent(a, Some(a)));
        assert!(scene.set_parent(b, None));
        assert!(scene.set_parent(a, Some(b)));
        assert_eq!(scene.ancestors(a), vec![b]);
    }

    #[test]
    fn change_marks_propagate_to_ancestors() {
        let mut scene = SceneGraph::new();
        let root = scene.add_group("root", None);
        let child = scene.add_group("child", Some(root));
        while scene.take_changed(root) {}
        while scene.take_changed(child) {}

        let before = scene.epoch();
        scene.mark_changed(child);
        assert!(scene.epoch() > before);
        assert!(scene.is_changed(child));
        assert!(scene.is_changed(root));

        assert!(scene.take_changed(child));
        assert!(!scene.take_changed(child));
        assert!(scene.is_changed(root));
    }

    #[test]
    fn init_layer_attaches_shape_and_faces_camera() {
        let mut scene = SceneGraph::new();
        let mut cam = camera(ViewMode::Mode3D);
        let id = scene.add_image_layer("side", None, metadata(), DVec3::X);

        assert!(scene.init_layer(id, &mut cam));
        assert!(!scene.init_layer(id, &mut cam));

        let layer = scene.layer(id).unwrap();
        assert!((layer.phi() - FRAC_PI_2).abs() < 1e-12);
        let shape = scene.hit_shape(layer.hit_shape().unwrap()).unwrap();
        assert!(shape.plane);
        assert_eq!(shape.radius, R);
        assert!((cam.rotation() * DVec3::X).abs_diff_eq(DVec3::Z, 1e-12));
        assert_eq!(cam.moved_generation(), 1);
    }

    #[test]
    fn init_in_2d_leaves_camera_alone() {
        let mut scene = SceneGraph::new();
        let mut cam = camera(ViewMode::Mode2D);
        scene.add_image_layer("side", None, metadata(), DVec3::X);
        assert_eq!(scene.init_layers(&mut cam), 1);
        assert_eq!(cam.rotation(), DQuat::IDENTITY);
    }

    #[test]
    fn region_recomputed_only_after_camera_moves() {
        let mut scene = SceneGraph::new();
        let mut cam = camera(ViewMode::Mode3D);
        let id = layer(&mut scene, None);
        scene.init_layer(id, &mut cam);
        let config = RoiConfig::default();
        let mut sink: Vec<(NodeId, Region)> = Vec::new();

        assert_eq!(scene.update(&cam, &config, &mut sink), 1);
        assert_eq!(sink.len(), 1);
        assert_eq!(scene.layer(id).unwrap().region(), Some(sink[0].1));

        assert_eq!(scene.update(&cam, &config, &mut sink), 0);

        // Moving feedback alone keeps the cached region.
        cam.pan(5.0, 0.0);
        cam.update_transformation_moving();
        assert_eq!(scene.update(&cam, &config, &mut sink), 0);

        cam.fire_moved();
        assert_eq!(scene.update(&cam, &config, &mut sink), 1);
        assert_ne!(sink[1].1, sink[0].1);
    }

    #[test]
    fn failed_estimate_keeps_previous_region() {
        let mut scene = SceneGraph::new();
        let mut cam = camera(ViewMode::Mode3D);
        let id = layer(&mut scene, None);
        scene.init_layer(id, &mut cam);
        let config = RoiConfig::default();
        let mut sink: Vec<(NodeId, Region)> = Vec::new();
        scene.update(&cam, &config, &mut sink);
        let before = scene.layer(id).unwrap().region();

        cam.set_panning(1.0e6, 0.0);
        cam.update_transformation();
        assert_eq!(scene.update(&cam, &config, &mut sink), 0);
        assert_eq!(scene.layer(id).unwrap().region(), before);
    }

    #[test]
    fn hidden_layers_are_skipped() {
        let mut scene = SceneGraph::new();
        let mut cam = camera(ViewMode::Mode3D);
        let group = scene.add_group("group", None);
        let id = layer(&mut scene, Some(group));
        scene.init_layer(id, &mut cam);
        let mut sink: Vec<(NodeId, Region)> = Vec::new();

        scene.set_hidden(group, true);
        assert!(!scene.is_visible(id));
        assert!(scene.draw_list().is_empty());
        assert_eq!(scene.update(&cam, &RoiConfig::default(), &mut sink), 0);

        // Shown again, the pending change is picked up.
        scene.set_hidden(group, false);
        assert_eq!(scene.update(&cam, &RoiConfig::default(), &mut sink), 1);
    }

    #[test]
    fn draw_list_is_depth_first() {
        let mut scene = SceneGraph::new();
        let mut cam = camera(ViewMode::Mode3D);
        let root = scene.add_group("root", None);
        let a = layer(&mut scene, Some(root));
        let b = scene.add_group("b", Some(root));
        let c = layer(&mut scene, Some(b));
        let other = scene.add_group("other", None);
        scene.init_layers(&mut cam);

        let order: Vec<(NodeId, usize)> = scene.draw_list().iter().map(|d| (d.node, d.depth)).collect();
        assert_eq!(order, vec![(root, 0), (a, 1), (b, 1), (c, 2), (other, 0)]);
    }

    #[test]
    fn view_angle_tracks_camera() {
        let mut scene = SceneGraph::new();
        let mut cam = camera(ViewMode::Mode2D);
        let id = layer(&mut scene, None);
        let mut sink: Vec<(NodeId, Region)> = Vec::new();

        scene.update(&cam, &RoiConfig::default(), &mut sink);
        assert_eq!(scene.layer(id).unwrap().corona_alpha(), 1.0);

        cam.set_rotation(DQuat::from_rotation_y(FRAC_PI_2));
        cam.update_transformation_moving();
        scene.update(&cam, &RoiConfig::default(), &mut sink);
        let layer = scene.layer(id).unwrap();
        assert!((layer.view_angle().unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(layer.corona_alpha(), 0.0);
    }
}
