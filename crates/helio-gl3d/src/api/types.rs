use glam::DVec2;

/// Handle of a node in the scene graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which camera (and rendering path) is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    Mode2D,
    #[default]
    Mode3D,
}

/// Axis-aligned rectangle in physical image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub lower_left: DVec2,
    pub upper_right: DVec2,
}

impl Region {
    pub fn new(lower_left: DVec2, upper_right: DVec2) -> Self {
        Self { lower_left, upper_right }
    }

    pub fn from_corner_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(DVec2::new(x, y), DVec2::new(x + width, y + height))
    }

    pub fn width(&self) -> f64 {
        self.upper_right.x - self.lower_left.x
    }

    pub fn height(&self) -> f64 {
        self.upper_right.y - self.lower_left.y
    }

    /// Finite with positive width and height.
    pub fn is_valid(&self) -> bool {
        let w = self.width();
        let h = self.height();
        w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.lower_left.x
            && p.x <= self.upper_right.x
            && p.y >= self.lower_left.y
            && p.y <= self.upper_right.y
    }

    /// Whether `other` lies entirely inside this region.
    pub fn contains_region(&self, other: &Region) -> bool {
        self.contains(other.lower_left) && self.contains(other.upper_right)
    }

    /// Restrict to `bounds`. The result may be empty (non-positive extent).
    pub fn clamp_to(&self, bounds: &Region) -> Region {
        Region::new(
            self.lower_left.max(bounds.lower_left),
            self.upper_right.min(bounds.upper_right),
        )
    }

    /// Grow each side by `fraction` of the extent along that axis.
    pub fn padded(&self, fraction: f64) -> Region {
        let pad = DVec2::new(self.width(), self.height()) * fraction;
        Region::new(self.lower_left - pad, self.upper_right + pad)
    }
}

/// Physical extent of an image, supplied by the metadata collaborator.
pub trait MetaDataProvider {
    fn physical_lower_left(&self) -> DVec2;
    fn physical_upper_right(&self) -> DVec2;

    fn physical_image_width(&self) -> f64 {
        self.physical_upper_right().x - self.physical_lower_left().x
    }

    fn physical_image_height(&self) -> f64 {
        self.physical_upper_right().y - self.physical_lower_left().y
    }

    fn physical_region(&self) -> Region {
        Region::new(self.physical_lower_left(), self.physical_upper_right())
    }
}

/// Plain metadata record for callers that do not have their own provider type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMetaData {
    pub lower_left: DVec2,
    pub upper_right: DVec2,
}

impl ImageMetaData {
    pub fn new(lower_left: DVec2, upper_right: DVec2) -> Self {
        Self { lower_left, upper_right }
    }
}

impl MetaDataProvider for ImageMetaData {
    fn physical_lower_left(&self) -> DVec2 {
        self.lower_left
    }

    fn physical_upper_right(&self) -> DVec2 {
        self.upper_right
    }
}

/// Access to the current drawing surface.
pub trait RenderContext {
    /// Viewport size in pixels.
    fn viewport_size(&self) -> (u32, u32);
}

/// Fixed viewport, used by hosts without a live GL context and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl RenderContext for Viewport {
    fn viewport_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Receives recomputed visible regions (tile/texture selection downstream).
pub trait RegionSink {
    fn set_region(&mut self, layer: NodeId, region: Region);
}

/// Collects regions in push order.
impl RegionSink for Vec<(NodeId, Region)> {
    fn set_region(&mut self, layer: NodeId, region: Region) {
        self.push((layer, region));
    }
}
