use glam::Vec3A;

/// An ordered sequence of corners an agent should follow in straight lines.
///
/// An empty path means "no path". Consecutive corners are never equal.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NavmeshPath {
    corners: Vec<Vec3A>,
}

impl NavmeshPath {
    /// Creates a path from the given corners, dropping consecutive duplicates.
    pub fn new(corners: impl IntoIterator<Item = Vec3A>) -> Self {
        let mut corners: Vec<_> = corners.into_iter().collect();
        corners.dedup();
        Self { corners }
    }

    /// The path returned when no route exists.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The corners of the path, starting at the source and ending at the target.
    #[inline]
    pub fn corners(&self) -> &[Vec3A] {
        &self.corners
    }

    /// Consumes the path, returning its corners.
    pub fn into_corners(self) -> Vec<Vec3A> {
        self.corners
    }

    /// Whether the path has no corners, i.e. no route was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Number of corners.
    #[inline]
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    /// The first corner.
    pub fn first(&self) -> Option<Vec3A> {
        self.corners.first().copied()
    }

    /// The last corner.
    pub fn last(&self) -> Option<Vec3A> {
        self.corners.last().copied()
    }

    /// Iterates over the straight segments between consecutive corners.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3A, Vec3A)> + '_ {
        self.corners.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Total length of all segments.
    pub fn length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }
}

impl From<Vec<Vec3A>> for NavmeshPath {
    fn from(corners: Vec<Vec3A>) -> Self {
        Self::new(corners)
    }
}

impl From<NavmeshPath> for Vec<Vec3A> {
    fn from(path: NavmeshPath) -> Self {
        path.into_corners()
    }
}
