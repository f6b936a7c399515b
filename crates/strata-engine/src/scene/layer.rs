use core::cmp::Ordering;

/// Integer depth layer.
///
/// Higher values are farther from the camera and painted first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Layer(pub i32);

impl From<i32> for Layer {
    #[inline]
    fn from(v: i32) -> Self {
        Self(v)
    }
}

impl Ord for Layer {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Layer {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
