//! Rectangle type for UI layout

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create from screen dimensions
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w * 0.5
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h * 0.5
    }

    /// Check if point is inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by padding on all sides
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.w - padding * 2.0).max(0.0),
            (self.h - padding * 2.0).max(0.0),
        )
    }

    /// A `w` x `h` rect centered on this one
    pub fn centered(&self, w: f32, h: f32) -> Self {
        Self::new(
            (self.center_x() - w * 0.5).round(),
            (self.center_y() - h * 0.5).round(),
            w,
            h,
        )
    }

    /// Move (not resize) so the top-left stays inside `bounds`, keeping at
    /// least `visible` pixels of width on screen
    pub fn clamped_into(&self, bounds: &Rect, visible: f32) -> Self {
        let min_x = bounds.x - self.w + visible;
        let max_x = (bounds.right() - visible).max(min_x);
        let max_y = (bounds.bottom() - visible).max(bounds.y);
        Self::new(self.x.clamp(min_x, max_x), self.y.clamp(bounds.y, max_y), self.w, self.h)
    }

    /// Get a horizontal slice (for toolbars, status bars)
    pub fn slice_top(&self, height: f32) -> Self {
        Self::new(self.x, self.y, self.w, height.min(self.h))
    }

    /// Get remaining area after slicing top
    pub fn remaining_after_top(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.y + h, self.w, self.h - h)
    }

    /// Get a horizontal slice from bottom
    pub fn slice_bottom(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.bottom() - h, self.w, h)
    }

    /// Get remaining area after slicing bottom
    pub fn remaining_after_bottom(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.y, self.w, self.h - h)
    }

    /// Split off a column on the left, returns (left, rest)
    pub fn split_left(&self, width: f32) -> (Self, Self) {
        let w = width.clamp(0.0, self.w);
        (
            Self::new(self.x, self.y, w, self.h),
            Self::new(self.x + w, self.y, self.w - w, self.h),
        )
    }

    /// Split off a column on the right, returns (rest, right)
    pub fn split_right(&self, width: f32) -> (Self, Self) {
        let w = width.clamp(0.0, self.w);
        (
            Self::new(self.x, self.y, self.w - w, self.h),
            Self::new(self.right() - w, self.y, w, self.h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(50.0, 40.0));
        assert!(!r.contains(5.0, 40.0));
        assert!(!r.contains(50.0, 100.0));
    }

    #[test]
    fn test_dock_columns() {
        let workspace = Rect::new(0.0, 24.0, 1000.0, 600.0);
        let (left, rest) = workspace.split_left(280.0);
        let (center, right) = rest.split_right(300.0);
        assert_eq!(left.w, 280.0);
        assert_eq!(right.x, 700.0);
        assert_eq!(center, Rect::new(280.0, 24.0, 420.0, 600.0));
    }

    #[test]
    fn test_clamped_into_keeps_title_reachable() {
        let bounds = Rect::new(0.0, 24.0, 800.0, 600.0);
        let window = Rect::new(-500.0, -40.0, 300.0, 200.0).clamped_into(&bounds, 40.0);
        assert_eq!(window.x, -260.0);
        assert_eq!(window.y, 24.0);
        let window = Rect::new(900.0, 900.0, 300.0, 200.0).clamped_into(&bounds, 40.0);
        assert_eq!(window.x, 760.0);
        assert_eq!(window.y, 584.0);
    }
}
