//! Axis selectors
//!
//! [`Axis`] is the translate/scale/rotate constraint mask. Rectangle scaling
//! selects box faces and corners instead, which [`RectHandle`] models as a
//! separate type rather than overloading extra bits on the axis mask.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use glam::Vec3;

/// Bitmask of the directions a drag is constrained to (bitflags-style).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Axis(u16);

impl Axis {
    /// No constraint selected
    pub const NONE: Self = Self(0);
    /// World or local X
    pub const X: Self = Self(1);
    /// World or local Y
    pub const Y: Self = Self(1 << 1);
    /// World or local Z
    pub const Z: Self = Self(1 << 2);
    /// Free drag, no restriction
    pub const ALL: Self = Self(1 << 3);
    /// Plane spanned by X and Y
    pub const XY: Self = Self(Self::X.0 | Self::Y.0);
    /// Plane spanned by Y and Z
    pub const YZ: Self = Self(Self::Y.0 | Self::Z.0);
    /// Plane spanned by X and Z
    pub const XZ: Self = Self(Self::X.0 | Self::Z.0);

    const XYZ_BITS: u16 = Self::X.0 | Self::Y.0 | Self::Z.0;

    /// Raw bit value
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// True if every bit of `other` is set in `self`
    pub const fn contains(self, other: Axis) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    pub const fn is_all(self) -> bool {
        self.0 & Self::ALL.0 != 0
    }

    /// Number of X/Y/Z components selected
    pub const fn axis_count(self) -> u32 {
        (self.0 & Self::XYZ_BITS).count_ones()
    }

    /// Exactly one of X, Y or Z
    pub const fn is_single(self) -> bool {
        !self.is_all() && self.axis_count() == 1
    }

    /// More than one of X, Y and Z (a plane constraint)
    pub const fn is_multi(self) -> bool {
        self.axis_count() > 1
    }

    /// Unit vector for a single axis, zero otherwise
    pub fn direction(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
            _ => Vec3::ZERO,
        }
    }

    /// 1.0 for each selected component, 0.0 for the rest. `ALL` selects all three.
    pub fn mask(self) -> Vec3 {
        if self.is_all() {
            return Vec3::ONE;
        }
        Vec3::new(
            if self.contains(Axis::X) { 1.0 } else { 0.0 },
            if self.contains(Axis::Y) { 1.0 } else { 0.0 },
            if self.contains(Axis::Z) { 1.0 } else { 0.0 },
        )
    }

    /// For a two-axis plane, the axis perpendicular to it
    pub fn plane_normal_axis(self) -> Axis {
        match self {
            Axis::XY => Axis::Z,
            Axis::YZ => Axis::X,
            Axis::XZ => Axis::Y,
            _ => Axis::NONE,
        }
    }

    /// The two-axis plane perpendicular to a single axis
    pub fn perpendicular_plane(self) -> Axis {
        match self {
            Axis::X => Axis::YZ,
            Axis::Y => Axis::XZ,
            Axis::Z => Axis::XY,
            _ => Axis::NONE,
        }
    }
}

impl BitOr for Axis {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Axis {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("Axis(NONE)");
        }
        let mut parts = Vec::new();
        if self.contains(Axis::X) {
            parts.push("X");
        }
        if self.contains(Axis::Y) {
            parts.push("Y");
        }
        if self.contains(Axis::Z) {
            parts.push("Z");
        }
        if self.is_all() {
            parts.push("ALL");
        }
        write!(f, "Axis({})", parts.join("|"))
    }
}

/// Which side of the selection box a rectangle handle drags along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Side {
    /// This axis is not resized
    #[default]
    Fixed,
    /// The minimum face moves
    Min,
    /// The maximum face moves
    Max,
}

impl Side {
    /// -1 for `Min`, +1 for `Max`, 0 for `Fixed`
    pub fn sign(self) -> f32 {
        match self {
            Side::Fixed => 0.0,
            Side::Min => -1.0,
            Side::Max => 1.0,
        }
    }
}

/// A face (one moving side) or corner (three moving sides) of the selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct RectHandle {
    pub x: Side,
    pub y: Side,
    pub z: Side,
}

impl RectHandle {
    pub const fn new(x: Side, y: Side, z: Side) -> Self {
        Self { x, y, z }
    }

    pub fn sides(&self) -> [Side; 3] {
        [self.x, self.y, self.z]
    }

    /// Axes resized by this handle
    pub fn moved_axes(&self) -> Axis {
        let mut axis = Axis::NONE;
        if self.x != Side::Fixed {
            axis |= Axis::X;
        }
        if self.y != Side::Fixed {
            axis |= Axis::Y;
        }
        if self.z != Side::Fixed {
            axis |= Axis::Z;
        }
        axis
    }

    /// Per-axis sign vector (see [`Side::sign`])
    pub fn signs(&self) -> Vec3 {
        Vec3::new(self.x.sign(), self.y.sign(), self.z.sign())
    }

    pub fn is_corner(&self) -> bool {
        self.moved_axes().axis_count() == 3
    }

    /// Handle point on `min..max`: the moving faces' coordinates, center for fixed axes
    pub fn anchor(&self, min: Vec3, max: Vec3) -> Vec3 {
        let center = (min + max) * 0.5;
        let pick = |side: Side, lo: f32, hi: f32, mid: f32| match side {
            Side::Fixed => mid,
            Side::Min => lo,
            Side::Max => hi,
        };
        Vec3::new(
            pick(self.x, min.x, max.x, center.x),
            pick(self.y, min.y, max.y, center.y),
            pick(self.z, min.z, max.z, center.z),
        )
    }

    /// The six face handles followed by the eight corner handles
    pub fn catalog() -> Vec<RectHandle> {
        use Side::{Fixed, Max, Min};

        let mut handles = vec![
            RectHandle::new(Min, Fixed, Fixed),
            RectHandle::new(Max, Fixed, Fixed),
            RectHandle::new(Fixed, Min, Fixed),
            RectHandle::new(Fixed, Max, Fixed),
            RectHandle::new(Fixed, Fixed, Min),
            RectHandle::new(Fixed, Fixed, Max),
        ];
        for x in [Min, Max] {
            for y in [Min, Max] {
                for z in [Min, Max] {
                    handles.push(RectHandle::new(x, y, z));
                }
            }
        }
        handles
    }
}

/// The single thing a drag is currently bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum GizmoHandle {
    #[default]
    None,
    Axis(Axis),
    Rect(RectHandle),
}

impl GizmoHandle {
    pub fn is_none(&self) -> bool {
        match self {
            GizmoHandle::None => true,
            GizmoHandle::Axis(axis) => axis.is_none(),
            GizmoHandle::Rect(rect) => rect.moved_axes().is_none(),
        }
    }

    /// Axis mask of the handle; rectangle handles report their moved axes
    pub fn axis(&self) -> Axis {
        match self {
            GizmoHandle::None => Axis::NONE,
            GizmoHandle::Axis(axis) => *axis,
            GizmoHandle::Rect(rect) => rect.moved_axes(),
        }
    }
}

impl From<Axis> for GizmoHandle {
    fn from(axis: Axis) -> Self {
        if axis.is_none() {
            GizmoHandle::None
        } else {
            GizmoHandle::Axis(axis)
        }
    }
}
