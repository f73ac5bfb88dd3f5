use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Per-axis tolerance used by `Vector2` equality.
pub const VECTOR_PRECISION: f64 = 0.00001;

/// A 2D vector with double precision coordinates.
///
/// Every transforming method returns a new value. The only ways to change a
/// vector in place are the compound-assignment operators (`+=`, `-=`, `*=`, `/=`)
/// and the coordinate setters.
///
/// Equality is tolerant: two vectors are equal when each coordinate differs by
/// less than [`VECTOR_PRECISION`]. Vectors holding NaN are never equal to anything.
///
/// There is deliberately no `PartialOrd` impl. Use [`Vector2::cmp_by_length`] or
/// wrap the vector in [`ByLength`] when an ordering is needed (e.g. as a map key).
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct Vector2 {
    x: f64,
    y: f64,
}

impl Vector2 {
    /// Creates a new Vector2.
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// Creates a zero vector.
    pub const fn zero() -> Self {
        Vector2 { x: 0.0, y: 0.0 }
    }

    /// Creates the unit vector pointing at `radians` from the positive x-axis.
    pub fn from_angle(radians: f64) -> Self {
        Vector2::new(radians.cos(), radians.sin())
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Replaces the x coordinate, leaving y untouched.
    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    /// Replaces the y coordinate, leaving x untouched.
    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    /// Calculates the dot product with another vector.
    pub fn dot(&self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product. Positive when `other` lies counter-clockwise of `self`
    /// in a y-up frame.
    pub fn cross(&self, other: Vector2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Calculates the squared length of the vector.
    pub fn length2(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Calculates the length (magnitude) of the vector.
    pub fn length(&self) -> f64 {
        self.length2().sqrt()
    }

    /// Calculates the squared distance to another vector (point).
    ///
    /// Prefer this over [`Vector2::dist`] when only the relative order of
    /// distances matters, since it skips the square root.
    pub fn dist2(&self, other: Vector2) -> f64 {
        (*self - other).length2()
    }

    /// Calculates the distance to another vector (point).
    pub fn dist(&self, other: Vector2) -> f64 {
        self.dist2(other).sqrt()
    }

    /// Angle from the positive x-axis, as returned by `atan2(y, x)`.
    ///
    /// In screen space (y grows downward) vectors with a positive y have a
    /// negative angle. The zero vector yields 0, which carries no meaning.
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// True iff neither coordinate is NaN.
    #[allow(clippy::eq_op)]
    pub fn is_not_nan(&self) -> bool {
        self.x == self.x && self.y == self.y
    }

    /// Tolerant comparison against the zero vector.
    pub fn is_zero(&self) -> bool {
        *self == Vector2::zero()
    }

    /// Scales the vector by a scalar value.
    pub fn scale(&self, scalar: f64) -> Self {
        Vector2 { x: self.x * scalar, y: self.y * scalar }
    }

    /// Returns a unit vector with the same direction.
    /// Returns the zero vector if the length is exactly zero.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Vector2::zero();
        }
        let inv_len = 1.0 / len;
        Vector2 { x: self.x * inv_len, y: self.y * inv_len }
    }

    /// Returns a vector with the same direction and the given length.
    /// A zero vector has no direction, so it stretches along the positive x-axis.
    pub fn stretch_to_length(&self, desired: f64) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Vector2::new(desired, 0.0);
        }
        let frac = desired / len;
        Vector2 { x: self.x * frac, y: self.y * frac }
    }

    /// Rotates the vector about the origin (counter-clockwise in a y-up frame,
    /// clockwise on screen).
    pub fn rotate(&self, radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Vector2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// Linear interpolation between `self` (factor 0) and `other` (factor 1).
    ///
    /// Factors outside `[0, 1]` extrapolate; nothing is clamped.
    ///
    /// ```
    /// use platformer_common::Vector2;
    /// let halfway = Vector2::zero().lerp(Vector2::new(1.0, -2.0), 0.5);
    /// assert_eq!(halfway, Vector2::new(0.5, -1.0));
    /// ```
    pub fn lerp(&self, other: Vector2, factor: f64) -> Self {
        self.scale(1.0 - factor) + other.scale(factor)
    }

    /// Closest point to `self` on the segment `[line_a, line_b]`.
    ///
    /// A degenerate segment (`line_a == line_b`) divides by zero and the result
    /// is not finite.
    pub fn project(&self, line_a: Vector2, line_b: Vector2) -> Self {
        let ab = line_b - line_a;
        let ap = *self - line_a;
        let t = ap.dot(ab) / ab.dot(ab);
        if t < 0.0 {
            line_a
        } else if t > 1.0 {
            line_b
        } else {
            line_a + ab.scale(t)
        }
    }

    /// Vector projection onto the infinite line through the origin along `onto`.
    /// A zero `onto` divides by zero.
    pub fn project2(&self, onto: Vector2) -> Self {
        onto.scale(self.dot(onto) / onto.dot(onto))
    }

    /// Compares lengths. `None` if either length is NaN.
    pub fn cmp_by_length(&self, other: &Vector2) -> Option<Ordering> {
        self.length().partial_cmp(&other.length())
    }

    /// True iff `self` is strictly shorter than `other`. Two vectors of equal
    /// length are never shorter than each other, whatever their direction.
    pub fn is_shorter_than(&self, other: &Vector2) -> bool {
        self.length() < other.length()
    }

    /// Writes `{ x = <x>, y = <y> }` to the sink.
    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }
}

impl PartialEq for Vector2 {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < VECTOR_PRECISION && (self.y - other.y).abs() < VECTOR_PRECISION
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ x = {}, y = {} }}", self.x, self.y)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vector2::new(x, y)
    }
}

impl From<[f64; 2]> for Vector2 {
    fn from(value: [f64; 2]) -> Self {
        Vector2::new(value[0], value[1])
    }
}

impl From<Vector2> for (f64, f64) {
    fn from(value: Vector2) -> Self {
        (value.x, value.y)
    }
}

/// Orders vectors by length so they can key a `BTreeMap`/`BTreeSet`.
///
/// Vectors of equal length are equivalent keys, whatever their direction.
/// NaN lengths sort with `f64::total_cmp`.
#[derive(Debug, Copy, Clone)]
pub struct ByLength(pub Vector2);

impl PartialEq for ByLength {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ByLength {}

impl PartialOrd for ByLength {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByLength {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.length().total_cmp(&other.0.length())
    }
}

// Implement standard operators. Scalar `+`/`-` shift both coordinates;
// only `*`/`/` scale.
impl Add for Vector2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Add<f64> for Vector2 {
    type Output = Self;
    fn add(self, scalar: f64) -> Self {
        Self { x: self.x + scalar, y: self.y + scalar }
    }
}

impl Sub for Vector2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Sub<f64> for Vector2 {
    type Output = Self;
    fn sub(self, scalar: f64) -> Self {
        Self { x: self.x - scalar, y: self.y - scalar }
    }
}

impl Mul for Vector2 {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        Self { x: self.x * other.x, y: self.y * other.y }
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        self.scale(scalar)
    }
}

impl Div for Vector2 {
    type Output = Self;
    /// Component-wise. A zero component in `other` gives an infinite or NaN coordinate.
    fn div(self, other: Self) -> Self {
        Self { x: self.x / other.x, y: self.y / other.y }
    }
}

impl Div<f64> for Vector2 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self { x: self.x / scalar, y: self.y / scalar }
    }
}

impl Neg for Vector2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl AddAssign<f64> for Vector2 {
    fn add_assign(&mut self, scalar: f64) {
        self.x += scalar;
        self.y += scalar;
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl SubAssign<f64> for Vector2 {
    fn sub_assign(&mut self, scalar: f64) {
        self.x -= scalar;
        self.y -= scalar;
    }
}

impl MulAssign for Vector2 {
    fn mul_assign(&mut self, other: Self) {
        self.x *= other.x;
        self.y *= other.y;
    }
}

impl MulAssign<f64> for Vector2 {
    fn mul_assign(&mut self, scalar: f64) {
        self.x *= scalar;
        self.y *= scalar;
    }
}

impl DivAssign for Vector2 {
    fn div_assign(&mut self, other: Self) {
        self.x /= other.x;
        self.y /= other.y;
    }
}

impl DivAssign<f64> for Vector2 {
    fn div_assign(&mut self, scalar: f64) {
        self.x /= scalar;
        self.y /= scalar;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::{ApproxEq, F64Margin};
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn margin() -> F64Margin {
        F64Margin { epsilon: 1e-9, ulps: 4 }
    }

    fn arb_vector() -> impl Strategy<Value = Vector2> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Vector2::new(x, y))
    }

    fn arb_nonzero_vector() -> impl Strategy<Value = Vector2> {
        arb_vector().prop_filter("non-zero length", |v| v.length() > 1e-3)
    }

    proptest! {
        #[test]
        fn addition_and_multiplication_commute(a in arb_vector(), b in arb_vector()) {
            prop_assert_eq!(a + b, b + a);
            prop_assert_eq!(a * b, b * a);
        }

        #[test]
        fn additive_identity_and_inverse(a in arb_vector()) {
            prop_assert_eq!(a + Vector2::zero(), a);
            prop_assert_eq!(a + a.scale(-1.0), Vector2::zero());
            prop_assert_eq!(a + (-a), Vector2::zero());
        }

        #[test]
        fn normalize_gives_unit_length_and_keeps_angle(a in arb_nonzero_vector()) {
            let n = a.normalize();
            prop_assert!(n.length().approx_eq(1.0, margin()));
            prop_assert!(n.angle().approx_eq(a.angle(), margin()));
        }

        #[test]
        fn dot_is_symmetric_and_cross_antisymmetric(a in arb_vector(), b in arb_vector()) {
            prop_assert_eq!(a.dot(b), b.dot(a));
            prop_assert_eq!(a.cross(b), -b.cross(a));
        }

        #[test]
        fn distance_is_symmetric(a in arb_vector(), b in arb_vector()) {
            prop_assert_eq!(a.dist(b), b.dist(a));
            let d = a.dist(b);
            let wide = F64Margin { epsilon: 1e-6, ulps: 4 };
            prop_assert!(a.dist2(b).approx_eq(d * d, wide));
        }

        #[test]
        fn lerp_hits_both_endpoints(a in arb_vector(), b in arb_vector()) {
            prop_assert_eq!(a.lerp(b, 0.0), a);
            prop_assert_eq!(a.lerp(b, 1.0), b);
        }

        #[test]
        fn stretch_sets_length(a in arb_nonzero_vector(), len in 0.1f64..100.0) {
            let s = a.stretch_to_length(len);
            prop_assert!(s.length().approx_eq(len, margin()));
            prop_assert!(s.normalize() == a.normalize());
        }
    }

    #[test]
    fn zero_length_edge_cases() {
        assert_eq!(Vector2::zero().normalize(), Vector2::zero());
        assert!(Vector2::zero().normalize().is_not_nan());
        assert_eq!(Vector2::zero().stretch_to_length(5.0), Vector2::new(5.0, 0.0));
        assert_eq!(Vector2::zero().angle(), 0.0);
    }

    #[test]
    fn lerp_midpoint_and_extrapolation() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(1.0, -2.0);
        assert_eq!(a.lerp(b, 0.5), Vector2::new(0.5, -1.0));
        assert_eq!(a.lerp(b, 2.0), Vector2::new(2.0, -4.0));
        assert_eq!(a.lerp(b, -1.0), Vector2::new(-1.0, 2.0));
    }

    #[test]
    fn segment_projection_clamps_to_endpoints() {
        let line_a = Vector2::new(0.0, 0.0);
        let line_b = Vector2::new(10.0, 0.0);
        assert_eq!(Vector2::new(20.0, 5.0).project(line_a, line_b), line_b);
        assert_eq!(Vector2::new(-5.0, 5.0).project(line_a, line_b), line_a);
        assert_eq!(Vector2::new(5.0, 5.0).project(line_a, line_b), Vector2::new(5.0, 0.0));
    }

    #[test]
    fn degenerate_segment_projection_is_not_finite() {
        let p = Vector2::new(1.0, 1.0);
        let a = Vector2::new(3.0, 3.0);
        assert!(!p.project(a, a).is_not_nan());
    }

    #[test]
    fn project2_onto_direction() {
        let v = Vector2::new(3.0, 4.0);
        assert_eq!(v.project2(Vector2::new(2.0, 0.0)), Vector2::new(3.0, 0.0));
        assert_eq!(v.project2(Vector2::new(1.0, 1.0)), Vector2::new(3.5, 3.5));
        assert!(!v.project2(Vector2::zero()).is_not_nan());
    }

    #[test]
    fn rotation_by_quarter_turn() {
        assert_eq!(Vector2::new(1.0, 0.0).rotate(FRAC_PI_2), Vector2::new(0.0, 1.0));
        assert_eq!(Vector2::new(0.0, 2.0).rotate(PI), Vector2::new(0.0, -2.0));
    }

    #[test]
    fn angle_follows_atan2() {
        assert_eq!(Vector2::new(1.0, 0.0).angle(), 0.0);
        assert!(Vector2::new(0.0, 1.0).angle().approx_eq(FRAC_PI_2, margin()));
        assert!(Vector2::new(0.0, -1.0).angle() < 0.0);
        assert_eq!(Vector2::from_angle(FRAC_PI_2), Vector2::new(0.0, 1.0));
    }

    #[test]
    fn equality_uses_per_axis_tolerance() {
        assert_eq!(Vector2::new(1.0, 1.0), Vector2::new(1.0 + 0.000001, 1.0));
        assert_ne!(Vector2::new(1.0, 1.0), Vector2::new(1.0 + 0.001, 1.0));
        // Each axis within tolerance even though the combined offset is larger.
        let d = VECTOR_PRECISION * 0.9;
        assert_eq!(Vector2::new(0.0, 0.0), Vector2::new(d, d));
        assert!(Vector2::new(0.0, 0.000001).is_zero());
    }

    #[test]
    fn nan_is_never_equal() {
        let nan = Vector2::new(f64::NAN, 0.0);
        assert_ne!(nan, nan);
    }

    #[test]
    fn ordering_by_length() {
        let a = Vector2::new(3.0, 4.0);
        assert!(a.is_shorter_than(&Vector2::new(0.0, 10.0)));
        assert!(!a.is_shorter_than(&Vector2::new(4.0, 3.0)));
        assert!(!Vector2::new(4.0, 3.0).is_shorter_than(&a));
        assert_eq!(a.cmp_by_length(&Vector2::new(4.0, 3.0)), Some(Ordering::Equal));
        assert_eq!(Vector2::new(f64::NAN, 0.0).cmp_by_length(&a), None);
    }

    #[test]
    fn by_length_keys_a_map() {
        let mut map = BTreeMap::new();
        map.insert(ByLength(Vector2::new(0.0, 10.0)), "long");
        map.insert(ByLength(Vector2::new(3.0, 4.0)), "short");
        // Same length as (3, 4), so it replaces that entry.
        map.insert(ByLength(Vector2::new(4.0, 3.0)), "also short");
        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(values, vec!["also short", "long"]);
    }

    #[test]
    fn zero_over_zero_is_nan() {
        let v = Vector2::zero() / Vector2::zero();
        assert!(!v.is_not_nan());
        assert!(Vector2::new(1.0, 2.0).is_not_nan());
    }

    #[test]
    fn scalar_add_shifts_both_coordinates() {
        let v = Vector2::new(1.0, 2.0);
        assert_eq!(v + 1.0, Vector2::new(2.0, 3.0));
        assert_eq!(v - 1.0, Vector2::new(0.0, 1.0));
        assert_eq!(v * 2.0, v.scale(2.0));
        assert_eq!(v / 2.0, Vector2::new(0.5, 1.0));
        assert_eq!(v / Vector2::new(2.0, 4.0), Vector2::new(0.5, 0.5));
    }

    #[test]
    fn compound_assignment_mutates_in_place() {
        let mut v = Vector2::new(1.0, 2.0);
        v += Vector2::new(1.0, 1.0);
        assert_eq!(v, Vector2::new(2.0, 3.0));
        v += 1.0;
        assert_eq!(v, Vector2::new(3.0, 4.0));
        v -= Vector2::new(1.0, 1.0);
        assert_eq!(v, Vector2::new(2.0, 3.0));
        v -= 1.0;
        assert_eq!(v, Vector2::new(1.0, 2.0));
        v *= Vector2::new(3.0, 0.5);
        assert_eq!(v, Vector2::new(3.0, 1.0));
        v *= 2.0;
        assert_eq!(v, Vector2::new(6.0, 2.0));
        v /= 2.0;
        assert_eq!(v, Vector2::new(3.0, 1.0));
        v /= Vector2::new(3.0, 0.0);
        assert_eq!(v.x(), 1.0);
        assert!(v.y().is_infinite());
    }

    #[test]
    fn setters_touch_one_coordinate() {
        let mut v = Vector2::new(1.0, 2.0);
        v.set_x(5.0);
        assert_eq!((v.x(), v.y()), (5.0, 2.0));
        v.set_y(-1.0);
        assert_eq!((v.x(), v.y()), (5.0, -1.0));
    }

    #[test]
    fn text_representation() {
        let v = Vector2::new(1.5, -2.0);
        assert_eq!(v.to_string(), "{ x = 1.5, y = -2 }");
        let mut out = Vec::new();
        v.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{ x = 1.5, y = -2 }");
    }

    #[test]
    fn conversions() {
        let v: Vector2 = (1.0, 2.0).into();
        assert_eq!(v, Vector2::from([1.0, 2.0]));
        let t: (f64, f64) = v.into();
        assert_eq!(t, (1.0, 2.0));
        assert_eq!(Vector2::default(), Vector2::zero());
    }
}
