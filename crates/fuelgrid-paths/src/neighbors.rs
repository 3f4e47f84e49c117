use fuelgrid_core::Point;

/// Cardinal step offsets in expansion order: west, east, north, south.
///
/// Search output depends on this order when several shortest routes exist.
pub const CARDINALS: [Point; 4] = [
    Point::new(-1, 0),
    Point::new(1, 0),
    Point::new(0, -1),
    Point::new(0, 1),
];

/// The four axis-aligned neighbours of `p`, in [`CARDINALS`] order.
#[inline]
pub fn cardinal(p: Point) -> impl Iterator<Item = Point> {
    CARDINALS.into_iter().map(move |d| p + d)
}
