use geo::{BoundingRect, Coord, LineString, Rect};

/// Builds a line from `coords`, dropping every vertex whose planar
/// (degree-space) distance from its immediate predecessor in `coords` is
/// below `epsilon`.
///
/// The first vertex is always kept.
///
/// ```rust
/// use geo::coord;
/// use waymark_geo::collapse_vertices;
///
/// let line = collapse_vertices(
///     [
///         coord! { x: 127.0, y: 35.0 },
///         coord! { x: 127.000001, y: 35.0 },
///         coord! { x: 127.001, y: 35.0 },
///     ],
///     1e-5,
/// );
///
/// assert_eq!(line.0.len(), 2);
/// ```
pub fn collapse_vertices(coords: impl IntoIterator<Item = Coord>, epsilon: f64) -> LineString {
    let mut kept: Vec<Coord> = Vec::new();
    let mut previous: Option<Coord> = None;

    for coord in coords {
        match previous {
            Some(prev) if (coord.x - prev.x).hypot(coord.y - prev.y) < epsilon => {}
            _ => kept.push(coord),
        }
        previous = Some(coord);
    }

    LineString::new(kept)
}

/// The bounding box of a line, or `None` for an empty line.
#[inline]
pub fn bounds(line: &LineString) -> Option<Rect> {
    line.bounding_rect()
}
