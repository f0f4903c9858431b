//! Bounding boxes and the fetch grid.

/// Latitude bands in the fetch grid.
const GRID_ROWS: usize = 3;

/// Longitude bands in the fetch grid.
const GRID_COLS: usize = 4;

/// An axis-aligned latitude/longitude rectangle.
///
/// Invariant: `min <= max` on both axes, enforced at construction. Fields
/// stay private so a box can never be reordered after it is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl BoundingBox {
    /// Creates a box from its south-west and north-east corners.
    ///
    /// # Panics
    ///
    /// Panics if `min_lat > max_lat` or `min_lon > max_lon`. Callers build
    /// boxes from fixed tables or from already-validated boxes, so a
    /// violation is a programming error, not an input error.
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        assert!(
            min_lat <= max_lat && min_lon <= max_lon,
            "bounding box requires min <= max on both axes"
        );
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Formats the box as the `south,west,north,east` string Overpass
    /// expects inside a query.
    pub fn overpass_bounds(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }

    /// Splits the box into a 3x4 grid of sub-boxes, row-major from the
    /// south-west corner.
    ///
    /// The remote endpoint caps response size and time, so one large box is
    /// traded for twelve small, independently retryable windows. Adjacent
    /// cells share their edge values and the outermost edges are the input
    /// bounds themselves, so the union reconstructs the box exactly.
    pub fn split_grid(&self) -> Vec<BoundingBox> {
        let lat_edges = axis_edges(self.min_lat, self.max_lat, GRID_ROWS);
        let lon_edges = axis_edges(self.min_lon, self.max_lon, GRID_COLS);

        let mut cells = Vec::with_capacity(GRID_ROWS * GRID_COLS);
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                cells.push(BoundingBox::new(
                    lat_edges[row],
                    lon_edges[col],
                    lat_edges[row + 1],
                    lon_edges[col + 1],
                ));
            }
        }
        cells
    }
}

/// Returns `count + 1` cut points from `min` to `max`.
///
/// The last edge is pinned to `max` rather than computed, so the grid's
/// outer boundary matches the input even when the step is not exactly
/// representable.
fn axis_edges(min: f64, max: f64, count: usize) -> Vec<f64> {
    let step = (max - min) / count as f64;
    let mut edges: Vec<f64> = (0..count).map(|i| min + step * i as f64).collect();
    edges.push(max);
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_box() -> BoundingBox {
        BoundingBox::new(41.7, -90.5, 47.5, -82.4)
    }

    #[test]
    fn test_grid_has_twelve_cells() {
        assert_eq!(state_box().split_grid().len(), 12);
    }

    #[test]
    fn test_grid_union_matches_input_bounds_exactly() {
        let input = state_box();
        let cells = input.split_grid();

        let min_lat = cells.iter().map(|c| c.min_lat()).fold(f64::INFINITY, f64::min);
        let min_lon = cells.iter().map(|c| c.min_lon()).fold(f64::INFINITY, f64::min);
        let max_lat = cells
            .iter()
            .map(|c| c.max_lat())
            .fold(f64::NEG_INFINITY, f64::max);
        let max_lon = cells
            .iter()
            .map(|c| c.max_lon())
            .fold(f64::NEG_INFINITY, f64::max);

        assert_eq!(min_lat, input.min_lat());
        assert_eq!(min_lon, input.min_lon());
        assert_eq!(max_lat, input.max_lat());
        assert_eq!(max_lon, input.max_lon());
    }

    #[test]
    fn test_grid_is_row_major_from_south_west() {
        let input = state_box();
        let cells = input.split_grid();

        assert_eq!(cells[0].min_lat(), input.min_lat());
        assert_eq!(cells[0].min_lon(), input.min_lon());
        assert_eq!(cells[11].max_lat(), input.max_lat());
        assert_eq!(cells[11].max_lon(), input.max_lon());
        assert!(cells[1].min_lon() > cells[0].min_lon());
        assert!(cells[4].min_lat() > cells[0].min_lat());
    }

    #[test]
    fn test_adjacent_cells_share_edge_values() {
        let cells = state_box().split_grid();

        // east edge of a cell is the west edge of its right neighbor
        assert_eq!(cells[0].max_lon(), cells[1].min_lon());
        assert_eq!(cells[5].max_lon(), cells[6].min_lon());
        // north edge of a cell is the south edge of the cell above (stride 4)
        assert_eq!(cells[0].max_lat(), cells[4].min_lat());
        assert_eq!(cells[7].max_lat(), cells[11].min_lat());
    }

    #[test]
    fn test_grid_cells_do_not_overlap() {
        let cells = state_box().split_grid();
        for (i, a) in cells.iter().enumerate() {
            for b in cells.iter().skip(i + 1) {
                let lat_overlap = a.min_lat() < b.max_lat() && b.min_lat() < a.max_lat();
                let lon_overlap = a.min_lon() < b.max_lon() && b.min_lon() < a.max_lon();
                assert!(
                    !(lat_overlap && lon_overlap),
                    "cells {:?} and {:?} overlap",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_overpass_bounds_format() {
        let bbox = BoundingBox::new(41.7, -87.0, 45.9, -82.4);
        assert_eq!(bbox.overpass_bounds(), "41.7,-87,45.9,-82.4");
    }

    #[test]
    #[should_panic(expected = "min <= max")]
    fn test_reversed_bounds_panic() {
        BoundingBox::new(47.5, -90.5, 41.7, -82.4);
    }
}
