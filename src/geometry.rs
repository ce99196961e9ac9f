use log::debug;

use crate::error::SheetError;
use crate::types::{Point, Px, Size};

pub const DEFAULT_CELL_RATIO: f64 = 1.5;

// Neither grid dimension may exceed the other by more than 30%.
const MAX_SKEW: f64 = 1.3;
// 2.5% margin on each side of the surface.
const USABLE_FRACTION: f64 = 0.95;
const MAX_TABLES: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub num_questions: u32,
    pub num_choices: u32,
    pub num_tables: u32,
    pub questions_per_table: Vec<u32>,
    pub num_rows: u32,
    pub num_columns: u32,
    pub total_rows: u32,
    pub total_columns: u32,
    pub cell_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: Px,
    pub height: Px,
}

impl Geometry {
    /// Cell dimensions for this geometry on the given surface. Sized from
    /// the width first; recomputed from the height when the grid would
    /// overflow vertically, so it never exceeds either usable dimension.
    pub fn cell_size(&self, surface: Size) -> Result<CellSize, SheetError> {
        let usable_width = USABLE_FRACTION * surface.width.to_f64();
        let usable_height = USABLE_FRACTION * surface.height.to_f64();
        let mut cell_width = (usable_width / self.total_columns as f64).floor();
        let mut cell_height = (cell_width / self.cell_ratio).floor();
        if cell_height * self.total_rows as f64 > usable_height {
            cell_height = (usable_height / self.total_rows as f64).floor();
            cell_width = (cell_height * self.cell_ratio).floor();
            debug!(
                "grid is height-bound: cell {}x{} for {} rows",
                cell_width, cell_height, self.total_rows
            );
        }
        if cell_width < 1.0 || cell_height < 1.0 {
            return Err(SheetError::SurfaceTooSmall {
                width: surface.width.to_i32(),
                height: surface.height.to_i32(),
                total_columns: self.total_columns,
                total_rows: self.total_rows,
            });
        }
        Ok(CellSize {
            width: Px::from_f64(cell_width),
            height: Px::from_f64(cell_height),
        })
    }

    /// Top-left anchor that centers the full grid on the surface.
    pub fn top_left_corner(&self, cell: CellSize, surface: Size) -> Point {
        Point::new(
            (surface.width - cell.width * self.total_columns as i32) / 2,
            (surface.height - cell.height * self.total_rows as i32) / 2,
        )
    }
}

#[derive(Debug, Clone)]
pub struct GeometryAnalyzer {
    target_cell_ratio: f64,
}

impl Default for GeometryAnalyzer {
    fn default() -> Self {
        Self {
            target_cell_ratio: DEFAULT_CELL_RATIO,
        }
    }
}

impl GeometryAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_ratio(mut self, ratio: f64) -> Self {
        if ratio.is_finite() && ratio > 0.0 {
            self.target_cell_ratio = ratio;
        }
        self
    }

    pub fn target_ratio(&self) -> f64 {
        self.target_cell_ratio
    }

    /// Evaluates every supported table count and returns the layout whose
    /// cell ratio lands closest to the target; the lowest table count wins
    /// ties. Table counts above the question count are never tried.
    pub fn best_geometry(
        &self,
        num_questions: u32,
        num_choices: u32,
    ) -> Result<Geometry, SheetError> {
        let max_tables = MAX_TABLES.min(num_questions);
        let mut best = self.fit(num_questions, num_choices, 1)?;
        let mut best_dist = (best.cell_ratio - self.target_cell_ratio).abs();
        for num_tables in 2..=max_tables {
            let candidate = self.fit(num_questions, num_choices, num_tables)?;
            let dist = (candidate.cell_ratio - self.target_cell_ratio).abs();
            if dist < best_dist {
                best_dist = dist;
                best = candidate;
            }
        }
        debug!(
            "{} questions x {} choices: {} table(s), cell ratio {:.3}",
            num_questions, num_choices, best.num_tables, best.cell_ratio
        );
        Ok(best)
    }

    /// Lays out the questions over exactly `num_tables` side-by-side tables.
    pub fn fit(
        &self,
        num_questions: u32,
        num_choices: u32,
        num_tables: u32,
    ) -> Result<Geometry, SheetError> {
        if num_questions == 0 {
            return Err(SheetError::NoQuestions);
        }
        if num_choices == 0 {
            return Err(SheetError::NoChoices);
        }
        if num_tables == 0 || num_tables > MAX_TABLES {
            return Err(SheetError::UnsupportedTableCount(num_tables));
        }
        if num_tables > num_questions {
            return Err(SheetError::EmptyTable {
                num_questions,
                num_tables,
            });
        }

        let questions_per_table = questions_per_table(num_questions, num_tables);
        let num_rows = questions_per_table.iter().copied().max().unwrap_or(1);
        let num_columns = num_tables
            .checked_mul(num_choices)
            .ok_or(SheetError::SheetTooLarge)?;
        // header row + two calibration rows
        let total_rows = num_rows.checked_add(3).ok_or(SheetError::SheetTooLarge)?;
        // one numbering column per table
        let total_columns = num_columns
            .checked_add(num_tables)
            .ok_or(SheetError::SheetTooLarge)?;
        let target = self.target_cell_ratio;
        let actual_ratio = target * num_columns as f64 / num_rows as f64;
        let cell_ratio = if actual_ratio > MAX_SKEW {
            // Grid would be too wide; narrow the cells.
            MAX_SKEW * num_rows as f64 / num_columns as f64
        } else if actual_ratio < 1.0 / MAX_SKEW {
            // Grid would be too tall; widen the cells.
            (1.0 / MAX_SKEW) * num_rows as f64 / num_columns as f64
        } else {
            target
        };

        Ok(Geometry {
            num_questions,
            num_choices,
            num_tables,
            questions_per_table,
            num_rows,
            num_columns,
            total_rows,
            total_columns,
            cell_ratio,
        })
    }
}

// Even split; the first `remainder` tables take one extra question.
fn questions_per_table(num_questions: u32, num_tables: u32) -> Vec<u32> {
    let base = num_questions / num_tables;
    let remainder = num_questions % num_tables;
    (0..num_tables)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(geometry: &Geometry, target: f64) -> f64 {
        (geometry.cell_ratio - target).abs()
    }

    #[test]
    fn questions_split_evenly_with_remainder_first() {
        assert_eq!(questions_per_table(20, 3), vec![7, 7, 6]);
        assert_eq!(questions_per_table(9, 4), vec![3, 2, 2, 2]);
        assert_eq!(questions_per_table(8, 2), vec![4, 4]);
        for num_questions in 1..=120u32 {
            for num_tables in 1..=4u32.min(num_questions) {
                let split = questions_per_table(num_questions, num_tables);
                assert_eq!(split.iter().sum::<u32>(), num_questions);
                let max = split.iter().copied().max().unwrap();
                let min = split.iter().copied().min().unwrap();
                assert!(max - min <= 1);
            }
        }
    }

    #[test]
    fn fit_computes_row_and_column_totals() {
        let geometry = GeometryAnalyzer::new().fit(20, 4, 2).unwrap();
        assert_eq!(geometry.num_rows, 10);
        assert_eq!(geometry.num_columns, 8);
        assert_eq!(geometry.total_rows, 13);
        assert_eq!(geometry.total_columns, 10);
        assert_eq!(geometry.cell_ratio, DEFAULT_CELL_RATIO);
    }

    #[test]
    fn fit_narrows_cells_of_wide_grids() {
        // 4 rows versus 8 columns: unclamped the grid would be 3x wider
        // than tall.
        let geometry = GeometryAnalyzer::new().fit(4, 8, 1).unwrap();
        assert!((geometry.cell_ratio - 1.3 * 4.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn fit_widens_cells_of_tall_grids() {
        let geometry = GeometryAnalyzer::new().fit(40, 4, 1).unwrap();
        assert!((geometry.cell_ratio - (1.0 / 1.3) * 40.0 / 4.0).abs() < 1e-12);
        // Clamping can push the ratio past the target from below as well.
        let slightly_tall = GeometryAnalyzer::new().fit(2, 1, 1).unwrap();
        assert!(slightly_tall.cell_ratio > DEFAULT_CELL_RATIO);
    }

    #[test]
    fn fit_rejects_bad_input() {
        let analyzer = GeometryAnalyzer::new();
        assert!(matches!(analyzer.fit(0, 4, 1), Err(SheetError::NoQuestions)));
        assert!(matches!(analyzer.fit(4, 0, 1), Err(SheetError::NoChoices)));
        assert!(matches!(
            analyzer.fit(4, 4, 0),
            Err(SheetError::UnsupportedTableCount(0))
        ));
        assert!(matches!(
            analyzer.fit(4, 4, 5),
            Err(SheetError::UnsupportedTableCount(5))
        ));
        assert!(matches!(
            analyzer.fit(2, 4, 3),
            Err(SheetError::EmptyTable {
                num_questions: 2,
                num_tables: 3
            })
        ));
    }

    #[test]
    fn oversized_grids_are_rejected_not_wrapped() {
        let analyzer = GeometryAnalyzer::new();
        // Row total would exceed u32.
        assert!(matches!(
            analyzer.fit(u32::MAX, 1, 1),
            Err(SheetError::SheetTooLarge)
        ));
        // Column product overflows at the four-table candidate.
        assert!(matches!(
            analyzer.best_geometry(4, 1 << 30),
            Err(SheetError::SheetTooLarge)
        ));
        // The largest representable single-table grid still fits.
        assert!(analyzer.fit(u32::MAX - 3, 1, 1).is_ok());
    }

    #[test]
    fn best_geometry_picks_the_closest_ratio() {
        // 20x4 fits two tables at exactly the default ratio.
        let geometry = GeometryAnalyzer::new().best_geometry(20, 4).unwrap();
        assert_eq!(geometry.num_tables, 2);
        assert_eq!(geometry.cell_ratio, DEFAULT_CELL_RATIO);

        // 100x4 needs all four tables to get back into the ratio band.
        let geometry = GeometryAnalyzer::new().best_geometry(100, 4).unwrap();
        assert_eq!(geometry.num_tables, 4);
        assert_eq!(geometry.questions_per_table, vec![25, 25, 25, 25]);
        assert_eq!(geometry.cell_ratio, DEFAULT_CELL_RATIO);
    }

    #[test]
    fn best_geometry_never_goes_past_the_question_count() {
        let geometry = GeometryAnalyzer::new().best_geometry(2, 4).unwrap();
        assert_eq!(geometry.num_tables, 1);
        let geometry = GeometryAnalyzer::new().best_geometry(1, 1).unwrap();
        assert_eq!(geometry.num_tables, 1);
        assert_eq!(geometry.questions_per_table, vec![1]);
    }

    #[test]
    fn cell_ratio_never_increases_with_more_tables() {
        let analyzer = GeometryAnalyzer::new();
        for num_questions in 1..=200u32 {
            for num_choices in 1..=8u32 {
                let mut previous: Option<f64> = None;
                for num_tables in 1..=4u32.min(num_questions) {
                    let ratio = analyzer
                        .fit(num_questions, num_choices, num_tables)
                        .unwrap()
                        .cell_ratio;
                    if let Some(previous) = previous {
                        assert!(
                            ratio <= previous + 1e-9,
                            "ratio rose from {previous} to {ratio} at \
                             {num_questions}x{num_choices}, {num_tables} tables"
                        );
                    }
                    previous = Some(ratio);
                }
            }
        }
    }

    #[test]
    fn greedy_scan_matches_exhaustive_minimum() {
        // An early-exit walk would stop at the first non-improving
        // candidate; the exhaustive scan must agree with it everywhere for
        // that stop to be sound.
        let analyzer = GeometryAnalyzer::new();
        for num_questions in 1..=200u32 {
            for num_choices in 1..=8u32 {
                let exhaustive = analyzer.best_geometry(num_questions, num_choices).unwrap();

                let mut greedy: Option<(f64, u32)> = None;
                for num_tables in 1..=4u32.min(num_questions) {
                    let candidate = analyzer
                        .fit(num_questions, num_choices, num_tables)
                        .unwrap();
                    let d = dist(&candidate, DEFAULT_CELL_RATIO);
                    match greedy {
                        Some((best, _)) if d >= best => break,
                        _ => greedy = Some((d, num_tables)),
                    }
                }
                let (_, greedy_tables) = greedy.unwrap();
                assert_eq!(
                    exhaustive.num_tables, greedy_tables,
                    "divergence at {num_questions}x{num_choices}"
                );
            }
        }
    }

    #[test]
    fn cell_size_is_pixel_exact_on_a_known_surface() {
        let geometry = GeometryAnalyzer::new().best_geometry(20, 4).unwrap();
        let cell = geometry.cell_size(Size::new(800, 600)).unwrap();
        assert_eq!(cell.width, Px::from_i32(64));
        assert_eq!(cell.height, Px::from_i32(43));
        let corner = geometry.top_left_corner(cell, Size::new(800, 600));
        assert_eq!(corner.x, Px::from_i32(80));
        assert_eq!(corner.y, Px::from_i32(20));
    }

    #[test]
    fn cell_size_stays_inside_the_usable_area() {
        let analyzer = GeometryAnalyzer::new();
        let surfaces = [
            Size::new(800, 600),
            Size::new(600, 800),
            Size::new(595, 842),
            Size::new(1240, 1754),
            Size::new(320, 240),
        ];
        for &surface in &surfaces {
            for num_questions in [1, 7, 20, 55, 120] {
                for num_choices in [1, 3, 4, 6] {
                    let geometry = analyzer.best_geometry(num_questions, num_choices).unwrap();
                    let Ok(cell) = geometry.cell_size(surface) else {
                        continue;
                    };
                    let grid_width = cell.width.to_f64() * geometry.total_columns as f64;
                    let grid_height = cell.height.to_f64() * geometry.total_rows as f64;
                    assert!(grid_width <= USABLE_FRACTION * surface.width.to_f64());
                    assert!(grid_height <= USABLE_FRACTION * surface.height.to_f64());
                    let corner = geometry.top_left_corner(cell, surface);
                    assert!(corner.x >= Px::ZERO);
                    assert!(corner.y >= Px::ZERO);
                }
            }
        }
    }

    #[test]
    fn tiny_surfaces_are_rejected() {
        let geometry = GeometryAnalyzer::new().best_geometry(20, 4).unwrap();
        assert!(matches!(
            geometry.cell_size(Size::new(10, 10)),
            Err(SheetError::SurfaceTooSmall { .. })
        ));
        assert!(matches!(
            geometry.cell_size(Size::new(0, 600)),
            Err(SheetError::SurfaceTooSmall { .. })
        ));
    }

    #[test]
    fn target_ratio_reshapes_the_selection() {
        let analyzer = GeometryAnalyzer::new().with_target_ratio(0.8);
        let geometry = analyzer.best_geometry(20, 4).unwrap();
        assert_eq!(geometry.num_tables, 3);

        // Nonsense ratios are ignored.
        let analyzer = GeometryAnalyzer::new().with_target_ratio(-2.0);
        assert_eq!(analyzer.target_ratio(), DEFAULT_CELL_RATIO);
        let analyzer = GeometryAnalyzer::new().with_target_ratio(f64::NAN);
        assert_eq!(analyzer.target_ratio(), DEFAULT_CELL_RATIO);
    }
}
