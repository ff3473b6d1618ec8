use crate::{error::DispatchError, problem::address_index::AddressIdx};

pub type Distance = f64;

/// Road distances between indexed addresses, in miles.
///
/// Source tables are usually only populated on one side of the diagonal, so
/// every pair is resolved from whichever of `[from][to]` / `[to][from]` is
/// present. An empty cell is `None`; `Some(0.0)` is a real distance.
///
/// Storage is flat: `index = from * num_locations + to`.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    cells: Vec<Option<Distance>>,
    num_locations: usize,
}

impl DistanceMatrix {
    /// Builds the matrix from possibly ragged rows. Missing trailing cells are
    /// treated as empty. Fails when a pair has no distance in either
    /// direction, when both directions are filled with different values, or
    /// when a cell is negative or not finite.
    pub fn new(rows: Vec<Vec<Option<Distance>>>) -> Result<Self, DispatchError> {
        let num_locations = rows.len();
        let mut cells = vec![None; num_locations * num_locations];

        for (from, row) in rows.into_iter().enumerate() {
            if row.len() > num_locations {
                return Err(DispatchError::MatrixRowTooLong {
                    row: from,
                    len: row.len(),
                    expected: num_locations,
                });
            }

            for (to, cell) in row.into_iter().enumerate() {
                match cell {
                    Some(value) if !(value.is_finite() && value >= 0.0) => {
                        return Err(DispatchError::InvalidDistance { from, to, value });
                    }
                    _ => {}
                }

                cells[from * num_locations + to] = cell;
            }
        }

        let matrix = DistanceMatrix {
            cells,
            num_locations,
        };

        for from in 0..num_locations {
            for to in (from + 1)..num_locations {
                let forward = matrix.cells[matrix.index(from, to)];
                let backward = matrix.cells[matrix.index(to, from)];
                match (forward, backward) {
                    (None, None) => return Err(DispatchError::MissingDistance { from, to }),
                    (Some(a), Some(b)) if a != b => {
                        return Err(DispatchError::AsymmetricDistance { from, to });
                    }
                    _ => {}
                }
            }
        }

        Ok(matrix)
    }

    /// Builds a fully populated matrix.
    pub fn from_dense(rows: Vec<Vec<Distance>>) -> Result<Self, DispatchError> {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        )
    }

    #[inline(always)]
    fn index(&self, from: usize, to: usize) -> usize {
        from * self.num_locations + to
    }

    fn lookup(&self, from: usize, to: usize) -> Option<Distance> {
        self.cells[self.index(from, to)].or(self.cells[self.index(to, from)])
    }

    /// Distance between two rows, falling back to the transposed cell when
    /// the direct one is empty.
    #[inline(always)]
    pub fn distance(&self, from: AddressIdx, to: AddressIdx) -> Distance {
        if from == to {
            return self.lookup(from.get(), to.get()).unwrap_or(0.0);
        }

        // Populated pairs are checked in `new`.
        self.lookup(from.get(), to.get()).unwrap_or(f64::INFINITY)
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}
