//! Judges: pure predicates mapping raw tool output to pass/fail.
//!
//! A handful of parametrized families covers the whole catalog. Judges are
//! constructed once at startup and shared read-only across trials.

use std::collections::{HashMap, HashSet};

/// A pass/fail predicate over the tool's raw text output.
#[derive(Debug, Clone, PartialEq)]
pub enum Judge {
    /// Exact match after trimming trailing whitespace from both sides.
    ExactText { expected: String },
    /// Output parses as a float within `tolerance` of `expected`.
    Numeric { expected: f64, tolerance: f64 },
    /// Trimmed output equals any accepted variant.
    AnyOf { accepted: Vec<String> },
    /// Whitespace-separated vertices form a valid topological order of the
    /// graph induced by `edges` (each edge's source before its target).
    TopologicalOrder { edges: Vec<(String, String)> },
    /// A completed 9x9 sudoku grid consistent with the puzzle givens
    /// (zero means an empty cell in the givens).
    SudokuSolution { givens: [[u8; 9]; 9] },
}

impl Judge {
    pub fn exact(expected: impl Into<String>) -> Self {
        Judge::ExactText { expected: expected.into() }
    }

    pub fn numeric(expected: f64, tolerance: f64) -> Self {
        Judge::Numeric { expected, tolerance }
    }

    pub fn any_of<I, S>(accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Judge::AnyOf { accepted: accepted.into_iter().map(Into::into).collect() }
    }

    pub fn topological(edges: &[(&str, &str)]) -> Self {
        Judge::TopologicalOrder {
            edges: edges.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect(),
        }
    }

    pub fn sudoku(givens: [[u8; 9]; 9]) -> Self {
        Judge::SudokuSolution { givens }
    }

    /// Whether `output` satisfies this judge.
    pub fn passes(&self, output: &str) -> bool {
        match self {
            Judge::ExactText { expected } => trim_trailing(output) == trim_trailing(expected),
            Judge::Numeric { expected, tolerance } => output
                .trim()
                .parse::<f64>()
                .map(|v| (v - expected).abs() <= *tolerance)
                .unwrap_or(false),
            Judge::AnyOf { accepted } => {
                let got = trim_trailing(output);
                accepted.iter().any(|a| trim_trailing(a) == got)
            }
            Judge::TopologicalOrder { edges } => valid_topological_order(output, edges),
            Judge::SudokuSolution { givens } => valid_sudoku_solution(output, givens),
        }
    }
}

fn trim_trailing(s: &str) -> &str {
    s.trim_end_matches([' ', '\t', '\n', '\r'])
}

fn valid_topological_order(output: &str, edges: &[(String, String)]) -> bool {
    let fields: Vec<&str> = output.split_whitespace().collect();
    if fields.is_empty() {
        return false;
    }

    let mut vertices = HashSet::new();
    for (from, to) in edges {
        vertices.insert(from.as_str());
        vertices.insert(to.as_str());
    }

    // The output must list exactly the graph's vertices, each once.
    let seen: HashSet<&str> = fields.iter().copied().collect();
    if seen.len() != vertices.len() || fields.len() != vertices.len() {
        return false;
    }
    if !vertices.iter().all(|v| seen.contains(v)) {
        return false;
    }

    let pos: HashMap<&str, usize> = fields.iter().enumerate().map(|(i, f)| (*f, i)).collect();
    edges.iter().all(|(from, to)| pos[from.as_str()] < pos[to.as_str()])
}

fn valid_sudoku_solution(output: &str, givens: &[[u8; 9]; 9]) -> bool {
    let mut grid = [[0u8; 9]; 9];
    let lines: Vec<&str> = output.trim().lines().collect();
    if lines.len() != 9 {
        return false;
    }
    for (r, line) in lines.iter().enumerate() {
        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.len() != 9 {
            return false;
        }
        for (c, cell) in cells.iter().enumerate() {
            match cell.parse::<u8>() {
                Ok(v) if (1..=9).contains(&v) => grid[r][c] = v,
                _ => return false,
            }
        }
    }

    // Givens must be preserved.
    for r in 0..9 {
        for c in 0..9 {
            if givens[r][c] != 0 && grid[r][c] != givens[r][c] {
                return false;
            }
        }
    }

    // Each row, column, and 3x3 box holds 1..=9 exactly once.
    let complete = |unit: &[u8]| -> bool {
        let mut seen = [false; 10];
        for &v in unit {
            if seen[v as usize] {
                return false;
            }
            seen[v as usize] = true;
        }
        true
    };
    for r in 0..9 {
        if !complete(&grid[r]) {
            return false;
        }
    }
    for c in 0..9 {
        let col: Vec<u8> = (0..9).map(|r| grid[r][c]).collect();
        if !complete(&col) {
            return false;
        }
    }
    for br in (0..9).step_by(3) {
        for bc in (0..9).step_by(3) {
            let mut boxed = Vec::with_capacity(9);
            for r in br..br + 3 {
                for c in bc..bc + 3 {
                    boxed.push(grid[r][c]);
                }
            }
            if !complete(&boxed) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_ignores_trailing_whitespace() {
        let j = Judge::exact("6");
        assert!(j.passes("6"));
        assert!(j.passes("6\n"));
        assert!(j.passes("6  \t"));
        assert!(!j.passes(" 6"));
        assert!(!j.passes("7"));
    }

    #[test]
    fn numeric_within_tolerance() {
        let j = Judge::numeric(0.5, 0.001);
        assert!(j.passes("0.5"));
        assert!(j.passes(" 0.4999999\n"));
        assert!(j.passes("0.5009"));
        assert!(!j.passes("0.502"));
        assert!(!j.passes("half"));
        assert!(!j.passes(""));
    }

    #[test]
    fn any_of_accepts_each_variant() {
        let j = Judge::any_of(["2 3", "3 2"]);
        assert!(j.passes("2 3"));
        assert!(j.passes("3 2\n"));
        assert!(!j.passes("2, 3"));
        assert!(!j.passes("23"));
    }

    #[test]
    fn topological_order_checks_edges_and_vertex_set() {
        let j = Judge::topological(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "E")]);
        assert!(j.passes("A B C D E"));
        assert!(j.passes("A C B D E\n"));
        // B before A violates A->B.
        assert!(!j.passes("B A C D E"));
        // Missing vertex.
        assert!(!j.passes("A B C D"));
        // Duplicate vertex.
        assert!(!j.passes("A A B C D E"));
        // Unknown vertex.
        assert!(!j.passes("A B C D F"));
        assert!(!j.passes(""));
    }

    const PUZZLE: [[u8; 9]; 9] = [
        [5, 3, 0, 0, 7, 0, 0, 0, 0],
        [6, 0, 0, 1, 9, 5, 0, 0, 0],
        [0, 9, 8, 0, 0, 0, 0, 6, 0],
        [8, 0, 0, 0, 6, 0, 0, 0, 3],
        [4, 0, 0, 8, 0, 3, 0, 0, 1],
        [7, 0, 0, 0, 2, 0, 0, 0, 6],
        [0, 6, 0, 0, 0, 0, 2, 8, 0],
        [0, 0, 0, 4, 1, 9, 0, 0, 5],
        [0, 0, 0, 0, 8, 0, 0, 7, 9],
    ];

    const SOLUTION: &str = "5 3 4 6 7 8 9 1 2\n6 7 2 1 9 5 3 4 8\n1 9 8 3 4 2 5 6 7\n8 5 9 7 6 1 4 2 3\n4 2 6 8 5 3 7 9 1\n7 1 3 9 2 4 8 5 6\n9 6 1 5 3 7 2 8 4\n2 8 7 4 1 9 6 3 5\n3 4 5 2 8 6 1 7 9";

    #[test]
    fn sudoku_accepts_the_known_solution() {
        assert!(Judge::sudoku(PUZZLE).passes(SOLUTION));
        assert!(Judge::sudoku(PUZZLE).passes(&format!("{SOLUTION}\n")));
    }

    #[test]
    fn sudoku_rejects_contradicted_given() {
        // Flip the top-left given (5 -> 1); the grid still parses but
        // contradicts the puzzle.
        let bad = SOLUTION.replace("5 3 4 6 7 8 9 1 2", "1 3 4 6 7 8 9 5 2");
        assert!(!Judge::sudoku(PUZZLE).passes(&bad));
    }

    #[test]
    fn sudoku_rejects_duplicates_and_bad_shape() {
        let j = Judge::sudoku(PUZZLE);
        // Duplicate in the first row.
        let dup = SOLUTION.replace("5 3 4 6 7 8 9 1 2", "5 3 4 6 7 8 9 1 1");
        assert!(!j.passes(&dup));
        // Wrong number of rows.
        assert!(!j.passes("5 3 4 6 7 8 9 1 2"));
        // Out-of-range cell.
        let zero = SOLUTION.replace("5 3 4 6 7 8 9 1 2", "5 3 4 6 7 8 9 1 0");
        assert!(!j.passes(&zero));
        assert!(!j.passes(""));
    }
}
