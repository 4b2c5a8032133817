//! Solution file writer

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::search::result::Solution;

/// Extension of solution files
pub const SOLUTION_EXTENSION: &str = "SOL";

/// `puzzle.SWE` becomes `puzzle.SOL`; a path without extension gains one.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(SOLUTION_EXTENSION)
}

/// Render a solution as `symbol:value` lines, ascending by symbol
pub fn format_solution(solution: &Solution) -> String {
    solution.to_string()
}

/// Write `solution` to `path`, replacing any existing file
pub fn write_solution(path: &Path, solution: &Solution) -> io::Result<()> {
    fs::write(path, format_solution(solution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Symbol;
    use crate::search::result::SolutionValue;
    use std::collections::BTreeMap;

    fn solution() -> Solution {
        let mut values = BTreeMap::new();
        values.insert(
            Symbol::new('B').unwrap(),
            SolutionValue::Value("dog".to_string()),
        );
        values.insert(
            Symbol::new('A').unwrap(),
            SolutionValue::Value("cat".to_string()),
        );
        values.insert(Symbol::new('Q').unwrap(), SolutionValue::Unused);
        Solution::new(values)
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("puzzles/one.SWE")),
            PathBuf::from("puzzles/one.SOL")
        );
        assert_eq!(
            default_output_path(Path::new("plain")),
            PathBuf::from("plain.SOL")
        );
    }

    #[test]
    fn test_format_solution() {
        assert_eq!(format_solution(&solution()), "A:cat\nB:dog\nQ:UNUSED\n");
    }

    #[test]
    fn test_write_solution_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "superstring_output_test_{}.SOL",
            std::process::id()
        ));

        write_solution(&path, &solution()).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(written, "A:cat\nB:dog\nQ:UNUSED\n");
    }

    #[test]
    fn test_write_solution_bad_directory() {
        let path = Path::new("/nonexistent_dir_for_superstring/out.SOL");
        assert!(write_solution(path, &solution()).is_err());
    }
}
