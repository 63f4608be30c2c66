use crate::StrError;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::Path;

/// Holds the errors, warnings, and statistics found in an ElmerSolver log
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolverLog {
    /// Lines containing `ERROR`
    pub errors: Vec<String>,

    /// Lines containing `WARNING`
    pub warnings: Vec<String>,

    /// Total CPU time in seconds
    pub cpu_time: Option<f64>,

    /// Total wall-clock time in seconds
    pub real_time: Option<f64>,

    /// Indicates that the solver reached `ALL DONE`
    pub all_done: bool,
}

impl SolverLog {
    /// Scans the text of a log
    pub fn scan(text: &str) -> Self {
        let mut log = SolverLog::default();
        for line in text.lines() {
            if line.contains("ERROR") {
                log.errors.push(line.to_string());
            }
            if line.contains("WARNING") {
                log.warnings.push(line.to_string());
            }
            if line.contains("ALL DONE") {
                log.all_done = true;
            }
            if let Some(pos) = line.find("SOLVER TOTAL TIME(CPU,REAL):") {
                let rest = &line[pos + "SOLVER TOTAL TIME(CPU,REAL):".len()..];
                let mut numbers = rest.split_whitespace().filter_map(|w| w.parse::<f64>().ok());
                log.cpu_time = numbers.next();
                log.real_time = numbers.next();
            }
        }
        log
    }

    /// Reads and scans a log file
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path);
        let text = fs::read_to_string(path).map_err(|_| "cannot read solver log")?;
        Ok(SolverLog::scan(&text))
    }

    /// Indicates whether the solver finished without errors
    pub fn success(&self) -> bool {
        self.all_done && self.errors.is_empty()
    }
}

impl fmt::Display for SolverLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Errors:     {:?}\n", self.errors).unwrap();
        write!(f, "Warnings:   {:?}\n", self.warnings).unwrap();
        write!(f, "Statistics: ").unwrap();
        match (self.cpu_time, self.real_time) {
            (Some(cpu), Some(real)) => write!(f, "CPU-time = {:?} s, real-time = {:?} s", cpu, real).unwrap(),
            (Some(cpu), None) => write!(f, "CPU-time = {:?} s", cpu).unwrap(),
            _ => write!(f, "not available").unwrap(),
        }
        write!(f, "\nAll done:   {}\n", self.all_done).unwrap();
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SolverLog;
    use crate::base::DEFAULT_TEST_DIR;
    use crate::StrError;
    use std::fs;

    const SAMPLE: &str = "\
ELMER SOLVER (v 9.0) STARTED AT: 2024/01/10 10:00:00
MAIN: Reading Model: case.sif
LoadInputFile: Scanning input file: case.sif
WARNING:: CheckKeyword: Unlisted keyword: [output solver] in section: [solver 2]
HeatSolver: Result Norm   :   3.4412018131539870E+02
ResultOutputSolver: Saving in unstructured VTK XML (.vtu) format
ElmerSolver: *** Elmer Solver: ALL DONE ***
SOLVER TOTAL TIME(CPU,REAL):         0.35        0.46
ELMER SOLVER FINISHED AT: 2024/01/10 10:00:01
";

    #[test]
    fn scan_works() {
        let log = SolverLog::scan(SAMPLE);
        assert!(log.errors.is_empty());
        assert_eq!(log.warnings.len(), 1);
        assert!(log.warnings[0].starts_with("WARNING:: CheckKeyword"));
        assert_eq!(log.cpu_time, Some(0.35));
        assert_eq!(log.real_time, Some(0.46));
        assert!(log.all_done);
        assert!(log.success());
    }

    #[test]
    fn scan_captures_errors() {
        let text = "ERROR:: ElmerSolver: Mesh not found\nSTOP 1\n";
        let log = SolverLog::scan(text);
        assert_eq!(log.errors, &["ERROR:: ElmerSolver: Mesh not found"]);
        assert_eq!(log.cpu_time, None);
        assert!(!log.all_done);
        assert!(!log.success());
        assert_eq!(
            format!("{}", log),
            "Errors:     [\"ERROR:: ElmerSolver: Mesh not found\"]\n\
             Warnings:   []\n\
             Statistics: not available\n\
             All done:   false\n"
        );
    }

    #[test]
    fn read_works() -> Result<(), StrError> {
        let path = format!("{}/solver_log_read_works.log", DEFAULT_TEST_DIR);
        fs::create_dir_all(DEFAULT_TEST_DIR).map_err(|_| "cannot create directory")?;
        fs::write(&path, SAMPLE).map_err(|_| "cannot write file")?;
        let log = SolverLog::read(&path)?;
        assert_eq!(
            format!("{}", log),
            "Errors:     []\n\
             Warnings:   [\"WARNING:: CheckKeyword: Unlisted keyword: [output solver] in section: [solver 2]\"]\n\
             Statistics: CPU-time = 0.35 s, real-time = 0.46 s\n\
             All done:   true\n"
        );
        assert_eq!(
            SolverLog::read("/tmp/ofmsim/__does_not_exist__.log").err(),
            Some("cannot read solver log")
        );
        Ok(())
    }
}
