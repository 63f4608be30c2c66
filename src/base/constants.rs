/// Defines the directory where the simulation files are written
pub const DEFAULT_SIM_DIR: &str = "simdata";

/// Defines an auxiliary directory where the test files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/ofmsim/test";

/// Defines the filename stem shared by the geometry, mesh, and solver input files
pub const CASE_STEM: &str = "case";

/// Defines the name of the file that tells ElmerSolver which .sif to run
pub const STARTINFO_FILENAME: &str = "ELMERSOLVER_STARTINFO";

/// Defines the name of the file capturing ElmerSolver's output
pub const SOLVER_LOG_FILENAME: &str = "elmersolver.log";

/// Defines the name of the gmsh model
pub const MODEL_NAME: &str = "OFM-Thermal";
