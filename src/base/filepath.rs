use super::{CASE_STEM, SOLVER_LOG_FILENAME, STARTINFO_FILENAME};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Holds the paths of all files written to (or by the engines in) the simulation directory
#[derive(Clone, Debug)]
pub struct FilePath {
    sim_dir: PathBuf,
}

impl FilePath {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `sim_dir` -- the simulation directory; may be a String, &str, or Path
    pub fn new<P>(sim_dir: &P) -> Self
    where
        P: AsRef<OsStr> + ?Sized,
    {
        FilePath {
            sim_dir: Path::new(sim_dir).to_path_buf(),
        }
    }

    /// Returns the simulation directory
    pub fn sim_dir(&self) -> &Path {
        &self.sim_dir
    }

    /// Returns the filepath of the gmsh script (.geo)
    pub fn geo(&self) -> PathBuf {
        self.with_extension("geo")
    }

    /// Returns the filepath of the gmsh mesh (.msh)
    pub fn msh(&self) -> PathBuf {
        self.with_extension("msh")
    }

    /// Returns the filepath of the Elmer solver input file (.sif)
    pub fn sif(&self) -> PathBuf {
        self.with_extension("sif")
    }

    /// Returns the directory of the Elmer mesh database written by ElmerGrid
    pub fn mesh_db(&self) -> PathBuf {
        self.sim_dir.join(CASE_STEM)
    }

    /// Returns the filepath of the ElmerSolver startinfo file
    pub fn startinfo(&self) -> PathBuf {
        self.sim_dir.join(STARTINFO_FILENAME)
    }

    /// Returns the filepath of the ElmerSolver log
    pub fn solver_log(&self) -> PathBuf {
        self.sim_dir.join(SOLVER_LOG_FILENAME)
    }

    /// Returns the filepath of the JSON file with the case parameters
    pub fn config_json(&self) -> PathBuf {
        let mut filename = String::from(CASE_STEM);
        filename.push_str("-config.json");
        self.sim_dir.join(filename)
    }

    /// Returns the filename (without directory) of a case file
    ///
    /// The engines run inside the simulation directory, hence they receive bare filenames.
    pub fn filename(extension: &str) -> String {
        let mut filename = String::from(CASE_STEM);
        filename.push('.');
        filename.push_str(extension);
        filename
    }

    fn with_extension(&self, extension: &str) -> PathBuf {
        self.sim_dir.join(FilePath::filename(extension))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
