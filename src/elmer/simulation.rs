use super::Keywords;
use crate::base::{FilePath, CASE_STEM};
use crate::StrError;
use std::ffi::OsStr;
use std::fmt::{self, Write};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::Path;

/// Holds a named section (material, solver, initial condition)
#[derive(Clone, Debug)]
struct Section {
    name: String,
    data: Keywords,
}

/// Holds an equation: the list of active solvers
#[derive(Clone, Debug)]
struct Equation {
    name: String,
    solvers: Vec<usize>,
    data: Keywords,
}

/// Holds a body: mesh bodies sharing an equation, a material, and an initial condition
#[derive(Clone, Debug)]
struct Body {
    name: String,
    target_bodies: Vec<usize>,
    equation: usize,
    material: usize,
    initial_condition: Option<usize>,
}

/// Holds a boundary condition applied to mesh boundaries
#[derive(Clone, Debug)]
struct Boundary {
    name: String,
    target_boundaries: Vec<usize>,
    data: Keywords,
}

/// Holds an Elmer simulation setup and writes the solver input file (.sif)
///
/// Every `add_` function returns the (1-based) section number used by Elmer.
/// Names must be unique within each kind of section. Target bodies and target
/// boundaries are the physical group ids of the mesh.
pub struct Simulation {
    /// Header keywords (written without the `=` sign)
    pub header: Keywords,

    /// Simulation keywords, e.g., the coordinate system
    pub settings: Keywords,

    /// Physical constants
    pub constants: Keywords,

    materials: Vec<Section>,
    solvers: Vec<Section>,
    equations: Vec<Equation>,
    initial_conditions: Vec<Section>,
    bodies: Vec<Body>,
    boundaries: Vec<Boundary>,
}

impl Simulation {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `mesh_db` -- the directory of the Elmer mesh relative to the simulation directory
    pub fn new(mesh_db: &str) -> Self {
        let mut header = Keywords::new();
        header
            .set("CHECK KEYWORDS", "\"Warn\"")
            .set("Mesh DB", format!("\".\" \"{}\"", mesh_db))
            .set("Include Path", "\"\"")
            .set("Results Directory", "\"\"");
        let mut constants = Keywords::new();
        constants.set("Stefan Boltzmann", 5.6704e-8);
        Simulation {
            header,
            settings: Keywords::new(),
            constants,
            materials: Vec::new(),
            solvers: Vec::new(),
            equations: Vec::new(),
            initial_conditions: Vec::new(),
            bodies: Vec::new(),
            boundaries: Vec::new(),
        }
    }

    /// Adds a material
    pub fn add_material(&mut self, name: &str, data: Keywords) -> Result<usize, StrError> {
        if self.materials.iter().any(|s| s.name == name) {
            return Err("material name already exists");
        }
        self.materials.push(Section {
            name: name.to_string(),
            data,
        });
        Ok(self.materials.len())
    }

    /// Adds a solver
    pub fn add_solver(&mut self, name: &str, data: Keywords) -> Result<usize, StrError> {
        if self.solvers.iter().any(|s| s.name == name) {
            return Err("solver name already exists");
        }
        self.solvers.push(Section {
            name: name.to_string(),
            data,
        });
        Ok(self.solvers.len())
    }

    /// Adds an equation with the given active solvers
    pub fn add_equation(&mut self, name: &str, solvers: &[usize], data: Keywords) -> Result<usize, StrError> {
        if self.equations.iter().any(|e| e.name == name) {
            return Err("equation name already exists");
        }
        if solvers.is_empty() {
            return Err("equation requires at least one solver");
        }
        for id in solvers {
            check_id(*id, self.solvers.len(), "cannot find solver with the given number")?;
        }
        self.equations.push(Equation {
            name: name.to_string(),
            solvers: solvers.to_vec(),
            data,
        });
        Ok(self.equations.len())
    }

    /// Adds an initial condition
    pub fn add_initial_condition(&mut self, name: &str, data: Keywords) -> Result<usize, StrError> {
        if self.initial_conditions.iter().any(|s| s.name == name) {
            return Err("initial condition name already exists");
        }
        self.initial_conditions.push(Section {
            name: name.to_string(),
            data,
        });
        Ok(self.initial_conditions.len())
    }

    /// Adds a body
    ///
    /// # Input
    ///
    /// * `target_bodies` -- physical ids of the mesh bodies
    /// * `equation` -- number returned by [Simulation::add_equation()]
    /// * `material` -- number returned by [Simulation::add_material()]
    /// * `initial_condition` -- number returned by [Simulation::add_initial_condition()], if any
    pub fn add_body(
        &mut self,
        name: &str,
        target_bodies: &[usize],
        equation: usize,
        material: usize,
        initial_condition: Option<usize>,
    ) -> Result<usize, StrError> {
        if self.bodies.iter().any(|b| b.name == name) {
            return Err("body name already exists");
        }
        if target_bodies.is_empty() {
            return Err("body requires at least one target body");
        }
        for id in target_bodies {
            if self.bodies.iter().any(|b| b.target_bodies.contains(id)) {
                return Err("target body already belongs to another body");
            }
        }
        check_id(equation, self.equations.len(), "cannot find equation with the given number")?;
        check_id(material, self.materials.len(), "cannot find material with the given number")?;
        if let Some(id) = initial_condition {
            check_id(
                id,
                self.initial_conditions.len(),
                "cannot find initial condition with the given number",
            )?;
        }
        self.bodies.push(Body {
            name: name.to_string(),
            target_bodies: target_bodies.to_vec(),
            equation,
            material,
            initial_condition,
        });
        Ok(self.bodies.len())
    }

    /// Adds a boundary condition
    pub fn add_boundary(&mut self, name: &str, target_boundaries: &[usize], data: Keywords) -> Result<usize, StrError> {
        if self.boundaries.iter().any(|b| b.name == name) {
            return Err("boundary name already exists");
        }
        if target_boundaries.is_empty() {
            return Err("boundary requires at least one target boundary");
        }
        self.boundaries.push(Boundary {
            name: name.to_string(),
            target_boundaries: target_boundaries.to_vec(),
            data,
        });
        Ok(self.boundaries.len())
    }

    /// Returns the contents of the solver input file
    pub fn sif(&self) -> Result<String, StrError> {
        if self.bodies.is_empty() {
            return Err("there are no bodies to write");
        }
        let mut buffer = String::new();

        write!(&mut buffer, "Header\n").unwrap();
        for (key, value) in self.header.iter() {
            write!(&mut buffer, "  {} {}\n", key, value).unwrap();
        }
        write!(&mut buffer, "End\n\n").unwrap();

        write!(&mut buffer, "Simulation\n").unwrap();
        write_keywords(&mut buffer, &self.settings);
        write!(&mut buffer, "End\n\n").unwrap();

        write!(&mut buffer, "Constants\n").unwrap();
        write_keywords(&mut buffer, &self.constants);
        write!(&mut buffer, "End\n\n").unwrap();

        for (i, body) in self.bodies.iter().enumerate() {
            write!(&mut buffer, "! {}\nBody {}\n", body.name, i + 1).unwrap();
            write!(
                &mut buffer,
                "  Target Bodies({}) = {}\n",
                body.target_bodies.len(),
                join(&body.target_bodies)
            )
            .unwrap();
            write!(
                &mut buffer,
                "  Equation = {}  ! {}\n",
                body.equation,
                self.equations[body.equation - 1].name
            )
            .unwrap();
            write!(
                &mut buffer,
                "  Material = {}  ! {}\n",
                body.material,
                self.materials[body.material - 1].name
            )
            .unwrap();
            if let Some(id) = body.initial_condition {
                write!(
                    &mut buffer,
                    "  Initial Condition = {}  ! {}\n",
                    id,
                    self.initial_conditions[id - 1].name
                )
                .unwrap();
            }
            write!(&mut buffer, "End\n\n").unwrap();
        }

        for (i, solver) in self.solvers.iter().enumerate() {
            write!(&mut buffer, "! {}\nSolver {}\n", solver.name, i + 1).unwrap();
            write_keywords(&mut buffer, &solver.data);
            write!(&mut buffer, "End\n\n").unwrap();
        }

        for (i, equation) in self.equations.iter().enumerate() {
            let names: Vec<_> = equation
                .solvers
                .iter()
                .map(|s| self.solvers[*s - 1].name.as_str())
                .collect();
            write!(&mut buffer, "! {}\nEquation {}\n", equation.name, i + 1).unwrap();
            write!(
                &mut buffer,
                "  Active Solvers({}) = {}  ! {}\n",
                equation.solvers.len(),
                join(&equation.solvers),
                names.join(", ")
            )
            .unwrap();
            write_keywords(&mut buffer, &equation.data);
            write!(&mut buffer, "End\n\n").unwrap();
        }

        for (i, material) in self.materials.iter().enumerate() {
            write!(&mut buffer, "! {}\nMaterial {}\n", material.name, i + 1).unwrap();
            write_keywords(&mut buffer, &material.data);
            write!(&mut buffer, "End\n\n").unwrap();
        }

        for (i, ic) in self.initial_conditions.iter().enumerate() {
            write!(&mut buffer, "! {}\nInitial Condition {}\n", ic.name, i + 1).unwrap();
            write_keywords(&mut buffer, &ic.data);
            write!(&mut buffer, "End\n\n").unwrap();
        }

        for (i, boundary) in self.boundaries.iter().enumerate() {
            write!(&mut buffer, "! {}\nBoundary Condition {}\n", boundary.name, i + 1).unwrap();
            write!(
                &mut buffer,
                "  Target Boundaries({}) = {}\n",
                boundary.target_boundaries.len(),
                join(&boundary.target_boundaries)
            )
            .unwrap();
            write_keywords(&mut buffer, &boundary.data);
            write!(&mut buffer, "End\n\n").unwrap();
        }
        Ok(buffer)
    }

    /// Writes the solver input file into the simulation directory
    ///
    /// # Input
    ///
    /// * `sim_dir` -- may be a String, &str, or Path
    pub fn write_sif<P>(&self, sim_dir: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let buffer = self.sif()?;
        write_file(&FilePath::new(sim_dir).sif(), &buffer)
    }

    /// Writes the startinfo file telling ElmerSolver which .sif to run
    ///
    /// # Input
    ///
    /// * `sim_dir` -- may be a String, &str, or Path
    pub fn write_startinfo<P>(&self, sim_dir: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let buffer = format!("{}\n1\n", FilePath::filename("sif"));
        write_file(&FilePath::new(sim_dir).startinfo(), &buffer)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Simulation::new(CASE_STEM)
    }
}

fn check_id(id: usize, len: usize, message: StrError) -> Result<(), StrError> {
    if id < 1 || id > len {
        return Err(message);
    }
    Ok(())
}

fn join(ids: &[usize]) -> String {
    let all: Vec<_> = ids.iter().map(|id| id.to_string()).collect();
    all.join(" ")
}

fn write_keywords(buffer: &mut String, keywords: &Keywords) {
    for (key, value) in keywords.iter() {
        write!(buffer, "  {} = {}\n", key, value).unwrap();
    }
}

fn write_file(path: &Path, buffer: &str) -> Result<(), StrError> {
    if let Some(p) = path.parent() {
        fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
    }
    let mut file = File::create(path).map_err(|_| "cannot create file")?;
    file.write_all(buffer.as_bytes()).map_err(|_| "cannot write file")?;
    Ok(())
}

impl fmt::Display for Simulation {
    /// Prints a summary of the sections
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Elmer simulation\n").unwrap();
        write!(f, "================\n").unwrap();
        for body in &self.bodies {
            write!(
                f,
                "body {} → {:?} (material = {})\n",
                body.name,
                body.target_bodies,
                self.materials[body.material - 1].name
            )
            .unwrap();
        }
        for boundary in &self.boundaries {
            write!(f, "boundary {} → {:?}\n", boundary.name, boundary.target_boundaries).unwrap();
        }
        let names: Vec<_> = self.solvers.iter().map(|s| s.name.as_str()).collect();
        write!(f, "solvers = {}\n", names.join(", ")).unwrap();
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
