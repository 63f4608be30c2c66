use crate::base::{Config, FilePath, ParamMaterial, CASE_STEM, MODEL_NAME};
use crate::elmer::{self, Keywords, Simulation, SolverLog, Value};
use crate::gmsh::{MeshControl, Model, Rectangle, Side};
use crate::StrError;
use log::info;
use std::fs;
use std::path::Path;

/// Implements the thermal simulation of the Open Flow Meter
///
/// ```text
///  y
///  ^    +-------------------------------------+  OD/2
///  |    |              pipe wall              |
///  |    +-------------------------------------+  ID/2
///  |    |                 +--+                |
///  |    |  gas in     gas |pt|    gas out     |
///  |    |                 +--+                |
///  |    +-------------------------------------+ -ID/2
///  |    |              pipe wall              |
///  |    +-------------------------------------+ -OD/2
///  |  -L/2                                   L/2  -> x
/// ```
///
/// The outer pipe surfaces are kept at laboratory temperature and the probe surface
/// at the probe temperature; the gas inlet and outlet are adiabatic unless an inlet
/// temperature is given.
pub struct FlowMeter {
    pub config: Config,
}

impl FlowMeter {
    /// Allocates a new instance
    pub fn new(config: Config) -> Result<Self, StrError> {
        config.validate()?;
        Ok(FlowMeter { config })
    }

    /// Builds the gmsh model: geometry, physical groups, and mesh-size directives
    pub fn model(&self) -> Result<Model, StrError> {
        self.config.validate()?;
        let pipe = &self.config.pipe;
        let probe = &self.config.probe;
        let (len, od, id) = (pipe.length, pipe.outer_diameter, pipe.inner_diameter);
        let (h, t) = (probe.height, probe.thickness);
        let wall = pipe.wall_thickness();

        let mut model = Model::new(MODEL_NAME);
        let upper_wall = model.add_rectangle(Rectangle::new(-len / 2.0, id / 2.0, len, wall)?);
        let lower_wall = model.add_rectangle(Rectangle::new(-len / 2.0, -od / 2.0, len, wall)?);
        let gas = model.add_rectangle(Rectangle::new(-len / 2.0, -id / 2.0, len, id)?);
        let pt100 = model.add_rectangle(Rectangle::new(-t / 2.0, -h / 2.0, t, h)?);

        // keep the probe region: it is meshed as its own body
        model.cut(gas, pt100, false)?;

        model.add_shape("pipe", &[upper_wall, lower_wall])?;
        model.add_shape("gas", &[gas])?;
        model.add_shape("pt100", &[pt100])?;
        model.set_interface("gas", "pipe")?.set_interface("pt100", "gas")?;

        model.add_boundary("bnd_gas_in", &[("gas", Side::Left)])?;
        model.add_boundary("bnd_gas_out", &[("gas", Side::Right)])?;
        model.add_boundary("bnd_lab_T", &[("pipe", Side::Top), ("pipe", Side::Bottom)])?;
        let probe_sides: Vec<_> = Side::all().iter().map(|side| ("pt100", *side)).collect();
        model.add_boundary("bnd_pt100_T", &probe_sides)?;

        let mesh = &self.config.mesh;
        model
            .deactivate_characteristic_length()
            .add_mesh_control(MeshControl::constant(mesh.size_bulk, &["gas", "pipe"]))?
            .add_mesh_control(MeshControl::constant(mesh.size_probe, &["pt100"]))?;
        if let Some(r) = mesh.refinement {
            model.add_mesh_control(MeshControl::exponential("bnd_pt100_T", r.size, r.exponent, r.factor))?;
        }
        Ok(model)
    }

    /// Builds the Elmer setup: steady heat conduction with fixed temperatures
    pub fn simulation(&self, model: &Model) -> Result<Simulation, StrError> {
        let config = &self.config;
        config.validate()?;
        let mut sim = Simulation::new(CASE_STEM);
        sim.settings
            .set("Coordinate System", "Cartesian 2D")
            .set("Simulation Type", "Steady state");

        // materials (sections are shared by name; validate ensures equal properties)
        let mut added: Vec<(&str, usize)> = Vec::new();
        let mut material_ids = Vec::new();
        for material in [&config.wall, &config.gas, &config.probe_material] {
            let id = match added.iter().find(|(name, _)| *name == material.name) {
                Some((_, id)) => *id,
                None => {
                    let id = sim.add_material(&material.name, material_keywords(material))?;
                    added.push((material.name.as_str(), id));
                    id
                }
            };
            material_ids.push(id);
        }
        let (wall, gas, probe) = (material_ids[0], material_ids[1], material_ids[2]);

        // solvers and equation
        let heat_solver = sim.add_solver(
            "heat_solver",
            Keywords::from([
                ("Equation", Value::from("HeatSolver")),
                ("Procedure", Value::from("\"HeatSolve\" \"HeatSolver\"")),
                ("Variable", Value::from("\"Temperature\"")),
                ("Variable Dofs", Value::from(1)),
            ]),
        )?;
        sim.add_solver(
            "output_solver",
            Keywords::from([
                ("Exec Solver", Value::from("After timestep")),
                ("Equation", Value::from("ResultOutputSolver")),
                ("Procedure", Value::from("\"ResultOutputSolve\" \"ResultOutputSolver\"")),
            ]),
        )?;
        let main = sim.add_equation("main", &[heat_solver], Keywords::new())?;
        let t0 = sim.add_initial_condition(
            "T0",
            Keywords::from([("Temperature", Value::from(config.temperatures.initial))]),
        )?;

        // bodies
        sim.add_body("pipe", &[model.physical_id("pipe")?], main, wall, Some(t0))?;
        sim.add_body("gas", &[model.physical_id("gas")?], main, gas, Some(t0))?;
        sim.add_body("pt100", &[model.physical_id("pt100")?], main, probe, Some(t0))?;

        // boundaries
        sim.add_boundary(
            "lab_T",
            &[model.physical_id("bnd_lab_T")?],
            Keywords::from([("Temperature", Value::from(config.temperatures.lab))]),
        )?;
        sim.add_boundary(
            "PT100",
            &[model.physical_id("bnd_pt100_T")?],
            Keywords::from([("Temperature", Value::from(config.temperatures.probe))]),
        )?;
        if let Some(temperature) = config.temperatures.gas_inlet {
            sim.add_boundary(
                "gas_in",
                &[model.physical_id("bnd_gas_in")?],
                Keywords::from([("Temperature", Value::from(temperature))]),
            )?;
        }
        Ok(sim)
    }

    /// Writes the gmsh script and the case parameters (no solver files)
    pub fn write_geometry(&self, sim_dir: &Path) -> Result<Model, StrError> {
        let model = self.model()?;
        self.write_model(&model, sim_dir)?;
        Ok(model)
    }

    /// Writes all input files: gmsh script, solver input file, startinfo, and case parameters
    ///
    /// Nothing is written if the model or the solver setup cannot be built.
    pub fn write_inputs(&self, sim_dir: &Path) -> Result<(), StrError> {
        let model = self.model()?;
        let sim = self.simulation(&model)?;
        self.write_model(&model, sim_dir)?;
        sim.write_sif(sim_dir)?;
        sim.write_startinfo(sim_dir)?;
        info!("solver input written to {}", FilePath::new(sim_dir).sif().display());
        Ok(())
    }

    /// Writes the gmsh script and generates the mesh
    pub fn mesh(&self, sim_dir: &Path) -> Result<(), StrError> {
        self.write_geometry(sim_dir)?;
        elmer::run_gmsh(&self.config.executables.gmsh, sim_dir)
    }

    /// Writes all input files, meshes, converts the mesh, runs the solver, and scans its log
    pub fn run(&self, sim_dir: &Path) -> Result<SolverLog, StrError> {
        let exe = &self.config.executables;
        self.write_inputs(sim_dir)?;
        elmer::run_gmsh(&exe.gmsh, sim_dir)?;
        elmer::run_elmer_grid(&exe.elmer_grid, sim_dir)?;
        elmer::run_elmer_solver(&exe.elmer_solver, sim_dir)
    }

    fn write_model(&self, model: &Model, sim_dir: &Path) -> Result<(), StrError> {
        let paths = FilePath::new(sim_dir);
        fs::create_dir_all(sim_dir).map_err(|_| "cannot create simulation directory")?;
        model.write_geo(&paths.geo())?;
        self.config.write_json(&paths.config_json())?;
        info!("gmsh script written to {}", paths.geo().display());
        Ok(())
    }
}

fn material_keywords(material: &ParamMaterial) -> Keywords {
    Keywords::from([
        ("Density", Value::from(material.density)),
        ("Heat Capacity", Value::from(material.heat_capacity)),
        ("Heat Conductivity", Value::from(material.heat_conductivity)),
    ])
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
