use super::{Executables, ParamMaterial, ParamMesh, ParamPipe, ParamProbe, ParamTemperatures};
use crate::StrError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the configuration of the flow meter case
///
/// [Config::new()] returns the reference case: a PT100 in argon flowing through
/// a 6 mm stainless steel pipe whose outer surface is kept at laboratory temperature.
///
/// A JSON file may override any subset of the fields, at any nesting level;
/// missing fields keep the reference values.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Pipe dimensions
    pub pipe: ParamPipe,

    /// Probe dimensions
    pub probe: ParamProbe,

    /// Gas in the channel
    pub gas: ParamMaterial,

    /// Pipe wall material
    pub wall: ParamMaterial,

    /// Material of the probe region
    pub probe_material: ParamMaterial,

    /// Mesh-size directives
    pub mesh: ParamMesh,

    /// Initial and prescribed temperatures
    pub temperatures: ParamTemperatures,

    /// External programs
    pub executables: Executables,
}

impl Config {
    /// Allocates a new instance with the reference case
    pub fn new() -> Self {
        Config {
            pipe: ParamPipe::swagelok_6mm(),
            probe: ParamProbe::pt100(),
            gas: ParamMaterial::argon(),
            wall: ParamMaterial::steel_v2a(),
            probe_material: ParamMaterial::steel_v2a(),
            mesh: ParamMesh::reference(),
            temperatures: ParamTemperatures::reference(),
            executables: Executables::from_path(),
        }
    }

    /// Sets the pipe dimensions
    pub fn set_pipe(&mut self, pipe: ParamPipe) -> Result<&mut Self, StrError> {
        check_pipe(&pipe)?;
        check_probe_fits(&self.probe, &pipe)?;
        self.pipe = pipe;
        Ok(self)
    }

    /// Sets the probe dimensions
    pub fn set_probe(&mut self, probe: ParamProbe) -> Result<&mut Self, StrError> {
        if probe.height <= 0.0 || probe.thickness <= 0.0 {
            return Err("probe dimensions must be > 0.0");
        }
        check_probe_fits(&probe, &self.pipe)?;
        self.probe = probe;
        Ok(self)
    }

    /// Sets the gas properties
    pub fn set_gas(&mut self, gas: ParamMaterial) -> Result<&mut Self, StrError> {
        check_materials(&[&self.wall, &gas, &self.probe_material])?;
        self.gas = gas;
        Ok(self)
    }

    /// Sets the pipe wall material
    pub fn set_wall(&mut self, wall: ParamMaterial) -> Result<&mut Self, StrError> {
        check_materials(&[&wall, &self.gas, &self.probe_material])?;
        self.wall = wall;
        Ok(self)
    }

    /// Sets the material of the probe region
    pub fn set_probe_material(&mut self, material: ParamMaterial) -> Result<&mut Self, StrError> {
        check_materials(&[&self.wall, &self.gas, &material])?;
        self.probe_material = material;
        Ok(self)
    }

    /// Sets the mesh-size directives
    pub fn set_mesh(&mut self, mesh: ParamMesh) -> Result<&mut Self, StrError> {
        check_mesh(&mesh)?;
        self.mesh = mesh;
        Ok(self)
    }

    /// Sets the initial and prescribed temperatures
    pub fn set_temperatures(&mut self, temperatures: ParamTemperatures) -> Result<&mut Self, StrError> {
        check_temperatures(&temperatures)?;
        self.temperatures = temperatures;
        Ok(self)
    }

    /// Sets the names (or paths) of the external programs
    pub fn set_executables(&mut self, executables: Executables) -> Result<&mut Self, StrError> {
        check_executables(&executables)?;
        self.executables = executables;
        Ok(self)
    }

    /// Checks all values (e.g., after reading a JSON file)
    pub fn validate(&self) -> Result<(), StrError> {
        check_pipe(&self.pipe)?;
        if self.probe.height <= 0.0 || self.probe.thickness <= 0.0 {
            return Err("probe dimensions must be > 0.0");
        }
        check_probe_fits(&self.probe, &self.pipe)?;
        check_materials(&[&self.wall, &self.gas, &self.probe_material])?;
        check_mesh(&self.mesh)?;
        check_temperatures(&self.temperatures)?;
        check_executables(&self.executables)?;
        Ok(())
    }

    /// Allocates a new instance with the reference case updated by (possibly nested) JSON values
    ///
    /// Objects are merged key by key; any other value replaces the reference value.
    pub fn from_overrides(overrides: Value) -> Result<Self, StrError> {
        let mut merged = serde_json::to_value(Config::new()).map_err(|_| "cannot serialize configuration")?;
        merge(&mut merged, overrides);
        let config: Config = serde_json::from_value(merged).map_err(|_| "JSON file has invalid configuration data")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON file with the fields to override and validates the result
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(file);
        let overrides: Value = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Config::from_overrides(overrides)
    }

    /// Writes a JSON file with this struct
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer_pretty(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

fn check_pipe(pipe: &ParamPipe) -> Result<(), StrError> {
    if pipe.outer_diameter <= 0.0 || pipe.inner_diameter <= 0.0 || pipe.length <= 0.0 {
        return Err("pipe dimensions must be > 0.0");
    }
    if pipe.inner_diameter >= pipe.outer_diameter {
        return Err("pipe inner diameter must be smaller than the outer diameter");
    }
    Ok(())
}

fn check_probe_fits(probe: &ParamProbe, pipe: &ParamPipe) -> Result<(), StrError> {
    if probe.height >= pipe.inner_diameter {
        return Err("probe height must be smaller than the pipe inner diameter");
    }
    if probe.thickness >= pipe.length {
        return Err("probe thickness must be smaller than the pipe length");
    }
    Ok(())
}

fn check_material(material: &ParamMaterial) -> Result<(), StrError> {
    if material.name.is_empty() {
        return Err("material name must not be empty");
    }
    if material.density <= 0.0 || material.heat_capacity <= 0.0 || material.heat_conductivity <= 0.0 {
        return Err("material properties must be > 0.0");
    }
    Ok(())
}

fn check_materials(materials: &[&ParamMaterial]) -> Result<(), StrError> {
    for (i, material) in materials.iter().enumerate() {
        check_material(material)?;
        for other in &materials[i + 1..] {
            if material.name == other.name && material != other {
                return Err("materials with the same name must have the same properties");
            }
        }
    }
    Ok(())
}

fn check_mesh(mesh: &ParamMesh) -> Result<(), StrError> {
    if mesh.size_bulk <= 0.0 || mesh.size_probe <= 0.0 {
        return Err("mesh sizes must be > 0.0");
    }
    if let Some(r) = mesh.refinement {
        if r.size <= 0.0 || r.exponent <= 0.0 || r.factor < 0.0 {
            return Err("refinement requires size > 0, exponent > 0, and factor ≥ 0");
        }
    }
    Ok(())
}

fn check_temperatures(temp: &ParamTemperatures) -> Result<(), StrError> {
    if temp.initial <= 0.0 || temp.lab <= 0.0 || temp.probe <= 0.0 {
        return Err("absolute temperatures must be > 0.0");
    }
    if let Some(t) = temp.gas_inlet {
        if t <= 0.0 {
            return Err("absolute temperatures must be > 0.0");
        }
    }
    Ok(())
}

fn check_executables(executables: &Executables) -> Result<(), StrError> {
    if executables.gmsh.is_empty() || executables.elmer_grid.is_empty() || executables.elmer_solver.is_empty() {
        return Err("executable names must not be empty");
    }
    Ok(())
}

/// Merges the overrides into the base value
fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, value) => *base = value,
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n").unwrap();
        write!(f, "==================\n").unwrap();
        write!(f, "pipe = {:?}\n", self.pipe).unwrap();
        write!(f, "probe = {:?}\n", self.probe).unwrap();
        write!(f, "mesh = {:?}\n", self.mesh).unwrap();
        write!(f, "temperatures = {:?}\n", self.temperatures).unwrap();

        write!(f, "\nMaterials\n").unwrap();
        write!(f, "=========\n").unwrap();
        write!(f, "gas → {:?}\n", self.gas).unwrap();
        write!(f, "wall → {:?}\n", self.wall).unwrap();
        write!(f, "probe → {:?}\n", self.probe_material).unwrap();

        write!(f, "\nExecutables\n").unwrap();
        write!(f, "===========\n").unwrap();
        write!(f, "{:?}\n", self.executables).unwrap();
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::base::{ParamMaterial, ParamMesh, ParamPipe, ParamProbe, ParamRefinement, ParamTemperatures};
    use crate::base::{Executables, DEFAULT_TEST_DIR};
    use crate::StrError;
    use std::fs;

    #[test]
    fn new_works() {
        let config = Config::new();
        assert_eq!(config.pipe.outer_diameter, 6e-3);
        assert_eq!(config.pipe.inner_diameter, 4e-3);
        assert_eq!(config.pipe.length, 100e-3);
        assert_eq!(config.probe.height, 2e-3);
        assert_eq!(config.probe.thickness, 1e-3);
        assert_eq!(config.gas.name, "gas");
        assert_eq!(config.wall.name, "steel_v2a");
        assert_eq!(config.temperatures.probe, 393.15);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn setters_work() -> Result<(), StrError> {
        let mut config = Config::new();
        config
            .set_pipe(ParamPipe {
                outer_diameter: 8e-3,
                inner_diameter: 6e-3,
                length: 50e-3,
            })?
            .set_probe(ParamProbe {
                height: 3e-3,
                thickness: 1.5e-3,
            })?
            .set_mesh(ParamMesh {
                size_bulk: 1e-3,
                size_probe: 1e-4,
                refinement: Some(ParamRefinement {
                    size: 1e-4,
                    exponent: 1.8,
                    factor: 1.0,
                }),
            })?
            .set_temperatures(ParamTemperatures {
                initial: 293.15,
                lab: 293.15,
                probe: 353.15,
                gas_inlet: Some(293.15),
            })?
            .set_gas(ParamMaterial {
                name: "nitrogen".to_string(),
                density: 1.165,
                heat_capacity: 1040.0,
                heat_conductivity: 0.02583,
            })?
            .set_wall(ParamMaterial::steel_v2a())?
            .set_probe_material(ParamMaterial::steel_v2a())?
            .set_executables(Executables::from_path())?;
        assert_eq!(config.pipe.length, 50e-3);
        assert_eq!(config.probe.height, 3e-3);
        assert_eq!(config.gas.name, "nitrogen");
        assert_eq!(config.temperatures.gas_inlet, Some(293.15));
        assert_eq!(config.validate(), Ok(()));
        Ok(())
    }

    #[test]
    fn setters_capture_errors() {
        let mut config = Config::new();
        let mut pipe = ParamPipe::swagelok_6mm();
        pipe.inner_diameter = 6e-3;
        assert_eq!(
            config.set_pipe(pipe).err(),
            Some("pipe inner diameter must be smaller than the outer diameter")
        );
        pipe.inner_diameter = 0.0;
        assert_eq!(config.set_pipe(pipe).err(), Some("pipe dimensions must be > 0.0"));
        pipe.inner_diameter = 1e-3; // the probe (2 mm) no longer fits
        assert_eq!(
            config.set_pipe(pipe).err(),
            Some("probe height must be smaller than the pipe inner diameter")
        );
        let probe = ParamProbe {
            height: 1e-3,
            thickness: 0.2,
        };
        assert_eq!(
            config.set_probe(probe).err(),
            Some("probe thickness must be smaller than the pipe length")
        );
        let mut gas = ParamMaterial::argon();
        gas.heat_conductivity = 0.0;
        assert_eq!(config.set_gas(gas).err(), Some("material properties must be > 0.0"));
        let mut steel = ParamMaterial::steel_v2a();
        steel.density = 8000.0;
        assert_eq!(
            config.set_probe_material(steel).err(),
            Some("materials with the same name must have the same properties")
        );
        let mut mesh = ParamMesh::reference();
        mesh.size_probe = -1.0;
        assert_eq!(config.set_mesh(mesh).err(), Some("mesh sizes must be > 0.0"));
        let mut temp = ParamTemperatures::reference();
        temp.gas_inlet = Some(-10.0);
        assert_eq!(
            config.set_temperatures(temp).err(),
            Some("absolute temperatures must be > 0.0")
        );
        let mut exe = Executables::from_path();
        exe.gmsh = String::new();
        assert_eq!(
            config.set_executables(exe).err(),
            Some("executable names must not be empty")
        );
        // nothing has changed
        assert_eq!(config.pipe.inner_diameter, 4e-3);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn json_works() -> Result<(), StrError> {
        let mut config = Config::new();
        config.temperatures.probe = 373.15;
        let path = format!("{}/config_json_works.json", DEFAULT_TEST_DIR);
        config.write_json(&path)?;
        let read = Config::read_json(&path)?;
        assert_eq!(read.temperatures.probe, 373.15);
        assert_eq!(read.gas.name, "gas");
        Ok(())
    }

    #[test]
    fn partial_json_keeps_reference_values() {
        let json = r#"{ "probe": { "height": 1.0e-3, "thickness": 0.5e-3 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.probe.height, 1e-3);
        assert_eq!(config.pipe.outer_diameter, 6e-3);
        assert_eq!(config.wall.heat_conductivity, 15.0);
    }

    #[test]
    fn validate_captures_conflicting_materials() {
        let mut config = Config::new();
        config.probe_material.heat_conductivity = 16.0; // same name as the wall
        assert_eq!(
            config.validate().err(),
            Some("materials with the same name must have the same properties")
        );
        config.probe_material.name = "steel_v4a".to_string();
        assert_eq!(config.validate(), Ok(()));
        config.gas.name = "steel_v2a".to_string();
        assert_eq!(
            config.validate().err(),
            Some("materials with the same name must have the same properties")
        );
    }

    #[test]
    fn validate_captures_empty_executables() {
        let mut config = Config::new();
        config.executables.elmer_grid = String::new();
        assert_eq!(config.validate().err(), Some("executable names must not be empty"));
    }

    #[test]
    fn read_json_merges_nested_fields() -> Result<(), StrError> {
        let path = format!("{}/config_read_json_merges.json", DEFAULT_TEST_DIR);
        fs::create_dir_all(DEFAULT_TEST_DIR).map_err(|_| "cannot create directory")?;

        fs::write(&path, r#"{ "temperatures": { "probe": 373.15 } }"#).map_err(|_| "cannot write file")?;
        let config = Config::read_json(&path)?;
        assert_eq!(config.temperatures.probe, 373.15);
        assert_eq!(config.temperatures.initial, 273.15);
        assert_eq!(config.temperatures.lab, 293.15);
        assert_eq!(config.temperatures.gas_inlet, None);

        fs::write(&path, r#"{ "gas": { "heat_conductivity": 0.02 } }"#).map_err(|_| "cannot write file")?;
        let config = Config::read_json(&path)?;
        assert_eq!(config.gas.name, "gas");
        assert_eq!(config.gas.density, 1.784);
        assert_eq!(config.gas.heat_conductivity, 0.02);

        let json = r#"{ "mesh": { "refinement": { "size": 1e-4, "exponent": 1.8, "factor": 1.0 } } }"#;
        fs::write(&path, json).map_err(|_| "cannot write file")?;
        let config = Config::read_json(&path)?;
        assert_eq!(config.mesh.size_bulk, 5e-4);
        assert_eq!(config.mesh.refinement.map(|r| r.exponent), Some(1.8));

        fs::write(&path, r#"{ "executables": { "gmsh": "" } }"#).map_err(|_| "cannot write file")?;
        assert_eq!(Config::read_json(&path).err(), Some("executable names must not be empty"));

        fs::write(&path, r#"{ "pipe": { "length": "long" } }"#).map_err(|_| "cannot write file")?;
        assert_eq!(
            Config::read_json(&path).err(),
            Some("JSON file has invalid configuration data")
        );

        fs::write(&path, r#"{ "pipe": "#).map_err(|_| "cannot write file")?;
        assert_eq!(Config::read_json(&path).err(), Some("cannot parse JSON file"));
        Ok(())
    }

    #[test]
    fn display_works() {
        let config = Config::new();
        let text = format!("{}", config);
        assert!(text.starts_with("Configuration data\n==================\n"));
        assert!(text.contains("gas → ParamMaterial { name: \"gas\""));
    }
}
