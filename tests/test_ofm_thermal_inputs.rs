use ofmsim::prelude::*;
use std::fs;
use std::path::Path;

// Reference case of the Open Flow Meter
//
// TEST GOAL
//
// This test verifies that all input files of the gmsh/Elmer chain are written
// to the simulation directory without running the external programs.
//
// GEOMETRY
//
// 6 mm OD / 4 mm ID pipe, 100 mm long; 1 mm × 2 mm PT100 at the center
//
// BOUNDARY CONDITIONS
//
// Outer pipe surfaces at 293.15 K; probe surface at 393.15 K
//
// CONFIGURATION AND PARAMETERS
//
// Steady simulation; argon in the channel; stainless steel V2A wall

#[test]
fn test_ofm_thermal_inputs() -> Result<(), StrError> {
    let sim_dir = format!("{}/ofm_thermal_inputs", DEFAULT_TEST_DIR);
    let _ = fs::remove_dir_all(&sim_dir);
    let sim_dir = Path::new(&sim_dir);

    let ofm = FlowMeter::new(Config::new())?;
    ofm.write_inputs(sim_dir)?;

    let paths = FilePath::new(sim_dir);
    assert!(paths.geo().exists());
    assert!(paths.sif().exists());
    assert!(paths.startinfo().exists());
    assert!(paths.config_json().exists());
    assert!(!paths.msh().exists());

    // gmsh script
    let geo = fs::read_to_string(paths.geo()).map_err(|_| "cannot read file")?;
    assert!(geo.starts_with("// model: OFM-Thermal\nSetFactory(\"OpenCASCADE\");\n"));
    assert_eq!(geo.matches("Rectangle(").count(), 4);
    assert_eq!(geo.matches("Physical Surface(").count(), 3);
    assert_eq!(geo.matches("Physical Curve(").count(), 4);
    assert!(geo.contains("Physical Curve(\"bnd_gas_in\", 4) = {bnd_gas_in[]};"));
    assert!(geo.contains("Physical Curve(\"bnd_pt100_T\", 7) = {bnd_pt100_T[]};"));
    assert!(geo.contains("Background Field = 3;"));

    // solver input
    let sif = fs::read_to_string(paths.sif()).map_err(|_| "cannot read file")?;
    assert!(sif.contains("  Mesh DB \".\" \"case\"\n"));
    assert_eq!(sif.matches("\nBody ").count(), 3);
    assert_eq!(sif.matches("\nSolver ").count(), 2);
    assert_eq!(sif.matches("\nEquation ").count(), 1);
    assert_eq!(sif.matches("\nMaterial ").count(), 2);
    assert_eq!(sif.matches("\nBoundary Condition ").count(), 2);

    // startinfo
    let startinfo = fs::read_to_string(paths.startinfo()).map_err(|_| "cannot read file")?;
    assert_eq!(startinfo, "case.sif\n1\n");

    // the written parameters reproduce the case
    let config = Config::read_json(&paths.config_json())?;
    assert_eq!(config.pipe.outer_diameter, 6e-3);
    assert_eq!(config.temperatures.lab, 293.15);
    Ok(())
}

#[test]
fn test_ofm_thermal_inputs_from_json() -> Result<(), StrError> {
    let sim_dir = format!("{}/ofm_thermal_inputs_from_json", DEFAULT_TEST_DIR);
    let _ = fs::remove_dir_all(&sim_dir);
    fs::create_dir_all(&sim_dir).map_err(|_| "cannot create directory")?;
    let json_path = format!("{}/custom.json", sim_dir);
    fs::write(
        &json_path,
        r#"{
            "temperatures": { "initial": 293.15, "lab": 293.15, "probe": 313.15, "gas_inlet": 293.15 },
            "mesh": {
                "size_bulk": 1e-3,
                "size_probe": 2e-4,
                "refinement": { "size": 1e-4, "exponent": 1.5, "factor": 2.0 }
            }
        }"#,
    )
    .map_err(|_| "cannot write file")?;

    let config = Config::read_json(&json_path)?;
    let ofm = FlowMeter::new(config)?;
    let sim_dir = Path::new(&sim_dir);
    ofm.write_inputs(sim_dir)?;

    let paths = FilePath::new(sim_dir);
    let geo = fs::read_to_string(paths.geo()).map_err(|_| "cannot read file")?;
    assert!(geo.contains("Field[1].VIn = 0.001;"));
    assert!(geo.contains("Field[2].VIn = 0.0002;"));
    assert!(geo.contains("Field[4].F = \"0.0001 + 2.0*F3^1.5\";"));
    let sif = fs::read_to_string(paths.sif()).map_err(|_| "cannot read file")?;
    assert!(sif.contains("  Temperature = 313.15\n"));
    assert_eq!(sif.matches("\nBoundary Condition ").count(), 3);

    // invalid parameters are rejected
    fs::write(&json_path, r#"{ "probe": { "height": 5e-3, "thickness": 1e-3 } }"#)
        .map_err(|_| "cannot write file")?;
    assert_eq!(
        Config::read_json(&json_path).err(),
        Some("probe height must be smaller than the pipe inner diameter")
    );
    Ok(())
}
