use super::SolverLog;
use crate::base::FilePath;
use crate::StrError;
use log::{debug, info, warn};
use std::fs::File;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Runs gmsh on the case script and writes the 2D mesh (case.geo → case.msh)
///
/// # Input
///
/// * `gmsh` -- name or path of the gmsh executable
/// * `sim_dir` -- the simulation directory containing case.geo
pub fn run_gmsh(gmsh: &str, sim_dir: &Path) -> Result<(), StrError> {
    let paths = FilePath::new(sim_dir);
    if !paths.geo().exists() {
        return Err("cannot find the gmsh script");
    }
    let geo = FilePath::filename("geo");
    let msh = FilePath::filename("msh");
    let output = run(gmsh, &[geo.as_str(), "-2", "-o", msh.as_str()], sim_dir)?;
    if !output.status.success() {
        warn_output("gmsh", &output);
        return Err("gmsh failed to generate the mesh");
    }
    if !paths.msh().exists() {
        return Err("gmsh did not write the mesh file");
    }
    info!("mesh written to {}", paths.msh().display());
    Ok(())
}

/// Opens the gmsh graphical interface with the mesh (or the script if there is no mesh yet)
pub fn show_gmsh(gmsh: &str, sim_dir: &Path) -> Result<(), StrError> {
    let paths = FilePath::new(sim_dir);
    let file = if paths.msh().exists() {
        FilePath::filename("msh")
    } else if paths.geo().exists() {
        FilePath::filename("geo")
    } else {
        return Err("there is nothing to show");
    };
    run(gmsh, &[file.as_str()], sim_dir)?;
    Ok(())
}

/// Runs ElmerGrid to convert the gmsh mesh into the Elmer mesh database (case.msh → case/)
pub fn run_elmer_grid(elmer_grid: &str, sim_dir: &Path) -> Result<(), StrError> {
    let paths = FilePath::new(sim_dir);
    if !paths.msh().exists() {
        return Err("cannot find the mesh file");
    }
    let msh = FilePath::filename("msh");
    let output = run(elmer_grid, &["14", "2", msh.as_str()], sim_dir)?;
    if !output.status.success() {
        warn_output("ElmerGrid", &output);
        return Err("ElmerGrid failed to convert the mesh");
    }
    if !paths.mesh_db().join("mesh.header").exists() {
        return Err("ElmerGrid did not write the mesh database");
    }
    info!("Elmer mesh written to {}", paths.mesh_db().display());
    Ok(())
}

/// Runs ElmerSolver, writes its output to elmersolver.log, and scans the log
///
/// The standard output and error streams share the log file, thus the lines keep the
/// order in which the solver wrote them. A failing solver is not an error here: the
/// returned log holds the error lines.
pub fn run_elmer_solver(elmer_solver: &str, sim_dir: &Path) -> Result<SolverLog, StrError> {
    let paths = FilePath::new(sim_dir);
    if !paths.startinfo().exists() {
        return Err("cannot find the startinfo file");
    }
    let file = File::create(paths.solver_log()).map_err(|_| "cannot write solver log")?;
    let file_err = file.try_clone().map_err(|_| "cannot write solver log")?;
    debug!("running {} in {}", elmer_solver, sim_dir.display());
    let status = Command::new(elmer_solver)
        .current_dir(sim_dir)
        .stdout(Stdio::from(file))
        .stderr(Stdio::from(file_err))
        .status()
        .map_err(|_| "cannot run external program (is it installed and in the PATH?)")?;
    let log = SolverLog::read(&paths.solver_log())?;
    if !status.success() {
        warn!("ElmerSolver exited with {}", status);
    }
    info!("solver log written to {}", paths.solver_log().display());
    Ok(log)
}

/// Runs a program inside the simulation directory and waits for it
fn run(program: &str, args: &[&str], dir: &Path) -> Result<Output, StrError> {
    debug!("running {} {} in {}", program, args.join(" "), dir.display());
    Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|_| "cannot run external program (is it installed and in the PATH?)")
}

/// Logs both output streams of a failed program
fn warn_output(program: &str, output: &Output) {
    warn!("{} exited with {}", program, output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.trim().is_empty() {
        warn!("{} stdout:\n{}", program, stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        warn!("{} stderr:\n{}", program, stderr.trim_end());
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{run_elmer_grid, run_elmer_solver, run_gmsh, show_gmsh};
    use crate::base::DEFAULT_TEST_DIR;
    use std::fs;
    use std::path::Path;

    #[test]
    fn functions_capture_missing_inputs() {
        let dir = format!("{}/execute_missing_inputs", DEFAULT_TEST_DIR);
        fs::create_dir_all(&dir).unwrap();
        let dir = Path::new(&dir);
        assert_eq!(run_gmsh("gmsh", dir).err(), Some("cannot find the gmsh script"));
        assert_eq!(show_gmsh("gmsh", dir).err(), Some("there is nothing to show"));
        assert_eq!(run_elmer_grid("ElmerGrid", dir).err(), Some("cannot find the mesh file"));
        assert_eq!(
            run_elmer_solver("ElmerSolver", dir).err(),
            Some("cannot find the startinfo file")
        );
    }

    #[test]
    fn missing_executable_is_captured() {
        let dir = format!("{}/execute_missing_executable", DEFAULT_TEST_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(format!("{}/case.geo", dir), "// empty\n").unwrap();
        assert_eq!(
            run_gmsh("__ofmsim_no_such_program__", Path::new(&dir)).err(),
            Some("cannot run external program (is it installed and in the PATH?)")
        );
    }

    #[cfg(unix)]
    fn write_script(path: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, format!("#!/bin/sh\n{}", body)).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn solver_log_keeps_the_order_of_both_streams() {
        let dir = format!("{}/execute_solver_streams", DEFAULT_TEST_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(format!("{}/ELMERSOLVER_STARTINFO", dir), "case.sif\n1\n").unwrap();
        let solver = format!("{}/fake_solver.sh", dir);
        write_script(
            &solver,
            "echo 'MAIN: starting'\n\
             echo 'ERROR:: ElmerSolver: Mesh not found' >&2\n\
             echo 'WARNING:: after the error'\n\
             exit 1\n",
        );
        let log = run_elmer_solver(&solver, Path::new(&dir)).unwrap();
        assert_eq!(log.errors, &["ERROR:: ElmerSolver: Mesh not found"]);
        assert_eq!(log.warnings, &["WARNING:: after the error"]);
        assert!(!log.success());
        let text = fs::read_to_string(format!("{}/elmersolver.log", dir)).unwrap();
        assert_eq!(
            text,
            "MAIN: starting\nERROR:: ElmerSolver: Mesh not found\nWARNING:: after the error\n"
        );
    }

    #[test]
    #[cfg(unix)]
    fn failing_mesher_is_captured() {
        let dir = format!("{}/execute_failing_mesher", DEFAULT_TEST_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(format!("{}/case.geo", dir), "// empty\n").unwrap();
        let gmsh = format!("{}/fake_gmsh.sh", dir);
        write_script(&gmsh, "echo 'Error: unknown entity' >&2\nexit 1\n");
        assert_eq!(
            run_gmsh(&gmsh, Path::new(&dir)).err(),
            Some("gmsh failed to generate the mesh")
        );
    }
}
