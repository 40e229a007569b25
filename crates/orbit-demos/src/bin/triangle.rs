use std::process::ExitCode;

use orbit_demos::SceneConfig;

fn main() -> ExitCode {
    orbit_demos::run(SceneConfig::triangle())
}
