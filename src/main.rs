use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use tiny_raster::app;

const USAGE: &str = "Usage: tiny_raster <filename.obj> [-c config.ron] [-o out.bmp] [-d depth.png]";

/// Parses `<mesh> [-c config] [-o output] [-d depth]`. None means the arguments are unusable.
fn parse_args(args: &[String]) -> Option<app::Params> {
    let mut mesh_path = None;
    let mut config_path = None;
    let mut output_path = None;
    let mut depth_path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" => { config_path = Some(PathBuf::from(args.get(i + 1)?)); i += 1; }
            "-o" => { output_path = Some(PathBuf::from(args.get(i + 1)?)); i += 1; }
            "-d" => { depth_path = Some(PathBuf::from(args.get(i + 1)?)); i += 1; }
            "-h" | "--help" => return None,
            path => {
                if mesh_path.is_some() {
                    return None;
                }
                mesh_path = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    let mut params = app::Params::new(mesh_path?);
    params.config_path = config_path;
    params.depth_path = depth_path;
    if let Some(path) = output_path {
        params.output_path = path;
    }
    return Some(params);
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let params = match parse_args(&args) {
        Some(params) => params,
        None => {
            println!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = app::run(params) {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    return ExitCode::SUCCESS;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        return std::iter::once("tiny_raster")
            .chain(list.iter().copied())
            .map(String::from)
            .collect();
    }

    #[test]
    fn test_missing_mesh_is_usage_error() {
        assert!(parse_args(&args(&[])).is_none());
        assert!(parse_args(&args(&["-o", "x.bmp"])).is_none());
    }

    #[test]
    fn test_flag_without_value() {
        assert!(parse_args(&args(&["model.obj", "-c"])).is_none());
    }

    #[test]
    fn test_defaults() {
        let params = parse_args(&args(&["model.obj"])).unwrap();
        assert_eq!(params.mesh_path, PathBuf::from("model.obj"));
        assert_eq!(params.output_path, PathBuf::from(app::DEFAULT_OUTPUT));
        assert!(params.config_path.is_none());
        assert!(params.depth_path.is_none());
    }

    #[test]
    fn test_all_flags() {
        let params = parse_args(&args(&["-c", "a.ron", "model.obj", "-o", "b.png", "-d", "z.png"])).unwrap();
        assert_eq!(params.mesh_path, PathBuf::from("model.obj"));
        assert_eq!(params.config_path, Some(PathBuf::from("a.ron")));
        assert_eq!(params.output_path, PathBuf::from("b.png"));
        assert_eq!(params.depth_path, Some(PathBuf::from("z.png")));
    }
}
