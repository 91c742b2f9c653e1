use camino::{Utf8Path, Utf8PathBuf};
use miette::{IntoDiagnostic, WrapErr};
use urdf_tidy::Config;

const USAGE: &str = "\
Usage: urdf-tidy <command> [options] FILE...
Commands:
  rename    Rename joints and links, writing FILE_.urdf next to FILE.urdf
  resize    Rename and rescale, writing FILE_.urdf next to FILE.urdf
              --scale S            linear scale factor (default 0.1)
              --margin M           mimic limit margin (default 1.25)
              --importer-scaling   inertia s^3, effort s^4, damping s^3
              --fix-mimic          turn mimic joints into fixed joints
  print     Print the joint tree of each FILE
              --root NAME          link to start from (default base_link)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Rename,
    Resize,
    Print,
}

#[derive(Debug)]
struct Invocation {
    command: Command,
    config: Config,
    files: Vec<Utf8PathBuf>,
}

fn main() -> miette::Result<()> {
    // Logs go to stderr; stdout carries the printed tree
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    for path in &invocation.files {
        match invocation.command {
            Command::Rename | Command::Resize => transform_file(&invocation, path)?,
            Command::Print => print_file(&invocation.config, path)?,
        }
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let Some(command) = args.first() else {
        return Err("missing command".to_string());
    };
    let command = match command.as_str() {
        "rename" => Command::Rename,
        "resize" => Command::Resize,
        "print" => Command::Print,
        other => return Err(format!("Unknown command: {other}")),
    };

    let mut config = Config::default();
    let mut files = Vec::new();
    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        match (command, arg.as_str()) {
            (Command::Resize, "--scale") => config.resize_scale = number(arg, rest.next())?,
            (Command::Resize, "--margin") => config.mimic_margin = number(arg, rest.next())?,
            (Command::Resize, "--importer-scaling") => config.use_importer_scaling = true,
            (Command::Resize, "--fix-mimic") => config.fix_mimic_joints = true,
            (Command::Print, "--root") => {
                config.root_link = rest
                    .next()
                    .ok_or_else(|| format!("{arg} needs a value"))?
                    .clone();
            }
            (_, flag) if flag.starts_with("--") => {
                return Err(format!("Unknown option for this command: {flag}"));
            }
            (_, file) => files.push(Utf8PathBuf::from(file)),
        }
    }

    if files.is_empty() {
        return Err("no input files".to_string());
    }
    Ok(Invocation {
        command,
        config,
        files,
    })
}

fn number(flag: &str, value: Option<&String>) -> Result<f64, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .map_err(|_| format!("{flag} expects a number, got {value:?}"))
}

fn transform_file(invocation: &Invocation, path: &Utf8Path) -> miette::Result<()> {
    if urdf_tidy::is_tidied_output(path) {
        tracing::warn!(%path, "skipping output of a previous run");
        return Ok(());
    }

    let source = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {path}"))?;
    let output = match invocation.command {
        Command::Resize => urdf_tidy::resize(path.as_str(), &source, &invocation.config)?,
        _ => urdf_tidy::rename(path.as_str(), &source)?,
    };

    let target = urdf_tidy::output_path(path);
    std::fs::write(&target, output)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write {target}"))?;
    tracing::info!(input = %path, output = %target, "wrote");
    Ok(())
}

fn print_file(config: &Config, path: &Utf8Path) -> miette::Result<()> {
    let source = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {path}"))?;
    let absolute = path.canonicalize_utf8().unwrap_or_else(|_| path.to_path_buf());
    let listing = urdf_tidy::print_tree(path.as_str(), &source, config)?;

    println!("{absolute}");
    print!("{listing}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_resize_flags() {
        let invocation = parse_args(&args(&[
            "resize",
            "--scale",
            "0.5",
            "--fix-mimic",
            "robot.urdf",
            "--margin",
            "1.0",
            "arm.urdf",
        ]))
        .unwrap();
        assert_eq!(invocation.command, Command::Resize);
        assert_eq!(invocation.config.resize_scale, 0.5);
        assert_eq!(invocation.config.mimic_margin, 1.0);
        assert!(invocation.config.fix_mimic_joints);
        assert!(!invocation.config.use_importer_scaling);
        let files: Vec<_> = invocation.files.iter().map(|f| f.as_str()).collect();
        assert_eq!(files, ["robot.urdf", "arm.urdf"]);
    }

    #[test]
    fn print_takes_a_root() {
        let invocation = parse_args(&args(&["print", "--root", "world", "a_.urdf"])).unwrap();
        assert_eq!(invocation.command, Command::Print);
        assert_eq!(invocation.config.root_link, "world");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&[]).is_err());
        assert!(parse_args(&args(&["explode", "a.urdf"])).is_err());
        assert!(parse_args(&args(&["rename"])).is_err());
        assert!(parse_args(&args(&["rename", "--scale", "2", "a.urdf"])).is_err());
        assert!(parse_args(&args(&["resize", "--scale", "big", "a.urdf"])).is_err());
        assert!(parse_args(&args(&["resize", "a.urdf", "--margin"])).is_err());
    }
}
