//! Properties checked on every URDF under tests/fixtures
//!
//! Run with: cargo test --test fixtures

use datatest_stable::Utf8Path;
use regex_lite::Regex;
use urdf_tidy::Config;

/// Relative tolerance when comparing values after scaling by s then 1/s
const RELATIVE_TOLERANCE: f64 = 1e-9;

/// Render a line diff between two texts, for failure messages
fn diff(expected: &str, actual: &str) -> String {
    let mut out = String::new();
    for chunk in dissimilar::diff(expected, actual) {
        match chunk {
            dissimilar::Chunk::Equal(_) => {}
            dissimilar::Chunk::Delete(text) => out.push_str(&format!("- {text:?}\n")),
            dissimilar::Chunk::Insert(text) => out.push_str(&format!("+ {text:?}\n")),
        }
    }
    out
}

/// Every origin, mass and inertia number in document order
fn scaled_values(source: &str) -> Vec<f64> {
    let re = Regex::new(r#"(?:xyz|<mass value|ixx|ixy|ixz|iyy|iyz|izz)="([^"]*)""#).unwrap();
    re.captures_iter(source)
        .flat_map(|caps| {
            caps[1]
                .split_whitespace()
                .map(|v| v.parse::<f64>().unwrap())
                .collect::<Vec<_>>()
        })
        .collect()
}

fn check_fixture(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let name = path.as_str();

    // Renaming twice changes nothing the second time
    let renamed = urdf_tidy::rename(name, &source)?;
    let again = urdf_tidy::rename(name, &renamed)?;
    if again != renamed {
        return Err(format!("second rename of {path} is not a no-op:\n{}", diff(&renamed, &again)).into());
    }

    // Scaling by s then 1/s restores origins, masses and inertias
    let config = Config::default();
    let shrunk = urdf_tidy::resize(name, &source, &config)?;
    let restored = urdf_tidy::resize(name, &shrunk, &config.inverse())?;
    let before = scaled_values(&renamed);
    let after = scaled_values(&restored);
    if before.len() != after.len() {
        return Err(format!("{path}: value count changed:\n{}", diff(&renamed, &restored)).into());
    }
    for (b, a) in before.iter().zip(&after) {
        let tolerance = RELATIVE_TOLERANCE * b.abs().max(1.0);
        if (a - b).abs() > tolerance {
            return Err(format!("{path}: {b} came back as {a}").into());
        }
    }

    // Every mesh gains one scale per resize
    let meshes = source.matches("<mesh ").count();
    if restored.matches(" scale=\"").count() != 2 * meshes {
        return Err(format!("{path}: expected two scale attributes per mesh").into());
    }

    // The renamed file has a printable tree that lists renamed joints only
    let listing = urdf_tidy::print_tree(name, &renamed, &config)?;
    if listing.lines.is_empty() {
        return Err(format!("{path}: empty joint tree").into());
    }
    if let Some(line) = listing.lines.iter().find(|l| !l.joint.ends_with("_joint")) {
        return Err(format!("{path}: {} was not renamed", line.joint).into());
    }

    Ok(())
}

datatest_stable::harness! {
    { test = check_fixture, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"), pattern = r"\.urdf$" },
}
