#![allow(dead_code)]
#![deny(unused_must_use)]

use std::{env, fs, path::PathBuf};

use xshell::{cmd, Shell};

fn main() -> Result<(), anyhow::Error> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let args = args.iter().map(|s| &**s).collect::<Vec<_>>();

    let sh = Shell::new()?;
    match &args[..] {
        ["ci"] => test_ci(&sh),
        ["update"] => update(&sh),
        _ => {
            println!("USAGE cargo xtask [ci|update]");
            Ok(())
        }
    }
}

fn update(sh: &Shell) -> Result<(), anyhow::Error> {
    let _p = sh.push_dir(root_dir());
    cmd!(sh, "cargo update").run()?;
    Ok(())
}

fn test_ci(sh: &Shell) -> Result<(), anyhow::Error> {
    let _e = sh.push_env("CI", "true");
    check_format(sh)?;
    test_device(sh)?;
    let mut demos_dir = root_dir();
    demos_dir.push("demos");
    do_demos(demos_dir, &|path| build_demo(sh, path))?;
    Ok(())
}

fn check_format(sh: &Shell) -> Result<(), anyhow::Error> {
    let _p = sh.push_dir(root_dir());
    cmd!(sh, "cargo fmt --all -- --check").run()?;
    Ok(())
}

fn test_device(sh: &Shell) -> Result<(), anyhow::Error> {
    let mut device = root_dir();
    device.push("device");

    let _p = sh.push_dir(&device);

    cmd!(sh, "cargo test").run()?;
    cmd!(sh, "cargo test --features low-power").run()?;
    cmd!(sh, "cargo check --no-default-features").run()?;
    Ok(())
}

fn do_demos<F: Fn(PathBuf) -> Result<(), anyhow::Error>>(
    current_dir: PathBuf,
    f: &F,
) -> Result<(), anyhow::Error> {
    for entry in fs::read_dir(current_dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.ends_with("Cargo.toml") {
            f(path.clone())?;
        }

        let file_type = entry.file_type()?;
        if file_type.is_dir() && !path.ends_with("target") {
            do_demos(path, f)?;
        }
    }

    Ok(())
}

fn build_demo(sh: &Shell, project_file: PathBuf) -> Result<(), anyhow::Error> {
    println!("Building demo {}", project_file.to_str().unwrap_or(""));
    let dir = project_file
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent directory"))?;
    let _p = sh.push_dir(dir);
    cmd!(sh, "cargo build --release").run()?;
    Ok(())
}

fn root_dir() -> PathBuf {
    let mut xtask_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    xtask_dir.pop();
    xtask_dir
}
