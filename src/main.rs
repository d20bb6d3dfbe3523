mod args;
mod disk_image;
mod file;

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use disk_image::{Format, Geometry};

fn main() {
    env_logger::init();
    let args = args::Args::parse();

    if let Err(msg) = run(&args) {
        println!("{} {}", "error:".bright_red().bold(), msg);
        std::process::exit(1);
    }
}

fn run(args: &args::Args) -> Result<(), String> {
    if let Some(path) = &args.to_hfe {
        return to_hfe(path, args);
    }
    if let Some(path) = &args.from_hfe {
        return from_hfe(path, args);
    }
    if let Some(path) = &args.hfe_info {
        return hfe_info_cmd(path);
    }
    if let Some(path) = &args.dump {
        return dump_cmd(path, args);
    }
    if let Some(path) = &args.filename {
        println!(
            "{} filesystem-level operations on \"{}\" are handled by an external sector-image tool, not this crate",
            "note:".yellow().bold(),
            path.display()
        );
        std::process::exit(1);
    }
    Err("no operation specified; use --to-hfe, --from-hfe, --hfe-info, --dump, or a bare filename".to_string())
}

fn to_hfe(path: &Path, args: &args::Args) -> Result<(), String> {
    let input = read(path)?;

    let mut geometry = Geometry::from_sector_image(&input).map_err(|e| e.to_string())?;
    if let Some(tracks) = args.tracks {
        geometry.tracks = tracks;
    }
    if let Some(sides) = args.sides {
        geometry.sides = sides;
    }
    if let Some(density) = &args.density {
        geometry.format = match density.to_lowercase().as_str() {
            "dd" => Format::Dd,
            "sd" => Format::Sd,
            other => return Err(format!("unknown density \"{}\" (expected \"sd\" or \"dd\")", other)),
        };
    }

    let hfe = disk_image::sector_to_hfe(&input, geometry, args.ignore_errors).map_err(|e| e.to_string())?;
    write(&args.output.clone().unwrap_or_else(|| default_output(path, "hfe")), hfe)
}

fn from_hfe(path: &Path, args: &args::Args) -> Result<(), String> {
    let input = read(path)?;
    let sectors = disk_image::hfe_to_sector(&input).map_err(|e| e.to_string())?;
    write(&args.output.clone().unwrap_or_else(|| default_output(path, "dsk")), sectors)
}

fn hfe_info_cmd(path: &Path) -> Result<(), String> {
    let input = read(path)?;
    let info = disk_image::hfe_info(&input).map_err(|e| e.to_string())?;

    println!("Tracks: {}", info.tracks);
    println!("Sides: {}", info.sides);
    println!("Encoding: {}", info.encoding);
    println!("Interface mode: {}", info.interface_mode);

    if !info.suitable_for_ti99() {
        println!("Not a suitable HFE image for the TI 99");
        std::process::exit(1);
    }
    Ok(())
}

fn dump_cmd(path: &Path, args: &args::Args) -> Result<(), String> {
    let input = read(path)?;
    let data = disk_image::hfe_raw_dump(&input).map_err(|e| e.to_string())?;
    write(&args.output.clone().unwrap_or_else(|| default_output(path, "dump")), data)
}

fn read(path: &Path) -> Result<Vec<u8>, String> {
    file::read_file(&path.to_path_buf()).map_err(|err| format!("unable to open \"{}\": {}", path.display(), err))
}

fn write(path: &PathBuf, data: Vec<u8>) -> Result<(), String> {
    file::write_file(path, data).map_err(|err| format!("unable to write \"{}\": {}", path.display(), err))
}

fn default_output(path: &Path, extension: &str) -> PathBuf {
    let mut out = path.to_path_buf();
    out.set_extension(extension);
    out
}
