use clap::Parser;
use log::info;
use matrixoptics::{
    console::{Args, PartialArgs},
    error::OpmResult,
    reporter::PathReport,
    system_file::{OpticalPath, SystemDescription},
};

fn read_and_build_path(args: &Args) -> OpmResult<OpticalPath> {
    info!("reading system description {}", args.file_path.display());
    let description = SystemDescription::from_file(&args.file_path)?;
    let path = description.build()?;
    info!(
        "built path '{}' with {} elements",
        description.label,
        description.elements.len()
    );
    Ok(path)
}

fn main() -> OpmResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::try_from(PartialArgs::parse())?;
    let path = read_and_build_path(&args)?;
    let z = match (&path, args.z) {
        (_, Some(z)) => z,
        (OpticalPath::Imaging(path), None) => path.object_position(),
        (OpticalPath::Laser(_), None) => 0.0,
    };
    let report = PathReport::new(&path, z)?;
    info!("report created");
    println!("{}", args.format.serialize(&report)?);
    Ok(())
}
