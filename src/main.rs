use clap::Parser;
use log::{error, info, warn, Level};
use simple_logger::init_with_level;

use fairpipe::cli::{Args, ConfigArgs, DeployArgs, GenomesArgs, SbatchArgs, SubArgs, TreeArgs};
use fairpipe::config::{ClusterProfile, Pipeline};
use fairpipe::core::{self, genomes, runconfig, sbatch, tree, Bootstrap};

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();

    let result = match args.command {
        SubArgs::Deploy { args } => deploy(args),
        SubArgs::Genomes { args } => write_genomes(args),
        SubArgs::Config { args } => write_config(args),
        SubArgs::Sbatch { args } => write_sbatch(args),
        SubArgs::Tree { args } => render_tree(args),
    };

    result.unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}

fn deploy(args: DeployArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline: Pipeline = args.pipeline.parse()?;
    let profile = ClusterProfile::read(args.profile_config)?;

    let ctx = Bootstrap {
        pipeline,
        tag: args.tag,
        workdir: args.workdir,
        profile,
        mem: args.mem,
        time: args.time,
        force: args.force,
        verbose: args.verbose,
    };

    core::run(&ctx)
}

fn write_genomes(args: GenomesArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        warn!(
            "WARNING: A genome manifest already exists at {}",
            args.output.display()
        );
        return Ok(());
    }

    let catalog = genomes::catalog();
    if !args.empty {
        genomes::check_resources(&catalog)?;
    }

    genomes::write_manifest(&catalog, &args.output, args.empty)
}

fn write_config(args: ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        warn!(
            "WARNING: A configuration file already exists at {}",
            args.output.display()
        );
        return Ok(());
    }

    for required in [&args.samples, &args.genomes, &args.workflow] {
        if !required.exists() {
            return Err(format!("ERROR: Could not find {}", required.display()).into());
        }
    }

    let profile = ClusterProfile::read(args.profile_config)?;
    let config = runconfig::build(
        &args.samples,
        &args.genomes,
        &args.workflow,
        &profile.fastq_screen_config,
        &args.params,
    );

    runconfig::write_config(&config, &args.output)
}

fn write_sbatch(args: SbatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        warn!(
            "WARNING: A launcher script already exists at {}",
            args.output.display()
        );
        return Ok(());
    }

    let profile = ClusterProfile::read(args.profile_config)?;
    sbatch::write_sbatch(
        &args.workdir,
        &args.config,
        &args.output,
        &profile,
        &args.mem,
        &args.time,
    )
    .map(|_| ())
}

fn render_tree(args: TreeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = tree::render(&args.directory, args.skip_hidden)?;
    println!("{}", rendered);

    Ok(())
}
