use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::consts::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubArgs,
}

#[derive(Debug, Subcommand)]
pub enum SubArgs {
    #[command(name = "deploy")]
    Deploy {
        #[command(flatten)]
        args: DeployArgs,
    },
    #[command(name = "genomes")]
    Genomes {
        #[command(flatten)]
        args: GenomesArgs,
    },
    #[command(name = "config")]
    Config {
        #[command(flatten)]
        args: ConfigArgs,
    },
    #[command(name = "sbatch")]
    Sbatch {
        #[command(flatten)]
        args: SbatchArgs,
    },
    #[command(name = "tree")]
    Tree {
        #[command(flatten)]
        args: TreeArgs,
    },
}

/// Bootstrap a pipeline project directory end to end
///
/// # Example
///
/// ```bash,no_run
/// fairpipe deploy fair_fastqc_multiqc -w /mnt/beegfs/userdata/me/project
/// ```
///
/// # Note
///
/// * Every step is existence-gated: artifacts already present are
///   kept, so re-running after a failure resumes the bootstrap.
/// * `--force` redeploys the workflow and removes stale run configs.
#[derive(Debug, Parser)]
pub struct DeployArgs {
    #[arg(
        help = "Pipeline to deploy (e.g. fair_fastqc_multiqc)",
        value_name = "PIPELINE",
        required = true
    )]
    pub pipeline: String,

    #[arg(
        short = 't',
        long = "tag",
        help = "Github tag version",
        value_name = "TAG",
        default_value = LATEST
    )]
    pub tag: String,

    #[arg(
        short = 'w',
        long = "workdir",
        help = "Path to working directory",
        value_name = "DIR",
        default_value = "."
    )]
    pub workdir: PathBuf,

    #[arg(
        short = 'm',
        long = "mem",
        help = "Amount of memory for the snakemake head job",
        value_name = "MEM",
        default_value = DEFAULT_MEM
    )]
    pub mem: String,

    #[arg(
        short = 'T',
        long = "time",
        help = "Wall time reservation, D-H:M:S",
        value_name = "TIME",
        default_value = DEFAULT_TIME
    )]
    pub time: String,

    #[arg(
        short = 'p',
        long = "profile-config",
        help = "Path to a fairpipe.toml overriding cluster paths",
        value_name = "FILE"
    )]
    pub profile_config: Option<PathBuf>,

    #[arg(short = 'f', long = "force", help = "Force pipeline over-writing")]
    pub force: bool,

    #[arg(short = 'v', long = "verbose", help = "Increase verbosity")]
    pub verbose: bool,
}

/// Write the genome manifest only
///
/// # Example
///
/// ```bash,no_run
/// fairpipe genomes -o config/genomes.csv
/// fairpipe genomes --empty
/// ```
#[derive(Debug, Parser)]
pub struct GenomesArgs {
    #[arg(
        short = 'o',
        long = "output",
        help = "Path to output manifest",
        value_name = "FILE",
        default_value = GENOMES_CSV
    )]
    pub output: PathBuf,

    #[arg(
        short = 'e',
        long = "empty",
        help = "Produce an empty genome manifest (identity columns only)"
    )]
    pub empty: bool,

    #[arg(short = 'f', long = "force", help = "Force over-writing")]
    pub force: bool,

    #[arg(short = 'v', long = "verbose", help = "Increase verbosity")]
    pub verbose: bool,
}

/// Write the run configuration only
///
/// # Example
///
/// ```bash,no_run
/// fairpipe config -P use_gatk=true -P threads=8
/// ```
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[arg(
        short = 's',
        long = "samples",
        help = "Path to the samples.csv file",
        value_name = "FILE",
        default_value = SAMPLES_CSV
    )]
    pub samples: PathBuf,

    #[arg(
        short = 'g',
        long = "genomes",
        help = "Path to the genomes.csv file",
        value_name = "FILE",
        default_value = GENOMES_CSV
    )]
    pub genomes: PathBuf,

    #[arg(
        short = 'o',
        long = "output",
        help = "Path to output file",
        value_name = "FILE",
        default_value = CONFIG_YAML
    )]
    pub output: PathBuf,

    #[arg(
        short = 'W',
        long = "workflow",
        help = "Path to the deployed Snakefile",
        value_name = "FILE",
        default_value = SNAKEFILE
    )]
    pub workflow: PathBuf,

    #[arg(
        short = 'P',
        long = "params",
        help = "A 'key=value' parameter",
        value_name = "KEY=VALUE",
        num_args = 1..,
    )]
    pub params: Vec<String>,

    #[arg(
        short = 'p',
        long = "profile-config",
        help = "Path to a fairpipe.toml overriding cluster paths",
        value_name = "FILE"
    )]
    pub profile_config: Option<PathBuf>,

    #[arg(short = 'f', long = "force", help = "Force over-writing")]
    pub force: bool,

    #[arg(short = 'v', long = "verbose", help = "Increase verbosity")]
    pub verbose: bool,
}

/// Write the sbatch launcher script only
///
/// # Example
///
/// ```bash,no_run
/// fairpipe sbatch -m 2G -T 1-00:00:00
/// ```
#[derive(Debug, Parser)]
pub struct SbatchArgs {
    #[arg(
        short = 'w',
        long = "workdir",
        help = "Path to working directory",
        value_name = "DIR",
        default_value = "."
    )]
    pub workdir: PathBuf,

    #[arg(
        short = 'c',
        long = "config",
        help = "Path to pipeline configuration file",
        value_name = "FILE",
        default_value = CONFIG_YAML
    )]
    pub config: PathBuf,

    #[arg(
        short = 'o',
        long = "output",
        help = "Path to launcher script",
        value_name = "FILE",
        default_value = SBATCH_SH
    )]
    pub output: PathBuf,

    #[arg(
        short = 'm',
        long = "mem",
        help = "Amount of memory for the snakemake head job",
        value_name = "MEM",
        default_value = DEFAULT_MEM
    )]
    pub mem: String,

    #[arg(
        short = 'T',
        long = "time",
        help = "Wall time reservation, D-H:M:S",
        value_name = "TIME",
        default_value = DEFAULT_TIME
    )]
    pub time: String,

    #[arg(
        short = 'p',
        long = "profile-config",
        help = "Path to a fairpipe.toml overriding cluster paths",
        value_name = "FILE"
    )]
    pub profile_config: Option<PathBuf>,

    #[arg(short = 'f', long = "force", help = "Force script over-writing")]
    pub force: bool,

    #[arg(short = 'v', long = "verbose", help = "Increase verbosity")]
    pub verbose: bool,
}

/// Produce an annotated tree of the target directory
///
/// # Example
///
/// ```bash,no_run
/// fairpipe tree -d /mnt/beegfs/userdata/me/project
/// ```
#[derive(Debug, Parser)]
pub struct TreeArgs {
    #[arg(
        short = 'd',
        long = "directory",
        help = "Directory to render",
        value_name = "DIR",
        default_value = "."
    )]
    pub directory: PathBuf,

    #[arg(short = 's', long = "skip-hidden", help = "Skip hidden files")]
    pub skip_hidden: bool,
}
