// artifact paths, relative to the project working directory
pub const WORKFLOW_DIR: &str = "workflow";
pub const CONFIG_DIR: &str = "config";
pub const SCRIPTS_DIR: &str = "scripts";
pub const LOGS_DIR: &str = "logs";
pub const TMP_DIR: &str = "tmp";
pub const SHADOW_DIR: &str = "shadow";

pub const SNAKEFILE: &str = "workflow/Snakefile";
pub const GENOMES_CSV: &str = "config/genomes.csv";
pub const SAMPLES_CSV: &str = "config/samples.csv";
pub const CONFIG_YAML: &str = "config/config.yaml";
pub const SBATCH_SH: &str = "scripts/sbatch.sh";

// user dotfiles created on first run
pub const RENVIRON: &str = ".Renviron";
pub const CONDARC: &str = ".condarc";

// pipeline sources
pub const GITHUB_BASE: &str = "https://github.com/tdayris";
pub const LATEST: &str = "latest";

// Flamingo shared storage defaults, overridable through fairpipe.toml
pub const DEFAULT_PROFILE_DIR: &str =
    "/mnt/beegfs/pipelines/unofficial-snakemake-wrappers/profiles/slurm-web-8/";
pub const DEFAULT_SNAKEMAKE_CACHE: &str =
    "/mnt/beegfs/pipelines/unofficial-snakemake-wrappers/snakemake_cache";
pub const DEFAULT_CONDA_CACHE: &str =
    "/mnt/beegfs/pipelines/unofficial-snakemake-wrappers/conda_cache";
pub const DEFAULT_CONDA_ENV: &str =
    "/mnt/beegfs/pipelines/unofficial-snakemake-wrappers/shared_install/snakemake/";
pub const DEFAULT_SHARED_INSTALL: &str =
    "/mnt/beegfs/pipelines/unofficial-snakemake-wrappers/shared_install";
pub const DEFAULT_CONDA_BUILD_ROOT: &str =
    "/mnt/beegfs/pipelines/unofficial-snakemake-wrappers/conda_build";
pub const DEFAULT_SINGULARITY_DIR: &str =
    "/mnt/beegfs/pipelines/unofficial-snakemake-wrappers/singularity";
pub const DEFAULT_FASTQ_SCREEN_CONF: &str =
    "/mnt/beegfs/database/bioinfo/Index_DB/Fastq_Screen/0.14.0/fastq_screen.conf";

// environment variables produced by the normalizer
pub const BIGR_DEFAULT_TMP: &str = "BIGR_DEFAULT_TMP";
pub const SNAKEMAKE_OUTPUT_CACHE: &str = "SNAKEMAKE_OUTPUT_CACHE";
pub const CONDA_CACHE_PATH: &str = "CONDA_CACHE_PATH";
pub const SNAKEMAKE_PROFILE_PATH: &str = "SNAKEMAKE_PROFILE_PATH";
pub const SHARED_SINGULARITY_PATH: &str = "SHARED_SINGULARITY_PATH";
// historical name, downstream scripts read it as-is
pub const SHARED_CONDA_INSTALL: &str = "SHARED_CONDA_INDSTALL";

// Slurm queues, ordered by their wall-time ceiling in minutes
pub const SHORTQ: &str = "shortq";
pub const MEDIUMQ: &str = "mediumq";
pub const LONGQ: &str = "longq";
pub const VERYLONGQ: &str = "verylongq";

pub const SHORTQ_MINUTES: u64 = 360;
pub const MEDIUMQ_MINUTES: u64 = 1440;
pub const LONGQ_MINUTES: u64 = 10080;
pub const VERYLONGQ_MINUTES: u64 = 86400;

pub const MINUTES_PER_DAY: u64 = 1440;

// defaults for the sbatch generator
pub const DEFAULT_MEM: &str = "1G";
pub const DEFAULT_TIME: &str = "0-05:59:59";

// external collaborators
pub const SNAKEDEPLOY: &str = "snakedeploy";
pub const GIT: &str = "git";
