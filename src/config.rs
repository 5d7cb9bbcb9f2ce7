use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::consts::*;

/// A deployable fair Snakemake pipeline.
///
/// Each variant maps onto one repository under
/// `https://github.com/tdayris`.
///
/// # Example
///
/// ``` rust, no_run
/// use fairpipe::config::Pipeline;
///
/// let pipeline: Pipeline = "fair_fastqc_multiqc".parse().unwrap();
///
/// assert_eq!(pipeline, Pipeline::FairFastqcMultiqc);
/// ```
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipeline {
    FairGenomeIndexer,
    FairFastqcMultiqc,
    FairRnaseqSalmonQuant,
    FairBowtie2Mapping,
    FairStarMapping,
}

impl Pipeline {
    /// All pipelines known to this deployment helper.
    pub fn all() -> &'static [Pipeline] {
        &[
            Pipeline::FairGenomeIndexer,
            Pipeline::FairFastqcMultiqc,
            Pipeline::FairRnaseqSalmonQuant,
            Pipeline::FairBowtie2Mapping,
            Pipeline::FairStarMapping,
        ]
    }

    /// Convert a Pipeline to its repository/manifest name.
    ///
    /// # Example
    ///
    /// ``` rust, no_run
    /// use fairpipe::config::Pipeline;
    ///
    /// let s = Pipeline::FairGenomeIndexer.to_str();
    ///
    /// assert_eq!(s, "fair_genome_indexer");
    /// ```
    pub fn to_str(&self) -> &'static str {
        match self {
            Pipeline::FairGenomeIndexer => "fair_genome_indexer",
            Pipeline::FairFastqcMultiqc => "fair_fastqc_multiqc",
            Pipeline::FairRnaseqSalmonQuant => "fair_rnaseq_salmon_quant",
            Pipeline::FairBowtie2Mapping => "fair_bowtie2_mapping",
            Pipeline::FairStarMapping => "fair_star_mapping",
        }
    }

    /// Github address of the pipeline repository.
    pub fn repo_url(&self) -> String {
        format!("{}/{}", GITHUB_BASE, self.to_str())
    }
}

impl std::str::FromStr for Pipeline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fair_genome_indexer" => Ok(Pipeline::FairGenomeIndexer),
            "fair_fastqc_multiqc" => Ok(Pipeline::FairFastqcMultiqc),
            "fair_rnaseq_salmon_quant" => Ok(Pipeline::FairRnaseqSalmonQuant),
            "fair_bowtie2_mapping" => Ok(Pipeline::FairBowtie2Mapping),
            "fair_star_mapping" => Ok(Pipeline::FairStarMapping),
            _ => Err(format!(
                "ERROR: Unknown pipeline '{}'. Known pipelines: {}",
                s,
                Pipeline::all()
                    .iter()
                    .map(|p| p.to_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

impl std::fmt::Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Cluster-wide paths used by every launcher.
///
/// Values default to the Flamingo shared storage layout and may be
/// overridden through an optional `fairpipe.toml`:
///
/// ``` toml
/// conda_env = "/mnt/beegfs/userdata/me/anaconda/envs/snakemake"
/// snakemake_cache = "/mnt/beegfs/scratch/me/snakemake_cache"
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct ClusterProfile {
    #[serde(default = "default_profile_dir")]
    pub profile_dir: PathBuf,
    #[serde(default = "default_snakemake_cache")]
    pub snakemake_cache: PathBuf,
    #[serde(default = "default_conda_cache")]
    pub conda_cache: PathBuf,
    #[serde(default = "default_conda_env")]
    pub conda_env: PathBuf,
    #[serde(default = "default_shared_install")]
    pub shared_install: PathBuf,
    #[serde(default = "default_conda_build_root")]
    pub conda_build_root: PathBuf,
    #[serde(default = "default_singularity_dir")]
    pub singularity_dir: PathBuf,
    #[serde(default = "default_fastq_screen_config")]
    pub fastq_screen_config: PathBuf,
    /// Fallback temp location. When unset, `<workdir>/tmp` is used.
    #[serde(default)]
    pub default_tmp: Option<PathBuf>,
}

fn default_profile_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PROFILE_DIR)
}

fn default_snakemake_cache() -> PathBuf {
    PathBuf::from(DEFAULT_SNAKEMAKE_CACHE)
}

fn default_conda_cache() -> PathBuf {
    PathBuf::from(DEFAULT_CONDA_CACHE)
}

fn default_conda_env() -> PathBuf {
    PathBuf::from(DEFAULT_CONDA_ENV)
}

fn default_shared_install() -> PathBuf {
    PathBuf::from(DEFAULT_SHARED_INSTALL)
}

fn default_conda_build_root() -> PathBuf {
    PathBuf::from(DEFAULT_CONDA_BUILD_ROOT)
}

fn default_singularity_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SINGULARITY_DIR)
}

fn default_fastq_screen_config() -> PathBuf {
    PathBuf::from(DEFAULT_FASTQ_SCREEN_CONF)
}

impl Default for ClusterProfile {
    fn default() -> Self {
        Self {
            profile_dir: default_profile_dir(),
            snakemake_cache: default_snakemake_cache(),
            conda_cache: default_conda_cache(),
            conda_env: default_conda_env(),
            shared_install: default_shared_install(),
            conda_build_root: default_conda_build_root(),
            singularity_dir: default_singularity_dir(),
            fastq_screen_config: default_fastq_screen_config(),
            default_tmp: None,
        }
    }
}

impl ClusterProfile {
    /// Read a profile file, falling back to compiled-in defaults when the
    /// caller provided no path.
    ///
    /// # Example
    ///
    /// ``` rust, no_run
    /// use fairpipe::config::ClusterProfile;
    /// use std::path::PathBuf;
    ///
    /// let profile = ClusterProfile::read(Some(PathBuf::from("fairpipe.toml")));
    /// ```
    pub fn read(path: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = match path {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        let mut file = File::open(&path)
            .map_err(|e| format!("ERROR: Could not open profile {}: {}", path.display(), e))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let profile: ClusterProfile = toml::from_str(&contents)?;

        Ok(profile)
    }
}

/// Pipeline identity written into `config/config.yaml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PipelineInfo {
    pub name: String,
    pub tag: String,
}

/// Content of the run configuration consumed by the deployed
/// Snakemake workflow.
///
/// # Example
///
/// ``` yaml
/// genomes: config/genomes.csv
/// samples: config/samples.csv
/// pipeline:
///   name: fair_fastqc_multiqc
///   tag: 2.5.1
/// params:
///   fair_fastqc_multiqc_fastq_screen_config: /path/to/fastq_screen.conf
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunConfig {
    pub genomes: String,
    pub samples: String,
    pub pipeline: PipelineInfo,
    pub params: BTreeMap<String, ParamValue>,
}

/// A single run configuration parameter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Parse the value half of a `key=value` CLI parameter, coercing
    /// `true`/`false` (case-insensitive) into booleans and bare numbers
    /// into integers.
    pub fn coerce(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "true" => return ParamValue::Bool(true),
            "false" => return ParamValue::Bool(false),
            _ => {}
        }

        if let Ok(i) = raw.parse::<i64>() {
            return ParamValue::Int(i);
        }

        ParamValue::Str(raw.to_string())
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(flt) => write!(f, "{}", flt),
            ParamValue::Str(s) => write!(f, "{}", s),
        }
    }
}
