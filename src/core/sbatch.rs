use log::{info, warn};

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ClusterProfile, RunConfig};
use crate::consts::*;

/// Convert `D-H:M:S`, `H:M:S` or bare minutes into minutes.
///
/// # Example
///
/// ``` rust, no_run
/// use fairpipe::core::sbatch::time_to_minutes;
///
/// let minutes = time_to_minutes("1-02:30:00").unwrap();
///
/// assert_eq!(minutes, 1590);
/// ```
pub fn time_to_minutes(time: &str) -> Result<u64, Box<dyn std::error::Error>> {
    if let Some((days, hours)) = time.split_once('-') {
        let days: u64 = days
            .trim()
            .parse()
            .map_err(|_| format!("ERROR: Invalid day count in '{}'", time))?;
        return Ok(days * MINUTES_PER_DAY + time_to_minutes(hours)?);
    }

    if time.contains(':') {
        let fields: Vec<&str> = time.split(':').collect();
        if fields.len() != 3 {
            return Err(format!("ERROR: Invalid time reservation '{}'", time).into());
        }

        let hours: u64 = fields[0].parse()?;
        let minutes: u64 = fields[1].parse()?;
        let seconds: f64 = fields[2].parse()?;

        return Ok(hours * 60 + minutes + (seconds / 60.0).round() as u64);
    }

    let minutes: f64 = time
        .parse()
        .map_err(|_| format!("ERROR: Invalid time reservation '{}'", time))?;

    Ok(minutes.round() as u64)
}

/// Render minutes back into the `D-H:M:00` form Slurm expects.
pub fn minutes_to_human_readable(minutes: u64) -> String {
    let days = minutes / MINUTES_PER_DAY;
    let minutes = minutes % MINUTES_PER_DAY;
    let hours = minutes / 60;
    let minutes = minutes % 60;

    format!("{}-{}:{}:00", days, hours, minutes)
}

/// Select the cheapest queue able to host the reservation.
///
/// # Example
///
/// ``` rust, no_run
/// use fairpipe::core::sbatch::select_queue;
///
/// let queue = select_queue(359).unwrap();
///
/// assert_eq!(queue, "shortq");
/// ```
pub fn select_queue(minutes: u64) -> Result<&'static str, Box<dyn std::error::Error>> {
    if minutes <= SHORTQ_MINUTES {
        return Ok(SHORTQ);
    }

    if minutes <= MEDIUMQ_MINUTES {
        return Ok(MEDIUMQ);
    }

    if minutes <= LONGQ_MINUTES {
        return Ok(LONGQ);
    }

    if minutes <= VERYLONGQ_MINUTES {
        return Ok(VERYLONGQ);
    }

    Err(format!(
        "ERROR: Too much time requested: {}",
        minutes_to_human_readable(minutes)
    )
    .into())
}

/// Derive the Slurm job name from the run configuration.
///
/// Spaces are stripped, dashes and dots become underscores, and the
/// pipeline tag is appended when known.
pub fn job_name(config: &RunConfig) -> String {
    let name = capitalize(&config.pipeline.name.replace(' ', "").replace('-', "_"));
    let tag = config.pipeline.tag.replace('.', "_");

    if tag.to_lowercase() == "unknown" {
        name
    } else {
        format!("{}_version_{}", name, tag)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str(),
        None => String::new(),
    }
}

/// Render the sbatch launcher script.
///
/// The script re-asserts the temp-variable policy at runtime: compute
/// nodes may start jobs with a clean environment, so the exports done
/// by the deployment helper cannot be relied upon.
pub fn render(
    workdir: &Path,
    output: &Path,
    profile: &ClusterProfile,
    config: &RunConfig,
    mem: &str,
    minutes: u64,
    queue: &str,
) -> String {
    let job_name = job_name(config);
    let time = minutes_to_human_readable(minutes);
    let log_dir = workdir.join(LOGS_DIR);
    let tmp_dir = workdir.join(TMP_DIR);
    let conda_sh = profile.conda_env.join("etc/profile.d/conda.sh");
    let mamba_sh = profile.conda_env.join("etc/profile.d/mamba.sh");

    let lines: Vec<String> = vec![
        "#!/usr/bin/bash".into(),
        "".into(),
        "# Launch this pipeline with:".into(),
        format!("# sbatch {}", output.display()),
        format!("# Generated on {}", chrono::Local::now().format("%Y-%m-%d %H:%M")),
        "".into(),
        "# Slurm parameters".into(),
        format!("#SBATCH --job-name='{}'", job_name),
        format!("#SBATCH --output='{}/%x_%j_%u.out'", log_dir.display()),
        format!("#SBATCH --error='{}/%x_%j_%u.err'", log_dir.display()),
        format!("#SBATCH --mem='{}'", mem),
        "#SBATCH --cpus-per-task='1'".into(),
        format!("#SBATCH --time='{}'", time),
        format!("#SBATCH --chdir='{}'", workdir.display()),
        format!("#SBATCH --partition='{}'", queue),
        format!(
            "#SBATCH --comment='Snakemake launcher for {}'",
            job_name.replace('_', " ")
        ),
        "".into(),
        "# Ensure bash works properly or stops".into(),
        "set -eiop 'pipefail'".into(),
        "shopt -s nullglob".into(),
        "".into(),
        "# Used locally on Flamingo".into(),
        "if [ -z \"${BIGR_DEFAULT_TMP}\" ]; then".into(),
        format!("  BIGR_DEFAULT_TMP='{}'", tmp_dir.display()),
        "fi".into(),
        "export BIGR_DEFAULT_TMP".into(),
        "".into(),
        "# Used in many bash / Python scripts".into(),
        "if [ -z \"${TMP}\" ]; then".into(),
        format!("  TMP='{}'", tmp_dir.display()),
        "  export TMP".into(),
        "fi".into(),
        "".into(),
        "# Used in some bash / R / perl / Python scripts".into(),
        "if [ -z \"${TEMP}\" ]; then".into(),
        format!("  TEMP='{}'", tmp_dir.display()),
        "  export TEMP".into(),
        "fi".into(),
        "".into(),
        "# Used in some bash / R / perl / Python scripts".into(),
        "if [ -z \"${TMPDIR}\" ]; then".into(),
        format!("  TMPDIR='{}'", tmp_dir.display()),
        "  export TMPDIR".into(),
        "fi".into(),
        "".into(),
        "# Used in some bash / R / perl scripts".into(),
        "if [ -z \"${TEMPDIR}\" ]; then".into(),
        format!("  TEMPDIR='{}'", tmp_dir.display()),
        "  export TEMPDIR".into(),
        "fi".into(),
        "".into(),
        "# Used in nextflow / java scripts".into(),
        "if [ -z \"${_JAVA_OPTIONS}\" ]; then".into(),
        format!("  _JAVA_OPTIONS='-Djava.io.tmpdir=\"{}\"'", tmp_dir.display()),
        "  export _JAVA_OPTIONS".into(),
        "fi".into(),
        "".into(),
        "# Snakemake cache, avoids redundant indexation steps".into(),
        format!(
            "declare -x SNAKEMAKE_OUTPUT_CACHE='{}'",
            profile.snakemake_cache.display()
        ),
        "# Conda cache, avoids repetitive package downloads".into(),
        format!(
            "declare -x CONDA_CACHE_PATH='{}'",
            profile.conda_cache.display()
        ),
        "export SNAKEMAKE_OUTPUT_CACHE".into(),
        "".into(),
        "# Logging details".into(),
        "date".into(),
        "hostname".into(),
        "".into(),
        "# Conda environment".into(),
        format!("source '{}'", conda_sh.display()),
        format!("source '{}'", mamba_sh.display()),
        format!("conda activate '{}'", profile.conda_env.display()),
        "".into(),
        "# Run pipeline".into(),
        format!("snakemake --profile '{}'", profile.profile_dir.display()),
        "".into(),
    ];

    lines.join("\n")
}

/// Build and write `scripts/sbatch.sh` for a project directory.
///
/// Also creates the `logs/`, `tmp/` and `scripts/` directories the
/// script depends on.
pub fn write_sbatch(
    workdir: &Path,
    config_path: &Path,
    output: &Path,
    profile: &ClusterProfile,
    mem: &str,
    time: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    for dir in [LOGS_DIR, TMP_DIR, SCRIPTS_DIR] {
        fs::create_dir_all(workdir.join(dir))?;
    }

    let minutes = time_to_minutes(time)?;
    let queue = select_queue(minutes)?;

    let config: RunConfig = match fs::read_to_string(config_path) {
        Ok(contents) => serde_yaml::from_str(&contents)?,
        Err(e) => {
            warn!(
                "WARNING: Could not read {} ({}), job will be named after the directory",
                config_path.display(),
                e
            );
            RunConfig {
                genomes: GENOMES_CSV.to_string(),
                samples: SAMPLES_CSV.to_string(),
                pipeline: crate::config::PipelineInfo {
                    name: "Snakemake_Pipeline".to_string(),
                    tag: "unknown".to_string(),
                },
                params: Default::default(),
            }
        }
    };

    let script = render(workdir, output, profile, &config, mem, minutes, queue);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, script)?;

    info!(
        "INFO: sbatch launcher available at {} (queue {}, {} minutes)",
        output.display(),
        queue,
        minutes
    );

    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineInfo;

    fn run_config(name: &str, tag: &str) -> RunConfig {
        RunConfig {
            genomes: GENOMES_CSV.to_string(),
            samples: SAMPLES_CSV.to_string(),
            pipeline: PipelineInfo {
                name: name.to_string(),
                tag: tag.to_string(),
            },
            params: Default::default(),
        }
    }

    #[test]
    fn minutes_from_every_accepted_format() {
        assert_eq!(time_to_minutes("90").unwrap(), 90);
        assert_eq!(time_to_minutes("02:30:00").unwrap(), 150);
        assert_eq!(time_to_minutes("0-05:59:59").unwrap(), 360);
        assert_eq!(time_to_minutes("1-02:30:00").unwrap(), 1590);
        assert_eq!(time_to_minutes("2-00:00:00").unwrap(), 2880);
    }

    #[test]
    fn bad_time_formats_are_rejected() {
        assert!(time_to_minutes("abc").is_err());
        assert!(time_to_minutes("1:2").is_err());
        assert!(time_to_minutes("x-01:00:00").is_err());
    }

    #[test]
    fn human_readable_roundtrip() {
        assert_eq!(minutes_to_human_readable(1590), "1-2:30:00");
        assert_eq!(minutes_to_human_readable(360), "0-6:0:00");
    }

    #[test]
    fn queue_selection_boundaries() {
        assert_eq!(select_queue(1).unwrap(), SHORTQ);
        assert_eq!(select_queue(360).unwrap(), SHORTQ);
        assert_eq!(select_queue(361).unwrap(), MEDIUMQ);
        assert_eq!(select_queue(1440).unwrap(), MEDIUMQ);
        assert_eq!(select_queue(1441).unwrap(), LONGQ);
        assert_eq!(select_queue(10080).unwrap(), LONGQ);
        assert_eq!(select_queue(10081).unwrap(), VERYLONGQ);
        assert_eq!(select_queue(86400).unwrap(), VERYLONGQ);
    }

    #[test]
    fn absurd_reservations_are_fatal() {
        let err = select_queue(86401).unwrap_err();
        assert!(err.to_string().contains("Too much time requested"));
    }

    #[test]
    fn job_name_includes_tag_when_known() {
        let config = run_config("fair-fastqc multiqc", "2.5.1");
        assert_eq!(job_name(&config), "Fair_fastqcmultiqc_version_2_5_1");

        let config = run_config("fair_fastqc_multiqc", "unknown");
        assert_eq!(job_name(&config), "Fair_fastqc_multiqc");
    }

    #[test]
    fn rendered_script_carries_slurm_and_temp_policy() {
        let profile = ClusterProfile::default();
        let config = run_config("fair_star_mapping", "1.0.0");
        let workdir = Path::new("/mnt/beegfs/userdata/me/project");
        let output = workdir.join(SBATCH_SH);

        let script = render(workdir, &output, &profile, &config, "1G", 359, SHORTQ);

        assert!(script.starts_with("#!/usr/bin/bash"));
        assert!(script.contains("#SBATCH --job-name='Fair_star_mapping_version_1_0_0'"));
        assert!(script.contains("#SBATCH --partition='shortq'"));
        assert!(script.contains("#SBATCH --time='0-5:59:00'"));
        assert!(script.contains("set -eiop 'pipefail'"));
        assert!(script.contains("export BIGR_DEFAULT_TMP"));
        assert!(script.contains("_JAVA_OPTIONS='-Djava.io.tmpdir="));
        assert!(script.contains("declare -x SNAKEMAKE_OUTPUT_CACHE="));
        assert!(script.contains("conda activate"));
        assert!(script.contains("snakemake --profile"));
    }

    #[test]
    fn write_sbatch_creates_directories_and_script() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = dir.path();
        let profile = ClusterProfile::default();

        let config_path = workdir.join(CONFIG_YAML);
        std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        std::fs::write(
            &config_path,
            serde_yaml::to_string(&run_config("fair_bowtie2_mapping", "1.2.3")).unwrap(),
        )
        .unwrap();

        let output = workdir.join(SBATCH_SH);
        write_sbatch(workdir, &config_path, &output, &profile, "4G", "0-01:00:00").unwrap();

        assert!(workdir.join(LOGS_DIR).is_dir());
        assert!(workdir.join(TMP_DIR).is_dir());
        let script = std::fs::read_to_string(&output).unwrap();
        assert!(script.contains("Fair_bowtie2_mapping_version_1_2_3"));
        assert!(script.contains("#SBATCH --partition='shortq'"));
    }
}
