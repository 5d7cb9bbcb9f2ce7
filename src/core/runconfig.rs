use log::{info, warn};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::{ParamValue, PipelineInfo, RunConfig};

/// Recover the deployed pipeline's name and tag from its Snakefile.
///
/// Deployed workflows reference their upstream module with a
/// `github("tdayris/<name>", tag="<tag>")` call; when the line is
/// missing the identity falls back to `Unknown`.
pub fn pipeline_info(snakefile: &Path) -> PipelineInfo {
    let unknown = PipelineInfo {
        name: "Unknown".to_string(),
        tag: "Unknown".to_string(),
    };

    let contents = match fs::read_to_string(snakefile) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(
                "WARNING: Could not read {}: {}",
                snakefile.display(),
                e
            );
            return unknown;
        }
    };

    for line in contents.lines() {
        if !line.trim_start().starts_with("github(") {
            continue;
        }

        let quoted: Vec<&str> = line.split('"').collect();
        if quoted.len() < 4 {
            break;
        }

        let name = quoted[1].rsplit('/').next().unwrap_or(quoted[1]).to_string();
        let tag = quoted[quoted.len() - 2].to_string();

        return PipelineInfo { name, tag };
    }

    warn!("WARNING: Could not find pipeline version in {}", snakefile.display());
    unknown
}

/// Build the run configuration for a project directory.
///
/// `params` are raw `key=value` strings from the command line; values
/// are coerced (booleans, integers) before being stored.
pub fn build(
    samples: &Path,
    genomes: &Path,
    workflow: &Path,
    fastq_screen_config: &Path,
    params: &[String],
) -> RunConfig {
    let mut config_params: BTreeMap<String, ParamValue> = BTreeMap::new();
    config_params.insert(
        "fair_fastqc_multiqc_fastq_screen_config".to_string(),
        ParamValue::Str(fastq_screen_config.display().to_string()),
    );

    for parameter in params {
        match parameter.split_once('=') {
            Some((key, value)) => {
                config_params.insert(key.to_string(), ParamValue::coerce(value));
            }
            None if parameter.is_empty() => {}
            None => {
                warn!(
                    "WARNING: Ignoring parameter '{}', expected key=value",
                    parameter
                );
            }
        }
    }

    RunConfig {
        genomes: genomes.display().to_string(),
        samples: samples.display().to_string(),
        pipeline: pipeline_info(workflow),
        params: config_params,
    }
}

/// Serialize a run configuration to `config/config.yaml`.
pub fn write_config(
    config: &RunConfig,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    let yaml = serde_yaml::to_string(config)?;
    fs::write(output, yaml)?;

    info!("INFO: Configuration file available at {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_identity_from_snakefile() {
        let dir = tempfile::tempdir().unwrap();
        let snakefile = dir.path().join("Snakefile");
        std::fs::write(
            &snakefile,
            concat!(
                "module fair_fastqc_multiqc:\n",
                "    snakefile:\n",
                "        github(\"tdayris/fair_fastqc_multiqc\", path=\"workflow/Snakefile\", tag=\"2.5.1\")\n",
                "    config: config\n",
            ),
        )
        .unwrap();

        let info = pipeline_info(&snakefile);
        assert_eq!(info.name, "fair_fastqc_multiqc");
        assert_eq!(info.tag, "2.5.1");
    }

    #[test]
    fn missing_github_line_falls_back_to_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let snakefile = dir.path().join("Snakefile");
        std::fs::write(&snakefile, "rule all:\n    input: 'results/multiqc.html'\n").unwrap();

        let info = pipeline_info(&snakefile);
        assert_eq!(info.name, "Unknown");
        assert_eq!(info.tag, "Unknown");
    }

    #[test]
    fn user_params_override_and_coerce() {
        let dir = tempfile::tempdir().unwrap();
        let config = build(
            Path::new("config/samples.csv"),
            Path::new("config/genomes.csv"),
            &dir.path().join("Snakefile"),
            Path::new("/db/fastq_screen.conf"),
            &[
                "use_gatk=true".to_string(),
                "threads=8".to_string(),
                "".to_string(),
                "broken-param".to_string(),
            ],
        );

        assert_eq!(config.params["use_gatk"], ParamValue::Bool(true));
        assert_eq!(config.params["threads"], ParamValue::Int(8));
        assert_eq!(
            config.params["fair_fastqc_multiqc_fastq_screen_config"],
            ParamValue::Str("/db/fastq_screen.conf".to_string())
        );
        assert!(!config.params.contains_key("broken-param"));
    }

    #[test]
    fn config_yaml_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("config").join("config.yaml");

        let config = build(
            Path::new("config/samples.csv"),
            Path::new("config/genomes.csv"),
            &dir.path().join("Snakefile"),
            Path::new("/db/fastq_screen.conf"),
            &[],
        );
        write_config(&config, &output).unwrap();

        let reread: RunConfig =
            serde_yaml::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(reread.genomes, "config/genomes.csv");
        assert_eq!(reread.pipeline.name, "Unknown");
    }
}
