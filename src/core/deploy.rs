use log::{info, warn};

use std::path::Path;
use std::process::Command;

use crate::config::Pipeline;
use crate::consts::*;
use crate::message::{emit, MessageKind};

/// True when a workflow skeleton is already present.
pub fn already_deployed(workdir: &Path) -> bool {
    workdir.join(WORKFLOW_DIR).exists() || workdir.join(CONFIG_DIR).exists()
}

/// Pick the newest tag out of a `git ls-remote --tags` listing.
///
/// The listing is requested in reverse version order, so the newest
/// tag is the first line. Lines look like
/// `<sha>\trefs/tags/2.5.1`.
pub fn parse_latest_tag(blob: &str) -> Option<String> {
    blob.lines()
        .next()
        .and_then(|line| line.rsplit('/').next())
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.trim_end_matches("^{}").to_string())
}

/// Resolve the newest release tag of a pipeline repository.
pub fn latest_tag(url: &str) -> Result<String, Box<dyn std::error::Error>> {
    let cmd = format!("{} ls-remote --tags --sort=-v:refname {}", GIT, url);
    emit(MessageKind::Cmd, &cmd);

    let output = Command::new(GIT)
        .args(["ls-remote", "--tags", "--sort=-v:refname", url])
        .output()
        .map_err(|e| format!("ERROR: Failed to execute git: {}", e))?;

    if !output.status.success() {
        return Err(format!(
            "ERROR: git ls-remote failed for {}\n{}",
            url,
            String::from_utf8_lossy(&output.stderr)
        )
        .into());
    }

    parse_latest_tag(&String::from_utf8_lossy(&output.stdout))
        .ok_or_else(|| format!("ERROR: No tags found for {}", url).into())
}

/// Drop stale run configuration before a forced redeploy.
///
/// The workflow skeleton may change between tags; configs generated
/// for the old skeleton are not trustworthy anymore.
pub fn remove_stale_configs(workdir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    for stale in [SAMPLES_CSV, GENOMES_CSV, CONFIG_YAML] {
        let path = workdir.join(stale);
        if path.exists() {
            warn!("WARNING: Removing stale {}", path.display());
            std::fs::remove_file(&path)?;
        }
    }

    Ok(())
}

/// Deploy a fair Snakemake pipeline skeleton into `workdir`.
///
/// Skipped with a warning when a workflow or config directory already
/// exists and `force` is off; `force` removes stale run configuration
/// and redeploys over the previous skeleton.
pub fn deploy_workflow(
    pipeline: Pipeline,
    tag: &str,
    workdir: &Path,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if already_deployed(workdir) && !force {
        warn!(
            "WARNING: A pipeline has already been deployed at {}",
            workdir.display()
        );
        return Ok(());
    }

    if force {
        remove_stale_configs(workdir)?;
    }

    let url = pipeline.repo_url();
    let tag = if tag == LATEST {
        let resolved = latest_tag(&url)?;
        info!("INFO: Pipeline version is {}", resolved);
        resolved
    } else {
        tag.to_string()
    };

    let mut cmd = Command::new(SNAKEDEPLOY);
    cmd.arg("deploy-workflow")
        .arg(&url)
        .arg(workdir)
        .arg("--tag")
        .arg(&tag);
    if force {
        cmd.arg("--force");
    }

    emit(
        MessageKind::Cmd,
        &format!(
            "{} deploy-workflow {} {} --tag {}",
            SNAKEDEPLOY,
            url,
            workdir.display(),
            tag
        ),
    );

    let status = cmd
        .status()
        .map_err(|e| format!("ERROR: Failed to execute {}: {}", SNAKEDEPLOY, e))?;

    if !status.success() {
        return Err(format!(
            "ERROR: {} failed for {} (tag {})",
            SNAKEDEPLOY, pipeline, tag
        )
        .into());
    }

    info!("INFO: Pipeline {} deployed at {}", pipeline, workdir.display());

    Ok(())
}
