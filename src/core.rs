pub mod deploy;
pub mod genomes;
pub mod runconfig;
pub mod sbatch;
pub mod tree;

use log::info;

use std::path::{Path, PathBuf};

use crate::config::{ClusterProfile, Pipeline};
use crate::consts::*;
use crate::env;
use crate::message::{emit, MessageKind};

/// Everything a full bootstrap needs to know.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    pub pipeline: Pipeline,
    pub tag: String,
    pub workdir: PathBuf,
    pub profile: ClusterProfile,
    pub mem: String,
    pub time: String,
    pub force: bool,
    pub verbose: bool,
}

/// One existence-gated bootstrap step.
///
/// Each step owns a target artifact; the step only runs when its
/// target is missing. Re-running a partially bootstrapped directory
/// therefore resumes where the previous run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    DeployWorkflow,
    Genomes,
    RunConfig,
    SbatchScript,
}

impl BootstrapStep {
    /// All steps, in execution order.
    pub fn all() -> &'static [BootstrapStep] {
        &[
            BootstrapStep::DeployWorkflow,
            BootstrapStep::Genomes,
            BootstrapStep::RunConfig,
            BootstrapStep::SbatchScript,
        ]
    }

    /// Target artifact, relative to the working directory.
    pub fn target(&self) -> &'static str {
        match self {
            BootstrapStep::DeployWorkflow => SNAKEFILE,
            BootstrapStep::Genomes => GENOMES_CSV,
            BootstrapStep::RunConfig => CONFIG_YAML,
            BootstrapStep::SbatchScript => SBATCH_SH,
        }
    }

    /// True when the target artifact already exists.
    pub fn is_satisfied(&self, workdir: &Path) -> bool {
        workdir.join(self.target()).exists()
    }

    fn execute(&self, ctx: &Bootstrap) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            BootstrapStep::DeployWorkflow => {
                deploy::deploy_workflow(ctx.pipeline, &ctx.tag, &ctx.workdir, ctx.force)
            }
            BootstrapStep::Genomes => {
                let catalog = genomes::catalog();
                genomes::check_resources(&catalog)?;
                genomes::write_manifest(&catalog, &ctx.workdir.join(GENOMES_CSV), false)
            }
            BootstrapStep::RunConfig => {
                let config = runconfig::build(
                    &ctx.workdir.join(SAMPLES_CSV),
                    &ctx.workdir.join(GENOMES_CSV),
                    &ctx.workdir.join(SNAKEFILE),
                    &ctx.profile.fastq_screen_config,
                    &[],
                );
                runconfig::write_config(&config, &ctx.workdir.join(CONFIG_YAML))
            }
            BootstrapStep::SbatchScript => sbatch::write_sbatch(
                &ctx.workdir,
                &ctx.workdir.join(CONFIG_YAML),
                &ctx.workdir.join(SBATCH_SH),
                &ctx.profile,
                &ctx.mem,
                &ctx.time,
            )
            .map(|_| ()),
        }
    }
}

impl std::fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapStep::DeployWorkflow => write!(f, "deploy-workflow"),
            BootstrapStep::Genomes => write!(f, "genomes"),
            BootstrapStep::RunConfig => write!(f, "config"),
            BootstrapStep::SbatchScript => write!(f, "sbatch"),
        }
    }
}

/// Select the steps whose target artifact is missing.
///
/// With `force`, every step runs regardless of existing artifacts.
pub fn plan(workdir: &Path, force: bool) -> Vec<BootstrapStep> {
    BootstrapStep::all()
        .iter()
        .copied()
        .filter(|step| {
            if force || !step.is_satisfied(workdir) {
                return true;
            }

            info!(
                "INFO: {} already exists, skipping {}",
                workdir.join(step.target()).display(),
                step
            );
            false
        })
        .collect()
}

/// Bootstrap a pipeline project directory end to end.
///
/// No rollback: the first failing step aborts the run and the
/// directory keeps the artifacts generated so far. Re-running resumes
/// thanks to the existence gates.
pub fn run(ctx: &Bootstrap) -> Result<(), Box<dyn std::error::Error>> {
    let default_tmp = env::normalize_environment(&ctx.profile, &ctx.workdir)?;

    match std::env::var_os("HOME") {
        Some(home) => env::write_user_dotfiles(Path::new(&home), &ctx.profile, &default_tmp)?,
        None => log::warn!("WARNING: HOME is not set, skipping user dotfiles"),
    }

    let steps = plan(&ctx.workdir, ctx.force);
    if steps.is_empty() {
        info!(
            "INFO: {} is already fully bootstrapped for {}",
            ctx.workdir.display(),
            ctx.pipeline
        );
    }

    for step in &steps {
        info!("INFO: Running step {} -> {}", step, step.target());
        step.execute(ctx)?;
    }

    if ctx.verbose {
        println!("{}", tree::render(&ctx.workdir, false)?);
    }

    help_message(ctx);

    Ok(())
}

/// Closing guidance printed after a successful bootstrap.
fn help_message(ctx: &Bootstrap) {
    emit(
        MessageKind::Doc,
        &format!("Pipeline documentation: {}#readme", ctx.pipeline.repo_url()),
    );
    emit(
        MessageKind::Doc,
        &format!(
            "Fill {} with your sample file paths before submitting",
            ctx.workdir.join(SAMPLES_CSV).display()
        ),
    );
    emit(
        MessageKind::Doc,
        &format!("Submit with: sbatch {}", ctx.workdir.join(SBATCH_SH).display()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_steps_planned_on_a_fresh_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(plan(dir.path(), false), BootstrapStep::all());
    }

    #[test]
    fn satisfied_steps_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = dir.path();
        std::fs::create_dir_all(workdir.join(CONFIG_DIR)).unwrap();
        std::fs::write(workdir.join(GENOMES_CSV), "species,build,release\n").unwrap();

        let steps = plan(workdir, false);
        assert!(!steps.contains(&BootstrapStep::Genomes));
        assert!(steps.contains(&BootstrapStep::DeployWorkflow));
        assert!(steps.contains(&BootstrapStep::RunConfig));
        assert!(steps.contains(&BootstrapStep::SbatchScript));
    }

    #[test]
    fn fully_bootstrapped_directory_plans_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = dir.path();
        for step in BootstrapStep::all() {
            let target = workdir.join(step.target());
            std::fs::create_dir_all(target.parent().unwrap()).unwrap();
            std::fs::write(&target, "placeholder\n").unwrap();
        }

        assert!(plan(workdir, false).is_empty());
    }

    #[test]
    fn force_replans_everything() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = dir.path();
        for step in BootstrapStep::all() {
            let target = workdir.join(step.target());
            std::fs::create_dir_all(target.parent().unwrap()).unwrap();
            std::fs::write(&target, "placeholder\n").unwrap();
        }

        assert_eq!(plan(workdir, true), BootstrapStep::all());
    }

    #[test]
    fn step_targets_live_under_expected_directories() {
        assert!(BootstrapStep::DeployWorkflow.target().starts_with(WORKFLOW_DIR));
        assert!(BootstrapStep::Genomes.target().starts_with(CONFIG_DIR));
        assert!(BootstrapStep::RunConfig.target().starts_with(CONFIG_DIR));
        assert!(BootstrapStep::SbatchScript.target().starts_with(SCRIPTS_DIR));
    }
}
