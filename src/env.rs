use log::{info, warn};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::ClusterProfile;
use crate::consts::*;

/// How a temp-directory variable renders a path.
///
/// Most variables hold the bare path; `_JAVA_OPTIONS` wraps it in a
/// `-Djava.io.tmpdir` flag consumed by nextflow and java tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStyle {
    Plain,
    JavaOptions,
}

impl ValueStyle {
    pub fn render(&self, path: &Path) -> String {
        match self {
            ValueStyle::Plain => path.display().to_string(),
            ValueStyle::JavaOptions => format!("-Djava.io.tmpdir='{}'", path.display()),
        }
    }
}

/// Temp-directory variables normalized before any pipeline runs.
///
/// Local `/tmp` is forbidden on compute nodes: it is small and shared,
/// and full `/tmp` partitions kill jobs half-way. Every variable below
/// must point at cluster storage instead.
pub const TEMP_VARS: &[(&str, ValueStyle)] = &[
    ("TMP", ValueStyle::Plain),
    ("TEMP", ValueStyle::Plain),
    ("TMPDIR", ValueStyle::Plain),
    ("TEMPDIR", ValueStyle::Plain),
    ("NXF_TEMP", ValueStyle::Plain),
    ("_JAVA_OPTIONS", ValueStyle::JavaOptions),
];

/// Outcome of inspecting one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalization {
    /// Variable was unset or empty, set it to the cluster default.
    SetDefault(String),
    /// Variable pointed at local `/tmp`, overwrite it.
    Overwrite(String),
    /// Variable already holds a user-chosen value, leave it alone.
    Keep,
}

/// Decide what to do with one temp variable.
///
/// Unset (or empty) values and values equal to the `/tmp` rendering of
/// the variable's style are replaced with the cluster default; anything
/// else is kept untouched.
pub fn normalize_value(
    current: Option<&str>,
    default_tmp: &Path,
    style: ValueStyle,
) -> Normalization {
    match current {
        None => Normalization::SetDefault(style.render(default_tmp)),
        Some(value) if value.is_empty() => Normalization::SetDefault(style.render(default_tmp)),
        Some(value) if value == style.render(Path::new("/tmp")) => {
            Normalization::Overwrite(style.render(default_tmp))
        }
        Some(_) => Normalization::Keep,
    }
}

/// Resolve the cluster temp directory for this invocation.
///
/// Priority: `BIGR_DEFAULT_TMP` from the environment, then the profile
/// override, then `<workdir>/tmp`.
pub fn resolve_default_tmp(profile: &ClusterProfile, workdir: &Path) -> PathBuf {
    if let Ok(value) = std::env::var(BIGR_DEFAULT_TMP) {
        if !value.is_empty() {
            return PathBuf::from(value);
        }
    }

    match &profile.default_tmp {
        Some(path) => path.clone(),
        None => workdir.join(TMP_DIR),
    }
}

/// Normalize the process environment before shelling out.
///
/// Exports `BIGR_DEFAULT_TMP`, fixes every temp variable of
/// [`TEMP_VARS`], exports the shared cache, profile and install
/// locations and creates the `tmp/shadow` directory used by Snakemake
/// shadow rules.
/// Child processes (snakedeploy, git) inherit the result.
pub fn normalize_environment(
    profile: &ClusterProfile,
    workdir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let default_tmp = resolve_default_tmp(profile, workdir);
    std::env::set_var(BIGR_DEFAULT_TMP, &default_tmp);

    for (name, style) in TEMP_VARS {
        match normalize_value(std::env::var(name).ok().as_deref(), &default_tmp, *style) {
            Normalization::SetDefault(value) => {
                warn!("WARNING: {} was not set, using '{}'", name, value);
                std::env::set_var(name, value);
            }
            Normalization::Overwrite(value) => {
                warn!(
                    "WARNING: {} pointed at local /tmp, replacing with '{}'",
                    name, value
                );
                std::env::set_var(name, value);
            }
            Normalization::Keep => {
                info!(
                    "INFO: {} already set to '{}'",
                    name,
                    std::env::var(name).unwrap_or_default()
                );
            }
        }
    }

    std::env::set_var(SNAKEMAKE_OUTPUT_CACHE, &profile.snakemake_cache);
    std::env::set_var(CONDA_CACHE_PATH, &profile.conda_cache);
    std::env::set_var(SNAKEMAKE_PROFILE_PATH, &profile.profile_dir);
    std::env::set_var(SHARED_SINGULARITY_PATH, &profile.singularity_dir);
    std::env::set_var(SHARED_CONDA_INSTALL, &profile.shared_install);

    fs::create_dir_all(default_tmp.join(SHADOW_DIR))?;

    Ok(default_tmp)
}

/// Create `~/.Renviron` and `~/.condarc` on first run.
///
/// Both files are existence-gated and never overwritten afterwards:
/// users are free to edit them.
pub fn write_user_dotfiles(
    home: &Path,
    profile: &ClusterProfile,
    default_tmp: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let renviron = home.join(RENVIRON);
    if renviron.exists() {
        info!("INFO: {} already exists, leaving it untouched", renviron.display());
    } else {
        let mut file = fs::File::create(&renviron)?;
        writeln!(file, "TMPDIR='{}'", default_tmp.display())?;
        writeln!(file, "TMP='{}'", default_tmp.display())?;
        writeln!(file, "TEMP='{}'", default_tmp.display())?;
        info!("INFO: created {}", renviron.display());
    }

    let condarc = home.join(CONDARC);
    if condarc.exists() {
        info!("INFO: {} already exists, leaving it untouched", condarc.display());
    } else {
        let mut file = fs::File::create(&condarc)?;
        writeln!(file, "pkgs_dirs:")?;
        writeln!(file, "  - {}", profile.conda_cache.display())?;
        writeln!(file, "envs_dirs:")?;
        writeln!(file, "  - {}", profile.shared_install.display())?;
        writeln!(file, "croot: {}", profile.conda_build_root.display())?;
        info!("INFO: created {}", condarc.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_gets_the_default() {
        let got = normalize_value(None, Path::new("/mnt/beegfs/tmp"), ValueStyle::Plain);
        assert_eq!(
            got,
            Normalization::SetDefault("/mnt/beegfs/tmp".to_string())
        );
    }

    #[test]
    fn empty_variable_counts_as_unset() {
        let got = normalize_value(Some(""), Path::new("/mnt/beegfs/tmp"), ValueStyle::Plain);
        assert_eq!(
            got,
            Normalization::SetDefault("/mnt/beegfs/tmp".to_string())
        );
    }

    #[test]
    fn local_tmp_is_overwritten() {
        let got = normalize_value(Some("/tmp"), Path::new("/mnt/beegfs/tmp"), ValueStyle::Plain);
        assert_eq!(got, Normalization::Overwrite("/mnt/beegfs/tmp".to_string()));
    }

    #[test]
    fn custom_value_is_kept() {
        let got = normalize_value(
            Some("/custom/path"),
            Path::new("/mnt/beegfs/tmp"),
            ValueStyle::Plain,
        );
        assert_eq!(got, Normalization::Keep);
    }

    #[test]
    fn java_options_follow_the_same_rules() {
        let default = Path::new("/mnt/beegfs/tmp");

        let got = normalize_value(None, default, ValueStyle::JavaOptions);
        assert_eq!(
            got,
            Normalization::SetDefault("-Djava.io.tmpdir='/mnt/beegfs/tmp'".to_string())
        );

        let got = normalize_value(
            Some("-Djava.io.tmpdir='/tmp'"),
            default,
            ValueStyle::JavaOptions,
        );
        assert_eq!(
            got,
            Normalization::Overwrite("-Djava.io.tmpdir='/mnt/beegfs/tmp'".to_string())
        );

        let got = normalize_value(
            Some("-Djava.io.tmpdir='/userdata/tmp'"),
            default,
            ValueStyle::JavaOptions,
        );
        assert_eq!(got, Normalization::Keep);
    }

    #[test]
    fn condarc_created_once_with_three_path_keys() {
        let home = tempfile::tempdir().unwrap();
        let profile = ClusterProfile::default();
        let tmp = home.path().join("tmp");

        write_user_dotfiles(home.path(), &profile, &tmp).unwrap();

        let condarc = home.path().join(CONDARC);
        let content = std::fs::read_to_string(&condarc).unwrap();
        assert!(content.contains("pkgs_dirs:"));
        assert!(content.contains("envs_dirs:"));
        assert!(content.contains("croot:"));

        // second run must not overwrite user files
        std::fs::write(&condarc, "channels:\n  - bioconda\n").unwrap();
        write_user_dotfiles(home.path(), &profile, &tmp).unwrap();
        let content = std::fs::read_to_string(&condarc).unwrap();
        assert_eq!(content, "channels:\n  - bioconda\n");
    }

    #[test]
    fn renviron_points_at_cluster_tmp() {
        let home = tempfile::tempdir().unwrap();
        let profile = ClusterProfile::default();
        let tmp = home.path().join("tmp");

        write_user_dotfiles(home.path(), &profile, &tmp).unwrap();

        let content = std::fs::read_to_string(home.path().join(RENVIRON)).unwrap();
        assert!(content.contains(&format!("TMPDIR='{}'", tmp.display())));
        assert!(content.contains(&format!("TMP='{}'", tmp.display())));
        assert!(content.contains(&format!("TEMP='{}'", tmp.display())));
    }
}
