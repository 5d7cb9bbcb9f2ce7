use std::fs;
use std::path::Path;

/// Human-oriented description of a file, chosen by its name suffix.
pub fn describe(name: &str) -> &'static str {
    let lower = name.to_lowercase();

    if name == "Snakefile" || lower.ends_with(".smk") {
        return "Snakemake script";
    }
    if lower.ends_with(".py") {
        return "Python script";
    }
    if lower.ends_with(".pyc") {
        return "Python binary file";
    }
    if lower.ends_with(".log") {
        return "Logging file";
    }
    if [".png", ".svg", ".pdf"].iter().any(|s| lower.ends_with(s)) {
        return "Chart image";
    }
    if [".md", ".rst", ".txt"].iter().any(|s| lower.ends_with(s)) {
        return "Text resource";
    }
    if [".r", ".rmd"].iter().any(|s| lower.ends_with(s)) {
        return "R script";
    }
    if [".sh", ".bash", ".sbatch", ".zsh"]
        .iter()
        .any(|s| lower.ends_with(s))
    {
        return "Shell script";
    }
    if [".csv", ".tsv", ".xlsx"].iter().any(|s| lower.ends_with(s)) {
        return "Table";
    }
    if [".bam", ".sam", ".cram", ".bai"]
        .iter()
        .any(|s| lower.ends_with(s))
    {
        return "Alignment file";
    }
    if [".fq", ".fastq", ".fq.gz", ".fastq.gz"]
        .iter()
        .any(|s| lower.ends_with(s))
    {
        return "Sequenced reads";
    }
    if [".bed", ".bed.gz", ".gtf", ".gff", ".gff3"]
        .iter()
        .any(|s| lower.ends_with(s))
    {
        return "Genomic intervals";
    }
    if [".fasta", ".fa", ".fna", ".fai", ".dict", ".bt2"]
        .iter()
        .any(|s| lower.ends_with(s))
    {
        return "Genomic sequences";
    }
    if [".json", ".yaml", ".yml"].iter().any(|s| lower.ends_with(s)) {
        return "Configuration file";
    }
    if lower.ends_with(".html") {
        return "HTML report";
    }
    if [
        ".bcf", ".vcf", ".vcf.gz", ".gvcf", ".gvcf.gz", ".maf", ".vcf.gz.tbi", ".vcf.gz.csi",
        ".ubcf",
    ]
    .iter()
    .any(|s| lower.ends_with(s))
    {
        return "Variants description";
    }
    if lower.ends_with(".bin") {
        return "Binary file";
    }

    ""
}

/// Format a byte count with decimal units, `1.5 kB` style.
pub fn human_size(bytes: u64) -> String {
    if bytes < 1000 {
        return format!("{} bytes", bytes);
    }

    let units = ["kB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit = "";

    for candidate in units {
        size /= 1000.0;
        unit = candidate;
        if size < 1000.0 {
            break;
        }
    }

    format!("{:.1} {}", size, unit)
}

/// Render an annotated tree of a project directory.
///
/// Directories come first, then files in case-insensitive name order;
/// hidden entries are skipped on request. Returns the rendered tree so
/// callers decide where it goes.
pub fn render(directory: &Path, skip_hidden: bool) -> Result<String, Box<dyn std::error::Error>> {
    if !directory.exists() {
        return Err(format!("ERROR: Could not find {}", directory.display()).into());
    }

    let mut out = format!("{}\n", directory.display());
    walk(directory, skip_hidden, "", &mut out)?;

    Ok(out)
}

fn walk(
    directory: &Path,
    skip_hidden: bool,
    prefix: &str,
    out: &mut String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut entries: Vec<_> = fs::read_dir(directory)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|entry| {
            !(skip_hidden && entry.file_name().to_string_lossy().starts_with('.'))
        })
        .collect();

    entries.sort_by_key(|entry| {
        (
            entry.path().is_file(),
            entry.file_name().to_string_lossy().to_lowercase(),
        )
    });

    let last = entries.len().saturating_sub(1);
    for (idx, entry) in entries.iter().enumerate() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        let (guide, child_prefix) = if idx == last {
            ("└── ", format!("{}    ", prefix))
        } else {
            ("├── ", format!("{}│   ", prefix))
        };

        if path.is_dir() {
            out.push_str(&format!("{}{}{}/\n", prefix, guide, name));
            walk(&path, skip_hidden, &child_prefix, out)?;
        } else {
            let size = human_size(entry.metadata()?.len());
            let description = describe(&name);
            if description.is_empty() {
                out.push_str(&format!("{}{}{}\t({})\n", prefix, guide, name, size));
            } else {
                out.push_str(&format!(
                    "{}{}{}\t({})\t{}\n",
                    prefix, guide, name, size, description
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptions_follow_suffixes() {
        assert_eq!(describe("Snakefile"), "Snakemake script");
        assert_eq!(describe("common.smk"), "Snakemake script");
        assert_eq!(describe("sbatch.sh"), "Shell script");
        assert_eq!(describe("genomes.csv"), "Table");
        assert_eq!(describe("config.yaml"), "Configuration file");
        assert_eq!(describe("sample_R1.fastq.gz"), "Sequenced reads");
        assert_eq!(describe("variants.vcf.gz.tbi"), "Variants description");
        assert_eq!(describe("unknown.xyz"), "");
    }

    #[test]
    fn sizes_use_decimal_units() {
        assert_eq!(human_size(999), "999 bytes");
        assert_eq!(human_size(1500), "1.5 kB");
        assert_eq!(human_size(2_500_000), "2.5 MB");
    }

    #[test]
    fn tree_lists_directories_before_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(dir.path().join("config/config.yaml"), "params: {}\n").unwrap();
        std::fs::write(dir.path().join("aaa.txt"), "hello\n").unwrap();
        std::fs::write(dir.path().join(".hidden"), "x\n").unwrap();

        let rendered = render(dir.path(), true).unwrap();
        let config_pos = rendered.find("config/").unwrap();
        let file_pos = rendered.find("aaa.txt").unwrap();

        assert!(config_pos < file_pos);
        assert!(rendered.contains("Configuration file"));
        assert!(rendered.contains("Text resource"));
        assert!(!rendered.contains(".hidden"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(render(Path::new("/nonexistent/project"), false).is_err());
    }
}
