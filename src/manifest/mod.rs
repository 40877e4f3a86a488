//! # Manifest 生成模块
//!
//! 将电子表格行转换为 Webin-CLI manifest 文件
//! (`manifests/Manifest_<prefix>.txt`，每行 `FIELD\tvalue`)。
//!
//! ## 规则
//! - 固定列名映射表在转大写之前应用
//! - `insert_size` 值强制为整数
//! - 上传文件列根据文件名推断类型字段 (FASTQ/CRAM/BAM)
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 使用 `parsers/spreadsheet.rs` 的行记录, `utils/output.rs`

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::GeneticContext;
use crate::error::{Result, WebinBulkError};
use crate::parsers::spreadsheet::MetadataRow;
use crate::utils::output;

/// 电子表格列名 -> manifest 字段名映射（在转大写之前应用）
const COLUMN_MAPPING: [(&str, &str); 6] = [
    ("study_accession", "study"),
    ("sample_accession", "sample"),
    ("experiment_name", "name"),
    ("sequencing_platform", "platform"),
    ("sequencing_instrument", "instrument"),
    ("library_description", "description"),
];

/// 持有上传文件名的列，只有这些列做文件类型推断
const FILE_COLUMNS: [&str; 2] = ["uploaded file 1", "uploaded file 2"];

/// 根据上传文件名推断 manifest 文件类型字段
fn file_type(value: &str) -> Option<&'static str> {
    if value.contains(".fastq") || value.contains(".fq") {
        Some("fastq")
    } else if value.contains(".cram") {
        Some("cram")
    } else if value.contains(".bam") {
        Some("bam")
    } else {
        None
    }
}

/// 将一个 (列名, 值) 对转换为 manifest 的 (字段, 值) 对
pub fn map_field(column: &str, value: &str) -> (String, String) {
    let mut field = column.to_string();
    let mut value = value.to_string();

    if let Some((_, mapped)) = COLUMN_MAPPING.iter().find(|(c, _)| *c == column) {
        field = mapped.to_string();
    } else if column == "insert_size" {
        // Webin-CLI rejects insert sizes with a decimal point
        if let Ok(n) = value.parse::<f64>() {
            value = (n as i64).to_string();
        }
    } else if FILE_COLUMNS.contains(&column) {
        if let Some(t) = file_type(&value) {
            field = t.to_string();
        }
    }

    (field.to_uppercase(), value)
}

/// 从上传文件名派生 manifest 前缀（去掉最多两层扩展名）
pub fn derive_prefix(file_value: &str) -> String {
    let base = Path::new(file_value)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_value);
    let mut stem = base;
    for _ in 0..2 {
        stem = Path::new(stem)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(stem);
    }
    stem.to_string()
}

/// 渲染 manifest 文件内容
pub fn render_manifest(row: &MetadataRow) -> String {
    let mut content = String::new();
    for (column, value) in row.iter() {
        let (field, value) = map_field(column, value);
        content.push_str(&field);
        content.push('\t');
        content.push_str(&value);
        content.push('\n');
    }
    content
}

/// 一批 manifest 的生成结果
#[derive(Debug, Default)]
pub struct ManifestBatch {
    /// 成功写出的 manifest 文件
    pub written: Vec<PathBuf>,
    /// 生成失败的行（前缀或行号）
    pub failed: Vec<String>,
}

/// manifest 文件生成器
pub struct ManifestGenerator<'a> {
    directory: &'a Path,
    context: GeneticContext,
}

impl<'a> ManifestGenerator<'a> {
    pub fn new(directory: &'a Path, context: GeneticContext) -> Self {
        Self { directory, context }
    }

    /// 存放所有 manifest 文件的目录
    pub fn manifest_dir(&self) -> PathBuf {
        self.directory.join("manifests")
    }

    /// Webin-CLI 的 -outputDir，存放提交相关文件
    pub fn submission_dir(&self) -> PathBuf {
        self.directory.join("submissions")
    }

    /// 取得用于派生前缀的列值
    ///
    /// reads 用 `uploaded file 1`，genome 用 `fasta`，
    /// 其它 context 依次尝试两者。
    fn prefix_source<'r>(&self, row: &'r MetadataRow) -> Option<&'r str> {
        match self.context {
            GeneticContext::Reads => row.get("uploaded file 1"),
            GeneticContext::Genome => row.get("fasta"),
            _ => row.get("uploaded file 1").or_else(|| row.get("fasta")),
        }
    }

    /// 为每一行生成一个 manifest 文件（尽力而为，单行失败不中断）
    pub fn generate(&self, rows: &[MetadataRow]) -> Result<ManifestBatch> {
        let manifest_dir = self.manifest_dir();
        let submission_dir = self.submission_dir();
        for dir in [&manifest_dir, &submission_dir] {
            fs::create_dir_all(dir).map_err(|e| WebinBulkError::FileWriteError {
                path: dir.display().to_string(),
                source: e,
            })?;
        }

        let mut batch = ManifestBatch::default();
        for (index, row) in rows.iter().enumerate() {
            let source = match self.prefix_source(row) {
                Some(s) => s,
                None => {
                    let field = match self.context {
                        GeneticContext::Reads => "uploaded file 1",
                        GeneticContext::Genome => "fasta",
                        _ => "uploaded file 1 / fasta",
                    };
                    let err = WebinBulkError::MissingField {
                        row: index + 1,
                        field: field.to_string(),
                    };
                    output::print_warning(&format!("{}, skipping", err));
                    batch.failed.push(format!("row {}", index + 1));
                    continue;
                }
            };

            let prefix = derive_prefix(source);
            let manifest_file = manifest_dir.join(format!("Manifest_{}.txt", prefix));
            match fs::write(&manifest_file, render_manifest(row)) {
                Ok(()) => batch.written.push(manifest_file),
                Err(e) => {
                    output::print_error(&format!(
                        "Failed to create manifest {}: {}",
                        manifest_file.display(),
                        e
                    ));
                    batch.failed.push(prefix);
                }
            }
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_mapping_applied_before_uppercasing() {
        assert_eq!(
            map_field("study_accession", "PRJEB0001"),
            ("STUDY".to_string(), "PRJEB0001".to_string())
        );
        assert_eq!(
            map_field("sequencing_platform", "ILLUMINA"),
            ("PLATFORM".to_string(), "ILLUMINA".to_string())
        );
    }

    #[test]
    fn test_insert_size_loses_decimal_point() {
        assert_eq!(
            map_field("insert_size", "250.0"),
            ("INSERT_SIZE".to_string(), "250".to_string())
        );
        assert_eq!(
            map_field("insert_size", "300"),
            ("INSERT_SIZE".to_string(), "300".to_string())
        );
    }

    #[test]
    fn test_file_type_inference() {
        assert_eq!(map_field("uploaded file 1", "run1.fastq.gz").0, "FASTQ");
        assert_eq!(map_field("uploaded file 1", "run1.fq.gz").0, "FASTQ");
        assert_eq!(map_field("uploaded file 2", "run1.cram").0, "CRAM");
        assert_eq!(map_field("uploaded file 1", "run1.bam").0, "BAM");
        // Unknown file type keeps the column name
        assert_eq!(
            map_field("uploaded file 1", "run1.sff").0,
            "UPLOADED FILE 1"
        );
    }

    #[test]
    fn test_file_type_only_inferred_for_file_columns() {
        // A non-file column whose value happens to mention .bam keeps its name
        assert_eq!(map_field("library_name", "old.bam_lib").0, "LIBRARY_NAME");
    }

    #[test]
    fn test_derive_prefix_strips_two_extensions() {
        assert_eq!(derive_prefix("run1.fastq.gz"), "run1");
        assert_eq!(derive_prefix("data/reads/run2.fq.gz"), "run2");
        assert_eq!(derive_prefix("assembly.fasta"), "assembly");
        assert_eq!(derive_prefix("plain"), "plain");
    }

    #[test]
    fn test_render_manifest_is_tab_delimited() {
        let mut row = MetadataRow::default();
        row.push("study_accession", "PRJEB0001");
        row.push("uploaded file 1", "run1.fastq.gz");
        row.push("insert_size", "250.0");

        let content = render_manifest(&row);
        assert_eq!(
            content,
            "STUDY\tPRJEB0001\nFASTQ\trun1.fastq.gz\nINSERT_SIZE\t250\n"
        );
    }

    #[test]
    fn test_generate_writes_manifests_and_continues_on_bad_rows() {
        let dir = tempfile::tempdir().unwrap();

        let mut good = MetadataRow::default();
        good.push("study_accession", "PRJEB0001");
        good.push("uploaded file 1", "run1.fastq.gz");

        // No uploaded file value, cannot derive a prefix
        let mut bad = MetadataRow::default();
        bad.push("study_accession", "PRJEB0002");

        let generator = ManifestGenerator::new(dir.path(), GeneticContext::Reads);
        let batch = generator.generate(&[good, bad]).unwrap();

        assert_eq!(batch.written.len(), 1);
        assert_eq!(batch.failed, vec!["row 2".to_string()]);

        let manifest = dir.path().join("manifests").join("Manifest_run1.txt");
        assert_eq!(batch.written[0], manifest);
        let content = std::fs::read_to_string(manifest).unwrap();
        assert!(content.contains("STUDY\tPRJEB0001"));
        assert!(dir.path().join("submissions").is_dir());
    }

    #[test]
    fn test_genome_context_uses_fasta_column() {
        let dir = tempfile::tempdir().unwrap();

        let mut row = MetadataRow::default();
        row.push("assemblyname", "asm01");
        row.push("fasta", "asm01.fasta.gz");

        let generator = ManifestGenerator::new(dir.path(), GeneticContext::Genome);
        let batch = generator.generate(&[row]).unwrap();
        assert_eq!(
            batch.written,
            vec![dir.path().join("manifests").join("Manifest_asm01.txt")]
        );
    }
}
