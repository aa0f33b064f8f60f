use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Bundles `bundle_dir` (one level of files plus a `figures/` subdirectory)
/// into `<out_dir>/<dir name>.zip`. The archive is written to a temp file and
/// renamed into place only once complete.
pub fn write_zip(out_dir: &Path, bundle_dir: &Path) -> Result<PathBuf> {
    let root = bundle_dir
        .file_name()
        .and_then(|s| s.to_str())
        .context("bundle directory has no usable name")?
        .to_string();
    let zip_path = out_dir.join(format!("{}.zip", root));
    let tmp_path = out_dir.join(format!("{}.zip.tmp", root));

    let file = File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let result = write_zip_entries(&mut zip, bundle_dir, &root);

    match result.and_then(|_| zip.finish().with_context(|| "failed to finalize zip")) {
        Ok(_) => {
            fs::rename(&tmp_path, &zip_path)
                .with_context(|| format!("failed to move zip to {}", zip_path.display()))?;
            Ok(zip_path)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

fn write_zip_entries(zip: &mut ZipWriter<File>, bundle_dir: &Path, root: &str) -> Result<()> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    zip.add_directory(format!("{}/", root), options)
        .with_context(|| "failed to add directory entry to zip")?;

    for name in sorted_files(bundle_dir)? {
        let src_path = bundle_dir.join(&name);
        let zip_path = format!("{}/{}", root, name);
        add_file(zip, &src_path, &zip_path, options)
            .with_context(|| format!("failed to add {} to zip", name))?;
    }

    let figures_dir = bundle_dir.join("figures");
    if figures_dir.is_dir() {
        zip.add_directory(format!("{}/figures/", root), options)?;
        for name in sorted_files(&figures_dir)? {
            let src_path = figures_dir.join(&name);
            let zip_path = format!("{}/figures/{}", root, name);
            add_file(zip, &src_path, &zip_path, options)
                .with_context(|| format!("failed to add figures/{} to zip", name))?;
        }
    }
    Ok(())
}

fn sorted_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

fn add_file(
    zip: &mut ZipWriter<File>,
    src_path: &Path,
    zip_path: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut file =
        File::open(src_path).with_context(|| format!("failed to open {}", src_path.display()))?;
    zip.start_file(zip_path, options)?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        zip.write_all(&buf[..n])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bundles_files_under_root_directory() {
        let out = TempDir::new().unwrap();
        let bundle = out.path().join("sample_genesisqc");
        fs::create_dir_all(bundle.join("figures")).unwrap();
        fs::write(bundle.join("summary.txt"), "x").unwrap();
        fs::write(bundle.join("a_processed.json"), "{}").unwrap();
        fs::write(bundle.join("figures").join("summary.pdf"), "%PDF").unwrap();

        let zip_path = write_zip(out.path(), &bundle).unwrap();
        assert_eq!(zip_path, out.path().join("sample_genesisqc.zip"));
        assert!(!out.path().join("sample_genesisqc.zip.tmp").exists());

        let archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        assert_eq!(
            names,
            [
                "sample_genesisqc/",
                "sample_genesisqc/a_processed.json",
                "sample_genesisqc/figures/",
                "sample_genesisqc/figures/summary.pdf",
                "sample_genesisqc/summary.txt",
            ]
        );
    }
}
