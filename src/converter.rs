use crate::config::InlineConfig;
use crate::image;
use crate::inline;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Outcome of one conversion, for the console report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub assets: usize,
    pub substituted_assets: usize,
    pub replacements: usize,
    pub input_bytes: u64,
    pub output_bytes: u64,
}

/// Load the page, inline every discovered image and write the standalone copy.
///
/// Nothing is written unless every asset was read successfully.
pub fn run(config: &InlineConfig) -> Result<RunSummary> {
    info!("Reading {}", config.input.display());
    let document = fs::read_to_string(&config.input)
        .with_context(|| format!("Failed to read input document: {}", config.input.display()))?;

    let assets =
        image::discover_assets(&config.assets_dir, &config.project_root, &config.extensions)?;
    info!("Found {} image file(s)", assets.len());

    let (document, report) = inline::inline(document, &assets)?;

    for replacement in report.replacements.iter().filter(|r| r.occurrences == 0) {
        debug!("Not referenced in document: {}", replacement.relative_path);
    }

    info!("Writing {}", config.output.display());
    write_output(&config.output, &document)?;

    let input_bytes = file_size(&config.input)?;
    let output_bytes = file_size(&config.output)?;

    info!("Input size:  {:.1} KB", input_bytes as f64 / 1024.0);
    info!("Output size: {:.2} MB", output_bytes as f64 / 1024.0 / 1024.0);

    Ok(RunSummary {
        assets: assets.len(),
        substituted_assets: report.substituted_assets(),
        replacements: report.total_occurrences(),
        input_bytes,
        output_bytes,
    })
}

fn write_output(output_path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(output_path, content)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    Ok(())
}

fn file_size(path: &Path) -> Result<u64> {
    Ok(fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::encode_asset;
    use tempfile::TempDir;

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d];

    struct Site {
        dir: TempDir,
        config: InlineConfig,
    }

    fn site(html: &str) -> Site {
        let dir = TempDir::new().unwrap();
        let config = InlineConfig::for_project(dir.path());
        fs::create_dir_all(&config.assets_dir).unwrap();
        fs::write(&config.input, html).unwrap();
        Site { dir, config }
    }

    impl Site {
        fn add(&self, rel: &str, bytes: &[u8]) {
            let path = self.dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, bytes).unwrap();
        }

        fn output(&self) -> String {
            fs::read_to_string(&self.config.output).unwrap()
        }
    }

    #[test]
    fn inlines_referenced_images_end_to_end() {
        let s = site(concat!(
            "<html><body>\n",
            "<img src=\"assets/images/logo.png\">\n",
            "<div style=\"background-image: url('assets/bg.svg')\"></div>\n",
            "</body></html>\n",
        ));
        s.add("assets/images/logo.png", PNG_BYTES);
        s.add("assets/bg.svg", b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>");
        s.add("assets/.DS_Store", b"junk");
        s.add("assets/readme.txt", b"not an image");

        let summary = run(&s.config).unwrap();
        let out = s.output();

        let logo = encode_asset(&s.dir.path().join("assets/images/logo.png")).unwrap();
        let bg = encode_asset(&s.dir.path().join("assets/bg.svg")).unwrap();
        assert!(out.contains(&format!("<img src=\"{}\">", logo)));
        assert!(out.contains(&format!("url('{}')", bg)));
        assert!(!out.contains("assets/images/logo.png"));
        assert!(!out.contains("assets/bg.svg"));

        assert_eq!(
            summary,
            RunSummary {
                assets: 2,
                substituted_assets: 2,
                replacements: 2,
                input_bytes: fs::metadata(&s.config.input).unwrap().len(),
                output_bytes: out.len() as u64,
            }
        );
        assert!(summary.output_bytes > summary.input_bytes);
    }

    #[test]
    fn no_assets_copies_input_verbatim() {
        let html = "<html><img src=\"assets/missing.png\"></html>\n";
        let s = site(html);

        let summary = run(&s.config).unwrap();

        assert_eq!(s.output(), html);
        assert_eq!(summary.assets, 0);
        assert_eq!(summary.output_bytes, summary.input_bytes);
    }

    #[test]
    fn unreferenced_asset_does_not_change_output() {
        let html = "<img src=\"assets/a.png\">";
        let s = site(html);
        s.add("assets/a.png", PNG_BYTES);
        s.add("assets/b.gif", b"GIF89a");

        let summary = run(&s.config).unwrap();

        let a = encode_asset(&s.dir.path().join("assets/a.png")).unwrap();
        assert_eq!(s.output(), format!("<img src=\"{}\">", a));
        assert_eq!(summary.assets, 2);
        assert_eq!(summary.substituted_assets, 1);
        assert_eq!(
            summary.output_bytes,
            (html.len() - "assets/a.png".len() + a.as_str().len()) as u64
        );
    }

    #[test]
    fn rerunning_on_standalone_output_is_a_no_op() {
        let s = site("<img src=\"assets/a.png\">");
        s.add("assets/a.png", PNG_BYTES);
        run(&s.config).unwrap();
        let first = s.output();

        let mut second = s.config.clone();
        second.input = s.config.output.clone();
        second.output = s.dir.path().join("again.html");
        let summary = run(&second).unwrap();

        assert_eq!(summary.replacements, 0);
        assert_eq!(fs::read_to_string(&second.output).unwrap(), first);
    }

    #[test]
    fn creates_missing_output_directory() {
        let s = site("<p>hi</p>");
        let mut config = s.config.clone();
        config.output = s.dir.path().join("dist/nested/page.html");

        run(&config).unwrap();
        assert_eq!(fs::read_to_string(&config.output).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn missing_input_fails_without_output() {
        let s = site("");
        fs::remove_file(&s.config.input).unwrap();

        let err = run(&s.config).unwrap_err();
        assert!(err.to_string().contains("Failed to read input document"));
        assert!(!s.config.output.exists());
    }

    #[test]
    fn non_utf8_input_fails_without_output() {
        let s = site("");
        fs::write(&s.config.input, [0xff, 0xfe, b'<']).unwrap();
        s.add("assets/a.png", PNG_BYTES);

        let err = run(&s.config).unwrap_err();
        assert!(err.to_string().contains("Failed to read input document"));
        assert!(!s.config.output.exists());
    }

    #[test]
    fn unwritable_output_fails() {
        let s = site("<p>hi</p>");
        let mut config = s.config.clone();
        // a directory cannot be overwritten by a file
        config.output = s.config.assets_dir.clone();

        let err = run(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to write output file"));
    }
}
