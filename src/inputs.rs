use anyhow::{Context, Result};
use dirs::home_dir;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where one hierarchy dump is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    pub fn read(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        match self {
            InputSource::Stdin => {
                std::io::stdin()
                    .lock()
                    .read_to_end(&mut bytes)
                    .context("Failed to read hierarchy dump from stdin")?;
            }
            InputSource::File(path) => {
                bytes = std::fs::read(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
            }
        }
        Ok(bytes)
    }

    /// `<stem>.<extension>` inside `dir`; stdin becomes `layout.<extension>`.
    pub fn output_path(&self, dir: &Path, extension: &str) -> PathBuf {
        let stem = match self {
            InputSource::Stdin => None,
            InputSource::File(path) => path.file_stem().map(|s| s.to_string_lossy().into_owned()),
        };
        dir.join(format!("{}.{extension}", stem.as_deref().unwrap_or("layout")))
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => f.write_str("<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct FileDiscovery {
    glob_set: GlobSet,
}

impl FileDiscovery {
    pub fn new(patterns: Vec<String>) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let glob =
                Glob::new(&pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;
            builder.add(glob);
        }

        let glob_set = builder.build().context("Failed to build glob set")?;

        Ok(Self { glob_set })
    }

    pub fn from_pattern(pattern: &str) -> Result<Self> {
        Self::new(vec![pattern.to_string()])
    }

    pub fn discover_files(&self, base_path: &Path) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = WalkDir::new(base_path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.matches(e.path()))
            .map(|e| e.into_path())
            .collect();

        // Stable output order regardless of directory iteration order
        files.sort();

        Ok(files)
    }

    // Relative patterns are walked from `.`, which prefixes every path with `./`.
    fn matches(&self, path: &Path) -> bool {
        self.glob_set.is_match(path)
            || path
                .strip_prefix(".")
                .is_ok_and(|relative| self.glob_set.is_match(relative))
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

fn is_glob(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Expand CLI input arguments: `-` is stdin, globs are walked, anything else is a file.
pub fn resolve_inputs(args: &[String]) -> Result<Vec<InputSource>> {
    if args.is_empty() {
        return Ok(vec![InputSource::Stdin]);
    }

    let mut sources = Vec::new();
    for arg in args {
        if arg == "-" {
            sources.push(InputSource::Stdin);
            continue;
        }

        let expanded = expand_tilde(arg);
        let path_str = expanded.to_string_lossy();
        if !is_glob(&path_str) {
            sources.push(InputSource::File(expanded));
            continue;
        }

        let pos = path_str.find(['*', '?', '[']).unwrap_or(0);
        let base = Path::new(&path_str[..pos]);
        let base_path = if path_str[..pos].ends_with('/') {
            base.to_path_buf()
        } else {
            base.parent().unwrap_or(Path::new(".")).to_path_buf()
        };
        let base_path = if base_path.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            base_path
        };

        let discovery = FileDiscovery::from_pattern(&path_str)?;
        let files = discovery.discover_files(&base_path)?;
        if files.is_empty() {
            tracing::warn!(pattern = %path_str, "No files matched pattern");
        }
        sources.extend(files.into_iter().map(InputSource::File));
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{File, create_dir_all};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_expand_tilde() {
        let home = home_dir().unwrap();
        assert_eq!(expand_tilde("~/dumps"), home.join("dumps"));
        assert_eq!(
            expand_tilde("/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }

    #[test]
    fn test_file_discovery() -> Result<()> {
        let temp_dir = tempdir()?;
        let base_path = temp_dir.path();

        create_dir_all(base_path.join("login"))?;
        create_dir_all(base_path.join("search/results"))?;

        File::create(base_path.join("login/page.xml"))?.write_all(b"<hierarchy/>")?;
        File::create(base_path.join("search/page.xml"))?.write_all(b"<hierarchy/>")?;
        File::create(base_path.join("search/results/page.xml"))?.write_all(b"<hierarchy/>")?;
        File::create(base_path.join("search/notes.txt"))?.write_all(b"notes")?;

        let pattern = format!("{}/**/*.xml", base_path.display());
        let discovery = FileDiscovery::from_pattern(&pattern)?;
        let files = discovery.discover_files(base_path)?;

        assert_eq!(files.len(), 3);
        for file in &files {
            assert!(file.to_string_lossy().ends_with(".xml"));
        }
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);

        Ok(())
    }

    #[test]
    fn test_resolve_inputs() -> Result<()> {
        let temp_dir = tempdir()?;
        let base_path = temp_dir.path();
        File::create(base_path.join("a.xml"))?;
        File::create(base_path.join("b.xml"))?;
        File::create(base_path.join("c.txt"))?;

        let args = vec![
            format!("{}/*.xml", base_path.display()),
            "-".to_string(),
            "explicit.xml".to_string(),
        ];
        let sources = resolve_inputs(&args)?;

        assert_eq!(
            sources,
            vec![
                InputSource::File(base_path.join("a.xml")),
                InputSource::File(base_path.join("b.xml")),
                InputSource::Stdin,
                InputSource::File(PathBuf::from("explicit.xml")),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_no_args_reads_stdin() -> Result<()> {
        assert_eq!(resolve_inputs(&[])?, vec![InputSource::Stdin]);
        Ok(())
    }

    #[test]
    fn test_output_path() {
        let dir = Path::new("/tmp/out");
        assert_eq!(
            InputSource::File(PathBuf::from("dumps/login.xml")).output_path(dir, "xml"),
            PathBuf::from("/tmp/out/login.xml")
        );
        assert_eq!(
            InputSource::Stdin.output_path(dir, "json"),
            PathBuf::from("/tmp/out/layout.json")
        );
    }

    #[test]
    fn test_read_file_source() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("dump.xml");
        File::create(&path)?.write_all(b"<hierarchy/>")?;

        let bytes = InputSource::File(path).read()?;
        assert_eq!(bytes, b"<hierarchy/>");

        let missing = InputSource::File(temp_dir.path().join("missing.xml")).read();
        assert!(missing.is_err());
        Ok(())
    }
}
