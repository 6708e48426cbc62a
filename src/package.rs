use std::{
    collections::BTreeMap,
    ffi::OsStr,
    fs,
    path::{Component, Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};
use crate::{
    ast::{self, FileId},
    error::{Error, Result},
    syntax,
};

/// A source file as read from disk
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|source| Error::Io { path: path.to_owned(), source })?;
        Ok(SourceFile { path: path.to_owned(), content })
    }
}

#[derive(Debug)]
pub struct ParsedFile {
    pub source: SourceFile,
    pub syntax: ast::File,
}

/// All files of one directory that declare the same package name
#[derive(Debug)]
pub struct Package {
    pub name: String,
    /// in filename order, which is also `FileId` order
    pub files: Vec<ParsedFile>,
}

impl Package {
    /// Parse `sources` and group them by declared package name
    ///
    /// Fails on the first file that doesn't parse.
    pub fn group(mut sources: Vec<SourceFile>) -> Result<Vec<Package>> {
        sources.sort_by(|a, b| a.path.cmp(&b.path));

        let mut packages = BTreeMap::<String, Vec<ParsedFile>>::new();
        for (index, source) in sources.into_iter().enumerate() {
            let syntax = syntax::parse_file(FileId(index as u32), &source.path, &source.content)?;
            packages.entry(syntax.package.name.clone())
                .or_default()
                .push(ParsedFile { source, syntax });
        }

        Ok(packages.into_iter()
           .map(|(name, files)| Package { name, files })
           .collect())
    }

    pub fn file(&self, id: FileId) -> Option<&ParsedFile> {
        self.files.iter()
            .find(|file| file.syntax.id == id)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name()
        .to_str()
        .map_or(false, |name| name.starts_with('.'))
}

/// `path` without `.` components, so `./foo` and `foo` compare equal
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| component != &Component::CurDir)
        .collect()
}

fn is_excluded(path: &Path, excludes: &[PathBuf]) -> bool {
    let path = normalize(path);
    excludes.iter()
        .any(|exclude| path.starts_with(normalize(exclude)))
}

/// `.go` sources, never tests
pub fn is_go_source(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("go")) && !path.file_name()
        .and_then(OsStr::to_str)
        .map_or(false, |name| name.ends_with("_test.go"))
}

/// Go sources below `paths`, grouped by directory
///
/// Unreadable entries are logged and skipped.
pub fn discover(paths: &[PathBuf], hidden: bool, excludes: &[PathBuf]) -> BTreeMap<PathBuf, Vec<PathBuf>> {
    let mut dirs = BTreeMap::<PathBuf, Vec<PathBuf>>::new();
    for path in paths {
        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                (hidden || !is_hidden(entry)) &&
                    !is_excluded(entry.path(), excludes)
            });
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("{}", err);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_go_source(entry.path()) {
                let dir = entry.path().parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                dirs.entry(dir)
                    .or_default()
                    .push(entry.into_path());
            }
        }
    }
    dirs
}
