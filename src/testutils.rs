use super::*;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::path::{Component, Path, PathBuf};

use filesystem::FileSystem;
use tags::TagReader;

#[cfg(unix)]
pub const PERMISSION_DENIED_ERROR_CODE: i32 = ::libc::EACCES;
#[cfg(not(unix))]
pub const PERMISSION_DENIED_ERROR_CODE: i32 = 5;

#[cfg(unix)]
pub fn cross_device_error_code() -> i32 {
    ::libc::EXDEV
}

#[cfg(not(unix))]
pub fn cross_device_error_code() -> i32 {
    17
}

pub fn with_default_test_file<F>(test_dir: &PathBuf, test_method: F)
where
    F: Fn(&PathBuf),
{
    let test_file_name = random_string() + "test_file.test";
    let test_file: &PathBuf = &test_dir.join(test_file_name);
    with_test_file(test_file, test_method);
}

pub fn with_test_file<F>(test_file: &PathBuf, test_method: F)
where
    F: Fn(&PathBuf),
{
    with_test_file_content(test_file, b"", test_method);
}

pub fn with_test_file_content<F>(test_file: &PathBuf, content: &[u8], test_method: F)
where
    F: Fn(&PathBuf),
{
    // Make sure the test file exists with the given content
    write_file(test_file, content);
    assert_eq!(test_file.is_file(), true);

    test_method(test_file);

    // Clean up if the test file wasn't moved away
    if test_file.is_file() {
        fs::remove_file(test_file).unwrap();
    }
}

pub fn write_file(file: &PathBuf, content: &[u8]) {
    File::create(file).unwrap().write_all(content).unwrap();
}

pub fn read_file(file: &PathBuf) -> Vec<u8> {
    let mut content = Vec::new();
    File::open(file).unwrap().read_to_end(&mut content).unwrap();
    content
}

pub fn dummy_sort_context() -> SortContext {
    SortContext {
        source_dir: PathBuf::from("/source"),
        dest_dir: PathBuf::from("/dest"),
        tag: "Keep".to_string(),
        copy: false,
        dry_run: false
    }
}

pub fn with_default_test_directory<F>(test_method: F)
where
    F: Fn(&PathBuf),
{
    let test_dir_name = "./test_output/output".to_owned() + &random_string();
    with_test_directory(&PathBuf::from(test_dir_name), test_method);
}

pub fn with_test_directory<F>(test_dir: &PathBuf, test_method: F)
where
    F: Fn(&PathBuf),
{
    // Make sure test directory exists and is empty
    if test_dir.is_dir() {
        fs::remove_dir_all(test_dir).unwrap();
    }
    fs::create_dir_all(test_dir).unwrap();
    assert_eq!(test_dir.is_dir(), true);

    test_method(test_dir);

    // Clean up
    fs::remove_dir_all(test_dir).unwrap();
}

pub fn with_default_output_directory<F>(test_dir: &PathBuf, test_method: F)
where
    F: Fn(&PathBuf),
{
    let test_output_name = random_string() + "test_output";
    let output_directory = test_dir.join(test_output_name);

    // Make sure output directory (and any files that would be in it) *does not* already exist
    if output_directory.is_dir() {
        fs::remove_dir_all(&output_directory).unwrap();
    }
    assert_eq!(output_directory.is_dir(), false);

    test_method(&output_directory);

    // Clean up if the output directory was created
    if output_directory.is_dir() {
        fs::remove_dir_all(&output_directory).unwrap();
    }
}

pub fn random_string() -> String {
    let random_number = rand::random::<u32>();
    println!("Using random number: {:?}", random_number);
    random_number.to_string()
}

/// A filesystem that only lives in memory. Parent directories are created implicitly
/// by `add_file` and `add_dir`, but the trait operations behave like the real thing.
pub struct MemoryFileSystem {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    rename_error: Cell<Option<i32>>,
}

impl MemoryFileSystem {
    pub fn new() -> MemoryFileSystem {
        MemoryFileSystem {
            files: RefCell::new(BTreeMap::new()),
            dirs: RefCell::new(BTreeSet::new()),
            rename_error: Cell::new(None),
        }
    }

    pub fn add_file(&self, path: &str, content: &[u8]) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            self.add_ancestors(parent);
        }
        self.files.borrow_mut().insert(path, content.to_vec());
    }

    pub fn add_dir(&self, path: &str) {
        self.add_ancestors(Path::new(path));
    }

    /// Makes every rename fail with the given OS error code.
    pub fn fail_renames_with(&self, raw_os_error: i32) {
        self.rename_error.set(Some(raw_os_error));
    }

    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(Path::new(path)).cloned()
    }

    /// Files directly inside `directory`, sorted.
    pub fn files_in(&self, directory: &str) -> Vec<PathBuf> {
        self.files
            .borrow()
            .keys()
            .filter(|path| path.parent() == Some(Path::new(directory)))
            .cloned()
            .collect()
    }

    fn add_ancestors(&self, directory: &Path) {
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in directory.ancestors() {
            if ancestor.parent().is_some() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
    }

    fn parent_is_dir(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) => self.is_dir(parent),
            None => false,
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.to_string_lossy()))
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.parent().is_none() || self.dirs.borrow().contains(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let mut resolved = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => (),
                Component::ParentDir => {
                    resolved.pop();
                }
                other => resolved.push(other.as_os_str()),
            }
        }
        if self.exists(&resolved) {
            Ok(resolved)
        } else {
            Err(not_found(path))
        }
    }

    fn list_dir(&self, directory: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.is_dir(directory) {
            return Err(not_found(directory));
        }
        let files = self.files.borrow();
        let dirs = self.dirs.borrow();
        Ok(files
            .keys()
            .chain(dirs.iter())
            .filter(|path| path.parent() == Some(directory))
            .cloned()
            .collect())
    }

    fn create_dir_all(&self, directory: &Path) -> io::Result<()> {
        if directory.ancestors().any(|ancestor| self.is_file(ancestor)) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists,
                                      format!("{} is a file", directory.to_string_lossy())));
        }
        self.add_ancestors(directory);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if let Some(code) = self.rename_error.get() {
            return Err(io::Error::from_raw_os_error(code));
        }
        if !self.parent_is_dir(to) {
            return Err(not_found(to));
        }
        let content = match self.files.borrow_mut().remove(from) {
            Some(content) => content,
            None => return Err(not_found(from)),
        };
        self.files.borrow_mut().insert(to.to_path_buf(), content);
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        if !self.parent_is_dir(to) {
            return Err(not_found(to));
        }
        let content = match self.files.borrow().get(from) {
            Some(content) => content.clone(),
            None => return Err(not_found(from)),
        };
        self.files.borrow_mut().insert(to.to_path_buf(), content);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        match self.files.borrow_mut().remove(path) {
            Some(_) => Ok(()),
            None => Err(not_found(path)),
        }
    }
}

/// Tags keyed by path. Paths registered with `fail_for` report a read error instead.
pub struct MemoryTagReader {
    tags: HashMap<PathBuf, BTreeSet<String>>,
    failing: HashSet<PathBuf>,
}

impl MemoryTagReader {
    pub fn new() -> MemoryTagReader {
        MemoryTagReader { tags: HashMap::new(), failing: HashSet::new() }
    }

    pub fn tag(&mut self, path: &str, tags: &[&str]) {
        let entry = self.tags.entry(PathBuf::from(path)).or_insert_with(BTreeSet::new);
        entry.extend(tags.iter().map(|tag| tag.to_string()));
    }

    pub fn fail_for(&mut self, path: &str) {
        self.failing.insert(PathBuf::from(path));
    }
}

impl TagReader for MemoryTagReader {
    fn read_tags(&self, path: &Path) -> Result<BTreeSet<String>> {
        if self.failing.contains(path) {
            bail!("Operation not supported");
        }
        Ok(self.tags.get(path).cloned().unwrap_or_default())
    }
}
