use std::ffi::OsStr;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a whole UTF-8 text file into memory.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Name a corpus file is served under: `data/hamlet.txt` is `hamlet`.
pub(crate) fn corpus_name<P: AsRef<Path>>(path: P) -> io::Result<String> {
	let path = path.as_ref();
	path.file_stem()
		.map(|stem| stem.to_string_lossy().into_owned())
		.ok_or_else(|| {
			io::Error::new(io::ErrorKind::InvalidInput, format!("no corpus name in {:?}", path))
		})
}

/// Folder to scan for corpora. A bare `.` stands for the working directory
/// so that listings show where they looked; other values are used untouched.
pub(crate) fn data_folder(dir: &str) -> PathBuf {
	match dir {
		"." | "./" => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
		_ => PathBuf::from(dir),
	}
}

/// Lists the stems of all files with a given extension in a directory,
/// sorted by name.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
			files.push(corpus_name(&path)?);
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn corpus_name_is_the_file_stem() {
		assert_eq!(corpus_name("./data/hamlet.txt").unwrap(), "hamlet");
		assert_eq!(corpus_name("macbeth.txt").unwrap(), "macbeth");
		assert_eq!(corpus_name("plays/lear").unwrap(), "lear");
		assert!(corpus_name("").is_err());
	}

	#[test]
	fn lists_only_matching_extension() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.txt"), "b").unwrap();
		fs::write(dir.path().join("a.txt"), "a").unwrap();
		fs::write(dir.path().join("c.json"), "{}").unwrap();
		fs::create_dir(dir.path().join("d.txt")).unwrap();

		assert_eq!(list_files(dir.path(), "txt").unwrap(), vec!["a", "b"]);
	}

	#[test]
	fn dot_means_working_directory() {
		assert_eq!(data_folder("data"), PathBuf::from("data"));
		assert_eq!(data_folder("../corpora"), PathBuf::from("../corpora"));
		assert!(data_folder("./").is_absolute());
		assert_eq!(data_folder("."), env::current_dir().unwrap());
	}
}
