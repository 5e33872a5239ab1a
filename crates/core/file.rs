use std::{
    fs::OpenOptions,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use eyre::{eyre, Context, Result};
use log::trace;

const STDIN: &str = "-";

/// Read every input and join them with a newline, stdin is read when `paths` is empty.
pub fn read_inputs(paths: &[PathBuf]) -> Result<String> {
    if paths.is_empty() {
        trace!("No input files given - reading stdin");
        return read_stdin();
    }

    paths
        .iter()
        .map(|path| read_input(path))
        .collect::<Result<Vec<_>>>()
        .map(|texts| texts.join("\n"))
}

/// Read a single input, `-` is stdin.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN {
        return read_stdin();
    }

    trace!("Reading '{}'", path.display());
    let mut file = OpenOptions::new()
        .read(true)
        .open(path)
        .wrap_err_with(|| format!("Failed to open the '{}' file for reading.", path.display()))?;

    read_to_string(&mut file)
        .wrap_err_with(|| format!("Cannot read contents of the '{}' file", path.display()))
}

/// Write the database to `path`, replacing any previous content.
pub fn write_database(path: &Path, database: &str) -> Result<()> {
    trace!("Writing database to '{}'", path.display());
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .wrap_err_with(|| format!("Failed to open the '{}' file for writing.", path.display()))?;

    file.write_all(database.as_bytes())
        .wrap_err_with(|| eyre!("Cannot write database to '{}'", path.display()))
}

fn read_stdin() -> Result<String> {
    read_to_string(&mut io::stdin().lock()).wrap_err("Cannot read stdin")
}

fn read_to_string<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut content = String::new();
    reader.read_to_string(&mut content).map(move |_| content)
}

#[cfg(test)]
mod tests {

    use super::*;

    use assert_fs::{
        fixture::{FileWriteStr, PathChild},
        NamedTempFile, TempDir,
    };

    #[test]
    #[should_panic(expected = "Failed to open the 'file does not exist.txt' file for reading")]
    fn err_when_trying_to_read_file_that_does_not_exist() {
        read_input(Path::new("file does not exist.txt")).unwrap();
    }

    #[test]
    fn inputs_are_joined_by_newline() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let one = dir.child("one.txt");
        one.write_str("10.1000/a").unwrap();
        let two = dir.child("two.txt");
        two.write_str("10.1000/b").unwrap();

        let text = read_inputs(&[one.path().to_owned(), two.path().to_owned()]).unwrap();

        assert_eq!("10.1000/a\n10.1000/b", text);
    }

    #[test]
    fn database_replaces_previous_content() {
        let file = NamedTempFile::new("db.bib").expect("Cannot create temp file for test");
        file.write_str("old content that is longer than the new one")
            .unwrap();

        write_database(file.path(), "@misc{a,\n  year = {1}\n}").unwrap();
        let content = read_input(file.path()).unwrap();
        file.close().unwrap();

        assert_eq!("@misc{a,\n  year = {1}\n}", content);
    }

    #[test]
    #[should_panic(expected = "Failed to open the")]
    fn err_when_database_directory_does_not_exist() {
        write_database(Path::new("no such directory/db.bib"), "").unwrap();
    }
}
