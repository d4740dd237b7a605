//! Command line failures, tagged with the file they concern.
use std::{
    fmt,
    path::{Path, PathBuf},
};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    /// File being read, compiled or written, when there is one.
    pub path: Option<PathBuf>,
    pub kind: ErrorKind,
}

#[derive(Debug)]
pub enum ErrorKind {
    /// Lexical, syntax or name error in a source file.
    Compile(jackc::JackError),
    Io(std::io::Error),
    Conf(serde_yaml::Error),
}

impl AppError {
    /// Attribute the error to a file, unless it already names one.
    pub fn in_file(mut self, path: impl AsRef<Path>) -> Self {
        self.path.get_or_insert_with(|| path.as_ref().to_path_buf());
        self
    }
}

/// Attach a file to the error of a fallible operation.
pub trait InFile<T> {
    fn in_file(self, path: impl AsRef<Path>) -> AppResult<T>;
}

impl<T, E: Into<AppError>> InFile<T> for Result<T, E> {
    fn in_file(self, path: impl AsRef<Path>) -> AppResult<T> {
        self.map_err(|err| err.into().in_file(path))
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Compile(err) => Some(err),
            ErrorKind::Io(err) => Some(err),
            ErrorKind::Conf(err) => Some(err),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}: ", path.display())?;
        }

        match &self.kind {
            ErrorKind::Compile(err) => write!(f, "{err}"),
            ErrorKind::Io(err) => write!(f, "cannot access file: {err}"),
            ErrorKind::Conf(err) => write!(f, "bad configuration: {err}"),
        }
    }
}

impl From<ErrorKind> for AppError {
    fn from(kind: ErrorKind) -> Self {
        Self { path: None, kind }
    }
}

impl From<jackc::JackError> for AppError {
    fn from(err: jackc::JackError) -> Self {
        ErrorKind::Compile(err).into()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        ErrorKind::Io(err).into()
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        ErrorKind::Conf(err).into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_names_file() {
        let err = jackc::compile_str("class A {").unwrap_err();
        let err = AppError::from(err).in_file("Square/A.jack");

        assert!(matches!(err.kind, ErrorKind::Compile(_)));
        assert!(err.to_string().starts_with("Square/A.jack: "), "{err}");
    }

    #[test]
    fn test_first_file_wins() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Err::<(), _>(io).in_file("a.jack").in_file("b.jack").unwrap_err();

        assert_eq!(err.to_string(), "a.jack: cannot access file: gone");
    }
}
