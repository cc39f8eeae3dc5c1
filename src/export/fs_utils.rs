use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// What is about to be written, used in the overwrite prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputKind {
    DoseExport,
    DatabaseBackup,
}

impl OutputKind {
    fn label(self) -> &'static str {
        match self {
            OutputKind::DoseExport => "dose export",
            OutputKind::DatabaseBackup => "database backup",
        }
    }

    fn refused(self, path: &Path) -> AppError {
        let msg = format!("{} not written, '{}' kept", self.label(), path.display());
        match self {
            OutputKind::DoseExport => AppError::Export(msg),
            OutputKind::DatabaseBackup => AppError::Other(msg),
        }
    }
}

/// Make sure `path` may receive a new `kind` file. An existing file is
/// replaced only with `force` or after the user answers yes on stdin.
pub(crate) fn ensure_writable(path: &Path, force: bool, kind: OutputKind) -> AppResult<()> {
    if force || !path.exists() {
        return Ok(());
    }

    warning(format!(
        "A {} would replace the existing file '{}'.",
        kind.label(),
        path.display()
    ));
    print!("Replace it? [y/N]: ");
    io::stdout().flush().ok();

    if confirmed(io::stdin().lock())? {
        info(format!("'{}' will be replaced.", path.display()));
        Ok(())
    } else {
        Err(kind.refused(path))
    }
}

fn confirmed(mut input: impl BufRead) -> AppResult<bool> {
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_confirms() {
        assert!(confirmed("y\n".as_bytes()).unwrap());
        assert!(confirmed(" YES \n".as_bytes()).unwrap());
        assert!(!confirmed("n\n".as_bytes()).unwrap());
        assert!(!confirmed("".as_bytes()).unwrap());
    }

    #[test]
    fn refusal_names_the_output() {
        let err = OutputKind::DoseExport.refused(Path::new("doses.csv"));
        assert!(matches!(err, AppError::Export(_)));
        assert!(err.to_string().contains("dose export not written"));

        let err = OutputKind::DatabaseBackup.refused(Path::new("b.sqlite"));
        assert!(err.to_string().contains("database backup"));
    }
}
