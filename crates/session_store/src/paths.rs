use std::path::{Path, PathBuf};

pub const HISTORY_SUFFIX: &str = ".history.json";

/// Sidecar history path: `dir/name.py` becomes `dir/name.py.history.json`.
///
/// Keyed on the full file name so programs differing only in extension keep separate
/// histories.
#[must_use]
pub fn history_path(program: &Path) -> PathBuf {
    let name = program
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "program".to_string());
    program.with_file_name(format!("{name}{HISTORY_SUFFIX}"))
}

#[must_use]
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{history_path, temp_path};

    #[test]
    fn history_sidecar_extends_the_program_file_name() {
        assert_eq!(
            history_path(Path::new("/work/add.py")),
            PathBuf::from("/work/add.py.history.json")
        );
        assert_eq!(
            history_path(Path::new("notes")),
            PathBuf::from("notes.history.json")
        );
        assert_eq!(
            history_path(Path::new("dir/archive.tar.gz")),
            PathBuf::from("dir/archive.tar.gz.history.json")
        );
    }

    #[test]
    fn programs_differing_only_in_extension_keep_separate_histories() {
        assert_ne!(
            history_path(Path::new("/work/add.py")),
            history_path(Path::new("/work/add.rs"))
        );
    }

    #[test]
    fn temp_path_stays_in_the_same_directory() {
        assert_eq!(
            temp_path(Path::new("/work/add.history.json")),
            PathBuf::from("/work/add.history.json.tmp")
        );
    }
}
