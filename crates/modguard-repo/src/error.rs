use camino::Utf8PathBuf;

/// Problems with the input directory itself. These abort a run before any
/// rule is evaluated; everything found inside readable files is a verdict.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("input directory not found: {0}")]
    NotFound(Utf8PathBuf),

    #[error("input path is not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    #[error("cannot read {path}")]
    Unreadable {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no .{extension} files found in {root}")]
    NoConfigFiles { root: Utf8PathBuf, extension: String },
}
