use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(arxsum_home: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    arxsum_home
        .or_else(|| home_dir.map(|home| home.join(".arxsum")))
        .map(|base| base.join(".env"))
}

/// Load `.env` from the working directory, else from the arxsum home.
/// Variables already present in the environment always win.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let arxsum_home = env::var_os("ARXSUM_HOME").map(PathBuf::from);
    if let Some(path) = fallback_dotenv_path(arxsum_home, dirs::home_dir())
        && path.is_file()
    {
        // A broken fallback file is ignored; missing credentials are reported later.
        let _ = dotenvy::from_path(&path);
    }
}
