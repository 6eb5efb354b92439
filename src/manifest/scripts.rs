//! Shell commands embedded in the generated manifest
//!
//! Composer runs these as lifecycle hooks. `install-from-git` fetches every
//! repository before install or update; `prepare-packages` overlays modular
//! repositories onto the root after install.

use crate::repository::{RepoOptions, RepoType};

/// Ensures the application configuration directory exists.
pub const MKDIR_CONFIG_DIR: &str = "mkdir -p app/etc";

/// Paths `prepare-packages` leaves alone because module registration serves
/// them as path repositories instead.
pub const RSYNC_EXCLUDES: &[&str] = &[
    "app/code/Magento/",
    "app/i18n/",
    "app/design/",
    "dev/tests/static/testsuite/Magento/Test/Legacy/_files/",
    "lib/internal/Magento/Framework/",
    ".git",
];

/// Commands for the `install-from-git` script, in execution order.
///
/// The `rm -rf` step removes every repository directory unconditionally so
/// the clones always start clean.
///
/// # Examples
///
/// ```
/// use cloud_dev::manifest::install_from_git_scripts;
/// use cloud_dev::repository::{RepoOption, RepoOptions};
///
/// let options: RepoOptions = [("ce", RepoOption::new("git@example.com:ce.git", "2.4-develop"))]
///     .into_iter()
///     .collect();
/// let scripts = install_from_git_scripts(&options);
/// assert_eq!(scripts[1], "rm -rf ce");
/// assert_eq!(
///     scripts[2],
///     "git clone -b 2.4-develop --single-branch --depth 1 git@example.com:ce.git ce"
/// );
/// ```
pub fn install_from_git_scripts(repo_options: &RepoOptions) -> Vec<String> {
    let names: Vec<&str> = repo_options.names().collect();

    let mut scripts = Vec::with_capacity(repo_options.len() + 2);
    scripts.push(MKDIR_CONFIG_DIR.to_string());
    scripts.push(format!("rm -rf {}", names.join(" ")));

    for (name, option) in repo_options.iter() {
        scripts.push(format!(
            "git clone -b {} --single-branch --depth 1 {} {}",
            option.branch, option.repo, name
        ));
    }

    scripts
}

/// Commands for the `prepare-packages` script: one `rsync` per modular
/// repository.
pub fn prepare_packages_scripts(repo_options: &RepoOptions) -> Vec<String> {
    let excludes: Vec<String> = RSYNC_EXCLUDES
        .iter()
        .map(|exclude| format!("--exclude='{}'", exclude))
        .collect();
    let excludes = excludes.join(" ");

    repo_options
        .iter()
        .filter(|(_, option)| option.repo_type == RepoType::Modular)
        .map(|(name, _)| format!("rsync -azhm --stats {} ./{}/ ./", excludes, name))
        .collect()
}
