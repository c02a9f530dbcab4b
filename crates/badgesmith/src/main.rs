use badgesmith::badges::{read_keys, BadgeUpdater};
use badgesmith::catalog::BadgeCatalog;
use badgesmith::cli::{Cli, Command, GridFormat};
use badgesmith::config::Config;
use badgesmith::discover::expand_targets;
use badgesmith::grid::GridComposer;
use badgesmith::logging::init_logger;
use badgesmith::output::Output;
use badgesmith::project::{load_projects, ProjectExtractor};
use badgesmith::raster::HeadlessBrowser;
use badgesmith::update::{update_grid, FileReport, FileStatus, Updater};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Reset SIGPIPE handler to default (terminate) so piping to head/tail works correctly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    let cli = Cli::parse();

    let use_color = !cli.no_color && atty::is(atty::Stream::Stderr);
    init_logger(cli.verbose, use_color);
    let mut output = Output::new(use_color);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let start_time = Instant::now();
    let (reports, check) = match cli.command {
        Command::Badges {
            files,
            catalog,
            keys_file,
            check,
        } => {
            if let Some(catalog) = catalog {
                config.badges.catalog = catalog;
            }
            let reports = run_badges(&config, &files, keys_file.as_deref(), check)?;
            (reports, check)
        }
        Command::Scan {
            repo_name,
            is_private,
            files,
            catalog,
            branch,
        } => {
            if let Some(catalog) = catalog {
                config.badges.catalog = catalog;
            }
            if let Some(branch) = branch {
                config.projects.branch = branch;
            }
            (run_scan(&config, &repo_name, is_private, &files)?, false)
        }
        Command::Grid {
            readme,
            projects,
            format,
            image_dir,
            browser,
            check,
        } => {
            if let Some(image_dir) = image_dir {
                config.render.image_dir = image_dir;
            }
            if let Some(browser) = browser {
                config.render.browser = browser;
            }
            let report = run_grid(&config, &readme, &projects, format, check, &mut output)?;
            (vec![report], check)
        }
    };

    for report in &reports {
        output.print_report(report);
    }
    output.print_summary(&reports, start_time.elapsed(), check);

    let pending = reports.iter().any(|r| r.status == FileStatus::Pending);
    std::process::exit(if check && pending { 1 } else { 0 });
}

fn badge_updater(config: &Config) -> anyhow::Result<BadgeUpdater> {
    let catalog = BadgeCatalog::load_or_empty(&config.badges.catalog);
    Ok(BadgeUpdater::new(catalog, config.badge_markers()?))
}

fn run_badges(
    config: &Config,
    files: &[PathBuf],
    keys_file: Option<&Path>,
    check: bool,
) -> anyhow::Result<Vec<FileReport>> {
    let mut badges = badge_updater(config)?;
    if let Some(path) = keys_file {
        let keys = read_keys(path)?;
        tracing::debug!("Using {} keys from {}", keys.len(), path.display());
        badges = badges.with_keys(keys);
    }

    let updater = Updater::new(&badges).check(check);
    Ok(expand_targets(files)
        .iter()
        .map(|path| updater.update_file(path))
        .collect())
}

fn run_scan(
    config: &Config,
    repo_name: &str,
    is_private: bool,
    files: &[PathBuf],
) -> anyhow::Result<Vec<FileReport>> {
    let badges = badge_updater(config)?;
    let extractor = ProjectExtractor::new(
        repo_name,
        config.projects.branch.clone(),
        config.thumbnail_markers()?,
    );

    let mut updater = Updater::new(&badges);
    if is_private {
        tracing::info!("{} is private, not collecting projects", repo_name);
    } else {
        updater = updater.with_projects(&extractor);
    }

    let reports: Vec<FileReport> = expand_targets(files)
        .iter()
        .map(|path| updater.update_file(path))
        .collect();

    let projects: Vec<_> = reports.iter().filter_map(|r| r.project.clone()).collect();
    tracing::info!("Found {} projects in {}", projects.len(), repo_name);
    println!("{}", serde_json::to_string(&projects)?);
    Ok(reports)
}

fn run_grid(
    config: &Config,
    readme: &Path,
    projects_path: &Path,
    format: GridFormat,
    check: bool,
    output: &mut Output,
) -> anyhow::Result<FileReport> {
    let projects = load_projects(projects_path)?;
    let composer = GridComposer::new(config.grid.style.clone());
    let markers = config.grid_markers()?;

    let grid = match format {
        GridFormat::Html => composer.compose(&projects),
        GridFormat::Png => {
            let rasterizer = HeadlessBrowser::new(&config.render);
            let link_dir = posix_string(&config.render.image_dir);
            // Check mode must not touch the repository, so images go to a scratch dir.
            let scratch = if check {
                Some(tempfile::TempDir::with_prefix("badgesmith_cards_")?)
            } else {
                None
            };
            let image_dir = match &scratch {
                Some(dir) => dir.path().to_path_buf(),
                None => readme
                    .parent()
                    .unwrap_or_else(|| Path::new(""))
                    .join(&config.render.image_dir),
            };
            let (grid, failures) =
                composer.compose_images(&projects, &rasterizer, &image_dir, &link_dir);
            output.print_card_failures(&failures);
            grid
        }
    };

    Ok(update_grid(readme, &markers, &grid, check))
}

fn posix_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
