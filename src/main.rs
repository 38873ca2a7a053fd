//! `shellfs` command line front end.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use shellfs::fs_op::{archive, copy, create, files, glob, io, list, path};
use shellfs::fs_op::list::StatMode;
use shellfs::fs_op::stat::StatKind;
use shellfs::settings::load_settings;

#[derive(Parser)]
#[command(name = "shellfs")]
#[command(version, about = "Shell-like filesystem operations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (default: $SHELLFS_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy files or directories recursively
    Cp {
        /// Source path or glob pattern
        source: String,
        dest: PathBuf,
        /// Never replace existing files
        #[arg(short = 'n', long)]
        no_clobber: bool,
    },

    /// Move or rename
    Mv {
        /// Source path or glob pattern
        source: String,
        dest: PathBuf,
    },

    /// Remove files or directory trees
    Rm {
        /// Paths or glob patterns
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// List directory contents
    Ls {
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Long format
        #[arg(short, long)]
        long: bool,
        /// Include `.` and `..`
        #[arg(short, long)]
        all: bool,
        /// Follow symlinks when stat'ing entries
        #[arg(short = 'L', long)]
        dereference: bool,
    },

    /// Create directories and their parents
    Mkdir {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Create empty files
    Touch {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Change permission bits (octal MODE)
    Chmod {
        #[arg(short = 'R', long)]
        recursive: bool,
        mode: String,
        path: String,
    },

    /// Change numeric owner and group (UID[:GID] or :GID)
    Chown {
        #[arg(short = 'R', long)]
        recursive: bool,
        owner: String,
        path: String,
    },

    /// Create a gzip-compressed tar archive (default ./NAME.tgz)
    Tar { source: PathBuf, dest: Option<PathBuf> },

    /// Extract a gzip-compressed tar archive (default .)
    Untar { source: PathBuf, dest: Option<PathBuf> },

    /// Create a zip archive (default ./NAME.zip)
    Zip { source: PathBuf, dest: Option<PathBuf> },

    /// Extract a zip archive (default .)
    Unzip { source: PathBuf, dest: Option<PathBuf> },

    /// Print the canonical absolute path
    Realpath { path: PathBuf },

    /// Print PATH relative to BASE (default: current directory)
    Relpath { path: PathBuf, base: Option<PathBuf> },

    /// Print file contents
    Cat { path: PathBuf },

    /// Replace file contents with TEXT
    Write { path: PathBuf, text: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("shellfs: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config).context("loading settings")?;
    let globs = settings.glob_options();

    match cli.command {
        Commands::Cp { source, dest, no_clobber } => {
            let overwrite = settings.overwrite && !no_clobber;
            let buffer = settings.copy_buffer_size;
            glob::for_each_match(&source, globs, |src| {
                copy::copy_with_buffer(src, &dest, overwrite, buffer)
            })?;
        }
        Commands::Mv { source, dest } => files::mv(&source, &dest, globs)?,
        Commands::Rm { paths } => {
            for p in &paths {
                files::rm(p, globs)?;
            }
        }
        Commands::Ls { path, long, all, dereference } => ls(&path, long, all, dereference)?,
        Commands::Mkdir { paths } => {
            for p in &paths {
                create::mkdir_all(p)?;
            }
        }
        Commands::Touch { paths } => {
            for p in &paths {
                create::create_empty_file(p)?;
            }
        }
        Commands::Chmod { recursive, mode, path } => {
            let mode = u32::from_str_radix(&mode, 8)
                .with_context(|| format!("invalid octal mode `{mode}`"))?;
            if recursive {
                files::rchmod(&path, mode, globs)?;
            } else {
                files::chmod(&path, mode, globs)?;
            }
        }
        Commands::Chown { recursive, owner, path } => {
            let (uid, gid) = parse_owner(&owner)?;
            if recursive {
                files::rchown(&path, uid, gid, globs)?;
            } else {
                files::chown(&path, uid, gid, globs)?;
            }
        }
        Commands::Tar { source, dest } => {
            archive::tar_create_with(&source, dest.as_deref(), settings.archive_options())?
        }
        Commands::Untar { source, dest } => archive::tar_extract(&source, dest.as_deref())?,
        Commands::Zip { source, dest } => {
            archive::zip_create_with(&source, dest.as_deref(), settings.archive_options())?
        }
        Commands::Unzip { source, dest } => archive::zip_extract(&source, dest.as_deref())?,
        Commands::Realpath { path: p } => println!("{}", path::resolve(p).display()),
        Commands::Relpath { path: p, base } => {
            let rel = match base {
                Some(base) => path::relative_to(p, base),
                None => path::relative_to_cwd(p),
            };
            println!("{}", rel.display());
        }
        Commands::Cat { path } => {
            let data = io::read_file(&path)?;
            std::io::stdout().write_all(&data).context("writing to stdout")?;
        }
        Commands::Write { path, text } => create::write_file(&path, text)?,
    }
    Ok(())
}

fn ls(dir: &Path, long: bool, all: bool, dereference: bool) -> Result<()> {
    let mode = match (long, dereference) {
        (false, _) => StatMode::None,
        (true, false) => StatMode::Shallow,
        (true, true) => StatMode::FollowLinks,
    };
    let mut entries: Vec<_> = list::list(dir, mode, all)?.into_iter().collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = std::io::stdout().lock();
    for entry in entries {
        let name = entry.name.to_string_lossy();
        match entry.stat {
            Some(st) => {
                let kind = match st.kind {
                    StatKind::Directory => 'd',
                    StatKind::Symlink => 'l',
                    StatKind::File => '-',
                    StatKind::Other => '?',
                };
                writeln!(out, "{kind}{:04o} {:>5} {:>5} {:>10} {name}", st.permissions(), st.uid, st.gid, st.len)?;
            }
            None => writeln!(out, "{name}")?,
        }
    }
    Ok(())
}

fn parse_owner(owner: &str) -> Result<(Option<u32>, Option<u32>)> {
    let (user, group) = match owner.split_once(':') {
        Some((u, g)) => (u, Some(g)),
        None => (owner, None),
    };
    let id = |s: &str| -> Result<Option<u32>> {
        if s.is_empty() {
            return Ok(None);
        }
        s.parse::<u32>()
            .map(Some)
            .with_context(|| format!("invalid numeric id `{s}`"))
    };
    let uid = id(user)?;
    let gid = match group {
        Some(g) => id(g)?,
        None => None,
    };
    if uid.is_none() && gid.is_none() {
        bail!("owner `{owner}` names neither a user nor a group id");
    }
    Ok((uid, gid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_forms() {
        assert_eq!(parse_owner("1000").unwrap(), (Some(1000), None));
        assert_eq!(parse_owner("1000:100").unwrap(), (Some(1000), Some(100)));
        assert_eq!(parse_owner(":100").unwrap(), (None, Some(100)));
        assert!(parse_owner(":").is_err());
        assert!(parse_owner("root").is_err());
    }

    #[test]
    fn cli_parses_globals_after_subcommand() {
        let cli = Cli::try_parse_from(["shellfs", "ls", "-la", "/tmp", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Ls { long: true, all: true, .. }));
    }
}
