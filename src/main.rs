use anyhow::{bail, Context, Result};
use start_menu_apps::associations::{image_extensions, AssociationStore, JsonAssociationStore};
use start_menu_apps::{icon, listing, paths, shortcut, Discovery, DiscoveryConfig};
use std::ffi::OsStr;
use std::path::PathBuf;

const HELP: &str = "\
List the applications installed through the start menu, image editors first.

USAGE:
  start_menu_apps [OPTIONS]

OPTIONS:
  --user-dir <PATH>        per-user programs directory to scan
  --all-users-dir <PATH>   shared programs directory to scan
  --no-all-users           only scan the per-user directory
  --associations <FILE>    JSON map of image extension to handler list,
                           used instead of the Explorer registry
  --json                   print JSON instead of a table
  -v, --verbose            debug logging (RUST_LOG also works)
  -h, --help               print this help
";

struct Args {
    user_dir: Option<PathBuf>,
    all_users_dir: Option<PathBuf>,
    no_all_users: bool,
    associations: Option<PathBuf>,
    json: bool,
    verbose: bool,
}

fn path_arg(s: &OsStr) -> Result<PathBuf, &'static str> {
    Ok(PathBuf::from(s))
}

fn parse_args(mut pargs: pico_args::Arguments) -> Result<Option<Args>> {
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(None);
    }
    let args = Args {
        user_dir: pargs.opt_value_from_os_str("--user-dir", path_arg)?,
        all_users_dir: pargs.opt_value_from_os_str("--all-users-dir", path_arg)?,
        no_all_users: pargs.contains("--no-all-users"),
        associations: pargs.opt_value_from_os_str("--associations", path_arg)?,
        json: pargs.contains("--json"),
        verbose: pargs.contains(["-v", "--verbose"]),
    };
    let rest = pargs.finish();
    if !rest.is_empty() {
        bail!("unexpected arguments: {rest:?}");
    }
    if args.no_all_users && args.all_users_dir.is_some() {
        bail!("--no-all-users and --all-users-dir can't be used together");
    }
    Ok(Some(args))
}

fn association_store(file: Option<&PathBuf>) -> Result<Box<dyn AssociationStore>> {
    if let Some(file) = file {
        return Ok(Box::new(JsonAssociationStore::from_file(file)?));
    }
    #[cfg(windows)]
    {
        Ok(Box::new(start_menu_apps::registry::RegistryAssociationStore))
    }
    #[cfg(not(windows))]
    {
        log::warn!("No association store on this host, pass --associations to find image apps");
        Ok(Box::new(JsonAssociationStore::default()))
    }
}

fn main() -> Result<()> {
    let Some(args) = parse_args(pico_args::Arguments::from_env())? else {
        return Ok(());
    };
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let store = association_store(args.associations.as_ref())?;
    let links = shortcut::platform_resolver().context("Setting up shortcut resolution failed")?;
    let icons = icon::platform_icons();

    let user_dir = match args.user_dir {
        Some(dir) => dir,
        None => paths::user_programs_dir().context("Couldn't find the user's start menu")?,
    };
    let all_users_dir = if args.no_all_users {
        None
    } else {
        args.all_users_dir.or_else(paths::all_users_programs_dir)
    };

    let discovery = Discovery::new(
        DiscoveryConfig::default(),
        store.as_ref(),
        links.as_ref(),
        icons.as_ref(),
    );
    let report = discovery.run(&image_extensions(), &user_dir, all_users_dir.as_deref())?;

    if args.json {
        println!("{}", listing::render_json(&report.catalog)?);
    } else {
        print!("{}", listing::render_table(&report.catalog));
    }
    Ok(())
}
