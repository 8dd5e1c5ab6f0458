#[macro_use]
extern crate lazy_static;

mod collections;
mod config;
mod detect;
mod embed;
mod extractor;
mod identity;
mod notify;
mod resolver;
mod sizes;
mod store;

use collections::CollectionError;
use identity::PhotoIdentity;
use notify::{ConsoleNotifier, NotificationSink};
use resolver::{ExportSizing, HttpProviderApi, MethodPreference, SizeResolver};
use std::env;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use store::{Store, StoredState};

const USAGE: &str = "\
Usage: fembed-rs <command> [args]

Commands:
  embed <photo-url> [tier-key]       generate embed markup for one photo
  url <photo-url-or-embed-html>      print the canonical photo URL
  detect <page-url> [html-file]      find a photo in saved page markup
                                     (reads stdin when no file is given)
  add <photo-url-or-embed-html>      add a photo to the active collection
  add-to <collection> <photo-url-or-embed-html>
  list                               list collections and their entries
  create <name>                      create a collection and make it active
  rename <old> <new>
  delete <name>
  clear <name>
  move <from-index> <to-index>       reorder the active collection
  remove <index>                     remove from the active collection
  export [--urls] [--no-script] [--blank-lines] [--sizing <strategy>]
  set-key <api-key>
  set-method <auto|api|oembed-only>
  set-default-size <tier-key>";

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }
    if let Err(err) = run(&args[1], &args[2..]) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(command: &str, args: &[String]) -> Result<(), String> {
    let config = config::Config::load_or_default(&config::default_config_path())?;
    let store = Store::new(store_path(&config));
    log::debug!("using store at {}", store.path().display());
    let notifier = ConsoleNotifier;

    match command {
        "embed" => cmd_embed(&config, &store, &notifier, args),
        "url" => cmd_url(args),
        "detect" => cmd_detect(args),
        "add" => cmd_add(&store, &notifier, None, args),
        "add-to" => {
            let name = arg(args, 0, "collection name")?.to_string();
            cmd_add(&store, &notifier, Some(name), &args[1..])
        }
        "list" => cmd_list(&store),
        "create" => mutate(&store, |state| {
            let name = arg(args, 0, "collection name")?;
            state.set.create(name).map_err(collection_error)
        }),
        "rename" => mutate(&store, |state| {
            let old = arg(args, 0, "old name")?;
            let new = arg(args, 1, "new name")?;
            state.set.rename(old, new).map_err(collection_error)
        }),
        "delete" => cmd_delete(&store, &notifier, args),
        "clear" => mutate(&store, |state| {
            let name = arg(args, 0, "collection name")?;
            state.set.clear(name).map_err(collection_error)
        }),
        "move" => cmd_move(&store, args),
        "remove" => cmd_remove(&store, &notifier, args),
        "export" => cmd_export(&config, &store, &notifier, args),
        "set-key" => {
            let key = arg(args, 0, "api key")?.to_string();
            store
                .update(|state| state.api_key = Some(key))
                .map_err(|e| e.to_string())
        }
        "set-method" => {
            let method = MethodPreference::from_str(arg(args, 0, "method")?)?;
            store
                .update(|state| state.method = method)
                .map_err(|e| e.to_string())
        }
        "set-default-size" => {
            let key = arg(args, 0, "tier key")?;
            let tier = sizes::find(key).ok_or_else(|| format!("unknown size tier \"{}\"", key))?;
            store
                .update(|state| state.default_size = tier.key.to_string())
                .map_err(|e| e.to_string())
        }
        other => Err(format!("unknown command \"{}\"\n{}", other, USAGE)),
    }
}

fn store_path(config: &config::Config) -> PathBuf {
    match &config.store_path {
        Some(path) => PathBuf::from(path),
        None => store::default_store_path(),
    }
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, String> {
    args.get(index)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("missing {} argument\n{}", name, USAGE))
}

/// Accepts either embed HTML from an earlier run or a plain photo URL.
/// Never invents an identity when nothing matches.
fn identity_from_input(input: &str) -> Option<PhotoIdentity> {
    extractor::from_embed_html(input).or_else(|| extractor::from_canonical_url(input))
}

// Read-modify-write for fallible collection operations: reload the
// snapshot, apply, persist only on success.
fn mutate(
    store: &Store,
    apply: impl FnOnce(&mut StoredState) -> Result<(), String>,
) -> Result<(), String> {
    let mut state = store.load().map_err(|e| e.to_string())?;
    apply(&mut state)?;
    store.save(&state).map_err(|e| e.to_string())
}

fn cmd_embed(
    config: &config::Config,
    store: &Store,
    notifier: &dyn NotificationSink,
    args: &[String],
) -> Result<(), String> {
    let input = arg(args, 0, "photo URL")?;
    let identity =
        identity_from_input(input).ok_or("could not extract photo information from the input")?;

    let state = store.load().map_err(|e| e.to_string())?;
    let tier_key = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| state.default_size.clone());

    let client = HttpProviderApi::new(&config.api);
    let resolver = SizeResolver::new(&client);
    let resolved = resolver
        .resolve(&identity, &tier_key, &state.settings())
        .map_err(|e| e.to_string())?;
    log::debug!(
        "resolved {} (api-gated: {})",
        resolved.label,
        resolved.requires_api
    );
    if let Some(warning) = &resolved.warning {
        notifier.notify(&format!("warning: {}", warning));
    }
    println!("{}", embed::build_embed(&identity, &resolved));
    Ok(())
}

fn cmd_url(args: &[String]) -> Result<(), String> {
    let input = arg(args, 0, "photo URL or embed HTML")?;
    let identity =
        identity_from_input(input).ok_or("could not extract photo information from the input")?;
    println!("{}", identity.canonical_url());
    Ok(())
}

fn cmd_detect(args: &[String]) -> Result<(), String> {
    let url = arg(args, 0, "page URL")?.to_string();
    let html = match args.get(1) {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path, e))?,
        None => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)
                .map_err(|e| format!("failed to read stdin: {}", e))?;
            buf
        }
    };

    let ctx = detect::PageContext { url, html };
    let identity = detect::detect(&ctx).ok_or("no photo detected on the page")?;
    println!("{}", identity.canonical_url());
    if !identity.title.is_empty() {
        println!("title: {}", identity.title);
    }
    if identity.has_image_data() {
        if let Some(thumbnail) = identity.thumbnail_url() {
            println!("thumbnail: {}", thumbnail);
        }
    }
    Ok(())
}

fn cmd_add(
    store: &Store,
    notifier: &dyn NotificationSink,
    collection: Option<String>,
    args: &[String],
) -> Result<(), String> {
    let input = arg(args, 0, "photo URL or embed HTML")?;
    let identity =
        identity_from_input(input).ok_or("could not extract photo information from the input")?;

    let (inserted, name, count) = store
        .update(|state| {
            let inserted = match &collection {
                Some(name) => state.set.add_entry(name, &identity),
                None => state.set.add_to_active(&identity),
            };
            let name = collection
                .clone()
                .unwrap_or_else(|| state.set.active_collection.clone());
            let count = state.set.entries(&name).map(|e| e.len()).unwrap_or(0);
            (inserted, name, count)
        })
        .map_err(|e| e.to_string())?;

    if inserted {
        notifier.notify(&format!("added to collection \"{}\" ({} photos)", name, count));
    } else {
        notifier.notify(&format!("photo already in collection \"{}\"", name));
    }
    Ok(())
}

fn cmd_list(store: &Store) -> Result<(), String> {
    let state = store.load().map_err(|e| e.to_string())?;
    for name in state.set.names().collect::<Vec<_>>() {
        let entries = state.set.entries(name).unwrap_or(&[]);
        let marker = if name == state.set.active_collection {
            "*"
        } else {
            " "
        };
        println!("{} {} ({} photos)", marker, name, entries.len());
        for (index, entry) in entries.iter().enumerate() {
            println!("    {:3}  {}  {}", index, entry.photo_id, entry.title);
        }
    }
    Ok(())
}

fn cmd_delete(
    store: &Store,
    notifier: &dyn NotificationSink,
    args: &[String],
) -> Result<(), String> {
    let name = arg(args, 0, "collection name")?.to_string();
    let mut active = String::new();
    mutate(store, |state| {
        state.set.delete(&name).map_err(collection_error)?;
        active = state.set.active_collection.clone();
        Ok(())
    })?;
    notifier.notify(&format!(
        "deleted collection \"{}\" (active is now \"{}\")",
        name, active
    ));
    Ok(())
}

fn cmd_move(store: &Store, args: &[String]) -> Result<(), String> {
    let from = parse_index(arg(args, 0, "from index")?)?;
    let to = parse_index(arg(args, 1, "to index")?)?;
    mutate(store, |state| {
        let active = state.set.active_collection.clone();
        state.set.move_entry(&active, from, to).map_err(collection_error)
    })
}

fn cmd_remove(
    store: &Store,
    notifier: &dyn NotificationSink,
    args: &[String],
) -> Result<(), String> {
    let index = parse_index(arg(args, 0, "index")?)?;
    let mut removed_id = String::new();
    mutate(store, |state| {
        let active = state.set.active_collection.clone();
        let removed = state.set.remove_at(&active, index).map_err(collection_error)?;
        removed_id = removed.photo_id;
        Ok(())
    })?;
    notifier.notify(&format!("removed photo {}", removed_id));
    Ok(())
}

fn cmd_export(
    config: &config::Config,
    store: &Store,
    notifier: &dyn NotificationSink,
    args: &[String],
) -> Result<(), String> {
    let mut urls_mode = false;
    let mut include_script = true;
    let mut separator = "\n";
    let mut sizing = ExportSizing::LargestAvailable;

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--urls" => urls_mode = true,
            "--no-script" => include_script = false,
            "--blank-lines" => separator = "\n\n",
            "--sizing" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "missing value for --sizing".to_string())?;
                sizing = ExportSizing::parse(value);
            }
            other => return Err(format!("unknown export flag \"{}\"", other)),
        }
    }

    // Reload so the export sees the latest ordering from other surfaces.
    let state = store.load().map_err(|e| e.to_string())?;
    let active = state.set.active_collection.clone();
    let entries = state.set.entries(&active).unwrap_or(&[]).to_vec();
    if entries.is_empty() {
        notifier.notify(&format!("collection \"{}\" is empty", active));
        return Ok(());
    }

    if urls_mode {
        let identities: Vec<PhotoIdentity> = entries.iter().map(|entry| entry.identity()).collect();
        println!("{}", embed::build_url_list(&identities, separator));
        return Ok(());
    }

    let client = HttpProviderApi::new(&config.api);
    let resolver = SizeResolver::new(&client);
    let settings = state.settings();
    let mut embeds = Vec::with_capacity(entries.len());
    let mut warnings = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let identity = entry.identity();
        match resolver.best_size_for(&identity, &sizing, &settings) {
            Ok(resolved) => {
                if let Some(warning) = &resolved.warning {
                    warnings.push(format!("photo {}: {}", index + 1, warning));
                }
                embeds.push(embed::build_embed(&identity, &resolved));
            }
            Err(err) => {
                warnings.push(format!("photo {}: {}", index + 1, err));
                embeds.push(format!(
                    "<!-- failed to generate embed for photo {} -->",
                    entry.photo_id
                ));
            }
        }
    }
    for warning in &warnings {
        notifier.notify(warning);
    }
    println!(
        "{}",
        embed::build_batch_output(&embeds, include_script, separator)
    );
    notifier.notify(&format!("generated {} embed codes", embeds.len()));
    Ok(())
}

fn collection_error(err: CollectionError) -> String {
    err.to_string()
}

fn parse_index(raw: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .map_err(|_| format!("\"{}\" is not a valid index", raw))
}
