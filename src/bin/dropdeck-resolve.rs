//! CLI utility to resolve dropped references, optionally simulating a drop onto a player.

use std::path::Path;

use dropdeck::config;
use dropdeck::drop::{
    DeckTable, DropActions, DropModifiers, DropPayload, DropReference, DropResolver,
    FileValidator, PlaylistParsers, ResolveOptions, SlotKind, TokenStore, TrackResolver,
    media_support_for,
};
use dropdeck::logging;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    let settings = config::load_or_default().map_err(|err| err.to_string())?;
    let media = media_support_for(&settings.media);
    let permissions = TokenStore::open_default().map_err(|err| err.to_string())?;
    let parsers = PlaylistParsers::default();
    let tracks = TrackResolver::new(&parsers, FileValidator::new(media.as_ref(), &permissions));

    let Some(target) = &options.target else {
        let resolve = ResolveOptions {
            first_only: options.first_only,
            accept_playlists: options.accept_playlists,
        };
        let files = tracks.supported_tracks(&options.references, resolve);
        for file in &files {
            println!("{}", file.absolute_path().display());
        }
        println!("Resolved {} file(s).", files.len());
        return Ok(());
    };

    let mut players = DeckTable::with_standard_groups(4, 1, 4);
    if players.kind(target).is_none() && players.register(target).is_none() {
        players.insert(target.as_str(), SlotKind::Deck);
    }
    if let Some(source) = &options.text
        && players.kind(source).is_none()
    {
        players.register(source);
    }
    players.set_playing(target, options.playing);

    let payload = DropPayload {
        urls: options.references.clone(),
        text: options.text.clone(),
        modifiers: DropModifiers {
            shift: options.shift,
        },
    };
    let resolver = DropResolver::new(tracks, &players, &settings.controls);
    let outcome = resolver.handle_drop(&payload, target, &mut PrintActions);
    println!("{outcome:?}");
    Ok(())
}

struct PrintActions;

impl DropActions for PrintActions {
    fn clone_deck(&mut self, source: &str, target: &str) {
        println!("clone {source} -> {target}");
    }

    fn file_dropped(&mut self, path: &Path, target: &str) {
        println!("load {} -> {target}", path.display());
    }
}

#[derive(Default)]
struct Options {
    references: Vec<DropReference>,
    accept_playlists: bool,
    first_only: bool,
    target: Option<String>,
    text: Option<String>,
    shift: bool,
    playing: bool,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--playlists" => options.accept_playlists = true,
            "--first" => options.first_only = true,
            "--target" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--target requires a value".to_string())?;
                options.target = Some(value.to_string());
            }
            "--text" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--text requires a value".to_string())?;
                options.text = Some(value.to_string());
            }
            "--shift" => options.shift = true,
            "--playing" => options.playing = true,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            reference => options.references.push(DropReference::new(reference)),
        }
        idx += 1;
    }

    if options.target.is_none() && options.references.is_empty() {
        return Err(format!("No references given\n\n{}", help_text()));
    }
    Ok(Some(options))
}

fn help_text() -> String {
    [
        "dropdeck-resolve",
        "",
        "Resolves dropped files, URLs and playlists into playable tracks.",
        "",
        "Usage:",
        "  dropdeck-resolve [--playlists] [--first] <reference>...",
        "  dropdeck-resolve --target <group> [--text <tag>] [--shift] [--playing] [<reference>...]",
        "",
        "Options:",
        "  --playlists       Expand .m3u, .m3u8 and .pls files.",
        "  --first           Stop after the first playable file.",
        "  --target <group>  Simulate a drop onto this player (e.g. [Channel1]).",
        "  --text <tag>      Text tag carried by the drop (a source deck for clones).",
        "  --shift           Hold shift during the drop.",
        "  --playing         Treat the target as playing.",
    ]
    .join("\n")
}
