use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

use emoji_font::{build_font, export_artifact, SymbolCapture, DEFAULT_QUALITY};

/// Build a font from a directory of capture PNGs.
///
/// Files are named by the hyphen-joined lowercase hex codepoints of their
/// grapheme, e.g. `1f600.png` or `1f468-200d-1f469.png`.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let captures_dir = PathBuf::from(
        args.next()
            .context("usage: emoji_font <captures-dir> [family-name]")?,
    );
    let family_name = args.next().unwrap_or_else(|| String::from("Emoji"));

    let captures = load_captures(&captures_dir)?;
    anyhow::ensure!(
        !captures.is_empty(),
        "no capture images in {}",
        captures_dir.display()
    );

    let font = build_font(&captures, &family_name)?;

    let font_path = captures_dir.join("font.ttf");
    fs::write(&font_path, font.to_bytes()?)?;

    let artifact_path = captures_dir.join("font.ttf.z");
    fs::write(&artifact_path, export_artifact(&font, DEFAULT_QUALITY)?)?;

    println!("{}", artifact_path.display());

    Ok(())
}

fn load_captures(dir: &Path) -> anyhow::Result<Vec<SymbolCapture>> {
    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| Some(entry.ok()?.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect::<Vec<_>>();
    paths.sort();

    let mut captures = Vec::new();
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        let Some(grapheme) = grapheme_from_stem(stem) else {
            log::warn!("skipping {}: not a codepoint filename", path.display());
            continue;
        };

        captures.push(SymbolCapture::new(grapheme, fs::read(&path)?));
    }

    Ok(captures)
}

fn grapheme_from_stem(stem: &str) -> Option<String> {
    stem.split('-')
        .map(|hex| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
        .collect()
}
