use super::scan::{CoverLookup, find_cover, is_audio_file, read_track};
use super::scan_paths;
use crate::config::LibrarySettings;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn exts() -> Vec<String> {
    vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()]
}

#[test]
fn is_audio_file_matches_configured_extensions_case_insensitive() {
    let exts = exts();
    assert!(is_audio_file(Path::new("/tmp/a.mp3"), &exts));
    assert!(is_audio_file(Path::new("/tmp/a.MP3"), &exts));
    assert!(is_audio_file(Path::new("/tmp/a.flac"), &exts));
    assert!(is_audio_file(Path::new("/tmp/a.ogg"), &exts));
    assert!(!is_audio_file(Path::new("/tmp/a.txt"), &exts));
    assert!(!is_audio_file(Path::new("/tmp/a"), &exts));
}

#[test]
fn untagged_file_uses_stem_and_default_artist() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("My Song.mp3");
    fs::write(&path, b"not a real mp3").unwrap();

    let t = read_track(&path, &LibrarySettings::default(), &mut CoverLookup::default());

    assert_eq!(t.title, "My Song");
    assert_eq!(t.artist, "Local File");
    assert_eq!(t.source, path);
    assert_eq!(t.cover_art, None);
    assert_eq!(t.duration_hint, None);
}

#[test]
fn scan_keeps_argument_order_and_sorts_directory_contents() {
    let dir = tempdir().unwrap();
    let album = dir.path().join("album");
    fs::create_dir_all(&album).unwrap();
    fs::write(album.join("b.ogg"), b"x").unwrap();
    fs::write(album.join("A.MP3"), b"x").unwrap();
    fs::write(album.join("notes.txt"), b"x").unwrap();
    let single = dir.path().join("zzz.flac");
    fs::write(&single, b"x").unwrap();

    let tracks = scan_paths(&[single.clone(), album.clone()], &LibrarySettings::default());

    let sources: Vec<PathBuf> = tracks.iter().map(|t| t.source.clone()).collect();
    assert_eq!(sources, vec![single, album.join("A.MP3"), album.join("b.ogg")]);
}

#[test]
fn scan_skips_missing_and_non_audio_arguments() {
    let dir = tempdir().unwrap();
    let text = dir.path().join("readme.txt");
    fs::write(&text, b"x").unwrap();

    let tracks = scan_paths(
        &[text, dir.path().join("missing.mp3")],
        &LibrarySettings::default(),
    );
    assert!(tracks.is_empty());
}

#[test]
fn scan_skips_hidden_entries_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"x").unwrap();

    let tracks = scan_paths(&[dir.path().to_path_buf()], &LibrarySettings::default());
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "visible");

    let settings = LibrarySettings {
        include_hidden: true,
        ..LibrarySettings::default()
    };
    assert_eq!(scan_paths(&[dir.path().to_path_buf()], &settings).len(), 2);
}

#[test]
fn scan_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"x").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"x").unwrap();

    let settings = LibrarySettings {
        recursive: false,
        ..LibrarySettings::default()
    };
    let tracks = scan_paths(&[dir.path().to_path_buf()], &settings);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "root");
}

#[test]
fn scan_respects_max_depth() {
    let dir = tempdir().unwrap();
    let d1 = dir.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    fs::write(dir.path().join("root.mp3"), b"x").unwrap();
    fs::write(d1.join("one.mp3"), b"x").unwrap();
    fs::write(d2.join("two.mp3"), b"x").unwrap();

    // WalkDir depth counts root as 0, so max_depth=2 reaches d1/* but not d1/d2/*.
    let settings = LibrarySettings {
        max_depth: Some(2),
        ..LibrarySettings::default()
    };
    let titles: Vec<String> = scan_paths(&[dir.path().to_path_buf()], &settings)
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert!(titles.contains(&"root".to_string()));
    assert!(titles.contains(&"one".to_string()));
    assert!(!titles.contains(&"two".to_string()));
}

#[test]
fn cover_art_found_case_insensitively_in_name_order() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("song.mp3");
    fs::write(&song, b"x").unwrap();
    fs::write(dir.path().join("Folder.JPG"), b"img").unwrap();
    fs::write(dir.path().join("cover.png"), b"img").unwrap();

    let names = vec!["cover.jpg".to_string(), "folder.jpg".to_string(), "cover.png".to_string()];
    assert_eq!(find_cover(dir.path(), &names), Some(dir.path().join("Folder.JPG")));
    assert_eq!(find_cover(dir.path(), &[]), None);
    assert_eq!(find_cover(dir.path(), &["front.jpg".to_string()]), None);

    let t = read_track(&song, &LibrarySettings::default(), &mut CoverLookup::default());
    assert_eq!(t.cover_art, Some(dir.path().join("cover.png")));
}

#[test]
fn cover_ignores_directories_with_matching_names() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("cover.jpg")).unwrap();
    fs::write(dir.path().join("folder.png"), b"img").unwrap();

    let names = vec!["cover.jpg".to_string(), "folder.png".to_string()];
    assert_eq!(find_cover(dir.path(), &names), Some(dir.path().join("folder.png")));
}

#[test]
fn tracks_in_one_folder_share_its_cover() {
    let dir = tempdir().unwrap();
    for name in ["a.mp3", "b.mp3", "c.flac"] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }
    fs::write(dir.path().join("cover.jpg"), b"img").unwrap();

    let tracks = scan_paths(&[dir.path().to_path_buf()], &LibrarySettings::default());

    assert_eq!(tracks.len(), 3);
    for t in &tracks {
        assert_eq!(t.cover_art, Some(dir.path().join("cover.jpg")));
    }
}

#[test]
fn cover_lookup_lists_each_folder_once() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("cover.jpg");
    fs::write(&cover, b"img").unwrap();
    let names = LibrarySettings::default().cover_names;
    let mut covers = CoverLookup::default();

    assert_eq!(covers.cover_for(&dir.path().join("a.mp3"), &names), Some(cover.clone()));

    // A second track in the same folder reuses the first answer.
    fs::remove_file(&cover).unwrap();
    assert_eq!(covers.cover_for(&dir.path().join("b.mp3"), &names), Some(cover));

    // A fresh scan sees the folder as it is now.
    assert_eq!(
        CoverLookup::default().cover_for(&dir.path().join("b.mp3"), &names),
        None
    );
}
